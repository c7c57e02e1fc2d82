//! Core types for prflow

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A hosted repository identity (owner + name)
///
/// Derived once per run from the local remote configuration and never
/// mutated afterwards. Both fields are non-empty.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RepoInfo {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub name: String,
}

impl std::fmt::Display for RepoInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// The currently checked-out local branch
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Branch {
    /// Branch name
    pub name: String,
}

/// The head commit of a pull request, annotated with its position in
/// local history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommitInfo {
    /// Full commit OID (hex)
    pub oid: String,
    /// Abbreviated commit OID
    pub abbreviated_oid: String,
    /// Commit message
    pub message: String,
    /// Zero-based distance of this commit from the tip of local history
    /// (`Some(0)` = tip). `None` means the commit was not found locally,
    /// so we cannot confirm the PR reflects local work.
    pub ordinal: Option<usize>,
}

impl CommitInfo {
    /// Whether this commit is the tip of local history, i.e. the PR is
    /// fully up to date with local work.
    pub fn is_local_tip(&self) -> bool {
        self.ordinal == Some(0)
    }
}

/// The outcome of a single CI check, classified from its raw state
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum CheckOutcome {
    /// Check completed successfully
    Passing {
        /// Check name
        name: String,
    },
    /// Check has not completed yet (or has not started)
    Pending {
        /// Check name
        name: String,
        /// When the check started, if it has
        started_at: Option<DateTime<Utc>>,
        /// Detail URL, if reported
        url: Option<String>,
    },
    /// Check completed with a non-success conclusion
    Failing {
        /// Check name
        name: String,
        /// Detail URL, if reported
        url: Option<String>,
        /// Failure summary text, if reported
        summary: Option<String>,
    },
}

impl CheckOutcome {
    /// The check's name, regardless of outcome
    pub fn name(&self) -> &str {
        match self {
            Self::Passing { name } | Self::Pending { name, .. } | Self::Failing { name, .. } => {
                name
            }
        }
    }

    /// Whether this check failed
    pub const fn is_failing(&self) -> bool {
        matches!(self, Self::Failing { .. })
    }

    /// Whether this check is still pending
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending { .. })
    }
}

/// Mergeability verdict for a pull request
///
/// Derived from the hosting service's raw mergeable value. The mapping is
/// total: any value other than the two known literals collapses to
/// `Unknown` rather than propagating an unrecognized raw value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mergeability {
    /// No conflicts; the PR can be merged
    Mergeable,
    /// The PR has merge conflicts
    Conflicting,
    /// The hosting service has not computed (or reported) a verdict
    Unknown,
}

impl Mergeability {
    /// Map a raw mergeable value from the hosting API
    pub fn from_raw(raw: &str) -> Self {
        match raw {
            "MERGEABLE" => Self::Mergeable,
            "CONFLICTING" => Self::Conflicting,
            _ => Self::Unknown,
        }
    }
}

impl std::fmt::Display for Mergeability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Mergeable => write!(f, "mergeable"),
            Self::Conflicting => write!(f, "conflicting"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// The reconciled status of the pull request associated with the current
/// branch.
///
/// Constructed fresh on every status query and discarded after the
/// invoking command completes; never cached or shared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestStatus {
    /// GraphQL node ID (used for mutations)
    pub id: String,
    /// PR number
    pub number: u64,
    /// PR title
    pub title: String,
    /// Web URL for the PR
    pub url: String,
    /// Mergeability verdict
    pub mergeability: Mergeability,
    /// The PR's head commit, if it could be fetched
    pub last_commit: Option<CommitInfo>,
    /// Reconciled outcomes of the checks that gate this PR
    pub checks: Vec<CheckOutcome>,
}

/// A branch-protection rule, reduced to the fields we consume
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchProtectionRule {
    /// Branch names this rule currently matches
    pub matching_branch_names: Vec<String>,
    /// Check contexts the rule requires to pass before merge
    pub required_check_contexts: Vec<String>,
    /// Whether the rule enforces status checks at all
    pub requires_status_checks: bool,
}

/// A row in the `list-ongoing` output: one of the user's open PRs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrSummary {
    /// PR number
    pub number: u64,
    /// PR title
    pub title: String,
    /// Web URL for the PR
    pub url: String,
    /// Author login
    pub author: String,
    /// Last update time
    pub updated_at: Option<DateTime<Utc>>,
}

/// A row in the `list-closed` output: a recently merged PR
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergedPr {
    /// PR number
    pub number: u64,
    /// PR title
    pub title: String,
    /// Web URL for the PR
    pub url: String,
    /// Author login
    pub author: String,
    /// When the PR was merged
    pub merged_at: DateTime<Utc>,
}

/// Local repository facts consumed by the submit decision procedure
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LocalFacts {
    /// Whether the current branch is the mainline branch
    pub on_main_branch: bool,
    /// Whether the working tree has uncommitted changes
    pub has_uncommitted_changes: bool,
}
