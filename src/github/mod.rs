//! GitHub services
//!
//! Provides a unified interface over the REST and GraphQL APIs. The core
//! consumes the [`HostingService`] trait; [`GitHubClient`] is the real
//! implementation.

mod client;

pub use client::GitHubClient;

use crate::error::Result;
use crate::types::{BranchProtectionRule, MergedPr, PrSummary};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// A raw status-check entry for a commit, before classification.
///
/// GitHub reports checks through two systems: check runs (Actions) and
/// legacy commit status contexts. The status-check rollup interleaves
/// both, so the snapshot keeps them distinct and the reconciler
/// classifies each into a [`crate::types::CheckOutcome`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawCheck {
    /// A modern check run
    Run {
        /// Check run name
        name: String,
        /// Raw status (e.g. `COMPLETED`, `IN_PROGRESS`, `QUEUED`)
        status: String,
        /// Raw conclusion when completed (e.g. `SUCCESS`, `FAILURE`)
        conclusion: Option<String>,
        /// When the run started
        started_at: Option<DateTime<Utc>>,
        /// Detail URL
        url: Option<String>,
        /// Output summary text
        summary: Option<String>,
    },
    /// A legacy commit status context
    Context {
        /// Context name
        name: String,
        /// Raw state (e.g. `SUCCESS`, `PENDING`, `FAILURE`, `EXPECTED`)
        state: String,
        /// Target URL
        url: Option<String>,
        /// Status description
        description: Option<String>,
        /// When the status was created
        created_at: Option<DateTime<Utc>>,
    },
}

impl RawCheck {
    /// The entry's context/run name
    pub fn name(&self) -> &str {
        match self {
            Self::Run { name, .. } | Self::Context { name, .. } => name,
        }
    }
}

/// The head commit of a pull request as reported by the hosting service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadCommit {
    /// Full commit OID
    pub oid: String,
    /// Abbreviated commit OID
    pub abbreviated_oid: String,
    /// Commit message
    pub message: String,
    /// Status-check rollup entries for this commit
    pub checks: Vec<RawCheck>,
}

/// A snapshot of the open pull request associated with a branch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrSnapshot {
    /// GraphQL node ID
    pub id: String,
    /// PR number
    pub number: u64,
    /// PR title
    pub title: String,
    /// Web URL
    pub url: String,
    /// Raw mergeable value as reported (e.g. `MERGEABLE`, `CONFLICTING`)
    pub raw_mergeable: String,
    /// The PR's head commit, if reported
    pub head_commit: Option<HeadCommit>,
}

/// Everything the reconciler needs about a branch, fetched in one
/// GraphQL round trip: the mainline's protection rules plus the branch's
/// associated open pull request (with head commit and check rollup).
#[derive(Debug, Clone, Default)]
pub struct BranchContext {
    /// All branch-protection rules for the repository
    pub rules: Vec<BranchProtectionRule>,
    /// The open PR whose head is the queried branch, if any
    pub pr: Option<PrSnapshot>,
}

/// Hosting-service operations consumed by prflow commands.
///
/// Abstracts the GitHub REST and GraphQL APIs behind one seam so the
/// orchestration logic can be exercised against a mock in tests.
#[async_trait]
pub trait HostingService: Send + Sync {
    /// Login of the user the token authenticates as
    async fn authenticated_user(&self) -> Result<String>;

    /// Combined query: branch-protection rules + the branch's associated
    /// open PR + its head commit + status-check rollup, in one round trip.
    ///
    /// `Ok` with `pr: None` means no open PR exists for the branch — a
    /// normal outcome, not an error.
    async fn branch_context(&self, branch: &str) -> Result<BranchContext>;

    /// Open PRs authored by `author`, most recently updated first
    async fn list_open_prs(&self, author: &str) -> Result<Vec<PrSummary>>;

    /// Recently merged PRs, optionally filtered by author
    async fn list_merged_prs(&self, author: Option<&str>) -> Result<Vec<MergedPr>>;

    /// Create a PR for `head` targeting `base`, applying `labels`
    async fn create_pr(
        &self,
        title: &str,
        head: &str,
        base: &str,
        labels: &[String],
    ) -> Result<PrSummary>;

    /// Update an existing PR's title
    async fn update_pr_title(&self, pr_number: u64, title: &str) -> Result<()>;

    /// Squash-merge a PR
    async fn merge_pr(&self, pr_number: u64) -> Result<()>;

    /// Post a comment on a PR
    async fn add_pr_comment(&self, pr_number: u64, body: &str) -> Result<()>;
}
