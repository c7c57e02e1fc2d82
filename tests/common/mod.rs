//! Shared fixtures for prflow tests

#![allow(dead_code)]

pub mod mock_hosting;
pub mod mock_vcs;

pub use mock_hosting::MockHostingService;
pub use mock_vcs::MockVcs;

use prflow::github::{BranchContext, HeadCommit, PrSnapshot, RawCheck};
use prflow::types::{BranchProtectionRule, CheckOutcome, CommitInfo, Mergeability, PullRequestStatus};

/// A branch-protection rule requiring `contexts` on `main`
pub fn protection_rule(contexts: &[&str]) -> BranchProtectionRule {
    BranchProtectionRule {
        matching_branch_names: vec!["main".to_string()],
        required_check_contexts: contexts.iter().map(ToString::to_string).collect(),
        requires_status_checks: true,
    }
}

/// A raw check run in a given state
pub fn raw_run(name: &str, status: &str, conclusion: Option<&str>) -> RawCheck {
    RawCheck::Run {
        name: name.to_string(),
        status: status.to_string(),
        conclusion: conclusion.map(ToString::to_string),
        started_at: None,
        url: Some(format!("https://github.com/checks/{name}")),
        summary: None,
    }
}

/// A PR snapshot for `branch` whose head commit is `oid`
pub fn snapshot(number: u64, branch: &str, oid: &str, checks: Vec<RawCheck>) -> PrSnapshot {
    PrSnapshot {
        id: format!("PR_node_{number}"),
        number,
        title: format!("PR for {branch}"),
        url: format!("https://github.com/imaman/prflow/pull/{number}"),
        raw_mergeable: "MERGEABLE".to_string(),
        head_commit: Some(HeadCommit {
            oid: oid.to_string(),
            abbreviated_oid: oid.chars().take(7).collect(),
            message: format!("commit on {branch}"),
            checks,
        }),
    }
}

/// A branch context with the given rules and PR
pub fn context(rules: Vec<BranchProtectionRule>, pr: Option<PrSnapshot>) -> BranchContext {
    BranchContext { rules, pr }
}

/// A reconciled PR status ready for decision tests
pub fn make_status(
    number: u64,
    ordinal: Option<usize>,
    checks: Vec<CheckOutcome>,
) -> PullRequestStatus {
    PullRequestStatus {
        id: format!("PR_node_{number}"),
        number,
        title: format!("PR number {number}"),
        url: format!("https://github.com/imaman/prflow/pull/{number}"),
        mergeability: Mergeability::Mergeable,
        last_commit: Some(CommitInfo {
            oid: "0ddba11c0ffee".to_string(),
            abbreviated_oid: "0ddba11".to_string(),
            message: "a commit".to_string(),
            ordinal,
        }),
        checks,
    }
}

/// A passing check outcome
pub fn passing(name: &str) -> CheckOutcome {
    CheckOutcome::Passing {
        name: name.to_string(),
    }
}

/// A pending check outcome
pub fn pending(name: &str) -> CheckOutcome {
    CheckOutcome::Pending {
        name: name.to_string(),
        started_at: None,
        url: None,
    }
}

/// A failing check outcome
pub fn failing(name: &str) -> CheckOutcome {
    CheckOutcome::Failing {
        name: name.to_string(),
        url: None,
        summary: None,
    }
}
