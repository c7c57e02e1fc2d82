//! Submit decision procedure - pure functions only
//!
//! No I/O happens here. All data is passed in, making the decision easy
//! to unit test and deterministic by construction.

use crate::types::{CheckOutcome, CommitInfo, LocalFacts, Mergeability, PullRequestStatus};

/// Why a submit was refused before any remote mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortReason {
    /// The current branch is the mainline branch
    OnMainBranch,
    /// The working tree has uncommitted changes
    UncommittedChanges,
    /// No open PR exists for the current branch
    NoPrFound,
    /// Local history has commits not reflected in the PR's head
    /// (or the head commit could not be located locally)
    StaleLocalCommit,
    /// The PR has merge conflicts
    Conflicting,
}

impl std::fmt::Display for AbortReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OnMainBranch => write!(f, "you are on the main branch"),
            Self::UncommittedChanges => write!(f, "you have uncommitted changes"),
            Self::NoPrFound => write!(f, "no PR was found for the current branch"),
            Self::StaleLocalCommit => {
                write!(f, "you have local changes that were not pushed to the PR")
            }
            Self::Conflicting => write!(f, "this PR is blocked by merge conflicts"),
        }
    }
}

/// The single next action for the submit workflow.
///
/// Side-effecting actions are executed by the caller based on this value,
/// keeping the decision itself pure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitAction {
    /// Do nothing; the stated reason is surfaced to the user
    Abort(AbortReason),
    /// All gates are green (or no checks gate this repo): merge now
    MergeNow,
    /// Checks are still running: ask the merge bot to merge when green
    RequestAutoMerge,
    /// At least one required check failed; merging is pointless
    BlockedByFailingChecks(Vec<CheckOutcome>),
}

/// Decide the next submit action.
///
/// Rules are evaluated in this exact order, first match wins - several
/// conditions can hold simultaneously, so the ordering is itself part of
/// the contract:
///
/// 1. on the main branch
/// 2. uncommitted changes
/// 3. no PR for the branch
/// 4. the PR head is not the local tip
/// 5. merge conflicts
/// 6. failing checks beat pending checks beat all-green
pub fn decide(status: Option<&PullRequestStatus>, local: &LocalFacts) -> SubmitAction {
    if local.on_main_branch {
        return SubmitAction::Abort(AbortReason::OnMainBranch);
    }

    if local.has_uncommitted_changes {
        return SubmitAction::Abort(AbortReason::UncommittedChanges);
    }

    let Some(status) = status else {
        return SubmitAction::Abort(AbortReason::NoPrFound);
    };

    if !status
        .last_commit
        .as_ref()
        .is_some_and(CommitInfo::is_local_tip)
    {
        return SubmitAction::Abort(AbortReason::StaleLocalCommit);
    }

    if status.mergeability == Mergeability::Conflicting {
        return SubmitAction::Abort(AbortReason::Conflicting);
    }

    // A definite failure is a stronger signal than an indeterminate one,
    // so failing takes precedence even when pending checks coexist. An
    // empty list means no CI gates this repo and must not block forever.
    let failing: Vec<CheckOutcome> = status
        .checks
        .iter()
        .filter(|c| c.is_failing())
        .cloned()
        .collect();
    if !failing.is_empty() {
        return SubmitAction::BlockedByFailingChecks(failing);
    }

    if status.checks.iter().any(CheckOutcome::is_pending) {
        return SubmitAction::RequestAutoMerge;
    }

    SubmitAction::MergeNow
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_status(ordinal: Option<usize>, checks: Vec<CheckOutcome>) -> PullRequestStatus {
        PullRequestStatus {
            id: "PR_node_1".to_string(),
            number: 42,
            title: "introduce caching of definitions".to_string(),
            url: "https://github.com/imaman/prflow/pull/42".to_string(),
            mergeability: Mergeability::Mergeable,
            last_commit: Some(CommitInfo {
                oid: "dae1010aaaa".to_string(),
                abbreviated_oid: "dae1010".to_string(),
                message: "tsc 4.0.3".to_string(),
                ordinal,
            }),
            checks,
        }
    }

    fn passing(name: &str) -> CheckOutcome {
        CheckOutcome::Passing {
            name: name.to_string(),
        }
    }

    fn pending(name: &str) -> CheckOutcome {
        CheckOutcome::Pending {
            name: name.to_string(),
            started_at: None,
            url: None,
        }
    }

    fn failing(name: &str) -> CheckOutcome {
        CheckOutcome::Failing {
            name: name.to_string(),
            url: None,
            summary: None,
        }
    }

    const CLEAN: LocalFacts = LocalFacts {
        on_main_branch: false,
        has_uncommitted_changes: false,
    };

    #[test]
    fn test_on_main_branch_aborts_first() {
        // Rule 1 precedes rule 2 even when both hold
        let local = LocalFacts {
            on_main_branch: true,
            has_uncommitted_changes: true,
        };
        let status = make_status(Some(0), vec![]);
        assert_eq!(
            decide(Some(&status), &local),
            SubmitAction::Abort(AbortReason::OnMainBranch)
        );
    }

    #[test]
    fn test_uncommitted_changes_abort() {
        let local = LocalFacts {
            on_main_branch: false,
            has_uncommitted_changes: true,
        };
        let status = make_status(Some(0), vec![]);
        assert_eq!(
            decide(Some(&status), &local),
            SubmitAction::Abort(AbortReason::UncommittedChanges)
        );
    }

    #[test]
    fn test_no_pr_aborts() {
        assert_eq!(
            decide(None, &CLEAN),
            SubmitAction::Abort(AbortReason::NoPrFound)
        );
    }

    #[test]
    fn test_stale_ordinal_aborts_regardless_of_checks() {
        for checks in [
            vec![],
            vec![passing("build")],
            vec![failing("build"), pending("lint")],
        ] {
            let status = make_status(Some(2), checks);
            assert_eq!(
                decide(Some(&status), &CLEAN),
                SubmitAction::Abort(AbortReason::StaleLocalCommit)
            );
        }
    }

    #[test]
    fn test_unknown_ordinal_aborts() {
        // Commit not found locally: we cannot confirm the PR is up to date
        let status = make_status(None, vec![passing("build")]);
        assert_eq!(
            decide(Some(&status), &CLEAN),
            SubmitAction::Abort(AbortReason::StaleLocalCommit)
        );
    }

    #[test]
    fn test_missing_last_commit_aborts() {
        let mut status = make_status(Some(0), vec![]);
        status.last_commit = None;
        assert_eq!(
            decide(Some(&status), &CLEAN),
            SubmitAction::Abort(AbortReason::StaleLocalCommit)
        );
    }

    #[test]
    fn test_conflicting_aborts() {
        let mut status = make_status(Some(0), vec![passing("build")]);
        status.mergeability = Mergeability::Conflicting;
        assert_eq!(
            decide(Some(&status), &CLEAN),
            SubmitAction::Abort(AbortReason::Conflicting)
        );
    }

    #[test]
    fn test_unknown_mergeability_does_not_abort() {
        let mut status = make_status(Some(0), vec![]);
        status.mergeability = Mergeability::Unknown;
        assert_eq!(decide(Some(&status), &CLEAN), SubmitAction::MergeNow);
    }

    #[test]
    fn test_failing_dominates_pending() {
        let status = make_status(
            Some(0),
            vec![pending("lint"), failing("build"), passing("docs")],
        );
        match decide(Some(&status), &CLEAN) {
            SubmitAction::BlockedByFailingChecks(failing) => {
                assert_eq!(failing.len(), 1);
                assert_eq!(failing[0].name(), "build");
            }
            other => panic!("Expected BlockedByFailingChecks, got: {other:?}"),
        }
    }

    #[test]
    fn test_pending_requests_auto_merge() {
        let status = make_status(Some(0), vec![passing("build"), pending("lint")]);
        assert_eq!(
            decide(Some(&status), &CLEAN),
            SubmitAction::RequestAutoMerge
        );
    }

    #[test]
    fn test_all_passing_merges_now() {
        let status = make_status(Some(0), vec![passing("build"), passing("lint")]);
        assert_eq!(decide(Some(&status), &CLEAN), SubmitAction::MergeNow);
    }

    #[test]
    fn test_empty_checks_merges_now() {
        // No CI configured must not leave the workflow stuck forever
        let status = make_status(Some(0), vec![]);
        assert_eq!(decide(Some(&status), &CLEAN), SubmitAction::MergeNow);
    }

    #[test]
    fn test_decide_is_idempotent() {
        let status = make_status(Some(0), vec![pending("lint")]);
        let first = decide(Some(&status), &CLEAN);
        let second = decide(Some(&status), &CLEAN);
        assert_eq!(first, second);
    }
}
