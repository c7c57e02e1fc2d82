//! Submit execution - effectful operations
//!
//! Takes a [`SubmitAction`] (produced by the pure decision procedure)
//! and performs it via the hosting service. Mutations only happen here,
//! after reconciliation succeeded and the decision approved.

use crate::error::{Error, Result};
use crate::git::Vcs;
use crate::github::HostingService;
use crate::submit::{AbortReason, SubmitAction};
use crate::types::PullRequestStatus;

/// Comment body that asks the merge bot to merge once checks pass.
///
/// Posting it twice is harmless, so an interrupted submit can simply be
/// re-run.
pub const AUTO_MERGE_COMMENT: &str = "#automerge";

/// What the submit execution actually did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmitOutcome {
    /// The PR was merged and the local checkout moved back to mainline
    pub merged: bool,
    /// The auto-merge comment was posted
    pub auto_merge_requested: bool,
}

impl SubmitOutcome {
    /// Whether any remote mutation happened
    pub const fn acted(&self) -> bool {
        self.merged || self.auto_merge_requested
    }
}

/// Apply a decided submit action.
///
/// `Abort` and `BlockedByFailingChecks` perform nothing; `MergeNow`
/// squash-merges the PR and switches the local checkout back to the
/// mainline branch; `RequestAutoMerge` posts the [`AUTO_MERGE_COMMENT`].
pub async fn apply_submit_action(
    action: &SubmitAction,
    status: Option<&PullRequestStatus>,
    hosting: &dyn HostingService,
    vcs: &dyn Vcs,
) -> Result<SubmitOutcome> {
    match action {
        SubmitAction::Abort(_) | SubmitAction::BlockedByFailingChecks(_) => {
            Ok(SubmitOutcome::default())
        }
        SubmitAction::MergeNow => {
            let status = require_status(status)?;
            hosting.merge_pr(status.number).await?;
            vcs.switch_to_main().await?;
            Ok(SubmitOutcome {
                merged: true,
                auto_merge_requested: false,
            })
        }
        SubmitAction::RequestAutoMerge => {
            let status = require_status(status)?;
            hosting.add_pr_comment(status.number, AUTO_MERGE_COMMENT).await?;
            Ok(SubmitOutcome {
                merged: false,
                auto_merge_requested: true,
            })
        }
    }
}

fn require_status(status: Option<&PullRequestStatus>) -> Result<&PullRequestStatus> {
    status.ok_or_else(|| {
        // The decision procedure only yields MergeNow/RequestAutoMerge
        // when a PR was found, so reaching this is a caller bug.
        Error::Internal(format!(
            "cannot act without a PR status ({})",
            AbortReason::NoPrFound
        ))
    })
}
