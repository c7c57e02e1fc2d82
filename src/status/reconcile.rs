//! Status reconciliation - combining remote state into one verdict
//!
//! The classification helpers here are pure; `StatusReconciler` adds the
//! effectful gathering around them (one GraphQL round trip plus a local
//! history lookup).

use crate::error::Result;
use crate::git::Vcs;
use crate::github::{HostingService, RawCheck};
use crate::types::{
    Branch, BranchProtectionRule, CheckOutcome, CommitInfo, Mergeability, PullRequestStatus,
};
use std::collections::BTreeSet;
use tracing::debug;

/// Produces the reconciled status of the pull request associated with
/// the current local branch.
pub struct StatusReconciler<'a> {
    hosting: &'a dyn HostingService,
    vcs: &'a dyn Vcs,
}

impl<'a> StatusReconciler<'a> {
    /// Create a reconciler over the given collaborators
    pub const fn new(hosting: &'a dyn HostingService, vcs: &'a dyn Vcs) -> Self {
        Self { hosting, vcs }
    }

    /// Reconcile the status of the open PR whose head is `branch`.
    ///
    /// Returns `Ok(None)` when no such PR exists - a normal, expected
    /// outcome. Network reads only; no local state is mutated.
    pub async fn current_pr_status(
        &self,
        branch: &Branch,
        mainline: &str,
    ) -> Result<Option<PullRequestStatus>> {
        let context = self.hosting.branch_context(&branch.name).await?;

        let Some(pr) = context.pr else {
            return Ok(None);
        };

        let required = required_contexts(&context.rules, mainline);
        debug!(pr_number = pr.number, required = required.len(), "reconciling PR status");

        let mut checks = Vec::new();
        let last_commit = match pr.head_commit {
            Some(head) => {
                checks = reconcile_checks(&head.checks, &required);
                let ordinal = self.vcs.commit_ordinal(&head.oid).await?;
                Some(CommitInfo {
                    oid: head.oid,
                    abbreviated_oid: head.abbreviated_oid,
                    message: head.message,
                    ordinal,
                })
            }
            None => None,
        };

        Ok(Some(PullRequestStatus {
            id: pr.id,
            number: pr.number,
            title: pr.title,
            url: pr.url,
            mergeability: Mergeability::from_raw(&pr.raw_mergeable),
            last_commit,
            checks,
        }))
    }
}

/// Union of all required check contexts that apply to the mainline branch.
///
/// Only rules that match the mainline and enforce status checks
/// contribute. An empty result means no check is required, and the
/// absence of status checks is not a blocker.
pub fn required_contexts(rules: &[BranchProtectionRule], mainline: &str) -> BTreeSet<String> {
    rules
        .iter()
        .filter(|rule| {
            rule.requires_status_checks
                && rule.matching_branch_names.iter().any(|n| n == mainline)
        })
        .flat_map(|rule| rule.required_check_contexts.iter().cloned())
        .collect()
}

/// Classify a single raw rollup entry into a check outcome.
///
/// Unrecognized conclusions and states classify as failing rather than
/// crashing: a definite verdict we cannot understand must block, not
/// pass.
pub fn classify_check(raw: &RawCheck) -> CheckOutcome {
    match raw {
        RawCheck::Run {
            name,
            status,
            conclusion,
            started_at,
            url,
            summary,
        } => {
            if status != "COMPLETED" {
                return CheckOutcome::Pending {
                    name: name.clone(),
                    started_at: *started_at,
                    url: url.clone(),
                };
            }
            match conclusion.as_deref() {
                Some("SUCCESS") => CheckOutcome::Passing { name: name.clone() },
                _ => CheckOutcome::Failing {
                    name: name.clone(),
                    url: url.clone(),
                    summary: summary.clone(),
                },
            }
        }
        RawCheck::Context {
            name,
            state,
            url,
            description,
            created_at,
        } => match state.as_str() {
            "SUCCESS" => CheckOutcome::Passing { name: name.clone() },
            "PENDING" | "EXPECTED" => CheckOutcome::Pending {
                name: name.clone(),
                started_at: *created_at,
                url: url.clone(),
            },
            _ => CheckOutcome::Failing {
                name: name.clone(),
                url: url.clone(),
                summary: description.clone(),
            },
        },
    }
}

/// Reconcile the raw rollup entries against the required contexts.
///
/// With no required contexts, nothing gates the merge and the result is
/// empty. Otherwise only required contexts are kept, and a required
/// context with no reported run at all surfaces as pending - a required
/// check that has not started is not passing.
pub fn reconcile_checks(raw: &[RawCheck], required: &BTreeSet<String>) -> Vec<CheckOutcome> {
    if required.is_empty() {
        return Vec::new();
    }

    let mut checks: Vec<CheckOutcome> = raw
        .iter()
        .filter(|entry| required.contains(entry.name()))
        .map(classify_check)
        .collect();

    for context in required {
        if !raw.iter().any(|entry| entry.name() == context) {
            checks.push(CheckOutcome::Pending {
                name: context.clone(),
                started_at: None,
                url: None,
            });
        }
    }

    checks
}
