//! Submit command - merge the current PR into the mainline branch

use crate::cli::context::CommandContext;
use crate::cli::style::{Stylize, check, cross, spinner_style};
use anstream::println;
use dialoguer::Confirm;
use indicatif::ProgressBar;
use prflow::error::{Error, Result};
use prflow::submit::{SubmitAction, apply_submit_action, decide};
use prflow::types::CheckOutcome;
use std::path::Path;
use std::time::Duration;

/// Options for the submit command
#[derive(Debug, Clone, Copy, Default)]
pub struct SubmitOptions {
    /// Show the decided action without performing it
    pub dry_run: bool,
    /// Preview the decided action and prompt before performing it
    pub confirm: bool,
}

/// Run the submit command
pub async fn run_submit(dir: &Path, options: SubmitOptions) -> Result<()> {
    let ctx = CommandContext::new(dir).await?;
    submit_with_context(&ctx, options).await
}

/// Submit flow over an existing context (also used by `upload --submit`)
pub(crate) async fn submit_with_context(
    ctx: &CommandContext,
    options: SubmitOptions,
) -> Result<()> {
    // Gather: local facts + reconciled PR status
    let facts = ctx.local_facts().await?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(spinner_style());
    spinner.set_message(format!("Checking {}...", ctx.repo.to_string().emphasis()));
    spinner.enable_steady_tick(Duration::from_millis(80));

    let status = ctx.current_pr_status().await?;

    spinner.finish_and_clear();

    // Decide (pure), then report what was decided
    let action = decide(status.as_ref(), &facts);
    report_decision(&action, options.dry_run);

    if options.dry_run {
        return Ok(());
    }

    if options.confirm
        && matches!(
            action,
            SubmitAction::MergeNow | SubmitAction::RequestAutoMerge
        )
        && !Confirm::new()
            .with_prompt("Proceed?")
            .default(true)
            .interact()
            .map_err(|e| Error::Internal(format!("failed to read confirmation: {e}")))?
    {
        println!("{}", "Aborted".muted());
        return Ok(());
    }

    // Apply (effectful)
    let outcome = apply_submit_action(&action, status.as_ref(), ctx.hosting.as_ref(), &ctx.git)
        .await?;

    if outcome.merged {
        println!(
            "{} Merged - switched back to {}",
            check(),
            ctx.mainline.accent()
        );
    } else if outcome.auto_merge_requested {
        println!(
            "{} Auto-merge requested - the PR will merge once checks pass",
            check()
        );
    }

    Ok(())
}

/// Print the decided action before (or instead of) performing it
fn report_decision(action: &SubmitAction, dry_run: bool) {
    match action {
        SubmitAction::Abort(reason) => {
            println!("{}", reason.warn());
            hint_for_abort(action);
        }
        SubmitAction::BlockedByFailingChecks(failing) => {
            println!("{}", "This PR is blocked by failing checks:".warn());
            for outcome in failing {
                if let CheckOutcome::Failing { name, url, .. } = outcome {
                    match url {
                        Some(url) => println!("  {} {name}  {}", cross(), url.muted()),
                        None => println!("  {} {name}", cross()),
                    }
                }
            }
            println!(
                "{}",
                "Use \"prflow status\" to get further details.".muted()
            );
        }
        SubmitAction::MergeNow => {
            if dry_run {
                println!("{}", "Would merge the PR now".emphasis());
            }
        }
        SubmitAction::RequestAutoMerge => {
            if dry_run {
                println!("{}", "Would request auto-merge (checks still running)".emphasis());
            } else {
                println!("{}", "Checks are still running".muted());
            }
        }
    }
}

fn hint_for_abort(action: &SubmitAction) {
    use prflow::submit::AbortReason;

    if let SubmitAction::Abort(AbortReason::NoPrFound) = action {
        println!(
            "{}",
            "Use \"prflow upload --title <title>\" to create one.".muted()
        );
    }
}
