//! Upload command - push local work and create/update the PR

use crate::cli::context::CommandContext;
use crate::cli::style::{Stylize, check, hyperlink_url, spinner_style};
use crate::cli::submit::{SubmitOptions, submit_with_context};
use anstream::println;
use indicatif::ProgressBar;
use prflow::error::{Error, Result};
use prflow::git::Vcs;
use prflow::types::{CommitInfo, PullRequestStatus};
use std::path::Path;
use std::time::Duration;

/// How many times to poll for the pushed commit before giving up
const REFLECTION_ATTEMPTS: u32 = 5;

/// Options for the upload command
#[derive(Debug, Clone, Default)]
pub struct UploadOptions {
    /// A one line summary of the PR; creates the PR (or retitles the
    /// existing one) when present
    pub title: Option<String>,
    /// Also submit immediately after the upload
    pub submit: bool,
}

/// Run the upload command
pub async fn run_upload(dir: &Path, options: UploadOptions) -> Result<()> {
    let ctx = CommandContext::new(dir).await?;

    let facts = ctx.local_facts().await?;
    if facts.on_main_branch {
        return Err(Error::Precondition(
            "refusing to upload from the main branch".to_string(),
        ));
    }
    if facts.has_uncommitted_changes {
        return Err(Error::Precondition(
            "you have uncommitted changes; commit them before uploading".to_string(),
        ));
    }

    // Push when there is no PR yet, or the PR head lags local history
    let status = ctx.current_pr_status().await?;
    if !pr_reflects_local_tip(status.as_ref()) {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(spinner_style());
        spinner.set_message("Pushing changes...");
        spinner.enable_steady_tick(Duration::from_millis(80));

        ctx.git.push_current_branch().await?;

        spinner.finish_with_message(format!("{} Pushed", check()));
    }

    let Some(title) = options.title.as_deref() else {
        return Ok(());
    };

    // Re-query: the push may have just opened the window for a PR update
    match ctx.current_pr_status().await? {
        Some(existing) => {
            ctx.hosting.update_pr_title(existing.number, title).await?;
            println!(
                "{} Updated title of PR {}",
                check(),
                format!("#{}", existing.number).accent()
            );
        }
        None => {
            let branch = ctx.current_branch().await?;
            let pr = ctx
                .hosting
                .create_pr(title, &branch.name, &ctx.mainline, &ctx.config.pr_labels)
                .await?;
            println!("{} Created PR {}", check(), format!("#{}", pr.number).accent());
            println!("  {}", hyperlink_url(&pr.url).accent());
        }
    }

    if !options.submit {
        return Ok(());
    }

    wait_for_reflection(&ctx).await?;
    submit_with_context(&ctx, SubmitOptions::default()).await
}

/// Wait (bounded) until the pushed commit shows up as the PR's head.
///
/// The hosting service reflects a push asynchronously; submitting before
/// it does would abort with a stale-commit verdict.
async fn wait_for_reflection(ctx: &CommandContext) -> Result<()> {
    for attempt in 0..REFLECTION_ATTEMPTS {
        let status = ctx.current_pr_status().await?;
        if pr_reflects_local_tip(status.as_ref()) {
            return Ok(());
        }

        tokio::time::sleep(Duration::from_millis(500 * u64::from(attempt))).await;
    }

    Err(Error::Api(
        "the uploaded commit was not reflected on the PR, so the PR was not submitted".to_string(),
    ))
}

fn pr_reflects_local_tip(status: Option<&PullRequestStatus>) -> bool {
    status.is_some_and(|s| {
        s.last_commit
            .as_ref()
            .is_some_and(CommitInfo::is_local_tip)
    })
}
