//! Status command - show the current PR's reconciled status

use crate::cli::context::CommandContext;
use crate::cli::style::{Stylize, check, cross, dot, hyperlink_url, spinner_style};
use anstream::println;
use indicatif::ProgressBar;
use prflow::error::Result;
use prflow::types::{CheckOutcome, CommitInfo};
use std::path::Path;
use std::time::Duration;

/// Run the status command
pub async fn run_status(dir: &Path) -> Result<()> {
    let ctx = CommandContext::new(dir).await?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(spinner_style());
    spinner.set_message(format!("Checking {}...", ctx.repo.to_string().emphasis()));
    spinner.enable_steady_tick(Duration::from_millis(80));

    let status = ctx.current_pr_status().await?;

    spinner.finish_and_clear();

    let Some(status) = status else {
        println!("{}", "No PR was created for this branch".muted());
        println!(
            "{}",
            "Use \"prflow upload --title <title>\" to create one.".muted()
        );
        return Ok(());
    };

    println!(
        "{} {}",
        format!("PR #{}:", status.number).emphasis(),
        status.title
    );
    println!("{}", hyperlink_url(&status.url).accent());

    if let Some(ref commit) = status.last_commit {
        println!(
            "Currently at {}{} {}",
            head_indication(commit),
            commit.abbreviated_oid.accent(),
            format!("\"{}\"", first_line(&commit.message)).muted()
        );
    }

    println!();
    println!("Mergeability: {}", status.mergeability.emphasis());

    println!("Checks:");
    if status.checks.is_empty() {
        println!("  {}", "none required".muted());
    }
    for outcome in &status.checks {
        print_check(outcome);
    }

    Ok(())
}

/// `HEAD~n` indication derived from the commit's local ordinal
fn head_indication(commit: &CommitInfo) -> String {
    match commit.ordinal {
        Some(0) => "HEAD: ".to_string(),
        Some(n) => format!("HEAD~{n}: "),
        None => String::new(),
    }
}

fn first_line(message: &str) -> &str {
    message.lines().next().unwrap_or_default()
}

fn print_check(outcome: &CheckOutcome) {
    match outcome {
        CheckOutcome::Passing { name } => {
            println!("  {} {name}", check());
        }
        CheckOutcome::Pending {
            name,
            started_at,
            url,
        } => {
            let since = started_at
                .map(|t| format!(" (running since {})", t.format("%H:%M:%S")))
                .unwrap_or_default();
            println!("  {} {name}{}", dot(), since.muted());
            if let Some(url) = url {
                println!("    {}", hyperlink_url(url).muted());
            }
        }
        CheckOutcome::Failing { name, url, summary } => {
            println!("  {} {name}", cross());
            if let Some(summary) = summary {
                println!("    {}", first_line(summary).muted());
            }
            if let Some(url) = url {
                println!("    {}", hyperlink_url(url).muted());
            }
        }
    }
}
