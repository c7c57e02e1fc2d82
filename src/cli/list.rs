//! Listing commands - list-ongoing and list-closed

use crate::cli::context::CommandContext;
use crate::cli::style::Stylize;
use anstream::println;
use chrono::{DateTime, Utc};
use prflow::error::Result;
use std::path::Path;

/// Width of the title column in listing output
const TITLE_WIDTH: usize = 60;
/// Width of the author column in listing output
const AUTHOR_WIDTH: usize = 10;

/// Run the list-ongoing command: the user's open PRs
pub async fn run_list_ongoing(dir: &Path) -> Result<()> {
    let ctx = CommandContext::new(dir).await?;

    let user = ctx.hosting.authenticated_user().await?;
    let prs = ctx.hosting.list_open_prs(&user).await?;

    if prs.is_empty() {
        println!("{}", "No open PRs".muted());
        return Ok(());
    }

    for pr in prs {
        println!(
            "{} {} {} {} {}",
            format_time(pr.updated_at).muted(),
            format!("#{}", pr.number).accent(),
            column(&pr.author, AUTHOR_WIDTH),
            column(&pr.title, TITLE_WIDTH),
            pr.url.muted()
        );
    }

    Ok(())
}

/// Run the list-closed command: recently merged PRs
pub async fn run_list_closed(dir: &Path, user: Option<&str>) -> Result<()> {
    let ctx = CommandContext::new(dir).await?;

    let prs = ctx.hosting.list_merged_prs(user).await?;

    if prs.is_empty() {
        println!("{}", "No merged PRs found".muted());
        return Ok(());
    }

    for pr in prs {
        println!(
            "{} {} {} {} {}",
            format_time(Some(pr.merged_at)).muted(),
            format!("#{}", pr.number).accent(),
            column(&pr.author, AUTHOR_WIDTH),
            column(&pr.title, TITLE_WIDTH),
            pr.url.muted()
        );
    }

    Ok(())
}

/// Truncate-or-pad a string to a fixed column width
fn column(s: &str, width: usize) -> String {
    let truncated: String = s.chars().take(width).collect();
    format!("{truncated:width$}")
}

fn format_time(time: Option<DateTime<Utc>>) -> String {
    time.map_or_else(
        || " ".repeat(16),
        |t| t.format("%Y-%m-%d %H:%M").to_string(),
    )
}
