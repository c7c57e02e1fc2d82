//! Pending command - list files changed relative to the mainline

use crate::cli::style::Stylize;
use anstream::println;
use prflow::error::Result;
use prflow::git::{GitRepo, Vcs};
use std::path::Path;

/// Run the pending command
pub async fn run_pending(dir: &Path) -> Result<()> {
    let git = GitRepo::new(dir);
    let mainline = git.main_branch().await?;

    let files = git.changed_files(&format!("origin/{mainline}")).await?;
    if files.is_empty() {
        println!("{}", format!("No changes relative to origin/{mainline}").muted());
        return Ok(());
    }

    for file in files {
        println!("{file}");
    }

    Ok(())
}
