//! Catch-up command - pull the latest mainline into the current branch

use crate::cli::style::{Stylize, check, spinner_style};
use anstream::println;
use indicatif::ProgressBar;
use prflow::error::{Error, Result};
use prflow::git::{GitRepo, Vcs};
use std::path::Path;
use std::time::Duration;

/// Run the catch-up command.
///
/// Local-only command: fetches the mainline from origin and merges it
/// into the current branch. Never talks to the hosting API, so it works
/// without a token.
pub async fn run_catch_up(dir: &Path) -> Result<()> {
    let git = GitRepo::new(dir);

    if git.is_on_main_branch().await? {
        return Err(Error::Precondition(
            "already on the main branch; catch-up is for feature branches".to_string(),
        ));
    }
    if git.has_uncommitted_changes().await? {
        return Err(Error::Precondition(
            "you have uncommitted changes; commit or stash them first".to_string(),
        ));
    }

    let mainline = git.main_branch().await?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(spinner_style());
    spinner.set_message(format!("Fetching origin/{}...", mainline.accent()));
    spinner.enable_steady_tick(Duration::from_millis(80));

    git.fetch("origin", &mainline).await?;
    git.merge_from("origin", &mainline).await?;

    spinner.finish_and_clear();
    println!(
        "{} Caught up with {}",
        check(),
        format!("origin/{mainline}").accent()
    );

    Ok(())
}
