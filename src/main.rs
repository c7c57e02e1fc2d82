//! prflow - personal pull-request workflow assistant
//!
//! CLI binary for automating the day-to-day GitHub PR loop.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cli;

#[derive(Parser)]
#[command(name = "prflow")]
#[command(about = "Personal pull-request workflow assistant for GitHub")]
#[command(version)]
struct Cli {
    /// Directory to run at (defaults to the current directory)
    #[arg(short, long, global = true)]
    dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the status of the current PR (default command)
    Status,

    /// Push your changes to GitHub (creates a PR, if a title is specified)
    Upload {
        /// A one line summary of this PR
        #[arg(short, long)]
        title: Option<String>,

        /// Whether to also submit immediately after the upload
        #[arg(short, long)]
        submit: bool,
    },

    /// Merge the current PR into the main branch
    Submit {
        /// Show the decided action without performing it
        #[arg(long)]
        dry_run: bool,

        /// Preview the decided action and prompt before performing it
        #[arg(long)]
        confirm: bool,
    },

    /// Pull the most recent mainline changes into the current branch
    CatchUp,

    /// List currently open PRs
    ListOngoing,

    /// List recently merged PRs
    ListClosed {
        /// Show only PRs from this GitHub user. If omitted, shows all users.
        #[arg(short, long)]
        user: Option<String>,
    },

    /// List names of changed files (compared to the mainline)
    Pending,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    let dir = args.dir.unwrap_or_else(|| PathBuf::from("."));

    match args.command {
        None | Some(Commands::Status) => {
            cli::run_status(&dir).await?;
        }
        Some(Commands::Upload { title, submit }) => {
            cli::run_upload(&dir, cli::UploadOptions { title, submit }).await?;
        }
        Some(Commands::Submit { dry_run, confirm }) => {
            cli::run_submit(&dir, cli::SubmitOptions { dry_run, confirm }).await?;
        }
        Some(Commands::CatchUp) => {
            cli::run_catch_up(&dir).await?;
        }
        Some(Commands::ListOngoing) => {
            cli::run_list_ongoing(&dir).await?;
        }
        Some(Commands::ListClosed { user }) => {
            cli::run_list_closed(&dir, user.as_deref()).await?;
        }
        Some(Commands::Pending) => {
            cli::run_pending(&dir).await?;
        }
    }

    Ok(())
}
