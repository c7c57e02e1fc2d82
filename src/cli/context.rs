//! Shared command context for CLI commands
//!
//! Extracts the common setup shared by the commands that talk to GitHub:
//! loading configuration, resolving the repository identity from the
//! local remotes, and constructing the authenticated client.

use prflow::config::Config;
use prflow::error::Result;
use prflow::git::{GitRepo, Vcs};
use prflow::github::{GitHubClient, HostingService};
use prflow::status::StatusReconciler;
use prflow::types::{Branch, LocalFacts, PullRequestStatus, RepoInfo};
use std::path::Path;

/// Shared context for commands that interact with GitHub
pub struct CommandContext {
    /// User configuration
    pub config: Config,
    /// Local repository facade
    pub git: GitRepo,
    /// Resolved repository identity
    pub repo: RepoInfo,
    /// Authenticated hosting client
    pub hosting: Box<dyn HostingService>,
    /// Mainline branch name (e.g. "main")
    pub mainline: String,
}

impl CommandContext {
    /// Create a new command context for the repository at `dir`.
    ///
    /// Repository identity and mainline detection both go through git,
    /// so a missing or ambiguous remote fails here, before any network
    /// call is made.
    pub async fn new(dir: &Path) -> Result<Self> {
        let config = Config::load()?;
        let git = GitRepo::new(dir);

        let repo = git.repo_info().await?;
        let mainline = git.main_branch().await?;

        let token = config.resolve_token()?;
        let hosting: Box<dyn HostingService> = Box::new(GitHubClient::new(&token, repo.clone())?);

        Ok(Self {
            config,
            git,
            repo,
            hosting,
            mainline,
        })
    }

    /// The currently checked-out branch
    pub async fn current_branch(&self) -> Result<Branch> {
        self.git.current_branch().await
    }

    /// Gather the local facts the submit decision consumes
    pub async fn local_facts(&self) -> Result<LocalFacts> {
        let branch = self.git.current_branch().await?;
        Ok(LocalFacts {
            on_main_branch: branch.name == self.mainline,
            has_uncommitted_changes: self.git.has_uncommitted_changes().await?,
        })
    }

    /// Reconcile the status of the current branch's PR
    pub async fn current_pr_status(&self) -> Result<Option<PullRequestStatus>> {
        let branch = self.current_branch().await?;
        StatusReconciler::new(self.hosting.as_ref(), &self.git)
            .current_pr_status(&branch, &self.mainline)
            .await
    }
}
