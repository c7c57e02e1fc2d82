//! Local version-control facade
//!
//! Drives the user's installed `git` binary. All queries the core needs
//! from the local repository go through the [`Vcs`] trait so tests can
//! substitute a fake.

use crate::error::{Error, Result};
use crate::types::{Branch, RepoInfo};
use async_trait::async_trait;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tokio::process::Command;
use tracing::debug;

/// How far back in local history to look when locating a PR's head commit
const LOG_DEPTH: usize = 200;

/// Local version-control operations consumed by prflow commands
#[async_trait]
pub trait Vcs: Send + Sync {
    /// The currently checked-out branch
    async fn current_branch(&self) -> Result<Branch>;

    /// The hosted repository identity derived from the remote configuration.
    ///
    /// Fails with [`Error::RepoResolution`] when no remote is configured,
    /// a remote URL cannot be parsed, or the remotes disagree about which
    /// repository they point at.
    async fn repo_info(&self) -> Result<RepoInfo>;

    /// The mainline branch name (detected via the remote's symbolic HEAD)
    async fn main_branch(&self) -> Result<String>;

    /// Whether the current branch is the mainline branch
    async fn is_on_main_branch(&self) -> Result<bool>;

    /// Whether the working tree has uncommitted changes
    async fn has_uncommitted_changes(&self) -> Result<bool>;

    /// Zero-based distance of `oid` from the tip of local history
    /// (`Some(0)` = tip). `None` when the commit is not in the recent log.
    async fn commit_ordinal(&self, oid: &str) -> Result<Option<usize>>;

    /// Push the current branch to origin, setting upstream
    async fn push_current_branch(&self) -> Result<()>;

    /// Fetch a branch from a remote
    async fn fetch(&self, remote: &str, branch: &str) -> Result<()>;

    /// Merge `remote/branch` into the current branch
    async fn merge_from(&self, remote: &str, branch: &str) -> Result<()>;

    /// Check out the mainline branch
    async fn switch_to_main(&self) -> Result<()>;

    /// Names of files changed relative to `base`
    async fn changed_files(&self, base: &str) -> Result<Vec<String>>;
}

/// [`Vcs`] implementation over the `git` binary
pub struct GitRepo {
    root: PathBuf,
}

impl GitRepo {
    /// Create a facade for the repository at `root`
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }

    /// Run a git subcommand, returning trimmed stdout
    async fn run(&self, args: &[&str]) -> Result<String> {
        debug!(?args, "running git");
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.root)
            .output()
            .await
            .map_err(|e| Error::Git(format!("failed to invoke git: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Git(format!(
                "git {} failed: {}",
                args.first().unwrap_or(&""),
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Like [`run`](Self::run) but only reports success/failure
    async fn run_ok(&self, args: &[&str]) -> bool {
        (Command::new("git")
            .args(args)
            .current_dir(&self.root)
            .output()
            .await)
            .is_ok_and(|o| o.status.success())
    }
}

#[async_trait]
impl Vcs for GitRepo {
    async fn current_branch(&self) -> Result<Branch> {
        let name = self.run(&["rev-parse", "--abbrev-ref", "HEAD"]).await?;
        if name == "HEAD" {
            return Err(Error::Git("detached HEAD; check out a branch first".to_string()));
        }
        Ok(Branch { name })
    }

    async fn repo_info(&self) -> Result<RepoInfo> {
        let listing = self.run(&["remote", "-v"]).await?;
        parse_remote_listing(&listing)
    }

    async fn main_branch(&self) -> Result<String> {
        // origin/HEAD is set on clone; fall back to probing common names
        // for repositories where it was never recorded.
        if let Ok(symref) = self
            .run(&["symbolic-ref", "--short", "refs/remotes/origin/HEAD"])
            .await
            && let Some(name) = symref.strip_prefix("origin/")
        {
            return Ok(name.to_string());
        }

        for candidate in ["main", "master"] {
            let spec = format!("refs/remotes/origin/{candidate}");
            if self
                .run_ok(&["rev-parse", "--verify", "--quiet", &spec])
                .await
            {
                return Ok(candidate.to_string());
            }
        }

        Err(Error::Git(
            "cannot determine the mainline branch (origin/HEAD is unset)".to_string(),
        ))
    }

    async fn is_on_main_branch(&self) -> Result<bool> {
        let branch = self.current_branch().await?;
        let main = self.main_branch().await?;
        Ok(branch.name == main)
    }

    async fn has_uncommitted_changes(&self) -> Result<bool> {
        let status = self.run(&["status", "--porcelain"]).await?;
        Ok(!status.is_empty())
    }

    async fn commit_ordinal(&self, oid: &str) -> Result<Option<usize>> {
        let max_count = format!("--max-count={LOG_DEPTH}");
        let log = self.run(&["rev-list", &max_count, "HEAD"]).await?;

        let ordinal = log
            .lines()
            .position(|line| line == oid || line.starts_with(oid));
        debug!(oid, ?ordinal, "located commit in local history");
        Ok(ordinal)
    }

    async fn push_current_branch(&self) -> Result<()> {
        let branch = self.current_branch().await?;
        self.run(&["push", "--set-upstream", "origin", &branch.name])
            .await?;
        Ok(())
    }

    async fn fetch(&self, remote: &str, branch: &str) -> Result<()> {
        self.run(&["fetch", remote, branch]).await?;
        Ok(())
    }

    async fn merge_from(&self, remote: &str, branch: &str) -> Result<()> {
        let spec = format!("{remote}/{branch}");
        self.run(&["merge", &spec]).await?;
        Ok(())
    }

    async fn switch_to_main(&self) -> Result<()> {
        let main = self.main_branch().await?;
        self.run(&["checkout", &main]).await?;
        Ok(())
    }

    async fn changed_files(&self, base: &str) -> Result<Vec<String>> {
        let diff = self.run(&["diff", "--name-only", base]).await?;
        Ok(diff.lines().map(ToString::to_string).collect())
    }
}

/// Parse the output of `git remote -v` into a single repository identity.
///
/// Every listed remote must resolve to the same owner/name pair; anything
/// else is a fatal resolution error (there is no safe default).
pub fn parse_remote_listing(listing: &str) -> Result<RepoInfo> {
    let mut repos: Vec<RepoInfo> = Vec::new();

    for line in listing.lines().filter(|l| !l.trim().is_empty()) {
        let url = line
            .split_whitespace()
            .nth(1)
            .ok_or_else(|| Error::RepoResolution(format!("malformed remote line: {line:?}")))?;

        let repo = parse_remote_url(url)
            .ok_or_else(|| Error::RepoResolution(format!("cannot parse remote URL: {url}")))?;

        if !repos.contains(&repo) {
            repos.push(repo);
        }
    }

    match repos.as_slice() {
        [] => Err(Error::RepoResolution("no remotes configured".to_string())),
        [repo] => Ok(repo.clone()),
        many => {
            let names: Vec<String> = many.iter().map(ToString::to_string).collect();
            Err(Error::RepoResolution(format!(
                "remotes disagree about the repository: {}",
                names.join(", ")
            )))
        }
    }
}

/// Extract owner/name from an SSH or HTTPS GitHub remote URL
pub fn parse_remote_url(url: &str) -> Option<RepoInfo> {
    static RE_SSH: OnceLock<Regex> = OnceLock::new();
    static RE_HTTPS: OnceLock<Regex> = OnceLock::new();

    let re_ssh = RE_SSH
        .get_or_init(|| Regex::new(r"^git@[^:]+:([^/]+)/(.+?)(?:\.git)?/*$").unwrap());
    let re_https = RE_HTTPS
        .get_or_init(|| Regex::new(r"^https?://[^/]+/([^/]+)/(.+?)(?:\.git)?/*$").unwrap());

    let captures = re_ssh.captures(url).or_else(|| re_https.captures(url))?;

    let owner = captures.get(1)?.as_str().to_string();
    let name = captures.get(2)?.as_str().to_string();
    if owner.is_empty() || name.is_empty() {
        return None;
    }

    Some(RepoInfo { owner, name })
}
