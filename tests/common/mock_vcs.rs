//! Mock VCS facade for testing

#![allow(dead_code)]

use async_trait::async_trait;
use prflow::error::{Error, Result};
use prflow::git::Vcs;
use prflow::types::{Branch, RepoInfo};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

/// In-memory stand-in for a local git repository
pub struct MockVcs {
    branch: Mutex<String>,
    mainline: String,
    repo: RepoInfo,
    uncommitted: AtomicBool,
    /// oid -> distance from the local tip
    ordinals: Mutex<HashMap<String, usize>>,
    // Call tracking
    pushes: Mutex<u32>,
    switched_to_main: AtomicBool,
    ordinal_calls: Mutex<Vec<String>>,
}

impl MockVcs {
    pub fn new(branch: &str) -> Self {
        Self {
            branch: Mutex::new(branch.to_string()),
            mainline: "main".to_string(),
            repo: RepoInfo {
                owner: "imaman".to_string(),
                name: "prflow".to_string(),
            },
            uncommitted: AtomicBool::new(false),
            ordinals: Mutex::new(HashMap::new()),
            pushes: Mutex::new(0),
            switched_to_main: AtomicBool::new(false),
            ordinal_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn set_uncommitted_changes(&self, value: bool) {
        self.uncommitted.store(value, Ordering::SeqCst);
    }

    /// Record a commit's distance from the local tip
    pub fn set_ordinal(&self, oid: &str, ordinal: usize) {
        self.ordinals
            .lock()
            .unwrap()
            .insert(oid.to_string(), ordinal);
    }

    pub fn push_count(&self) -> u32 {
        *self.pushes.lock().unwrap()
    }

    pub fn was_switched_to_main(&self) -> bool {
        self.switched_to_main.load(Ordering::SeqCst)
    }

    pub fn get_ordinal_calls(&self) -> Vec<String> {
        self.ordinal_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Vcs for MockVcs {
    async fn current_branch(&self) -> Result<Branch> {
        Ok(Branch {
            name: self.branch.lock().unwrap().clone(),
        })
    }

    async fn repo_info(&self) -> Result<RepoInfo> {
        Ok(self.repo.clone())
    }

    async fn main_branch(&self) -> Result<String> {
        Ok(self.mainline.clone())
    }

    async fn is_on_main_branch(&self) -> Result<bool> {
        Ok(*self.branch.lock().unwrap() == self.mainline)
    }

    async fn has_uncommitted_changes(&self) -> Result<bool> {
        Ok(self.uncommitted.load(Ordering::SeqCst))
    }

    async fn commit_ordinal(&self, oid: &str) -> Result<Option<usize>> {
        self.ordinal_calls.lock().unwrap().push(oid.to_string());
        Ok(self.ordinals.lock().unwrap().get(oid).copied())
    }

    async fn push_current_branch(&self) -> Result<()> {
        *self.pushes.lock().unwrap() += 1;
        Ok(())
    }

    async fn fetch(&self, _remote: &str, _branch: &str) -> Result<()> {
        Ok(())
    }

    async fn merge_from(&self, _remote: &str, _branch: &str) -> Result<()> {
        Ok(())
    }

    async fn switch_to_main(&self) -> Result<()> {
        self.switched_to_main.store(true, Ordering::SeqCst);
        *self.branch.lock().unwrap() = self.mainline.clone();
        Ok(())
    }

    async fn changed_files(&self, _base: &str) -> Result<Vec<String>> {
        Err(Error::Internal("changed_files not mocked".to_string()))
    }
}
