//! Mock hosting service for testing
//!
//! These are test utilities - not all may be used in current tests but
//! are available for future test development.

#![allow(dead_code)]

use async_trait::async_trait;
use prflow::error::{Error, Result};
use prflow::github::{BranchContext, HostingService};
use prflow::types::{MergedPr, PrSummary};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

/// Call record for `create_pr`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePrCall {
    pub title: String,
    pub head: String,
    pub base: String,
    pub labels: Vec<String>,
}

/// Call record for `add_pr_comment`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentCall {
    pub pr_number: u64,
    pub body: String,
}

/// Call record for `update_pr_title`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateTitleCall {
    pub pr_number: u64,
    pub title: String,
}

/// Simple mock hosting service for testing
///
/// Features:
/// - Configurable branch-context responses per branch
/// - Auto-incrementing PR numbers for created PRs
/// - Call tracking for verification
/// - Error injection for failure path testing
#[derive(Default)]
pub struct MockHostingService {
    user: Mutex<String>,
    next_pr_number: AtomicU64,
    branch_contexts: Mutex<HashMap<String, BranchContext>>,
    open_prs: Mutex<Vec<PrSummary>>,
    merged_prs: Mutex<Vec<MergedPr>>,
    // Call tracking
    branch_context_calls: Mutex<Vec<String>>,
    create_pr_calls: Mutex<Vec<CreatePrCall>>,
    update_title_calls: Mutex<Vec<UpdateTitleCall>>,
    merge_calls: Mutex<Vec<u64>>,
    comment_calls: Mutex<Vec<CommentCall>>,
    // Error injection
    error_on_branch_context: Mutex<Option<Error>>,
    error_on_merge: Mutex<Option<String>>,
}

impl MockHostingService {
    pub fn new() -> Self {
        let mock = Self::default();
        *mock.user.lock().unwrap() = "imaman".to_string();
        mock.next_pr_number.store(1, Ordering::SeqCst);
        mock
    }

    // === Response configuration ===

    pub fn set_user(&self, login: &str) {
        *self.user.lock().unwrap() = login.to_string();
    }

    /// Set the branch-context response for a specific branch
    pub fn set_branch_context(&self, branch: &str, context: BranchContext) {
        self.branch_contexts
            .lock()
            .unwrap()
            .insert(branch.to_string(), context);
    }

    pub fn set_open_prs(&self, prs: Vec<PrSummary>) {
        *self.open_prs.lock().unwrap() = prs;
    }

    pub fn set_merged_prs(&self, prs: Vec<MergedPr>) {
        *self.merged_prs.lock().unwrap() = prs;
    }

    // === Error injection ===

    /// Make `branch_context` return an error
    pub fn fail_branch_context(&self, err: Error) {
        *self.error_on_branch_context.lock().unwrap() = Some(err);
    }

    /// Make `merge_pr` return an error
    pub fn fail_merge(&self, msg: &str) {
        *self.error_on_merge.lock().unwrap() = Some(msg.to_string());
    }

    // === Call verification ===

    pub fn get_branch_context_calls(&self) -> Vec<String> {
        self.branch_context_calls.lock().unwrap().clone()
    }

    pub fn get_create_pr_calls(&self) -> Vec<CreatePrCall> {
        self.create_pr_calls.lock().unwrap().clone()
    }

    pub fn get_update_title_calls(&self) -> Vec<UpdateTitleCall> {
        self.update_title_calls.lock().unwrap().clone()
    }

    pub fn get_merge_calls(&self) -> Vec<u64> {
        self.merge_calls.lock().unwrap().clone()
    }

    pub fn get_comment_calls(&self) -> Vec<CommentCall> {
        self.comment_calls.lock().unwrap().clone()
    }

    /// Assert that `merge_pr` was called for a specific PR
    pub fn assert_merge_called(&self, pr_number: u64) {
        let calls = self.get_merge_calls();
        assert!(
            calls.contains(&pr_number),
            "Expected merge_pr({pr_number}) but got: {calls:?}"
        );
    }

    /// Assert that `merge_pr` was never called
    pub fn assert_no_merge(&self) {
        let calls = self.get_merge_calls();
        assert!(calls.is_empty(), "Expected no merges but got: {calls:?}");
    }

    /// Assert that a comment with `body` was posted on `pr_number`
    pub fn assert_comment_posted(&self, pr_number: u64, body: &str) {
        let calls = self.get_comment_calls();
        assert!(
            calls
                .iter()
                .any(|c| c.pr_number == pr_number && c.body == body),
            "Expected comment {body:?} on PR #{pr_number} but got: {calls:?}"
        );
    }

    /// Assert that no remote mutation of any kind happened
    pub fn assert_no_mutations(&self) {
        assert!(self.get_merge_calls().is_empty(), "unexpected merge");
        assert!(self.get_comment_calls().is_empty(), "unexpected comment");
        assert!(self.get_create_pr_calls().is_empty(), "unexpected PR creation");
        assert!(
            self.get_update_title_calls().is_empty(),
            "unexpected title update"
        );
    }
}

#[async_trait]
impl HostingService for MockHostingService {
    async fn authenticated_user(&self) -> Result<String> {
        Ok(self.user.lock().unwrap().clone())
    }

    async fn branch_context(&self, branch: &str) -> Result<BranchContext> {
        self.branch_context_calls
            .lock()
            .unwrap()
            .push(branch.to_string());

        if let Some(err) = self.error_on_branch_context.lock().unwrap().take() {
            return Err(err);
        }

        let contexts = self.branch_contexts.lock().unwrap();
        Ok(contexts.get(branch).cloned().unwrap_or_default())
    }

    async fn list_open_prs(&self, author: &str) -> Result<Vec<PrSummary>> {
        Ok(self
            .open_prs
            .lock()
            .unwrap()
            .iter()
            .filter(|pr| pr.author == author)
            .cloned()
            .collect())
    }

    async fn list_merged_prs(&self, author: Option<&str>) -> Result<Vec<MergedPr>> {
        Ok(self
            .merged_prs
            .lock()
            .unwrap()
            .iter()
            .filter(|pr| author.is_none_or(|a| pr.author == a))
            .cloned()
            .collect())
    }

    async fn create_pr(
        &self,
        title: &str,
        head: &str,
        base: &str,
        labels: &[String],
    ) -> Result<PrSummary> {
        self.create_pr_calls.lock().unwrap().push(CreatePrCall {
            title: title.to_string(),
            head: head.to_string(),
            base: base.to_string(),
            labels: labels.to_vec(),
        });

        let number = self.next_pr_number.fetch_add(1, Ordering::SeqCst);
        Ok(PrSummary {
            number,
            title: title.to_string(),
            url: format!("https://github.com/test/repo/pull/{number}"),
            author: self.user.lock().unwrap().clone(),
            updated_at: None,
        })
    }

    async fn update_pr_title(&self, pr_number: u64, title: &str) -> Result<()> {
        self.update_title_calls
            .lock()
            .unwrap()
            .push(UpdateTitleCall {
                pr_number,
                title: title.to_string(),
            });
        Ok(())
    }

    async fn merge_pr(&self, pr_number: u64) -> Result<()> {
        self.merge_calls.lock().unwrap().push(pr_number);

        if let Some(msg) = self.error_on_merge.lock().unwrap().as_ref() {
            return Err(Error::Api(msg.clone()));
        }
        Ok(())
    }

    async fn add_pr_comment(&self, pr_number: u64, body: &str) -> Result<()> {
        self.comment_calls.lock().unwrap().push(CommentCall {
            pr_number,
            body: body.to_string(),
        });
        Ok(())
    }
}
