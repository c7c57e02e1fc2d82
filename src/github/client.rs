//! GitHub client implementation

use crate::error::{Error, Result};
use crate::github::{BranchContext, HeadCommit, HostingService, PrSnapshot, RawCheck};
use crate::types::{BranchProtectionRule, MergedPr, PrSummary, RepoInfo};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use octocrab::Octocrab;
use serde::Deserialize;
use tracing::debug;

/// Page size for PR listings
const LIST_PAGE_SIZE: u8 = 50;

// GraphQL response types for the combined branch-context query

#[derive(Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Deserialize)]
struct BranchContextData {
    repository: Option<RepositoryNode>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RepositoryNode {
    branch_protection_rules: Connection<RuleNode>,
    #[serde(rename = "ref")]
    branch_ref: Option<RefNode>,
}

#[derive(Deserialize)]
struct Connection<T> {
    nodes: Vec<T>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RuleNode {
    requires_status_checks: bool,
    required_status_check_contexts: Option<Vec<Option<String>>>,
    matching_refs: Connection<RefName>,
}

#[derive(Deserialize)]
struct RefName {
    name: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RefNode {
    associated_pull_requests: Connection<PrNode>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PrNode {
    id: String,
    number: u64,
    title: String,
    url: String,
    head_ref_name: String,
    mergeable: Option<String>,
    commits: Connection<CommitEdge>,
}

#[derive(Deserialize)]
struct CommitEdge {
    commit: CommitNode,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommitNode {
    oid: String,
    abbreviated_oid: String,
    message: String,
    status_check_rollup: Option<RollupNode>,
}

#[derive(Deserialize)]
struct RollupNode {
    contexts: Connection<RollupEntry>,
}

#[derive(Deserialize)]
#[serde(tag = "__typename")]
enum RollupEntry {
    #[serde(rename_all = "camelCase")]
    CheckRun {
        name: String,
        status: String,
        conclusion: Option<String>,
        started_at: Option<DateTime<Utc>>,
        details_url: Option<String>,
        summary: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    StatusContext {
        context: String,
        state: String,
        target_url: Option<String>,
        description: Option<String>,
        created_at: Option<DateTime<Utc>>,
    },
}

impl From<RollupEntry> for RawCheck {
    fn from(entry: RollupEntry) -> Self {
        match entry {
            RollupEntry::CheckRun {
                name,
                status,
                conclusion,
                started_at,
                details_url,
                summary,
            } => Self::Run {
                name,
                status,
                conclusion,
                started_at,
                url: details_url,
                summary,
            },
            RollupEntry::StatusContext {
                context,
                state,
                target_url,
                description,
                created_at,
            } => Self::Context {
                name: context,
                state,
                url: target_url,
                description,
                created_at,
            },
        }
    }
}

/// Combined query: protection rules + associated open PR + head commit +
/// status-check rollup, in one round trip.
const BRANCH_CONTEXT_QUERY: &str = r"
    query BranchContext($owner: String!, $name: String!, $qualifiedRef: String!) {
        repository(owner: $owner, name: $name) {
            branchProtectionRules(first: 100) {
                nodes {
                    requiresStatusChecks
                    requiredStatusCheckContexts
                    matchingRefs(first: 100) {
                        nodes { name }
                    }
                }
            }
            ref(qualifiedName: $qualifiedRef) {
                associatedPullRequests(last: 10, states: OPEN) {
                    nodes {
                        id
                        number
                        title
                        url
                        headRefName
                        mergeable
                        commits(last: 1) {
                            nodes {
                                commit {
                                    oid
                                    abbreviatedOid
                                    message
                                    statusCheckRollup {
                                        contexts(first: 100) {
                                            nodes {
                                                __typename
                                                ... on CheckRun {
                                                    name
                                                    status
                                                    conclusion
                                                    startedAt
                                                    detailsUrl
                                                    summary
                                                }
                                                ... on StatusContext {
                                                    context
                                                    state
                                                    targetUrl
                                                    description
                                                    createdAt
                                                }
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
";

/// GitHub service using octocrab for both REST and GraphQL
pub struct GitHubClient {
    client: Octocrab,
    repo: RepoInfo,
}

impl GitHubClient {
    /// Create a new client authenticated with `token` against `repo`
    pub fn new(token: &str, repo: RepoInfo) -> Result<Self> {
        let client = Octocrab::builder()
            .personal_token(token.to_string())
            .build()
            .map_err(|e| Error::Api(e.to_string()))?;

        Ok(Self { client, repo })
    }

    /// The repository this client operates on
    pub const fn repo(&self) -> &RepoInfo {
        &self.repo
    }

    fn pr_url(&self, number: u64) -> String {
        format!("https://github.com/{}/pull/{number}", self.repo)
    }

    fn summary_from_rest(&self, pr: &octocrab::models::pulls::PullRequest) -> PrSummary {
        PrSummary {
            number: pr.number,
            title: pr.title.clone().unwrap_or_default(),
            url: pr
                .html_url
                .as_ref()
                .map_or_else(|| self.pr_url(pr.number), ToString::to_string),
            author: pr
                .user
                .as_ref()
                .map(|u| u.login.clone())
                .unwrap_or_default(),
            updated_at: pr.updated_at,
        }
    }
}

fn rule_from_node(node: RuleNode) -> BranchProtectionRule {
    BranchProtectionRule {
        matching_branch_names: node.matching_refs.nodes.into_iter().map(|r| r.name).collect(),
        required_check_contexts: node
            .required_status_check_contexts
            .unwrap_or_default()
            .into_iter()
            .flatten()
            .collect(),
        requires_status_checks: node.requires_status_checks,
    }
}

fn snapshot_from_node(node: PrNode) -> PrSnapshot {
    let head_commit = node.commits.nodes.into_iter().next().map(|edge| {
        let commit = edge.commit;
        HeadCommit {
            oid: commit.oid,
            abbreviated_oid: commit.abbreviated_oid,
            message: commit.message,
            checks: commit
                .status_check_rollup
                .map(|rollup| rollup.contexts.nodes.into_iter().map(Into::into).collect())
                .unwrap_or_default(),
        }
    });

    PrSnapshot {
        id: node.id,
        number: node.number,
        title: node.title,
        url: node.url,
        raw_mergeable: node.mergeable.unwrap_or_default(),
        head_commit,
    }
}

#[async_trait]
impl HostingService for GitHubClient {
    async fn authenticated_user(&self) -> Result<String> {
        let user = self
            .client
            .current()
            .user()
            .await
            .map_err(|e| Error::Auth(format!("token rejected: {e}")))?;
        Ok(user.login)
    }

    async fn branch_context(&self, branch: &str) -> Result<BranchContext> {
        debug!(branch, repo = %self.repo, "querying branch context");

        let response: GraphQlResponse<BranchContextData> = self
            .client
            .graphql(&serde_json::json!({
                "query": BRANCH_CONTEXT_QUERY,
                "variables": {
                    "owner": self.repo.owner,
                    "name": self.repo.name,
                    "qualifiedRef": format!("refs/heads/{branch}"),
                }
            }))
            .await?;

        if let Some(errors) = response.errors
            && !errors.is_empty()
        {
            let messages: Vec<_> = errors.into_iter().map(|e| e.message).collect();
            return Err(Error::Api(format!(
                "GraphQL error: {}",
                messages.join(", ")
            )));
        }

        let repository = response
            .data
            .and_then(|d| d.repository)
            .ok_or_else(|| Error::Api(format!("repository {} not found", self.repo)))?;

        let rules = repository
            .branch_protection_rules
            .nodes
            .into_iter()
            .map(rule_from_node)
            .collect();

        // The ref itself may not exist upstream yet (branch never pushed)
        let pr = repository.branch_ref.and_then(|r| {
            let mut nodes = r.associated_pull_requests.nodes;
            let index = nodes.iter().position(|pr| pr.head_ref_name == branch)?;
            Some(snapshot_from_node(nodes.swap_remove(index)))
        });

        if let Some(ref pr) = pr {
            debug!(pr_number = pr.number, "found open PR for branch");
        } else {
            debug!("no open PR for branch");
        }

        Ok(BranchContext { rules, pr })
    }

    async fn list_open_prs(&self, author: &str) -> Result<Vec<PrSummary>> {
        debug!(author, "listing open PRs");
        let page = self
            .client
            .pulls(&self.repo.owner, &self.repo.name)
            .list()
            .state(octocrab::params::State::Open)
            .sort(octocrab::params::pulls::Sort::Updated)
            .direction(octocrab::params::Direction::Descending)
            .per_page(LIST_PAGE_SIZE)
            .send()
            .await?;

        Ok(page
            .items
            .iter()
            .filter(|pr| {
                pr.user
                    .as_ref()
                    .is_some_and(|u| u.login == author)
            })
            .map(|pr| self.summary_from_rest(pr))
            .collect())
    }

    async fn list_merged_prs(&self, author: Option<&str>) -> Result<Vec<MergedPr>> {
        debug!(?author, "listing merged PRs");
        let page = self
            .client
            .pulls(&self.repo.owner, &self.repo.name)
            .list()
            .state(octocrab::params::State::Closed)
            .sort(octocrab::params::pulls::Sort::Updated)
            .direction(octocrab::params::Direction::Descending)
            .per_page(if author.is_some() { 100 } else { LIST_PAGE_SIZE })
            .send()
            .await?;

        Ok(page
            .items
            .into_iter()
            .filter_map(|pr| {
                let merged_at = pr.merged_at?;
                let login = pr
                    .user
                    .as_ref()
                    .map(|u| u.login.clone())
                    .unwrap_or_default();
                if author.is_some_and(|a| a != login) {
                    return None;
                }
                Some(MergedPr {
                    number: pr.number,
                    title: pr.title.clone().unwrap_or_default(),
                    url: pr
                        .html_url
                        .as_ref()
                        .map_or_else(|| self.pr_url(pr.number), ToString::to_string),
                    author: login,
                    merged_at,
                })
            })
            .collect())
    }

    async fn create_pr(
        &self,
        title: &str,
        head: &str,
        base: &str,
        labels: &[String],
    ) -> Result<PrSummary> {
        debug!(head, base, "creating PR");
        let pr = self
            .client
            .pulls(&self.repo.owner, &self.repo.name)
            .create(title, head, base)
            .send()
            .await?;

        if !labels.is_empty() {
            self.client
                .issues(&self.repo.owner, &self.repo.name)
                .add_labels(pr.number, labels)
                .await?;
        }

        let summary = self.summary_from_rest(&pr);
        debug!(pr_number = summary.number, "created PR");
        Ok(summary)
    }

    async fn update_pr_title(&self, pr_number: u64, title: &str) -> Result<()> {
        debug!(pr_number, "updating PR title");
        self.client
            .pulls(&self.repo.owner, &self.repo.name)
            .update(pr_number)
            .title(title)
            .send()
            .await?;
        Ok(())
    }

    async fn merge_pr(&self, pr_number: u64) -> Result<()> {
        debug!(pr_number, "merging PR");
        let result = self
            .client
            .pulls(&self.repo.owner, &self.repo.name)
            .merge(pr_number)
            .method(octocrab::params::pulls::MergeMethod::Squash)
            .send()
            .await?;

        if !result.merged {
            return Err(Error::Api(format!(
                "merge of PR #{pr_number} was rejected: {}",
                result.message.unwrap_or_else(|| "no reason given".to_string())
            )));
        }

        debug!(pr_number, sha = ?result.sha, "merged PR");
        Ok(())
    }

    async fn add_pr_comment(&self, pr_number: u64, body: &str) -> Result<()> {
        debug!(pr_number, "adding PR comment");
        self.client
            .issues(&self.repo.owner, &self.repo.name)
            .create_comment(pr_number, body)
            .await?;
        Ok(())
    }
}
