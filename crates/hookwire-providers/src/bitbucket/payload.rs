//! Bitbucket Cloud payload schemas.

use std::collections::HashMap;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// A hyperlink.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Link {
    pub href: String,
}

/// Links attached to an entity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Links {
    #[serde(rename = "self", skip_serializing_if = "Option::is_none")]
    pub this: Option<Link>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<Link>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<Link>,
}

/// A user or team account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Account {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    pub display_name: String,
    pub uuid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    pub links: Links,
}

/// A project grouping repositories.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub uuid: String,
    pub key: String,
    pub links: Links,
}

/// A repository.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Repository {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub full_name: String,
    pub uuid: String,
    pub owner: Account,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<Project>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    pub scm: String,
    pub is_private: bool,
    pub links: Links,
}

/// Author of a commit, raw and resolved.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommitAuthor {
    pub raw: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<Account>,
}

/// A commit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Commit {
    #[serde(rename = "type")]
    pub kind: String,
    pub hash: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<CommitAuthor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<Timestamp>,
    pub links: Links,
}

/// A branch or tag and the commit it points at.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Reference {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub target: Commit,
    pub links: Links,
}

/// One reference update of a push.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Change {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new: Option<Reference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old: Option<Reference>,
    pub created: bool,
    pub forced: bool,
    pub closed: bool,
    pub truncated: bool,
    pub commits: Vec<Commit>,
    pub links: HashMap<String, Link>,
}

/// The reference updates of a push.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PushDetails {
    pub changes: Vec<Change>,
}

/// Old and new value of an updated field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldChange {
    pub old: serde_json::Value,
    pub new: serde_json::Value,
}

/// Rendered text content.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Content {
    pub raw: String,
    pub html: String,
    pub markup: String,
}

/// Location of an inline comment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Inline {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<i64>,
}

/// Reference to a parent comment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParentComment {
    pub id: i64,
    pub links: Links,
}

/// A comment on a commit, issue or pull request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Comment {
    pub id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<ParentComment>,
    pub content: Content,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inline: Option<Inline>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<Account>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_on: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_on: Option<Timestamp>,
    pub links: Links,
}

/// A build or deployment status on a commit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommitStatus {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub description: String,
    pub state: String,
    pub key: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_on: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_on: Option<Timestamp>,
    pub links: Links,
}

/// A named issue attribute such as a milestone or version.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Named {
    pub name: String,
}

/// An issue.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Issue {
    pub id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component: Option<Named>,
    pub title: String,
    pub content: Content,
    pub priority: String,
    pub state: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub milestone: Option<Named>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<Named>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reporter: Option<Account>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<Account>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_on: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_on: Option<Timestamp>,
    pub links: Links,
}

/// Branch name of a pull request endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BranchName {
    pub name: String,
}

/// Source or destination of a pull request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoint {
    pub branch: BranchName,
    pub commit: Commit,
    pub repository: Repository,
}

/// A pull request participant and their review state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Participant {
    pub user: Account,
    pub role: String,
    pub approved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub participated_on: Option<Timestamp>,
}

/// A pull request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PullRequest {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub state: String,
    pub author: Account,
    pub source: Endpoint,
    pub destination: Endpoint,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merge_commit: Option<Commit>,
    pub participants: Vec<Participant>,
    pub reviewers: Vec<Account>,
    pub close_source_branch: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closed_by: Option<Account>,
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_on: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_on: Option<Timestamp>,
    pub links: Links,
}

/// An approval of a pull request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Approval {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<Timestamp>,
    pub user: Account,
}

/// Payload of the `repo:push` event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepoPush {
    pub actor: Account,
    pub repository: Repository,
    pub push: PushDetails,
}

/// Payload of the `repo:fork` event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepoFork {
    pub actor: Account,
    pub repository: Repository,
    pub fork: Repository,
}

/// Payload of the `repo:updated` event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepoUpdated {
    pub actor: Account,
    pub repository: Repository,
    pub changes: HashMap<String, FieldChange>,
}

/// Payload of the `repo:commit_comment_created` event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepoCommitComment {
    pub actor: Account,
    pub repository: Repository,
    pub comment: Comment,
    pub commit: Commit,
}

/// Payload of the `repo:commit_status_*` events.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepoCommitStatus {
    pub actor: Account,
    pub repository: Repository,
    pub commit_status: CommitStatus,
}

/// Payload of the `issue:created` event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IssueCreated {
    pub actor: Account,
    pub issue: Issue,
    pub repository: Repository,
}

/// Payload of the `issue:updated` event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IssueUpdated {
    pub actor: Account,
    pub issue: Issue,
    pub repository: Repository,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<Comment>,
    pub changes: HashMap<String, FieldChange>,
}

/// Payload of the `issue:comment_created` event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IssueCommentCreated {
    pub actor: Account,
    pub repository: Repository,
    pub issue: Issue,
    pub comment: Comment,
}

/// Payload of the pull request lifecycle events.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PullRequestEvent {
    pub actor: Account,
    #[serde(rename = "pullrequest")]
    pub pull_request: PullRequest,
    pub repository: Repository,
}

/// Payload of the `pullrequest:approved` and `pullrequest:unapproved` events.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PullRequestApproval {
    pub actor: Account,
    #[serde(rename = "pullrequest")]
    pub pull_request: PullRequest,
    pub repository: Repository,
    pub approval: Approval,
}

/// Payload of the `pullrequest:comment_*` events.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PullRequestComment {
    pub actor: Account,
    #[serde(rename = "pullrequest")]
    pub pull_request: PullRequest,
    pub repository: Repository,
    pub comment: Comment,
}
