//! GitLab payload schemas.
//!
//! Timestamps are kept as received: GitLab mixes RFC 3339 with
//! `2016-08-12 15:23:28 UTC` style values depending on the hook.

use serde::{Deserialize, Serialize};

/// A GitLab user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub username: String,
    pub avatar_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// A project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    pub id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub web_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    pub git_ssh_url: String,
    pub git_http_url: String,
    pub namespace: String,
    pub visibility_level: i64,
    pub path_with_namespace: String,
    pub default_branch: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Legacy repository section sent next to the project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Repository {
    pub name: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub homepage: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_http_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_ssh_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility_level: Option<i64>,
}

/// Author of a commit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Author {
    pub name: String,
    pub email: String,
}

/// A commit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Commit {
    pub id: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub timestamp: String,
    pub url: String,
    pub author: Author,
    pub added: Vec<String>,
    pub modified: Vec<String>,
    pub removed: Vec<String>,
}

/// A project label.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Label {
    pub id: i64,
    pub title: String,
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Attributes of an issue.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IssueAttributes {
    pub id: i64,
    pub iid: i64,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub state: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    pub author_id: i64,
    pub assignee_ids: Vec<i64>,
    pub project_id: i64,
    pub confidential: bool,
    pub created_at: String,
    pub updated_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<String>,
    pub url: String,
}

/// Attributes of a merge request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeRequestAttributes {
    pub id: i64,
    pub iid: i64,
    pub target_branch: String,
    pub source_branch: String,
    pub source_project_id: i64,
    pub target_project_id: i64,
    pub author_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<i64>,
    pub title: String,
    pub created_at: String,
    pub updated_at: String,
    pub state: String,
    pub merge_status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<Project>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<Project>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_commit: Option<Commit>,
    pub work_in_progress: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
}

/// Attributes of a note.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoteAttributes {
    pub id: i64,
    pub note: String,
    pub noteable_type: String,
    pub author_id: i64,
    pub created_at: String,
    pub updated_at: String,
    pub project_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub noteable_id: Option<i64>,
    pub system: bool,
    pub url: String,
}

/// A snippet commented on by a note.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Snippet {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub author_id: i64,
    pub project_id: i64,
    pub created_at: String,
    pub updated_at: String,
    pub file_name: String,
}

/// Payload of the `Push Hook` and `Tag Push Hook` events.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Push {
    pub object_kind: String,
    pub event_name: String,
    pub before: String,
    pub after: String,
    #[serde(rename = "ref")]
    pub git_ref: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checkout_sha: Option<String>,
    pub user_id: i64,
    pub user_name: String,
    pub user_username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,
    pub user_avatar: String,
    pub project_id: i64,
    pub project: Project,
    pub repository: Repository,
    pub commits: Vec<Commit>,
    pub total_commits_count: i64,
}

/// Payload of the `Issue Hook` and `Confidential Issue Hook` events.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Issue {
    pub object_kind: String,
    pub event_type: String,
    pub user: User,
    pub project: Project,
    pub object_attributes: IssueAttributes,
    pub labels: Vec<Label>,
    pub assignees: Vec<User>,
    pub repository: Repository,
}

/// Payload of the `Note Hook` and `Confidential Note Hook` events.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Note {
    pub object_kind: String,
    pub event_type: String,
    pub user: User,
    pub project_id: i64,
    pub project: Project,
    pub repository: Repository,
    pub object_attributes: NoteAttributes,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit: Option<Commit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merge_request: Option<MergeRequestAttributes>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue: Option<IssueAttributes>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet: Option<Snippet>,
}

/// Payload of the `Merge Request Hook` event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeRequest {
    pub object_kind: String,
    pub event_type: String,
    pub user: User,
    pub project: Project,
    pub repository: Repository,
    pub object_attributes: MergeRequestAttributes,
    pub labels: Vec<Label>,
    pub assignees: Vec<User>,
}

/// Wiki of a project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Wiki {
    pub web_url: String,
    pub git_ssh_url: String,
    pub git_http_url: String,
    pub path_with_namespace: String,
    pub default_branch: String,
}

/// Attributes of a wiki page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WikiPageAttributes {
    pub title: String,
    pub content: String,
    pub format: String,
    pub message: String,
    pub slug: String,
    pub url: String,
    pub action: String,
}

/// Payload of the `Wiki Page Hook` event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WikiPage {
    pub object_kind: String,
    pub user: User,
    pub project: Project,
    pub wiki: Wiki,
    pub object_attributes: WikiPageAttributes,
}

/// Attributes of a pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineAttributes {
    pub id: i64,
    #[serde(rename = "ref")]
    pub git_ref: String,
    pub tag: bool,
    pub sha: String,
    pub before_sha: String,
    pub source: String,
    pub status: String,
    pub stages: Vec<String>,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<i64>,
}

/// Runner that executed a build.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Runner {
    pub id: i64,
    pub description: String,
    pub active: bool,
    pub is_shared: bool,
}

/// A build of a pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineBuild {
    pub id: i64,
    pub stage: String,
    pub name: String,
    pub status: String,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<String>,
    pub when: String,
    pub manual: bool,
    pub user: User,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runner: Option<Runner>,
}

/// Payload of the `Pipeline Hook` event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pipeline {
    pub object_kind: String,
    pub object_attributes: PipelineAttributes,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merge_request: Option<MergeRequestAttributes>,
    pub user: User,
    pub project: Project,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit: Option<Commit>,
    pub builds: Vec<PipelineBuild>,
}

/// Commit section of a job delivery.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobCommit {
    pub id: i64,
    pub sha: String,
    pub message: String,
    pub author_name: String,
    pub author_email: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<String>,
}

/// Payload of the `Job Hook` event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Job {
    pub object_kind: String,
    #[serde(rename = "ref")]
    pub git_ref: String,
    pub tag: bool,
    pub before_sha: String,
    pub sha: String,
    pub build_id: i64,
    pub build_name: String,
    pub build_stage: String,
    pub build_status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_started_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_finished_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_duration: Option<f64>,
    pub build_allow_failure: bool,
    pub build_failure_reason: String,
    pub pipeline_id: i64,
    pub project_id: i64,
    pub project_name: String,
    pub user: User,
    pub commit: JobCommit,
    pub repository: Repository,
}

/// A link attached to a release.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReleaseLink {
    pub id: i64,
    pub external: bool,
    pub link_type: String,
    pub name: String,
    pub url: String,
}

/// A source archive of a release.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReleaseSource {
    pub format: String,
    pub url: String,
}

/// Assets of a release.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReleaseAssets {
    pub count: i64,
    pub links: Vec<ReleaseLink>,
    pub sources: Vec<ReleaseSource>,
}

/// Payload of the `Release Hook` event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Release {
    pub id: i64,
    pub object_kind: String,
    pub created_at: String,
    pub released_at: String,
    pub description: String,
    pub name: String,
    pub tag: String,
    pub url: String,
    pub action: String,
    pub project: Project,
    pub assets: ReleaseAssets,
    pub commit: Commit,
}
