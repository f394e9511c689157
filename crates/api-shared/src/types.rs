//! Request and response bodies for the REST API.
//!
//! Revisions travel as `sha` on the wire: they are git blob ids, and clients send back the
//! `sha` they read to guard a write.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RepoItem {
    pub name: String,
    pub path: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ListReposRes {
    pub repos: Vec<RepoItem>,
}

/// One child of a listed directory. `kind` is `"file"` or `"dir"`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ContentEntry {
    pub name: String,
    pub path: String,
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DirectoryRes {
    pub path: String,
    pub entries: Vec<ContentEntry>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FileRes {
    pub path: String,
    pub content: String,
    pub sha: String,
}

/// `GET /repos/{repo}/contents` answers with a listing for directories and the file otherwise.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum ContentsRes {
    File(FileRes),
    Directory(DirectoryRes),
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SaveFileReq {
    pub path: Option<String>,
    pub content: Option<String>,
    pub message: Option<String>,
    /// Required when updating an existing file, absent when creating one.
    pub sha: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SaveFileRes {
    pub path: String,
    pub sha: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DeleteFileReq {
    pub path: Option<String>,
    pub sha: Option<String>,
    pub message: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DeleteFileRes {
    pub path: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PageSummaryRes {
    pub path: String,
    pub sha: String,
    pub title: String,
    pub slug: String,
    pub block_count: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ListPagesRes {
    pub pages: Vec<PageSummaryRes>,
}

/// A parsed page. `page` carries the title, slug, description, blocks and metadata exactly as
/// they are stored in the page file's frontmatter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PageRes {
    pub path: String,
    pub sha: String,
    #[schema(value_type = Object)]
    pub page: serde_json::Value,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SlugConflictRes {
    pub slug: String,
    pub paths: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SlugConflictsRes {
    pub conflicts: Vec<SlugConflictRes>,
}
