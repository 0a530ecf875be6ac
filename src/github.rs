// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! GitHub REST client
//!
//! The narrow provider surface one run consumes: refs, contents, code
//! search, the blob -> tree -> commit -> ref publishing sequence, and
//! pull requests. Every operation fails the run on the first
//! non-success response; there is no retry and no pagination handling.

use crate::error::{Error, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use futures::future;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

/// Production API base
pub const API_BASE: &str = "https://api.github.com";

const ACCEPT_JSON: &str = "application/vnd.github+json";
const API_VERSION: &str = "2022-11-28";

/// Authenticated client for one GitHub host
#[derive(Debug, Clone)]
pub struct GitHub {
    http: reqwest::Client,
    base: String,
    token: String,
}

/// A file read from the repository: path plus decoded text
#[derive(Debug, Clone)]
pub struct RepoFile {
    /// Repository-relative path
    pub path: String,
    /// Decoded UTF-8 content
    pub text: String,
}

/// One entry layered onto a base tree
#[derive(Debug, Clone, Serialize)]
pub struct TreeEntry {
    path: String,
    mode: &'static str,
    #[serde(rename = "type")]
    kind: &'static str,
    sha: String,
}

impl TreeEntry {
    /// A regular-file blob entry
    #[must_use]
    pub fn blob(path: String, sha: String) -> Self {
        Self {
            path,
            mode: "100644",
            kind: "blob",
            sha,
        }
    }
}

#[derive(Deserialize)]
struct RefData {
    object: RefObject,
}

#[derive(Deserialize)]
struct RefObject {
    sha: String,
}

#[derive(Deserialize)]
struct ShaData {
    sha: String,
}

#[derive(Deserialize)]
struct ContentEntry {
    #[serde(rename = "type")]
    kind: String,
    path: String,
    #[serde(default)]
    content: Option<String>,
}

/// The contents API answers with an array for a directory and a single
/// object for anything else.
#[derive(Deserialize)]
#[serde(untagged)]
enum ContentsResponse {
    Directory(Vec<ContentEntry>),
    Single(ContentEntry),
}

#[derive(Deserialize)]
struct SearchResults {
    items: Vec<SearchItem>,
}

#[derive(Deserialize)]
struct SearchItem {
    path: String,
}

impl GitHub {
    /// Client for the production API.
    pub fn new(token: &str) -> Result<Self> {
        Self::with_base(token, API_BASE)
    }

    /// Client pointed at a non-default API base.
    pub fn with_base(token: &str, base: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("bumpyard/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            base: base.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    /// Commit sha a branch currently points at.
    pub async fn ref_sha(&self, owner: &str, repo: &str, branch: &str) -> Result<String> {
        let url = format!("{}/repos/{owner}/{repo}/git/ref/heads/{branch}", self.base);
        let resp = check("read ref", self.get(&url).send().await?)?;
        let data: RefData = resp.json().await?;
        Ok(data.object.sha)
    }

    /// Create a branch pointing at `sha`.
    pub async fn create_branch(&self, owner: &str, repo: &str, branch: &str, sha: &str) -> Result<()> {
        let url = format!("{}/repos/{owner}/{repo}/git/refs", self.base);
        let body = json!({ "ref": format!("refs/heads/{branch}"), "sha": sha });
        check("create branch", self.post(&url).json(&body).send().await?)?;
        debug!(branch, sha, "created branch");
        Ok(())
    }

    /// Read a file, or recursively read every file under a directory,
    /// at the given ref. Nested directories are flattened fully; the
    /// reads within each directory level are issued concurrently.
    /// Entries that are neither files nor directories (symlinks,
    /// submodules) are skipped.
    pub async fn contents(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        reference: &str,
    ) -> Result<Vec<RepoFile>> {
        let mut files = Vec::new();
        let mut wave = vec![path.to_string()];
        while !wave.is_empty() {
            let fetches: Vec<_> = wave
                .drain(..)
                .map(|p| self.contents_page(owner, repo, p, reference))
                .collect();
            for page in future::try_join_all(fetches).await? {
                match page {
                    ContentsResponse::Directory(entries) => {
                        wave.extend(entries.into_iter().map(|e| e.path));
                    }
                    ContentsResponse::Single(entry) if entry.kind == "file" => {
                        files.push(decode_file(entry)?);
                    }
                    ContentsResponse::Single(_) => {}
                }
            }
        }
        Ok(files)
    }

    async fn contents_page(
        &self,
        owner: &str,
        repo: &str,
        path: String,
        reference: &str,
    ) -> Result<ContentsResponse> {
        let url = format!(
            "{}/repos/{owner}/{repo}/contents/{path}?ref={reference}",
            self.base
        );
        let resp = check("read contents", self.get(&url).send().await?)?;
        Ok(resp.json().await?)
    }

    /// Find every file named `filename` in the repository and read each
    /// match at the given ref. The search itself runs against the
    /// default branch (a limitation of the code-search API); the reads
    /// do honour the ref.
    pub async fn search_files(
        &self,
        owner: &str,
        repo: &str,
        filename: &str,
        reference: &str,
    ) -> Result<Vec<RepoFile>> {
        let query = format!("repo:{owner}/{repo} filename:{filename}");
        let url = format!("{}/search/code?q={}", self.base, urlencoding::encode(&query));
        let resp = check("search code", self.get(&url).send().await?)?;
        let results: SearchResults = resp.json().await?;
        let items = results.items;
        let fetches: Vec<_> = items
            .iter()
            .map(|item| self.contents(owner, repo, item.path.as_str(), reference))
            .collect();
        let found = future::try_join_all(fetches).await?;
        Ok(found.into_iter().flatten().collect())
    }

    /// Register file content as a blob; returns its sha.
    pub async fn create_blob(&self, owner: &str, repo: &str, content: &str) -> Result<String> {
        let url = format!("{}/repos/{owner}/{repo}/git/blobs", self.base);
        let body = json!({ "content": content, "encoding": "utf-8" });
        let resp = check("create blob", self.post(&url).json(&body).send().await?)?;
        let data: ShaData = resp.json().await?;
        Ok(data.sha)
    }

    /// Build one tree layering `entries` onto the tree of `base_sha`;
    /// returns the new tree's sha.
    pub async fn create_tree(
        &self,
        owner: &str,
        repo: &str,
        base_sha: &str,
        entries: &[TreeEntry],
    ) -> Result<String> {
        let url = format!("{}/repos/{owner}/{repo}/git/trees", self.base);
        let body = json!({ "base_tree": base_sha, "tree": entries });
        let resp = check("create tree", self.post(&url).json(&body).send().await?)?;
        let data: ShaData = resp.json().await?;
        Ok(data.sha)
    }

    /// Create a commit for `tree_sha` with `parent_sha` as sole parent;
    /// returns the commit sha.
    pub async fn create_commit(
        &self,
        owner: &str,
        repo: &str,
        message: &str,
        tree_sha: &str,
        parent_sha: &str,
    ) -> Result<String> {
        let url = format!("{}/repos/{owner}/{repo}/git/commits", self.base);
        let body = json!({ "message": message, "tree": tree_sha, "parents": [parent_sha] });
        let resp = check("create commit", self.post(&url).json(&body).send().await?)?;
        let data: ShaData = resp.json().await?;
        Ok(data.sha)
    }

    /// Advance a branch ref to `sha`.
    pub async fn update_ref(&self, owner: &str, repo: &str, branch: &str, sha: &str) -> Result<()> {
        let url = format!("{}/repos/{owner}/{repo}/git/refs/heads/{branch}", self.base);
        let body = json!({ "sha": sha });
        check("update ref", self.patch(&url).json(&body).send().await?)?;
        debug!(branch, sha, "advanced ref");
        Ok(())
    }

    /// Open a pull request from `head` into `base`.
    pub async fn create_pull_request(
        &self,
        owner: &str,
        repo: &str,
        base: &str,
        head: &str,
        title: &str,
        body: &str,
    ) -> Result<()> {
        let url = format!("{}/repos/{owner}/{repo}/pulls", self.base);
        let payload = json!({ "title": title, "body": body, "base": base, "head": head });
        check(
            "create pull request",
            self.post(&url).json(&payload).send().await?,
        )?;
        Ok(())
    }

    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        self.decorate(self.http.get(url))
    }

    fn post(&self, url: &str) -> reqwest::RequestBuilder {
        self.decorate(self.http.post(url))
    }

    fn patch(&self, url: &str) -> reqwest::RequestBuilder {
        self.decorate(self.http.patch(url))
    }

    fn decorate(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        req.bearer_auth(&self.token)
            .header(reqwest::header::ACCEPT, ACCEPT_JSON)
            .header("X-GitHub-Api-Version", API_VERSION)
    }
}

fn check(context: &'static str, resp: reqwest::Response) -> Result<reqwest::Response> {
    let status = resp.status();
    if status.is_success() {
        Ok(resp)
    } else {
        Err(Error::Provider { context, status })
    }
}

/// Contents payloads arrive base64-encoded with embedded newlines.
fn decode_file(entry: ContentEntry) -> Result<RepoFile> {
    let raw = entry.content.unwrap_or_default();
    let stripped: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = STANDARD.decode(stripped.as_bytes()).map_err(|e| Error::Decode {
        path: entry.path.clone(),
        reason: e.to_string(),
    })?;
    let text = String::from_utf8(bytes).map_err(|e| Error::Decode {
        path: entry.path.clone(),
        reason: e.to_string(),
    })?;
    Ok(RepoFile {
        path: entry.path,
        text,
    })
}
