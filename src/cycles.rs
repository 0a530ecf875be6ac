// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Upstream end-of-life feeds
//!
//! endoflife.date publishes one JSON array of release-cycle records per
//! product. Both feeds are validated strictly: an unknown field or a
//! mis-typed value rejects the whole payload. A transient network
//! failure is fatal for the invocation; there is no retry.

use crate::error::{Error, Result};
use serde::Deserialize;

/// Production base URL for the endoflife.date API
pub const ENDOFLIFE_BASE: &str = "https://endoflife.date/api";

/// A date string or a boolean sentinel.
///
/// endoflife.date encodes "not applicable / not announced" as a boolean
/// in fields that otherwise hold an ISO date.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum DateFlag {
    /// An ISO-8601 date, e.g. "2026-04-30"
    Date(String),
    /// Sentinel: the signal does not apply
    Flag(bool),
}

impl DateFlag {
    /// The date string, if this is a date
    #[must_use]
    pub fn as_date(&self) -> Option<&str> {
        match self {
            Self::Date(d) => Some(d.as_str()),
            Self::Flag(_) => None,
        }
    }
}

/// One Node.js release line
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NodeCycle {
    /// Major version label, e.g. "20"
    pub cycle: String,
    /// First release date of the line
    pub release_date: String,
    /// End-of-life date, or a sentinel
    pub eol: DateFlag,
    /// Newest patch release
    pub latest: String,
    /// Date of the newest patch release
    pub latest_release_date: String,
    /// Product link
    #[serde(default)]
    pub link: Option<String>,
    /// LTS promotion date, or `false` for lines never promoted
    pub lts: DateFlag,
    /// Active-support end date, or a sentinel
    pub support: DateFlag,
}

/// One Debian release line
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DebianCycle {
    /// Numeric release label, e.g. "12"
    pub cycle: String,
    /// Human-readable release name, e.g. "Bookworm"; unique within one
    /// feed result, compared case-insensitively
    pub codename: String,
    /// First release date of the line
    pub release_date: String,
    /// End-of-life date, or a sentinel
    pub eol: DateFlag,
    /// Newest point release
    pub latest: String,
    /// Date of the newest point release
    pub latest_release_date: String,
    /// Product link
    #[serde(default)]
    pub link: Option<String>,
    /// LTS marker
    pub lts: DateFlag,
    /// Extended-support end date
    pub extended_support: String,
}

/// Fetch and validate the Node.js release cycles.
pub async fn fetch_node_cycles(http: &reqwest::Client, base: &str) -> Result<Vec<NodeCycle>> {
    fetch(http, &format!("{base}/nodejs.json")).await
}

/// Fetch and validate the Debian release cycles.
pub async fn fetch_debian_cycles(http: &reqwest::Client, base: &str) -> Result<Vec<DebianCycle>> {
    fetch(http, &format!("{base}/debian.json")).await
}

async fn fetch<T>(http: &reqwest::Client, url: &str) -> Result<Vec<T>>
where
    T: serde::de::DeserializeOwned,
{
    let resp = http.get(url).send().await?;
    let status = resp.status();
    if !status.is_success() {
        return Err(Error::FeedStatus {
            url: url.to_string(),
            status,
        });
    }
    // Deserialize from the raw body so a shape mismatch is
    // distinguishable from a transport failure.
    let body = resp.text().await?;
    serde_json::from_str(&body).map_err(|source| Error::FeedSchema {
        url: url.to_string(),
        source,
    })
}
