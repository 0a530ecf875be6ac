// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Target file formats
//!
//! Three file formats carry the version pins this bot maintains. Each
//! variant knows where its files live in the repository and how to
//! extract and rewrite the pinned versions. Extraction coming back
//! empty is a skip signal, not an error: the format is present but
//! pins nothing. Multiple matches in one file are normal (multi-stage
//! container builds).

use once_cell::sync::Lazy;
use regex::{Captures, NoExpand, Regex};

/// First non-empty line of a version file
static NVMRC_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^.+$").expect("regex is valid"));

/// `node-version: "<N>.x"` with the major captured
static WORKFLOW_NODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"node-version: "(.+)\.x""#).expect("regex is valid"));

/// Any `node-version: "..."` value, for rewriting
static WORKFLOW_NODE_ANY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"node-version: ".+""#).expect("regex is valid"));

/// `FROM node:<N>-...` with the version token captured
static DOCKER_NODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(FROM node:)(.+?)-").expect("regex is valid"));

/// `FROM <image>-<suffix>[- ]` with the suffix (codename) captured
static DOCKER_DEBIAN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(FROM .+?-)(.+?)([- ])").expect("regex is valid"));

/// Where a target's files live in the repository
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// A fixed path: a single file, or a directory walked recursively
    Path(&'static str),
    /// A repository-wide filename search; every match is processed
    Filename(&'static str),
}

/// The closed set of file formats the bot maintains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    /// `.nvmrc` version file at the repository root
    Nvmrc,
    /// GitHub Actions workflow files under `.github/workflows`
    Workflows,
    /// Container build files named `Dockerfile`, wherever they live
    Dockerfile,
}

impl Target {
    /// Every target, in the order the Node pass processes them
    pub const ALL: [Target; 3] = [Target::Nvmrc, Target::Workflows, Target::Dockerfile];

    /// Where this target's files are found
    #[must_use]
    pub fn source(self) -> Source {
        match self {
            Self::Nvmrc => Source::Path(".nvmrc"),
            Self::Workflows => Source::Path(".github/workflows"),
            Self::Dockerfile => Source::Filename("Dockerfile"),
        }
    }

    /// Extract every pinned Node version, in order of appearance.
    #[must_use]
    pub fn node_versions(self, content: &str) -> Vec<String> {
        match self {
            Self::Nvmrc => vec![content.trim().to_string()],
            Self::Workflows => WORKFLOW_NODE
                .captures_iter(content)
                .map(|c| c[1].to_string())
                .collect(),
            Self::Dockerfile => DOCKER_NODE
                .captures_iter(content)
                .map(|c| c[2].to_string())
                .collect(),
        }
    }

    /// Rewrite every pinned Node version to `version`, leaving the
    /// surrounding text untouched.
    #[must_use]
    pub fn rewrite_node(self, content: &str, version: &str) -> String {
        match self {
            // Only the first non-empty line changes; leading and
            // trailing blank lines survive.
            Self::Nvmrc => NVMRC_LINE.replace(content, NoExpand(version)).into_owned(),
            Self::Workflows => WORKFLOW_NODE_ANY
                .replace_all(content, NoExpand(&format!("node-version: \"{version}.x\"")))
                .into_owned(),
            Self::Dockerfile => DOCKER_NODE
                .replace_all(content, |caps: &Captures| {
                    format!("{}{}-", &caps[1], version)
                })
                .into_owned(),
        }
    }
}

/// Extract every Debian codename pinned in a container build file, in
/// order of appearance.
#[must_use]
pub fn debian_versions(content: &str) -> Vec<String> {
    DOCKER_DEBIAN
        .captures_iter(content)
        .map(|c| c[2].to_string())
        .collect()
}

/// Rewrite every pinned Debian codename in a container build file to
/// `codename`, folded to lower case. The Node version segment is not
/// touched.
#[must_use]
pub fn rewrite_debian(content: &str, codename: &str) -> String {
    let lower = codename.to_lowercase();
    DOCKER_DEBIAN
        .replace_all(content, |caps: &Captures| {
            format!("{}{}{}", &caps[1], lower, &caps[3])
        })
        .into_owned()
}
