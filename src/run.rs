// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Run orchestration
//!
//! One run walks a fixed sequence: Node pass, Debian pass, then a pull
//! request if either pass pushed a commit. The Debian pass branches
//! from whatever the Node pass left behind. The passes are not
//! transactional with each other: the Node pass's branch and commit
//! survive a Debian pass failure.

use crate::config::Config;
use crate::cycles::{self, DebianCycle, NodeCycle};
use crate::github::{GitHub, TreeEntry};
use crate::target::{self, Source, Target};
use crate::types::{FileUpdate, Located, PassOutcome};
use crate::updatable;
use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use futures::future;
use tracing::{debug, info};

/// Coordinates for one run
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Repository owner or organisation
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// Branch the bump is measured against
    pub base_branch: String,
    /// Branch the bump is pushed to
    pub working_branch: String,
}

/// Remote endpoints one run talks to; overridable for tests
#[derive(Debug, Clone)]
pub struct Endpoints {
    /// endoflife.date API base
    pub feeds: String,
    /// GitHub API base
    pub github: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            feeds: cycles::ENDOFLIFE_BASE.to_string(),
            github: crate::github::API_BASE.to_string(),
        }
    }
}

/// Execute one full run.
///
/// Fetches both feeds up front (concurrently; either failing aborts the
/// run before any repository mutation), then runs the Node pass, the
/// Debian pass, and finally opens a pull request when at least one pass
/// pushed a commit. "Nothing to update" is a success, not an error.
pub async fn execute(config: &Config, opts: &RunOptions, endpoints: &Endpoints) -> Result<()> {
    let gh = GitHub::with_base(&config.token, &endpoints.github)?;
    let http = reqwest::Client::new();

    let (node_cycles, debian_cycles) = tokio::try_join!(
        cycles::fetch_node_cycles(&http, &endpoints.feeds),
        cycles::fetch_debian_cycles(&http, &endpoints.feeds),
    )
    .context("fetching end-of-life feeds")?;

    let node = node_pass(&gh, opts, &node_cycles).await.context("node pass")?;
    let debian = debian_pass(&gh, opts, &debian_cycles, &node)
        .await
        .context("debian pass")?;

    match summarize(&node, &debian) {
        Some((title, body)) => {
            gh.create_pull_request(
                &opts.owner,
                &opts.repo,
                &opts.base_branch,
                &opts.working_branch,
                &title,
                &body,
            )
            .await
            .context("opening pull request")?;
            info!(%title, "opened pull request");
            println!("Opened pull request: {title}");
        }
        None => {
            println!("Everything up to date; nothing to push.");
        }
    }
    Ok(())
}

/// Bump Node pins across all three target formats.
async fn node_pass(gh: &GitHub, opts: &RunOptions, cycles: &[NodeCycle]) -> Result<PassOutcome> {
    let latest = updatable::latest_lts_node(cycles)
        .ok_or_else(|| anyhow!("no LTS line in the Node.js feed"))?;
    info!(cycle = %latest.cycle, "latest Node LTS line");

    let base_sha = gh
        .ref_sha(&opts.owner, &opts.repo, &opts.base_branch)
        .await?;

    let located = locate_all(gh, opts, &Target::ALL, &base_sha).await?;
    let updates: Vec<FileUpdate> = located
        .iter()
        .filter_map(|l| {
            let versions = l.target.node_versions(&l.text);
            if !updatable::is_node_updatable(&versions, latest) {
                return None;
            }
            Some(FileUpdate {
                path: l.path.clone(),
                text: l.target.rewrite_node(&l.text, &latest.cycle),
            })
        })
        .collect();

    if updates.is_empty() {
        info!("node versions already current");
        return Ok(PassOutcome::Unchanged);
    }

    gh.create_branch(&opts.owner, &opts.repo, &opts.working_branch, &base_sha)
        .await?;
    publish(gh, opts, &base_sha, &updates, "update node version").await?;
    Ok(PassOutcome::Updated {
        version: latest.cycle.clone(),
    })
}

/// Bump Debian pins in container build files, chaining onto the Node
/// pass's commit when there is one.
async fn debian_pass(
    gh: &GitHub,
    opts: &RunOptions,
    cycles: &[DebianCycle],
    node: &PassOutcome,
) -> Result<PassOutcome> {
    let living = updatable::living_debians(cycles, Utc::now());
    let oldest = updatable::oldest_debian(&living)
        .ok_or_else(|| anyhow!("no living release in the Debian feed"))?;
    info!(codename = %oldest.codename, "oldest living Debian release");

    let start = branch_point(node, &opts.base_branch, &opts.working_branch);
    let sha = gh.ref_sha(&opts.owner, &opts.repo, start).await?;

    let located = locate(gh, opts, Target::Dockerfile, &sha).await?;
    let updates: Vec<FileUpdate> = located
        .iter()
        .filter_map(|l| {
            let versions = target::debian_versions(&l.text);
            if !updatable::is_debian_updatable(&versions, &living) {
                return None;
            }
            Some(FileUpdate {
                path: l.path.clone(),
                text: target::rewrite_debian(&l.text, &oldest.codename),
            })
        })
        .collect();

    if updates.is_empty() {
        info!("debian versions already current");
        return Ok(PassOutcome::Unchanged);
    }

    if !node.updated() {
        gh.create_branch(&opts.owner, &opts.repo, &opts.working_branch, &sha)
            .await?;
    }
    publish(gh, opts, &sha, &updates, "update debian version").await?;
    Ok(PassOutcome::Updated {
        version: oldest.codename.clone(),
    })
}

/// Which ref the Debian pass starts from, as a function of the Node
/// pass outcome: the working branch if the Node pass pushed a commit,
/// the base branch otherwise.
fn branch_point<'a>(node: &PassOutcome, base: &'a str, working: &'a str) -> &'a str {
    match node {
        PassOutcome::Updated { .. } => working,
        PassOutcome::Unchanged => base,
    }
}

/// Collect the content of every file for every target, concurrently
/// across targets.
async fn locate_all(
    gh: &GitHub,
    opts: &RunOptions,
    targets: &[Target],
    reference: &str,
) -> Result<Vec<Located>> {
    let fetches: Vec<_> = targets
        .iter()
        .map(|t| locate(gh, opts, *t, reference))
        .collect();
    let located = future::try_join_all(fetches).await?;
    Ok(located.into_iter().flatten().collect())
}

/// Collect the content of every file for one target at the given ref.
async fn locate(
    gh: &GitHub,
    opts: &RunOptions,
    target: Target,
    reference: &str,
) -> Result<Vec<Located>> {
    let files = match target.source() {
        Source::Path(path) => gh.contents(&opts.owner, &opts.repo, path, reference).await?,
        Source::Filename(name) => {
            gh.search_files(&opts.owner, &opts.repo, name, reference)
                .await?
        }
    };
    debug!(?target, files = files.len(), "located target files");
    Ok(files
        .into_iter()
        .map(|f| Located {
            target,
            path: f.path,
            text: f.text,
        })
        .collect())
}

/// Publish one commit: a blob per file (created concurrently), one tree
/// layered on the base, one commit with the base as sole parent, then
/// the working branch ref.
///
/// The window between the sha read and the ref update is unguarded; a
/// concurrent push to the working branch would be overwritten.
async fn publish(
    gh: &GitHub,
    opts: &RunOptions,
    base_sha: &str,
    updates: &[FileUpdate],
    message: &str,
) -> Result<()> {
    debug!(base = base_sha, files = updates.len(), "publishing commit");
    let blobs = future::try_join_all(
        updates
            .iter()
            .map(|u| gh.create_blob(&opts.owner, &opts.repo, &u.text)),
    )
    .await?;
    let entries: Vec<TreeEntry> = updates
        .iter()
        .zip(blobs)
        .map(|(u, sha)| TreeEntry::blob(u.path.clone(), sha))
        .collect();
    let tree = gh
        .create_tree(&opts.owner, &opts.repo, base_sha, &entries)
        .await?;
    let commit = gh
        .create_commit(&opts.owner, &opts.repo, message, &tree, base_sha)
        .await?;
    gh.update_ref(&opts.owner, &opts.repo, &opts.working_branch, &commit)
        .await?;
    info!(message, commit = %commit, "pushed commit");
    println!("Pushed \"{message}\" ({} file(s))", updates.len());
    Ok(())
}

/// Pull request title and body, omitting whichever pass changed
/// nothing. `None` when neither pass did.
fn summarize(node: &PassOutcome, debian: &PassOutcome) -> Option<(String, String)> {
    match (node.version(), debian.version()) {
        (Some(n), Some(d)) => Some((
            format!("bump node to {n}, debian to {d}"),
            format!("- bump node version to {n}\n- bump debian version to {d}\n"),
        )),
        (Some(n), None) => Some((
            format!("bump node to {n}"),
            format!("- bump node version to {n}\n"),
        )),
        (None, Some(d)) => Some((
            format!("bump debian to {d}"),
            format!("- bump debian version to {d}\n"),
        )),
        (None, None) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debian_pass_chains_onto_node_branch() {
        let node = PassOutcome::Updated {
            version: "22".into(),
        };
        assert_eq!(branch_point(&node, "main", "bump"), "bump");
    }

    #[test]
    fn debian_pass_starts_from_base_when_node_unchanged() {
        assert_eq!(branch_point(&PassOutcome::Unchanged, "main", "bump"), "main");
    }

    #[test]
    fn summary_covers_both_bumps() {
        let node = PassOutcome::Updated {
            version: "22".into(),
        };
        let debian = PassOutcome::Updated {
            version: "bookworm".into(),
        };
        let (title, body) = summarize(&node, &debian).unwrap();
        assert_eq!(title, "bump node to 22, debian to bookworm");
        assert!(body.contains("node version to 22"));
        assert!(body.contains("debian version to bookworm"));
    }

    #[test]
    fn summary_omits_the_pass_that_changed_nothing() {
        let debian = PassOutcome::Updated {
            version: "bookworm".into(),
        };
        let (title, body) = summarize(&PassOutcome::Unchanged, &debian).unwrap();
        assert_eq!(title, "bump debian to bookworm");
        assert!(!body.contains("node"));
    }

    #[test]
    fn no_summary_when_nothing_changed() {
        assert!(summarize(&PassOutcome::Unchanged, &PassOutcome::Unchanged).is_none());
    }
}
