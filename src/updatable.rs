// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Staleness decisions over release cycles
//!
//! Pure functions only: nothing here touches the network or the clock.
//! The caller supplies `now` where wall-clock time matters.

use crate::cycles::{DebianCycle, NodeCycle};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use std::cmp::Reverse;
use std::collections::BTreeSet;

/// The latest long-term-support Node line.
///
/// Lines never promoted to LTS are excluded. Ties on the promotion date
/// go to the greater numeric cycle, so the selection is deterministic.
/// `None` if no line has an LTS date.
#[must_use]
pub fn latest_lts_node(cycles: &[NodeCycle]) -> Option<&NodeCycle> {
    cycles
        .iter()
        .filter(|c| c.lts.as_date().is_some())
        .max_by_key(|c| (c.lts.as_date().map(str::to_owned), cycle_number(&c.cycle)))
}

/// Debian lines whose end-of-life date is strictly after `now`.
///
/// A boolean `eol` carries no date signal and is excluded. The result is
/// sorted descending by numeric cycle.
#[must_use]
pub fn living_debians(cycles: &[DebianCycle], now: DateTime<Utc>) -> Vec<&DebianCycle> {
    let mut living: Vec<&DebianCycle> = cycles
        .iter()
        .filter(|c| {
            c.eol
                .as_date()
                .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
                .is_some_and(|d| d.and_time(NaiveTime::MIN).and_utc() > now)
        })
        .collect();
    living.sort_by_key(|c| Reverse(cycle_number(&c.cycle)));
    living
}

/// The living Debian line with the smallest numeric cycle.
#[must_use]
pub fn oldest_debian<'a>(living: &[&'a DebianCycle]) -> Option<&'a DebianCycle> {
    living.iter().copied().min_by_key(|c| cycle_number(&c.cycle))
}

/// Whether the Node versions found in the repository warrant an update.
///
/// Nothing found means nothing to compare. More than one distinct value
/// is an internal inconsistency and is always worth normalizing.
/// Otherwise the single pinned major is compared numerically against
/// the latest LTS cycle; an unparseable pin is left alone.
#[must_use]
pub fn is_node_updatable(versions: &[String], latest: &NodeCycle) -> bool {
    let distinct: BTreeSet<&str> = versions.iter().map(String::as_str).collect();
    if distinct.len() > 1 {
        return true;
    }
    let Some(current) = distinct.into_iter().next() else {
        return false;
    };
    match (current.parse::<u64>(), latest.cycle.parse::<u64>()) {
        (Ok(found), Ok(target)) => found < target,
        _ => false,
    }
}

/// Whether the Debian codenames found in the repository warrant an
/// update.
///
/// Same empty / inconsistent rules as the Node predicate. A single
/// distinct codename is stale when it is no longer among the living
/// releases (case-insensitive), not merely when it is not the newest.
#[must_use]
pub fn is_debian_updatable(versions: &[String], living: &[&DebianCycle]) -> bool {
    let distinct: BTreeSet<&str> = versions.iter().map(String::as_str).collect();
    if distinct.len() > 1 {
        return true;
    }
    let Some(current) = distinct.into_iter().next() else {
        return false;
    };
    !living
        .iter()
        .any(|c| c.codename.eq_ignore_ascii_case(current))
}

fn cycle_number(cycle: &str) -> u64 {
    cycle.parse().unwrap_or(0)
}
