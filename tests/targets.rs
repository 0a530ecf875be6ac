// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Format-adapter tests
//!
//! Each target format pairs an extraction with a rewrite. These verify:
//! 1. Extraction finds every pin, in order
//! 2. Rewrites touch only the pinned tokens
//! 3. Rewrites are idempotent

use bumpyard::target::{debian_versions, rewrite_debian, Source, Target};
use proptest::prelude::*;

// =============================================================================
// Version File (.nvmrc)
// =============================================================================

#[test]
fn nvmrc_extracts_the_trimmed_content() {
    assert_eq!(Target::Nvmrc.node_versions("\n20\n\n"), vec!["20"]);
    assert_eq!(Target::Nvmrc.node_versions("20"), vec!["20"]);
}

#[test]
fn nvmrc_rewrite_preserves_surrounding_blank_lines() {
    assert_eq!(Target::Nvmrc.rewrite_node("\n20\n\n", "22"), "\n22\n\n");
    assert_eq!(Target::Nvmrc.rewrite_node("20\n\n", "22"), "22\n\n");
}

// =============================================================================
// CI Workflow
// =============================================================================

const WORKFLOW: &str = "\
        uses: actions/setup-node
        with:
          node-version: \"20.x\"
";

#[test]
fn workflow_extracts_the_quoted_major() {
    assert_eq!(Target::Workflows.node_versions(WORKFLOW), vec!["20"]);
}

#[test]
fn workflow_rewrite_keeps_the_x_suffix() {
    let updated = Target::Workflows.rewrite_node(WORKFLOW, "22");
    assert!(updated.contains("node-version: \"22.x\""));
    assert!(!updated.contains("20.x"));
}

#[test]
fn workflow_without_pins_extracts_nothing() {
    // A skip signal, not an error.
    assert!(Target::Workflows.node_versions("name: release\non: push\n").is_empty());
}

// =============================================================================
// Container Build File
// =============================================================================

const DOCKERFILE: &str = "\
FROM node:20-bullseye as builder
FROM node:20-bullseye-slim
";

#[test]
fn dockerfile_extracts_every_node_stage() {
    assert_eq!(Target::Dockerfile.node_versions(DOCKERFILE), vec!["20", "20"]);
}

#[test]
fn dockerfile_node_rewrite_touches_every_stage() {
    let updated = Target::Dockerfile.rewrite_node(DOCKERFILE, "22");
    assert_eq!(
        updated,
        "FROM node:22-bullseye as builder\nFROM node:22-bullseye-slim\n"
    );
}

#[test]
fn dockerfile_extracts_every_debian_suffix() {
    assert_eq!(debian_versions(DOCKERFILE), vec!["bullseye", "bullseye"]);
}

#[test]
fn dockerfile_debian_rewrite_lowercases_and_spares_node() {
    let updated = rewrite_debian(DOCKERFILE, "Bookworm");
    assert_eq!(
        updated,
        "FROM node:20-bookworm as builder\nFROM node:20-bookworm-slim\n"
    );
}

#[test]
fn dockerfile_node_rewrite_round_trips() {
    let updated = Target::Dockerfile.rewrite_node(DOCKERFILE, "22");
    assert_eq!(Target::Dockerfile.node_versions(&updated), vec!["22", "22"]);
}

#[test]
fn dockerfile_rewrites_are_idempotent() {
    let once = Target::Dockerfile.rewrite_node(DOCKERFILE, "22");
    let twice = Target::Dockerfile.rewrite_node(&once, "22");
    assert_eq!(once, twice);

    let once = rewrite_debian(DOCKERFILE, "Bookworm");
    let twice = rewrite_debian(&once, "Bookworm");
    assert_eq!(once, twice);
}

#[test]
fn dockerfile_without_node_stages_extracts_nothing() {
    let content = "FROM debian:bookworm-slim\nRUN apt-get update\n";
    assert!(Target::Dockerfile.node_versions(content).is_empty());
}

// =============================================================================
// Dispatch
// =============================================================================

#[test]
fn every_target_declares_its_source() {
    assert_eq!(Target::Nvmrc.source(), Source::Path(".nvmrc"));
    assert_eq!(Target::Workflows.source(), Source::Path(".github/workflows"));
    assert_eq!(Target::Dockerfile.source(), Source::Filename("Dockerfile"));
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn node_rewrite_extraction_agrees_for_any_major(major in "[1-9][0-9]{0,2}") {
        let updated = Target::Dockerfile.rewrite_node(DOCKERFILE, &major);
        prop_assert_eq!(
            Target::Dockerfile.node_versions(&updated),
            vec![major.clone(), major.clone()]
        );
        // And applying the same rewrite again changes nothing.
        prop_assert_eq!(Target::Dockerfile.rewrite_node(&updated, &major), updated);
    }

    #[test]
    fn workflow_rewrite_is_idempotent_for_any_major(major in "[1-9][0-9]{0,2}") {
        let once = Target::Workflows.rewrite_node(WORKFLOW, &major);
        prop_assert_eq!(Target::Workflows.rewrite_node(&once, &major), once.clone());
        prop_assert_eq!(Target::Workflows.node_versions(&once), vec![major]);
    }
}
