// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Bumpyard library - version-pin maintenance for Node.js and Debian
//!
//! This crate checks the endoflife.date feeds for Node.js and Debian,
//! scans a GitHub repository for files pinning those versions, rewrites
//! stale pins, and opens a pull request with the result. One process
//! invocation is one run; nothing persists between runs.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod cycles;
pub mod error;
pub mod github;
pub mod run;
pub mod target;
pub mod updatable;

/// Run-scoped data types shared across the passes
pub mod types {
    use crate::target::Target;

    /// File content located in the repository at a specific commit
    #[derive(Debug, Clone)]
    pub struct Located {
        /// Which target format matched this file
        pub target: Target,
        /// Repository-relative path
        pub path: String,
        /// Decoded UTF-8 text
        pub text: String,
    }

    /// One file rewrite queued for publishing
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct FileUpdate {
        /// Repository-relative path
        pub path: String,
        /// Replacement file text
        pub text: String,
    }

    /// What one update pass did to the repository
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum PassOutcome {
        /// Every located file already carries a supported version
        Unchanged,
        /// At least one file was rewritten and committed
        Updated {
            /// The version the pass moved the repository to
            version: String,
        },
    }

    impl PassOutcome {
        /// Whether this pass pushed a commit
        #[must_use]
        pub fn updated(&self) -> bool {
            matches!(self, Self::Updated { .. })
        }

        /// The version this pass moved to, if it updated anything
        #[must_use]
        pub fn version(&self) -> Option<&str> {
            match self {
                Self::Unchanged => None,
                Self::Updated { version } => Some(version),
            }
        }
    }
}

/// Prelude for common imports
pub mod prelude {
    pub use crate::types::{FileUpdate, Located, PassOutcome};
    pub use anyhow::{Context, Result};
}
