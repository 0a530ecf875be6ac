// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Failure taxonomy for one run
//!
//! Every error here is terminal: it propagates to the process exit
//! status with no retry and no partial cleanup. A branch created before
//! a later step fails is left in place.

use thiserror::Error;

/// The ways a run can fail
#[derive(Debug, Error)]
pub enum Error {
    /// The credential environment variable is absent (checked before
    /// any network call)
    #[error("{0} is not set in the environment")]
    MissingToken(&'static str),

    /// An end-of-life feed answered with a non-success status
    #[error("{url} returned status {status}")]
    FeedStatus {
        /// Feed URL that was queried
        url: String,
        /// HTTP status it answered with
        status: reqwest::StatusCode,
    },

    /// An end-of-life feed payload did not match the expected record
    /// shape; the whole payload is rejected, there is no partial
    /// acceptance
    #[error("unexpected payload from {url}: {source}")]
    FeedSchema {
        /// Feed URL that was queried
        url: String,
        /// The underlying deserialization failure
        #[source]
        source: serde_json::Error,
    },

    /// A GitHub operation answered with a non-success status
    #[error("github: {context} failed with status {status}")]
    Provider {
        /// Which operation was attempted
        context: &'static str,
        /// HTTP status it answered with
        status: reqwest::StatusCode,
    },

    /// A repository payload could not be decoded to UTF-8 text
    #[error("could not decode {path}: {reason}")]
    Decode {
        /// Repository path of the offending file
        path: String,
        /// What went wrong
        reason: String,
    },

    /// Transport-level failure talking to either remote
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Result alias for the taxonomy above
pub type Result<T, E = Error> = std::result::Result<T, E>;
