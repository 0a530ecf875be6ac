// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Credential configuration

use crate::error::{Error, Result};

/// Environment variable holding the GitHub token
pub const TOKEN_VAR: &str = "BUMPYARD_TOKEN";

/// Startup configuration, constructed once and threaded as a parameter
/// into everything that talks to GitHub. No component looks the token
/// up ambiently.
#[derive(Debug, Clone)]
pub struct Config {
    /// GitHub token with contents and pull-request scopes
    pub token: String,
}

impl Config {
    /// Read configuration from the process environment.
    ///
    /// A missing or empty token is a configuration error, raised before
    /// any network call is attempted.
    pub fn from_env() -> Result<Self> {
        match std::env::var(TOKEN_VAR) {
            Ok(token) if !token.is_empty() => Ok(Self { token }),
            _ => Err(Error::MissingToken(TOKEN_VAR)),
        }
    }
}
