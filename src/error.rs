/*
 * mirrorselect - Fastest archive mirror selection for Ubuntu.
 * Copyright (C) 2025  mirrorselect contributors
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program.  If not, see <https://www.gnu.org/licenses/>.
 */

//! Error types for the run and for individual probes.

use std::fmt;
use thiserror::Error;

/// Run-level errors
#[derive(Debug, Error)]
pub enum MirrorSelectError {
    /// The mirror list could not be fetched
    #[error("Discovery failed for {url}: {message}")]
    Discovery {
        url: String,
        message: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    /// The mirror list was fetched but had no recognizable mirror table
    #[error("Could not parse mirror list from {url}: {reason}")]
    DiscoveryParse { url: String, reason: String },

    /// A candidate URL could not be parsed
    #[error("Invalid mirror URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The distribution codename could not be determined
    #[error("Release detection failed: {message}")]
    ReleaseDetection { message: String },

    /// Country lookup by public IP failed
    #[error("GeoIP lookup failed: {message}")]
    GeoIp {
        message: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    /// A user-supplied option was rejected
    #[error("Invalid value '{value}' for {option}")]
    InvalidOption { option: String, value: String },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// A built-in pattern failed to compile
    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
}

impl MirrorSelectError {
    /// Create a discovery error from a request failure
    pub fn discovery(url: impl Into<String>, source: reqwest::Error) -> Self {
        MirrorSelectError::Discovery {
            url: url.into(),
            message: source.to_string(),
            source: Some(source),
        }
    }

    /// Create a rejected-option error
    pub fn invalid_option(option: impl Into<String>, value: impl Into<String>) -> Self {
        MirrorSelectError::InvalidOption {
            option: option.into(),
            value: value.into(),
        }
    }
}

/// Result type alias for run-level operations
pub type SelectResult<T> = std::result::Result<T, MirrorSelectError>;

/// Why a single probe did not produce a measurement
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeFailure {
    /// The endpoint has no address to probe
    NoAddress,
    /// The probe deadline expired
    Timeout,
    /// The server answered with a non-success status
    Status(u16),
    /// Connect, DNS, TLS or body-read failure
    Transport(String),
}

impl ProbeFailure {
    /// Classify a reqwest error
    pub fn from_reqwest(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            ProbeFailure::Timeout
        } else if let Some(status) = err.status() {
            ProbeFailure::Status(status.as_u16())
        } else {
            ProbeFailure::Transport(err.to_string())
        }
    }

    /// Timeouts are an expected outcome for distant mirrors
    pub fn is_expected(&self) -> bool {
        matches!(self, ProbeFailure::Timeout)
    }
}

impl fmt::Display for ProbeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeFailure::NoAddress => write!(f, "no address"),
            ProbeFailure::Timeout => write!(f, "timed out"),
            ProbeFailure::Status(code) => write!(f, "HTTP status {}", code),
            ProbeFailure::Transport(msg) => write!(f, "{}", msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MirrorSelectError::invalid_option("country", "USA");
        assert_eq!(format!("{}", err), "Invalid value 'USA' for country");
    }

    #[test]
    fn test_invalid_url_display() {
        let source = url::Url::parse("not a url").unwrap_err();
        let err = MirrorSelectError::InvalidUrl {
            url: "not a url".to_string(),
            source,
        };
        assert!(format!("{}", err).starts_with("Invalid mirror URL 'not a url'"));
    }

    #[test]
    fn test_probe_failure_display() {
        assert_eq!(ProbeFailure::Timeout.to_string(), "timed out");
        assert_eq!(ProbeFailure::Status(404).to_string(), "HTTP status 404");
        assert!(ProbeFailure::Timeout.is_expected());
        assert!(!ProbeFailure::Transport("refused".into()).is_expected());
    }
}
