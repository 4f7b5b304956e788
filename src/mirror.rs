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

//! Candidate mirror model and the two ranking orders.

use crate::error::{MirrorSelectError, SelectResult};
use serde::Deserialize;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use url::Url;

/// Transfer protocol a mirror must be reachable over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Http,
    Https,
    #[default]
    Any,
}

impl Protocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Http => "http",
            Protocol::Https => "https",
            Protocol::Any => "any",
        }
    }

    /// Case-sensitive scheme match; `Any` matches every scheme
    pub fn matches(&self, scheme: &str) -> bool {
        match self {
            Protocol::Any => true,
            other => other.as_str() == scheme,
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Protocol {
    type Err = MirrorSelectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "http" => Ok(Protocol::Http),
            "https" => Ok(Protocol::Https),
            "any" => Ok(Protocol::Any),
            _ => Err(MirrorSelectError::invalid_option("protocol", s)),
        }
    }
}

/// A candidate mirror plus whatever the probes measured about it.
///
/// Discovery fills in `address` and `country`. The latency probe writes
/// `latency_ms` and `valid`; the throughput probe writes `transferred_bytes`,
/// `elapsed_secs` and `valid`. Nothing else mutates an endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct Endpoint {
    /// Base URL of the archive, `None` when discovery produced an empty address
    pub address: Option<Url>,
    /// ISO 3166-1 alpha-2 code assigned by discovery
    pub country: Option<String>,
    /// Round trip of the existence check, meaningful only when `valid`
    pub latency_ms: i64,
    pub transferred_bytes: u64,
    pub elapsed_secs: f64,
    pub valid: bool,
}

impl Endpoint {
    pub fn new(address: Url, country: Option<String>) -> Self {
        Self {
            address: Some(address),
            ..Self::unaddressed(country)
        }
    }

    fn unaddressed(country: Option<String>) -> Self {
        Self {
            address: None,
            country,
            latency_ms: 0,
            transferred_bytes: 0,
            elapsed_secs: 0.0,
            valid: false,
        }
    }

    /// Parse a raw mirror URL. An empty string yields an endpoint without an
    /// address, which every probe rejects.
    pub fn parse(raw: &str, country: Option<String>) -> SelectResult<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(Self::unaddressed(country));
        }
        let address = Url::parse(raw).map_err(|source| MirrorSelectError::InvalidUrl {
            url: raw.to_string(),
            source,
        })?;
        Ok(Self::new(address, country))
    }

    pub fn scheme(&self) -> Option<&str> {
        self.address.as_ref().map(|u| u.scheme())
    }

    /// Host name for log lines
    pub fn host(&self) -> &str {
        self.address
            .as_ref()
            .and_then(|u| u.host_str())
            .unwrap_or("<no address>")
    }

    /// `<base>/dists/<release>/Release`, present on every mirror carrying the release
    pub fn release_url(&self, release: &str) -> Option<Url> {
        let mut base = self.address.clone()?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        base.join(&format!("dists/{}/Release", release)).ok()
    }

    /// Effective speed in bits per second, 0 when no time was measured
    pub fn bits_per_second(&self) -> f64 {
        if self.elapsed_secs <= 0.0 {
            return 0.0;
        }
        (self.transferred_bytes as f64 * 8.0) / self.elapsed_secs
    }

    pub fn record_latency(&mut self, latency_ms: i64) {
        self.latency_ms = latency_ms;
        self.valid = true;
    }

    pub fn record_transfer(&mut self, bytes: u64, elapsed_secs: f64) {
        self.transferred_bytes = bytes;
        self.elapsed_secs = elapsed_secs;
        self.valid = true;
    }

    pub fn invalidate(&mut self) {
        self.valid = false;
    }

    /// Speed used for the final order; `None` sorts after every measured endpoint
    fn ranked_speed(&self) -> Option<f64> {
        if self.valid && self.elapsed_secs > 0.0 {
            Some(self.bits_per_second())
        } else {
            None
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.address {
            Some(url) => write!(f, "{}", url),
            None => write!(f, "<no address>"),
        }
    }
}

/// Ascending latency
pub fn by_latency(a: &Endpoint, b: &Endpoint) -> Ordering {
    a.latency_ms.cmp(&b.latency_ms)
}

/// Descending effective speed; invalid or unmeasured endpoints last
pub fn by_speed(a: &Endpoint, b: &Endpoint) -> Ordering {
    match (a.ranked_speed(), b.ranked_speed()) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
