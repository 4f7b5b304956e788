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

//! Candidate acceptance and the predicate filters between stages.

use crate::discovery::RawMirror;
use crate::mirror::{Endpoint, Protocol};
use tracing::{debug, error};

const HTTP_PREFIXES: &[&str] = &["http://", "https://"];

/// Turn discovered rows into endpoints for `country`.
///
/// Rows from other countries and rows not starting with `http://` or
/// `https://` are skipped; unparseable URLs are logged and dropped.
pub fn accept_candidates(raw: Vec<RawMirror>, country: &str) -> Vec<Endpoint> {
    raw.into_iter()
        .filter(|m| m.country.as_deref() == Some(country))
        .filter(|m| HTTP_PREFIXES.iter().any(|p| m.url.starts_with(p)))
        .filter_map(|m| match Endpoint::parse(&m.url, m.country) {
            Ok(endpoint) => Some(endpoint),
            Err(e) => {
                error!("dropping candidate: {}", e);
                None
            }
        })
        .collect()
}

/// Keep endpoints whose scheme equals `protocol`; `Any` passes everything through
pub fn by_protocol(endpoints: Vec<Endpoint>, protocol: Protocol) -> Vec<Endpoint> {
    if protocol == Protocol::Any {
        return endpoints;
    }
    endpoints
        .into_iter()
        .filter(|e| e.scheme().is_some_and(|s| protocol.matches(s)))
        .collect()
}

/// Remove endpoints a probe marked invalid
pub fn drop_invalid(endpoints: Vec<Endpoint>) -> Vec<Endpoint> {
    let before = endpoints.len();
    let valid: Vec<Endpoint> = endpoints.into_iter().filter(|e| e.valid).collect();
    debug!("{} of {} endpoints still valid", valid.len(), before);
    valid
}
