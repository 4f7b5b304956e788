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

//! Latency and throughput probes against a single mirror.

use crate::error::{MirrorSelectError, ProbeFailure, SelectResult};
use crate::mirror::Endpoint;
use crate::report::humanize_speed;
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, error};
use url::Url;

/// Bound on a full `Release` fetch, independent of the latency timeout
pub const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(2);

/// Issues probes for one release. Cheap to clone; clients share a pool.
#[derive(Debug, Clone)]
pub struct Prober {
    latency_client: Client,
    download_client: Client,
    release: String,
}

impl Prober {
    pub fn new(latency_timeout: Duration, release: impl Into<String>) -> SelectResult<Self> {
        Self::with_download_timeout(latency_timeout, DOWNLOAD_TIMEOUT, release)
    }

    pub fn with_download_timeout(
        latency_timeout: Duration,
        download_timeout: Duration,
        release: impl Into<String>,
    ) -> SelectResult<Self> {
        Ok(Self {
            latency_client: build_client(latency_timeout)?,
            download_client: build_client(download_timeout)?,
            release: release.into(),
        })
    }

    pub fn release(&self) -> &str {
        &self.release
    }

    /// HEAD the release file and record the round trip in whole milliseconds.
    /// Any non-success status invalidates the endpoint, since a mirror without
    /// `dists/<release>/Release` cannot serve the release.
    pub async fn probe_latency(&self, mut endpoint: Endpoint) -> Endpoint {
        let Some(target) = endpoint.release_url(&self.release) else {
            log_failure(&endpoint.to_string(), &ProbeFailure::NoAddress);
            endpoint.invalidate();
            return endpoint;
        };

        let start = Instant::now();
        let result = self.latency_client.head(target.clone()).send().await;
        let elapsed = start.elapsed();

        match result.and_then(|resp| resp.error_for_status()) {
            Ok(_) => {
                endpoint.record_latency(elapsed.as_millis() as i64);
                debug!("{:>3} ms {}", endpoint.latency_ms, endpoint.host());
            }
            Err(e) => {
                log_failure(target.as_str(), &ProbeFailure::from_reqwest(&e));
                endpoint.invalidate();
            }
        }
        endpoint
    }

    /// GET the release file and record bytes received and seconds taken
    pub async fn probe_download(&self, mut endpoint: Endpoint) -> Endpoint {
        let Some(target) = endpoint.release_url(&self.release) else {
            log_failure(&endpoint.to_string(), &ProbeFailure::NoAddress);
            endpoint.invalidate();
            return endpoint;
        };

        match self.fetch(&target).await {
            Ok((bytes, elapsed)) => {
                endpoint.record_transfer(bytes, elapsed.as_secs_f64());
                debug!(
                    "{} {}",
                    humanize_speed(endpoint.transferred_bytes, endpoint.elapsed_secs),
                    endpoint.host()
                );
            }
            Err(failure) => {
                log_failure(target.as_str(), &failure);
                endpoint.invalidate();
            }
        }
        endpoint
    }

    async fn fetch(&self, target: &Url) -> Result<(u64, Duration), ProbeFailure> {
        let start = Instant::now();
        let response = self
            .download_client
            .get(target.clone())
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .map_err(|e| ProbeFailure::from_reqwest(&e))?;
        let body = response
            .bytes()
            .await
            .map_err(|e| ProbeFailure::from_reqwest(&e))?;
        Ok((body.len() as u64, start.elapsed()))
    }
}

fn build_client(timeout: Duration) -> SelectResult<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!("mirrorselect/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| MirrorSelectError::Config {
            message: format!("failed to build HTTP client: {}", e),
        })
}

fn log_failure(target: &str, failure: &ProbeFailure) {
    if failure.is_expected() {
        debug!("{} {}", target, failure);
    } else {
        error!("{} failed: {}", target, failure);
    }
}
