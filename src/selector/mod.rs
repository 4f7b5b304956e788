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

//! Mirror evaluation pipeline: filter, probe latency, shortlist, probe
//! throughput, rank.

mod filter;
mod probe;
mod rank;
#[cfg(test)]
pub(crate) mod stub;

pub use probe::{Prober, DOWNLOAD_TIMEOUT};

use crate::discovery::{MirrorSource, RawMirror};
use crate::error::SelectResult;
use crate::mirror::{Endpoint, Protocol};
use crate::logging;
use crate::span_stage;
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, Instrument};

/// Knobs for one selection run
#[derive(Debug, Clone)]
pub struct SelectOptions {
    /// Uppercase ISO 3166-1 alpha-2 code
    pub country: String,
    pub protocol: Protocol,
    /// How many low-latency mirrors go on to the throughput probe
    pub max_mirrors: usize,
    /// Concurrent HEAD probes
    pub latency_concurrency: usize,
    /// Concurrent GET probes, kept low so transfers do not compete
    pub download_concurrency: usize,
    pub show_progress: bool,
}

impl Default for SelectOptions {
    fn default() -> Self {
        Self {
            country: String::new(),
            protocol: Protocol::Any,
            max_mirrors: 5,
            latency_concurrency: 32,
            download_concurrency: 5,
            show_progress: false,
        }
    }
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionStatus {
    /// At least one mirror was measured
    Selected,
    /// Discovery and filtering left nothing to test
    NoCandidates,
    /// Candidates existed but none survived probing
    NoneResponded,
}

/// Final ranked mirrors, fastest first
#[derive(Debug, Clone)]
pub struct Selection {
    pub status: SelectionStatus,
    pub mirrors: Vec<Endpoint>,
}

impl Selection {
    fn empty(status: SelectionStatus) -> Self {
        Self {
            status,
            mirrors: Vec::new(),
        }
    }
}

/// Drives the pipeline. Each stage takes the working set by value and hands
/// back a new one.
pub struct Selector {
    prober: Prober,
    options: SelectOptions,
}

impl Selector {
    pub fn new(prober: Prober, options: SelectOptions) -> Self {
        Self { prober, options }
    }

    /// Discover and evaluate. Only a discovery failure is an error.
    pub async fn run(&self, source: &dyn MirrorSource) -> SelectResult<Selection> {
        let raw = source.discover().await?;
        info!("Discovered {} mirror entries", raw.len());
        Ok(self.evaluate(raw).await)
    }

    /// Evaluate already-discovered mirrors
    pub async fn evaluate(&self, raw: Vec<RawMirror>) -> Selection {
        let candidates = filter::accept_candidates(raw, &self.options.country);
        let candidates = filter::by_protocol(candidates, self.options.protocol);
        if candidates.is_empty() {
            info!(
                "No {} mirrors found for country {}",
                self.options.protocol, self.options.country
            );
            return Selection::empty(SelectionStatus::NoCandidates);
        }

        info!("Testing {} mirrors", candidates.len());
        let probed = self.probe_latencies(candidates).await;
        let responsive = filter::drop_invalid(probed);
        let shortlist = rank::top_n_by_latency(responsive, self.options.max_mirrors);
        if shortlist.is_empty() {
            return Selection::empty(SelectionStatus::NoneResponded);
        }

        info!(
            "Measuring throughput on {} mirrors for {}",
            shortlist.len(),
            self.prober.release()
        );
        let measured = self.probe_downloads(shortlist).await;
        let ranked = rank::rank_by_speed(filter::drop_invalid(measured));

        let status = if ranked.is_empty() {
            SelectionStatus::NoneResponded
        } else {
            SelectionStatus::Selected
        };
        Selection {
            status,
            mirrors: ranked,
        }
    }

    // `buffered` yields in input order, so the stable latency sort breaks
    // ties by discovery order rather than by which probe finished first.
    async fn probe_latencies(&self, endpoints: Vec<Endpoint>) -> Vec<Endpoint> {
        let total = endpoints.len();
        let pb = self.progress(total, "latency");
        let prober = &self.prober;

        let probed = stream::iter(endpoints)
            .map(|endpoint| {
                let pb = pb.clone();
                async move {
                    let endpoint = prober.probe_latency(endpoint).await;
                    pb.inc(1);
                    endpoint
                }
            })
            .buffered(self.options.latency_concurrency.max(1))
            .collect::<Vec<_>>()
            .instrument(span_stage!("latency", total))
            .await;

        pb.finish_and_clear();
        logging::progress().remove(&pb);
        probed
    }

    async fn probe_downloads(&self, endpoints: Vec<Endpoint>) -> Vec<Endpoint> {
        let total = endpoints.len();
        let pb = self.progress(total, "speed  ");
        let prober = &self.prober;

        let measured = stream::iter(endpoints)
            .map(|endpoint| {
                let pb = pb.clone();
                async move {
                    let endpoint = prober.probe_download(endpoint).await;
                    pb.inc(1);
                    endpoint
                }
            })
            .buffered(self.options.download_concurrency.max(1))
            .collect::<Vec<_>>()
            .instrument(span_stage!("throughput", total))
            .await;

        pb.finish_and_clear();
        logging::progress().remove(&pb);
        measured
    }

    fn progress(&self, len: usize, label: &str) -> ProgressBar {
        if !self.options.show_progress {
            return ProgressBar::hidden();
        }
        let pb = logging::progress().add(ProgressBar::new(len as u64));
        let template = format!(
            "{{spinner:.green}} [{}] [{{bar:40.cyan/blue}}] {{pos}}/{{len}} ({{eta}})",
            label
        );
        if let Ok(style) = ProgressStyle::default_bar().template(&template) {
            pb.set_style(style.progress_chars("#>-"));
        }
        pb
    }
}
