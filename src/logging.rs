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

//! Logging setup with tracing.

use crate::error::{MirrorSelectError, SelectResult};
use indicatif::MultiProgress;
use std::io::{self, Write};
use std::path::Path;
use std::sync::OnceLock;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static PROGRESS: OnceLock<MultiProgress> = OnceLock::new();

/// Progress bars on stderr. Register bars here so log lines can be
/// written between redraws.
pub fn progress() -> &'static MultiProgress {
    PROGRESS.get_or_init(MultiProgress::new)
}

/// Writer that hides the progress bars while a log line goes out
pub struct ProgressWriter<W> {
    inner: W,
}

impl<W: Write> ProgressWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }
}

impl<W: Write> Write for ProgressWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let inner = &mut self.inner;
        progress().suspend(|| inner.write(buf))
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        let inner = &mut self.inner;
        progress().suspend(|| inner.write_all(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

fn stderr_writer() -> ProgressWriter<io::Stderr> {
    ProgressWriter::new(io::stderr())
}

/// Map a verbosity token (DEBUG, INFO, WARN, ERROR) to a filter directive
pub fn parse_level(verbosity: &str) -> SelectResult<&'static str> {
    match verbosity.to_uppercase().as_str() {
        "DEBUG" => Ok("debug"),
        "INFO" => Ok("info"),
        "WARN" => Ok("warn"),
        "ERROR" => Ok("error"),
        _ => Err(MirrorSelectError::invalid_option("verbosity", verbosity)),
    }
}

/// Initialize logging to stderr at the given level
pub fn init_with_level(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(stderr_writer)
                .with_target(false)
                .compact(),
        )
        .init();
}

/// Initialize logging with optional file output
pub fn init_with_file(level: &str, log_file: Option<&Path>) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if let Some(path) = log_file {
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }

        if let Ok(file) = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
        {
            let file_layer = fmt::layer()
                .with_writer(file)
                .with_ansi(false)
                .with_target(true);

            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_writer(stderr_writer)
                        .with_target(false)
                        .compact(),
                )
                .with(file_layer)
                .init();

            return;
        }
    }

    init_with_level(level);
}

/// Span wrapping one pipeline stage
#[macro_export]
macro_rules! span_stage {
    ($name:expr, $count:expr) => {
        tracing::info_span!("stage", name = $name, candidates = $count)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("DEBUG").unwrap(), "debug");
        assert_eq!(parse_level("warn").unwrap(), "warn");
        assert_eq!(parse_level("Error").unwrap(), "error");
        assert!(parse_level("TRACE").is_err());
        assert!(parse_level("").is_err());
    }

    #[test]
    fn test_progress_writer_passes_lines_through() {
        let bar = progress().add(indicatif::ProgressBar::hidden());
        bar.inc(1);

        let mut writer = ProgressWriter::new(Vec::new());
        writer.write_all(b"WARN ignoring MIRRORSELECT_MAX\n").unwrap();
        write!(writer, "{} of {} endpoints still valid", 3, 4).unwrap();
        writer.flush().unwrap();

        progress().remove(&bar);
        assert_eq!(
            String::from_utf8(writer.inner).unwrap(),
            "WARN ignoring MIRRORSELECT_MAX\n3 of 4 endpoints still valid"
        );
    }
}
