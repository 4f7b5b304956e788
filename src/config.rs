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

//! Configuration management with validation and defaults.

use crate::discovery::DEFAULT_MIRROR_LIST_URL;
use crate::error::{MirrorSelectError, SelectResult};
use crate::mirror::Protocol;
use crate::system::{normalize_country, DEFAULT_GEOIP_URL, LSB_RELEASE_PATH};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Effective configuration after every layer is applied
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Country to select mirrors from; detected by IP when unset
    pub country: Option<String>,

    /// Required transfer protocol
    pub protocol: Protocol,

    /// Mirrors that go on to the throughput test
    pub max_mirrors: usize,

    /// Latency probe timeout in milliseconds
    pub timeout_ms: u64,

    /// Release codename; detected from the host when unset
    pub release: Option<String>,

    /// Debian architecture name; host architecture when unset
    pub arch: Option<String>,

    /// Concurrent latency probes
    pub latency_concurrency: usize,

    /// Concurrent throughput probes
    pub download_concurrency: usize,

    /// Page listing the archive mirrors
    pub mirror_list_url: String,

    /// JSON endpoint returning the caller's country
    pub geoip_url: String,

    pub lsb_release_path: PathBuf,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            country: None,
            protocol: Protocol::Any,
            max_mirrors: 5,
            timeout_ms: 500,
            release: None,
            arch: None,
            latency_concurrency: 32,
            download_concurrency: 5,
            mirror_list_url: DEFAULT_MIRROR_LIST_URL.to_string(),
            geoip_url: DEFAULT_GEOIP_URL.to_string(),
            lsb_release_path: PathBuf::from(LSB_RELEASE_PATH),
            logging: LoggingConfig::default(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingConfig {
    /// Verbosity (DEBUG, INFO, WARN, ERROR)
    pub level: String,

    /// Log file path (unset = stderr only)
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "INFO".to_string(),
            file: None,
        }
    }
}

/// One configuration file. Every key is optional; a key that is present
/// overrides the layers below it even when it repeats the built-in default.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    pub country: Option<String>,
    pub protocol: Option<Protocol>,
    pub max_mirrors: Option<usize>,
    pub timeout_ms: Option<u64>,
    pub release: Option<String>,
    pub arch: Option<String>,
    pub latency_concurrency: Option<usize>,
    pub download_concurrency: Option<usize>,
    pub mirror_list_url: Option<String>,
    pub geoip_url: Option<String>,
    pub lsb_release_path: Option<PathBuf>,
    #[serde(default)]
    pub logging: LoggingFile,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingFile {
    pub level: Option<String>,
    pub file: Option<PathBuf>,
}

/// Result of [`Config::load`]. Loading happens before logging is set up, so
/// problems with optional sources are handed back for the caller to log.
#[derive(Debug)]
pub struct LoadedConfig {
    pub config: Config,
    pub warnings: Vec<String>,
}

impl Config {
    /// Load configuration from multiple sources with precedence:
    /// 1. /etc/mirrorselect/config.toml (system-wide)
    /// 2. ~/.config/mirrorselect/config.toml (user)
    /// 3. `explicit`, when given
    /// 4. Environment variables (MIRRORSELECT_*)
    pub fn load(explicit: Option<&Path>) -> SelectResult<LoadedConfig> {
        let mut warnings = Vec::new();
        let mut config = Config::default();

        config = config.merge_file(Path::new("/etc/mirrorselect/config.toml"), &mut warnings);

        if let Some(config_dir) = dirs::config_dir() {
            config = config.merge_file(
                &config_dir.join("mirrorselect").join("config.toml"),
                &mut warnings,
            );
        }

        // An explicitly requested file must exist and parse
        if let Some(path) = explicit {
            config = config.merge(Self::from_file(path)?);
        }

        let config = config.apply_env_overrides(|key| std::env::var(key).ok(), &mut warnings);
        Ok(LoadedConfig { config, warnings })
    }

    /// Parse a single TOML file
    pub fn from_file(path: &Path) -> SelectResult<ConfigFile> {
        let content = fs::read_to_string(path).map_err(|e| MirrorSelectError::Config {
            message: format!("failed to read {}: {}", path.display(), e),
        })?;
        toml::from_str(&content).map_err(|e| MirrorSelectError::Config {
            message: format!("failed to parse {}: {}", path.display(), e),
        })
    }

    fn merge_file(self, path: &Path, warnings: &mut Vec<String>) -> Self {
        if !path.exists() {
            return self;
        }
        match Self::from_file(path) {
            Ok(file) => self.merge(file),
            Err(e) => {
                warnings.push(format!("ignoring {}", e));
                self
            }
        }
    }

    /// Merge a file layer over this one; every key the file sets wins
    fn merge(mut self, file: ConfigFile) -> Self {
        if let Some(country) = file.country {
            self.country = Some(country);
        }
        if let Some(protocol) = file.protocol {
            self.protocol = protocol;
        }
        if let Some(max) = file.max_mirrors {
            self.max_mirrors = max;
        }
        if let Some(timeout) = file.timeout_ms {
            self.timeout_ms = timeout;
        }
        if let Some(release) = file.release {
            self.release = Some(release);
        }
        if let Some(arch) = file.arch {
            self.arch = Some(arch);
        }
        if let Some(n) = file.latency_concurrency {
            self.latency_concurrency = n;
        }
        if let Some(n) = file.download_concurrency {
            self.download_concurrency = n;
        }
        if let Some(url) = file.mirror_list_url {
            self.mirror_list_url = url;
        }
        if let Some(url) = file.geoip_url {
            self.geoip_url = url;
        }
        if let Some(path) = file.lsb_release_path {
            self.lsb_release_path = path;
        }
        if let Some(level) = file.logging.level {
            self.logging.level = level;
        }
        if let Some(path) = file.logging.file {
            self.logging.file = Some(path);
        }

        self
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(
        mut self,
        var: impl Fn(&str) -> Option<String>,
        warnings: &mut Vec<String>,
    ) -> Self {
        if let Some(val) = var("MIRRORSELECT_COUNTRY") {
            self.country = Some(val);
        }

        if let Some(val) = var("MIRRORSELECT_PROTOCOL") {
            match val.parse() {
                Ok(protocol) => self.protocol = protocol,
                Err(e) => warnings.push(format!("ignoring MIRRORSELECT_PROTOCOL: {}", e)),
            }
        }

        if let Some(val) = var("MIRRORSELECT_MAX") {
            match val.parse() {
                Ok(n) => self.max_mirrors = n,
                Err(_) => warnings.push(format!("ignoring MIRRORSELECT_MAX: '{}' is not a count", val)),
            }
        }

        if let Some(val) = var("MIRRORSELECT_TIMEOUT_MS") {
            match val.parse() {
                Ok(n) => self.timeout_ms = n,
                Err(_) => warnings.push(format!(
                    "ignoring MIRRORSELECT_TIMEOUT_MS: '{}' is not a number of milliseconds",
                    val
                )),
            }
        }

        if let Some(val) = var("MIRRORSELECT_RELEASE") {
            self.release = Some(val);
        }

        if let Some(val) = var("MIRRORSELECT_LOG_LEVEL") {
            self.logging.level = val;
        }

        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> SelectResult<()> {
        let invalid = |message: &str| {
            Err(MirrorSelectError::Config {
                message: message.to_string(),
            })
        };

        if self.timeout_ms == 0 {
            return invalid("timeout_ms must be at least 1");
        }
        if self.latency_concurrency == 0 || self.download_concurrency == 0 {
            return invalid("concurrency must be at least 1");
        }
        if self.latency_concurrency > 256 || self.download_concurrency > 256 {
            return invalid("concurrency must be at most 256");
        }
        if let Some(country) = &self.country {
            normalize_country(country)?;
        }
        Ok(())
    }
}
