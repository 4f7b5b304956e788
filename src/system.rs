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

//! Host facts: release codename, architecture, and country by public IP.

use crate::error::{MirrorSelectError, SelectResult};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

pub const LSB_RELEASE_PATH: &str = "/etc/lsb-release";
pub const OS_RELEASE_PATH: &str = "/etc/os-release";
pub const DEFAULT_GEOIP_URL: &str = "https://ident.me/json";

/// Debian architecture names accepted on the command line
pub const ARCHITECTURES: &[&str] = &["amd64", "i386", "arm64", "armhf", "ppc64el", "riscv64", "s390x"];

/// Architectures carried by the primary archive mirrors; the rest live on ports
pub const ARCHIVE_ARCHITECTURES: &[&str] = &["amd64", "i386"];

/// Read the distribution codename, preferring `DISTRIB_CODENAME` from
/// lsb-release and falling back to `VERSION_CODENAME` from os-release.
pub fn detect_release(lsb_release: &Path, os_release: &Path) -> SelectResult<String> {
    if let Some(codename) = read_key(lsb_release, "DISTRIB_CODENAME") {
        return Ok(codename);
    }
    if let Some(codename) = read_key(os_release, "VERSION_CODENAME") {
        return Ok(codename);
    }
    Err(MirrorSelectError::ReleaseDetection {
        message: format!(
            "no codename in {} or {}, pass --release",
            lsb_release.display(),
            os_release.display()
        ),
    })
}

fn read_key(path: &Path, key: &str) -> Option<String> {
    let content = fs::read_to_string(path).ok()?;
    let prefix = format!("{}=", key);
    content
        .lines()
        .filter_map(|line| line.trim().strip_prefix(prefix.as_str()))
        .map(|value| value.trim().trim_matches('"').trim_matches('\'').to_string())
        .find(|value| !value.is_empty())
}

/// Debian name for the architecture this binary was built for
pub fn host_arch() -> &'static str {
    match std::env::consts::ARCH {
        "x86_64" => "amd64",
        "x86" => "i386",
        "aarch64" => "arm64",
        "arm" => "armhf",
        "powerpc64" => "ppc64el",
        "riscv64" => "riscv64",
        "s390x" => "s390x",
        other => other,
    }
}

pub fn validate_arch(arch: &str) -> SelectResult<String> {
    let arch = arch.trim().to_lowercase();
    if ARCHITECTURES.contains(&arch.as_str()) {
        Ok(arch)
    } else {
        Err(MirrorSelectError::invalid_option("arch", arch))
    }
}

/// Two ASCII letters, uppercased
pub fn normalize_country(code: &str) -> SelectResult<String> {
    let code = code.trim();
    if code.len() == 2 && code.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(code.to_ascii_uppercase())
    } else {
        Err(MirrorSelectError::invalid_option("country", code))
    }
}

/// Subset of the ident.me JSON document
#[derive(Debug, Clone, Deserialize)]
pub struct GeoIp {
    pub ip: String,
    #[serde(rename = "cc")]
    pub country_code: String,
    #[serde(rename = "country", default)]
    pub country_name: String,
}

/// Look up the caller's country from its public IP
pub async fn lookup_country(url: &str) -> SelectResult<GeoIp> {
    debug!("Fetching geoIP data from {}", url);
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()
        .map_err(|e| geoip_error("failed to build HTTP client", e))?;

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| geoip_error("request failed", e))?;
    debug!("Response status: {}", response.status());
    if !response.status().is_success() {
        return Err(MirrorSelectError::GeoIp {
            message: format!("unexpected status {}", response.status()),
            source: None,
        });
    }

    let body = response
        .text()
        .await
        .map_err(|e| geoip_error("failed to read response", e))?;
    parse_geoip(&body)
}

fn parse_geoip(body: &str) -> SelectResult<GeoIp> {
    let mut geo: GeoIp = serde_json::from_str(body).map_err(|e| MirrorSelectError::GeoIp {
        message: format!("malformed response: {}", e),
        source: None,
    })?;
    geo.country_code = normalize_country(&geo.country_code).map_err(|_| MirrorSelectError::GeoIp {
        message: format!("response has no usable country code: '{}'", geo.country_code),
        source: None,
    })?;
    debug!("GeoIP data: {:?}", geo);
    Ok(geo)
}

fn geoip_error(context: &str, source: reqwest::Error) -> MirrorSelectError {
    MirrorSelectError::GeoIp {
        message: format!("{}: {}", context, source),
        source: Some(source),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn file_with(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_detect_release_from_lsb() {
        let lsb = file_with("DISTRIB_ID=Ubuntu\nDISTRIB_RELEASE=24.04\nDISTRIB_CODENAME=noble\n");
        let os = file_with("VERSION_CODENAME=jammy\n");
        assert_eq!(detect_release(lsb.path(), os.path()).unwrap(), "noble");
    }

    #[test]
    fn test_detect_release_falls_back_to_os_release() {
        let os = file_with("NAME=\"Ubuntu\"\nVERSION_CODENAME=\"jammy\"\n");
        let missing = Path::new("/nonexistent/lsb-release");
        assert_eq!(detect_release(missing, os.path()).unwrap(), "jammy");
    }

    #[test]
    fn test_detect_release_missing() {
        let lsb = file_with("DISTRIB_ID=Ubuntu\nDISTRIB_CODENAME=\n");
        let os = file_with("NAME=Debian\n");
        let err = detect_release(lsb.path(), os.path()).unwrap_err();
        assert!(matches!(err, MirrorSelectError::ReleaseDetection { .. }));
    }

    #[test]
    fn test_normalize_country() {
        assert_eq!(normalize_country("de").unwrap(), "DE");
        assert_eq!(normalize_country(" Us ").unwrap(), "US");
        assert!(normalize_country("USA").is_err());
        assert!(normalize_country("1A").is_err());
        assert!(normalize_country("").is_err());
    }

    #[test]
    fn test_validate_arch() {
        assert_eq!(validate_arch("ARM64").unwrap(), "arm64");
        assert!(validate_arch("x86_64").is_err());
    }

    #[test]
    fn test_parse_geoip() {
        let body = r#"{"ip":"203.0.113.7","aso":"Example","asn":"64496","continent":"EU","cc":"nl","country":"Netherlands","city":"Amsterdam","postal":"1000","latitude":"52.3","longitude":"4.9","tz":"Europe/Amsterdam"}"#;
        let geo = parse_geoip(body).unwrap();
        assert_eq!(geo.ip, "203.0.113.7");
        assert_eq!(geo.country_code, "NL");
        assert_eq!(geo.country_name, "Netherlands");
    }

    #[test]
    fn test_parse_geoip_rejects_bad_code() {
        assert!(parse_geoip(r#"{"ip":"203.0.113.7","cc":""}"#).is_err());
        assert!(parse_geoip("not json").is_err());
    }
}
