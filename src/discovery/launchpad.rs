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

//! Launchpad archive mirror list scraper.

use super::{countries, MirrorSource, RawMirror};
use crate::error::{MirrorSelectError, SelectResult};
use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_MIRROR_LIST_URL: &str = "https://launchpad.net/ubuntu/+archivemirrors";

/// Anchor texts that mark a mirror access URL
const TRANSFER_PROTOCOLS: &[&str] = &["http", "https", "ftp", "rsync"];

/// Fetches and parses the Launchpad mirror table
pub struct LaunchpadSource {
    client: Client,
    url: String,
    parser: MirrorTableParser,
}

impl LaunchpadSource {
    pub fn new(url: impl Into<String>) -> SelectResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(concat!("mirrorselect/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| MirrorSelectError::Config {
                message: format!("failed to build HTTP client: {}", e),
            })?;
        Ok(Self {
            client,
            url: url.into(),
            parser: MirrorTableParser::new()?,
        })
    }
}

#[async_trait]
impl MirrorSource for LaunchpadSource {
    async fn discover(&self) -> SelectResult<Vec<RawMirror>> {
        debug!("Fetching mirror list from {}", self.url);
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .map_err(|e| MirrorSelectError::discovery(&self.url, e))?;
        let body = response
            .text()
            .await
            .map_err(|e| MirrorSelectError::discovery(&self.url, e))?;
        self.parser.parse(&body, &self.url)
    }
}

/// Parser state carried from one table row to the next
#[derive(Debug, Default)]
struct RowState {
    /// Country of the most recent header row
    country: Option<String>,
    mirrors: Vec<RawMirror>,
}

/// Regex-driven parser for `table#mirrors_list`
pub struct MirrorTableParser {
    table: Regex,
    row: Regex,
    country_header: Regex,
    anchor: Regex,
}

impl MirrorTableParser {
    pub fn new() -> SelectResult<Self> {
        Ok(Self {
            table: Regex::new(r#"(?s)<table[^>]*\bid="mirrors_list"[^>]*>(.*?)</table>"#)?,
            row: Regex::new(r"(?s)<tr\b[^>]*>(.*?)</tr>")?,
            country_header: Regex::new(r#"(?s)<th[^>]*\bcolspan="2"[^>]*>(.*?)</th>"#)?,
            anchor: Regex::new(r#"(?s)<a\b[^>]*\bhref="([^"]*)"[^>]*>(.*?)</a>"#)?,
        })
    }

    /// Rows are folded in document order; each mirror row inherits the
    /// country of the header row above it.
    pub fn parse(&self, html: &str, source_url: &str) -> SelectResult<Vec<RawMirror>> {
        let table = self
            .table
            .captures(html)
            .and_then(|c| c.get(1))
            .ok_or_else(|| MirrorSelectError::DiscoveryParse {
                url: source_url.to_string(),
                reason: "mirror table not found".to_string(),
            })?;

        let state = self
            .row
            .captures_iter(table.as_str())
            .filter_map(|c| c.get(1))
            .fold(RowState::default(), |state, row| self.step(state, row.as_str()));

        debug!("Parsed {} mirror URLs", state.mirrors.len());
        Ok(state.mirrors)
    }

    fn step(&self, mut state: RowState, row: &str) -> RowState {
        if let Some(header) = self.country_header.captures(row).and_then(|c| c.get(1)) {
            let name = decode_entities(&strip_tags(header.as_str()));
            state.country = match name.trim() {
                "" | "Total" => None,
                name => {
                    let code = countries::alpha2(name);
                    if code.is_none() {
                        warn!("Unknown country in mirror list: {}", name);
                    }
                    code.map(str::to_string)
                }
            };
            return state;
        }

        for link in self.anchor.captures_iter(row) {
            let text = strip_tags(&link[2]);
            if TRANSFER_PROTOCOLS.contains(&text.trim()) {
                state.mirrors.push(RawMirror {
                    url: decode_entities(&link[1]),
                    country: state.country.clone(),
                });
            }
        }
        state
    }
}

fn strip_tags(fragment: &str) -> String {
    let mut out = String::with_capacity(fragment.len());
    let mut in_tag = false;
    for ch in fragment.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            c if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&quot;", "\"")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&ocirc;", "ô")
        .replace("&eacute;", "é")
        .replace("&atilde;", "ã")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
<html><body>
<table class="listing" id="mirrors_list">
  <thead><tr><th>Mirror</th><th>Protocols</th><th>Speed</th><th>Status</th></tr></thead>
  <tbody>
    <tr class="head">
      <th colspan="2">Germany</th>
      <th>120 Gbps</th>
      <th></th>
    </tr>
    <tr>
      <td><a href="https://launchpad.net/ubuntu/+mirror/ftp.example.de">Example DE</a></td>
      <td>
        <a href="http://ftp.example.de/ubuntu/">http</a>
        <a href="https://ftp.example.de/ubuntu/">https</a>
        <a href="rsync://ftp.example.de/ubuntu/">rsync</a>
      </td>
      <td>10 Gbps</td>
      <td><span class="distromirrorstatusUP">Up to date</span></td>
    </tr>
    <tr class="head">
      <th colspan="2">C&ocirc;te d&#39;Ivoire</th>
      <th>1 Gbps</th>
      <th></th>
    </tr>
    <tr>
      <td><a href="https://launchpad.net/ubuntu/+mirror/ci">CI</a></td>
      <td><a href="http://mirror.example.ci/ubuntu/?a=1&amp;b=2">http</a></td>
      <td>1 Gbps</td>
      <td></td>
    </tr>
    <tr class="head">
      <th colspan="2">Atlantis</th>
      <th>1 Gbps</th>
      <th></th>
    </tr>
    <tr>
      <td><a href="https://launchpad.net/ubuntu/+mirror/atl">ATL</a></td>
      <td><a href="http://mirror.atlantis.example/ubuntu/">http</a></td>
      <td>1 Gbps</td>
      <td></td>
    </tr>
    <tr class="head">
      <th colspan="2">Total</th>
      <th>122 Gbps</th>
      <th></th>
    </tr>
  </tbody>
</table>
</body></html>
"#;

    #[test]
    fn test_parser_patterns_compile() {
        assert!(MirrorTableParser::new().is_ok());
        assert!(LaunchpadSource::new("https://launchpad.example/").is_ok());
    }

    #[test]
    fn test_parse_assigns_countries() {
        let parser = MirrorTableParser::new().unwrap();
        let mirrors = parser.parse(PAGE, "https://launchpad.example/").unwrap();

        let de: Vec<&str> = mirrors
            .iter()
            .filter(|m| m.country.as_deref() == Some("DE"))
            .map(|m| m.url.as_str())
            .collect();
        assert_eq!(
            de,
            vec![
                "http://ftp.example.de/ubuntu/",
                "https://ftp.example.de/ubuntu/",
                "rsync://ftp.example.de/ubuntu/",
            ]
        );

        let ci: Vec<&RawMirror> = mirrors
            .iter()
            .filter(|m| m.country.as_deref() == Some("CI"))
            .collect();
        assert_eq!(ci.len(), 1);
        assert_eq!(ci[0].url, "http://mirror.example.ci/ubuntu/?a=1&b=2");
    }

    #[test]
    fn test_parse_skips_mirror_page_links() {
        let parser = MirrorTableParser::new().unwrap();
        let mirrors = parser.parse(PAGE, "https://launchpad.example/").unwrap();
        assert!(mirrors.iter().all(|m| !m.url.contains("+mirror")));
    }

    #[test]
    fn test_unknown_country_is_untagged() {
        let parser = MirrorTableParser::new().unwrap();
        let mirrors = parser.parse(PAGE, "https://launchpad.example/").unwrap();
        let atlantis = mirrors
            .iter()
            .find(|m| m.url.contains("atlantis"))
            .unwrap();
        assert_eq!(atlantis.country, None);
    }

    #[test]
    fn test_parse_is_repeatable() {
        let parser = MirrorTableParser::new().unwrap();
        let first = parser.parse(PAGE, "u").unwrap();
        let second = parser.parse(PAGE, "u").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_missing_table_is_error() {
        let parser = MirrorTableParser::new().unwrap();
        let err = parser
            .parse("<html><body>maintenance</body></html>", "https://launchpad.example/")
            .unwrap_err();
        assert!(matches!(err, MirrorSelectError::DiscoveryParse { .. }));
    }

    #[test]
    fn test_strip_and_decode() {
        assert_eq!(strip_tags("<b>France</b>"), "France");
        assert_eq!(decode_entities("A &amp; B"), "A & B");
    }

    #[tokio::test]
    async fn test_unreachable_list_is_discovery_error() {
        let url = crate::selector::stub::closed_mirror();
        let source = LaunchpadSource::new(url).unwrap();
        let err = source.discover().await.unwrap_err();
        assert!(matches!(err, MirrorSelectError::Discovery { .. }));
    }
}
