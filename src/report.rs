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

//! Rendering of the final ranking.

use crate::mirror::Endpoint;
use comfy_table::presets::UTF8_FULL;
use comfy_table::Table;

const SPEED_UNITS: &[&str] = &["b/s", "Kbps", "Mbps", "Gbps", "Tbps"];

/// Format `bytes` over `seconds` as a bit rate, scaling by 1024 per unit
pub fn humanize_speed(bytes: u64, seconds: f64) -> String {
    if seconds == 0.0 {
        return "0 b/s".to_string();
    }
    let mut speed = (bytes as f64 * 8.0) / seconds;
    let mut unit = SPEED_UNITS[0];
    for next in &SPEED_UNITS[1..] {
        if speed < 1024.0 {
            break;
        }
        speed /= 1024.0;
        unit = next;
    }
    format!("{:4.2} {}", speed, unit)
}

/// `N. <speed> <url>` per mirror
pub fn render_plain(mirrors: &[Endpoint]) -> String {
    mirrors
        .iter()
        .enumerate()
        .map(|(i, m)| {
            format!(
                "{}. {} {}\n",
                i + 1,
                humanize_speed(m.transferred_bytes, m.elapsed_secs),
                m
            )
        })
        .collect()
}

pub fn render_table(mirrors: &[Endpoint]) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["#", "country", "latency", "speed", "mirror"]);
    for (i, m) in mirrors.iter().enumerate() {
        table.add_row(vec![
            format!("{}", i + 1),
            m.country.clone().unwrap_or_else(|| "-".to_string()),
            format!("{} ms", m.latency_ms),
            humanize_speed(m.transferred_bytes, m.elapsed_secs),
            m.to_string(),
        ]);
    }
    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_mebibyte_per_second() {
        assert_eq!(humanize_speed(1_048_576, 1.0), "8.00 Mbps");
    }

    #[test]
    fn test_scaling_table() {
        assert_eq!(humanize_speed(0, 0.0), "0 b/s");
        assert_eq!(humanize_speed(100, 1.0), "800.00 b/s");
        assert_eq!(humanize_speed(128, 1.0), "1.00 Kbps");
        assert_eq!(humanize_speed(128 * 1024 * 1024 * 3, 1.0), "3.00 Gbps");
        assert_eq!(humanize_speed(128 * 1024 * 1024 * 1024, 1.0), "1.00 Tbps");
        // beyond the table stays in the top unit
        assert_eq!(
            humanize_speed(128 * 1024 * 1024 * 1024 * 2048, 1.0),
            "2048.00 Tbps"
        );
    }

    #[test]
    fn test_render_plain() {
        let mut m = Endpoint::parse("http://mirror.example/ubuntu/", None).unwrap();
        m.record_latency(30);
        m.record_transfer(1_048_576, 1.0);
        assert_eq!(
            render_plain(&[m]),
            "1. 8.00 Mbps http://mirror.example/ubuntu/\n"
        );
    }

    #[test]
    fn test_render_table_lists_every_mirror() {
        let mut a = Endpoint::parse("http://a.example/ubuntu/", Some("SE".to_string())).unwrap();
        a.record_latency(12);
        a.record_transfer(2048, 1.0);
        let b = Endpoint::parse("https://b.example/ubuntu/", None).unwrap();
        let out = render_table(&[a, b]);
        assert!(out.contains("http://a.example/ubuntu/"));
        assert!(out.contains("https://b.example/ubuntu/"));
        assert!(out.contains("12 ms"));
        assert!(out.contains("SE"));
        assert!(out.contains("16.00 Kbps"));
    }
}
