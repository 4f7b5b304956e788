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

//! Latency truncation and final speed ordering.

use crate::mirror::{by_latency, by_speed, Endpoint};

/// Keep the `n` lowest-latency endpoints. Input must already exclude invalid
/// endpoints. The sort is stable, so equal latencies keep their input order.
pub fn top_n_by_latency(mut endpoints: Vec<Endpoint>, n: usize) -> Vec<Endpoint> {
    endpoints.sort_by(by_latency);
    endpoints.truncate(n);
    endpoints
}

/// Order by effective speed, fastest first
pub fn rank_by_speed(mut endpoints: Vec<Endpoint>) -> Vec<Endpoint> {
    endpoints.sort_by(by_speed);
    endpoints
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_latency(host: &str, latency_ms: i64) -> Endpoint {
        let mut e = Endpoint::parse(&format!("http://{}/ubuntu/", host), None).unwrap();
        e.record_latency(latency_ms);
        e
    }

    fn with_transfer(host: &str, bytes: u64, secs: f64) -> Endpoint {
        let mut e = Endpoint::parse(&format!("http://{}/ubuntu/", host), None).unwrap();
        e.record_transfer(bytes, secs);
        e
    }

    #[test]
    fn test_top_two_of_four() {
        let input = vec![
            with_latency("a", 120),
            with_latency("b", 40),
            with_latency("c", 300),
            with_latency("d", 40),
        ];
        let top = top_n_by_latency(input, 2);
        assert_eq!(top.len(), 2);
        assert!(top.iter().all(|e| e.latency_ms == 40));
        // stable: b came before d
        assert_eq!(top[0].host(), "b");
        assert_eq!(top[1].host(), "d");
    }

    #[test]
    fn test_top_n_sorted_and_bounded() {
        let latencies = [7, 3, 99, 3, 15, 0, 42];
        let input: Vec<Endpoint> = latencies
            .iter()
            .enumerate()
            .map(|(i, l)| with_latency(&format!("m{}", i), *l))
            .collect();

        for n in 0..10 {
            let top = top_n_by_latency(input.clone(), n);
            assert_eq!(top.len(), n.min(input.len()));
            assert!(top.windows(2).all(|w| w[0].latency_ms <= w[1].latency_ms));
        }
    }

    #[test]
    fn test_top_zero_is_empty() {
        let input = vec![with_latency("a", 1)];
        assert!(top_n_by_latency(input, 0).is_empty());
        assert!(top_n_by_latency(Vec::new(), 5).is_empty());
    }

    #[test]
    fn test_rank_by_speed() {
        let mut dead = with_transfer("dead", 10_000_000, 1.0);
        dead.invalidate();
        let input = vec![
            with_transfer("slow", 1000, 2.0),
            dead,
            with_transfer("instant", 5000, 0.0),
            with_transfer("fast", 1_048_576, 1.0),
            with_transfer("mid", 1000, 1.0),
        ];
        let ranked = rank_by_speed(input);
        let hosts: Vec<&str> = ranked.iter().map(|e| e.host()).collect();
        assert_eq!(&hosts[..3], &["fast", "mid", "slow"]);
        // unmeasured and invalid trail
        assert!(hosts[3..].contains(&"dead"));
        assert!(hosts[3..].contains(&"instant"));

        let speeds: Vec<f64> = ranked[..3].iter().map(|e| e.bits_per_second()).collect();
        assert!(speeds.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_rank_by_speed_is_idempotent() {
        let input = vec![
            with_transfer("a", 300, 1.0),
            with_transfer("b", 900, 1.0),
            with_transfer("c", 300, 1.0),
            with_transfer("d", 100, 0.5),
        ];
        let once = rank_by_speed(input);
        let twice = rank_by_speed(once.clone());
        assert_eq!(once, twice);
    }
}
