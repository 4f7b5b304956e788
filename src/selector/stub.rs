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

//! In-process HTTP server standing in for an archive mirror in tests.

use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// Serve `body` at `/ubuntu/dists/<release>/Release` after `delay`; every
/// other path is a 404. Returns the mirror base URL.
pub async fn start_mirror(release: &str, body: Vec<u8>, delay: Duration) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let expected = Arc::new(format!("/ubuntu/dists/{}/Release", release));
    let body = Arc::new(body);

    tokio::spawn(async move {
        while let Ok((socket, _)) = listener.accept().await {
            let expected = expected.clone();
            let body = body.clone();
            tokio::spawn(async move {
                serve(socket, &expected, &body, delay).await;
            });
        }
    });

    format!("http://{}/ubuntu/", addr)
}

/// A base URL on a port nothing listens on
pub fn closed_mirror() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/ubuntu/", addr)
}

async fn serve(mut socket: TcpStream, expected: &str, body: &[u8], delay: Duration) {
    let mut buf = vec![0u8; 8192];
    let mut read = 0;
    loop {
        let n = match socket.read(&mut buf[read..]).await {
            Ok(0) | Err(_) => return,
            Ok(n) => n,
        };
        read += n;
        if buf[..read].windows(4).any(|w| w == b"\r\n\r\n") {
            break;
        }
        if read == buf.len() {
            return;
        }
    }

    let request = String::from_utf8_lossy(&buf[..read]).to_string();
    let mut parts = request.split_whitespace();
    let method = parts.next().unwrap_or("");
    let path = parts.next().unwrap_or("");

    tokio::time::sleep(delay).await;

    let (status, payload) = if path == expected {
        ("200 OK", body)
    } else {
        ("404 Not Found", &b""[..])
    };
    let mut response = format!(
        "HTTP/1.1 {}\r\nContent-Length: {}\r\nContent-Type: text/plain\r\nConnection: close\r\n\r\n",
        status,
        payload.len()
    )
    .into_bytes();
    if method != "HEAD" {
        response.extend_from_slice(payload);
    }
    let _ = socket.write_all(&response).await;
    let _ = socket.shutdown().await;
}
