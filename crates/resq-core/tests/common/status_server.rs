//! Minimal HTTP/1.1 server for integration tests.
//!
//! Routes:
//! - `/status/<code>`: respond with that status and a short body.
//! - `/flaky/<n>`: 503 for the first `n` hits of this server, then 200.
//! - `/slow/<ms>`: sleep, then 200.
//! - `/echo`: 200 with `<METHOD> <body>` as the body.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

pub struct StatusServer {
    pub base_url: String,
    hits: Arc<AtomicUsize>,
}

impl StatusServer {
    /// Total requests received so far.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

/// Starts the server on an ephemeral port. Runs until the process exits.
pub fn start() -> StatusServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&hits);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
            thread::spawn(move || handle(stream, n));
        }
    });
    StatusServer {
        base_url: format!("http://127.0.0.1:{}", port),
        hits,
    }
}

/// A URL on a port nothing listens on.
pub fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}/", port)
}

fn handle(mut stream: TcpStream, hit: usize) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(5)));
    let Some((method, path, body)) = read_request(&mut stream) else {
        return;
    };

    let (status, reply) = if let Some(code) = path.strip_prefix("/status/") {
        let code: u16 = code.parse().unwrap_or(500);
        (code, format!("status {}", code))
    } else if let Some(n) = path.strip_prefix("/flaky/") {
        let failures: usize = n.parse().unwrap_or(0);
        if hit <= failures {
            (503, "busy".to_string())
        } else {
            (200, "recovered".to_string())
        }
    } else if let Some(ms) = path.strip_prefix("/slow/") {
        thread::sleep(Duration::from_millis(ms.parse().unwrap_or(0)));
        (200, "slow".to_string())
    } else if path == "/echo" {
        (200, format!("{} {}", method, String::from_utf8_lossy(&body)))
    } else {
        (404, "no route".to_string())
    };

    let response = format!(
        "HTTP/1.1 {} X\r\nContent-Length: {}\r\nContent-Type: text/plain\r\nConnection: close\r\n\r\n{}",
        status,
        reply.len(),
        reply
    );
    let _ = stream.write_all(response.as_bytes());
}

/// Returns (method, path, body).
fn read_request(stream: &mut TcpStream) -> Option<(String, String, Vec<u8>)> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    let header_end = loop {
        let n = stream.read(&mut chunk).ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).into_owned();
    let mut lines = head.lines();
    let mut first = lines.next()?.split_whitespace();
    let method = first.next()?.to_string();
    let path = first.next()?.to_string();
    let content_length = lines
        .filter_map(|l| l.split_once(':'))
        .find(|(k, _)| k.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.trim().parse::<usize>().ok())
        .unwrap_or(0);

    let mut body = buf[header_end..].to_vec();
    while body.len() < content_length {
        let n = stream.read(&mut chunk).ok()?;
        if n == 0 {
            break;
        }
        body.extend_from_slice(&chunk[..n]);
    }
    Some((method, path, body))
}
