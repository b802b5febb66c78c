//! Minimal HTTP/1.1 server for integration tests.
//!
//! Routes by path:
//! - `/slow...` sleeps for `ServerOptions::slow_delay`, then answers 200.
//! - `/status/404` answers 404 with a body.
//! - `/redirect` answers 302 to `/` with a body.
//! - anything else answers 200 with `body of <path>`.
//!
//! Every response closes the connection.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone, Copy)]
pub struct ServerOptions {
    pub slow_delay: Duration,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            slow_delay: Duration::from_secs(5),
        }
    }
}

/// Starts a server in a background thread. Returns the base URL without a
/// trailing slash (e.g. "http://127.0.0.1:12345"). Runs until the process exits.
pub fn start() -> String {
    start_with_options(ServerOptions::default())
}

pub fn start_with_options(opts: ServerOptions) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            thread::spawn(move || handle(stream, opts));
        }
    });
    format!("http://127.0.0.1:{}", port)
}

/// Body served for a plain 200 route.
pub fn body_for(path: &str) -> String {
    format!("body of {}", path)
}

fn handle(mut stream: std::net::TcpStream, opts: ServerOptions) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) => return,
        Ok(n) => n,
        Err(_) => return,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s,
        Err(_) => return,
    };
    let (method, path) = parse_request_line(request);
    if !method.eq_ignore_ascii_case("GET") {
        let _ = stream.write_all(b"HTTP/1.1 405 Method Not Allowed\r\nContent-Length: 0\r\nConnection: close\r\n\r\n");
        return;
    }

    let (status, extra, body) = if path.starts_with("/slow") {
        thread::sleep(opts.slow_delay);
        ("200 OK", String::new(), body_for(path))
    } else if path == "/status/404" {
        ("404 Not Found", String::new(), format!("missing: {}", path))
    } else if path == "/redirect" {
        ("302 Found", "Location: /\r\n".to_string(), "moved".to_string())
    } else {
        ("200 OK", String::new(), body_for(path))
    };

    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: text/plain\r\nContent-Length: {}\r\n{}Connection: close\r\n\r\n{}",
        status,
        body.len(),
        extra,
        body
    );
    let _ = stream.write_all(response.as_bytes());
}

/// Returns (method, path) from the request line.
fn parse_request_line(request: &str) -> (&str, &str) {
    let line = request.lines().next().unwrap_or("");
    let mut parts = line.split_whitespace();
    let method = parts.next().unwrap_or("");
    let path = parts.next().unwrap_or("/");
    (method, path)
}
