//! Minimal HTTP/1.1 server for integration tests.
//!
//! Serves a fixed path → body map over GET. Unknown paths get 404. When a
//! bearer token is required, requests without it get 401.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;

#[derive(Debug, Clone, Default)]
pub struct FileServerOptions {
    /// When set, every GET must carry `Authorization: Bearer <token>`.
    pub required_bearer: Option<String>,
}

/// Starts a server in a background thread serving `files` (keys are request
/// paths with a leading `/`). Returns the base URL without a trailing slash,
/// e.g. "http://127.0.0.1:12345". The server runs until the process exits.
pub fn start(files: HashMap<String, Vec<u8>>) -> String {
    start_with_options(files, FileServerOptions::default())
}

/// Like `start` but allows customizing server behavior (required token).
pub fn start_with_options(files: HashMap<String, Vec<u8>>, opts: FileServerOptions) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let files = Arc::new(files);
    let opts = Arc::new(opts);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let files = Arc::clone(&files);
            let opts = Arc::clone(&opts);
            thread::spawn(move || handle(stream, &files, &opts));
        }
    });
    format!("http://127.0.0.1:{}", port)
}

fn handle(mut stream: TcpStream, files: &HashMap<String, Vec<u8>>, opts: &FileServerOptions) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));
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
    let (method, path, bearer) = parse_request(request);
    if !method.eq_ignore_ascii_case("GET") {
        let _ = stream.write_all(b"HTTP/1.1 405 Method Not Allowed\r\nContent-Length: 0\r\n\r\n");
        return;
    }
    if let Some(required) = &opts.required_bearer {
        if bearer.as_deref() != Some(required.as_str()) {
            let _ = write_response(&mut stream, "401 Unauthorized", b"unauthorized");
            return;
        }
    }
    match files.get(path) {
        Some(body) => {
            let _ = write_response(&mut stream, "200 OK", body);
        }
        None => {
            let _ = write_response(&mut stream, "404 Not Found", b"not found");
        }
    }
}

fn write_response(stream: &mut TcpStream, status: &str, body: &[u8]) -> std::io::Result<()> {
    let header = format!(
        "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status,
        body.len()
    );
    stream.write_all(header.as_bytes())?;
    stream.write_all(body)
}

/// Returns (method, path, bearer token from the Authorization header).
fn parse_request(request: &str) -> (&str, &str, Option<String>) {
    let mut lines = request.lines();
    let request_line = lines.next().unwrap_or("");
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or("");
    let path = parts.next().unwrap_or("/");
    let mut bearer = None;
    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("authorization") {
                let value = value.trim();
                if let Some(token) = value.strip_prefix("Bearer ") {
                    bearer = Some(token.trim().to_string());
                }
            }
        }
    }
    (method, path, bearer)
}
