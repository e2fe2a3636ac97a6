//! Minimal HTTP/1.1 server that answers PROPFIND and GET for integration tests.
//!
//! PROPFIND on any path returns the configured multistatus body; GET returns
//! the bytes registered for that path, or 404. Every request is recorded.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct DavServerOptions {
    /// Status for PROPFIND responses (207 by default).
    pub listing_status: u16,
    /// If set, every GET answers with this status and no body.
    pub get_status: Option<u16>,
    /// If set, requests whose `Authorization` differs get 401.
    pub expected_auth: Option<String>,
    /// Sleep before answering (simulates a slow server).
    pub delay: Option<Duration>,
}

impl Default for DavServerOptions {
    fn default() -> Self {
        Self {
            listing_status: 207,
            get_status: None,
            expected_auth: None,
            delay: None,
        }
    }
}

#[derive(Clone)]
pub struct DavServer {
    /// e.g. "http://127.0.0.1:12345" (no trailing slash).
    pub base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl DavServer {
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn count(&self, method: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.method.eq_ignore_ascii_case(method))
            .count()
    }
}

struct Routes {
    listing: String,
    files: HashMap<String, Vec<u8>>,
    opts: DavServerOptions,
}

pub fn start(listing: String, files: HashMap<String, Vec<u8>>) -> DavServer {
    start_with_options(listing, files, DavServerOptions::default())
}

/// Starts the server in a background thread. It runs until the process exits.
pub fn start_with_options(
    listing: String,
    files: HashMap<String, Vec<u8>>,
    opts: DavServerOptions,
) -> DavServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let routes = Arc::new(Routes {
        listing,
        files,
        opts,
    });
    let requests = Arc::new(Mutex::new(Vec::new()));
    let recorded = Arc::clone(&requests);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let routes = Arc::clone(&routes);
            let recorded = Arc::clone(&recorded);
            thread::spawn(move || handle(stream, &routes, &recorded));
        }
    });
    DavServer {
        base_url: format!("http://127.0.0.1:{}", port),
        requests,
    }
}

fn handle(mut stream: TcpStream, routes: &Routes, recorded: &Mutex<Vec<RecordedRequest>>) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(5)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(5)));
    let request = match read_request(&mut stream) {
        Some(r) => r,
        None => return,
    };
    recorded.lock().unwrap().push(request.clone());

    if let Some(delay) = routes.opts.delay {
        thread::sleep(delay);
    }

    if let Some(expected) = &routes.opts.expected_auth {
        if request.header("authorization") != Some(expected.as_str()) {
            respond(&mut stream, 401, "text/plain", b"unauthorized");
            return;
        }
    }

    match request.method.as_str() {
        "PROPFIND" => {
            let status = routes.opts.listing_status;
            let body = if (200..300).contains(&status) {
                routes.listing.as_bytes()
            } else {
                b"".as_slice()
            };
            respond(&mut stream, status, "application/xml; charset=utf-8", body);
        }
        "GET" => {
            if let Some(status) = routes.opts.get_status {
                respond(&mut stream, status, "text/plain", b"");
                return;
            }
            match routes.files.get(&request.path) {
                Some(bytes) => respond(&mut stream, 200, "application/octet-stream", bytes),
                None => respond(&mut stream, 404, "text/plain", b"not found"),
            }
        }
        _ => respond(&mut stream, 405, "text/plain", b""),
    }
}

fn respond(stream: &mut TcpStream, status: u16, content_type: &str, body: &[u8]) {
    let head = format!(
        "HTTP/1.1 {} X\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status,
        content_type,
        body.len()
    );
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(body);
    let _ = stream.flush();
}

/// Reads head and (Content-Length) body of one request.
fn read_request(stream: &mut TcpStream) -> Option<RecordedRequest> {
    let mut data = Vec::new();
    let mut buf = [0u8; 8192];
    let head_end = loop {
        if let Some(pos) = find(&data, b"\r\n\r\n") {
            break pos;
        }
        let n = stream.read(&mut buf).ok()?;
        if n == 0 {
            return None;
        }
        data.extend_from_slice(&buf[..n]);
    };

    let head = std::str::from_utf8(&data[..head_end]).ok()?.to_string();
    let mut lines = head.lines();
    let mut request_line = lines.next()?.split_whitespace();
    let method = request_line.next()?.to_string();
    let path = request_line.next()?.to_string();
    let headers: Vec<(String, String)> = lines
        .filter_map(|l| l.split_once(':'))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .collect();

    let content_length = headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.parse::<usize>().ok())
        .unwrap_or(0);
    let mut body = data[head_end + 4..].to_vec();
    while body.len() < content_length {
        let n = stream.read(&mut buf).ok()?;
        if n == 0 {
            break;
        }
        body.extend_from_slice(&buf[..n]);
    }

    Some(RecordedRequest {
        method,
        path,
        headers,
        body,
    })
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}
