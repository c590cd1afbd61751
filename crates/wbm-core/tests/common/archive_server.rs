//! Minimal HTTP/1.1 server standing in for the archive in integration tests.
//!
//! Serves canned responses keyed by request path (query string ignored) and
//! records every request target it sees, query included. Unknown paths get
//! a 404.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Route {
    pub status: u32,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

#[derive(Default)]
pub struct Routes(HashMap<String, Route>);

impl Routes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(mut self, path: &str, status: u32, content_type: &'static str, body: &[u8]) -> Self {
        self.0.insert(
            path.to_string(),
            Route {
                status,
                content_type,
                body: body.to_vec(),
            },
        );
        self
    }
}

pub struct ArchiveServer {
    /// Base URL without trailing slash, e.g. `http://127.0.0.1:12345`.
    pub base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl ArchiveServer {
    /// Request targets received so far, in arrival order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

/// Starts the server on an ephemeral port in a background thread. It runs
/// until the process exits.
pub fn start(routes: Routes) -> ArchiveServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let routes = Arc::new(routes.0);
    let requests = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&requests);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let routes = Arc::clone(&routes);
            let log = Arc::clone(&log);
            thread::spawn(move || handle(stream, &routes, &log));
        }
    });
    ArchiveServer {
        base_url: format!("http://127.0.0.1:{}", port),
        requests,
    }
}

/// A port nothing listens on (bound, then released).
pub fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}

fn handle(mut stream: TcpStream, routes: &HashMap<String, Route>, log: &Mutex<Vec<String>>) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));

    let mut head = Vec::new();
    let mut buf = [0u8; 4096];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut buf) {
            Ok(0) | Err(_) => return,
            Ok(n) => head.extend_from_slice(&buf[..n]),
        }
    }
    let request = String::from_utf8_lossy(&head);
    let target = match request.lines().next().and_then(|l| l.split_whitespace().nth(1)) {
        Some(t) => t.to_string(),
        None => return,
    };
    log.lock().unwrap().push(target.clone());

    let path = target.split('?').next().unwrap_or("");
    let (status, content_type, body) = match routes.get(path) {
        Some(r) => (r.status, r.content_type, r.body.as_slice()),
        None => (404, "text/plain", &b"not found"[..]),
    };
    let reason = match status {
        200 => "OK",
        404 => "Not Found",
        _ => "Status",
    };
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status,
        reason,
        content_type,
        body.len()
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.write_all(body);
}
