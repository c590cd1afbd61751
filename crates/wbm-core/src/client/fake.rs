//! In-memory transport for unit tests.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};

use super::{HttpResponse, Transport};
use crate::retry::FetchError;

/// Serves canned responses by exact URL and records every request.
/// Queued outcomes for a URL are consumed in order; the last one repeats.
#[derive(Default)]
pub(crate) struct FakeTransport {
    routes: RefCell<HashMap<String, VecDeque<Result<HttpResponse, FetchError>>>>,
    requests: RefCell<Vec<String>>,
}

impl FakeTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn respond(self, url: &str, status: u32, content_type: &str, body: &[u8]) -> Self {
        self.push(
            url,
            Ok(HttpResponse {
                status,
                content_type: Some(content_type.to_string()),
                body: body.to_vec(),
            }),
        );
        self
    }

    pub(crate) fn refuse(self, url: &str) -> Self {
        self.push(
            url,
            Err(FetchError::Io(std::io::Error::from(
                std::io::ErrorKind::ConnectionRefused,
            ))),
        );
        self
    }

    fn push(&self, url: &str, outcome: Result<HttpResponse, FetchError>) {
        self.routes
            .borrow_mut()
            .entry(url.to_string())
            .or_default()
            .push_back(outcome);
    }

    pub(crate) fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }
}

impl Transport for FakeTransport {
    fn get(&self, url: &str) -> Result<HttpResponse, FetchError> {
        self.requests.borrow_mut().push(url.to_string());
        let mut routes = self.routes.borrow_mut();
        let queue = match routes.get_mut(url) {
            Some(q) if !q.is_empty() => q,
            _ => {
                return Ok(HttpResponse {
                    status: 404,
                    content_type: Some("text/plain".to_string()),
                    body: b"not found".to_vec(),
                })
            }
        };
        if queue.len() > 1 {
            return queue.pop_front().unwrap();
        }
        match &queue[0] {
            Ok(r) => Ok(r.clone()),
            Err(FetchError::Io(e)) => Err(FetchError::Io(std::io::Error::from(e.kind()))),
            Err(FetchError::Curl(e)) => Err(FetchError::Curl(curl::Error::new(e.code()))),
        }
    }
}
