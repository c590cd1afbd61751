//! HTTP GET transport.
//!
//! The archive client only depends on the [`Transport`] trait; the curl
//! implementation is the one used in production.

use std::time::Duration;

use crate::retry::FetchError;

/// Raw response of one GET. Error statuses are data, not failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// Final status code after redirects.
    pub status: u32,
    /// `Content-Type` of the final response, if any.
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// True when the content type names JSON (`application/json`, with or
    /// without parameters).
    pub fn is_json(&self) -> bool {
        self.content_type
            .as_deref()
            .map(|ct| ct.to_ascii_lowercase().contains("application/json"))
            .unwrap_or(false)
    }
}

/// Performs a single GET attempt. Retrying is the caller's business.
pub trait Transport {
    fn get(&self, url: &str) -> Result<HttpResponse, FetchError>;
}

/// Options applied to every curl handle.
#[derive(Debug, Clone)]
pub struct CurlOptions {
    pub user_agent: String,
    /// Applied only when set; otherwise curl's default stands.
    pub connect_timeout: Option<Duration>,
    /// Print curl's request/response trace to stderr.
    pub verbose: bool,
}

/// libcurl-backed transport, one easy handle per request.
#[derive(Debug, Clone)]
pub struct CurlTransport {
    options: CurlOptions,
}

impl CurlTransport {
    pub fn new(options: CurlOptions) -> Self {
        Self { options }
    }
}

impl Transport for CurlTransport {
    /// Follows redirects (the archive redirects to the nearest capture).
    /// Runs in the current thread.
    fn get(&self, url: &str) -> Result<HttpResponse, FetchError> {
        let mut body: Vec<u8> = Vec::new();

        let mut easy = curl::easy::Easy::new();
        easy.url(url)?;
        easy.get(true)?;
        easy.follow_location(true)?;
        easy.max_redirections(10)?;
        easy.useragent(&self.options.user_agent)?;
        if let Some(timeout) = self.options.connect_timeout {
            easy.connect_timeout(timeout)?;
        }
        easy.verbose(self.options.verbose)?;

        {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        let status = easy.response_code()?;
        let content_type = easy.content_type()?.map(str::to_string);
        Ok(HttpResponse {
            status,
            content_type,
            body,
        })
    }
}
