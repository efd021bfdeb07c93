//! libcurl-backed transport: one `Easy` handle per request on the blocking pool.

use async_trait::async_trait;
use std::str;
use std::time::Duration;

use crate::retry::{classify_curl_error, ClassifiedError};

use super::parse::parse_headers;
use super::{Method, Request, Response, Transport};

const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(15);
const MAX_REDIRECTIONS: u32 = 10;

/// Transport that performs each request with a fresh curl `Easy` handle.
///
/// The request timeout is passed to curl as well, so an attempt abandoned by
/// the client's own timeout does not keep a blocking thread busy for long.
#[derive(Debug, Clone)]
pub struct CurlTransport {
    connect_timeout: Duration,
    follow_redirects: bool,
}

impl Default for CurlTransport {
    fn default() -> Self {
        Self {
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            follow_redirects: true,
        }
    }
}

impl CurlTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_follow_redirects(mut self, follow: bool) -> Self {
        self.follow_redirects = follow;
        self
    }
}

#[async_trait]
impl Transport for CurlTransport {
    async fn send(&self, request: Request) -> Result<Response, ClassifiedError> {
        let opts = self.clone();
        tokio::task::spawn_blocking(move || perform(&opts, &request))
            .await
            .map_err(|e| ClassifiedError::transient(format!("transport task join: {}", e)))?
    }
}

fn curl_error(e: curl::Error) -> ClassifiedError {
    ClassifiedError::new(classify_curl_error(&e), e.to_string()).with_source(e)
}

/// Runs in the current thread; the async entry point wraps it in `spawn_blocking`.
fn perform(opts: &CurlTransport, request: &Request) -> Result<Response, ClassifiedError> {
    request.check_body()?;
    let mut header_lines: Vec<String> = Vec::new();
    let mut body: Vec<u8> = Vec::new();

    let mut easy = curl::easy::Easy::new();
    easy.url(&request.url).map_err(curl_error)?;
    easy.follow_location(opts.follow_redirects).map_err(curl_error)?;
    easy.max_redirections(MAX_REDIRECTIONS).map_err(curl_error)?;
    easy.connect_timeout(opts.connect_timeout.min(request.timeout))
        .map_err(curl_error)?;
    easy.timeout(request.timeout).map_err(curl_error)?;

    if let Some(payload) = &request.body {
        easy.post(true).map_err(curl_error)?;
        easy.post_fields_copy(payload).map_err(curl_error)?;
    }
    // GET and HEAD never carry a body here (checked above).
    match request.method {
        Method::Get => easy.get(true).map_err(curl_error)?,
        Method::Post if request.body.is_none() => {
            easy.post(true).map_err(curl_error)?;
            easy.post_field_size(0).map_err(curl_error)?;
        }
        Method::Post => {}
        Method::Head => easy.nobody(true).map_err(curl_error)?,
        other => easy.custom_request(other.as_str()).map_err(curl_error)?,
    }

    let mut list = curl::easy::List::new();
    for (k, v) in &request.headers {
        list.append(&format!("{}: {}", k.trim(), v.trim()))
            .map_err(curl_error)?;
    }
    if !request.headers.is_empty() {
        easy.http_headers(list).map_err(curl_error)?;
    }

    {
        let mut transfer = easy.transfer();
        transfer
            .header_function(|data| {
                if let Ok(s) = str::from_utf8(data) {
                    header_lines.push(s.trim_end().to_string());
                }
                true
            })
            .map_err(curl_error)?;
        transfer
            .write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })
            .map_err(curl_error)?;
        transfer.perform().map_err(curl_error)?;
    }

    let code = easy.response_code().map_err(curl_error)?;
    let status = u16::try_from(code)
        .map_err(|_| ClassifiedError::transient(format!("invalid HTTP status {}", code)))?;

    tracing::debug!(method = %request.method, url = %request.url, status, "transport exchange done");

    Ok(Response {
        status,
        headers: parse_headers(&header_lines),
        body,
    })
}
