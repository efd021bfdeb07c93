//! Request client: rate limit → timed transport call → status check, with the
//! whole attempt wrapped in the retry executor.

mod spec;

use serde::Serialize;
use std::fmt;
use std::sync::Arc;

use crate::batch::{BatchResult, BatchScheduler};
use crate::config::ClientConfig;
use crate::rate_limit::RateLimiter;
use crate::retry::{ClassifiedError, ErrorKind, RetryExecutor};
use crate::transport::{CurlTransport, Method, Request, Response, Transport};

pub use spec::RequestSpec;

/// Resilient HTTP client. Cheap to clone; clones share the rate limiter and transport.
#[derive(Clone)]
pub struct RequestClient {
    config: Arc<ClientConfig>,
    transport: Arc<dyn Transport>,
    limiter: RateLimiter,
    retry: RetryExecutor,
}

impl fmt::Debug for RequestClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestClient")
            .field("config", &self.config)
            .field("limiter", &self.limiter)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl RequestClient {
    /// Validates `config` and builds a client over `transport`.
    pub fn new(config: ClientConfig, transport: Arc<dyn Transport>) -> anyhow::Result<Self> {
        config.validate()?;
        Ok(Self {
            limiter: config.rate_limiter(),
            retry: RetryExecutor::new(config.retry_policy()),
            config: Arc::new(config),
            transport,
        })
    }

    /// Client over a [`CurlTransport`] with default settings.
    pub fn with_curl(config: ClientConfig) -> anyhow::Result<Self> {
        Self::new(config, Arc::new(CurlTransport::new()))
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn rate_limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    /// Absolute `http(s)` targets pass through; anything else is appended to
    /// `base_url` with exactly one `/` between them.
    pub fn resolve(&self, target: &str) -> Result<String, ClassifiedError> {
        if let Ok(url) = url::Url::parse(target) {
            if matches!(url.scheme(), "http" | "https") {
                return Ok(url.into());
            }
        }
        let Some(base) = self.config.base_url.as_deref() else {
            return Err(ClassifiedError::new(
                ErrorKind::ClientFault,
                format!("relative target {:?} with no base_url configured", target),
            ));
        };
        let joined = if target.is_empty() {
            base.to_string()
        } else {
            format!(
                "{}/{}",
                base.trim_end_matches('/'),
                target.trim_start_matches('/')
            )
        };
        url::Url::parse(&joined).map(Into::into).map_err(|e| {
            ClassifiedError::new(ErrorKind::ClientFault, format!("invalid URL {:?}: {}", joined, e))
                .with_source(e)
        })
    }

    fn build_request(&self, target: &str, spec: RequestSpec) -> Result<Request, ClassifiedError> {
        let request = Request {
            method: spec.method,
            url: self.resolve(target)?,
            headers: spec::merge_headers(&self.config.headers, &spec.headers),
            body: spec.body,
            timeout: spec.timeout.unwrap_or_else(|| self.config.timeout()),
        };
        request.check_body()?;
        Ok(request)
    }

    /// One attempt: wait for the rate limiter, send with the timeout enforced,
    /// and turn a non-2xx status into a classified error.
    async fn attempt(&self, request: Request) -> Result<Response, ClassifiedError> {
        self.limiter.acquire().await;
        let timeout = request.timeout;
        let method = request.method;
        let url = request.url.clone();
        let response = match tokio::time::timeout(timeout, self.transport.send(request)).await {
            Ok(res) => res?,
            Err(_) => {
                return Err(ClassifiedError::timeout(format!(
                    "{} {} timed out after {}ms",
                    method,
                    url,
                    timeout.as_millis()
                )));
            }
        };
        if !response.is_success() {
            return Err(ClassifiedError::from_status(response.status, &response.text()));
        }
        Ok(response)
    }

    /// Performs `spec` against `target`, retrying transient failures.
    ///
    /// Every attempt, retries included, goes through the rate limiter.
    pub async fn call(&self, target: &str, spec: RequestSpec) -> Result<Response, ClassifiedError> {
        let request = self.build_request(target, spec)?;
        tracing::debug!(method = %request.method, url = %request.url, "call");
        self.retry.run(|| self.attempt(request.clone())).await
    }

    pub async fn get(&self, target: &str) -> Result<Response, ClassifiedError> {
        self.call(target, RequestSpec::get()).await
    }

    pub async fn post_json<T: Serialize + ?Sized>(
        &self,
        target: &str,
        body: &T,
    ) -> Result<Response, ClassifiedError> {
        self.call(target, json_spec(Method::Post, body)?).await
    }

    pub async fn put_json<T: Serialize + ?Sized>(
        &self,
        target: &str,
        body: &T,
    ) -> Result<Response, ClassifiedError> {
        self.call(target, json_spec(Method::Put, body)?).await
    }

    pub async fn delete(&self, target: &str) -> Result<Response, ClassifiedError> {
        self.call(target, RequestSpec::new(Method::Delete)).await
    }

    /// Runs many calls through the batch scheduler. Window size is `concurrency`
    /// or the configured default.
    pub async fn batch<I>(&self, requests: I, concurrency: Option<usize>) -> BatchResult<Response>
    where
        I: IntoIterator<Item = (String, RequestSpec)>,
    {
        let scheduler = BatchScheduler::new(concurrency.unwrap_or(self.config.concurrency));
        let client = self.clone();
        scheduler
            .run(requests, move |(target, spec): (String, RequestSpec)| {
                let client = client.clone();
                async move { client.call(&target, spec).await }
            })
            .await
    }
}

fn json_spec<T: Serialize + ?Sized>(method: Method, body: &T) -> Result<RequestSpec, ClassifiedError> {
    RequestSpec::new(method).with_json(body).map_err(|e| {
        ClassifiedError::new(ErrorKind::ClientFault, format!("serialize JSON body: {}", e))
            .with_source(e)
    })
}
