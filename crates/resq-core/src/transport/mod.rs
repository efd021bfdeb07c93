//! Transport boundary: one HTTP exchange, no retries, no rate limiting.
//!
//! Implementations classify their own failures (network → transient, timed
//! out → timeout) so the retry layer only ever sees [`ClassifiedError`].

mod easy;
mod parse;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use crate::retry::ClassifiedError;

pub use easy::CurlTransport;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
}

impl Method {
    /// GET and HEAD requests are sent without a body.
    pub fn allows_body(self) -> bool {
        !matches!(self, Method::Get | Method::Head)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
            Method::Head => "HEAD",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Method {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "PATCH" => Ok(Method::Patch),
            "DELETE" => Ok(Method::Delete),
            "HEAD" => Ok(Method::Head),
            other => Err(format!("unsupported HTTP method: {}", other)),
        }
    }
}

/// A fully resolved request handed to a transport.
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub url: String,
    pub headers: BTreeMap<String, String>,
    pub body: Option<Vec<u8>>,
    /// Upper bound for the whole exchange.
    pub timeout: Duration,
}

impl Request {
    /// Refuses a body on a method that cannot send one.
    pub fn check_body(&self) -> Result<(), ClassifiedError> {
        if self.body.is_some() && !self.method.allows_body() {
            return Err(ClassifiedError::new(
                crate::retry::ErrorKind::ClientFault,
                format!("{} request cannot carry a body", self.method),
            ));
        }
        Ok(())
    }
}

/// Response as received; any status, including non-2xx.
#[derive(Debug, Clone, Default)]
pub struct Response {
    pub status: u16,
    /// Header lines of the final response in arrival order.
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Response {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// First header with the given name (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Body as UTF-8, lossily.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_slice(&self.body)
    }
}

/// Performs a single HTTP exchange.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: Request) -> Result<Response, ClassifiedError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_parse_is_case_insensitive() {
        assert_eq!("get".parse::<Method>().unwrap(), Method::Get);
        assert_eq!("Patch".parse::<Method>().unwrap(), Method::Patch);
        assert!("TRACE".parse::<Method>().is_err());
    }

    #[test]
    fn response_helpers() {
        let resp = Response {
            status: 201,
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            body: br#"{"id":42}"#.to_vec(),
        };
        assert!(resp.is_success());
        assert_eq!(resp.header("content-type"), Some("application/json"));
        let v: serde_json::Value = resp.json().unwrap();
        assert_eq!(v["id"], 42);
        assert!(!Response { status: 404, ..Default::default() }.is_success());
    }
}
