//! Per-call request description, before base URL and default headers apply.

use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;

use crate::transport::Method;

#[derive(Debug, Clone, Default)]
pub struct RequestSpec {
    pub method: Method,
    /// Merged over the client's default headers; a name here wins regardless of case.
    pub headers: BTreeMap<String, String>,
    pub body: Option<Vec<u8>>,
    /// Overrides the configured per-attempt timeout.
    pub timeout: Option<Duration>,
}

impl RequestSpec {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            ..Default::default()
        }
    }

    pub fn get() -> Self {
        Self::new(Method::Get)
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Serialize `value` as the body and set `Content-Type: application/json`.
    pub fn with_json<T: Serialize + ?Sized>(self, value: &T) -> serde_json::Result<Self> {
        let body = serde_json::to_vec(value)?;
        Ok(self
            .with_header("Content-Type", "application/json")
            .with_body(body))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Default headers overlaid with per-request headers (case-insensitive names).
pub(crate) fn merge_headers(
    defaults: &BTreeMap<String, String>,
    overrides: &BTreeMap<String, String>,
) -> BTreeMap<String, String> {
    let mut merged: BTreeMap<String, String> = defaults
        .iter()
        .filter(|(k, _)| !overrides.keys().any(|o| o.eq_ignore_ascii_case(k)))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    merged.extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_headers_win_case_insensitively() {
        let mut defaults = BTreeMap::new();
        defaults.insert("User-Agent".to_string(), "resq".to_string());
        defaults.insert("Accept".to_string(), "*/*".to_string());
        let mut overrides = BTreeMap::new();
        overrides.insert("accept".to_string(), "application/json".to_string());

        let merged = merge_headers(&defaults, &overrides);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged.get("User-Agent").map(String::as_str), Some("resq"));
        assert_eq!(merged.get("accept").map(String::as_str), Some("application/json"));
        assert!(!merged.contains_key("Accept"));
    }

    #[test]
    fn json_body_sets_content_type() {
        let spec = RequestSpec::new(Method::Post)
            .with_json(&serde_json::json!({"name": "x"}))
            .unwrap();
        assert_eq!(
            spec.headers.get("Content-Type").map(String::as_str),
            Some("application/json")
        );
        assert_eq!(spec.body.as_deref(), Some(br#"{"name":"x"}"#.as_slice()));
    }
}
