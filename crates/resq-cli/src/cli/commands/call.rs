//! `resq call <target>` – one request through the client.

use anyhow::Result;
use resq_core::{ClientConfig, Method, RequestClient, RequestSpec};

pub async fn run_call(
    cfg: ClientConfig,
    target: &str,
    method: Method,
    headers: &[(String, String)],
    data: Option<&str>,
) -> Result<i32> {
    let client = RequestClient::with_curl(cfg)?;
    let mut spec = RequestSpec::new(method);
    for (name, value) in headers {
        spec = spec.with_header(name.clone(), value.clone());
    }
    if let Some(body) = data {
        spec = spec.with_body(body);
    }

    match client.call(target, spec).await {
        Ok(resp) => {
            println!("HTTP {}", resp.status);
            print!("{}", resp.text());
            Ok(0)
        }
        Err(e) => {
            tracing::warn!(kind = %e.kind(), status = ?e.status(), "call failed: {}", e);
            eprintln!("{} {} failed ({}): {}", method, target, e.kind(), e);
            Ok(1)
        }
    }
}
