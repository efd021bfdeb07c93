//! `resq batch <file>` – one request per line, run in windows.

use anyhow::{Context, Result};
use resq_core::{ClientConfig, Method, RequestClient, RequestSpec};
use std::path::Path;

/// Targets from a batch file: trimmed lines, skipping blanks and `#` comments.
pub(crate) fn parse_targets(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(str::to_string)
        .collect()
}

pub async fn run_batch_file(
    cfg: ClientConfig,
    file: &Path,
    concurrency: Option<usize>,
    method: Method,
) -> Result<i32> {
    let contents = std::fs::read_to_string(file)
        .with_context(|| format!("read batch file {}", file.display()))?;
    let targets = parse_targets(&contents);
    if targets.is_empty() {
        println!("No targets in {}.", file.display());
        return Ok(0);
    }

    let client = RequestClient::with_curl(cfg)?;
    let requests = targets
        .iter()
        .map(|t| (t.clone(), RequestSpec::new(method)));
    let result = client.batch(requests, concurrency).await;

    println!("{:<6} {:<8} {}", "INDEX", "RESULT", "TARGET");
    for (index, target) in targets.iter().enumerate() {
        let outcome = match (&result.results[index], result.error_for(index)) {
            (Some(resp), _) => format!("{}", resp.status),
            (None, Some(e)) => format!("error: {:#}", e),
            (None, None) => "-".to_string(),
        };
        println!("{:<6} {:<8} {}", index, outcome, target);
    }
    println!(
        "{} succeeded, {} failed of {}",
        result.succeeded(),
        result.failed(),
        result.len()
    );

    Ok(if result.is_complete() { 0 } else { 1 })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn targets_skip_blanks_and_comments() {
        let contents = "\n# header\n/users/1\n  /users/2  \n\n#/skipped\nhttps://x.test/a\n";
        assert_eq!(
            parse_targets(contents),
            vec!["/users/1", "/users/2", "https://x.test/a"]
        );
    }
}
