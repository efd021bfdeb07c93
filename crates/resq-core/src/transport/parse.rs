//! Parse raw header lines collected by curl into name/value pairs.

/// Keeps only the headers of the last response: with redirects followed, curl
/// reports one header block per hop, each starting with a status line.
pub(crate) fn parse_headers(lines: &[String]) -> Vec<(String, String)> {
    let mut headers = Vec::new();
    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with("HTTP/") {
            headers.clear();
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            headers.push((name.trim().to_string(), value.trim().to_string()));
        }
    }
    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_block() {
        let lines = [
            "HTTP/1.1 200 OK".to_string(),
            "Content-Type: text/plain".to_string(),
            "X-Request-Id: abc".to_string(),
            "".to_string(),
        ];
        let h = parse_headers(&lines);
        assert_eq!(
            h,
            vec![
                ("Content-Type".to_string(), "text/plain".to_string()),
                ("X-Request-Id".to_string(), "abc".to_string()),
            ]
        );
    }

    #[test]
    fn redirect_hops_are_dropped() {
        let lines = [
            "HTTP/1.1 302 Found".to_string(),
            "Location: /next".to_string(),
            "".to_string(),
            "HTTP/1.1 200 OK".to_string(),
            "Content-Length: 2".to_string(),
        ];
        let h = parse_headers(&lines);
        assert_eq!(h, vec![("Content-Length".to_string(), "2".to_string())]);
    }

    #[test]
    fn value_may_contain_colons() {
        let lines = ["Date: Wed, 21 Oct 2015 07:28:00 GMT".to_string()];
        let h = parse_headers(&lines);
        assert_eq!(h[0].1, "Wed, 21 Oct 2015 07:28:00 GMT");
    }
}
