//! Parse raw response header lines into name/value pairs.

/// Collects `Name: value` pairs from header lines captured during a transfer.
///
/// libcurl reports the headers of every response it sees (redirects,
/// `100 Continue`), so a new status line starts a fresh block and only the
/// final response's headers are kept.
pub(crate) fn parse_header_lines(lines: &[String]) -> Vec<(String, String)> {
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

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parse_simple_block() {
        let h = parse_header_lines(&lines(&[
            "HTTP/1.1 429 Too Many Requests",
            "Retry-After: 3",
            "Content-Type: application/json",
            "",
        ]));
        assert_eq!(h.len(), 2);
        assert_eq!(h[0], ("Retry-After".to_string(), "3".to_string()));
    }

    #[test]
    fn last_status_block_wins() {
        let h = parse_header_lines(&lines(&[
            "HTTP/1.1 100 Continue",
            "",
            "HTTP/1.1 200 OK",
            "Content-Length: 2",
            "",
        ]));
        assert_eq!(h, vec![("Content-Length".to_string(), "2".to_string())]);
    }

    #[test]
    fn value_may_contain_colons() {
        let h = parse_header_lines(&lines(&["Location: https://example.com:8443/x"]));
        assert_eq!(h[0].1, "https://example.com:8443/x");
    }
}
