use std::sync::OnceLock;

use regex::Regex;
use url::Url;

fn element_body_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>|<style\b[^>]*>.*?</style\s*>")
            .expect("valid element body pattern")
    })
}

fn tag_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"<[^>]*>").expect("valid tag pattern"))
}

/// Clean a single-line text field submitted from the settings editor.
///
/// Strips markup (script and style elements lose their contents too), drops control characters, collapses whitespace runs
/// (line breaks and tabs included) into single spaces and trims the result.
pub fn sanitize_text(value: &str) -> String {
    let without_bodies = element_body_pattern().replace_all(value, "");
    let without_tags = tag_pattern().replace_all(&without_bodies, "");
    without_tags
        .split_whitespace()
        .map(|word| word.chars().filter(|c| !c.is_control()).collect::<String>())
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Normalize a URL for storage. Only absolute http(s) URLs survive; a
/// bare host such as `example.com/about` is assumed to be http. Anything
/// else becomes the empty string.
pub fn sanitize_url(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return String::new();
    }

    let parsed = match Url::parse(trimmed) {
        Ok(url) => Some(url),
        Err(url::ParseError::RelativeUrlWithoutBase)
            if !trimmed.starts_with('/') && !trimmed.starts_with('#') && !trimmed.starts_with('?') =>
        {
            Url::parse(&format!("http://{}", trimmed)).ok()
        }
        Err(_) => None,
    };

    match parsed {
        Some(url) if matches!(url.scheme(), "http" | "https") && url.host().is_some() => url.to_string(),
        _ => {
            tracing::debug!("Dropping unsupported URL value: {}", value);
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_text() {
        assert_eq!(sanitize_text("  Acme\n\tCorp  "), "Acme Corp");
        assert_eq!(sanitize_text("<b>Acme</b> <script>x</script>Inc"), "Acme Inc");
        assert_eq!(
            sanitize_text("Acme<style type=\"text/css\">\nbody { color: red }\n</style> Corp"),
            "Acme Corp"
        );
        assert_eq!(sanitize_text("<SCRIPT src=\"x.js\">alert(1)</SCRIPT >Acme"), "Acme");
        assert_eq!(sanitize_text("Acme\u{0007}"), "Acme");
        assert_eq!(sanitize_text("   "), "");
    }

    #[test]
    fn test_sanitize_url() {
        assert_eq!(sanitize_url("https://acme.test/about"), "https://acme.test/about");
        assert_eq!(sanitize_url(" https://acme.test/#org "), "https://acme.test/#org");
        assert_eq!(sanitize_url("acme.test/logo.png"), "http://acme.test/logo.png");
        assert_eq!(sanitize_url("javascript:alert(1)"), "");
        assert_eq!(sanitize_url("/relative/path"), "");
        assert_eq!(sanitize_url(""), "");
    }
}
