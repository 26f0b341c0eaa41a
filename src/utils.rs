// src/utils.rs
use anyhow::{Context, Result};
use std::path::Path;

/// Collapse runs of whitespace (including newlines) into single spaces
pub fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Drop the query string and fragment from a URL
pub fn strip_query(url: &str) -> &str {
    let end = url.find(&['?', '#'][..]).unwrap_or(url.len());
    &url[..end]
}

/// Escape text for inclusion in HTML element content or attribute values
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Normalize a location name for table lookups
pub fn normalize_location(name: &str) -> String {
    clean_text(name).to_lowercase()
}

/// Ensure directory exists
pub async fn ensure_dir_exists(path: &Path) -> Result<()> {
    tokio::fs::create_dir_all(path)
        .await
        .with_context(|| format!("Failed to create directory: {}", path.display()))
}

/// Read file content as string with proper error context
pub async fn read_file_content(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_text() {
        assert_eq!(clean_text("  Machine\n   Learning  Engineer "), "Machine Learning Engineer");
        assert_eq!(clean_text("\n\t"), "");
    }

    #[test]
    fn test_strip_query() {
        assert_eq!(
            strip_query("https://dk.linkedin.com/jobs/view/ml-engineer-123?refId=abc&trk=x"),
            "https://dk.linkedin.com/jobs/view/ml-engineer-123"
        );
        assert_eq!(strip_query("https://example.com/a#frag"), "https://example.com/a");
        assert_eq!(strip_query("https://example.com/a"), "https://example.com/a");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b>"Tom & Jerry's"</b>"#),
            "&lt;b&gt;&quot;Tom &amp; Jerry&#39;s&quot;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_normalize_location() {
        assert_eq!(normalize_location("  New   York "), "new york");
        assert_eq!(normalize_location("Denmark"), "denmark");
    }
}
