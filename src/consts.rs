//! Project-wide constants.

use std::path::PathBuf;

pub const AUTHOR: &str = env!("CARGO_PKG_AUTHORS");
pub const HOMEPAGE: &str = env!("CARGO_PKG_HOMEPAGE");
pub const REPO: &str = env!("CARGO_PKG_REPOSITORY");

/// Gemini REST API root.
pub const API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Environment variable holding the Gemini API key.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
/// Checked when [`API_KEY_ENV`] is unset.
pub const API_KEY_FALLBACK_ENV: &str = "API_KEY";

/// Grounded, fast model for trend discovery.
pub const DEFAULT_DISCOVER_MODEL: &str = "gemini-3-flash-preview";
/// Stronger writer for drafting posts.
pub const DEFAULT_DRAFT_MODEL: &str = "gemini-3-pro-preview";
/// Image-capable model for the visual.
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image";

/// Default preferences database: `~/.trendsmith/trendsmith.db`.
pub fn default_db_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(".trendsmith")
        .join("trendsmith.db")
}

/// Format a number with comma separators (e.g. 1,234,567).
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    for (i, c) in s.chars().enumerate() {
        if i > 0 && (s.len() - i).is_multiple_of(3) {
            result.push(',');
        }
        result.push(c);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consts_are_non_empty() {
        assert!(!AUTHOR.is_empty());
        assert!(!HOMEPAGE.is_empty());
        assert!(!REPO.is_empty());
        assert!(!DEFAULT_DISCOVER_MODEL.is_empty());
        assert!(!DEFAULT_DRAFT_MODEL.is_empty());
        assert!(!DEFAULT_IMAGE_MODEL.is_empty());
    }

    #[test]
    fn repo_from_cargo_toml() {
        assert!(REPO.contains("trendsmith"));
    }

    #[test]
    fn default_db_path_is_in_dot_dir() {
        let path = default_db_path();
        assert!(path.ends_with(".trendsmith/trendsmith.db"));
    }

    #[test]
    fn format_number_small() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
    }

    #[test]
    fn format_number_thousands() {
        assert_eq!(format_number(1_000), "1,000");
        assert_eq!(format_number(123_456), "123,456");
        assert_eq!(format_number(1_234_567), "1,234,567");
    }
}
