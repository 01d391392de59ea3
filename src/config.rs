//! Application Configuration
//!
//! Read once at start-up from `<meta>` tags in `index.html`, with a
//! compile-time fallback for the API base URL.

use log::LevelFilter;

/// Ring-buffer size of the diagnostics log
pub const DEFAULT_LOG_CAPACITY: usize = 200;

const META_API_BASE: &str = "labdash-api-base";
const META_LOG_LEVEL: &str = "labdash-log-level";

#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    /// Prefix for every endpoint path; empty means same origin
    pub api_base_url: String,
    pub log_level: LevelFilter,
    pub log_capacity: usize,
}

impl AppConfig {
    pub fn new(api_base_url: &str, log_level: LevelFilter) -> Self {
        Self {
            api_base_url: normalize_base_url(api_base_url),
            log_level,
            log_capacity: DEFAULT_LOG_CAPACITY,
        }
    }

    /// Load from the page, falling back to `LABDASH_API_BASE` at build time
    pub fn load() -> Self {
        let base = read_meta(META_API_BASE)
            .filter(|v| !v.trim().is_empty())
            .or_else(|| option_env!("LABDASH_API_BASE").map(String::from))
            .unwrap_or_default();
        let level = read_meta(META_LOG_LEVEL)
            .and_then(|v| parse_log_level(&v))
            .unwrap_or(LevelFilter::Info);
        Self::new(&base, level)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new("", LevelFilter::Info)
    }
}

fn read_meta(name: &str) -> Option<String> {
    let document = web_sys::window()?.document()?;
    let element = document.query_selector(&format!("meta[name=\"{}\"]", name)).ok()??;
    element.get_attribute("content")
}

pub fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

pub fn parse_log_level(raw: &str) -> Option<LevelFilter> {
    raw.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(normalize_base_url(" https://lab.example/ "), "https://lab.example");
        assert_eq!(normalize_base_url("https://lab.example///"), "https://lab.example");
        assert_eq!(normalize_base_url(""), "");
    }

    #[test]
    fn test_parse_log_level() {
        assert_eq!(parse_log_level("debug"), Some(LevelFilter::Debug));
        assert_eq!(parse_log_level(" WARN "), Some(LevelFilter::Warn));
        assert_eq!(parse_log_level("chatty"), None);
    }

    #[test]
    fn test_new_applies_defaults() {
        let config = AppConfig::new("/backend/", LevelFilter::Debug);
        assert_eq!(config.api_base_url, "/backend");
        assert_eq!(config.log_capacity, DEFAULT_LOG_CAPACITY);
    }
}
