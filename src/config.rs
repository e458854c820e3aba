// ⚙️ Configuration - feed endpoints, sentinels, server settings
//
// Defaults point at the Paris 2024 feed. Every value can be overridden
// from the environment so the same binary can follow another edition.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

pub const DEFAULT_MEDAL_URL: &str =
    "https://olympics.com/OG2024/data/CIS_MedalNOCs~lang=ENG~comp=OG2024.json";
pub const DEFAULT_NOC_URL: &str =
    "https://olympics.com/OG2024/data/MIS_NOCS~lang=ENG~comp=OG2024.json";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/58.0.3029.110 Safari/537.36";

/// Gender tag the feed uses for "all genders combined"
pub const TOTAL_GENDER: &str = "TOT";
/// Sport tag the feed uses for "all sports combined"
pub const TOTAL_SPORT: &str = "GLO";

pub const DEFAULT_BIND: &str = "0.0.0.0:3000";
pub const DEFAULT_WEB_DIR: &str = "web";

// ============================================================================
// FEED CONFIG
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Raw per-event medal entries
    pub medal_url: String,

    /// NOC metadata (display names)
    pub noc_url: String,

    /// Sent as the User-Agent header; the feed rejects bare clients
    pub user_agent: String,

    /// Only entries with this gender tag are grand totals
    pub totals_gender: String,

    /// Only entries with this sport tag are grand totals
    pub totals_sport: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        FeedConfig {
            medal_url: DEFAULT_MEDAL_URL.to_string(),
            noc_url: DEFAULT_NOC_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            totals_gender: TOTAL_GENDER.to_string(),
            totals_sport: TOTAL_SPORT.to_string(),
        }
    }
}

impl FeedConfig {
    /// Defaults, overridden by any `MEDALS_*` variable that is set
    pub fn from_env() -> Self {
        let mut config = FeedConfig::default();

        if let Some(url) = env_value("MEDALS_FEED_URL") {
            config.medal_url = url;
        }
        if let Some(url) = env_value("MEDALS_NOC_URL") {
            config.noc_url = url;
        }
        if let Some(agent) = env_value("MEDALS_USER_AGENT") {
            config.user_agent = agent;
        }
        if let Some(gender) = env_value("MEDALS_TOTAL_GENDER") {
            config.totals_gender = gender;
        }
        if let Some(sport) = env_value("MEDALS_TOTAL_SPORT") {
            config.totals_sport = sport;
        }

        config
    }
}

// ============================================================================
// SERVER CONFIG
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub bind: String,

    /// Country code snapshot; `None` means use the bundled one
    pub reference_path: Option<PathBuf>,

    /// Directory served under /static
    pub web_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            bind: DEFAULT_BIND.to_string(),
            reference_path: None,
            web_dir: PathBuf::from(DEFAULT_WEB_DIR),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let defaults = ServerConfig::default();

        ServerConfig {
            bind: env_value("MEDALS_BIND").unwrap_or(defaults.bind),
            reference_path: env_value("MEDALS_REFERENCE_PATH").map(PathBuf::from),
            web_dir: env_value("MEDALS_WEB_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.web_dir),
        }
    }
}

/// Unset and blank variables both count as "not configured"
fn env_value(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_defaults() {
        let config = FeedConfig::default();

        assert_eq!(config.medal_url, DEFAULT_MEDAL_URL);
        assert_eq!(config.noc_url, DEFAULT_NOC_URL);
        assert_eq!(config.totals_gender, "TOT");
        assert_eq!(config.totals_sport, "GLO");
        assert!(config.user_agent.starts_with("Mozilla/5.0"));
    }

    #[test]
    fn test_feed_config_from_json() {
        let json = r#"{
            "medal_url": "http://localhost/medals.json",
            "noc_url": "http://localhost/nocs.json",
            "user_agent": "test-agent",
            "totals_gender": "TOTAL",
            "totals_sport": "ALL"
        }"#;

        let config: FeedConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.totals_gender, "TOTAL");
        assert_eq!(config.totals_sport, "ALL");
        assert_eq!(config.user_agent, "test-agent");
    }

    #[test]
    fn test_server_defaults() {
        let config = ServerConfig::default();

        assert_eq!(config.bind, "0.0.0.0:3000");
        assert!(config.reference_path.is_none());
        assert_eq!(config.web_dir, PathBuf::from("web"));
    }
}
