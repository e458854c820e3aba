// 📡 Medal Feed Client
// Pulls raw medal entries and NOC names from the remote feed (or from disk)
//
// The feed publishes two documents:
//   medals: {"medalNOC": [{org, gender, sport, gold, silver, bronze, rank}, ...]}
//   nocs:   {"nocs": [{code, name, ...}, ...]}
// Only the fields below are read; everything else in the payload is ignored.

use crate::config::FeedConfig;
use crate::error::{PipelineError, PipelineResult};
use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

// ============================================================================
// CORE TYPES
// ============================================================================

/// One row of the medal document
///
/// A row is either a country's grand total or a breakdown (by sport, by
/// gender). `TotalsFilter` tells them apart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMedalEntry {
    /// NOC code of the country
    pub org: String,
    pub gender: String,
    pub sport: String,
    pub gold: u32,
    pub silver: u32,
    pub bronze: u32,

    /// Feed's own rank; breakdown rows may omit it
    #[serde(default)]
    pub rank: Option<u32>,
}

impl RawMedalEntry {
    pub fn new(org: &str, gender: &str, sport: &str, medals: (u32, u32, u32)) -> Self {
        RawMedalEntry {
            org: org.to_string(),
            gender: gender.to_string(),
            sport: sport.to_string(),
            gold: medals.0,
            silver: medals.1,
            bronze: medals.2,
            rank: None,
        }
    }

    /// Builder pattern: attach the feed rank
    pub fn with_rank(mut self, rank: u32) -> Self {
        self.rank = Some(rank);
        self
    }
}

/// Sentinel tags that mark a grand-total row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TotalsFilter {
    pub gender: String,
    pub sport: String,
}

impl TotalsFilter {
    pub fn new(gender: &str, sport: &str) -> Self {
        TotalsFilter {
            gender: gender.to_string(),
            sport: sport.to_string(),
        }
    }

    pub fn is_grand_total(&self, entry: &RawMedalEntry) -> bool {
        entry.gender == self.gender && entry.sport == self.sport
    }
}

impl Default for TotalsFilter {
    fn default() -> Self {
        TotalsFilter::from(&FeedConfig::default())
    }
}

impl From<&FeedConfig> for TotalsFilter {
    fn from(config: &FeedConfig) -> Self {
        TotalsFilter::new(&config.totals_gender, &config.totals_sport)
    }
}

/// NOC code → display name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NocMetadata {
    names: HashMap<String, String>,
}

impl NocMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, code: &str, name: &str) {
        self.names.insert(code.to_string(), name.to_string());
    }

    pub fn name(&self, code: &str) -> Option<&str> {
        self.names.get(code).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl FromIterator<(String, String)> for NocMetadata {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        NocMetadata {
            names: iter.into_iter().collect(),
        }
    }
}

// ============================================================================
// PAYLOAD PARSING
// ============================================================================

#[derive(Deserialize)]
struct MedalDocument {
    #[serde(rename = "medalNOC")]
    medal_noc: Vec<RawMedalEntry>,
}

#[derive(Deserialize)]
struct NocDocument {
    nocs: Vec<NocRecord>,
}

#[derive(Deserialize)]
struct NocRecord {
    code: String,
    #[serde(default)]
    name: Option<String>,
}

/// Parse the medal document body
pub fn parse_medal_entries(body: &str) -> PipelineResult<Vec<RawMedalEntry>> {
    let document: MedalDocument = serde_json::from_str(body)
        .map_err(|e| PipelineError::contract(format!("medal document: {}", e)))?;
    Ok(document.medal_noc)
}

/// Parse the NOC document body
///
/// Records without a name are left out, so the code falls back to the
/// unknown-country name downstream.
pub fn parse_noc_names(body: &str) -> PipelineResult<NocMetadata> {
    let document: NocDocument = serde_json::from_str(body)
        .map_err(|e| PipelineError::contract(format!("NOC document: {}", e)))?;

    Ok(document
        .nocs
        .into_iter()
        .filter_map(|noc| noc.name.map(|name| (noc.code, name)))
        .collect())
}

// ============================================================================
// FEED TRAIT
// ============================================================================

/// Source of medal data
///
/// Implementations must not cache: every call reflects the feed as it is now.
#[async_trait]
pub trait MedalFeed: Send + Sync {
    /// All rows of the medal document, breakdowns included
    async fn fetch_medal_entries(&self) -> PipelineResult<Vec<RawMedalEntry>>;

    /// NOC code → display name
    async fn fetch_noc_names(&self) -> PipelineResult<NocMetadata>;

    /// Identifier reported as `source` in responses
    fn source(&self) -> &str;
}

// ============================================================================
// HTTP FEED
// ============================================================================

pub struct HttpMedalFeed {
    http: Client,
    config: FeedConfig,
}

impl HttpMedalFeed {
    /// Build a client that sends the configured User-Agent on every request
    pub fn new(config: FeedConfig) -> anyhow::Result<Self> {
        let http = Client::builder()
            .user_agent(config.user_agent.clone())
            .build()
            .context("Failed to create HTTP client")?;

        Ok(HttpMedalFeed { http, config })
    }

    async fn get_text(&self, url: &str) -> PipelineResult<String> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| PipelineError::fetch(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PipelineError::fetch(url, format!("HTTP status {}", status)));
        }

        response
            .text()
            .await
            .map_err(|e| PipelineError::fetch(url, e))
    }
}

#[async_trait]
impl MedalFeed for HttpMedalFeed {
    async fn fetch_medal_entries(&self) -> PipelineResult<Vec<RawMedalEntry>> {
        let body = self.get_text(&self.config.medal_url).await?;
        let entries = parse_medal_entries(&body)?;
        debug!(count = entries.len(), url = %self.config.medal_url, "fetched medal entries");
        Ok(entries)
    }

    async fn fetch_noc_names(&self) -> PipelineResult<NocMetadata> {
        let body = self.get_text(&self.config.noc_url).await?;
        let names = parse_noc_names(&body)?;
        debug!(count = names.len(), url = %self.config.noc_url, "fetched NOC names");
        Ok(names)
    }

    fn source(&self) -> &str {
        &self.config.medal_url
    }
}

// ============================================================================
// FILE FEED
// ============================================================================

/// Reads saved copies of both documents from disk
///
/// Files are re-read on every call, same as the HTTP feed re-fetches.
pub struct FileFeed {
    medals_path: PathBuf,
    nocs_path: PathBuf,
    source: String,
}

impl FileFeed {
    pub const MEDALS_FILE: &'static str = "medals.json";
    pub const NOCS_FILE: &'static str = "nocs.json";

    pub fn new(medals_path: impl Into<PathBuf>, nocs_path: impl Into<PathBuf>) -> Self {
        let medals_path = medals_path.into();
        let source = medals_path.display().to_string();
        FileFeed {
            medals_path,
            nocs_path: nocs_path.into(),
            source,
        }
    }

    /// `medals.json` and `nocs.json` inside `dir`
    pub fn from_dir(dir: &Path) -> Self {
        FileFeed::new(dir.join(Self::MEDALS_FILE), dir.join(Self::NOCS_FILE))
    }

    async fn read(path: &Path) -> PipelineResult<String> {
        tokio::fs::read_to_string(path)
            .await
            .map_err(|e| PipelineError::fetch(&path.display().to_string(), e))
    }
}

#[async_trait]
impl MedalFeed for FileFeed {
    async fn fetch_medal_entries(&self) -> PipelineResult<Vec<RawMedalEntry>> {
        let body = Self::read(&self.medals_path).await?;
        parse_medal_entries(&body)
    }

    async fn fetch_noc_names(&self) -> PipelineResult<NocMetadata> {
        let body = Self::read(&self.nocs_path).await?;
        parse_noc_names(&body)
    }

    fn source(&self) -> &str {
        &self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_medal_entries() {
        let body = r#"{"medalNOC": [
            {"org": "USA", "gender": "TOT", "sport": "GLO", "gold": 40, "silver": 44, "bronze": 42, "rank": 1},
            {"org": "USA", "gender": "M", "sport": "SWM", "gold": 4, "silver": 3, "bronze": 2, "extra": "ignored"}
        ]}"#;

        let entries = parse_medal_entries(body).unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], RawMedalEntry::new("USA", "TOT", "GLO", (40, 44, 42)).with_rank(1));
        assert_eq!(entries[1].rank, None);
    }

    #[test]
    fn test_parse_medal_entries_missing_field() {
        // No "sport" field
        let body = r#"{"medalNOC": [{"org": "USA", "gender": "TOT", "gold": 1, "silver": 0, "bronze": 0, "rank": 1}]}"#;

        let err = parse_medal_entries(body).unwrap_err();
        assert!(matches!(err, PipelineError::DataContract(_)));
    }

    #[test]
    fn test_parse_medal_entries_wrong_root() {
        let err = parse_medal_entries(r#"{"medals": []}"#).unwrap_err();
        assert!(matches!(err, PipelineError::DataContract(_)));

        let err = parse_medal_entries("<html>blocked</html>").unwrap_err();
        assert!(matches!(err, PipelineError::DataContract(_)));
    }

    #[test]
    fn test_parse_noc_names() {
        let body = r#"{"nocs": [
            {"code": "FRA", "name": "France", "longName": "French Republic"},
            {"code": "AIN", "name": "Individual Neutral Athletes"}
        ]}"#;

        let names = parse_noc_names(body).unwrap();

        assert_eq!(names.len(), 2);
        assert_eq!(names.name("FRA"), Some("France"));
        assert_eq!(names.name("AIN"), Some("Individual Neutral Athletes"));
        assert_eq!(names.name("XYZ"), None);
    }

    #[test]
    fn test_parse_noc_names_without_name() {
        let body = r#"{"nocs": [
            {"code": "USA", "name": "United States"},
            {"code": "XXX"},
            {"code": "YYY", "name": null}
        ]}"#;

        let names = parse_noc_names(body).unwrap();

        assert_eq!(names.len(), 1);
        assert_eq!(names.name("USA"), Some("United States"));
        assert_eq!(names.name("XXX"), None);
        assert_eq!(names.name("YYY"), None);
    }

    #[test]
    fn test_totals_filter() {
        let filter = TotalsFilter::default();

        assert!(filter.is_grand_total(&RawMedalEntry::new("USA", "TOT", "GLO", (1, 0, 0))));
        assert!(!filter.is_grand_total(&RawMedalEntry::new("USA", "M", "GLO", (1, 0, 0))));
        assert!(!filter.is_grand_total(&RawMedalEntry::new("USA", "TOT", "ATH", (1, 0, 0))));
        // Tags are matched exactly
        assert!(!filter.is_grand_total(&RawMedalEntry::new("USA", "tot", "glo", (1, 0, 0))));
    }

    #[test]
    fn test_totals_filter_from_config() {
        let config = FeedConfig {
            totals_gender: "ALL".to_string(),
            totals_sport: "OVERALL".to_string(),
            ..FeedConfig::default()
        };

        let filter = TotalsFilter::from(&config);
        assert!(filter.is_grand_total(&RawMedalEntry::new("FRA", "ALL", "OVERALL", (0, 0, 1))));
    }

    #[tokio::test]
    async fn test_file_feed_reads_both_documents() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("medals.json"),
            r#"{"medalNOC": [{"org": "JPN", "gender": "TOT", "sport": "GLO", "gold": 20, "silver": 12, "bronze": 13, "rank": 3}]}"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join("nocs.json"),
            r#"{"nocs": [{"code": "JPN", "name": "Japan"}]}"#,
        )
        .unwrap();

        let feed = FileFeed::from_dir(dir.path());

        let entries = feed.fetch_medal_entries().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].org, "JPN");

        let names = feed.fetch_noc_names().await.unwrap();
        assert_eq!(names.name("JPN"), Some("Japan"));
        assert!(feed.source().ends_with("medals.json"));
    }

    #[tokio::test]
    async fn test_file_feed_missing_file_is_fetch_error() {
        let dir = tempfile::tempdir().unwrap();
        let feed = FileFeed::from_dir(dir.path());

        let err = feed.fetch_medal_entries().await.unwrap_err();
        assert!(err.is_fetch());
    }
}
