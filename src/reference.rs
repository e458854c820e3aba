// 🌍 Reference Store - NOC code → ISO 3166 codes
//
// A read-only table loaded once (bundled snapshot or a file on disk) and
// shared by every request. Refreshing it is offline tooling: parse a CSV
// export of the public NOC/ISO comparison table and save a new snapshot.

use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io::Read;
use std::path::Path;
use tracing::info;

const BUNDLED_SNAPSHOT: &str = include_str!("../data/countries.json");

// ============================================================================
// RECORD
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryCodeRecord {
    #[serde(rename = "country")]
    pub name: String,

    /// Join key against the medal feed's country code
    pub ioc_noc_code: String,

    /// Some NOCs (Kosovo, neutral teams) have no ISO assignment
    pub iso_alpha_3: Option<String>,
    pub iso_alpha_2: Option<String>,
}

impl CountryCodeRecord {
    pub fn new(noc: &str, name: &str, iso_alpha_3: Option<&str>, iso_alpha_2: Option<&str>) -> Self {
        CountryCodeRecord {
            name: name.to_string(),
            ioc_noc_code: noc.to_string(),
            iso_alpha_3: iso_alpha_3.map(str::to_string),
            iso_alpha_2: iso_alpha_2.map(str::to_string),
        }
    }
}

/// Row of the CSV export; empty cells mean "no code"
#[derive(Debug, Deserialize)]
struct CsvRow {
    country: String,
    ioc_noc_code: String,
    #[serde(default)]
    iso_alpha_3: String,
    #[serde(default)]
    iso_alpha_2: String,
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

// ============================================================================
// STORE
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct ReferenceStore {
    by_noc: HashMap<String, CountryCodeRecord>,
}

impl ReferenceStore {
    /// Later records replace earlier ones with the same NOC code
    pub fn from_records(records: Vec<CountryCodeRecord>) -> Self {
        let by_noc = records
            .into_iter()
            .map(|record| (record.ioc_noc_code.clone(), record))
            .collect();
        ReferenceStore { by_noc }
    }

    /// Snapshot compiled into the binary
    pub fn bundled() -> Result<Self> {
        Self::from_json(BUNDLED_SNAPSHOT).context("Bundled country code snapshot is invalid")
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let records: Vec<CountryCodeRecord> =
            serde_json::from_str(json).context("Failed to parse country code snapshot")?;
        Ok(Self::from_records(records))
    }

    /// Load a snapshot written by `save`
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read country codes from {}", path.display()))?;
        Self::from_json(&json)
    }

    /// Snapshot at `path` when given, bundled snapshot otherwise
    pub fn load_or_bundled(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Self::bundled(),
        }
    }

    /// Write the snapshot as a JSON array sorted by NOC code
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.records())?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write country codes to {}", path.display()))?;
        Ok(())
    }

    /// Parse a CSV export (`country,ioc_noc_code,iso_alpha_3,iso_alpha_2`)
    ///
    /// Rows without a NOC code are skipped.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut records = Vec::new();
        for result in rdr.deserialize() {
            let row: CsvRow = result.context("Failed to deserialize country code row")?;
            if row.ioc_noc_code.is_empty() {
                continue;
            }

            records.push(CountryCodeRecord {
                name: row.country,
                ioc_noc_code: row.ioc_noc_code.to_uppercase(),
                iso_alpha_3: non_empty(row.iso_alpha_3),
                iso_alpha_2: non_empty(row.iso_alpha_2),
            });
        }

        Ok(Self::from_records(records))
    }

    pub fn from_csv_path(path: &Path) -> Result<Self> {
        let file = fs::File::open(path)
            .with_context(|| format!("Failed to open {}", path.display()))?;
        Self::from_csv_reader(file)
    }

    pub fn lookup(&self, noc_code: &str) -> Option<&CountryCodeRecord> {
        self.by_noc.get(noc_code)
    }

    /// All records sorted by NOC code
    pub fn records(&self) -> Vec<&CountryCodeRecord> {
        let mut records: Vec<&CountryCodeRecord> = self.by_noc.values().collect();
        records.sort_by(|a, b| a.ioc_noc_code.cmp(&b.ioc_noc_code));
        records
    }

    pub fn len(&self) -> usize {
        self.by_noc.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_noc.is_empty()
    }
}

/// Download a CSV export of the reference table and parse it
pub async fn fetch_reference_table(url: &str, user_agent: &str) -> Result<ReferenceStore> {
    let http = Client::builder()
        .user_agent(user_agent)
        .build()
        .context("Failed to create HTTP client")?;

    let response = http
        .get(url)
        .send()
        .await
        .with_context(|| format!("Failed to fetch {}", url))?
        .error_for_status()
        .with_context(|| format!("Reference table request to {} failed", url))?;

    let body = response
        .bytes()
        .await
        .with_context(|| format!("Failed to read body from {}", url))?;

    let store = ReferenceStore::from_csv_reader(body.as_ref())?;
    info!(records = store.len(), url, "fetched reference table");
    Ok(store)
}
