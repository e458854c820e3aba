// Olympic Medals - Core Library
// Exposes all modules for use in CLI, API server, and tests

pub mod config;
pub mod error;
pub mod feed;           // Medal Feed Client
pub mod aggregation;    // raw rows → per-country totals
pub mod ranking;        // medal table order + competition ranks
pub mod reference;      // NOC → ISO reference store
pub mod enrichment;     // ISO codes onto ranked results
pub mod query;          // summary / top-N facade

#[cfg(feature = "server")]
pub mod api;

// Re-export commonly used types
pub use config::{FeedConfig, ServerConfig};
pub use error::{PipelineError, PipelineResult};
pub use feed::{
    FileFeed, HttpMedalFeed, MedalFeed, NocMetadata, RawMedalEntry, TotalsFilter,
    parse_medal_entries, parse_noc_names,
};
pub use aggregation::{aggregate, MedalTotals};
pub use ranking::{prepare_results, rank_results, Country, Medals, RankedResult};
pub use reference::{fetch_reference_table, CountryCodeRecord, ReferenceStore};
pub use enrichment::enrich;
pub use query::{MedalResponse, MedalService, MedalSummary, DEFAULT_TOP_N};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
