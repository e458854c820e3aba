// 🔎 Query Facade - summary and top-N over a freshly computed medal table
//
// Every call fetches, aggregates, ranks and enriches from scratch. Nothing is
// shared between calls except the read-only reference store.

use crate::aggregation::aggregate;
use crate::enrichment::enrich;
use crate::error::PipelineResult;
use crate::feed::{MedalFeed, TotalsFilter};
use crate::ranking::{prepare_results, rank_results, RankedResult};
use crate::reference::ReferenceStore;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

pub const DEFAULT_TOP_N: usize = 3;

// ============================================================================
// RESPONSE ENVELOPE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedalSummary {
    /// ISO-8601 time the table was computed
    pub last_updated: String,
    pub source: String,
    pub total_results: usize,
    pub results: Vec<RankedResult>,
}

impl MedalSummary {
    fn new(source: &str, results: Vec<RankedResult>) -> Self {
        MedalSummary {
            last_updated: Utc::now().to_rfc3339(),
            source: source.to_string(),
            total_results: results.len(),
            results,
        }
    }
}

/// What callers get back: the envelope, or `{}` when the data could not be
/// produced
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MedalResponse {
    Available(MedalSummary),
    Unavailable {},
}

impl MedalResponse {
    pub fn is_available(&self) -> bool {
        matches!(self, MedalResponse::Available(_))
    }

    pub fn summary(&self) -> Option<&MedalSummary> {
        match self {
            MedalResponse::Available(summary) => Some(summary),
            MedalResponse::Unavailable {} => None,
        }
    }
}

impl From<PipelineResult<MedalSummary>> for MedalResponse {
    fn from(result: PipelineResult<MedalSummary>) -> Self {
        match result {
            Ok(summary) => MedalResponse::Available(summary),
            Err(e) => {
                warn!(error = %e, "medal data unavailable");
                MedalResponse::Unavailable {}
            }
        }
    }
}

// ============================================================================
// SERVICE
// ============================================================================

pub struct MedalService<F: MedalFeed> {
    feed: F,
    reference: Arc<ReferenceStore>,
    totals: TotalsFilter,
}

impl<F: MedalFeed> MedalService<F> {
    pub fn new(feed: F, reference: Arc<ReferenceStore>, totals: TotalsFilter) -> Self {
        MedalService {
            feed,
            reference,
            totals,
        }
    }

    /// Fetch both documents and produce the full ranked table (not enriched)
    pub async fn ranked_table(&self) -> PipelineResult<Vec<RankedResult>> {
        let entries = self.feed.fetch_medal_entries().await?;
        let names = self.feed.fetch_noc_names().await?;

        let totals = aggregate(&entries, &self.totals)?;
        Ok(rank_results(prepare_results(&totals, &names)))
    }

    /// Full table, optionally narrowed to some NOC codes (case-insensitive)
    ///
    /// Filtering happens after ranking, so ranks reflect global standing.
    pub async fn try_summary(&self, filter_codes: &[String]) -> PipelineResult<MedalSummary> {
        let mut results = self.ranked_table().await?;

        if !filter_codes.is_empty() {
            results.retain(|result| {
                filter_codes
                    .iter()
                    .any(|code| code.trim().eq_ignore_ascii_case(&result.country.code))
            });
        }

        let results = enrich(results, &self.reference);
        info!(
            filter = ?filter_codes,
            results = results.len(),
            "served medal summary"
        );
        Ok(MedalSummary::new(self.feed.source(), results))
    }

    /// First `n` rows of the global table
    pub async fn try_top_n(&self, n: usize) -> PipelineResult<MedalSummary> {
        let mut results = self.ranked_table().await?;
        results.truncate(n);

        let results = enrich(results, &self.reference);
        info!(n, results = results.len(), "served top medal table");
        Ok(MedalSummary::new(self.feed.source(), results))
    }

    pub async fn summary(&self, filter_codes: &[String]) -> MedalResponse {
        self.try_summary(filter_codes).await.into()
    }

    pub async fn top_n(&self, n: usize) -> MedalResponse {
        self.try_top_n(n).await.into()
    }
}
