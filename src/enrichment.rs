// 🔗 Enrichment Stage - attach ISO codes to ranked results
// Only the country's ISO fields are written; medals and rank are untouched.

use crate::ranking::RankedResult;
use crate::reference::ReferenceStore;
use tracing::debug;

/// Add ISO alpha-2/alpha-3 to every result whose NOC code is in the store
///
/// Misses are normal (neutral teams, historical NOCs) and leave the country
/// with code and name only.
pub fn enrich(mut results: Vec<RankedResult>, store: &ReferenceStore) -> Vec<RankedResult> {
    let mut matched = 0;

    for result in results.iter_mut() {
        if let Some(record) = store.lookup(&result.country.code) {
            result.country.iso_alpha_3 = record.iso_alpha_3.clone();
            result.country.iso_alpha_2 = record.iso_alpha_2.clone();
            matched += 1;
        }
    }

    debug!(results = results.len(), matched, "enriched results with ISO codes");
    results
}
