// 🏅 Ranking Engine - medal table ordering and competition ranks
//
// Ordering: gold, then silver, then bronze, all descending. NOC code
// (descending) breaks exact ties so the order is deterministic.
//
// Ranks: equal (gold, silver, bronze) share a rank; the next distinct row
// gets its 1-based position. Two countries tied at 1 are followed by 3.

use crate::aggregation::MedalTotals;
use crate::feed::NocMetadata;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use tracing::debug;

/// Display name used when the NOC document has no entry for a code
pub const UNKNOWN_COUNTRY_NAME: &str = "None";

// ============================================================================
// RESULT TYPES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    /// NOC code
    pub code: String,
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iso_alpha_3: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iso_alpha_2: Option<String>,
}

impl Country {
    pub fn new(code: &str, name: &str) -> Self {
        Country {
            code: code.to_string(),
            name: name.to_string(),
            iso_alpha_3: None,
            iso_alpha_2: None,
        }
    }
}

/// Medal counts; `total` is always derived, never read from the feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Medals {
    pub gold: u32,
    pub silver: u32,
    pub bronze: u32,

    /// Wider than the counts so the sum cannot overflow
    pub total: u64,
}

impl Medals {
    pub fn new(gold: u32, silver: u32, bronze: u32) -> Self {
        Medals {
            gold,
            silver,
            bronze,
            total: u64::from(gold) + u64::from(silver) + u64::from(bronze),
        }
    }

    /// The triple that decides order and ties
    pub fn podium(&self) -> (u32, u32, u32) {
        (self.gold, self.silver, self.bronze)
    }
}

impl From<&MedalTotals> for Medals {
    fn from(totals: &MedalTotals) -> Self {
        Medals::new(totals.gold, totals.silver, totals.bronze)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedResult {
    pub country: Country,
    pub medals: Medals,
    pub rank: u32,
}

// ============================================================================
// RANKING
// ============================================================================

/// Join totals with display names
///
/// `rank` carries the feed's hint until `rank_results` replaces it.
pub fn prepare_results(
    totals: &BTreeMap<String, MedalTotals>,
    names: &NocMetadata,
) -> Vec<RankedResult> {
    totals
        .iter()
        .map(|(code, totals)| RankedResult {
            country: Country::new(code, names.name(code).unwrap_or(UNKNOWN_COUNTRY_NAME)),
            medals: Medals::from(totals),
            rank: totals.rank_hint,
        })
        .collect()
}

fn medal_table_order(a: &RankedResult, b: &RankedResult) -> Ordering {
    b.medals
        .podium()
        .cmp(&a.medals.podium())
        .then_with(|| b.country.code.cmp(&a.country.code))
}

/// Sort by medal table order and assign competition ranks
///
/// Output is ordered by (rank, code) ascending.
pub fn rank_results(mut results: Vec<RankedResult>) -> Vec<RankedResult> {
    results.sort_by(medal_table_order);

    let mut previous: Option<((u32, u32, u32), u32)> = None;
    for (index, result) in results.iter_mut().enumerate() {
        let podium = result.medals.podium();
        result.rank = match previous {
            Some((previous_podium, previous_rank)) if previous_podium == podium => previous_rank,
            _ => index as u32 + 1,
        };
        previous = Some((podium, result.rank));
    }

    results.sort_by(|a, b| {
        a.rank
            .cmp(&b.rank)
            .then_with(|| a.country.code.cmp(&b.country.code))
    });

    debug!(count = results.len(), "ranked medal table");
    results
}
