// 🧮 Aggregation Engine - raw feed rows → one total per country
//
// Breakdown rows (per sport, per gender) are dropped: summing them on top of
// the grand-total row would count every medal more than once.

use crate::error::{PipelineError, PipelineResult};
use crate::feed::{RawMedalEntry, TotalsFilter};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Per-country accumulator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedalTotals {
    pub gold: u32,
    pub silver: u32,
    pub bronze: u32,

    /// Rank reported by the feed on the first qualifying row
    pub rank_hint: u32,
}

impl MedalTotals {
    pub fn new(rank_hint: u32) -> Self {
        MedalTotals {
            rank_hint,
            ..Default::default()
        }
    }

    /// Add one row's counts; a count that no longer fits is a broken feed
    pub fn add(&mut self, entry: &RawMedalEntry) -> PipelineResult<()> {
        let overflow =
            || PipelineError::contract(format!("medal counts for {} overflow", entry.org));

        self.gold = self.gold.checked_add(entry.gold).ok_or_else(overflow)?;
        self.silver = self.silver.checked_add(entry.silver).ok_or_else(overflow)?;
        self.bronze = self.bronze.checked_add(entry.bronze).ok_or_else(overflow)?;
        Ok(())
    }

    pub fn total(&self) -> u64 {
        u64::from(self.gold) + u64::from(self.silver) + u64::from(self.bronze)
    }
}

/// Reduce raw rows to one `MedalTotals` per NOC code
///
/// The feed emits one grand-total row per country; if it ever emits more,
/// they are summed. A grand-total row without a rank aborts the whole run.
pub fn aggregate(
    entries: &[RawMedalEntry],
    filter: &TotalsFilter,
) -> PipelineResult<BTreeMap<String, MedalTotals>> {
    let mut totals: BTreeMap<String, MedalTotals> = BTreeMap::new();

    for entry in entries.iter().filter(|e| filter.is_grand_total(e)) {
        if !totals.contains_key(&entry.org) {
            let rank = entry.rank.ok_or_else(|| {
                PipelineError::contract(format!("total entry for {} has no rank", entry.org))
            })?;
            totals.insert(entry.org.clone(), MedalTotals::new(rank));
        }

        if let Some(accumulator) = totals.get_mut(&entry.org) {
            accumulator.add(entry)?;
        }
    }

    debug!(
        entries = entries.len(),
        countries = totals.len(),
        "aggregated medal totals"
    );

    Ok(totals)
}
