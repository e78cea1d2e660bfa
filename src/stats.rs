use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use anyhow::Context as _;
use serde::Serialize;

use crate::cli::StatsArgs;
use crate::history::HistoryStore;
use crate::platform::Platform;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlatformCount {
    pub rank: usize,
    pub name: String,
    pub count: usize,
}

/// Platform usage across a history store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlatformStats {
    pub total_sites: usize,
    /// Every recorded observation counted once per label, excluding the fallback label.
    pub ranked: Vec<PlatformCount>,
    /// Observations carrying the fallback label.
    pub unidentified: usize,
    /// Latest label of each site, fallback included.
    pub current: Vec<PlatformCount>,
}

impl PlatformStats {
    pub fn from_store(store: &HistoryStore) -> Self {
        let unidentified_label = Platform::Unidentified.label();
        let mut usage: BTreeMap<&str, usize> = BTreeMap::new();
        let mut current: BTreeMap<&str, usize> = BTreeMap::new();
        let mut unidentified = 0_usize;

        for (_, history) in store.iter() {
            for obs in history.observations() {
                if obs.platform == unidentified_label {
                    unidentified += 1;
                } else {
                    *usage.entry(obs.platform.as_str()).or_default() += 1;
                }
            }
            if let Some(platform) = history.current_platform() {
                *current.entry(platform).or_default() += 1;
            }
        }

        Self {
            total_sites: store.len(),
            ranked: rank(usage),
            unidentified,
            current: rank(current),
        }
    }

    /// Rank 1 is the most used platform.
    pub fn platform_by_rank(&self, rank: usize) -> Option<&PlatformCount> {
        rank.checked_sub(1).and_then(|idx| self.ranked.get(idx))
    }

    pub fn unique_platforms(&self) -> BTreeSet<&str> {
        self.ranked.iter().map(|entry| entry.name.as_str()).collect()
    }

    pub fn total_platforms(&self) -> usize {
        self.ranked.len()
    }
}

// Count descending, then label ascending.
fn rank(counts: BTreeMap<&str, usize>) -> Vec<PlatformCount> {
    let mut entries = counts.into_iter().collect::<Vec<_>>();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    entries
        .into_iter()
        .enumerate()
        .map(|(idx, (name, count))| PlatformCount {
            rank: idx + 1,
            name: name.to_owned(),
            count,
        })
        .collect()
}

pub fn run(args: StatsArgs) -> anyhow::Result<()> {
    let data_path = PathBuf::from(&args.data);
    let store = HistoryStore::load(&data_path).context("load history store")?;
    let stats = PlatformStats::from_store(&store);

    if args.json {
        let json = serde_json::to_string_pretty(&stats).context("serialize stats")?;
        println!("{json}");
        return Ok(());
    }

    println!("Total sites tracked: {}", stats.total_sites);
    println!("Platforms seen: {}", stats.total_platforms());
    println!();
    println!("Observations by platform:");
    for entry in stats.ranked.iter().take(args.top) {
        println!("{:>4}. {:<28} {}", entry.rank, entry.name, entry.count);
    }
    println!("      {:<28} {}", Platform::Unidentified.label(), stats.unidentified);
    println!();
    println!("Current platform per site:");
    for entry in stats.current.iter().take(args.top) {
        println!("{:>4}. {:<28} {}", entry.rank, entry.name, entry.count);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn store() -> HistoryStore {
        let d = |month, day| NaiveDate::from_ymd_opt(2024, month, day).unwrap();
        let mut store = HistoryStore::new();
        store.record_if_changed("A", d(1, 1), "Magento");
        store.record_if_changed("A", d(3, 1), "Shopify");
        store.record_if_changed("B", d(1, 1), "Shopify");
        store.record_if_changed("C", d(1, 1), "Unidentified");
        store.record_if_changed("C", d(2, 1), "Wix");
        store.record_if_changed("D", d(1, 1), "Unidentified");
        store
    }

    #[test]
    fn ranks_all_observations_and_sets_fallback_aside() {
        let stats = PlatformStats::from_store(&store());

        assert_eq!(stats.total_sites, 4);
        assert_eq!(stats.unidentified, 2);
        let ranked: Vec<_> = stats
            .ranked
            .iter()
            .map(|e| (e.rank, e.name.as_str(), e.count))
            .collect();
        assert_eq!(ranked, [(1, "Shopify", 2), (2, "Magento", 1), (3, "Wix", 1)]);
        assert_eq!(stats.total_platforms(), 3);
        assert!(!stats.unique_platforms().contains("Unidentified"));
    }

    #[test]
    fn platform_by_rank_is_one_based() {
        let stats = PlatformStats::from_store(&store());
        assert_eq!(stats.platform_by_rank(1).map(|e| e.name.as_str()), Some("Shopify"));
        assert!(stats.platform_by_rank(0).is_none());
        assert!(stats.platform_by_rank(4).is_none());
    }

    #[test]
    fn current_uses_latest_label_per_site() {
        let stats = PlatformStats::from_store(&store());
        let current: Vec<_> = stats
            .current
            .iter()
            .map(|e| (e.name.as_str(), e.count))
            .collect();
        assert_eq!(current, [("Shopify", 2), ("Unidentified", 1), ("Wix", 1)]);
    }

    #[test]
    fn empty_store_has_no_ranking() {
        let stats = PlatformStats::from_store(&HistoryStore::new());
        assert_eq!(stats.total_sites, 0);
        assert!(stats.ranked.is_empty());
        assert!(stats.platform_by_rank(1).is_none());
    }
}
