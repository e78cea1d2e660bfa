use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::Context as _;

use crate::cli::DedupArgs;
use crate::formats::SiteRecord;
use crate::normalize::{normalize_name, normalize_url};

/// Result of a dedup pass over a site list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DedupOutcome {
    pub kept: Vec<SiteRecord>,
    /// Records whose normalized name or URL was already taken.
    pub duplicates: usize,
    /// Records without a name or URL.
    pub dropped: usize,
}

/// Keeps the first record for each normalized name and normalized URL.
///
/// A record survives only when neither key has been seen before; keeping it marks
/// both keys as seen. Records without a name or URL are dropped outright and are not
/// counted as duplicates.
pub fn dedup_sites(sites: Vec<SiteRecord>) -> DedupOutcome {
    let mut seen_names = HashSet::new();
    let mut seen_urls = HashSet::new();
    let mut outcome = DedupOutcome::default();

    for site in sites {
        let (Some(name), Some(url)) = (site.name(), site.url()) else {
            tracing::debug!(?site, "dropping site without name or url");
            outcome.dropped += 1;
            continue;
        };

        let name = normalize_name(name);
        let url = normalize_url(url);
        if seen_names.contains(&name) || seen_urls.contains(&url) {
            outcome.duplicates += 1;
            continue;
        }
        seen_names.insert(name);
        seen_urls.insert(url);
        outcome.kept.push(site);
    }

    outcome
}

pub fn run(args: DedupArgs) -> anyhow::Result<()> {
    let sites_path = PathBuf::from(&args.sites);

    let sites = crate::sites::load_sites(&sites_path).context("load site list")?;
    println!("Reading from '{}'...", sites_path.display());

    let total = sites.len();
    let outcome = dedup_sites(sites);

    crate::sites::write_sites(&sites_path, &outcome.kept)?;

    println!("Successfully processed {total} entries.");
    if outcome.dropped > 0 {
        println!(
            "Dropped {} entries missing a name or url.",
            outcome.dropped
        );
    }
    if outcome.duplicates > 0 {
        println!("Removed {} duplicates.", outcome.duplicates);
    } else {
        println!("No duplicates found.");
    }
    if outcome.kept.len() < total {
        println!(
            "Saved {} unique stores back to '{}'.",
            outcome.kept.len(),
            sites_path.display()
        );
    } else {
        println!("'{}' remains unchanged in content.", sites_path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(sites: &[SiteRecord]) -> Vec<&str> {
        sites.iter().filter_map(SiteRecord::name).collect()
    }

    #[test]
    fn keeps_first_occurrence_in_order() {
        let sites = vec![
            SiteRecord::new("A", "http://x.com"),
            SiteRecord::new("a", "http://WWW.X.com/"),
            SiteRecord::new("B", "http://y.com"),
        ];
        let outcome = dedup_sites(sites);
        assert_eq!(names(&outcome.kept), ["A", "B"]);
        assert_eq!(outcome.duplicates, 1);
        assert_eq!(outcome.dropped, 0);
    }

    #[test]
    fn either_key_collision_is_a_duplicate() {
        let sites = vec![
            SiteRecord::new("Acme", "https://acme.test"),
            SiteRecord::new("ACME ", "https://other.test"),
            SiteRecord::new("Acme Outlet", "https://www.acme.test/"),
            SiteRecord::new("Other", "https://other.test"),
        ];
        assert_eq!(names(&dedup_sites(sites).kept), ["Acme", "Other"]);
    }

    #[test]
    fn rejected_records_do_not_mark_keys_seen() {
        // "b" collides on url with A, so its name stays available for the third record.
        let sites = vec![
            SiteRecord::new("A", "https://a.test"),
            SiteRecord::new("B", "https://a.test"),
            SiteRecord::new("b", "https://b.test"),
        ];
        assert_eq!(names(&dedup_sites(sites).kept), ["A", "b"]);
    }

    #[test]
    fn records_missing_a_field_are_dropped() {
        let sites = vec![
            SiteRecord::new("NoUrl", ""),
            SiteRecord {
                name: None,
                url: Some("https://anon.test".to_owned()),
                extra: serde_json::Map::new(),
            },
            SiteRecord::new("NoUrl", "https://has-url.test"),
        ];
        let outcome = dedup_sites(sites);
        assert_eq!(outcome.kept.len(), 1);
        assert_eq!(outcome.kept[0].url(), Some("https://has-url.test"));
        assert_eq!(outcome.dropped, 2);
        assert_eq!(outcome.duplicates, 0);
    }
}
