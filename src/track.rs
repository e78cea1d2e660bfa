use std::path::PathBuf;

use anyhow::Context as _;
use chrono::NaiveDate;

use crate::cli::RunArgs;
use crate::fetch::{FetchConfig, Fetcher, HttpFetcher};
use crate::formats::SiteRecord;
use crate::history::{HistoryStore, site_key};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrackOptions {
    /// Leave a site's history alone when its fetch fails, instead of recording the
    /// fallback label.
    pub skip_failed: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub processed: usize,
    pub skipped: usize,
    pub fetch_failures: usize,
    pub changed: usize,
}

/// Fetches and classifies each site in turn, folding the results into `store`.
pub async fn track_sites(
    fetcher: &dyn Fetcher,
    sites: &[SiteRecord],
    store: &mut HistoryStore,
    date: NaiveDate,
    options: TrackOptions,
) -> RunSummary {
    let mut summary = RunSummary::default();

    for site in sites {
        let key = site_key(site);
        let Some(url) = site.url() else {
            tracing::warn!(site = %key, "site entry missing 'url'; skipping");
            summary.skipped += 1;
            continue;
        };

        println!("Checking {key} -> {url}");
        let fetched = fetcher.fetch(url).await;
        summary.processed += 1;

        if fetched.is_failure() {
            summary.fetch_failures += 1;
            if options.skip_failed {
                println!("  -> No page data. History left unchanged.");
                continue;
            }
        }

        let platform = crate::classify::classify_fetch(&fetched);
        println!("  -> Detected: {platform}");

        if store.record_if_changed(key, date, platform.label()) {
            summary.changed += 1;
            println!("  -> New platform detected. Updating data.");
        } else {
            println!("  -> Platform remains the same. No update.");
        }
    }

    summary
}

pub async fn run(args: RunArgs) -> anyhow::Result<()> {
    let sites_path = PathBuf::from(&args.sites);
    let data_path = PathBuf::from(&args.data);

    let sites = crate::sites::load_sites(&sites_path).context("load site list")?;
    let mut store = HistoryStore::load(&data_path).context("load history store")?;
    let date = args.date.unwrap_or_else(|| chrono::Utc::now().date_naive());
    let options = TrackOptions {
        skip_failed: args.skip_failed,
    };

    let config = FetchConfig::from_env()
        .context("load fetch config")?
        .with_timeout_secs(args.timeout_secs);
    tracing::info!(sites = sites.len(), %date, timeout = ?config.timeout, "starting run");

    let fetcher = HttpFetcher::open(config).context("open http fetcher")?;
    let summary = track_sites(&fetcher, &sites, &mut store, date, options).await;
    fetcher.close().await.context("close http fetcher")?;

    store.save(&data_path)?;

    println!(
        "Processed {} sites, {} changed, {} skipped ({} fetch failures).",
        summary.processed, summary.changed, summary.skipped, summary.fetch_failures
    );
    println!("Data saved to {}", data_path.display());
    Ok(())
}
