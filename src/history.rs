use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context as _;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::formats::{Observation, SiteRecord};

/// Key used for a site that has neither a name nor a URL.
pub const FALLBACK_SITE_KEY: &str = "unidentified";

/// Picks the store key for a site: its name, else its URL, else [`FALLBACK_SITE_KEY`].
pub fn site_key(site: &SiteRecord) -> &str {
    site.name().or_else(|| site.url()).unwrap_or(FALLBACK_SITE_KEY)
}

/// Observations for one site, oldest first. Adjacent entries never share a label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SiteHistory {
    observations: Vec<Observation>,
}

impl SiteHistory {
    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn current_platform(&self) -> Option<&str> {
        self.observations.last().map(|obs| obs.platform.as_str())
    }

    /// Appends `(date, platform)` unless `platform` is already the latest label.
    /// Returns whether an observation was appended.
    pub fn record_if_changed(&mut self, date: NaiveDate, platform: &str) -> bool {
        if self.current_platform() == Some(platform) {
            return false;
        }
        self.observations.push(Observation::new(date, platform));
        true
    }
}

/// Every tracked site's history, keyed by site key.
///
/// Loaded whole at the start of a run and written back whole at the end.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoryStore {
    sites: BTreeMap<String, SiteHistory>,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the persisted store. A missing file is an empty store.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let store = crate::json_file::read_json::<Self>(path)
            .with_context(|| format!("parse history store: {}", path.display()))?;
        match store {
            Some(store) => Ok(store),
            None => {
                tracing::info!(path = %path.display(), "no history store yet; starting empty");
                Ok(Self::default())
            }
        }
    }

    /// Overwrites `path` with the whole store.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        crate::json_file::write_json_atomic(path, self, b"  ")
            .with_context(|| format!("write history store: {}", path.display()))
    }

    pub fn record_if_changed(&mut self, site_key: &str, date: NaiveDate, platform: &str) -> bool {
        match self.sites.get_mut(site_key) {
            Some(history) => history.record_if_changed(date, platform),
            None => {
                let mut history = SiteHistory::default();
                history.record_if_changed(date, platform);
                self.sites.insert(site_key.to_owned(), history);
                true
            }
        }
    }

    pub fn get(&self, site_key: &str) -> Option<&SiteHistory> {
        self.sites.get(site_key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SiteHistory)> {
        self.sites.iter().map(|(key, history)| (key.as_str(), history))
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }
}
