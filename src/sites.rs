use std::path::Path;

use anyhow::Context as _;

use crate::formats::SiteRecord;

/// Loads the site list. A missing or malformed file is fatal to the caller.
pub fn load_sites(path: &Path) -> anyhow::Result<Vec<SiteRecord>> {
    let sites = crate::json_file::read_json::<Vec<SiteRecord>>(path)
        .with_context(|| format!("parse site list: {}", path.display()))?;
    match sites {
        Some(sites) => Ok(sites),
        None => anyhow::bail!("site list not found: {}", path.display()),
    }
}

pub fn write_sites(path: &Path, sites: &[SiteRecord]) -> anyhow::Result<()> {
    crate::json_file::write_json_atomic(path, &sites, b"    ")
        .with_context(|| format!("write site list: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_site_list_names_the_path() -> anyhow::Result<()> {
        let temp = tempfile::TempDir::new()?;
        let path = temp.path().join("sites.json");
        let err = load_sites(&path).unwrap_err();
        assert!(format!("{err:#}").contains("site list not found"));
        Ok(())
    }

    #[test]
    fn malformed_site_list_is_rejected() -> anyhow::Result<()> {
        let temp = tempfile::TempDir::new()?;
        let path = temp.path().join("sites.json");
        std::fs::write(&path, r#"{"name": "not a list"}"#)?;
        let err = load_sites(&path).unwrap_err();
        assert!(format!("{err:#}").contains("parse site list"));
        Ok(())
    }
}
