//! Comparison keys for site-list deduplication.
//!
//! URL cleanup is a plain substring edit, not host-aware parsing: the first `www.`
//! anywhere in the string is removed.

#[must_use]
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

#[must_use]
pub fn normalize_url(url: &str) -> String {
    let url = url.trim().to_lowercase().replacen("www.", "", 1);
    match url.strip_suffix('/') {
        Some(stripped) => stripped.to_owned(),
        None => url,
    }
}
