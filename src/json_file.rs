use std::io::Write as _;
use std::path::Path;

use anyhow::Context as _;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Reads and parses a JSON file. A missing file is `Ok(None)`.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<Option<T>> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => {
            return Err(anyhow::Error::new(err).context(format!("read: {}", path.display())));
        }
    };
    let value = serde_json::from_slice(&bytes).context("parse json")?;
    Ok(Some(value))
}

/// Pretty-prints `value` with the given indent into a temp file next to `path`,
/// then renames it over `path`.
pub fn write_json_atomic<T: Serialize>(path: &Path, value: &T, indent: &[u8]) -> anyhow::Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)
        .with_context(|| format!("create parent dir: {}", parent.display()))?;

    let mut tmp = tempfile::NamedTempFile::new_in(parent)
        .with_context(|| format!("create temp file in: {}", parent.display()))?;
    {
        let formatter = serde_json::ser::PrettyFormatter::with_indent(indent);
        let mut serializer = serde_json::Serializer::with_formatter(&mut tmp, formatter);
        value.serialize(&mut serializer).context("serialize json")?;
    }
    tmp.write_all(b"\n").context("write trailing newline")?;
    tmp.flush().context("flush temp file")?;

    tmp.persist(path)
        .map_err(|err| err.error)
        .with_context(|| format!("rename temp file to final: {}", path.display()))?;
    Ok(())
}
