//! Reading and writing pack documents on disk.

use crate::error::{PackError, Result};
use crate::schema::VideoPack;
use crate::versioning::{upgrade, UpgradePolicy};
use serde_json::Value;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Read and parse a JSON document.
pub fn load_json(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            PackError::NotFound(path.to_path_buf())
        } else {
            PackError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    tracing::debug!(path = %path.display(), bytes = content.len(), "loaded json");
    serde_json::from_str(&content).map_err(|source| PackError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Write `data` as indented JSON, creating parent directories as needed.
/// Any existing file is replaced; the bytes land in a sibling temp file first
/// and are renamed into place.
pub fn save_json(path: &Path, data: &Value) -> Result<()> {
    let io_err = |source: std::io::Error| PackError::Io {
        path: path.to_path_buf(),
        source,
    };

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(io_err)?;

    let mut body = serde_json::to_vec_pretty(data)?;
    body.push(b'\n');

    let mut tmp = tempfile::NamedTempFile::new_in(parent).map_err(io_err)?;
    tmp.write_all(&body).map_err(io_err)?;
    tmp.flush().map_err(io_err)?;
    tmp.persist(path).map_err(|e| io_err(e.error))?;
    tracing::debug!(path = %path.display(), bytes = body.len(), "saved json");
    Ok(())
}

/// Load a pack, applying construction checks.
pub fn read_pack(path: &Path) -> Result<VideoPack> {
    VideoPack::from_value(load_json(path)?)
}

/// Load a pack that may predate the current format, upgrading it first.
pub fn read_pack_upgraded(path: &Path, policy: UpgradePolicy) -> Result<VideoPack> {
    let value = load_json(path)?;
    let Value::Object(raw) = value else {
        return Err(PackError::schema("<root>", "expected a JSON object"));
    };
    VideoPack::from_value(Value::Object(upgrade(raw, policy)?))
}

/// Write a pack. Numeric fields are re-checked first, since a non-finite
/// value would be written as `null` and the file would no longer load.
pub fn write_pack(path: &Path, pack: &VideoPack) -> Result<()> {
    pack.check_fields()?;
    save_json(path, &pack.to_value()?)
}
