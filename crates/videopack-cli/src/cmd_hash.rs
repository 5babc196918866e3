use anyhow::Context;
use std::path::Path;

/// Stable hash of any JSON file.
pub fn hash_file(path: &Path) -> anyhow::Result<String> {
    let value = videopack_core::load_json(path).with_context(|| format!("hashing {}", path.display()))?;
    Ok(videopack_core::stable_hash(&value))
}

/// `videopack hash <PATH>`
pub fn execute(path: &Path) -> anyhow::Result<()> {
    println!("{}", hash_file(path)?);
    Ok(())
}
