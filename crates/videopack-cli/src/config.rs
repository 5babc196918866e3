use anyhow::Context;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use videopack_core::{UpgradePolicy, ValidationMode};

pub const CONFIG_ENV: &str = "VIDEOPACK_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = ".videopack.json";

/// Settings read from the optional JSON config file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    pub upgrade_policy: UpgradePolicy,
    pub validation: ValidationMode,
    /// Stamped into provenance by `assemble`.
    pub tool_versions: BTreeMap<String, String>,
}

/// Pick the config file: `--config`, then `$VIDEOPACK_CONFIG`, then
/// `.videopack.json` in `cwd` when it exists. The second value says whether
/// the file was asked for explicitly (and so must exist).
fn resolve_path(
    explicit: Option<&Path>,
    env_value: Option<PathBuf>,
    cwd: &Path,
) -> Option<(PathBuf, bool)> {
    if let Some(p) = explicit {
        return Some((p.to_path_buf(), true));
    }
    if let Some(p) = env_value.filter(|p| !p.as_os_str().is_empty()) {
        return Some((p, true));
    }
    let default = cwd.join(DEFAULT_CONFIG_FILE);
    default.exists().then_some((default, false))
}

pub fn load(explicit: Option<&Path>, cwd: &Path) -> anyhow::Result<CliConfig> {
    let env_value = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
    load_from(explicit, env_value, cwd)
}

fn load_from(
    explicit: Option<&Path>,
    env_value: Option<PathBuf>,
    cwd: &Path,
) -> anyhow::Result<CliConfig> {
    let Some((path, required)) = resolve_path(explicit, env_value, cwd) else {
        return Ok(CliConfig::default());
    };
    if !required && !path.exists() {
        return Ok(CliConfig::default());
    }
    let raw = videopack_core::load_json(&path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config: CliConfig = serde_json::from_value(raw)
        .with_context(|| format!("invalid config {}", path.display()))?;
    tracing::debug!(path = %path.display(), ?config, "loaded config");
    Ok(config)
}
