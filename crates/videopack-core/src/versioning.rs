//! Pack format versions and the upgrade path for older documents.
//!
//! Every known source shape has an [`UpgradeStep`] in [`UPGRADE_STEPS`]. A
//! document is walked step by step until it declares [`PackVersion::CURRENT`].
//! Adding a new version means adding a variant and one step; nothing else
//! dispatches on version labels.

use crate::error::{PackError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fmt;
use std::str::FromStr;

/// Label used for documents that carry no `version` key at all.
pub const LEGACY_LABEL: &str = "legacy";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackVersion {
    #[default]
    V0,
}

impl PackVersion {
    pub const CURRENT: PackVersion = PackVersion::V0;

    pub fn as_str(&self) -> &'static str {
        match self {
            PackVersion::V0 => "v0",
        }
    }

    pub fn parse(label: &str) -> Option<PackVersion> {
        match label {
            "v0" => Some(PackVersion::V0),
            _ => None,
        }
    }
}

impl fmt::Display for PackVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How callers react to data declaring a version no step knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpgradePolicy {
    #[default]
    HardFail,
    BestEffort,
}

impl FromStr for UpgradePolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.replace('-', "_").as_str() {
            "hard_fail" => Ok(UpgradePolicy::HardFail),
            "best_effort" => Ok(UpgradePolicy::BestEffort),
            other => Err(format!(
                "unknown upgrade policy \"{other}\" (expected hard_fail or best_effort)"
            )),
        }
    }
}

/// One edge in the upgrade graph.
pub struct UpgradeStep {
    pub from: &'static str,
    pub to: PackVersion,
    pub apply: fn(Map<String, Value>) -> Map<String, Value>,
}

pub const UPGRADE_STEPS: &[UpgradeStep] = &[UpgradeStep {
    from: LEGACY_LABEL,
    to: PackVersion::V0,
    apply: upgrade_to_v0,
}];

/// Fill keys introduced by v0 with empty defaults. Present keys are never
/// touched, so applying this twice equals applying it once.
pub fn upgrade_to_v0(mut data: Map<String, Value>) -> Map<String, Value> {
    let defaults = [
        ("version", json!(PackVersion::V0.as_str())),
        ("metrics", json!({})),
        ("concepts", json!([])),
        ("keyframes", json!([])),
        ("requirements", json!([])),
        ("code_snippets", json!([])),
        ("artifacts", json!([])),
    ];
    for (key, default) in defaults {
        data.entry(key).or_insert(default);
    }
    data
}

/// The version label a raw document declares.
pub fn version_label(data: &Map<String, Value>) -> String {
    match data.get("version") {
        None | Some(Value::Null) => LEGACY_LABEL.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Walk `data` through [`UPGRADE_STEPS`] until it declares the current version.
pub fn upgrade(mut data: Map<String, Value>, policy: UpgradePolicy) -> Result<Map<String, Value>> {
    loop {
        let label = version_label(&data);
        if PackVersion::parse(&label) == Some(PackVersion::CURRENT) {
            return Ok(data);
        }

        let Some(step) = UPGRADE_STEPS.iter().find(|s| s.from == label) else {
            return match policy {
                UpgradePolicy::HardFail => Err(PackError::UnsupportedVersion(label)),
                UpgradePolicy::BestEffort => {
                    tracing::warn!(version = %label, "no upgrade step for version, filling v0 defaults only");
                    Ok(upgrade_to_v0(data))
                }
            };
        };

        tracing::debug!(from = step.from, to = %step.to, "applying upgrade step");
        data = (step.apply)(data);
        data.insert("version".into(), Value::String(step.to.as_str().into()));
    }
}
