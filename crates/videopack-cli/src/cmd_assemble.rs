use anyhow::Context;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::path::Path;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use videopack_core::{stable_hash, upgrade_to_v0, validate_pack, write_pack, VideoPack};

/// Parse `NAME=VERSION` from `--tool`.
pub fn parse_tool(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((name, version)) if !name.trim().is_empty() && !version.trim().is_empty() => {
            Ok((name.trim().to_string(), version.trim().to_string()))
        }
        _ => Err(format!("expected NAME=VERSION, got \"{s}\"")),
    }
}

/// Build a pack from collaborator data shaped like
/// `{video_id, transcript: {full_text, segments}, ...}`.
///
/// Missing v0 collections are filled, provenance is created when absent, tool
/// versions the source does not already declare are added, and the source
/// fingerprint is recorded when absent.
pub fn assemble(source: &Value, tools: &BTreeMap<String, String>) -> anyhow::Result<VideoPack> {
    let Value::Object(map) = source else {
        anyhow::bail!("source must be a JSON object");
    };
    let mut doc = upgrade_to_v0(map.clone());
    if !doc.contains_key("provenance") {
        let now = OffsetDateTime::now_utc().format(&Rfc3339)?;
        doc.insert("provenance".into(), json!({ "created_at": now }));
    }

    let mut pack = VideoPack::from_value(Value::Object(doc))?;
    for (name, version) in tools {
        pack.provenance
            .tool_versions
            .entry(name.clone())
            .or_insert_with(|| version.clone());
    }
    if pack.provenance.source_hash.is_none() {
        pack.provenance.source_hash = Some(stable_hash(source));
    }

    validate_pack(&pack)?;
    Ok(pack)
}

/// `videopack assemble <SOURCE> --out <PATH>`
pub fn execute(
    source_path: &Path,
    out: &Path,
    config_tools: &BTreeMap<String, String>,
    flag_tools: &[(String, String)],
) -> anyhow::Result<()> {
    let source = videopack_core::load_json(source_path)?;
    let mut tools = config_tools.clone();
    tools.extend(flag_tools.iter().cloned());

    let pack = assemble(&source, &tools)
        .with_context(|| format!("assembling pack from {}", source_path.display()))?;
    write_pack(out, &pack)?;
    tracing::info!(id = %pack.id, video_id = %pack.video_id, out = %out.display(), "pack written");
    println!("{} -> {}", pack.video_id, out.display());
    Ok(())
}
