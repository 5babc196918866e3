use anyhow::Context;
use serde_json::Value;
use std::path::Path;
use videopack_core::{upgrade, write_pack, UpgradePolicy, VideoPack};

/// Upgrade the document at `input` and write it to `output` (which may be the
/// same path). The result is written through the checked pack type, so an id
/// generated for an id-less legacy document is persisted.
pub fn upgrade_file(input: &Path, output: &Path, policy: UpgradePolicy) -> anyhow::Result<VideoPack> {
    let value = videopack_core::load_json(input)?;
    let Value::Object(raw) = value else {
        anyhow::bail!("{} does not hold a JSON object", input.display());
    };
    let upgraded = upgrade(raw, policy)?;
    let pack = VideoPack::from_value(Value::Object(upgraded))
        .with_context(|| format!("{} does not form a valid pack after upgrade", input.display()))?;
    write_pack(output, &pack)?;
    Ok(pack)
}

/// `videopack upgrade <PATH> [--out PATH]`
pub fn execute(input: &Path, output: Option<&Path>, policy: UpgradePolicy) -> anyhow::Result<()> {
    let output = output.unwrap_or(input);
    let pack = upgrade_file(input, output, policy)
        .with_context(|| format!("upgrading {}", input.display()))?;
    println!(
        "Upgraded {} -> {} ({})",
        input.display(),
        output.display(),
        pack.version
    );
    Ok(())
}
