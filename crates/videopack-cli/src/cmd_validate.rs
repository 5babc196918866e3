use std::path::{Path, PathBuf};
use videopack_core::{
    read_pack, read_pack_upgraded, validate_with, PackError, UpgradePolicy, ValidationMode,
};

pub struct ValidateParams<'a> {
    pub paths: &'a [PathBuf],
    pub mode: ValidationMode,
    /// Run the upgrade path before construction, with this policy.
    pub upgrade: Option<UpgradePolicy>,
}

/// Everything wrong with one file. A file that cannot be read or constructed
/// yields exactly that one error.
pub fn check_file(path: &Path, mode: ValidationMode, upgrade: Option<UpgradePolicy>) -> Vec<PackError> {
    let loaded = match upgrade {
        Some(policy) => read_pack_upgraded(path, policy),
        None => read_pack(path),
    };
    match loaded {
        Ok(pack) => validate_with(&pack, mode).err().unwrap_or_default(),
        Err(e) => vec![e],
    }
}

/// `videopack validate <PATH>...`
pub fn execute(params: &ValidateParams<'_>) -> anyhow::Result<()> {
    let single = params.paths.len() == 1;
    let mut failed = 0usize;

    for path in params.paths {
        let problems = check_file(path, params.mode, params.upgrade);
        if problems.is_empty() {
            if single {
                println!("OK");
            } else {
                println!("{}: OK", path.display());
            }
            continue;
        }
        failed += 1;
        for problem in &problems {
            eprintln!("{}: {}: {problem}", path.display(), problem.kind());
        }
    }

    if failed > 0 {
        anyhow::bail!(
            "{failed} of {} pack(s) failed validation",
            params.paths.len()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn write(dir: &Path, name: &str, value: serde_json::Value) -> PathBuf {
        let path = dir.join(name);
        videopack_core::save_json(&path, &value).unwrap();
        path
    }

    fn pack_json(full_text: &str, spans: &[(f64, f64)]) -> serde_json::Value {
        let segments: Vec<_> = spans
            .iter()
            .enumerate()
            .map(|(i, (s, e))| json!({"idx": i, "start_s": s, "end_s": e, "text": "t"}))
            .collect();
        json!({
            "version": "v0",
            "video_id": "auJzb1D-fag",
            "transcript": {"full_text": full_text, "segments": segments},
            "provenance": {"created_at": "2026-10-18T08:00:00Z"},
        })
    }

    #[test]
    fn valid_file_has_no_problems() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "ok.json", pack_json("Hi", &[(0.0, 0.5), (0.5, 1.0)]));
        assert!(check_file(&path, ValidationMode::FailFast, None).is_empty());
        let paths = vec![path];
        execute(&ValidateParams {
            paths: &paths,
            mode: ValidationMode::FailFast,
            upgrade: None,
        })
        .unwrap();
    }

    #[test]
    fn collect_all_reports_every_problem() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            "bad.json",
            pack_json("  ", &[(0.0, 0.5), (0.5, 1.0), (0.4, 0.9)]),
        );
        assert_eq!(check_file(&path, ValidationMode::FailFast, None).len(), 1);
        let kinds: Vec<&str> = check_file(&path, ValidationMode::CollectAll, None)
            .iter()
            .map(|e| e.kind())
            .collect();
        assert_eq!(kinds, ["missing_content", "overlapping_segment"]);
    }

    #[test]
    fn any_failure_fails_the_command() {
        let dir = tempfile::tempdir().unwrap();
        let good = write(dir.path(), "good.json", pack_json("Hi", &[]));
        let missing = dir.path().join("missing.json");
        let paths = vec![good, missing.clone()];
        let err = execute(&ValidateParams {
            paths: &paths,
            mode: ValidationMode::FailFast,
            upgrade: None,
        })
        .unwrap_err();
        assert!(err.to_string().contains("1 of 2"));
        assert_eq!(
            check_file(&missing, ValidationMode::FailFast, None)[0].kind(),
            "not_found"
        );
    }

    #[test]
    fn upgrade_flag_accepts_legacy_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut legacy = pack_json("Hi", &[]);
        legacy.as_object_mut().unwrap().remove("version");
        let path = write(dir.path(), "legacy.json", legacy);

        assert!(check_file(&path, ValidationMode::FailFast, Some(UpgradePolicy::HardFail)).is_empty());
    }
}
