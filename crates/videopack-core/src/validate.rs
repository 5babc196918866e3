//! Cross-field checks that construction cannot express.

use crate::error::PackError;
use crate::schema::VideoPack;
use crate::versioning::PackVersion;
use serde::Deserialize;

/// Tolerance when comparing a segment start against the previous end.
pub const SEGMENT_EPSILON: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationMode {
    /// Stop at the first violation.
    #[default]
    FailFast,
    /// Report every violation in check order.
    CollectAll,
}

/// Check version, transcript content, and segment ordering. Returns the first
/// violation.
pub fn validate_pack(pack: &VideoPack) -> Result<(), PackError> {
    match violations(pack, ValidationMode::FailFast).into_iter().next() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// Same checks as [`validate_pack`], reporting every violation.
pub fn validate_pack_all(pack: &VideoPack) -> Vec<PackError> {
    violations(pack, ValidationMode::CollectAll)
}

pub fn validate_with(pack: &VideoPack, mode: ValidationMode) -> Result<(), Vec<PackError>> {
    let found = violations(pack, mode);
    if found.is_empty() {
        Ok(())
    } else {
        Err(found)
    }
}

fn violations(pack: &VideoPack, mode: ValidationMode) -> Vec<PackError> {
    let mut found = Vec::new();
    let stop = |found: &[PackError]| mode == ValidationMode::FailFast && !found.is_empty();

    if pack.version != PackVersion::CURRENT {
        found.push(PackError::UnsupportedVersion(pack.version.to_string()));
        if stop(&found) {
            return found;
        }
    }

    if pack.transcript.full_text.trim().is_empty() {
        found.push(PackError::MissingContent);
        if stop(&found) {
            return found;
        }
    }

    let mut last_end = 0.0_f64;
    for seg in &pack.transcript.segments {
        if seg.start_s > seg.end_s {
            found.push(PackError::InvalidSegment {
                idx: seg.idx,
                start_s: seg.start_s,
                end_s: seg.end_s,
            });
            if stop(&found) {
                return found;
            }
        }
        if seg.start_s < last_end - SEGMENT_EPSILON {
            found.push(PackError::OverlappingSegment {
                idx: seg.idx,
                start_s: seg.start_s,
                prev_end_s: last_end,
            });
            if stop(&found) {
                return found;
            }
        }
        last_end = seg.end_s;
    }

    found
}
