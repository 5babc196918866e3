use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PackError {
    #[error("schema validation failed for `{field}`: {reason}")]
    Schema { field: String, reason: String },

    #[error("transcript full_text is empty")]
    MissingContent,

    #[error("segment {idx}: start_s {start_s} is after end_s {end_s}")]
    InvalidSegment { idx: i64, start_s: f64, end_s: f64 },

    #[error("segment {idx}: start_s {start_s} overlaps previous segment ending at {prev_end_s}")]
    OverlappingSegment {
        idx: i64,
        start_s: f64,
        prev_end_s: f64,
    },

    #[error("unsupported pack version: {0:?}")]
    UnsupportedVersion(String),

    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("malformed JSON in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl PackError {
    pub(crate) fn schema(field: impl Into<String>, reason: impl Into<String>) -> Self {
        PackError::Schema {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Stable snake_case label for the error kind, used in reports.
    pub fn kind(&self) -> &'static str {
        match self {
            PackError::Schema { .. } => "schema_validation",
            PackError::MissingContent => "missing_content",
            PackError::InvalidSegment { .. } => "invalid_segment",
            PackError::OverlappingSegment { .. } => "overlapping_segment",
            PackError::UnsupportedVersion(_) => "unsupported_version",
            PackError::NotFound(_) => "not_found",
            PackError::Parse { .. } => "parse",
            PackError::Io { .. } => "io",
            PackError::Serialize(_) => "serialize",
        }
    }
}

pub type Result<T> = std::result::Result<T, PackError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_labels_are_snake_case() {
        let errs = [
            PackError::schema("video_id", "too short"),
            PackError::MissingContent,
            PackError::UnsupportedVersion("v9".into()),
            PackError::NotFound(PathBuf::from("x.json")),
        ];
        let kinds: Vec<&str> = errs.iter().map(|e| e.kind()).collect();
        assert_eq!(
            kinds,
            ["schema_validation", "missing_content", "unsupported_version", "not_found"]
        );
    }

    #[test]
    fn messages_name_the_offending_segment() {
        let err = PackError::OverlappingSegment {
            idx: 2,
            start_s: 0.4,
            prev_end_s: 1.0,
        };
        let msg = err.to_string();
        assert!(msg.contains("segment 2"));
        assert!(msg.contains("0.4"));
    }
}
