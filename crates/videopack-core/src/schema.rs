//! The VideoPack document model.
//!
//! Per-field constraints (required fields, minimum lengths, finite non-negative
//! numbers, the keyframe content rule) are checked when a value is built,
//! either through the constructors here or through `Deserialize`, which routes
//! every document through [`VideoPack::from_value`]'s checks. Rules spanning
//! several fields live in [`crate::validate`].

use crate::error::{PackError, Result};
use crate::versioning::PackVersion;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use time::OffsetDateTime;

/// Minimum length of `video_id` after trimming.
pub const MIN_VIDEO_ID_LEN: usize = 3;

/// A complete, checked pack. Fields are public for reading; treat a pack as a
/// snapshot and build a new one rather than editing in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "VideoPackRecord")]
pub struct VideoPack {
    pub version: PackVersion,
    pub id: String,
    pub video_id: String,
    pub source_url: Option<String>,
    pub transcript: Transcript,
    pub keyframes: Vec<Keyframe>,
    pub concepts: Vec<String>,
    pub requirements: Vec<Requirement>,
    pub code_snippets: Vec<CodeSnippet>,
    pub artifacts: Vec<ArtifactRef>,
    pub metrics: Metrics,
    pub provenance: Provenance,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    #[serde(default)]
    pub language: Option<String>,
    pub full_text: String,
    #[serde(default)]
    pub segments: Vec<TranscriptSegment>,
}

impl Transcript {
    pub fn new(full_text: impl Into<String>, segments: Vec<TranscriptSegment>) -> Self {
        Self {
            language: None,
            full_text: full_text.into(),
            segments,
        }
    }

    /// End of the last segment, if any.
    pub fn duration_s(&self) -> Option<f64> {
        self.segments.last().map(|s| s.end_s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    pub idx: i64,
    pub start_s: f64,
    pub end_s: f64,
    pub text: String,
}

impl TranscriptSegment {
    pub fn new(idx: i64, start_s: f64, end_s: f64, text: impl Into<String>) -> Result<Self> {
        let seg = Self {
            idx,
            start_s,
            end_s,
            text: text.into(),
        };
        seg.check_times(&format!("segments[{idx}]"))?;
        Ok(seg)
    }

    fn check_times(&self, at: &str) -> Result<()> {
        non_negative(&format!("{at}.start_s"), self.start_s)?;
        non_negative(&format!("{at}.end_s"), self.end_s)
    }
}

/// A still frame. Carries at least one of `image_path` or `desc`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "KeyframeRecord")]
pub struct Keyframe {
    pub t_s: f64,
    pub image_path: Option<String>,
    pub desc: Option<String>,
}

#[derive(Deserialize)]
struct KeyframeRecord {
    t_s: f64,
    #[serde(default)]
    image_path: Option<String>,
    #[serde(default)]
    desc: Option<String>,
}

impl TryFrom<KeyframeRecord> for Keyframe {
    type Error = PackError;

    fn try_from(r: KeyframeRecord) -> Result<Self> {
        Keyframe::new(r.t_s, r.image_path, r.desc)
    }
}

impl Keyframe {
    pub fn new(t_s: f64, image_path: Option<String>, desc: Option<String>) -> Result<Self> {
        non_negative("keyframe.t_s", t_s)?;
        if image_path.is_none() && desc.is_none() {
            return Err(PackError::schema(
                "keyframe",
                "keyframe requires image_path or desc",
            ));
        }
        Ok(Self {
            t_s,
            image_path,
            desc,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Requirement {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeSnippet {
    #[serde(default)]
    pub path_hint: Option<String>,
    #[serde(default)]
    pub lang: Option<String>,
    pub content: String,
}

/// Pointer to something produced from the video (a repo, a file, a URL).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactRef {
    pub kind: String,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub meta: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    #[serde(default)]
    pub cost_usd: Option<f64>,
    #[serde(default)]
    pub latency_ms: Option<u64>,
    #[serde(default)]
    pub tokens_in: Option<u64>,
    #[serde(default)]
    pub tokens_out: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Provenance {
    #[serde(with = "created_at_format")]
    pub created_at: OffsetDateTime,
    #[serde(default)]
    pub tool_versions: BTreeMap<String, String>,
    #[serde(default)]
    pub source_hash: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Wire shape of a pack before construction checks run. Required fields are
/// optional here so their absence is reported by name.
#[derive(Deserialize)]
struct VideoPackRecord {
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    video_id: Option<String>,
    #[serde(default)]
    source_url: Option<String>,
    #[serde(default)]
    transcript: Option<Transcript>,
    #[serde(default)]
    keyframes: Vec<Keyframe>,
    #[serde(default)]
    concepts: Vec<String>,
    #[serde(default)]
    requirements: Vec<Requirement>,
    #[serde(default)]
    code_snippets: Vec<CodeSnippet>,
    #[serde(default)]
    artifacts: Vec<ArtifactRef>,
    #[serde(default)]
    metrics: Metrics,
    #[serde(default)]
    provenance: Option<Provenance>,
}

impl TryFrom<VideoPackRecord> for VideoPack {
    type Error = PackError;

    fn try_from(r: VideoPackRecord) -> Result<Self> {
        let version = match r.version.as_deref() {
            None => PackVersion::CURRENT,
            Some(label) => PackVersion::parse(label)
                .ok_or_else(|| PackError::UnsupportedVersion(label.to_string()))?,
        };
        let video_id = check_video_id(r.video_id.as_deref())?;
        let transcript = r
            .transcript
            .ok_or_else(|| PackError::schema("transcript", "field required"))?;
        let provenance = r
            .provenance
            .ok_or_else(|| PackError::schema("provenance", "field required"))?;

        let pack = VideoPack {
            version,
            id: r.id.unwrap_or_else(new_pack_id),
            video_id,
            source_url: r.source_url,
            transcript,
            keyframes: r.keyframes,
            concepts: r.concepts,
            requirements: r.requirements,
            code_snippets: r.code_snippets,
            artifacts: r.artifacts,
            metrics: r.metrics,
            provenance,
        };
        pack.check_fields()?;
        Ok(pack)
    }
}

impl VideoPack {
    /// Build a pack with empty collections and absent metrics.
    pub fn new(video_id: &str, transcript: Transcript, provenance: Provenance) -> Result<Self> {
        let pack = VideoPack {
            version: PackVersion::CURRENT,
            id: new_pack_id(),
            video_id: check_video_id(Some(video_id))?,
            source_url: None,
            transcript,
            keyframes: Vec::new(),
            concepts: Vec::new(),
            requirements: Vec::new(),
            code_snippets: Vec::new(),
            artifacts: Vec::new(),
            metrics: Metrics::default(),
            provenance,
        };
        pack.check_fields()?;
        Ok(pack)
    }

    /// Re-run the per-field numeric checks. Fields are public, so a pack
    /// edited after construction is checked again before it is written.
    pub fn check_fields(&self) -> Result<()> {
        for (i, seg) in self.transcript.segments.iter().enumerate() {
            seg.check_times(&format!("transcript.segments[{i}]"))?;
        }
        for (i, kf) in self.keyframes.iter().enumerate() {
            non_negative(&format!("keyframes[{i}].t_s"), kf.t_s)?;
        }
        if let Some(cost) = self.metrics.cost_usd {
            non_negative("metrics.cost_usd", cost)?;
        }
        Ok(())
    }

    /// Construct from a JSON mapping, applying every per-field check.
    pub fn from_value(value: Value) -> Result<Self> {
        if !value.is_object() {
            return Err(PackError::schema("<root>", "expected a JSON object"));
        }
        let record = VideoPackRecord::deserialize(&value).map_err(|e| {
            PackError::schema(failing_key(&value).unwrap_or("<root>"), e.to_string())
        })?;
        VideoPack::try_from(record)
    }

    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

fn new_pack_id() -> String {
    ulid::Ulid::new().to_string().to_lowercase()
}

fn check_video_id(raw: Option<&str>) -> Result<String> {
    let Some(raw) = raw else {
        return Err(PackError::schema("video_id", "field required"));
    };
    let trimmed = raw.trim();
    if trimmed.chars().count() < MIN_VIDEO_ID_LEN {
        return Err(PackError::schema(
            "video_id",
            format!("must be at least {MIN_VIDEO_ID_LEN} characters after trimming, got {trimmed:?}"),
        ));
    }
    Ok(trimmed.to_string())
}

/// First top-level key whose value does not decode as its field type.
fn failing_key(doc: &Value) -> Option<&'static str> {
    fn fails<T: DeserializeOwned>(doc: &Value, key: &str) -> bool {
        doc.get(key).is_some_and(|v| T::deserialize(v).is_err())
    }
    [
        ("version", fails::<Option<String>> as fn(&Value, &str) -> bool),
        ("id", fails::<Option<String>>),
        ("video_id", fails::<Option<String>>),
        ("source_url", fails::<Option<String>>),
        ("transcript", fails::<Option<Transcript>>),
        ("keyframes", fails::<Vec<Keyframe>>),
        ("concepts", fails::<Vec<String>>),
        ("requirements", fails::<Vec<Requirement>>),
        ("code_snippets", fails::<Vec<CodeSnippet>>),
        ("artifacts", fails::<Vec<ArtifactRef>>),
        ("metrics", fails::<Metrics>),
        ("provenance", fails::<Option<Provenance>>),
    ]
    .into_iter()
    .find(|(key, check)| check(doc, key))
    .map(|(key, _)| key)
}

/// Times, costs and offsets: finite and not negative. Infinities would be
/// written as `null` and never read back.
fn non_negative(field: &str, v: f64) -> Result<()> {
    if !v.is_finite() || v < 0.0 {
        return Err(PackError::schema(
            field,
            format!("must be a finite number >= 0, got {v}"),
        ));
    }
    Ok(())
}

/// RFC 3339 on write. On read, RFC 3339 or an ISO 8601 timestamp without an
/// offset, which is taken as UTC.
mod created_at_format {
    use serde::{de, ser, Deserialize, Deserializer, Serializer};
    use time::format_description::well_known::{Iso8601, Rfc3339};
    use time::{OffsetDateTime, PrimitiveDateTime};

    pub fn serialize<S: Serializer>(ts: &OffsetDateTime, s: S) -> Result<S::Ok, S::Error> {
        let formatted = ts.format(&Rfc3339).map_err(ser::Error::custom)?;
        s.serialize_str(&formatted)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<OffsetDateTime, D::Error> {
        let raw = String::deserialize(d)?;
        if let Ok(ts) = OffsetDateTime::parse(&raw, &Rfc3339) {
            return Ok(ts);
        }
        PrimitiveDateTime::parse(&raw, &Iso8601::DEFAULT)
            .map(PrimitiveDateTime::assume_utc)
            .map_err(|e| de::Error::custom(format!("invalid created_at {raw:?}: {e}")))
    }
}
