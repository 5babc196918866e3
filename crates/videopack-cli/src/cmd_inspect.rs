use anyhow::Context;
use serde::Serialize;
use std::fmt::Write as _;
use std::path::Path;
use time::format_description::well_known::Rfc3339;
use videopack_core::{pack_fingerprint, read_pack, VideoPack};

#[derive(Debug, Serialize)]
pub struct PackSummary {
    pub id: String,
    pub video_id: String,
    pub version: String,
    pub created_at: String,
    pub segments: usize,
    pub keyframes: usize,
    pub concepts: usize,
    pub requirements: usize,
    pub code_snippets: usize,
    pub artifacts: usize,
    pub duration_s: Option<f64>,
    pub fingerprint: String,
}

pub fn summarize(pack: &VideoPack) -> anyhow::Result<PackSummary> {
    Ok(PackSummary {
        id: pack.id.clone(),
        video_id: pack.video_id.clone(),
        version: pack.version.to_string(),
        created_at: pack.provenance.created_at.format(&Rfc3339)?,
        segments: pack.transcript.segments.len(),
        keyframes: pack.keyframes.len(),
        concepts: pack.concepts.len(),
        requirements: pack.requirements.len(),
        code_snippets: pack.code_snippets.len(),
        artifacts: pack.artifacts.len(),
        duration_s: pack.transcript.duration_s(),
        fingerprint: pack_fingerprint(pack)?,
    })
}

pub fn render(s: &PackSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Pack {} ({})", s.id, s.version);
    let _ = writeln!(out, "  video:        {}", s.video_id);
    let _ = writeln!(out, "  created:      {}", s.created_at);
    match s.duration_s {
        Some(d) => {
            let _ = writeln!(out, "  transcript:   {} segment(s), {d:.1}s", s.segments);
        }
        None => {
            let _ = writeln!(out, "  transcript:   no segments");
        }
    }
    let _ = writeln!(out, "  keyframes:    {}", s.keyframes);
    let _ = writeln!(out, "  concepts:     {}", s.concepts);
    let _ = writeln!(out, "  requirements: {}", s.requirements);
    let _ = writeln!(out, "  snippets:     {}", s.code_snippets);
    let _ = writeln!(out, "  artifacts:    {}", s.artifacts);
    let _ = writeln!(out, "  fingerprint:  {}", s.fingerprint);
    out
}

/// `videopack inspect <PATH>`
pub fn execute(path: &Path, json: bool) -> anyhow::Result<()> {
    let pack = read_pack(path).with_context(|| format!("reading {}", path.display()))?;
    let summary = summarize(&pack)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{}", render(&summary));
    }
    Ok(())
}
