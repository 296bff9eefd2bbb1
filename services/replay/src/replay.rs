use anyhow::{Context, Result};
use purifier_core::Skill;
use purifier_skill_types::{RequestEnvelope, ResponseEnvelope};
use std::io::Read;
use std::path::Path;

/// Reads a request envelope from `path`, or from stdin when `path` is `-`.
pub fn load_envelope(path: &Path) -> Result<RequestEnvelope> {
    let raw = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read envelope from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read envelope file: {}", path.display()))?
    };

    parse_envelope(&raw)
}

pub fn parse_envelope(raw: &str) -> Result<RequestEnvelope> {
    serde_json::from_str(raw).context("Input is not a valid request envelope")
}

pub async fn run(skill: &Skill, envelope: &RequestEnvelope) -> ResponseEnvelope {
    tracing::info!("Replaying {} request", envelope.request.kind());
    skill.handle(envelope).await
}

pub fn render(response: &ResponseEnvelope, compact: bool) -> Result<String> {
    let rendered = if compact {
        serde_json::to_string(response)?
    } else {
        serde_json::to_string_pretty(response)?
    };
    Ok(rendered)
}
