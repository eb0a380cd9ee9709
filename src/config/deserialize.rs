// ABOUTME: Custom serde deserializers for config fields.
// ABOUTME: Sanitizes repository names and accepts unquoted numeric tags.

use serde::Deserialize;

use crate::types::sanitize;

/// Sanitize a configured repository and reject any tag or digest.
pub(super) fn parse_repository(raw: &str) -> Result<String, String> {
    let repository = sanitize(raw).ok_or_else(|| format!("invalid repository: {raw:?}"))?;

    let last_segment = repository.rsplit('/').next().unwrap_or(&repository);
    if last_segment.contains(':') || repository.contains('@') {
        return Err(format!(
            "repository {repository} must not include a tag or digest; use baseline_version"
        ));
    }
    Ok(repository)
}

/// A sanitized repository identifier with no tag or digest.
pub fn deserialize_repository<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_repository(&raw).map_err(serde::de::Error::custom)
}

/// Tags like `1746190043` parse as YAML integers; keep them as strings.
pub fn deserialize_tag<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match TagValue::deserialize(deserializer)? {
        TagValue::Text(tag) => Ok(tag),
        TagValue::Number(n) => Ok(n.to_string()),
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TagValue {
    Text(String),
    Number(u64),
}
