// ABOUTME: Container image reference sanitization and parsing.
// ABOUTME: Strips unsafe characters before any reference reaches the runtime.

use super::version::LATEST;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;
use thiserror::Error;

/// Registry used when a reference does not name one.
pub const DEFAULT_REGISTRY: &str = "docker.io";

static DOMAIN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9]([a-zA-Z0-9:\-]{0,61}[a-zA-Z0-9])?(\.[a-zA-Z0-9]([a-zA-Z0-9:\-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("domain pattern is valid")
});

static PATH_UNSAFE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9._:@-]").expect("path pattern is valid"));

static NAME_UNSAFE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9._-]").expect("name pattern is valid"));

/// Sanitize a raw image string into a safe `registry/namespace/name[:tag]`
/// (or `...@digest`) form.
///
/// Returns `None` when nothing usable is left. Applying it twice gives the
/// same result as applying it once.
pub fn sanitize(raw: &str) -> Option<String> {
    let input = raw.trim();
    if input.is_empty() {
        return None;
    }

    // Scheme prefixes are dropped; the host must look like a domain.
    let input = match input.split_once("://") {
        Some((_, rest)) => {
            let host = rest.split('/').next().unwrap_or_default();
            if host.is_empty() || !DOMAIN.is_match(host) {
                return None;
            }
            rest
        }
        None => input,
    };

    if input.contains('/') {
        sanitize_path(input)
    } else {
        sanitize_simple(input)
    }
}

fn sanitize_path(input: &str) -> Option<String> {
    let mut safe_parts: Vec<String> = Vec::new();

    for part in input.split('/') {
        if safe_parts.is_empty() && part.contains('.') {
            if !DOMAIN.is_match(part) {
                return None;
            }
            safe_parts.push(part.to_string());
        } else {
            let safe = PATH_UNSAFE.replace_all(part, "");
            if !safe.is_empty() {
                safe_parts.push(safe.into_owned());
            }
        }
    }

    match safe_parts.as_slice() {
        [] => None,
        [single] => sanitize_simple(single),
        _ => Some(safe_parts.join("/")),
    }
}

fn sanitize_simple(input: &str) -> Option<String> {
    let mut parts = input.split(':');
    let name = NAME_UNSAFE.replace_all(parts.next().unwrap_or_default(), "");
    if name.is_empty() {
        return None;
    }

    match parts.next().map(|tag| NAME_UNSAFE.replace_all(tag, "")) {
        Some(tag) if !tag.is_empty() => Some(format!("{name}:{tag}")),
        _ => Some(name.into_owned()),
    }
}

#[derive(Debug, Error)]
pub enum ParseImageRefError {
    #[error("image reference cannot be empty")]
    Empty,

    #[error("image reference has no valid form after sanitization: {0}")]
    Unsanitizable(String),

    #[error("invalid image reference format: {0}")]
    InvalidFormat(String),
}

/// A sanitized image reference: repository plus tag and/or digest.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageRef {
    repository: String,
    tag: Option<String>,
    digest: Option<String>,
}

impl ImageRef {
    /// Sanitize and parse a raw image string.
    ///
    /// References without a tag or digest default to the `latest` tag.
    pub fn parse(input: &str) -> Result<Self, ParseImageRefError> {
        if input.trim().is_empty() {
            return Err(ParseImageRefError::Empty);
        }

        let safe = sanitize(input)
            .ok_or_else(|| ParseImageRefError::Unsanitizable(input.trim().to_string()))?;

        let (without_digest, digest) = match safe.split_once('@') {
            Some((before, after)) => (before.to_string(), Some(after.to_string())),
            None => (safe, None),
        };

        // A colon followed by a slash belongs to a registry port, not a tag.
        let (repository, tag) = match without_digest.rsplit_once(':') {
            Some((before, after)) if !after.contains('/') => {
                (before.to_string(), Some(after.to_string()))
            }
            _ => (without_digest.clone(), None),
        };

        if repository.is_empty() {
            return Err(ParseImageRefError::InvalidFormat(input.trim().to_string()));
        }

        let digest = digest.filter(|d| !d.is_empty());
        let tag = match (tag.filter(|t| !t.is_empty()), &digest) {
            (None, None) => Some(LATEST.to_string()),
            (tag, _) => tag,
        };

        Ok(Self {
            repository,
            tag,
            digest,
        })
    }

    /// Build a `repository:tag` reference, sanitizing both halves together.
    ///
    /// Returns `None` when the combination has no valid form or the tag does
    /// not survive sanitization.
    pub fn new(repository: &str, tag: &str) -> Option<Self> {
        let reference = Self::parse(&format!("{repository}:{tag}")).ok()?;
        match reference.tag() {
            Some(t) if t == tag => Some(reference),
            _ => None,
        }
    }

    pub fn repository(&self) -> &str {
        &self.repository
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    pub fn digest(&self) -> Option<&str> {
        self.digest.as_deref()
    }

    /// Registry host named by the first path segment, if it looks like one.
    pub fn registry(&self) -> Option<&str> {
        let (first, _) = self.repository.split_once('/')?;
        if first.contains('.') || first.contains(':') || first == "localhost" {
            Some(first)
        } else {
            None
        }
    }

    /// Registry host, falling back to Docker Hub.
    pub fn registry_or_default(&self) -> &str {
        self.registry().unwrap_or(DEFAULT_REGISTRY)
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.repository)?;
        if let Some(ref tag) = self.tag {
            write!(f, ":{}", tag)?;
        }
        if let Some(ref digest) = self.digest {
            write!(f, "@{}", digest)?;
        }
        Ok(())
    }
}
