// ABOUTME: Catalog of locally available tags for one image repository.
// ABOUTME: Ranks them and reports whether something newer than the pin is present.

use crate::runtime::{ImageError, ImageOps};
use crate::types::{Version, newest, rank_newest_first};

/// Tags of every local image named `repository:TAG`, in listing order.
///
/// The repository must match exactly; duplicates are dropped.
pub async fn local_tags<R: ImageOps + ?Sized>(
    runtime: &R,
    repository: &str,
) -> Result<Vec<String>, ImageError> {
    let images = runtime.list_images().await?;

    let mut tags: Vec<String> = Vec::new();
    for name in images.iter().flat_map(|image| image.tags.iter()) {
        if let Some((repo, tag)) = name.rsplit_once(':')
            && repo == repository
            && !tag.contains('/')
            && !tags.iter().any(|t| t == tag)
        {
            tags.push(tag.to_string());
        }
    }

    tracing::debug!("{} local tag(s) for {}", tags.len(), repository);
    Ok(tags)
}

/// Local tags for `repository`, newest first.
pub async fn list_local_versions<R: ImageOps + ?Sized>(
    runtime: &R,
    repository: &str,
) -> Result<Vec<String>, ImageError> {
    let tags = local_tags(runtime, repository).await?;
    Ok(rank_newest_first(&tags))
}

/// The newest local tag, if it is strictly newer than `current`.
pub async fn find_newer_version<R: ImageOps + ?Sized>(
    runtime: &R,
    repository: &str,
    current: &str,
) -> Result<Option<String>, ImageError> {
    let tags = local_tags(runtime, repository).await?;
    let current = Version::parse(current);

    let candidate = newest(tags.iter().map(String::as_str))
        .filter(|tag| Version::parse(tag).is_newer_than(&current))
        .map(str::to_string);

    match &candidate {
        Some(tag) => tracing::info!(
            "newer version of {} available: {} (pinned {})",
            repository,
            tag,
            current
        ),
        None => tracing::debug!("{} has nothing newer than {}", repository, current),
    }
    Ok(candidate)
}
