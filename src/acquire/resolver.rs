// ABOUTME: Local lookup by exact reference and pull-on-miss through the runtime.
// ABOUTME: Classifies pull failures into authentication problems and everything else.

use crate::runtime::{ImageError, ImageOps, RegistryAuth};
use crate::types::{ImageId, ImageRef};

/// Result of one attempt to make an image available.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcquisitionOutcome {
    /// Already in local storage.
    Found(ImageId),
    /// Pulled from the registry.
    Pulled { id: ImageId, log: Vec<String> },
    /// The registry wants credentials.
    AuthRequired,
    Failed(String),
}

impl AcquisitionOutcome {
    pub fn image_id(&self) -> Option<&ImageId> {
        match self {
            AcquisitionOutcome::Found(id) | AcquisitionOutcome::Pulled { id, .. } => Some(id),
            AcquisitionOutcome::AuthRequired | AcquisitionOutcome::Failed(_) => None,
        }
    }
}

/// First local image carrying exactly `reference` as one of its tags.
pub async fn find_local<R: ImageOps + ?Sized>(
    runtime: &R,
    reference: &ImageRef,
) -> Result<Option<ImageId>, ImageError> {
    let wanted = reference.to_string();
    let images = runtime.list_images().await?;

    let found = images
        .into_iter()
        .find(|image| image.tags.iter().any(|tag| *tag == wanted))
        .map(|image| image.id);

    match &found {
        Some(id) => tracing::debug!("{} present locally as {}", wanted, id.short()),
        None => tracing::debug!("{} not present locally", wanted),
    }
    Ok(found)
}

/// Pull `reference`, mapping the runtime's answer to an outcome.
pub async fn pull<R: ImageOps + ?Sized>(
    runtime: &R,
    reference: &ImageRef,
    auth: Option<&RegistryAuth>,
) -> AcquisitionOutcome {
    tracing::info!(
        "pulling {}{}",
        reference,
        if auth.is_some() { " with credentials" } else { "" }
    );

    match runtime.pull_image(reference, auth).await {
        Ok(image) => {
            tracing::info!(
                "pulled {} ({}, {} bytes)",
                reference,
                image.id.short(),
                image.size_bytes
            );
            AcquisitionOutcome::Pulled {
                id: image.id,
                log: image.log,
            }
        }
        Err(e) if e.is_auth_failure() => {
            tracing::debug!("pull of {} needs authentication: {}", reference, e);
            AcquisitionOutcome::AuthRequired
        }
        Err(e) => {
            tracing::warn!("pull of {} failed: {}", reference, e);
            AcquisitionOutcome::Failed(e.to_string())
        }
    }
}

/// Use the local image if present, otherwise pull it.
pub async fn ensure_present<R: ImageOps + ?Sized>(
    runtime: &R,
    reference: &ImageRef,
    auth: Option<&RegistryAuth>,
) -> AcquisitionOutcome {
    match find_local(runtime, reference).await {
        Ok(Some(id)) => AcquisitionOutcome::Found(id),
        Ok(None) => pull(runtime, reference, auth).await,
        Err(e) => AcquisitionOutcome::Failed(e.to_string()),
    }
}
