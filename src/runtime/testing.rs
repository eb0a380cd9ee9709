// ABOUTME: Scripted in-memory runtime for unit tests.
// ABOUTME: Records pulls and logins and replays queued results.

use super::traits::sealed::Sealed;
use super::traits::{ImageError, ImageOps, ImageSummary, PulledImage, RegistryAuth};
use crate::types::{ImageId, ImageRef};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

#[derive(Default)]
pub(crate) struct FakeRuntime {
    images: Vec<ImageSummary>,
    list_error: Option<String>,
    pull_results: Mutex<VecDeque<Result<PulledImage, ImageError>>>,
    login_results: Mutex<VecDeque<Result<(), ImageError>>>,
    pulls: Mutex<Vec<(String, Option<String>)>>,
    logins: Mutex<Vec<RegistryAuth>>,
}

impl FakeRuntime {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_image(mut self, id: &str, tags: &[&str]) -> Self {
        self.images.push(ImageSummary {
            id: ImageId::new(id.to_string()),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        });
        self
    }

    pub(crate) fn failing_list(mut self, message: &str) -> Self {
        self.list_error = Some(message.to_string());
        self
    }

    pub(crate) fn pull_returns(self, result: Result<PulledImage, ImageError>) -> Self {
        self.pull_results.lock().unwrap().push_back(result);
        self
    }

    pub(crate) fn login_returns(self, result: Result<(), ImageError>) -> Self {
        self.login_results.lock().unwrap().push_back(result);
        self
    }

    /// `(reference, username)` for every pull attempted.
    pub(crate) fn pulls(&self) -> Vec<(String, Option<String>)> {
        self.pulls.lock().unwrap().clone()
    }

    pub(crate) fn logins(&self) -> Vec<RegistryAuth> {
        self.logins.lock().unwrap().clone()
    }
}

pub(crate) fn pulled(id: &str, tag: &str) -> PulledImage {
    PulledImage {
        id: ImageId::new(id.to_string()),
        tags: vec![tag.to_string()],
        size_bytes: 1024,
        log: vec![format!("Pulled {}", tag)],
    }
}

impl Sealed for FakeRuntime {}

#[async_trait]
impl ImageOps for FakeRuntime {
    async fn list_images(&self) -> Result<Vec<ImageSummary>, ImageError> {
        match &self.list_error {
            Some(message) => Err(ImageError::ListFailed(message.clone())),
            None => Ok(self.images.clone()),
        }
    }

    async fn pull_image(
        &self,
        reference: &ImageRef,
        auth: Option<&RegistryAuth>,
    ) -> Result<PulledImage, ImageError> {
        self.pulls
            .lock()
            .unwrap()
            .push((reference.to_string(), auth.map(|a| a.username.clone())));
        self.pull_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ImageError::PullFailed("unexpected pull".to_string())))
    }

    async fn login(&self, auth: &RegistryAuth) -> Result<(), ImageError> {
        self.logins.lock().unwrap().push(auth.clone());
        self.login_results.lock().unwrap().pop_front().unwrap_or(Ok(()))
    }
}
