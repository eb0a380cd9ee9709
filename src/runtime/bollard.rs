// ABOUTME: Bollard-based container runtime implementation.
// ABOUTME: Lists, pulls, and logs in through the Docker-compatible API on Docker and Podman.

use crate::runtime::traits::sealed::Sealed;
use crate::runtime::traits::{
    ImageError, ImageOps, ImageSummary, PulledImage, RegistryAuth, RuntimeInfo, RuntimeInfoError,
    RuntimeMetadata,
};
use crate::runtime::types::{RuntimeConfig, RuntimeType};
use crate::types::{ImageId, ImageRef};
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE;
use bollard::Docker;
use bollard::models::CreateImageInfo;
use bollard::query_parameters::{CreateImageOptions, ListImagesOptions};
use bytes::Bytes;
use futures::StreamExt;
use http_body_util::{BodyExt, Full};
use hyper::StatusCode;
use hyper_util::rt::TokioIo;
use serde::Deserialize;
use tokio::net::UnixStream;

// =============================================================================
// Error Mapping Helpers
// =============================================================================

fn map_image_pull_error(e: bollard::errors::Error, image_name: &str) -> ImageError {
    match &e {
        bollard::errors::Error::DockerResponseServerError {
            status_code,
            message,
        } if *status_code == 401 => {
            ImageError::AuthenticationFailed(format!("{}: {}", image_name, message))
        }
        _ => ImageError::pull(format!("{}: {}", image_name, e)),
    }
}

fn map_image_list_error(e: bollard::errors::Error) -> ImageError {
    ImageError::ListFailed(e.to_string())
}

fn map_login_status(status: StatusCode, body: &[u8], server: &str) -> ImageError {
    let text = String::from_utf8_lossy(body);
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        ImageError::LoginFailed(format!("{}: credentials rejected ({})", server, text.trim()))
    } else {
        ImageError::LoginFailed(format!("{}: {} {}", server, status, text.trim()))
    }
}

fn libpod_pull_uri(image_name: &str) -> String {
    format!(
        "/v4.0.0/libpod/images/pull?reference={}",
        urlencoding::encode(image_name)
    )
}

fn pull_progress_line(info: &CreateImageInfo) -> Option<String> {
    let status = info.status.as_deref()?;
    let line = match &info.progress_detail {
        Some(detail) => match (detail.current, detail.total) {
            (Some(current), Some(total)) if total > 0 => {
                format!("{} {}/{}", status, current, total)
            }
            _ => status.to_string(),
        },
        None => status.to_string(),
    };
    Some(match &info.id {
        Some(id) => format!("{}: {}", id, line),
        None => line,
    })
}

fn encode_registry_auth(auth: &RegistryAuth) -> String {
    let payload = serde_json::json!({
        "username": auth.username,
        "password": auth.password,
        "serveraddress": auth.server.clone().unwrap_or_default(),
    });
    URL_SAFE.encode(payload.to_string())
}

/// One progress line from the libpod pull endpoint.
#[derive(Debug, Default, Deserialize)]
struct LibpodPullReport {
    #[serde(default)]
    stream: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    id: Option<String>,
}

// =============================================================================
// BollardRuntime
// =============================================================================

/// Container runtime implementation using bollard.
///
/// Supports both Docker and Podman via Docker-compatible API.
/// For Podman, pulls go through the native libpod API.
pub struct BollardRuntime {
    client: Docker,
    runtime_type: RuntimeType,
    socket_path: Option<String>,
}

impl BollardRuntime {
    /// Create a new BollardRuntime from a Docker client.
    pub fn new(client: Docker, runtime_type: RuntimeType) -> Self {
        Self {
            client,
            runtime_type,
            socket_path: None,
        }
    }

    /// Create a new BollardRuntime with socket path for raw API access.
    pub fn new_with_socket(client: Docker, runtime_type: RuntimeType, socket_path: String) -> Self {
        Self {
            client,
            runtime_type,
            socket_path: Some(socket_path),
        }
    }

    /// Connect to a container runtime using detected runtime info.
    ///
    /// Use with `detect_local()` to find the socket.
    pub fn connect(
        info: &super::types::RuntimeInfo,
        config: &RuntimeConfig,
    ) -> Result<Self, RuntimeInfoError> {
        let client = Docker::connect_with_unix(
            &info.socket_path,
            config.connect_timeout.as_secs(),
            bollard::API_DEFAULT_VERSION,
        )
        .map_err(|e| RuntimeInfoError::ConnectionFailed(e.to_string()))?;
        Ok(Self::new_with_socket(
            client,
            info.runtime_type,
            info.socket_path.clone(),
        ))
    }

    /// Get the runtime type (Docker or Podman).
    pub fn runtime_type(&self) -> RuntimeType {
        self.runtime_type
    }

    /// Send one HTTP/1 request straight over the runtime socket.
    ///
    /// Used for endpoints bollard does not wrap.
    async fn socket_request(
        &self,
        method: &str,
        uri: &str,
        headers: &[(&str, String)],
        body: Bytes,
    ) -> Result<(StatusCode, Bytes), String> {
        let socket_path = self
            .socket_path
            .as_ref()
            .ok_or_else(|| "socket path not available for raw API access".to_string())?;

        let stream = UnixStream::connect(socket_path)
            .await
            .map_err(|e| format!("failed to connect to socket: {}", e))?;

        let io = TokioIo::new(stream);

        let (mut sender, conn) = hyper::client::conn::http1::handshake(io)
            .await
            .map_err(|e| format!("HTTP handshake failed: {}", e))?;

        // Spawn connection handler
        tokio::spawn(async move {
            if let Err(e) = conn.await {
                tracing::warn!("runtime socket connection error: {}", e);
            }
        });

        let mut builder = hyper::Request::builder()
            .method(method)
            .uri(uri)
            .header("Host", "localhost");
        for (name, value) in headers {
            builder = builder.header(*name, value.as_str());
        }
        let req = builder
            .body(Full::new(body))
            .map_err(|e| format!("failed to build request: {}", e))?;

        let resp = sender
            .send_request(req)
            .await
            .map_err(|e| format!("request failed: {}", e))?;

        let status = resp.status();
        let body = resp
            .into_body()
            .collect()
            .await
            .map_err(|e| format!("failed to read response: {}", e))?
            .to_bytes();

        Ok((status, body))
    }

    /// Pull image using Podman's native libpod API.
    async fn pull_image_libpod(
        &self,
        image_name: &str,
        auth: Option<&RegistryAuth>,
    ) -> Result<Vec<String>, ImageError> {
        let uri = libpod_pull_uri(image_name);

        let headers: Vec<(&str, String)> = auth
            .map(|a| vec![("X-Registry-Auth", encode_registry_auth(a))])
            .unwrap_or_default();

        let (status, body) = self
            .socket_request("POST", &uri, &headers, Bytes::new())
            .await
            .map_err(|e| ImageError::PullFailed(format!("{}: {}", image_name, e)))?;

        let body_text = String::from_utf8_lossy(&body);

        if status == StatusCode::UNAUTHORIZED {
            return Err(ImageError::AuthenticationFailed(format!(
                "{}: {}",
                image_name,
                body_text.trim()
            )));
        }
        if !status.is_success() {
            return Err(ImageError::pull(format!(
                "{}: libpod API error: {}",
                image_name,
                body_text.trim()
            )));
        }

        // The body is a sequence of JSON progress reports.
        let mut log = Vec::new();
        for line in body_text.lines().filter(|l| !l.trim().is_empty()) {
            let report: LibpodPullReport = serde_json::from_str(line).unwrap_or_default();
            if let Some(error) = report.error.filter(|e| !e.is_empty()) {
                return Err(ImageError::pull(format!("{}: {}", image_name, error)));
            }
            if let Some(stream) = report.stream {
                log.push(stream.trim_end().to_string());
            }
            if let Some(id) = report.id {
                tracing::debug!("libpod reported image {}", id);
            }
        }

        Ok(log)
    }

    /// Pull through the Docker-compatible create-image stream.
    async fn pull_image_compat(
        &self,
        image_name: &str,
        auth: Option<&RegistryAuth>,
    ) -> Result<Vec<String>, ImageError> {
        let opts = CreateImageOptions {
            from_image: Some(image_name.to_string()),
            ..Default::default()
        };

        let credentials = auth.map(|a| bollard::auth::DockerCredentials {
            username: Some(a.username.clone()),
            password: Some(a.password.clone()),
            serveraddress: a.server.clone(),
            ..Default::default()
        });

        let mut log = Vec::new();
        let mut stream = self.client.create_image(Some(opts), None, credentials);
        while let Some(result) = stream.next().await {
            let info = result.map_err(|e| map_image_pull_error(e, image_name))?;
            if let Some(line) = pull_progress_line(&info) {
                log.push(line);
            }
        }

        Ok(log)
    }
}

// Implement Sealed trait to allow runtime trait implementations
impl Sealed for BollardRuntime {}

#[async_trait]
impl RuntimeInfo for BollardRuntime {
    async fn info(&self) -> Result<RuntimeMetadata, RuntimeInfoError> {
        let info = self
            .client
            .info()
            .await
            .map_err(|e| RuntimeInfoError::ConnectionFailed(e.to_string()))?;

        let name = match self.runtime_type {
            RuntimeType::Docker => "Docker".to_string(),
            RuntimeType::Podman => "Podman".to_string(),
        };

        Ok(RuntimeMetadata {
            name,
            version: info.server_version.unwrap_or_default(),
            api_version: bollard::API_DEFAULT_VERSION.to_string(),
            os: info.operating_system.unwrap_or_default(),
            arch: info.architecture.unwrap_or_default(),
        })
    }

    async fn ping(&self) -> Result<(), RuntimeInfoError> {
        self.client
            .ping()
            .await
            .map_err(|e| RuntimeInfoError::ConnectionFailed(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl ImageOps for BollardRuntime {
    async fn list_images(&self) -> Result<Vec<ImageSummary>, ImageError> {
        let opts = ListImagesOptions {
            all: false,
            ..Default::default()
        };

        let images = self
            .client
            .list_images(Some(opts))
            .await
            .map_err(map_image_list_error)?;

        Ok(images
            .into_iter()
            .map(|image| ImageSummary {
                id: ImageId::new(image.id),
                tags: image.repo_tags,
            })
            .collect())
    }

    async fn pull_image(
        &self,
        reference: &ImageRef,
        auth: Option<&RegistryAuth>,
    ) -> Result<PulledImage, ImageError> {
        let image_name = reference.to_string();
        tracing::debug!(runtime = %self.runtime_type, "pulling {}", image_name);

        // Podman pulls go through the native libpod endpoint
        let log = if self.runtime_type == RuntimeType::Podman && self.socket_path.is_some() {
            self.pull_image_libpod(&image_name, auth).await?
        } else {
            self.pull_image_compat(&image_name, auth).await?
        };

        let details = self.client.inspect_image(&image_name).await.map_err(|e| {
            ImageError::Runtime(format!("pulled {} but failed to inspect it: {}", image_name, e))
        })?;

        Ok(PulledImage {
            id: ImageId::new(details.id.unwrap_or_default()),
            tags: details.repo_tags.unwrap_or_default(),
            size_bytes: details.size.map(|s| s.max(0) as u64).unwrap_or(0),
            log,
        })
    }

    async fn login(&self, auth: &RegistryAuth) -> Result<(), ImageError> {
        let server = auth.server.clone().unwrap_or_default();
        let payload = serde_json::json!({
            "username": auth.username,
            "password": auth.password,
            "serveraddress": server,
        });

        let headers = [("Content-Type", "application/json".to_string())];
        let (status, body) = self
            .socket_request("POST", "/auth", &headers, Bytes::from(payload.to_string()))
            .await
            .map_err(|e| ImageError::LoginFailed(format!("{}: {}", server, e)))?;

        if !status.is_success() {
            return Err(map_login_status(status, &body, &server));
        }

        tracing::debug!("logged in to {} as {}", server, auth.username);
        Ok(())
    }
}
