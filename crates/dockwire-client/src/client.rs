//! The client that drives the remote API.

use dockwire_common::config::ClientConfig;
use dockwire_common::constants::{JSON_MEDIA_TYPE, RAW_STREAM_MEDIA_TYPE, TAR_MEDIA_TYPE};
use dockwire_common::error::{DockwireError, Result};
use dockwire_common::types::{ContainerId, ImageId};

use crate::build::{self, BuildEvent};
use crate::classify::check_container_response;
use crate::logs;
use crate::models::{
    CommitOptions, CommitResponse, ContainerCreateRequest, ContainerCreateResponse,
    ContainerInspectionResult, ContainerStartRequest, ErrorResponse, VersionInfo,
};
use crate::transport::{ApiRequest, ApiResponse, HttpTransport, Method, Transport};

/// Blocking client for one Docker daemon.
///
/// Holds no state besides the transport, so a single instance can serve
/// concurrent callers. Each method performs exactly one HTTP exchange and
/// never retries.
pub struct DockerClient {
    transport: Box<dyn Transport>,
}

impl DockerClient {
    /// Creates a client speaking HTTP to the configured daemon.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP transport cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        Ok(Self::with_transport(HttpTransport::new(config)?))
    }

    /// Creates a client from `DOCKER_HOST` and `DOCKER_API_VERSION`.
    ///
    /// # Errors
    ///
    /// Returns an error if the environment names an unreachable endpoint.
    pub fn from_env() -> Result<Self> {
        Self::new(&ClientConfig::from_env()?)
    }

    /// Creates a client over an arbitrary transport.
    #[must_use]
    pub fn with_transport(transport: impl Transport + 'static) -> Self {
        Self {
            transport: Box::new(transport),
        }
    }

    /// Creates a container and returns its identifier.
    ///
    /// No container exists yet when this fails, so errors name the image.
    ///
    /// # Errors
    ///
    /// Returns `DockwireError::ImageNotFound` on 404 and
    /// `DockwireError::CreateFailed` for any other failed exchange.
    pub fn create(&self, request: &ContainerCreateRequest) -> Result<ContainerId> {
        let api_request = ApiRequest::post("/containers/create")
            .query_opt("name", request.name.as_deref())
            .accept(JSON_MEDIA_TYPE)
            .json(request)?;

        let failed = |reason: String| DockwireError::CreateFailed {
            image: request.image.clone(),
            reason,
        };
        let response = self
            .transport
            .send(api_request)
            .map_err(|e| failed(e.to_string()))?;
        if response.status == 404 {
            return Err(DockwireError::ImageNotFound {
                image: request.image.clone(),
            });
        }
        if !response.is_success() {
            return Err(failed(format!("HTTP {} {}", response.status, response.reason)));
        }

        let created: ContainerCreateResponse = response.json()?;
        for warning in created.warnings.iter().flatten() {
            tracing::warn!(id = %created.id, warning = warning.as_str(), "daemon warning on create");
        }
        tracing::info!(id = %created.id, image = %request.image, "container created");
        Ok(created.id)
    }

    /// Starts a created container.
    ///
    /// # Errors
    ///
    /// Returns `DockwireError::ContainerNotFound` on 404 and
    /// `DockwireError::Server` on 500.
    pub fn start(&self, id: &ContainerId, config: &ContainerStartRequest) -> Result<()> {
        let request = ApiRequest::post(format!("/containers/{id}/start")).json(config)?;
        self.send_targeting(id, request)?;
        tracing::info!(%id, "container started");
        Ok(())
    }

    /// Kills a running container.
    ///
    /// # Errors
    ///
    /// Returns `DockwireError::ContainerNotFound` on 404 and
    /// `DockwireError::Server` on 500.
    pub fn kill(&self, id: &ContainerId) -> Result<()> {
        self.send_targeting(id, ApiRequest::post(format!("/containers/{id}/kill")))?;
        tracing::info!(%id, "container killed");
        Ok(())
    }

    /// Removes a container.
    ///
    /// # Errors
    ///
    /// Returns `DockwireError::ContainerNotFound` on 404 and
    /// `DockwireError::Server` on 500.
    pub fn delete(&self, id: &ContainerId) -> Result<()> {
        self.send_targeting(id, ApiRequest::delete(format!("/containers/{id}")))?;
        tracing::info!(%id, "container removed");
        Ok(())
    }

    /// Returns the daemon's view of a container.
    ///
    /// Failures are not classified: a missing container surfaces as
    /// `DockwireError::UnexpectedStatus` with status 404.
    ///
    /// # Errors
    ///
    /// Returns transport, status, or decoding errors unchanged.
    pub fn inspect(&self, id: &ContainerId) -> Result<ContainerInspectionResult> {
        let request = ApiRequest::get(format!("/containers/{id}/json")).accept(JSON_MEDIA_TYPE);
        self.send_expecting_success(request)?.json()
    }

    /// Returns the combined stdout and stderr of a container.
    ///
    /// # Errors
    ///
    /// Returns transport or status errors unchanged, and
    /// `DockwireError::Framing` if the log stream is truncated.
    pub fn logs(&self, id: &ContainerId) -> Result<String> {
        let request = ApiRequest::get(format!("/containers/{id}/logs"))
            .query("stdout", "1")
            .query("stderr", "1")
            .accept(RAW_STREAM_MEDIA_TYPE);
        let path = request.path.clone();

        let raw = self
            .send_expecting_success(request)?
            .bytes()
            .map_err(|e| DockwireError::Transport {
                method: Method::GET.to_string(),
                path,
                message: format!("failed to read log stream: {e}"),
            })?;
        logs::demux(&raw)
    }

    /// Builds an image from a tar build context and returns its id.
    ///
    /// # Errors
    ///
    /// Returns `DockwireError::Build` if the daemon never reports the built
    /// image, or transport, status, and decoding errors unchanged.
    pub fn build_image(&self, tar_archive: Vec<u8>, name: Option<&str>) -> Result<ImageId> {
        self.build_image_with(tar_archive, name, |_| {})
    }

    /// Like [`build_image`](Self::build_image), passing every progress event
    /// to `on_event` as it arrives.
    ///
    /// # Errors
    ///
    /// Same as [`build_image`](Self::build_image).
    pub fn build_image_with(
        &self,
        tar_archive: Vec<u8>,
        name: Option<&str>,
        on_event: impl FnMut(&BuildEvent),
    ) -> Result<ImageId> {
        tracing::debug!(name, context_bytes = tar_archive.len(), "uploading build context");
        let request = ApiRequest::post("/build")
            .query("q", "1")
            .query("forcerm", "1")
            .query_opt("t", name)
            .accept(JSON_MEDIA_TYPE)
            .body(TAR_MEDIA_TYPE, tar_archive);

        let response = self.send_expecting_success(request)?;
        let id = build::parse_stream(response.into_reader(), on_event)?;
        tracing::info!(image = %id, name, "image built");
        Ok(ImageId::new(id))
    }

    /// Returns the daemon's version information.
    ///
    /// # Errors
    ///
    /// Returns transport, status, or decoding errors unchanged.
    pub fn version(&self) -> Result<VersionInfo> {
        let request = ApiRequest::get("/version").accept(JSON_MEDIA_TYPE);
        self.send_expecting_success(request)?.json()
    }

    /// Creates an image from a container's changes.
    ///
    /// # Errors
    ///
    /// Returns transport, status, or decoding errors unchanged.
    pub fn commit(&self, options: &CommitOptions) -> Result<ImageId> {
        let request = ApiRequest::post("/commit")
            .query("container", options.container.as_str())
            .query_opt("repo", options.repo.as_deref())
            .query_opt("tag", options.tag.as_deref())
            .query_opt("comment", options.comment.as_deref())
            .query_opt("author", options.author.as_deref())
            .accept(JSON_MEDIA_TYPE);

        let committed: CommitResponse = self.send_expecting_success(request)?.json()?;
        tracing::info!(container = %options.container, image = %committed.id, "container committed");
        Ok(ImageId::new(committed.id))
    }

    fn send_targeting(&self, id: &ContainerId, request: ApiRequest) -> Result<()> {
        let response = self.transport.send(request)?;
        check_container_response(id.as_str(), response.status, &response.reason)
    }

    fn send_expecting_success(&self, request: ApiRequest) -> Result<ApiResponse> {
        let path = request.path.clone();
        let response = self.transport.send(request)?;
        if response.is_success() {
            return Ok(response);
        }
        let (status, reason) = (response.status, response.reason.clone());
        Err(DockwireError::UnexpectedStatus {
            path,
            status,
            reason,
            message: daemon_message(response),
        })
    }
}

/// Extracts the daemon's explanation from a failed response body.
///
/// Falls back to the trimmed body text when it is not the usual
/// `{"message": ...}` document.
fn daemon_message(response: ApiResponse) -> String {
    match response.text() {
        Ok(text) => serde_json::from_str::<ErrorResponse>(&text)
            .map_or_else(|_| text.trim().to_string(), |body| body.message),
        Err(e) => format!("unreadable response body: {e}"),
    }
}
