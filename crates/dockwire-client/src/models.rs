//! Request and response bodies exchanged with the daemon.
//!
//! Field names follow the remote API's PascalCase JSON keys. Only the fields
//! this client uses are modelled; unknown keys are ignored on decode.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use dockwire_common::types::ContainerId;
use serde::{Deserialize, Serialize};

/// Body of `POST /containers/create`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ContainerCreateRequest {
    /// Image to create the container from.
    pub image: String,
    /// Name to register the container under, sent as a query parameter.
    #[serde(skip)]
    pub name: Option<String>,
    /// Command to run.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cmd: Vec<String>,
    /// Environment as `KEY=value` entries.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub env: Vec<String>,
    /// Container hostname.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    /// Working directory for the command.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub working_dir: Option<String>,
    /// Ports to expose, keyed as `port/protocol`.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub exposed_ports: BTreeMap<String, EmptyObject>,
    /// Whether to allocate a TTY. Logs are only multiplexed without one.
    pub tty: bool,
}

/// Serializes as `{}`; the API uses it as a set-member marker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmptyObject {}

impl ContainerCreateRequest {
    /// Creates a request for the given image.
    #[must_use]
    pub fn new(image: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            ..Self::default()
        }
    }

    /// Sets the container name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the command to run.
    #[must_use]
    pub fn command(mut self, cmd: Vec<String>) -> Self {
        self.cmd = cmd;
        self
    }

    /// Adds an environment variable.
    #[must_use]
    pub fn env(mut self, key: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        self.env.push(format!("{}={}", key.as_ref(), value.as_ref()));
        self
    }

    /// Sets the hostname.
    #[must_use]
    pub fn hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = Some(hostname.into());
        self
    }

    /// Exposes a port, e.g. `8080/tcp`.
    #[must_use]
    pub fn expose(mut self, port: impl Into<String>) -> Self {
        let _ = self.exposed_ports.insert(port.into(), EmptyObject {});
        self
    }
}

/// Response of `POST /containers/create`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ContainerCreateResponse {
    /// Identifier of the new container.
    pub id: ContainerId,
    /// Warnings raised while creating the container.
    #[serde(default)]
    pub warnings: Option<Vec<String>>,
}

/// A host address a container port is published on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PortBinding {
    /// Host interface address; all interfaces when empty.
    #[serde(default)]
    pub host_ip: String,
    /// Host port.
    #[serde(default)]
    pub host_port: String,
}

/// Body of `POST /containers/{id}/start`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ContainerStartRequest {
    /// Volume bindings as `host:container[:mode]`.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub binds: Vec<String>,
    /// Links as `name:alias`.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<String>,
    /// Port publications keyed as `port/protocol`.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub port_bindings: BTreeMap<String, Vec<PortBinding>>,
    /// Publish every exposed port on a random host port.
    pub publish_all_ports: bool,
    /// Run with extended privileges.
    pub privileged: bool,
}

/// Result of `GET /containers/{id}/json`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ContainerInspectionResult {
    /// Full container identifier.
    pub id: ContainerId,
    /// Creation time.
    pub created: DateTime<Utc>,
    /// Executable the container runs.
    #[serde(default)]
    pub path: String,
    /// Arguments passed to the executable.
    #[serde(default)]
    pub args: Option<Vec<String>>,
    /// Configuration the container was created with.
    pub config: ContainerConfig,
    /// Runtime state.
    pub state: ContainerState,
    /// Identifier of the image the container runs.
    pub image: String,
    /// Network attachment details.
    #[serde(default)]
    pub network_settings: Option<NetworkSettings>,
    /// Container name, with a leading `/`.
    #[serde(default)]
    pub name: String,
}

/// Configuration section of an inspection result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ContainerConfig {
    /// Container hostname.
    pub hostname: String,
    /// Image reference as given at creation.
    pub image: String,
    /// Environment as `KEY=value` entries.
    pub env: Option<Vec<String>>,
    /// Command.
    pub cmd: Option<Vec<String>>,
    /// Whether a TTY is allocated.
    pub tty: bool,
}

/// State section of an inspection result.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ContainerState {
    /// Whether the main process is running.
    pub running: bool,
    /// Whether the container is paused.
    #[serde(default)]
    pub paused: bool,
    /// Host PID of the main process, 0 when stopped.
    #[serde(default)]
    pub pid: i64,
    /// Exit code of the last run.
    #[serde(default)]
    pub exit_code: i64,
    /// Start time of the last run.
    pub started_at: DateTime<Utc>,
    /// Finish time of the last run.
    pub finished_at: DateTime<Utc>,
}

/// Network section of an inspection result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NetworkSettings {
    /// Address on the default bridge.
    #[serde(rename = "IPAddress")]
    pub ip_address: String,
    /// Gateway on the default bridge.
    #[serde(rename = "Gateway")]
    pub gateway: String,
    /// Published ports keyed as `port/protocol`.
    #[serde(rename = "Ports")]
    pub ports: Option<BTreeMap<String, Option<Vec<PortBinding>>>>,
}

/// Result of `GET /version`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct VersionInfo {
    /// Engine version.
    pub version: String,
    /// Highest remote API version supported.
    pub api_version: String,
    /// Commit the engine was built from.
    pub git_commit: String,
    /// Go toolchain version.
    pub go_version: String,
    /// Host operating system.
    pub os: String,
    /// Host architecture.
    pub arch: String,
    /// Host kernel version.
    pub kernel_version: String,
}

/// Body the daemon sends with a failed request, e.g. `{"message":"No such container: x"}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable description of the failure.
    pub message: String,
}

/// Response of `POST /commit`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CommitResponse {
    /// Identifier of the new image.
    pub id: String,
}

/// Parameters of `POST /commit`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitOptions {
    /// Container to snapshot.
    pub container: ContainerId,
    /// Repository to tag the image into.
    pub repo: Option<String>,
    /// Tag within the repository.
    pub tag: Option<String>,
    /// Commit message.
    pub comment: Option<String>,
    /// Author, e.g. `John Hannibal Smith <hannibal@a-team.com>`.
    pub author: Option<String>,
}

impl CommitOptions {
    /// Commits `container` without naming the resulting image.
    #[must_use]
    pub const fn new(container: ContainerId) -> Self {
        Self {
            container,
            repo: None,
            tag: None,
            comment: None,
            author: None,
        }
    }
}
