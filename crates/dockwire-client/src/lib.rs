//! # dockwire-client
//!
//! Blocking client for the Docker remote API.
//!
//! - **Lifecycle**: create, start, kill, delete, and inspect containers.
//! - **Logs**: demultiplexing of the raw stdout/stderr frame stream.
//! - **Builds**: incremental parsing of the JSON build progress stream.
//! - **Classification**: status codes mapped onto domain errors.
//!
//! # Example
//!
//! ```rust,no_run
//! use dockwire_client::client::DockerClient;
//! use dockwire_client::models::{ContainerCreateRequest, ContainerStartRequest};
//!
//! # fn main() -> dockwire_common::error::Result<()> {
//! let client = DockerClient::from_env()?;
//! let id = client.create(&ContainerCreateRequest::new("busybox").command(vec!["date".into()]))?;
//! client.start(&id, &ContainerStartRequest::default())?;
//! print!("{}", client.logs(&id)?);
//! client.delete(&id)?;
//! # Ok(())
//! # }
//! ```

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used, clippy::panic))]

pub mod build;
pub mod classify;
pub mod client;
pub mod logs;
pub mod models;
pub mod transport;
