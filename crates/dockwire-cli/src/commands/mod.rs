//! CLI command definitions and dispatch.

pub mod build;
pub mod commit;
pub mod create;
pub mod inspect;
pub mod kill;
pub mod logs;
pub mod rm;
pub mod start;
pub mod version;

use clap::{Parser, Subcommand};
use dockwire_client::client::DockerClient;
use dockwire_common::config::ClientConfig;
use dockwire_common::constants::{
    DEFAULT_API_ROOT, DOCKER_API_VERSION_ENV, DOCKER_HOST_ENV, DOCKER_TIMEOUT_ENV,
};

/// dockwire: Docker remote API client.
#[derive(Parser, Debug)]
#[command(name = "dockwire", version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// Daemon endpoint (`tcp://` or `http(s)://`).
    #[arg(long, global = true, env = DOCKER_HOST_ENV, default_value = DEFAULT_API_ROOT)]
    pub host: String,

    /// Remote API version to pin, e.g. `1.41`.
    #[arg(long, global = true, env = DOCKER_API_VERSION_ENV)]
    pub api_version: Option<String>,

    /// Request timeout in seconds. Requests wait indefinitely when unset.
    #[arg(long, global = true, env = DOCKER_TIMEOUT_ENV)]
    pub timeout: Option<u64>,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a container from an image.
    Create(create::CreateArgs),
    /// Start a created container.
    Start(start::StartArgs),
    /// Kill running containers.
    Kill(kill::KillArgs),
    /// Remove containers.
    Rm(rm::RmArgs),
    /// Show details of a container.
    Inspect(inspect::InspectArgs),
    /// Print the combined stdout/stderr of a container.
    Logs(logs::LogsArgs),
    /// Build an image from a directory containing a Dockerfile.
    Build(build::BuildArgs),
    /// Create an image from a container's changes.
    Commit(commit::CommitArgs),
    /// Show daemon version information.
    Version,
}

impl Cli {
    /// Assembles the client configuration from global flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the host uses an unsupported scheme.
    pub fn client_config(&self) -> anyhow::Result<ClientConfig> {
        let mut config = ClientConfig::new(&self.host)?;
        config.api_version.clone_from(&self.api_version);
        config.timeout_secs = self.timeout;
        Ok(config)
    }
}

/// Dispatches the parsed CLI command to its handler.
///
/// # Errors
///
/// Returns an error if the client cannot be built or the command fails.
pub fn execute(cli: Cli) -> anyhow::Result<()> {
    let config = cli.client_config()?;
    tracing::debug!(api_root = %config.api_root, api_version = ?config.api_version, "connecting");
    let client = DockerClient::new(&config)?;

    match cli.command {
        Command::Create(args) => create::execute(&client, args),
        Command::Start(args) => start::execute(&client, args),
        Command::Kill(args) => kill::execute(&client, args),
        Command::Rm(args) => rm::execute(&client, args),
        Command::Inspect(args) => inspect::execute(&client, args),
        Command::Logs(args) => logs::execute(&client, args),
        Command::Build(args) => build::execute(&client, args),
        Command::Commit(args) => commit::execute(&client, args),
        Command::Version => version::execute(&client),
    }
}
