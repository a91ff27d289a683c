//! `dockwire logs`: Print container logs.

use clap::Args;
use dockwire_client::client::DockerClient;
use dockwire_common::types::ContainerId;

/// Arguments for the `logs` command.
#[derive(Args, Debug)]
pub struct LogsArgs {
    /// Container ID or name.
    pub container: String,
}

/// Executes the `logs` command.
///
/// Stdout and stderr arrive interleaved in one text and are printed to
/// stdout as-is.
///
/// # Errors
///
/// Returns an error if the container is unknown or the stream is truncated.
pub fn execute(client: &DockerClient, args: LogsArgs) -> anyhow::Result<()> {
    let logs = client.logs(&ContainerId::new(&args.container))?;
    print!("{logs}");
    Ok(())
}
