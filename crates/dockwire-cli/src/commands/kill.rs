//! `dockwire kill`: Kill running containers.

use clap::Args;
use dockwire_client::client::DockerClient;
use dockwire_common::types::ContainerId;

/// Arguments for the `kill` command.
#[derive(Args, Debug)]
pub struct KillArgs {
    /// Container IDs or names.
    #[arg(required = true)]
    pub containers: Vec<String>,
}

/// Executes the `kill` command.
///
/// Stops at the first container the daemon refuses to kill.
///
/// # Errors
///
/// Returns an error if a container is missing or the daemon fails.
pub fn execute(client: &DockerClient, args: KillArgs) -> anyhow::Result<()> {
    for container in &args.containers {
        client.kill(&ContainerId::new(container))?;
        println!("{container}");
    }
    Ok(())
}
