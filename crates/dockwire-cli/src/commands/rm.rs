//! `dockwire rm`: Remove containers.

use clap::Args;
use dockwire_client::client::DockerClient;
use dockwire_common::error::DockwireError;
use dockwire_common::types::ContainerId;

/// Arguments for the `rm` command.
#[derive(Args, Debug)]
pub struct RmArgs {
    /// Container IDs or names.
    #[arg(required = true)]
    pub containers: Vec<String>,

    /// Kill each container before removing it.
    #[arg(short, long)]
    pub force: bool,
}

/// Executes the `rm` command.
///
/// # Errors
///
/// Returns an error if a container is missing or the daemon fails.
pub fn execute(client: &DockerClient, args: RmArgs) -> anyhow::Result<()> {
    for container in &args.containers {
        let id = ContainerId::new(container);
        if args.force {
            match client.kill(&id) {
                Ok(()) => tracing::debug!(%id, "killed before removal"),
                Err(DockwireError::Server { reason }) => {
                    tracing::debug!(%id, reason, "kill refused, removing anyway");
                }
                Err(e) => return Err(e.into()),
            }
        }
        client.delete(&id)?;
        println!("{container}");
    }
    Ok(())
}
