//! `dockwire inspect`: Show details of a container.

use clap::Args;
use dockwire_client::client::DockerClient;
use dockwire_common::types::ContainerId;

use crate::output::{print_field, short_id};

/// Arguments for the `inspect` command.
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Container ID or name.
    pub container: String,
}

/// Executes the `inspect` command.
///
/// # Errors
///
/// Returns an error if the daemon cannot describe the container.
pub fn execute(client: &DockerClient, args: InspectArgs) -> anyhow::Result<()> {
    let result = client.inspect(&ContainerId::new(&args.container))?;
    let state = if result.state.running {
        format!("running (pid {})", result.state.pid)
    } else {
        format!("exited ({})", result.state.exit_code)
    };

    print_field("ID", result.id.as_str());
    print_field("Name", result.name.trim_start_matches('/'));
    print_field("Image", &format!("{} ({})", result.config.image, short_id(&result.image)));
    print_field("Created", &result.created.to_rfc3339());
    print_field("State", &state);
    print_field("Command", &format!("{} {}", result.path, result.args.unwrap_or_default().join(" ")));
    if let Some(network) = result.network_settings.filter(|n| !n.ip_address.is_empty()) {
        print_field("IP address", &network.ip_address);
    }
    Ok(())
}
