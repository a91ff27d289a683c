//! `dockwire start`: Start a created container.

use anyhow::Context;
use clap::Args;
use dockwire_client::client::DockerClient;
use dockwire_client::models::{ContainerStartRequest, PortBinding};
use dockwire_common::types::ContainerId;

/// Arguments for the `start` command.
#[derive(Args, Debug)]
pub struct StartArgs {
    /// Container ID or name.
    pub container: String,

    /// Publish a port as HOST_PORT:CONTAINER_PORT[/PROTO] (repeatable).
    #[arg(short, long)]
    pub publish: Vec<String>,

    /// Publish every exposed port on a random host port.
    #[arg(short = 'P', long)]
    pub publish_all: bool,

    /// Bind mount as HOST:CONTAINER[:MODE] (repeatable).
    #[arg(short, long)]
    pub volume: Vec<String>,

    /// Run with extended privileges.
    #[arg(long)]
    pub privileged: bool,
}

/// Parses `8080:80` or `8080:80/udp` into a port key and host binding.
fn parse_publish(spec: &str) -> anyhow::Result<(String, PortBinding)> {
    let (host, container) = spec
        .split_once(':')
        .with_context(|| format!("port mapping {spec:?} is not HOST_PORT:CONTAINER_PORT"))?;
    let key = if container.contains('/') {
        container.to_string()
    } else {
        format!("{container}/tcp")
    };
    Ok((
        key,
        PortBinding {
            host_ip: String::new(),
            host_port: host.to_string(),
        },
    ))
}

/// Executes the `start` command.
///
/// # Errors
///
/// Returns an error if a port mapping is malformed or the daemon refuses.
pub fn execute(client: &DockerClient, args: StartArgs) -> anyhow::Result<()> {
    let mut config = ContainerStartRequest {
        binds: args.volume,
        publish_all_ports: args.publish_all,
        privileged: args.privileged,
        ..ContainerStartRequest::default()
    };
    for spec in &args.publish {
        let (key, binding) = parse_publish(spec)?;
        config.port_bindings.entry(key).or_default().push(binding);
    }

    client.start(&ContainerId::new(&args.container), &config)?;
    println!("{}", args.container);
    Ok(())
}
