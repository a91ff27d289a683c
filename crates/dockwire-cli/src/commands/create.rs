//! `dockwire create`: Create a container from an image.

use anyhow::Context;
use clap::Args;
use dockwire_client::client::DockerClient;
use dockwire_client::models::ContainerCreateRequest;

/// Arguments for the `create` command.
#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Image to create the container from.
    pub image: String,

    /// Command and arguments to run instead of the image default.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,

    /// Name to assign to the container.
    #[arg(long)]
    pub name: Option<String>,

    /// Environment variable as KEY=VALUE (repeatable).
    #[arg(short, long)]
    pub env: Vec<String>,

    /// Container hostname.
    #[arg(long)]
    pub hostname: Option<String>,

    /// Port to expose, e.g. 8080/tcp (repeatable).
    #[arg(long)]
    pub expose: Vec<String>,
}

/// Builds the create request from parsed arguments.
///
/// # Errors
///
/// Returns an error if an environment entry lacks `=`.
pub fn to_request(args: CreateArgs) -> anyhow::Result<ContainerCreateRequest> {
    let mut request = ContainerCreateRequest::new(args.image).command(args.command);
    for entry in &args.env {
        let (key, value) = entry
            .split_once('=')
            .with_context(|| format!("environment entry {entry:?} is not KEY=VALUE"))?;
        request = request.env(key, value);
    }
    for port in args.expose {
        request = request.expose(port);
    }
    if let Some(name) = args.name {
        request = request.name(name);
    }
    if let Some(hostname) = args.hostname {
        request = request.hostname(hostname);
    }
    Ok(request)
}

/// Executes the `create` command and prints the new container ID.
///
/// # Errors
///
/// Returns an error if the arguments are malformed or the daemon refuses.
pub fn execute(client: &DockerClient, args: CreateArgs) -> anyhow::Result<()> {
    let request = to_request(args)?;
    let id = client.create(&request)?;
    println!("{id}");
    Ok(())
}
