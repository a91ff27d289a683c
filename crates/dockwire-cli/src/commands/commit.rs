//! `dockwire commit`: Create an image from a container's changes.

use clap::Args;
use dockwire_client::client::DockerClient;
use dockwire_client::models::CommitOptions;
use dockwire_common::types::ContainerId;

/// Arguments for the `commit` command.
#[derive(Args, Debug)]
pub struct CommitArgs {
    /// Container ID or name.
    pub container: String,

    /// Repository to tag the image into.
    #[arg(long)]
    pub repo: Option<String>,

    /// Tag within the repository.
    #[arg(long)]
    pub tag: Option<String>,

    /// Commit message.
    #[arg(short, long)]
    pub message: Option<String>,

    /// Author, e.g. "Jane Doe <jane@example.com>".
    #[arg(short, long)]
    pub author: Option<String>,
}

/// Executes the `commit` command and prints the new image ID.
///
/// # Errors
///
/// Returns an error if the daemon refuses the commit.
pub fn execute(client: &DockerClient, args: CommitArgs) -> anyhow::Result<()> {
    let options = CommitOptions {
        repo: args.repo,
        tag: args.tag,
        comment: args.message,
        author: args.author,
        ..CommitOptions::new(ContainerId::new(args.container))
    };
    let image = client.commit(&options)?;
    println!("{image}");
    Ok(())
}
