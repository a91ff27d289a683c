//! `dockwire version`: Show daemon version information.

use dockwire_client::client::DockerClient;
use dockwire_common::constants::APP_NAME;

/// Executes the `version` command.
///
/// # Errors
///
/// Returns an error if the daemon cannot be reached.
pub fn execute(client: &DockerClient) -> anyhow::Result<()> {
    let info = client.version()?;
    println!("{APP_NAME} {}", env!("CARGO_PKG_VERSION"));
    println!("{:<16}{}", "Engine:", info.version);
    println!("{:<16}{}", "API version:", info.api_version);
    println!("{:<16}{}", "Git commit:", info.git_commit);
    println!("{:<16}{}", "Go version:", info.go_version);
    println!("{:<16}{}/{}", "OS/Arch:", info.os, info.arch);
    if !info.kernel_version.is_empty() {
        println!("{:<16}{}", "Kernel:", info.kernel_version);
    }
    Ok(())
}
