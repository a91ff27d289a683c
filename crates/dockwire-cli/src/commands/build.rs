//! `dockwire build`: Build an image from a directory.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use dockwire_client::client::DockerClient;

use crate::output::{format_bytes, render_build_event};

/// Arguments for the `build` command.
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Build context directory; must contain a Dockerfile.
    #[arg(default_value = ".")]
    pub context: PathBuf,

    /// Name and optional tag for the image, e.g. web:latest.
    #[arg(short, long)]
    pub tag: Option<String>,

    /// Suppress build output and print only the image ID.
    #[arg(short, long)]
    pub quiet: bool,
}

/// Packs a directory into an uncompressed tar archive rooted at `.`.
///
/// # Errors
///
/// Returns an error if the directory lacks a Dockerfile or cannot be read.
pub fn pack_context(dir: &Path) -> anyhow::Result<Vec<u8>> {
    if !dir.join("Dockerfile").is_file() {
        anyhow::bail!("no Dockerfile in build context {}", dir.display());
    }
    let mut archive = tar::Builder::new(Vec::new());
    archive.follow_symlinks(false);
    archive
        .append_dir_all(".", dir)
        .with_context(|| format!("failed to pack build context {}", dir.display()))?;
    archive.into_inner().context("failed to finish build context archive")
}

/// Executes the `build` command.
///
/// # Errors
///
/// Returns an error if packing the context or the build fails.
pub fn execute(client: &DockerClient, args: BuildArgs) -> anyhow::Result<()> {
    let context = pack_context(&args.context)?;
    if !args.quiet {
        eprintln!("Sending build context ({})", format_bytes(context.len()));
    }

    let quiet = args.quiet;
    let image = client.build_image_with(context, args.tag.as_deref(), |event| {
        if !quiet {
            render_build_event(event);
        }
    })?;
    println!("{image}");
    Ok(())
}
