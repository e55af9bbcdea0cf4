//! Command-line surface: `dirclip <path> [prefix]`.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use crate::app::navigator::list_directory;
use crate::domain::model::EntryKind;
use crate::infra::config::Config;
use crate::infra::fs::{FileSystem, LocalFileSystem};

#[derive(Debug, Parser)]
#[command(
    name = "dirclip",
    version,
    about = "Browse a directory, tick files and folders, copy their contents to the clipboard"
)]
pub struct Cli {
    /// Directory to open
    pub path: PathBuf,

    /// Only list files whose name starts with this prefix (folders are always listed)
    pub prefix: Option<String>,

    /// Additional configuration file layered over the user configuration
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print the listing of PATH and exit instead of starting the interface
    #[arg(long)]
    pub list: bool,
}

/// Reasons the process refuses to start.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("{} is not a valid directory", .0.display())]
    NotADirectory(PathBuf),
}

/// Resolved launch parameters.
#[derive(Debug, Clone)]
pub struct Launch {
    pub root: PathBuf,
    pub prefix: String,
    pub config: Config,
}

impl Cli {
    /// Check the path, load configuration, and resolve the effective prefix.
    pub fn resolve(&self) -> Result<Launch> {
        ensure_directory(&LocalFileSystem, &self.path)?;
        let config = Config::load(self.config.as_deref()).context("failed to load configuration")?;
        let prefix = self
            .prefix
            .clone()
            .unwrap_or_else(|| config.defaults.prefix().to_owned());
        Ok(Launch {
            root: self.path.clone(),
            prefix,
            config,
        })
    }
}

pub fn ensure_directory(fs: &dyn FileSystem, path: &Path) -> Result<(), StartupError> {
    match fs.stat(path) {
        Ok(EntryKind::Directory) => Ok(()),
        _ => Err(StartupError::NotADirectory(path.to_path_buf())),
    }
}

/// Write the listing the interface would show, folders first and marked with `/`.
pub fn print_listing(out: &mut dyn Write, root: &Path, prefix: &str) -> Result<()> {
    let listing = list_directory(&LocalFileSystem, root, prefix)?;
    for folder in &listing.folders {
        writeln!(out, "{}/", folder.name)?;
    }
    for file in &listing.files {
        writeln!(out, "{}", file.name)?;
    }
    Ok(())
}
