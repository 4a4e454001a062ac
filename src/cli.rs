//! CLI argument parsing using clap.

use clap::Parser;
use std::path::PathBuf;

use crate::fs::DataPaths;

/// `io-notes` - a terminal notebook of channels, threads, tags and tasks.
///
/// Messages and UI state are kept as JSON under the data directory.
#[derive(Parser, Debug)]
#[command(name = "io-notes", version, about, long_about = None)]
pub struct Args {
    /// Data directory (defaults to ./.io-notes)
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Log file (defaults to io-notes.log inside the data directory)
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,
}

impl Args {
    /// Resolves the data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if no directory was given and the current
    /// directory cannot be determined.
    pub fn data_paths(&self) -> anyhow::Result<DataPaths> {
        match &self.data_dir {
            Some(dir) => Ok(DataPaths::new(dir)),
            None => DataPaths::from_cwd(),
        }
    }

    /// The log file to write to, given the resolved data directory.
    #[must_use]
    pub fn log_path(&self, paths: &DataPaths) -> PathBuf {
        self.log_file.clone().unwrap_or_else(|| paths.log_file())
    }
}
