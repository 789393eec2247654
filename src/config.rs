//! Command-line and environment configuration for the `scribble` binary.

use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::Parser;
use log::LevelFilter;

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8000";

#[derive(Debug, Parser)]
#[command(name = "scribble")]
#[command(about = "Terminal note editor with headlines, highlights and side notes")]
#[command(version)]
pub struct Args {
    /// Base URL of the notes endpoint
    #[arg(long, env = "SCRIBBLE_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Open the note with this id instead of the first one listed
    #[arg(long)]
    pub note: Option<String>,

    /// Write log records to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    #[arg(
        long,
        default_value = "info",
        help = "Log level (off, error, warn, info, debug, trace)"
    )]
    pub log_level: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub endpoint: String,
    pub note_id: Option<String>,
    pub log_file: Option<PathBuf>,
    pub log_level: LevelFilter,
}

impl Config {
    pub fn from_args_and_env() -> Result<Self> {
        Self::from_args(Args::parse())
    }

    pub fn from_args(args: Args) -> Result<Self> {
        let endpoint = args.endpoint.trim().trim_end_matches('/').to_string();
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            bail!("endpoint must be an http:// or https:// URL, got `{}`", args.endpoint);
        }
        let log_level = match args.log_level.parse::<LevelFilter>() {
            Ok(level) => level,
            Err(_) => bail!("unknown log level `{}`", args.log_level),
        };
        Ok(Config {
            endpoint,
            note_id: args.note.filter(|id| !id.trim().is_empty()),
            log_file: args.log_file,
            log_level,
        })
    }
}
