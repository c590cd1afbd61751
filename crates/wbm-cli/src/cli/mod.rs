//! CLI for WBM, the Wayback Machine timemap and mirroring tool.

mod commands;

use anyhow::Result;
use clap::{ArgGroup, Parser};
use std::path::PathBuf;
use std::time::Duration;
use wbm_core::client::{ArchiveClient, ClientConfig};
use wbm_core::config;
use wbm_core::mirror::MirrorOptions;
use wbm_core::timemap::TimeRange;

use commands::{run_jsonmap, run_printtime, run_saveto, run_timemap};

/// Top-level CLI. Actions are flags and may be combined; they run in the
/// order timemap, jsonmap, printtime, saveto.
#[derive(Debug, Parser)]
#[command(name = "wbm")]
#[command(about = "WBM: list and mirror Wayback Machine captures", long_about = None)]
#[command(group(
    ArgGroup::new("action")
        .required(true)
        .multiple(true)
        .args(["timemap", "jsonmap", "printtime", "saveto"])
))]
pub struct Cli {
    /// Log to stderr at debug level and trace every request.
    #[arg(long)]
    pub debug: bool,

    /// Print the link timemap for URL.
    #[arg(long)]
    pub timemap: bool,

    /// Print the JSON timemap of every URL under the URL prefix.
    #[arg(long)]
    pub jsonmap: bool,

    /// Earliest capture time (yyyymmddhhmmss or a prefix of it).
    #[arg(long, value_name = "TS")]
    pub from: Option<String>,

    /// Latest capture time (yyyymmddhhmmss or a prefix of it).
    #[arg(long, value_name = "TS")]
    pub until: Option<String>,

    /// Fetch and print every memento from the timemap.
    #[arg(long)]
    pub printtime: bool,

    /// Save every capture from the JSON timemap under DIR.
    #[arg(long, short = 's', value_name = "DIR")]
    pub saveto: Option<PathBuf>,

    /// Save with the capture timestamp as the first path component.
    #[arg(long, requires = "saveto")]
    pub withtime: bool,

    /// Seconds to wait after every download (default from config).
    #[arg(long, value_name = "SECONDS")]
    pub interval: Option<u64>,

    /// Don't overwrite existing files; skip them instead.
    #[arg(long, short = 'n', requires = "saveto")]
    pub noclobber: bool,

    /// URL, or URL prefix for --jsonmap and --saveto.
    pub url: String,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        let range = TimeRange::new(self.from.as_deref(), self.until.as_deref())?;
        let interval = self
            .interval
            .map(Duration::from_secs)
            .unwrap_or_else(|| cfg.interval());
        let client = ArchiveClient::new(ClientConfig::from_config(&cfg, self.debug)?);

        if self.timemap {
            run_timemap(&client, &self.url)?;
        }
        if self.jsonmap {
            run_jsonmap(&client, &self.url, &range)?;
        }
        if self.printtime {
            run_printtime(&client, &self.url, interval)?;
        }
        if let Some(root) = self.saveto {
            let options = MirrorOptions {
                root,
                with_time: self.withtime,
                no_clobber: self.noclobber,
                interval,
            };
            run_saveto(&client, &self.url, &range, options)?;
        }

        Ok(())
    }
}
