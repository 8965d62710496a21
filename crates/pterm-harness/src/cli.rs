#![forbid(unsafe_code)]

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::Parser;
use pterm::{MemoryStorage, Size, StorageBackend, TerminalConfig};

#[cfg(feature = "http-lookup")]
use pterm::{HttpIpLookup, TerminalEvent};

use crate::error::Result;
use crate::runner::{Resolver, Runner};

#[derive(Debug, Parser)]
#[command(
    name = "pterm-harness",
    about = "Drive the pterm terminal widget headlessly from stdin",
    version
)]
pub struct Cli {
    /// Terminal configuration (`.toml` or `.json`).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Persist the session to this JSON file instead of memory.
    #[arg(long)]
    pub storage: Option<PathBuf>,

    #[arg(long, default_value_t = 1280)]
    pub width: i32,

    #[arg(long, default_value_t = 800)]
    pub height: i32,

    /// Never answer `whoami` lookups; they time out on `:wait`.
    #[arg(long)]
    pub offline: bool,
}

pub fn run_from_env() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    run(cli, stdin.lock(), &mut stdout)
}

/// Logs go to stderr so the transcript on stdout stays clean.
fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

pub fn run(cli: Cli, input: impl BufRead, out: &mut impl Write) -> Result<()> {
    let config = match &cli.config {
        Some(path) => TerminalConfig::from_file(path)?,
        None => TerminalConfig::default(),
    };
    let storage: Box<dyn StorageBackend> = match &cli.storage {
        Some(path) => Box::new(pterm::FileStorage::new(path.clone())),
        None => Box::new(MemoryStorage::new()),
    };
    let resolver = resolver(&cli, &config)?;
    let viewport = Size::new(cli.width, cli.height);
    tracing::debug!(?viewport, offline = cli.offline, "harness starting");

    let mut runner = Runner::new(config, storage, viewport, resolver)?;
    runner.run(input, out)?;
    out.flush()?;
    Ok(())
}

#[cfg(feature = "http-lookup")]
fn resolver(cli: &Cli, config: &TerminalConfig) -> Result<Resolver> {
    if cli.offline {
        return Ok(None);
    }
    match HttpIpLookup::new(config.ip_lookup_url.clone(), config.shell.whoami_timeout) {
        Ok(lookup) => {
            let resolve: Box<dyn Fn(u64) -> TerminalEvent> =
                Box::new(move |request_id| lookup.resolve(request_id));
            Ok(Some(resolve))
        }
        Err(err) => {
            tracing::warn!(error = %err, "http client unavailable; lookups will time out");
            Ok(None)
        }
    }
}

#[cfg(not(feature = "http-lookup"))]
fn resolver(_cli: &Cli, _config: &TerminalConfig) -> Result<Resolver> {
    Ok(None)
}
