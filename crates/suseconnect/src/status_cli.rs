//! `suseconnect-status`: print the registration status of installed
//! products.
//!
//! Usage:
//!   suseconnect-status [--library <path>] [--format json|text] [--pretty] [-v...]
//!
//! Loads the library, calls `getstatus(<format>)`, prints the result and
//! releases the returned buffer.

use std::path::PathBuf;

use clap::{ArgAction, Parser};
use libsuseconnect_sys::DEFAULT_LIBRARY_PATH;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

use crate::client::Connect;
use crate::config::{LoaderConfig, LIBRARY_ENV};
use crate::error::{Error, Result};
use crate::status::StatusFormat;

#[derive(Parser, Debug)]
#[command(
    name = "suseconnect-status",
    version,
    about = "Print product registration status reported by libsuseconnect"
)]
pub struct Cli {
    /// Path to libsuseconnect.so
    #[arg(long, env = LIBRARY_ENV, default_value = DEFAULT_LIBRARY_PATH)]
    pub library: PathBuf,

    /// Output format requested from the library
    #[arg(long, value_enum, default_value_t = StatusFormat::Json)]
    pub format: StatusFormat,

    /// Re-indent JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Do not forward the library's own log lines
    #[arg(long)]
    pub no_native_logs: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn loader_config(&self) -> LoaderConfig {
        LoaderConfig {
            library: self.library.clone(),
            forward_logs: !self.no_native_logs,
        }
    }
}

/// Install a stderr subscriber. `RUST_LOG` takes precedence over `verbose`.
pub fn init_tracing(verbose: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn default_directive(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Fetch the status text through `connect`.
pub fn fetch(connect: &Connect, format: StatusFormat, pretty: bool) -> Result<String> {
    let text = connect.status_raw(format)?;
    tracing::debug!(%format, bytes = text.len(), "status received");
    render(&text, format, pretty)
}

/// Open the library named on the command line and fetch the status.
pub fn run(cli: &Cli) -> Result<String> {
    let connect = Connect::open(&cli.loader_config())?;
    fetch(&connect, cli.format, cli.pretty)
}

/// Text printed for a `getstatus` result.
///
/// Unless pretty-printing JSON, the output is the library's text unchanged.
pub fn render(text: &str, format: StatusFormat, pretty: bool) -> Result<String> {
    if !pretty || format != StatusFormat::Json {
        return Ok(text.to_string());
    }
    let value: Value = serde_json::from_str(text).map_err(|_| Error::Status {
        message: text.trim().to_string(),
    })?;
    serde_json::to_string_pretty(&value).map_err(Error::Encode)
}
