//! `suseconnect-status`: print the registration status reported by
//! libsuseconnect.
//!
//! See [`suseconnect::status_cli`] for the options.

use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;
use suseconnect::status_cli::{init_tracing, run, Cli};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let output = match run(&cli) {
        Ok(output) => output,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let mut stdout = io::stdout().lock();
    if let Err(e) = writeln!(stdout, "{output}").and_then(|()| stdout.flush()) {
        eprintln!("{e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
