//! itanium-filt - demangle Itanium C++ ABI symbol names
//!
//! Usage:
//!   itanium-filt <symbol>...        Demangle each argument
//!   itanium-filt < listing.txt      Demangle every `_Z` token on stdin
//!   itanium-filt --json <symbol>    Print the decoded tree as JSON
//!   itanium-filt -p <symbol>        Print the name without parameters

mod filter;

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use clap::Parser;
use itanium_demangle::{demangle_with, parse, DemangleOptions, Symbol};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "itanium-filt")]
#[command(about = "Demangle Itanium C++ ABI symbol names", long_about = None)]
struct Cli {
    /// Symbols to demangle (read lines from stdin when none are given)
    symbols: Vec<String>,

    /// Print only the qualified name, without the parameter list
    #[arg(short = 'p', long)]
    no_params: bool,

    /// Omit the return type of function templates
    #[arg(long)]
    no_return_type: bool,

    /// Print one JSON object per symbol
    #[arg(long)]
    json: bool,

    /// Log decoder recovery steps to stderr
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn options(&self) -> DemangleOptions {
        DemangleOptions::new()
            .with_params(!self.no_params)
            .with_return_type(!self.no_return_type)
    }
}

/// One line of `--json` output.
#[derive(Serialize)]
struct Record<'a> {
    mangled: &'a str,
    demangled: String,
    /// `null` for input that is not a mangled name.
    symbol: Option<Symbol>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let options = cli.options();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if cli.symbols.is_empty() {
        debug!("reading symbols from stdin");
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let line = line.context("Failed to read from stdin")?;
            if cli.json {
                let symbol = line.trim();
                if !symbol.is_empty() {
                    write_json(&mut out, symbol, &options)?;
                }
            } else {
                writeln!(out, "{}", filter::filter_line(&line, &options))
                    .context("Failed to write to stdout")?;
            }
        }
    } else {
        debug!(count = cli.symbols.len(), "demangling arguments");
        for symbol in &cli.symbols {
            if cli.json {
                write_json(&mut out, symbol, &options)?;
            } else {
                writeln!(out, "{}", demangle_with(symbol, &options))
                    .context("Failed to write to stdout")?;
            }
        }
    }

    out.flush().context("Failed to flush stdout")?;
    Ok(())
}

fn write_json(out: &mut impl Write, mangled: &str, options: &DemangleOptions) -> Result<()> {
    let record = Record {
        mangled,
        demangled: demangle_with(mangled, options),
        symbol: parse(mangled).ok(),
    };
    serde_json::to_writer(&mut *out, &record)
        .with_context(|| format!("Failed to serialize {mangled}"))?;
    writeln!(out).context("Failed to write to stdout")?;
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(io::stderr)
        .init();
}
