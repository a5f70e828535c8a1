// src/main.rs
//
// xmlindent: reflow tagged XML (SPDX license XML) into canonical indented, wrapped text
//
// - Block tags sit on their own lines, their content indented one level deeper.
// - Inline tags flow with the surrounding text.
// - Tags in neither table are laid out inline and reported.
// - Attributes are written in the configured order per tag; unlisted ones are
//   reported and dropped. Tags without a configured order keep input order.
// - Paragraphs are wrapped for minimum raggedness within --width, indentation included.
// - Root "spdx" becomes "SPDX"; the root gets prettyprinted="<timestamp>".
// - Each file is formatted in place after copying the original to "<file>.backup".
//   A file that fails to parse is left untouched and does not stop the others.
//
// CLI flags:
//   --width N         : line width (default 80)
//   --indent N        : spaces per level (default 2)
//   --config FILE     : TOML tag tables / width / indent
//   --backup-ext EXT  : backup suffix (default ".backup")
//   --no-backup       : do not write backups
//   --no-timestamp    : do not set prettyprinted
//   --stdout          : print results instead of rewriting files
//   -v, --verbose     : debug logging (RUST_LOG overrides)

use clap::{ArgAction, Parser};
use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use xmlindent::process::{self, Options, DEFAULT_BACKUP_EXT};
use xmlindent::{Config, Error, Formatted};

/// CLI flags
#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Maximum line width, indentation included
    #[arg(long)]
    width: Option<usize>,

    /// Spaces per nesting level
    #[arg(long)]
    indent: Option<usize>,

    /// TOML file with tag tables, width and indent
    #[arg(long)]
    config: Option<PathBuf>,

    /// Suffix of the backup copy
    #[arg(long = "backup-ext", default_value = DEFAULT_BACKUP_EXT)]
    backup_ext: String,

    /// Do not keep a backup of the original file
    #[arg(long = "no-backup", action = ArgAction::SetTrue)]
    no_backup: bool,

    /// Do not stamp the root element with the formatting time
    #[arg(long = "no-timestamp", action = ArgAction::SetTrue)]
    no_timestamp: bool,

    /// Print results to stdout instead of rewriting the files
    #[arg(long, action = ArgAction::SetTrue)]
    stdout: bool,

    /// Debug logging
    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    /// Files to format
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("xmlindent={level}"))),
        )
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .init();

    let options = match load_options(&cli) {
        Ok(options) => options,
        Err(err) => {
            error!("{err}");
            return ExitCode::FAILURE;
        }
    };

    let mut failed = 0usize;
    for path in &cli.files {
        let result = if cli.stdout {
            print_file(path, &options)
        } else {
            process::process_file(path, &options)
        };
        match result {
            Ok(formatted) => {
                if formatted.warnings.is_empty() {
                    info!("formatted {}", path.display());
                } else {
                    warn!(
                        warnings = formatted.warnings.len(),
                        "formatted {} with warnings",
                        path.display()
                    );
                }
            }
            Err(err @ Error::Parse(_)) => {
                error!("{}: {err}", path.display());
                failed += 1;
            }
            Err(err) => {
                error!("{err}");
                failed += 1;
            }
        }
    }

    if failed > 0 {
        error!("{failed} of {} files failed", cli.files.len());
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Precedence: defaults, then --config, then --width/--indent.
fn load_options(cli: &Cli) -> Result<Options, Error> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(width) = cli.width {
        config.width = width;
    }
    if let Some(indent) = cli.indent {
        config.indent = indent;
    }
    config.validate()?;

    Ok(Options {
        config,
        backup_ext: (!cli.no_backup && !cli.stdout).then(|| cli.backup_ext.clone()),
        timestamp: !cli.no_timestamp,
    })
}

fn print_file(path: &Path, options: &Options) -> Result<Formatted, Error> {
    let src = process::read_source(path)?;
    let formatted = process::format_source(&src, options)?;
    io::stdout()
        .lock()
        .write_all(formatted.text.as_bytes())
        .map_err(|e| Error::Io {
            path: PathBuf::from("<stdout>"),
            source: e,
        })?;
    Ok(formatted)
}
