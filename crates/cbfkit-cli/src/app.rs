//! CLI Application logic
//!
//! Contains the command-line interface implementation.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use cbfkit_ast::Document;
use cbfkit_core::diagnostics::{Diagnostic, Diagnostics};
use cbfkit_core::{
    decode_with_options, encode, open_source, reader_source, write_file_with_options,
    CbfError, Compression, EncodeOptions, Settings, TextSink,
};

/// Output format for reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output for tool consumption
    Json,
}

/// Compression choice for `convert`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CompressArg {
    /// Compress when the output path ends in `.gz`
    Auto,
    Always,
    Never,
}

impl From<CompressArg> for Compression {
    fn from(arg: CompressArg) -> Self {
        match arg {
            CompressArg::Auto => Compression::Auto,
            CompressArg::Always => Compression::Always,
            CompressArg::Never => Compression::Never,
        }
    }
}

#[derive(Parser)]
#[command(name = "cbfkit")]
#[command(author, version, about = "Conic Benchmark Format toolkit", long_about = None)]
struct Cli {
    /// Settings file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a CBF file for errors
    Check {
        /// Input CBF file, plain or gzip ("-" for stdin)
        input: PathBuf,

        /// Output format (text or json)
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Rewrite a CBF file in canonical form
    Convert {
        /// Input CBF file, plain or gzip ("-" for stdin)
        input: PathBuf,

        /// Output file ("-" for stdout)
        #[arg(short, long)]
        output: PathBuf,

        /// Output compression; overrides the settings file
        #[arg(long, value_enum)]
        compress: Option<CompressArg>,
    },

    /// Print the section sizes of a CBF file
    Info {
        /// Input CBF file, plain or gzip ("-" for stdin)
        input: PathBuf,

        /// Output format (text or json)
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

/// Run the CLI application
///
/// Parses arguments, installs logging, loads settings and dispatches to the
/// command. A failed `check` exits with status 1.
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let settings = load_settings(cli.config.as_deref())?;

    match cli.command {
        Commands::Check { input, format } => {
            let mut out = io::stdout().lock();
            if !check_command(&input, format, &settings, &mut out)? {
                out.flush()?;
                std::process::exit(1);
            }
        }
        Commands::Convert {
            input,
            output,
            compress,
        } => {
            let mut options = settings.writer.clone();
            if let Some(compress) = compress {
                options.compression = compress.into();
            }
            convert_command(&input, &output, &settings, &options)?;
        }
        Commands::Info { input, format } => {
            info_command(&input, format, &settings, &mut io::stdout().lock())?;
        }
    }

    Ok(())
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

/// Load settings from an explicit file, or fall back to defaults
pub fn load_settings(path: Option<&Path>) -> Result<Settings> {
    match path {
        Some(path) => {
            let settings = Settings::load(path)
                .with_context(|| format!("Failed to load settings: {}", path.display()))?;
            debug!("loaded settings from {}", path.display());
            Ok(settings)
        }
        None => Ok(Settings::default()),
    }
}

fn is_stdio(path: &Path) -> bool {
    path.as_os_str() == "-"
}

/// Decode a path, or stdin for "-"; both may be gzip
pub fn read_input(input: &Path, settings: &Settings) -> std::result::Result<Document, CbfError> {
    if is_stdio(input) {
        decode_with_options(reader_source(io::stdin())?, &settings.reader)
    } else {
        decode_with_options(open_source(input)?, &settings.reader)
    }
}

/// Execute the check command
///
/// Returns `Ok(true)` when the file decoded and validated cleanly. Decode
/// failures are reported as diagnostics, not as `Err`.
pub fn check_command(
    input: &Path,
    format: OutputFormat,
    settings: &Settings,
    out: &mut impl Write,
) -> Result<bool> {
    let file = input.display().to_string();
    let mut diagnostics = Diagnostics::new();

    match read_input(input, settings) {
        Ok(doc) => {
            if let Err(violation) = doc.validate() {
                diagnostics.push(
                    Diagnostic::error(violation.to_string())
                        .with_code("E0007")
                        .with_file(file.clone()),
                );
            }
        }
        Err(err) => diagnostics.push(Diagnostic::from_error(&err, Some(file.as_str()))),
    }

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&diagnostics)
                .context("Failed to serialize diagnostics to JSON")?;
            writeln!(out, "{}", json)?;
        }
        OutputFormat::Text => {
            if diagnostics.is_empty() {
                writeln!(out, "✓ No issues found in {}", file)?;
            } else {
                for diag in diagnostics.iter() {
                    writeln!(out, "{}", diag)?;
                }
                writeln!(out, "Found {} error(s)", diagnostics.error_count())?;
            }
        }
    }

    Ok(!diagnostics.has_errors())
}

/// Execute the convert command
pub fn convert_command(
    input: &Path,
    output: &Path,
    settings: &Settings,
    options: &EncodeOptions,
) -> Result<()> {
    let doc = read_input(input, settings)
        .with_context(|| format!("Failed to read {}", input.display()))?;

    if is_stdio(output) {
        encode(&doc, TextSink::new(io::stdout().lock())).context("Failed to write to stdout")?;
    } else {
        write_file_with_options(&doc, output, options)
            .with_context(|| format!("Failed to write {}", output.display()))?;
        info!("wrote {}", output.display());
    }

    Ok(())
}

/// Execute the info command
pub fn info_command(
    input: &Path,
    format: OutputFormat,
    settings: &Settings,
    out: &mut impl Write,
) -> Result<()> {
    let doc = read_input(input, settings)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let summary = doc.summary();

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&summary)
                .context("Failed to serialize summary to JSON")?;
            writeln!(out, "{}", json)?;
        }
        OutputFormat::Text => {
            let cones: Vec<&str> = doc.cones_used().iter().map(|c| c.token()).collect();

            writeln!(out, "{}", input.display())?;
            writeln!(out, "  version:          {}", summary.version)?;
            writeln!(out, "  objective:        {}", summary.sense)?;
            writeln!(
                out,
                "  variables:        {} in {} block(s)",
                summary.variables, summary.variable_blocks
            )?;
            writeln!(
                out,
                "  constraints:      {} in {} block(s)",
                summary.constraints, summary.constraint_blocks
            )?;
            writeln!(out, "  integers:         {}", summary.integers)?;
            writeln!(out, "  psd variables:    {}", summary.psd_variables)?;
            writeln!(out, "  psd constraints:  {}", summary.psd_constraints)?;
            if !cones.is_empty() {
                writeln!(out, "  cones:            {}", cones.join(" "))?;
            }
            writeln!(
                out,
                "  nonzeros:         obj {}+{}, con {}+{}+{}, psdcon {}+{}",
                summary.obj_psd_nnz,
                summary.obj_lin_nnz,
                summary.con_psd_nnz,
                summary.con_lin_nnz,
                summary.con_const_nnz,
                summary.psdcon_lin_nnz,
                summary.psdcon_const_nnz
            )?;
        }
    }

    Ok(())
}
