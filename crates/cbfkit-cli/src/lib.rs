//! cbfkit CLI - Command-line interface library
//!
//! This library provides the CLI functionality for cbfkit:
//! - Check: decode and validate a CBF file, report diagnostics
//! - Convert: rewrite a CBF file in canonical form, optionally gzipped
//! - Info: print the section sizes of a problem
//!
//! # Library Usage
//!
//! ```ignore
//! use cbfkit_cli::{check_command, OutputFormat};
//! use cbfkit_core::Settings;
//!
//! let ok = check_command(&input, OutputFormat::Json, &Settings::default(), &mut std::io::stdout())?;
//! ```
//!
//! # Binary Usage
//!
//! ```bash
//! # Check a file, JSON diagnostics
//! cbfkit check problem.cbf --format json
//!
//! # Canonicalize and compress
//! cbfkit convert problem.cbf -o problem.cbf.gz
//!
//! # Section sizes
//! cbfkit info problem.cbf.gz
//! ```

pub mod app;

// Re-export main entry point and types
pub use app::{check_command, convert_command, info_command, load_settings, read_input};
pub use app::{run_cli, CompressArg, OutputFormat};
