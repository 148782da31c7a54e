//! cbfkit-core - Conic Benchmark Format reader and writer
//!
//! Decodes CBF text into a `cbfkit_ast::Document` and encodes documents
//! back into canonical CBF text. Files may be plain or gzip-compressed.
//!
//! # Example
//!
//! ```
//! use cbfkit_core::{decode_str, encode_to_string};
//!
//! let text = "\
//! ## a tiny problem
//! VER
//! 1
//!
//! OBJSENSE
//! MAX
//!
//! VAR
//! 1 1
//! L+ 1
//!
//! OBJACOORD
//! 1
//! 0 1
//! ";
//!
//! let doc = decode_str(text).unwrap();
//! let canonical = encode_to_string(&doc);
//!
//! assert!(!canonical.contains('#'));
//! assert_eq!(decode_str(&canonical).unwrap(), doc);
//! ```

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod number;
pub mod reader;
pub mod section;
pub mod sink;
pub mod source;
pub mod writer;

// Re-export main types and functions
pub use config::{
    Compression, DecodeOptions, EncodeOptions, Settings, MAX_SUPPORTED_VERSION, REAL_PRECISION,
};
pub use error::{CbfError, ParseErrorKind, Result};
pub use reader::{decode, decode_str, decode_with_options, read_file, read_file_with_options};
pub use section::Section;
pub use sink::{create_sink, FileSink, LineSink, TextSink};
pub use source::{open_source, reader_source, FileSource, LineSource, TextSource};
pub use writer::{encode, encode_to_string, write_file, write_file_with_options};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
