//! Reader and writer settings
//!
//! Settings can be built in code or loaded from a TOML file:
//!
//! ```toml
//! [reader]
//! max_version = 2
//!
//! [writer]
//! compression = "auto"
//! gzip_level = 6
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CbfError, Result};

pub use cbfkit_ast::MAX_SUPPORTED_VERSION;

/// Significant decimal digits used for every real value on output
pub const REAL_PRECISION: usize = 16;

/// Options applied while decoding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeOptions {
    /// Highest `VER` accepted; larger versions are rejected
    pub max_version: u32,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            max_version: MAX_SUPPORTED_VERSION,
        }
    }
}

/// When to gzip the output file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    /// Compress when the output path ends in `.gz`
    #[default]
    Auto,
    Always,
    Never,
}

impl Compression {
    /// Resolve against an output path
    pub fn applies_to(self, path: &Path) -> bool {
        match self {
            Compression::Auto => path.extension().is_some_and(|ext| ext == "gz"),
            Compression::Always => true,
            Compression::Never => false,
        }
    }
}

/// Options applied while encoding to a file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodeOptions {
    pub compression: Compression,
    /// gzip level, 0-9
    pub gzip_level: u32,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            compression: Compression::Auto,
            gzip_level: 6,
        }
    }
}

/// Top-level settings structure
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub reader: DecodeOptions,
    pub writer: EncodeOptions,
}

impl Settings {
    /// Parse settings from a TOML string
    pub fn from_toml_str(toml_str: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Load settings from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| CbfError::open(path, e))?;
        let settings = Self::from_toml_str(&text)
            .map_err(|e| CbfError::Config(format!("{}: {}", path.display(), e)))?;

        if settings.writer.gzip_level > 9 {
            return Err(CbfError::Config(format!(
                "{}: gzip_level must be between 0 and 9, got {}",
                path.display(),
                settings.writer.gzip_level
            )));
        }

        Ok(settings)
    }
}
