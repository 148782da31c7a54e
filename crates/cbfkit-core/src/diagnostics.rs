//! Diagnostics for cbfkit
//!
//! This module turns errors from the reader, the writer and the settings
//! loader into reportable messages with stable codes.

use serde::{Deserialize, Serialize};

use crate::error::{CbfError, ParseErrorKind};

/// A reportable message
///
/// # Example
///
/// ```
/// use cbfkit_core::diagnostics::Diagnostic;
///
/// let diag = Diagnostic::error("Variable index out of range")
///     .with_code("E0007")
///     .with_file("problem.cbf")
///     .with_line(12)
///     .with_help("Declare the variable in the VAR section");
///
/// assert_eq!(
///     diag.to_string().lines().next(),
///     Some("problem.cbf:12: error[E0007]: Variable index out of range")
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,

    pub message: String,

    /// Stable code, e.g. "E0007"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    /// 1-based line of the input
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
}

/// Severity level of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Diagnostic {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            code: None,
            line: None,
            file: None,
            help: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Severity::Info, message)
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_line(mut self, line: u64) -> Self {
        self.line = Some(line);
        self
    }

    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Build an error diagnostic from a library error.
    ///
    /// Parse errors keep their line number; the message is the error kind
    /// alone since the line is rendered separately.
    pub fn from_error(err: &CbfError, file: Option<&str>) -> Self {
        let mut diag = match err {
            CbfError::Open { .. } => Self::error(err.to_string()).with_code("E0001"),
            CbfError::Io(_) => Self::error(err.to_string()).with_code("E0001"),
            CbfError::Config(_) => Self::error(err.to_string()).with_code("E0010"),
            CbfError::Parse { line, kind } => {
                let diag = Self::error(kind.to_string())
                    .with_code(kind.code())
                    .with_line(*line);
                match help_for(kind) {
                    Some(help) => diag.with_help(help),
                    None => diag,
                }
            }
        };
        if let Some(file) = file {
            diag = diag.with_file(file);
        }
        diag
    }
}

fn help_for(kind: &ParseErrorKind) -> Option<&'static str> {
    match kind {
        ParseErrorKind::UnknownKeyword { .. } => {
            Some("a CBF file starts with VER; valid keywords are VER, OBJSENSE, PSDVAR, VAR, INT, CON, PSDCON, OBJFCOORD, OBJACOORD, OBJBCOORD, FCOORD, ACOORD, BCOORD, HCOORD, DCOORD")
        }
        ParseErrorKind::IndexOutOfRange { .. } => {
            Some("dimension sections (VAR, CON, PSDVAR, PSDCON) must come before the coordinates that use them")
        }
        ParseErrorKind::MissingRequiredSection("OBJSENSE") => {
            Some("add an OBJSENSE section with MIN or MAX")
        }
        ParseErrorKind::UnrecognizedToken(_) => {
            Some("cones are F, L+, L-, L=, Q, QR, EXP, EXP*; senses are MIN and MAX")
        }
        _ => None,
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Format: file:line: severity[code]: message
        match (&self.file, self.line) {
            (Some(file), Some(line)) => write!(f, "{}:{}: ", file, line)?,
            (Some(file), None) => write!(f, "{}: ", file)?,
            (None, Some(line)) => write!(f, "line {}: ", line)?,
            (None, None) => {}
        }

        write!(f, "{}", self.severity)?;
        if let Some(ref code) = self.code {
            write!(f, "[{}]", code)?;
        }
        write!(f, ": {}", self.message)?;

        if let Some(ref help) = self.help {
            write!(f, "\n  = help: {}", help)?;
        }

        Ok(())
    }
}

/// A collection of diagnostics
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Diagnostics {
    diagnostics: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.is_error())
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.diagnostics.into_iter()
    }
}
