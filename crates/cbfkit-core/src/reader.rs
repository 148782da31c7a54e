//! CBF Reader
//!
//! This module decodes CBF text into a `cbfkit_ast::Document`.
//!
//! The reader is a two-state machine. In the initial state the only accepted
//! keyword is `VER`; afterwards every keyword selects a section parser. Each
//! section reads its count line, then exactly that many data lines, and
//! checks every index against the sections that were read before it. The
//! first violation aborts the whole decode; the partially built document is
//! dropped and only the error (with its line number) reaches the caller.
//!
//! # Example
//!
//! ```
//! use cbfkit_core::decode_str;
//!
//! let text = "VER\n1\n\nOBJSENSE\nMIN\n\nVAR\n2 1\nL+ 2\n\nOBJACOORD\n1\n1 3.5\n";
//! let doc = decode_str(text).unwrap();
//!
//! assert_eq!(doc.num_variables(), 2);
//! assert_eq!(doc.obj_lin[0].value, 3.5);
//! ```

use std::collections::HashSet;
use std::path::Path;

use cbfkit_ast::{
    Bounds, BoundsViolation, Cone, ConeStack, ConstEntry, Document, LinEntry, ObjLinEntry,
    ObjPsdEntry, ObjectiveSense, PsdEntry, PsdMapConstEntry, PsdMapEntry, UnknownToken,
};
use tracing::{debug, warn};

use crate::config::DecodeOptions;
use crate::error::{CbfError, ParseErrorKind, Result};
use crate::number::{parse_f64, parse_i32, parse_i64};
use crate::section::Section;
use crate::source::{open_source, LineSource, TextSource};

/// Upper bound on storage reserved up front from a declared count
const MAX_PREALLOC: usize = 1 << 16;

/// Decode a document with default options
pub fn decode<S: LineSource>(source: S) -> Result<Document> {
    decode_with_options(source, &DecodeOptions::default())
}

/// Decode a document
pub fn decode_with_options<S: LineSource>(source: S, options: &DecodeOptions) -> Result<Document> {
    Reader::new(source, options).run()
}

/// Decode a document held in memory
pub fn decode_str(text: &str) -> Result<Document> {
    decode(TextSource::from_text(text))
}

/// Read a file, plain or gzip-compressed
pub fn read_file(path: impl AsRef<Path>) -> Result<Document> {
    read_file_with_options(path, &DecodeOptions::default())
}

/// Read a file with explicit options
pub fn read_file_with_options(path: impl AsRef<Path>, options: &DecodeOptions) -> Result<Document> {
    let path = path.as_ref();
    debug!("reading {}", path.display());
    decode_with_options(open_source(path)?, options)
}

/// Failure while converting one column
enum ColumnError {
    Malformed(String),
    Token(UnknownToken),
}

impl From<String> for ColumnError {
    fn from(reason: String) -> Self {
        ColumnError::Malformed(reason)
    }
}

/// A single whitespace-separated column
trait Column: Sized {
    fn parse(token: &str) -> std::result::Result<Self, ColumnError>;
}

impl Column for i64 {
    fn parse(token: &str) -> std::result::Result<Self, ColumnError> {
        Ok(parse_i64(token)?)
    }
}

impl Column for i32 {
    fn parse(token: &str) -> std::result::Result<Self, ColumnError> {
        Ok(parse_i32(token)?)
    }
}

impl Column for f64 {
    fn parse(token: &str) -> std::result::Result<Self, ColumnError> {
        Ok(parse_f64(token)?)
    }
}

impl Column for Cone {
    fn parse(token: &str) -> std::result::Result<Self, ColumnError> {
        token.parse().map_err(ColumnError::Token)
    }
}

impl Column for ObjectiveSense {
    fn parse(token: &str) -> std::result::Result<Self, ColumnError> {
        token.parse().map_err(ColumnError::Token)
    }
}

/// Element count (64-bit, non-negative)
struct Count(usize);

impl Column for Count {
    fn parse(token: &str) -> std::result::Result<Self, ColumnError> {
        let n = parse_i64(token)?;
        usize::try_from(n)
            .map(Count)
            .map_err(|_| ColumnError::Malformed(format!("count must be non-negative, got {}", n)))
    }
}

/// Block dimension or version (32-bit, non-negative)
struct Dim(usize);

impl Column for Dim {
    fn parse(token: &str) -> std::result::Result<Self, ColumnError> {
        let n = parse_i32(token)?;
        usize::try_from(n).map(Dim).map_err(|_| {
            ColumnError::Malformed(format!("dimension must be non-negative, got {}", n))
        })
    }
}

/// A data line with a fixed number of typed columns
trait Row: Sized {
    const COLUMNS: usize;
    fn parse(cols: &[&str]) -> std::result::Result<Self, ColumnError>;
}

macro_rules! impl_row {
    ($n:expr; $($t:ident $i:tt),+) => {
        impl<$($t: Column),+> Row for ($($t,)+) {
            const COLUMNS: usize = $n;

            fn parse(cols: &[&str]) -> std::result::Result<Self, ColumnError> {
                Ok(($($t::parse(cols[$i])?,)+))
            }
        }
    };
}

impl_row!(1; A 0);
impl_row!(2; A 0, B 1);
impl_row!(3; A 0, B 1, C 2);
impl_row!(4; A 0, B 1, C 2, D 3);
impl_row!(5; A 0, B 1, C 2, D 3, E 4);

fn line_text<'l>(
    section: &'static str,
    bytes: &'l [u8],
) -> std::result::Result<&'l str, ParseErrorKind> {
    std::str::from_utf8(bytes).map_err(|err| ParseErrorKind::MalformedLine {
        section,
        text: String::from_utf8_lossy(bytes).into_owned(),
        reason: format!("invalid UTF-8 at byte {}", err.valid_up_to()),
    })
}

fn parse_row<T: Row>(section: Section, line: &str) -> std::result::Result<T, ParseErrorKind> {
    let malformed = |reason: String| ParseErrorKind::MalformedLine {
        section: section.keyword(),
        text: line.to_string(),
        reason,
    };

    let cols: Vec<&str> = line.split_whitespace().collect();
    if cols.len() != T::COLUMNS {
        return Err(malformed(format!(
            "expected {} column{}, found {}",
            T::COLUMNS,
            if T::COLUMNS == 1 { "" } else { "s" },
            cols.len()
        )));
    }

    T::parse(&cols).map_err(|e| match e {
        ColumnError::Malformed(reason) => malformed(reason),
        ColumnError::Token(token) => ParseErrorKind::UnrecognizedToken(token),
    })
}

/// Reader state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReaderState {
    /// Nothing but comments and blank lines seen; `VER` must come next
    Init,
    /// Version read; any section keyword may follow
    Body,
}

struct Reader<'o, S> {
    source: S,
    options: &'o DecodeOptions,
    state: ReaderState,
    doc: Document,
    /// `None` until an `OBJSENSE` section has been read
    sense: Option<ObjectiveSense>,
    seen: HashSet<Section>,
}

impl<'o, S: LineSource> Reader<'o, S> {
    fn new(source: S, options: &'o DecodeOptions) -> Self {
        Self {
            source,
            options,
            state: ReaderState::Init,
            doc: Document::with_version(0),
            sense: None,
            seen: HashSet::new(),
        }
    }

    fn run(mut self) -> Result<Document> {
        while let Some(section) = self.next_keyword()? {
            match (self.state, section) {
                (ReaderState::Init, Section::Ver) => {}
                (ReaderState::Init, other) => {
                    return Err(self.error(ParseErrorKind::UnknownKeyword {
                        keyword: other.keyword().to_string(),
                        hint: " (the first keyword must be VER)",
                    }));
                }
                (ReaderState::Body, Section::Ver) => {
                    return Err(self.error(ParseErrorKind::UnknownKeyword {
                        keyword: section.keyword().to_string(),
                        hint: " (VER may only appear once, as the first keyword)",
                    }));
                }
                (ReaderState::Body, _) => {}
            }

            if !self.seen.insert(section) && section != Section::ObjSense {
                warn!(
                    "line {}: section {} repeated, the earlier one is discarded",
                    self.source.line_number(),
                    section
                );
            }

            self.read_section(section)?;
        }

        if self.state == ReaderState::Init {
            return Err(self.error(ParseErrorKind::MissingRequiredSection("VER")));
        }

        match self.sense {
            Some(sense) => self.doc.sense = sense,
            None => return Err(self.error(ParseErrorKind::MissingRequiredSection("OBJSENSE"))),
        }

        debug!(
            "decoded {} lines: {} variables, {} constraints, {} psd variables, {} psd constraints",
            self.source.line_number(),
            self.doc.num_variables(),
            self.doc.num_constraints(),
            self.doc.num_psd_variables(),
            self.doc.num_psd_constraints()
        );

        Ok(self.doc)
    }

    fn error(&self, kind: ParseErrorKind) -> CbfError {
        CbfError::parse(self.source.line_number(), kind)
    }

    fn out_of_range(&self, section: Section, violation: BoundsViolation) -> CbfError {
        self.error(ParseErrorKind::IndexOutOfRange {
            section: section.keyword(),
            violation,
        })
    }

    /// Next keyword, skipping blank lines
    fn next_keyword(&mut self) -> Result<Option<Section>> {
        loop {
            let parsed = match self.source.next_line()? {
                None => return Ok(None),
                Some(bytes) => match line_text("keyword", bytes) {
                    Err(kind) => Err(kind),
                    Ok(line) => {
                        let mut tokens = line.split_whitespace();
                        match (tokens.next(), tokens.next()) {
                            (None, _) => continue,
                            (Some(keyword), None) => {
                                Section::from_keyword(keyword).ok_or_else(|| {
                                    ParseErrorKind::UnknownKeyword {
                                        keyword: keyword.to_string(),
                                        hint: "",
                                    }
                                })
                            }
                            (Some(_), Some(_)) => Err(ParseErrorKind::MalformedLine {
                                section: "keyword",
                                text: line.to_string(),
                                reason: "a keyword must stand alone on its line".to_string(),
                            }),
                        }
                    }
                },
            };
            return parsed.map(Some).map_err(|kind| self.error(kind));
        }
    }

    /// Read and parse the next line of a section
    fn row<T: Row>(&mut self, section: Section, expected: &'static str) -> Result<T> {
        let parsed = match self.source.next_line()? {
            None => Err(ParseErrorKind::UnexpectedEndOfInput { expected }),
            Some(bytes) => line_text(section.keyword(), bytes)
                .and_then(|line| parse_row::<T>(section, line)),
        };
        parsed.map_err(|kind| self.error(kind))
    }

    fn read_section(&mut self, section: Section) -> Result<()> {
        match section {
            Section::Ver => self.read_version(),
            Section::ObjSense => {
                let (sense,): (ObjectiveSense,) = self.row(section, "MIN or MAX")?;
                self.sense = Some(sense);
                Ok(())
            }
            Section::Con => {
                self.doc.constraints = self.read_stack(section)?;
                Ok(())
            }
            Section::Var => {
                self.doc.variables = self.read_stack(section)?;
                Ok(())
            }
            Section::Int => {
                self.doc.integers =
                    self.read_entries(section, |b, (j,): (i64,)| b.var(j))?;
                Ok(())
            }
            Section::PsdCon => {
                self.doc.psd_constraints = self.read_dims(section)?;
                Ok(())
            }
            Section::PsdVar => {
                self.doc.psd_variables = self.read_dims(section)?;
                Ok(())
            }
            Section::ObjFCoord => {
                self.doc.obj_psd = self.read_entries(
                    section,
                    |b, (j, k, l, value): (i32, i32, i32, f64)| {
                        let j = b.psdvar(j.into())?;
                        let (k, l) = b.psdvar_entry(j, k.into(), l.into())?;
                        Ok(ObjPsdEntry::new(j, k, l, value))
                    },
                )?;
                Ok(())
            }
            Section::ObjACoord => {
                self.doc.obj_lin = self.read_entries(section, |b, (j, value): (i64, f64)| {
                    Ok(ObjLinEntry::new(b.var(j)?, value))
                })?;
                Ok(())
            }
            Section::ObjBCoord => {
                let (value,): (f64,) = self.row(section, "objective constant")?;
                self.doc.obj_const = value;
                Ok(())
            }
            Section::FCoord => {
                self.doc.con_psd = self.read_entries(
                    section,
                    |b, (i, j, k, l, value): (i64, i32, i32, i32, f64)| {
                        let i = b.con(i)?;
                        let j = b.psdvar(j.into())?;
                        let (k, l) = b.psdvar_entry(j, k.into(), l.into())?;
                        Ok(PsdEntry::new(i, j, k, l, value))
                    },
                )?;
                Ok(())
            }
            Section::ACoord => {
                self.doc.con_lin =
                    self.read_entries(section, |b, (i, j, value): (i64, i64, f64)| {
                        Ok(LinEntry::new(b.con(i)?, b.var(j)?, value))
                    })?;
                Ok(())
            }
            Section::BCoord => {
                self.doc.con_const = self.read_entries(section, |b, (i, value): (i64, f64)| {
                    Ok(ConstEntry::new(b.con(i)?, value))
                })?;
                Ok(())
            }
            Section::HCoord => {
                self.doc.psdcon_lin = self.read_entries(
                    section,
                    |b, (i, j, k, l, value): (i32, i64, i32, i32, f64)| {
                        let i = b.psdcon(i.into())?;
                        let j = b.var(j)?;
                        let (k, l) = b.psdcon_entry(i, k.into(), l.into())?;
                        Ok(PsdMapEntry::new(i, j, k, l, value))
                    },
                )?;
                Ok(())
            }
            Section::DCoord => {
                self.doc.psdcon_const = self.read_entries(
                    section,
                    |b, (i, k, l, value): (i32, i32, i32, f64)| {
                        let i = b.psdcon(i.into())?;
                        let (k, l) = b.psdcon_entry(i, k.into(), l.into())?;
                        Ok(PsdMapConstEntry::new(i, k, l, value))
                    },
                )?;
                Ok(())
            }
        }
    }

    fn read_version(&mut self) -> Result<()> {
        let (Dim(version),): (Dim,) = self.row(Section::Ver, "format version")?;
        let version = u32::try_from(version).unwrap_or(u32::MAX);

        if version > self.options.max_version {
            return Err(self.error(ParseErrorKind::UnsupportedVersion {
                found: version,
                max: self.options.max_version,
            }));
        }

        debug!("format version {}", version);
        self.doc.version = version;
        self.state = ReaderState::Body;
        Ok(())
    }

    /// `CON` / `VAR`: total and block count, then one `cone size` line per block
    fn read_stack(&mut self, section: Section) -> Result<ConeStack> {
        let (Count(total), Count(num_blocks)): (Count, Count) =
            self.row(section, "total and number of cone blocks")?;

        let mut stack = ConeStack::with_capacity(num_blocks.min(MAX_PREALLOC));
        let mut sum: usize = 0;

        for _ in 0..num_blocks {
            let (cone, Count(dim)): (Cone, Count) = self.row(section, "cone block")?;
            sum = sum.saturating_add(dim);
            stack.push(cone, dim);
        }

        if sum != total {
            return Err(self.error(ParseErrorKind::CountMismatch {
                section: section.keyword(),
                declared: i64::try_from(total).unwrap_or(i64::MAX),
                sum: i64::try_from(sum).unwrap_or(i64::MAX),
            }));
        }

        debug!("{}: {} entries in {} blocks", section, total, num_blocks);
        Ok(stack)
    }

    /// `PSDCON` / `PSDVAR`: count, then one dimension per line
    fn read_dims(&mut self, section: Section) -> Result<Vec<usize>> {
        let (Count(count),): (Count,) = self.row(section, "number of PSD blocks")?;

        let mut dims = Vec::with_capacity(count.min(MAX_PREALLOC));
        for _ in 0..count {
            let (Dim(dim),): (Dim,) = self.row(section, "PSD block dimension")?;
            dims.push(dim);
        }

        debug!("{}: {} blocks", section, count);
        Ok(dims)
    }

    /// Count line followed by `count` rows, each checked against the bounds
    /// established by earlier sections
    fn read_entries<T, E>(
        &mut self,
        section: Section,
        build: impl Fn(&Bounds<'_>, T) -> std::result::Result<E, BoundsViolation>,
    ) -> Result<Vec<E>>
    where
        T: Row,
    {
        let (Count(count),): (Count,) = self.row(section, "number of entries")?;

        let mut entries = Vec::with_capacity(count.min(MAX_PREALLOC));
        for _ in 0..count {
            let raw: T = self.row(section, "coordinate entry")?;
            let entry = build(&self.doc.bounds(), raw)
                .map_err(|violation| self.out_of_range(section, violation))?;
            entries.push(entry);
        }

        debug!("{}: {} entries", section, count);
        Ok(entries)
    }
}
