//! CBF Writer
//!
//! This module converts a `cbfkit_ast::Document` into CBF text.
//!
//! Sections are written in a fixed order and every section is followed by a
//! blank line. Sections without entries are left out, as is an objective
//! constant of exactly zero.
//!
//! # Example
//!
//! ```
//! use cbfkit_ast::{Cone, Document, ObjLinEntry};
//! use cbfkit_core::encode_to_string;
//!
//! let mut doc = Document::with_version(1);
//! doc.variables.push(Cone::Free, 1);
//! doc.obj_lin.push(ObjLinEntry::new(0, 2.5));
//!
//! let text = encode_to_string(&doc);
//! assert!(text.starts_with("VER\n1\n\nOBJSENSE\nMIN\n\n"));
//! assert!(text.contains("OBJACOORD\n1\n0 2.5\n"));
//! ```

use std::io;
use std::path::Path;

use cbfkit_ast::{ConeStack, Document};
use tracing::debug;

use crate::config::EncodeOptions;
use crate::error::Result;
use crate::number::format_real;
use crate::section::Section;
use crate::sink::{create_sink, LineSink};

/// Encode a document into a sink and finish the sink
pub fn encode<K: LineSink>(doc: &Document, mut sink: K) -> Result<()> {
    Encoder::new(doc, &mut sink).run()?;
    sink.finish()?;
    Ok(())
}

/// Encode a document to a string
pub fn encode_to_string(doc: &Document) -> String {
    let mut lines: Vec<String> = Vec::new();
    Encoder::new(doc, &mut lines)
        .run()
        .expect("Vec<String> sink is infallible");

    let mut out = String::new();
    for line in &lines {
        out.push_str(line);
        out.push('\n');
    }
    out
}

/// Write a document to a file, gzip-compressed if the path ends in `.gz`
pub fn write_file(doc: &Document, path: impl AsRef<Path>) -> Result<()> {
    write_file_with_options(doc, path, &EncodeOptions::default())
}

/// Write a document to a file with explicit options
pub fn write_file_with_options(
    doc: &Document,
    path: impl AsRef<Path>,
    options: &EncodeOptions,
) -> Result<()> {
    let path = path.as_ref();
    debug!("writing {}", path.display());
    encode(doc, create_sink(path, options)?)
}

/// Section-by-section emitter
struct Encoder<'a, K: ?Sized> {
    doc: &'a Document,
    sink: &'a mut K,
}

impl<'a, K: LineSink + ?Sized> Encoder<'a, K> {
    fn new(doc: &'a Document, sink: &'a mut K) -> Self {
        Self { doc, sink }
    }

    fn run(mut self) -> io::Result<()> {
        for section in Section::ALL {
            self.section(section)?;
        }
        Ok(())
    }

    fn line(&mut self, line: impl AsRef<str>) -> io::Result<()> {
        self.sink.write_line(line.as_ref())
    }

    /// Keyword, body lines, blank separator
    fn emit<I>(&mut self, section: Section, lines: I) -> io::Result<()>
    where
        I: IntoIterator<Item = String>,
    {
        self.line(section.keyword())?;
        let mut written = 0usize;
        for line in lines {
            self.line(line)?;
            written += 1;
        }
        self.line("")?;
        debug!("{}: wrote {} lines", section, written);
        Ok(())
    }

    /// Count line followed by one line per entry
    fn emit_entries<T>(
        &mut self,
        section: Section,
        entries: &[T],
        fmt: impl Fn(&T) -> String,
    ) -> io::Result<()> {
        if entries.is_empty() {
            return Ok(());
        }
        let head = std::iter::once(entries.len().to_string());
        self.emit(section, head.chain(entries.iter().map(fmt)))
    }

    fn emit_stack(&mut self, section: Section, stack: &ConeStack) -> io::Result<()> {
        if stack.is_empty() && stack.num_blocks() == 0 {
            return Ok(());
        }
        let head = std::iter::once(format!("{} {}", stack.len(), stack.num_blocks()));
        let blocks = stack
            .iter()
            .map(|b| format!("{} {}", b.cone.token(), b.dim));
        self.emit(section, head.chain(blocks))
    }

    fn section(&mut self, section: Section) -> io::Result<()> {
        let doc = self.doc;
        match section {
            Section::Ver => self.emit(section, [doc.version.to_string()]),
            Section::ObjSense => self.emit(section, [doc.sense.token().to_string()]),
            Section::PsdVar => self.emit_entries(section, &doc.psd_variables, |d| d.to_string()),
            Section::Var => self.emit_stack(section, &doc.variables),
            Section::Int => self.emit_entries(section, &doc.integers, |j| j.to_string()),
            Section::Con => self.emit_stack(section, &doc.constraints),
            Section::PsdCon => {
                self.emit_entries(section, &doc.psd_constraints, |d| d.to_string())
            }
            Section::ObjFCoord => self.emit_entries(section, &doc.obj_psd, |e| {
                format!("{} {} {} {}", e.psdvar, e.row, e.col, format_real(e.value))
            }),
            Section::ObjACoord => self.emit_entries(section, &doc.obj_lin, |e| {
                format!("{} {}", e.var, format_real(e.value))
            }),
            Section::ObjBCoord => {
                if doc.obj_const == 0.0 {
                    return Ok(());
                }
                self.emit(section, [format_real(doc.obj_const)])
            }
            Section::FCoord => self.emit_entries(section, &doc.con_psd, |e| {
                format!(
                    "{} {} {} {} {}",
                    e.con,
                    e.psdvar,
                    e.row,
                    e.col,
                    format_real(e.value)
                )
            }),
            Section::ACoord => self.emit_entries(section, &doc.con_lin, |e| {
                format!("{} {} {}", e.con, e.var, format_real(e.value))
            }),
            Section::BCoord => self.emit_entries(section, &doc.con_const, |e| {
                format!("{} {}", e.con, format_real(e.value))
            }),
            Section::HCoord => self.emit_entries(section, &doc.psdcon_lin, |e| {
                format!(
                    "{} {} {} {} {}",
                    e.psdcon,
                    e.var,
                    e.row,
                    e.col,
                    format_real(e.value)
                )
            }),
            Section::DCoord => self.emit_entries(section, &doc.psdcon_const, |e| {
                format!("{} {} {} {}", e.psdcon, e.row, e.col, format_real(e.value))
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cbfkit_ast::{Cone, ObjectiveSense, PsdMapConstEntry};

    #[test]
    fn test_minimal_document() {
        let doc = Document::with_version(1);
        assert_eq!(encode_to_string(&doc), "VER\n1\n\nOBJSENSE\nMIN\n\n");
    }

    #[test]
    fn test_maximize() {
        let mut doc = Document::with_version(2);
        doc.sense = ObjectiveSense::Maximize;
        assert!(encode_to_string(&doc).contains("OBJSENSE\nMAX\n"));
    }

    #[test]
    fn test_zero_objective_constant_is_omitted() {
        let mut doc = Document::with_version(1);
        doc.obj_const = 0.0;
        assert!(!encode_to_string(&doc).contains("OBJBCOORD"));

        doc.obj_const = -1.5;
        assert!(encode_to_string(&doc).contains("OBJBCOORD\n-1.5\n\n"));
    }

    #[test]
    fn test_stack_of_empty_blocks_is_written() {
        let mut doc = Document::with_version(1);
        doc.constraints.push(Cone::Zero, 0);
        assert!(encode_to_string(&doc).contains("CON\n0 1\nL= 0\n\n"));
    }

    #[test]
    fn test_emission_order() {
        let mut doc = Document::with_version(1);
        doc.psd_constraints.push(2);
        doc.psdcon_const.push(PsdMapConstEntry::new(0, 1, 0, 0.25));
        doc.constraints.push(Cone::NonNegative, 1);
        doc.variables.push(Cone::Quadratic, 3);
        doc.psd_variables.push(3);

        let text = encode_to_string(&doc);
        let pos = |kw: &str| text.find(&format!("\n{}\n", kw)).unwrap();
        assert!(pos("PSDVAR") < pos("VAR"));
        assert!(pos("VAR") < pos("CON"));
        assert!(pos("CON") < pos("PSDCON"));
        assert!(pos("PSDCON") < pos("DCOORD"));
        assert!(text.ends_with("DCOORD\n1\n0 1 0 0.25\n\n"));
    }

    #[test]
    fn test_encode_into_text_sink() {
        let mut buf = Vec::new();
        encode(&Document::with_version(0), crate::sink::TextSink::new(&mut buf)).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "VER\n0\n\nOBJSENSE\nMIN\n\n");
    }
}
