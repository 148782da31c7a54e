//! Line sources
//!
//! The reader only sees a stream of non-comment lines plus a running line
//! counter. Where the bytes come from (a string, a plain file, a gzip file)
//! is decided here.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

use flate2::read::MultiGzDecoder;

use crate::error::{CbfError, Result};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Supplies successive non-comment lines
///
/// Lines are raw bytes; the reader decides whether they are valid text, so
/// that a bad byte is reported at its line and comments may hold anything.
pub trait LineSource {
    /// Next line whose first byte is not `#`, without its line ending.
    /// Returns `None` at end of input.
    fn next_line(&mut self) -> io::Result<Option<&[u8]>>;

    /// Number of physical lines consumed so far, comments included
    fn line_number(&self) -> u64;
}

/// [`LineSource`] over any buffered reader
pub struct TextSource<R> {
    reader: R,
    buf: Vec<u8>,
    line: u64,
}

impl<R: BufRead> TextSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
            line: 0,
        }
    }
}

impl<'a> TextSource<&'a [u8]> {
    /// Source over in-memory text
    pub fn from_text(text: &'a str) -> Self {
        Self::new(text.as_bytes())
    }
}

impl<R: BufRead> LineSource for TextSource<R> {
    fn next_line(&mut self) -> io::Result<Option<&[u8]>> {
        loop {
            self.buf.clear();
            if self.reader.read_until(b'\n', &mut self.buf)? == 0 {
                return Ok(None);
            }
            self.line += 1;

            if self.buf.first() != Some(&b'#') {
                while matches!(self.buf.last(), Some(b'\n' | b'\r')) {
                    self.buf.pop();
                }
                return Ok(Some(&self.buf));
            }
        }
    }

    fn line_number(&self) -> u64 {
        self.line
    }
}

impl<S: LineSource + ?Sized> LineSource for &mut S {
    fn next_line(&mut self) -> io::Result<Option<&[u8]>> {
        (**self).next_line()
    }

    fn line_number(&self) -> u64 {
        (**self).line_number()
    }
}

/// Boxed reader used for file and stream sources
pub type FileSource = TextSource<Box<dyn BufRead>>;

/// Wrap a buffered reader, decompressing when it starts with the gzip magic.
/// Every gzip member is read, so concatenated archives decode in full.
fn sniff<R: BufRead + 'static>(mut reader: R) -> io::Result<Box<dyn BufRead>> {
    let compressed = reader.fill_buf()?.starts_with(&GZIP_MAGIC);

    Ok(if compressed {
        tracing::debug!("input is gzip-compressed");
        Box::new(BufReader::new(MultiGzDecoder::new(reader)))
    } else {
        Box::new(reader)
    })
}

/// Open a file as a line source, transparently decompressing gzip input
pub fn open_source(path: impl AsRef<Path>) -> Result<FileSource> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| CbfError::open(path, e))?;
    tracing::debug!("opened {}", path.display());

    let reader = sniff(BufReader::new(file)).map_err(|e| CbfError::open(path, e))?;
    Ok(TextSource::new(reader))
}

/// Wrap an arbitrary reader, e.g. stdin; gzip input is detected as for files
pub fn reader_source<R: Read + 'static>(reader: R) -> Result<FileSource> {
    Ok(TextSource::new(sniff(BufReader::new(reader))?))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::{Cursor, Write};

    use flate2::write::GzEncoder;

    fn collect_from(mut source: impl LineSource) -> Vec<(String, u64)> {
        let mut out = Vec::new();
        while let Some(line) = source.next_line().unwrap() {
            let line = String::from_utf8_lossy(line).into_owned();
            out.push((line, source.line_number()));
        }
        out
    }

    fn collect(text: &str) -> Vec<(String, u64)> {
        collect_from(TextSource::from_text(text))
    }

    fn gzip(text: &str) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(text.as_bytes()).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn test_skips_comments_and_counts_them() {
        let lines = collect("# header\nVER\n# note\n1\n");
        assert_eq!(
            lines,
            vec![("VER".to_string(), 2), ("1".to_string(), 4)]
        );
    }

    #[test]
    fn test_blank_lines_are_returned() {
        let lines = collect("VER\n\n1");
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1].0, "");
        assert_eq!(lines[2], ("1".to_string(), 3));
    }

    #[test]
    fn test_strips_crlf() {
        let lines = collect("VER\r\n1\r\n");
        assert_eq!(lines[0].0, "VER");
        assert_eq!(lines[1].0, "1");
    }

    #[test]
    fn test_indented_hash_is_not_a_comment() {
        let lines = collect(" # not a comment\n");
        assert_eq!(lines[0].0, " # not a comment");
    }

    #[test]
    fn test_comment_bytes_need_not_be_utf8() {
        let input: &[u8] = b"# author: M\xFCller\nVER\n";
        let lines = collect_from(TextSource::new(input));
        assert_eq!(lines, vec![("VER".to_string(), 2)]);
    }

    #[test]
    fn test_non_utf8_data_line_is_returned_as_bytes() {
        let mut source = TextSource::new(&b"VER\n\xFF1\n"[..]);
        assert_eq!(source.next_line().unwrap(), Some(&b"VER"[..]));
        assert_eq!(source.next_line().unwrap(), Some(&b"\xFF1"[..]));
        assert_eq!(source.line_number(), 2);
    }

    #[test]
    fn test_reader_source_plain() {
        let source = reader_source(Cursor::new(b"VER\n1\n".to_vec())).unwrap();
        assert_eq!(collect_from(source).len(), 2);
    }

    #[test]
    fn test_reader_source_detects_gzip() {
        let source = reader_source(Cursor::new(gzip("# c\nVER\n1\n"))).unwrap();
        assert_eq!(
            collect_from(source),
            vec![("VER".to_string(), 2), ("1".to_string(), 3)]
        );
    }

    #[test]
    fn test_reader_source_reads_every_gzip_member() {
        let mut bytes = gzip("VER\n1\n");
        bytes.extend(gzip("OBJSENSE\nMIN\n"));
        let source = reader_source(Cursor::new(bytes)).unwrap();
        let lines: Vec<String> = collect_from(source).into_iter().map(|(l, _)| l).collect();
        assert_eq!(lines, vec!["VER", "1", "OBJSENSE", "MIN"]);
    }

    #[test]
    fn test_reader_source_empty_input() {
        let source = reader_source(Cursor::new(Vec::new())).unwrap();
        assert!(collect_from(source).is_empty());
    }

    #[test]
    fn test_open_missing_file() {
        let err = open_source("/nonexistent/problem.cbf").err().unwrap();
        assert!(matches!(err, CbfError::Open { .. }));
    }
}
