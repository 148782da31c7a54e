//! Line sinks
//!
//! Counterpart of [`crate::source`]: the writer emits whole lines and the
//! sink decides where they go.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use flate2::write::GzEncoder;

use crate::config::EncodeOptions;
use crate::error::{CbfError, Result};

/// Accepts output lines
pub trait LineSink {
    /// Write one line; the line ending is added by the sink
    fn write_line(&mut self, line: &str) -> io::Result<()>;

    /// Flush buffers and finalize the underlying transport
    fn finish(self) -> io::Result<()>
    where
        Self: Sized;
}

/// [`LineSink`] over any writer
pub struct TextSink<W: Write> {
    writer: W,
}

impl<W: Write> TextSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Recover the writer without flushing
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> LineSink for TextSink<W> {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.writer.write_all(line.as_bytes())?;
        self.writer.write_all(b"\n")
    }

    fn finish(mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

impl LineSink for Vec<String> {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.push(line.to_string());
        Ok(())
    }

    fn finish(self) -> io::Result<()> {
        Ok(())
    }
}

/// Output file, plain or gzip
pub enum FileWriter {
    Plain(BufWriter<File>),
    Gzip(GzEncoder<BufWriter<File>>),
}

impl Write for FileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            FileWriter::Plain(w) => w.write(buf),
            FileWriter::Gzip(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            FileWriter::Plain(w) => w.flush(),
            FileWriter::Gzip(w) => w.flush(),
        }
    }
}

/// File sink whose `finish` also writes the gzip trailer
pub struct FileSink {
    inner: TextSink<FileWriter>,
}

impl LineSink for FileSink {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.inner.write_line(line)
    }

    fn finish(self) -> io::Result<()> {
        match self.inner.into_inner() {
            FileWriter::Plain(mut w) => w.flush(),
            FileWriter::Gzip(encoder) => encoder.finish()?.flush(),
        }
    }
}

/// Create (or truncate) a file sink, gzip-compressed when the options say so
pub fn create_sink(path: impl AsRef<Path>, options: &EncodeOptions) -> Result<FileSink> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| CbfError::open(path, e))?;
    let writer = BufWriter::new(file);

    let writer = if options.compression.applies_to(path) {
        tracing::debug!("writing gzip-compressed output to {}", path.display());
        FileWriter::Gzip(GzEncoder::new(
            writer,
            flate2::Compression::new(options.gzip_level),
        ))
    } else {
        FileWriter::Plain(writer)
    };

    Ok(FileSink {
        inner: TextSink::new(writer),
    })
}
