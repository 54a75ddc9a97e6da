//! Record/replay stream I/O.
//!
//! The wire format is a flat sequence of IEEE-754 little-endian 64-bit
//! floats: no header, no delimiter, no length field. Byte offset `8*k`
//! holds the (k+1)-th value in generation order. Tee files are opened for
//! append, so separate runs writing the same path produce one concatenated
//! stream readable by a single sequential reader.

use crate::error::{PrngError, PrngResult};
use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::Path;

/// Write side: every generated or replayed value is appended here.
#[derive(Debug)]
pub struct TeeWriter {
    out: BufWriter<File>,
}

impl TeeWriter {
    /// Open `path` for binary append, creating it if missing.
    /// Open failures surface as errors; callers wanting best-effort teeing
    /// must catch them explicitly.
    pub fn open<P: AsRef<Path>>(path: P) -> PrngResult<Self> {
        let file = OpenOptions::new().append(true).create(true).open(path)?;
        Ok(Self {
            out: BufWriter::new(file),
        })
    }

    /// Append `values` in array order.
    pub fn write_row(&mut self, values: &[f64]) -> PrngResult<()> {
        for value in values {
            self.out.write_all(&value.to_le_bytes())?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> PrngResult<()> {
        self.out.flush()?;
        Ok(())
    }
}

/// Read side: replaces generator output with previously recorded values.
#[derive(Debug)]
pub struct SourceReader {
    input: BufReader<File>,
}

impl SourceReader {
    pub fn open<P: AsRef<Path>>(path: P) -> PrngResult<Self> {
        let file = File::open(path)?;
        Ok(Self {
            input: BufReader::new(file),
        })
    }

    /// Read exactly `count` consecutive values in file order.
    /// A short stream is an exhaustion error, never a short read.
    pub fn read_row(&mut self, count: usize) -> PrngResult<Vec<f64>> {
        let mut bytes = vec![0u8; count * 8];
        self.input.read_exact(&mut bytes).map_err(|err| {
            if err.kind() == ErrorKind::UnexpectedEof {
                PrngError::SourceExhausted { requested: count }
            } else {
                PrngError::Io(err)
            }
        })?;
        Ok(decode_f64s(&bytes))
    }
}

/// Read an entire stream file as a flat array, for inspection and tests.
/// Trailing bytes that do not fill a value are ignored.
pub fn dump_all<P: AsRef<Path>>(path: P) -> PrngResult<Vec<f64>> {
    let mut bytes = Vec::new();
    File::open(path)?.read_to_end(&mut bytes)?;
    Ok(decode_f64s(&bytes))
}

fn decode_f64s(bytes: &[u8]) -> Vec<f64> {
    let mut values = Vec::with_capacity(bytes.len() / 8);
    let mut chunk = [0u8; 8];
    for raw in bytes.chunks_exact(8) {
        chunk.copy_from_slice(raw);
        values.push(f64::from_le_bytes(chunk));
    }
    values
}
