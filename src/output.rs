use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use crate::format::quote_field;
use crate::system::snapshot::SnapshotRow;

pub const DEFAULT_DELIMITER: char = '\t';

/// Where snapshot rows go.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Sink {
    Stdout,
    File(PathBuf),
}

impl Sink {
    /// Empty or `-` means standard output.
    pub fn parse(destination: &str) -> Self {
        match destination {
            "" | "-" => Sink::Stdout,
            path => Sink::File(PathBuf::from(path)),
        }
    }

    pub fn open(&self) -> io::Result<Box<dyn Write>> {
        Ok(match self {
            Sink::Stdout => Box::new(BufWriter::new(io::stdout().lock())),
            Sink::File(path) => Box::new(BufWriter::new(File::create(path)?)),
        })
    }
}

/// Write one delimited line per row and flush.
pub fn write_rows<W: Write>(out: &mut W, rows: &[SnapshotRow], delimiter: char) -> io::Result<()> {
    let mut sep = [0u8; 4];
    let sep = delimiter.encode_utf8(&mut sep);
    for row in rows {
        for (i, field) in row.fields().iter().enumerate() {
            if i > 0 {
                out.write_all(sep.as_bytes())?;
            }
            out.write_all(quote_field(field, delimiter).as_bytes())?;
        }
        out.write_all(b"\n")?;
    }
    out.flush()
}

/// Accepts a single character, or the escape `\t` for tab.
pub fn parse_delimiter(raw: &str) -> Option<char> {
    if raw == "\\t" {
        return Some('\t');
    }
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c != '"' && c != '\n' && c != '\r' => Some(c),
        _ => None,
    }
}
