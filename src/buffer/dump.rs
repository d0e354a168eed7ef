use std::{fmt, io};

use itertools::Itertools;

use crate::error::{Error, Result};

use super::Buffer;

const BYTES_PER_LINE: usize = 16;

/// Hex dump of a byte slice, 16 bytes per line with a printable-ASCII column.
///
/// ```text
///   48 65 6C 6C 6F 0A                                | Hello.
/// ```
pub struct HexDump<'d> {
    bytes: &'d [u8],
    prefix: &'d str,
}

impl<'d> HexDump<'d> {
    pub fn new(bytes: &'d [u8]) -> Self {
        Self { bytes, prefix: "" }
    }

    /// Text printed at the start of every line.
    pub fn prefix(mut self, prefix: &'d str) -> Self {
        self.prefix = prefix;
        self
    }
}

fn printable(b: u8) -> char {
    if b.is_ascii_graphic() || b == b' ' {
        b as char
    } else {
        '.'
    }
}

impl fmt::Display for HexDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.bytes.chunks(BYTES_PER_LINE) {
            let hex = line.iter().map(|b| format!("{:02X} ", b)).join("");
            let pad = "   ".repeat(BYTES_PER_LINE - line.len());
            let text: String = line.iter().map(|b| printable(*b)).collect();
            writeln!(f, "{}{}{}| {}", self.prefix, hex, pad, text)?;
        }
        Ok(())
    }
}

pub fn dump_bytes(bytes: &[u8], out: &mut impl io::Write, prefix: Option<&str>) -> Result<()> {
    let dump = HexDump::new(bytes).prefix(prefix.unwrap_or(""));
    write!(out, "{}", dump)?;
    Ok(())
}

impl Buffer<'_> {
    pub fn dump(&self, out: &mut impl io::Write, prefix: Option<&str>) -> Result<()> {
        dump_bytes(self.as_slice(), out, prefix)
    }

    /// Dumps the logical bytes in `start..end`.
    pub fn dump_slice(
        &self,
        start: usize,
        end: usize,
        out: &mut impl io::Write,
        prefix: Option<&str>,
    ) -> Result<()> {
        let bytes = self.as_slice().get(start..end).ok_or_else(|| {
            Error::InvalidArgument(format!(
                "dump range {}..{} outside of {} byte buffer",
                start,
                end,
                self.size()
            ))
        })?;
        dump_bytes(bytes, out, prefix)
    }
}
