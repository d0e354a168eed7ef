use std::ops::Deref;

use crate::error::{Error, Result};

/// Widest checksum any algorithm produces.
pub const MAX_CHECKSUM_WIDTH: usize = 2;

/// Checksum algorithms a unibin file can be protected with. The numeric
/// value is the code stored in the file header.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChecksumType {
    /// No checksum at all.
    #[default]
    None = 0,
    /// Sum of bytes modulo 256.
    Sum = 1,
    /// Sum of bytes modulo 256, bitwise negated.
    NegatedSum = 2,
    /// 16-bit Fletcher checksum with modulo 255.
    Fletcher16 = 3,
}

impl TryFrom<u8> for ChecksumType {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(ChecksumType::None),
            1 => Ok(ChecksumType::Sum),
            2 => Ok(ChecksumType::NegatedSum),
            3 => Ok(ChecksumType::Fletcher16),
            _ => {
                tracing::warn!(target: "checksum", "unknown checksum type: {}", value);
                Err(Error::InvalidArgument(format!(
                    "unknown checksum type: {}",
                    value
                )))
            }
        }
    }
}

impl From<ChecksumType> for u8 {
    fn from(value: ChecksumType) -> Self {
        value as u8
    }
}

impl ChecksumType {
    /// Number of trailing bytes the checksum occupies.
    pub const fn width(self) -> usize {
        match self {
            ChecksumType::None => 0,
            ChecksumType::Sum | ChecksumType::NegatedSum => 1,
            ChecksumType::Fletcher16 => 2,
        }
    }

    pub fn compute(self, data: &[u8]) -> Checksum {
        let mut out = Checksum {
            bytes: [0; MAX_CHECKSUM_WIDTH],
            width: self.width(),
        };

        match self {
            ChecksumType::None => {}
            ChecksumType::Sum | ChecksumType::NegatedSum => {
                let sum = data.iter().fold(0_u8, |acc, b| acc.wrapping_add(*b));
                out.bytes[0] = if self == ChecksumType::NegatedSum {
                    !sum
                } else {
                    sum
                };
            }
            ChecksumType::Fletcher16 => {
                let (mut c0, mut c1) = (0_u16, 0_u16);
                for b in data {
                    c0 = (c0 + *b as u16) % 255;
                    c1 = (c1 + c0) % 255;
                }
                out.bytes = [c0 as u8, c1 as u8];
            }
        }

        out
    }

    /// Computes the checksum of `data` into the first `width()` bytes of `out`.
    pub fn compute_into(self, data: &[u8], out: &mut [u8]) -> Result<()> {
        let width = self.width();
        if out.len() < width {
            return Err(Error::InvalidArgument(format!(
                "checksum output too small, need: {}, got: {}",
                width,
                out.len()
            )));
        }
        out[..width].copy_from_slice(&self.compute(data));
        Ok(())
    }
}

/// Width of the checksum stored under the numeric code `code`.
pub fn width_of(code: u8) -> Result<usize> {
    Ok(ChecksumType::try_from(code)?.width())
}

/// Checksum of `data` under the algorithm stored as `code`.
pub fn compute(data: &[u8], code: u8) -> Result<Checksum> {
    Ok(ChecksumType::try_from(code)?.compute(data))
}

/// Result of a checksum computation, `width` bytes long.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checksum {
    bytes: [u8; MAX_CHECKSUM_WIDTH],
    width: usize,
}

impl Checksum {
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes[..self.width]
    }
}

impl Deref for Checksum {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        self.as_slice()
    }
}

impl AsRef<[u8]> for Checksum {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}
