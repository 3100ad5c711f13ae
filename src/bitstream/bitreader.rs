//! BitReader: reads back a payload written by BitPacker, stopping before the padding bits
//! of the last byte.

use crate::error::{HcError, Result};

const BIT_MASK: u8 = 0xff;

/// Reads bits from a packed payload.
#[derive(Debug)]
pub struct BitReader<'a> {
    buffer: &'a [u8],
    cursor: usize,
    bit_index: usize,
    /// Bits left before the padding starts.
    left: usize,
}

impl<'a> BitReader<'a> {
    /// Creates a new BitReader. `padding` is the count of zero bits that fill out the last
    /// byte, and must be 0-7 (and 0 if there are no bytes at all).
    pub fn new(buffer: &'a [u8], padding: u8) -> Result<Self> {
        if padding > 7 || (buffer.is_empty() && padding > 0) {
            return Err(HcError::BitstreamUnderflow(format!(
                "{} padding bits on a {} byte payload",
                padding,
                buffer.len()
            )));
        }
        Ok(Self {
            buffer,
            cursor: 0,
            bit_index: 0,
            left: buffer.len() * 8 - padding as usize,
        })
    }

    /// Return the next bit, or None once only padding is left.
    pub fn bit(&mut self) -> Option<bool> {
        if self.left == 0 {
            return None;
        }
        let bit =
            (self.buffer[self.cursor] & BIT_MASK >> self.bit_index) >> (7 - self.bit_index);
        self.bit_index += 1;
        self.bit_index %= 8;
        if self.bit_index == 0 {
            self.cursor += 1;
        }
        self.left -= 1;
        Some(bit == 1)
    }

    /// Bits not yet read, padding excluded.
    pub fn remaining(&self) -> usize {
        self.left
    }

    /// Debugging function. Report current position in the buffer.
    pub fn loc(&self) -> String {
        format!("[{}.{}]", self.cursor, self.bit_index)
    }
}

impl Iterator for BitReader<'_> {
    type Item = bool;

    fn next(&mut self) -> Option<bool> {
        self.bit()
    }
}

/// Unpack a whole payload into bits, dropping the padding.
pub fn unpack(padding: u8, bytes: &[u8]) -> Result<Vec<bool>> {
    Ok(BitReader::new(bytes, padding)?.collect())
}
