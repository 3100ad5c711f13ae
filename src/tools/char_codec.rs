use crate::error::{HcError, Result};

/// Converts characters to storage units and back. Leaf payloads in the serialized tree are
/// written with one of these, and must be read back with the same one.
pub trait CharCodec: Sync {
    /// Append the storage units for `c` to `out`.
    fn encode_char(&self, c: char, out: &mut Vec<u8>) -> Result<()>;

    /// Decode the character at the front of `bytes`. Returns the character and the number of
    /// units consumed, or None if the front of `bytes` is not a valid character.
    fn decode_prefix(&self, bytes: &[u8]) -> Option<(char, usize)>;
}

/// Variable width UTF-8. The leading unit tells how many continuation units follow.
#[derive(Debug, Default, Clone, Copy)]
pub struct Utf8Codec;

impl CharCodec for Utf8Codec {
    fn encode_char(&self, c: char, out: &mut Vec<u8>) -> Result<()> {
        let mut buf = [0_u8; 4];
        out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
        Ok(())
    }

    fn decode_prefix(&self, bytes: &[u8]) -> Option<(char, usize)> {
        let lead = *bytes.first()?;
        // Classify the leading unit: payload bits and total width
        let (mut value, width) = match lead {
            0x00..=0x7f => return Some((lead as char, 1)),
            0xc0..=0xdf => ((lead & 0x1f) as u32, 2),
            0xe0..=0xef => ((lead & 0x0f) as u32, 3),
            0xf0..=0xf7 => ((lead & 0x07) as u32, 4),
            _ => return None,
        };
        if bytes.len() < width {
            return None;
        }
        for &unit in &bytes[1..width] {
            if unit & 0xc0 != 0x80 {
                return None;
            }
            value = value << 6 | (unit & 0x3f) as u32;
        }
        // Reject overlong forms so every char has exactly one encoding
        let min = match width {
            2 => 0x80,
            3 => 0x800,
            _ => 0x1_0000,
        };
        if value < min {
            return None;
        }
        char::from_u32(value).map(|c| (c, width))
    }
}

/// Fixed width, one unit per char. Only U+0000..=U+00FF can be stored.
#[derive(Debug, Default, Clone, Copy)]
pub struct Latin1Codec;

impl CharCodec for Latin1Codec {
    fn encode_char(&self, c: char, out: &mut Vec<u8>) -> Result<()> {
        let value = c as u32;
        if value > 0xff {
            return Err(HcError::InvalidInput(format!(
                "character {:?} cannot be stored as Latin-1",
                c
            )));
        }
        out.push(value as u8);
        Ok(())
    }

    fn decode_prefix(&self, bytes: &[u8]) -> Option<(char, usize)> {
        bytes.first().map(|&b| (b as char, 1))
    }
}
