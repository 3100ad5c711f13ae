use crate::error::{HcError, Result};

/// Appended to the last block when the text does not divide evenly. It is stripped by
/// count on decode, so a NUL in the real text is harmless.
pub const FILLER: char = '\u{0}';

/// Largest block length the header can hold.
pub const MAX_BLOCK_LEN: usize = u8::MAX as usize;

/// Text cut into symbols of exactly `block_len` characters each.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segments {
    pub block_len: usize,
    pub symbols: Vec<String>,
    /// Filler characters appended to the last symbol (0..block_len).
    pub padding: usize,
}

/// Split `text` into contiguous blocks of `block_len` characters, right padding the last
/// block with FILLER.
pub fn segment(text: &str, block_len: usize) -> Result<Segments> {
    check_block_len(block_len)?;
    if text.is_empty() {
        return Err(HcError::InvalidInput("text is empty".to_string()));
    }

    let mut symbols = Vec::with_capacity(text.len() / block_len + 1);
    let mut current = String::with_capacity(block_len * 4);
    let mut count = 0;
    for c in text.chars() {
        current.push(c);
        count += 1;
        if count == block_len {
            symbols.push(std::mem::take(&mut current));
            count = 0;
        }
    }

    let mut padding = 0;
    if count > 0 {
        padding = block_len - count;
        current.extend(std::iter::repeat(FILLER).take(padding));
        symbols.push(current);
    }

    Ok(Segments {
        block_len,
        symbols,
        padding,
    })
}

/// Concatenate symbols and drop the last `padding` characters.
pub fn join(symbols: &[String], padding: usize) -> String {
    let mut text: String = symbols.concat();
    for _ in 0..padding {
        text.pop();
    }
    text
}

pub fn check_block_len(block_len: usize) -> Result<()> {
    if !(1..=MAX_BLOCK_LEN).contains(&block_len) {
        return Err(HcError::InvalidInput(format!(
            "block length {} is outside 1..={}",
            block_len, MAX_BLOCK_LEN
        )));
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn even_split_test() {
        let seg = segment("abcdef", 2).unwrap();
        assert_eq!(seg.symbols, vec!["ab", "cd", "ef"]);
        assert_eq!(seg.padding, 0);
    }

    #[test]
    fn padded_split_test() {
        let seg = segment("abcdefg", 3).unwrap();
        assert_eq!(seg.symbols.len(), 3);
        assert_eq!(seg.padding, 2);
        assert_eq!(seg.symbols[2], "g\u{0}\u{0}");
        assert_eq!(join(&seg.symbols, seg.padding), "abcdefg");
    }

    #[test]
    fn multibyte_chars_test() {
        let text = "añb€c";
        let seg = segment(text, 2).unwrap();
        assert_eq!(seg.symbols, vec!["añ", "b€", "c\u{0}"]);
        assert_eq!(seg.padding, 1);
        assert_eq!(join(&seg.symbols, seg.padding), text);
    }

    #[test]
    fn padding_count_test() {
        let text = "the quick brown fox";
        for len in 1..=8 {
            let seg = segment(text, len).unwrap();
            let rem = text.chars().count() % len;
            let expected = if rem == 0 { 0 } else { len - rem };
            assert_eq!(seg.padding, expected);
            assert_eq!(join(&seg.symbols, seg.padding), text);
        }
    }

    #[test]
    fn text_ending_in_filler_test() {
        let text = "ab\u{0}";
        let seg = segment(text, 2).unwrap();
        assert_eq!(join(&seg.symbols, seg.padding), text);
    }

    #[test]
    fn bad_input_test() {
        assert!(matches!(segment("", 1), Err(HcError::InvalidInput(_))));
        assert!(matches!(segment("abc", 0), Err(HcError::InvalidInput(_))));
        assert!(matches!(segment("abc", 256), Err(HcError::InvalidInput(_))));
    }
}
