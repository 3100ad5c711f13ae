use std::io::{Read, Write};

use log::{debug, info};

use super::compress::Stats;
use crate::bitstream::bitreader::BitReader;
use crate::error::{HcError, Result};
use crate::huffman_coding::code_table::CodeTable;
use crate::huffman_coding::huffman::Code;
use crate::huffman_coding::tree_codec::reconstruct;
use crate::tools::char_codec::CharCodec;
use crate::tools::cli::HcOpts;

/// Decode a complete artifact back to the original text.
pub fn decode(bytes: &[u8], codec: &dyn CharCodec) -> Result<String> {
    decode_with_header(bytes, codec).map(|(text, _)| text)
}

/// Decode, also returning the block length found in the header.
fn decode_with_header(bytes: &[u8], codec: &dyn CharCodec) -> Result<(String, usize)> {
    let (header, tree, used) = reconstruct(bytes, codec)?;
    let table = CodeTable::new(&tree)?;
    debug!(
        "Rebuilt tree: block length {}, padding {}, {} symbols",
        header.block_len,
        header.padding,
        table.len()
    );

    let (&padding, payload) = bytes[used..].split_first().ok_or_else(|| {
        HcError::BitstreamUnderflow("missing padding bit count".to_string())
    })?;
    let mut br = BitReader::new(payload, padding)?;

    // Progress is reported every 10% of the payload
    let total = br.remaining();
    let step = (total / 10).max(1);
    let mut next_mark = total.saturating_sub(step);
    let mut percent = 0;

    let mut text = String::with_capacity(total / 2);
    let mut acc = Code::ROOT;
    while let Some(bit) = br.bit() {
        // Always a leaf within max_len bits of the root in a full tree
        acc = match acc.child(bit) {
            Some(next) if next.len <= table.max_len() => next,
            _ => {
                return Err(HcError::CorruptTree(format!(
                    "no code word matches the bits before {}",
                    br.loc()
                )))
            }
        };
        if let Some(sym) = table.symbol(&acc) {
            text.push_str(sym);
            acc = Code::ROOT;
        }
        if br.remaining() <= next_mark && next_mark > 0 {
            percent += 10;
            debug!("{}% done", percent);
            next_mark = next_mark.saturating_sub(step);
        }
    }

    if acc.len > 0 {
        return Err(HcError::BitstreamUnderflow(format!(
            "payload ends {} bits into a code word",
            acc.len
        )));
    }
    if text.is_empty() {
        return Err(HcError::BitstreamUnderflow(
            "payload holds no symbols".to_string(),
        ));
    }

    // Trim the filler from the last block
    for _ in 0..header.padding {
        text.pop();
    }
    debug!("100% done");
    Ok((text, header.block_len))
}

/// Read a whole artifact from `source`, decode it and write the text to `sink`. Nothing is
/// written unless decoding succeeds.
pub fn decompress<R: Read, W: Write>(mut source: R, mut sink: W, opts: &HcOpts) -> Result<Stats> {
    let mut bytes = Vec::new();
    source.read_to_end(&mut bytes)?;

    info!("Decoding binary...");
    let (text, block_len) = decode_with_header(&bytes, opts.codec.char_codec())?;
    sink.write_all(text.as_bytes())?;
    sink.flush()?;

    Ok(Stats {
        input_bytes: bytes.len(),
        output_bytes: text.len(),
        block_len,
    })
}

/// Compare the original input with what came back out of decoding. Reports the first byte
/// that differs, or the length of the shorter one if one is a prefix of the other.
pub fn verify(original: &[u8], decoded: &[u8]) -> Result<()> {
    let position = original
        .iter()
        .zip(decoded)
        .position(|(a, b)| a != b)
        .or_else(|| (original.len() != decoded.len()).then(|| original.len().min(decoded.len())));
    match position {
        Some(position) => Err(HcError::RoundTripMismatch { position }),
        None => Ok(()),
    }
}
