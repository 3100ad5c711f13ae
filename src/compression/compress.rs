use std::io::{Read, Write};

use log::{debug, info, trace};

use super::optimize::best_block_len;
use crate::bitstream::bitpacker::BitPacker;
use crate::error::{HcError, Result};
use crate::huffman_coding::code_table::CodeTable;
use crate::huffman_coding::huffman::build_tree;
use crate::huffman_coding::tree_codec::{serialize, TreeHeader};
use crate::tools::char_codec::CharCodec;
use crate::tools::cli::HcOpts;
use crate::tools::freq_count::freqs;
use crate::tools::segment::segment;

/// Sizes reported after a file has been processed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Stats {
    /// Length of the plain text in bytes.
    pub input_bytes: usize,
    /// Length of the compressed artifact in bytes.
    pub output_bytes: usize,
    pub block_len: usize,
}

impl Stats {
    /// Compressed size over original size.
    pub fn ratio(&self) -> f64 {
        if self.input_bytes == 0 {
            return 0.0;
        }
        self.output_bytes as f64 / self.input_bytes as f64
    }
}

/// Encode `text` with symbols of `block_len` characters. Returns the complete artifact:
/// header and tree, then the padding bit count, then the packed payload.
pub fn encode(text: &str, block_len: usize, codec: &dyn CharCodec) -> Result<Vec<u8>> {
    let seg = segment(text, block_len)?;
    let f = freqs(&seg.symbols);
    let tree = build_tree(&f)?;
    let table = CodeTable::new(&tree)?;
    debug!(
        "{} symbols, {} distinct, longest code {} bits",
        seg.symbols.len(),
        table.len(),
        table.max_len()
    );

    let mut out = Vec::with_capacity(text.len() / 2);
    serialize(
        &tree,
        &TreeHeader {
            block_len,
            padding: seg.padding,
        },
        codec,
        &mut out,
    )?;
    trace!("Tree written, {} bytes", out.len());

    let mut bp = BitPacker::new(text.len() / 2);
    for sym in &seg.symbols {
        let code = table.code(sym).ok_or_else(|| {
            HcError::InvalidInput(format!("symbol {:?} is not in the code table", sym))
        })?;
        bp.out_code(code);
    }
    let padding = bp.flush();
    trace!("Payload packed to {}, {} padding bits", bp.loc(), padding);

    out.push(padding);
    out.extend_from_slice(&bp.output);
    Ok(out)
}

/// Pick the block length the options ask for: a fixed size, 1 in quick mode, or the best
/// of the candidates.
pub fn choose_block_len(text: &str, opts: &HcOpts) -> Result<usize> {
    match opts.block_size {
        Some(block_len) => Ok(block_len),
        None if opts.quick => Ok(1),
        None => Ok(best_block_len(text, &opts.candidates, opts.codec.char_codec())?.block_len),
    }
}

/// Read all of `source`, compress it and write the artifact to `sink`. Nothing is written
/// unless encoding succeeds.
pub fn compress<R: Read, W: Write>(mut source: R, mut sink: W, opts: &HcOpts) -> Result<Stats> {
    let mut raw = Vec::new();
    source.read_to_end(&mut raw)?;
    let text = String::from_utf8(raw)
        .map_err(|e| HcError::InvalidInput(format!("input is not UTF-8 text: {}", e)))?;

    let block_len = choose_block_len(&text, opts)?;
    info!("Generating binary tree with block length {}", block_len);
    let encoded = encode(&text, block_len, opts.codec.char_codec())?;

    sink.write_all(&encoded)?;
    sink.flush()?;

    let stats = Stats {
        input_bytes: text.len(),
        output_bytes: encoded.len(),
        block_len,
    };
    info!(
        "Original size: {}, encoded size: {}, ratio: {:.4}",
        stats.input_bytes,
        stats.output_bytes,
        stats.ratio()
    );
    Ok(stats)
}
