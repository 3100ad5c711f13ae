//! Stores the shape and leaf symbols of a tree in front of the compressed payload.
//!
//! Layout, after a two byte header of block length and padding count:
//! for every internal node in preorder, one entry per kid (A then B), where an entry is
//! either `'0'` followed by that kid's own entries, or `'1'` followed by the kid's symbol
//! as exactly `block_len` characters in the chosen character codec.
//!
//! Weights are not stored, and neither are paths. Paths come back from the shape alone.

use super::huffman::{HuffmanTree, Node, NodeData, MAX_DEPTH};
use crate::error::{HcError, Result};
use crate::tools::char_codec::CharCodec;
use crate::tools::segment::check_block_len;

const INTERNAL: u8 = b'0';
const LEAF: u8 = b'1';

/// Segmentation parameters the decoder needs before it can read any leaf.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TreeHeader {
    pub block_len: usize,
    pub padding: usize,
}

/// Append the header and tree description to `out`.
pub fn serialize(
    tree: &HuffmanTree,
    header: &TreeHeader,
    codec: &dyn CharCodec,
    out: &mut Vec<u8>,
) -> Result<()> {
    check_block_len(header.block_len)?;
    if header.padding >= header.block_len {
        return Err(HcError::InvalidInput(format!(
            "padding {} must be less than block length {}",
            header.padding, header.block_len
        )));
    }
    out.push(header.block_len as u8);
    out.push(header.padding as u8);

    let NodeData::Kids(..) = tree.nodes()[tree.root()].node_data else {
        return Err(HcError::InvalidInput("tree root is a leaf".to_string()));
    };
    write_kids(tree, tree.root(), header.block_len, codec, out)
}

fn write_kids(
    tree: &HuffmanTree,
    idx: usize,
    block_len: usize,
    codec: &dyn CharCodec,
    out: &mut Vec<u8>,
) -> Result<()> {
    let NodeData::Kids(a, b) = tree.nodes()[idx].node_data else {
        return Ok(());
    };
    for kid in [a, b] {
        match &tree.nodes()[kid].node_data {
            NodeData::Kids(..) => {
                out.push(INTERNAL);
                write_kids(tree, kid, block_len, codec, out)?;
            }
            NodeData::Leaf(sym) => {
                if sym.chars().count() != block_len {
                    return Err(HcError::InvalidInput(format!(
                        "symbol {:?} is not {} characters long",
                        sym, block_len
                    )));
                }
                out.push(LEAF);
                for c in sym.chars() {
                    codec.encode_char(c, out)?;
                }
            }
        }
    }
    Ok(())
}

/// Rebuild a tree from the front of `bytes`. Returns the header, the tree with fresh paths,
/// and how many bytes were consumed.
pub fn reconstruct(bytes: &[u8], codec: &dyn CharCodec) -> Result<(TreeHeader, HuffmanTree, usize)> {
    let (block_len, padding) = match bytes {
        [b, p, ..] => (*b as usize, *p as usize),
        _ => return Err(HcError::CorruptTree("header is truncated".to_string())),
    };
    if block_len == 0 || padding >= block_len {
        return Err(HcError::CorruptTree(format!(
            "bad header: block length {}, padding {}",
            block_len, padding
        )));
    }

    let mut reader = TreeReader {
        bytes,
        pos: 2,
        block_len,
        codec,
        nodes: Vec::new(),
    };
    let root = reader.read_kids(0)?;
    let used = reader.pos;
    let tree = HuffmanTree::new(reader.nodes, root)?;

    Ok((TreeHeader { block_len, padding }, tree, used))
}

struct TreeReader<'a> {
    bytes: &'a [u8],
    pos: usize,
    block_len: usize,
    codec: &'a dyn CharCodec,
    nodes: Vec<Node>,
}

impl TreeReader<'_> {
    /// Read both kid entries of an internal node at `depth` and push that node.
    fn read_kids(&mut self, depth: u8) -> Result<usize> {
        if depth >= MAX_DEPTH {
            return Err(HcError::CorruptTree(format!(
                "tree is deeper than {} levels",
                MAX_DEPTH
            )));
        }
        let a = self.read_entry(depth)?;
        let b = self.read_entry(depth)?;
        self.nodes.push(Node::new(None, NodeData::Kids(a, b)));
        Ok(self.nodes.len() - 1)
    }

    fn read_entry(&mut self, depth: u8) -> Result<usize> {
        let flag = *self.bytes.get(self.pos).ok_or_else(|| {
            HcError::CorruptTree(format!("tree ends early at byte {}", self.pos))
        })?;
        self.pos += 1;
        match flag {
            INTERNAL => self.read_kids(depth + 1),
            LEAF => self.read_leaf(),
            other => Err(HcError::CorruptTree(format!(
                "unknown flag {:#04x} at byte {}",
                other,
                self.pos - 1
            ))),
        }
    }

    /// Consume exactly block_len characters, however many bytes each takes.
    fn read_leaf(&mut self) -> Result<usize> {
        let mut sym = String::with_capacity(self.block_len);
        for _ in 0..self.block_len {
            let (c, used) = self
                .codec
                .decode_prefix(&self.bytes[self.pos..])
                .ok_or_else(|| {
                    HcError::CorruptTree(format!("undecodable leaf character at byte {}", self.pos))
                })?;
            sym.push(c);
            self.pos += used;
        }
        self.nodes.push(Node::new(None, NodeData::Leaf(sym)));
        Ok(self.nodes.len() - 1)
    }
}
