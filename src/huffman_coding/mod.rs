//! The huffman module builds the code for one document and stores it alongside the data.
//!
//! A document is cut into fixed length symbols, and each distinct symbol becomes a leaf.
//! The two rarest nodes are merged again and again until a single root is left. The path
//! from the root to each leaf (0 for child A, 1 for child B) is that symbol's code word.
//!
//! - huffman: the arena tree, the greedy builder and path assignment.
//! - code_table: symbol -> code word and code word -> symbol lookups.
//! - tree_codec: the compact tree description written in front of the payload.
//!
//! Trees are built fresh for every call and dropped when the call returns. Nothing is
//! cached or shared between documents.
//!

pub mod code_table;
pub mod huffman;
pub mod tree_codec;
