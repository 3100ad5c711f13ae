//! The compression module runs the blockhuff pipelines.
//!
//! Compression happens in the following steps:
//! - Segment: Cut the text into symbols of block_len characters, padding the last one.
//! - Count: Tally how often each distinct symbol occurs.
//! - Build: Merge the rarest nodes into a Huffman tree and read off each leaf's path.
//! - Store: Write block length, padding count and the tree shape with its leaf symbols.
//! - Pack: Replace every symbol by its code word and cut the bits into bytes.
//!
//! Unless a block length is forced, optimize first tries each candidate length and keeps
//! the one with the smallest estimated output.
//!
//! Decompression follows the inverse of the compression process.
//! - Rebuild the tree from its stored shape and recompute the paths.
//! - Unpack the payload bits, dropping the padding in the last byte.
//! - Feed bits one at a time until they spell a code word, emit that symbol, and repeat.
//! - Drop the filler characters from the end.
//!

pub mod compress;
pub mod decompress;
pub mod optimize;
