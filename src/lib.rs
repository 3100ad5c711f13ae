//! Block Huffman text compressor.
//!
//! Version 0.1.0
//!
//! Converts text into a prefix-free bit encoding and back. The text is cut into symbols of
//! a fixed number of characters (the block length), a Huffman code is built from how often
//! each symbol occurs, and the code's tree is stored in front of the packed bits so the
//! file can be decoded on its own.
//!
//! The block length is chosen per file. By default block lengths 1-4 are each sized up
//! and the smallest wins.
//!
//! Basic usage to compress a file is as follows:
//!
//! `$> blockhuff -z book.txt`
//!
//! This will compress the file and create the file book.txt.hc.
//! `blockhuff -d book.txt.hc` restores book.txt.
//!
//! From code:
//!
//! ```
//! use blockhuff::{decode, encode, Utf8Codec};
//!
//! let packed = encode("abracadabra", 1, &Utf8Codec).unwrap();
//! assert_eq!(decode(&packed, &Utf8Codec).unwrap(), "abracadabra");
//! ```
//!
pub mod bitstream;
pub mod compression;
pub mod error;
pub mod huffman_coding;
pub mod tools;

pub use compression::compress::{compress, encode, Stats};
pub use compression::decompress::{decode, decompress, verify};
pub use compression::optimize::{best_block_len, estimate, Estimate};
pub use error::{HcError, Result};
pub use tools::char_codec::{CharCodec, Latin1Codec, Utf8Codec};
pub use tools::cli::HcOpts;
