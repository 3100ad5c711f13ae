//! The tools module provides the helper functions around the Huffman core of blockhuff.
//!
//! The tools are:
//! - char_codec: Converts leaf characters to bytes and back (UTF-8 or Latin-1).
//! - cli: Command line interface and options for blockhuff.
//! - freq_count: Frequency count of symbols.
//! - segment: Cuts text into fixed length symbols and puts it back together.
//!
pub mod char_codec;
pub mod cli;
pub mod freq_count;
pub mod segment;
