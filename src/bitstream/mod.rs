//! The bitstream module forms the bit level I/O of blockhuff.
//!
//! BitPacker concatenates variable length code words and cuts them into bytes, padding the
//! last byte with zero bits and reporting how many it added. BitReader walks those bytes
//! back out as bits and stops before the padding.
//!
//! Neither side does any buffering beyond one in-memory payload. The compressed file is
//! small enough to hold whole, and the pipelines never stream it.
//!
pub mod bitpacker;
pub mod bitreader;
