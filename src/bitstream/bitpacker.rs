use log::error;

use crate::huffman_coding::huffman::Code;

/// Packs variable length code words into bytes, most significant bit first.
pub struct BitPacker {
    pub output: Vec<u8>,
    queue: u64,
    q_bits: u8,
}

impl BitPacker {
    /// Create a new BitPacker with an output buffer of size specified. Call flush() to
    /// push the last partial byte out and learn how many padding bits it got.
    pub fn new(size: usize) -> Self {
        Self {
            output: Vec::with_capacity(size),
            queue: 0,
            q_bits: 0,
        }
    }

    /// Internal bitstream write function common to all out functions.
    fn write_stream(&mut self) {
        while self.q_bits > 7 {
            let byte = (self.queue >> (self.q_bits - 8)) as u8;
            self.output.push(byte); //push the packed byte out
            self.q_bits -= 8; //adjust the count of bits left in the queue
        }
    }

    /// Writes the low `len` bits of `bits` (0-64), most significant first.
    pub fn out_bits(&mut self, bits: u64, len: u8) {
        let mut left = len.min(64);
        // Feed at most 32 bits at a time so the queue never overflows
        while left > 0 {
            let take = left.min(32);
            left -= take;
            let chunk = (bits >> left) & ((1_u64 << take) - 1);
            self.queue = self.queue << take | chunk;
            self.q_bits += take;
            self.write_stream();
        }
    }

    /// Writes one code word.
    pub fn out_code(&mut self, code: Code) {
        self.out_bits(code.bits, code.len);
    }

    /// Writes a single bit.
    pub fn out_bit(&mut self, bit: bool) {
        self.out_bits(bit as u64, 1);
    }

    /// Flushes the remaining bits (1-7) from the queue, padding with 0s in the least
    /// significant bits. Returns the number of padding bits added (0-7).
    pub fn flush(&mut self) -> u8 {
        let mut padding = 0;
        if self.q_bits > 0 {
            padding = 8 - self.q_bits;
            self.queue <<= padding; //pad the queue with zeros
            self.q_bits += padding;
            self.write_stream(); // write out all that is left
            if self.q_bits > 0 {
                error!("Stuff left in the BitPacker queue.");
            }
        }
        padding
    }

    /// Debugging function to return the number of bytes.bits output so far
    pub fn loc(&self) -> String {
        format! {"[{}.{}]",((self.output.len() * 8) + self.q_bits as usize)/8, ((self.output.len() * 8) + self.q_bits as usize)%8}
    }
}

/// Pack a run of code words. Returns the padding bit count and the bytes.
pub fn pack<I: IntoIterator<Item = Code>>(codes: I) -> (u8, Vec<u8>) {
    let mut bp = BitPacker::new(1024);
    codes.into_iter().for_each(|code| bp.out_code(code));
    let padding = bp.flush();
    (padding, bp.output)
}
