use log::{debug, info};
use rayon::prelude::*;

use crate::error::{HcError, Result};
use crate::huffman_coding::code_table::CodeTable;
use crate::huffman_coding::huffman::build_tree;
use crate::huffman_coding::tree_codec::{serialize, TreeHeader};
use crate::tools::char_codec::CharCodec;
use crate::tools::freq_count::freqs;
use crate::tools::segment::segment;

/// Predicted output size for one block length.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Estimate {
    pub block_len: usize,
    /// Payload bits rounded up to whole bytes.
    pub payload_bytes: u64,
    /// Header plus tree description.
    pub tree_bytes: u64,
}

impl Estimate {
    pub fn total(&self) -> u64 {
        self.payload_bytes + self.tree_bytes
    }
}

/// Build the tree for `block_len` and size it, without packing any payload. The padding
/// bit count byte is left out; it is the same for every block length.
pub fn estimate(text: &str, block_len: usize, codec: &dyn CharCodec) -> Result<Estimate> {
    let seg = segment(text, block_len)?;
    let f = freqs(&seg.symbols);
    let tree = build_tree(&f)?;
    let table = CodeTable::new(&tree)?;

    let bits = table.encoded_bits(&f)?;
    let mut stored = Vec::new();
    serialize(
        &tree,
        &TreeHeader {
            block_len,
            padding: seg.padding,
        },
        codec,
        &mut stored,
    )?;

    Ok(Estimate {
        block_len,
        payload_bytes: (bits + 7) / 8,
        tree_bytes: stored.len() as u64,
    })
}

/// Try every candidate block length and return the smallest estimate. Ties go to the
/// shorter block length. Candidates that cannot form a code are skipped.
pub fn best_block_len(text: &str, candidates: &[usize], codec: &dyn CharCodec) -> Result<Estimate> {
    if candidates.is_empty() {
        return Err(HcError::InvalidInput(
            "no candidate block lengths".to_string(),
        ));
    }

    let estimates: Vec<Result<Estimate>> = candidates
        .par_iter()
        .map(|&block_len| estimate(text, block_len, codec))
        .collect();

    let mut last_err = None;
    let mut best: Option<Estimate> = None;
    for (block_len, result) in candidates.iter().zip(estimates) {
        match result {
            Ok(est) => {
                debug!(
                    "Block length {}: payload {} bytes, tree {} bytes, total {}",
                    block_len,
                    est.payload_bytes,
                    est.tree_bytes,
                    est.total()
                );
                if best.map_or(true, |b| (est.total(), est.block_len) < (b.total(), b.block_len)) {
                    best = Some(est);
                }
            }
            Err(e) => {
                debug!("Block length {} skipped: {}", block_len, e);
                last_err = Some(e);
            }
        }
    }

    match best {
        Some(est) => {
            info!(
                "Chose block length {} (estimated {} bytes)",
                est.block_len,
                est.total()
            );
            Ok(est)
        }
        None => Err(last_err.unwrap_or_else(|| {
            HcError::InvalidInput("no usable block length".to_string())
        })),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::compression::compress::encode;
    use crate::tools::char_codec::Utf8Codec;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn repeated_pairs_prefer_four_test() {
        let text = "ab".repeat(2000) + &"cd".repeat(2000);
        let est: Vec<u64> = (1..=4)
            .map(|l| estimate(&text, l, &Utf8Codec).unwrap().total())
            .collect();
        // Block length 4 is strictly best
        assert!(est[3] < est[0] && est[3] < est[1] && est[3] < est[2]);
        assert_eq!(
            best_block_len(&text, &[1, 2, 3, 4], &Utf8Codec).unwrap().block_len,
            4
        );
    }

    #[test]
    fn random_letters_prefer_one_test() {
        let mut rng = StdRng::seed_from_u64(42);
        let text: String = (0..2000)
            .map(|_| (b'a' + rng.random_range(0..26)) as char)
            .collect();
        assert_eq!(
            best_block_len(&text, &[1, 2, 3, 4], &Utf8Codec).unwrap().block_len,
            1
        );
    }

    #[test]
    fn estimate_tracks_real_size_test() {
        let text = "It was the best of times, it was the worst of times.";
        for block_len in 1..=4 {
            let est = estimate(text, block_len, &Utf8Codec).unwrap();
            let real = encode(text, block_len, &Utf8Codec).unwrap();
            // The estimate only leaves out the padding bit count byte
            assert_eq!(est.total() + 1, real.len() as u64);
        }
    }

    #[test]
    fn tie_goes_to_shorter_test() {
        // 48 a's then 48 b's: lengths 2 and 3 both come to 14 bytes
        let text = "a".repeat(48) + &"b".repeat(48);
        let two = estimate(&text, 2, &Utf8Codec).unwrap();
        let three = estimate(&text, 3, &Utf8Codec).unwrap();
        assert_eq!(two.total(), 14);
        assert_eq!(three.total(), 14);
        let est = best_block_len(&text, &[3, 4, 2], &Utf8Codec).unwrap();
        assert_eq!(est.block_len, 2);
    }

    #[test]
    fn unusable_candidates_test() {
        // "abab" in blocks of 2 or 4 has a single symbol
        let est = best_block_len("abab", &[2, 4, 1], &Utf8Codec).unwrap();
        assert_eq!(est.block_len, 1);
        assert!(matches!(
            best_block_len("abab", &[2, 4], &Utf8Codec),
            Err(HcError::InvalidInput(_))
        ));
        assert!(matches!(
            best_block_len("abab", &[], &Utf8Codec),
            Err(HcError::InvalidInput(_))
        ));
    }
}
