use rustc_hash::FxHashMap;

/// Returns a frequency count of each distinct symbol. No ordering is implied.
pub fn freqs(symbols: &[String]) -> FxHashMap<&str, u64> {
    let mut freqs = FxHashMap::default();
    symbols
        .iter()
        .for_each(|sym| *freqs.entry(sym.as_str()).or_insert(0) += 1);
    freqs
}
