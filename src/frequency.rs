//! Byte frequency counting

use std::collections::BTreeMap;

/// Count occurrences of every byte value present in `data`.
///
/// The map only holds bytes that occur at least once and iterates in byte order.
pub fn count_frequencies(data: &[u8]) -> BTreeMap<u8, u64> {
    let mut freq = [0u64; 256];
    for &b in data {
        freq[b as usize] += 1;
    }
    freq.iter()
        .enumerate()
        .filter(|&(_, &f)| f > 0)
        .map(|(i, &f)| (i as u8, f))
        .collect()
}

/// Shannon entropy of `data` in bits per byte
pub fn entropy_bits(data: &[u8]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let len = data.len() as f64;
    count_frequencies(data)
        .values()
        .map(|&f| {
            let p = f as f64 / len;
            -p * p.log2()
        })
        .sum()
}
