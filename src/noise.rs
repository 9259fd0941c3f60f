// noise.rs — Deterministic pseudo-random byte-stream generator
//
// Test and benchmark inputs for the hashing engine. Fuzzy hashing needs
// inputs with enough byte-level variety that rolling-hash triggers actually
// fire; a seeded generator keeps every run (and every platform) on
// identical bytes without pulling a PRNG crate into the build.

/// Xorshift32 generator state.
///
/// The classic 13/17/5 triple (Marsaglia). Period 2^32 − 1; a zero state
/// would be a fixed point, so seeds are nudged onto a non-zero orbit.
pub struct NoiseGen {
    state: u32,
}

impl NoiseGen {
    pub fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { 0x9E37_79B9 } else { seed },
        }
    }

    /// Next 32-bit value.
    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// Next value below `bound` (`bound` must be non-zero). Uses the
    /// high-bits multiply trick to avoid modulo bias mattering for test
    /// data.
    #[inline]
    pub fn next_below(&mut self, bound: u32) -> u32 {
        ((u64::from(self.next_u32()) * u64::from(bound)) >> 32) as u32
    }
}

/// Fill `buf` with seeded noise. Identical `(seed, buf.len())` always
/// produces identical bytes.
pub fn fill_block(buf: &mut [u8], seed: u32) {
    let mut gen = NoiseGen::new(seed);
    let mut chunks = buf.chunks_exact_mut(4);
    for chunk in &mut chunks {
        chunk.copy_from_slice(&gen.next_u32().to_le_bytes());
    }
    let tail = chunks.into_remainder();
    if !tail.is_empty() {
        let word = gen.next_u32().to_le_bytes();
        tail.copy_from_slice(&word[..tail.len()]);
    }
}

/// Allocate and fill a buffer of exactly `size` seeded-noise bytes.
pub fn gen_buffer(size: usize, seed: u32) -> Vec<u8> {
    let mut buf = vec![0u8; size];
    fill_block(&mut buf, seed);
    buf
}

/// Flip `count` pseudo-randomly chosen bytes of `buf` in place, seeded
/// separately from the data itself. Produces the "small localised edit"
/// inputs the similarity tests need.
pub fn perturb(buf: &mut [u8], seed: u32, count: usize) {
    if buf.is_empty() {
        return;
    }
    let mut gen = NoiseGen::new(seed ^ 0x5F37_59DF);
    for _ in 0..count {
        let pos = gen.next_below(buf.len() as u32) as usize;
        buf[pos] = buf[pos].wrapping_add(1 + (gen.next_u32() % 255) as u8);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_bytes() {
        assert_eq!(gen_buffer(10_000, 1), gen_buffer(10_000, 1));
    }

    #[test]
    fn different_seeds_differ() {
        assert_ne!(gen_buffer(256, 1), gen_buffer(256, 2));
    }

    #[test]
    fn zero_seed_is_usable() {
        let buf = gen_buffer(64, 0);
        assert!(buf.iter().any(|&b| b != 0));
    }

    #[test]
    fn prefix_stability() {
        // A longer buffer starts with the shorter buffer's bytes.
        let short = gen_buffer(1000, 7);
        let long = gen_buffer(4096, 7);
        assert_eq!(&long[..1000], &short[..]);
    }

    #[test]
    fn odd_lengths_fill_completely() {
        for len in [0usize, 1, 3, 5, 4097] {
            let buf = gen_buffer(len, 3);
            assert_eq!(buf.len(), len);
        }
    }

    #[test]
    fn perturb_changes_at_most_count_bytes() {
        let original = gen_buffer(8192, 9);
        let mut edited = original.clone();
        perturb(&mut edited, 42, 5);
        let changed = original
            .iter()
            .zip(edited.iter())
            .filter(|(a, b)| a != b)
            .count();
        assert!(changed >= 1 && changed <= 5, "changed {changed} bytes");
    }
}
