//! Digest finalisation: block-size selection and the canonical
//! `"blocksize:s1:s2"` text form.
//!
//! Equivalent to `fuzzy_digest` in fuzzy.c (default flags: sequence
//! elimination and truncation left to the comparison side).
//!
//! Selection picks the largest block size whose 64-character digest can
//! still span the whole input, then adjusts downward while the chosen
//! lane's digest is too thin to be representative. The second string comes
//! from the lane above the selected one — one block size up, at half
//! length — which is what lets two digests whose block sizes differ by a
//! factor of two still be compared.

use super::state::FuzzyState;
use super::types::{
    block_size, FuzzyError, B64, MAX_RESULT_LEN, MIN_INPUT_SIZE, NUM_BLOCKHASHES, SPAMSUM_LENGTH,
};

#[inline]
fn push_ascii(out: &mut String, bytes: &[u8]) {
    for &b in bytes {
        out.push(b as char);
    }
}

impl FuzzyState {
    /// Finalise and return the textual digest. Equivalent to `fuzzy_digest`.
    ///
    /// The state is not consumed: more input may be fed afterwards and the
    /// digest taken again (used by the streaming adapter's tests, and
    /// matching `fuzzy_digest`'s non-destructive contract).
    ///
    /// Fails with [`FuzzyError::InputTooSmall`] below [`MIN_INPUT_SIZE`]
    /// consumed bytes.
    pub fn digest(&self) -> Result<String, FuzzyError> {
        if self.total_size < MIN_INPUT_SIZE {
            return Err(FuzzyError::InputTooSmall(self.total_size));
        }

        let h = self.roll.sum();

        // Initial guess from the total length alone: the smallest block
        // size whose full-length digest covers the input. Inputs beyond
        // lane 30's reach saturate at the top lane instead of failing —
        // the digest merely loses resolution there.
        let mut bi = self.bh_start;
        while u64::from(block_size(bi)) * (SPAMSUM_LENGTH as u64) < self.total_size
            && bi < NUM_BLOCKHASHES - 1
        {
            bi += 1;
        }

        // Clip into the live window, then walk down while the chosen lane
        // is too thin to be representative.
        if bi >= self.bh_end {
            bi = self.bh_end - 1;
        }
        while bi > self.bh_start && self.bh[bi].dlen < SPAMSUM_LENGTH / 2 {
            bi -= 1;
        }

        let lane = &self.bh[bi];
        let mut out = String::with_capacity(MAX_RESULT_LEN);
        out.push_str(&block_size(bi).to_string());
        out.push(':');

        // First string: committed characters, then the in-progress piece as
        // a provisional tail. The tail exists whenever the rolling sum is
        // non-zero (bytes were consumed since the last trigger); at an
        // exact trigger boundary with a full lane, the pending provisional
        // character is flushed instead.
        push_ascii(&mut out, &lane.digest[..lane.dlen]);
        if h != 0 {
            out.push(B64[(lane.h % 64) as usize] as char);
        } else if lane.digest[lane.dlen] != 0 {
            out.push(lane.digest[lane.dlen] as char);
        }
        out.push(':');

        // Second string: the lane one block size up, truncated to half
        // length, closed by its half-track tail. When the selected lane is
        // the frontier itself it has never emitted, and the whole second
        // string is its single provisional character.
        if bi + 1 < self.bh_end {
            let next = &self.bh[bi + 1];
            let len = next.dlen.min(SPAMSUM_LENGTH / 2 - 1);
            push_ascii(&mut out, &next.digest[..len]);
            if h != 0 {
                out.push(B64[(next.half_h % 64) as usize] as char);
            } else if next.half_digest != 0 {
                out.push(next.half_digest as char);
            }
        } else if h != 0 {
            debug_assert_eq!(lane.dlen, 0);
            out.push(B64[(lane.h % 64) as usize] as char);
        }

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fuzzy::rolling::RollState;

    #[test]
    fn too_small_input_is_rejected() {
        let mut state = FuzzyState::new();
        state.update(&[0u8; (MIN_INPUT_SIZE - 1) as usize]);
        match state.digest() {
            Err(FuzzyError::InputTooSmall(n)) => assert_eq!(n, MIN_INPUT_SIZE - 1),
            other => panic!("expected InputTooSmall, got {other:?}"),
        }
    }

    /// Zero bytes never fire a trigger, so the minimum-size all-zero input
    /// digests to the empty-string form on the smallest block size.
    #[test]
    fn zero_filled_minimum_input() {
        let mut state = FuzzyState::new();
        state.update(&vec![0u8; MIN_INPUT_SIZE as usize]);
        assert_eq!(state.digest().unwrap(), "3::");
    }

    /// Hand-assembled very-large-input state: the length-based guess lands
    /// far above the live window and must be clipped back down, the thin
    /// frontier lane is skipped, and both provisional tails are appended.
    #[test]
    fn large_synthetic_state_digest() {
        let mut state = FuzzyState::new();
        state.total_size = 4_500_000_000;
        state.bh_end = 2;

        // Lane 0: two committed characters, running digests at 53.
        state.bh[0].digest[0] = b't';
        state.bh[0].digest[1] = b'j';
        state.bh[0].dlen = 2;
        state.bh[0].h = 53;
        state.bh[0].half_h = 53;

        // Lane 1: forked but never emitted; half track mid-piece.
        state.bh[1].dlen = 0;
        state.bh[1].h = 53;
        state.bh[1].half_h = 39;

        // Rolling window as left by a long run of 'a' bytes.
        state.roll = RollState::assembled([97; 7], 679, 2716, 2_216_757_313, 6);

        // Guess walks to lane 25, clips to bh_end-1 = 1, then steps down to
        // lane 0 because lane 1 has no committed characters. B64[53] = '1',
        // B64[39] = 'n'.
        assert_eq!(state.digest().unwrap(), "3:tj1:n");
    }

    /// digest() is non-destructive: calling it twice yields the same text.
    #[test]
    fn digest_is_repeatable() {
        let mut state = FuzzyState::new();
        let data: Vec<u8> = (0u8..=255).cycle().take(10_000).collect();
        state.update(&data);
        let a = state.digest().unwrap();
        let b = state.digest().unwrap();
        assert_eq!(a, b);
    }

    /// The emitted block size is always 3·2^i and both strings stay within
    /// their caps.
    #[test]
    fn digest_shape_on_patterned_input() {
        let mut state = FuzzyState::new();
        let data: Vec<u8> = (0..40_000u32)
            .map(|i| (i.wrapping_mul(0x9E37_79B9) >> 23) as u8)
            .collect();
        state.update(&data);
        let text = state.digest().unwrap();
        let mut parts = text.splitn(3, ':');
        let bs: u32 = parts.next().unwrap().parse().unwrap();
        let s1 = parts.next().unwrap();
        let s2 = parts.next().unwrap();
        assert!(bs % 3 == 0 && (bs / 3).is_power_of_two());
        assert!(s1.len() <= SPAMSUM_LENGTH);
        assert!(s2.len() <= SPAMSUM_LENGTH / 2);
        assert!(s1.bytes().all(|b| B64.contains(&b)));
        assert!(s2.bytes().all(|b| B64.contains(&b)));
    }
}
