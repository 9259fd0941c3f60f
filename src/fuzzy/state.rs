//! Streaming CTPH engine state: the block-hash lanes and the per-byte
//! state machine that drives them.
//!
//! Corresponds to `struct blockhash_context` / `struct fuzzy_state` and the
//! `fuzzy_new` / `fuzzy_update` / `fuzzy_engine_step` family in fuzzy.c.
//!
//! The engine runs up to [`NUM_BLOCKHASHES`] lanes, one per candidate block
//! size, but only the `[bh_start, bh_end)` window is live at any moment:
//! lanes above the frontier are forked lazily the first time the lane below
//! them emits, and the lowest lane is retired once the final block-size
//! selection can provably no longer choose it. Steady-state work per input
//! byte is therefore O(log total_size), not O(31).

use std::io;

use super::rolling::RollState;
use super::types::{block_size, sum_hash, B64, HASH_INIT, NUM_BLOCKHASHES, SPAMSUM_LENGTH};

// ─────────────────────────────────────────────────────────────────────────────
// Per-lane accumulator (fuzzy.c: struct blockhash_context)
// ─────────────────────────────────────────────────────────────────────────────

/// One block-size lane: the emitted digest characters plus two running
/// digests sharing the lane's trigger.
///
/// `digest[..dlen]` holds the committed characters; `digest[dlen]` holds a
/// provisional character once the lane is full (the running digest stops
/// resetting there, so the last cell keeps summarising the combined tail).
/// The half track mirrors the full track but stops resetting after 32
/// committed characters — its provisional character `half_digest` is the
/// one-character summary of everything past the half-length cap.
#[derive(Clone, Copy)]
pub(crate) struct BlockHash {
    pub(crate) digest: [u8; SPAMSUM_LENGTH],
    pub(crate) dlen: usize,
    pub(crate) half_digest: u8,
    pub(crate) h: u32,
    pub(crate) half_h: u32,
}

impl BlockHash {
    const EMPTY: Self = Self {
        digest: [0; SPAMSUM_LENGTH],
        dlen: 0,
        half_digest: 0,
        h: 0,
        half_h: 0,
    };
}

// ─────────────────────────────────────────────────────────────────────────────
// Engine state (fuzzy.c: struct fuzzy_state)
// ─────────────────────────────────────────────────────────────────────────────

/// Streaming fuzzy-hash state.
///
/// Equivalent to `fuzzy_state`; construct with [`FuzzyState::new`]
/// (`fuzzy_new`), feed bytes with [`FuzzyState::update`] (`fuzzy_update`)
/// or through the [`io::Write`] impl, and finalise with
/// [`FuzzyState::digest`](crate::fuzzy::FuzzyState::digest) (`fuzzy_digest`).
///
/// The state is self-contained and fixed-size: no allocation happens on
/// the per-byte path, dropping it releases everything, and independent
/// states may be driven from different threads without any shared state.
pub struct FuzzyState {
    pub(crate) bh: [BlockHash; NUM_BLOCKHASHES],
    pub(crate) bh_start: usize,
    pub(crate) bh_end: usize,
    pub(crate) total_size: u64,
    pub(crate) roll: RollState,
}

impl Default for FuzzyState {
    fn default() -> Self {
        Self::new()
    }
}

impl FuzzyState {
    /// Fresh state: only the smallest-block-size lane is live, seeded with
    /// [`HASH_INIT`]. Equivalent to `fuzzy_new`.
    pub fn new() -> Self {
        let mut bh = [BlockHash::EMPTY; NUM_BLOCKHASHES];
        bh[0].h = HASH_INIT;
        bh[0].half_h = HASH_INIT;
        Self {
            bh,
            bh_start: 0,
            bh_end: 1,
            total_size: 0,
            roll: RollState::new(),
        }
    }

    /// Total number of bytes consumed so far.
    pub fn total_size(&self) -> u64 {
        self.total_size
    }

    /// Feed a chunk of input. Equivalent to `fuzzy_update`.
    ///
    /// The final digest is a pure function of the concatenated byte
    /// sequence — re-chunking the same bytes cannot change it.
    pub fn update(&mut self, buf: &[u8]) {
        self.total_size += buf.len() as u64;
        for &c in buf {
            self.engine_step(c);
        }
    }

    /// Advance every live lane by one byte and handle any triggers.
    /// Equivalent to `fuzzy_engine_step`.
    fn engine_step(&mut self, c: u8) {
        self.roll.hash(c);
        let h = self.roll.sum();

        for i in self.bh_start..self.bh_end {
            self.bh[i].h = sum_hash(c, self.bh[i].h);
            self.bh[i].half_h = sum_hash(c, self.bh[i].half_h);
        }

        // A fork extends bh_end mid-loop and the new lane must still be
        // examined for this same byte, so the bound is re-read each pass.
        let mut i = self.bh_start;
        while i < self.bh_end {
            let bs = block_size(i);
            if h % bs != bs - 1 {
                // h ≡ -1 (mod 2·bs) implies h ≡ -1 (mod bs): once one lane
                // misses the trigger, every larger lane misses it too.
                break;
            }
            if self.bh[i].dlen == 0 {
                // First emission for this block size — warm-start the lane
                // above the frontier. Can happen at most 30 times.
                self.fork_lane();
            }
            let lane = &mut self.bh[i];
            lane.digest[lane.dlen] = B64[(lane.h % 64) as usize];
            lane.half_digest = B64[(lane.half_h % 64) as usize];
            if lane.dlen < SPAMSUM_LENGTH - 1 {
                // Room left: commit the character and restart the piece.
                lane.dlen += 1;
                lane.digest[lane.dlen] = 0;
                lane.h = HASH_INIT;
                if lane.dlen < SPAMSUM_LENGTH / 2 {
                    lane.half_h = HASH_INIT;
                    lane.half_digest = 0;
                }
            } else {
                // Lane full: the last cell stays provisional and the running
                // digest keeps absorbing, folding the remaining pieces into
                // one character. A full lane is also the signal to try
                // retiring the lowest one.
                self.retire_lane();
            }
            i += 1;
        }
    }

    /// Bring the lane above the frontier to life, seeded with the frontier
    /// lane's running digests. Equivalent to `fuzzy_try_fork_blockhash`.
    fn fork_lane(&mut self) {
        if self.bh_end >= NUM_BLOCKHASHES {
            return;
        }
        debug_assert!(self.bh_end > 0);
        let (h, half_h) = {
            let frontier = &self.bh[self.bh_end - 1];
            (frontier.h, frontier.half_h)
        };
        let lane = &mut self.bh[self.bh_end];
        lane.h = h;
        lane.half_h = half_h;
        lane.dlen = 0;
        lane.digest[0] = 0;
        lane.half_digest = 0;
        self.bh_end += 1;
    }

    /// Drop the lowest live lane once block-size selection can provably no
    /// longer pick it: the length-based initial guess already lies above it
    /// (`block_size(bh_start) · 64 < total_size`) and the downward
    /// adjustment stops at the lane above (its digest is at least
    /// half-full). Equivalent to `fuzzy_try_reduce_blockhash`.
    fn retire_lane(&mut self) {
        debug_assert!(self.bh_start < self.bh_end);
        if self.bh_end - self.bh_start < 2 {
            return;
        }
        if u64::from(block_size(self.bh_start)) * SPAMSUM_LENGTH as u64 >= self.total_size {
            return;
        }
        if self.bh[self.bh_start + 1].dlen < SPAMSUM_LENGTH / 2 {
            return;
        }
        self.bh_start += 1;
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Streaming sink
// ─────────────────────────────────────────────────────────────────────────────

/// Write-sink adapter: any byte producer that can drive an [`io::Write`] can
/// feed the engine. The sink accepts every byte it is offered and cannot
/// fail; `flush` is a no-op because nothing is buffered.
impl io::Write for FuzzyState {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Unit tests (require field access)
// ─────────────────────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::fuzzy::types::MIN_INPUT_SIZE;

    #[test]
    fn fresh_state_has_one_live_lane() {
        let state = FuzzyState::new();
        assert_eq!(state.bh_start, 0);
        assert_eq!(state.bh_end, 1);
        assert_eq!(state.total_size, 0);
        assert_eq!(state.bh[0].h, HASH_INIT);
        assert_eq!(state.bh[0].half_h, HASH_INIT);
    }

    #[test]
    fn update_counts_every_byte() {
        let mut state = FuzzyState::new();
        state.update(&[0u8; 100]);
        state.update(b"xyz");
        assert_eq!(state.total_size(), 103);
    }

    /// All-zero input keeps the rolling sum at zero, so no trigger ever
    /// fires: no lane emits, no lane forks.
    #[test]
    fn zero_input_never_triggers() {
        let mut state = FuzzyState::new();
        state.update(&vec![0u8; 8192]);
        assert_eq!(state.bh_end, 1);
        assert_eq!(state.bh[0].dlen, 0);
    }

    /// Non-degenerate input must fork lanes beyond the first and emit into
    /// the lowest lane.
    #[test]
    fn varied_input_forks_and_emits() {
        let mut state = FuzzyState::new();
        let data: Vec<u8> = (0u8..=255).cycle().take(16 * 1024).collect();
        state.update(&data);
        assert!(state.bh_end > 1, "frontier never advanced");
        assert!(state.bh[state.bh_start].dlen > 0, "lowest lane never emitted");
        for i in state.bh_start..state.bh_end {
            assert!(state.bh[i].dlen <= SPAMSUM_LENGTH);
        }
    }

    /// The committed length of any lane can never exceed 63: the 64th cell
    /// only ever holds the provisional character.
    #[test]
    fn dlen_capped_below_spamsum_length() {
        let mut state = FuzzyState::new();
        let data: Vec<u8> = (0..64 * 1024u32).map(|i| (i.wrapping_mul(2654435761) >> 24) as u8).collect();
        state.update(&data);
        for i in 0..state.bh_end {
            assert!(state.bh[i].dlen < SPAMSUM_LENGTH);
        }
    }

    /// A forked lane starts from the frontier lane's running digests.
    #[test]
    fn fork_copies_running_digests() {
        let mut state = FuzzyState::new();
        state.bh[0].h = 0xDEAD_BEEF;
        state.bh[0].half_h = 0x1234_5678;
        state.fork_lane();
        assert_eq!(state.bh_end, 2);
        assert_eq!(state.bh[1].h, 0xDEAD_BEEF);
        assert_eq!(state.bh[1].half_h, 0x1234_5678);
        assert_eq!(state.bh[1].dlen, 0);
    }

    #[test]
    fn fork_saturates_at_lane_limit() {
        let mut state = FuzzyState::new();
        for _ in 0..NUM_BLOCKHASHES + 5 {
            state.fork_lane();
        }
        assert_eq!(state.bh_end, NUM_BLOCKHASHES);
    }

    /// Retirement needs all three conditions; with a short total size the
    /// length guard must hold it back.
    #[test]
    fn retire_blocked_by_small_total_size() {
        let mut state = FuzzyState::new();
        state.fork_lane();
        state.bh[1].dlen = SPAMSUM_LENGTH / 2;
        state.total_size = u64::from(block_size(0)) * SPAMSUM_LENGTH as u64; // not strictly greater
        state.retire_lane();
        assert_eq!(state.bh_start, 0);

        state.total_size += 1;
        state.retire_lane();
        assert_eq!(state.bh_start, 1);
    }

    #[test]
    fn retire_blocked_by_thin_next_lane() {
        let mut state = FuzzyState::new();
        state.fork_lane();
        state.bh[1].dlen = SPAMSUM_LENGTH / 2 - 1;
        state.total_size = MIN_INPUT_SIZE * 100;
        state.retire_lane();
        assert_eq!(state.bh_start, 0);
    }

    #[test]
    fn retire_keeps_at_least_one_lane_beyond_start() {
        let mut state = FuzzyState::new();
        state.total_size = u64::MAX / 2;
        state.retire_lane(); // bh_end - bh_start == 1
        assert_eq!(state.bh_start, 0);
    }

    /// io::Write sink accepts every byte and reports full consumption.
    #[test]
    fn write_sink_accepts_all_bytes() {
        use std::io::Write;
        let mut state = FuzzyState::new();
        let n = state.write(&[1, 2, 3, 4]).unwrap();
        assert_eq!(n, 4);
        state.flush().unwrap();
        assert_eq!(state.total_size(), 4);
    }
}
