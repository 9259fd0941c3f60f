//! Context-triggered piecewise hashing (CTPH) engine.
//!
//! The streaming core of the crate: a rolling-window trigger detector
//! ([`rolling`]) drives an ensemble of block-size lanes ([`state`]) whose
//! selected lane becomes the textual digest ([`digest`]). Ported from
//! fuzzy.c (ssdeep 2.14.1); digests are byte-for-byte compatible with the
//! ssdeep tool family.
//!
//! ```no_run
//! use std::io::Write;
//!
//! let mut state = ssdeep::FuzzyState::new();
//! state.write_all(b"...at least 4097 bytes of input...").unwrap();
//! let digest = state.digest().unwrap();
//! ```

mod digest;
mod rolling;
mod state;
mod types;

pub use rolling::RollState;
pub use state::FuzzyState;
pub use types::{
    block_size, sum_hash, FuzzyError, B64, HASH_INIT, HASH_PRIME, MAX_RESULT_LEN, MIN_BLOCKSIZE,
    MIN_INPUT_SIZE, NUM_BLOCKHASHES, ROLLING_WINDOW, SPAMSUM_LENGTH,
};
