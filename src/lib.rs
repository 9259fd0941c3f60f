// ssdeep 2.14.1 — Rust port

pub mod cli;
pub mod compare;
pub mod fuzzy;
pub mod io;
pub mod noise;
pub mod threadpool;
pub mod util;

// ─────────────────────────────────────────────────────────────────────────────
// Top-level convenience re-exports for the most common API entry points.
// These mirror the primary symbols from fuzzy.h.
// ─────────────────────────────────────────────────────────────────────────────

/// Streaming hash state. Equivalent to `fuzzy_state` /
/// `fuzzy_new`–`fuzzy_update`–`fuzzy_digest`; Drop replaces `fuzzy_free`
/// (RAII).
pub use fuzzy::FuzzyState;

/// Error type of the hashing entry points.
pub use fuzzy::FuzzyError;

/// One-shot hash of an in-memory buffer. Equivalent to `fuzzy_hash_buf`.
pub use io::hash_buf;

/// One-shot hash of an open file, position-preserving. Equivalent to
/// `fuzzy_hash_file`.
pub use io::hash_file;

/// One-shot hash of a file by path. Equivalent to `fuzzy_hash_filename`.
pub use io::hash_filename;

/// One-shot hash of anything readable. Equivalent to `fuzzy_hash_stream`.
pub use io::hash_stream;

/// Similarity score (0–100) between two digests. Equivalent to
/// `fuzzy_compare`.
pub use compare::compare;

/// Maximum digest string length. Equivalent to `FUZZY_MAX_RESULT`.
pub use fuzzy::MAX_RESULT_LEN;

/// Minimum hashable input length in bytes.
pub use fuzzy::MIN_INPUT_SIZE;

// ─────────────────────────────────────────────────────────────────────────────
// Version API
// ─────────────────────────────────────────────────────────────────────────────

/// Version of the ported upstream.
pub const SSDEEP_VERSION_STRING: &str = "2.14.1";

/// Returns the ported version string (e.g. `"2.14.1"`).
pub fn version_string() -> &'static str {
    SSDEEP_VERSION_STRING
}
