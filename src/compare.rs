//! Similarity scoring between two fuzzy-hash signatures.
//!
//! Equivalent to `fuzzy_compare` in fuzzy.c plus its helpers
//! (`eliminate_sequences`, `has_common_substring`, `score_strings`,
//! `edit_distn`). Scores run 0 (no similarity) to 100 (identical).
//!
//! Two signatures are only comparable when their block sizes are equal or
//! adjacent (a factor of two apart) — each digest carries strings for two
//! consecutive block sizes exactly so that one shared size always exists
//! between inputs whose lengths differ by up to 2×.

use core::fmt;

use crate::fuzzy::{MIN_BLOCKSIZE, ROLLING_WINDOW, SPAMSUM_LENGTH};

// ─────────────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────────────

/// A signature string that does not parse as `"blocksize:s1:s2"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureError {
    /// Fewer than two `:` separators.
    MissingSeparator,
    /// The leading block-size field is not a decimal `u32`.
    BadBlockSize,
}

impl fmt::Display for SignatureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSeparator => write!(f, "signature is missing a ':' separator"),
            Self::BadBlockSize => write!(f, "signature block size is not a valid number"),
        }
    }
}

impl std::error::Error for SignatureError {}

// ─────────────────────────────────────────────────────────────────────────────
// Signature parsing
// ─────────────────────────────────────────────────────────────────────────────

/// Split `"blocksize:s1:s2"` into its three fields.
///
/// Listing files append `,"filename"` after the second string (the output
/// format of the CLI); anything from the first `,` onward is ignored, so
/// whole listing lines can be fed here directly.
fn parse_signature(sig: &str) -> Result<(u32, &[u8], &[u8]), SignatureError> {
    let mut parts = sig.splitn(3, ':');
    let bs_field = parts.next().unwrap_or("");
    let s1 = parts.next().ok_or(SignatureError::MissingSeparator)?;
    let s2 = parts.next().ok_or(SignatureError::MissingSeparator)?;
    let block_size: u32 = bs_field.parse().map_err(|_| SignatureError::BadBlockSize)?;
    let s2 = match s2.find(',') {
        Some(pos) => &s2[..pos],
        None => s2,
    };
    Ok((block_size, s1.as_bytes(), s2.as_bytes()))
}

/// Collapse every run of more than three identical characters down to three.
///
/// Long repeats carry almost no information but would dominate the edit
/// distance; both the scorer and the identical-signature shortcut operate on
/// the collapsed form. Equivalent to `eliminate_sequences`.
fn eliminate_sequences(s: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(s.len());
    for &c in s {
        let n = out.len();
        if n >= 3 && out[n - 1] == c && out[n - 2] == c && out[n - 3] == c {
            continue;
        }
        out.push(c);
    }
    out
}

// ─────────────────────────────────────────────────────────────────────────────
// Scoring helpers
// ─────────────────────────────────────────────────────────────────────────────

/// True when the two strings share any substring of [`ROLLING_WINDOW`]
/// characters. Equivalent to `has_common_substring`; the quadratic scan is
/// fine at ≤ 64 characters per string.
fn has_common_substring(a: &[u8], b: &[u8]) -> bool {
    if a.len() < ROLLING_WINDOW || b.len() < ROLLING_WINDOW {
        return false;
    }
    a.windows(ROLLING_WINDOW)
        .any(|w| b.windows(ROLLING_WINDOW).any(|v| v == w))
}

/// Weighted edit distance: insert and delete cost 1, substitute costs 2.
/// Equivalent to `edit_distn` (two-row dynamic program).
fn edit_distance(a: &[u8], b: &[u8]) -> u32 {
    let mut prev: Vec<u32> = (0..=b.len() as u32).collect();
    let mut cur = vec![0u32; b.len() + 1];
    for (i, &ac) in a.iter().enumerate() {
        cur[0] = i as u32 + 1;
        for (j, &bc) in b.iter().enumerate() {
            let substitute = prev[j] + if ac == bc { 0 } else { 2 };
            let remove = prev[j + 1] + 1;
            let insert = cur[j] + 1;
            cur[j + 1] = substitute.min(remove).min(insert);
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    prev[b.len()]
}

/// Score two digest strings that were produced at the same block size.
/// Equivalent to `score_strings`.
fn score_strings(a: &[u8], b: &[u8], block_size: u64) -> u32 {
    if a.len() > SPAMSUM_LENGTH || b.len() > SPAMSUM_LENGTH {
        return 0;
    }
    // Without a 7-character run in common the match is considered noise no
    // matter how close the edit distance is.
    if !has_common_substring(a, b) {
        return 0;
    }

    // Rescale the edit distance to 0..100 relative to the combined length,
    // then invert into a similarity.
    let distance = u64::from(edit_distance(a, b));
    let scaled = distance * SPAMSUM_LENGTH as u64 / (a.len() + b.len()) as u64;
    let scaled = 100 * scaled / SPAMSUM_LENGTH as u64;
    if scaled >= 100 {
        return 0;
    }
    let score = (100 - scaled) as u32;

    // Small block sizes cannot justify high scores: short inputs simply do
    // not contain enough trigger points. Cap accordingly.
    let uncapped_from = u64::from((99 + ROLLING_WINDOW as u32) / ROLLING_WINDOW as u32 * MIN_BLOCKSIZE);
    if block_size >= uncapped_from {
        return score;
    }
    let cap = (block_size / u64::from(MIN_BLOCKSIZE)) as u32 * a.len().min(b.len()) as u32;
    score.min(cap)
}

// ─────────────────────────────────────────────────────────────────────────────
// Public entry point
// ─────────────────────────────────────────────────────────────────────────────

/// Compare two signatures, returning a similarity score 0–100.
///
/// Equivalent to `fuzzy_compare`. Either argument may be a bare signature
/// or a whole listing line (`signature,"filename"`). Signatures whose block
/// sizes are neither equal nor a factor of two apart score 0; identical
/// signatures score 100.
pub fn compare(sig1: &str, sig2: &str) -> Result<u32, SignatureError> {
    let (bs1, raw1_a, raw1_b) = parse_signature(sig1)?;
    let (bs2, raw2_a, raw2_b) = parse_signature(sig2)?;

    if bs1 != bs2
        && u64::from(bs1) != 2 * u64::from(bs2)
        && u64::from(bs2) != 2 * u64::from(bs1)
    {
        return Ok(0);
    }

    let s1_a = eliminate_sequences(raw1_a);
    let s1_b = eliminate_sequences(raw1_b);
    let s2_a = eliminate_sequences(raw2_a);
    let s2_b = eliminate_sequences(raw2_b);

    // Identical signatures rate as a perfect match regardless of the
    // small-block-size cap below.
    if bs1 == bs2 && s1_a == s2_a && s1_b == s2_b {
        return Ok(100);
    }

    let score = if bs1 == bs2 {
        // Same block size: both aligned string pairs are comparable; take
        // the better match.
        let first = score_strings(&s1_a, &s2_a, u64::from(bs1));
        let second = score_strings(&s1_b, &s2_b, 2 * u64::from(bs1));
        first.max(second)
    } else if u64::from(bs1) == 2 * u64::from(bs2) {
        score_strings(&s1_a, &s2_b, u64::from(bs1))
    } else {
        score_strings(&s1_b, &s2_a, u64::from(bs2))
    };
    Ok(score)
}
