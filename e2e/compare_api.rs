//! E2E: similarity scoring over digests produced by our own engine.
//!
//! The contract fuzzy hashing exists for: small localised edits keep the
//! score high, unrelated inputs score zero, and scores always stay within
//! 0–100.

use ssdeep::noise::{gen_buffer, perturb};
use ssdeep::{compare, hash_buf};

#[test]
fn identical_inputs_score_100() {
    let digest = hash_buf(&gen_buffer(64_000, 301)).unwrap();
    assert_eq!(compare(&digest, &digest), Ok(100));
}

#[test]
fn lightly_edited_input_scores_high() {
    let original = gen_buffer(256 * 1024, 302);
    let mut edited = original.clone();
    perturb(&mut edited, 99, 8);

    let d1 = hash_buf(&original).unwrap();
    let d2 = hash_buf(&edited).unwrap();
    let score = compare(&d1, &d2).unwrap();
    assert!(score > 50, "8 byte edits in 256 KiB scored only {score}");
}

#[test]
fn heavier_edits_score_lower_than_lighter_ones() {
    let original = gen_buffer(256 * 1024, 303);

    let mut light = original.clone();
    perturb(&mut light, 7, 4);
    let mut heavy = original.clone();
    perturb(&mut heavy, 7, 4);
    // Additionally rewrite a whole 64 KiB span of the heavy variant.
    heavy[100_000..165_536].copy_from_slice(&gen_buffer(65_536, 999));

    let d0 = hash_buf(&original).unwrap();
    let light_score = compare(&d0, &hash_buf(&light).unwrap()).unwrap();
    let heavy_score = compare(&d0, &hash_buf(&heavy).unwrap()).unwrap();
    assert!(
        light_score > heavy_score,
        "light {light_score} should beat heavy {heavy_score}"
    );
}

#[test]
fn unrelated_inputs_score_zero() {
    let d1 = hash_buf(&gen_buffer(128 * 1024, 304)).unwrap();
    let d2 = hash_buf(&gen_buffer(128 * 1024, 999_304)).unwrap();
    assert_eq!(compare(&d1, &d2), Ok(0));
}

#[test]
fn scores_stay_within_bounds() {
    let digests: Vec<String> = (0..6u32)
        .map(|seed| hash_buf(&gen_buffer(40_000 + 11_111 * seed as usize, seed)).unwrap())
        .collect();
    for a in &digests {
        for b in &digests {
            let score = compare(a, b).unwrap();
            assert!(score <= 100, "score {score} out of range for {a} vs {b}");
        }
    }
}

#[test]
fn listing_lines_compare_like_bare_digests() {
    let digest = hash_buf(&gen_buffer(64_000, 305)).unwrap();
    let listing_line = format!("{digest},\"/corpus/sample-305.bin\"");
    assert_eq!(compare(&digest, &listing_line), Ok(100));
}

#[test]
fn doubling_the_input_still_matches() {
    // An input concatenated with itself keeps long shared piece runs; the
    // two digests sit one block size apart and must still match strongly.
    let data = gen_buffer(96 * 1024, 306);
    let mut doubled = data.clone();
    doubled.extend_from_slice(&data);

    let d1 = hash_buf(&data).unwrap();
    let d2 = hash_buf(&doubled).unwrap();
    let score = compare(&d1, &d2).unwrap();
    assert!(score > 0, "doubled input scored zero against the original");
}
