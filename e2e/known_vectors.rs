//! E2E: reference vectors.
//!
//! Self-contained vectors (rolling-hash step values, degenerate all-zero
//! input) run unconditionally. Corpus-dependent vectors — the doubled
//! Apache-2.0 LICENSE text and a saved expected-digest listing — need
//! fixture files under `tests/fixtures/` and are skipped with a notice when
//! the corpus is not checked out.

use std::path::{Path, PathBuf};

use ssdeep::fuzzy::RollState;
use ssdeep::{hash_buf, hash_filename, FuzzyError};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

// ── Self-contained vectors ────────────────────────────────────────────────────

/// Rolling a single 'A' through a fresh window sums to 585.
#[test]
fn rolling_hash_single_byte_vector() {
    let mut roll = RollState::new();
    roll.hash(0x41);
    assert_eq!(roll.sum(), 585);
}

#[test]
fn zero_input_vectors() {
    assert!(matches!(
        hash_buf(&vec![0u8; 4096]),
        Err(FuzzyError::InputTooSmall(4096))
    ));
    assert!(matches!(hash_buf(&[]), Err(FuzzyError::InputTooSmall(0))));
    // 4097 zero bytes never fire a trigger: smallest block size, empty
    // strings.
    assert_eq!(hash_buf(&vec![0u8; 4097]).unwrap(), "3::");
}

// ── Corpus-dependent vectors ──────────────────────────────────────────────────

/// The canonical Apache-2.0 LICENSE text (11,358 bytes), doubled, hashes to
/// a fixed digest shared by every compatible ssdeep implementation.
#[test]
fn license_doubled_vector() {
    let path = fixture("LICENSE-2.0.txt");
    let Ok(license) = std::fs::read(&path) else {
        eprintln!("skipping: fixture {} not present", path.display());
        return;
    };
    assert_eq!(
        license.len(),
        11_358,
        "fixture is not the canonical Apache-2.0 text"
    );

    const EXPECTED: &str = "96:PuNQHTo6pYrYJWrYJ6N3w53hpYTdhuNQHTo6pYrYJWrYJ6N3w53hpYTP:+QHTrpYrsWrs6N3g3LaGQHTrpYrsWrsa";

    let mut doubled = license.clone();
    doubled.extend_from_slice(&license);
    assert_eq!(hash_buf(&doubled).unwrap(), EXPECTED);
}

/// `expected.ssdeep` is a saved listing (`digest,"relative-name"`); every
/// referenced file under the fixtures directory must hash to its recorded
/// digest.
#[test]
fn expected_listing_vectors() {
    let listing = fixture("expected.ssdeep");
    let Ok(content) = std::fs::read_to_string(&listing) else {
        eprintln!("skipping: fixture {} not present", listing.display());
        return;
    };

    let mut checked = 0usize;
    for line in content.lines() {
        let line = line.trim_end_matches('\r');
        if line.is_empty() || line.starts_with("ssdeep,") {
            continue;
        }
        let (expected, name) = line
            .split_once(',')
            .expect("listing line without a filename");
        let name = name.trim_matches('"');
        let digest = hash_filename(fixture(name))
            .unwrap_or_else(|e| panic!("cannot hash fixture '{name}': {e}"));
        assert_eq!(digest, expected, "digest mismatch for fixture '{name}'");
        checked += 1;
    }
    assert!(checked > 0, "listing fixture contained no entries");
}
