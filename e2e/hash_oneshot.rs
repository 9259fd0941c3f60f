//! E2E: one-shot hashing entry points over buffers and files.
//!
//! Exercises `hash_buf` / `hash_filename` / `hash_file` as a black-box API:
//! same bytes, same digest, no matter which entry point carried them.

use std::fs::File;
use std::io::{Seek, SeekFrom, Write};

use ssdeep::noise::gen_buffer;
use ssdeep::{compare, hash_buf, hash_file, hash_filename, FuzzyError};

#[test]
fn buffer_and_filename_agree() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("payload.bin");
    let data = gen_buffer(150_000, 101);
    std::fs::write(&path, &data).unwrap();

    assert_eq!(hash_filename(&path).unwrap(), hash_buf(&data).unwrap());
}

#[test]
fn open_file_handle_agrees_and_preserves_position() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("payload.bin");
    let data = gen_buffer(80_000, 102);
    std::fs::write(&path, &data).unwrap();

    let mut file = File::open(&path).unwrap();
    file.seek(SeekFrom::Start(4096)).unwrap();
    let digest = hash_file(&mut file).unwrap();

    assert_eq!(digest, hash_buf(&data).unwrap());
    assert_eq!(file.stream_position().unwrap(), 4096);
}

#[test]
fn small_file_reports_input_too_small() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("tiny.bin");
    std::fs::write(&path, b"not enough bytes").unwrap();

    match hash_filename(&path) {
        Err(FuzzyError::InputTooSmall(n)) => assert_eq!(n, 16),
        other => panic!("expected InputTooSmall, got {other:?}"),
    }
}

#[test]
fn every_digest_self_compares_to_100() {
    for seed in 0..8u32 {
        let digest = hash_buf(&gen_buffer(30_000 + seed as usize * 7919, seed)).unwrap();
        assert_eq!(compare(&digest, &digest), Ok(100), "digest {digest}");
    }
}

#[test]
fn growing_the_file_grows_the_block_size() {
    // Quadrupling the input length must never shrink the selected block
    // size; over a big enough jump it strictly grows.
    let small = hash_buf(&gen_buffer(8_192, 7)).unwrap();
    let large = hash_buf(&gen_buffer(1 << 21, 7)).unwrap();
    let bs = |d: &str| d.split(':').next().unwrap().parse::<u64>().unwrap();
    assert!(
        bs(&large) > bs(&small),
        "block size did not grow: {} vs {}",
        small,
        large
    );
}

#[test]
fn file_written_in_pieces_hashes_like_a_whole() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("pieces.bin");
    let data = gen_buffer(200_000, 103);

    let mut f = File::create(&path).unwrap();
    for chunk in data.chunks(777) {
        f.write_all(chunk).unwrap();
    }
    f.sync_all().unwrap();
    drop(f);

    assert_eq!(hash_filename(&path).unwrap(), hash_buf(&data).unwrap());
}
