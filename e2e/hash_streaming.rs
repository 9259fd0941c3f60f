//! E2E: the streaming surface — `FuzzyState` as an `io::Write` sink and
//! `hash_stream` over readers.

use std::io::{Cursor, Write};

use ssdeep::noise::gen_buffer;
use ssdeep::{hash_buf, hash_stream, FuzzyState};

#[test]
fn stream_over_cursor_matches_oneshot() {
    let data = gen_buffer(300_000, 201);
    let streamed = hash_stream(Cursor::new(&data)).unwrap();
    assert_eq!(streamed, hash_buf(&data).unwrap());
}

#[test]
fn copy_into_sink_matches_oneshot() {
    // std::io::copy drives the Write impl with its own buffer sizes.
    let data = gen_buffer(500_000, 202);
    let mut state = FuzzyState::new();
    std::io::copy(&mut Cursor::new(&data), &mut state).unwrap();
    assert_eq!(state.digest().unwrap(), hash_buf(&data).unwrap());
}

#[test]
fn byte_at_a_time_matches_oneshot() {
    let data = gen_buffer(8_192, 203);
    let mut state = FuzzyState::new();
    for &b in &data {
        state.write_all(&[b]).unwrap();
    }
    assert_eq!(state.digest().unwrap(), hash_buf(&data).unwrap());
}

/// digest() does not consume the state: more input can follow, and the
/// digest then reflects the longer stream.
#[test]
fn digest_then_continue_streaming() {
    let head = gen_buffer(10_000, 204);
    let tail = gen_buffer(10_000, 205);

    let mut state = FuzzyState::new();
    state.update(&head);
    let at_head = state.digest().unwrap();

    state.update(&tail);
    let at_end = state.digest().unwrap();

    let mut whole = head.clone();
    whole.extend_from_slice(&tail);
    assert_eq!(at_end, hash_buf(&whole).unwrap());
    assert_eq!(at_head, hash_buf(&head).unwrap());
}

#[test]
fn total_size_tracks_consumed_bytes() {
    let mut state = FuzzyState::new();
    state.update(&gen_buffer(1_000, 206));
    state.write_all(&gen_buffer(2_000, 207)).unwrap();
    assert_eq!(state.total_size(), 3_000);
}

/// An empty reader is the empty input: too small, not a panic.
#[test]
fn empty_reader_is_too_small() {
    assert!(hash_stream(Cursor::new(Vec::<u8>::new())).is_err());
}
