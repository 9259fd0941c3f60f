#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Hashing must be total: any byte sequence either digests cleanly or
    // reports InputTooSmall — never a panic.
    match ssdeep::hash_buf(data) {
        Ok(digest) => {
            // A produced digest must always round-trip through the
            // comparison parser and rate 100 against itself.
            assert_eq!(
                ssdeep::compare(&digest, &digest),
                Ok(100),
                "self-comparison failed for digest {digest}"
            );
        }
        Err(ssdeep::FuzzyError::InputTooSmall(n)) => {
            assert_eq!(n as usize, data.len());
            assert!((n as usize) < ssdeep::MIN_INPUT_SIZE as usize);
        }
        Err(other) => panic!("unexpected error from in-memory hashing: {other}"),
    }

    // Chunked feeding must agree with the one-shot result.
    if data.len() >= ssdeep::MIN_INPUT_SIZE as usize {
        let mut state = ssdeep::FuzzyState::new();
        for chunk in data.chunks(257) {
            state.update(chunk);
        }
        assert_eq!(state.digest().unwrap(), ssdeep::hash_buf(data).unwrap());
    }
});
