#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Split the input into two candidate signature strings and compare
    // them both ways. compare() must never panic on malformed text, and
    // any score it does produce must be within range and symmetric.
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let (a, b) = match text.split_once('\n') {
        Some(pair) => pair,
        None => (text, text),
    };

    let forward = ssdeep::compare(a, b);
    let backward = ssdeep::compare(b, a);
    match (forward, backward) {
        (Ok(f), Ok(r)) => {
            assert!(f <= 100 && r <= 100, "score out of range: {f} / {r}");
            assert_eq!(f, r, "comparison is not symmetric for {a:?} vs {b:?}");
        }
        (Err(_), Err(_)) => {}
        // One side failing to parse means exactly one input was malformed;
        // nothing further to check.
        _ => {}
    }
});
