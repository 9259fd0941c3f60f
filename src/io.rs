//! One-shot hashing entry points over buffers, readers, and files.
//!
//! Thin I/O wrappers around the streaming engine — equivalents of
//! `fuzzy_hash_buf`, `fuzzy_hash_stream`, `fuzzy_hash_file` and
//! `fuzzy_hash_filename` from fuzzy.c. All hashing semantics live in
//! [`crate::fuzzy`]; this module only moves bytes.

use std::fs::File;
use std::io::{ErrorKind, Read, Seek, SeekFrom};
use std::path::Path;

use crate::fuzzy::{FuzzyError, FuzzyState};

/// Read granularity of the stream adapter.
pub const READ_BLOCK_SIZE: usize = 64 * 1024;

/// Hash a complete in-memory buffer. Equivalent to `fuzzy_hash_buf`.
///
/// Fails with [`FuzzyError::InputTooSmall`] when the buffer is shorter than
/// [`crate::fuzzy::MIN_INPUT_SIZE`] bytes.
pub fn hash_buf(buf: &[u8]) -> Result<String, FuzzyError> {
    let mut state = FuzzyState::new();
    state.update(buf);
    state.digest()
}

/// Hash everything a reader produces, in [`READ_BLOCK_SIZE`] blocks.
/// Equivalent to `fuzzy_hash_stream`.
///
/// Read failures surface as [`FuzzyError::SourceRead`] and discard the
/// partial state; interrupted reads are retried.
pub fn hash_stream<R: Read>(mut source: R) -> Result<String, FuzzyError> {
    let mut state = FuzzyState::new();
    let mut block = vec![0u8; READ_BLOCK_SIZE];
    loop {
        let n = match source.read(&mut block) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(FuzzyError::SourceRead(e)),
        };
        state.update(&block[..n]);
    }
    state.digest()
}

/// Hash an open file from its beginning, restoring the caller's position
/// afterwards. Equivalent to `fuzzy_hash_file`.
pub fn hash_file(file: &mut File) -> Result<String, FuzzyError> {
    let pos = file.stream_position().map_err(FuzzyError::SourceRead)?;
    file.seek(SeekFrom::Start(0)).map_err(FuzzyError::SourceRead)?;
    let result = hash_stream(&mut *file);
    // Restore the position even when hashing failed; a restore failure only
    // matters if hashing itself succeeded.
    let restored = file.seek(SeekFrom::Start(pos));
    match (result, restored) {
        (Ok(digest), Ok(_)) => Ok(digest),
        (Ok(_), Err(e)) => Err(FuzzyError::SourceRead(e)),
        (Err(e), _) => Err(e),
    }
}

/// Open `path` and hash its contents. Equivalent to `fuzzy_hash_filename`.
pub fn hash_filename<P: AsRef<Path>>(path: P) -> Result<String, FuzzyError> {
    let file = File::open(path).map_err(FuzzyError::SourceRead)?;
    hash_stream(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fuzzy::MIN_INPUT_SIZE;
    use std::io::{self, Write};

    /// A reader that fails after yielding a fixed prefix.
    struct FailingReader {
        remaining: usize,
    }

    impl Read for FailingReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.remaining == 0 {
                return Err(io::Error::other("backing store went away"));
            }
            let n = buf.len().min(self.remaining);
            buf[..n].fill(0xA5);
            self.remaining -= n;
            Ok(n)
        }
    }

    #[test]
    fn buf_and_stream_agree() {
        let data: Vec<u8> = (0u8..=255).cycle().take(3 * READ_BLOCK_SIZE + 17).collect();
        let from_buf = hash_buf(&data).unwrap();
        let from_stream = hash_stream(&data[..]).unwrap();
        assert_eq!(from_buf, from_stream);
    }

    #[test]
    fn empty_and_small_buffers_are_rejected() {
        assert!(matches!(hash_buf(&[]), Err(FuzzyError::InputTooSmall(0))));
        let just_short = vec![0u8; (MIN_INPUT_SIZE - 1) as usize];
        assert!(matches!(
            hash_buf(&just_short),
            Err(FuzzyError::InputTooSmall(_))
        ));
        let just_enough = vec![0u8; MIN_INPUT_SIZE as usize];
        assert!(hash_buf(&just_enough).is_ok());
    }

    #[test]
    fn stream_read_failure_surfaces_as_source_read() {
        let reader = FailingReader { remaining: 10_000 };
        match hash_stream(reader) {
            Err(FuzzyError::SourceRead(e)) => {
                assert_eq!(e.to_string(), "backing store went away");
            }
            other => panic!("expected SourceRead, got {other:?}"),
        }
    }

    #[test]
    fn hash_file_restores_position() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("sample.bin");
        let data: Vec<u8> = (0u8..=255).cycle().take(8192).collect();
        std::fs::write(&path, &data).unwrap();

        let mut file = File::options().read(true).write(true).open(&path).unwrap();
        file.seek(SeekFrom::Start(1234)).unwrap();
        let digest = hash_file(&mut file).unwrap();
        assert_eq!(file.stream_position().unwrap(), 1234);
        assert_eq!(digest, hash_buf(&data).unwrap());
    }

    #[test]
    fn hash_filename_matches_hash_buf() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("sample.bin");
        let mut f = File::create(&path).unwrap();
        let data: Vec<u8> = (0..20_000u32).map(|i| (i % 251) as u8).collect();
        f.write_all(&data).unwrap();
        drop(f);

        assert_eq!(hash_filename(&path).unwrap(), hash_buf(&data).unwrap());
    }

    #[test]
    fn missing_file_is_a_source_read_error() {
        let err = hash_filename("/nonexistent/definitely/not/here").unwrap_err();
        assert!(matches!(err, FuzzyError::SourceRead(_)));
    }
}
