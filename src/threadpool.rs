//! Concurrent hashing of many files.
//!
//! Backs the CLI's multi-file modes. Each file is an independent job — one
//! open, one read loop, one engine state — so the work parallelises
//! trivially until the disk saturates. The shape here is a work queue, not
//! a job-per-submit pool: a fixed set of worker threads pulls
//! `(index, path)` pairs off a bounded channel, hashes each file, and
//! reports the digest tagged with the input's position, so listing order
//! never depends on thread scheduling. The queue bound keeps the feeder at
//! most a few operands ahead of the workers instead of staging the whole
//! sweep up front.

use std::path::PathBuf;

use crate::fuzzy::FuzzyError;
use crate::io::hash_filename;

/// Queued-but-unclaimed operands per worker. Hashing is I/O-bound, so a
/// shallow queue is enough to keep every worker fed.
const QUEUE_DEPTH_PER_WORKER: usize = 2;

/// Hash `paths` on up to `nb_workers` threads, returning one result per
/// input, in input order.
///
/// Hashes inline — no threads spawned — when there is nothing to
/// parallelise (`nb_workers` ≤ 1 or fewer than two files) or when the
/// worker threads cannot be created.
pub fn hash_files(paths: &[PathBuf], nb_workers: usize) -> Vec<Result<String, FuzzyError>> {
    if nb_workers <= 1 || paths.len() < 2 {
        return paths.iter().map(hash_filename).collect();
    }
    let nb_workers = nb_workers.min(paths.len());
    let Ok(pool) = rayon::ThreadPoolBuilder::new()
        .num_threads(nb_workers)
        .build()
    else {
        return paths.iter().map(hash_filename).collect();
    };

    let (work_tx, work_rx) = crossbeam_channel::bounded(nb_workers * QUEUE_DEPTH_PER_WORKER);
    // Every result fits: completion can never block a worker.
    let (done_tx, done_rx) = crossbeam_channel::bounded(paths.len());

    // The workers live on the pool; the caller's thread stays outside the
    // pool and feeds the queue, blocking whenever the workers fall behind.
    pool.in_place_scope(|scope| {
        for _ in 0..nb_workers {
            let work_rx = work_rx.clone();
            let done_tx = done_tx.clone();
            scope.spawn(move |_| {
                for (index, path) in work_rx {
                    let _ = done_tx.send((index, hash_filename(path)));
                }
            });
        }
        for job in paths.iter().enumerate() {
            if work_tx.send(job).is_err() {
                // Receivers gone (a worker panicked); stop feeding rather
                // than spin on a dead queue.
                break;
            }
        }
        drop(work_tx);
    });

    let mut results: Vec<Option<Result<String, FuzzyError>>> =
        (0..paths.len()).map(|_| None).collect();
    for (index, result) in done_rx.try_iter() {
        results[index] = Some(result);
    }
    results
        .into_iter()
        .map(|slot| {
            slot.unwrap_or_else(|| {
                Err(FuzzyError::SourceRead(std::io::Error::other(
                    "hashing worker exited before reporting a result",
                )))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise::gen_buffer;
    use tempfile::TempDir;

    fn corpus(n: usize) -> (TempDir, Vec<PathBuf>) {
        let dir = TempDir::new().unwrap();
        let mut paths = Vec::new();
        for i in 0..n {
            let path = dir.path().join(format!("file{i}.bin"));
            std::fs::write(&path, gen_buffer(8_192, i as u32)).unwrap();
            paths.push(path);
        }
        (dir, paths)
    }

    #[test]
    fn parallel_matches_serial_in_order() {
        let (_dir, paths) = corpus(12);
        let serial: Vec<String> = paths
            .iter()
            .map(|p| hash_filename(p).unwrap())
            .collect();
        let parallel: Vec<String> = hash_files(&paths, 4)
            .into_iter()
            .map(|r| r.unwrap())
            .collect();
        assert_eq!(parallel, serial);
    }

    #[test]
    fn single_worker_hashes_inline() {
        let (_dir, paths) = corpus(3);
        for (path, result) in paths.iter().zip(hash_files(&paths, 1)) {
            assert_eq!(result.unwrap(), hash_filename(path).unwrap());
        }
    }

    #[test]
    fn more_workers_than_files() {
        let (_dir, paths) = corpus(3);
        let results = hash_files(&paths, 64);
        assert_eq!(results.len(), 3);
        assert!(results.iter().all(|r| r.is_ok()));
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(hash_files(&[], 4).is_empty());
    }

    /// A bad path in the middle of the sweep errors at its own index and
    /// leaves every other result intact.
    #[test]
    fn failure_stays_at_its_index() {
        let (_dir, mut paths) = corpus(4);
        paths.insert(2, PathBuf::from("/no/such/file/in/the/sweep"));

        let results = hash_files(&paths, 4);
        assert_eq!(results.len(), 5);
        for (i, result) in results.iter().enumerate() {
            if i == 2 {
                assert!(matches!(result, Err(FuzzyError::SourceRead(_))));
            } else {
                assert_eq!(
                    result.as_ref().unwrap(),
                    &hash_filename(&paths[i]).unwrap()
                );
            }
        }
    }

    /// A file below the minimum hashable size is a per-file error, not a
    /// sweep-wide one.
    #[test]
    fn too_small_file_is_an_isolated_error() {
        let (dir, mut paths) = corpus(2);
        let tiny = dir.path().join("tiny.bin");
        std::fs::write(&tiny, b"short").unwrap();
        paths.push(tiny);

        let results = hash_files(&paths, 2);
        assert!(results[0].is_ok());
        assert!(results[1].is_ok());
        assert!(matches!(results[2], Err(FuzzyError::InputTooSmall(5))));
    }
}
