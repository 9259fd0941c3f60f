//! E2E: the `ssdeep` binary as a black-box CLI tool, driven through
//! `std::process::Command`. Covers listing output, exit codes, the -d and
//! -m match modes, stdin hashing, and option errors.

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use ssdeep::cli::constants::OUTPUT_HEADER;
use ssdeep::noise::{gen_buffer, perturb};

/// Locate the `ssdeep` binary produced by Cargo.
fn ssdeep_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_ssdeep"))
}

/// Create a temp directory holding `n` hashable noise files.
fn make_corpus(n: usize) -> (tempfile::TempDir, Vec<PathBuf>) {
    let dir = tempfile::TempDir::new().unwrap();
    let mut paths = Vec::new();
    for i in 0..n {
        let path = dir.path().join(format!("file{i}.bin"));
        std::fs::write(&path, gen_buffer(32_768, 400 + i as u32)).unwrap();
        paths.push(path);
    }
    (dir, paths)
}

// ── Listing mode ──────────────────────────────────────────────────────────────

#[test]
fn listing_has_header_and_digest_lines() {
    let (_dir, paths) = make_corpus(2);
    let output = Command::new(ssdeep_bin())
        .args(paths.iter().map(|p| p.to_str().unwrap()))
        .output()
        .expect("failed to run ssdeep");
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let mut lines = stdout.lines();
    assert_eq!(lines.next(), Some(OUTPUT_HEADER));
    for path in &paths {
        let line = lines.next().expect("missing digest line");
        let expected = ssdeep::hash_filename(path).unwrap();
        assert_eq!(line, format!("{},\"{}\"", expected, path.display()));
    }
    assert_eq!(lines.next(), None);
}

#[test]
fn bare_mode_strips_directories() {
    let (_dir, paths) = make_corpus(1);
    let output = Command::new(ssdeep_bin())
        .args(["-b", paths[0].to_str().unwrap()])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains(",\"file0.bin\""));
    assert!(!stdout.contains(_dir.path().to_str().unwrap()));
}

#[test]
fn parallel_hashing_keeps_input_order() {
    let (_dir, paths) = make_corpus(8);
    let output = Command::new(ssdeep_bin())
        .arg("-j4")
        .args(paths.iter().map(|p| p.to_str().unwrap()))
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let names: Vec<&str> = stdout
        .lines()
        .skip(1)
        .map(|l| l.rsplit_once(",\"").unwrap().1.trim_end_matches('"'))
        .collect();
    let expected: Vec<String> = paths.iter().map(|p| p.display().to_string()).collect();
    assert_eq!(names, expected);
}

// ── Errors and exit codes ─────────────────────────────────────────────────────

#[test]
fn small_file_sets_exit_code_and_reports() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("tiny.bin");
    std::fs::write(&path, b"short").unwrap();

    let output = Command::new(ssdeep_bin())
        .arg(path.to_str().unwrap())
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("too small"), "stderr: {stderr}");
}

#[test]
fn silent_mode_suppresses_the_report_but_not_the_exit_code() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("tiny.bin");
    std::fs::write(&path, b"short").unwrap();

    let output = Command::new(ssdeep_bin())
        .args(["-s", path.to_str().unwrap()])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(!stderr.contains("too small"), "stderr: {stderr}");
}

#[test]
fn unknown_option_fails_with_usage() {
    let output = Command::new(ssdeep_bin()).arg("-Z").output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("bad usage"), "stderr: {stderr}");
}

#[test]
fn version_flag_exits_zero() {
    let output = Command::new(ssdeep_bin()).arg("-V").output().unwrap();
    assert!(output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("2.14.1"), "stderr: {stderr}");
}

// ── Stdin ─────────────────────────────────────────────────────────────────────

#[test]
fn hashes_stdin_when_no_operands() {
    let data = gen_buffer(50_000, 410);
    let mut child = Command::new(ssdeep_bin())
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child.stdin.take().unwrap().write_all(&data).unwrap();
    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let expected = ssdeep::hash_buf(&data).unwrap();
    assert!(
        stdout.contains(&format!("{expected},\"stdin\"")),
        "stdout: {stdout}"
    );
}

// ── Match modes ───────────────────────────────────────────────────────────────

#[test]
fn direct_compare_reports_similar_pairs() {
    let dir = tempfile::TempDir::new().unwrap();
    let original = gen_buffer(128 * 1024, 420);
    let mut edited = original.clone();
    perturb(&mut edited, 5, 4);

    let a = dir.path().join("a.bin");
    let b = dir.path().join("b.bin");
    std::fs::write(&a, &original).unwrap();
    std::fs::write(&b, &edited).unwrap();

    let output = Command::new(ssdeep_bin())
        .args(["-d", a.to_str().unwrap(), b.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(
        stdout.contains(&format!("{} matches {} (", b.display(), a.display())),
        "stdout: {stdout}"
    );
}

#[test]
fn direct_compare_stays_quiet_for_unrelated_files() {
    let dir = tempfile::TempDir::new().unwrap();
    let a = dir.path().join("a.bin");
    let b = dir.path().join("b.bin");
    std::fs::write(&a, gen_buffer(64 * 1024, 421)).unwrap();
    std::fs::write(&b, gen_buffer(64 * 1024, 999_421)).unwrap();

    let output = Command::new(ssdeep_bin())
        .args(["-d", a.to_str().unwrap(), b.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(output.stdout.is_empty(), "unexpected match output");
}

#[test]
fn match_mode_finds_inputs_in_a_saved_listing() {
    let dir = tempfile::TempDir::new().unwrap();
    let sample = dir.path().join("sample.bin");
    std::fs::write(&sample, gen_buffer(96 * 1024, 422)).unwrap();

    // Save a listing of the sample, then match the sample against it.
    let listing_path = dir.path().join("known.ssdeep");
    let listing = Command::new(ssdeep_bin())
        .arg(sample.to_str().unwrap())
        .output()
        .unwrap();
    std::fs::write(&listing_path, &listing.stdout).unwrap();

    let output = Command::new(ssdeep_bin())
        .args([
            "-m",
            listing_path.to_str().unwrap(),
            sample.to_str().unwrap(),
        ])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(
        stdout.contains(&format!(
            "{} matches {}:{} (100)",
            sample.display(),
            listing_path.display(),
            sample.display()
        )),
        "stdout: {stdout}"
    );
}

#[test]
fn missing_match_file_fails_the_run() {
    let output = Command::new(ssdeep_bin())
        .args(["-m", "/no/such/listing.ssdeep", "also-irrelevant"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
}

// ── Recursive traversal ───────────────────────────────────────────────────────

#[cfg(feature = "recursive")]
#[test]
fn recursive_mode_hashes_a_tree() {
    let dir = tempfile::TempDir::new().unwrap();
    std::fs::create_dir(dir.path().join("sub")).unwrap();
    std::fs::write(dir.path().join("top.bin"), gen_buffer(16_384, 430)).unwrap();
    std::fs::write(dir.path().join("sub/deep.bin"), gen_buffer(16_384, 431)).unwrap();

    let output = Command::new(ssdeep_bin())
        .args(["-r", dir.path().to_str().unwrap()])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("top.bin"), "stdout: {stdout}");
    assert!(stdout.contains("deep.bin"), "stdout: {stdout}");
}
