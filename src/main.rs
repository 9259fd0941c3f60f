//! Binary entry point for the `ssdeep` command-line tool.
//!
//! Dispatch happens in three stages: operand expansion (optionally
//! recursive), hashing (inline or across worker threads), and
//! mode-specific output — a digest listing by default, pairwise match
//! reports under `-d`, and match-against-saved-listing reports under `-m`.
//!
//! Listings go to stdout; every diagnostic goes to stderr through the
//! display-level machinery so listings stay machine-readable.

use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use anyhow::Context;

use ssdeep::cli::args::{parse_args, OpMode, ParsedArgs};
use ssdeep::cli::constants::{NB_WORKERS_AUTO, OUTPUT_HEADER, PROGRAM_NAME, STDIN_MARK};
use ssdeep::compare::compare;
use ssdeep::fuzzy::FuzzyError;
use ssdeep::threadpool::hash_files;
use ssdeep::{displaylevel, displayout};

// ── Saved-listing loading (-m) ────────────────────────────────────────────────

/// Parse a saved listing into `(signature, recorded name)` pairs.
///
/// Header lines and blank lines are skipped; lines that do not look like a
/// signature are reported at detail level and ignored, so one stray line
/// does not invalidate a large collection.
fn load_known_signatures(path: &str) -> anyhow::Result<Vec<(String, String)>> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("cannot read '{path}'"))?;
    let mut known = Vec::new();
    for line in content.lines() {
        let line = line.trim_end_matches('\r');
        if line.is_empty() || line.starts_with("ssdeep,") {
            continue;
        }
        let (signature, name) = match line.split_once(',') {
            Some((sig, name)) => (sig, name.trim_matches('"').to_owned()),
            None => (line, String::new()),
        };
        if signature.matches(':').count() != 2 {
            displaylevel!(3, "{PROGRAM_NAME}: {path}: ignoring malformed line '{line}'");
            continue;
        }
        known.push((signature.to_owned(), name));
    }
    Ok(known)
}

fn display_name(path: &Path, bare: bool) -> String {
    if bare {
        if let Some(name) = path.file_name() {
            return name.to_string_lossy().into_owned();
        }
    }
    path.display().to_string()
}

// ── Dispatch ──────────────────────────────────────────────────────────────────

/// Execute the operation selected by argument parsing.
///
/// Returns the process exit code: 0 when every input hashed (and, for `-m`,
/// the listing loaded) cleanly, 1 otherwise. `-s` suppresses the reports
/// but not the exit code.
fn run(args: ParsedArgs) -> i32 {
    let mut error_count = 0usize;

    // Load the saved listing first: a missing -m file fails the whole run
    // before any hashing work starts.
    let known = match args.match_file.as_deref() {
        Some(path) => match load_known_signatures(path) {
            Ok(list) => {
                if list.is_empty() {
                    displaylevel!(1, "{PROGRAM_NAME}: {path}: no usable signatures");
                }
                Some((path.to_owned(), list))
            }
            Err(e) => {
                displaylevel!(1, "{PROGRAM_NAME}: {e:#}");
                return 1;
            }
        },
        None => None,
    };

    // ── Operand expansion ──────────────────────────────────────────────────
    #[allow(unused_mut)]
    let mut inputs: Vec<PathBuf> = args.in_file_names.iter().map(PathBuf::from).collect();

    #[cfg(feature = "recursive")]
    if args.recursive {
        let (files, unreadable) = ssdeep::util::expand_inputs(&inputs);
        if unreadable > 0 {
            displaylevel!(
                2,
                "{PROGRAM_NAME}: {unreadable} directory entries could not be read"
            );
            error_count += unreadable;
        }
        inputs = files;
    }

    // ── Hashing ────────────────────────────────────────────────────────────
    let results: Vec<(String, Result<String, FuzzyError>)> = if inputs.is_empty() {
        if std::io::stdin().is_terminal() {
            displaylevel!(1, "{PROGRAM_NAME}: refusing to read from a console");
            return 1;
        }
        vec![(
            STDIN_MARK.to_owned(),
            ssdeep::hash_stream(std::io::stdin().lock()),
        )]
    } else {
        let nb_workers = if args.nb_workers == NB_WORKERS_AUTO {
            num_cpus::get()
        } else {
            args.nb_workers
        };
        displaylevel!(
            4,
            "{PROGRAM_NAME}: hashing {} file(s) on {} worker(s)",
            inputs.len(),
            nb_workers
        );
        let digests = hash_files(&inputs, nb_workers);
        inputs
            .iter()
            .zip(digests)
            .map(|(path, result)| (display_name(path, args.bare), result))
            .collect()
    };

    // Successfully hashed inputs, in command-line order.
    let mut hashed: Vec<(&str, &str)> = Vec::with_capacity(results.len());
    for (name, result) in &results {
        match result {
            Ok(digest) => hashed.push((name.as_str(), digest.as_str())),
            Err(e) => {
                error_count += 1;
                if !args.silent {
                    displaylevel!(1, "{PROGRAM_NAME}: {name}: {e}");
                }
            }
        }
    }

    // ── Mode-specific output ───────────────────────────────────────────────
    match args.op_mode {
        OpMode::Hash => {
            displayout!("{OUTPUT_HEADER}");
            for (name, digest) in &hashed {
                displayout!("{digest},\"{name}\"");
            }
        }
        OpMode::DirectCompare => {
            for i in 0..hashed.len() {
                for j in 0..i {
                    // Both digests came from our own engine, so parsing
                    // cannot fail; a zero score is simply not a match.
                    if let Ok(score) = compare(hashed[i].1, hashed[j].1) {
                        if score > args.threshold {
                            displayout!("{} matches {} ({})", hashed[i].0, hashed[j].0, score);
                        }
                    }
                }
            }
        }
        OpMode::MatchFile => {
            let (match_path, known) = known.unwrap_or_default();
            for (name, digest) in &hashed {
                for (signature, known_name) in &known {
                    match compare(digest, signature) {
                        Ok(score) if score > args.threshold => {
                            displayout!("{name} matches {match_path}:{known_name} ({score})");
                        }
                        _ => {}
                    }
                }
            }
        }
    }

    if error_count > 0 {
        1
    } else {
        0
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{PROGRAM_NAME}: {e}");
            ssdeep::cli::help::print_usage(PROGRAM_NAME);
            std::process::exit(1);
        }
    };

    // --help / --version already produced their output.
    if args.exit_early {
        std::process::exit(0);
    }

    std::process::exit(run(args));
}
