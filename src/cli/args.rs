//! Command-line argument parsing for the `ssdeep` binary.
//!
//! The entry points are [`parse_args`] (reads `std::env::args()`) and
//! [`parse_args_from`] (takes an explicit slice, suitable for unit-testing).
//! Both return a [`ParsedArgs`] value capturing every option and operand.
//!
//! Short options may be aggregated (e.g. `-rds`). Options that take a value
//! (`-m`, `-t`, `-j`) accept it either fused to the flag (`-t50`) or as the
//! following argument (`-t 50`); a fused value ends the aggregate. A bare
//! `--` marks the end of options; everything after it is an operand even if
//! it starts with `-`.
//!
//! Bad or unrecognised options return an `Err` whose message begins with
//! `"bad usage: "`.

use anyhow::{anyhow, bail};

use crate::cli::constants::{display_level, set_display_level, NB_WORKERS_AUTO, NB_WORKERS_MAX};
use crate::cli::help::{print_long_help, print_version};

// ── Operation modes ───────────────────────────────────────────────────────────

/// What the run does with the hashed inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OpMode {
    /// Print a digest listing (default).
    #[default]
    Hash,
    /// `-d`: compare every input against the inputs listed before it.
    DirectCompare,
    /// `-m FILE`: match inputs against a saved listing.
    MatchFile,
}

// ── Public output type ────────────────────────────────────────────────────────

/// Complete set of options and operands produced by the parsing loop.
#[derive(Debug)]
pub struct ParsedArgs {
    /// Resolved operation mode.
    pub op_mode: OpMode,
    /// Saved listing to match against (`-m`).
    pub match_file: Option<String>,
    /// Minimum score a comparison must exceed to be reported (`-t`).
    pub threshold: u32,
    /// Hashing worker threads (`-j`; 0 = one per core).
    pub nb_workers: usize,
    /// Print basenames instead of full paths (`-b`).
    pub bare: bool,
    /// Suppress per-file error reports (`-s`).
    pub silent: bool,
    /// Traverse directory operands recursively (`-r`, `recursive` feature).
    #[cfg(feature = "recursive")]
    pub recursive: bool,
    /// File and directory operands in command-line order.
    pub in_file_names: Vec<String>,
    /// A `--help` / `--version` flag was handled; the caller should exit 0
    /// without hashing anything.
    pub exit_early: bool,
    /// Program name (argv[0]), used by help output.
    pub exe_name: String,
}

// ── Value helpers ─────────────────────────────────────────────────────────────

/// Take the value of a flag: the rest of the aggregate token when non-empty,
/// otherwise the next argument.
fn take_value(
    fused: &str,
    argv: &[String],
    index: &mut usize,
    flag: char,
) -> anyhow::Result<String> {
    if !fused.is_empty() {
        return Ok(fused.to_owned());
    }
    *index += 1;
    argv.get(*index)
        .cloned()
        .ok_or_else(|| anyhow!("bad usage: -{flag} requires an argument"))
}

fn read_u32(value: &str, flag: char) -> anyhow::Result<u32> {
    value
        .parse::<u32>()
        .map_err(|_| anyhow!("bad usage: -{flag} expects a number, got '{value}'"))
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Parse `std::env::args()` (skipping argv[0]).
pub fn parse_args() -> anyhow::Result<ParsedArgs> {
    let exe_name = std::env::args().next().unwrap_or_default();
    let argv: Vec<String> = std::env::args().skip(1).collect();
    parse_args_from(&exe_name, &argv)
}

/// Parse an explicit argument list. `exe_name` is argv[0] (used for help
/// text); `argv` is argv[1..]. Callable from tests without touching
/// `std::env`.
pub fn parse_args_from(exe_name: &str, argv: &[String]) -> anyhow::Result<ParsedArgs> {
    let mut args = ParsedArgs {
        op_mode: OpMode::Hash,
        match_file: None,
        threshold: 0,
        nb_workers: NB_WORKERS_AUTO,
        bare: false,
        silent: false,
        #[cfg(feature = "recursive")]
        recursive: false,
        in_file_names: Vec::new(),
        exit_early: false,
        exe_name: exe_name.to_owned(),
    };

    let mut operands_only = false;
    let mut i = 0usize;
    while i < argv.len() {
        let arg = argv[i].as_str();

        if operands_only || arg == "-" || !arg.starts_with('-') {
            // "-" conventionally names stdin; forwarded as an operand.
            args.in_file_names.push(arg.to_owned());
            i += 1;
            continue;
        }
        if arg == "--" {
            operands_only = true;
            i += 1;
            continue;
        }
        if let Some(long) = arg.strip_prefix("--") {
            match long {
                "help" => {
                    print_long_help(exe_name);
                    args.exit_early = true;
                }
                "version" => {
                    print_version();
                    args.exit_early = true;
                }
                _ => bail!("bad usage: unknown option --{long}"),
            }
            i += 1;
            continue;
        }

        // Aggregated short options.
        let body = &arg[1..];
        let mut pos = 0usize;
        while pos < body.len() {
            let flag = body.as_bytes()[pos] as char;
            let fused = &body[pos + 1..];
            match flag {
                'h' => {
                    print_long_help(exe_name);
                    args.exit_early = true;
                }
                'V' => {
                    print_version();
                    args.exit_early = true;
                }
                'd' => args.op_mode = OpMode::DirectCompare,
                'b' => args.bare = true,
                's' => args.silent = true,
                'v' => set_display_level(display_level() + 1),
                'q' => set_display_level(1),
                'r' => {
                    #[cfg(feature = "recursive")]
                    {
                        args.recursive = true;
                    }
                    #[cfg(not(feature = "recursive"))]
                    bail!("bad usage: -r requires a build with the 'recursive' feature");
                }
                'm' => {
                    let value = take_value(fused, argv, &mut i, 'm')?;
                    args.op_mode = OpMode::MatchFile;
                    args.match_file = Some(value);
                    pos = body.len();
                    continue;
                }
                't' => {
                    let value = take_value(fused, argv, &mut i, 't')?;
                    let threshold = read_u32(&value, 't')?;
                    if threshold > 100 {
                        bail!("bad usage: -t threshold must be 0..=100, got {threshold}");
                    }
                    args.threshold = threshold;
                    pos = body.len();
                    continue;
                }
                'j' => {
                    let value = take_value(fused, argv, &mut i, 'j')?;
                    let workers = read_u32(&value, 'j')? as usize;
                    args.nb_workers = workers.min(NB_WORKERS_MAX);
                    pos = body.len();
                    continue;
                }
                other => bail!("bad usage: unknown option -{other}"),
            }
            pos += 1;
        }
        i += 1;
    }

    Ok(args)
}
