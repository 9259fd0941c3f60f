// cli/help.rs — usage, long help, and version banners.

use crate::cli::constants::{AUTHOR, PROGRAM_NAME};

/// Print brief usage to stderr.
pub fn print_usage(program: &str) {
    eprintln!("Usage: {program} [options] [FILES]");
    eprintln!("Try '{program} -h' for more information.");
}

/// Print the full option summary to stderr.
pub fn print_long_help(program: &str) {
    print_version();
    eprintln!();
    eprintln!("Usage: {program} [options] [FILES]");
    eprintln!("With no FILES, read standard input.");
    eprintln!();
    eprintln!("Options:");
    eprintln!(" -d      : compare each input against all earlier inputs");
    eprintln!(" -m FILE : match inputs against the saved listing FILE");
    eprintln!(" -t N    : only report matches scoring above N (0..=100, default 0)");
    eprintln!(" -r      : hash directory operands recursively");
    eprintln!(" -b      : print bare filenames (no directory part)");
    eprintln!(" -s      : silent; suppress per-file error reports");
    eprintln!(" -j N    : hashing worker threads (default 0 = one per core)");
    eprintln!(" -v / -q : more / less diagnostic output");
    eprintln!(" -h      : this help   -V : version");
    eprintln!(" --      : treat every remaining argument as a filename");
}

/// Print the version banner to stderr.
pub fn print_version() {
    eprintln!(
        "{} v{} — context-triggered piecewise hashing, by {}",
        PROGRAM_NAME,
        crate::version_string(),
        AUTHOR
    );
}
