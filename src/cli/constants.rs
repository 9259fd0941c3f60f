// cli/constants.rs — identity strings, output format constants, and the
// display-level machinery shared by the CLI modules.

use std::sync::atomic::{AtomicU32, Ordering};

// ── String / identity constants ───────────────────────────────────────────────
pub const PROGRAM_NAME: &str = "ssdeep";
pub const AUTHOR: &str = "Jesse Kornblum";

/// Header line emitted before file listings. Tools that consume ssdeep
/// output (including our own `-m` mode) recognise saved listings by it.
pub const OUTPUT_HEADER: &str = "ssdeep,1.1--blocksize:hash:hash,filename";

/// Name used for standard-input in listings and match reports.
pub const STDIN_MARK: &str = "stdin";

// ── Worker-count limits ───────────────────────────────────────────────────────
/// `-j 0` selects one worker per available core.
pub const NB_WORKERS_AUTO: usize = 0;

/// Upper bound on `-j`; beyond this thread churn only hurts.
pub const NB_WORKERS_MAX: usize = 200;

// ── Display level global ──────────────────────────────────────────────────────
//
// A file-scoped verbosity level shared across the CLI modules, raised by
// `-v` and lowered by `-q`:
//   0 = no output; 1 = errors only; 2 = normal; 3 = detail; 4 = debug
pub static DISPLAY_LEVEL: AtomicU32 = AtomicU32::new(2);

/// Returns the current display level.
#[inline]
pub fn display_level() -> u32 {
    DISPLAY_LEVEL.load(Ordering::Relaxed)
}

/// Sets the display level.
#[inline]
pub fn set_display_level(level: u32) {
    DISPLAY_LEVEL.store(level, Ordering::Relaxed);
}

// ── Display helpers ───────────────────────────────────────────────────────────

/// Print to stdout (the machine-readable listing surface).
#[macro_export]
macro_rules! displayout {
    ($($arg:tt)*) => { println!($($arg)*) };
}

/// Conditionally print a diagnostic line to stderr at or above `level`.
#[macro_export]
macro_rules! displaylevel {
    ($level:expr, $($arg:tt)*) => {
        if $crate::cli::constants::display_level() >= $level {
            eprintln!($($arg)*);
        }
    };
}
