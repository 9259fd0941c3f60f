// cli module — argument parsing, help text, and the constants shared by the
// `ssdeep` binary's dispatch code in main.rs.

pub mod args;
pub mod constants;
pub mod help;
