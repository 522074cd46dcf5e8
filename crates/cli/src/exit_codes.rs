//! CLI Exit Code Registry
//!
//! Single source of truth for `casecheck` exit codes. Scripts rely on them.
//!
//! | Code | Meaning                                                        |
//! |------|----------------------------------------------------------------|
//! | 0    | Success (row-level analysis errors still count as success)     |
//! | 1    | Fatal run error: configuration, output file, validation, no rows |
//! | 2    | Usage error: row count below 1 or not a number                 |
//!
//! Row-level failures (unreadable row, exhausted retries, a failed sheet
//! write) never change the exit code.

/// Run completed. Individual rows may still carry `ERROR:` verdicts.
pub const EXIT_SUCCESS: u8 = 0;

/// Fatal error before or outside the per-row loop.
pub const EXIT_ERROR: u8 = 1;

/// Bad row count from the command line or the prompt.
pub const EXIT_USAGE: u8 = 2;
