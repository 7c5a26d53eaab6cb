//! CLI Exit Code Registry
//!
//! Single source of truth for `shipcheck` exit codes. Scripts rely on them:
//! findings are data, not failure, so a run that reports mismatches still
//! exits 0.
//!
//! # Exit Codes
//!
//! | Code | Meaning                                                  |
//! |------|----------------------------------------------------------|
//! | 0    | Success (findings may have been reported)                |
//! | 2    | Usage error (bad arguments, unreadable config file)      |
//! | 3    | A source file could not be loaded into a grid            |
//! | 4    | Configuration parsed but failed validation               |
//! | 5    | The findings report could not be written                 |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant below
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into `CliError`

// =============================================================================
// Universal
// =============================================================================

/// Success - the run completed, with or without findings.
pub const EXIT_SUCCESS: u8 = 0;

/// Usage error - bad arguments, missing or unreadable config file.
/// Matches clap's own exit status for argument errors.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Run failures
// =============================================================================

/// Load failure - a source is missing, corrupt, or of an unsupported format.
pub const EXIT_LOAD: u8 = 3;

/// Invalid configuration - TOML syntax or a value out of range.
pub const EXIT_CONFIG: u8 = 4;

/// Report write failure - output path unwritable or encoder error.
pub const EXIT_REPORT: u8 = 5;
