//! Process exit codes, taken from BSD sysexits.h

/// Tree unbound (or dry run reported)
pub const OK: i32 = 0;

/// Bad arguments, or a destination inside the source tree
pub const USAGE: i32 = 64;

/// Source tree missing or not a directory
pub const NOINPUT: i32 = 66;

/// Read, write or copy failed mid-run
pub const IOERR: i32 = 74;

/// Config file unreadable, malformed, or with an empty marker pattern
pub const CONFIG: i32 = 78;
