//! Stable identifiers for the tool and evaluation error codes.
//!
//! Codes are short snake_case discriminators carried in reports.

pub const TOOL_NAME: &str = "hcpguard";

// Codes: per-rule evaluation errors
pub const CODE_PATH_SYNTAX: &str = "path_syntax";
pub const CODE_INVALID_PATTERN: &str = "invalid_pattern";

// Notes attached to ordinary fails
pub const NOTE_TYPE_MISMATCH: &str = "type_mismatch";
