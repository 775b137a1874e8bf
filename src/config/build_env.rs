//! Build-time overrides injected by `build.rs`.
//!
//! `build.rs` has already validated every value, so parsing here only
//! needs to cover plain decimal digits.

/// Parse a decimal `u32` in const context.
///
/// Non-digit bytes stop the parse; the build script rejects those before
/// they reach here.
pub const fn parse_u32(s: &str) -> u32 {
    let bytes = s.as_bytes();
    let mut value: u32 = 0;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if b < b'0' || b > b'9' {
            break;
        }
        value = value * 10 + (b - b'0') as u32;
        i += 1;
    }
    value
}

/// Use the override if present, otherwise the default.
pub const fn env_or(value: Option<&str>, default: u32) -> u32 {
    match value {
        Some(s) => parse_u32(s),
        None => default,
    }
}
