//! Hard limits enforced while parsing.
//!
//! All limits are checked, never assumed: exceeding one records a diagnostic
//! and parsing continues or stops gracefully, so arbitrary input cannot drive
//! unbounded recursion or allocation.

/// Maximum length of a single query string in bytes.
pub const MAX_SQL_LENGTH: usize = 1_000_000;

/// Maximum nesting depth of an expression tree.
///
/// The expression parser recurses once per nesting level; 256 keeps the
/// deepest parse well inside a 2 MiB test-thread stack.
pub const MAX_EXPR_DEPTH: u32 = 256;

/// Maximum number of arguments to a function call.
pub const MAX_FUNCTION_ARG: usize = 1000;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_values() {
        assert_eq!(MAX_SQL_LENGTH, 1_000_000);
        assert_eq!(MAX_EXPR_DEPTH, 256);
        assert_eq!(MAX_FUNCTION_ARG, 1000);
    }
}
