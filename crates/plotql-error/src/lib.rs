//! Primary error type for PlotQL operations.
//!
//! The parser itself never raises; it accumulates diagnostics. This crate
//! defines the structured error the public API surfaces when a caller wants
//! a `Result`-shaped entry point, along with a stable numeric code mapping
//! for embedders.

use thiserror::Error;

/// Primary error type for PlotQL operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlotQlError {
    /// SQL syntax error near a specific token.
    #[error("near \"{token}\": syntax error")]
    Syntax { token: String },

    /// Parse error at a specific byte offset.
    #[error("parse error at offset {offset}: {detail}")]
    Parse { offset: usize, detail: String },

    /// Query text exceeds the statement size limit.
    #[error("statement too long: {length} bytes (max {max})")]
    StatementTooLong { length: usize, max: usize },

    /// Expression nesting exceeds the depth limit.
    #[error("expression tree too deep (max {max})")]
    ExpressionTooDeep { max: usize },

    /// Internal logic error (should never happen).
    #[error("internal error: {0}")]
    Internal(String),
}

/// Stable result codes for embedders and CLI exit statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ErrorCode {
    /// Successful result.
    Ok = 0,
    /// Syntax or parse error.
    Error = 1,
    /// Internal logic error.
    Internal = 2,
    /// A resource limit was exceeded.
    Limit = 3,
}

impl PlotQlError {
    /// Map this error to its stable result code.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::Syntax { .. } | Self::Parse { .. } => ErrorCode::Error,
            Self::StatementTooLong { .. } | Self::ExpressionTooDeep { .. } => ErrorCode::Limit,
            Self::Internal(_) => ErrorCode::Internal,
        }
    }

    /// Whether the user can likely fix this without code changes.
    #[must_use]
    pub const fn is_user_recoverable(&self) -> bool {
        !matches!(self, Self::Internal(_))
    }

    /// Get the process exit code for this error (for CLI use).
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        self.error_code() as i32
    }

    /// Create a syntax error.
    pub fn syntax(token: impl Into<String>) -> Self {
        Self::Syntax {
            token: token.into(),
        }
    }

    /// Create a parse error.
    pub fn parse(offset: usize, detail: impl Into<String>) -> Self {
        Self::Parse {
            offset,
            detail: detail.into(),
        }
    }

    /// Create an internal error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

/// Result type alias using `PlotQlError`.
pub type Result<T> = std::result::Result<T, PlotQlError>;
