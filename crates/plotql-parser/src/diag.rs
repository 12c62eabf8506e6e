//! Parse diagnostics and the sink they are reported through.
//!
//! The parser never raises: every failed expectation records one
//! [`ParserError`] into the parser's list and mirrors it to a
//! [`DiagnosticSink`] the embedder can inject. The default sink forwards to
//! `tracing`; tests install a [`BufferSink`] to observe diagnostics without
//! capturing process output.

use std::cell::RefCell;
use std::error::Error;
use std::fmt;
use std::rc::Rc;

use plotql_ast::Span;

/// Classification of a parse diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseErrorKind {
    /// The current token does not match what the grammar expects.
    UnexpectedToken,
    /// Input ended where the grammar expects more.
    UnexpectedEof,
    /// A character the lexical grammar does not recognize.
    UnexpectedCharacter,
    /// An unterminated or malformed literal or comment.
    MalformedLiteral,
    /// A `(` without its matching `)`.
    UnclosedParen,
    /// Leftover tokens after a complete statement.
    TrailingInput,
    /// Expression nesting exceeded `limits::MAX_EXPR_DEPTH`.
    ExpressionTooDeep,
    /// Query text exceeded `limits::MAX_SQL_LENGTH`.
    StatementTooLong,
    /// A function call exceeded `limits::MAX_FUNCTION_ARG` arguments.
    TooManyArguments,
}

impl ParseErrorKind {
    /// Stable lowercase name, used in log fields.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UnexpectedToken => "unexpected_token",
            Self::UnexpectedEof => "unexpected_eof",
            Self::UnexpectedCharacter => "unexpected_character",
            Self::MalformedLiteral => "malformed_literal",
            Self::UnclosedParen => "unclosed_paren",
            Self::TrailingInput => "trailing_input",
            Self::ExpressionTooDeep => "expression_too_deep",
            Self::StatementTooLong => "statement_too_long",
            Self::TooManyArguments => "too_many_arguments",
        }
    }
}

/// One recorded parse diagnostic: kind, message, offending span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserError {
    pub kind: ParseErrorKind,
    pub message: String,
    pub span: Span,
}

impl ParserError {
    #[must_use]
    pub fn new(kind: ParseErrorKind, message: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            message: message.into(),
            span,
        }
    }
}

impl fmt::Display for ParserError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.span, self.message)
    }
}

impl Error for ParserError {}

/// Receives every diagnostic as it is recorded.
pub trait DiagnosticSink {
    fn report(&mut self, error: &ParserError);
}

/// Default sink: forwards diagnostics to `tracing` at WARN level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&mut self, error: &ParserError) {
        tracing::warn!(
            target: "plotql::parser",
            kind = error.kind.as_str(),
            span = %error.span,
            "{}",
            error.message
        );
    }
}

/// A sink that buffers diagnostics in memory; clones share one buffer.
#[derive(Debug, Default, Clone)]
pub struct BufferSink {
    errors: Rc<RefCell<Vec<ParserError>>>,
}

impl BufferSink {
    /// Drain everything reported so far.
    #[must_use]
    pub fn take(&self) -> Vec<ParserError> {
        std::mem::take(&mut *self.errors.borrow_mut())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.borrow().is_empty()
    }
}

impl DiagnosticSink for BufferSink {
    fn report(&mut self, error: &ParserError) {
        self.errors.borrow_mut().push(error.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_span_and_message() {
        let err = ParserError::new(
            ParseErrorKind::UnexpectedToken,
            "expected ')', got FROM",
            Span::new(10, 14),
        );
        assert_eq!(err.to_string(), "10..14: expected ')', got FROM");
    }

    #[test]
    fn kind_names_are_stable() {
        assert_eq!(ParseErrorKind::UnexpectedToken.as_str(), "unexpected_token");
        assert_eq!(ParseErrorKind::UnclosedParen.as_str(), "unclosed_paren");
        assert_eq!(
            ParseErrorKind::ExpressionTooDeep.as_str(),
            "expression_too_deep"
        );
    }

    #[test]
    fn buffer_sink_shares_storage_across_clones() {
        let sink = BufferSink::default();
        let mut handle = sink.clone();
        handle.report(&ParserError::new(
            ParseErrorKind::UnexpectedEof,
            "expected expression",
            Span::ZERO,
        ));
        assert_eq!(sink.len(), 1);
        let drained = sink.take();
        assert_eq!(drained.len(), 1);
        assert_eq!(drained[0].kind, ParseErrorKind::UnexpectedEof);
        assert!(sink.is_empty());
    }
}
