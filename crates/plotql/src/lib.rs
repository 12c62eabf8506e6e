//! Public API facade for the PlotQL query parser.
//!
//! Most callers want one of two entry points:
//!
//! - [`parse`] — best-effort: always returns a tree plus the full list of
//!   diagnostics, even for malformed input.
//! - [`parse_query`] — strict: returns the tree only when the input parsed
//!   cleanly, otherwise the first diagnostic as a [`PlotQlError`].
//!
//! ```
//! let ast = plotql::parse_query("SELECT region, avg(latency) FROM requests GROUP BY region")
//!     .expect("valid query");
//! assert_eq!(ast.statements().len(), 1);
//! ```

pub use plotql_ast::{Ast, AstNode, NodeId, NodeKind, Span, Token, TokenKind};
pub use plotql_error::{ErrorCode, PlotQlError, Result};
pub use plotql_parser::{
    BufferSink, DiagnosticSink, Lexer, ParseErrorKind, Parser, ParserError, TokenCursor,
    TracingSink, limits,
};

/// Everything one parse produced: the tree and the diagnostics.
///
/// An empty error list means success; with errors present the tree is
/// advisory and may be incomplete.
#[derive(Debug)]
pub struct ParseOutcome {
    pub ast: Ast,
    pub errors: Vec<ParserError>,
}

impl ParseOutcome {
    /// Whether the parse completed without diagnostics.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Convert into a strict result, surfacing the first diagnostic.
    pub fn into_result(self) -> Result<Ast> {
        match self.errors.first() {
            None => Ok(self.ast),
            Some(first) => Err(to_plotql_error(first)),
        }
    }
}

/// Parse a query string, best-effort.
#[must_use]
pub fn parse(sql: &str) -> ParseOutcome {
    let (ast, errors) = Parser::from_sql(sql).parse_all();
    ParseOutcome { ast, errors }
}

/// Parse a query string, strict: any diagnostic fails the whole parse.
pub fn parse_query(sql: &str) -> Result<Ast> {
    parse(sql).into_result()
}

fn to_plotql_error(error: &ParserError) -> PlotQlError {
    match error.kind {
        ParseErrorKind::ExpressionTooDeep => PlotQlError::ExpressionTooDeep {
            max: limits::MAX_EXPR_DEPTH as usize,
        },
        ParseErrorKind::StatementTooLong => PlotQlError::StatementTooLong {
            length: error.span.end as usize,
            max: limits::MAX_SQL_LENGTH,
        },
        _ => PlotQlError::parse(error.span.start as usize, error.message.clone()),
    }
}
