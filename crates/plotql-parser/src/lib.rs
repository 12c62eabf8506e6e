//! Hand-written SQL parser for the PlotQL dialect.
//!
//! Recursive descent over the statement grammar with Pratt
//! precedence-climbing for expressions. Produces a [`plotql_ast::Ast`]
//! arena plus an ordered list of diagnostics; parsing never raises and
//! always terminates in time linear in the token count.
//!
//! ```
//! use plotql_parser::Parser;
//!
//! let (ast, errors) = Parser::from_sql("SELECT name FROM metrics LIMIT 10").parse_all();
//! assert!(errors.is_empty());
//! assert_eq!(ast.statements().len(), 1);
//! ```

pub mod cursor;
pub mod diag;
mod expr;
pub mod lexer;
pub mod limits;
pub mod parser;

pub use cursor::TokenCursor;
pub use diag::{BufferSink, DiagnosticSink, ParseErrorKind, ParserError, TracingSink};
pub use lexer::Lexer;
pub use parser::Parser;

// The token vocabulary and tree types come from the AST crate; re-export the
// common ones so most callers need a single import.
pub use plotql_ast::{Ast, AstNode, NodeId, NodeKind, Span, Token, TokenKind};
