//! Recursive descent parser for PlotQL `SELECT` statements.
//!
//! Expression parsing lives in `expr.rs`; this module drives the token
//! cursor over the statement grammar, one clause parser per clause. Errors
//! are collected, never raised: a failed expectation records exactly one
//! diagnostic and the surrounding production either keeps its partial result
//! or synchronizes forward to the next clause keyword, so one bad expression
//! does not discard the rest of the statement.

use plotql_ast::{Ast, NodeId, NodeKind, TokenKind};
use tracing::debug;

use crate::cursor::TokenCursor;
use crate::diag::{DiagnosticSink, ParseErrorKind, ParserError, TracingSink};
use crate::lexer::Lexer;

/// Outcome of attempting one grammar production.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Prod {
    /// The production matched and built this node.
    Node(NodeId),
    /// The production's leading tokens were absent; the caller may try
    /// another production. Nothing was consumed, nothing was recorded.
    NoMatch,
    /// The production started but could not complete; a diagnostic has
    /// already been recorded.
    Failed,
}

impl Prod {
    #[cfg(test)]
    pub(crate) fn node(self) -> Option<NodeId> {
        match self {
            Self::Node(id) => Some(id),
            Self::NoMatch | Self::Failed => None,
        }
    }
}

/// A transient owner of one parse: token cursor, node arena, diagnostics.
pub struct Parser {
    pub(crate) cursor: TokenCursor,
    pub(crate) ast: Ast,
    pub(crate) errors: Vec<ParserError>,
    pub(crate) depth: u32,
    sink: Box<dyn DiagnosticSink>,
}

impl Parser {
    /// Parse a pre-lexed token stream.
    #[must_use]
    pub fn new(tokens: Vec<plotql_ast::Token>) -> Self {
        Self {
            cursor: TokenCursor::new(tokens),
            ast: Ast::new(),
            errors: Vec::new(),
            depth: 0,
            sink: Box::new(TracingSink),
        }
    }

    /// Lex and wrap a query string. Lexical diagnostics are carried over
    /// into the parser's error list and reported through the sink when
    /// parsing begins (so an injected sink sees them too).
    #[must_use]
    pub fn from_sql(sql: &str) -> Self {
        let (tokens, lex_errors) = Lexer::tokenize(sql);
        let mut parser = Self::new(tokens);
        parser.errors = lex_errors;
        parser
    }

    /// Replace the diagnostic sink (the default forwards to `tracing`).
    #[must_use]
    pub fn with_sink(mut self, sink: Box<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Diagnostics recorded so far.
    #[must_use]
    pub fn errors(&self) -> &[ParserError] {
        &self.errors
    }

    /// Parse every top-level statement, consuming the parser and handing the
    /// arena to the caller. An empty error list means success; otherwise the
    /// tree is advisory and may be incomplete.
    pub fn parse_all(mut self) -> (Ast, Vec<ParserError>) {
        debug!(target: "plotql::parser", tokens = self.cursor.len(), "parse start");
        for error in &self.errors {
            self.sink.report(error);
        }
        while !self.cursor.at_eof() {
            if self.cursor.consume_if(TokenKind::Semicolon) {
                continue;
            }
            match self.select_statement() {
                Prod::Node(stmt) => {
                    self.ast.append_child(self.ast.root(), stmt);
                    if !self.cursor.check(TokenKind::Semicolon) && !self.cursor.at_eof() {
                        self.record(
                            ParseErrorKind::TrailingInput,
                            format!(
                                "unexpected {} after statement",
                                self.cursor.peek(0).describe()
                            ),
                        );
                        self.synchronize_statement();
                    }
                }
                Prod::NoMatch | Prod::Failed => self.synchronize_statement(),
            }
        }
        debug!(
            target: "plotql::parser",
            statements = self.ast.statements().len(),
            errors = self.errors.len(),
            "parse complete"
        );
        (self.ast, self.errors)
    }

    // -----------------------------------------------------------------------
    // Expectations and error recording
    // -----------------------------------------------------------------------

    /// Record one diagnostic at the current token and mirror it to the sink.
    pub(crate) fn record(&mut self, kind: ParseErrorKind, message: impl Into<String>) {
        let error = ParserError::new(kind, message, self.cursor.span());
        self.sink.report(&error);
        self.errors.push(error);
    }

    /// If the current token matches, consume and return it; otherwise record
    /// one diagnostic and stay put.
    pub(crate) fn expect(&mut self, kind: TokenKind) -> Option<plotql_ast::Token> {
        if self.cursor.check(kind) {
            Some(self.cursor.consume())
        } else {
            self.record_expectation(kind);
            None
        }
    }

    /// Non-consuming expectation check; records one diagnostic when false.
    pub(crate) fn assert_expectation(&mut self, kind: TokenKind) -> bool {
        if self.cursor.check(kind) {
            true
        } else {
            self.record_expectation(kind);
            false
        }
    }

    fn record_expectation(&mut self, expected: TokenKind) {
        let got = self.cursor.peek(0);
        self.record(
            self.mismatch_kind(),
            format!("expected {}, got {}", expected.describe(), got.describe()),
        );
    }

    /// `UnexpectedEof` when the cursor sits on the sentinel, otherwise
    /// `UnexpectedToken`.
    pub(crate) fn mismatch_kind(&self) -> ParseErrorKind {
        if self.cursor.at_eof() {
            ParseErrorKind::UnexpectedEof
        } else {
            ParseErrorKind::UnexpectedToken
        }
    }

    // -----------------------------------------------------------------------
    // Synchronization
    // -----------------------------------------------------------------------

    /// Skip forward to the start of the next statement: past a `;`, or to a
    /// `SELECT` keyword, or to end of input.
    fn synchronize_statement(&mut self) {
        loop {
            match self.cursor.peek(0) {
                TokenKind::Eof => return,
                TokenKind::Semicolon => {
                    self.cursor.consume();
                    return;
                }
                TokenKind::KwSelect => return,
                _ => {
                    self.cursor.consume();
                }
            }
        }
    }

    /// Skip forward to the next clause keyword, `;`, or end of input, so a
    /// bad expression does not swallow the clauses after it.
    pub(crate) fn synchronize_clause(&mut self) {
        loop {
            match self.cursor.peek(0) {
                TokenKind::Eof
                | TokenKind::Semicolon
                | TokenKind::KwFrom
                | TokenKind::KwWhere
                | TokenKind::KwGroup
                | TokenKind::KwHaving
                | TokenKind::KwOrder
                | TokenKind::KwLimit => return,
                _ => {
                    self.cursor.consume();
                }
            }
        }
    }

    // -----------------------------------------------------------------------
    // SELECT statement
    // -----------------------------------------------------------------------

    /// ```text
    /// select_stmt := SELECT select_list
    ///                [ FROM table_list ] [ WHERE expr ]
    ///                [ GROUP BY expr {, expr} ] [ HAVING expr ]
    ///                [ ORDER BY sort_spec {, sort_spec} ]
    ///                [ LIMIT NUMERIC [ OFFSET NUMERIC ] ]
    /// ```
    fn select_statement(&mut self) -> Prod {
        if !self.assert_expectation(TokenKind::KwSelect) {
            return Prod::NoMatch;
        }
        self.cursor.consume();

        let select = self.ast.alloc(NodeKind::Select);
        let list = self.ast.alloc(NodeKind::SelectList);
        self.ast.append_child(select, list);

        if self.cursor.consume_if(TokenKind::Star) {
            let all = self.ast.alloc(NodeKind::All);
            self.ast.append_child(list, all);
        } else {
            loop {
                match self.select_sublist() {
                    Prod::Node(item) => self.ast.append_child(list, item),
                    Prod::NoMatch => {
                        self.record(
                            self.mismatch_kind(),
                            "expected value expression in select list",
                        );
                        break;
                    }
                    Prod::Failed => break,
                }
                if !self.cursor.consume_if(TokenKind::Comma) {
                    break;
                }
            }
        }

        // A `;` straight after the select list ends the statement; no FROM
        // is required.
        if self.cursor.check(TokenKind::Semicolon) {
            return Prod::Node(select);
        }

        if let Some(from) = self.from_clause() {
            self.ast.append_child(select, from);
        }
        if let Some(filter) = self.where_clause() {
            self.ast.append_child(select, filter);
        }
        if let Some(group) = self.group_by_clause() {
            self.ast.append_child(select, group);
        }
        if let Some(having) = self.having_clause() {
            self.ast.append_child(select, having);
        }
        if let Some(order) = self.order_by_clause() {
            self.ast.append_child(select, order);
        }
        if let Some(limit) = self.limit_clause() {
            self.ast.append_child(select, limit);
        }

        Prod::Node(select)
    }

    /// `select_sublist := IDENT '.' '*' | expr [ AS IDENT ]`
    fn select_sublist(&mut self) -> Prod {
        // table.* wildcard; only recognized here, not inside expressions.
        if self.cursor.check(TokenKind::Id)
            && self.cursor.peek(1) == TokenKind::Dot
            && self.cursor.peek(2) == TokenKind::Star
        {
            let table = self.cursor.consume();
            self.cursor.consume(); // '.'
            self.cursor.consume(); // '*'
            return Prod::Node(self.ast.alloc_with_token(NodeKind::All, table));
        }

        match self.expr(0) {
            Prod::Node(value) => {
                let derived = self.ast.alloc(NodeKind::DerivedColumn);
                self.ast.append_child(derived, value);
                if self.cursor.consume_if(TokenKind::KwAs) {
                    if let Some(alias) = self.expect(TokenKind::Id) {
                        let name = self.ast.alloc_with_token(NodeKind::ColumnName, alias);
                        self.ast.append_child(derived, name);
                    }
                }
                Prod::Node(derived)
            }
            other => other,
        }
    }

    /// `FROM table {, table}` — absent keyword means no clause.
    fn from_clause(&mut self) -> Option<NodeId> {
        if !self.cursor.consume_if(TokenKind::KwFrom) {
            return None;
        }
        let clause = self.ast.alloc(NodeKind::From);
        loop {
            if let Some(name) = self.expect(TokenKind::Id) {
                let table = self.ast.alloc_with_token(NodeKind::TableName, name);
                self.ast.append_child(clause, table);
            } else {
                self.synchronize_clause();
                break;
            }
            if !self.cursor.consume_if(TokenKind::Comma) {
                break;
            }
        }
        if self.ast.children(clause).is_empty() {
            None
        } else {
            Some(clause)
        }
    }

    fn where_clause(&mut self) -> Option<NodeId> {
        self.expr_clause(TokenKind::KwWhere, NodeKind::Where)
    }

    fn having_clause(&mut self) -> Option<NodeId> {
        self.expr_clause(TokenKind::KwHaving, NodeKind::Having)
    }

    /// Shared shape of WHERE and HAVING: keyword plus one expression.
    fn expr_clause(&mut self, keyword: TokenKind, node: NodeKind) -> Option<NodeId> {
        if !self.cursor.consume_if(keyword) {
            return None;
        }
        match self.expr(0) {
            Prod::Node(expr) => {
                let clause = self.ast.alloc(node);
                self.ast.append_child(clause, expr);
                Some(clause)
            }
            Prod::NoMatch => {
                self.record(
                    self.mismatch_kind(),
                    format!("expected expression after {}", keyword.describe()),
                );
                self.synchronize_clause();
                None
            }
            Prod::Failed => {
                self.synchronize_clause();
                None
            }
        }
    }

    /// `GROUP BY expr {, expr}`
    fn group_by_clause(&mut self) -> Option<NodeId> {
        if !self.cursor.consume_if(TokenKind::KwGroup) {
            return None;
        }
        self.expect(TokenKind::KwBy);
        let clause = self.ast.alloc(NodeKind::GroupBy);
        loop {
            match self.expr(0) {
                Prod::Node(expr) => self.ast.append_child(clause, expr),
                Prod::NoMatch => {
                    self.record(self.mismatch_kind(), "expected expression in GROUP BY");
                    break;
                }
                Prod::Failed => break,
            }
            if !self.cursor.consume_if(TokenKind::Comma) {
                break;
            }
        }
        if self.ast.children(clause).is_empty() {
            self.synchronize_clause();
            None
        } else {
            Some(clause)
        }
    }

    /// `ORDER BY sort_spec {, sort_spec}` where
    /// `sort_spec := expr [ ASC | DESC ]`.
    fn order_by_clause(&mut self) -> Option<NodeId> {
        if !self.cursor.consume_if(TokenKind::KwOrder) {
            return None;
        }
        self.expect(TokenKind::KwBy);
        let clause = self.ast.alloc(NodeKind::OrderBy);
        loop {
            match self.expr(0) {
                Prod::Node(expr) => {
                    let spec = self.ast.alloc(NodeKind::SortSpec);
                    self.ast.append_child(spec, expr);
                    if matches!(
                        self.cursor.peek(0),
                        TokenKind::KwAsc | TokenKind::KwDesc
                    ) {
                        let direction = self.cursor.consume();
                        self.ast.set_token(spec, direction);
                    }
                    self.ast.append_child(clause, spec);
                }
                Prod::NoMatch => {
                    self.record(self.mismatch_kind(), "expected expression in ORDER BY");
                    break;
                }
                Prod::Failed => break,
            }
            if !self.cursor.consume_if(TokenKind::Comma) {
                break;
            }
        }
        if self.ast.children(clause).is_empty() {
            self.synchronize_clause();
            None
        } else {
            Some(clause)
        }
    }

    /// `LIMIT NUMERIC [ OFFSET NUMERIC ]`
    fn limit_clause(&mut self) -> Option<NodeId> {
        if !self.cursor.consume_if(TokenKind::KwLimit) {
            return None;
        }
        let Some(count) = self.expect(TokenKind::Numeric) else {
            self.synchronize_clause();
            return None;
        };
        let clause = self.ast.alloc_with_token(NodeKind::Limit, count);
        if self.cursor.consume_if(TokenKind::KwOffset) {
            if let Some(offset) = self.expect(TokenKind::Numeric) {
                let node = self.ast.alloc_with_token(NodeKind::Offset, offset);
                self.ast.append_child(clause, node);
            }
        }
        Some(clause)
    }
}

// ===========================================================================
// Tests
// ===========================================================================
