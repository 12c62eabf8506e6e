//! Pratt expression parser with a data-driven precedence table.
//!
//! [`Parser::expr`] climbs operator precedence: it parses one atom via
//! `expr_lhs`, then repeatedly folds infix operators whose left binding
//! power beats the caller's minimum. One table row per operator; the only
//! right-associative operator (`^`) gets `rbp = lbp - 1` so that
//! `a ^ b ^ c` groups as `a ^ (b ^ c)`.

use plotql_ast::{NodeId, NodeKind, TokenKind};

use crate::diag::ParseErrorKind;
use crate::limits;
use crate::parser::{Parser, Prod};

// Binding powers: higher binds tighter. Left BP decides whether an operator
// grabs the current lhs; right BP is the minimum passed to the right
// operand's recursive parse.
mod bp {
    pub const OR: u8 = 1;
    pub const AND: u8 = 3;
    pub const EQ: u8 = 6;
    pub const ADD: u8 = 10;
    pub const MUL: u8 = 11;
    pub const POW: u8 = 12;
    // Unary prefix operand minimum: prefixes bind tighter than any infix.
    pub const UNARY: u8 = 12;
}

/// One row of the infix operator table.
struct InfixOp {
    node: NodeKind,
    lbp: u8,
    rbp: u8,
}

const fn infix_op(kind: TokenKind) -> Option<InfixOp> {
    let (node, lbp, rbp) = match kind {
        TokenKind::KwOr => (NodeKind::OrExpr, bp::OR, bp::OR),
        TokenKind::KwAnd => (NodeKind::AndExpr, bp::AND, bp::AND),
        TokenKind::Eq => (NodeKind::EqExpr, bp::EQ, bp::EQ),
        TokenKind::Plus => (NodeKind::AddExpr, bp::ADD, bp::ADD),
        TokenKind::Minus => (NodeKind::SubExpr, bp::ADD, bp::ADD),
        TokenKind::Star => (NodeKind::MulExpr, bp::MUL, bp::MUL),
        TokenKind::Slash | TokenKind::KwDiv => (NodeKind::DivExpr, bp::MUL, bp::MUL),
        TokenKind::Percent | TokenKind::KwMod => (NodeKind::ModExpr, bp::MUL, bp::MUL),
        // Right-associative: recurse one level below our own binding power.
        TokenKind::Caret => (NodeKind::PowExpr, bp::POW, bp::POW - 1),
        _ => return None,
    };
    Some(InfixOp { node, lbp, rbp })
}

impl Parser {
    /// Parse a value expression with the given minimum binding power.
    ///
    /// `NoMatch` means the current token cannot start an expression and
    /// nothing was consumed; `Failed` means an atom or operand was started
    /// but could not be completed (diagnostic already recorded).
    pub(crate) fn expr(&mut self, min_bp: u8) -> Prod {
        if self.depth >= limits::MAX_EXPR_DEPTH {
            self.record(
                ParseErrorKind::ExpressionTooDeep,
                format!(
                    "expression tree too deep (max {})",
                    limits::MAX_EXPR_DEPTH
                ),
            );
            return Prod::Failed;
        }
        self.depth += 1;
        let result = self.expr_inner(min_bp);
        self.depth -= 1;
        result
    }

    fn expr_inner(&mut self, min_bp: u8) -> Prod {
        let mut lhs = match self.expr_lhs() {
            Prod::Node(node) => node,
            other => return other,
        };
        while let Some(folded) = self.binary_expr(lhs, min_bp) {
            lhs = folded;
        }
        Prod::Node(lhs)
    }

    /// Parse one atom: literal, column reference, qualified column, function
    /// call, parenthesized expression, or unary prefix.
    fn expr_lhs(&mut self) -> Prod {
        match self.cursor.peek(0) {
            // Parenthesized value expression; parentheses leave no node.
            TokenKind::LeftParen => {
                self.cursor.consume();
                match self.expr(0) {
                    Prod::Node(inner) => {
                        if !self.cursor.consume_if(TokenKind::RightParen) {
                            self.record(
                                ParseErrorKind::UnclosedParen,
                                format!(
                                    "expected ')', got {}",
                                    self.cursor.peek(0).describe()
                                ),
                            );
                        }
                        Prod::Node(inner)
                    }
                    Prod::NoMatch => {
                        self.record(self.mismatch_kind(), "expected expression after '('");
                        self.cursor.consume_if(TokenKind::RightParen);
                        Prod::Failed
                    }
                    Prod::Failed => {
                        self.cursor.consume_if(TokenKind::RightParen);
                        Prod::Failed
                    }
                }
            }

            // Negated value expression: `!`, `-`, and NOT share one node.
            TokenKind::Bang | TokenKind::Minus | TokenKind::KwNot => {
                let op = self.cursor.consume();
                let node = self.ast.alloc_with_token(NodeKind::NegateExpr, op);
                match self.expr(bp::UNARY) {
                    Prod::Node(operand) => {
                        self.ast.append_child(node, operand);
                        Prod::Node(node)
                    }
                    Prod::NoMatch => {
                        self.record(
                            self.mismatch_kind(),
                            "expected expression after unary operator",
                        );
                        Prod::Failed
                    }
                    Prod::Failed => Prod::Failed,
                }
            }

            // Literal expression.
            TokenKind::KwTrue | TokenKind::KwFalse | TokenKind::Numeric | TokenKind::String => {
                let token = self.cursor.consume();
                Prod::Node(self.ast.alloc_with_token(NodeKind::Literal, token))
            }

            TokenKind::Id => {
                // table_name.column_name
                if self.cursor.peek(1) == TokenKind::Dot {
                    let table_tok = self.cursor.consume();
                    self.cursor.consume(); // '.'
                    let table = self.ast.alloc_with_token(NodeKind::TableName, table_tok);
                    if let Some(column) = self.expect(TokenKind::Id) {
                        let name = self.ast.alloc_with_token(NodeKind::ColumnName, column);
                        self.ast.append_child(table, name);
                    }
                    return Prod::Node(table);
                }

                if self.cursor.peek(1) == TokenKind::LeftParen {
                    return self.method_call();
                }

                // Simple column name.
                let token = self.cursor.consume();
                Prod::Node(self.ast.alloc_with_token(NodeKind::ColumnName, token))
            }

            _ => Prod::NoMatch,
        }
    }

    /// `ident '(' [ arg {, arg} ] ')'` where an arg is an expression or a
    /// bare `*` (as in `count(*)`).
    fn method_call(&mut self) -> Prod {
        let name = self.cursor.consume();
        let name_text = name.text.clone();
        let node = self.ast.alloc_with_token(NodeKind::MethodCall, name);
        self.cursor.consume(); // '(' — guaranteed by the caller's lookahead

        if self.cursor.consume_if(TokenKind::RightParen) {
            return Prod::Node(node);
        }

        loop {
            if self.cursor.check(TokenKind::Star)
                && matches!(
                    self.cursor.peek(1),
                    TokenKind::RightParen | TokenKind::Comma
                )
            {
                self.cursor.consume();
                let all = self.ast.alloc(NodeKind::All);
                self.ast.append_child(node, all);
            } else {
                match self.expr(0) {
                    Prod::Node(arg) => self.ast.append_child(node, arg),
                    Prod::NoMatch => {
                        self.record(
                            self.mismatch_kind(),
                            format!("expected argument in call to {name_text}"),
                        );
                        break;
                    }
                    Prod::Failed => break,
                }
            }
            if !self.cursor.consume_if(TokenKind::Comma) {
                break;
            }
        }

        if self.ast.children(node).len() > limits::MAX_FUNCTION_ARG {
            self.record(
                ParseErrorKind::TooManyArguments,
                format!("too many arguments to function {name_text}"),
            );
        }
        if !self.cursor.consume_if(TokenKind::RightParen) {
            self.record(
                ParseErrorKind::UnclosedParen,
                format!("expected ')' to close call to {name_text}"),
            );
        }
        Prod::Node(node)
    }

    /// Try to fold one infix operator onto `lhs`. Returns `None` when the
    /// current token is not an operator or binds no tighter than `min_bp`;
    /// the caller then keeps `lhs` as-is.
    fn binary_expr(&mut self, lhs: NodeId, min_bp: u8) -> Option<NodeId> {
        let op = infix_op(self.cursor.peek(0))?;
        if min_bp >= op.lbp {
            return None;
        }
        let op_token = self.cursor.consume();
        match self.expr(op.rbp) {
            Prod::Node(rhs) => {
                let node = self.ast.alloc_with_token(op.node, op_token);
                self.ast.append_child(node, lhs);
                self.ast.append_child(node, rhs);
                Some(node)
            }
            Prod::NoMatch => {
                self.record(
                    self.mismatch_kind(),
                    format!("expected expression after '{}'", op_token.text),
                );
                None
            }
            Prod::Failed => None,
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================
