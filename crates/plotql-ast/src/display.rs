//! Tree rendering: an indented debug dump and a canonical SQL writer.
//!
//! `to_sql` emits fully parenthesized expressions so that reparsing the
//! output yields a structurally identical tree.

use std::fmt::{self, Write as _};

use crate::{Ast, NodeId, NodeKind, TokenKind};

impl Ast {
    /// Render the tree one node per line with 2-space indentation, showing
    /// the node kind and, when present, the token lexeme.
    #[must_use]
    pub fn debug_string(&self) -> String {
        let mut out = String::new();
        self.debug_node(self.root(), 0, &mut out);
        out
    }

    fn debug_node(&self, id: NodeId, depth: usize, out: &mut String) {
        for _ in 0..depth {
            out.push_str("  ");
        }
        out.push_str(self.kind(id).name());
        if let Some(tok) = self.token(id) {
            let _ = write!(out, " \"{}\"", tok.text);
        }
        out.push('\n');
        for &child in self.children(id) {
            self.debug_node(child, depth + 1, out);
        }
    }

    /// Render the parsed statements back to canonical SQL.
    ///
    /// Expressions come out fully parenthesized; string literals are
    /// re-escaped; quoted identifiers keep their backticks. Reparsing the
    /// result produces the same tree shape.
    #[must_use]
    pub fn to_sql(&self) -> String {
        let mut out = String::new();
        for (i, &stmt) in self.statements().iter().enumerate() {
            if i > 0 {
                out.push_str(";\n");
            }
            self.write_statement(stmt, &mut out);
        }
        out
    }

    fn write_statement(&self, id: NodeId, out: &mut String) {
        if self.kind(id) != NodeKind::Select {
            return;
        }
        out.push_str("SELECT");
        for &child in self.children(id) {
            match self.kind(child) {
                NodeKind::SelectList => self.write_select_list(child, out),
                NodeKind::From => self.write_from(child, out),
                NodeKind::Where => {
                    out.push_str(" WHERE ");
                    self.write_clause_exprs(child, out);
                }
                NodeKind::GroupBy => {
                    out.push_str(" GROUP BY ");
                    self.write_clause_exprs(child, out);
                }
                NodeKind::Having => {
                    out.push_str(" HAVING ");
                    self.write_clause_exprs(child, out);
                }
                NodeKind::OrderBy => self.write_order_by(child, out),
                NodeKind::Limit => self.write_limit(child, out),
                _ => {}
            }
        }
    }

    fn write_select_list(&self, id: NodeId, out: &mut String) {
        for (i, &item) in self.children(id).iter().enumerate() {
            out.push_str(if i == 0 { " " } else { ", " });
            match self.kind(item) {
                NodeKind::All => {
                    if let Some(tok) = self.token(item) {
                        write_identifier(&tok.text, out);
                        out.push_str(".*");
                    } else {
                        out.push('*');
                    }
                }
                NodeKind::DerivedColumn => {
                    let children = self.children(item);
                    if let Some(&value) = children.first() {
                        self.write_expr(value, out);
                    }
                    if let Some(&alias) = children.get(1) {
                        out.push_str(" AS ");
                        if let Some(tok) = self.token(alias) {
                            write_identifier(&tok.text, out);
                        }
                    }
                }
                _ => {}
            }
        }
    }

    fn write_from(&self, id: NodeId, out: &mut String) {
        out.push_str(" FROM ");
        for (i, &table) in self.children(id).iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            self.write_expr(table, out);
        }
    }

    fn write_clause_exprs(&self, id: NodeId, out: &mut String) {
        for (i, &expr) in self.children(id).iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            self.write_expr(expr, out);
        }
    }

    fn write_order_by(&self, id: NodeId, out: &mut String) {
        out.push_str(" ORDER BY ");
        for (i, &spec) in self.children(id).iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            if let Some(&expr) = self.children(spec).first() {
                self.write_expr(expr, out);
            }
            match self.token(spec).map(|t| t.kind) {
                Some(TokenKind::KwAsc) => out.push_str(" ASC"),
                Some(TokenKind::KwDesc) => out.push_str(" DESC"),
                _ => {}
            }
        }
    }

    fn write_limit(&self, id: NodeId, out: &mut String) {
        if let Some(tok) = self.token(id) {
            let _ = write!(out, " LIMIT {}", tok.text);
        }
        for &child in self.children(id) {
            if self.kind(child) == NodeKind::Offset {
                if let Some(tok) = self.token(child) {
                    let _ = write!(out, " OFFSET {}", tok.text);
                }
            }
        }
    }

    fn write_expr(&self, id: NodeId, out: &mut String) {
        let kind = self.kind(id);
        match kind {
            NodeKind::Literal => {
                if let Some(tok) = self.token(id) {
                    match tok.kind {
                        TokenKind::String => write_string_literal(&tok.text, out),
                        TokenKind::KwTrue => out.push_str("TRUE"),
                        TokenKind::KwFalse => out.push_str("FALSE"),
                        _ => out.push_str(&tok.text),
                    }
                }
            }
            NodeKind::ColumnName => {
                if let Some(tok) = self.token(id) {
                    write_identifier(&tok.text, out);
                }
            }
            NodeKind::TableName => {
                if let Some(tok) = self.token(id) {
                    write_identifier(&tok.text, out);
                }
                if let Some(&col) = self.children(id).first() {
                    out.push('.');
                    if let Some(tok) = self.token(col) {
                        write_identifier(&tok.text, out);
                    }
                }
            }
            NodeKind::MethodCall => {
                if let Some(tok) = self.token(id) {
                    write_identifier(&tok.text, out);
                }
                out.push('(');
                for (i, &arg) in self.children(id).iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    if self.kind(arg) == NodeKind::All {
                        out.push('*');
                    } else {
                        self.write_expr(arg, out);
                    }
                }
                out.push(')');
            }
            NodeKind::NegateExpr => {
                out.push('(');
                match self.token(id).map(|t| t.kind) {
                    Some(TokenKind::Minus) => out.push('-'),
                    Some(TokenKind::Bang) => out.push('!'),
                    _ => out.push_str("NOT "),
                }
                if let Some(&inner) = self.children(id).first() {
                    self.write_expr(inner, out);
                }
                out.push(')');
            }
            _ if kind.is_binary_op() => {
                let children = self.children(id);
                out.push('(');
                if let Some(&lhs) = children.first() {
                    self.write_expr(lhs, out);
                }
                let _ = write!(out, " {} ", binary_op_sql(kind));
                if let Some(&rhs) = children.get(1) {
                    self.write_expr(rhs, out);
                }
                out.push(')');
            }
            _ => {}
        }
    }
}

impl fmt::Display for Ast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sql())
    }
}

const fn binary_op_sql(kind: NodeKind) -> &'static str {
    match kind {
        NodeKind::EqExpr => "=",
        NodeKind::AndExpr => "AND",
        NodeKind::OrExpr => "OR",
        NodeKind::AddExpr => "+",
        NodeKind::SubExpr => "-",
        NodeKind::MulExpr => "*",
        NodeKind::DivExpr => "/",
        NodeKind::ModExpr => "%",
        NodeKind::PowExpr => "^",
        _ => "?",
    }
}

/// Write an identifier, backtick-quoting it when it is not a plain word or
/// would collide with a reserved keyword.
fn write_identifier(name: &str, out: &mut String) {
    let plain = !name.is_empty()
        && name
            .chars()
            .enumerate()
            .all(|(i, c)| c == '_' || c.is_ascii_alphabetic() || (i > 0 && c.is_ascii_digit()))
        && TokenKind::keyword(&name.to_ascii_uppercase()).is_none();
    if plain {
        out.push_str(name);
    } else {
        out.push('`');
        for c in name.chars() {
            if c == '`' {
                out.push('`');
            }
            out.push(c);
        }
        out.push('`');
    }
}

fn write_string_literal(text: &str, out: &mut String) {
    out.push('\'');
    for c in text.chars() {
        match c {
            '\'' => out.push_str("''"),
            '\\' => out.push_str("\\\\"),
            _ => out.push(c),
        }
    }
    out.push('\'');
}
