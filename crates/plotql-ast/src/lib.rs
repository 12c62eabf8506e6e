//! AST node types, token vocabulary, and the node arena for PlotQL.
//!
//! The parser produces a flat [`Ast`] arena in which every node is an
//! [`AstNode`] addressed by [`NodeId`]. Children are ordered indices into the
//! arena, which keeps the tree cheap to clone and gives downstream passes
//! stable node identities. Nodes that carry source text (literals,
//! identifiers, sort directions, limits) own a copy of their originating
//! [`Token`].

mod display;

use std::fmt;

// ---------------------------------------------------------------------------
// Span — source location tracking
// ---------------------------------------------------------------------------

/// A byte-offset range into the original query text.
///
/// Half-open: `start` is inclusive, `end` exclusive. Every token carries a
/// span so diagnostics can point back at the exact source location.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    /// Byte offset of the first character (inclusive).
    pub start: u32,
    /// Byte offset one past the last character (exclusive).
    pub end: u32,
}

impl Span {
    /// Create a new span from start (inclusive) to end (exclusive).
    #[must_use]
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// A zero-length span at position 0, used as a placeholder.
    pub const ZERO: Self = Self { start: 0, end: 0 };

    /// Merge two spans into one that covers both.
    #[must_use]
    pub const fn merge(self, other: Self) -> Self {
        let start = if self.start < other.start {
            self.start
        } else {
            other.start
        };
        let end = if self.end > other.end {
            self.end
        } else {
            other.end
        };
        Self { start, end }
    }

    /// Length in bytes.
    #[must_use]
    pub const fn len(self) -> u32 {
        self.end - self.start
    }

    /// Whether the span is empty.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.start == self.end
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

// ---------------------------------------------------------------------------
// Tokens
// ---------------------------------------------------------------------------

/// The closed set of token kinds the lexer produces.
///
/// Keywords are reserved and case-insensitive. `KwDistinct` and `KwAll` are
/// reserved for the set-quantifier position but not yet accepted by the
/// grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Keywords
    KwSelect,
    KwFrom,
    KwWhere,
    KwGroup,
    KwBy,
    KwHaving,
    KwOrder,
    KwAsc,
    KwDesc,
    KwLimit,
    KwOffset,
    KwAs,
    KwAnd,
    KwOr,
    KwNot,
    KwTrue,
    KwFalse,
    KwDiv,
    KwMod,
    KwDistinct,
    KwAll,

    // Identifiers and literals
    Id,
    Numeric,
    String,

    // Punctuation
    LeftParen,
    RightParen,
    Comma,
    Semicolon,
    Dot,
    Star,
    Plus,
    Minus,
    Slash,
    Percent,
    Caret,
    Eq,
    Bang,

    /// End-of-input sentinel; always the last token in a stream.
    Eof,
}

impl TokenKind {
    /// Map an already-uppercased word to its keyword kind, if reserved.
    #[must_use]
    pub fn keyword(word: &str) -> Option<Self> {
        match word {
            "SELECT" => Some(Self::KwSelect),
            "FROM" => Some(Self::KwFrom),
            "WHERE" => Some(Self::KwWhere),
            "GROUP" => Some(Self::KwGroup),
            "BY" => Some(Self::KwBy),
            "HAVING" => Some(Self::KwHaving),
            "ORDER" => Some(Self::KwOrder),
            "ASC" => Some(Self::KwAsc),
            "DESC" => Some(Self::KwDesc),
            "LIMIT" => Some(Self::KwLimit),
            "OFFSET" => Some(Self::KwOffset),
            "AS" => Some(Self::KwAs),
            "AND" => Some(Self::KwAnd),
            "OR" => Some(Self::KwOr),
            "NOT" => Some(Self::KwNot),
            "TRUE" => Some(Self::KwTrue),
            "FALSE" => Some(Self::KwFalse),
            "DIV" => Some(Self::KwDiv),
            "MOD" => Some(Self::KwMod),
            "DISTINCT" => Some(Self::KwDistinct),
            "ALL" => Some(Self::KwAll),
            _ => None,
        }
    }

    /// Human-readable description, used in diagnostics.
    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            Self::KwSelect => "SELECT",
            Self::KwFrom => "FROM",
            Self::KwWhere => "WHERE",
            Self::KwGroup => "GROUP",
            Self::KwBy => "BY",
            Self::KwHaving => "HAVING",
            Self::KwOrder => "ORDER",
            Self::KwAsc => "ASC",
            Self::KwDesc => "DESC",
            Self::KwLimit => "LIMIT",
            Self::KwOffset => "OFFSET",
            Self::KwAs => "AS",
            Self::KwAnd => "AND",
            Self::KwOr => "OR",
            Self::KwNot => "NOT",
            Self::KwTrue => "TRUE",
            Self::KwFalse => "FALSE",
            Self::KwDiv => "DIV",
            Self::KwMod => "MOD",
            Self::KwDistinct => "DISTINCT",
            Self::KwAll => "ALL",
            Self::Id => "identifier",
            Self::Numeric => "numeric literal",
            Self::String => "string literal",
            Self::LeftParen => "'('",
            Self::RightParen => "')'",
            Self::Comma => "','",
            Self::Semicolon => "';'",
            Self::Dot => "'.'",
            Self::Star => "'*'",
            Self::Plus => "'+'",
            Self::Minus => "'-'",
            Self::Slash => "'/'",
            Self::Percent => "'%'",
            Self::Caret => "'^'",
            Self::Eq => "'='",
            Self::Bang => "'!'",
            Self::Eof => "end of input",
        }
    }

    /// Whether this kind is a reserved keyword.
    #[must_use]
    pub const fn is_keyword(self) -> bool {
        matches!(
            self,
            Self::KwSelect
                | Self::KwFrom
                | Self::KwWhere
                | Self::KwGroup
                | Self::KwBy
                | Self::KwHaving
                | Self::KwOrder
                | Self::KwAsc
                | Self::KwDesc
                | Self::KwLimit
                | Self::KwOffset
                | Self::KwAs
                | Self::KwAnd
                | Self::KwOr
                | Self::KwNot
                | Self::KwTrue
                | Self::KwFalse
                | Self::KwDiv
                | Self::KwMod
                | Self::KwDistinct
                | Self::KwAll
        )
    }
}

/// A single lexed token: kind, source text, and source span.
///
/// For string literals `text` holds the unescaped content; for everything
/// else it is the raw lexeme as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub span: Span,
}

impl Token {
    #[must_use]
    pub fn new(kind: TokenKind, text: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
        }
    }

    /// The end-of-input sentinel at byte offset `at`.
    #[must_use]
    pub fn eof(at: u32) -> Self {
        Self {
            kind: TokenKind::Eof,
            text: String::new(),
            span: Span::new(at, at),
        }
    }
}

// ---------------------------------------------------------------------------
// AST nodes
// ---------------------------------------------------------------------------

/// The closed set of AST node kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Root,
    Select,
    SelectList,
    All,
    DerivedColumn,
    From,
    Where,
    GroupBy,
    Having,
    OrderBy,
    SortSpec,
    Limit,
    Offset,
    TableName,
    ColumnName,
    Literal,
    MethodCall,
    NegateExpr,
    EqExpr,
    AndExpr,
    OrExpr,
    AddExpr,
    SubExpr,
    MulExpr,
    DivExpr,
    ModExpr,
    PowExpr,
}

impl NodeKind {
    /// Stable display name, used by the debug printer.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Root => "Root",
            Self::Select => "Select",
            Self::SelectList => "SelectList",
            Self::All => "All",
            Self::DerivedColumn => "DerivedColumn",
            Self::From => "From",
            Self::Where => "Where",
            Self::GroupBy => "GroupBy",
            Self::Having => "Having",
            Self::OrderBy => "OrderBy",
            Self::SortSpec => "SortSpec",
            Self::Limit => "Limit",
            Self::Offset => "Offset",
            Self::TableName => "TableName",
            Self::ColumnName => "ColumnName",
            Self::Literal => "Literal",
            Self::MethodCall => "MethodCall",
            Self::NegateExpr => "NegateExpr",
            Self::EqExpr => "EqExpr",
            Self::AndExpr => "AndExpr",
            Self::OrExpr => "OrExpr",
            Self::AddExpr => "AddExpr",
            Self::SubExpr => "SubExpr",
            Self::MulExpr => "MulExpr",
            Self::DivExpr => "DivExpr",
            Self::ModExpr => "ModExpr",
            Self::PowExpr => "PowExpr",
        }
    }

    /// Whether this kind is a binary operator node (exactly two children).
    #[must_use]
    pub const fn is_binary_op(self) -> bool {
        matches!(
            self,
            Self::EqExpr
                | Self::AndExpr
                | Self::OrExpr
                | Self::AddExpr
                | Self::SubExpr
                | Self::MulExpr
                | Self::DivExpr
                | Self::ModExpr
                | Self::PowExpr
        )
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Index of a node inside an [`Ast`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    /// The root node; every arena has one at index 0.
    pub const ROOT: Self = Self(0);

    #[must_use]
    const fn index(self) -> usize {
        self.0 as usize
    }
}

/// One node of the tree: kind, optional originating token, ordered children.
#[derive(Debug, Clone, PartialEq)]
pub struct AstNode {
    pub kind: NodeKind,
    pub token: Option<Token>,
    pub children: Vec<NodeId>,
}

/// The node arena. Owns every [`AstNode`]; node 0 is always the root.
///
/// A partial parse leaves the tree in a well-typed state: nodes that a failed
/// production allocated but never attached are simply unreachable from the
/// root.
#[derive(Debug, Clone, PartialEq)]
pub struct Ast {
    nodes: Vec<AstNode>,
}

impl Ast {
    /// A fresh arena containing only the root node.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![AstNode {
                kind: NodeKind::Root,
                token: None,
                children: Vec::new(),
            }],
        }
    }

    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Allocate a new node with no token and no children.
    pub fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(u32::try_from(self.nodes.len()).unwrap_or(u32::MAX));
        self.nodes.push(AstNode {
            kind,
            token: None,
            children: Vec::new(),
        });
        id
    }

    /// Allocate a new node carrying a copy of its originating token.
    pub fn alloc_with_token(&mut self, kind: NodeKind, token: Token) -> NodeId {
        let id = self.alloc(kind);
        self.nodes[id.index()].token = Some(token);
        id
    }

    pub fn set_token(&mut self, id: NodeId, token: Token) {
        self.nodes[id.index()].token = Some(token);
    }

    /// Append `child` to `parent`'s ordered child list.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[parent.index()].children.push(child);
    }

    #[must_use]
    pub fn node(&self, id: NodeId) -> &AstNode {
        &self.nodes[id.index()]
    }

    #[must_use]
    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.nodes[id.index()].kind
    }

    #[must_use]
    pub fn token(&self, id: NodeId) -> Option<&Token> {
        self.nodes[id.index()].token.as_ref()
    }

    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.index()].children
    }

    /// The parsed top-level statements (the root's children).
    #[must_use]
    pub fn statements(&self) -> &[NodeId] {
        self.children(NodeId::ROOT)
    }

    /// Total number of allocated nodes, including the root.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        // The root always exists.
        false
    }

    /// Find the first child of `id` with the given kind.
    #[must_use]
    pub fn child_of_kind(&self, id: NodeId, kind: NodeKind) -> Option<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .find(|&c| self.kind(c) == kind)
    }
}

impl Default for Ast {
    fn default() -> Self {
        Self::new()
    }
}
