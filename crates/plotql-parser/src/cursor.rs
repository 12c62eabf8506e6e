//! Read-only random-access view over a token stream.
//!
//! The cursor guarantees that lookahead and consume past the end of input are
//! safe: both saturate at the [`TokenKind::Eof`] sentinel, which the cursor
//! appends itself if the stream lacks one.

use plotql_ast::{Span, Token, TokenKind};

/// Positional cursor over an immutable token sequence.
#[derive(Debug, Clone)]
pub struct TokenCursor {
    tokens: Vec<Token>,
    pos: usize,
}

impl TokenCursor {
    /// Wrap a token stream, appending an `Eof` sentinel if absent.
    #[must_use]
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map(|t| t.kind) != Some(TokenKind::Eof) {
            let at = tokens.last().map_or(0, |t| t.span.end);
            tokens.push(Token::eof(at));
        }
        Self { tokens, pos: 0 }
    }

    /// The kind at `current + n`, or `Eof` past the end.
    #[must_use]
    pub fn peek(&self, n: usize) -> TokenKind {
        self.tokens
            .get(self.pos + n)
            .map_or(TokenKind::Eof, |t| t.kind)
    }

    /// The current token; the `Eof` sentinel once the stream is exhausted.
    #[must_use]
    pub fn current(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    /// Whether the current token has the given kind.
    #[must_use]
    pub fn check(&self, kind: TokenKind) -> bool {
        self.peek(0) == kind
    }

    /// Return the current token and advance. Consuming past the end is safe
    /// and keeps returning the `Eof` sentinel.
    pub fn consume(&mut self) -> Token {
        let token = self.current().clone();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    /// If the current token matches, advance and return `true`.
    pub fn consume_if(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.consume();
            true
        } else {
            false
        }
    }

    #[must_use]
    pub fn at_eof(&self) -> bool {
        self.check(TokenKind::Eof)
    }

    /// Span of the current token.
    #[must_use]
    pub fn span(&self) -> Span {
        self.current().span
    }

    /// Total number of tokens, including the sentinel.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        // The sentinel always exists.
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cursor(kinds: &[TokenKind]) -> TokenCursor {
        let tokens = kinds
            .iter()
            .enumerate()
            .map(|(i, &kind)| {
                let at = u32::try_from(i).unwrap();
                Token::new(kind, "", Span::new(at, at + 1))
            })
            .collect();
        TokenCursor::new(tokens)
    }

    #[test]
    fn appends_missing_sentinel() {
        let c = cursor(&[TokenKind::KwSelect]);
        assert_eq!(c.len(), 2);
        assert_eq!(c.peek(1), TokenKind::Eof);
    }

    #[test]
    fn empty_stream_still_has_sentinel() {
        let c = TokenCursor::new(Vec::new());
        assert!(c.at_eof());
        assert_eq!(c.current().kind, TokenKind::Eof);
    }

    #[test]
    fn peek_past_end_returns_eof() {
        let c = cursor(&[TokenKind::KwSelect, TokenKind::Star]);
        assert_eq!(c.peek(0), TokenKind::KwSelect);
        assert_eq!(c.peek(1), TokenKind::Star);
        assert_eq!(c.peek(2), TokenKind::Eof);
        assert_eq!(c.peek(100), TokenKind::Eof);
    }

    #[test]
    fn consume_advances_and_saturates() {
        let mut c = cursor(&[TokenKind::KwSelect, TokenKind::Star]);
        assert_eq!(c.consume().kind, TokenKind::KwSelect);
        assert_eq!(c.consume().kind, TokenKind::Star);
        assert_eq!(c.consume().kind, TokenKind::Eof);
        assert_eq!(c.consume().kind, TokenKind::Eof, "consume past end is safe");
        assert!(c.at_eof());
    }

    #[test]
    fn consume_if_only_advances_on_match() {
        let mut c = cursor(&[TokenKind::Comma, TokenKind::Star]);
        assert!(!c.consume_if(TokenKind::Star));
        assert_eq!(c.peek(0), TokenKind::Comma);
        assert!(c.consume_if(TokenKind::Comma));
        assert_eq!(c.peek(0), TokenKind::Star);
    }

    #[test]
    fn check_compares_current_kind() {
        let c = cursor(&[TokenKind::KwFrom]);
        assert!(c.check(TokenKind::KwFrom));
        assert!(!c.check(TokenKind::KwWhere));
    }
}
