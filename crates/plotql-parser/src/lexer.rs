//! Hand-written tokenizer for the PlotQL dialect.
//!
//! [`Lexer::tokenize`] takes a raw query string and produces the full token
//! stream, terminated by a [`TokenKind::Eof`] sentinel, together with any
//! lexical diagnostics. The lexer never fails: malformed input is skipped
//! and recorded, and scanning resumes at the next character, so the parser
//! treats a lexical problem exactly like any other unexpected token.
//!
//! Keywords are case-insensitive. Whitespace, `-- line` comments, and
//! `/* block */` comments are skipped and never appear as tokens.

use plotql_ast::{Span, Token, TokenKind};

use crate::diag::{ParseErrorKind, ParserError};
use crate::limits;

/// A hand-written SQL tokenizer.
pub struct Lexer<'a> {
    input: &'a [u8],
    pos: usize,
    errors: Vec<ParserError>,
}

impl<'a> Lexer<'a> {
    /// Tokenize the entire input.
    ///
    /// The returned vector always ends with [`TokenKind::Eof`]. Lexical
    /// problems come back as diagnostics alongside the tokens that could
    /// still be produced.
    #[must_use]
    pub fn tokenize(input: &str) -> (Vec<Token>, Vec<ParserError>) {
        if input.len() > limits::MAX_SQL_LENGTH {
            let span = Span::new(0, u32::try_from(input.len()).unwrap_or(u32::MAX));
            let error = ParserError::new(
                ParseErrorKind::StatementTooLong,
                format!(
                    "statement too long: {} bytes (max {})",
                    input.len(),
                    limits::MAX_SQL_LENGTH
                ),
                span,
            );
            return (vec![Token::eof(0)], vec![error]);
        }

        let mut lexer = Lexer {
            input: input.as_bytes(),
            pos: 0,
            errors: Vec::new(),
        };
        let mut tokens = Vec::new();
        loop {
            lexer.skip_trivia();
            let Some(ch) = lexer.peek() else {
                break;
            };
            if let Some(token) = lexer.scan_token(ch) {
                tokens.push(token);
            }
        }
        tokens.push(Token::eof(lexer.offset()));
        (tokens, lexer.errors)
    }

    // -- helpers ------------------------------------------------------------

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.input.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<u8> {
        let ch = self.input.get(self.pos).copied()?;
        self.pos += 1;
        Some(ch)
    }

    fn offset(&self) -> u32 {
        u32::try_from(self.pos).unwrap_or(u32::MAX)
    }

    fn span_from(&self, start: usize) -> Span {
        Span::new(u32::try_from(start).unwrap_or(u32::MAX), self.offset())
    }

    fn lexeme(&self, start: usize) -> String {
        String::from_utf8_lossy(&self.input[start..self.pos]).into_owned()
    }

    fn record(&mut self, kind: ParseErrorKind, message: impl Into<String>, start: usize) {
        self.errors
            .push(ParserError::new(kind, message, self.span_from(start)));
    }

    /// Skip whitespace and comments until the next token byte.
    fn skip_trivia(&mut self) {
        loop {
            while self.peek().is_some_and(|c| c.is_ascii_whitespace()) {
                self.pos += 1;
            }
            if self.peek() == Some(b'-') && self.peek_at(1) == Some(b'-') {
                self.pos += 2;
                while let Some(ch) = self.advance() {
                    if ch == b'\n' {
                        break;
                    }
                }
                continue;
            }
            if self.peek() == Some(b'/') && self.peek_at(1) == Some(b'*') {
                let start = self.pos;
                self.pos += 2;
                loop {
                    match self.peek() {
                        None => {
                            self.record(
                                ParseErrorKind::MalformedLiteral,
                                "unterminated block comment",
                                start,
                            );
                            break;
                        }
                        Some(b'*') if self.peek_at(1) == Some(b'/') => {
                            self.pos += 2;
                            break;
                        }
                        _ => {
                            self.pos += 1;
                        }
                    }
                }
                continue;
            }
            break;
        }
    }

    // -- main scanner -------------------------------------------------------

    /// Scan one token starting at `ch`. Returns `None` when the input at the
    /// cursor was malformed; the error has been recorded and the cursor has
    /// moved past the bad bytes.
    fn scan_token(&mut self, ch: u8) -> Option<Token> {
        if ch == b'\'' || ch == b'"' {
            return self.read_string_literal(ch);
        }
        if ch.is_ascii_digit() {
            return self.read_number();
        }
        if ch == b'.' && self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) {
            return self.read_number();
        }
        if ch.is_ascii_alphabetic() || ch == b'_' {
            return Some(self.read_identifier_or_keyword());
        }
        if ch == b'`' {
            return self.read_quoted_identifier();
        }
        self.read_operator(ch)
    }

    // -- literal readers ----------------------------------------------------

    fn read_string_literal(&mut self, quote: u8) -> Option<Token> {
        let start = self.pos;
        self.advance(); // consume opening quote
        let mut text = Vec::new();
        loop {
            match self.advance() {
                None => {
                    self.record(
                        ParseErrorKind::MalformedLiteral,
                        "unterminated string literal",
                        start,
                    );
                    return None;
                }
                Some(c) if c == quote => {
                    // Doubled quote escapes itself.
                    if self.peek() == Some(quote) {
                        self.advance();
                        text.push(quote);
                    } else {
                        break;
                    }
                }
                Some(b'\\') => match self.advance() {
                    None => {
                        self.record(
                            ParseErrorKind::MalformedLiteral,
                            "unterminated string literal",
                            start,
                        );
                        return None;
                    }
                    Some(b'n') => text.push(b'\n'),
                    Some(b'r') => text.push(b'\r'),
                    Some(b't') => text.push(b'\t'),
                    Some(b'0') => text.push(0),
                    Some(c) => text.push(c),
                },
                Some(c) => text.push(c),
            }
        }
        Some(Token::new(
            TokenKind::String,
            String::from_utf8_lossy(&text).into_owned(),
            self.span_from(start),
        ))
    }

    fn read_number(&mut self) -> Option<Token> {
        let start = self.pos;

        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }

        // Fractional part; also covers a leading-dot literal like `.5` and a
        // trailing-dot literal like `5.`.
        if self.peek() == Some(b'.') {
            self.advance();
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        // Exponent part.
        if matches!(self.peek(), Some(b'e' | b'E')) {
            let mut lookahead = 1;
            if matches!(self.peek_at(1), Some(b'+' | b'-')) {
                lookahead = 2;
            }
            if self.peek_at(lookahead).is_some_and(|c| c.is_ascii_digit()) {
                self.pos += lookahead;
                while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                    self.advance();
                }
            } else {
                // `1e` or `1e+` with no digits: consume the marker and fail.
                self.pos += lookahead;
                self.record(
                    ParseErrorKind::MalformedLiteral,
                    "expected digit after exponent in numeric literal",
                    start,
                );
                return None;
            }
        }

        Some(Token::new(
            TokenKind::Numeric,
            self.lexeme(start),
            self.span_from(start),
        ))
    }

    fn read_identifier_or_keyword(&mut self) -> Token {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == b'_')
        {
            self.advance();
        }
        let word = self.lexeme(start);
        let span = self.span_from(start);
        match TokenKind::keyword(&word.to_ascii_uppercase()) {
            Some(kind) => Token::new(kind, word, span),
            None => Token::new(TokenKind::Id, word, span),
        }
    }

    fn read_quoted_identifier(&mut self) -> Option<Token> {
        let start = self.pos;
        self.advance(); // consume opening backtick
        let mut name = Vec::new();
        loop {
            match self.advance() {
                None => {
                    self.record(
                        ParseErrorKind::MalformedLiteral,
                        "unterminated quoted identifier",
                        start,
                    );
                    return None;
                }
                Some(b'`') => {
                    if self.peek() == Some(b'`') {
                        self.advance();
                        name.push(b'`');
                    } else {
                        break;
                    }
                }
                Some(c) => name.push(c),
            }
        }
        Some(Token::new(
            TokenKind::Id,
            String::from_utf8_lossy(&name).into_owned(),
            self.span_from(start),
        ))
    }

    fn read_operator(&mut self, ch: u8) -> Option<Token> {
        let start = self.pos;
        self.advance();
        let kind = match ch {
            b'(' => TokenKind::LeftParen,
            b')' => TokenKind::RightParen,
            b',' => TokenKind::Comma,
            b';' => TokenKind::Semicolon,
            b'.' => TokenKind::Dot,
            b'*' => TokenKind::Star,
            b'+' => TokenKind::Plus,
            b'-' => TokenKind::Minus,
            b'/' => TokenKind::Slash,
            b'%' => TokenKind::Percent,
            b'^' => TokenKind::Caret,
            b'!' => TokenKind::Bang,
            b'=' => {
                // `==` is accepted as plain equality.
                if self.peek() == Some(b'=') {
                    self.advance();
                }
                TokenKind::Eq
            }
            _ => {
                // Skip the whole UTF-8 character, not just its first byte.
                let width = utf8_width(ch);
                self.pos += width.saturating_sub(1);
                let bad = self.lexeme(start);
                self.record(
                    ParseErrorKind::UnexpectedCharacter,
                    format!("unexpected character: '{bad}'"),
                    start,
                );
                return None;
            }
        };
        Some(Token::new(kind, self.lexeme(start), self.span_from(start)))
    }
}

/// Byte length of the UTF-8 character whose leading byte is `lead`.
const fn utf8_width(lead: u8) -> usize {
    match lead {
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF7 => 4,
        _ => 1,
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(input: &str) -> Vec<Token> {
        let (tokens, errors) = Lexer::tokenize(input);
        assert!(errors.is_empty(), "unexpected lex errors: {errors:?}");
        tokens
    }

    fn kinds(input: &str) -> Vec<TokenKind> {
        lex(input).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn keywords_are_case_insensitive() {
        assert_eq!(
            kinds("select FROM Where"),
            vec![
                TokenKind::KwSelect,
                TokenKind::KwFrom,
                TokenKind::KwWhere,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn keyword_lexeme_preserves_source_spelling() {
        let tokens = lex("select");
        assert_eq!(tokens[0].kind, TokenKind::KwSelect);
        assert_eq!(tokens[0].text, "select");
    }

    #[test]
    fn identifiers_and_quoted_identifiers() {
        let tokens = lex("my_table `weird name` `tick``ed`");
        assert_eq!(tokens[0].kind, TokenKind::Id);
        assert_eq!(tokens[0].text, "my_table");
        assert_eq!(tokens[1].kind, TokenKind::Id);
        assert_eq!(tokens[1].text, "weird name");
        assert_eq!(tokens[2].text, "tick`ed");
    }

    #[test]
    fn numeric_literals_keep_their_lexemes() {
        let tokens = lex("42 3.14 .5 5. 1e10 2.5E-3");
        let texts: Vec<&str> = tokens
            .iter()
            .take_while(|t| t.kind == TokenKind::Numeric)
            .map(|t| t.text.as_str())
            .collect();
        assert_eq!(texts, vec!["42", "3.14", ".5", "5.", "1e10", "2.5E-3"]);
    }

    #[test]
    fn string_literals_unescape() {
        let tokens = lex(r#"'hello' 'it''s' 'a\nb' "double""#);
        assert_eq!(tokens[0].text, "hello");
        assert_eq!(tokens[1].text, "it's");
        assert_eq!(tokens[2].text, "a\nb");
        assert_eq!(tokens[3].kind, TokenKind::String);
        assert_eq!(tokens[3].text, "double");
    }

    #[test]
    fn punctuation_and_operators() {
        assert_eq!(
            kinds("( ) , ; . * + - / % ^ = !"),
            vec![
                TokenKind::LeftParen,
                TokenKind::RightParen,
                TokenKind::Comma,
                TokenKind::Semicolon,
                TokenKind::Dot,
                TokenKind::Star,
                TokenKind::Plus,
                TokenKind::Minus,
                TokenKind::Slash,
                TokenKind::Percent,
                TokenKind::Caret,
                TokenKind::Eq,
                TokenKind::Bang,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn double_equals_is_one_token() {
        let tokens = lex("a == b");
        assert_eq!(tokens[1].kind, TokenKind::Eq);
        assert_eq!(tokens[1].text, "==");
        assert_eq!(tokens[2].kind, TokenKind::Id);
    }

    #[test]
    fn spans_are_half_open_byte_ranges() {
        let tokens = lex("SELECT x");
        assert_eq!(tokens[0].span, Span::new(0, 6));
        assert_eq!(tokens[1].span, Span::new(7, 8));
        assert_eq!(tokens[2].span, Span::new(8, 8)); // Eof
    }

    #[test]
    fn comments_are_skipped() {
        assert_eq!(
            kinds("SELECT -- trailing\n 1 /* block */ + 2"),
            vec![
                TokenKind::KwSelect,
                TokenKind::Numeric,
                TokenKind::Plus,
                TokenKind::Numeric,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn unterminated_string_records_error_and_continues() {
        let (tokens, errors) = Lexer::tokenize("SELECT 'oops");
        assert_eq!(tokens[0].kind, TokenKind::KwSelect);
        assert_eq!(tokens.last().unwrap().kind, TokenKind::Eof);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ParseErrorKind::MalformedLiteral);
    }

    #[test]
    fn unterminated_block_comment_records_error() {
        let (tokens, errors) = Lexer::tokenize("1 /* oops");
        assert_eq!(tokens[0].kind, TokenKind::Numeric);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ParseErrorKind::MalformedLiteral);
    }

    #[test]
    fn stray_characters_are_skipped_with_error() {
        let (tokens, errors) = Lexer::tokenize("a < b @ c");
        let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![TokenKind::Id, TokenKind::Id, TokenKind::Id, TokenKind::Eof]
        );
        assert_eq!(errors.len(), 2);
        assert!(
            errors
                .iter()
                .all(|e| e.kind == ParseErrorKind::UnexpectedCharacter)
        );
    }

    #[test]
    fn stray_multibyte_character_is_skipped_whole() {
        let (tokens, errors) = Lexer::tokenize("1 \u{00e9} 2");
        let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![TokenKind::Numeric, TokenKind::Numeric, TokenKind::Eof]
        );
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn bad_exponent_records_malformed_literal() {
        let (_, errors) = Lexer::tokenize("SELECT 1e");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ParseErrorKind::MalformedLiteral);
    }

    #[test]
    fn reserved_set_quantifiers_lex_as_keywords() {
        assert_eq!(
            kinds("DISTINCT all"),
            vec![TokenKind::KwDistinct, TokenKind::KwAll, TokenKind::Eof]
        );
    }

    #[test]
    fn empty_input_is_just_eof() {
        let (tokens, errors) = Lexer::tokenize("");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Eof);
        assert!(errors.is_empty());
    }

    #[test]
    fn oversized_input_is_rejected_up_front() {
        let big = "x".repeat(limits::MAX_SQL_LENGTH + 1);
        let (tokens, errors) = Lexer::tokenize(&big);
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Eof);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ParseErrorKind::StatementTooLong);
    }

    #[test]
    fn full_select_statement() {
        let tokens = lex("SELECT id, name FROM users WHERE age = 18;");
        let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::KwSelect,
                TokenKind::Id,
                TokenKind::Comma,
                TokenKind::Id,
                TokenKind::KwFrom,
                TokenKind::Id,
                TokenKind::KwWhere,
                TokenKind::Id,
                TokenKind::Eq,
                TokenKind::Numeric,
                TokenKind::Semicolon,
                TokenKind::Eof,
            ]
        );
    }
}
