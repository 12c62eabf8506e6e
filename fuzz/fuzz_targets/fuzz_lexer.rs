#![no_main]

//! Fuzz the tokenizer with arbitrary byte input.
//!
//! The lexer must never panic. It should gracefully handle any input
//! including malformed Unicode sequences, unterminated strings and
//! comments, stray operator characters, and extremely long tokens.

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };

    if input.len() > 8192 {
        return;
    }

    // Tokenize must never panic, and the stream must end with Eof.
    let (tokens, _errors) = plotql_parser::Lexer::tokenize(input);
    assert_eq!(
        tokens.last().map(|t| t.kind),
        Some(plotql_parser::TokenKind::Eof)
    );

    // Every token must be inspectable without panic.
    for token in &tokens {
        let _ = format!("{:?}", token.kind);
        let _ = token.kind.describe();
        assert!(token.span.start <= token.span.end);
    }
});
