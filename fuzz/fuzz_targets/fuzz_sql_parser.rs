#![no_main]

//! Fuzz the whole parser pipeline with arbitrary byte input.
//!
//! The parser must never panic on any input. It may return diagnostics, but
//! it must do so gracefully. This catches panics in the recursive descent
//! parser, the Pratt expression parser, error-recovery synchronization, and
//! the tree printers.

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Only fuzz valid UTF-8 — the parser expects &str input.
    let Ok(sql) = std::str::from_utf8(data) else {
        return;
    };

    // Limit input size to avoid excessive runtime on deep nesting.
    if sql.len() > 4096 {
        return;
    }

    let (ast, _errors) = plotql_parser::Parser::from_sql(sql).parse_all();

    // The printers must be total over whatever tree came back, including
    // partial trees from failed parses.
    let _ = ast.debug_string();
    let _ = ast.to_sql();
});
