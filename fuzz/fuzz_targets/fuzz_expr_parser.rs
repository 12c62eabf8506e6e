#![no_main]

//! Fuzz the expression parser (Pratt precedence climber) with arbitrary
//! input.
//!
//! Expression parsing is the most involved part of the parser due to
//! operator precedence, prefix handling, and nested subexpressions. This
//! target wraps the input so those paths are exercised both in the select
//! list and in a WHERE clause.

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(sql) = std::str::from_utf8(data) else {
        return;
    };

    if sql.len() > 2048 {
        return;
    }

    let wrapped = format!("SELECT {sql}");
    let (_ast, _errors) = plotql_parser::Parser::from_sql(&wrapped).parse_all();

    let where_wrapped = format!("SELECT 1 FROM t WHERE {sql}");
    let (_ast, _errors) = plotql_parser::Parser::from_sql(&where_wrapped).parse_all();
});
