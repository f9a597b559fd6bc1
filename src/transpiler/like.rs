//! LIKE pattern conversion.

use std::fmt::Write;

use crate::ast::LikeFilter;
use crate::error::{FilterError, FilterResult};
use crate::transpiler::traits::{ExprContext, ExprEncoder};

/// Rewrite a pattern with arbitrary special characters into SQL-92 LIKE
/// syntax (`%`, `_`, no escape character).
///
/// The escaped character is copied verbatim, single quotes are doubled, and
/// with `match_case == false` the pattern is upper-cased so it can be
/// compared against `UPPER(expr)`.
pub fn convert_to_sql92(
    escape: char,
    multi: char,
    single: char,
    match_case: bool,
    pattern: &str,
) -> FilterResult<String> {
    if escape == '\'' || multi == '\'' || single == '\'' {
        return Err(FilterError::Unsupported(
            "single quote cannot be used as a LIKE special character".to_string(),
        ));
    }

    let mut result = String::with_capacity(pattern.len() + 5);
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        if c == escape {
            // a trailing escape has nothing to escape and is dropped
            if let Some(escaped) = chars.next() {
                push_literal(&mut result, escaped, match_case);
            }
        } else if c == single {
            result.push('_');
        } else if c == multi {
            result.push('%');
        } else {
            push_literal(&mut result, c, match_case);
        }
    }
    Ok(result)
}

fn push_literal(result: &mut String, c: char, match_case: bool) {
    if c == '\'' {
        result.push_str("''");
    } else if match_case {
        result.push(c);
    } else {
        result.extend(c.to_uppercase());
    }
}

/// Write `expr LIKE 'pattern'`, or `UPPER(expr) LIKE 'PATTERN'` when the
/// match ignores case. `literal` replaces the filter's own pattern.
pub fn write_like(
    like: &LikeFilter,
    literal: &str,
    encoder: &dyn ExprEncoder,
    out: &mut dyn Write,
) -> FilterResult<()> {
    let pattern = convert_to_sql92(
        like.escape,
        like.wildcard,
        like.single_char,
        like.match_case,
        literal,
    )?;
    let ctx = ExprContext::default();

    if like.match_case {
        encoder.encode_expr(&like.expr, &ctx, out)?;
        out.write_str(" LIKE '")?;
    } else {
        out.write_str("UPPER(")?;
        encoder.encode_expr(&like.expr, &ctx, out)?;
        out.write_str(") LIKE '")?;
    }
    out.write_str(&pattern)?;
    out.write_char('\'')?;
    Ok(())
}
