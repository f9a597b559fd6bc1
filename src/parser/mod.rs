//! Filter text parser using nom.
//!
//! Parses a CQL-like syntax into a [`Filter`] tree.
//!
//! # Syntax Overview
//!
//! ```text
//! name LIKE 'Main%' AND INTERSECTS(geom, SRID=4326;POINT(1 2))
//! ──┬─ ─┬── ───┬──  ─┬─ ────┬───── ─┬── ─────────┬──────────
//!   │    │     │     │      │        │            └── EWKT literal
//!   │    │     │     │      │        └── Property
//!   │    │     │     │      └── Spatial relation
//!   │    │     │     └── Logic (AND, OR, NOT, parentheses)
//!   │    │     └── String literal ('' escapes a quote)
//!   │    └── Predicate (=, <>, BETWEEN, LIKE, ILIKE, IS NULL)
//!   └── Property
//! ```

mod filters;
mod tokens;

#[cfg(test)]
mod tests;

use nom::{character::complete::multispace0, sequence::terminated};

use crate::ast::Filter;
use crate::error::{FilterError, FilterResult};

/// Parse a complete filter string.
pub fn parse(input: &str) -> FilterResult<Filter> {
    match terminated(filters::filter, multispace0)(input) {
        Ok(("", filter)) => Ok(filter),
        Ok((remaining, _)) => Err(FilterError::parse(
            input.len() - remaining.len(),
            format!("Unexpected trailing content: '{}'", snippet(remaining)),
        )),
        Err(nom::Err::Error(e) | nom::Err::Failure(e)) => Err(FilterError::parse(
            input.len() - e.input.len(),
            format!("Unexpected input at '{}' ({:?})", snippet(e.input), e.code),
        )),
        Err(nom::Err::Incomplete(_)) => {
            Err(FilterError::parse(input.len(), "Unexpected end of input"))
        }
    }
}

fn snippet(text: &str) -> String {
    let text = text.trim_start();
    match text.char_indices().nth(24) {
        Some((end, _)) => format!("{}...", &text[..end]),
        None => text.to_string(),
    }
}
