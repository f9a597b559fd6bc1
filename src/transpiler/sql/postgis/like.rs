use std::fmt::Write;

use tracing::debug;

use crate::ast::LikeFilter;
use crate::error::FilterResult;
use crate::transpiler::like::{convert_to_sql92, write_like};
use crate::transpiler::traits::{ExprEncoder, escape_identifier};

/// Attributes holding a keyword list end with this suffix.
pub const KEYLIST_SUFFIX: &str = "_keylist";
/// Suffix of the `tsvector` companion column of a keyword list.
pub const VECTORISE_SUFFIX: &str = "_vectorise";
/// Text search configuration passed to `to_tsquery`.
pub const TEXT_SEARCH_CONFIG: &str = "english";

/// Turn a SQL-92 LIKE pattern into `to_tsquery` terms: `%` separates terms
/// like whitespace does, and the remaining words are AND-ed together.
pub fn tsquery_terms(pattern: &str) -> String {
    pattern
        .replace('%', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" & ")
}

/// Name of the `tsvector` column companion to a keyword list. Plain
/// lower-case identifiers stay bare; anything else is quoted.
fn vectorised_column(name: &str) -> String {
    let column = format!("{}{}", name, VECTORISE_SUFFIX);
    let mut chars = name.chars();
    let plain = chars
        .next()
        .is_some_and(|c| c.is_ascii_lowercase() || c == '_')
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
    if plain { column } else { escape_identifier(&column) }
}

pub(super) fn encode_like(
    like: &LikeFilter,
    encoder: &dyn ExprEncoder,
    out: &mut dyn Write,
) -> FilterResult<()> {
    let name = like.expr.to_string();
    if name.ends_with(KEYLIST_SUFFIX) {
        let pattern = convert_to_sql92(
            like.escape,
            like.wildcard,
            like.single_char,
            like.match_case,
            &like.pattern,
        )?;
        let terms = tsquery_terms(&pattern);
        debug!(attribute = %name, %terms, "full-text keyword list match");
        write!(
            out,
            "({} @@ to_tsquery('{}','{}'))",
            vectorised_column(&name),
            TEXT_SEARCH_CONFIG,
            terms
        )?;
        return Ok(());
    }

    // stored temporal values carry more precision than the pattern
    let temporal = encoder
        .attribute(&like.expr)
        .is_some_and(|attribute| attribute.binding.is_temporal());
    if temporal {
        let mut pattern = like.pattern.clone();
        pattern.push(like.wildcard);
        write_like(like, &pattern, encoder, out)
    } else {
        write_like(like, &like.pattern, encoder, out)
    }
}
