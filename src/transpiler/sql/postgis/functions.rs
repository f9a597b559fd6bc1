use std::fmt::Write;

use crate::ast::{Function, FunctionName};
use crate::error::FilterResult;
use crate::schema::Binding;
use crate::transpiler::traits::{ExprContext, ExprEncoder, sql92_cast};

/// String functions whose arguments need rearranging in PostgreSQL.
/// Returns `false` for everything else so the generic `name(args)` form is
/// used.
pub(super) fn encode_function(
    function: &Function,
    encoder: &dyn ExprEncoder,
    out: &mut dyn Write,
) -> FilterResult<bool> {
    let arg = |index: usize, out: &mut dyn Write| -> FilterResult<()> {
        encoder.encode_expr(function.arg(index)?, &ExprContext::default(), out)
    };

    match function.name {
        FunctionName::StrConcat => {
            out.write_char('(')?;
            arg(0, out)?;
            out.write_str(" || ")?;
            arg(1, out)?;
            out.write_char(')')?;
        }
        FunctionName::StrEndsWith => {
            out.write_char('(')?;
            arg(0, out)?;
            out.write_str(" LIKE ('%' || ")?;
            arg(1, out)?;
            out.write_str("))")?;
        }
        FunctionName::StrStartsWith => {
            out.write_char('(')?;
            arg(0, out)?;
            out.write_str(" LIKE (")?;
            arg(1, out)?;
            out.write_str(" || '%'))")?;
        }
        FunctionName::StrEqualsIgnoreCase => {
            out.write_str("(lower(")?;
            arg(0, out)?;
            out.write_str(") = lower(")?;
            arg(1, out)?;
            out.write_str("))")?;
        }
        FunctionName::StrIndexOf => {
            out.write_str("(strpos(")?;
            arg(0, out)?;
            out.write_str(", ")?;
            arg(1, out)?;
            out.write_str(") - 1)")?;
        }
        // zero-based [start, end) to one-based start and length
        FunctionName::StrSubstring => {
            out.write_str("substr(")?;
            arg(0, out)?;
            out.write_str(", ")?;
            arg(1, out)?;
            out.write_str(" + 1, (")?;
            arg(2, out)?;
            out.write_str(" - ")?;
            arg(1, out)?;
            out.write_str("))")?;
        }
        FunctionName::StrSubstringStart => {
            out.write_str("substr(")?;
            arg(0, out)?;
            out.write_str(", ")?;
            arg(1, out)?;
            out.write_str(" + 1)")?;
        }
        FunctionName::StrTrim => {
            out.write_str("trim(both ' ' from ")?;
            arg(0, out)?;
            out.write_char(')')?;
        }
        _ => return Ok(false),
    }
    Ok(true)
}

/// PostgreSQL name for functions encoded as a plain call.
pub(super) fn function_name(function: &Function) -> String {
    match &function.name {
        FunctionName::StrLength => "char_length",
        FunctionName::StrToLowerCase => "lower",
        FunctionName::StrToUpperCase => "upper",
        FunctionName::Abs => "abs",
        FunctionName::Ceil => "ceil",
        FunctionName::Floor => "floor",
        other => other.as_str(),
    }
    .to_string()
}

/// `expr::type` shorthand casts.
pub(super) fn cast(encoded: &str, target: Binding) -> String {
    let pg_type = match target {
        Binding::String => "text",
        Binding::Short => "smallint",
        Binding::Integer => "integer",
        Binding::Long => "bigint",
        Binding::Float => "real",
        Binding::Double => "float8",
        Binding::BigInteger => "numeric",
        Binding::BigDecimal => "decimal",
        Binding::Boolean => "boolean",
        Binding::Time => "time",
        Binding::Timestamp => "timestamp",
        Binding::Date => "date",
        Binding::Geometry => return sql92_cast(encoded, target),
    };
    format!("{}::{}", encoded, pg_type)
}
