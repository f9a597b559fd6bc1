use std::fmt::Write;

use crate::ast::Literal;
use crate::error::{FilterError, FilterResult};
use crate::schema::Binding;
use crate::transpiler::traits::quote_string;

/// Write a non-geometry literal, coerced toward `binding` where the value
/// allows it (numeric text against a numeric column, numbers against text).
pub fn encode_scalar(
    literal: &Literal,
    binding: Option<Binding>,
    out: &mut dyn Write,
) -> FilterResult<()> {
    match literal {
        Literal::Null => out.write_str("NULL")?,
        Literal::Bool(b) => out.write_str(if *b { "TRUE" } else { "FALSE" })?,
        Literal::Int(n) => match binding {
            Some(b) if b.is_text() => out.write_str(&quote_string(&n.to_string()))?,
            _ => write!(out, "{}", n)?,
        },
        Literal::Float(n) => match binding {
            Some(b) if b.is_text() => out.write_str(&quote_string(&n.to_string()))?,
            _ => write_float(*n, out)?,
        },
        Literal::String(s) => match binding {
            Some(b) if b.is_numeric() => write_numeric_text(s, b, out)?,
            Some(Binding::Boolean) => match s.trim().to_ascii_lowercase().as_str() {
                "true" => out.write_str("TRUE")?,
                "false" => out.write_str("FALSE")?,
                _ => out.write_str(&quote_string(s))?,
            },
            _ => out.write_str(&quote_string(s))?,
        },
        Literal::Date(d) => write!(out, "'{}'", d.format("%Y-%m-%d"))?,
        Literal::Timestamp(ts) => write!(out, "'{}'", ts.format("%Y-%m-%d %H:%M:%S%.f"))?,
        Literal::Geometry(_) => return Err(FilterError::coercion("scalar", "geometry")),
    }
    Ok(())
}

fn write_float(n: f64, out: &mut dyn Write) -> FilterResult<()> {
    if n.is_nan() {
        out.write_str("'NaN'")?;
    } else if n.is_infinite() {
        out.write_str(if n > 0.0 { "'Infinity'" } else { "'-Infinity'" })?;
    } else {
        write!(out, "{}", n)?;
    }
    Ok(())
}

fn write_numeric_text(text: &str, binding: Binding, out: &mut dyn Write) -> FilterResult<()> {
    let trimmed = text.trim();
    let is_number = if binding.is_integral() {
        trimmed.parse::<i64>().is_ok()
    } else {
        trimmed.parse::<f64>().map(f64::is_finite).unwrap_or(false)
    };
    if is_number {
        out.write_str(trimmed)?;
    } else {
        out.write_str(&quote_string(text))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn encode(literal: Literal, binding: Option<Binding>) -> String {
        let mut out = String::new();
        encode_scalar(&literal, binding, &mut out).unwrap();
        out
    }

    #[test]
    fn test_plain_literals() {
        assert_eq!(encode(Literal::Null, None), "NULL");
        assert_eq!(encode(Literal::Bool(true), None), "TRUE");
        assert_eq!(encode(Literal::Int(42), None), "42");
        assert_eq!(encode(Literal::Float(2.5), None), "2.5");
        assert_eq!(encode(Literal::from("it's"), None), "'it''s'");
    }

    #[test]
    fn test_coercion_toward_binding() {
        assert_eq!(encode(Literal::from("17"), Some(Binding::Integer)), "17");
        assert_eq!(encode(Literal::from("1.5"), Some(Binding::Integer)), "'1.5'");
        assert_eq!(encode(Literal::from("1.5"), Some(Binding::Double)), "1.5");
        assert_eq!(encode(Literal::from("abc"), Some(Binding::Double)), "'abc'");
        assert_eq!(encode(Literal::from("NaN"), Some(Binding::Double)), "'NaN'");
        assert_eq!(encode(Literal::Int(7), Some(Binding::String)), "'7'");
        assert_eq!(encode(Literal::from("TRUE"), Some(Binding::Boolean)), "TRUE");
    }

    #[test]
    fn test_temporal_literals() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(encode(Literal::Date(date), None), "'2024-02-29'");
        let ts = date.and_hms_opt(10, 30, 0).unwrap();
        assert_eq!(encode(Literal::Timestamp(ts), None), "'2024-02-29 10:30:00'");
    }

    #[test]
    fn test_non_finite_floats_are_quoted() {
        assert_eq!(encode(Literal::Float(f64::INFINITY), None), "'Infinity'");
        assert_eq!(encode(Literal::Float(f64::NAN), None), "'NaN'");
    }

    #[test]
    fn test_geometry_is_not_a_scalar() {
        let geom = Literal::from("POINT(0 0)").to_geometry().unwrap();
        let mut out = String::new();
        assert!(encode_scalar(&Literal::Geometry(geom), None, &mut out).is_err());
    }
}
