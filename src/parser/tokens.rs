//! Lexical building blocks: keywords, identifiers and literals.

use chrono::{NaiveDate, NaiveDateTime};
use nom::{
    branch::alt,
    bytes::complete::{tag_no_case, take_while, take_while_m_n},
    character::complete::{char, digit1, multispace0, one_of, satisfy},
    combinator::{map, map_res, not, opt, recognize, value, verify},
    error::{Error, ErrorKind},
    sequence::{pair, preceded, terminated, tuple},
    IResult,
};

use crate::ast::{GeometryValue, Literal};

/// Words that cannot be used as bare property names.
const RESERVED: [&str; 12] = [
    "AND", "OR", "NOT", "LIKE", "ILIKE", "BETWEEN", "IS", "NULL", "INCLUDE", "EXCLUDE", "TRUE",
    "FALSE",
];

const GEOMETRY_TAGS: [&str; 8] = [
    "POINT",
    "LINESTRING",
    "LINEARRING",
    "POLYGON",
    "MULTIPOINT",
    "MULTILINESTRING",
    "MULTIPOLYGON",
    "GEOMETRYCOLLECTION",
];

pub(super) fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Skip leading whitespace, then run `parser`.
pub(super) fn token<'a, O, F>(parser: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    preceded(multispace0, parser)
}

/// A single punctuation character.
pub(super) fn symbol<'a>(c: char) -> impl FnMut(&'a str) -> IResult<&'a str, char> {
    token(char(c))
}

/// Case-insensitive keyword that is not the prefix of a longer word.
pub(super) fn keyword<'a>(word: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
    token(terminated(tag_no_case(word), not(satisfy(is_ident_char))))
}

fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        satisfy(|c: char| c.is_alphabetic() || c == '_'),
        take_while(is_ident_char),
    ))(input)
}

/// Text between `quote` characters; a doubled quote stands for itself.
fn quoted(quote: char) -> impl FnMut(&str) -> IResult<&str, String> {
    move |input: &str| {
        let (mut rest, _) = char::<_, Error<&str>>(quote)(input)?;
        let mut text = String::new();
        loop {
            let Some(end) = rest.find(quote) else {
                return Err(nom::Err::Failure(Error::new(input, ErrorKind::Char)));
            };
            text.push_str(&rest[..end]);
            rest = &rest[end + quote.len_utf8()..];
            match rest.strip_prefix(quote) {
                Some(after) => {
                    text.push(quote);
                    rest = after;
                }
                None => return Ok((rest, text)),
            }
        }
    }
}

/// `'single quoted'` string.
pub(super) fn string_literal(input: &str) -> IResult<&str, String> {
    token(quoted('\''))(input)
}

/// Bare identifier or `"quoted"` property name.
pub(super) fn property_name(input: &str) -> IResult<&str, String> {
    token(alt((
        quoted('"'),
        map(
            verify(identifier, |word: &str| {
                !RESERVED.iter().any(|r| r.eq_ignore_ascii_case(word))
            }),
            str::to_string,
        ),
    )))(input)
}

/// Name of a called function.
pub(super) fn function_name(input: &str) -> IResult<&str, &str> {
    token(identifier)(input)
}

/// Distance unit word, e.g. `km` or `'nautical miles'`.
pub(super) fn unit_name(input: &str) -> IResult<&str, String> {
    alt((string_literal, map(token(identifier), str::to_string)))(input)
}

pub(super) fn number_literal(input: &str) -> IResult<&str, Literal> {
    token(map_res(
        recognize(tuple((
            opt(char('-')),
            digit1,
            opt(pair(char('.'), digit1)),
            opt(tuple((one_of("eE"), opt(one_of("+-")), digit1))),
        ))),
        |text: &str| match text.parse::<i64>() {
            Ok(n) => Ok(Literal::Int(n)),
            Err(_) => text.parse::<f64>().map(Literal::Float),
        },
    ))(input)
}

/// A number read as `f64`, for coordinates and distances.
pub(super) fn float(input: &str) -> IResult<&str, f64> {
    map_res(number_literal, |literal| match literal {
        Literal::Int(n) => Ok(n as f64),
        Literal::Float(n) => Ok(n),
        _ => Err(ErrorKind::Float),
    })(input)
}

pub(super) fn boolean_literal(input: &str) -> IResult<&str, Literal> {
    alt((
        value(Literal::Bool(true), keyword("TRUE")),
        value(Literal::Bool(false), keyword("FALSE")),
    ))(input)
}

fn digits<'a>(count: usize) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
    take_while_m_n(count, count, |c: char| c.is_ascii_digit())
}

fn date_text(input: &str) -> IResult<&str, &str> {
    recognize(tuple((digits(4), char('-'), digits(2), char('-'), digits(2))))(input)
}

/// `2024-01-31`
pub(super) fn date_literal(input: &str) -> IResult<&str, Literal> {
    token(map_res(
        terminated(date_text, not(satisfy(|c: char| c.is_ascii_alphanumeric()))),
        |text: &str| NaiveDate::parse_from_str(text, "%Y-%m-%d").map(Literal::Date),
    ))(input)
}

/// `2024-01-31T10:15:00`, optional fraction and `Z`.
pub(super) fn timestamp_literal(input: &str) -> IResult<&str, Literal> {
    token(map_res(
        recognize(tuple((
            date_text,
            one_of("Tt"),
            digits(2),
            char(':'),
            digits(2),
            char(':'),
            digits(2),
            opt(pair(char('.'), digit1)),
            opt(one_of("Zz")),
        ))),
        |text: &str| {
            let text = text.trim_end_matches(['Z', 'z']).replace('t', "T");
            NaiveDateTime::parse_from_str(&text, "%Y-%m-%dT%H:%M:%S%.f").map(Literal::Timestamp)
        },
    ))(input)
}

/// Text from an opening parenthesis to its matching close.
fn balanced_parens(input: &str) -> IResult<&str, &str> {
    let mut depth = 0usize;
    for (i, c) in input.char_indices() {
        match c {
            '(' => depth += 1,
            ')' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    return Ok((&input[i + 1..], &input[..=i]));
                }
            }
            _ if depth == 0 => break,
            _ => {}
        }
    }
    Err(nom::Err::Error(Error::new(input, ErrorKind::Char)))
}

fn geometry_tag(input: &str) -> IResult<&str, &str> {
    for tag in GEOMETRY_TAGS {
        let mut word = terminated(
            tag_no_case::<_, _, Error<&str>>(tag),
            not(satisfy(is_ident_char)),
        );
        if let Ok(found) = word(input) {
            return Ok(found);
        }
    }
    Err(nom::Err::Error(Error::new(input, ErrorKind::Tag)))
}

/// WKT or EWKT geometry, e.g. `SRID=4326;POINT(1 2)`.
pub(super) fn geometry_literal(input: &str) -> IResult<&str, GeometryValue> {
    token(map_res(
        recognize(tuple((
            opt(tuple((tag_no_case("SRID="), opt(char('-')), digit1, char(';')))),
            geometry_tag,
            multispace0,
            alt((balanced_parens, tag_no_case("EMPTY"))),
        ))),
        GeometryValue::from_ewkt,
    ))(input)
}
