//! Filter grammar: logic, predicates and expressions.

use geo_types::{Rect, coord};
use nom::{
    branch::alt,
    bytes::complete::tag,
    combinator::{map, opt, value},
    error::{Error, ErrorKind},
    multi::{many0, separated_list0},
    sequence::{delimited, pair, preceded, tuple},
    IResult,
};

use super::tokens::*;
use crate::ast::*;

/// `or_expr := and_expr (OR and_expr)*`
pub(super) fn filter(input: &str) -> IResult<&str, Filter> {
    let (input, first) = and_expr(input)?;
    let (input, rest) = many0(preceded(keyword("OR"), and_expr))(input)?;
    Ok((input, combine(first, rest, Filter::or)))
}

fn and_expr(input: &str) -> IResult<&str, Filter> {
    let (input, first) = not_expr(input)?;
    let (input, rest) = many0(preceded(keyword("AND"), not_expr))(input)?;
    Ok((input, combine(first, rest, Filter::and)))
}

fn combine(first: Filter, rest: Vec<Filter>, join: fn(Vec<Filter>) -> Filter) -> Filter {
    if rest.is_empty() {
        return first;
    }
    let mut filters = Vec::with_capacity(rest.len() + 1);
    filters.push(first);
    filters.extend(rest);
    join(filters)
}

fn not_expr(input: &str) -> IResult<&str, Filter> {
    alt((
        map(preceded(keyword("NOT"), not_expr), Filter::not),
        primary,
    ))(input)
}

fn primary(input: &str) -> IResult<&str, Filter> {
    alt((
        delimited(symbol('('), filter, symbol(')')),
        value(Filter::Include, keyword("INCLUDE")),
        value(Filter::Exclude, keyword("EXCLUDE")),
        bbox,
        distance,
        spatial,
        predicate,
    ))(input)
}

/// `INTERSECTS(a, b)` and the other binary relations.
fn spatial(input: &str) -> IResult<&str, Filter> {
    let (input, op) = spatial_op(input)?;
    let (input, (_, left, _, right, _)) =
        tuple((symbol('('), expr, symbol(','), expr, symbol(')')))(input)?;
    Ok((input, Filter::spatial(op, left, right)))
}

fn spatial_op(input: &str) -> IResult<&str, SpatialOp> {
    for op in SpatialOp::ALL {
        if let Ok((rest, _)) = keyword(op.keyword())(input) {
            return Ok((rest, op));
        }
    }
    Err(nom::Err::Error(Error::new(input, ErrorKind::Tag)))
}

/// `BBOX(geom, minx, miny, maxx, maxy [, 'EPSG:4326'])`
fn bbox(input: &str) -> IResult<&str, Filter> {
    let (input, (_, _, target, _, minx, _, miny, _, maxx, _, maxy, crs, _)) = tuple((
        keyword("BBOX"),
        symbol('('),
        expr,
        symbol(','),
        float,
        symbol(','),
        float,
        symbol(','),
        float,
        symbol(','),
        float,
        opt(preceded(symbol(','), string_literal)),
        symbol(')'),
    ))(input)?;

    let rect = Rect::new(coord! { x: minx, y: miny }, coord! { x: maxx, y: maxy });
    let mut envelope = GeometryValue::new(rect.to_polygon());
    if let Some(crs) = crs {
        match epsg_code(&crs) {
            Some(srid) => envelope = envelope.with_srid(srid),
            None => return Err(nom::Err::Failure(Error::new(input, ErrorKind::Verify))),
        }
    }
    Ok((
        input,
        Filter::spatial(SpatialOp::BBox, target, Expr::Literal(envelope.into())),
    ))
}

/// `EPSG:4326` → 4326
fn epsg_code(crs: &str) -> Option<i32> {
    let (authority, code) = crs.trim().split_once(':')?;
    if !authority.eq_ignore_ascii_case("EPSG") {
        return None;
    }
    code.trim().parse().ok()
}

/// `DWITHIN(a, b, 10, km)` / `BEYOND(a, b, 10, km)`
fn distance(input: &str) -> IResult<&str, Filter> {
    let (input, op) = alt((
        value(DistanceOp::DWithin, keyword("DWITHIN")),
        value(DistanceOp::Beyond, keyword("BEYOND")),
    ))(input)?;
    let (input, (_, left, _, right, _, amount, _, units, _)) = tuple((
        symbol('('),
        expr,
        symbol(','),
        expr,
        symbol(','),
        float,
        symbol(','),
        unit_name,
        symbol(')'),
    ))(input)?;
    let units: DistanceUnit = units
        .parse()
        .map_err(|_| nom::Err::Failure(Error::new(input, ErrorKind::Verify)))?;
    Ok((input, Filter::distance(op, left, right, amount, Some(units))))
}

/// An expression followed by a comparison, BETWEEN, LIKE or NULL test.
fn predicate(input: &str) -> IResult<&str, Filter> {
    let (input, left) = expr(input)?;
    alt((
        map(pair(compare_op, expr), |(op, right)| {
            Filter::compare(op, left.clone(), right)
        }),
        map(
            tuple((
                opt(keyword("NOT")),
                keyword("BETWEEN"),
                expr,
                keyword("AND"),
                expr,
            )),
            |(negated, _, lower, _, upper)| {
                negate(negated.is_some(), Filter::between(left.clone(), lower, upper))
            },
        ),
        map(
            tuple((
                opt(keyword("NOT")),
                alt((value(true, keyword("LIKE")), value(false, keyword("ILIKE")))),
                string_literal,
            )),
            |(negated, match_case, pattern)| {
                let like = LikeFilter::new(left.clone(), pattern).match_case(match_case);
                negate(negated.is_some(), Filter::Like(like))
            },
        ),
        map(
            tuple((keyword("IS"), opt(keyword("NOT")), keyword("NULL"))),
            |(_, negated, _)| negate(negated.is_some(), Filter::is_null(left.clone())),
        ),
    ))(input)
}

fn negate(negated: bool, filter: Filter) -> Filter {
    if negated { Filter::not(filter) } else { filter }
}

fn compare_op(input: &str) -> IResult<&str, CompareOp> {
    token(alt((
        value(CompareOp::Lte, tag("<=")),
        value(CompareOp::Gte, tag(">=")),
        value(CompareOp::Ne, tag("<>")),
        value(CompareOp::Ne, tag("!=")),
        value(CompareOp::Lt, tag("<")),
        value(CompareOp::Gt, tag(">")),
        value(CompareOp::Eq, tag("=")),
    )))(input)
}

/// Literal, function call or property reference.
pub(super) fn expr(input: &str) -> IResult<&str, Expr> {
    alt((
        map(geometry_literal, |g| Expr::Literal(g.into())),
        map(timestamp_literal, Expr::Literal),
        map(date_literal, Expr::Literal),
        map(number_literal, Expr::Literal),
        map(string_literal, |s| Expr::Literal(Literal::String(s))),
        map(boolean_literal, Expr::Literal),
        function_call,
        map(property_name, Expr::Property),
    ))(input)
}

fn function_call(input: &str) -> IResult<&str, Expr> {
    let (input, (name, _, args, _)) = tuple((
        function_name,
        symbol('('),
        separated_list0(symbol(','), expr),
        symbol(')'),
    ))(input)?;
    Ok((input, Expr::function(name, args)))
}
