use std::fmt::Write;

use crate::ast::*;
use crate::error::FilterResult;
use crate::transpiler::traits::{ExprContext, ExprEncoder, GeometryContext};

use super::literal::encode_geometry;

/// Writes one operand of a spatial relation.
type Operand<'o> = &'o dyn Fn(&mut dyn Write) -> FilterResult<()>;

/// Relation between a property and a geometry literal.
///
/// The property is always written first. When the literal came first in
/// the filter, directional relations are replaced by their converse, so
/// `WITHIN(literal, geom)` becomes `ST_Contains("geom", literal)`.
#[allow(clippy::too_many_arguments)]
pub(super) fn encode_property_literal(
    op: SpatialOp,
    property: &str,
    geometry: &Literal,
    swapped: bool,
    loose_bbox: bool,
    ctx: &GeometryContext,
    encoder: &dyn ExprEncoder,
    out: &mut dyn Write,
) -> FilterResult<()> {
    let op = if swapped { op.converse() } else { op };
    let property_sql: Operand<'_> = &|out| encoder.encode_property(property, out);
    let geometry_sql: Operand<'_> = &|out| encode_geometry(geometry, ctx, out);
    encode_relation(op, loose_bbox, property_sql, geometry_sql, out)
}

/// Relation between two arbitrary expressions, written in filter order.
pub(super) fn encode_exprs(
    op: SpatialOp,
    left: &Expr,
    right: &Expr,
    loose_bbox: bool,
    ctx: &GeometryContext,
    encoder: &dyn ExprEncoder,
    out: &mut dyn Write,
) -> FilterResult<()> {
    let expr_ctx = ExprContext::geometry(ctx);
    let left_sql: Operand<'_> = &|out| encoder.encode_expr(left, &expr_ctx, out);
    let right_sql: Operand<'_> = &|out| encoder.encode_expr(right, &expr_ctx, out);
    encode_relation(op, loose_bbox, left_sql, right_sql, out)
}

/// `a && b AND ST_Rel(a, b)`; loose BBOX stops after the index test and
/// DISJOINT is the negated intersection without one.
fn encode_relation(
    op: SpatialOp,
    loose_bbox: bool,
    a: Operand<'_>,
    b: Operand<'_>,
    out: &mut dyn Write,
) -> FilterResult<()> {
    if op != SpatialOp::Disjoint {
        a(out)?;
        out.write_str(" && ")?;
        b(out)?;
        if op == SpatialOp::BBox && loose_bbox {
            return Ok(());
        }
        out.write_str(" AND ")?;
    }

    let (function, closing) = match op {
        SpatialOp::Disjoint => ("NOT (ST_Intersects(", "))"),
        SpatialOp::Equals => ("ST_Equals(", ")"),
        SpatialOp::Intersects | SpatialOp::BBox => ("ST_Intersects(", ")"),
        SpatialOp::Crosses => ("ST_Crosses(", ")"),
        SpatialOp::Within => ("ST_Within(", ")"),
        SpatialOp::Contains => ("ST_Contains(", ")"),
        SpatialOp::Overlaps => ("ST_Overlaps(", ")"),
        SpatialOp::Touches => ("ST_Touches(", ")"),
    };
    out.write_str(function)?;
    a(out)?;
    out.write_str(", ")?;
    b(out)?;
    out.write_str(closing)?;
    Ok(())
}

/// `ST_DWithin(a, b, d)` or `ST_Distance(a, b) > d`. Both relations are
/// symmetric, so operands are written in filter order.
pub(super) fn encode_distance(
    filter: &DistanceFilter,
    ctx: &GeometryContext,
    encoder: &dyn ExprEncoder,
    out: &mut dyn Write,
) -> FilterResult<()> {
    let expr_ctx = ExprContext::geometry(ctx);
    let distance = native_distance(filter, ctx);
    match filter.op {
        DistanceOp::DWithin => {
            out.write_str("ST_DWithin(")?;
            encoder.encode_expr(&filter.left, &expr_ctx, out)?;
            out.write_str(", ")?;
            encoder.encode_expr(&filter.right, &expr_ctx, out)?;
            write!(out, ", {})", distance)?;
        }
        DistanceOp::Beyond => {
            out.write_str("ST_Distance(")?;
            encoder.encode_expr(&filter.left, &expr_ctx, out)?;
            out.write_str(", ")?;
            encoder.encode_expr(&filter.right, &expr_ctx, out)?;
            write!(out, ") > {}", distance)?;
        }
    }
    Ok(())
}

/// Geography distances are in meters; geometry distances stay in the
/// column's own units.
fn native_distance(filter: &DistanceFilter, ctx: &GeometryContext) -> f64 {
    match filter.units {
        Some(units) if ctx.is_geography() => units.to_meters(filter.distance),
        _ => filter.distance,
    }
}
