use std::fmt::Write;

use tracing::debug;

use crate::ast::Literal;
use crate::error::FilterResult;
use crate::transpiler::traits::{GeometryContext, escape_identifier};

/// SRID `ST_GeogFromText` assumes when the text carries none.
pub const WGS84_SRID: i32 = 4326;

/// Write a geometry literal as `ST_GeomFromText` / `ST_GeogFromText`.
///
/// SRID resolution for geometry columns: a constant (declared on the column,
/// else tagged on the literal) is written as an integer; failing that the
/// column's SRID is looked up per row with `ST_SRID("col")`; with neither,
/// the SRID argument is left out.
pub(super) fn encode_geometry(
    literal: &Literal,
    ctx: &GeometryContext,
    out: &mut dyn Write,
) -> FilterResult<()> {
    let value = literal.to_geometry()?;
    if value.is_ring() {
        debug!("linear ring written as a line string");
    }
    let wkt = value.to_wkt();
    let constant_srid = ctx.srid.or(value.srid);

    if ctx.is_geography() {
        match constant_srid {
            Some(srid) if srid != WGS84_SRID => {
                write!(out, "ST_GeogFromText('SRID={};{}')", srid, wkt)?
            }
            _ => write!(out, "ST_GeogFromText('{}')", wkt)?,
        }
        return Ok(());
    }

    match (constant_srid, ctx.column.as_deref()) {
        (Some(srid), _) => write!(out, "ST_GeomFromText('{}', {})", wkt, srid)?,
        (None, Some(column)) => {
            debug!(column, "no constant SRID, reading it from the column");
            write!(
                out,
                "ST_GeomFromText('{}', ST_SRID({}))",
                wkt,
                escape_identifier(column)
            )?
        }
        (None, None) => write!(out, "ST_GeomFromText('{}')", wkt)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::GeometryValue;
    use crate::error::FilterError;
    use crate::schema::StorageKind;
    use geo_types::{line_string, point};
    use pretty_assertions::assert_eq;

    fn encode(literal: &Literal, ctx: &GeometryContext) -> String {
        let mut out = String::new();
        encode_geometry(literal, ctx, &mut out).unwrap();
        out
    }

    fn point_literal() -> (Literal, String) {
        let value = GeometryValue::new(point!(x: 1.0, y: 2.0));
        let wkt = value.to_wkt();
        (Literal::Geometry(value), wkt)
    }

    fn geography(srid: Option<i32>) -> GeometryContext {
        GeometryContext {
            column: Some("geog".to_string()),
            storage: StorageKind::Geography,
            srid,
        }
    }

    #[test]
    fn test_constant_srid() {
        let (literal, wkt) = point_literal();
        let ctx = GeometryContext {
            column: Some("geom".to_string()),
            storage: StorageKind::Geometry,
            srid: Some(3857),
        };
        assert_eq!(encode(&literal, &ctx), format!("ST_GeomFromText('{}', 3857)", wkt));
    }

    #[test]
    fn test_literal_srid_when_column_has_none() {
        let value = GeometryValue::new(point!(x: 1.0, y: 2.0)).with_srid(4269);
        let wkt = value.to_wkt();
        let out = encode(&Literal::Geometry(value), &GeometryContext::for_column("geom"));
        assert_eq!(out, format!("ST_GeomFromText('{}', 4269)", wkt));
    }

    #[test]
    fn test_srid_from_column_at_runtime() {
        let (literal, wkt) = point_literal();
        let out = encode(&literal, &GeometryContext::for_column("geom"));
        assert_eq!(out, format!("ST_GeomFromText('{}', ST_SRID(\"geom\"))", wkt));
        assert!(out.ends_with("', ST_SRID(\"geom\"))"));
    }

    #[test]
    fn test_no_srid_and_no_column() {
        let (literal, wkt) = point_literal();
        let out = encode(&literal, &GeometryContext::default());
        assert_eq!(out, format!("ST_GeomFromText('{}')", wkt));
        assert!(!out.contains("ST_SRID"));
    }

    #[test]
    fn test_geography_wgs84_omits_srid() {
        let (literal, wkt) = point_literal();
        assert_eq!(
            encode(&literal, &geography(Some(4326))),
            format!("ST_GeogFromText('{}')", wkt)
        );
        assert_eq!(
            encode(&literal, &geography(None)),
            format!("ST_GeogFromText('{}')", wkt)
        );
    }

    #[test]
    fn test_geography_other_srid_uses_ewkt() {
        let (literal, wkt) = point_literal();
        assert_eq!(
            encode(&literal, &geography(Some(4269))),
            format!("ST_GeogFromText('SRID=4269;{}')", wkt)
        );
    }

    #[test]
    fn test_constructor_follows_storage_kind() {
        let (literal, _) = point_literal();
        for srid in [None, Some(4326), Some(3857)] {
            let geog = encode(&literal, &geography(srid));
            assert!(geog.starts_with("ST_GeogFromText("));
            assert!(!geog.contains("ST_GeomFromText"));

            let ctx = GeometryContext { srid, ..GeometryContext::for_column("geom") };
            let geom = encode(&literal, &ctx);
            assert!(geom.starts_with("ST_GeomFromText("));
            assert!(!geom.contains("ST_GeogFromText"));
        }
    }

    #[test]
    fn test_ring_is_flattened() {
        let ring = GeometryValue::ring(line_string![
            (x: 0.0, y: 0.0),
            (x: 1.0, y: 0.0),
            (x: 1.0, y: 1.0),
            (x: 0.0, y: 0.0),
        ])
        .unwrap();
        let out = encode(&Literal::Geometry(ring), &GeometryContext::for_column("geom"));
        assert!(out.starts_with("ST_GeomFromText('LINESTRING"));
        assert!(!out.contains("LINEARRING"));
    }

    #[test]
    fn test_idempotent() {
        let (literal, _) = point_literal();
        let ctx = GeometryContext::for_column("geom");
        assert_eq!(encode(&literal, &ctx), encode(&literal, &ctx));
    }

    #[test]
    fn test_wkt_string_literal() {
        let out = encode(&Literal::from("SRID=4326;POINT(5 6)"), &GeometryContext::for_column("g"));
        assert!(out.starts_with("ST_GeomFromText('POINT"));
        assert!(out.ends_with("', 4326)"));
    }

    #[test]
    fn test_non_geometry_literal_fails() {
        let mut out = String::new();
        let err = encode_geometry(&Literal::Int(3), &GeometryContext::default(), &mut out)
            .unwrap_err();
        assert!(matches!(err, FilterError::Coercion { expected: "geometry", .. }));
        assert!(out.is_empty());
    }
}
