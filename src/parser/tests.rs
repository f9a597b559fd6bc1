use super::parse;
use crate::ast::*;
use crate::error::FilterError;
use chrono::NaiveDate;
use pretty_assertions::assert_eq;

#[test]
fn test_simple_comparison() {
    let filter = parse("population >= 1000").unwrap();
    assert_eq!(
        filter,
        Filter::compare(
            CompareOp::Gte,
            Expr::property("population"),
            Expr::literal(1000i64)
        )
    );
}

#[test]
fn test_all_comparison_operators() {
    for (text, op) in [
        ("=", CompareOp::Eq),
        ("<>", CompareOp::Ne),
        ("!=", CompareOp::Ne),
        ("<", CompareOp::Lt),
        ("<=", CompareOp::Lte),
        (">", CompareOp::Gt),
        (">=", CompareOp::Gte),
    ] {
        match parse(&format!("a {} 1", text)).unwrap() {
            Filter::Compare { op: parsed, .. } => assert_eq!(parsed, op, "operator {text}"),
            other => panic!("expected comparison, got {other:?}"),
        }
    }
}

#[test]
fn test_and_binds_tighter_than_or() {
    let filter = parse("a = 1 OR b = 2 AND c = 3").unwrap();
    let cmp = |name: &str, n: i64| Filter::compare(CompareOp::Eq, Expr::property(name), Expr::literal(n));
    assert_eq!(
        filter,
        Filter::or(vec![
            cmp("a", 1),
            Filter::and(vec![cmp("b", 2), cmp("c", 3)]),
        ])
    );
}

#[test]
fn test_parentheses_and_not() {
    let filter = parse("NOT (a = 1 OR b = 2)").unwrap();
    match filter {
        Filter::Not { filter } => assert!(matches!(*filter, Filter::Or { .. })),
        other => panic!("expected NOT, got {other:?}"),
    }
}

#[test]
fn test_include_exclude() {
    assert_eq!(parse("INCLUDE").unwrap(), Filter::Include);
    assert_eq!(parse(" exclude ").unwrap(), Filter::Exclude);
}

#[test]
fn test_between_and_not_between() {
    let filter = parse("height BETWEEN 2 AND 5.5").unwrap();
    assert_eq!(
        filter,
        Filter::between(Expr::property("height"), Expr::literal(2i64), Expr::literal(5.5))
    );
    let filter = parse("height NOT BETWEEN 2 AND 5 AND kind = 'x'").unwrap();
    match filter {
        Filter::And { filters } => {
            assert_eq!(filters.len(), 2);
            assert!(matches!(filters[0], Filter::Not { .. }));
        }
        other => panic!("expected AND, got {other:?}"),
    }
}

#[test]
fn test_like_and_ilike() {
    match parse("name LIKE 'Main%'").unwrap() {
        Filter::Like(like) => {
            assert_eq!(like.pattern, "Main%");
            assert!(like.match_case);
        }
        other => panic!("expected LIKE, got {other:?}"),
    }
    match parse("name ILIKE 'o''neil%'").unwrap() {
        Filter::Like(like) => {
            assert_eq!(like.pattern, "o'neil%");
            assert!(!like.match_case);
        }
        other => panic!("expected LIKE, got {other:?}"),
    }
    assert!(matches!(parse("name NOT LIKE 'x'").unwrap(), Filter::Not { .. }));
}

#[test]
fn test_null_checks() {
    assert_eq!(
        parse("owner IS NULL").unwrap(),
        Filter::is_null(Expr::property("owner"))
    );
    assert_eq!(
        parse("owner IS NOT NULL").unwrap(),
        Filter::not(Filter::is_null(Expr::property("owner")))
    );
}

#[test]
fn test_spatial_relation() {
    match parse("WITHIN(geom, SRID=4326;POLYGON((0 0, 4 0, 4 4, 0 4, 0 0)))").unwrap() {
        Filter::Spatial(s) => {
            assert_eq!(s.op, SpatialOp::Within);
            assert_eq!(s.left, Expr::property("geom"));
            let Expr::Literal(Literal::Geometry(value)) = s.right else {
                panic!("expected geometry literal");
            };
            assert_eq!(value.srid, Some(4326));
        }
        other => panic!("expected spatial filter, got {other:?}"),
    }
}

#[test]
fn test_literal_first_spatial_relation() {
    match parse("contains(POINT(1 2), geom)").unwrap() {
        Filter::Spatial(s) => {
            assert_eq!(s.op, SpatialOp::Contains);
            assert!(s.left.as_literal().is_some());
            assert_eq!(s.right, Expr::property("geom"));
        }
        other => panic!("expected spatial filter, got {other:?}"),
    }
}

#[test]
fn test_bbox_with_crs() {
    match parse("BBOX(geom, -10, -5, 10, 5, 'EPSG:3857')").unwrap() {
        Filter::Spatial(s) => {
            assert_eq!(s.op, SpatialOp::BBox);
            let Expr::Literal(Literal::Geometry(envelope)) = s.right else {
                panic!("expected envelope");
            };
            assert_eq!(envelope.srid, Some(3857));
            assert!(envelope.to_wkt().starts_with("POLYGON"));
        }
        other => panic!("expected BBOX, got {other:?}"),
    }
    assert!(parse("BBOX(geom, 0, 0, 1, 1, 'urn:x')").is_err());
}

#[test]
fn test_distance_relations() {
    match parse("DWITHIN(geog, POINT(0 0), 2.5, km)").unwrap() {
        Filter::Distance(d) => {
            assert_eq!(d.op, DistanceOp::DWithin);
            assert_eq!(d.distance, 2.5);
            assert_eq!(d.units, Some(DistanceUnit::Kilometers));
        }
        other => panic!("expected DWITHIN, got {other:?}"),
    }
    match parse("BEYOND(geom, POINT(0 0), 100, 'nautical miles')").unwrap() {
        Filter::Distance(d) => assert_eq!(d.units, Some(DistanceUnit::NauticalMiles)),
        other => panic!("expected BEYOND, got {other:?}"),
    }
    assert!(parse("DWITHIN(geom, POINT(0 0), 1, furlongs)").is_err());
}

#[test]
fn test_function_calls() {
    let filter = parse("strToUpperCase(name) = 'ROME'").unwrap();
    match filter {
        Filter::Compare { left: Expr::Function(f), .. } => {
            assert_eq!(f.name, FunctionName::StrToUpperCase);
            assert_eq!(f.args, vec![Expr::property("name")]);
        }
        other => panic!("expected function comparison, got {other:?}"),
    }
}

#[test]
fn test_literal_kinds() {
    let right = |text: &str| match parse(&format!("x = {}", text)).unwrap() {
        Filter::Compare { right: Expr::Literal(lit), .. } => lit,
        other => panic!("unexpected {other:?}"),
    };
    assert_eq!(right("TRUE"), Literal::Bool(true));
    assert_eq!(right("'abc'"), Literal::from("abc"));
    assert_eq!(right("-3"), Literal::Int(-3));
    let date = NaiveDate::from_ymd_opt(2023, 12, 31).unwrap();
    assert_eq!(right("2023-12-31"), Literal::Date(date));
    assert_eq!(
        right("2023-12-31T23:59:00"),
        Literal::Timestamp(date.and_hms_opt(23, 59, 0).unwrap())
    );
}

#[test]
fn test_quoted_property() {
    let filter = parse("\"Road Name\" = 'A1'").unwrap();
    assert_eq!(
        filter,
        Filter::compare(CompareOp::Eq, Expr::property("Road Name"), Expr::literal("A1"))
    );
}

#[test]
fn test_trailing_input_reports_position() {
    let err = parse("a = 1 b").unwrap_err();
    match err {
        FilterError::Parse { position, .. } => assert_eq!(position, 6),
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn test_invalid_input() {
    assert!(matches!(parse(""), Err(FilterError::Parse { .. })));
    assert!(matches!(parse("a = 'unterminated"), Err(FilterError::Parse { .. })));
    assert!(matches!(parse("AND = 1"), Err(FilterError::Parse { .. })));
}
