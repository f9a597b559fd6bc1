//! Capability rejection and error propagation.

use std::error::Error;
use std::fmt;

use crate::ast::*;
use crate::error::FilterError;
use crate::parser::parse;
use crate::transpiler::{Capabilities, Capability, Dialect, FilterToSql, GenericDialect, PostgisDialect};

/// Sink that accepts `budget` bytes and then fails.
struct FailingSink {
    budget: usize,
}

impl fmt::Write for FailingSink {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if s.len() > self.budget {
            return Err(fmt::Error);
        }
        self.budget -= s.len();
        Ok(())
    }
}

/// Declares spatial and function support but overrides no hook.
struct BareDialect;

impl Dialect for BareDialect {
    fn name(&self) -> &str {
        "bare"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::base()
            .with(Capability::Spatial(SpatialOp::Intersects))
            .with(Capability::Function(FunctionName::StrLength))
    }
}

#[test]
fn test_generic_dialect_rejects_spatial() {
    let filter = parse("name = 'x' AND INTERSECTS(geom, POINT(0 0))").unwrap();
    let err = FilterToSql::new(&GenericDialect).encode(&filter).unwrap_err();
    match err {
        FilterError::Unsupported(msg) => {
            assert!(msg.contains("INTERSECTS"), "{msg}");
            assert!(msg.contains("SQL-92"), "{msg}");
        }
        other => panic!("expected unsupported, got {other:?}"),
    }
}

#[test]
fn test_rejected_filter_writes_nothing() {
    let filter = parse("name = 'x' OR strLength(name) > 1").unwrap();
    let dialect = PostgisDialect::new();
    let mut out = String::new();
    let err = FilterToSql::new(&dialect).encode_to(&filter, &mut out).unwrap_err();
    assert!(matches!(err, FilterError::Unsupported(_)));
    assert!(out.is_empty());
}

#[test]
fn test_unknown_function_is_unsupported() {
    let filter = parse("area(geom) > 10").unwrap();
    let dialect = PostgisDialect::new().with_function_encoding(true);
    assert!(matches!(
        FilterToSql::new(&dialect).encode(&filter),
        Err(FilterError::Unsupported(_))
    ));
}

#[test]
fn test_declined_hooks_fall_back_or_fail() {
    let walker = FilterToSql::new(&BareDialect);
    assert_eq!(
        walker.encode(&parse("strLength(name) = 3").unwrap()).unwrap(),
        "strLength(\"name\") = 3"
    );

    let err = walker
        .encode(&parse("INTERSECTS(geom, POINT(0 0))").unwrap())
        .unwrap_err();
    match err {
        FilterError::Unsupported(msg) => assert!(msg.contains("no encoding"), "{msg}"),
        other => panic!("expected unsupported, got {other:?}"),
    }
}

#[test]
fn test_sink_failure_in_walker_is_io() {
    let filter = parse("population > 1").unwrap();
    let mut sink = FailingSink { budget: 0 };
    let err = FilterToSql::new(&GenericDialect)
        .encode_to(&filter, &mut sink)
        .unwrap_err();
    assert!(matches!(err, FilterError::Io(_)));
}

#[test]
fn test_sink_failure_in_like_hook_is_translation() {
    let filter = parse("tags_keylist LIKE 'a b'").unwrap();
    let dialect = PostgisDialect::new();
    let mut sink = FailingSink { budget: 0 };
    let err = FilterToSql::new(&dialect)
        .encode_to(&filter, &mut sink)
        .unwrap_err();
    match &err {
        FilterError::Translation(inner) => assert!(matches!(**inner, FilterError::Io(_))),
        other => panic!("expected translation error, got {other:?}"),
    }
    assert!(err.source().is_some());
}

#[test]
fn test_function_errors_are_wrapped_once() {
    let dialect = PostgisDialect::new().with_function_encoding(true);
    let walker = FilterToSql::new(&dialect);

    let err = walker.encode(&parse("strConcat(name) = 'x'").unwrap()).unwrap_err();
    match err {
        FilterError::Translation(inner) => assert!(matches!(*inner, FilterError::Arity { .. })),
        other => panic!("expected translation error, got {other:?}"),
    }

    // nested hook failure still carries a single wrapper
    let err = walker
        .encode(&parse("strToUpperCase(strConcat(name)) = 'x'").unwrap())
        .unwrap_err();
    match err {
        FilterError::Translation(inner) => assert!(matches!(*inner, FilterError::Arity { .. })),
        other => panic!("expected translation error, got {other:?}"),
    }
}

#[test]
fn test_geometry_compared_to_non_geometry() {
    let filter = Filter::spatial(
        SpatialOp::Intersects,
        Expr::property("geom"),
        Expr::literal(42i64),
    );
    let dialect = PostgisDialect::new();
    let err = FilterToSql::new(&dialect).encode(&filter).unwrap_err();
    assert!(matches!(err, FilterError::Coercion { expected: "geometry", found: "integer" }));
}

#[test]
fn test_text_that_is_not_a_geometry() {
    let filter = parse("INTERSECTS(geom, 'hello')").unwrap();
    let dialect = PostgisDialect::new();
    let err = FilterToSql::new(&dialect).encode(&filter).unwrap_err();
    assert!(matches!(err, FilterError::Coercion { expected: "geometry", found: "string" }));
}
