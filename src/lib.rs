//! # pgfilter: filter expressions to PostGIS SQL
//!
//! Translates a predicate tree over feature attributes (comparisons,
//! pattern matches, spatial relations, function calls) into the WHERE-clause
//! text PostgreSQL/PostGIS understands. Nothing is executed; translation is
//! a pure function of the filter, the dialect settings and the schema.
//!
//! ## Quick Example
//!
//! ```rust
//! use pgfilter::prelude::*;
//!
//! let filter = pgfilter::parse("name ILIKE 'main%' AND BBOX(geom, 0, 0, 10, 10)").unwrap();
//! let sql = filter.to_sql().unwrap();
//! assert!(sql.starts_with("(UPPER(\"name\") LIKE 'MAIN%' AND \"geom\" && ST_GeomFromText("));
//! ```
//!
//! ## Encodings
//!
//! | Filter                  | PostGIS SQL                                   |
//! |-------------------------|-----------------------------------------------|
//! | `BBOX` (loose)          | `a && b`                                      |
//! | `INTERSECTS`, `WITHIN`… | `a && b AND ST_Intersects(a, b)`              |
//! | `DISJOINT`              | `NOT (ST_Intersects(a, b))`                   |
//! | `DWITHIN`               | `ST_DWithin(a, b, d)`                         |
//! | `LIKE` on `*_keylist`   | `(x_keylist_vectorise @@ to_tsquery(...))`    |

pub mod ast;
pub mod config;
pub mod error;
pub mod parser;
pub mod schema;
pub mod transpiler;

pub mod prelude {
    pub use crate::ast::*;
    pub use crate::config::TranslatorConfig;
    pub use crate::error::*;
    pub use crate::parser::parse;
    pub use crate::schema::{AttributeDescriptor, Binding, FeatureType, StorageKind};
    pub use crate::transpiler::{Dialect, FilterToSql, GenericDialect, PostgisDialect, ToSql};
}

/// Parse a filter string into a filter tree.
///
/// # Example
///
/// ```
/// use pgfilter::parse;
///
/// let filter = parse("population > 1000").unwrap();
/// assert!(matches!(filter, pgfilter::ast::Filter::Compare { .. }));
/// ```
pub fn parse(input: &str) -> Result<ast::Filter, error::FilterError> {
    parser::parse(input)
}
