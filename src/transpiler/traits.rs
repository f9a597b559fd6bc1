//! Transpiler traits and utilities.

use std::fmt::Write;

use crate::ast::*;
use crate::error::FilterResult;
use crate::schema::{AttributeDescriptor, Binding, StorageKind};
use crate::transpiler::capabilities::Capabilities;

/// Quote an identifier. Embedded double quotes are doubled.
pub fn escape_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Quote a string literal. Embedded single quotes are doubled.
pub fn quote_string(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Standard SQL cast, the fallback for targets a dialect has no shorthand for.
pub fn sql92_cast(encoded: &str, target: Binding) -> String {
    format!("CAST({} AS {})", encoded, target.sql_type())
}

/// The geometry column a spatial operand is compared against.
///
/// Built by the walker once per spatial node and passed by reference to
/// every hook that needs it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeometryContext {
    /// Unqualified column name, when a property operand is involved.
    pub column: Option<String>,
    pub storage: StorageKind,
    /// Constant SRID declared for the column.
    pub srid: Option<i32>,
}

impl GeometryContext {
    pub fn for_attribute(attribute: &AttributeDescriptor) -> Self {
        Self {
            column: Some(attribute.name.clone()),
            storage: attribute.storage,
            srid: attribute.srid,
        }
    }

    /// A column known only by name, with no declared metadata.
    pub fn for_column(column: impl Into<String>) -> Self {
        Self {
            column: Some(column.into()),
            ..Self::default()
        }
    }

    pub fn is_geography(&self) -> bool {
        self.storage == StorageKind::Geography
    }
}

/// What the walker knows about the slot an expression is encoded into.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExprContext<'c> {
    /// Expected value type, used to coerce literals.
    pub binding: Option<Binding>,
    /// Geometry column context inside spatial predicates.
    pub geometry: Option<&'c GeometryContext>,
}

impl<'c> ExprContext<'c> {
    pub fn binding(binding: Option<Binding>) -> Self {
        Self {
            binding,
            geometry: None,
        }
    }

    pub fn geometry(geometry: &'c GeometryContext) -> Self {
        Self {
            binding: Some(Binding::Geometry),
            geometry: Some(geometry),
        }
    }
}

/// Callback into the walker, handed to dialect hooks so they can encode
/// nested operands.
pub trait ExprEncoder {
    /// Encode any expression.
    fn encode_expr(
        &self,
        expr: &Expr,
        ctx: &ExprContext<'_>,
        out: &mut dyn Write,
    ) -> FilterResult<()>;

    /// Encode a property reference.
    fn encode_property(&self, name: &str, out: &mut dyn Write) -> FilterResult<()>;

    /// Schema attribute an expression refers to, if it is a known property.
    fn attribute(&self, expr: &Expr) -> Option<&AttributeDescriptor>;
}

/// Dialect hooks consulted by the walker.
///
/// Every hook has a generic default. Hooks returning `bool` report whether
/// they wrote the node; on `false` the walker encodes it generically.
pub trait Dialect {
    /// Human readable dialect name.
    fn name(&self) -> &str;

    /// Node kinds this dialect can translate.
    fn capabilities(&self) -> Capabilities {
        Capabilities::base()
    }

    /// Encode a literal that must be read as a geometry.
    fn encode_literal_geometry(
        &self,
        literal: &Literal,
        _ctx: &GeometryContext,
        out: &mut dyn Write,
    ) -> FilterResult<()> {
        let value = literal.to_geometry()?;
        out.write_str(&quote_string(&value.to_wkt()))?;
        Ok(())
    }

    /// Spatial relation between a property and a geometry literal. `swapped`
    /// is set when the literal was the first operand of the filter.
    #[allow(clippy::too_many_arguments)]
    fn encode_binary_spatial(
        &self,
        _op: SpatialOp,
        _property: &str,
        _geometry: &Literal,
        _swapped: bool,
        _ctx: &GeometryContext,
        _encoder: &dyn ExprEncoder,
        _out: &mut dyn Write,
    ) -> FilterResult<bool> {
        Ok(false)
    }

    /// Spatial relation between two arbitrary expressions.
    fn encode_binary_spatial_exprs(
        &self,
        _op: SpatialOp,
        _left: &Expr,
        _right: &Expr,
        _ctx: &GeometryContext,
        _encoder: &dyn ExprEncoder,
        _out: &mut dyn Write,
    ) -> FilterResult<bool> {
        Ok(false)
    }

    /// Distance relation.
    fn encode_distance(
        &self,
        _filter: &DistanceFilter,
        _ctx: &GeometryContext,
        _encoder: &dyn ExprEncoder,
        _out: &mut dyn Write,
    ) -> FilterResult<bool> {
        Ok(false)
    }

    /// Function call with dialect-specific argument handling.
    fn encode_function(
        &self,
        _function: &Function,
        _encoder: &dyn ExprEncoder,
        _out: &mut dyn Write,
    ) -> FilterResult<bool> {
        Ok(false)
    }

    /// SQL name used when a function is encoded generically.
    fn function_name(&self, function: &Function) -> String {
        function.name.as_str().to_string()
    }

    /// Cast an already encoded expression to `target`.
    fn cast(&self, encoded: &str, target: Binding) -> FilterResult<String> {
        Ok(sql92_cast(encoded, target))
    }

    /// Pattern match.
    fn encode_like(
        &self,
        _like: &LikeFilter,
        _encoder: &dyn ExprEncoder,
        _out: &mut dyn Write,
    ) -> FilterResult<bool> {
        Ok(false)
    }
}

/// Plain SQL-92 with no spatial support; every hook uses its default.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenericDialect;

impl Dialect for GenericDialect {
    fn name(&self) -> &str {
        "SQL-92"
    }
}
