//! SQL transpiler for filter trees.
//!
//! [`FilterToSql`] walks a [`Filter`] and writes the WHERE-clause fragment.
//! Logic, comparisons, BETWEEN, NULL checks, properties and scalar literals
//! are encoded here; everything dialect specific goes through the
//! [`Dialect`] hooks, with a generic fallback when a hook declines.

pub mod capabilities;
pub mod like;
pub mod sql;
pub mod traits;
pub mod values;

#[cfg(test)]
mod tests;

use std::fmt::Write;

use tracing::debug;

use crate::ast::*;
use crate::error::{FilterError, FilterResult};
use crate::schema::{AttributeDescriptor, Binding, FeatureType};

pub use capabilities::{Capabilities, Capability};
pub use sql::postgis::PostgisDialect;
pub use traits::{
    Dialect, ExprContext, ExprEncoder, GenericDialect, GeometryContext, escape_identifier,
    quote_string,
};

/// Trait for converting filters to SQL.
pub trait ToSql {
    /// Convert using the PostGIS dialect with default settings.
    fn to_sql(&self) -> FilterResult<String> {
        self.to_sql_with_dialect(&PostgisDialect::default())
    }

    /// Convert using the given dialect.
    fn to_sql_with_dialect(&self, dialect: &dyn Dialect) -> FilterResult<String>;
}

impl ToSql for Filter {
    fn to_sql_with_dialect(&self, dialect: &dyn Dialect) -> FilterResult<String> {
        FilterToSql::new(dialect).encode(self)
    }
}

/// Walks a filter tree and writes SQL into a sink.
///
/// Holds only shared references and the capability set computed at
/// construction, so one instance can encode any number of filters in turn.
pub struct FilterToSql<'a> {
    dialect: &'a dyn Dialect,
    feature_type: Option<&'a FeatureType>,
    capabilities: Capabilities,
}

impl<'a> FilterToSql<'a> {
    pub fn new(dialect: &'a dyn Dialect) -> Self {
        Self {
            dialect,
            feature_type: None,
            capabilities: dialect.capabilities(),
        }
    }

    /// Attach attribute metadata for the table being filtered.
    pub fn with_schema(mut self, feature_type: &'a FeatureType) -> Self {
        self.feature_type = Some(feature_type);
        self
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    /// Encode a filter into a new string.
    pub fn encode(&self, filter: &Filter) -> FilterResult<String> {
        let mut out = String::new();
        self.encode_to(filter, &mut out)?;
        Ok(out)
    }

    /// Encode a filter into `out`. Filters outside the dialect's
    /// capabilities are rejected before anything is written.
    pub fn encode_to(&self, filter: &Filter, out: &mut dyn Write) -> FilterResult<()> {
        if let Some(missing) = self.capabilities.first_unsupported(filter) {
            debug!(dialect = self.dialect.name(), %missing, "filter rejected by capabilities");
            return Err(FilterError::Unsupported(format!(
                "{} is not supported by the {} dialect",
                missing,
                self.dialect.name()
            )));
        }
        self.visit(filter, out)
    }

    fn visit(&self, filter: &Filter, out: &mut dyn Write) -> FilterResult<()> {
        match filter {
            Filter::Include => out.write_str("1 = 1")?,
            Filter::Exclude => out.write_str("0 = 1")?,
            Filter::And { filters } => self.visit_logical(filters, " AND ", "1 = 1", out)?,
            Filter::Or { filters } => self.visit_logical(filters, " OR ", "0 = 1", out)?,
            Filter::Not { filter } => {
                out.write_str("NOT (")?;
                self.visit(filter, out)?;
                out.write_char(')')?;
            }
            Filter::Compare { op, left, right } => self.visit_compare(*op, left, right, out)?,
            Filter::Between { expr, lower, upper } => {
                let ctx = ExprContext::binding(self.binding_of(expr));
                self.encode_expr(expr, &ExprContext::default(), out)?;
                out.write_str(" BETWEEN ")?;
                self.encode_expr(lower, &ctx, out)?;
                out.write_str(" AND ")?;
                self.encode_expr(upper, &ctx, out)?;
            }
            Filter::IsNull { expr } => {
                self.encode_expr(expr, &ExprContext::default(), out)?;
                out.write_str(" IS NULL")?;
            }
            Filter::Like(like) => self.visit_like(like, out)?,
            Filter::Spatial(spatial) => self.visit_spatial(spatial, out)?,
            Filter::Distance(distance) => self.visit_distance(distance, out)?,
        }
        Ok(())
    }

    fn visit_logical(
        &self,
        filters: &[Filter],
        joiner: &str,
        empty: &str,
        out: &mut dyn Write,
    ) -> FilterResult<()> {
        if filters.is_empty() {
            out.write_str(empty)?;
            return Ok(());
        }
        out.write_char('(')?;
        for (i, filter) in filters.iter().enumerate() {
            if i > 0 {
                out.write_str(joiner)?;
            }
            self.visit(filter, out)?;
        }
        out.write_char(')')?;
        Ok(())
    }

    fn visit_compare(
        &self,
        op: CompareOp,
        left: &Expr,
        right: &Expr,
        out: &mut dyn Write,
    ) -> FilterResult<()> {
        self.encode_compared(left, right, out)?;
        write!(out, " {} ", op.as_sql())?;
        self.encode_compared(right, left, out)?;
        Ok(())
    }

    /// Encode one side of a comparison. A text property compared against a
    /// non-text literal is cast to the literal's type; a literal is coerced
    /// toward the other side's declared type.
    fn encode_compared(&self, expr: &Expr, other: &Expr, out: &mut dyn Write) -> FilterResult<()> {
        let other_binding = self.binding_of(other);

        if let (Some(attribute), Some(literal)) = (self.attribute(expr), other.as_literal()) {
            if let Some(target) = literal.binding() {
                if attribute.binding.is_text() && !target.is_text() && target != Binding::Geometry {
                    let mut encoded = String::new();
                    self.encode_expr(expr, &ExprContext::default(), &mut encoded)?;
                    out.write_str(&self.dialect.cast(&encoded, target)?)?;
                    return Ok(());
                }
            }
        }

        let cast_other = self
            .attribute(other)
            .is_some_and(|a| a.binding.is_text())
            && expr
                .as_literal()
                .and_then(Literal::binding)
                .is_some_and(|b| !b.is_text() && b != Binding::Geometry);
        // the other side is being cast to this literal's type, keep the literal as is
        let binding = if cast_other { None } else { other_binding };
        self.encode_expr(expr, &ExprContext::binding(binding), out)
    }

    fn visit_like(&self, like: &LikeFilter, out: &mut dyn Write) -> FilterResult<()> {
        let handled = self
            .dialect
            .encode_like(like, self, out)
            .map_err(FilterError::translation)?;
        if !handled {
            debug!(dialect = self.dialect.name(), "generic LIKE encoding");
            like::write_like(like, &like.pattern, self, out).map_err(FilterError::translation)?;
        }
        Ok(())
    }

    fn visit_spatial(&self, spatial: &SpatialFilter, out: &mut dyn Write) -> FilterResult<()> {
        let handled = match (&spatial.left, &spatial.right) {
            (Expr::Property(property), Expr::Literal(geometry)) => {
                let ctx = self.geometry_context(property);
                self.dialect
                    .encode_binary_spatial(spatial.op, property, geometry, false, &ctx, self, out)?
            }
            (Expr::Literal(geometry), Expr::Property(property)) => {
                let ctx = self.geometry_context(property);
                self.dialect
                    .encode_binary_spatial(spatial.op, property, geometry, true, &ctx, self, out)?
            }
            (left, right) => {
                let ctx = self.operand_context(left, right);
                self.dialect
                    .encode_binary_spatial_exprs(spatial.op, left, right, &ctx, self, out)?
            }
        };
        if !handled {
            return Err(FilterError::Unsupported(format!(
                "{} has no encoding in the {} dialect",
                spatial.op,
                self.dialect.name()
            )));
        }
        Ok(())
    }

    fn visit_distance(&self, distance: &DistanceFilter, out: &mut dyn Write) -> FilterResult<()> {
        let ctx = self.operand_context(&distance.left, &distance.right);
        if !self.dialect.encode_distance(distance, &ctx, self, out)? {
            return Err(FilterError::Unsupported(format!(
                "{} has no encoding in the {} dialect",
                distance.op,
                self.dialect.name()
            )));
        }
        Ok(())
    }

    fn visit_function(&self, function: &Function, out: &mut dyn Write) -> FilterResult<()> {
        let handled = self
            .dialect
            .encode_function(function, self, out)
            .map_err(FilterError::translation)?;
        if !handled {
            debug!(function = %function.name, "generic function encoding");
            self.encode_generic_function(function, out)
                .map_err(FilterError::translation)?;
        }
        Ok(())
    }

    fn encode_generic_function(&self, function: &Function, out: &mut dyn Write) -> FilterResult<()> {
        out.write_str(&self.dialect.function_name(function))?;
        out.write_char('(')?;
        for (i, arg) in function.args.iter().enumerate() {
            if i > 0 {
                out.write_str(", ")?;
            }
            self.encode_expr(arg, &ExprContext::default(), out)?;
        }
        out.write_char(')')?;
        Ok(())
    }

    /// Geometry context of a property operand: declared metadata when the
    /// schema knows the attribute, otherwise just its name.
    fn geometry_context(&self, property: &str) -> GeometryContext {
        match self.feature_type.and_then(|ft| ft.attribute(property)) {
            Some(attribute) => GeometryContext::for_attribute(attribute),
            None => GeometryContext::for_column(property),
        }
    }

    /// Geometry context from the first property operand, if any.
    fn operand_context(&self, left: &Expr, right: &Expr) -> GeometryContext {
        left.as_property()
            .or_else(|| right.as_property())
            .map(|property| self.geometry_context(property))
            .unwrap_or_default()
    }

    fn binding_of(&self, expr: &Expr) -> Option<Binding> {
        self.attribute(expr).map(|a| a.binding)
    }
}

impl ExprEncoder for FilterToSql<'_> {
    fn encode_expr(
        &self,
        expr: &Expr,
        ctx: &ExprContext<'_>,
        out: &mut dyn Write,
    ) -> FilterResult<()> {
        match expr {
            Expr::Property(name) => self.encode_property(name, out),
            Expr::Function(function) => self.visit_function(function, out),
            Expr::Literal(literal) => {
                let is_geometry = matches!(literal, Literal::Geometry(_))
                    || ctx.binding == Some(Binding::Geometry);
                if is_geometry {
                    let fallback = GeometryContext::default();
                    let geometry = ctx.geometry.unwrap_or(&fallback);
                    self.dialect.encode_literal_geometry(literal, geometry, out)
                } else {
                    values::encode_scalar(literal, ctx.binding, out)
                }
            }
        }
    }

    fn encode_property(&self, name: &str, out: &mut dyn Write) -> FilterResult<()> {
        out.write_str(&escape_identifier(name))?;
        Ok(())
    }

    fn attribute(&self, expr: &Expr) -> Option<&AttributeDescriptor> {
        let name = expr.as_property()?;
        self.feature_type?.attribute(name)
    }
}
