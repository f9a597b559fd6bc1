//! PostGIS dialect.
//!
//! Overrides the generic hooks for geometry literals, spatial and distance
//! relations, string/math functions, casts, and LIKE (including the
//! full-text search convention for `*_keylist` attributes).

mod capabilities;
mod functions;
mod like;
mod literal;
mod spatial;

use std::fmt::Write;

use crate::ast::*;
use crate::error::FilterResult;
use crate::schema::Binding;
use crate::transpiler::capabilities::Capabilities;
use crate::transpiler::traits::{Dialect, ExprEncoder, GeometryContext};

pub use capabilities::{ENCODED_FUNCTIONS, postgis_capabilities};
pub use like::{KEYLIST_SUFFIX, TEXT_SEARCH_CONFIG, VECTORISE_SUFFIX, tsquery_terms};
pub use literal::WGS84_SRID;

/// PostGIS translation settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostgisDialect {
    loose_bbox: bool,
    function_encoding: bool,
}

impl Default for PostgisDialect {
    fn default() -> Self {
        Self::new()
    }
}

impl PostgisDialect {
    /// Loose bounding boxes on, function encoding off.
    pub fn new() -> Self {
        Self {
            loose_bbox: true,
            function_encoding: false,
        }
    }

    /// Encode BBOX as the index-only `&&` test (may over-match) instead of
    /// adding an exact `ST_Intersects`.
    pub fn with_loose_bbox(mut self, enabled: bool) -> Self {
        self.loose_bbox = enabled;
        self
    }

    /// Declare the string and math functions as translatable.
    pub fn with_function_encoding(mut self, enabled: bool) -> Self {
        self.function_encoding = enabled;
        self
    }

    pub fn is_loose_bbox_enabled(&self) -> bool {
        self.loose_bbox
    }

    pub fn set_loose_bbox_enabled(&mut self, enabled: bool) {
        self.loose_bbox = enabled;
    }

    pub fn is_function_encoding_enabled(&self) -> bool {
        self.function_encoding
    }

    pub fn set_function_encoding_enabled(&mut self, enabled: bool) {
        self.function_encoding = enabled;
    }
}

impl Dialect for PostgisDialect {
    fn name(&self) -> &str {
        "PostGIS"
    }

    fn capabilities(&self) -> Capabilities {
        postgis_capabilities(self.function_encoding)
    }

    fn encode_literal_geometry(
        &self,
        literal: &Literal,
        ctx: &GeometryContext,
        out: &mut dyn Write,
    ) -> FilterResult<()> {
        literal::encode_geometry(literal, ctx, out)
    }

    fn encode_binary_spatial(
        &self,
        op: SpatialOp,
        property: &str,
        geometry: &Literal,
        swapped: bool,
        ctx: &GeometryContext,
        encoder: &dyn ExprEncoder,
        out: &mut dyn Write,
    ) -> FilterResult<bool> {
        spatial::encode_property_literal(
            op,
            property,
            geometry,
            swapped,
            self.loose_bbox,
            ctx,
            encoder,
            out,
        )?;
        Ok(true)
    }

    fn encode_binary_spatial_exprs(
        &self,
        op: SpatialOp,
        left: &Expr,
        right: &Expr,
        ctx: &GeometryContext,
        encoder: &dyn ExprEncoder,
        out: &mut dyn Write,
    ) -> FilterResult<bool> {
        spatial::encode_exprs(op, left, right, self.loose_bbox, ctx, encoder, out)?;
        Ok(true)
    }

    fn encode_distance(
        &self,
        filter: &DistanceFilter,
        ctx: &GeometryContext,
        encoder: &dyn ExprEncoder,
        out: &mut dyn Write,
    ) -> FilterResult<bool> {
        spatial::encode_distance(filter, ctx, encoder, out)?;
        Ok(true)
    }

    fn encode_function(
        &self,
        function: &Function,
        encoder: &dyn ExprEncoder,
        out: &mut dyn Write,
    ) -> FilterResult<bool> {
        functions::encode_function(function, encoder, out)
    }

    fn function_name(&self, function: &Function) -> String {
        functions::function_name(function)
    }

    fn cast(&self, encoded: &str, target: Binding) -> FilterResult<String> {
        Ok(functions::cast(encoded, target))
    }

    fn encode_like(
        &self,
        like: &LikeFilter,
        encoder: &dyn ExprEncoder,
        out: &mut dyn Write,
    ) -> FilterResult<bool> {
        like::encode_like(like, encoder, out)?;
        Ok(true)
    }
}
