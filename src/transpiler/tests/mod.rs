//! Transpiler test modules.
//!
//! Tests are organized by category:
//! - `generic`: SQL-92 walker behavior shared by every dialect
//! - `postgis`: end-to-end PostGIS translation from filter text
//! - `errors`: capability rejection and error propagation

mod errors;

use crate::schema::{AttributeDescriptor, Binding, FeatureType};

/// Schema shared by the end-to-end tests.
fn parcels() -> FeatureType {
    FeatureType::new("parcels")
        .with_attribute(AttributeDescriptor::new("name", Binding::String))
        .with_attribute(AttributeDescriptor::new("code", Binding::String))
        .with_attribute(AttributeDescriptor::new("population", Binding::Integer))
        .with_attribute(AttributeDescriptor::new("area", Binding::Double))
        .with_attribute(AttributeDescriptor::new("surveyed", Binding::Date))
        .with_attribute(AttributeDescriptor::new("tags_keylist", Binding::String))
        .with_attribute(AttributeDescriptor::geometry("geom", Some(3857)))
        .with_attribute(AttributeDescriptor::geometry("footprint", None))
        .with_attribute(AttributeDescriptor::geography("geog", Some(4326)))
}
