//! Database specific dialects.

pub mod postgis;
