//! Filter object model.
//!
//! A [`Filter`] is a predicate tree over feature attributes; its operands are
//! [`Expr`] values (properties, literals, function calls). The translator
//! only reads these types, it never rewrites them.

pub mod expr;
pub mod filter;
pub mod operators;
pub mod values;

pub use expr::*;
pub use filter::*;
pub use operators::*;
pub use values::*;
