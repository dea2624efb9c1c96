//! Query engine for jsondb
//!
//! Evaluates conjunctions of `field <op> literal` expressions over a
//! snapshot of a table, with offset/limit pagination and typed projection.
//!
//! # Invariants
//!
//! - Scan order is file order
//! - The snapshot is never mutated by evaluation
//! - Comparison failures never surface as errors; they only decide matches

mod ast;
mod filters;
mod query;

pub use ast::{Expression, Operator};
pub use filters::ExpressionFilter;
pub use query::Query;
