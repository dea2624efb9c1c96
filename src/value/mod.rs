//! Dynamic values and their cross-kind ordering
//!
//! Documents hold `Value`s; queries and primary-key lookups order them
//! with [`compare`].

mod compare;
mod types;

pub use compare::{compare, Incomparable};
pub use types::{Value, ValueKind};
