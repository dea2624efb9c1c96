//! Schema mapping for record types
//!
//! Record types describe themselves through a static field table. From that
//! table the mapper derives column metadata and locates the primary key.
//!
//! # Rules
//!
//! - Columns follow field declaration order
//! - External name = tag alias before the first `,`, else the field identifier
//! - Fields tagged `-` are excluded
//! - A column is primary when its identifier or external name equals the
//!   record's declared primary key
//! - No primary column: `PrimaryKeyMissing`

mod record;
mod types;

pub use record::{Field, Record, EXCLUDED_TAG};
pub use types::{Column, Schema};
