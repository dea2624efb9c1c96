//! jsondb - An embedded, file-backed JSON document store
//!
//! Typed records are stored one table per JSON file. Records describe
//! themselves through [`Record`]; the store derives a [`Schema`] from that
//! description, matches documents by primary key with a cross-kind
//! comparator, and filters tables through [`Query`].
//!
//! ```no_run
//! use jsondb::{field, Field, Record, Store};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Default, Serialize, Deserialize)]
//! struct User {
//!     id: i64,
//!     name: String,
//! }
//!
//! impl Record for User {
//!     fn table_name() -> &'static str { "users" }
//!     fn primary_key() -> &'static str { "id" }
//!     fn fields() -> Vec<Field<Self>> {
//!         vec![field!(User, id: Int), field!(User, name: Str)]
//!     }
//! }
//!
//! # fn main() -> jsondb::DbResult<()> {
//! let store = Store::open_dir("./data")?;
//! store.insert(&User { id: 1, name: "Hello".into() })?;
//!
//! let mut user = User { id: 1, ..Default::default() };
//! store.find(&mut user)?;
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod document;
pub mod error;
pub mod observability;
pub mod query;
pub mod schema;
pub mod storage;
pub mod store;
pub mod value;

pub use config::StoreConfig;
pub use document::Document;
pub use error::{DbError, DbResult};
pub use query::{Expression, Operator, Query};
pub use schema::{Column, Field, Record, Schema};
pub use storage::{JsonFileStorage, MemoryStorage, TableStorage};
pub use store::Store;
pub use value::{compare, Value, ValueKind};
