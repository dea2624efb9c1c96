//! Observability for jsondb
//!
//! - Structured JSON logging with a process-wide severity threshold
//! - A closed catalogue of events
//! - Per-store operation counters
//!
//! Observability is read-only: nothing here changes the outcome of an
//! operation.
//!
//! ```ignore
//! use jsondb::observability::{Event, Logger};
//!
//! Logger::info(Event::TableFlushed, &[("table", "users"), ("documents", "3")]);
//! ```

mod events;
mod logger;
mod metrics;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use metrics::{MetricsRegistry, MetricsSnapshot};
