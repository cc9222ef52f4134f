//! Durable table of daily observations.
//!
//! One flat SQLite table, CRUD only. Every operation opens its own
//! connection and drops it before returning; nothing is cached between
//! calls. Values are stored exactly as given: the boundary validates, the
//! store does not.

pub mod error;
pub mod store;

pub use error::{Result, StoreError};
pub use store::{RecordStore, SortOrder};
