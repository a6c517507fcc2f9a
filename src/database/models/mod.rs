//! Database Models
//!
//! Record types stored in SQLite.

mod core;


pub use self::core::{UserRecord, ViewportRecord};
