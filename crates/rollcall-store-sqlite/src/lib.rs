//! SQLite backend for the rollcall identity store and attendance ledger.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated
//! thread without blocking the async runtime. That single serialised
//! connection is also what makes each operation transactional: no other
//! statement interleaves with a `call` closure.

mod encode;
mod schema;
mod store;

pub use store::SqliteStore;
