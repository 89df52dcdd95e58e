//! Core types and trait definitions for the rollcall attendance service.
//!
//! Deliberately free of HTTP and database dependencies: every other
//! crate depends on this one, never the other way around.

pub mod attendance;
pub mod descriptor;
pub mod error;
pub mod extract;
pub mod identity;
pub mod matcher;
pub mod photos;
pub mod store;

pub use error::{Error, Result};
