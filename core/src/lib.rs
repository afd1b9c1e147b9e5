//! Core library for the household manager
//!
//! This crate contains the domain model and the logic that does not talk
//! to the network:
//! - Task and user records, and normalization of what the services send
//! - Query/filter types and the pure derivations views are built from
//! - The service traits the client side is written against
//! - A file-backed task service used by the reference server and in tests

pub mod error;
pub mod notification;
pub mod task;
pub mod user;

pub use error::Error;
pub type Result<T> = std::result::Result<T, Error>;
