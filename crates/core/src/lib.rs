//! Domain types and validation for the pulsefit CMS.
//!
//! This crate holds everything the persistence and HTTP layers agree on:
//! shared ID/timestamp aliases, the typed domain error, page and block
//! value types with their validation rules, and the block render registry.
//! It performs no I/O.

pub mod block;
pub mod error;
pub mod page;
pub mod render;
pub mod types;
