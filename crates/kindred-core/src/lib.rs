//! Core types and trait definitions for the Kindred relationship engine.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod ancestry;
pub mod error;
pub mod fact;
pub mod matching;
pub mod person;
pub mod relation;
pub mod request;
pub mod store;

pub use error::{Error, Result};
