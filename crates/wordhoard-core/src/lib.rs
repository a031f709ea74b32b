//! Core types and trait definitions for the wordhoard vocabulary catalog.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! Storage backends implement [`store::WordStore`]; read-side consumers hold
//! a [`session::WordSession`] over one of them.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod export;
pub mod query;
pub mod session;
pub mod stats;
pub mod store;
pub mod word;

pub use error::{Classify, Error, ErrorKind, Result};
