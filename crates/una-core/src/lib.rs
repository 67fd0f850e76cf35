//! Core types and trait definitions for the UNA laboratory portal.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

#[macro_use]
mod choices;

pub mod application;
pub mod contact;
pub mod error;
pub mod laboratory;
pub mod metrics;
pub mod notify;
pub mod partner;
pub mod project;
pub mod publication;
pub mod query;
pub mod researcher;
pub mod store;
pub mod track;
pub mod validation;

pub use choices::Choice;
pub use error::{Error, Result};
