//! Core types and trait definitions for the Educa course catalog.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it.

// Native `async fn` in traits; the store trait spells out `Send` futures itself.
#![allow(async_fn_in_trait)]

pub mod content;
pub mod course;
pub mod error;
pub mod order;
pub mod page;
pub mod store;
pub mod subject;
pub mod user;

pub use error::{Error, Result};
