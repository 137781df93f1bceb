//! JSON REST API for the Educa course catalog.
//!
//! Exposes an axum [`Router`] backed by any [`educa_core::store::CatalogStore`].
//! Listings are public; enrollment requires HTTP Basic credentials checked
//! against the store's users. TLS and transport are the caller's
//! responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .merge(educa_api::api_router(store.clone()))
//! ```

pub mod auth;
pub mod courses;
pub mod error;
pub mod pagination;
pub mod subjects;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use educa_core::store::CatalogStore;

pub use error::ApiError;

/// Build the API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: CatalogStore + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    // Subjects
    .route("/subjects/", get(subjects::list::<S>))
    .route("/subjects/{id}/", get(subjects::get_one::<S>))
    // Courses
    .route("/courses/", get(courses::list::<S>))
    .route("/courses/{id}/", get(courses::get_one::<S>))
    .route("/courses/{id}/enroll/", post(courses::enroll::<S>))
    .with_state(store)
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests;
