//! Educa server: configuration and the HTTP application.
//!
//! The deployment environment is chosen once at process start and selects the
//! defaults a configuration is built from; nothing is switched afterwards.

pub mod settings;

pub use settings::{AppConfig, Environment};

use std::sync::Arc;

use axum::Router;
use educa_core::store::CatalogStore;
use tower_http::trace::TraceLayer;

/// The full HTTP application: the API routes wrapped in request tracing.
pub fn app<S>(store: Arc<S>) -> Router
where
  S: CatalogStore + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  educa_api::api_router(store).layer(TraceLayer::new_for_http())
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode},
  };
  use educa_core::{subject::NewSubject, store::CatalogStore as _};
  use educa_store_sqlite::SqliteStore;
  use tower::ServiceExt as _;

  #[tokio::test]
  async fn app_serves_api_routes() {
    let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
    store
      .create_subject(NewSubject { title: "Physics".into(), slug: "physics".into() })
      .await
      .unwrap();

    let req = Request::builder().uri("/subjects/").body(Body::empty()).unwrap();
    let resp = app(store).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["results"][0]["slug"], "physics");
  }

  #[tokio::test]
  async fn unknown_paths_are_404() {
    let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
    let req = Request::builder().uri("/admin/").body(Body::empty()).unwrap();
    let resp = app(store).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }
}
