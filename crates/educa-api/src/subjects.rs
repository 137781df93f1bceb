//! Handlers for `/subjects/` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/subjects/` | Paginated, ordered by title; `?page=`, `?page_size=` |
//! | `GET`  | `/subjects/{id}/` | 404 if not found |

use std::sync::Arc;

use axum::{
  Json,
  extract::{OriginalUri, Path, Query, State, rejection::QueryRejection},
};
use educa_core::{page::Page, store::CatalogStore, subject::SubjectSummary};

use crate::{
  error::ApiError,
  pagination::{PageBody, PageParams},
};

/// `GET /subjects/[?page=<n>][&page_size=<m>]`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  OriginalUri(uri): OriginalUri,
  query: Result<Query<PageParams>, QueryRejection>,
) -> Result<Json<PageBody<SubjectSummary>>, ApiError>
where
  S: CatalogStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let Query(params) = query?;
  let request = params.request();
  let count   = store.count_subjects().await.map_err(ApiError::store)?;
  let window  = request.window(count)?;
  let results = store.list_subjects(window).await.map_err(ApiError::store)?;

  let page = Page { count, page: request.page, page_size: request.page_size, results };
  Ok(Json(PageBody::new(&uri, params, page)))
}

/// `GET /subjects/{id}/`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<SubjectSummary>, ApiError>
where
  S: CatalogStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let subject = store
    .get_subject(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(ApiError::not_found)?;
  Ok(Json(subject))
}
