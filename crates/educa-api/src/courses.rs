//! Handlers for `/courses/` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/courses/` | Paginated, newest first, modules and contents nested |
//! | `GET`  | `/courses/{id}/` | 404 if not found |
//! | `POST` | `/courses/{id}/enroll/` | Basic auth; adds the caller to the students |

use std::sync::Arc;

use axum::{
  Json,
  extract::{OriginalUri, Path, Query, State, rejection::QueryRejection},
};
use educa_core::{course::CourseDetail, page::Page, store::CatalogStore};
use serde::Serialize;

use crate::{
  auth::AuthUser,
  error::ApiError,
  pagination::{PageBody, PageParams},
};

/// `GET /courses/[?page=<n>][&page_size=<m>]`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  OriginalUri(uri): OriginalUri,
  query: Result<Query<PageParams>, QueryRejection>,
) -> Result<Json<PageBody<CourseDetail>>, ApiError>
where
  S: CatalogStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let Query(params) = query?;
  let request = params.request();
  let count   = store.count_courses().await.map_err(ApiError::store)?;
  let window  = request.window(count)?;
  let results = store.list_courses(window).await.map_err(ApiError::store)?;

  let page = Page { count, page: request.page, page_size: request.page_size, results };
  Ok(Json(PageBody::new(&uri, params, page)))
}

/// `GET /courses/{id}/`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<CourseDetail>, ApiError>
where
  S: CatalogStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let course = store
    .get_course(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(ApiError::not_found)?;
  Ok(Json(course))
}

#[derive(Debug, Serialize)]
pub struct Enrolled {
  pub enrolled: bool,
}

/// `POST /courses/{id}/enroll/`
///
/// Credentials are checked before the course is looked up, so an anonymous
/// caller gets 401 even for a course that does not exist.
pub async fn enroll<S>(
  State(store): State<Arc<S>>,
  AuthUser(user): AuthUser,
  Path(id): Path<i64>,
) -> Result<Json<Enrolled>, ApiError>
where
  S: CatalogStore + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  store
    .enroll(id, user.id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(ApiError::not_found)?;

  tracing::info!(course = id, user = %user.username, "student enrolled");
  Ok(Json(Enrolled { enrolled: true }))
}
