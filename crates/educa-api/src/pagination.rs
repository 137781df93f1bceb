//! The paginated response envelope shared by list endpoints.
//!
//! `next` and `previous` are links relative to the server root, built from the
//! path the request arrived on so they stay valid when the router is nested.

use axum::http::Uri;
use educa_core::page::{Page, PageRequest};
use serde::{Deserialize, Serialize};

/// `?page=<n>&page_size=<m>`; both optional.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageParams {
  pub page:      Option<u32>,
  pub page_size: Option<u32>,
}

impl PageParams {
  pub fn request(&self) -> PageRequest { PageRequest::new(self.page, self.page_size) }
}

#[derive(Debug, Serialize)]
pub struct PageBody<T> {
  pub count:    u64,
  pub next:     Option<String>,
  pub previous: Option<String>,
  pub results:  Vec<T>,
}

impl<T> PageBody<T> {
  /// Wrap `page`, linking neighbours on the same path. A page size is
  /// repeated in the links only when the caller supplied one.
  pub fn new(uri: &Uri, params: PageParams, page: Page<T>) -> Self {
    let link = |n: u32| {
      let mut url = format!("{}?page={n}", uri.path());
      if params.page_size.is_some() {
        url.push_str(&format!("&page_size={}", page.page_size));
      }
      url
    };

    let next     = page.has_next().then(|| link(page.page + 1));
    let previous = page.has_previous().then(|| link(page.page - 1));

    PageBody { count: page.count, next, previous, results: page.results }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn page(count: u64, page: u32, page_size: u32) -> Page<u8> {
    Page { count, page, page_size, results: vec![] }
  }

  #[test]
  fn middle_page_links_both_ways() {
    let uri: Uri = "/api/subjects/?page=2".parse().unwrap();
    let body = PageBody::new(&uri, PageParams { page: Some(2), page_size: None }, page(25, 2, 10));
    assert_eq!(body.next.as_deref(), Some("/api/subjects/?page=3"));
    assert_eq!(body.previous.as_deref(), Some("/api/subjects/?page=1"));
    assert_eq!(body.count, 25);
  }

  #[test]
  fn single_page_has_no_links() {
    let uri: Uri = "/courses/".parse().unwrap();
    let body = PageBody::new(&uri, PageParams::default(), page(3, 1, 10));
    assert!(body.next.is_none());
    assert!(body.previous.is_none());
  }

  #[test]
  fn explicit_page_size_is_carried_over() {
    let uri: Uri = "/courses/?page_size=2".parse().unwrap();
    let body = PageBody::new(&uri, PageParams { page: None, page_size: Some(2) }, page(5, 1, 2));
    assert_eq!(body.next.as_deref(), Some("/courses/?page=2&page_size=2"));
  }
}
