//! Page-number pagination for list endpoints.
//!
//! A collection of `count` rows split into pages of `page_size` always has at
//! least one page, so an empty collection still serves page 1. Any other page
//! outside `1..=num_pages` is an error, never an empty page.

use serde::Serialize;

use crate::{Error, Result};

/// Page size used when the caller does not ask for one.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Largest page size a caller may ask for.
pub const MAX_PAGE_SIZE: u32 = 50;

/// A caller's request for one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
  /// 1-indexed.
  pub page:      u32,
  pub page_size: u32,
}

/// The slice of rows a valid page covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
  pub offset: u64,
  pub limit:  u64,
}

impl PageRequest {
  /// Build a request from optional query values.
  ///
  /// A missing page means page 1. A missing or zero page size means
  /// [`DEFAULT_PAGE_SIZE`]; larger sizes are capped at [`MAX_PAGE_SIZE`].
  /// Page 0 is kept as given so [`window`](Self::window) can reject it.
  pub fn new(page: Option<u32>, page_size: Option<u32>) -> Self {
    let page_size = match page_size {
      None | Some(0) => DEFAULT_PAGE_SIZE,
      Some(n) => n.min(MAX_PAGE_SIZE),
    };
    Self { page: page.unwrap_or(1), page_size }
  }

  pub fn num_pages(&self, count: u64) -> u64 {
    count.div_ceil(u64::from(self.page_size)).max(1)
  }

  /// The rows to fetch for this page out of `count`, or
  /// [`Error::InvalidPage`] if the page does not exist.
  pub fn window(&self, count: u64) -> Result<Window> {
    let page = u64::from(self.page);
    if page == 0 || page > self.num_pages(count) {
      return Err(Error::InvalidPage);
    }
    let limit = u64::from(self.page_size);
    Ok(Window { offset: (page - 1) * limit, limit })
  }
}

impl Default for PageRequest {
  fn default() -> Self { Self::new(None, None) }
}

/// One page of an ordered collection.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
  /// Total rows across all pages.
  pub count:     u64,
  pub page:      u32,
  pub page_size: u32,
  pub results:   Vec<T>,
}

impl<T> Page<T> {
  pub fn num_pages(&self) -> u64 {
    PageRequest { page: self.page, page_size: self.page_size }.num_pages(self.count)
  }

  pub fn has_next(&self) -> bool { u64::from(self.page) < self.num_pages() }

  pub fn has_previous(&self) -> bool { self.page > 1 }

  pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
    Page {
      count:     self.count,
      page:      self.page,
      page_size: self.page_size,
      results:   self.results.into_iter().map(f).collect(),
    }
  }
}
