//! The auto-ordering rule shared by modules and contents.
//!
//! A row that declares an order field is positioned within a *scope*: the set
//! of rows that agree on the scope columns (the course for a module, the
//! module for a content). When a row is created without an explicit order it
//! goes after the current last row of its scope.
//!
//! The maximum is read and the row inserted as two separate statements with
//! no lock in between. Two writers sharing a database can therefore compute
//! the same value for the same scope.

use crate::{Error, Result};

/// Order assigned to a new row given the largest order already present in its
/// scope, or `None` for an empty scope.
///
/// Explicit orders are stored as given, so a scope may already hold
/// `u32::MAX`; appending after it is an [`Error::OrderOverflow`].
pub fn next_order(current_max: Option<u32>) -> Result<u32> {
  match current_max {
    None => Ok(0),
    Some(max) => max.checked_add(1).ok_or(Error::OrderOverflow),
  }
}
