//! The SQL side of auto-ordering: finding the current maximum order within a
//! scope and assigning the next one.

use educa_core::order::next_order;
use rusqlite::{Connection, ToSql};

/// A table with an `"order"` column scoped by one or more columns.
pub struct OrderField {
  pub table: &'static str,
  pub scope: &'static [&'static str],
}

/// Modules are ordered within their course.
pub const MODULE_ORDER: OrderField = OrderField { table: "modules", scope: &["course_id"] };

/// Contents are ordered within their module.
pub const CONTENT_ORDER: OrderField = OrderField { table: "contents", scope: &["module_id"] };

impl OrderField {
  fn max_sql(&self) -> String {
    let conds = self
      .scope
      .iter()
      .enumerate()
      .map(|(i, col)| format!("{col} = ?{}", i + 1))
      .collect::<Vec<_>>()
      .join(" AND ");
    format!("SELECT MAX(\"order\") FROM {} WHERE {conds}", self.table)
  }

  /// Largest order among rows whose scope columns equal `scope`, in the same
  /// sequence as [`OrderField::scope`].
  pub fn current_max(
    &self,
    conn: &Connection,
    scope: &[&dyn ToSql],
  ) -> rusqlite::Result<Option<u32>> {
    debug_assert_eq!(scope.len(), self.scope.len());
    let max: Option<i64> = conn.query_row(&self.max_sql(), scope, |r| r.get(0))?;
    max
      .map(|v| u32::try_from(v).map_err(|_| rusqlite::Error::IntegralValueOutOfRange(0, v)))
      .transpose()
  }

  /// The order to store for a new row: `explicit` unmodified, or one past the
  /// current maximum of the scope.
  ///
  /// Not atomic with the following insert; callers run both on the same
  /// connection but take no lock. A full scope is reported as a
  /// `ToSqlConversionFailure` wrapping [`educa_core::Error::OrderOverflow`].
  pub fn assign(
    &self,
    conn: &Connection,
    explicit: Option<u32>,
    scope: &[&dyn ToSql],
  ) -> rusqlite::Result<u32> {
    match explicit {
      Some(order) => Ok(order),
      None => next_order(self.current_max(conn, scope)?)
        .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e))),
    }
  }
}
