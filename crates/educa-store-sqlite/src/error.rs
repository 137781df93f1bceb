//! Error type for `educa-store-sqlite`.

use educa_core::content::ItemRef;
use rusqlite::ffi;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] educa_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("decode error: {0}")]
  Decode(String),

  /// A unique column (slug, username) already holds the value.
  #[error("conflict: {0}")]
  Conflict(String),

  /// A foreign key points at a row that does not exist.
  #[error("invalid reference: {0}")]
  InvalidReference(String),

  #[error("content item not found: {} {}", .0.kind, .0.id)]
  ItemNotFound(ItemRef),
}

impl Error {
  /// Classify a failed write, turning constraint violations into
  /// [`Error::Conflict`] or [`Error::InvalidReference`] and unwrapping core
  /// errors raised inside the connection closure.
  pub(crate) fn from_write(
    err: tokio_rusqlite::Error,
    conflict: impl FnOnce() -> String,
  ) -> Self {
    let err = match err {
      tokio_rusqlite::Error::Rusqlite(rusqlite::Error::ToSqlConversionFailure(inner)) => {
        match inner.downcast::<educa_core::Error>() {
          Ok(core) => return Error::Core(*core),
          Err(inner) => tokio_rusqlite::Error::Rusqlite(
            rusqlite::Error::ToSqlConversionFailure(inner),
          ),
        }
      }
      other => other,
    };
    if let tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(e, msg)) = &err {
      match e.extended_code {
        ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
          return Error::Conflict(conflict());
        }
        ffi::SQLITE_CONSTRAINT_FOREIGNKEY => {
          return Error::InvalidReference(
            msg.clone().unwrap_or_else(|| "foreign key constraint failed".into()),
          );
        }
        _ => {}
      }
    }
    Error::Database(err)
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
