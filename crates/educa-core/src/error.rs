//! Error types for `educa-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid page")]
  InvalidPage,

  #[error("unknown content kind: {0:?}")]
  UnknownContentKind(String),

  #[error("order overflow: the scope already holds the largest order")]
  OrderOverflow,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
