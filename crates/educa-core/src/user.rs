//! Users: course owners, content authors, and enrolled students.

use serde::{Deserialize, Serialize};

/// A registered account.
///
/// The password hash never leaves the server: it is skipped on serialisation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
  pub id:            i64,
  pub username:      String,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  #[serde(skip_serializing, default)]
  pub password_hash: String,
}

/// Input for [`CatalogStore::create_user`](crate::store::CatalogStore::create_user).
#[derive(Debug, Clone)]
pub struct NewUser {
  pub username:      String,
  pub password_hash: String,
}
