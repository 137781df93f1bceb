//! HTTP Basic authentication against the user table.

use std::sync::Arc;

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString,
};
use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, header, request::Parts};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;
use educa_core::{store::CatalogStore, user::User};
use rand_core::OsRng;

use crate::error::ApiError;

const NOT_PROVIDED: &str = "Authentication credentials were not provided.";
const INVALID: &str = "Invalid username/password.";

/// The authenticated caller. Present in a handler means the request carried
/// valid Basic credentials for an existing user.
pub struct AuthUser(pub User);

/// Produce an argon2 PHC string for `password` with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
  let salt = SaltString::generate(&mut OsRng);
  Ok(Argon2::default().hash_password(password.as_bytes(), &salt)?.to_string())
}

/// Check `password` against a stored PHC string. Malformed hashes never match.
pub fn verify_password(password: &str, password_hash: &str) -> bool {
  PasswordHash::new(password_hash)
    .and_then(|parsed| Argon2::default().verify_password(password.as_bytes(), &parsed))
    .is_ok()
}

/// Extract `(username, password)` from an `Authorization: Basic …` header.
pub fn basic_credentials(headers: &HeaderMap) -> Result<(String, String), ApiError> {
  let header_val = headers
    .get(header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .ok_or_else(|| ApiError::Unauthorized(NOT_PROVIDED.into()))?;

  let encoded = header_val
    .strip_prefix("Basic ")
    .ok_or_else(|| ApiError::Unauthorized(NOT_PROVIDED.into()))?;

  let invalid = || ApiError::Unauthorized("Invalid basic header.".into());
  let decoded = B64.decode(encoded.trim()).map_err(|_| invalid())?;
  let creds   = String::from_utf8(decoded).map_err(|_| invalid())?;
  let (username, password) = creds.split_once(':').ok_or_else(invalid)?;

  Ok((username.to_owned(), password.to_owned()))
}

impl<S> FromRequestParts<Arc<S>> for AuthUser
where
  S: CatalogStore + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    store: &Arc<S>,
  ) -> Result<Self, Self::Rejection> {
    let (username, password) = basic_credentials(&parts.headers)?;

    let user = store
      .find_user(&username)
      .await
      .map_err(ApiError::store)?
      .filter(|u| verify_password(&password, &u.password_hash));

    match user {
      Some(user) => Ok(AuthUser(user)),
      None => {
        tracing::warn!(%username, "rejected basic credentials");
        Err(ApiError::Unauthorized(INVALID.into()))
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use axum::http::HeaderValue;

  fn headers(value: &str) -> HeaderMap {
    let mut h = HeaderMap::new();
    h.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
    h
  }

  #[test]
  fn parses_basic_header() {
    let value = format!("Basic {}", B64.encode("alice:s3cr:et"));
    let (user, pass) = basic_credentials(&headers(&value)).unwrap();
    assert_eq!(user, "alice");
    assert_eq!(pass, "s3cr:et");
  }

  #[test]
  fn missing_header() {
    assert!(matches!(
      basic_credentials(&HeaderMap::new()),
      Err(ApiError::Unauthorized(m)) if m == NOT_PROVIDED
    ));
  }

  #[test]
  fn invalid_base64() {
    assert!(matches!(
      basic_credentials(&headers("Basic !!!not-base64!!!")),
      Err(ApiError::Unauthorized(_))
    ));
  }

  #[test]
  fn other_schemes_are_not_credentials() {
    assert!(matches!(
      basic_credentials(&headers("Bearer abc")),
      Err(ApiError::Unauthorized(_))
    ));
  }

  #[test]
  fn hash_then_verify() {
    let hash = hash_password("secret").unwrap();
    assert!(verify_password("secret", &hash));
    assert!(!verify_password("wrong", &hash));
    assert!(!verify_password("secret", "not-a-phc-string"));
  }
}
