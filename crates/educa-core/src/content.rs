//! Content items and the polymorphic reference a module uses to point at them.
//!
//! There are four kinds of content item, each stored in its own table. A
//! [`Content`](crate::course::Content) row names one of them by an
//! [`ItemRef`]: the kind tag selects the table, the id selects the row.
//! Every kind shares the [`ItemBase`] field set.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Error;

// ─── Kind tag ────────────────────────────────────────────────────────────────

/// The kind tag of a content item. Only these four are ever accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
  Text,
  File,
  Image,
  Video,
}

impl ContentKind {
  pub const ALL: [ContentKind; 4] =
    [Self::Text, Self::File, Self::Image, Self::Video];

  pub fn as_str(self) -> &'static str {
    match self {
      Self::Text => "text",
      Self::File => "file",
      Self::Image => "image",
      Self::Video => "video",
    }
  }
}

impl fmt::Display for ContentKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for ContentKind {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "text" => Ok(Self::Text),
      "file" => Ok(Self::File),
      "image" => Ok(Self::Image),
      "video" => Ok(Self::Video),
      other => Err(Error::UnknownContentKind(other.to_owned())),
    }
  }
}

/// A (kind, id) pair identifying exactly one content item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemRef {
  pub kind: ContentKind,
  pub id:   i64,
}

impl ItemRef {
  pub fn new(kind: ContentKind, id: i64) -> Self { Self { kind, id } }
}

// ─── Items ───────────────────────────────────────────────────────────────────

/// Fields every content item carries, whatever its kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemBase {
  pub id:      i64,
  /// The user who authored the item.
  pub owner:   i64,
  pub title:   String,
  /// Set once when the item is created.
  pub created: DateTime<Utc>,
  /// Refreshed on every save.
  pub updated: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextItem {
  #[serde(flatten)]
  pub base: ItemBase,
  /// Path of the uploaded text file, relative to the media root.
  pub file: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileItem {
  #[serde(flatten)]
  pub base: ItemBase,
  pub file: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageItem {
  #[serde(flatten)]
  pub base: ItemBase,
  /// Path of the uploaded image, relative to the media root.
  pub file: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoItem {
  #[serde(flatten)]
  pub base: ItemBase,
  pub url:  String,
}

/// A resolved content item of any kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ContentItem {
  Text(TextItem),
  File(FileItem),
  Image(ImageItem),
  Video(VideoItem),
}

impl ContentItem {
  pub fn kind(&self) -> ContentKind {
    match self {
      Self::Text(_) => ContentKind::Text,
      Self::File(_) => ContentKind::File,
      Self::Image(_) => ContentKind::Image,
      Self::Video(_) => ContentKind::Video,
    }
  }

  pub fn base(&self) -> &ItemBase {
    match self {
      Self::Text(i) => &i.base,
      Self::File(i) => &i.base,
      Self::Image(i) => &i.base,
      Self::Video(i) => &i.base,
    }
  }

  pub fn item_ref(&self) -> ItemRef { ItemRef::new(self.kind(), self.base().id) }
}

// ─── Input ───────────────────────────────────────────────────────────────────

/// The kind-specific part of a new content item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ItemPayload {
  Text { file: String },
  File { file: String },
  Image { file: String },
  Video { url: String },
}

impl ItemPayload {
  pub fn kind(&self) -> ContentKind {
    match self {
      Self::Text { .. } => ContentKind::Text,
      Self::File { .. } => ContentKind::File,
      Self::Image { .. } => ContentKind::Image,
      Self::Video { .. } => ContentKind::Video,
    }
  }
}

/// Input for [`CatalogStore::create_item`](crate::store::CatalogStore::create_item).
/// `created` and `updated` are set by the store.
#[derive(Debug, Clone)]
pub struct NewItem {
  pub owner:   i64,
  pub title:   String,
  pub payload: ItemPayload,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn kind_tags_round_trip_through_from_str() {
    for kind in ContentKind::ALL {
      assert_eq!(kind.as_str().parse::<ContentKind>().unwrap(), kind);
    }
  }

  #[test]
  fn unknown_kind_is_rejected() {
    let err = "audio".parse::<ContentKind>().unwrap_err();
    assert!(matches!(err, Error::UnknownContentKind(k) if k == "audio"));
  }

  #[test]
  fn item_serialises_with_kind_tag_and_flat_base() {
    let at = DateTime::parse_from_rfc3339("2024-03-01T12:00:00Z")
      .unwrap()
      .with_timezone(&Utc);
    let item = ContentItem::Video(VideoItem {
      base: ItemBase {
        id:      7,
        owner:   1,
        title:   "Intro".into(),
        created: at,
        updated: at,
      },
      url:  "https://example.com/v".into(),
    });

    let json = serde_json::to_value(&item).unwrap();
    assert_eq!(json["kind"], "video");
    assert_eq!(json["id"], 7);
    assert_eq!(json["title"], "Intro");
    assert_eq!(json["url"], "https://example.com/v");
    assert_eq!(item.item_ref(), ItemRef::new(ContentKind::Video, 7));
  }
}
