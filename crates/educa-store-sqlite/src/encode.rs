//! Encoding and decoding helpers between Rust domain types and the plain
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as fixed-width RFC 3339 strings (UTC, microseconds)
//! so that `ORDER BY created` sorts chronologically. Content kinds are stored
//! as their lowercase tag.

use chrono::{DateTime, SecondsFormat, Utc};
use educa_core::{
  content::{
    ContentItem, ContentKind, FileItem, ImageItem, ItemBase, TextItem, VideoItem,
  },
  course::{ContentEntry, Course, CourseDetail, Module, ModuleDetail},
  subject::{Subject, SubjectSummary},
  user::User,
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::Decode(format!("timestamp {s:?}: {e}")))
}

/// The current time at the precision it will be stored with, so a value
/// returned from a write equals the value read back later.
pub fn now() -> DateTime<Utc> {
  let now = Utc::now();
  decode_dt(&encode_dt(now)).unwrap_or(now)
}

// ─── Integers ────────────────────────────────────────────────────────────────

pub fn decode_order(v: i64) -> Result<u32> {
  u32::try_from(v).map_err(|_| Error::Decode(format!("order out of range: {v}")))
}

pub fn decode_count(v: i64) -> Result<u64> {
  u64::try_from(v).map_err(|_| Error::Decode(format!("negative count: {v}")))
}

/// Clamp a window bound into SQLite's signed integer range.
pub fn encode_bound(v: u64) -> i64 { i64::try_from(v).unwrap_or(i64::MAX) }

// ─── ContentKind ─────────────────────────────────────────────────────────────

/// The table holding items of `kind`.
pub fn item_table(kind: ContentKind) -> &'static str {
  match kind {
    ContentKind::Text => "item_texts",
    ContentKind::File => "item_files",
    ContentKind::Image => "item_images",
    ContentKind::Video => "item_videos",
  }
}

/// The column holding the kind-specific payload.
pub fn item_payload_column(kind: ContentKind) -> &'static str {
  match kind {
    ContentKind::Video => "url",
    ContentKind::Text | ContentKind::File | ContentKind::Image => "file",
  }
}

/// `SELECT` returning the columns of [`RawItem`] for one row of `kind`.
pub fn item_select_sql(kind: ContentKind) -> String {
  format!(
    "SELECT id, owner_id, title, created, updated, {} FROM {} WHERE id = ?1",
    item_payload_column(kind),
    item_table(kind),
  )
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `users` row.
pub struct RawUser {
  pub id:            i64,
  pub username:      String,
  pub password_hash: String,
}

impl RawUser {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:            row.get(0)?,
      username:      row.get(1)?,
      password_hash: row.get(2)?,
    })
  }

  pub fn into_user(self) -> User {
    User {
      id:            self.id,
      username:      self.username,
      password_hash: self.password_hash,
    }
  }
}

/// Raw values from `subjects` joined with a course count.
pub struct RawSubjectSummary {
  pub id:            i64,
  pub title:         String,
  pub slug:          String,
  pub total_courses: i64,
}

impl RawSubjectSummary {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:            row.get(0)?,
      title:         row.get(1)?,
      slug:          row.get(2)?,
      total_courses: row.get(3)?,
    })
  }

  pub fn into_summary(self) -> Result<SubjectSummary> {
    Ok(SubjectSummary {
      subject:       Subject { id: self.id, title: self.title, slug: self.slug },
      total_courses: decode_count(self.total_courses)?,
    })
  }
}

/// Raw values from one of the `item_*` tables, tagged with the table's kind.
pub struct RawItem {
  pub kind:    ContentKind,
  pub id:      i64,
  pub owner:   i64,
  pub title:   String,
  pub created: String,
  pub updated: String,
  pub payload: String,
}

impl RawItem {
  pub fn from_row(kind: ContentKind, row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      kind,
      id:      row.get(0)?,
      owner:   row.get(1)?,
      title:   row.get(2)?,
      created: row.get(3)?,
      updated: row.get(4)?,
      payload: row.get(5)?,
    })
  }

  pub fn into_item(self) -> Result<ContentItem> {
    let base = ItemBase {
      id:      self.id,
      owner:   self.owner,
      title:   self.title,
      created: decode_dt(&self.created)?,
      updated: decode_dt(&self.updated)?,
    };
    Ok(match self.kind {
      ContentKind::Text => ContentItem::Text(TextItem { base, file: self.payload }),
      ContentKind::File => ContentItem::File(FileItem { base, file: self.payload }),
      ContentKind::Image => ContentItem::Image(ImageItem { base, file: self.payload }),
      ContentKind::Video => ContentItem::Video(VideoItem { base, url: self.payload }),
    })
  }
}

/// A `contents` row with its item looked up (if the tag and row exist).
pub struct RawContent {
  pub id:        i64,
  pub item_kind: String,
  pub order:     i64,
  pub item:      Option<RawItem>,
}

impl RawContent {
  pub fn into_entry(self) -> Result<ContentEntry> {
    // The tag is re-validated even though the CHECK constraint should make an
    // unknown tag impossible.
    self.item_kind.parse::<ContentKind>()?;
    Ok(ContentEntry {
      id:    self.id,
      order: decode_order(self.order)?,
      item:  self.item.map(RawItem::into_item).transpose()?,
    })
  }
}

pub struct RawModule {
  pub id:          i64,
  pub course:      i64,
  pub title:       String,
  pub description: String,
  pub order:       i64,
}

impl RawModule {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:          row.get(0)?,
      course:      row.get(1)?,
      title:       row.get(2)?,
      description: row.get(3)?,
      order:       row.get(4)?,
    })
  }

  pub fn into_module(self) -> Result<Module> {
    Ok(Module {
      id:          self.id,
      course:      self.course,
      title:       self.title,
      description: self.description,
      order:       decode_order(self.order)?,
    })
  }
}

pub struct RawCourse {
  pub id:       i64,
  pub owner:    i64,
  pub subject:  i64,
  pub title:    String,
  pub slug:     String,
  pub overview: String,
  pub created:  String,
}

impl RawCourse {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:       row.get(0)?,
      owner:    row.get(1)?,
      subject:  row.get(2)?,
      title:    row.get(3)?,
      slug:     row.get(4)?,
      overview: row.get(5)?,
      created:  row.get(6)?,
    })
  }

  pub fn into_course(self) -> Result<Course> {
    Ok(Course {
      id:       self.id,
      owner:    self.owner,
      subject:  self.subject,
      title:    self.title,
      slug:     self.slug,
      overview: self.overview,
      created:  decode_dt(&self.created)?,
    })
  }
}

/// A course with its modules and contents, as read in a single closure.
pub struct RawCourseDetail {
  pub course:  RawCourse,
  pub modules: Vec<(RawModule, Vec<RawContent>)>,
}

impl RawCourseDetail {
  pub fn into_detail(self) -> Result<CourseDetail> {
    let modules = self
      .modules
      .into_iter()
      .map(|(module, contents)| {
        Ok(ModuleDetail {
          module:   module.into_module()?,
          contents: contents
            .into_iter()
            .map(RawContent::into_entry)
            .collect::<Result<_>>()?,
        })
      })
      .collect::<Result<_>>()?;

    Ok(CourseDetail { course: self.course.into_course()?, modules })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn timestamps_are_fixed_width_and_round_trip() {
    let a = decode_dt("2024-01-01T00:00:00Z").unwrap();
    let b = decode_dt("2024-01-01T00:00:00.5Z").unwrap();
    let (ea, eb) = (encode_dt(a), encode_dt(b));
    assert_eq!(ea.len(), eb.len());
    assert!(ea < eb);
    assert_eq!(decode_dt(&eb).unwrap(), b);
  }

  #[test]
  fn negative_order_is_a_decode_error() {
    assert!(matches!(decode_order(-1), Err(Error::Decode(_))));
    assert_eq!(decode_order(4).unwrap(), 4);
  }
}
