//! Courses, their modules, and the content rows that order items inside a
//! module.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::content::{ContentItem, ItemRef};

// ─── Course ──────────────────────────────────────────────────────────────────

/// A course row. Courses list newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
  pub id:       i64,
  pub owner:    i64,
  pub subject:  i64,
  pub title:    String,
  /// Unique across all courses.
  pub slug:     String,
  pub overview: String,
  /// Set once when the course is created.
  pub created:  DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewCourse {
  pub owner:    i64,
  pub subject:  i64,
  pub title:    String,
  pub slug:     String,
  pub overview: String,
}

// ─── Module ──────────────────────────────────────────────────────────────────

/// An ordered section of a course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
  pub id:          i64,
  pub course:      i64,
  pub title:       String,
  pub description: String,
  /// Position within the course, assigned on creation when not supplied.
  pub order:       u32,
}

#[derive(Debug, Clone)]
pub struct NewModule {
  pub course:      i64,
  pub title:       String,
  pub description: String,
  /// Explicit position; `None` appends after the last module of the course.
  pub order:       Option<u32>,
}

// ─── Content ─────────────────────────────────────────────────────────────────

/// Places one content item at a position inside a module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
  pub id:     i64,
  pub module: i64,
  pub item:   ItemRef,
  pub order:  u32,
}

#[derive(Debug, Clone)]
pub struct NewContent {
  pub module: i64,
  pub item:   ItemRef,
  /// Explicit position; `None` appends after the last content of the module.
  pub order:  Option<u32>,
}

// ─── Read models ─────────────────────────────────────────────────────────────

/// A content row with its item dereferenced.
///
/// `item` is `None` when the referenced item no longer exists: content rows
/// are not foreign-keyed to the item tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentEntry {
  pub id:    i64,
  pub order: u32,
  pub item:  Option<ContentItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleDetail {
  #[serde(flatten)]
  pub module:   Module,
  /// Ordered by `order` ascending.
  pub contents: Vec<ContentEntry>,
}

/// A course with its modules and their contents, as served by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseDetail {
  #[serde(flatten)]
  pub course:  Course,
  /// Ordered by `order` ascending.
  pub modules: Vec<ModuleDetail>,
}
