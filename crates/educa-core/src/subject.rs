//! Subjects, the top-level grouping of courses.

use serde::{Deserialize, Serialize};

/// A subject row. Subjects list by title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
  pub id:    i64,
  pub title: String,
  /// Unique across all subjects.
  pub slug:  String,
}

/// A subject annotated with the number of courses that reference it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectSummary {
  #[serde(flatten)]
  pub subject:       Subject,
  pub total_courses: u64,
}

#[derive(Debug, Clone)]
pub struct NewSubject {
  pub title: String,
  pub slug:  String,
}
