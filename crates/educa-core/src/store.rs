//! The `CatalogStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `educa-store-sqlite`).
//! Higher layers (`educa-api`, `educa-server`) depend on this abstraction, not
//! on any concrete backend.

use std::future::Future;

use crate::{
  content::{ContentItem, ItemRef, NewItem},
  course::{Content, Course, CourseDetail, Module, NewContent, NewCourse, NewModule},
  page::Window,
  subject::{NewSubject, Subject, SubjectSummary},
  user::{NewUser, User},
};

/// Abstraction over an Educa catalog backend.
///
/// Lookups return `Ok(None)` for missing rows; `Err` is reserved for backend
/// failures and rejected writes (duplicate slug, dangling reference).
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait CatalogStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Users ─────────────────────────────────────────────────────────────

  /// Persist a new user. Usernames are unique.
  fn create_user(
    &self,
    input: NewUser,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  fn get_user(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  /// Look a user up by username, password hash included.
  fn find_user<'a>(
    &'a self,
    username: &'a str,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + 'a;

  /// Delete a user together with the courses and content items they own.
  /// Returns `false` if no such user exists.
  fn delete_user(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Subjects ──────────────────────────────────────────────────────────

  fn create_subject(
    &self,
    input: NewSubject,
  ) -> impl Future<Output = Result<Subject, Self::Error>> + Send + '_;

  /// Retrieve a subject with its course count.
  fn get_subject(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<SubjectSummary>, Self::Error>> + Send + '_;

  fn count_subjects(&self) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  /// Subjects ordered by title, with course counts, restricted to `window`.
  fn list_subjects(
    &self,
    window: Window,
  ) -> impl Future<Output = Result<Vec<SubjectSummary>, Self::Error>> + Send + '_;

  /// Delete a subject and, through it, all of its courses.
  fn delete_subject(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Courses ───────────────────────────────────────────────────────────

  /// Persist a new course. `created` is set by the store; slugs are unique.
  fn create_course(
    &self,
    input: NewCourse,
  ) -> impl Future<Output = Result<Course, Self::Error>> + Send + '_;

  /// Retrieve a course with its modules and contents resolved.
  fn get_course(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<CourseDetail>, Self::Error>> + Send + '_;

  fn count_courses(&self) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  /// Courses newest first, restricted to `window`, each fully resolved.
  fn list_courses(
    &self,
    window: Window,
  ) -> impl Future<Output = Result<Vec<CourseDetail>, Self::Error>> + Send + '_;

  /// Delete a course with its modules and contents.
  fn delete_course(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Add `user` to the students of `course`.
  ///
  /// Returns `None` if the course does not exist, otherwise whether the user
  /// was newly added. Enrolling an enrolled student changes nothing.
  fn enroll(
    &self,
    course: i64,
    user: i64,
  ) -> impl Future<Output = Result<Option<bool>, Self::Error>> + Send + '_;

  /// The students of a course, ordered by id.
  fn list_students(
    &self,
    course: i64,
  ) -> impl Future<Output = Result<Vec<User>, Self::Error>> + Send + '_;

  // ── Modules and contents ──────────────────────────────────────────────

  /// Persist a module, assigning the next order within its course when
  /// `input.order` is `None`.
  fn add_module(
    &self,
    input: NewModule,
  ) -> impl Future<Output = Result<Module, Self::Error>> + Send + '_;

  /// Place an existing item in a module, assigning the next order within the
  /// module when `input.order` is `None`. Fails if the item does not exist.
  fn add_content(
    &self,
    input: NewContent,
  ) -> impl Future<Output = Result<Content, Self::Error>> + Send + '_;

  // ── Content items ─────────────────────────────────────────────────────

  /// Persist a content item in the table its payload kind selects.
  fn create_item(
    &self,
    input: NewItem,
  ) -> impl Future<Output = Result<ContentItem, Self::Error>> + Send + '_;

  /// Dereference an item by kind and id.
  fn get_item(
    &self,
    item: ItemRef,
  ) -> impl Future<Output = Result<Option<ContentItem>, Self::Error>> + Send + '_;

  /// Rename an item, refreshing its `updated` timestamp.
  fn update_item_title(
    &self,
    item: ItemRef,
    title: String,
  ) -> impl Future<Output = Result<Option<ContentItem>, Self::Error>> + Send + '_;
}
