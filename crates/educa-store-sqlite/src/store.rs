//! [`SqliteStore`], the SQLite implementation of [`CatalogStore`].

use std::path::Path;

use educa_core::{
  content::{ContentItem, ContentKind, ItemPayload, ItemRef, NewItem},
  course::{Content, Course, CourseDetail, Module, NewContent, NewCourse, NewModule},
  page::Window,
  store::CatalogStore,
  subject::{NewSubject, Subject, SubjectSummary},
  user::{NewUser, User},
};
use rusqlite::{Connection, OptionalExtension as _};

use crate::{
  Error, Result,
  encode::{
    RawContent, RawCourse, RawCourseDetail, RawItem, RawModule, RawSubjectSummary,
    RawUser, decode_count, encode_bound, encode_dt, item_payload_column,
    item_select_sql, item_table, now,
  },
  order::{CONTENT_ORDER, MODULE_ORDER},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// An Educa catalog backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted. All
/// statements run on the connection's own thread, one closure at a time.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

const SUBJECT_SUMMARY_SELECT: &str = "
  SELECT s.id, s.title, s.slug, COUNT(c.id)
  FROM subjects s
  LEFT JOIN courses c ON c.subject_id = s.id";

const COURSE_SELECT: &str =
  "SELECT id, owner_id, subject_id, title, slug, overview, created FROM courses";

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn delete_by_id(&self, table: &'static str, id: i64) -> Result<bool> {
    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(&format!("DELETE FROM {table} WHERE id = ?1"), [id])?)
      })
      .await?;
    Ok(deleted > 0)
  }
}

// ─── Synchronous helpers (run inside `call`) ─────────────────────────────────

fn load_item(
  conn: &Connection,
  kind: ContentKind,
  id: i64,
) -> rusqlite::Result<Option<RawItem>> {
  conn
    .query_row(&item_select_sql(kind), [id], |row| RawItem::from_row(kind, row))
    .optional()
}

fn load_contents(conn: &Connection, module_id: i64) -> rusqlite::Result<Vec<RawContent>> {
  let mut stmt = conn.prepare(
    "SELECT id, item_kind, item_id, \"order\" FROM contents
     WHERE module_id = ?1
     ORDER BY \"order\", id",
  )?;
  let rows = stmt
    .query_map([module_id], |row| {
      Ok((
        row.get::<_, i64>(0)?,
        row.get::<_, String>(1)?,
        row.get::<_, i64>(2)?,
        row.get::<_, i64>(3)?,
      ))
    })?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  rows
    .into_iter()
    .map(|(id, item_kind, item_id, order)| {
      let item = match item_kind.parse::<ContentKind>() {
        Ok(kind) => load_item(conn, kind, item_id)?,
        Err(_) => None,
      };
      Ok(RawContent { id, item_kind, order, item })
    })
    .collect()
}

fn load_course_detail(conn: &Connection, course: RawCourse) -> rusqlite::Result<RawCourseDetail> {
  let mut stmt = conn.prepare(
    "SELECT id, course_id, title, description, \"order\" FROM modules
     WHERE course_id = ?1
     ORDER BY \"order\", id",
  )?;
  let modules = stmt
    .query_map([course.id], RawModule::from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  let modules = modules
    .into_iter()
    .map(|module| {
      let contents = load_contents(conn, module.id)?;
      Ok((module, contents))
    })
    .collect::<rusqlite::Result<Vec<_>>>()?;

  Ok(RawCourseDetail { course, modules })
}

// ─── CatalogStore impl ───────────────────────────────────────────────────────

impl CatalogStore for SqliteStore {
  type Error = Error;

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn create_user(&self, input: NewUser) -> Result<User> {
    let username = input.username.clone();
    let hash     = input.password_hash.clone();

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO users (username, password_hash) VALUES (?1, ?2)",
          rusqlite::params![username, hash],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await
      .map_err(|e| {
        Error::from_write(e, || format!("username {:?} is taken", input.username))
      })?;

    Ok(User { id, username: input.username, password_hash: input.password_hash })
  }

  async fn get_user(&self, id: i64) -> Result<Option<User>> {
    let raw = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT id, username, password_hash FROM users WHERE id = ?1",
            [id],
            RawUser::from_row,
          )
          .optional()?)
      })
      .await?;
    Ok(raw.map(RawUser::into_user))
  }

  async fn find_user<'a>(&'a self, username: &'a str) -> Result<Option<User>> {
    let username = username.to_owned();
    let raw = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT id, username, password_hash FROM users WHERE username = ?1",
            [username],
            RawUser::from_row,
          )
          .optional()?)
      })
      .await?;
    Ok(raw.map(RawUser::into_user))
  }

  async fn delete_user(&self, id: i64) -> Result<bool> {
    self.delete_by_id("users", id).await
  }

  // ── Subjects ──────────────────────────────────────────────────────────────

  async fn create_subject(&self, input: NewSubject) -> Result<Subject> {
    let title = input.title.clone();
    let slug  = input.slug.clone();

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO subjects (title, slug) VALUES (?1, ?2)",
          rusqlite::params![title, slug],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await
      .map_err(|e| Error::from_write(e, || format!("subject slug {:?} is taken", input.slug)))?;

    Ok(Subject { id, title: input.title, slug: input.slug })
  }

  async fn get_subject(&self, id: i64) -> Result<Option<SubjectSummary>> {
    let raw = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("{SUBJECT_SUMMARY_SELECT} WHERE s.id = ?1 GROUP BY s.id"),
            [id],
            RawSubjectSummary::from_row,
          )
          .optional()?)
      })
      .await?;
    raw.map(RawSubjectSummary::into_summary).transpose()
  }

  async fn count_subjects(&self) -> Result<u64> {
    let n: i64 = self
      .conn
      .call(|conn| Ok(conn.query_row("SELECT COUNT(*) FROM subjects", [], |r| r.get(0))?))
      .await?;
    decode_count(n)
  }

  async fn list_subjects(&self, window: Window) -> Result<Vec<SubjectSummary>> {
    let limit  = encode_bound(window.limit);
    let offset = encode_bound(window.offset);

    let raws = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "{SUBJECT_SUMMARY_SELECT}
           GROUP BY s.id
           ORDER BY s.title, s.id
           LIMIT ?1 OFFSET ?2"
        ))?;
        let rows = stmt
          .query_map([limit, offset], RawSubjectSummary::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawSubjectSummary::into_summary).collect()
  }

  async fn delete_subject(&self, id: i64) -> Result<bool> {
    self.delete_by_id("subjects", id).await
  }

  // ── Courses ───────────────────────────────────────────────────────────────

  async fn create_course(&self, input: NewCourse) -> Result<Course> {
    let created    = now();
    let created_at = encode_dt(created);
    let NewCourse { owner, subject, title, slug, overview } = input;
    let (t, s, o)  = (title.clone(), slug.clone(), overview.clone());

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO courses (owner_id, subject_id, title, slug, overview, created)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![owner, subject, t, s, o, created_at],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await
      .map_err(|e| Error::from_write(e, || format!("course slug {slug:?} is taken")))?;

    Ok(Course { id, owner, subject, title, slug, overview, created })
  }

  async fn get_course(&self, id: i64) -> Result<Option<CourseDetail>> {
    let raw = self
      .conn
      .call(move |conn| {
        let course = conn
          .query_row(
            &format!("{COURSE_SELECT} WHERE id = ?1"),
            [id],
            RawCourse::from_row,
          )
          .optional()?;
        Ok(course.map(|c| load_course_detail(conn, c)).transpose()?)
      })
      .await?;
    raw.map(RawCourseDetail::into_detail).transpose()
  }

  async fn count_courses(&self) -> Result<u64> {
    let n: i64 = self
      .conn
      .call(|conn| Ok(conn.query_row("SELECT COUNT(*) FROM courses", [], |r| r.get(0))?))
      .await?;
    decode_count(n)
  }

  async fn list_courses(&self, window: Window) -> Result<Vec<CourseDetail>> {
    let limit  = encode_bound(window.limit);
    let offset = encode_bound(window.offset);

    let raws = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "{COURSE_SELECT} ORDER BY created DESC, id DESC LIMIT ?1 OFFSET ?2"
        ))?;
        let courses = stmt
          .query_map([limit, offset], RawCourse::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        let details = courses
          .into_iter()
          .map(|c| load_course_detail(conn, c))
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(details)
      })
      .await?;

    raws.into_iter().map(RawCourseDetail::into_detail).collect()
  }

  async fn delete_course(&self, id: i64) -> Result<bool> {
    self.delete_by_id("courses", id).await
  }

  async fn enroll(&self, course: i64, user: i64) -> Result<Option<bool>> {
    let outcome = self
      .conn
      .call(move |conn| {
        let exists = conn
          .query_row("SELECT 1 FROM courses WHERE id = ?1", [course], |_| Ok(()))
          .optional()?
          .is_some();
        if !exists {
          return Ok(None);
        }
        let inserted = conn.execute(
          "INSERT OR IGNORE INTO course_students (course_id, user_id) VALUES (?1, ?2)",
          [course, user],
        )?;
        Ok(Some(inserted > 0))
      })
      .await
      .map_err(|e| Error::from_write(e, || format!("user {user} already enrolled")))?;

    if let Some(added) = outcome {
      tracing::debug!(course, user, added, "enrollment recorded");
    }
    Ok(outcome)
  }

  async fn list_students(&self, course: i64) -> Result<Vec<User>> {
    let raws = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT u.id, u.username, u.password_hash
           FROM course_students cs
           JOIN users u ON u.id = cs.user_id
           WHERE cs.course_id = ?1
           ORDER BY u.id",
        )?;
        let rows = stmt
          .query_map([course], RawUser::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(raws.into_iter().map(RawUser::into_user).collect())
  }

  // ── Modules and contents ──────────────────────────────────────────────────

  async fn add_module(&self, input: NewModule) -> Result<Module> {
    let NewModule { course, title, description, order } = input;
    let (t, d) = (title.clone(), description.clone());

    let (id, order) = self
      .conn
      .call(move |conn| {
        let order = MODULE_ORDER.assign(conn, order, &[&course])?;
        conn.execute(
          "INSERT INTO modules (course_id, title, description, \"order\")
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![course, t, d, order],
        )?;
        Ok((conn.last_insert_rowid(), order))
      })
      .await
      .map_err(|e| Error::from_write(e, || format!("module conflicts in course {course}")))?;

    tracing::debug!(module = id, course, order, "module added");
    Ok(Module { id, course, title, description, order })
  }

  async fn add_content(&self, input: NewContent) -> Result<Content> {
    let NewContent { module, item, order } = input;
    let kind_str = item.kind.as_str();

    let inserted = self
      .conn
      .call(move |conn| {
        if load_item(conn, item.kind, item.id)?.is_none() {
          return Ok(None);
        }
        let order = CONTENT_ORDER.assign(conn, order, &[&module])?;
        conn.execute(
          "INSERT INTO contents (module_id, item_kind, item_id, \"order\")
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![module, kind_str, item.id, order],
        )?;
        Ok(Some((conn.last_insert_rowid(), order)))
      })
      .await
      .map_err(|e| Error::from_write(e, || format!("content conflicts in module {module}")))?;

    let (id, order) = inserted.ok_or(Error::ItemNotFound(item))?;
    tracing::debug!(content = id, module, kind = kind_str, order, "content added");
    Ok(Content { id, module, item, order })
  }

  // ── Content items ─────────────────────────────────────────────────────────

  async fn create_item(&self, input: NewItem) -> Result<ContentItem> {
    let kind    = input.payload.kind();
    let at      = now();
    let at_str  = encode_dt(at);
    let owner   = input.owner;
    let title   = input.title.clone();
    let payload = match input.payload {
      ItemPayload::Text { file } | ItemPayload::File { file } | ItemPayload::Image { file } => file,
      ItemPayload::Video { url } => url,
    };
    let value = payload.clone();

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          &format!(
            "INSERT INTO {} (owner_id, title, created, updated, {})
             VALUES (?1, ?2, ?3, ?3, ?4)",
            item_table(kind),
            item_payload_column(kind),
          ),
          rusqlite::params![owner, title, at_str, value],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await
      .map_err(|e| Error::from_write(e, || format!("{kind} item conflicts")))?;

    let raw = RawItem {
      kind,
      id,
      owner,
      title: input.title,
      created: encode_dt(at),
      updated: encode_dt(at),
      payload,
    };
    raw.into_item()
  }

  async fn get_item(&self, item: ItemRef) -> Result<Option<ContentItem>> {
    let raw = self
      .conn
      .call(move |conn| Ok(load_item(conn, item.kind, item.id)?))
      .await?;
    raw.map(RawItem::into_item).transpose()
  }

  async fn update_item_title(
    &self,
    item: ItemRef,
    title: String,
  ) -> Result<Option<ContentItem>> {
    let updated = encode_dt(now());

    let raw = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          &format!(
            "UPDATE {} SET title = ?1, updated = ?2 WHERE id = ?3",
            item_table(item.kind),
          ),
          rusqlite::params![title, updated, item.id],
        )?;
        if changed == 0 {
          return Ok(None);
        }
        Ok(load_item(conn, item.kind, item.id)?)
      })
      .await?;
    raw.map(RawItem::into_item).transpose()
  }
}
