//! SQL schema for the Educa SQLite store.
//!
//! Executed once at connection startup. `PRAGMA user_version` records the
//! schema revision for future migrations.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    username      TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS subjects (
    id    INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    slug  TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS courses (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    owner_id   INTEGER NOT NULL REFERENCES users(id)    ON DELETE CASCADE,
    subject_id INTEGER NOT NULL REFERENCES subjects(id) ON DELETE CASCADE,
    title      TEXT NOT NULL,
    slug       TEXT NOT NULL UNIQUE,
    overview   TEXT NOT NULL,
    created    TEXT NOT NULL    -- RFC 3339 UTC, microseconds; never updated
);

CREATE TABLE IF NOT EXISTS course_students (
    course_id INTEGER NOT NULL REFERENCES courses(id) ON DELETE CASCADE,
    user_id   INTEGER NOT NULL REFERENCES users(id)   ON DELETE CASCADE,
    PRIMARY KEY (course_id, user_id)
);

-- \"order\" is assigned per course on insert; no uniqueness is enforced.
CREATE TABLE IF NOT EXISTS modules (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    course_id   INTEGER NOT NULL REFERENCES courses(id) ON DELETE CASCADE,
    title       TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    \"order\"     INTEGER NOT NULL CHECK (\"order\" >= 0)
);

-- (item_kind, item_id) names a row in one of the item_* tables.
CREATE TABLE IF NOT EXISTS contents (
    id        INTEGER PRIMARY KEY AUTOINCREMENT,
    module_id INTEGER NOT NULL REFERENCES modules(id) ON DELETE CASCADE,
    item_kind TEXT NOT NULL CHECK (item_kind IN ('text', 'file', 'image', 'video')),
    item_id   INTEGER NOT NULL,
    \"order\"   INTEGER NOT NULL CHECK (\"order\" >= 0)
);

CREATE TABLE IF NOT EXISTS item_texts (
    id       INTEGER PRIMARY KEY AUTOINCREMENT,
    owner_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    title    TEXT NOT NULL,
    created  TEXT NOT NULL,
    updated  TEXT NOT NULL,
    file     TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS item_files (
    id       INTEGER PRIMARY KEY AUTOINCREMENT,
    owner_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    title    TEXT NOT NULL,
    created  TEXT NOT NULL,
    updated  TEXT NOT NULL,
    file     TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS item_images (
    id       INTEGER PRIMARY KEY AUTOINCREMENT,
    owner_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    title    TEXT NOT NULL,
    created  TEXT NOT NULL,
    updated  TEXT NOT NULL,
    file     TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS item_videos (
    id       INTEGER PRIMARY KEY AUTOINCREMENT,
    owner_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    title    TEXT NOT NULL,
    created  TEXT NOT NULL,
    updated  TEXT NOT NULL,
    url      TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS courses_subject_idx  ON courses(subject_id);
CREATE INDEX IF NOT EXISTS courses_created_idx  ON courses(created);
CREATE INDEX IF NOT EXISTS modules_course_idx   ON modules(course_id, \"order\");
CREATE INDEX IF NOT EXISTS contents_module_idx  ON contents(module_id, \"order\");
CREATE INDEX IF NOT EXISTS subjects_title_idx   ON subjects(title);

PRAGMA user_version = 1;
";
