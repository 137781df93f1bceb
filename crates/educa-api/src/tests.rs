//! Router tests against an in-memory `SqliteStore`.

use std::sync::Arc;

use axum::{
  body::Body,
  http::{Request, StatusCode, header},
  response::Response,
};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;
use educa_core::{
  content::{ItemPayload, NewItem},
  course::{NewContent, NewCourse, NewModule},
  store::CatalogStore,
  subject::NewSubject,
  user::NewUser,
};
use educa_store_sqlite::SqliteStore;
use serde_json::Value;
use tower::ServiceExt as _;

use crate::{api_router, auth::hash_password};

struct Fixture {
  store:   Arc<SqliteStore>,
  owner:   i64,
  student: i64,
}

async fn fixture() -> Fixture {
  let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
  let owner = store
    .create_user(NewUser { username: "owner".into(), password_hash: hash_password("pw").unwrap() })
    .await
    .unwrap()
    .id;
  let student = store
    .create_user(NewUser {
      username:      "student".into(),
      password_hash: hash_password("secret").unwrap(),
    })
    .await
    .unwrap()
    .id;
  Fixture { store, owner, student }
}

impl Fixture {
  async fn subject(&self, title: &str) -> i64 {
    self
      .store
      .create_subject(NewSubject { title: title.into(), slug: title.to_lowercase() })
      .await
      .unwrap()
      .id
  }

  async fn course(&self, subject: i64, slug: &str) -> i64 {
    self
      .store
      .create_course(NewCourse {
        owner: self.owner,
        subject,
        title: format!("Course {slug}"),
        slug: slug.into(),
        overview: "An overview".into(),
      })
      .await
      .unwrap()
      .id
  }

  async fn request(
    &self,
    method: &str,
    uri: &str,
    auth: Option<(&str, &str)>,
  ) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some((user, pass)) = auth {
      builder = builder.header(
        header::AUTHORIZATION,
        format!("Basic {}", B64.encode(format!("{user}:{pass}"))),
      );
    }
    let req = builder.body(Body::empty()).unwrap();
    api_router(self.store.clone()).oneshot(req).await.unwrap()
  }
}

async fn json(resp: Response) -> Value {
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  serde_json::from_slice(&bytes).unwrap()
}

// ── Subjects ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn subjects_are_listed_by_title_with_course_counts() {
  let f = fixture().await;
  let physics = f.subject("Physics").await;
  f.subject("Art").await;
  f.course(physics, "mechanics").await;
  f.course(physics, "optics").await;

  let resp = f.request("GET", "/subjects/", None).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body = json(resp).await;

  assert_eq!(body["count"], 2);
  assert!(body["next"].is_null());
  assert!(body["previous"].is_null());
  let results = body["results"].as_array().unwrap();
  assert_eq!(results[0]["title"], "Art");
  assert_eq!(results[0]["total_courses"], 0);
  assert_eq!(results[1]["slug"], "physics");
  assert_eq!(results[1]["total_courses"], 2);
}

#[tokio::test]
async fn subject_detail_and_missing_subject() {
  let f = fixture().await;
  let physics = f.subject("Physics").await;
  f.course(physics, "mechanics").await;

  let resp = f.request("GET", &format!("/subjects/{physics}/"), None).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body = json(resp).await;
  assert_eq!(body["id"], physics);
  assert_eq!(body["total_courses"], 1);

  let resp = f.request("GET", "/subjects/999/", None).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  assert_eq!(json(resp).await["detail"], "Not found.");
}

#[tokio::test]
async fn pages_link_and_out_of_range_is_404() {
  let f = fixture().await;
  for title in ["A", "B", "C", "D", "E"] {
    f.subject(title).await;
  }

  let resp = f.request("GET", "/subjects/?page=2&page_size=2", None).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body = json(resp).await;
  assert_eq!(body["count"], 5);
  assert_eq!(body["next"], "/subjects/?page=3&page_size=2");
  assert_eq!(body["previous"], "/subjects/?page=1&page_size=2");
  let titles: Vec<_> = body["results"]
    .as_array()
    .unwrap()
    .iter()
    .map(|r| r["title"].as_str().unwrap().to_owned())
    .collect();
  assert_eq!(titles, ["C", "D"]);

  let resp = f.request("GET", "/subjects/?page=4&page_size=2", None).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  assert_eq!(json(resp).await["detail"], "Invalid page.");
}

#[tokio::test]
async fn empty_catalog_serves_first_page_only() {
  let f = fixture().await;

  let resp = f.request("GET", "/courses/", None).await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(json(resp).await["count"], 0);

  let resp = f.request("GET", "/courses/?page=2", None).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_page_is_a_bad_request() {
  let f = fixture().await;
  let resp = f.request("GET", "/subjects/?page=abc", None).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let body = json(resp).await;
  assert!(body["detail"].as_str().unwrap().starts_with("Failed to deserialize query string"));

  let resp = f.request("GET", "/courses/?page_size=-1", None).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  assert!(json(resp).await["detail"].is_string());
}

// ── Courses ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn course_detail_nests_ordered_modules_and_contents() {
  let f = fixture().await;
  let subject = f.subject("Physics").await;
  let course = f.course(subject, "mechanics").await;

  let store = &f.store;
  let intro = store
    .add_module(NewModule {
      course,
      title:       "Intro".into(),
      description: String::new(),
      order:       None,
    })
    .await
    .unwrap();
  store
    .add_module(NewModule {
      course,
      title:       "Kinematics".into(),
      description: "Motion".into(),
      order:       None,
    })
    .await
    .unwrap();
  let clip = store
    .create_item(NewItem {
      owner:   f.owner,
      title:   "Welcome".into(),
      payload: ItemPayload::Video { url: "https://videos.example/welcome".into() },
    })
    .await
    .unwrap();
  store
    .add_content(NewContent { module: intro.id, item: clip.item_ref(), order: None })
    .await
    .unwrap();

  let resp = f.request("GET", &format!("/courses/{course}/"), None).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body = json(resp).await;

  assert_eq!(body["slug"], "mechanics");
  assert_eq!(body["subject"], subject);
  let modules = body["modules"].as_array().unwrap();
  assert_eq!(modules.len(), 2);
  assert_eq!(modules[0]["order"], 0);
  assert_eq!(modules[0]["title"], "Intro");
  assert_eq!(modules[1]["order"], 1);
  let item = &modules[0]["contents"][0]["item"];
  assert_eq!(item["kind"], "video");
  assert_eq!(item["url"], "https://videos.example/welcome");
}

#[tokio::test]
async fn courses_are_listed_newest_first() {
  let f = fixture().await;
  let subject = f.subject("Physics").await;
  let older = f.course(subject, "older").await;
  let newer = f.course(subject, "newer").await;

  let body = json(f.request("GET", "/courses/", None).await).await;
  assert_eq!(body["results"][0]["id"], newer);
  assert_eq!(body["results"][1]["id"], older);
}

#[tokio::test]
async fn missing_course_is_404() {
  let f = fixture().await;
  let resp = f.request("GET", "/courses/12/", None).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// ── Enroll ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn enroll_adds_student_once() {
  let f = fixture().await;
  let subject = f.subject("Physics").await;
  let course = f.course(subject, "mechanics").await;
  let uri = format!("/courses/{course}/enroll/");

  for _ in 0..2 {
    let resp = f.request("POST", &uri, Some(("student", "secret"))).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json(resp).await, serde_json::json!({ "enrolled": true }));
  }

  let students = f.store.list_students(course).await.unwrap();
  assert_eq!(students.len(), 1);
  assert_eq!(students[0].id, f.student);
}

#[tokio::test]
async fn enroll_without_credentials_is_401_and_changes_nothing() {
  let f = fixture().await;
  let subject = f.subject("Physics").await;
  let course = f.course(subject, "mechanics").await;
  let uri = format!("/courses/{course}/enroll/");

  let resp = f.request("POST", &uri, None).await;
  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  assert!(resp.headers().contains_key(header::WWW_AUTHENTICATE));

  let resp = f.request("POST", &uri, Some(("student", "wrong"))).await;
  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

  let resp = f.request("POST", &uri, Some(("nobody", "secret"))).await;
  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

  assert!(f.store.list_students(course).await.unwrap().is_empty());
}

#[tokio::test]
async fn enroll_checks_credentials_before_course() {
  let f = fixture().await;

  let resp = f.request("POST", "/courses/77/enroll/", None).await;
  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

  let resp = f.request("POST", "/courses/77/enroll/", Some(("student", "secret"))).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn listings_are_read_only() {
  let f = fixture().await;
  let resp = f.request("POST", "/subjects/", Some(("student", "secret"))).await;
  assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
}
