//! End-to-end HTTP flows against the in-memory directory.

use actix_http::Request;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::body::BoxBody;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use menu_directory::Trace;
use menu_directory::domain::{AuditAction, TRACE_ID_HEADER};
use menu_directory::inbound::http::configure_api;
use menu_directory::test_support::{DirectoryHarness, ROOT_ADMIN_PASSWORD, ROOT_ADMIN_USERNAME};
use serde_json::{Value, json};

const PASSWORD: &str = "Abc12345!";

/// Client that remembers the latest session cookie it was handed.
struct Client<S> {
    app: S,
    cookie: Option<Cookie<'static>>,
}

impl<S> Client<S>
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    async fn send(&mut self, request: test::TestRequest) -> (StatusCode, Value) {
        let request = match &self.cookie {
            Some(cookie) => request.cookie(cookie.clone()),
            None => request,
        };
        let res = test::call_service(&self.app, request.to_request()).await;
        assert!(res.headers().contains_key(TRACE_ID_HEADER), "trace id echoed");
        if let Some(cookie) = res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
        {
            self.cookie = Some(cookie.into_owned());
        }
        let status = res.status();
        let body = test::read_body(res).await;
        let json = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).expect("JSON body")
        };
        (status, json)
    }

    async fn post(&mut self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(test::TestRequest::post().uri(uri).set_json(body))
            .await
    }

    async fn put(&mut self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(test::TestRequest::put().uri(uri).set_json(body))
            .await
    }

    async fn get(&mut self, uri: &str) -> (StatusCode, Value) {
        self.send(test::TestRequest::get().uri(uri)).await
    }

    async fn sign_up(&mut self, username: &str) {
        let (status, _) = self
            .post(
                "/api/v1/register",
                json!({ "username": username, "password": PASSWORD, "confirmPassword": PASSWORD }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        self.log_in(username, PASSWORD).await;
    }

    async fn log_in(&mut self, username: &str, password: &str) {
        let (status, _) = self
            .post(
                "/api/v1/login",
                json!({ "username": username, "password": password }),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
    }
}

async fn client(
    harness: &DirectoryHarness,
) -> Client<impl Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>>
{
    let session = SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(harness.http_state()))
            .wrap(Trace)
            .service(web::scope("/api/v1").wrap(session).configure(configure_api)),
    )
    .await;
    Client { app, cookie: None }
}

async fn start() -> DirectoryHarness {
    DirectoryHarness::start().await.expect("harness starts")
}

#[actix_rt::test]
async fn owner_publishes_a_menu_that_visitors_can_read() {
    let harness = start().await;
    let mut owner = client(&harness).await;
    owner.sign_up("alice").await;

    let (status, created) = owner
        .post("/api/v1/restaurants", json!({ "name": "Joe's Diner" }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["restaurant"]["id"]
        .as_str()
        .expect("restaurant id")
        .to_owned();

    let menu_uri = format!("/api/v1/restaurants/{id}/menu");
    for (name, price, course) in [("<b>Soup</b>", "7.5", "Starter"), ("Pie", "$4", "Dessert")] {
        let (status, _) = owner
            .post(
                &menu_uri,
                json!({ "name": name, "description": "Made fresh, daily!", "price": price, "course": course }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let mut visitor = client(&harness).await;
    let (status, menu) = visitor.get(&menu_uri).await;
    assert_eq!(status, StatusCode::OK);
    insta::assert_json_snapshot!(menu, { "[].id" => "[id]" }, @r#"
    [
      {
        "course": "Starter",
        "description": "Madefreshdaily",
        "id": "[id]",
        "name": "&lt;b&gt;Soup&lt;/b&gt;",
        "price": "$7.50"
      },
      {
        "course": "Dessert",
        "description": "Madefreshdaily",
        "id": "[id]",
        "name": "Pie",
        "price": "$4.00"
      }
    ]
    "#);

    let (status, listed) = visitor.get("/api/v1/restaurants").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed, json!([{ "id": id, "name": "JoesDiner" }]));
}

#[actix_rt::test]
async fn visitors_must_log_in_to_change_content() {
    let harness = start().await;
    let mut visitor = client(&harness).await;

    let (status, body) = visitor
        .post("/api/v1/restaurants", json!({ "name": "Sneaky" }))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "unauthorized");
}

#[actix_rt::test]
async fn ratings_feed_the_restaurant_summary() {
    let harness = start().await;
    let mut owner = client(&harness).await;
    owner.sign_up("alice").await;
    let (_, created) = owner
        .post("/api/v1/restaurants", json!({ "name": "Bistro" }))
        .await;
    let id = created["restaurant"]["id"].as_str().expect("id").to_owned();
    let rating_uri = format!("/api/v1/restaurants/{id}/rating");

    let (status, body) = owner.put(&rating_uri, json!({ "score": 5 })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "You cannot rate your own restaurant");

    let mut diner = client(&harness).await;
    diner.sign_up("bob").await;
    let (status, body) = diner.put(&rating_uri, json!({ "score": "five" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["code"], "invalid_rating");

    for score in [2, 4] {
        let (status, _) = diner.put(&rating_uri, json!({ "score": score })).await;
        assert_eq!(status, StatusCode::OK);
    }
    let (_, detail) = diner.get(&format!("/api/v1/restaurants/{id}")).await;
    assert_eq!(detail["rating"], json!({ "count": 1, "average": 4.0 }));
}

#[actix_rt::test]
async fn idle_sessions_expire() {
    let harness = start().await;
    let mut user = client(&harness).await;
    user.sign_up("alice").await;

    harness.clock.advance_minutes(20);
    let (status, me) = user.get("/api/v1/users/me").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["username"], "alice");

    harness.clock.advance_minutes(45);
    let (status, _) = user.get("/api/v1/users/me").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn admin_console_requires_the_admin_role() {
    let harness = start().await;
    let mut member = client(&harness).await;
    member.sign_up("alice").await;
    let (status, _) = member.get("/api/v1/admin/users").await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let mut admin = client(&harness).await;
    admin.log_in(ROOT_ADMIN_USERNAME, ROOT_ADMIN_PASSWORD).await;
    let (status, users) = admin.get("/api/v1/admin/users").await;
    assert_eq!(status, StatusCode::OK);
    let names = users
        .as_array()
        .expect("user list")
        .iter()
        .filter_map(|user| user["username"].as_str())
        .collect::<Vec<_>>();
    assert_eq!(names, ["alice", ROOT_ADMIN_USERNAME]);
}

#[actix_rt::test]
async fn search_rejects_blank_queries() {
    let harness = start().await;
    let mut visitor = client(&harness).await;
    let (status, body) = visitor.get("/api/v1/search?q=%25%25").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["code"], "blank_query");
}

#[actix_rt::test]
async fn cookies_captured_before_logout_stop_working() {
    let harness = start().await;
    let mut user = client(&harness).await;
    user.sign_up("alice").await;
    let captured = user.cookie.clone();

    let (status, _) = user.post("/api/v1/logout", json!({})).await;
    assert_eq!(status, StatusCode::OK);

    user.cookie = captured;
    let (status, body) = user.get("/api/v1/users/me").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "unauthorized");

    harness.clock.advance_minutes(1);
    user.log_in("alice", PASSWORD).await;
    let (status, me) = user.get("/api/v1/users/me").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["username"], "alice");
}

#[actix_rt::test]
async fn logging_out_an_expired_session_is_not_audited() {
    let harness = start().await;
    let mut user = client(&harness).await;
    user.sign_up("alice").await;

    harness.clock.advance_minutes(45);
    let (status, _) = user.post("/api/v1/logout", json!({})).await;
    assert_eq!(status, StatusCode::OK);

    let logouts = harness
        .directory
        .audit_events()
        .into_iter()
        .filter(|event| event.action == AuditAction::Logout)
        .count();
    assert_eq!(logouts, 0);
}
