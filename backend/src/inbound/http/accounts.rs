//! Account handlers: registration, login, logout and the current user.
//!
//! ```text
//! POST /api/v1/register {"username":"alice","password":"Abc12345!","confirmPassword":"Abc12345!"}
//! POST /api/v1/login {"username":"alice","password":"Abc12345!","rememberMe":true}
//! POST /api/v1/logout
//! GET /api/v1/users/me
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use zeroize::Zeroize;

use crate::domain::{Error, LoginCredentials, LoginValidationError, RegistrationForm};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::require_user;
use crate::inbound::http::dto::{MessageResponse, UserMessageResponse, UserResponse};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, missing_field_error};

/// Registration request body for `POST /api/v1/register`.
#[derive(Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub confirm_password: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredResponse {
    pub message: String,
    #[schema(format = "uuid")]
    pub id: String,
}

/// Login request body for `POST /api/v1/login`.
#[derive(Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    /// Keep the session for the remember-me lifetime instead of expiring it
    /// after inactivity.
    #[serde(default)]
    pub remember_me: bool,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = LoginValidationError;

    fn try_from(mut value: LoginRequest) -> Result<Self, Self::Error> {
        let credentials = Self::try_from_parts(&value.username, &value.password, value.remember_me);
        value.password.zeroize();
        credentials
    }
}

fn map_login_validation_error(err: LoginValidationError) -> Error {
    match err {
        LoginValidationError::EmptyUsername => Error::invalid_request("username must not be empty")
            .with_details(json!({ "field": "username", "code": "empty_username" })),
        LoginValidationError::EmptyPassword => Error::invalid_request("password must not be empty")
            .with_details(json!({ "field": "password", "code": "empty_password" })),
    }
}

fn registration_form(payload: RegisterRequest) -> Result<RegistrationForm, Error> {
    let RegisterRequest {
        username,
        password,
        confirm_password,
    } = payload;
    let username = username.ok_or_else(|| missing_field_error(FieldName::new("username")))?;
    let mut password = password.ok_or_else(|| missing_field_error(FieldName::new("password")))?;
    let mut confirm_password = confirm_password
        .ok_or_else(|| missing_field_error(FieldName::new("confirmPassword")))?;
    let form = RegistrationForm::new(&username, &password, &confirm_password);
    password.zeroize();
    confirm_password.zeroize();
    Ok(form)
}

/// Create a public account.
#[utoipa::path(
    post,
    path = "/api/v1/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = RegisteredResponse),
        (status = 400, description = "Invalid username or password", body = Error),
        (status = 409, description = "Username already taken", body = Error),
        (status = 503, description = "Storage unavailable", body = Error)
    ),
    tags = ["accounts"],
    operation_id = "register",
    security([])
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let form = registration_form(payload.into_inner())?;
    let id = state.accounts.register(form).await?;
    Ok(HttpResponse::Created().json(RegisteredResponse {
        message: "Account created; you can now log in".to_owned(),
        id: id.to_string(),
    }))
}

/// Authenticate and establish a session.
///
/// Unknown usernames and wrong passwords produce the same 401 response.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = UserMessageResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["accounts"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<UserMessageResponse>> {
    let credentials =
        LoginCredentials::try_from(payload.into_inner()).map_err(map_login_validation_error)?;
    let established = state.accounts.authenticate(&credentials).await?;
    session.persist_grant(&established.grant)?;
    Ok(web::Json(UserMessageResponse {
        message: "Logged in".to_owned(),
        user: UserResponse::from(&established.user),
    }))
}

/// End the session. Succeeds whether or not anyone was logged in.
///
/// Only a grant that is still within its idle and absolute windows counts
/// as a logged-in user; an expired grant is discarded without an audit
/// record.
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    responses((status = 200, description = "Logged out", body = MessageResponse)),
    tags = ["accounts"],
    operation_id = "logout",
    security([])
)]
#[post("/logout")]
pub async fn logout(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> web::Json<MessageResponse> {
    let user_id = session
        .active_grant(&state.session_policy, state.clock.utc())
        .ok()
        .flatten()
        .map(|grant| grant.user_id);
    state.accounts.logout(user_id).await;
    session.purge();
    web::Json(MessageResponse::new("Logged out"))
}

/// Return the logged-in user with their current role.
#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Login required", body = Error)
    ),
    tags = ["accounts"],
    operation_id = "currentUser"
)]
#[get("/users/me")]
pub async fn current_user(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<UserResponse>> {
    let user = require_user(&state, &session).await?;
    Ok(web::Json(UserResponse::from(&user)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        INVALID_CREDENTIALS, PasswordRule, RegistrationError, Role, Session, SessionGrant, UserId,
    };
    use crate::inbound::http::test_utils::{
        MockPorts, session_cookie, test_session_middleware, user,
    };
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use chrono::Utc;
    use mockall::predicate::eq;
    use rstest::rstest;
    use serde_json::Value;

    fn test_app(
        ports: MockPorts,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(ports.into_state())
            .wrap(test_session_middleware())
            .service(
                web::scope("/api/v1")
                    .service(register)
                    .service(login)
                    .service(logout)
                    .service(current_user),
            )
    }

    fn login_body(username: &str, password: &str) -> Value {
        json!({ "username": username, "password": password, "rememberMe": true })
    }

    async fn json_body(res: actix_web::dev::ServiceResponse) -> Value {
        let body = actix_test::read_body(res).await;
        serde_json::from_slice(&body).expect("JSON body")
    }

    #[actix_web::test]
    async fn register_returns_created_account_id() {
        let id = UserId::random();
        let mut ports = MockPorts::default();
        ports
            .accounts
            .expect_register()
            .withf(|form| form.username == "alice" && form.password.as_str() == "Abc12345!")
            .times(1)
            .returning(move |_| Ok(id));
        let app = actix_test::init_service(test_app(ports)).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/register")
                .set_json(json!({
                    "username": "alice",
                    "password": "Abc12345!",
                    "confirmPassword": "Abc12345!",
                }))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::CREATED);
        let value = json_body(res).await;
        assert_eq!(value.get("id").and_then(Value::as_str), Some(id.to_string().as_str()));
        assert!(value.get("message").is_some());
    }

    #[actix_web::test]
    async fn register_reports_failed_password_rules() {
        let mut ports = MockPorts::default();
        ports.accounts.expect_register().returning(|_| {
            Err(RegistrationError::WeakPassword {
                failed: vec![PasswordRule::Digit, PasswordRule::Symbol],
            }
            .into())
        });
        let app = actix_test::init_service(test_app(ports)).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/register")
                .set_json(json!({
                    "username": "alice",
                    "password": "abcdefgH",
                    "confirmPassword": "abcdefgH",
                }))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let value = json_body(res).await;
        assert_eq!(value.pointer("/details/code"), Some(&json!("weak_password")));
        assert_eq!(
            value.pointer("/details/failedRules"),
            Some(&json!([PasswordRule::Digit.code(), PasswordRule::Symbol.code()]))
        );
    }

    #[rstest]
    #[case(json!({ "password": "x", "confirmPassword": "x" }), "username")]
    #[case(json!({ "username": "alice", "confirmPassword": "x" }), "password")]
    #[case(json!({ "username": "alice", "password": "x" }), "confirmPassword")]
    #[actix_web::test]
    async fn register_requires_every_field(#[case] body: Value, #[case] field: &str) {
        let app = actix_test::init_service(test_app(MockPorts::default())).await;
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/register")
                .set_json(body)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let value = json_body(res).await;
        assert_eq!(value.pointer("/details/field"), Some(&json!(field)));
        assert_eq!(value.pointer("/details/code"), Some(&json!("missing_field")));
    }

    #[rstest]
    #[case("   ", "password", "empty_username")]
    #[case("alice", "", "empty_password")]
    #[actix_web::test]
    async fn login_rejects_blank_credentials(
        #[case] username: &str,
        #[case] password: &str,
        #[case] code: &str,
    ) {
        let app = actix_test::init_service(test_app(MockPorts::default())).await;
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/login")
                .set_json(login_body(username, password))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let value = json_body(res).await;
        assert_eq!(value.pointer("/details/code"), Some(&json!(code)));
    }

    #[actix_web::test]
    async fn wrong_credentials_are_unauthorized_with_generic_message() {
        let mut ports = MockPorts::default();
        ports
            .accounts
            .expect_authenticate()
            .returning(|_| Err(Error::unauthorized(INVALID_CREDENTIALS)));
        let app = actix_test::init_service(test_app(ports)).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/login")
                .set_json(login_body("alice", "wrong"))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert!(res.response().cookies().next().is_none());
        let value = json_body(res).await;
        assert_eq!(
            value.get("message").and_then(Value::as_str),
            Some(INVALID_CREDENTIALS)
        );
    }

    #[actix_web::test]
    async fn login_establishes_session_for_current_user() {
        let alice = user("alice", Role::Public);
        let mut ports = MockPorts::resolving(&alice);
        let session_user = alice.clone();
        ports
            .accounts
            .expect_authenticate()
            .withf(|credentials| credentials.remember_me())
            .returning(move |_| {
                Ok(Session {
                    user: session_user.clone(),
                    grant: SessionGrant::issue(session_user.id(), Utc::now(), true),
                })
            });
        let app = actix_test::init_service(test_app(ports)).await;

        let login_res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/login")
                .set_json(login_body("alice", "Abc12345!"))
                .to_request(),
        )
        .await;
        assert_eq!(login_res.status(), StatusCode::OK);
        let cookie = session_cookie(&login_res);

        let me = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/users/me")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(me.status(), StatusCode::OK);
        let value = json_body(me).await;
        assert_eq!(value.get("username").and_then(Value::as_str), Some("alice"));
        assert_eq!(value.get("role").and_then(Value::as_str), Some("public"));
    }

    #[actix_web::test]
    async fn logout_without_session_still_succeeds() {
        let mut ports = MockPorts::default();
        ports
            .accounts
            .expect_logout()
            .with(eq(None::<UserId>))
            .times(1)
            .returning(|_| ());
        let app = actix_test::init_service(test_app(ports)).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post().uri("/api/v1/logout").to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn current_user_requires_login() {
        let app = actix_test::init_service(test_app(MockPorts::default())).await;
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/api/v1/users/me").to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[rstest]
    fn login_request_carries_remember_me() {
        let request = LoginRequest {
            username: " alice ".to_owned(),
            password: "Abc12345!".to_owned(),
            remember_me: true,
        };
        let credentials = LoginCredentials::try_from(request).expect("valid shape");
        assert_eq!(credentials.username(), "alice");
        assert!(credentials.remember_me());
    }
}
