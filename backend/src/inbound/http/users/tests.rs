//! Tests for account HTTP handlers.

use super::*;
use crate::domain::ports::{MockAuthenticationCommand, MockIdentityAdministration};
use crate::domain::{IdentityId, Username};
use crate::inbound::http::test_utils::{bearer, test_state};
use crate::inbound::http::validation::json_config;
use crate::test_support::MutableClock;
use actix_web::http::StatusCode;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{App, test as actix_test};
use rstest::{fixture, rstest};
use serde_json::{Value, json};
use std::sync::Arc;

const STRONG: &str = "AbCdef12!!34";

#[fixture]
fn clock() -> Arc<MutableClock> {
    Arc::new(MutableClock::default())
}

fn test_app(
    state: HttpState,
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
        .app_data(web::Data::new(state))
        .app_data(json_config())
        .service(
            web::scope("/api/v1")
                .service(register)
                .service(login)
                .service(list_users)
                .service(get_user)
                .service(delete_user),
        )
}

async fn send(state: HttpState, request: actix_test::TestRequest) -> (StatusCode, Value) {
    let app = actix_test::init_service(test_app(state)).await;
    let response = actix_test::call_service(&app, request.to_request()).await;
    let status = response.status();
    let body = actix_test::read_body(response).await;
    let value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).expect("JSON body")
    };
    (status, value)
}

fn token_for(clock: &Arc<MutableClock>, role: Role) -> String {
    let username = Username::new("operator01").expect("username");
    bearer(clock, &username, IdentityId::random(), role)
}

#[rstest]
#[case(json!({"password1": STRONG, "password2": STRONG}), "userName", "missing_field")]
#[case(json!({"userName": "alice1234", "password2": STRONG}), "password1", "missing_field")]
#[case(json!({"userName": "alice", "password1": STRONG, "password2": STRONG}), "userName", "length")]
#[case(json!({"userName": "alice_123", "password1": STRONG, "password2": STRONG}), "userName", "characters")]
#[case(json!({"userName": "alice1234", "password1": "short", "password2": "short"}), "password1", "length")]
#[case(json!({"userName": "alice1234", "password1": "abcdefghijkl", "password2": "abcdefghijkl"}), "password1", "composition")]
#[case(json!({"userName": "alice1234", "password1": STRONG, "password2": "AbCdef12!!35"}), "password2", "mismatch")]
#[actix_web::test]
async fn register_validation_failures_name_the_field(
    clock: Arc<MutableClock>,
    #[case] body: Value,
    #[case] field: &str,
    #[case] code: &str,
) {
    let mut state = test_state(clock);
    let mut accounts = MockAuthenticationCommand::new();
    accounts.expect_register().times(0);
    state.authentication = Arc::new(accounts);

    let request = actix_test::TestRequest::post()
        .uri("/api/v1/users/register")
        .set_json(&body);
    let (status, value) = send(state, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(value["code"], "invalid_input");
    assert_eq!(value["details"]["field"], field);
    assert_eq!(value["details"]["code"], code);
}

#[rstest]
#[actix_web::test]
async fn malformed_json_is_invalid_input(clock: Arc<MutableClock>) {
    let request = actix_test::TestRequest::post()
        .uri("/api/v1/users/login")
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json");
    let (status, value) = send(test_state(clock), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(value["code"], "invalid_input");
    assert_eq!(value["details"]["code"], "malformed_body");
}

#[rstest]
#[actix_web::test]
async fn register_reports_success_message(clock: Arc<MutableClock>) {
    let mut state = test_state(clock);
    let mut accounts = MockAuthenticationCommand::new();
    accounts
        .expect_register()
        .withf(|credentials| credentials.username().as_str() == "alice1234")
        .times(1)
        .return_once(|_| Ok(IdentityId::random()));
    state.authentication = Arc::new(accounts);

    let request = actix_test::TestRequest::post()
        .uri("/api/v1/users/register")
        .set_json(json!({"userName": "alice1234", "password1": STRONG, "password2": STRONG}));
    let (status, value) = send(state, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(value, json!({"message": "User created successfully"}));
}

#[rstest]
#[actix_web::test]
async fn duplicate_registration_is_conflict(clock: Arc<MutableClock>) {
    let mut state = test_state(clock);
    let mut accounts = MockAuthenticationCommand::new();
    accounts
        .expect_register()
        .return_once(|_| Err(Error::duplicate_identity("username is already taken")));
    state.authentication = Arc::new(accounts);

    let request = actix_test::TestRequest::post()
        .uri("/api/v1/users/register")
        .set_json(json!({"userName": "alice1234", "password1": STRONG, "password2": STRONG}));
    let (status, value) = send(state, request).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(value["code"], "duplicate_identity");
}

#[rstest]
#[actix_web::test]
async fn login_returns_token(clock: Arc<MutableClock>) {
    let mut state = test_state(clock);
    let mut accounts = MockAuthenticationCommand::new();
    accounts
        .expect_login()
        .withf(|credentials| credentials.username() == "alice1234")
        .return_once(|_| Ok("signed.jwt.value".to_owned()));
    state.authentication = Arc::new(accounts);

    let request = actix_test::TestRequest::post()
        .uri("/api/v1/users/login")
        .set_json(json!({"userName": " alice1234 ", "password": STRONG}));
    let (status, value) = send(state, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(value, json!({"token": "signed.jwt.value"}));
}

#[rstest]
#[actix_web::test]
async fn rejected_login_is_unauthorized(clock: Arc<MutableClock>) {
    let mut state = test_state(clock);
    let mut accounts = MockAuthenticationCommand::new();
    accounts
        .expect_login()
        .return_once(|_| Err(Error::invalid_credentials("invalid username or password")));
    state.authentication = Arc::new(accounts);

    let request = actix_test::TestRequest::post()
        .uri("/api/v1/users/login")
        .set_json(json!({"userName": "alice1234", "password": "wrong"}));
    let (status, value) = send(state, request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(value["code"], "invalid_credentials");
}

#[rstest]
#[actix_web::test]
async fn administration_requires_a_token(clock: Arc<MutableClock>) {
    let (status, value) =
        send(test_state(clock), actix_test::TestRequest::get().uri("/api/v1/users")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(value["code"], "unauthorized");
}

#[rstest]
#[actix_web::test]
async fn administration_rejects_ordinary_role(clock: Arc<MutableClock>) {
    let mut state = test_state(clock.clone());
    let mut identities = MockIdentityAdministration::new();
    identities.expect_list_identities().times(0);
    state.identities = Arc::new(identities);

    let request = actix_test::TestRequest::get()
        .uri("/api/v1/users")
        .insert_header((AUTHORIZATION, token_for(&clock, Role::User)));
    let (status, value) = send(state, request).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(value["code"], "forbidden");
}

#[rstest]
#[actix_web::test]
async fn admin_lists_accounts(clock: Arc<MutableClock>) {
    let id = IdentityId::random();
    let mut state = test_state(clock.clone());
    let mut identities = MockIdentityAdministration::new();
    identities.expect_list_identities().return_once(move || {
        Ok(vec![IdentitySummary {
            id,
            user_name: Username::new("alice1234").expect("username"),
            role: Role::User,
        }])
    });
    state.identities = Arc::new(identities);

    let request = actix_test::TestRequest::get()
        .uri("/api/v1/users")
        .insert_header((AUTHORIZATION, token_for(&clock, Role::Admin)));
    let (status, value) = send(state, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        value,
        json!([{"id": id.to_string(), "userName": "alice1234", "role": "User"}])
    );
}

#[rstest]
#[actix_web::test]
async fn admin_get_of_unknown_account_is_not_found(clock: Arc<MutableClock>) {
    let mut state = test_state(clock.clone());
    let mut identities = MockIdentityAdministration::new();
    identities
        .expect_get_identity()
        .return_once(|id| Err(Error::not_found(format!("identity {id} not found"))));
    state.identities = Arc::new(identities);

    let request = actix_test::TestRequest::get()
        .uri(&format!("/api/v1/users/{}", IdentityId::random()))
        .insert_header((AUTHORIZATION, token_for(&clock, Role::Admin)));
    let (status, value) = send(state, request).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(value["code"], "not_found");
}

#[rstest]
#[actix_web::test]
async fn admin_delete_confirms_removal(clock: Arc<MutableClock>) {
    let target = IdentityId::random();
    let mut state = test_state(clock.clone());
    let mut identities = MockIdentityAdministration::new();
    identities
        .expect_delete_identity()
        .withf(move |id| *id == target)
        .times(1)
        .return_once(|_| Ok(()));
    state.identities = Arc::new(identities);

    let request = actix_test::TestRequest::delete()
        .uri(&format!("/api/v1/users/{target}"))
        .insert_header((AUTHORIZATION, token_for(&clock, Role::Admin)));
    let (status, value) = send(state, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(value["message"], "Account has been deleted successfully");
}

#[rstest]
#[actix_web::test]
async fn malformed_account_id_is_invalid_input(clock: Arc<MutableClock>) {
    let request = actix_test::TestRequest::delete()
        .uri("/api/v1/users/not-a-uuid")
        .insert_header((AUTHORIZATION, token_for(&clock, Role::Admin)));
    let (status, value) = send(test_state(clock.clone()), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(value["details"]["code"], "invalid_uuid");
}
