//! Bearer-token authentication for HTTP handlers.
//!
//! Handlers that take an [`AuthenticatedCaller`] argument only run once the
//! `Authorization: Bearer <token>` header has been validated against the
//! [`TokenIssuer`](crate::domain::TokenIssuer) held in [`HttpState`].

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::{Ready, ready};
use tracing::debug;

use crate::domain::{AuthenticatedCaller, Error};

use super::state::HttpState;

const BEARER_SCHEME: &str = "bearer";

/// Pull the raw token out of an `Authorization` header value.
fn bearer_token(req: &HttpRequest) -> Result<&str, Error> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .ok_or_else(|| Error::unauthorized("bearer token required"))?;
    let value = header
        .to_str()
        .map_err(|_| Error::unauthorized("malformed authorization header"))?;
    let (scheme, token) = value
        .split_once(' ')
        .ok_or_else(|| Error::unauthorized("malformed authorization header"))?;
    if !scheme.eq_ignore_ascii_case(BEARER_SCHEME) || token.trim().is_empty() {
        return Err(Error::unauthorized("bearer token required"));
    }
    Ok(token.trim())
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedCaller, Error> {
    let state = req
        .app_data::<web::Data<HttpState>>()
        .ok_or_else(|| Error::configuration("HTTP state is not registered"))?;
    let token = bearer_token(req)?;
    state.tokens.validate(token).map_err(|err| {
        debug!(error = %err, "bearer token refused");
        Error::from(err)
    })
}

impl FromRequest for AuthenticatedCaller {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ErrorCode, IdentityId, Role, Username};
    use crate::inbound::http::test_utils::{bearer, test_state};
    use crate::test_support::MutableClock;
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test as actix_test};
    use rstest::rstest;
    use serde_json::Value;
    use std::sync::Arc;

    async fn whoami(caller: AuthenticatedCaller) -> HttpResponse {
        HttpResponse::Ok().body(format!("{}:{}", caller.username, caller.role))
    }

    async fn call(clock: Arc<MutableClock>, header: Option<String>) -> (StatusCode, String) {
        let state = test_state(clock);
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .route("/whoami", web::get().to(whoami)),
        )
        .await;
        let mut request = actix_test::TestRequest::get().uri("/whoami");
        if let Some(value) = header {
            request = request.insert_header((AUTHORIZATION, value));
        }
        let response = actix_test::call_service(&app, request.to_request()).await;
        let status = response.status();
        let body = actix_test::read_body(response).await;
        (status, String::from_utf8_lossy(&body).into_owned())
    }

    fn alice_token(clock: &Arc<MutableClock>) -> String {
        let username = Username::new("alice1234").expect("username");
        bearer(clock, &username, IdentityId::random(), Role::User)
    }

    #[rstest]
    #[actix_web::test]
    async fn valid_bearer_token_yields_caller() {
        let clock = Arc::new(MutableClock::default());
        let header = alice_token(&clock);
        let (status, body) = call(clock, Some(header)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "alice1234:User");
    }

    #[rstest]
    #[actix_web::test]
    async fn lowercase_scheme_is_accepted() {
        let clock = Arc::new(MutableClock::default());
        let header = alice_token(&clock).replacen("Bearer", "bearer", 1);
        let (status, _) = call(clock, Some(header)).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[rstest]
    #[case(None)]
    #[case(Some("Basic YWxpY2U6c2VjcmV0".to_owned()))]
    #[case(Some("Bearer".to_owned()))]
    #[case(Some("Bearer not-a-jwt".to_owned()))]
    #[actix_web::test]
    async fn missing_or_invalid_tokens_are_unauthorized(#[case] header: Option<String>) {
        let (status, body) = call(Arc::new(MutableClock::default()), header).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        let value: Value = serde_json::from_str(&body).expect("error payload");
        assert_eq!(value["code"], "unauthorized");
    }

    #[rstest]
    #[actix_web::test]
    async fn expired_token_is_unauthorized() {
        let clock = Arc::new(MutableClock::default());
        let header = alice_token(&clock);
        clock.advance_seconds(crate::test_support::TEST_TTL_SECONDS);
        let (status, _) = call(clock, Some(header)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[rstest]
    fn bearer_token_is_trimmed() {
        let req = actix_test::TestRequest::get()
            .insert_header((AUTHORIZATION, "Bearer   abc.def.ghi "))
            .to_http_request();
        assert_eq!(bearer_token(&req).expect("token"), "abc.def.ghi");
    }

    #[rstest]
    fn missing_state_is_a_configuration_error() {
        let req = actix_test::TestRequest::get()
            .insert_header((AUTHORIZATION, "Bearer abc"))
            .to_http_request();
        let err = authenticate(&req).expect_err("no state");
        assert_eq!(err.code(), ErrorCode::ConfigurationError);
    }
}
