//! Shared harness for end-to-end HTTP tests.
//!
//! Builds the full REST surface over an in-memory database and drives it
//! in-process with `actix_web::test`.

#![allow(
    dead_code,
    reason = "each integration test crate uses a subset of the helpers"
)]

use std::sync::Arc;

use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{App, test as actix_test, web};
use persona::Trace;
use persona::domain::{
    AuthenticationService, OwnedResourceService, ProfilePhotoService, RegistrationCredentials,
    TokenIssuer,
};
use persona::inbound::http::person_information::{
    create_person_information, delete_person_information, get_person_information,
    list_person_information, update_person_information,
};
use persona::inbound::http::profile_photos::{
    create_profile_photo, delete_profile_photo, get_profile_photo, list_profile_photos,
};
use persona::inbound::http::state::{HttpState, HttpStatePorts};
use persona::inbound::http::users::{delete_user, get_user, list_users, login, register};
use persona::inbound::http::validation::json_config;
use persona::outbound::memory::{InMemoryIdentityRegistry, MemoryDatabase};
use persona::test_support::{MutableClock, token_settings};
use serde_json::{Value, json};

pub const STRONG_PASSWORD: &str = "AbCdef12!!34";

/// In-process deployment: one database, one clock, one token issuer.
pub struct TestDeployment {
    pub database: MemoryDatabase,
    pub clock: Arc<MutableClock>,
    pub tokens: TokenIssuer,
}

impl TestDeployment {
    pub fn new() -> Self {
        let clock = Arc::new(MutableClock::default());
        let tokens = TokenIssuer::new(token_settings(), clock.clone());
        Self {
            database: MemoryDatabase::new(),
            clock,
            tokens,
        }
    }

    fn accounts(&self) -> Arc<AuthenticationService<InMemoryIdentityRegistry>> {
        Arc::new(AuthenticationService::new(
            Arc::new(self.database.identity_registry()),
            self.tokens.clone(),
        ))
    }

    pub fn http_state(&self) -> HttpState {
        let accounts = self.accounts();
        let people_store = Arc::new(self.database.person_information_store());
        let people = Arc::new(OwnedResourceService::new(people_store.clone()));
        let photos = Arc::new(ProfilePhotoService::new(
            Arc::new(self.database.profile_photo_store()),
            people_store,
        ));
        HttpState::new(
            self.tokens.clone(),
            HttpStatePorts {
                authentication: accounts.clone(),
                identities: accounts,
                person_information: people.clone(),
                person_information_query: people,
                profile_photos: photos.clone(),
                profile_photos_query: photos,
            },
        )
    }

    /// Create an administrator directly through the domain service.
    pub async fn provision_admin(&self, user_name: &str) {
        let credentials =
            RegistrationCredentials::try_from_parts(user_name, STRONG_PASSWORD, STRONG_PASSWORD)
                .expect("valid admin credentials");
        self.accounts()
            .provision_admin(&credentials)
            .await
            .expect("admin provisioned");
    }

    pub async fn service(
        &self,
    ) -> impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error> {
        actix_test::init_service(
            App::new()
                .app_data(web::Data::new(self.http_state()))
                .app_data(json_config())
                .wrap(Trace)
                .service(
                    web::scope("/api/v1")
                        .service(register)
                        .service(login)
                        .service(list_users)
                        .service(get_user)
                        .service(delete_user)
                        .service(list_person_information)
                        .service(get_person_information)
                        .service(create_person_information)
                        .service(update_person_information)
                        .service(delete_person_information)
                        .service(list_profile_photos)
                        .service(get_profile_photo)
                        .service(create_profile_photo)
                        .service(delete_profile_photo),
                ),
        )
        .await
    }
}

/// Response status and JSON body (`Null` when empty).
pub async fn send<S>(app: &S, request: actix_test::TestRequest) -> (StatusCode, Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let response = actix_test::call_service(app, request.to_request()).await;
    let status = response.status();
    let body = actix_test::read_body(response).await;
    let value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).expect("JSON body")
    };
    (status, value)
}

pub fn with_token(request: actix_test::TestRequest, token: &str) -> actix_test::TestRequest {
    request.insert_header((AUTHORIZATION, format!("Bearer {token}")))
}

pub async fn register_user<S>(app: &S, user_name: &str) -> StatusCode
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let request = actix_test::TestRequest::post()
        .uri("/api/v1/users/register")
        .set_json(json!({
            "userName": user_name,
            "password1": STRONG_PASSWORD,
            "password2": STRONG_PASSWORD,
        }));
    send(app, request).await.0
}

pub async fn login_token<S>(app: &S, user_name: &str) -> String
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let request = actix_test::TestRequest::post()
        .uri("/api/v1/users/login")
        .set_json(json!({"userName": user_name, "password": STRONG_PASSWORD}));
    let (status, body) = send(app, request).await;
    assert_eq!(status, StatusCode::OK, "login for {user_name} failed: {body}");
    body["token"].as_str().expect("token").to_owned()
}

pub fn person_payload(first_name: &str) -> Value {
    json!({
        "firstName": first_name,
        "lastName": "Smith",
        "gender": "Female",
        "birthday": "01-01-1990",
        "personalCode": "49001011234",
        "phoneNumber": "+37060000000",
        "email": "alice@example.com",
        "placeOfResidence": {"city": "Vilnius", "street": "Main", "houseNumber": 1, "apartmentNumber": 2}
    })
}
