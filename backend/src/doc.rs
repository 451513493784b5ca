//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint from the inbound layer, the
//! domain types they exchange and the bearer token security scheme. Swagger
//! UI serves it in debug builds and `cargo run --bin openapi-dump` exports it.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{
    Error, ErrorCode, Gender, IdentitySummary, PersonInformation, PlaceOfResidence, ProfilePhoto,
    Role,
};
use crate::inbound::http::health::ProbeStatus;
use crate::inbound::http::person_information::{
    PersonInformationRequest, PersonInformationView, PlaceOfResidenceRequest,
};
use crate::inbound::http::profile_photos::ProfilePhotoRequest;
use crate::inbound::http::users::{LoginRequest, MessageResponse, RegisterRequest, TokenResponse};

/// Name under which the bearer scheme is registered.
pub const BEARER_SCHEME: &str = "bearer";

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            BEARER_SCHEME,
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Token returned by POST /api/v1/users/login."))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Persona API",
        description = "Account registration, bearer-token login and owner-scoped personal records."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("bearer" = [])),
    paths(
        crate::inbound::http::users::register,
        crate::inbound::http::users::login,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::person_information::list_person_information,
        crate::inbound::http::person_information::get_person_information,
        crate::inbound::http::person_information::create_person_information,
        crate::inbound::http::person_information::update_person_information,
        crate::inbound::http::person_information::delete_person_information,
        crate::inbound::http::profile_photos::list_profile_photos,
        crate::inbound::http::profile_photos::get_profile_photo,
        crate::inbound::http::profile_photos::create_profile_photo,
        crate::inbound::http::profile_photos::delete_profile_photo,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        IdentitySummary,
        Role,
        Gender,
        PlaceOfResidence,
        PersonInformation,
        PersonInformationView,
        ProfilePhoto,
        RegisterRequest,
        LoginRequest,
        MessageResponse,
        TokenResponse,
        PersonInformationRequest,
        PlaceOfResidenceRequest,
        ProfilePhotoRequest,
        ProbeStatus,
    )),
    tags(
        (name = "users", description = "Registration, login and account administration"),
        (name = "person-information", description = "Personal records owned by the caller"),
        (name = "profile-photos", description = "Photo metadata attached to personal records"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
