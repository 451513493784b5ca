//! Personal information HTTP handlers.
//!
//! ```text
//! GET /api/v1/person-information
//! GET /api/v1/person-information/{id}
//! POST /api/v1/person-information
//! PUT /api/v1/person-information/{id}
//! DELETE /api/v1/person-information/{id}
//! ```
//!
//! Every route requires the ordinary role and only ever touches records owned
//! by the caller. Owner ids in request bodies are ignored. Fetching a single
//! record also returns the photo attached to it, if any.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    AuthenticatedCaller, Birthday, Email, Error, Gender, OwnedResource, PersonInformation,
    PersonInformationDraft, PersonName, PersonalCode, PhoneNumber, PlaceOfResidence,
    ProfilePhoto, Role,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, missing_field_error, parse_resource_id, person_information_error,
};

/// Nested address in a personal information request.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOfResidenceRequest {
    #[schema(example = "Vilnius")]
    pub city: Option<String>,
    #[schema(example = "Gedimino pr.")]
    pub street: Option<String>,
    #[schema(example = 9)]
    pub house_number: Option<u32>,
    pub apartment_number: Option<u32>,
}

/// Request body for creating or replacing a personal information record.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PersonInformationRequest {
    #[schema(example = "Alice")]
    pub first_name: Option<String>,
    #[schema(example = "Smith")]
    pub last_name: Option<String>,
    #[schema(example = "Female")]
    pub gender: Option<String>,
    #[schema(example = "01-01-1990")]
    pub birthday: Option<String>,
    #[schema(example = "49001011234")]
    pub personal_code: Option<String>,
    #[schema(example = "+37060000000")]
    pub phone_number: Option<String>,
    #[schema(example = "alice@example.com")]
    pub email: Option<String>,
    pub place_of_residence: Option<PlaceOfResidenceRequest>,
}

/// A record together with the photo attached to it.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PersonInformationView {
    #[serde(flatten)]
    pub record: PersonInformation,
    pub profile_photo: Option<ProfilePhoto>,
}

fn required<T>(value: Option<T>, field: &'static str) -> Result<T, Error> {
    value.ok_or_else(|| missing_field_error(FieldName::new(field)))
}

impl TryFrom<PlaceOfResidenceRequest> for PlaceOfResidence {
    type Error = Error;

    fn try_from(value: PlaceOfResidenceRequest) -> Result<Self, Self::Error> {
        let city = required(value.city, "city")?;
        let street = required(value.street, "street")?;
        let house_number = required(value.house_number, "houseNumber")?;
        Self::new(&city, &street, house_number, value.apartment_number)
            .map_err(person_information_error)
    }
}

impl TryFrom<PersonInformationRequest> for PersonInformationDraft {
    type Error = Error;

    fn try_from(value: PersonInformationRequest) -> Result<Self, Self::Error> {
        let first_name = required(value.first_name, "firstName")?;
        let last_name = required(value.last_name, "lastName")?;
        let gender = required(value.gender, "gender")?;
        let birthday = required(value.birthday, "birthday")?;
        let personal_code = required(value.personal_code, "personalCode")?;
        let phone_number = required(value.phone_number, "phoneNumber")?;
        let email = required(value.email, "email")?;
        let place_of_residence = required(value.place_of_residence, "placeOfResidence")?;

        Ok(Self {
            first_name: PersonName::new(&first_name, "firstName")
                .map_err(person_information_error)?,
            last_name: PersonName::new(&last_name, "lastName").map_err(person_information_error)?,
            gender: Gender::parse(&gender).map_err(person_information_error)?,
            birthday: Birthday::new(&birthday).map_err(person_information_error)?,
            personal_code: PersonalCode::new(&personal_code).map_err(person_information_error)?,
            phone_number: PhoneNumber::new(&phone_number).map_err(person_information_error)?,
            email: Email::new(&email).map_err(person_information_error)?,
            place_of_residence: PlaceOfResidence::try_from(place_of_residence)?,
        })
    }
}

/// List the caller's personal information records.
#[utoipa::path(
    get,
    path = "/api/v1/person-information",
    responses(
        (status = 200, description = "Records owned by the caller", body = [PersonInformation]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error)
    ),
    tags = ["person-information"],
    operation_id = "listPersonInformation",
    security(("bearer" = []))
)]
#[get("/person-information")]
pub async fn list_person_information(
    state: web::Data<HttpState>,
    caller: AuthenticatedCaller,
) -> ApiResult<web::Json<Vec<PersonInformation>>> {
    caller.require_role(Role::User)?;
    let records = state
        .person_information_query
        .list(&caller.identity_id)
        .await?;
    Ok(web::Json(records))
}

/// Fetch one of the caller's records.
#[utoipa::path(
    get,
    path = "/api/v1/person-information/{id}",
    params(("id" = String, Path, description = "Record identifier")),
    responses(
        (status = 200, description = "Record with its photo", body = PersonInformationView),
        (status = 400, description = "Invalid identifier", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Missing or owned by someone else", body = Error)
    ),
    tags = ["person-information"],
    operation_id = "getPersonInformation",
    security(("bearer" = []))
)]
#[get("/person-information/{id}")]
pub async fn get_person_information(
    state: web::Data<HttpState>,
    caller: AuthenticatedCaller,
    path: web::Path<String>,
) -> ApiResult<web::Json<PersonInformationView>> {
    caller.require_role(Role::User)?;
    let id = parse_resource_id(&path.into_inner(), FieldName::new("id"))?;
    let record = state
        .person_information_query
        .get(&id, &caller.identity_id)
        .await?;
    let profile_photo = state
        .profile_photos_query
        .list(&caller.identity_id)
        .await?
        .into_iter()
        .find(|photo| photo.person_information_id() == record.id());
    Ok(web::Json(PersonInformationView {
        record,
        profile_photo,
    }))
}

/// Create a record owned by the caller.
#[utoipa::path(
    post,
    path = "/api/v1/person-information",
    request_body = PersonInformationRequest,
    responses(
        (status = 201, description = "Record created", body = PersonInformation),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error)
    ),
    tags = ["person-information"],
    operation_id = "createPersonInformation",
    security(("bearer" = []))
)]
#[post("/person-information")]
pub async fn create_person_information(
    state: web::Data<HttpState>,
    caller: AuthenticatedCaller,
    payload: web::Json<PersonInformationRequest>,
) -> ApiResult<HttpResponse> {
    caller.require_role(Role::User)?;
    let draft = PersonInformationDraft::try_from(payload.into_inner())?;
    let record = state
        .person_information
        .create(draft, &caller.identity_id)
        .await?;
    Ok(HttpResponse::Created().json(record))
}

/// Replace the fields of one of the caller's records.
#[utoipa::path(
    put,
    path = "/api/v1/person-information/{id}",
    params(("id" = String, Path, description = "Record identifier")),
    request_body = PersonInformationRequest,
    responses(
        (status = 200, description = "Record updated", body = PersonInformation),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Missing or owned by someone else", body = Error)
    ),
    tags = ["person-information"],
    operation_id = "updatePersonInformation",
    security(("bearer" = []))
)]
#[put("/person-information/{id}")]
pub async fn update_person_information(
    state: web::Data<HttpState>,
    caller: AuthenticatedCaller,
    path: web::Path<String>,
    payload: web::Json<PersonInformationRequest>,
) -> ApiResult<web::Json<PersonInformation>> {
    caller.require_role(Role::User)?;
    let id = parse_resource_id(&path.into_inner(), FieldName::new("id"))?;
    let draft = PersonInformationDraft::try_from(payload.into_inner())?;
    let record = state
        .person_information
        .update(&id, draft, &caller.identity_id)
        .await?;
    Ok(web::Json(record))
}

/// Delete one of the caller's records and the photos attached to it.
#[utoipa::path(
    delete,
    path = "/api/v1/person-information/{id}",
    params(("id" = String, Path, description = "Record identifier")),
    responses(
        (status = 204, description = "Record deleted"),
        (status = 400, description = "Invalid identifier", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Missing or owned by someone else", body = Error)
    ),
    tags = ["person-information"],
    operation_id = "deletePersonInformation",
    security(("bearer" = []))
)]
#[delete("/person-information/{id}")]
pub async fn delete_person_information(
    state: web::Data<HttpState>,
    caller: AuthenticatedCaller,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    caller.require_role(Role::User)?;
    let id = parse_resource_id(&path.into_inner(), FieldName::new("id"))?;
    state
        .person_information
        .delete(&id, &caller.identity_id)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
