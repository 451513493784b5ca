//! Profile photo HTTP handlers.
//!
//! Photos are metadata only: a file name attached to one of the caller's
//! personal information records. A record carries at most one photo.

use actix_web::{HttpResponse, delete, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    AuthenticatedCaller, Error, PhotoFileName, ProfilePhoto, ProfilePhotoDraft, Role,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, missing_field_error, parse_resource_id, photo_error,
};

/// Request body for `POST /api/v1/profile-photos`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePhotoRequest {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub person_information_id: Option<String>,
    #[schema(example = "portrait.jpg")]
    pub file_name: Option<String>,
}

impl TryFrom<ProfilePhotoRequest> for ProfilePhotoDraft {
    type Error = Error;

    fn try_from(value: ProfilePhotoRequest) -> Result<Self, Self::Error> {
        let field = FieldName::new("personInformationId");
        let person_information_id = value
            .person_information_id
            .ok_or_else(|| missing_field_error(field))?;
        let file_name = value
            .file_name
            .ok_or_else(|| missing_field_error(FieldName::new("fileName")))?;
        Ok(Self {
            person_information_id: parse_resource_id(&person_information_id, field)?,
            file_name: PhotoFileName::new(&file_name).map_err(photo_error)?,
        })
    }
}

/// List the caller's photos.
#[utoipa::path(
    get,
    path = "/api/v1/profile-photos",
    responses(
        (status = 200, description = "Photos owned by the caller", body = [ProfilePhoto]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error)
    ),
    tags = ["profile-photos"],
    operation_id = "listProfilePhotos",
    security(("bearer" = []))
)]
#[get("/profile-photos")]
pub async fn list_profile_photos(
    state: web::Data<HttpState>,
    caller: AuthenticatedCaller,
) -> ApiResult<web::Json<Vec<ProfilePhoto>>> {
    caller.require_role(Role::User)?;
    Ok(web::Json(
        state.profile_photos_query.list(&caller.identity_id).await?,
    ))
}

/// Fetch one of the caller's photos.
#[utoipa::path(
    get,
    path = "/api/v1/profile-photos/{id}",
    params(("id" = String, Path, description = "Photo identifier")),
    responses(
        (status = 200, description = "Photo", body = ProfilePhoto),
        (status = 400, description = "Invalid identifier", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Missing or owned by someone else", body = Error)
    ),
    tags = ["profile-photos"],
    operation_id = "getProfilePhoto",
    security(("bearer" = []))
)]
#[get("/profile-photos/{id}")]
pub async fn get_profile_photo(
    state: web::Data<HttpState>,
    caller: AuthenticatedCaller,
    path: web::Path<String>,
) -> ApiResult<web::Json<ProfilePhoto>> {
    caller.require_role(Role::User)?;
    let id = parse_resource_id(&path.into_inner(), FieldName::new("id"))?;
    Ok(web::Json(
        state
            .profile_photos_query
            .get(&id, &caller.identity_id)
            .await?,
    ))
}

/// Attach a photo to one of the caller's personal information records.
#[utoipa::path(
    post,
    path = "/api/v1/profile-photos",
    request_body = ProfilePhotoRequest,
    responses(
        (status = 201, description = "Photo attached", body = ProfilePhoto),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Parent record missing or owned by someone else", body = Error),
        (status = 409, description = "Parent record already has a photo", body = Error)
    ),
    tags = ["profile-photos"],
    operation_id = "createProfilePhoto",
    security(("bearer" = []))
)]
#[post("/profile-photos")]
pub async fn create_profile_photo(
    state: web::Data<HttpState>,
    caller: AuthenticatedCaller,
    payload: web::Json<ProfilePhotoRequest>,
) -> ApiResult<HttpResponse> {
    caller.require_role(Role::User)?;
    let draft = ProfilePhotoDraft::try_from(payload.into_inner())?;
    let photo = state
        .profile_photos
        .create(draft, &caller.identity_id)
        .await?;
    Ok(HttpResponse::Created().json(photo))
}

/// Delete one of the caller's photos.
#[utoipa::path(
    delete,
    path = "/api/v1/profile-photos/{id}",
    params(("id" = String, Path, description = "Photo identifier")),
    responses(
        (status = 204, description = "Photo deleted"),
        (status = 400, description = "Invalid identifier", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Missing or owned by someone else", body = Error)
    ),
    tags = ["profile-photos"],
    operation_id = "deleteProfilePhoto",
    security(("bearer" = []))
)]
#[delete("/profile-photos/{id}")]
pub async fn delete_profile_photo(
    state: web::Data<HttpState>,
    caller: AuthenticatedCaller,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    caller.require_role(Role::User)?;
    let id = parse_resource_id(&path.into_inner(), FieldName::new("id"))?;
    state
        .profile_photos
        .delete(&id, &caller.identity_id)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
