//! Account HTTP handlers.
//!
//! ```text
//! POST /api/v1/users/register {"userName":"alice1234","password1":"…","password2":"…"}
//! POST /api/v1/users/login {"userName":"alice1234","password":"…"}
//! GET /api/v1/users
//! GET /api/v1/users/{id}
//! DELETE /api/v1/users/{id}
//! ```

use actix_web::{delete, get, post, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::domain::{
    AuthenticatedCaller, Error, IdentitySummary, LoginCredentials, RegistrationCredentials, Role,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, credential_error, missing_field_error, parse_identity_id,
};

/// Registration request body for `POST /api/v1/users/register`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[schema(example = "alice1234")]
    pub user_name: Option<String>,
    pub password1: Option<String>,
    pub password2: Option<String>,
}

impl TryFrom<RegisterRequest> for RegistrationCredentials {
    type Error = Error;

    fn try_from(value: RegisterRequest) -> Result<Self, Self::Error> {
        let user_name = value
            .user_name
            .ok_or_else(|| missing_field_error(FieldName::new("userName")))?;
        let password1 = value
            .password1
            .ok_or_else(|| missing_field_error(FieldName::new("password1")))?;
        let password2 = value
            .password2
            .ok_or_else(|| missing_field_error(FieldName::new("password2")))?;
        Self::try_from_parts(&user_name, &password1, &password2).map_err(credential_error)
    }
}

/// Login request body for `POST /api/v1/users/login`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[schema(example = "alice1234")]
    pub user_name: Option<String>,
    pub password: Option<String>,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = Error;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        let user_name = value
            .user_name
            .ok_or_else(|| missing_field_error(FieldName::new("userName")))?;
        let password = value
            .password
            .ok_or_else(|| missing_field_error(FieldName::new("password")))?;
        Self::try_from_parts(&user_name, &password).map_err(credential_error)
    }
}

/// Confirmation message returned by mutating account endpoints.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "User created successfully")]
    pub message: String,
}

impl MessageResponse {
    fn new(message: &str) -> web::Json<Self> {
        web::Json(Self {
            message: message.to_owned(),
        })
    }
}

/// Bearer token returned by a successful login.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct TokenResponse {
    pub token: String,
}

/// Create an account with the ordinary role.
#[utoipa::path(
    post,
    path = "/api/v1/users/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Account created", body = MessageResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Username already taken", body = Error),
        (status = 503, description = "Storage unavailable", body = Error)
    ),
    tags = ["users"],
    operation_id = "register",
    security([])
)]
#[post("/users/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<web::Json<MessageResponse>> {
    let credentials = RegistrationCredentials::try_from(payload.into_inner())?;
    state.authentication.register(&credentials).await?;
    Ok(MessageResponse::new("User created successfully"))
}

/// Exchange credentials for a bearer token.
///
/// Unknown usernames and wrong passwords produce the same response.
#[utoipa::path(
    post,
    path = "/api/v1/users/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = TokenResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 500, description = "Token settings unusable", body = Error)
    ),
    tags = ["users"],
    operation_id = "login",
    security([])
)]
#[post("/users/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<TokenResponse>> {
    let credentials = LoginCredentials::try_from(payload.into_inner())?;
    let token = state.authentication.login(&credentials).await?;
    Ok(web::Json(TokenResponse { token }))
}

/// List every registered account.
#[utoipa::path(
    get,
    path = "/api/v1/users",
    responses(
        (status = 200, description = "Accounts", body = [IdentitySummary]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error)
    ),
    tags = ["users"],
    operation_id = "listUsers",
    security(("bearer" = []))
)]
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    caller: AuthenticatedCaller,
) -> ApiResult<web::Json<Vec<IdentitySummary>>> {
    caller.require_role(Role::Admin)?;
    Ok(web::Json(state.identities.list_identities().await?))
}

/// Fetch one account.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    params(("id" = String, Path, description = "Account identifier")),
    responses(
        (status = 200, description = "Account", body = IdentitySummary),
        (status = 400, description = "Invalid identifier", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["users"],
    operation_id = "getUser",
    security(("bearer" = []))
)]
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    caller: AuthenticatedCaller,
    path: web::Path<String>,
) -> ApiResult<web::Json<IdentitySummary>> {
    caller.require_role(Role::Admin)?;
    let id = parse_identity_id(&path.into_inner(), FieldName::new("id"))?;
    Ok(web::Json(state.identities.get_identity(&id).await?))
}

/// Delete an account together with every record it owns.
#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    params(("id" = String, Path, description = "Account identifier")),
    responses(
        (status = 200, description = "Account deleted", body = MessageResponse),
        (status = 400, description = "Invalid identifier", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["users"],
    operation_id = "deleteUser",
    security(("bearer" = []))
)]
#[delete("/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    caller: AuthenticatedCaller,
    path: web::Path<String>,
) -> ApiResult<web::Json<MessageResponse>> {
    caller.require_role(Role::Admin)?;
    let id = parse_identity_id(&path.into_inner(), FieldName::new("id"))?;
    state.identities.delete_identity(&id).await?;
    info!(identity_id = %id, admin = %caller.identity_id, "account deleted by administrator");
    Ok(MessageResponse::new("Account has been deleted successfully"))
}

#[cfg(test)]
mod tests;
