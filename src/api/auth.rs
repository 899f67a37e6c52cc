//! Authentication endpoints

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppResult;

use super::AuthenticatedUser;

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
}

/// Plain message response
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub msg: String,
}

/// Log in with username and password, receiving a bearer token
#[utoipa::path(
    post,
    path = "/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = LoginResponse),
        (status = 401, description = "Bad username or password")
    )
)]
pub async fn login(
    State(state): State<crate::AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let access_token = state
        .services
        .auth
        .login(&request.username, &request.password)
        .await?;

    Ok(Json(LoginResponse {
        access_token,
        token_type: "Bearer".to_string(),
    }))
}

/// Log out, revoking the presented token
#[utoipa::path(
    post,
    path = "/logout",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Token revoked", body = MessageResponse),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn logout(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<MessageResponse>> {
    state.services.auth.logout(&claims);

    Ok(Json(MessageResponse {
        msg: "Successfully logged out".to_string(),
    }))
}

/// Protected probe endpoint echoing the authenticated identity
#[utoipa::path(
    get,
    path = "/protected",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Authenticated", body = MessageResponse),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn protected(
    AuthenticatedUser(claims): AuthenticatedUser,
) -> Json<MessageResponse> {
    Json(MessageResponse {
        msg: format!(
            "Hello user with id {}, you are accessing a protected route!",
            claims.user_id
        ),
    })
}
