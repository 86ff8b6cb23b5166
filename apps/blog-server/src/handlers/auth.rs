//! Authentication handlers.

use actix_web::{HttpResponse, web};

use blogicum_core::domain::User;
use blogicum_core::forms::{PasswordChangeForm, RegistrationForm};
use blogicum_shared::ApiResponse;
use blogicum_shared::dto::{
    AuthResponse, LoginRequest, MeResponse, PasswordChangeRequest, RegisterRequest,
};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// `leo@example.com` -> `l***@example.com`, for logs.
fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => {
            let first = local.chars().next().unwrap_or('*');
            format!("{first}***@{domain}")
        }
        None => "***".to_string(),
    }
}

fn issue_token(state: &AppState, user: &User) -> AppResult<AuthResponse> {
    let token = state
        .tokens
        .generate_token(user.id, &user.username, user.roles())
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(AuthResponse {
        access_token: token,
        token_type: "Bearer".to_string(),
        expires_in: state.tokens.expiration_seconds().max(0) as u64,
    })
}

/// POST /auth/register/
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    tracing::debug!(username = %req.username, email = %mask_email(&req.email), "Registration attempt");

    let form = RegistrationForm {
        username: req.username,
        email: req.email,
        password: req.password,
        first_name: req.first_name,
        last_name: req.last_name,
    };
    let user = state.blog.register(form, state.passwords.as_ref()).await?;

    Ok(HttpResponse::Created().json(issue_token(&state, &user)?))
}

/// POST /auth/login/
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let user = state
        .blog
        .authenticate(&req.username, &req.password, state.passwords.as_ref())
        .await?;

    tracing::info!(user_id = user.id, "User logged in");
    Ok(HttpResponse::Ok().json(issue_token(&state, &user)?))
}

/// POST /auth/logout/
///
/// Tokens are stateless; the client discards its own.
pub async fn logout(identity: Identity) -> HttpResponse {
    tracing::info!(user_id = identity.user_id, "User logged out");
    HttpResponse::NoContent().finish()
}

/// POST /auth/password_change/
pub async fn password_change(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<PasswordChangeRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let form = PasswordChangeForm {
        old_password: req.old_password,
        new_password: req.new_password,
    };
    state
        .blog
        .change_password(&identity.context(), form, state.passwords.as_ref())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(identity.user_id, "Password changed")))
}

/// GET /auth/me/ - Protected route
pub async fn me(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let user = state.blog.own_profile(&identity.context()).await?;

    Ok(HttpResponse::Ok().json(MeResponse {
        id: user.id,
        username: user.username,
        roles: identity.roles,
    }))
}
