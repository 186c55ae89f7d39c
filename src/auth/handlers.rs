use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, HeaderName, StatusCode},
    routing::post,
    Json, Router,
};
use tracing::{error, info, instrument, warn};

use crate::{
    auth::dto::{ResetPassword, ResetPasswordRequest},
    error::{ApiError, ApiResult},
    federation::{merge_profile, ProviderError},
    state::AppState,
    users::{normalize_email, DirectoryError, User},
};

pub const GOOGLE_TOKEN_HEADER: &str = "x-google-token";
pub const AUTH_TOKEN_HEADER: HeaderName = HeaderName::from_static("x-auth-token");
pub const RESET_ACK: &str = "Email will be sent to the account provided.";

const RESET_FAILED: &str = "Couldn't reset password.";

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login/google", post(login_google))
        .route("/reset-password", post(reset_password).put(set_password))
}

/// POST /login/google
#[instrument(skip(state, headers))]
pub async fn login_google(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<([(HeaderName, String); 1], Json<User>)> {
    let token = headers
        .get(GOOGLE_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| {
            warn!("google login without token");
            ApiError::login_redirect("Missing Token in header X-GOOGLE-TOKEN")
        })?;

    let profile = match state.identity.fetch_profile(token).await {
        Ok(p) => p,
        Err(ProviderError::Parse(e)) => {
            warn!(error = %e, "google profile did not parse");
            return Err(ApiError::login_redirect("Couldn't Parse Google Response"));
        }
        Err(e) => {
            warn!(error = %e, "google rejected token");
            return Err(ApiError::login_redirect("Couldn't Validate With Google"));
        }
    };

    let Some(email) = profile.primary_email().map(normalize_email) else {
        warn!(external_id = %profile.external_id, "google profile without email");
        return Err(ApiError::login_redirect("Couldn't Parse Google Response"));
    };

    let user = match state.users.get_by_email(&email).await {
        Ok(u) => u,
        Err(DirectoryError::NotFound) => User::new(email),
        Err(e) => {
            error!(error = %e, "error looking up user");
            return Err(ApiError::login_redirect("Error Validating User"));
        }
    };

    let mut user = merge_profile(user, &profile);

    if user.is_persisted() {
        if let Err(e) = state.users.update(user.id, &user).await {
            error!(error = %e, user_id = user.id, "error updating user from google login");
            return Err(ApiError::login_redirect("Error syncing data from google."));
        }
    } else {
        match state.users.create(&user).await {
            Ok(id) => user.id = id,
            Err(e) => {
                error!(error = %e, email = %user.email, "error adding user from google login");
                return Err(ApiError::login_redirect("Error syncing data from google."));
            }
        }
    }

    let session = match state.auth.mint_session_token(user.id).await {
        Ok(t) => t,
        Err(e) => {
            error!(error = %e, user_id = user.id, "session token minting failed");
            return Err(ApiError::login_redirect("Error generating token."));
        }
    };

    info!(user_id = user.id, email = %user.email, "user logged in with google");
    Ok(([(AUTH_TOKEN_HEADER, session)], Json(user)))
}

/// POST /reset-password
#[instrument(skip(state, payload))]
pub async fn reset_password(
    State(state): State<AppState>,
    payload: Result<Json<ResetPasswordRequest>, JsonRejection>,
) -> ApiResult<&'static str> {
    let email = payload
        .ok()
        .and_then(|Json(req)| req.email())
        .ok_or_else(|| {
            warn!("reset request with missing fields");
            ApiError::bad_request("Missing Fields")
        })?;

    if let Err(e) = state.auth.send_password_reset_code(&email).await {
        error!(error = %e, "error sending reset email");
        return Err(ApiError::internal());
    }

    Ok(RESET_ACK)
}

/// PUT /reset-password
#[instrument(skip(state, payload))]
pub async fn set_password(
    State(state): State<AppState>,
    payload: Result<Json<ResetPassword>, JsonRejection>,
) -> ApiResult<StatusCode> {
    let Json(payload) = payload.map_err(|e| {
        warn!(error = %e, "reset confirmation body rejected");
        ApiError::bad_request(e.body_text())
    })?;
    let payload = payload.validate().map_err(ApiError::bad_request)?;

    let user = match state.users.get_by_email(&payload.email).await {
        Ok(u) => u,
        Err(DirectoryError::NotFound) => {
            warn!(email = %payload.email, "reset confirmation for unknown email");
            return Err(ApiError::bad_request(RESET_FAILED));
        }
        Err(e) => {
            error!(error = %e, "reset confirmation user lookup failed");
            return Err(ApiError::bad_request(RESET_FAILED));
        }
    };

    if !state
        .auth
        .verify_password_reset_code(user.id, &payload.reset_code)
        .await
    {
        warn!(user_id = user.id, "invalid reset code");
        return Err(ApiError::login_redirect("Error resetting password."));
    }

    if let Err(e) = state
        .users
        .update_password(user.id, &payload.password)
        .await
    {
        error!(error = %e, user_id = user.id, "password update failed");
        return Err(ApiError::bad_request(RESET_FAILED));
    }

    info!(user_id = user.id, "password reset");
    Ok(StatusCode::OK)
}
