//! Registration and the current user.

use api_types::user::{Register, Registered, UserView};
use axum::{Extension, Json, extract::State, http::StatusCode};
use engine::{MIN_PASSWORD_LENGTH, User, UserRole};

use crate::{ServerError, server::ServerState, views::user_view};

fn required(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Create a standard user. Administrators are created from the admin CLI.
pub async fn register(
    State(state): State<ServerState>,
    Json(payload): Json<Register>,
) -> Result<(StatusCode, Json<Registered>), ServerError> {
    let (Some(email), Some(password), Some(name)) = (
        required(payload.email),
        required(payload.password),
        required(payload.name),
    ) else {
        return Err(ServerError::Generic("Missing required fields".to_string()));
    };
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ServerError::Generic(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters long"
        )));
    }

    let user = state
        .engine
        .register_user(&email, &name, &password, UserRole::Standard)
        .await?;
    tracing::info!(user_id = %user.id, "user registered");

    Ok((
        StatusCode::CREATED,
        Json(Registered {
            user: user_view(user),
            message: "User registered successfully".to_string(),
        }),
    ))
}

pub async fn me(Extension(user): Extension<User>) -> Json<UserView> {
    Json(user_view(user))
}
