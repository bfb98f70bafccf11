use axum::{Json, Router, extract::State, response::IntoResponse, routing::post};
use serde::Deserialize;
use serde_json::json;

use crate::db::{AppState, queries};
use crate::error::{AppError, Result};

const MIN_PASSWORD_CHARS: usize = 8;

#[derive(Debug, Deserialize)]
pub struct CreatePasswordRequest {
    pub token: String,
    pub password: String,
}

/// Redeem a one-time setup token and store the member's password.
pub async fn create_password(
    State(state): State<AppState>,
    Json(req): Json<CreatePasswordRequest>,
) -> Result<impl IntoResponse> {
    if req.token.trim().is_empty() {
        return Err(AppError::BadRequest("Link inválido ou expirado.".to_string()));
    }
    if req.password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(AppError::BadRequest(
            "A senha deve ter pelo menos 8 caracteres.".to_string(),
        ));
    }

    let password_hash = hash_password(&req.password)?;

    let conn = state.db.get()?;
    match queries::redeem_setup_token(&conn, req.token.trim(), &password_hash)? {
        queries::RedeemOutcome::Redeemed(member_id) => {
            tracing::info!(member_id = %member_id, "member password created");
            Ok(Json(json!({ "message": "Senha criada com sucesso." })))
        }
        queries::RedeemOutcome::Invalid => {
            tracing::warn!("setup token rejected (unknown, used or expired)");
            Err(AppError::BadRequest("Link inválido ou expirado.".to_string()))
        }
    }
}

fn hash_password(password: &str) -> Result<String> {
    use argon2::password_hash::{SaltString, rand_core::OsRng};
    use argon2::{Argon2, PasswordHasher};

    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/criar-senha", post(create_password))
}
