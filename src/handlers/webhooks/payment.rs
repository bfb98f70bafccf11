use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};

use crate::db::{AppState, queries};
use crate::email::WelcomeEmail;
use crate::error::{Result, msg};
use crate::models::{CreateMember, MemberCreated};
use crate::normalize::{self, NormalizedCustomer};

/// Detect the Mercado Pago notification shape: `type: "payment"` or an
/// `action` like `payment.created` / `payment.updated`.
fn is_mercadopago_shape(payload: &Value) -> bool {
    if payload.get("type").and_then(Value::as_str) == Some("payment") {
        return true;
    }
    payload
        .get("action")
        .and_then(Value::as_str)
        .map(|a| a == "payment" || a.starts_with("payment."))
        .unwrap_or(false)
}

/// Pull `data.id` out of a Mercado Pago notification. The ID arrives as a
/// string or a number depending on the notification channel.
fn extract_data_id(payload: &Value) -> Option<String> {
    match payload.get("data")?.get("id")? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn acknowledged(message: &str) -> Response {
    (StatusCode::OK, Json(json!({ "message": message }))).into_response()
}

/// Gate rejection: the notification parsed fine but cannot be acted on.
/// Echo the payload back so the provider's delivery log shows what we saw.
fn gate_failure(reason: &str, payload: &Value) -> Response {
    tracing::warn!(reason, "webhook rejected at approval gate");
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": reason, "receivedBody": payload })),
    )
        .into_response()
}

async fn process_notification(state: &AppState, payload: &Value) -> Result<Response> {
    let customer: NormalizedCustomer;
    let approved: bool;

    if is_mercadopago_shape(payload) {
        let Some(payment_id) = extract_data_id(payload) else {
            tracing::info!("MP notification without data.id, acknowledging without action");
            return Ok(acknowledged(msg::MP_NO_DATA_ID));
        };

        let payment = state.payments.get_payment(&payment_id).await?;
        if !payment.is_approved() {
            tracing::info!(
                payment_id = %payment_id,
                status = %payment.status,
                "payment not approved, acknowledging without action"
            );
            return Ok(acknowledged(msg::NOT_APPROVED));
        }

        tracing::info!(payment_id = %payment_id, "MP payment approved");
        customer = NormalizedCustomer {
            email: payment.payer_email(),
            name: payment.payer_name(),
        };
        approved = true;
    } else {
        customer = normalize::normalize(payload);
        let status = payload
            .get("status")
            .or_else(|| payload.get("event"))
            .and_then(Value::as_str);
        approved = status
            .map(|s| state.accepted_statuses.iter().any(|a| a == s))
            .unwrap_or(false);
        tracing::info!(
            status = ?status,
            email = ?customer.email,
            approved,
            "generic notification normalized"
        );
    }

    if !approved {
        return Ok(gate_failure(msg::GATE_NOT_APPROVED, payload));
    }
    let Some(email) = customer.email.clone() else {
        return Ok(gate_failure(msg::GATE_NO_EMAIL, payload));
    };

    Ok(provision_and_notify(state, &email, &customer.name).await)
}

/// Create the member (idempotently), mint a one-time setup token and send
/// the welcome email. Returns a terminal HTTP response in every case.
async fn provision_and_notify(state: &AppState, email: &str, name: &str) -> Response {
    let result: Result<Response> = async {
        let conn = state.db.get()?;

        let input = CreateMember {
            email: email.to_string(),
            display_name: name.to_string(),
        };
        let member = match queries::create_member(&conn, &input)? {
            MemberCreated::Created(member) => member,
            MemberCreated::AlreadyExists => {
                tracing::info!(email = %email, "member already exists, nothing to do");
                return Ok(acknowledged(msg::ALREADY_EXISTS));
            }
        };
        tracing::info!(member_id = %member.id, email = %email, "member created");

        let token = queries::create_setup_token(&conn, &member.id)?;
        drop(conn);

        let welcome = WelcomeEmail {
            to_email: email,
            name,
            setup_link: &format!("{}/criar-senha?token={}", state.site_url, token),
            login_url: &format!("{}/entrar", state.site_url),
        };
        state.mailer.send_welcome(&welcome).await?;

        tracing::info!(member_id = %member.id, "welcome email sent");
        Ok(acknowledged(msg::PROCESSED))
    }
    .await;

    match result {
        Ok(response) => response,
        Err(e) => {
            tracing::error!(error = %e, email = %email, "provisioning failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": msg::PROVISION_FAILED, "details": e.to_string() })),
            )
                .into_response()
        }
    }
}

/// Axum handler for payment provider notifications.
pub async fn handle_payment_webhook(State(state): State<AppState>, body: Bytes) -> Response {
    if body.is_empty() {
        tracing::warn!("webhook received with empty body");
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": msg::EMPTY_BODY })),
        )
            .into_response();
    }

    let payload: Value = match serde_json::from_slice(&body) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(error = %e, "webhook body is not valid JSON");
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": msg::INVALID_JSON })),
            )
                .into_response();
        }
    };

    match process_notification(&state, &payload).await {
        Ok(response) => response,
        Err(e) => {
            tracing::error!(error = %e, "critical failure while processing notification");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": msg::CRITICAL_FAILURE, "details": e.to_string() })),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_mercadopago_shape_detection() {
        assert!(is_mercadopago_shape(&json!({"type": "payment", "data": {"id": "1"}})));
        assert!(is_mercadopago_shape(&json!({"action": "payment.updated"})));
        assert!(is_mercadopago_shape(&json!({"action": "payment"})));
        assert!(!is_mercadopago_shape(&json!({"type": "subscription"})));
        assert!(!is_mercadopago_shape(&json!({"action": "refund.created"})));
        assert!(!is_mercadopago_shape(&json!({"status": "paid", "email": "a@b.com"})));
    }

    #[test]
    fn test_extract_data_id_string_and_number() {
        assert_eq!(
            extract_data_id(&json!({"data": {"id": "12345"}})),
            Some("12345".to_string())
        );
        assert_eq!(
            extract_data_id(&json!({"data": {"id": 12345}})),
            Some("12345".to_string())
        );
        assert_eq!(extract_data_id(&json!({"data": {"id": ""}})), None);
        assert_eq!(extract_data_id(&json!({"data": {}})), None);
        assert_eq!(extract_data_id(&json!({"type": "payment"})), None);
    }
}
