//! Payload normalization for heterogeneous payment-provider notifications.
//!
//! Providers report the paying customer in different shapes: a nested
//! `customer` object, a Mercado-Pago-style `payer` object, or loose flat
//! keys. Extraction is a priority-ordered probe, first match per field wins,
//! email and name resolved independently. Absence is never an error: a
//! missing email comes back as `None` and a missing name as the placeholder.

use serde_json::Value;

/// Placeholder display name when no source yields one.
pub const DEFAULT_MEMBER_NAME: &str = "Novo Membro";

/// Flat keys probed for an email, in priority order. Adding a provider
/// format is a list edit, not new branching logic.
const FLAT_EMAIL_KEYS: &[&str] = &["email", "customer_email", "payer_email", "buyer_email"];

/// Flat keys probed for a name, in priority order.
const FLAT_NAME_KEYS: &[&str] = &["customer_name", "name", "buyer_name"];

/// Provider-agnostic customer identity derived from a notification payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedCustomer {
    pub email: Option<String>,
    pub name: String,
}

/// Extract the customer email and display name from an arbitrary payload.
pub fn normalize(body: &Value) -> NormalizedCustomer {
    let mut email: Option<String> = None;
    let mut name: Option<String> = None;

    if let Some(customer) = body.get("customer").filter(|c| c.is_object()) {
        email = string_field(customer, "email");
        name = trimmed_field(customer, "name");
    }

    if let Some(payer) = body.get("payer").filter(|p| p.is_object()) {
        if email.is_none() {
            email = string_field(payer, "email");
        }
        if name.is_none() {
            name = join_name_parts(
                string_field(payer, "first_name").as_deref(),
                string_field(payer, "last_name").as_deref(),
            );
        }
    }

    if email.is_none() {
        email = FLAT_EMAIL_KEYS
            .iter()
            .find_map(|key| string_field(body, key));
    }

    if name.is_none() {
        name = FLAT_NAME_KEYS
            .iter()
            .find_map(|key| trimmed_field(body, key));
    }

    NormalizedCustomer {
        email,
        name: name.unwrap_or_else(|| DEFAULT_MEMBER_NAME.to_string()),
    }
}

/// Join first/last name parts, trimming each; `None` when both are blank.
pub fn join_name_parts(first: Option<&str>, last: Option<&str>) -> Option<String> {
    let joined = format!(
        "{} {}",
        first.unwrap_or_default().trim(),
        last.unwrap_or_default().trim()
    );
    let joined = joined.trim();
    if joined.is_empty() {
        None
    } else {
        Some(joined.to_string())
    }
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(|s| s.to_string())
}

fn trimmed_field(value: &Value, key: &str) -> Option<String> {
    string_field(value, key)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
