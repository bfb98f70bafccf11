use serde::Deserialize;

use crate::normalize::{join_name_parts, DEFAULT_MEMBER_NAME};

/// Payment status value that authorizes provisioning. Every other value the
/// provider can report (pending, rejected, in_process, ...) is treated as
/// not approved, including values added by the provider in the future.
pub const APPROVED_STATUS: &str = "approved";

/// Payment record fetched from the Mercado Pago payments API.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentRecord {
    pub id: serde_json::Value,
    pub status: String,
    #[serde(default)]
    pub payer: Option<PaymentPayer>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentPayer {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

impl PaymentRecord {
    pub fn is_approved(&self) -> bool {
        self.status == APPROVED_STATUS
    }

    pub fn payer_email(&self) -> Option<String> {
        self.payer.as_ref().and_then(|p| p.email.clone())
    }

    /// Payer display name from first/last name, falling back to the
    /// placeholder when both are missing or blank.
    pub fn payer_name(&self) -> String {
        self.payer
            .as_ref()
            .and_then(|p| join_name_parts(p.first_name.as_deref(), p.last_name.as_deref()))
            .unwrap_or_else(|| DEFAULT_MEMBER_NAME.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(status: &str, payer: Option<PaymentPayer>) -> PaymentRecord {
        PaymentRecord {
            id: serde_json::json!(123),
            status: status.to_string(),
            payer,
        }
    }

    #[test]
    fn test_only_approved_status_is_approved() {
        assert!(record("approved", None).is_approved());
        for status in ["pending", "rejected", "in_process", "refunded", "charged_back", ""] {
            assert!(!record(status, None).is_approved(), "{status} must not approve");
        }
    }

    #[test]
    fn test_payer_name_joins_and_trims() {
        let payer = PaymentPayer {
            email: Some("a@b.com".to_string()),
            first_name: Some(" Ana ".to_string()),
            last_name: Some("Souza".to_string()),
        };
        assert_eq!(record("approved", Some(payer)).payer_name(), "Ana Souza");
    }

    #[test]
    fn test_payer_name_defaults_when_blank() {
        let payer = PaymentPayer {
            email: Some("a@b.com".to_string()),
            first_name: Some("  ".to_string()),
            last_name: None,
        };
        assert_eq!(record("approved", Some(payer)).payer_name(), DEFAULT_MEMBER_NAME);
        assert_eq!(record("approved", None).payer_name(), DEFAULT_MEMBER_NAME);
    }

    #[test]
    fn test_deserializes_numeric_and_string_ids() {
        let rec: PaymentRecord =
            serde_json::from_value(serde_json::json!({"id": 42, "status": "approved"})).unwrap();
        assert!(rec.is_approved());
        let rec: PaymentRecord =
            serde_json::from_value(serde_json::json!({"id": "42", "status": "pending"})).unwrap();
        assert!(!rec.is_approved());
    }
}
