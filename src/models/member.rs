use serde::{Deserialize, Serialize};

use crate::error::{msg, AppError, Result};

/// Basic email format validation.
///
/// Intentionally permissive to avoid rejecting valid but unusual emails;
/// not RFC 5322 compliant, just a sanity check before touching the member
/// directory.
pub fn validate_email_format(email: &str) -> Result<()> {
    let email = email.trim();

    if email.is_empty() {
        return Err(AppError::BadRequest(msg::EMAIL_EMPTY.into()));
    }

    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 {
        return Err(AppError::BadRequest(msg::INVALID_EMAIL_FORMAT.into()));
    }

    let local_part = parts[0];
    let domain_part = parts[1];

    if local_part.is_empty() || local_part.contains(' ') {
        return Err(AppError::BadRequest(msg::INVALID_EMAIL_FORMAT.into()));
    }

    if domain_part.is_empty() || !domain_part.contains('.') {
        return Err(AppError::BadRequest(msg::INVALID_EMAIL_FORMAT.into()));
    }

    if domain_part.starts_with('.') || domain_part.ends_with('.') {
        return Err(AppError::BadRequest(msg::INVALID_EMAIL_FORMAT.into()));
    }

    Ok(())
}

/// Member account - created exactly once per email by the webhook pipeline.
///
/// Email is treated as verified at creation: a completed payment is taken
/// as proof of ownership of the address the provider reported.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub id: String,
    pub email: String,
    pub display_name: String,
    pub email_verified: bool,
    pub disabled: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateMember {
    pub email: String,
    pub display_name: String,
}

impl CreateMember {
    pub fn validate(&self) -> Result<()> {
        validate_email_format(&self.email)?;
        if self.display_name.trim().is_empty() {
            return Err(AppError::BadRequest(msg::NAME_EMPTY.into()));
        }
        Ok(())
    }
}

/// Outcome of a member creation attempt. The directory's unique email
/// constraint is the serialization point for racing webhook deliveries, so
/// "already exists" surfaces here as a normal outcome rather than an error.
#[derive(Debug)]
pub enum MemberCreated {
    Created(Member),
    AlreadyExists,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_emails() {
        for email in ["a@b.com", "maria.silva@example.com.br", "x+tag@y.co"] {
            assert!(validate_email_format(email).is_ok(), "{email} should be valid");
        }
    }

    #[test]
    fn test_invalid_emails() {
        for email in ["", "no-at-sign", "a@@b.com", "@b.com", "a@", "a@b", "a b@c.com", "a@.com"] {
            assert!(validate_email_format(email).is_err(), "{email} should be invalid");
        }
    }

    #[test]
    fn test_create_member_requires_name() {
        let input = CreateMember {
            email: "a@b.com".to_string(),
            display_name: "   ".to_string(),
        };
        assert!(input.validate().is_err());
    }
}
