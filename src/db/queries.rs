use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{CreateMember, Member, MemberCreated};

/// Password-setup tokens expire after 48 hours.
const SETUP_TOKEN_TTL_SECS: i64 = 48 * 3600;

fn now() -> i64 {
    Utc::now().timestamp()
}

fn gen_id() -> String {
    Uuid::new_v4().to_string()
}

/// Generate a fresh password-setup token in its user-facing form.
pub fn generate_setup_token() -> String {
    format!("st_{}", Uuid::new_v4().simple())
}

/// Domain-prefixed SHA-256 of a secret; only hashes are stored.
pub fn hash_secret(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(b"clube-receitas-v1:");
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

const MEMBER_COLS: &str =
    "id, email, display_name, email_verified, disabled, created_at, updated_at";

fn member_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Member> {
    Ok(Member {
        id: row.get(0)?,
        email: row.get(1)?,
        display_name: row.get(2)?,
        email_verified: row.get::<_, i64>(3)? != 0,
        disabled: row.get::<_, i64>(4)? != 0,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

/// Look up a member by email. Not-found is a normal outcome, not an error.
pub fn find_member_by_email(conn: &Connection, email: &str) -> Result<Option<Member>> {
    let member = conn
        .query_row(
            &format!("SELECT {} FROM members WHERE email = ?", MEMBER_COLS),
            params![email],
            member_from_row,
        )
        .optional()?;
    Ok(member)
}

/// Create a member. Email is marked verified at creation - a completed
/// payment is the proof of ownership. A UNIQUE violation from a racing
/// delivery maps to `MemberCreated::AlreadyExists`, never an error.
pub fn create_member(conn: &Connection, input: &CreateMember) -> Result<MemberCreated> {
    input.validate()?;

    let id = gen_id();
    let ts = now();
    let email = input.email.trim();
    let display_name = input.display_name.trim();

    let inserted = conn.execute(
        "INSERT INTO members (id, email, display_name, email_verified, disabled, created_at, updated_at)
         VALUES (?, ?, ?, 1, 0, ?, ?)",
        params![id, email, display_name, ts, ts],
    );

    match inserted {
        Ok(_) => Ok(MemberCreated::Created(Member {
            id,
            email: email.to_string(),
            display_name: display_name.to_string(),
            email_verified: true,
            disabled: false,
            created_at: ts,
            updated_at: ts,
        })),
        Err(rusqlite::Error::SqliteFailure(e, _))
            if e.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            Ok(MemberCreated::AlreadyExists)
        }
        Err(e) => Err(e.into()),
    }
}

/// Create a one-time password-setup token for a member and return its
/// user-facing form. Only the hash lands in the database.
pub fn create_setup_token(conn: &Connection, member_id: &str) -> Result<String> {
    let token = generate_setup_token();
    let ts = now();

    conn.execute(
        "INSERT INTO setup_tokens (id, member_id, token_hash, created_at, expires_at)
         VALUES (?, ?, ?, ?, ?)",
        params![gen_id(), member_id, hash_secret(&token), ts, ts + SETUP_TOKEN_TTL_SECS],
    )?;

    Ok(token)
}

/// Outcome of a setup-token redemption attempt.
#[derive(Debug, PartialEq, Eq)]
pub enum RedeemOutcome {
    /// Password set; carries the redeeming member's id.
    Redeemed(String),
    /// Unknown token, expired token, or token already consumed.
    Invalid,
}

/// Consume a setup token and store the member's password hash.
///
/// The UPDATE claims the token atomically (used_at must still be NULL and
/// the expiry in the future), so two concurrent redemptions cannot both
/// succeed.
pub fn redeem_setup_token(
    conn: &Connection,
    token: &str,
    password_hash: &str,
) -> Result<RedeemOutcome> {
    let ts = now();
    let token_hash = hash_secret(token);

    let member_id: Option<String> = conn
        .query_row(
            "UPDATE setup_tokens SET used_at = ?
             WHERE token_hash = ? AND used_at IS NULL AND expires_at > ?
             RETURNING member_id",
            params![ts, token_hash, ts],
            |row| row.get(0),
        )
        .optional()?;

    let Some(member_id) = member_id else {
        return Ok(RedeemOutcome::Invalid);
    };

    let updated = conn.execute(
        "UPDATE members SET password_hash = ?, updated_at = ? WHERE id = ?",
        params![password_hash, ts, member_id],
    )?;
    if updated == 0 {
        return Err(AppError::Internal(format!(
            "setup token references missing member {}",
            member_id
        )));
    }

    Ok(RedeemOutcome::Redeemed(member_id))
}

/// Force-expire a member's setup tokens. Test/dev helper.
#[doc(hidden)]
pub fn expire_setup_tokens(conn: &Connection, member_id: &str) -> Result<()> {
    conn.execute(
        "UPDATE setup_tokens SET expires_at = 0 WHERE member_id = ?",
        params![member_id],
    )?;
    Ok(())
}

pub fn count_members(conn: &Connection) -> Result<i64> {
    let count = conn.query_row("SELECT COUNT(*) FROM members", [], |row| row.get(0))?;
    Ok(count)
}
