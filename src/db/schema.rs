use rusqlite::Connection;

/// Initialize the member directory schema.
pub fn init_db(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        -- Members (identity - one row per paying customer email)
        -- The UNIQUE email constraint is the serialization point for
        -- duplicate webhook deliveries racing on the same address.
        CREATE TABLE IF NOT EXISTS members (
            id TEXT PRIMARY KEY,
            email TEXT NOT NULL UNIQUE,
            display_name TEXT NOT NULL,
            email_verified INTEGER NOT NULL DEFAULT 0,
            disabled INTEGER NOT NULL DEFAULT 0,
            password_hash TEXT,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_members_email ON members(email);

        -- One-time password-setup tokens emailed to new members.
        -- Only the SHA-256 hash is stored; used_at marks consumption.
        CREATE TABLE IF NOT EXISTS setup_tokens (
            id TEXT PRIMARY KEY,
            member_id TEXT NOT NULL REFERENCES members(id) ON DELETE CASCADE,
            token_hash TEXT NOT NULL UNIQUE,
            created_at INTEGER NOT NULL,
            expires_at INTEGER NOT NULL,
            used_at INTEGER
        );
        CREATE INDEX IF NOT EXISTS idx_setup_tokens_member ON setup_tokens(member_id);
        "#,
    )
}
