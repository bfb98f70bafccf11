mod schema;
pub mod queries;

pub use schema::init_db;

use std::sync::Arc;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;

use crate::email::Mailer;
use crate::payments::PaymentLookup;

pub type DbPool = Pool<SqliteConnectionManager>;

/// Application state holding the member directory pool, configuration, and
/// the injected provider clients. Clients live behind trait objects so
/// tests can substitute doubles for the payment and email backends.
#[derive(Clone)]
pub struct AppState {
    /// Member directory pool (members + setup tokens)
    pub db: DbPool,
    /// Public site base URL (for password-setup and login links)
    pub site_url: String,
    /// Generic-provider status/event values accepted as "approved"
    pub accepted_statuses: Arc<Vec<String>>,
    /// Payment detail lookup (Mercado Pago in production)
    pub payments: Arc<dyn PaymentLookup>,
    /// Transactional email backend (Resend in production)
    pub mailer: Arc<dyn Mailer>,
}

pub fn create_pool(database_path: &str) -> Result<DbPool, r2d2::Error> {
    let manager = SqliteConnectionManager::file(database_path);
    Pool::builder().max_size(10).build(manager)
}
