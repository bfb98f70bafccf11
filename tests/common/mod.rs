//! Test utilities and fixtures for integration tests

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use axum::routing::post;
use http_body_util::BodyExt;
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;

use async_trait::async_trait;

pub use clube_receitas::db::{AppState, init_db, queries};
pub use clube_receitas::email::{Mailer, WelcomeEmail};
pub use clube_receitas::error::{AppError, Result as AppResult, msg};
pub use clube_receitas::models::*;
pub use clube_receitas::payments::PaymentLookup;

/// A welcome email captured by [`MockMailer`].
#[derive(Debug, Clone)]
pub struct SentEmail {
    pub to_email: String,
    pub name: String,
    pub setup_link: String,
}

/// Mailer double that records every send and can be toggled to fail.
#[derive(Default)]
pub struct MockMailer {
    pub sent: Mutex<Vec<SentEmail>>,
    fail: AtomicBool,
}

impl MockMailer {
    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl Mailer for MockMailer {
    async fn send_welcome(&self, email: &WelcomeEmail<'_>) -> AppResult<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(AppError::Email("simulated send failure".to_string()));
        }
        self.sent.lock().unwrap().push(SentEmail {
            to_email: email.to_email.to_string(),
            name: email.name.to_string(),
            setup_link: email.setup_link.to_string(),
        });
        Ok(())
    }
}

/// Payment lookup double with canned payment records keyed by ID.
#[derive(Default)]
pub struct MockPaymentLookup {
    payments: Mutex<HashMap<String, PaymentRecord>>,
}

impl MockPaymentLookup {
    pub fn insert(&self, id: &str, record: PaymentRecord) {
        self.payments.lock().unwrap().insert(id.to_string(), record);
    }
}

#[async_trait]
impl PaymentLookup for MockPaymentLookup {
    async fn get_payment(&self, payment_id: &str) -> AppResult<PaymentRecord> {
        self.payments
            .lock()
            .unwrap()
            .get(payment_id)
            .cloned()
            .ok_or_else(|| {
                AppError::PaymentApi(format!("payment {} not found (status 404)", payment_id))
            })
    }
}

/// Build a payment record fixture.
pub fn payment_record(status: &str, email: Option<&str>, first_name: Option<&str>) -> PaymentRecord {
    PaymentRecord {
        id: serde_json::json!(123456789),
        status: status.to_string(),
        payer: Some(PaymentPayer {
            email: email.map(|s| s.to_string()),
            first_name: first_name.map(|s| s.to_string()),
            last_name: None,
        }),
    }
}

/// Create an in-memory test database with schema initialized
pub fn setup_test_db() -> Connection {
    let conn = Connection::open_in_memory().expect("Failed to create in-memory database");
    init_db(&conn).expect("Failed to initialize schema");
    conn
}

/// Create an AppState backed by an in-memory database plus handles to the
/// mailer and payment lookup doubles.
pub fn create_test_app_state() -> (AppState, Arc<MockMailer>, Arc<MockPaymentLookup>) {
    // A single pooled connection: in-memory SQLite databases are private to
    // their connection, so every request must share this one.
    let manager = SqliteConnectionManager::memory();
    let pool = Pool::builder().max_size(1).build(manager).unwrap();
    {
        let conn = pool.get().unwrap();
        init_db(&conn).unwrap();
    }

    let mailer = Arc::new(MockMailer::default());
    let payments = Arc::new(MockPaymentLookup::default());

    let state = AppState {
        db: pool,
        site_url: "http://localhost:3000".to_string(),
        accepted_statuses: Arc::new(clube_receitas::config::default_accepted_statuses()),
        payments: payments.clone(),
        mailer: mailer.clone(),
    };

    (state, mailer, payments)
}

/// Create a Router with the webhook and account endpoints
pub fn test_app(state: AppState) -> Router {
    Router::new()
        .route(
            "/webhook",
            post(clube_receitas::handlers::webhooks::handle_payment_webhook),
        )
        .route(
            "/criar-senha",
            post(clube_receitas::handlers::account::create_password),
        )
        .with_state(state)
}

/// POST a JSON value to the given path
pub fn json_request(path: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(path)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// POST a raw body (for empty/malformed payload tests)
pub fn raw_request(path: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(path)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Read a response body as JSON
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to read response body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("Response body is not valid JSON")
}
