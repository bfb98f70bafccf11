//! Clube de Receitas - payment webhook and member provisioning service
//!
//! Receives payment notifications (Mercado Pago and generic checkout
//! providers), provisions one member account per paying customer and sends
//! the welcome email with a one-time password setup link.

pub mod config;
pub mod db;
pub mod email;
pub mod error;
pub mod handlers;
pub mod models;
pub mod normalize;
pub mod payments;
