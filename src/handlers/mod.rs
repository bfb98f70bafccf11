pub mod account;
pub mod webhooks;
