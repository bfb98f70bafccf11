mod mercadopago;

pub use mercadopago::*;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::PaymentRecord;

/// Authoritative payment-detail lookup at the provider.
///
/// Used for the provider whose webhook carries a bare transaction reference
/// instead of payer data. A trait so the webhook pipeline can be tested
/// against a double.
#[async_trait]
pub trait PaymentLookup: Send + Sync {
    async fn get_payment(&self, payment_id: &str) -> Result<PaymentRecord>;
}
