//! # Billing Provider Trait
//!
//! The narrow contract this system holds with the external payment provider.
//! The provider is the source of truth for customer identity and intent
//! lifecycle; nothing is persisted locally.
//!
//! Implementations: Stripe (billing-stripe), test mocks.

use crate::customer::{Customer, NewCustomer};
use crate::error::BillingResult;
use crate::intent::{IntentRequest, PaymentIntent};
use async_trait::async_trait;
use std::sync::Arc;

/// Core trait for billing provider implementations.
///
/// Each operation maps to one provider API call; no call is retried here.
#[async_trait]
pub trait BillingProvider: Send + Sync {
    /// List customers whose email equals `email`, capped at `limit`,
    /// in provider-defined order.
    async fn list_customers_by_email(
        &self,
        email: &str,
        limit: u32,
    ) -> BillingResult<Vec<Customer>>;

    /// Create a durable customer record at the provider.
    async fn create_customer(&self, new: &NewCustomer) -> BillingResult<Customer>;

    /// Create a payment intent scoped to a customer.
    async fn create_payment_intent(&self, request: &IntentRequest)
        -> BillingResult<PaymentIntent>;

    /// Get the provider name (for logging and error attribution).
    fn provider_name(&self) -> &'static str;
}

/// Type alias for a shared boxed provider (dynamic dispatch)
pub type BoxedBillingProvider = Arc<dyn BillingProvider>;
