//! # billing-core
//!
//! Core types and traits for the subscribe-rs checkout engine.
//!
//! This crate provides:
//! - `BillingProvider` trait for implementing billing providers
//! - `CustomerResolver` for email-keyed lookup-or-create of customers
//! - `IntentInitiator` and `CheckoutOrchestrator` for the checkout flow
//! - `AuthStateChannel` / `AuthStateGate` for waiting on auth resolution
//! - `BillingError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use billing_core::{CheckoutOrchestrator, CheckoutPolicy, CheckoutRequest};
//!
//! let orchestrator = CheckoutOrchestrator::new(provider, CheckoutPolicy::default());
//!
//! let request = CheckoutRequest::new("new@example.com")
//!     .with_amount(1000)
//!     .with_currency("gbp");
//!
//! let outcome = orchestrator.initiate(&request).await?;
//! // hand outcome.client_secret to the client to complete payment
//! ```

pub mod auth;
pub mod checkout;
pub mod customer;
pub mod error;
pub mod intent;
pub mod money;
pub mod provider;
pub mod resolver;

#[cfg(test)]
pub(crate) mod test_support;

// Re-exports for convenience
pub use auth::{AuthGateError, AuthState, AuthStateChannel, AuthStateGate};
pub use checkout::{
    CheckoutOrchestrator, CheckoutOutcome, CheckoutPolicy, CheckoutRequest, IntentInitiator,
};
pub use customer::{Customer, NewCustomer};
pub use error::{BillingError, BillingResult};
pub use intent::{IntentRequest, PaymentIntent, PaymentIntentStatus};
pub use money::Currency;
pub use provider::{BillingProvider, BoxedBillingProvider};
pub use resolver::{CustomerResolver, CUSTOMER_LOOKUP_LIMIT};
