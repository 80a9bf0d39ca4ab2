//! # billing-stripe
//!
//! Stripe billing provider for subscribe-rs.
//!
//! Implements `billing_core::BillingProvider` against Stripe's REST API:
//! email-scoped customer lookup, customer creation, and payment-intent
//! creation with automatic payment-method selection. Creation calls carry
//! `Idempotency-Key` headers so provider-side retries cannot duplicate
//! records.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use billing_stripe::StripeBillingProvider;
//! use billing_core::{CheckoutOrchestrator, CheckoutPolicy};
//! use std::sync::Arc;
//!
//! // Create provider from environment (STRIPE_SECRET_KEY)
//! let provider = Arc::new(StripeBillingProvider::from_env()?);
//!
//! let orchestrator = CheckoutOrchestrator::new(provider, CheckoutPolicy::default());
//! let outcome = orchestrator.initiate(&request).await?;
//! ```

pub mod config;
pub mod provider;

// Re-exports
pub use config::StripeConfig;
pub use provider::StripeBillingProvider;
