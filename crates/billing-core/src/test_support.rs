//! In-memory `BillingProvider` mock shared by the crate's tests.

use crate::customer::{Customer, NewCustomer};
use crate::error::{BillingError, BillingResult};
use crate::intent::{IntentRequest, PaymentIntent, PaymentIntentStatus};
use crate::provider::BillingProvider;
use async_trait::async_trait;
use chrono::Utc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Mutex;
use tokio::time::Duration;

/// Call-counting mock provider backed by an in-memory customer list.
#[derive(Default)]
pub(crate) struct MockProvider {
    pub customers: Mutex<Vec<Customer>>,
    pub intent_requests: Mutex<Vec<IntentRequest>>,
    pub list_calls: AtomicUsize,
    pub create_calls: AtomicUsize,
    pub intent_calls: AtomicUsize,
    list_delay: Option<Duration>,
    fail_list: Option<String>,
    fail_create: Option<String>,
    fail_intent: Option<String>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay lookups, widening the read-then-create race window
    pub fn with_list_delay(mut self, delay: Duration) -> Self {
        self.list_delay = Some(delay);
        self
    }

    pub fn failing_list(mut self, message: &str) -> Self {
        self.fail_list = Some(message.to_string());
        self
    }

    pub fn failing_create(mut self, message: &str) -> Self {
        self.fail_create = Some(message.to_string());
        self
    }

    pub fn failing_intent(mut self, message: &str) -> Self {
        self.fail_intent = Some(message.to_string());
        self
    }

    pub async fn seed_customer(&self, id: &str, email: &str) {
        self.customers.lock().await.push(Customer::new(id, email));
    }

    fn provider_error(message: &str) -> BillingError {
        BillingError::Provider {
            provider: "mock".to_string(),
            message: message.to_string(),
        }
    }
}

#[async_trait]
impl BillingProvider for MockProvider {
    async fn list_customers_by_email(
        &self,
        email: &str,
        limit: u32,
    ) -> BillingResult<Vec<Customer>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.list_delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(message) = &self.fail_list {
            return Err(Self::provider_error(message));
        }
        let customers = self.customers.lock().await;
        Ok(customers
            .iter()
            .filter(|c| c.email == email)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn create_customer(&self, new: &NewCustomer) -> BillingResult<Customer> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = &self.fail_create {
            return Err(Self::provider_error(message));
        }
        let mut customers = self.customers.lock().await;
        let customer = Customer::new(format!("cus_mock_{}", customers.len() + 1), &new.email);
        customers.push(customer.clone());
        Ok(customer)
    }

    async fn create_payment_intent(
        &self,
        request: &IntentRequest,
    ) -> BillingResult<PaymentIntent> {
        let n = self.intent_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(message) = &self.fail_intent {
            return Err(Self::provider_error(message));
        }
        self.intent_requests.lock().await.push(request.clone());
        Ok(PaymentIntent {
            id: format!("pi_mock_{n}"),
            client_secret: format!("pi_mock_{n}_secret_test"),
            amount: request.amount,
            currency: request.currency,
            customer_id: request.customer_id.clone(),
            status: PaymentIntentStatus::RequiresPaymentMethod,
            created: Utc::now(),
        })
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}
