//! # Customer Resolution
//!
//! Email-keyed lookup-or-create against the billing provider. The
//! read-then-create window is serialized per normalized email so concurrent
//! resolutions of an unseen address converge on a single created customer.

use crate::customer::{Customer, NewCustomer};
use crate::error::{BillingError, BillingResult};
use crate::provider::BoxedBillingProvider;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

/// Page cap for the email-scoped lookup
pub const CUSTOMER_LOOKUP_LIMIT: u32 = 10;

/// Resolves an email to an existing provider customer, creating one if none
/// exists.
pub struct CustomerResolver {
    provider: BoxedBillingProvider,
    /// Per-normalized-email locks; entries are evicted once uncontended
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl CustomerResolver {
    pub fn new(provider: BoxedBillingProvider) -> Self {
        Self {
            provider,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Resolve `email` to a customer with a non-empty id.
    ///
    /// Lookup takes the first match in provider order; creation carries an
    /// idempotency key so a retried create cannot duplicate the record.
    #[instrument(skip(self, email), fields(email = %email))]
    pub async fn resolve(&self, email: &str) -> BillingResult<Customer> {
        let email = normalize_email(email);
        if email.is_empty() {
            return Err(BillingError::Validation(
                "customer email must not be empty".to_string(),
            ));
        }

        let lock = self.acquire_lock(&email).await;
        let guard = lock.lock().await;
        let result = self.lookup_or_create(&email).await;
        drop(guard);
        self.release_lock(&email, lock).await;

        result
    }

    async fn lookup_or_create(&self, email: &str) -> BillingResult<Customer> {
        let matches = self
            .provider
            .list_customers_by_email(email, CUSTOMER_LOOKUP_LIMIT)
            .await?;

        let match_count = matches.len();
        if let Some(existing) = matches.into_iter().next() {
            if match_count > 1 {
                debug!(count = match_count, "multiple customers match, taking first");
            }
            debug!(customer_id = %existing.id, "found existing customer");
            return Ok(existing);
        }

        let created = self.provider.create_customer(&NewCustomer::new(email)).await?;
        if !created.has_id() {
            return Err(BillingError::Provider {
                provider: self.provider.provider_name().to_string(),
                message: "created customer is missing an id".to_string(),
            });
        }

        info!(customer_id = %created.id, "created new customer");
        Ok(created)
    }

    async fn acquire_lock(&self, email: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        locks.entry(email.to_string()).or_default().clone()
    }

    async fn release_lock(&self, email: &str, lock: Arc<Mutex<()>>) {
        let mut locks = self.locks.lock().await;
        // the map's reference plus ours means no other resolver holds it
        let uncontended = locks
            .get(email)
            .map(|entry| Arc::ptr_eq(entry, &lock) && Arc::strong_count(entry) == 2)
            .unwrap_or(false);
        if uncontended {
            locks.remove(email);
        }
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockProvider;
    use std::sync::atomic::Ordering;
    use tokio::time::Duration;

    #[tokio::test]
    async fn test_resolve_unseen_email_creates_customer() {
        let provider = Arc::new(MockProvider::new());
        let resolver = CustomerResolver::new(provider.clone());

        let customer = resolver.resolve("new@example.com").await.unwrap();

        assert_eq!(customer.email, "new@example.com");
        assert!(customer.has_id());
        assert_eq!(provider.list_calls.load(Ordering::SeqCst), 1);
        assert_eq!(provider.create_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_resolve_existing_email_returns_first_match() {
        let provider = Arc::new(MockProvider::new());
        provider.seed_customer("cus_first", "known@example.com").await;
        provider.seed_customer("cus_second", "known@example.com").await;
        let resolver = CustomerResolver::new(provider.clone());

        let customer = resolver.resolve("known@example.com").await.unwrap();

        assert_eq!(customer.id, "cus_first");
        assert_eq!(provider.create_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_resolve_normalizes_email() {
        let provider = Arc::new(MockProvider::new());
        provider.seed_customer("cus_1", "alice@example.com").await;
        let resolver = CustomerResolver::new(provider.clone());

        let customer = resolver.resolve("  Alice@Example.COM ").await.unwrap();

        assert_eq!(customer.id, "cus_1");
        assert_eq!(provider.create_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_resolve_empty_email_no_provider_calls() {
        let provider = Arc::new(MockProvider::new());
        let resolver = CustomerResolver::new(provider.clone());

        let err = resolver.resolve("   ").await.unwrap_err();

        assert!(matches!(err, BillingError::Validation(_)));
        assert_eq!(provider.list_calls.load(Ordering::SeqCst), 0);
        assert_eq!(provider.create_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_resolve_create_failure_propagates() {
        let provider = Arc::new(MockProvider::new().failing_create("create blew up"));
        let resolver = CustomerResolver::new(provider);

        let err = resolver.resolve("a@example.com").await.unwrap_err();

        assert!(matches!(
            err,
            BillingError::Provider { message, .. } if message == "create blew up"
        ));
    }

    #[tokio::test]
    async fn test_resolve_lookup_failure_propagates() {
        let provider = Arc::new(MockProvider::new().failing_list("list blew up"));
        let resolver = CustomerResolver::new(provider);

        let err = resolver.resolve("a@example.com").await.unwrap_err();

        assert!(matches!(
            err,
            BillingError::Provider { message, .. } if message == "list blew up"
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_resolves_create_one_customer() {
        // A delay inside the lookup widens the read-then-create window; the
        // per-email lock must still collapse both calls onto one customer.
        let provider = Arc::new(
            MockProvider::new().with_list_delay(Duration::from_millis(50)),
        );
        let resolver = Arc::new(CustomerResolver::new(provider.clone()));

        let r1 = {
            let resolver = resolver.clone();
            tokio::spawn(async move { resolver.resolve("same@example.com").await })
        };
        let r2 = {
            let resolver = resolver.clone();
            tokio::spawn(async move { resolver.resolve("same@example.com").await })
        };

        let first = r1.await.unwrap().unwrap();
        let second = r2.await.unwrap().unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(provider.create_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_lock_map_entry_evicted_after_resolve() {
        let provider = Arc::new(MockProvider::new());
        let resolver = CustomerResolver::new(provider);

        resolver.resolve("gone@example.com").await.unwrap();

        assert!(resolver.locks.lock().await.is_empty());
    }
}
