//! # Customer Types
//!
//! Provider-side customer records and the fields we send to create one.
//! The provider assigns ids; this system never mutates an existing customer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A billing-provider customer record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    /// Provider-assigned identifier (e.g. cus_...)
    pub id: String,

    /// Email the customer is keyed by
    pub email: String,

    /// Display name, if the provider has one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// When the provider created the record
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
}

impl Customer {
    pub fn new(id: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            name: None,
            created: None,
        }
    }

    /// A customer without an id must never reach intent creation
    pub fn has_id(&self) -> bool {
        !self.id.is_empty()
    }
}

/// Fields for creating a new customer at the provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCustomer {
    /// Email (required)
    pub email: String,

    /// Optional display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Optional description shown in the provider dashboard
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Idempotency key (lets the provider dedupe retried creates)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub idempotency_key: Option<String>,
}

impl NewCustomer {
    /// Create with a generated idempotency key
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: None,
            description: None,
            idempotency_key: Some(Uuid::new_v4().to_string()),
        }
    }

    /// Builder: set display name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Builder: set description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Builder: set idempotency key
    pub fn with_idempotency_key(mut self, key: impl Into<String>) -> Self {
        self.idempotency_key = Some(key.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_customer_has_id() {
        let customer = Customer::new("cus_123", "a@example.com");
        assert!(customer.has_id());

        let blank = Customer::new("", "a@example.com");
        assert!(!blank.has_id());
    }

    #[test]
    fn test_new_customer_gets_idempotency_key() {
        let new = NewCustomer::new("a@example.com");
        assert_eq!(new.email, "a@example.com");
        assert!(new.idempotency_key.is_some());
    }

    #[test]
    fn test_new_customer_builders() {
        let new = NewCustomer::new("a@example.com")
            .with_name("Alice")
            .with_idempotency_key("key-1");
        assert_eq!(new.name.as_deref(), Some("Alice"));
        assert_eq!(new.idempotency_key.as_deref(), Some("key-1"));
    }
}
