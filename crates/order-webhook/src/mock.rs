//! In-memory host collaborators and a recording webhook provider.
//!
//! # Feature Flag
//!
//! This module is only available when the `mock` feature is enabled:
//!
//! ```toml
//! [dev-dependencies]
//! order-webhook = { version = "...", features = ["mock"] }
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use jiff::Timestamp;

use crate::host::{CustomerRepository, OrderRepository, SessionProvider};
use crate::model::{Customer, CustomerId, Order, VisitorFingerprint};
use crate::{Error, Result, WebhookProvider, WebhookRequest, WebhookResponse, WebhookService};

#[derive(Debug, Clone)]
enum Reply {
    Raw { status: u16, raw: String },
    Fail,
}

/// Webhook provider that records requests and replies with a canned response.
#[derive(Debug, Clone)]
pub struct MockWebhookProvider {
    reply: Reply,
    requests: Arc<Mutex<Vec<WebhookRequest>>>,
}

impl MockWebhookProvider {
    /// Replies `200 OK` with the given plain text body.
    pub fn ok(body: &str) -> Self {
        Self::raw(
            200,
            format!("HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\n\r\n{body}"),
        )
    }

    /// Replies with the given status and raw response text.
    pub fn raw(status: u16, raw: impl Into<String>) -> Self {
        Self {
            reply: Reply::Raw {
                status,
                raw: raw.into(),
            },
            requests: Arc::default(),
        }
    }

    /// Fails every delivery with a network error.
    pub fn failing() -> Self {
        Self {
            reply: Reply::Fail,
            requests: Arc::default(),
        }
    }

    /// Returns the requests received so far.
    pub fn requests(&self) -> Vec<WebhookRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Converts this provider into a [`WebhookService`].
    pub fn into_service(self) -> WebhookService {
        WebhookService::new(self)
    }
}

#[async_trait::async_trait]
impl WebhookProvider for MockWebhookProvider {
    async fn deliver(&self, request: &WebhookRequest) -> Result<WebhookResponse> {
        let started_at = Timestamp::now();
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());

        match &self.reply {
            Reply::Raw { status, raw } => Ok(WebhookResponse::new(
                request.request_id,
                *status,
                raw.clone(),
                started_at,
            )),
            Reply::Fail => Err(Error::network_error().with_message("Connection failed")),
        }
    }
}

/// Session provider returning a fixed fingerprint.
#[derive(Debug, Clone, Default)]
pub struct StaticSession {
    visitor: VisitorFingerprint,
}

impl StaticSession {
    /// Creates a session with the given fingerprint.
    pub fn new(visitor: VisitorFingerprint) -> Self {
        Self { visitor }
    }
}

impl SessionProvider for StaticSession {
    fn visitor_fingerprint(&self) -> VisitorFingerprint {
        self.visitor.clone()
    }
}

/// Customer repository backed by a map.
#[derive(Debug, Clone, Default)]
pub struct MemoryCustomerRepository {
    customers: HashMap<CustomerId, Customer>,
}

impl MemoryCustomerRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a customer.
    #[must_use]
    pub fn with_customer(mut self, customer_id: CustomerId, customer: Customer) -> Self {
        self.customers.insert(customer_id, customer);
        self
    }
}

#[async_trait::async_trait]
impl CustomerRepository for MemoryCustomerRepository {
    async fn find_customer(&self, customer_id: CustomerId) -> Result<Option<Customer>> {
        Ok(self.customers.get(&customer_id).cloned())
    }
}

/// Order repository that keeps every saved snapshot.
#[derive(Debug, Default)]
pub struct MemoryOrderRepository {
    saved: Mutex<Vec<Order>>,
    fail: bool,
}

impl MemoryOrderRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository whose saves always fail.
    pub fn failing() -> Self {
        Self {
            saved: Mutex::default(),
            fail: true,
        }
    }

    /// Returns the saved order snapshots in save order.
    pub fn saved(&self) -> Vec<Order> {
        self.saved
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait::async_trait]
impl OrderRepository for MemoryOrderRepository {
    async fn save_order(&self, order: &Order) -> Result<()> {
        if self.fail {
            return Err(Error::external_error().with_message("order save failed"));
        }

        self.saved
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(order.clone());
        Ok(())
    }
}
