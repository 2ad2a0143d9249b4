//! Order webhook dispatcher.
//!
//! The dispatcher reacts to an order event by posting the order as JSON to the
//! store's configured webhook URL and recording the outcome on the order.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use strum::{AsRefStr, Display};
use url::Url;

use crate::host::{ConfigProvider, CustomerRepository, OrderRepository, SessionProvider};
use crate::model::{Order, OrderEvent};
use crate::payload::{ExportPolicy, OrderPayload};
use crate::{DeliveryResult, Result, WebhookRequest, WebhookService};

/// Tracing target for dispatcher operations.
pub const TRACING_TARGET: &str = "order_webhook::dispatcher";

/// Why an event was not dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, Display)]
#[strum(serialize_all = "snake_case")]
pub enum SkipReason {
    /// The order has no status yet.
    MissingStatus,
    /// No webhook URL is configured for the order's store.
    MissingUrl,
}

/// Result of handling one order event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// This dispatcher already sent once; nothing was done.
    AlreadySent,
    /// Nothing was sent and the order was left untouched.
    Skipped(SkipReason),
    /// The payload was posted and the result recorded on the order.
    Delivered(DeliveryResult),
}

impl DispatchOutcome {
    /// Returns whether a request was sent while handling the event.
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered(_))
    }
}

/// Posts placed orders to a per-store webhook endpoint.
///
/// Each instance sends at most once. The host fires its order save-commit
/// event twice within a single request, and the second notification must not
/// produce a second delivery or comment. The latch is deliberately scoped to
/// the instance and is not a cross-process deduplication mechanism.
///
/// Events skipped for a missing status or URL leave the latch unset, so a
/// later notification on the same instance may still send.
pub struct OrderDispatcher {
    webhook: WebhookService,
    config: Arc<dyn ConfigProvider>,
    session: Arc<dyn SessionProvider>,
    customers: Arc<dyn CustomerRepository>,
    orders: Arc<dyn OrderRepository>,
    export: ExportPolicy,
    sent: AtomicBool,
}

impl std::fmt::Debug for OrderDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderDispatcher")
            .field("sent", &self.is_sent())
            .finish_non_exhaustive()
    }
}

impl OrderDispatcher {
    /// Creates a dispatcher from the host's capabilities.
    pub fn new(
        webhook: WebhookService,
        config: Arc<dyn ConfigProvider>,
        session: Arc<dyn SessionProvider>,
        customers: Arc<dyn CustomerRepository>,
        orders: Arc<dyn OrderRepository>,
    ) -> Self {
        Self {
            webhook,
            config,
            session,
            customers,
            orders,
            export: ExportPolicy::default(),
            sent: AtomicBool::new(false),
        }
    }

    /// Sets which free-form attributes are exported next to the typed fields.
    pub fn with_export_policy(mut self, export: ExportPolicy) -> Self {
        self.export = export;
        self
    }

    /// Returns whether this dispatcher has already sent.
    pub fn is_sent(&self) -> bool {
        self.sent.load(Ordering::Acquire)
    }

    /// Handles an order event.
    ///
    /// # Errors
    ///
    /// Returns an error when the customer lookup or the order save fails.
    /// Delivery failures are never errors; they are recorded on the order.
    pub async fn handle(&self, event: &mut OrderEvent) -> Result<DispatchOutcome> {
        let order = &mut event.order;

        if self.is_sent() {
            tracing::debug!(
                target: TRACING_TARGET,
                order_id = order.entity_id,
                "Order webhook already sent by this dispatcher"
            );
            return Ok(DispatchOutcome::AlreadySent);
        }

        if order.status().is_none() {
            return Ok(self.skip(order, SkipReason::MissingStatus));
        }

        let Some(url) = self.config.order_webhook_url(order.store_id) else {
            return Ok(self.skip(order, SkipReason::MissingUrl));
        };

        let payload = self.transform(order).await?;

        if self
            .sent
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Ok(DispatchOutcome::AlreadySent);
        }

        let result = self.send(&payload, &url).await;
        Self::record_result(order, &result);
        self.orders.save_order(order).await?;

        tracing::info!(
            target: TRACING_TARGET,
            order_id = order.entity_id,
            store_id = order.store_id,
            status_code = result.status,
            "Order webhook dispatched"
        );

        Ok(DispatchOutcome::Delivered(result))
    }

    /// Builds the payload for an order.
    ///
    /// # Errors
    ///
    /// Returns an error when the customer lookup fails.
    pub async fn transform(&self, order: &Order) -> Result<OrderPayload> {
        let customer = match order.customer_id {
            Some(customer_id) => self.customers.find_customer(customer_id).await?,
            None => None,
        };

        if order.customer_id.is_some() && customer.is_none() {
            tracing::debug!(
                target: TRACING_TARGET,
                order_id = order.entity_id,
                customer_id = order.customer_id,
                "Customer not found, exporting order customer id only"
            );
        }

        let visitor = self.session.visitor_fingerprint();
        Ok(OrderPayload::with_policy(
            order,
            customer.as_ref(),
            visitor,
            &self.export,
        ))
    }

    /// Posts the payload and reduces whatever happens to a [`DeliveryResult`].
    pub async fn send(&self, payload: &OrderPayload, url: &str) -> DeliveryResult {
        let order_id = payload.order.entity_id;

        let url = match Url::parse(url) {
            Ok(url) => url,
            Err(err) => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    order_id,
                    url,
                    error = %err,
                    "Configured webhook URL is invalid"
                );
                return DeliveryResult::not_delivered();
            }
        };

        let request = match WebhookRequest::from_payload(url, payload) {
            Ok(request) => request,
            Err(err) => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    order_id,
                    error = %err,
                    "Failed to serialize order payload"
                );
                return DeliveryResult::not_delivered();
            }
        };

        match self.webhook.deliver(&request).await {
            Ok(response) => DeliveryResult::from(&response),
            Err(err) => {
                tracing::debug!(
                    target: TRACING_TARGET,
                    order_id,
                    request_id = %request.request_id,
                    error_kind = %err.kind(),
                    error = %err,
                    "No response received, recording placeholder"
                );
                DeliveryResult::not_delivered()
            }
        }
    }

    /// Appends the delivery result to the order's status history.
    pub fn record_result(order: &mut Order, result: &DeliveryResult) {
        order.add_status_history_comment(result.to_comment(), false);
    }

    fn skip(&self, order: &Order, reason: SkipReason) -> DispatchOutcome {
        tracing::debug!(
            target: TRACING_TARGET,
            order_id = order.entity_id,
            store_id = order.store_id,
            reason = %reason,
            "Skipping order webhook"
        );
        DispatchOutcome::Skipped(reason)
    }
}
