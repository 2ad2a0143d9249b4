//! Orders, their line items and status history.

use bigdecimal::BigDecimal;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{Address, Attributes, CustomerId, OrderId, Payment, StoreId};

/// Notification raised by the host after an order was placed or saved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderEvent {
    /// The order the event is about.
    pub order: Order,
}

impl OrderEvent {
    /// Creates a new event for the given order.
    pub fn new(order: Order) -> Self {
        Self { order }
    }
}

/// A placed order as owned by the host platform.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Order {
    pub entity_id: OrderId,
    #[serde(default)]
    pub increment_id: Option<String>,
    /// Order status; orders without a status are never dispatched.
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    pub store_id: StoreId,

    /// Customer account id, absent for guest checkouts.
    #[serde(default)]
    pub customer_id: Option<CustomerId>,
    #[serde(default)]
    pub customer_email: Option<String>,
    #[serde(default)]
    pub customer_firstname: Option<String>,
    #[serde(default)]
    pub customer_lastname: Option<String>,
    #[serde(default)]
    pub customer_is_guest: bool,

    #[serde(default)]
    pub order_currency_code: Option<String>,
    #[serde(default)]
    pub grand_total: Option<BigDecimal>,
    #[serde(default)]
    pub subtotal: Option<BigDecimal>,
    #[serde(default)]
    pub tax_amount: Option<BigDecimal>,
    #[serde(default)]
    pub shipping_amount: Option<BigDecimal>,
    #[serde(default)]
    pub discount_amount: Option<BigDecimal>,
    #[serde(default)]
    pub total_qty_ordered: Option<BigDecimal>,

    #[serde(default)]
    pub shipping_method: Option<String>,
    #[serde(default)]
    pub shipping_description: Option<String>,
    #[serde(default)]
    pub remote_ip: Option<String>,

    #[serde(default)]
    pub created_at: Option<Timestamp>,
    #[serde(default)]
    pub updated_at: Option<Timestamp>,

    /// Line items in the order the host returns them.
    #[serde(default)]
    pub items: Vec<LineItem>,
    #[serde(default)]
    pub shipping_address: Option<Address>,
    #[serde(default)]
    pub billing_address: Option<Address>,
    #[serde(default)]
    pub payment: Option<Payment>,

    /// Append-only comment log.
    #[serde(default)]
    pub status_history: Vec<StatusComment>,

    #[serde(flatten)]
    pub attributes: Attributes,
}

impl Order {
    /// Creates an order with the given identifier and store.
    pub fn new(entity_id: OrderId, store_id: StoreId) -> Self {
        Self {
            entity_id,
            store_id,
            ..Default::default()
        }
    }

    /// Sets the order status.
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Sets the customer account id.
    pub fn with_customer(mut self, customer_id: CustomerId) -> Self {
        self.customer_id = Some(customer_id);
        self
    }

    /// Appends a line item.
    pub fn with_item(mut self, item: LineItem) -> Self {
        self.items.push(item);
        self
    }

    /// Sets the payment record.
    pub fn with_payment(mut self, payment: Payment) -> Self {
        self.payment = Some(payment);
        self
    }

    /// Returns the order status if it is set.
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Appends a comment to the status history.
    ///
    /// The comment carries the current order status, as the host does.
    pub fn add_status_history_comment(
        &mut self,
        comment: impl Into<String>,
        is_customer_notified: bool,
    ) -> &StatusComment {
        let entry = StatusComment {
            comment: comment.into(),
            status: self.status.clone(),
            is_customer_notified,
            created_at: Timestamp::now(),
        };

        self.status_history.push(entry);
        &self.status_history[self.status_history.len() - 1]
    }
}

/// A single product line of an order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(default)]
    pub item_id: Option<u64>,
    #[serde(default)]
    pub parent_item_id: Option<u64>,
    #[serde(default)]
    pub product_id: Option<u64>,
    #[serde(default)]
    pub product_type: Option<String>,
    pub sku: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub qty_ordered: Option<BigDecimal>,
    #[serde(default)]
    pub price: Option<BigDecimal>,
    #[serde(default)]
    pub row_total: Option<BigDecimal>,
    #[serde(default)]
    pub tax_amount: Option<BigDecimal>,
    #[serde(default)]
    pub discount_amount: Option<BigDecimal>,
    #[serde(default)]
    pub weight: Option<BigDecimal>,

    #[serde(flatten)]
    pub attributes: Attributes,
}

impl LineItem {
    /// Creates a line item for the given SKU.
    pub fn new(sku: impl Into<String>) -> Self {
        Self {
            sku: sku.into(),
            ..Default::default()
        }
    }
}

/// One entry in an order's status history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusComment {
    pub comment: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub is_customer_notified: bool,
    pub created_at: Timestamp,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_status_history_comment() {
        let mut order = Order::new(1001, 1).with_status("pending");

        let entry = order.add_status_history_comment("note", false);
        assert_eq!(entry.comment, "note");
        assert_eq!(entry.status.as_deref(), Some("pending"));
        assert!(!entry.is_customer_notified);

        order.add_status_history_comment("second", true);
        assert_eq!(order.status_history.len(), 2);
        assert_eq!(order.status_history[0].comment, "note");
    }

    #[test]
    fn test_deserialize_keeps_unknown_keys() {
        let order: Order = serde_json::from_value(serde_json::json!({
            "entity_id": 7,
            "store_id": 2,
            "status": "processing",
            "grand_total": "19.99",
            "gift_message_id": 3
        }))
        .unwrap();

        assert_eq!(order.status(), Some("processing"));
        assert_eq!(order.grand_total, Some("19.99".parse().unwrap()));
        assert_eq!(order.attributes.get("gift_message_id"), Some(&3.into()));
        assert!(order.items.is_empty());
    }
}
