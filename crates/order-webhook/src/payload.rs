//! Export contracts for the order webhook payload.
//!
//! Every entity has an export type that names exactly which fields leave the
//! process. Free-form attributes stay behind unless an [`ExportPolicy`] lists
//! their key for that entity. A listed key never shadows a typed field, and
//! payment keys carrying card data are never exported.

use std::collections::{BTreeMap, BTreeSet};

use bigdecimal::BigDecimal;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::model::{
    Address, AddressType, Attributes, Customer, CustomerId, LineItem, Order, OrderId, Payment,
    StoreId, VisitorFingerprint,
};

/// Key prefix of payment fields holding card data.
pub const CARD_DATA_PREFIX: &str = "cc_";

/// Keys written at the top level of the payload.
pub const ORDER_FIELDS: &[&str] = &[
    "entity_id",
    "increment_id",
    "status",
    "state",
    "store_id",
    "customer_id",
    "customer_email",
    "customer_firstname",
    "customer_lastname",
    "customer_is_guest",
    "order_currency_code",
    "grand_total",
    "subtotal",
    "tax_amount",
    "shipping_amount",
    "discount_amount",
    "total_qty_ordered",
    "shipping_method",
    "shipping_description",
    "remote_ip",
    "created_at",
    "updated_at",
    "line_items",
    "customer",
    "shipping_address",
    "billing_address",
    "payment",
    "visitor",
];

/// Keys written for each line item.
pub const LINE_ITEM_FIELDS: &[&str] = &[
    "item_id",
    "parent_item_id",
    "product_id",
    "product_type",
    "sku",
    "name",
    "qty_ordered",
    "price",
    "row_total",
    "tax_amount",
    "discount_amount",
    "weight",
];

/// Keys written for the customer.
pub const CUSTOMER_FIELDS: &[&str] = &[
    "entity_id",
    "email",
    "firstname",
    "lastname",
    "group_id",
    "website_id",
    "store_id",
    "created_at",
    "customer_id",
];

/// Keys written for each address.
pub const ADDRESS_FIELDS: &[&str] = &[
    "entity_id",
    "address_type",
    "firstname",
    "lastname",
    "company",
    "street",
    "city",
    "region",
    "region_id",
    "postcode",
    "country_id",
    "telephone",
    "email",
];

/// Keys written for the payment.
pub const PAYMENT_FIELDS: &[&str] = &[
    "entity_id",
    "method",
    "amount_ordered",
    "amount_paid",
    "shipping_amount",
    "last_trans_id",
    "po_number",
];

/// Record kinds with their own export contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(AsRefStr, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ExportEntity {
    Order,
    LineItem,
    Customer,
    Address,
    Payment,
}

impl ExportEntity {
    /// Typed fields written for this entity.
    pub fn fields(self) -> &'static [&'static str] {
        match self {
            Self::Order => ORDER_FIELDS,
            Self::LineItem => LINE_ITEM_FIELDS,
            Self::Customer => CUSTOMER_FIELDS,
            Self::Address => ADDRESS_FIELDS,
            Self::Payment => PAYMENT_FIELDS,
        }
    }

    /// Returns whether `key` may be exported as an extension attribute.
    fn accepts(self, key: &str) -> bool {
        if self.fields().contains(&key) {
            return false;
        }
        self != Self::Payment || !key.starts_with(CARD_DATA_PREFIX)
    }
}

/// Free-form attribute keys exported next to the typed fields, per entity.
///
/// The default policy exports no attributes at all.
///
/// ```
/// use order_webhook::payload::{ExportEntity, ExportPolicy};
///
/// let policy = ExportPolicy::new()
///     .with_attribute(ExportEntity::Order, "gift_message")
///     .with_attribute(ExportEntity::Payment, "cc_number");
///
/// assert!(policy.allows(ExportEntity::Order, "gift_message"));
/// assert!(!policy.allows(ExportEntity::Payment, "cc_number"));
/// assert!(!policy.allows(ExportEntity::Customer, "gift_message"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportPolicy {
    attributes: BTreeMap<ExportEntity, BTreeSet<String>>,
}

impl ExportPolicy {
    /// Creates a policy that exports typed fields only.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allows one attribute key for an entity.
    pub fn with_attribute(mut self, entity: ExportEntity, key: impl Into<String>) -> Self {
        self.attributes.entry(entity).or_default().insert(key.into());
        self
    }

    /// Returns whether no attribute is allowed for any entity.
    pub fn is_empty(&self) -> bool {
        self.attributes.values().all(BTreeSet::is_empty)
    }

    /// Returns whether `key` is exported for `entity`.
    pub fn allows(&self, entity: ExportEntity, key: &str) -> bool {
        entity.accepts(key)
            && self
                .attributes
                .get(&entity)
                .is_some_and(|keys| keys.contains(key))
    }

    /// Copies the allowed attributes of one record.
    fn extension(&self, entity: ExportEntity, attributes: &Attributes) -> Attributes {
        let Some(keys) = self.attributes.get(&entity) else {
            return Attributes::new();
        };

        keys.iter()
            .filter(|key| entity.accepts(key))
            .filter_map(|key| attributes.get(key).map(|value| (key.clone(), value.clone())))
            .collect()
    }
}

/// JSON document posted to the webhook endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct OrderPayload {
    #[serde(flatten)]
    pub order: OrderExport,
    pub line_items: Vec<LineItemExport>,
    pub customer: CustomerExport,
    pub shipping_address: Option<AddressExport>,
    pub billing_address: Option<AddressExport>,
    pub payment: Option<PaymentExport>,
    pub visitor: VisitorFingerprint,
}

impl OrderPayload {
    /// Builds the payload for an order with typed fields only.
    ///
    /// `customer` is the record loaded for the order's customer id, if any.
    /// The exported `customer.customer_id` always comes from the order.
    pub fn new(order: &Order, customer: Option<&Customer>, visitor: VisitorFingerprint) -> Self {
        Self::with_policy(order, customer, visitor, &ExportPolicy::default())
    }

    /// Builds the payload, adding the attributes `policy` allows.
    pub fn with_policy(
        order: &Order,
        customer: Option<&Customer>,
        visitor: VisitorFingerprint,
        policy: &ExportPolicy,
    ) -> Self {
        let customer = match customer {
            Some(customer) => CustomerExport::new(customer, order.customer_id, policy),
            None => CustomerExport::unknown(order.customer_id),
        };
        let address = |address: &Address| AddressExport::new(address, policy);

        Self {
            order: OrderExport::new(order, policy),
            line_items: order
                .items
                .iter()
                .map(|item| LineItemExport::new(item, policy))
                .collect(),
            customer,
            shipping_address: order.shipping_address.as_ref().map(address),
            billing_address: order.billing_address.as_ref().map(address),
            payment: order
                .payment
                .as_ref()
                .map(|payment| PaymentExport::new(payment, policy)),
            visitor,
        }
    }

    /// Serializes the payload into a JSON body.
    pub fn to_json(&self) -> crate::Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }
}

/// Exported order fields.
#[derive(Debug, Clone, Serialize)]
pub struct OrderExport {
    pub entity_id: OrderId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub increment_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    pub store_id: StoreId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<CustomerId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_firstname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_lastname: Option<String>,
    pub customer_is_guest: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_currency_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grand_total: Option<BigDecimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtotal: Option<BigDecimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_amount: Option<BigDecimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_amount: Option<BigDecimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_amount: Option<BigDecimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_qty_ordered: Option<BigDecimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_ip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,
    #[serde(flatten)]
    pub extension: Attributes,
}

impl OrderExport {
    /// Exports an order's own fields.
    pub fn new(order: &Order, policy: &ExportPolicy) -> Self {
        Self {
            entity_id: order.entity_id,
            increment_id: order.increment_id.clone(),
            status: order.status.clone(),
            state: order.state.clone(),
            store_id: order.store_id,
            customer_id: order.customer_id,
            customer_email: order.customer_email.clone(),
            customer_firstname: order.customer_firstname.clone(),
            customer_lastname: order.customer_lastname.clone(),
            customer_is_guest: order.customer_is_guest,
            order_currency_code: order.order_currency_code.clone(),
            grand_total: order.grand_total.clone(),
            subtotal: order.subtotal.clone(),
            tax_amount: order.tax_amount.clone(),
            shipping_amount: order.shipping_amount.clone(),
            discount_amount: order.discount_amount.clone(),
            total_qty_ordered: order.total_qty_ordered.clone(),
            shipping_method: order.shipping_method.clone(),
            shipping_description: order.shipping_description.clone(),
            remote_ip: order.remote_ip.clone(),
            created_at: order.created_at,
            updated_at: order.updated_at,
            extension: policy.extension(ExportEntity::Order, &order.attributes),
        }
    }
}

/// Exported line item fields.
#[derive(Debug, Clone, Serialize)]
pub struct LineItemExport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_item_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_type: Option<String>,
    pub sku: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qty_ordered: Option<BigDecimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<BigDecimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_total: Option<BigDecimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_amount: Option<BigDecimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_amount: Option<BigDecimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<BigDecimal>,
    #[serde(flatten)]
    pub extension: Attributes,
}

impl LineItemExport {
    /// Exports one line item.
    pub fn new(item: &LineItem, policy: &ExportPolicy) -> Self {
        Self {
            item_id: item.item_id,
            parent_item_id: item.parent_item_id,
            product_id: item.product_id,
            product_type: item.product_type.clone(),
            sku: item.sku.clone(),
            name: item.name.clone(),
            qty_ordered: item.qty_ordered.clone(),
            price: item.price.clone(),
            row_total: item.row_total.clone(),
            tax_amount: item.tax_amount.clone(),
            discount_amount: item.discount_amount.clone(),
            weight: item.weight.clone(),
            extension: policy.extension(ExportEntity::LineItem, &item.attributes),
        }
    }
}

/// Exported customer fields.
#[derive(Debug, Clone, Serialize)]
pub struct CustomerExport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<CustomerId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub firstname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lastname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website_id: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_id: Option<StoreId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
    #[serde(flatten)]
    pub extension: Attributes,
    /// Always the order's customer id, whatever the loaded record says.
    pub customer_id: Option<CustomerId>,
}

impl CustomerExport {
    /// Exports a loaded customer, pinning `customer_id` to the order's value.
    pub fn new(
        customer: &Customer,
        customer_id: Option<CustomerId>,
        policy: &ExportPolicy,
    ) -> Self {
        Self {
            entity_id: customer.entity_id,
            email: customer.email.clone(),
            firstname: customer.firstname.clone(),
            lastname: customer.lastname.clone(),
            group_id: customer.group_id,
            website_id: customer.website_id,
            store_id: customer.store_id,
            created_at: customer.created_at,
            extension: policy.extension(ExportEntity::Customer, &customer.attributes),
            customer_id,
        }
    }

    /// Export for a guest order or a customer that could not be loaded.
    pub fn unknown(customer_id: Option<CustomerId>) -> Self {
        Self::new(&Customer::default(), customer_id, &ExportPolicy::default())
    }
}

/// Exported address fields.
#[derive(Debug, Clone, Serialize)]
pub struct AddressExport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_type: Option<AddressType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub firstname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lastname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region_id: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postcode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telephone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(flatten)]
    pub extension: Attributes,
}

impl AddressExport {
    /// Exports one address.
    pub fn new(address: &Address, policy: &ExportPolicy) -> Self {
        Self {
            entity_id: address.entity_id,
            address_type: address.address_type,
            firstname: address.firstname.clone(),
            lastname: address.lastname.clone(),
            company: address.company.clone(),
            street: address.street.clone(),
            city: address.city.clone(),
            region: address.region.clone(),
            region_id: address.region_id,
            postcode: address.postcode.clone(),
            country_id: address.country_id.clone(),
            telephone: address.telephone.clone(),
            email: address.email.clone(),
            extension: policy.extension(ExportEntity::Address, &address.attributes),
        }
    }
}

/// Exported payment fields. Card data never appears here.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentExport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount_ordered: Option<BigDecimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount_paid: Option<BigDecimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_amount: Option<BigDecimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_trans_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub po_number: Option<String>,
    #[serde(flatten)]
    pub extension: Attributes,
}

impl PaymentExport {
    /// Exports a payment without its card data.
    pub fn new(payment: &Payment, policy: &ExportPolicy) -> Self {
        Self {
            entity_id: payment.entity_id,
            method: payment.method.clone(),
            amount_ordered: payment.amount_ordered.clone(),
            amount_paid: payment.amount_paid.clone(),
            shipping_amount: payment.shipping_amount.clone(),
            last_trans_id: payment.last_trans_id.clone(),
            po_number: payment.po_number.clone(),
            extension: policy.extension(ExportEntity::Payment, &payment.attributes),
        }
    }
}
