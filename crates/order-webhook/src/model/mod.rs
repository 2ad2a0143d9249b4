//! Host platform entities read by the dispatcher.
//!
//! These types mirror the records the host platform hands over with an order
//! event. They are deserializable so a host can load them from its own storage
//! format; unknown keys are kept in each entity's `attributes` map.
//!
//! What actually leaves the process is decided by the export types in
//! [`crate::payload`], not by these structs.

mod address;
mod customer;
mod order;
mod payment;
mod visitor;

pub use address::{Address, AddressType};
pub use customer::Customer;
pub use order::{LineItem, Order, OrderEvent, StatusComment};
pub use payment::Payment;
pub use visitor::VisitorFingerprint;

/// Free-form key/value attributes attached to an entity.
pub type Attributes = serde_json::Map<String, serde_json::Value>;

/// Identifier of an order.
pub type OrderId = u64;

/// Identifier of a store view.
pub type StoreId = u32;

/// Identifier of a customer account.
pub type CustomerId = u64;
