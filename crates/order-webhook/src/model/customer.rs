use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{Attributes, CustomerId, StoreId};

/// Customer account, looked up by the order's customer id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Customer {
    #[serde(default)]
    pub entity_id: Option<CustomerId>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub firstname: Option<String>,
    #[serde(default)]
    pub lastname: Option<String>,
    #[serde(default)]
    pub group_id: Option<u32>,
    #[serde(default)]
    pub website_id: Option<u32>,
    #[serde(default)]
    pub store_id: Option<StoreId>,
    #[serde(default)]
    pub created_at: Option<Timestamp>,

    #[serde(flatten)]
    pub attributes: Attributes,
}
