use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use super::Attributes;

/// Payment record of an order.
///
/// Card fields (`cc_*`) are loaded so the host model stays complete, but they
/// have no counterpart in the exported payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Payment {
    #[serde(default)]
    pub entity_id: Option<u64>,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub amount_ordered: Option<BigDecimal>,
    #[serde(default)]
    pub amount_paid: Option<BigDecimal>,
    #[serde(default)]
    pub shipping_amount: Option<BigDecimal>,
    #[serde(default)]
    pub last_trans_id: Option<String>,
    #[serde(default)]
    pub po_number: Option<String>,

    #[serde(default)]
    pub cc_type: Option<String>,
    #[serde(default)]
    pub cc_owner: Option<String>,
    #[serde(default)]
    pub cc_last4: Option<String>,
    #[serde(default)]
    pub cc_number_enc: Option<String>,
    #[serde(default)]
    pub cc_exp_month: Option<u8>,
    #[serde(default)]
    pub cc_exp_year: Option<u16>,

    #[serde(flatten)]
    pub attributes: Attributes,
}

impl Payment {
    /// Creates a payment record for the given method code.
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: Some(method.into()),
            ..Default::default()
        }
    }
}
