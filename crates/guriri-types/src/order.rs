//! Delivery order ("pedido") types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Order creation payload as submitted by a client.
///
/// Every field is optional; absent fields are stored as NULL.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewOrder {
    #[serde(default)]
    pub cliente: Option<String>,
    #[serde(default)]
    pub coleta: Option<String>,
    #[serde(default)]
    pub entrega: Option<String>,
    #[serde(default)]
    pub obs: Option<String>,
}

/// A persisted delivery order.
///
/// `id` is the creation instant in epoch milliseconds, rendered as a decimal
/// string. Orders are immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub cliente: Option<String>,
    pub coleta: Option<String>,
    pub entrega: Option<String>,
    pub obs: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Build an order from a creation payload.
    pub fn from_new(id: String, new: NewOrder, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            cliente: new.cliente,
            coleta: new.coleta,
            entrega: new.entrega,
            obs: new.obs,
            created_at,
        }
    }
}
