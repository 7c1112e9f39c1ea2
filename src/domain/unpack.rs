// src/domain/unpack.rs

use crate::domain::fields::{obj, obj_owned, str_field};
use serde_json::{Map, Value};

/// The flattened view of one `{order, details}` envelope. Every field is
/// always a map (possibly empty), so downstream derivation can index
/// freely without null checks. A task that is absent here simply has not
/// started yet.
#[derive(Debug, Clone, Default)]
pub struct OrderContext {
    pub order: Map<String, Value>,
    pub details: Map<String, Value>,
    pub tasks: Map<String, Value>,
    pub scheduling: Map<String, Value>,
    pub registration: Map<String, Value>,
    pub final_payment: Map<String, Value>,
    pub final_payment_data: Map<String, Value>,
    pub delivery_details: Map<String, Value>,
}

impl OrderContext {
    /// Unpack an envelope. Total: wrong-typed or missing nodes become
    /// empty maps, including the final-payment `data` sub-object when
    /// `finalPayment` itself is not a map.
    pub fn from_envelope(envelope: &Value) -> Self {
        let root = match envelope.as_object() {
            Some(map) => map,
            None => return Self::default(),
        };

        let order = obj_owned(root, "order");
        let details = obj_owned(root, "details");
        let tasks = obj(&details, "tasks").clone();

        let final_payment = obj(&tasks, "finalPayment").clone();
        let final_payment_data = obj(&final_payment, "data").clone();

        Self {
            scheduling: obj(&tasks, "scheduling").clone(),
            registration: obj(&tasks, "registration").clone(),
            delivery_details: obj(&tasks, "deliveryDetails").clone(),
            order,
            details,
            tasks,
            final_payment,
            final_payment_data,
        }
    }

    /// The registration task's `orderDetails` sub-record, where most of
    /// the lifecycle dates live.
    pub fn registration_details(&self) -> &Map<String, Value> {
        obj(&self.registration, "orderDetails")
    }

    /// Delivery-readiness record, under either of its two upstream names.
    pub fn readiness(&self) -> &Map<String, Value> {
        let detail = obj(&self.final_payment_data, "deliveryReadinessDetail");
        if !detail.is_empty() {
            return detail;
        }
        obj(&self.final_payment_data, "deliveryReadiness")
    }

    pub fn currency_code(&self) -> Option<&str> {
        str_field(obj(&self.final_payment, "currencyFormat"), "currencyCode")
            .or_else(|| str_field(&self.final_payment_data, "currencyCode"))
    }
}
