// src/domain/view.rs

use crate::domain::catalog::derive_model_labels;
use crate::domain::fields::{str_field, text_field};
use crate::domain::insights::{build_order_insights, OrderInsights};
use crate::domain::labels::describe_order_status;
use crate::domain::progress::{derive_progress, OrderProgress};
use crate::domain::tasks::{parse_tasks, TaskCard};
use crate::domain::unpack::OrderContext;
use crate::domain::vin::{self, VinDetails};
use crate::tesla::images::{vehicle_image_urls, VehicleImage};
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;

/// Everything the dashboard needs for one order, derived in a single
/// pass over the envelope.
#[derive(Debug, Clone, Serialize)]
pub struct OrderView {
    pub reference: String,
    pub model_label: String,
    pub full_model_label: String,
    pub vin: Option<String>,
    pub vin_details: Option<VinDetails>,
    pub status_label: String,
    pub delivery_address: Option<String>,
    pub delivery_window: Option<String>,
    pub eta: Option<String>,
    pub images: Vec<VehicleImage>,
    pub progress: OrderProgress,
    pub insights: OrderInsights,
    pub tasks: Vec<TaskCard>,
}

/// Derive the full per-order view. `today` feeds the in-transit ETA
/// comparison.
pub fn build_order_view(envelope: &Value, today: NaiveDate) -> OrderView {
    let ctx = OrderContext::from_envelope(envelope);
    let reg_details = ctx.registration_details();

    let (model_label, full_model_label) = derive_model_labels(&ctx.order, reg_details);

    let vin = str_field(&ctx.order, "vin").map(str::to_string);
    let vin_details = vin.as_deref().and_then(vin::decode);

    let model_code = str_field(&ctx.order, "modelCode").unwrap_or("");
    let mkt_options = text_field(&ctx.order, "mktOptions").unwrap_or_default();
    let images = vehicle_image_urls(model_code, &mkt_options);

    let status_label = str_field(&ctx.order, "orderStatus")
        .map(describe_order_status)
        .unwrap_or_else(|| "Unknown".to_string());

    OrderView {
        reference: str_field(&ctx.order, "referenceNumber")
            .unwrap_or("(no reference)")
            .to_string(),
        model_label,
        full_model_label,
        vin,
        vin_details,
        status_label,
        delivery_address: text_field(&ctx.scheduling, "apptDateTimeAddressStr"),
        delivery_window: text_field(&ctx.scheduling, "deliveryWindowDisplay"),
        eta: text_field(&ctx.final_payment_data, "etaToDeliveryCenter"),
        images,
        progress: derive_progress(&ctx, today),
        insights: build_order_insights(&ctx),
        tasks: parse_tasks(&ctx.tasks),
    }
}
