// src/domain/insights.rs
//
// The four flat label/value panels plus the delivery-blocker list.
// These are the simple consumers of the unpacked order: pick fields,
// run them through the normalizers, drop whatever is empty.

use crate::domain::catalog::describe_market_options;
use crate::domain::fields::{bool_field, obj, str_field, text_field};
use crate::domain::format::{format_currency, format_timestamp};
use crate::domain::labels::{
    describe_appointment_status, describe_code, describe_delivery_gate,
    describe_delivery_type, describe_finance_product, describe_locale,
    describe_order_status, describe_order_substatus, describe_payment_status,
    describe_registrant_type, describe_registration_status, format_blocker_time,
};
use crate::domain::unpack::OrderContext;
use crate::domain::LabelValue;
use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Serialize)]
pub struct DeliveryBlocker {
    pub gate: String,
    pub owner: String,
    pub action_time: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderInsights {
    pub finance: Vec<LabelValue>,
    pub delivery: Vec<LabelValue>,
    pub registration: Vec<LabelValue>,
    pub metadata: Vec<LabelValue>,
    pub blockers: Vec<DeliveryBlocker>,
}

fn yes_no(flag: Option<bool>) -> Option<String> {
    flag.map(|b| if b { "Yes" } else { "No" }.to_string())
}

/// Collect (label, value) pairs, skipping absent values.
fn build_items(pairs: Vec<(&str, Option<String>)>) -> Vec<LabelValue> {
    pairs
        .into_iter()
        .filter_map(|(label, value)| {
            let value = value?;
            let trimmed = value.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(LabelValue::new(label, trimmed))
            }
        })
        .collect()
}

fn finance_panel(ctx: &OrderContext) -> Vec<LabelValue> {
    let financing = obj(
        obj(&ctx.final_payment_data, "financingDetails"),
        "teslaFinanceDetails",
    );
    let currency = ctx.currency_code();

    let interest = text_field(financing, "interestRate").map(|rate| format!("{rate}%"));
    let term = text_field(financing, "termsInMonths").map(|months| format!("{months} months"));
    let product = str_field(financing, "financePartnerType")
        .or_else(|| str_field(&ctx.final_payment, "orderType"))
        .map(describe_finance_product);

    build_items(vec![
        (
            "Payment Status",
            str_field(&ctx.final_payment, "status").map(describe_payment_status),
        ),
        (
            "Finance Partner",
            text_field(financing, "financePartnerName"),
        ),
        ("Product Type", product),
        ("Interest Rate", interest),
        (
            "Monthly Payment",
            text_field(financing, "monthlyPayment")
                .and_then(|amount| format_currency(&amount, currency)),
        ),
        ("Term", term),
        (
            "Down Payment",
            text_field(financing, "downpaymentToLessor")
                .and_then(|amount| format_currency(&amount, currency)),
        ),
        (
            "Customer Amount Due",
            text_field(&ctx.final_payment, "amountDue")
                .and_then(|amount| format_currency(&amount, currency)),
        ),
        (
            "Amount Sent",
            text_field(&ctx.final_payment, "amountSent")
                .and_then(|amount| format_currency(&amount, currency)),
        ),
        (
            "Lender Amount Due",
            text_field(&ctx.final_payment_data, "amountDueFromLender")
                .and_then(|amount| format_currency(&amount, currency)),
        ),
    ])
}

fn delivery_panel(ctx: &OrderContext) -> Vec<LabelValue> {
    let readiness = ctx.readiness();
    let pickup = str_field(&ctx.scheduling, "deliveryAddressTitle")
        .or_else(|| {
            str_field(
                obj(&ctx.final_payment_data, "deliveryAddress"),
                "address1",
            )
        })
        .or_else(|| str_field(&ctx.final_payment_data, "pickupLocation"))
        .map(str::to_string);

    build_items(vec![
        (
            "Delivery Type",
            str_field(&ctx.scheduling, "deliveryType")
                .or_else(|| str_field(&ctx.final_payment_data, "deliveryType"))
                .map(describe_delivery_type),
        ),
        ("Pickup Location", pickup),
        (
            "Ready To Accept",
            yes_no(bool_field(&ctx.scheduling, "readyToAccept")),
        ),
        (
            "Self-Scheduling",
            text_field(&ctx.scheduling, "selfSchedulingUrl"),
        ),
        (
            "Appointment Status",
            str_field(&ctx.scheduling, "appointmentStatusName")
                .map(describe_appointment_status),
        ),
        (
            "Tesla Actions Pending",
            yes_no(bool_field(readiness, "hasTeslaAction")),
        ),
        (
            "Customer Actions Pending",
            yes_no(bool_field(readiness, "hasCustomerAction")),
        ),
        ("Has Blocker", yes_no(bool_field(readiness, "hasBlocker"))),
    ])
}

fn registration_panel(ctx: &OrderContext) -> Vec<LabelValue> {
    let details = ctx.registration_details();
    let registrant = str_field(
        obj(&ctx.registration, "strings"),
        "messageBody",
    )
    .or_else(|| str_field(details, "primaryRegistrantType"))
    .map(str::to_string);

    build_items(vec![
        (
            "Registration Status",
            str_field(details, "registrationStatus")
                .or_else(|| str_field(&ctx.registration, "status"))
                .map(describe_registration_status),
        ),
        (
            "Registrant Type",
            str_field(details, "registrantType")
                .or_else(|| str_field(&ctx.registration, "registrantType"))
                .map(describe_registrant_type),
        ),
        (
            "Order Placed",
            str_field(details, "orderPlacedDate").map(format_timestamp),
        ),
        (
            "Order Booked",
            str_field(details, "orderBookedDate").map(format_timestamp),
        ),
        ("Primary Registrant", registrant),
        (
            "Country",
            str_field(details, "countryCode")
                .or_else(|| str_field(&ctx.order, "countryCode"))
                .map(str::to_string),
        ),
        (
            "Delivery Alerts",
            text_field(obj(&ctx.registration, "alertStatuses"), "regDelivery"),
        ),
    ])
}

fn metadata_panel(ctx: &OrderContext) -> Vec<LabelValue> {
    let mut items = build_items(vec![
        (
            "Order Status",
            str_field(&ctx.order, "orderStatus").map(describe_order_status),
        ),
        (
            "Order Substatus",
            str_field(&ctx.order, "orderSubstatus").map(describe_order_substatus),
        ),
        ("Vehicle Map ID", text_field(&ctx.order, "vehicleMapId")),
        (
            "Locale",
            str_field(&ctx.order, "locale").map(describe_locale),
        ),
        (
            "Routing Location",
            text_field(ctx.registration_details(), "vehicleRoutingLocation"),
        ),
        ("B2B Order", yes_no(bool_field(&ctx.order, "isB2b"))),
        ("Used Vehicle", yes_no(bool_field(&ctx.order, "isUsed"))),
    ]);
    items.extend(describe_market_options(
        ctx.order.get("mktOptions").unwrap_or(&Value::Null),
    ));
    items
}

/// Filter the readiness gates down to actual blockers, translating the
/// gate and owner codes.
pub fn extract_delivery_blockers(readiness: &Map<String, Value>) -> Vec<DeliveryBlocker> {
    let gates = readiness.get("gates");
    let gate_iter: Vec<&Value> = match gates {
        Some(Value::Array(items)) => items.iter().collect(),
        Some(Value::Object(map)) => map.values().collect(),
        _ => Vec::new(),
    };

    gate_iter
        .into_iter()
        .filter_map(Value::as_object)
        .filter(|gate| {
            gate.get("isBlocker")
                .and_then(Value::as_bool)
                .unwrap_or(false)
        })
        .map(|gate| DeliveryBlocker {
            gate: describe_delivery_gate(str_field(gate, "gate").unwrap_or("UNKNOWN")),
            owner: describe_code(str_field(gate, "actionOwner").unwrap_or("Unknown"), &[]),
            action_time: format_blocker_time(str_field(gate, "actionTime")),
        })
        .collect()
}

/// Build every panel for one order.
pub fn build_order_insights(ctx: &OrderContext) -> OrderInsights {
    OrderInsights {
        finance: finance_panel(ctx),
        delivery: delivery_panel(ctx),
        registration: registration_panel(ctx),
        metadata: metadata_panel(ctx),
        blockers: extract_delivery_blockers(ctx.readiness()),
    }
}
