// src/domain/labels.rs
//
// Static code -> label tables for the enumerated vocabularies the order
// payload uses, plus the fallback humanizer for codes we have never seen.

use crate::domain::format::{format_timestamp, title_case};

pub const DELIVERY_TYPES: &[(&str, &str)] = &[
    ("PICKUP_SERVICE_CENTER", "Pickup at service/delivery center"),
    ("PICKUP_HOME", "Home delivery"),
    ("PICKUP_EXPRESS", "Express pickup"),
    ("PICKUP_DC", "Delivery center appointment"),
    ("PICKUP_STORE", "Retail store pickup"),
    ("PICKUP_DIRECT", "Direct-to-customer handoff"),
];

pub const PAYMENT_STATUSES: &[(&str, &str)] = &[
    ("MAKE_YOUR_FINAL_PAYMENT", "Final payment required"),
    ("PAYMENT_SUCCESS", "Payment received"),
    ("FUNDS_IN_TRANSIT", "Funds in transit"),
    ("PAYMENT_SCHEDULED", "Payment scheduled"),
    ("PAYMENT_PENDING", "Payment pending"),
    ("PAYMENT_NOT_REQUIRED", "No payment required"),
    ("PAYMENT_VERIFICATION", "Payment under verification"),
];

pub const APPOINTMENT_STATUSES: &[(&str, &str)] = &[
    ("NOT_SCHEDULED", "Not scheduled"),
    ("SCHEDULED", "Appointment scheduled"),
    ("CONFIRMED", "Appointment confirmed"),
    ("RESCHEDULED", "Appointment rescheduled"),
    ("AWAITING_CUSTOMER", "Waiting for customer to schedule"),
    ("AWAITING_TESLA", "Tesla scheduling in progress"),
    ("COMPLETED", "Appointment completed"),
    ("CANCELLED", "Appointment cancelled"),
];

pub const REGISTRATION_STATUSES: &[(&str, &str)] = &[
    ("NOT_STARTED", "Registration not started"),
    ("IN_PROGRESS", "Registration in progress"),
    ("SUBMITTED", "Registration submitted"),
    ("APPROVED", "Registration approved"),
    ("COMPLETED", "Registration completed"),
    ("PENDING", "Registration pending review"),
];

pub const REGISTRANT_TYPES: &[(&str, &str)] = &[
    ("INDIVIDUAL", "Individual registrant"),
    ("BUSINESS", "Business registrant"),
    ("LEASE", "Leased vehicle"),
    ("COMPANY", "Company-owned"),
    ("GOVERNMENT", "Government fleet"),
];

pub const LOCALES: &[(&str, &str)] = &[
    ("EN_US", "English (United States)"),
    ("EN_CA", "English (Canada)"),
    ("EN_GB", "English (United Kingdom)"),
    ("FR_FR", "French (France)"),
    ("FR_CA", "French (Canada)"),
    ("DE_DE", "German (Germany)"),
    ("NL_NL", "Dutch (Netherlands)"),
    ("ES_ES", "Spanish (Spain)"),
    ("ES_MX", "Spanish (Mexico)"),
    ("SV_SE", "Swedish (Sweden)"),
];

pub const ORDER_STATUSES: &[(&str, &str)] = &[
    ("NEW", "Order placed"),
    ("ORDERED", "Order confirmed"),
    ("BUILDING", "Vehicle in production"),
    ("BUILT", "Vehicle built"),
    ("IN_TRANSIT", "Vehicle in transit"),
    ("DELIVERED", "Vehicle delivered"),
    ("CANCELLED", "Order cancelled"),
    ("HOLD", "Order on hold"),
];

pub const ORDER_SUBSTATUSES: &[(&str, &str)] = &[
    ("ALLOCATION_PENDING", "Awaiting factory allocation"),
    ("VIN_ASSIGNED", "VIN assigned"),
    ("READY_FOR_DELIVERY", "Ready for delivery"),
    ("AWAITING_PAYMENT", "Awaiting payment"),
    ("DOCUMENTS_PENDING", "Paperwork pending"),
];

pub const FINANCE_PRODUCT_TYPES: &[(&str, &str)] = &[
    ("RETAIL_LOAN", "Retail loan"),
    ("LEASE", "Lease"),
    ("CASH", "Cash purchase"),
    ("BALLOON", "Balloon financing"),
    ("TESLA_FINANCE", "Tesla financing"),
];

pub const DELIVERY_GATES: &[(&str, &str)] = &[
    ("BEFORE_DELIVERY", "Before-delivery readiness"),
    ("AT_DELIVERY", "Delivery-day handoff"),
    ("AFTER_DELIVERY", "Post-delivery follow-up"),
    ("BEFORE_DELIVERY_FINANCE", "Finance clearance before delivery"),
    ("BEFORE_DELIVERY_DOCUMENTS", "Paperwork before delivery"),
    ("BEFORE_DELIVERY_VEHICLE", "Vehicle prep before delivery"),
];

pub const DELIVERY_TIMINGS: &[(&str, &str)] = &[
    ("BEFORE_DELIVERY", "Before delivery"),
    ("AT_DELIVERY", "During delivery"),
    ("AFTER_DELIVERY", "After delivery"),
    ("POST_DELIVERY", "Post-delivery"),
    ("PRIOR_TO_APPOINTMENT", "Prior to appointment"),
];

fn lookup(table: &'static [(&'static str, &'static str)], key: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|(code, _)| *code == key)
        .map(|(_, label)| *label)
}

/// Translate an upstream code through a table; unknown codes are
/// humanized (underscores -> spaces, title case) rather than shown raw.
pub fn describe_code(value: &str, table: &'static [(&'static str, &'static str)]) -> String {
    let key = value.trim().to_uppercase();
    if key.is_empty() {
        return String::new();
    }
    match lookup(table, &key) {
        Some(label) => label.to_string(),
        None => title_case(&key),
    }
}

pub fn describe_delivery_type(value: &str) -> String {
    describe_code(value, DELIVERY_TYPES)
}

pub fn describe_payment_status(value: &str) -> String {
    describe_code(value, PAYMENT_STATUSES)
}

pub fn describe_appointment_status(value: &str) -> String {
    describe_code(value, APPOINTMENT_STATUSES)
}

pub fn describe_registration_status(value: &str) -> String {
    describe_code(value, REGISTRATION_STATUSES)
}

pub fn describe_registrant_type(value: &str) -> String {
    describe_code(value, REGISTRANT_TYPES)
}

pub fn describe_locale(value: &str) -> String {
    describe_code(value, LOCALES)
}

pub fn describe_order_status(value: &str) -> String {
    describe_code(value, ORDER_STATUSES)
}

pub fn describe_order_substatus(value: &str) -> String {
    describe_code(value, ORDER_SUBSTATUSES)
}

pub fn describe_finance_product(value: &str) -> String {
    describe_code(value, FINANCE_PRODUCT_TYPES)
}

pub fn describe_delivery_gate(value: &str) -> String {
    describe_code(value, DELIVERY_GATES)
}

pub fn describe_delivery_timing(value: &str) -> String {
    describe_code(value, DELIVERY_TIMINGS)
}

/// A blocker's action-time slot holds either a timing-phase code, a
/// timestamp, or free text. Try each reading in that order.
pub fn format_blocker_time(value: Option<&str>) -> String {
    let Some(raw) = value.map(str::trim).filter(|s| !s.is_empty()) else {
        return "N/A".to_string();
    };
    let key = raw.to_uppercase();
    if let Some(label) = lookup(DELIVERY_TIMINGS, &key) {
        return label.to_string();
    }
    let formatted = format_timestamp(raw);
    if formatted != raw {
        return formatted;
    }
    describe_delivery_timing(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_use_the_table() {
        assert_eq!(describe_payment_status("PAYMENT_SUCCESS"), "Payment received");
        assert_eq!(
            describe_payment_status("payment_success"),
            "Payment received"
        );
        assert_eq!(describe_locale("DE_DE"), "German (Germany)");
    }

    #[test]
    fn unknown_codes_are_humanized() {
        assert_eq!(
            describe_order_status("WAITING_FOR_WHEELS"),
            "Waiting For Wheels"
        );
        assert_eq!(describe_registrant_type("trust"), "Trust");
    }

    #[test]
    fn blocker_time_tries_phase_then_timestamp_then_raw() {
        assert_eq!(format_blocker_time(Some("AT_DELIVERY")), "During delivery");
        assert_eq!(
            format_blocker_time(Some("2024-03-05T14:30:00Z")),
            "05 Mar 2024 14:30"
        );
        assert_eq!(format_blocker_time(Some("whenever")), "Whenever");
        assert_eq!(format_blocker_time(None), "N/A");
        assert_eq!(format_blocker_time(Some("  ")), "N/A");
    }
}
