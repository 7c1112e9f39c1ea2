// src/domain/progress.rs
//
// The lifecycle stage engine. Seven fixed stages, each with its own
// completion rule, timestamp precedence chain, and metadata, evaluated
// by one interpreter over a declarative descriptor table. Completion is
// reported per stage exactly as upstream states it; position is only
// used to pick the single active stage.

use crate::domain::fields::{first_text, str_field, text_field};
use crate::domain::format::{
    format_date_only, format_mileage, format_timestamp, normalize_status_token,
    parse_datetime, parse_leading_number, shorten_delivery_window,
    PRE_DELIVERY_TEST_ODOMETER,
};
use crate::domain::labels::describe_registration_status;
use crate::domain::unpack::OrderContext;
use chrono::{NaiveDate, Utc};
use serde::Serialize;

/// Registration status tokens that count the registration stage done.
const REGISTRATION_DONE_TOKENS: &[&str] = &["COMPLETED", "COMPLETE", "APPROVED", "SUBMITTED"];

pub const STAGE_COUNT: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StageState {
    Complete,
    Active,
    Upcoming,
}

#[derive(Debug, Clone, Serialize)]
pub struct Stage {
    pub key: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    pub completed: bool,
    pub timestamp: Option<String>,
    pub meta_label: Option<&'static str>,
    pub meta_value: Option<String>,
    pub state: StageState,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderProgress {
    pub stages: Vec<Stage>,
    pub completed: usize,
    pub total: usize,
    pub percent: u32,
    /// Index of the first incomplete stage; equals `total` when every
    /// stage is complete.
    pub active_index: usize,
}

impl OrderProgress {
    /// `active_index` clamped into the stage range, for rendering.
    pub fn active_display_index(&self) -> usize {
        self.active_index.min(self.total - 1)
    }
}

/// What one stage's evaluator reports back to the interpreter.
#[derive(Debug, Default)]
struct StageEval {
    completed: bool,
    timestamp: Option<String>,
    meta_label: Option<&'static str>,
    meta_value: Option<String>,
    /// The stage must not display as active even if it is the first
    /// incomplete one (in-transit with no ETA at all).
    force_pending: bool,
    /// The stage carries a real in-progress signal and may be promoted
    /// to active when the forced-pending demotion leaves no active stage.
    activity: bool,
}

struct StageDef {
    key: &'static str,
    label: &'static str,
    description: &'static str,
    eval: fn(&OrderContext, NaiveDate, bool) -> StageEval,
}

const STAGE_DEFS: [StageDef; STAGE_COUNT] = [
    StageDef {
        key: "order_placed",
        label: "Order placed",
        description: "Your order is confirmed",
        eval: eval_order_placed,
    },
    StageDef {
        key: "vin_assigned",
        label: "VIN assigned",
        description: "A vehicle has been matched to your order",
        eval: eval_vin_assigned,
    },
    StageDef {
        key: "production",
        label: "Production",
        description: "Your vehicle is being built",
        eval: eval_production,
    },
    StageDef {
        key: "in_transit",
        label: "In transit",
        description: "Your vehicle is on its way to the delivery center",
        eval: eval_in_transit,
    },
    StageDef {
        key: "registration",
        label: "Registration",
        description: "Registration paperwork is being processed",
        eval: eval_registration,
    },
    StageDef {
        key: "ready",
        label: "Ready for delivery",
        description: "Your vehicle is ready to be handed over",
        eval: eval_ready,
    },
    StageDef {
        key: "delivered",
        label: "Delivered",
        description: "Enjoy your new car",
        eval: eval_delivered,
    },
];

fn eval_order_placed(ctx: &OrderContext, _today: NaiveDate, _prior: bool) -> StageEval {
    let reg_details = ctx.registration_details();
    let placed = first_text(&[
        (reg_details, "orderPlacedDate"),
        (&ctx.order, "orderPlacedDate"),
        (&ctx.order, "orderDate"),
    ]);
    StageEval {
        completed: placed.is_some(),
        timestamp: placed.as_deref().map(format_timestamp),
        ..Default::default()
    }
}

fn eval_vin_assigned(ctx: &OrderContext, _today: NaiveDate, _prior: bool) -> StageEval {
    let reg_details = ctx.registration_details();
    let vin = str_field(&ctx.order, "vin")
        .or_else(|| str_field(reg_details, "vin"))
        .map(str::to_string);
    let assigned = first_text(&[
        (reg_details, "vinAssignedDate"),
        (reg_details, "vinMatchDate"),
        (reg_details, "registrationDate"),
    ]);
    StageEval {
        completed: vin.is_some(),
        timestamp: assigned.as_deref().map(format_timestamp),
        meta_label: vin.is_some().then_some("VIN"),
        meta_value: vin,
        ..Default::default()
    }
}

fn eval_production(ctx: &OrderContext, _today: NaiveDate, _prior: bool) -> StageEval {
    let reg_details = ctx.registration_details();
    let odometer_raw = first_text(&[
        (reg_details, "vehicleOdometer"),
        (&ctx.delivery_details, "vehicleOdometer"),
    ]);
    let odometer_unit = first_text(&[
        (reg_details, "vehicleOdometerType"),
        (&ctx.delivery_details, "vehicleOdometerType"),
    ]);

    // The fixed pre-delivery reading means the car exists but has only
    // been test-driven off the line; anything else is real movement.
    let odometer = odometer_raw.as_deref().and_then(parse_leading_number);
    let completed = odometer
        .map(|value| (value - PRE_DELIVERY_TEST_ODOMETER).abs() > 0.01)
        .unwrap_or(false);

    let built = first_text(&[
        (reg_details, "productionDate"),
        (reg_details, "buildDate"),
        (reg_details, "buildCompleteDate"),
    ]);

    let meta_value = odometer_raw
        .as_deref()
        .and_then(|raw| format_mileage(raw, odometer_unit.as_deref()))
        .unwrap_or_else(|| "Awaiting update".to_string());

    StageEval {
        completed,
        timestamp: built.as_deref().map(format_timestamp),
        meta_label: Some("Odometer"),
        meta_value: Some(meta_value),
        ..Default::default()
    }
}

fn eval_in_transit(ctx: &OrderContext, today: NaiveDate, _prior: bool) -> StageEval {
    let eta = first_text(&[
        (&ctx.final_payment_data, "etaToDeliveryCenter"),
        (&ctx.delivery_details, "etaToDeliveryCenter"),
    ]);

    let eta_date = eta.as_deref().and_then(parse_datetime).map(|dt| dt.date());
    let completed = eta_date.map(|d| d <= today).unwrap_or(false);

    let eta_label = eta
        .as_deref()
        .map(|raw| format!("ETA: {}", format_date_only(raw)));

    // An order with no transit information at all should not read as
    // "currently in transit".
    let has_eta = eta.is_some();

    StageEval {
        completed,
        timestamp: eta_label.clone(),
        meta_label: has_eta.then_some("ETA"),
        meta_value: eta_label,
        force_pending: !has_eta,
        ..Default::default()
    }
}

fn eval_registration(ctx: &OrderContext, _today: NaiveDate, _prior: bool) -> StageEval {
    let reg_details = ctx.registration_details();
    let status_raw = first_text(&[
        (reg_details, "registrationStatus"),
        (&ctx.registration, "status"),
    ]);
    let token = status_raw.as_deref().map(normalize_status_token);
    let completed = token
        .as_deref()
        .map(|t| REGISTRATION_DONE_TOKENS.contains(&t))
        .unwrap_or(false);

    let date = first_text(&[
        (reg_details, "registrationCompletedDate"),
        (reg_details, "registrationStartedDate"),
        (&ctx.registration, "availableAt"),
    ]);

    let plate = first_text(&[
        (reg_details, "licensePlateNumber"),
        (reg_details, "licensePlate"),
    ]);
    let in_progress = token.as_deref() == Some("IN_PROGRESS");

    let (meta_label, meta_value) = match (&plate, &token) {
        (Some(plate), _) => (Some("Plate"), Some(plate.clone())),
        (None, Some(token)) => (Some("Status"), Some(describe_registration_status(token))),
        (None, None) => (None, None),
    };

    StageEval {
        completed,
        timestamp: date.as_deref().map(format_timestamp),
        meta_label,
        meta_value,
        activity: plate.is_some() || in_progress,
        ..Default::default()
    }
}

fn eval_ready(ctx: &OrderContext, _today: NaiveDate, prior_complete: bool) -> StageEval {
    let appointment_raw = first_text(&[
        (&ctx.scheduling, "apptDateTime"),
        (&ctx.scheduling, "apptDateTimeUtc"),
    ]);
    let appointment = appointment_raw.as_deref().and_then(parse_datetime);
    let window = text_field(&ctx.scheduling, "deliveryWindowDisplay")
        .as_deref()
        .and_then(shorten_delivery_window);

    // The strict rule: a real appointment alone is not "ready" until
    // every earlier milestone has also been reported done.
    let completed = appointment.is_some() && prior_complete;

    // Parsed appointment first, then the raw appointment string, then
    // the shortened window.
    let timestamp = appointment
        .map(|dt| dt.format("%d %b %Y %H:%M").to_string())
        .or_else(|| appointment_raw.clone())
        .or_else(|| window.clone());

    let (meta_label, meta_value) = if appointment.is_some() || appointment_raw.is_some() {
        (Some("Appointment"), timestamp.clone())
    } else if window.is_some() {
        (Some("Window"), window)
    } else {
        (None, None)
    };

    StageEval {
        completed,
        timestamp,
        meta_label,
        meta_value,
        activity: appointment.is_some(),
        ..Default::default()
    }
}

fn eval_delivered(ctx: &OrderContext, _today: NaiveDate, _prior: bool) -> StageEval {
    let status = str_field(&ctx.order, "orderStatus").unwrap_or("");
    let completed = status.to_uppercase().contains("DELIVERED");

    let reg_details = ctx.registration_details();
    let delivered = first_text(&[
        (&ctx.delivery_details, "deliveryDate"),
        (reg_details, "deliveryDate"),
        (reg_details, "deliveredOn"),
        (reg_details, "deliveredDate"),
    ]);

    StageEval {
        completed,
        timestamp: delivered.as_deref().map(format_timestamp),
        ..Default::default()
    }
}

/// Run the full stage derivation for one unpacked order. `today` is the
/// current UTC date, injected so the ETA comparison is testable.
pub fn derive_progress(ctx: &OrderContext, today: NaiveDate) -> OrderProgress {
    let mut stages = Vec::with_capacity(STAGE_COUNT);
    let mut promotable = [false; STAGE_COUNT];
    let mut forced_pending = [false; STAGE_COUNT];
    let mut prior_complete = true;

    for (i, def) in STAGE_DEFS.iter().enumerate() {
        let eval = (def.eval)(ctx, today, prior_complete);
        prior_complete = prior_complete && eval.completed;
        promotable[i] = eval.activity;
        forced_pending[i] = eval.force_pending;
        stages.push(Stage {
            key: def.key,
            label: def.label,
            description: def.description,
            completed: eval.completed,
            timestamp: eval.timestamp,
            meta_label: eval.meta_label,
            meta_value: eval.meta_value,
            state: StageState::Upcoming,
        });
    }

    // Pass 1: first incomplete stage is active; everything after waits.
    let active_index = stages
        .iter()
        .position(|s| !s.completed)
        .unwrap_or(STAGE_COUNT);
    for (i, stage) in stages.iter_mut().enumerate() {
        stage.state = if stage.completed {
            StageState::Complete
        } else if i == active_index {
            StageState::Active
        } else {
            StageState::Upcoming
        };
    }

    // Pass 2: demote a forced-pending active stage, then surface the
    // next incomplete stage with a real activity signal in its place.
    // Only display states move here; completion never changes.
    if active_index < STAGE_COUNT && forced_pending[active_index] {
        stages[active_index].state = StageState::Upcoming;
        if let Some(promoted) = (active_index + 1..STAGE_COUNT)
            .find(|&i| !stages[i].completed && promotable[i])
        {
            stages[promoted].state = StageState::Active;
        }
    }

    let completed = stages.iter().filter(|s| s.completed).count();
    let percent = ((completed * 100) as f64 / STAGE_COUNT as f64).round() as u32;

    OrderProgress {
        stages,
        completed,
        total: STAGE_COUNT,
        percent,
        active_index,
    }
}

/// Convenience wrapper over [`derive_progress`] pinned to the real clock.
pub fn derive_progress_now(ctx: &OrderContext) -> OrderProgress {
    derive_progress(ctx, Utc::now().date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn ctx_from(envelope: Value) -> OrderContext {
        OrderContext::from_envelope(&envelope)
    }

    fn full_envelope() -> Value {
        json!({
            "order": {
                "referenceNumber": "RN100001",
                "modelCode": "m3",
                "vin": "5YJ3E7EB4KF000316",
                "orderStatus": "DELIVERED",
                "mktOptions": "MDL3,BT37,PPSW"
            },
            "details": {"tasks": {
                "scheduling": {
                    "apptDateTime": "2024-05-20T10:00:00Z",
                    "deliveryWindowDisplay": "between May 18th and May 25th"
                },
                "registration": {
                    "status": "COMPLETED",
                    "orderDetails": {
                        "orderPlacedDate": "2024-01-10T09:00:00Z",
                        "vinAssignedDate": "2024-02-01T12:00:00Z",
                        "vehicleOdometer": "412.5",
                        "vehicleOdometerType": "km",
                        "productionDate": "2024-03-01T00:00:00Z",
                        "registrationStatus": "COMPLETED",
                        "registrationCompletedDate": "2024-04-15T08:00:00Z",
                        "licensePlateNumber": "B-TS 1234"
                    }
                },
                "finalPayment": {"data": {"etaToDeliveryCenter": "2024-05-10T00:00:00Z"}},
                "deliveryDetails": {"deliveryDate": "2024-05-20T10:30:00Z"}
            }}
        })
    }

    #[test]
    fn delivered_order_completes_every_stage() {
        let progress = derive_progress(&ctx_from(full_envelope()), today());
        assert!(progress.stages.iter().all(|s| s.completed));
        assert_eq!(progress.completed, 7);
        assert_eq!(progress.percent, 100);
        assert_eq!(progress.active_index, 7);
        assert_eq!(progress.active_display_index(), 6);
        assert!(progress
            .stages
            .iter()
            .all(|s| s.state == StageState::Complete));
    }

    #[test]
    fn sentinel_odometer_keeps_production_active() {
        // VIN present, odometer at the pre-delivery sentinel, no ETA,
        // registration submitted, no appointment.
        let envelope = json!({
            "order": {"referenceNumber": "RN2", "vin": "5YJ3E7EB4KF000316", "orderStatus": "ORDERED"},
            "details": {"tasks": {
                "registration": {"orderDetails": {
                    "orderPlacedDate": "2024-01-10T09:00:00Z",
                    "vehicleOdometer": "30 mi",
                    "registrationStatus": "SUBMITTED",
                    "registrationCompletedDate": "2024-04-15T08:00:00Z"
                }}
            }}
        });
        let progress = derive_progress(&ctx_from(envelope), today());
        let by_key = |key: &str| progress.stages.iter().find(|s| s.key == key).unwrap();

        assert!(by_key("order_placed").completed);
        assert!(by_key("vin_assigned").completed);
        assert!(!by_key("production").completed);
        assert!(by_key("registration").completed);
        assert!(!by_key("ready").completed);
        assert!(!by_key("delivered").completed);

        assert_eq!(progress.active_index, 2);
        assert_eq!(by_key("production").state, StageState::Active);
        assert_eq!(by_key("in_transit").state, StageState::Upcoming);
    }

    #[test]
    fn in_transit_is_never_active_without_an_eta() {
        // Everything before in_transit is complete and nothing later
        // carries an activity signal, so no stage displays as active.
        let envelope = json!({
            "order": {"referenceNumber": "RN3", "vin": "5YJ3E7EB4KF000316", "orderStatus": "BUILT"},
            "details": {"tasks": {
                "registration": {"orderDetails": {
                    "orderPlacedDate": "2024-01-10T09:00:00Z",
                    "vehicleOdometer": "212"
                }}
            }}
        });
        let progress = derive_progress(&ctx_from(envelope), today());
        let in_transit = progress.stages.iter().find(|s| s.key == "in_transit").unwrap();
        assert_eq!(progress.active_index, 3);
        assert_eq!(in_transit.state, StageState::Upcoming);
        assert!(in_transit.timestamp.is_none());
        assert!(progress
            .stages
            .iter()
            .all(|s| s.state != StageState::Active));
    }

    #[test]
    fn registration_activity_is_promoted_when_in_transit_is_demoted() {
        let envelope = json!({
            "order": {"referenceNumber": "RN4", "vin": "5YJ3E7EB4KF000316", "orderStatus": "BUILT"},
            "details": {"tasks": {
                "registration": {
                    "status": "in-progress",
                    "orderDetails": {
                        "orderPlacedDate": "2024-01-10T09:00:00Z",
                        "vehicleOdometer": "212"
                    }
                }
            }}
        });
        let progress = derive_progress(&ctx_from(envelope), today());
        let by_key = |key: &str| progress.stages.iter().find(|s| s.key == key).unwrap();
        assert_eq!(by_key("in_transit").state, StageState::Upcoming);
        assert_eq!(by_key("registration").state, StageState::Active);
        // Promotion is a display heuristic only.
        assert!(!by_key("registration").completed);
        assert_eq!(
            progress.stages.iter().filter(|s| s.state == StageState::Active).count(),
            1
        );
    }

    #[test]
    fn future_eta_labels_but_does_not_complete_in_transit() {
        let envelope = json!({
            "order": {"referenceNumber": "RN5", "orderStatus": "BUILT"},
            "details": {"tasks": {
                "finalPayment": {"data": {"etaToDeliveryCenter": "2024-07-15T00:00:00Z"}}
            }}
        });
        let progress = derive_progress(&ctx_from(envelope), today());
        let in_transit = progress.stages.iter().find(|s| s.key == "in_transit").unwrap();
        assert!(!in_transit.completed);
        assert_eq!(in_transit.timestamp.as_deref(), Some("ETA: 15 Jul 2024"));
    }

    #[test]
    fn ready_requires_every_prior_stage() {
        // A parseable appointment with an incomplete production stage
        // must not mark ready complete.
        let mut envelope = full_envelope();
        envelope["details"]["tasks"]["registration"]["orderDetails"]["vehicleOdometer"] =
            json!("30");
        let progress = derive_progress(&ctx_from(envelope), today());
        let ready = progress.stages.iter().find(|s| s.key == "ready").unwrap();
        assert!(!ready.completed);
        assert_eq!(ready.meta_label, Some("Appointment"));
    }

    #[test]
    fn ready_shows_an_unparseable_appointment_string_raw() {
        let envelope = json!({
            "order": {"referenceNumber": "RN7", "orderStatus": "BUILT"},
            "details": {"tasks": {
                "scheduling": {
                    "apptDateTime": "sometime next week",
                    "deliveryWindowDisplay": "between May 18th and May 25th"
                }
            }}
        });
        let progress = derive_progress(&ctx_from(envelope), today());
        let ready = progress.stages.iter().find(|s| s.key == "ready").unwrap();
        // Unparseable appointments never complete the stage, but the raw
        // string still beats the window for display.
        assert!(!ready.completed);
        assert_eq!(ready.timestamp.as_deref(), Some("sometime next week"));
        assert_eq!(ready.meta_label, Some("Appointment"));
        assert_eq!(ready.meta_value.as_deref(), Some("sometime next week"));
    }

    #[test]
    fn ready_falls_back_to_the_shortened_window() {
        let envelope = json!({
            "order": {"referenceNumber": "RN6", "orderStatus": "BUILT"},
            "details": {"tasks": {
                "scheduling": {"deliveryWindowDisplay": "between May 18th and May 25th"}
            }}
        });
        let progress = derive_progress(&ctx_from(envelope), today());
        let ready = progress.stages.iter().find(|s| s.key == "ready").unwrap();
        assert!(!ready.completed);
        assert_eq!(ready.meta_label, Some("Window"));
        assert_eq!(ready.meta_value.as_deref(), Some("18 May - 25 May"));
    }

    #[test]
    fn percent_and_active_index_hold_for_arbitrary_orders() {
        for envelope in [
            json!({}),
            json!({"order": {"orderStatus": "DELIVERED"}}),
            full_envelope(),
            json!({"order": {"vin": "5YJ3E7EB4KF000316"}}),
        ] {
            let progress = derive_progress(&ctx_from(envelope), today());
            assert!(progress.percent <= 100);
            assert_eq!(
                progress.percent,
                ((progress.completed * 100) as f64 / progress.total as f64).round() as u32
            );
            match progress.stages.iter().position(|s| !s.completed) {
                Some(first_incomplete) => assert_eq!(progress.active_index, first_incomplete),
                None => assert_eq!(progress.active_index, progress.total),
            }
        }
    }

    #[test]
    fn empty_payload_leaves_everything_pending() {
        let progress = derive_progress(&ctx_from(json!({})), today());
        assert_eq!(progress.completed, 0);
        assert_eq!(progress.percent, 0);
        assert_eq!(progress.active_index, 0);
        let production = progress.stages.iter().find(|s| s.key == "production").unwrap();
        assert_eq!(production.meta_value.as_deref(), Some("Awaiting update"));
    }
}
