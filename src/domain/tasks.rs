// src/domain/tasks.rs
//
// Per-task dashboard cards: humanized status, waiting detection, CTA
// resolution, and the metadata rows shown when a card is expanded.

use crate::domain::fields::{obj, str_field, text_field};
use crate::domain::format::{format_timestamp, title_case};
use crate::domain::LabelValue;
use serde::Serialize;
use serde_json::{Map, Value};

/// Tasks worth showing first, in workflow order. Anything else that
/// looks like a task (has a `complete` flag) is appended after.
const PRIORITY_KEYS: &[&str] = &[
    "deliveryDetails",
    "tradeIn",
    "financing",
    "registration",
    "insurance",
    "scheduling",
    "finalPayment",
    "deliveryAcceptance",
];

const WAITING_TITLES: &[&str] = &[
    "check back later",
    "we'll notify you",
    "we will notify you",
    "wait",
    "waiting",
];

const WAITING_STATUSES: &[&str] = &[
    "CHECK_BACK_LATER",
    "WAIT",
    "WAITING",
    "PENDING",
    "NOT_AVAILABLE",
    "IN_REVIEW",
];

const TIMESTAMP_FIELDS: &[(&str, &str)] = &[
    ("availableAt", "Available since"),
    ("dueDate", "Due date"),
    ("statusDate", "Status updated"),
    ("completedDate", "Completed at"),
    ("statusTimestamp", "Status timestamp"),
];

#[derive(Debug, Clone, Serialize)]
pub struct TaskCard {
    pub name: String,
    pub complete: bool,
    pub status: String,
    pub details: Option<String>,
    pub actionable: bool,
    pub waiting_reason: Option<String>,
    pub cta_url: Option<String>,
    pub cta_label: String,
    pub metadata: Vec<LabelValue>,
}

/// All-caps statuses get humanized; mixed-case text is already display
/// copy and passes through.
fn humanize_status(value: Option<&str>) -> String {
    match value.map(str::trim).filter(|s| !s.is_empty()) {
        Some(text) => {
            if text.chars().all(|c| !c.is_ascii_lowercase()) {
                title_case(text)
            } else {
                text.to_string()
            }
        }
        None => "Pending".to_string(),
    }
}

fn format_task(key: &str, task: &Map<String, Value>) -> TaskCard {
    let strings = obj(task, "strings");
    let card = obj(task, "card");

    let name = str_field(strings, "name")
        .or_else(|| str_field(card, "title"))
        .map(str::to_string)
        .unwrap_or_else(|| title_case(key));

    let status_raw = str_field(task, "status").or_else(|| str_field(card, "title"));
    let status_label = humanize_status(status_raw);
    let status_token = status_raw.unwrap_or("").to_uppercase();

    let details = [
        str_field(card, "subtitle"),
        str_field(card, "messageBody"),
        str_field(card, "messageTitle"),
        str_field(strings, "subtitle"),
        str_field(strings, "messageBody"),
        str_field(strings, "messageTitle"),
        str_field(strings, "checkBackLater"),
    ]
    .into_iter()
    .flatten()
    .next()
    .map(str::to_string);

    let card_title = str_field(card, "title").unwrap_or("").to_lowercase();
    let enabled = task
        .get("enabled")
        .and_then(Value::as_bool)
        .unwrap_or(true);
    let complete = task
        .get("complete")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    let waiting = (!enabled && !complete)
        || WAITING_STATUSES.contains(&status_token.as_str())
        || WAITING_TITLES.contains(&card_title.as_str());
    let actionable = !complete && !waiting;

    let waiting_reason = (waiting && !complete).then(|| {
        details
            .clone()
            .unwrap_or_else(|| "Tesla is still preparing this step.".to_string())
    });

    let card_target = str_field(card, "target").filter(|t| t.starts_with("http"));
    let cta_url = if key == "scheduling" {
        text_field(task, "selfSchedulingUrl")
    } else {
        card_target.map(str::to_string)
    };

    let cta_label = [
        str_field(strings, "ctaLabel"),
        str_field(strings, "actionButtonLabel"),
        str_field(card, "ctaLabel"),
        str_field(card, "buttonText"),
        str_field(card, "ctaText"),
    ]
    .into_iter()
    .flatten()
    .next()
    .unwrap_or("Open task")
    .to_string();

    let metadata = compile_metadata(task, &status_token, &status_label, enabled, actionable, complete);

    TaskCard {
        name,
        complete,
        status: status_label,
        details,
        actionable,
        waiting_reason,
        cta_url,
        cta_label,
        metadata,
    }
}

fn compile_metadata(
    task: &Map<String, Value>,
    status_token: &str,
    status_label: &str,
    enabled: bool,
    actionable: bool,
    complete: bool,
) -> Vec<LabelValue> {
    let mut metadata = vec![
        LabelValue::new("Tesla status", status_label),
        LabelValue::new("Status code", status_token),
        LabelValue::new("Enabled", if enabled { "Yes" } else { "No" }),
        LabelValue::new("Actionable", if actionable { "Yes" } else { "No" }),
        LabelValue::new("Complete", if complete { "Yes" } else { "No" }),
    ];
    metadata.retain(|item| !item.value.is_empty());

    let data = obj(task, "data");
    for (field, label) in TIMESTAMP_FIELDS {
        if let Some(value) = text_field(task, field).or_else(|| text_field(data, field)) {
            metadata.push(LabelValue::new(*label, format_timestamp(&value)));
        }
    }
    metadata
}

/// Parse the tasks mapping into ordered dashboard cards: the priority
/// keys first, then any remaining task-shaped entries.
pub fn parse_tasks(tasks: &Map<String, Value>) -> Vec<TaskCard> {
    let mut cards = Vec::new();

    for key in PRIORITY_KEYS {
        if let Some(task) = tasks.get(*key).and_then(Value::as_object) {
            cards.push(format_task(key, task));
        }
    }

    for (key, value) in tasks {
        if PRIORITY_KEYS.contains(&key.as_str()) {
            continue;
        }
        if let Some(task) = value.as_object() {
            if task.contains_key("complete") {
                cards.push(format_task(key, task));
            }
        }
    }

    cards
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tasks(value: Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    fn task(value: Value) -> Map<String, Value> {
        tasks(value)
    }

    #[test]
    fn priority_tasks_come_first_and_extras_need_a_complete_flag() {
        let cards = parse_tasks(&tasks(json!({
            "customTask": {"complete": false, "status": "PENDING"},
            "scheduling": {"complete": true, "status": "COMPLETED"},
            "registration": {"complete": false},
            "noise": {"something": 1}
        })));
        let names: Vec<&str> = cards.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Registration", "Scheduling", "Customtask"]);
    }

    #[test]
    fn waiting_detection_covers_disabled_status_and_card_title() {
        let disabled = format_task(
            "financing",
            &task(json!({"enabled": false, "complete": false})),
        );
        assert!(disabled.waiting_reason.is_some());
        assert!(!disabled.actionable);

        let pending = format_task(
            "financing",
            &task(json!({"status": "IN_REVIEW", "complete": false})),
        );
        assert!(!pending.actionable);

        let notify = format_task(
            "financing",
            &task(json!({"card": {"title": "Check back later"}, "complete": false})),
        );
        assert_eq!(
            notify.waiting_reason.as_deref(),
            Some("Tesla is still preparing this step.")
        );

        let done = format_task(
            "financing",
            &task(json!({"status": "COMPLETED", "complete": true})),
        );
        assert!(done.waiting_reason.is_none());
        assert!(!done.actionable);
    }

    #[test]
    fn scheduling_cta_uses_the_self_scheduling_url() {
        let card = format_task(
            "scheduling",
            &task(json!({
                "complete": false,
                "selfSchedulingUrl": "https://www.tesla.com/scheduling/x",
                "card": {"target": "https://example.com/ignored"}
            })),
        );
        assert_eq!(
            card.cta_url.as_deref(),
            Some("https://www.tesla.com/scheduling/x")
        );

        let other = format_task(
            "financing",
            &task(json!({"complete": false, "card": {"target": "https://bank.example/app"}})),
        );
        assert_eq!(other.cta_url.as_deref(), Some("https://bank.example/app"));

        let deeplink = format_task(
            "financing",
            &task(json!({"complete": false, "card": {"target": "tesla://financing"}})),
        );
        assert_eq!(deeplink.cta_url, None);
    }

    #[test]
    fn status_humanization_and_metadata_timestamps() {
        let card = format_task(
            "registration",
            &task(json!({
                "complete": false,
                "status": "MAKE_YOUR_FINAL_PAYMENT",
                "data": {"dueDate": "2024-03-05T14:30:00Z"}
            })),
        );
        assert_eq!(card.status, "Make Your Final Payment");
        let due = card.metadata.iter().find(|m| m.label == "Due date").unwrap();
        assert_eq!(due.value, "05 Mar 2024 14:30");

        let already_copy = format_task(
            "registration",
            &task(json!({"complete": false, "status": "Almost there"})),
        );
        assert_eq!(already_copy.status, "Almost there");
    }
}
