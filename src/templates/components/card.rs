use crate::domain::insights::DeliveryBlocker;
use crate::domain::tasks::TaskCard;
use crate::domain::LabelValue;
use maud::{html, Markup};

pub fn card(title: &str, body: Markup) -> Markup {
    html! {
        section class="card" {
            h3 { (title) }
            (body)
        }
    }
}

/// Definition list of derived label/value pairs. URL values become
/// links.
pub fn label_value_list(items: &[LabelValue]) -> Markup {
    html! {
        ul class="kv-list" {
            @for item in items {
                li {
                    span class="kv-label" { (item.label) }
                    @if item.is_link() {
                        a href=(item.value) target="_blank" rel="noopener" { "Open" }
                    } @else {
                        span { (item.value) }
                    }
                }
            }
        }
    }
}

pub fn blocker_table(blockers: &[DeliveryBlocker]) -> Markup {
    html! {
        table class="blocker-table" {
            thead {
                tr { th { "Gate" } th { "Owner" } th { "Action time" } }
            }
            tbody {
                @for blocker in blockers {
                    tr {
                        td { (blocker.gate) }
                        td { (blocker.owner) }
                        td { (blocker.action_time) }
                    }
                }
            }
        }
    }
}

pub fn task_card(task: &TaskCard) -> Markup {
    let class = if task.complete {
        "card task-card task-complete"
    } else if task.waiting_reason.is_some() {
        "card task-card task-waiting"
    } else {
        "card task-card"
    };

    html! {
        section class=(class) {
            h3 { (task.name) }
            p class="task-status" { (task.status) }
            @if let Some(details) = &task.details {
                p { (details) }
            }
            @if let Some(reason) = &task.waiting_reason {
                p class="task-status" { "Waiting: " (reason) }
            }
            @if !task.metadata.is_empty() {
                (label_value_list(&task.metadata))
            }
            @if task.actionable {
                @if let Some(url) = &task.cta_url {
                    a class="btn" href=(url) target="_blank" rel="noopener" { (task.cta_label) }
                }
            }
        }
    }
}
