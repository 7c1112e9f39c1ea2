use crate::domain::progress::{OrderProgress, StageState};
use maud::{html, Markup};

/// Seven-stage delivery timeline with the completed/active/upcoming
/// states colored by class.
pub fn progress_timeline(progress: &OrderProgress) -> Markup {
    html! {
        ol class="timeline" {
            @for stage in &progress.stages {
                li class=(stage_class(stage.state)) title=(stage.description) {
                    span { (stage.label) }
                    @if let Some(timestamp) = &stage.timestamp {
                        span class="stage-meta" { (timestamp) }
                    }
                    @if let (Some(label), Some(value)) = (stage.meta_label, &stage.meta_value) {
                        span class="stage-meta" { (label) ": " (value) }
                    }
                }
            }
        }
        p class="progress-summary" {
            (progress.completed) " of " (progress.total) " stages complete (" (progress.percent) "%)"
        }
    }
}

fn stage_class(state: StageState) -> &'static str {
    match state {
        StageState::Complete => "stage-complete",
        StageState::Active => "stage-active",
        StageState::Upcoming => "stage-upcoming",
    }
}
