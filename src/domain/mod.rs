// src/domain/mod.rs
//
// The derivation core: everything in here is a pure function over the
// already-parsed order payload. Nothing returns Result for malformed
// data; bad input degrades to absence, never to an error.

pub mod catalog;
pub mod fields;
pub mod format;
pub mod insights;
pub mod labels;
pub mod progress;
pub mod tasks;
pub mod unpack;
pub mod view;
pub mod vin;

use serde::Serialize;

/// One display row in a panel. `value` stays plain text; the template
/// decides whether to render it as a link.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelValue {
    pub label: String,
    pub value: String,
}

impl LabelValue {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }

    /// Values that start with a scheme get rendered as anchors.
    pub fn is_link(&self) -> bool {
        self.value.starts_with("http://") || self.value.starts_with("https://")
    }
}
