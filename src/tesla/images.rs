// src/tesla/images.rs
//
// Configurator compositor URLs for the ordered configuration. Pure URL
// assembly; the browser fetches the actual renders.

use serde::Serialize;
use url::form_urlencoded;

const COMPOSITOR_URL: &str = "https://static-assets.tesla.com/configurator/compositor";

/// (view code, display label), in the order the dashboard shows them.
const VIEW_LIBRARY: &[(&str, &str)] = &[
    ("STUD_3QTR", "Exterior"),
    ("SIDE", "Side Profile"),
    ("REAR34", "Rear Quarter"),
    ("STUD_SEAT", "Front Interior"),
    ("INTERIOR_ROW2", "Rear Interior"),
    ("INTERIOR_DETAIL", "Interior Detail"),
    ("AERIAL", "Top Down"),
    ("STUD_TRUNK_OPEN", "Cargo Area"),
    ("STUD_DETAIL", "Design Detail"),
    ("STUD_SIDE_TRAILERHITCH", "Towing View"),
    ("RIMCLOSEUP", "Rim Close-Up"),
];

#[derive(Debug, Clone, Serialize)]
pub struct VehicleImage {
    pub url: String,
    pub view: String,
    pub label: String,
}

fn normalize_model_token(model_code: &str) -> Option<String> {
    let normalized = model_code.trim();
    if normalized.is_empty() {
        return None;
    }
    let token = match normalized.to_lowercase().as_str() {
        "ms" | "model s" | "s" => "ms",
        "m3" | "model 3" | "3" => "m3",
        "mx" | "model x" | "x" => "mx",
        "my" | "model y" | "y" => "my",
        "ct" | "cybertruck" => "ct",
        _ => return Some(normalized.to_string()),
    };
    Some(token.to_string())
}

/// The compositor wants every option code `$`-prefixed.
fn format_option_string(options: &str) -> String {
    options
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| {
            if token.starts_with('$') {
                token.to_string()
            } else {
                format!("${token}")
            }
        })
        .collect::<Vec<_>>()
        .join(",")
}

fn view_label(view_code: &str) -> String {
    VIEW_LIBRARY
        .iter()
        .find(|(code, _)| *code == view_code)
        .map(|(_, label)| (*label).to_string())
        .unwrap_or_else(|| crate::domain::format::title_case(view_code))
}

fn compositor_query(model_token: &str, option_string: &str, view_code: &str) -> String {
    let mut pairs: Vec<(&str, &str)> = vec![
        ("model", model_token),
        ("view", view_code),
        ("options", option_string),
        ("bkba_opt", "1"),
        ("context", "design_studio_2"),
        ("size", "1024"),
        ("crop", "1150,647,390,180"),
        ("hide_car_shadow", "0"),
    ];
    // Per-view parameter overrides.
    if view_code == "RIMCLOSEUP" {
        for (key, value) in pairs.iter_mut() {
            match *key {
                "crop" => *value = "0,0,80,0",
                "size" => *value = "800",
                _ => {}
            }
        }
    }

    let mut query = form_urlencoded::Serializer::new(String::new());
    for (key, value) in pairs {
        if !value.is_empty() {
            query.append_pair(key, value);
        }
    }
    query.finish()
}

/// Image metadata for the default view sequence. Unknown or empty model
/// codes produce no images rather than broken ones.
pub fn vehicle_image_urls(model_code: &str, options: &str) -> Vec<VehicleImage> {
    let Some(model_token) = normalize_model_token(model_code) else {
        return Vec::new();
    };
    let option_string = format_option_string(options);

    VIEW_LIBRARY
        .iter()
        .map(|(view_code, label)| VehicleImage {
            url: format!(
                "{COMPOSITOR_URL}?{}",
                compositor_query(&model_token, &option_string, view_code)
            ),
            view: (*view_code).to_string(),
            label: (*label).to_string(),
        })
        .collect()
}

/// The primary (front three-quarter) render.
pub fn primary_image_url(model_code: &str, options: &str) -> Option<String> {
    vehicle_image_urls(model_code, options)
        .into_iter()
        .next()
        .map(|image| image.url)
}
