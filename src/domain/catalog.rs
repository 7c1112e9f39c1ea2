// src/domain/catalog.rs
//
// Market option codes: the known catalog, regex heuristics for codes the
// catalog has never seen, and the model-code labels derived from them.

use crate::domain::fields::str_field;
use crate::domain::LabelValue;
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;

/// (code, category, display name). The upstream blob carries far more
/// codes than this; anything unlisted goes through the hint rules.
const MARKET_OPTION_CATALOG: &[(&str, &str, &str)] = &[
    // Vehicle / drive / manufacturing
    ("MDL3", "Vehicle", "Model 3 Platform"),
    ("MDLY", "Vehicle", "Model Y Platform"),
    ("MDLS", "Vehicle", "Model S Platform"),
    ("MDLX", "Vehicle", "Model X Platform"),
    ("MTS03", "Manufacturing", "Model S Long Range"),
    ("MTS07", "Manufacturing", "Model S Long Range Plus"),
    ("MTS11", "Manufacturing", "Model S Plaid"),
    ("MTX03", "Manufacturing", "Model X Long Range"),
    ("MTX04", "Manufacturing", "Model X Performance"),
    ("MTX07", "Manufacturing", "Model X Long Range Plus"),
    ("MTX11", "Manufacturing", "Model X Plaid"),
    ("MT300", "Manufacturing", "Model 3 Standard Range RWD"),
    ("MT301", "Manufacturing", "Model 3 Standard Range Plus RWD"),
    ("MT302", "Manufacturing", "Model 3 Long Range RWD"),
    ("MT303", "Manufacturing", "Model 3 Long Range AWD"),
    ("MT304", "Manufacturing", "Model 3 Long Range Performance"),
    ("MT323", "Manufacturing", "Model 3 Long Range AWD (refresh)"),
    ("MT353", "Manufacturing", "Model 3 Performance Highland"),
    ("ADPX0", "Drive", "Rear-wheel drive single motor"),
    ("ADPX1", "Drive", "Long Range dual motor"),
    ("ADPX2", "Drive", "Performance dual motor"),
    ("DUALMOTOR", "Drive", "Dual Motor AWD badging"),
    ("DV4W", "Drive", "Dual motor all-wheel drive"),
    ("P3WS", "Performance", "Performance Upgrade Package"),
    ("MT322", "Manufacturing", "Model year 2022 Q2 build"),
    ("MT337", "Manufacturing", "Model year 2023 Q4 build"),
    ("MTY01", "Manufacturing", "Model Y Standard Range RWD"),
    ("MTY02", "Manufacturing", "Model Y Long Range RWD"),
    ("MTY03", "Manufacturing", "Model Y Long Range AWD"),
    ("MTY04", "Manufacturing", "Model Y Performance AWD"),
    ("MTY05", "Manufacturing", "Model Y Performance"),
    ("MTY47", "Manufacturing", "Model Y LR AWD (LG 5L pack)"),
    ("MTY62", "Manufacturing", "Model Y LR AWD (LG 5M pack)"),
    ("TM00", "Towing", "Towing package deleted"),
    ("TOW1", "Towing", "Factory tow package"),
    // Batteries / powertrain
    ("BT37", "Battery", "Long Range battery pack"),
    ("BT38", "Battery", "Standard Range battery pack"),
    ("BT42", "Battery", "4680 structural battery pack"),
    ("BP00", "Battery", "No Ludicrous upgrade"),
    // Paint
    ("PPSW", "Paint", "Pearl White Multi-Coat paint"),
    ("PPMR", "Paint", "Red Multi-Coat paint"),
    ("PMNG", "Paint", "Midnight Silver Metallic paint"),
    ("PPSB", "Paint", "Deep Blue Metallic paint"),
    ("PMBL", "Paint", "Obsidian Black Metallic paint"),
    ("PMTL", "Paint", "Titanium Metallic paint"),
    ("PBCW", "Paint", "Solid Black paint"),
    ("PB02", "Paint", "Marine Blue"),
    // Wheels / tires / suspension
    ("WTAS", "Wheels", "19\" Sport Wheels"),
    ("W38B", "Wheels", "18\" Aero Wheels"),
    ("W39B", "Wheels", "19\" Sport Wheels"),
    ("W40B", "Wheels", "20\" Induction Wheels"),
    ("W41B", "Wheels", "20\" Gemini Wheels"),
    ("WTUR", "Wheels", "21\" Überturbine Wheels"),
    ("WY19P", "Wheels", "19\" Crossflow Wheels"),
    ("ST33", "Suspension", "All-season tires"),
    ("SU3C", "Suspension", "Coil suspension setup"),
    // Interior
    ("IN3PB", "Interior", "Premium all-black interior"),
    ("IN3PW", "Interior", "Premium black & white interior"),
    ("INYPB", "Interior", "Model Y black interior"),
    ("INYPW", "Interior", "Model Y black & white interior"),
    ("IPB8", "Interior", "Premium all-black interior"),
    ("IL31", "Interior", "Interior ambient lighting"),
    ("AU3P", "Interior", "Premium audio system"),
    ("AF02", "Interior", "Subzero weather / heated components"),
    // Comfort / seating
    ("ST01", "Seating", "Front heated seats"),
    ("RSF1", "Seating", "Rear heated seats"),
    ("RSF2", "Seating", "Second row seat heaters"),
    ("STY5S", "Seating", "MY 5 Seat Interior"),
    // Autopilot / software / connectivity
    ("APBS", "Software", "Basic Autopilot"),
    ("APF0", "Software", "Autopilot hardware with no features"),
    ("APF1", "Software", "Autopilot convenience features"),
    ("APF2", "Software", "Enhanced Autopilot"),
    ("APF3", "Software", "Full Self-Driving computer (HW3)"),
    ("APPB", "Software", "Full Self-Driving capability"),
    ("ACC1", "Connectivity", "Premium connectivity"),
    ("CPF0", "Connectivity", "Premium connectivity (trial)"),
    ("CPF1", "Connectivity", "Premium connectivity (1 year included)"),
    ("SC04", "Charging", "Pay-as-you-go Supercharging"),
    ("SC05", "Charging", "Free unlimited Supercharging"),
    // Safety / hardware
    ("FR04", "Hardware", "HEPA filter & Bioweapon Defense Mode"),
    ("HM31", "Hardware", "Power folding, heated side mirrors"),
    ("HL32", "Hardware", "Matrix LED headlights"),
    ("PI01", "Hardware", "Premium audio amplifier"),
    ("DRLH", "Hardware", "Left-hand drive configuration"),
    ("DRRH", "Hardware", "Right-hand drive configuration"),
    ("OPPF", "Protection", "Factory paint protection film"),
    ("BC3R", "Hardware", "Performance red brake calipers"),
];

const MODEL_CODE_LABELS: &[(&str, &str)] = &[
    ("M3", "Model 3"),
    ("MY", "Model Y"),
    ("MS", "Model S"),
    ("MX", "Model X"),
    ("CT", "Cybertruck"),
    ("SR", "Roadster"),
];

/// Ordered first-match-wins heuristics for codes missing from the
/// catalog; the prefix conventions are stable even when the codes churn.
static OPTION_HINT_RULES: LazyLock<Vec<(Regex, &'static str, &'static str)>> =
    LazyLock::new(|| {
        [
            (r"^(PP|PM|PBC|PRS|PBS)", "Paint", "Exterior paint option"),
            (r"^W\d+", "Wheels", "Wheel package"),
            (r"^IN", "Interior", "Interior trim or material"),
            (r"^AP|^FS|^FSD|^EAP", "Software", "Autopilot or software package"),
            (r"^SC", "Charging", "Supercharging config"),
            (r"^MDL|^MDY|^MDX", "Vehicle", "Model designation"),
            (r"^BT", "Battery", "Battery configuration"),
            (r"^ST|^RS", "Seating", "Seat or interior comfort"),
            (r"^HP|^DU|^MT", "Performance", "Drive-unit or performance upgrade"),
            (r"^PK|^PRM", "Package", "Equipment package"),
            (r"^HM|^FR|^HL|^FG", "Hardware", "Hardware feature"),
        ]
        .into_iter()
        .map(|(pattern, label, description)| {
            (Regex::new(pattern).unwrap(), label, description)
        })
        .collect()
    });

static OPTION_SPLITTER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[,;|\s]+").unwrap());

fn catalog_entry(code: &str) -> Option<(&'static str, &'static str)> {
    MARKET_OPTION_CATALOG
        .iter()
        .find(|(c, _, _)| *c == code)
        .map(|(_, category, name)| (*category, *name))
}

/// Uppercase an option code and strip the configurator `$` prefix.
pub fn normalize_option_code(value: &str) -> Option<String> {
    let text = value.trim().to_uppercase();
    let text = text.strip_prefix('$').unwrap_or(&text);
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

/// Split an option blob into normalized codes. The blob shows up as a
/// delimited string, an array, or an object (where only string values
/// are candidate codes, with an explicit code list preferred).
pub fn split_option_codes(blob: &Value) -> Vec<String> {
    let candidates: Vec<String> = match blob {
        Value::String(s) => OPTION_SPLITTER.split(s).map(str::to_string).collect(),
        Value::Array(items) => items
            .iter()
            .filter_map(|v| match v {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect(),
        Value::Object(map) => object_option_candidates(map),
        _ => return Vec::new(),
    };

    candidates
        .iter()
        .filter_map(|c| normalize_option_code(c))
        .collect()
}

fn object_option_candidates(map: &Map<String, Value>) -> Vec<String> {
    for key in ["optionCodes", "options", "codes"] {
        if let Some(Value::Array(items)) = map.get(key) {
            return items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect();
        }
    }
    map.values()
        .filter_map(|v| v.as_str().map(str::to_string))
        .collect()
}

/// Best-guess (category, description) for a code the catalog does not know.
pub fn infer_option_hint(code: &str) -> (&'static str, &'static str) {
    if code.is_empty() {
        return ("Option", "Unrecognized option");
    }
    for (pattern, label, description) in OPTION_HINT_RULES.iter() {
        if pattern.is_match(code) {
            return (label, description);
        }
    }
    ("Option", "Custom configuration")
}

/// Resolve an option blob into grouped label/value rows: one row per
/// catalog category (alphabetical, values de-duplicated in insertion
/// order), then one row per unknown code, sorted.
pub fn describe_market_options(blob: &Value) -> Vec<LabelValue> {
    let codes = split_option_codes(blob);
    if codes.is_empty() {
        return Vec::new();
    }

    let mut grouped: Vec<(&'static str, Vec<String>)> = Vec::new();
    let mut unknown: Vec<String> = Vec::new();
    for code in &codes {
        match catalog_entry(code) {
            Some((category, name)) => {
                let entry = if name.contains(code.as_str()) {
                    name.to_string()
                } else {
                    format!("{name} ({code})")
                };
                match grouped.iter_mut().find(|(c, _)| *c == category) {
                    Some((_, values)) => {
                        if !values.contains(&entry) {
                            values.push(entry);
                        }
                    }
                    None => grouped.push((category, vec![entry])),
                }
            }
            None => {
                if !unknown.contains(code) {
                    unknown.push(code.clone());
                }
            }
        }
    }

    grouped.sort_by_key(|(category, _)| *category);
    unknown.sort();

    let mut items: Vec<LabelValue> = grouped
        .into_iter()
        .map(|(category, values)| {
            LabelValue::new(format!("{category} Options"), values.join(", "))
        })
        .collect();

    for code in unknown {
        let (label, description) = infer_option_hint(&code);
        items.push(LabelValue::new(label, format!("{description} ({code})")));
    }

    items
}

/// Human label for a raw model code. `m3`-style codes expand to
/// `Model 3`; anything else is shown title-cased.
pub fn describe_model_code(value: &str) -> String {
    let token = value.trim().to_uppercase();
    if token.is_empty() {
        return "Tesla".to_string();
    }
    if let Some((_, label)) = MODEL_CODE_LABELS.iter().find(|(code, _)| *code == token) {
        return (*label).to_string();
    }
    if token.starts_with("MODEL") {
        return crate::domain::format::title_case(&token);
    }
    if let Some(suffix) = token.strip_prefix('M') {
        if !suffix.trim().is_empty() {
            return format!("Model {}", suffix.trim());
        }
    }
    crate::domain::format::title_case(&token)
}

/// Trim line for a vehicle: the explicit trim name when the payload has
/// one, else the catalog name for the trim code or a manufacturing
/// option code.
pub fn lookup_trim_label(
    order: &Map<String, Value>,
    order_details: &Map<String, Value>,
) -> Option<String> {
    for key in ["trimName", "modelDescription"] {
        if let Some(name) = str_field(order_details, key) {
            return Some(name.to_string());
        }
    }

    let trim_code = str_field(order_details, "trimCode")
        .or_else(|| str_field(order, "trimCode"))
        .and_then(normalize_option_code);
    if let Some(code) = trim_code {
        if let Some((_, name)) = catalog_entry(&code) {
            return Some(name.to_string());
        }
    }

    let codes = split_option_codes(order.get("mktOptions").unwrap_or(&Value::Null));
    for code in &codes {
        if let Some((category, name)) = catalog_entry(code) {
            if category == "Manufacturing" && code.starts_with("MT") {
                return Some(name.to_string());
            }
        }
    }
    for code in &codes {
        if let Some((category, name)) = catalog_entry(code) {
            if category == "Manufacturing" || category == "Vehicle" {
                return Some(name.to_string());
            }
        }
    }
    None
}

/// (base label, full label) for the dashboard heading, e.g.
/// `("Model 3", "Model 3 Long Range AWD")`.
pub fn derive_model_labels(
    order: &Map<String, Value>,
    order_details: &Map<String, Value>,
) -> (String, String) {
    let model_code = str_field(order, "modelCode")
        .or_else(|| str_field(order, "model"))
        .unwrap_or("");
    let base_label = describe_model_code(model_code);
    match lookup_trim_label(order, order_details) {
        Some(trim) => {
            let full = if trim.to_lowercase().starts_with(&base_label.to_lowercase()) {
                trim
            } else {
                format!("{base_label} {trim}")
            };
            (base_label, full)
        }
        None => (base_label.clone(), base_label),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn blob_shapes_all_split_to_codes() {
        assert_eq!(
            split_option_codes(&json!("$MDL3, BT37;ppsw|W38B")),
            vec!["MDL3", "BT37", "PPSW", "W38B"]
        );
        assert_eq!(
            split_option_codes(&json!(["mdl3", "$BT37"])),
            vec!["MDL3", "BT37"]
        );
        assert_eq!(
            split_option_codes(&json!({"optionCodes": ["MDL3", "BT37"], "noise": 9})),
            vec!["MDL3", "BT37"]
        );
        assert_eq!(
            split_option_codes(&json!({"a": "MDL3", "b": 42, "c": {"x": 1}})),
            vec!["MDL3"]
        );
        assert!(split_option_codes(&json!(17)).is_empty());
    }

    #[test]
    fn grouped_output_covers_known_and_unknown_codes() {
        let items = describe_market_options(&json!("MDL3,BT37,PPSW,ZZZ99"));
        let labels: Vec<&str> = items.iter().map(|i| i.label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["Battery Options", "Paint Options", "Vehicle Options", "Option"]
        );
        assert!(items[2].value.contains("Model 3 Platform"));
        assert!(items[3].value.contains("ZZZ99"));
        assert!(items[3].value.contains("Custom configuration"));
    }

    #[test]
    fn code_is_appended_unless_already_in_the_name() {
        let items = describe_market_options(&json!("BT37"));
        assert_eq!(items[0].value, "Long Range battery pack (BT37)");
    }

    #[test]
    fn duplicate_codes_collapse_in_insertion_order() {
        let items = describe_market_options(&json!("PPSW,PPSW,PMNG"));
        assert_eq!(
            items[0].value,
            "Pearl White Multi-Coat paint (PPSW), Midnight Silver Metallic paint (PMNG)"
        );
    }

    #[test]
    fn hint_rules_are_first_match_wins() {
        assert_eq!(infer_option_hint("PPXX"), ("Paint", "Exterior paint option"));
        assert_eq!(infer_option_hint("W99Z"), ("Wheels", "Wheel package"));
        assert_eq!(infer_option_hint("QQQQ"), ("Option", "Custom configuration"));
    }

    #[test]
    fn model_labels_prefer_explicit_trim_name() {
        let order = json!({"modelCode": "my", "mktOptions": "MTY03"})
            .as_object()
            .unwrap()
            .clone();
        let details = json!({}).as_object().unwrap().clone();
        let (base, full) = derive_model_labels(&order, &details);
        assert_eq!(base, "Model Y");
        assert_eq!(full, "Model Y Long Range AWD");

        let details = json!({"trimName": "Model Y Performance"})
            .as_object()
            .unwrap()
            .clone();
        let (_, full) = derive_model_labels(&order, &details);
        assert_eq!(full, "Model Y Performance");
    }

    #[test]
    fn model_code_fallbacks() {
        assert_eq!(describe_model_code(""), "Tesla");
        assert_eq!(describe_model_code("model 3"), "Model 3");
        assert_eq!(describe_model_code("MQ"), "Model Q");
        assert_eq!(describe_model_code("CT"), "Cybertruck");
    }
}
