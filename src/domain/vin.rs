// src/domain/vin.rs
//
// Fixed-position decode of a Tesla VIN. Position semantics:
// 0-2 WMI, 3 model, 4 body, 5 restraints, 6 battery, 7 motor,
// 8 check digit, 9 model year, 10 plant, 11-16 serial.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VinDetails {
    pub manufacturer: String,
    pub model: String,
    pub body_type: String,
    pub restraint_system: String,
    pub battery_type: String,
    pub motor: String,
    pub year: Option<i32>,
    pub factory: String,
    pub serial: String,
    pub check_digit: String,
}

fn wmi_label(code: &str) -> &'static str {
    match code {
        "5YJ" => "Tesla Inc. (USA) - Passenger",
        "7SA" => "Tesla Inc. (USA) - MPV (Austin/Fremont)",
        "7G2" => "Tesla Inc. (USA) - Truck",
        "LRW" => "Tesla Inc. (China)",
        "XP7" => "Tesla Inc. (Germany)",
        "SFZ" => "Tesla Inc. (UK)",
        _ => "Unknown",
    }
}

fn model_label(code: char) -> &'static str {
    match code {
        'S' => "Model S",
        '3' => "Model 3",
        'X' => "Model X",
        'Y' => "Model Y",
        'R' => "Roadster",
        'T' => "Semi",
        'C' => "Cybertruck",
        _ => "Unknown",
    }
}

fn body_type_label(code: char) -> &'static str {
    match code {
        'A' => "Liftback / 5-door (Model S LHD)",
        'B' => "Liftback / 5-door (Model S RHD)",
        'C' => "SUV / MPV (Model X LHD)",
        'D' => "SUV / MPV (Model X RHD)",
        'E' => "Sedan / 4-door (Model 3 LHD)",
        'F' => "Sedan / 4-door (Model 3 RHD)",
        'G' => "Crossover SUV / 5-door (Model Y LHD)",
        'H' => "Crossover SUV / 5-door (Model Y RHD)",
        'J' => "Pickup / Light Duty (Cybertruck AWD)",
        'K' => "Pickup / Light Duty (Cybertruck Tri-Motor)",
        'P' => "Day-cab Tractor (Semi LHD)",
        'R' => "Day-cab Tractor (Semi RHD)",
        _ => "Unknown",
    }
}

fn restraint_label(code: char) -> &'static str {
    match code {
        '1' => "Manual Type 2 Seatbelts (Front, Rear*3) with Front Airbags",
        '3' => "Manual Type 2 Seatbelts (Front, Rear*2) with Front/Side Airbags",
        '4' => "Manual Type 2 Seatbelts (Front, Rear*3) with Front/Side Airbags",
        '5' => "Manual Type 2 Seatbelts (Front, Rear*2) with Front/Side Airbags",
        '6' => "Manual Type 2 Seatbelts (Front, Rear*3) with Front/Side Airbags",
        '7' => "Type 2 Seatbelts (Front, Rear*3) with Front Airbags & Side Inflatable Restraints",
        'A' => "Manual Seatbelts (Front, Rear*3) with Front Airbags & Side Inflatable Restraints",
        'B' => "Manual Seatbelts (Front, Rear*2) with Front Airbags & Side Inflatable Restraints",
        'C' => "Manual Seatbelts (Front, Rear*3) with Front Airbags & Side Inflatable Restraints",
        'D' => "Manual Seatbelts (Front, Rear*2) with Front Airbags & Side Inflatable Restraints",
        'H' => {
            "Manual Seatbelts (Front, Rear*3) with Front Airbags & Side Inflatable Restraints (Truck)"
        }
        _ => "Unknown",
    }
}

// Battery falls back to plain "Electric" rather than "Unknown"; every
// Tesla has one.
fn battery_label(code: char) -> &'static str {
    match code {
        'E' => "Lithium Ion (Electric)",
        'F' => "Lithium Iron Phosphate (LFP)",
        'H' => "Lithium Ion - High Capacity",
        'S' => "Lithium Ion - Standard",
        'V' => "Lithium Ion - Ultra High Capacity",
        _ => "Electric",
    }
}

fn motor_label(code: char) -> &'static str {
    match code {
        '1' => "Single Motor - Standard",
        '2' => "Dual Motor - Standard",
        '3' => "Single Motor - Performance",
        '4' => "Dual Motor - Performance",
        '5' => "Plaid (Tri Motor)",
        '6' => "Triple Motor",
        'A' => "Single Motor - Standard (3/Y)",
        'B' => "Dual Motor - Standard (3/Y)",
        'C' => "Dual Motor - Performance (3/Y)",
        'D' => "Dual Motor - Standard (Truck/Cybertruck)",
        'E' => "Dual Motor - Standard (Front/Rear)",
        'F' => "Quad Motor",
        'J' => "Single Motor (Highland)",
        'K' => "Dual Motor (Highland)",
        'L' => "Single Motor",
        'R' => "Single Motor (Rear)",
        'S' => "Single Motor (Standard)",
        'T' => "Dual Motor (Highland/New)",
        'X' => "Dual Motor (Cybertruck)",
        'Y' => "Tri Motor (Cyberbeast)",
        _ => "Unknown",
    }
}

// VIN year codes repeat every 30 years; this window covers 2010-2039.
fn model_year(code: char) -> Option<i32> {
    let year = match code {
        'A' => 2010,
        'B' => 2011,
        'C' => 2012,
        'D' => 2013,
        'E' => 2014,
        'F' => 2015,
        'G' => 2016,
        'H' => 2017,
        'J' => 2018,
        'K' => 2019,
        'L' => 2020,
        'M' => 2021,
        'N' => 2022,
        'P' => 2023,
        'R' => 2024,
        'S' => 2025,
        'T' => 2026,
        'V' => 2027,
        'W' => 2028,
        'X' => 2029,
        'Y' => 2030,
        '1' => 2031,
        '2' => 2032,
        '3' => 2033,
        '4' => 2034,
        '5' => 2035,
        '6' => 2036,
        '7' => 2037,
        '8' => 2038,
        '9' => 2039,
        _ => return None,
    };
    Some(year)
}

fn plant_label(code: char) -> &'static str {
    match code {
        'A' => "Austin, Texas, USA",
        'B' => "Berlin, Germany",
        'C' => "Shanghai, China",
        'F' => "Fremont, California, USA",
        'P' => "Palo Alto, California, USA",
        'R' => "Reno, Nevada, USA",
        _ => "Unknown",
    }
}

/// Decode a 17-character VIN. Anything else returns `None`.
pub fn decode(vin: &str) -> Option<VinDetails> {
    let trimmed = vin.trim();
    if trimmed.len() != 17 || !trimmed.is_ascii() {
        return None;
    }
    let chars: Vec<char> = trimmed.chars().collect();

    Some(VinDetails {
        manufacturer: wmi_label(&trimmed[..3]).to_string(),
        model: model_label(chars[3]).to_string(),
        body_type: body_type_label(chars[4]).to_string(),
        restraint_system: restraint_label(chars[5]).to_string(),
        battery_type: battery_label(chars[6]).to_string(),
        motor: motor_label(chars[7]).to_string(),
        check_digit: chars[8].to_string(),
        year: model_year(chars[9]),
        factory: plant_label(chars[10]).to_string(),
        serial: trimmed[11..].to_string(),
    })
}

impl VinDetails {
    /// Rows for the dashboard's VIN table.
    pub fn rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Manufacturer", self.manufacturer.clone()),
            ("Model", self.model.clone()),
            ("Body Type", self.body_type.clone()),
            ("Restraint System", self.restraint_system.clone()),
            ("Battery Type", self.battery_type.clone()),
            ("Motor", self.motor.clone()),
            (
                "Year",
                self.year
                    .map(|y| y.to_string())
                    .unwrap_or_else(|| "Unknown".to_string()),
            ),
            ("Factory", self.factory.clone()),
            ("Serial Number", self.serial.clone()),
            ("Check Digit", self.check_digit.clone()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_a_fremont_model_3() {
        let details = decode("5YJ3E1EB4KF000316").unwrap();
        assert_eq!(details.manufacturer, "Tesla Inc. (USA) - Passenger");
        assert_eq!(details.model, "Model 3");
        assert_eq!(details.body_type, "Sedan / 4-door (Model 3 LHD)");
        assert_eq!(details.battery_type, "Lithium Ion (Electric)");
        assert_eq!(details.motor, "Dual Motor - Standard (3/Y)");
        assert_eq!(details.year, Some(2019));
        assert_eq!(details.factory, "Fremont, California, USA");
        assert_eq!(details.serial, "000316");
        assert_eq!(details.check_digit, "4");
    }

    #[test]
    fn unknown_positions_degrade_gracefully()  {
        let details = decode("ZZZZZZZZZZZ123456").unwrap();
        assert_eq!(details.manufacturer, "Unknown");
        assert_eq!(details.battery_type, "Electric");
        assert_eq!(details.year, None);
        assert_eq!(details.serial, "123456");
    }

    #[test]
    fn wrong_length_is_rejected() {
        assert!(decode("").is_none());
        assert!(decode("5YJ3").is_none());
        assert!(decode("5YJ3E1EB4KF0003160").is_none());
    }
}
