//! units.rs - magnitude-based unit promotion for display
//!
//! the hub stores raw quantities (V, mA, W, mWh); the dashboard shows the
//! closest human-sized unit. thresholds and rounding follow the dashboard's
//! widget contract: one decimal everywhere, except the line-voltage widget
//! which shows two decimals to match the firmware's serial log.

/// quantity kinds the dashboard renders
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Quantity {
    /// input in watts
    Power,
    /// input in milliamps
    Current,
    /// input in volts
    Voltage,
    /// input in milliwatt-hours
    Energy,
}

/// promote a raw value to a display unit and round to one decimal.
///
/// non-finite input renders as ("0.0", "").
pub fn format_value(value: f64, quantity: Quantity) -> (String, &'static str) {
    if !value.is_finite() {
        return ("0.0".to_string(), "");
    }

    let (scaled, unit) = match quantity {
        Quantity::Power => {
            if value >= 1000.0 {
                (value / 1000.0, "kW")
            } else {
                (value, "W")
            }
        }
        Quantity::Current => {
            if value >= 1000.0 {
                (value / 1000.0, "A")
            } else {
                (value, "mA")
            }
        }
        Quantity::Voltage => (value, "V"),
        Quantity::Energy => {
            // 1 kWh = 1,000,000 mWh
            if value >= 1_000_000.0 {
                (value / 1_000_000.0, "kWh")
            } else if value >= 1000.0 {
                (value / 1000.0, "Wh")
            } else {
                (value, "mWh")
            }
        }
    };

    (format!("{:.1}", scaled), unit)
}

/// line-voltage widget value, two decimals (serial-log precision)
pub fn format_line_voltage(value: f64) -> String {
    if !value.is_finite() {
        return "0.00".to_string();
    }
    format!("{:.2}", value)
}
