//! reading.rs - telemetry sample and the lenient ingest form
//!
//! the meter firmware is the only producer and it never gets an error back:
//! whatever shape arrives in the POST body is absorbed, field by field, into
//! a fully-populated Reading. missing or garbage numerics become 0, a missing
//! device id becomes the default meter, a missing timestamp becomes the
//! hub's receipt time.
//!
//! the stored `timestamp` is the device's own clock (ms since boot) when the
//! firmware supplies it. it is kept for display only and is never compared
//! against hub time; staleness works off receipt time (see freshness.rs).

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// device id used when a payload or query does not name one
pub const DEFAULT_DEVICE_ID: &str = "esp32_1";

/// one stored telemetry sample, wire form camelCase
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reading {
    /// meter identifier (e.g., "esp32_1")
    pub device_id: String,
    /// line voltage in volts
    pub voltage: f64,
    /// current in milliamps
    pub current: f64,
    /// real power in watts
    pub power: f64,
    /// raw ADC count from the voltage sensor pin
    pub raw_adc: i64,
    /// device uptime ms if the firmware sent one, hub receipt ms otherwise
    pub timestamp: u64,
}

/// ingest form: every field optional, every field any JSON type.
/// the firmware sends numbers, but string payloads (and worse) coerce
/// instead of erroring.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawReading {
    #[serde(default)]
    pub device_id: Option<Value>,
    #[serde(default)]
    pub voltage: Option<Value>,
    #[serde(default)]
    pub current: Option<Value>,
    #[serde(default)]
    pub power: Option<Value>,
    #[serde(default)]
    pub raw_adc: Option<Value>,
    #[serde(default)]
    pub timestamp: Option<Value>,
}

impl Reading {
    /// normalize a raw payload into a stored Reading.
    ///
    /// `receipt_ms` is the hub clock at ingest and fills in for an absent
    /// (or zero) producer timestamp.
    pub fn from_raw(raw: RawReading, receipt_ms: u64) -> Self {
        Self {
            device_id: coerce_device_id(raw.device_id.as_ref()),
            voltage: coerce_float(raw.voltage.as_ref()),
            current: coerce_float(raw.current.as_ref()),
            power: coerce_float(raw.power.as_ref()),
            raw_adc: coerce_int(raw.raw_adc.as_ref()),
            timestamp: coerce_timestamp(raw.timestamp.as_ref()).unwrap_or(receipt_ms),
        }
    }
}

/// missing or empty id falls back to the default meter
fn coerce_device_id(v: Option<&Value>) -> String {
    match v {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        _ => DEFAULT_DEVICE_ID.to_string(),
    }
}

/// lenient float: numbers pass through, numeric strings parse,
/// everything else (and NaN/inf) is 0
fn coerce_float(v: Option<&Value>) -> f64 {
    let parsed = match v {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match parsed {
        Some(f) if f.is_finite() => f,
        _ => 0.0,
    }
}

/// lenient integer: fractional input truncates, garbage is 0
fn coerce_int(v: Option<&Value>) -> i64 {
    match v {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64))
            .unwrap_or(0),
        Some(Value::String(s)) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f as i64))
                .unwrap_or(0)
        }
        _ => 0,
    }
}

/// producer timestamp, if usable. zero counts as absent so the receipt
/// time takes over (a meter that just booted reports millis() ~ 0).
fn coerce_timestamp(v: Option<&Value>) -> Option<u64> {
    let parsed = match v {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite() && *f >= 0.0).map(|f| f as u64)),
        Some(Value::String(s)) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    parsed.filter(|&t| t > 0)
}
