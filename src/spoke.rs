//! spoke.rs - simulated meter device
//!
//! stands in for the ESP32 energy meter when exercising the hub without
//! hardware. pushes one reading per interval to POST {hub_url}/readings
//! with the firmware's payload shape:
//!
//! ```text
//!     voltage   volts, rounded to 2 decimals (the firmware snprintfs
//!               "%.2f" so serial log and payload agree)
//!     current   milliamps (firmware sends currentRMS * 1000)
//!     power     watts
//!     rawAdc    raw ADC count
//!     timestamp millis since boot - the device's own clock, NOT wall time
//! ```
//!
//! values oscillate smoothly around the configured baselines so charts
//! look alive. a failed push is logged and the loop carries on; the hub
//! only ever keeps the latest sample anyway.

use crate::config::PushConfig;
use anyhow::Result;
use log::{info, warn};
use std::time::{Duration, Instant};

/// one synthesized sample at `t` seconds of uptime
fn synth_reading(cfg: &PushConfig, t: f64) -> (f64, f64, f64, i64) {
    // slow mains drift plus a faster load wobble
    let voltage = cfg.base_voltage + (t / 40.0).sin() * 1.5;
    let current = (cfg.base_current_ma + (t / 7.0).sin() * cfg.base_current_ma * 0.4).max(0.0);
    // power tracks current at the line voltage (current is in mA)
    let power = voltage * current / 1000.0;
    // 12-bit ADC, mid-rail plus the same drift
    let raw_adc = (2048.0 + (t / 40.0).sin() * 300.0) as i64;

    // firmware precision: volts 2dp, mA and W 1dp
    (
        (voltage * 100.0).round() / 100.0,
        (current * 10.0).round() / 10.0,
        (power * 10.0).round() / 10.0,
        raw_adc,
    )
}

/// push loop; runs until the process is stopped
pub async fn run_spoke(hub_url: &str, node_id: &str, cfg: &PushConfig) -> Result<()> {
    let client = reqwest::Client::new();
    let endpoint = format!("{}/readings", hub_url.trim_end_matches('/'));
    let boot = Instant::now();

    info!("Spoke {} pushing to {} every {}s", node_id, endpoint, cfg.interval_seconds);

    let mut ticker = tokio::time::interval(Duration::from_secs(cfg.interval_seconds.max(1)));
    loop {
        ticker.tick().await;

        let uptime_ms = boot.elapsed().as_millis() as u64;
        let (voltage, current, power, raw_adc) = synth_reading(cfg, uptime_ms as f64 / 1000.0);

        let payload = serde_json::json!({
            "deviceId": node_id,
            "voltage": voltage,
            "current": current,
            "power": power,
            "rawAdc": raw_adc,
            "timestamp": uptime_ms,
        });

        match client.post(&endpoint).json(&payload).send().await {
            Ok(resp) if resp.status().is_success() => {
                info!("POST success: {} ({:.2} V, {:.1} mA, {:.1} W)", resp.status(), voltage, current, power);
            }
            Ok(resp) => {
                warn!("POST failed: {}", resp.status());
            }
            Err(e) => {
                warn!("POST failed: {}", e);
            }
        }
    }
}
