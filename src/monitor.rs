//! monitor.rs - dashboard-side consumer of the hub
//!
//! polls GET {hub_url}/latest every 2 s the way the browser dashboard
//! does, feeds the freshness state machine, and renders the reading
//! through the unit-promotion layer. the terminal output is the same
//! data contract the dashboard widgets consume: total power, total
//! current, line voltage at serial precision, today's energy.
//!
//! a poll counts as live only when the body is a non-empty object with at
//! least one telemetry field present; an empty body, a non-2xx response
//! or a transport error all degrade to Offline without ever aborting the
//! loop.

use crate::clock::system_clock;
use crate::freshness::{ConnectionMonitor, ConnectionState, POLL_INTERVAL_MS};
use crate::units::{format_line_voltage, format_value, Quantity};
use anyhow::Result;
use log::{info, warn};
use serde_json::Value;
use std::time::Duration;

/// the dashboard's widget mapping of a stored reading.
///
/// current is milliamps end to end (the firmware already multiplies by
/// 1000); today-energy has no live source and is pinned at zero.
#[derive(Debug, PartialEq)]
pub struct DashboardData {
    pub total_power: f64,
    pub total_current: f64,
    pub line_voltage: f64,
    pub today_energy: f64,
}

impl DashboardData {
    pub fn from_reading(body: &Value) -> Self {
        let num = |key: &str| body.get(key).and_then(Value::as_f64).unwrap_or(0.0);
        Self {
            total_power: num("power"),
            total_current: num("current"),
            line_voltage: num("voltage"),
            today_energy: 0.0,
        }
    }

    /// one log line with every widget's value and promoted unit
    pub fn render(&self) -> String {
        let (power, power_unit) = format_value(self.total_power, Quantity::Power);
        let (current, current_unit) = format_value(self.total_current, Quantity::Current);
        let (energy, energy_unit) = format_value(self.today_energy, Quantity::Energy);
        format!(
            "Power {} {} | Current {} {} | Line Voltage {} V | Today {} {}",
            power,
            power_unit,
            current,
            current_unit,
            format_line_voltage(self.line_voltage),
            energy,
            energy_unit
        )
    }
}

/// does this body carry telemetry? mirrors the dashboard's check: a
/// non-empty object with voltage, current or power present.
pub fn has_telemetry(body: &Value) -> bool {
    match body.as_object() {
        Some(map) if !map.is_empty() => {
            map.contains_key("voltage") || map.contains_key("current") || map.contains_key("power")
        }
        _ => false,
    }
}

/// poll loop; runs until the process is stopped
pub async fn run_monitor(hub_url: &str, device_id: &str) -> Result<()> {
    let client = reqwest::Client::new();
    let endpoint = format!("{}/latest", hub_url.trim_end_matches('/'));
    let mut monitor = ConnectionMonitor::new(system_clock());
    let mut shown = ConnectionState::Offline;

    info!("Monitoring {} for device {} every {}ms", endpoint, device_id, POLL_INTERVAL_MS);

    let mut ticker = tokio::time::interval(Duration::from_millis(POLL_INTERVAL_MS));
    loop {
        ticker.tick().await;

        match fetch_latest(&client, &endpoint, device_id).await {
            Ok(body) if has_telemetry(&body) => {
                monitor.record_reading();
                info!("{}", DashboardData::from_reading(&body).render());
            }
            Ok(_) => {
                // hub reachable, nothing stored for this device
                monitor.record_empty();
            }
            Err(e) => {
                warn!("Failed to fetch latest reading: {}", e);
                monitor.record_error();
            }
        }

        // staleness check runs every tick, not only after a fresh poll
        let status = monitor.status();
        let state = if status.connected {
            ConnectionState::Live
        } else {
            ConnectionState::Offline
        };
        if state != shown {
            match state {
                ConnectionState::Live => info!("🟢 Live ({})", device_id),
                ConnectionState::Offline => info!("🔴 Offline"),
            }
            shown = state;
        }
    }
}

async fn fetch_latest(client: &reqwest::Client, endpoint: &str, device_id: &str) -> Result<Value> {
    let resp = client
        .get(endpoint)
        .query(&[("deviceId", device_id)])
        .send()
        .await?;
    if !resp.status().is_success() {
        anyhow::bail!("HTTP {}", resp.status());
    }
    Ok(resp.json::<Value>().await?)
}
