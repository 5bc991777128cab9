//! main.rs - telemetry hub entry point
//!
//! purpose:
//!     one binary, three roles, picked by `cluster.role` in hub.toml:
//!
//!     hub      the ingest/read service. keeps the latest reading per
//!              meter in memory and serves it over HTTP. volatile by
//!              design: a restart forgets everything, and the meter
//!              re-pushes within seconds.
//!     spoke    a simulated meter. pushes firmware-shaped readings to a
//!              hub on a fixed cadence.
//!     monitor  a dashboard stand-in. polls the hub every 2 s, tracks
//!              live/offline through the 10 s staleness window, renders
//!              unit-promoted values.
//!
//! architecture:
//!
//!     ┌────────┐  POST /readings  ┌───────────────┐  GET /latest  ┌─────────┐
//!     │ meter  │ ───────────────> │      hub      │ <──────────── │ monitor │
//!     │ (spoke)│                  │  LatestStore  │               │ 2s poll │
//!     └────────┘                  │ one slot/meter│               │ 10s window
//!                                 └───────────────┘               └─────────┘

use anyhow::Result;
use sem_hub::{clock, config, monitor, spoke, store, web};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    // startup banner
    println!("===========================================================");
    println!("  Smart Energy Meter - Telemetry Hub");
    println!("===========================================================");

    // step 1: load configuration
    let config = config::HubConfig::load_or_default();
    config.print_summary();

    env_logger::init_from_env(
        env_logger::Env::new().default_filter_or(config.logging.level.as_str()),
    );

    // step 2: dispatch on role
    match config.cluster.role.as_str() {
        "hub" => {
            let state = web::AppState {
                store: Arc::new(store::LatestStore::new(clock::system_clock())),
                show_readings: config.logging.show_readings,
            };
            web::run_server(&config.server_address(), state).await
        }
        "spoke" => {
            spoke::run_spoke(&config.cluster.hub_url, &config.cluster.node_id, &config.push).await
        }
        "monitor" => monitor::run_monitor(&config.cluster.hub_url, &config.cluster.node_id).await,
        other => {
            anyhow::bail!("Unknown cluster role '{}' (expected hub, spoke or monitor)", other)
        }
    }
}
