//! config.rs - Runtime Configuration Loader
//!
//! defines the schema for `hub.toml` and loads it from file, falling back
//! to defaults when no file is present.
//!
//! structure:
//!     - ServerConfig:  where the hub's HTTP API listens.
//!     - ClusterConfig: which role this process plays (hub, spoke, monitor)
//!       and, for the client roles, which hub to talk to.
//!     - PushConfig:    cadence and waveform baselines for the simulated
//!       meter (spoke role).
//!     - LoggingConfig: default log level, reading echo toggle.
//!
//! note: the staleness window (10 s) and the dashboard poll period (2 s)
//! are policy constants in freshness.rs, not configuration.

use serde::Deserialize;
use std::path::Path;

/// Root configuration structure
#[derive(Debug, Deserialize, Clone, Default)]
pub struct HubConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub cluster: ClusterConfig,
    #[serde(default)]
    pub push: PushConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ClusterConfig {
    pub role: String, // "hub", "spoke" or "monitor"
    pub node_id: String,
    pub hub_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PushConfig {
    pub interval_seconds: u64,
    pub base_voltage: f64,
    pub base_current_ma: f64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub show_readings: bool,
}

impl HubConfig {
    /// Load configuration from file
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| anyhow::anyhow!("Failed to read config file: {}", e))?;

        let config: HubConfig = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config: {}", e))?;

        Ok(config)
    }

    /// Load with default fallback
    pub fn load_or_default() -> Self {
        let paths = [
            std::path::PathBuf::from("config").join("hub.toml"),
            std::path::PathBuf::from("..").join("config").join("hub.toml"),
        ];

        for path in &paths {
            if path.exists() {
                match Self::load(path) {
                    Ok(config) => {
                        println!("[CONFIG] Loaded from {}", path.display());
                        return config;
                    }
                    Err(e) => {
                        println!("[CONFIG] Warning: Failed to load {}: {}", path.display(), e);
                    }
                }
            }
        }

        println!("[CONFIG] Warning: No config file found - using defaults");
        Self::default()
    }

    /// Print configuration summary
    pub fn print_summary(&self) {
        println!("┌─────────────────────────────────────────┐");
        println!("│            HUB CONFIGURATION            │");
        println!("├─────────────────────────────────────────┤");
        println!("│ Role: {:<34}│", self.cluster.role);
        println!("│ Node ID: {:<31}│", self.cluster.node_id);
        println!("│ Listen: {:<32}│", self.server_address());
        println!("│ Hub URL: {:<31}│", self.cluster.hub_url);
        println!("│ Push Interval: {}s{:<24}│", self.push.interval_seconds, "");
        println!("│ Log Level: {:<29}│", self.logging.level);
        println!("└─────────────────────────────────────────┘");
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.bind_address, self.server.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            role: "hub".to_string(),
            node_id: crate::reading::DEFAULT_DEVICE_ID.to_string(),
            hub_url: "http://localhost:3000".to_string(),
        }
    }
}

impl Default for PushConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 3,
            base_voltage: 120.0,
            base_current_ma: 250.0,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            show_readings: true,
        }
    }
}
