//! Client configuration (server link, frame pacing, offline demo, simulation tuning).
//! Loaded from config.ron at startup.

use fleet::SimTuning;
use net::PING_INTERVAL_SECS;
use serde::{Deserialize, Serialize};

/// Persistent client settings. Loaded from `config.ron` in the current directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Websocket endpoint of the game server.
    #[serde(default = "default_server_url")]
    pub server_url: String,
    /// Skip the server and run the seeded offline demo.
    #[serde(default)]
    pub offline: bool,
    /// Simulation frames per second.
    #[serde(default = "default_frame_rate")]
    pub frame_rate: u32,
    /// Seconds between keepalive pings.
    #[serde(default = "default_ping_interval")]
    pub ping_interval_secs: f32,
    /// How long the offline demo runs.
    #[serde(default = "default_demo_seconds")]
    pub demo_seconds: f32,
    /// Colonies generated for the offline demo.
    #[serde(default = "default_seed_colonies")]
    pub seed_colonies: usize,
    /// Fixed seed for seeding and weapon cooldowns. Random when absent.
    #[serde(default)]
    pub rng_seed: Option<u64>,
    #[serde(default)]
    pub tuning: SimTuning,
}

fn default_server_url() -> String {
    "ws://127.0.0.1:8000/ws".to_string()
}
fn default_frame_rate() -> u32 {
    60
}
fn default_ping_interval() -> f32 {
    PING_INTERVAL_SECS
}
fn default_demo_seconds() -> f32 {
    40.0
}
fn default_seed_colonies() -> usize {
    3
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            offline: false,
            frame_rate: default_frame_rate(),
            ping_interval_secs: default_ping_interval(),
            demo_seconds: default_demo_seconds(),
            seed_colonies: default_seed_colonies(),
            rng_seed: None,
            tuning: SimTuning::default(),
        }
    }
}

impl GameConfig {
    /// Load config from `config.ron`. If the file is missing or invalid, returns default config.
    pub fn load() -> Self {
        let path = config_path();
        if let Ok(data) = std::fs::read_to_string(&path) {
            match Self::from_ron(&data) {
                Ok(c) => return c,
                Err(e) => log::warn!("Invalid config at {:?}: {}, using defaults", path, e),
            }
        }
        Self::default()
    }

    pub fn from_ron(data: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(data).map(Self::sanitized)
    }

    /// Replace values the frame loop cannot run with.
    fn sanitized(mut self) -> Self {
        if !(self.ping_interval_secs.is_finite() && self.ping_interval_secs > 0.0) {
            log::warn!(
                "ping_interval_secs {} is not a positive duration, using {}",
                self.ping_interval_secs,
                PING_INTERVAL_SECS
            );
            self.ping_interval_secs = PING_INTERVAL_SECS;
        }
        self
    }

    /// Seconds per simulation frame.
    pub fn frame_delta(&self) -> f32 {
        1.0 / self.frame_rate.max(1) as f32
    }
}

fn config_path() -> std::path::PathBuf {
    std::env::current_dir().unwrap_or_else(|_| std::path::PathBuf::from(".")).join("config.ron")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_empty_uses_defaults() {
        let config = GameConfig::from_ron("()").unwrap();
        assert_eq!(config.server_url, "ws://127.0.0.1:8000/ws");
        assert!(!config.offline);
        assert_eq!(config.frame_rate, 60);
        assert_eq!(config.seed_colonies, 3);
        assert_eq!(config.tuning, SimTuning::default());
    }

    #[test]
    fn config_partial_tuning_keeps_other_defaults() {
        let config = GameConfig::from_ron(
            "(offline: true, rng_seed: Some(9), tuning: (max_speed: 3.0))",
        )
        .unwrap();
        assert!(config.offline);
        assert_eq!(config.rng_seed, Some(9));
        assert_eq!(config.tuning.max_speed, 3.0);
        assert_eq!(config.tuning.snap_threshold, 5.0);
    }

    #[test]
    fn config_non_positive_ping_interval_falls_back() {
        let config = GameConfig::from_ron("(ping_interval_secs: 0.0)").unwrap();
        assert_eq!(config.ping_interval_secs, PING_INTERVAL_SECS);
        let config = GameConfig::from_ron("(ping_interval_secs: -3.0)").unwrap();
        assert_eq!(config.ping_interval_secs, PING_INTERVAL_SECS);
        let config = GameConfig::from_ron("(ping_interval_secs: 5.0)").unwrap();
        assert_eq!(config.ping_interval_secs, 5.0);
    }

    #[test]
    fn config_round_trips_through_ron() {
        let config = GameConfig {
            frame_rate: 30,
            ..Default::default()
        };
        let text = ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::default()).unwrap();
        let back = GameConfig::from_ron(&text).unwrap();
        assert_eq!(back.frame_rate, 30);
        assert!((back.frame_delta() - 1.0 / 30.0).abs() < 1e-6);
    }
}
