use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use dapp_engine::{
    DetectorConfig, FaviconSettings, ProbeSettings, SurfaceSettings, DEFAULT_PROBE_TIMEOUT_MS,
};
use serde::{Deserialize, Serialize};

/// Settings read from the optional RON config file. Missing fields keep
/// their defaults; command-line flags override what the file says.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Probe budget in milliseconds; `<= 0` disables it.
    pub timeout_ms: i64,
    pub connect_timeout_ms: u64,
    pub load_timeout_ms: u64,
    pub redirect_limit: usize,
    pub user_agent: String,
    pub favicon_timeout_ms: u64,
    pub max_page_bytes: u64,
    pub max_icon_bytes: u64,
    pub registry: PathBuf,
}

impl Default for CliConfig {
    fn default() -> Self {
        let surface = SurfaceSettings::default();
        let favicon = FaviconSettings::default();
        Self {
            timeout_ms: DEFAULT_PROBE_TIMEOUT_MS,
            connect_timeout_ms: millis(surface.connect_timeout),
            load_timeout_ms: millis(surface.load_timeout),
            redirect_limit: surface.redirect_limit,
            user_agent: surface.user_agent,
            favicon_timeout_ms: millis(favicon.request_timeout),
            max_page_bytes: favicon.max_page_bytes,
            max_icon_bytes: favicon.max_icon_bytes,
            registry: PathBuf::from("dapps.ron"),
        }
    }
}

impl CliConfig {
    pub fn detector_config(&self) -> DetectorConfig {
        DetectorConfig {
            probe: ProbeSettings::from_timeout_ms(self.timeout_ms),
            surface: SurfaceSettings {
                connect_timeout: Duration::from_millis(self.connect_timeout_ms),
                load_timeout: Duration::from_millis(self.load_timeout_ms),
                redirect_limit: self.redirect_limit,
                user_agent: self.user_agent.clone(),
            },
            favicon: FaviconSettings {
                request_timeout: Duration::from_millis(self.favicon_timeout_ms),
                max_page_bytes: self.max_page_bytes,
                max_icon_bytes: self.max_icon_bytes,
                user_agent: self.user_agent.clone(),
            },
        }
    }
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<CliConfig> {
    let Some(path) = path else {
        return Ok(CliConfig::default());
    };
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    ron::from_str(&content).with_context(|| format!("failed to parse config {}", path.display()))
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
