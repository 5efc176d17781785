use std::time::Duration;

use dapp_core::DetectResult;

pub type RequestId = u64;

pub const DEFAULT_PROBE_TIMEOUT_MS: i64 = 8_000;
pub const DEFAULT_USER_AGENT: &str = concat!("dapp-probe/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeSettings {
    /// Budget for the whole pending phase. `None` waits for the surface to
    /// resolve on its own.
    pub timeout: Option<Duration>,
}

impl ProbeSettings {
    /// Values `<= 0` disable the timer.
    pub fn from_timeout_ms(timeout_ms: i64) -> Self {
        let timeout = u64::try_from(timeout_ms)
            .ok()
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis);
        Self { timeout }
    }
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self::from_timeout_ms(DEFAULT_PROBE_TIMEOUT_MS)
    }
}

#[derive(Debug, Clone)]
pub struct SurfaceSettings {
    pub connect_timeout: Duration,
    /// Upper bound for a single load, independent of the probe timer.
    pub load_timeout: Duration,
    pub redirect_limit: usize,
    pub user_agent: String,
}

impl Default for SurfaceSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            load_timeout: Duration::from_secs(30),
            redirect_limit: 10,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FaviconSettings {
    pub request_timeout: Duration,
    pub max_page_bytes: u64,
    pub max_icon_bytes: u64,
    pub user_agent: String,
}

impl Default for FaviconSettings {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(10),
            max_page_bytes: 1024 * 1024,
            max_icon_bytes: 256 * 1024,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DetectorConfig {
    pub probe: ProbeSettings,
    pub surface: SurfaceSettings,
    pub favicon: FaviconSettings,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetectEvent {
    Completed {
        request_id: RequestId,
        url: String,
        result: DetectResult,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to start detector runtime: {0}")]
    Runtime(#[from] std::io::Error),
}
