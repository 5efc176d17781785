//! Dapp engine: surface-driven probing, favicon lookup and detection IO.
mod classify;
mod decode;
mod detect;
mod engine;
mod favicon;
mod http_surface;
mod icons;
mod persist;
mod prober;
mod surface;
mod types;

pub use decode::{decode_page, DecodeError};
pub use detect::DappDetector;
pub use engine::DetectorHandle;
pub use favicon::{FaviconError, FaviconResolver, HttpFaviconResolver};
pub use http_surface::{HttpSurface, HttpSurfaceProvider};
pub use icons::{default_favicon_url, find_icon_link};
pub use persist::{ensure_dir, write_atomically, PersistError};
pub use prober::Prober;
pub use surface::{SignalSender, Surface, SurfaceError, SurfaceProvider};
pub use types::{
    DetectEvent, DetectorConfig, EngineError, FaviconSettings, ProbeSettings, RequestId,
    SurfaceSettings, DEFAULT_PROBE_TIMEOUT_MS, DEFAULT_USER_AGENT,
};
