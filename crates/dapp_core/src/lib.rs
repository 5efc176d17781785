//! Dapp core: URL canonicalization, the pure probe state machine and
//! detection result types.
mod canonical;
mod dapp;
mod detect;
mod effect;
mod event;
mod state;
mod update;
mod verdict;

pub use canonical::{canonicalize_dapp_url, CanonicalUrl, CanonicalizeError};
pub use dapp::{find_repeat, DappData, DappRecord, FaviconInfo, IconInfo};
pub use detect::{DetectError, DetectErrorKind, DetectResult};
pub use effect::Effect;
pub use event::{ProbeEvent, SurfaceSignal};
pub use state::{Phase, ProbeSession};
pub use update::{update, ABORTED_CODE};
pub use verdict::{
    is_certificate_code, strip_net_prefix, CertError, InvalidReason, ProbeVerdict,
    CERT_ERROR_PREFIX, NET_ERROR_PREFIX,
};
