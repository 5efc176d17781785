/// Signals a rendering surface reports while loading a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceSignal {
    /// Page finished loading; `final_url` reflects any redirects.
    LoadCompleted { final_url: String },
    /// Page failed to load. Certificate failures also surface here, with a
    /// `ERR_CERT_*` code, ahead of the matching `CertificateError`.
    LoadFailed { code: String },
    /// TLS validation failed; `code` is usually `net::ERR_CERT_*`.
    CertificateError { code: String },
}

/// Inputs driving a probe session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeEvent {
    /// Session begins; issues the navigation.
    Start,
    Surface(SurfaceSignal),
    /// The probe deadline elapsed.
    TimerFired,
    /// The surface dropped its signal sender without reporting a terminal signal.
    SignalsClosed,
}

impl From<SurfaceSignal> for ProbeEvent {
    fn from(signal: SurfaceSignal) -> Self {
        ProbeEvent::Surface(signal)
    }
}
