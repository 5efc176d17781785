use dapp_core::SurfaceSignal;
use probe_logging::probe_trace;
use tokio::sync::mpsc;

pub type SignalSender = mpsc::UnboundedSender<SurfaceSignal>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SurfaceError {
    #[error("failed to create rendering surface: {0}")]
    Create(String),
}

/// Creates isolated browsing contexts, one per probe.
pub trait SurfaceProvider: Send + Sync {
    /// The surface reports load progress through `signals` until disposed.
    fn create(&self, signals: SignalSender) -> Result<Box<dyn Surface>, SurfaceError>;
}

pub trait Surface: Send {
    fn navigate(&mut self, url: &str);
    /// Stops any in-flight load and drops the signal sender.
    fn dispose(&mut self);
}

/// Exclusive ownership of a surface for one probe session. Disposes it once,
/// either on explicit release or when dropped.
pub(crate) struct SurfaceLease {
    surface: Option<Box<dyn Surface>>,
}

impl SurfaceLease {
    pub(crate) fn new(surface: Box<dyn Surface>) -> Self {
        Self {
            surface: Some(surface),
        }
    }

    pub(crate) fn navigate(&mut self, url: &str) {
        if let Some(surface) = self.surface.as_mut() {
            surface.navigate(url);
        }
    }

    pub(crate) fn release(&mut self) {
        if let Some(mut surface) = self.surface.take() {
            probe_trace!("disposing rendering surface");
            surface.dispose();
        }
    }
}

impl Drop for SurfaceLease {
    fn drop(&mut self) {
        self.release();
    }
}
