use std::sync::Arc;
use std::time::Duration;

use dapp_core::{update, Effect, InvalidReason, ProbeEvent, ProbeSession, ProbeVerdict, SurfaceSignal};
use probe_logging::{probe_debug, probe_error, probe_trace};
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio::time::Instant;

use crate::classify::ERR_FAILED;
use crate::surface::{SurfaceLease, SurfaceProvider};
use crate::ProbeSettings;

/// Drives one probe session per call: creates a surface, feeds its signals
/// and the deadline into the session state machine and applies the effects.
#[derive(Clone)]
pub struct Prober {
    provider: Arc<dyn SurfaceProvider>,
    settings: ProbeSettings,
}

impl Prober {
    pub fn new(provider: Arc<dyn SurfaceProvider>, settings: ProbeSettings) -> Self {
        Self { provider, settings }
    }

    pub async fn probe(&self, url: &str) -> ProbeVerdict {
        self.probe_with_timeout(url, self.settings.timeout).await
    }

    /// Dropping the returned future before it completes still disposes the surface.
    pub async fn probe_with_timeout(&self, url: &str, timeout: Option<Duration>) -> ProbeVerdict {
        let (signals_tx, mut signals_rx) = mpsc::unbounded_channel();
        let surface = match self.provider.create(signals_tx) {
            Ok(surface) => surface,
            Err(err) => {
                probe_error!("probe of {} could not start: {}", url, err);
                return ProbeVerdict::Invalid(InvalidReason::Inaccessible {
                    code: ERR_FAILED.to_string(),
                });
            }
        };
        let mut lease = SurfaceLease::new(surface);
        let deadline = timeout.map(|timeout| Instant::now() + timeout);

        let mut session = ProbeSession::new(url);
        let mut event = ProbeEvent::Start;
        loop {
            probe_trace!("probe {}: {:?}", url, event);
            let (next, effects) = update(session, event);
            session = next;

            for effect in effects {
                match effect {
                    Effect::Navigate { url } => lease.navigate(&url),
                    Effect::Teardown => {
                        lease.release();
                        signals_rx.close();
                    }
                }
            }

            if let Some(verdict) = session.verdict() {
                probe_debug!("probe of {} resolved: {}", url, verdict);
                return verdict.clone();
            }
            event = next_event(&mut signals_rx, deadline).await;
        }
    }
}

async fn next_event(
    signals: &mut UnboundedReceiver<SurfaceSignal>,
    deadline: Option<Instant>,
) -> ProbeEvent {
    match deadline {
        Some(deadline) => tokio::select! {
            signal = signals.recv() => signal_event(signal),
            _ = tokio::time::sleep_until(deadline) => ProbeEvent::TimerFired,
        },
        None => signal_event(signals.recv().await),
    }
}

fn signal_event(signal: Option<SurfaceSignal>) -> ProbeEvent {
    match signal {
        Some(signal) => ProbeEvent::Surface(signal),
        None => ProbeEvent::SignalsClosed,
    }
}
