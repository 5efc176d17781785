use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use dapp_core::DappRecord;
use probe_logging::probe_debug;

use crate::detect::DappDetector;
use crate::{DetectEvent, DetectorConfig, EngineError, RequestId};

enum DetectorCommand {
    Detect {
        request_id: RequestId,
        url: String,
        existing: Arc<[DappRecord]>,
    },
}

/// Runs detections on a background runtime so the host thread never blocks.
/// Each submitted URL is probed independently and concurrently.
pub struct DetectorHandle {
    cmd_tx: mpsc::Sender<DetectorCommand>,
    event_rx: mpsc::Receiver<DetectEvent>,
}

impl DetectorHandle {
    pub fn new(config: DetectorConfig) -> Result<Self, EngineError> {
        Self::with_detector(DappDetector::from_config(&config))
    }

    pub fn with_detector(detector: DappDetector) -> Result<Self, EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;
        let detector = Arc::new(detector);

        thread::Builder::new()
            .name("dapp-detector".to_string())
            .spawn(move || {
                while let Ok(command) = cmd_rx.recv() {
                    let detector = detector.clone();
                    let event_tx = event_tx.clone();
                    runtime.spawn(async move {
                        handle_command(detector.as_ref(), command, event_tx).await;
                    });
                }
                probe_debug!("detector handle dropped; shutting down runtime");
            })?;

        Ok(Self { cmd_tx, event_rx })
    }

    /// Returns `false` if the background thread is gone.
    pub fn submit(
        &self,
        request_id: RequestId,
        url: impl Into<String>,
        existing: Arc<[DappRecord]>,
    ) -> bool {
        self.cmd_tx
            .send(DetectorCommand::Detect {
                request_id,
                url: url.into(),
                existing,
            })
            .is_ok()
    }

    pub fn try_recv(&self) -> Option<DetectEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Blocks until the next result; `None` once the background thread is gone.
    pub fn recv(&self) -> Option<DetectEvent> {
        self.event_rx.recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<DetectEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

async fn handle_command(
    detector: &DappDetector,
    command: DetectorCommand,
    event_tx: mpsc::Sender<DetectEvent>,
) {
    match command {
        DetectorCommand::Detect {
            request_id,
            url,
            existing,
        } => {
            let result = detector.detect(&url, &existing).await;
            let _ = event_tx.send(DetectEvent::Completed {
                request_id,
                url,
                result,
            });
        }
    }
}
