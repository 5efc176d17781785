use dapp_core::{SurfaceSignal, NET_ERROR_PREFIX};
use probe_logging::{probe_debug, probe_trace};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::classify::{classify_reqwest_error, LoadFailure};
use crate::surface::{SignalSender, Surface, SurfaceError, SurfaceProvider};
use crate::SurfaceSettings;

/// Surfaces backed by plain HTTP(S) loads. Nothing a page returns is
/// executed; only the transport outcome is reported.
#[derive(Debug, Clone, Default)]
pub struct HttpSurfaceProvider {
    settings: SurfaceSettings,
}

impl HttpSurfaceProvider {
    pub fn new(settings: SurfaceSettings) -> Self {
        Self { settings }
    }

    // Fresh client per surface: no pooled connections or session state leak between probes.
    fn build_client(&self) -> Result<reqwest::Client, SurfaceError> {
        let redirect_limit = self.settings.redirect_limit;
        let policy = reqwest::redirect::Policy::custom(move |attempt| {
            if attempt.previous().len() >= redirect_limit {
                attempt.error("redirect limit exceeded")
            } else {
                attempt.follow()
            }
        });

        reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .timeout(self.settings.load_timeout)
            .redirect(policy)
            .user_agent(self.settings.user_agent.clone())
            .build()
            .map_err(|err| SurfaceError::Create(err.to_string()))
    }
}

impl SurfaceProvider for HttpSurfaceProvider {
    fn create(&self, signals: SignalSender) -> Result<Box<dyn Surface>, SurfaceError> {
        let runtime = Handle::try_current().map_err(|err| SurfaceError::Create(err.to_string()))?;
        let client = self.build_client()?;
        Ok(Box::new(HttpSurface {
            client,
            runtime,
            signals: Some(signals),
            load: None,
        }))
    }
}

pub struct HttpSurface {
    client: reqwest::Client,
    runtime: Handle,
    signals: Option<SignalSender>,
    load: Option<JoinHandle<()>>,
}

impl Surface for HttpSurface {
    fn navigate(&mut self, url: &str) {
        let Some(signals) = self.signals.clone() else {
            probe_debug!("navigate to {} after dispose ignored", url);
            return;
        };
        if let Some(previous) = self.load.take() {
            previous.abort();
        }
        let client = self.client.clone();
        let url = url.to_string();
        self.load = Some(self.runtime.spawn(async move {
            load(client, url, signals).await;
        }));
    }

    fn dispose(&mut self) {
        if let Some(load) = self.load.take() {
            load.abort();
        }
        self.signals = None;
    }
}

async fn load(client: reqwest::Client, url: String, signals: SignalSender) {
    match client.get(&url).send().await {
        Ok(response) => {
            probe_trace!("load of {} finished with {}", url, response.status());
            let _ = signals.send(SurfaceSignal::LoadCompleted {
                final_url: response.url().to_string(),
            });
        }
        Err(err) => match classify_reqwest_error(&err) {
            LoadFailure::Certificate(cert) => {
                probe_debug!("load of {} failed certificate validation: {}", url, err);
                // Browsers report the failed load first, then the certificate error.
                let _ = signals.send(SurfaceSignal::LoadFailed {
                    code: cert.code().to_string(),
                });
                let _ = signals.send(SurfaceSignal::CertificateError {
                    code: format!("{NET_ERROR_PREFIX}{}", cert.code()),
                });
            }
            LoadFailure::Network(code) => {
                probe_debug!("load of {} failed with {}: {}", url, code, err);
                let _ = signals.send(SurfaceSignal::LoadFailed {
                    code: code.to_string(),
                });
            }
        },
    }
}
