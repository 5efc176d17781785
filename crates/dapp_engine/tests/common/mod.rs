#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use dapp_core::{FaviconInfo, SurfaceSignal};
use dapp_engine::{
    FaviconError, FaviconResolver, SignalSender, Surface, SurfaceError, SurfaceProvider,
};
use tokio::task::JoinHandle;

/// What a spy surface does once navigated.
#[derive(Debug, Clone)]
pub enum Script {
    /// Send every signal right away, in order.
    Immediate(Vec<SurfaceSignal>),
    /// Send every signal after a delay.
    Delayed(Duration, Vec<SurfaceSignal>),
    /// Never report anything, keep the sender alive.
    Silent,
    /// Drop the signal sender without reporting anything.
    Vanish,
}

#[derive(Debug, Default)]
struct Counters {
    created: usize,
    navigations: Vec<String>,
    disposals: usize,
}

#[derive(Debug, Clone, Default)]
pub struct SurfaceLog {
    inner: Arc<Mutex<Counters>>,
}

impl SurfaceLog {
    pub fn created(&self) -> usize {
        self.inner.lock().unwrap().created
    }

    pub fn navigations(&self) -> Vec<String> {
        self.inner.lock().unwrap().navigations.clone()
    }

    pub fn disposals(&self) -> usize {
        self.inner.lock().unwrap().disposals
    }
}

pub struct SpyProvider {
    script: Script,
    log: SurfaceLog,
    fail_create: bool,
}

impl SpyProvider {
    pub fn new(script: Script) -> (Arc<Self>, SurfaceLog) {
        let log = SurfaceLog::default();
        let provider = Arc::new(Self {
            script,
            log: log.clone(),
            fail_create: false,
        });
        (provider, log)
    }

    pub fn failing() -> (Arc<Self>, SurfaceLog) {
        let log = SurfaceLog::default();
        let provider = Arc::new(Self {
            script: Script::Silent,
            log: log.clone(),
            fail_create: true,
        });
        (provider, log)
    }
}

impl SurfaceProvider for SpyProvider {
    fn create(&self, signals: SignalSender) -> Result<Box<dyn Surface>, SurfaceError> {
        if self.fail_create {
            return Err(SurfaceError::Create("no surface available".to_string()));
        }
        self.log.inner.lock().unwrap().created += 1;
        Ok(Box::new(SpySurface {
            script: self.script.clone(),
            log: self.log.clone(),
            signals: Some(signals),
            pending: None,
        }))
    }
}

struct SpySurface {
    script: Script,
    log: SurfaceLog,
    signals: Option<SignalSender>,
    pending: Option<JoinHandle<()>>,
}

impl Surface for SpySurface {
    fn navigate(&mut self, url: &str) {
        self.log
            .inner
            .lock()
            .unwrap()
            .navigations
            .push(url.to_string());
        match self.script.clone() {
            Script::Immediate(signals) => {
                if let Some(tx) = &self.signals {
                    for signal in signals {
                        let _ = tx.send(signal);
                    }
                }
            }
            Script::Delayed(delay, signals) => {
                if let Some(tx) = self.signals.clone() {
                    self.pending = Some(tokio::spawn(async move {
                        tokio::time::sleep(delay).await;
                        for signal in signals {
                            let _ = tx.send(signal);
                        }
                    }));
                }
            }
            Script::Silent => {}
            Script::Vanish => self.signals = None,
        }
    }

    fn dispose(&mut self) {
        self.log.inner.lock().unwrap().disposals += 1;
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
        self.signals = None;
    }
}

/// Favicon resolver returning a fixed answer and recording the origins asked for.
pub struct StaticFavicons {
    answer: Result<FaviconInfo, FaviconError>,
    origins: Mutex<Vec<String>>,
}

impl StaticFavicons {
    pub fn ok(info: FaviconInfo) -> Arc<Self> {
        Arc::new(Self {
            answer: Ok(info),
            origins: Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            answer: Err(FaviconError::Empty {
                url: "https://unused.test/favicon.ico".to_string(),
            }),
            origins: Mutex::new(Vec::new()),
        })
    }

    pub fn origins(&self) -> Vec<String> {
        self.origins.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl FaviconResolver for StaticFavicons {
    async fn resolve(&self, origin: &str) -> Result<FaviconInfo, FaviconError> {
        self.origins.lock().unwrap().push(origin.to_string());
        self.answer.clone()
    }
}

pub fn completed(url: &str) -> SurfaceSignal {
    SurfaceSignal::LoadCompleted {
        final_url: url.to_string(),
    }
}

pub fn load_failed(code: &str) -> SurfaceSignal {
    SurfaceSignal::LoadFailed {
        code: code.to_string(),
    }
}

pub fn cert_error(code: &str) -> SurfaceSignal {
    SurfaceSignal::CertificateError {
        code: code.to_string(),
    }
}
