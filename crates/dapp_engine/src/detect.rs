use std::sync::Arc;

use dapp_core::{
    canonicalize_dapp_url, find_repeat, DappData, DappRecord, DetectError, DetectErrorKind,
    DetectResult, FaviconInfo, ProbeVerdict,
};
use probe_logging::{probe_info, probe_warn};

use crate::favicon::{FaviconResolver, HttpFaviconResolver};
use crate::http_surface::HttpSurfaceProvider;
use crate::prober::Prober;
use crate::DetectorConfig;

/// Decides whether a user-supplied URL can be registered as a dapp.
#[derive(Clone)]
pub struct DappDetector {
    prober: Prober,
    favicons: Arc<dyn FaviconResolver>,
}

impl DappDetector {
    pub fn new(prober: Prober, favicons: Arc<dyn FaviconResolver>) -> Self {
        Self { prober, favicons }
    }

    pub fn from_config(config: &DetectorConfig) -> Self {
        let provider = Arc::new(HttpSurfaceProvider::new(config.surface.clone()));
        let favicons = Arc::new(HttpFaviconResolver::new(config.favicon.clone()));
        Self::new(Prober::new(provider, config.probe.clone()), favicons)
    }

    /// Never fails: every outcome, including `REPEAT`, is reported in the result.
    pub async fn detect(&self, raw_url: &str, existing: &[DappRecord]) -> DetectResult {
        let input = match canonicalize_dapp_url(raw_url) {
            Ok(canonical) if canonical.is_https() => canonical,
            Ok(canonical) => {
                probe_info!("rejecting {} scheme for {}", canonical.scheme(), raw_url);
                return DetectResult::failure(
                    DetectError::new(DetectErrorKind::NotHttps).with_detail(canonical.scheme()),
                );
            }
            Err(err) => {
                probe_info!("rejecting unparsable url {:?}: {}", raw_url, err);
                return DetectResult::failure(
                    DetectError::new(DetectErrorKind::NotHttps).with_detail(err.to_string()),
                );
            }
        };

        let final_url = match self.prober.probe(input.as_str()).await {
            ProbeVerdict::Valid { final_url } => final_url,
            ProbeVerdict::Invalid(reason) => {
                let error = DetectError::from_reason(&reason);
                probe_info!("{} failed detection: {}", input.as_str(), error);
                return DetectResult::failure(error);
            }
        };

        let resolved = match canonicalize_dapp_url(&final_url) {
            Ok(resolved) => resolved,
            Err(err) => {
                probe_warn!(
                    "final url {:?} of {} did not canonicalize ({}); keeping the input",
                    final_url,
                    input.as_str(),
                    err
                );
                input
            }
        };

        let favicon = match self.favicons.resolve(resolved.origin()).await {
            Ok(favicon) => favicon,
            Err(err) => {
                probe_warn!("favicon lookup for {} failed: {}", resolved.origin(), err);
                FaviconInfo::default()
            }
        };

        let data = DappData::new(resolved.as_str(), resolved.origin(), favicon);
        if let Some(record) = find_repeat(existing, &data.origin) {
            probe_info!("{} is already registered as {}", data.origin, record.url);
            return DetectResult::repeat(data);
        }
        probe_info!("{} detected as {}", raw_url, data.origin);
        DetectResult::success(data)
    }
}
