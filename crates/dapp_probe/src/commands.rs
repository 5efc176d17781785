use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{anyhow, bail};
use chrono::Utc;
use dapp_core::{DappRecord, DetectResult};
use dapp_engine::{DetectEvent, DetectorHandle};
use probe_logging::{probe_info, probe_warn};
use serde_json::json;

use crate::config::CliConfig;
use crate::registry::{load_registry, register, save_registry, unregister};

/// Probes every URL concurrently; results are printed in input order.
pub(crate) fn detect(config: &CliConfig, urls: &[String], as_json: bool) -> anyhow::Result<ExitCode> {
    let existing: Arc<[DappRecord]> = load_registry(&config.registry)?.into();
    let results = run_detections(config, urls, existing)?;

    if as_json {
        let report: Vec<_> = urls
            .iter()
            .zip(&results)
            .map(|(url, result)| json!({ "input": url, "result": result }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for (url, result) in urls.iter().zip(&results) {
            println!("{}", describe(url, result));
        }
    }

    let any_fatal = results
        .iter()
        .any(|result| result.error_kind().is_some_and(|kind| kind.is_fatal()));
    Ok(if any_fatal {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

/// Detects `url` and registers it unless detection failed or it already exists.
pub(crate) fn add(config: &CliConfig, url: &str) -> anyhow::Result<ExitCode> {
    let mut dapps = load_registry(&config.registry)?;
    let existing: Arc<[DappRecord]> = dapps.clone().into();
    let result = run_detections(config, &[url.to_string()], existing)?
        .pop()
        .ok_or_else(|| anyhow!("no detection result for {url}"))?;

    println!("{}", describe(url, &result));
    if let Some(error) = &result.error {
        if error.kind.is_fatal() {
            return Ok(ExitCode::FAILURE);
        }
        // REPEAT: the origin is already registered, nothing to write.
        return Ok(ExitCode::SUCCESS);
    }
    let Some(data) = result.data else {
        bail!("detection of {url} returned neither data nor error");
    };

    let record = DappRecord::from_data(&data, Utc::now().to_rfc3339());
    if register(&mut dapps, record) {
        save_registry(&config.registry, &dapps)?;
        probe_info!("registered {}", data.origin);
        println!("added {}", data.origin);
    }
    Ok(ExitCode::SUCCESS)
}

pub(crate) fn list(registry: &Path) -> anyhow::Result<ExitCode> {
    let dapps = load_registry(registry)?;
    if dapps.is_empty() {
        println!("no dapps registered in {}", registry.display());
    }
    for record in &dapps {
        println!("{}\t{}\t{}", record.origin, record.url, record.added_utc);
    }
    Ok(ExitCode::SUCCESS)
}

pub(crate) fn remove(registry: &Path, target: &str) -> anyhow::Result<ExitCode> {
    let mut dapps = load_registry(registry)?;
    match unregister(&mut dapps, target) {
        Some(record) => {
            save_registry(registry, &dapps)?;
            println!("removed {}", record.origin);
            Ok(ExitCode::SUCCESS)
        }
        None => {
            probe_warn!("{} is not registered", target);
            println!("{target} is not registered");
            Ok(ExitCode::FAILURE)
        }
    }
}

fn run_detections(
    config: &CliConfig,
    urls: &[String],
    existing: Arc<[DappRecord]>,
) -> anyhow::Result<Vec<DetectResult>> {
    let handle = DetectorHandle::new(config.detector_config())?;
    for (index, url) in urls.iter().enumerate() {
        if !handle.submit(index as u64, url.clone(), existing.clone()) {
            bail!("detector stopped before accepting {url}");
        }
    }

    let mut results: Vec<Option<DetectResult>> = vec![None; urls.len()];
    for _ in 0..urls.len() {
        let DetectEvent::Completed {
            request_id, result, ..
        } = handle
            .recv()
            .ok_or_else(|| anyhow!("detector stopped before all results arrived"))?;
        if let Some(slot) = usize::try_from(request_id)
            .ok()
            .and_then(|index| results.get_mut(index))
        {
            *slot = Some(result);
        }
    }
    results
        .into_iter()
        .zip(urls)
        .map(|(result, url)| result.ok_or_else(|| anyhow!("missing result for {url}")))
        .collect()
}

fn describe(url: &str, result: &DetectResult) -> String {
    match (&result.data, &result.error) {
        (Some(data), None) => format!(
            "{url}: ok {} (favicon: {})",
            data.origin,
            if data.favicon_base64.is_some() { "yes" } else { "no" }
        ),
        (Some(data), Some(error)) => format!("{url}: {} {} ({})", error.kind, data.origin, error.message),
        (None, Some(error)) => format!("{url}: {error}"),
        (None, None) => format!("{url}: no result"),
    }
}

#[cfg(test)]
mod tests {
    use super::describe;
    use dapp_core::{DappData, DetectError, DetectErrorKind, DetectResult, FaviconInfo};

    #[test]
    fn describes_each_outcome() {
        let data = DappData::new("https://dex.test/", "https://dex.test", FaviconInfo::default());
        assert_eq!(
            describe("https://dex.test", &DetectResult::success(data.clone())),
            "https://dex.test: ok https://dex.test (favicon: no)"
        );
        assert_eq!(
            describe("https://dex.test", &DetectResult::repeat(data)),
            "https://dex.test: REPEAT https://dex.test (This Dapp has been added)"
        );
        assert_eq!(
            describe(
                "https://slow.test",
                &DetectResult::failure(DetectError::new(DetectErrorKind::Timeout))
            ),
            "https://slow.test: TIMEOUT: Checking the Dapp timed out, please try again later"
        );
    }
}
