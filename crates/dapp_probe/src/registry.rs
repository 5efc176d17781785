use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use anyhow::Context;
use dapp_core::{canonicalize_dapp_url, find_repeat, DappRecord};
use dapp_engine::write_atomically;
use probe_logging::probe_info;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct RegistryFile {
    #[serde(default)]
    dapps: Vec<DappRecord>,
}

/// Registered dapps from `path`; a missing file is an empty registry.
pub(crate) fn load_registry(path: &Path) -> anyhow::Result<Vec<DappRecord>> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => {
            return Err(err).with_context(|| format!("failed to read registry {}", path.display()))
        }
    };
    let file: RegistryFile = ron::from_str(&content)
        .with_context(|| format!("failed to parse registry {}", path.display()))?;
    probe_info!("loaded {} dapps from {:?}", file.dapps.len(), path);
    Ok(file.dapps)
}

pub(crate) fn save_registry(path: &Path, dapps: &[DappRecord]) -> anyhow::Result<()> {
    let file = RegistryFile {
        dapps: dapps.to_vec(),
    };
    let pretty = ron::ser::PrettyConfig::new();
    let content =
        ron::ser::to_string_pretty(&file, pretty).context("failed to serialize registry")?;
    write_atomically(path, &content)
        .with_context(|| format!("failed to write registry {}", path.display()))?;
    probe_info!("saved {} dapps to {:?}", dapps.len(), path);
    Ok(())
}

/// Appends `record` unless its origin is already registered.
pub(crate) fn register(dapps: &mut Vec<DappRecord>, record: DappRecord) -> bool {
    if find_repeat(dapps, &record.origin).is_some() {
        return false;
    }
    dapps.push(record);
    true
}

/// Removes the record whose origin matches `target`, given either as an
/// origin or as any URL on that origin.
pub(crate) fn unregister(dapps: &mut Vec<DappRecord>, target: &str) -> Option<DappRecord> {
    let origin = canonicalize_dapp_url(target)
        .map(|canonical| canonical.origin().to_string())
        .unwrap_or_else(|_| target.trim().to_string());
    let index = dapps.iter().position(|record| record.origin == origin)?;
    Some(dapps.remove(index))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn record(origin: &str) -> DappRecord {
        DappRecord {
            origin: origin.to_string(),
            url: format!("{origin}/"),
            favicon_url: None,
            added_utc: "2026-10-19T00:00:00+00:00".to_string(),
        }
    }

    #[test]
    fn missing_registry_is_empty() {
        let temp = TempDir::new().unwrap();
        assert!(load_registry(&temp.path().join("dapps.ron")).unwrap().is_empty());
    }

    #[test]
    fn save_then_load_keeps_records() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("dapps.ron");
        let dapps = vec![record("https://dex.test"), record("https://lend.test")];

        save_registry(&path, &dapps).unwrap();
        assert_eq!(load_registry(&path).unwrap(), dapps);
    }

    #[test]
    fn corrupt_registry_is_reported() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("dapps.ron");
        fs::write(&path, "not ron at all {").unwrap();
        assert!(load_registry(&path).is_err());
    }

    #[test]
    fn register_refuses_duplicate_origin() {
        let mut dapps = vec![record("https://dex.test")];
        assert!(!register(&mut dapps, record("https://dex.test")));
        assert!(register(&mut dapps, record("https://www.dex.test")));
        assert_eq!(dapps.len(), 2);
    }

    #[test]
    fn unregister_accepts_urls_on_the_origin() {
        let mut dapps = vec![record("https://dex.test"), record("https://lend.test")];
        let removed = unregister(&mut dapps, "https://DEX.test/swap?x=1").unwrap();
        assert_eq!(removed.origin, "https://dex.test");
        assert_eq!(dapps, vec![record("https://lend.test")]);
        assert!(unregister(&mut dapps, "https://unknown.test").is_none());
    }
}
