use serde::{Deserialize, Serialize};

/// Icon link discovered on a dapp's landing page.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IconInfo {
    /// Absolute icon URL.
    pub href: String,
    pub rel: String,
    pub sizes: Option<String>,
    pub mime: Option<String>,
}

/// Favicon metadata for an origin. Every field is optional: resolution is
/// best-effort and an empty value is a valid outcome.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FaviconInfo {
    pub icon: Option<IconInfo>,
    pub favicon_url: Option<String>,
    /// `data:<mime>;base64,<payload>`
    pub favicon_base64: Option<String>,
}

/// Payload returned for a reachable dapp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DappData {
    /// Canonical form of the URL the probe ended on.
    pub url: String,
    pub origin: String,
    pub icon: Option<IconInfo>,
    pub favicon_url: Option<String>,
    pub favicon_base64: Option<String>,
}

impl DappData {
    pub fn new(url: impl Into<String>, origin: impl Into<String>, favicon: FaviconInfo) -> Self {
        Self {
            url: url.into(),
            origin: origin.into(),
            icon: favicon.icon,
            favicon_url: favicon.favicon_url,
            favicon_base64: favicon.favicon_base64,
        }
    }
}

/// A dapp the user already registered, keyed by its canonical origin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DappRecord {
    pub origin: String,
    pub url: String,
    #[serde(default)]
    pub favicon_url: Option<String>,
    #[serde(default)]
    pub added_utc: String,
}

impl DappRecord {
    pub fn from_data(data: &DappData, added_utc: impl Into<String>) -> Self {
        Self {
            origin: data.origin.clone(),
            url: data.url.clone(),
            favicon_url: data.favicon_url.clone(),
            added_utc: added_utc.into(),
        }
    }
}

/// Exact string match on canonical origins; paths and queries play no part.
pub fn find_repeat<'a>(existing: &'a [DappRecord], origin: &str) -> Option<&'a DappRecord> {
    existing.iter().find(|record| record.origin == origin)
}
