use base64::{engine::general_purpose, Engine as _};
use dapp_core::{FaviconInfo, IconInfo};
use futures_util::StreamExt;
use probe_logging::{probe_debug, probe_trace};
use reqwest::header::CONTENT_TYPE;
use url::Url;

use crate::decode::decode_page;
use crate::icons::{default_favicon_url, find_icon_link};
use crate::FaviconSettings;

const FALLBACK_ICON_MIME: &str = "image/x-icon";

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum FaviconError {
    #[error("invalid origin {origin}: {message}")]
    InvalidOrigin { origin: String, message: String },
    #[error("failed to build http client: {0}")]
    Client(String),
    #[error("request to {url} failed: {message}")]
    Request { url: String, message: String },
    #[error("{url} returned http status {status}")]
    HttpStatus { url: String, status: u16 },
    #[error("{url} is larger than {max_bytes} bytes")]
    TooLarge { url: String, max_bytes: u64 },
    #[error("{url} returned {content_type}, not an image")]
    NotAnImage { url: String, content_type: String },
    #[error("{url} returned an empty body")]
    Empty { url: String },
}

/// Looks up favicon metadata for an origin. Callers treat failure as "no icon".
#[async_trait::async_trait]
pub trait FaviconResolver: Send + Sync {
    async fn resolve(&self, origin: &str) -> Result<FaviconInfo, FaviconError>;
}

#[derive(Debug, Clone, Default)]
pub struct HttpFaviconResolver {
    settings: FaviconSettings,
}

struct Body {
    bytes: Vec<u8>,
    content_type: Option<String>,
}

impl HttpFaviconResolver {
    pub fn new(settings: FaviconSettings) -> Self {
        Self { settings }
    }

    fn build_client(&self) -> Result<reqwest::Client, FaviconError> {
        reqwest::Client::builder()
            .timeout(self.settings.request_timeout)
            .user_agent(self.settings.user_agent.clone())
            .build()
            .map_err(|err| FaviconError::Client(err.to_string()))
    }

    async fn discover_icon(
        &self,
        client: &reqwest::Client,
        origin: &Url,
    ) -> Result<Option<IconInfo>, FaviconError> {
        let page = fetch_capped(client, origin.as_str(), self.settings.max_page_bytes).await?;
        let html = decode_page(&page.bytes, page.content_type.as_deref()).map_err(|err| {
            FaviconError::Request {
                url: origin.to_string(),
                message: err.to_string(),
            }
        })?;
        Ok(find_icon_link(&html, origin))
    }
}

#[async_trait::async_trait]
impl FaviconResolver for HttpFaviconResolver {
    async fn resolve(&self, origin: &str) -> Result<FaviconInfo, FaviconError> {
        let origin_url = Url::parse(origin).map_err(|err| FaviconError::InvalidOrigin {
            origin: origin.to_string(),
            message: err.to_string(),
        })?;
        let client = self.build_client()?;

        let icon = match self.discover_icon(&client, &origin_url).await {
            Ok(icon) => icon,
            Err(err) => {
                probe_debug!("icon discovery on {} failed: {}", origin, err);
                None
            }
        };

        if let Some(icon) = icon.as_ref().filter(|icon| icon.href.starts_with("data:")) {
            return Ok(FaviconInfo {
                favicon_url: Some(icon.href.clone()),
                favicon_base64: Some(icon.href.clone()),
                icon: Some(icon.clone()),
            });
        }

        let favicon_url = match icon.as_ref() {
            Some(icon) => icon.href.clone(),
            None => match default_favicon_url(&origin_url) {
                Some(url) => url.into(),
                None => return Ok(FaviconInfo::default()),
            },
        };

        let favicon_base64 =
            match fetch_capped(&client, &favicon_url, self.settings.max_icon_bytes).await {
                Ok(body) => {
                    let declared = icon.as_ref().and_then(|icon| icon.mime.as_deref());
                    match image_mime(&favicon_url, body.content_type.as_deref(), declared) {
                        Ok(mime) => Some(to_data_url(&mime, &body.bytes)),
                        Err(content_type) => {
                            probe_debug!("{} is not an image ({})", favicon_url, content_type);
                            None
                        }
                    }
                }
                Err(err) => {
                    probe_debug!("favicon download from {} failed: {}", favicon_url, err);
                    None
                }
            };
        probe_trace!(
            "favicon for {}: icon={} inline={}",
            origin,
            icon.is_some(),
            favicon_base64.is_some()
        );

        // Without a declared icon, the conventional path only counts if it served something.
        let favicon_url = (icon.is_some() || favicon_base64.is_some()).then_some(favicon_url);
        Ok(FaviconInfo {
            icon,
            favicon_url,
            favicon_base64,
        })
    }
}

async fn fetch_capped(
    client: &reqwest::Client,
    url: &str,
    max_bytes: u64,
) -> Result<Body, FaviconError> {
    let request_error = |err: reqwest::Error| FaviconError::Request {
        url: url.to_string(),
        message: err.to_string(),
    };
    let too_large = || FaviconError::TooLarge {
        url: url.to_string(),
        max_bytes,
    };

    let response = client.get(url).send().await.map_err(request_error)?;
    let status = response.status();
    if !status.is_success() {
        return Err(FaviconError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    if response.content_length().is_some_and(|len| len > max_bytes) {
        return Err(too_large());
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_string());

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(request_error)?;
        if bytes.len() as u64 + chunk.len() as u64 > max_bytes {
            return Err(too_large());
        }
        bytes.extend_from_slice(&chunk);
    }
    if bytes.is_empty() {
        return Err(FaviconError::Empty {
            url: url.to_string(),
        });
    }

    Ok(Body {
        bytes,
        content_type,
    })
}

/// Picks the MIME type for the data URL. `Err` carries a served content type
/// that is clearly not an image, such as an HTML fallback page.
fn image_mime(url: &str, served: Option<&str>, declared: Option<&str>) -> Result<String, String> {
    let served = served.map(|ct| ct.split(';').next().unwrap_or(ct).trim().to_ascii_lowercase());
    match served.as_deref() {
        Some(ct) if ct.starts_with("image/") => return Ok(ct.to_string()),
        Some(ct) if ct.starts_with("text/") => return Err(ct.to_string()),
        _ => {}
    }
    if let Some(declared) = declared.filter(|d| d.starts_with("image/")) {
        return Ok(declared.to_string());
    }
    Ok(mime_from_extension(url).to_string())
}

fn mime_from_extension(url: &str) -> &'static str {
    let path = url.split(['?', '#']).next().unwrap_or(url).to_ascii_lowercase();
    match path.rsplit_once('.').map(|(_, ext)| ext) {
        Some("png") => "image/png",
        Some("svg") => "image/svg+xml",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => FALLBACK_ICON_MIME,
    }
}

fn to_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", general_purpose::STANDARD.encode(bytes))
}
