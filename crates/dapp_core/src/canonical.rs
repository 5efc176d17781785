use url::Url;

/// A parsed dapp URL with its normalized form and origin.
///
/// Normalization is what the `url` crate applies on parse (lower-cased scheme
/// and host, default port removed, empty path turned into `/`, percent
/// encoding fixed up) plus dropping the fragment, which never reaches the
/// server and must not make two spellings of the same page look different.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalUrl {
    url: Url,
    origin: String,
}

impl CanonicalUrl {
    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    /// `scheme://host[:port]`, port omitted when it is the scheme default.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn scheme(&self) -> &str {
        self.url.scheme()
    }

    pub fn is_https(&self) -> bool {
        self.url.scheme() == "https"
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CanonicalizeError {
    #[error("url is empty")]
    Empty,
    #[error("invalid url {input:?}: {message}")]
    Invalid { input: String, message: String },
    #[error("url {0:?} has no host")]
    MissingHost(String),
}

pub fn canonicalize_dapp_url(raw: &str) -> Result<CanonicalUrl, CanonicalizeError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CanonicalizeError::Empty);
    }

    let mut url = Url::parse(trimmed).map_err(|err| CanonicalizeError::Invalid {
        input: trimmed.to_string(),
        message: err.to_string(),
    })?;
    if url.host_str().is_none() {
        return Err(CanonicalizeError::MissingHost(trimmed.to_string()));
    }
    url.set_fragment(None);

    let origin = url.origin().ascii_serialization();
    Ok(CanonicalUrl { url, origin })
}
