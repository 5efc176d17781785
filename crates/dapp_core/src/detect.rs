use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{DappData, InvalidReason};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DetectErrorKind {
    NotHttps,
    Inaccessible,
    CertInvalid,
    Timeout,
    /// Non-fatal: accompanies a populated `data`.
    Repeat,
}

impl DetectErrorKind {
    pub fn code(self) -> &'static str {
        match self {
            DetectErrorKind::NotHttps => "NOT_HTTPS",
            DetectErrorKind::Inaccessible => "INACCESSIBLE",
            DetectErrorKind::CertInvalid => "CERT_INVALID",
            DetectErrorKind::Timeout => "TIMEOUT",
            DetectErrorKind::Repeat => "REPEAT",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            DetectErrorKind::NotHttps => "Dapp with protocols other than HTTPS is not supported",
            DetectErrorKind::Inaccessible => "This Dapp is inaccessible. It may be an invalid URL",
            DetectErrorKind::CertInvalid => "The certificate of the Dapp is invalid",
            DetectErrorKind::Timeout => "Checking the Dapp timed out, please try again later",
            DetectErrorKind::Repeat => "This Dapp has been added",
        }
    }

    pub fn is_fatal(self) -> bool {
        !matches!(self, DetectErrorKind::Repeat)
    }
}

impl fmt::Display for DetectErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectError {
    #[serde(rename = "type")]
    pub kind: DetectErrorKind,
    pub message: String,
    /// Engine error code or certificate subtype, when one is known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl DetectError {
    pub fn new(kind: DetectErrorKind) -> Self {
        Self {
            kind,
            message: kind.message().to_string(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn from_reason(reason: &InvalidReason) -> Self {
        match reason {
            InvalidReason::Inaccessible { code } => {
                DetectError::new(DetectErrorKind::Inaccessible).with_detail(code.clone())
            }
            InvalidReason::CertificateInvalid(cert) => {
                DetectError::new(DetectErrorKind::CertInvalid).with_detail(cert.code())
            }
            InvalidReason::TimedOut => DetectError::new(DetectErrorKind::Timeout),
        }
    }
}

impl fmt::Display for DetectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.detail {
            Some(detail) => write!(f, "{}: {} ({detail})", self.kind, self.message),
            None => write!(f, "{}: {}", self.kind, self.message),
        }
    }
}

/// Result of one detection. `data` is `None` for every fatal error; with
/// `REPEAT` both `data` and `error` are set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectResult {
    pub data: Option<DappData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<DetectError>,
}

impl DetectResult {
    pub fn success(data: DappData) -> Self {
        Self {
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(error: DetectError) -> Self {
        Self {
            data: None,
            error: Some(error),
        }
    }

    pub fn repeat(data: DappData) -> Self {
        Self {
            data: Some(data),
            error: Some(DetectError::new(DetectErrorKind::Repeat)),
        }
    }

    pub fn error_kind(&self) -> Option<DetectErrorKind> {
        self.error.as_ref().map(|err| err.kind)
    }

    pub fn is_repeat(&self) -> bool {
        self.error_kind() == Some(DetectErrorKind::Repeat)
    }
}
