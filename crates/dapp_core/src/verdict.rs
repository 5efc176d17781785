use std::fmt;

use serde::{Deserialize, Serialize};

/// Prefix browser engines put in front of network error descriptions.
pub const NET_ERROR_PREFIX: &str = "net::";
/// Prefix shared by every certificate-related network error code.
pub const CERT_ERROR_PREFIX: &str = "ERR_CERT_";

/// Strips a leading `net::` so codes compare the same whichever signal carried them.
pub fn strip_net_prefix(code: &str) -> &str {
    code.strip_prefix(NET_ERROR_PREFIX).unwrap_or(code)
}

pub fn is_certificate_code(code: &str) -> bool {
    strip_net_prefix(code).starts_with(CERT_ERROR_PREFIX)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CertError {
    /// Expired or not yet valid.
    DateInvalid,
    /// Certificate does not cover the requested host name.
    CommonNameInvalid,
    /// Self-signed or chained to an untrusted root.
    AuthorityInvalid,
    Revoked,
    Other(String),
}

impl CertError {
    pub fn from_code(code: &str) -> Self {
        match strip_net_prefix(code) {
            "ERR_CERT_DATE_INVALID" => CertError::DateInvalid,
            "ERR_CERT_COMMON_NAME_INVALID" => CertError::CommonNameInvalid,
            "ERR_CERT_AUTHORITY_INVALID" => CertError::AuthorityInvalid,
            "ERR_CERT_REVOKED" => CertError::Revoked,
            other => CertError::Other(other.to_string()),
        }
    }

    pub fn code(&self) -> &str {
        match self {
            CertError::DateInvalid => "ERR_CERT_DATE_INVALID",
            CertError::CommonNameInvalid => "ERR_CERT_COMMON_NAME_INVALID",
            CertError::AuthorityInvalid => "ERR_CERT_AUTHORITY_INVALID",
            CertError::Revoked => "ERR_CERT_REVOKED",
            CertError::Other(code) => code.as_str(),
        }
    }
}

impl fmt::Display for CertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvalidReason {
    /// Load failed for a reason other than the certificate; `code` is the
    /// engine error code verbatim, without the `net::` prefix.
    Inaccessible { code: String },
    CertificateInvalid(CertError),
    TimedOut,
}

/// Terminal outcome of one probe session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProbeVerdict {
    /// `final_url` is where the load ended up after redirects.
    Valid { final_url: String },
    Invalid(InvalidReason),
}

impl ProbeVerdict {
    pub fn is_valid(&self) -> bool {
        matches!(self, ProbeVerdict::Valid { .. })
    }
}

impl fmt::Display for ProbeVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeVerdict::Valid { final_url } => write!(f, "valid ({final_url})"),
            ProbeVerdict::Invalid(InvalidReason::Inaccessible { code }) => {
                write!(f, "inaccessible ({code})")
            }
            ProbeVerdict::Invalid(InvalidReason::CertificateInvalid(cert)) => {
                write!(f, "certificate invalid ({cert})")
            }
            ProbeVerdict::Invalid(InvalidReason::TimedOut) => write!(f, "timed out"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cert_codes_parse_with_or_without_prefix() {
        assert_eq!(
            CertError::from_code("net::ERR_CERT_DATE_INVALID"),
            CertError::DateInvalid
        );
        assert_eq!(CertError::from_code("ERR_CERT_REVOKED"), CertError::Revoked);
        assert_eq!(
            CertError::from_code("net::ERR_CERT_WEAK_KEY"),
            CertError::Other("ERR_CERT_WEAK_KEY".to_string())
        );
        assert_eq!(CertError::AuthorityInvalid.code(), "ERR_CERT_AUTHORITY_INVALID");
    }

    #[test]
    fn certificate_code_detection() {
        assert!(is_certificate_code("ERR_CERT_COMMON_NAME_INVALID"));
        assert!(is_certificate_code("net::ERR_CERT_DATE_INVALID"));
        assert!(!is_certificate_code("ERR_NAME_NOT_RESOLVED"));
        assert!(!is_certificate_code("net::ERR_CONNECTION_CLOSED"));
    }
}
