use std::error::Error;

use dapp_core::CertError;

pub(crate) const ERR_NAME_NOT_RESOLVED: &str = "ERR_NAME_NOT_RESOLVED";
pub(crate) const ERR_CONNECTION_REFUSED: &str = "ERR_CONNECTION_REFUSED";
pub(crate) const ERR_CONNECTION_RESET: &str = "ERR_CONNECTION_RESET";
pub(crate) const ERR_CONNECTION_CLOSED: &str = "ERR_CONNECTION_CLOSED";
pub(crate) const ERR_TIMED_OUT: &str = "ERR_TIMED_OUT";
pub(crate) const ERR_TOO_MANY_REDIRECTS: &str = "ERR_TOO_MANY_REDIRECTS";
pub(crate) const ERR_FAILED: &str = "ERR_FAILED";
pub(crate) const ERR_CERT_INVALID: &str = "ERR_CERT_INVALID";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum LoadFailure {
    Certificate(CertError),
    Network(&'static str),
}

/// Maps a transport error to the browser-style code a page load would report.
pub(crate) fn classify_reqwest_error(err: &reqwest::Error) -> LoadFailure {
    if err.is_timeout() {
        return LoadFailure::Network(ERR_TIMED_OUT);
    }
    if err.is_redirect() {
        return LoadFailure::Network(ERR_TOO_MANY_REDIRECTS);
    }
    classify_error_text(&error_chain_text(err))
}

/// Display of the error and all its sources, lower-cased.
fn error_chain_text(err: &(dyn Error + 'static)) -> String {
    let mut parts = Vec::new();
    let mut current = Some(err);
    while let Some(e) = current {
        parts.push(e.to_string());
        current = e.source();
    }
    parts.join(": ").to_ascii_lowercase()
}

// rustls reports certificate problems either by variant name (`UnknownIssuer`)
// or with a sentence (`certificate expired: ...`), depending on version.
pub(crate) fn classify_error_text(text: &str) -> LoadFailure {
    let has = |needles: &[&str]| needles.iter().any(|n| text.contains(n));

    if has(&["certificate", "invalidcertificate"]) {
        let cert = if has(&["notvalidforname", "not valid for name"]) {
            CertError::CommonNameInvalid
        } else if has(&["expired", "notvalidyet", "not valid yet"]) {
            CertError::DateInvalid
        } else if has(&["revoked"]) {
            CertError::Revoked
        } else if has(&[
            "unknownissuer",
            "unknown issuer",
            "self-signed",
            "self signed",
            "badsignature",
            "causedasendentity",
            "untrusted",
        ]) {
            CertError::AuthorityInvalid
        } else {
            CertError::Other(ERR_CERT_INVALID.to_string())
        };
        return LoadFailure::Certificate(cert);
    }

    let code = if has(&[
        "dns error",
        "failed to lookup address",
        "name or service not known",
        "no such host",
        "nodename nor servname",
    ]) {
        ERR_NAME_NOT_RESOLVED
    } else if has(&["connection refused"]) {
        ERR_CONNECTION_REFUSED
    } else if has(&["connection reset"]) {
        ERR_CONNECTION_RESET
    } else if has(&["connection closed", "unexpected eof", "incompletemessage", "connection aborted"]) {
        ERR_CONNECTION_CLOSED
    } else if has(&["timed out"]) {
        ERR_TIMED_OUT
    } else {
        ERR_FAILED
    };
    LoadFailure::Network(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dns_failures_map_to_name_not_resolved() {
        let text = "error sending request for url (https://host.not.exist/): client error (connect): dns error: failed to lookup address information: name or service not known";
        assert_eq!(
            classify_error_text(text),
            LoadFailure::Network(ERR_NAME_NOT_RESOLVED)
        );
    }

    #[test]
    fn certificate_variants_map_to_subtypes() {
        let cases = [
            ("invalid peer certificate: expired", CertError::DateInvalid),
            (
                "invalid peer certificate: certificate expired: verification time 1700000000 (unix), but certificate is not valid after 1600000000",
                CertError::DateInvalid,
            ),
            ("invalid peer certificate: notvalidforname", CertError::CommonNameInvalid),
            (
                "invalid peer certificate: certificate not valid for name \"wrong.host.test\"",
                CertError::CommonNameInvalid,
            ),
            ("invalid peer certificate: unknownissuer", CertError::AuthorityInvalid),
            (
                "invalid peer certificate: other(othererror(causedasendentity))",
                CertError::AuthorityInvalid,
            ),
            ("invalid peer certificate: revoked", CertError::Revoked),
            (
                "invalid peer certificate: unsupportedsignaturealgorithm",
                CertError::Other(ERR_CERT_INVALID.to_string()),
            ),
        ];
        for (text, expected) in cases {
            assert_eq!(
                classify_error_text(text),
                LoadFailure::Certificate(expected),
                "{text}"
            );
        }
    }

    #[test]
    fn connection_failures_keep_distinct_codes() {
        assert_eq!(
            classify_error_text("tcp connect error: connection refused (os error 111)"),
            LoadFailure::Network(ERR_CONNECTION_REFUSED)
        );
        assert_eq!(
            classify_error_text("connection reset by peer (os error 104)"),
            LoadFailure::Network(ERR_CONNECTION_RESET)
        );
        assert_eq!(
            classify_error_text("connection closed before message completed"),
            LoadFailure::Network(ERR_CONNECTION_CLOSED)
        );
        assert_eq!(
            classify_error_text("something unexpected"),
            LoadFailure::Network(ERR_FAILED)
        );
    }
}
