//! Error types for certificate verification and trust-context assembly.

use std::fmt;

use openssl::error::ErrorStack;
use openssl::x509::X509;
use thiserror::Error;

/// Errors that can occur while building a trust context.
#[derive(Error, Debug)]
pub enum SslError {
    /// A required input to context assembly was not supplied.
    /// Caller bug; an empty list is acceptable, a missing one is not.
    #[error("required argument `{0}` was not provided")]
    MissingArgument(&'static str),

    /// Chain/path validation against the trust store failed.
    #[error(transparent)]
    CertVerify(#[from] CertVerifyFailure),

    /// The client private key is of a type this layer does not support.
    #[error("unsupported private key type {0}, only RSA keys are supported")]
    UnsupportedKeyType(String),

    /// The client private key does not correspond to the client certificate.
    #[error("the private key does not match the public key of certificate '{subject}'")]
    KeyMismatch {
        /// Subject of the certificate whose public key was compared.
        subject: String,
    },

    /// A certificate signing request's embedded signature did not validate.
    #[error("invalid signature on certificate request for '{subject}'")]
    RequestSignature {
        /// Subject name claimed by the request.
        subject: String,
    },

    /// Engine-level failure (allocation, malformed object) surfaced as-is.
    #[error("openssl error: {0}")]
    Openssl(#[from] ErrorStack),
}

/// A classified chain-verification failure.
///
/// Carries the human-readable message, the raw `X509_V_ERR_*` code the
/// engine reported, and the certificate the engine was processing when it
/// failed. Chain validation walks intermediates, so the implicated
/// certificate is not necessarily the one verification started from.
#[derive(Error, Clone)]
#[error("{message}")]
pub struct CertVerifyFailure {
    pub(crate) message: String,
    pub(crate) code: i32,
    pub(crate) subject: Option<String>,
    pub(crate) crl_issuer: Option<String>,
    pub(crate) cert: Option<X509>,
}

impl CertVerifyFailure {
    /// Human-readable description of the failure.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Raw `X509_V_ERR_*` code reported by the verification engine.
    ///
    /// Callers that need to distinguish transient-looking causes (clock
    /// skew) from structural ones (missing issuer, revoked) should branch
    /// on this rather than on the message text.
    pub const fn code(&self) -> i32 {
        self.code
    }

    /// Subject of the certificate the engine was processing, if any.
    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    /// Issuer of the CRL implicated in the failure, when a CRL was at fault.
    pub fn crl_issuer(&self) -> Option<&str> {
        self.crl_issuer.as_deref()
    }

    /// The certificate the engine was processing when it failed.
    pub const fn certificate(&self) -> Option<&X509> {
        self.cert.as_ref()
    }

    /// Whether the failure looks like clock skew rather than a structural
    /// trust problem (not-yet-valid or expired certificate/CRL).
    pub const fn is_clock_related(&self) -> bool {
        matches!(
            self.code,
            openssl_sys::X509_V_ERR_CERT_NOT_YET_VALID
                | openssl_sys::X509_V_ERR_CERT_HAS_EXPIRED
                | openssl_sys::X509_V_ERR_CRL_NOT_YET_VALID
                | openssl_sys::X509_V_ERR_CRL_HAS_EXPIRED
        )
    }
}

// Manual impl: X509 has no useful Debug and the DER dump is noise.
impl fmt::Debug for CertVerifyFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CertVerifyFailure")
            .field("message", &self.message)
            .field("code", &self.code)
            .field("subject", &self.subject)
            .field("crl_issuer", &self.crl_issuer)
            .finish_non_exhaustive()
    }
}
