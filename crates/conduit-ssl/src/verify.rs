//! Chain verification and request-signature verification.
//!
//! Path validation runs against a store built by [`crate::store::build`];
//! the store is assumed to already hold every intermediate needed to
//! complete the chain, so no untrusted certificates are supplied to the
//! engine. Failures are classified into a fixed taxonomy that names the
//! certificate (or CRL issuer) the engine was processing when it failed.

use openssl::pkey::{HasPublic, PKeyRef};
use openssl::stack::Stack;
use openssl::x509::store::X509StoreRef;
use openssl::x509::{X509, X509NameRef, X509Ref, X509Req, X509StoreContext};
use tracing::{debug, warn};

use crate::error::{CertVerifyFailure, SslError};
use crate::Result;

/// Verify `cert` against the trusted certificates and CRLs in `store`.
///
/// On success returns the resolved chain, ordered leaf first, root last.
/// On failure returns [`SslError::CertVerify`] describing the first error
/// the engine reported. Classification is deterministic: the same inputs
/// always produce the same outcome.
pub fn verify_cert(store: &X509StoreRef, cert: &X509Ref) -> Result<Vec<X509>> {
    // No untrusted intermediates; the store must be complete.
    let untrusted: Stack<X509> = Stack::new()?;
    let mut context = X509StoreContext::new()?;

    let outcome = context.init(store, cert, &untrusted, |ctx| {
        if ctx.verify_cert()? {
            let resolved = ctx.chain().map_or_else(Vec::new, |stack| {
                stack.iter().map(X509Ref::to_owned).collect()
            });
            Ok(Ok(resolved))
        } else {
            let error = ctx.error();
            Ok(Err(Snapshot {
                code: error.as_raw(),
                engine_text: error.error_string().to_string(),
                depth: ctx.error_depth(),
                current: ctx.current_cert().map(X509Ref::to_owned),
            }))
        }
    })?;

    match outcome {
        Ok(resolved) => {
            debug!(
                subject = %name_text(cert.subject_name()),
                chain_len = resolved.len().max(1),
                "certificate verified"
            );
            if resolved.is_empty() {
                Ok(vec![cert.to_owned()])
            } else {
                Ok(resolved)
            }
        }
        Err(snapshot) => {
            let failure = classify(snapshot.code, &snapshot.engine_text, snapshot.current.as_deref());
            warn!(
                code = snapshot.code,
                depth = snapshot.depth,
                message = %failure,
                "certificate verification failed"
            );
            Err(SslError::CertVerify(failure))
        }
    }
}

/// Verify that a certificate signing request was signed by the private key
/// matching `public_key` and has not been altered since.
///
/// Returns the request unchanged on success so issuance pipelines can
/// chain the call. Says nothing about whether the request's subject is
/// trusted; this is pure signature verification, independent of any
/// trust store.
pub fn verify_request<T: HasPublic>(
    request: X509Req,
    public_key: &PKeyRef<T>,
) -> Result<X509Req> {
    match request.verify(public_key) {
        Ok(true) => Ok(request),
        Ok(false) | Err(_) => Err(SslError::RequestSignature {
            subject: name_text(request.subject_name()),
        }),
    }
}

/// State captured from the store context at the point of failure.
struct Snapshot {
    code: i32,
    engine_text: String,
    depth: u32,
    current: Option<X509>,
}

/// Map a raw `X509_V_ERR_*` code onto the failure taxonomy.
///
/// `cert` is the certificate the engine was processing when it reported
/// the error; for CRL-related codes the implicated CRL is the one issued
/// by that certificate's issuer.
fn classify(code: i32, engine_text: &str, cert: Option<&X509Ref>) -> CertVerifyFailure {
    use openssl_sys as ffi;

    let subject = cert.map(|c| name_text(c.subject_name()));
    let subject_text = subject.clone().unwrap_or_else(|| String::from("<unknown>"));
    let issuer_text = cert.map_or_else(
        || String::from("<unknown>"),
        |c| name_text(c.issuer_name()),
    );

    let (message, crl_issuer) = match code {
        ffi::X509_V_ERR_CERT_NOT_YET_VALID => (
            format!("certificate '{subject_text}' is not yet valid, check clock sync"),
            None,
        ),
        ffi::X509_V_ERR_CERT_HAS_EXPIRED => (
            format!("certificate '{subject_text}' has expired, check clock sync"),
            None,
        ),
        ffi::X509_V_ERR_CRL_NOT_YET_VALID => (
            format!("the CRL issued by '{issuer_text}' is not yet valid, check clock sync"),
            Some(issuer_text),
        ),
        ffi::X509_V_ERR_CRL_HAS_EXPIRED => (
            format!("the CRL issued by '{issuer_text}' has expired, check clock sync"),
            Some(issuer_text),
        ),
        ffi::X509_V_ERR_CERT_SIGNATURE_FAILURE => (
            format!("invalid signature for certificate '{subject_text}'"),
            None,
        ),
        ffi::X509_V_ERR_CRL_SIGNATURE_FAILURE => (
            format!("invalid signature for the CRL issued by '{issuer_text}'"),
            Some(issuer_text),
        ),
        ffi::X509_V_ERR_UNABLE_TO_GET_ISSUER_CERT_LOCALLY => (
            format!(
                "the issuer '{issuer_text}' of certificate '{subject_text}' cannot be found locally"
            ),
            None,
        ),
        ffi::X509_V_ERR_UNABLE_TO_GET_ISSUER_CERT => (
            format!("the issuer '{issuer_text}' of certificate '{subject_text}' is missing"),
            None,
        ),
        ffi::X509_V_ERR_UNABLE_TO_GET_CRL => (
            format!("the CRL issued by '{issuer_text}' is missing"),
            Some(issuer_text),
        ),
        ffi::X509_V_ERR_CERT_REVOKED => {
            (format!("certificate '{subject_text}' is revoked"), None)
        }
        other => (
            format!("certificate '{subject_text}' failed verification ({other}): {engine_text}"),
            None,
        ),
    };

    CertVerifyFailure {
        message,
        code,
        subject,
        crl_issuer,
        cert: cert.map(X509Ref::to_owned),
    }
}

/// Render a distinguished name as `key=value` pairs.
pub(crate) fn name_text(name: &X509NameRef) -> String {
    name.entries()
        .map(|entry| {
            let key = entry.object().nid().short_name().unwrap_or("UNKNOWN");
            let value = entry
                .data()
                .to_string()
                .unwrap_or_else(|_| String::from("<unrenderable>"));
            format!("{key}={value}")
        })
        .collect::<Vec<_>>()
        .join(", ")
}
