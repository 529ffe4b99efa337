//! Trust store construction.

use std::os::raw::c_int;

use openssl::error::ErrorStack;
use openssl::x509::store::{X509Store, X509StoreBuilder};
use openssl::x509::verify::X509VerifyFlags;
use openssl::x509::{X509, X509Crl, X509CrlRef, X509PurposeId};
use tracing::debug;

use crate::revocation::RevocationMode;

/// Build a verification store from trusted certificates and CRLs.
///
/// The store validates certificates used for any purpose (it is not
/// restricted to server- or client-auth extended key usage) and verifies
/// the signature of self-signed certificates it encounters, as a
/// corruption safety net. Revocation flags are derived from `revocation`.
///
/// `cacerts` must already contain every intermediate needed to complete a
/// chain; nothing is fetched on demand. Both inputs may be empty.
///
/// # Errors
///
/// Fails only on engine-level errors (allocation, registration of a
/// malformed object); given well-formed inputs construction succeeds.
pub fn build(
    cacerts: &[X509],
    crls: &[X509Crl],
    revocation: RevocationMode,
) -> Result<X509Store, ErrorStack> {
    let mut builder = X509StoreBuilder::new()?;
    builder.set_purpose(X509PurposeId::ANY)?;
    builder.set_flags(X509VerifyFlags::CHECK_SS_SIGNATURE | revocation.verify_flags())?;

    for cert in cacerts {
        builder.add_cert(cert.clone())?;
    }
    for crl in crls {
        add_crl(&mut builder, crl)?;
    }

    debug!(
        cacerts = cacerts.len(),
        crls = crls.len(),
        %revocation,
        "built trust store"
    );
    Ok(builder.build())
}

// rust-openssl exposes no CRL registration on the store builder, so bind
// X509_STORE_add_crl directly. The store takes its own reference to the
// CRL; the caller keeps ownership.
#[allow(unsafe_code)]
fn add_crl(builder: &mut X509StoreBuilder, crl: &X509CrlRef) -> Result<(), ErrorStack> {
    use foreign_types::{ForeignType, ForeignTypeRef};

    extern "C" {
        fn X509_STORE_add_crl(
            store: *mut openssl_sys::X509_STORE,
            crl: *mut openssl_sys::X509_CRL,
        ) -> c_int;
    }

    // SAFETY: both handles are live for the duration of the call and the
    // function only increments the CRL's reference count.
    let rc = unsafe { X509_STORE_add_crl(builder.as_ptr(), crl.as_ptr()) };
    if rc == 1 {
        Ok(())
    } else {
        Err(ErrorStack::get())
    }
}
