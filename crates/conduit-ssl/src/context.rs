//! Trust-context assembly.
//!
//! An [`SslContext`] is the frozen result the transport layer consumes to
//! open authenticated TLS connections. It comes in three shapes:
//!
//! - **insecure**: no peer verification at all, for explicitly degraded
//!   or bootstrap modes;
//! - **server trust**: a trust store for verifying the server, no client
//!   identity;
//! - **mutual auth**: server trust plus a client private key, client
//!   certificate, and the client's resolved chain.
//!
//! Contexts are immutable once returned and safe to share across threads;
//! construction is comparatively expensive (path validation for the
//! mutual-auth shape), so callers are expected to build one and reuse it
//! across connections.

use std::fmt;

use openssl::pkey::{Id, PKey, PKeyRef, Private};
use openssl::x509::store::{X509Store, X509StoreRef};
use openssl::x509::{X509, X509Crl, X509Ref};
use tracing::debug;

use crate::error::SslError;
use crate::revocation::RevocationMode;
use crate::verify::{name_text, verify_cert};
use crate::{store, Result};

/// Client identity material carried by a mutual-auth context.
pub struct ClientIdentity {
    key: PKey<Private>,
    cert: X509,
    chain: Vec<X509>,
}

impl ClientIdentity {
    /// The client's private key.
    pub fn private_key(&self) -> &PKeyRef<Private> {
        &self.key
    }

    /// The client certificate presented during the handshake.
    pub fn certificate(&self) -> &X509Ref {
        &self.cert
    }

    /// The client certificate's resolved chain, leaf first, root last.
    /// Never empty.
    pub fn chain(&self) -> &[X509] {
        &self.chain
    }
}

/// An immutable trust context for opening TLS connections.
///
/// All fields are private; nothing mutates a context after construction,
/// so a single instance can parameterize many concurrent connection
/// attempts without locking.
pub struct SslContext {
    store: X509Store,
    cacerts: Vec<X509>,
    crls: Vec<X509Crl>,
    revocation: RevocationMode,
    verify_peer: bool,
    identity: Option<ClientIdentity>,
}

impl SslContext {
    /// Create a context that performs no peer verification.
    ///
    /// The result is explicitly unauthenticated and must only be used in
    /// degraded or bootstrap modes, never as a default. An empty store is
    /// still constructed for API uniformity; it takes no part in
    /// verification.
    pub fn insecure() -> Result<Self> {
        let store = store::build(&[], &[], RevocationMode::Disabled)?;
        debug!("created insecure context, peer verification disabled");
        Ok(Self {
            store,
            cacerts: Vec::new(),
            crls: Vec::new(),
            revocation: RevocationMode::Disabled,
            verify_peer: false,
            identity: None,
        })
    }

    /// Create a context that verifies the server against `cacerts` and
    /// `crls`, with no client identity.
    ///
    /// No peer certificate is verified here; the transport layer performs
    /// server-certificate verification during the handshake using this
    /// context's store.
    pub fn root_context(
        cacerts: Vec<X509>,
        crls: Vec<X509Crl>,
        revocation: RevocationMode,
    ) -> Result<Self> {
        let store = store::build(&cacerts, &crls, revocation)?;
        Ok(Self {
            store,
            cacerts,
            crls,
            revocation,
            verify_peer: true,
            identity: None,
        })
    }

    /// Start assembling a mutual-auth context.
    pub fn builder() -> SslContextBuilder {
        SslContextBuilder::new()
    }

    /// Whether the transport layer must verify the peer's certificate.
    pub const fn verify_peer(&self) -> bool {
        self.verify_peer
    }

    /// The verification store, for parameterizing the handshake.
    pub fn store(&self) -> &X509StoreRef {
        &self.store
    }

    /// The trusted certificates this context was built from.
    pub fn cacerts(&self) -> &[X509] {
        &self.cacerts
    }

    /// The CRLs this context was built from.
    pub fn crls(&self) -> &[X509Crl] {
        &self.crls
    }

    /// The revocation mode the store was built with.
    pub const fn revocation(&self) -> RevocationMode {
        self.revocation
    }

    /// Client identity material, present only in mutual-auth contexts.
    pub const fn client_identity(&self) -> Option<&ClientIdentity> {
        self.identity.as_ref()
    }
}

// Manual impl: the store and key material have no useful Debug output,
// so summarize the shape instead.
impl fmt::Debug for SslContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SslContext")
            .field("verify_peer", &self.verify_peer)
            .field("revocation", &self.revocation)
            .field("cacerts", &self.cacerts.len())
            .field("crls", &self.crls.len())
            .field("client_identity", &self.identity.is_some())
            .finish_non_exhaustive()
    }
}

/// Assembles a mutual-auth [`SslContext`].
///
/// Each input starts unset; `cacerts` and `crls` may be set to empty
/// collections, but all four inputs must be supplied before
/// [`build`](Self::build). This keeps "absent" distinct from "empty".
#[derive(Default)]
pub struct SslContextBuilder {
    cacerts: Option<Vec<X509>>,
    crls: Option<Vec<X509Crl>>,
    private_key: Option<PKey<Private>>,
    client_cert: Option<X509>,
    revocation: RevocationMode,
}

impl SslContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Trusted root and intermediate certificates.
    #[must_use]
    pub fn cacerts(mut self, cacerts: Vec<X509>) -> Self {
        self.cacerts = Some(cacerts);
        self
    }

    /// Certificate revocation lists.
    #[must_use]
    pub fn crls(mut self, crls: Vec<X509Crl>) -> Self {
        self.crls = Some(crls);
        self
    }

    /// The client's private key.
    #[must_use]
    pub fn private_key(mut self, key: PKey<Private>) -> Self {
        self.private_key = Some(key);
        self
    }

    /// The client certificate to present during mutual authentication.
    #[must_use]
    pub fn client_cert(mut self, cert: X509) -> Self {
        self.client_cert = Some(cert);
        self
    }

    /// Revocation mode; defaults to [`RevocationMode::Chain`].
    #[must_use]
    pub fn revocation(mut self, revocation: RevocationMode) -> Self {
        self.revocation = revocation;
        self
    }

    /// Build the mutual-auth context.
    ///
    /// Verifies the client certificate against the assembled store, then
    /// confirms the private key is RSA and corresponds to the client
    /// certificate's public key.
    ///
    /// # Errors
    ///
    /// - [`SslError::MissingArgument`] if any input was never supplied.
    /// - [`SslError::CertVerify`] if the client certificate does not
    ///   validate against the store.
    /// - [`SslError::UnsupportedKeyType`] for a non-RSA private key.
    /// - [`SslError::KeyMismatch`] if the key and certificate do not
    ///   correspond.
    pub fn build(self) -> Result<SslContext> {
        let cacerts = self.cacerts.ok_or(SslError::MissingArgument("cacerts"))?;
        let crls = self.crls.ok_or(SslError::MissingArgument("crls"))?;
        let private_key = self
            .private_key
            .ok_or(SslError::MissingArgument("private_key"))?;
        let client_cert = self
            .client_cert
            .ok_or(SslError::MissingArgument("client_cert"))?;

        let store = store::build(&cacerts, &crls, self.revocation)?;
        let chain = verify_cert(&store, &client_cert)?;

        if private_key.id() != Id::RSA {
            return Err(SslError::UnsupportedKeyType(format!(
                "{:?}",
                private_key.id()
            )));
        }
        let cert_key = client_cert.public_key()?;
        if !private_key.public_eq(&cert_key) {
            return Err(SslError::KeyMismatch {
                subject: name_text(client_cert.subject_name()),
            });
        }

        debug!(
            subject = %name_text(client_cert.subject_name()),
            chain_len = chain.len(),
            "assembled mutual-auth context"
        );
        Ok(SslContext {
            store,
            cacerts,
            crls,
            revocation: self.revocation,
            verify_peer: true,
            identity: Some(ClientIdentity {
                key: private_key,
                cert: client_cert,
                chain,
            }),
        })
    }
}
