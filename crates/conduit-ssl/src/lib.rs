//! conduit-ssl: certificate verification and TLS trust-context engine.
//!
//! The trust-establishment core of the Conduit agent's secure client. It
//! builds X.509 trust stores, verifies certificate chains under a
//! configurable revocation policy, and assembles immutable trust contexts
//! that the transport layer uses to open authenticated TLS connections.
//!
//! # Flow
//!
//! ```text
//! caller material (parsed certs, CRLs, keys)
//!   -> store::build()            trust store, purpose=any + revocation flags
//!   -> verify::verify_cert()     path validation, leaf-to-root chain
//!   -> SslContext                frozen, shared across connection attempts
//! ```
//!
//! The [`verify::verify_request`] entry point is independent of the
//! context-build path; issuance workflows use it to confirm a CSR's
//! embedded signature before countersigning.
//!
//! This crate performs no I/O and never parses raw PEM/DER itself: it
//! only builds trust decisions from in-memory material it is handed.
//! Everything it returns is immutable, so contexts and stores can be
//! shared freely across threads.
//!
//! # Example
//!
//! ```rust,ignore
//! use conduit_ssl::{RevocationMode, SslContext};
//!
//! let context = SslContext::builder()
//!     .cacerts(cacerts)
//!     .crls(crls)
//!     .private_key(key)
//!     .client_cert(cert)
//!     .revocation(RevocationMode::Chain)
//!     .build()?;
//!
//! assert!(context.verify_peer());
//! ```

pub mod config;
pub mod context;
pub mod error;
pub mod revocation;
pub mod store;
pub mod verify;

// Re-exports for convenience.
pub use config::SslConfig;
pub use context::{ClientIdentity, SslContext, SslContextBuilder};
pub use error::{CertVerifyFailure, SslError};
pub use revocation::RevocationMode;
pub use verify::{verify_cert, verify_request};

/// Result type for conduit-ssl operations.
pub type Result<T> = std::result::Result<T, SslError>;
