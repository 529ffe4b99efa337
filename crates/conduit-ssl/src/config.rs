//! TLS settings supplied by the agent's configuration layer.

use serde::{Deserialize, Serialize};

use crate::revocation::RevocationMode;

/// TLS-related settings for context assembly.
///
/// This crate has no default-resolution logic of its own; the surrounding
/// configuration subsystem decides where these values come from and hands
/// them in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SslConfig {
    /// Revocation checking mode (default: chain).
    #[serde(default)]
    pub revocation: RevocationMode,
}
