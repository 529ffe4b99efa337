//! Revocation-checking policy.

use std::fmt;
use std::str::FromStr;

use openssl::x509::verify::X509VerifyFlags;
use serde::{Deserialize, Serialize};

/// At which hops of a certificate chain CRL-based revocation is checked.
///
/// The mode only controls the checking scope; supplying a CRL set complete
/// enough for that scope is the caller's responsibility.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RevocationMode {
    /// No revocation checking.
    Disabled,
    /// Check the CRL for the end-entity certificate only.
    Leaf,
    /// Check a CRL for every certificate in the chain.
    #[default]
    Chain,
}

impl RevocationMode {
    /// Verification flags this mode contributes to trust-store construction.
    pub(crate) fn verify_flags(self) -> X509VerifyFlags {
        match self {
            Self::Disabled => X509VerifyFlags::empty(),
            Self::Leaf => X509VerifyFlags::CRL_CHECK,
            Self::Chain => X509VerifyFlags::CRL_CHECK | X509VerifyFlags::CRL_CHECK_ALL,
        }
    }
}

impl fmt::Display for RevocationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Disabled => "disabled",
            Self::Leaf => "leaf",
            Self::Chain => "chain",
        };
        f.write_str(s)
    }
}

impl FromStr for RevocationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "disabled" => Ok(Self::Disabled),
            "leaf" => Ok(Self::Leaf),
            "chain" => Ok(Self::Chain),
            other => Err(format!(
                "unknown revocation mode '{other}', expected disabled, leaf or chain"
            )),
        }
    }
}
