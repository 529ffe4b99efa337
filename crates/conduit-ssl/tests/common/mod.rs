//! Shared fixture loading and certificate minting for integration tests.
//!
//! Fixture material under `fixtures/` is a long-lived test CA hierarchy:
//! a root, an intermediate, one leaf per issuer, and CRLs (one empty, one
//! revoking `leaf.pem`). Certificates that need particular validity
//! windows or broken signatures are minted at runtime instead.

use std::time::{SystemTime, UNIX_EPOCH};

use openssl::asn1::Asn1Time;
use openssl::bn::{BigNum, MsbOption};
use openssl::hash::MessageDigest;
use openssl::pkey::{PKey, PKeyRef, Private};
use openssl::rsa::Rsa;
use openssl::x509::extension::BasicConstraints;
use openssl::x509::{X509, X509Crl, X509Name, X509NameBuilder, X509Req};

pub fn ca_cert() -> X509 {
    X509::from_pem(include_bytes!("../fixtures/ca.pem")).unwrap()
}

pub fn intermediate_cert() -> X509 {
    X509::from_pem(include_bytes!("../fixtures/intermediate.pem")).unwrap()
}

pub fn leaf_cert() -> X509 {
    X509::from_pem(include_bytes!("../fixtures/leaf.pem")).unwrap()
}

pub fn leaf_key() -> PKey<Private> {
    PKey::private_key_from_pem(include_bytes!("../fixtures/leaf.key")).unwrap()
}

pub fn leaf_int_cert() -> X509 {
    X509::from_pem(include_bytes!("../fixtures/leaf_int.pem")).unwrap()
}

pub fn leaf_int_key() -> PKey<Private> {
    PKey::private_key_from_pem(include_bytes!("../fixtures/leaf_int.key")).unwrap()
}

pub fn ca_crl_empty() -> X509Crl {
    X509Crl::from_pem(include_bytes!("../fixtures/ca_crl_empty.pem")).unwrap()
}

pub fn ca_crl_revoking_leaf() -> X509Crl {
    X509Crl::from_pem(include_bytes!("../fixtures/ca_crl_revoked.pem")).unwrap()
}

pub fn int_crl_empty() -> X509Crl {
    X509Crl::from_pem(include_bytes!("../fixtures/int_crl_empty.pem")).unwrap()
}

pub fn rsa_key() -> PKey<Private> {
    PKey::from_rsa(Rsa::generate(2048).unwrap()).unwrap()
}

fn common_name(cn: &str) -> X509Name {
    let mut name = X509NameBuilder::new().unwrap();
    name.append_entry_by_text("CN", cn).unwrap();
    name.build()
}

fn random_serial() -> openssl::asn1::Asn1Integer {
    let mut serial = BigNum::new().unwrap();
    serial.rand(128, MsbOption::MAYBE_ZERO, false).unwrap();
    serial.to_asn1_integer().unwrap()
}

fn unix_time_offset(days: i64) -> Asn1Time {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64;
    Asn1Time::from_unix(now + days * 86_400).unwrap()
}

/// Mint a self-signed CA valid for ten years.
pub fn mint_ca(cn: &str) -> (PKey<Private>, X509) {
    let key = rsa_key();
    let name = common_name(cn);

    let mut builder = X509::builder().unwrap();
    builder.set_version(2).unwrap();
    builder.set_subject_name(&name).unwrap();
    builder.set_issuer_name(&name).unwrap();
    builder.set_pubkey(&key).unwrap();
    builder.set_serial_number(&random_serial()).unwrap();
    builder.set_not_before(&unix_time_offset(-1)).unwrap();
    builder.set_not_after(&unix_time_offset(3650)).unwrap();
    builder
        .append_extension(BasicConstraints::new().critical().ca().build().unwrap())
        .unwrap();
    builder.sign(&key, MessageDigest::sha256()).unwrap();
    (key, builder.build())
}

/// Mint a leaf signed by `ca_key`, with validity offsets in days from now.
pub fn mint_leaf(
    cn: &str,
    issuer: &X509,
    ca_key: &PKeyRef<Private>,
    key: &PKeyRef<Private>,
    not_before_days: i64,
    not_after_days: i64,
) -> X509 {
    let mut builder = X509::builder().unwrap();
    builder.set_version(2).unwrap();
    builder.set_subject_name(&common_name(cn)).unwrap();
    builder.set_issuer_name(issuer.subject_name()).unwrap();
    builder.set_pubkey(key).unwrap();
    builder.set_serial_number(&random_serial()).unwrap();
    builder
        .set_not_before(&unix_time_offset(not_before_days))
        .unwrap();
    builder
        .set_not_after(&unix_time_offset(not_after_days))
        .unwrap();
    builder.sign(ca_key, MessageDigest::sha256()).unwrap();
    builder.build()
}

/// Mint a "self-signed" CA whose signature does not match its own public
/// key: the certificate carries one key pair's public key but is signed
/// with another. Only detectable with the self-signature sanity check.
pub fn mint_corrupt_self_signed(cn: &str) -> X509 {
    let carried = rsa_key();
    let signer = rsa_key();
    let name = common_name(cn);

    let mut builder = X509::builder().unwrap();
    builder.set_version(2).unwrap();
    builder.set_subject_name(&name).unwrap();
    builder.set_issuer_name(&name).unwrap();
    builder.set_pubkey(&carried).unwrap();
    builder.set_serial_number(&random_serial()).unwrap();
    builder.set_not_before(&unix_time_offset(-1)).unwrap();
    builder.set_not_after(&unix_time_offset(3650)).unwrap();
    builder
        .append_extension(BasicConstraints::new().critical().ca().build().unwrap())
        .unwrap();
    builder.sign(&signer, MessageDigest::sha256()).unwrap();
    builder.build()
}

/// Mint a certificate signing request for `cn`, signed by `key`.
pub fn mint_request(cn: &str, key: &PKeyRef<Private>) -> X509Req {
    let mut builder = X509Req::builder().unwrap();
    builder.set_subject_name(&common_name(cn)).unwrap();
    builder.set_pubkey(key).unwrap();
    builder.sign(key, MessageDigest::sha256()).unwrap();
    builder.build()
}
