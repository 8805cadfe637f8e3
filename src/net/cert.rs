//! Self-signed certificate generation for local development.
//!
//! Produces an in-memory key/certificate pair with `rcgen` — no OpenSSL
//! dependency and no `.pem` files required up front. The pair is meant
//! for `localhost` HTTPS during development; the serving path only ever
//! consumes certificates from configured PEM paths, so this generator is
//! reached through the management CLI, not the server.

use rcgen::{
    BasicConstraints, CertificateParams, DistinguishedName, DnType, ExtendedKeyUsagePurpose,
    IsCa, KeyPair, KeyUsagePurpose,
};
use thiserror::Error;

/// Error type for certificate generation.
#[derive(Debug, Error)]
pub enum CertError {
    #[error("certificate generation failed: {0}")]
    Generation(#[from] rcgen::Error),
}

/// PEM-encoded self-signed certificate and its private key.
#[derive(Debug, Clone)]
pub struct SelfSignedCert {
    pub key_pem: String,
    pub cert_pem: String,
}

/// Generate a self-signed certificate for `localhost` / `127.0.0.1`,
/// valid for one year from now.
pub fn generate_self_signed() -> Result<SelfSignedCert, CertError> {
    let mut params =
        CertificateParams::new(vec!["localhost".to_string(), "127.0.0.1".to_string()])?;

    let mut dn = DistinguishedName::new();
    dn.push(DnType::CommonName, "localhost");
    dn.push(DnType::CountryName, "US");
    dn.push(DnType::StateOrProvinceName, "State");
    dn.push(DnType::LocalityName, "City");
    dn.push(DnType::OrganizationName, "Site Server Dev");
    dn.push(DnType::OrganizationalUnitName, "Development");
    params.distinguished_name = dn;

    let not_before = time::OffsetDateTime::now_utc();
    params.not_before = not_before;
    params.not_after = not_before + time::Duration::days(365);

    params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
    params.key_usages = vec![
        KeyUsagePurpose::KeyCertSign,
        KeyUsagePurpose::DigitalSignature,
        KeyUsagePurpose::ContentCommitment,
        KeyUsagePurpose::KeyEncipherment,
        KeyUsagePurpose::DataEncipherment,
    ];
    params.extended_key_usages = vec![
        ExtendedKeyUsagePurpose::ServerAuth,
        ExtendedKeyUsagePurpose::ClientAuth,
        ExtendedKeyUsagePurpose::CodeSigning,
        ExtendedKeyUsagePurpose::EmailProtection,
        ExtendedKeyUsagePurpose::TimeStamping,
    ];

    let key_pair = KeyPair::generate()?;
    let cert = params.self_signed(&key_pair)?;

    Ok(SelfSignedCert {
        key_pem: key_pair.serialize_pem(),
        cert_pem: cert.pem(),
    })
}
