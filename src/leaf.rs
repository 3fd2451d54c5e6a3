// Copyright 2025 Jayashankar
// SPDX-License-Identifier: Apache-2.0

use crate::error::{Error, Result};
use crate::fs::{atomic_write, atomic_write_secret, ensure_dir};
use crate::paths::{CaArtifacts, LeafArtifacts};
use rcgen::{
    Certificate, CertificateParams, DnType, IsCa, Issuer, KeyPair, KeyUsagePurpose, SanType,
    SerialNumber,
};
use std::io::Write;
use std::net::IpAddr;
use std::path::Path;

/// Fixed serial of every CA-signed leaf certificate.
pub const LEAF_SERIAL: u8 = 2;
/// Leaf validity: 1 year.
pub const LEAF_VALIDITY_DAYS: i64 = 365;

/// DNS names every leaf certificate is valid for, ahead of any caller IPs.
pub const FIXED_DNS_SANS: &[&str] = &[
    "kubernetes",
    "kubernetes.default",
    "kubernetes.default.svc",
    "kubernetes.default.svc.cluster.local",
];

/// Generate a CA-signed key and certificate for one service identity.
///
/// The certificate's subject is `CN=<cn>`; its subject alternative names
/// are [`FIXED_DNS_SANS`] followed by one IP entry per element of
/// `ip_addrs`, in input order. Artifacts land in `outdir` under
/// `<basename>-key.pem` / `<basename>.pem`.
///
/// If the certificate already exists at its computed path the existing
/// artifacts are returned untouched and nothing is written to `progress`.
pub fn issue_leaf(
    outdir: &Path,
    basename: &str,
    cn: &str,
    ip_addrs: &[String],
    ca: &CaArtifacts,
    progress: &mut dyn Write,
) -> Result<LeafArtifacts> {
    let artifacts = LeafArtifacts::in_dir(outdir, basename, ca)?;

    if artifacts.pem.exists() {
        return Ok(artifacts);
    }

    writeln!(
        progress,
        "Generating SSL artifacts for {} in {}",
        basename,
        outdir.display()
    )?;

    ensure_dir(outdir)?;

    let ca_pem = std::fs::read_to_string(&artifacts.ca).map_err(|e| Error::ReadFile {
        path: artifacts.ca.clone(),
        source: e,
    })?;
    let ca_key_pem = std::fs::read_to_string(&artifacts.ca_key).map_err(|e| Error::ReadFile {
        path: artifacts.ca_key.clone(),
        source: e,
    })?;
    let ca_key = KeyPair::from_pem(&ca_key_pem)?;
    let issuer = Issuer::from_ca_cert_pem(&ca_pem, ca_key)?;

    let key_pair = KeyPair::generate()?;
    let cert = create_leaf_cert(cn, ip_addrs, &key_pair, &issuer)?;

    atomic_write_secret(&artifacts.key, key_pair.serialize_pem().as_bytes())?;
    atomic_write(&artifacts.pem, cert.pem().as_bytes())?;

    Ok(artifacts)
}

fn create_leaf_cert(
    cn: &str,
    ip_addrs: &[String],
    key_pair: &KeyPair,
    issuer: &Issuer<'_, KeyPair>,
) -> Result<Certificate> {
    let mut params = CertificateParams::default();
    params.distinguished_name.push(DnType::CommonName, cn);
    params.is_ca = IsCa::ExplicitNoCa;
    params.key_usages = vec![
        KeyUsagePurpose::DigitalSignature,
        KeyUsagePurpose::ContentCommitment,
        KeyUsagePurpose::KeyEncipherment,
    ];
    params.serial_number = Some(SerialNumber::from(vec![LEAF_SERIAL]));

    // SAN order is part of the contract: the fixed DNS names first, then
    // the caller's IPs in input order.
    for name in FIXED_DNS_SANS {
        params
            .subject_alt_names
            .push(SanType::DnsName((*name).to_string().try_into()?));
    }
    for addr in ip_addrs {
        let ip: IpAddr = addr
            .parse()
            .map_err(|_| Error::InvalidIpAddr(addr.clone()))?;
        params.subject_alt_names.push(SanType::IpAddress(ip));
    }

    let now = time::OffsetDateTime::now_utc();
    params.not_before = now;
    params.not_after = now + time::Duration::days(LEAF_VALIDITY_DAYS);

    Ok(params.signed_by(key_pair, issuer)?)
}
