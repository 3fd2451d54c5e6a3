// Copyright 2025 Jayashankar
// SPDX-License-Identifier: Apache-2.0

use crate::error::Result;
use crate::fs::{atomic_write, atomic_write_secret};
use crate::paths::CaArtifacts;
use rcgen::{
    BasicConstraints, Certificate, CertificateParams, DnType, IsCa, KeyPair, KeyUsagePurpose,
    SerialNumber,
};
use std::io::Write;
use std::path::Path;

pub const CA_COMMON_NAME: &str = "kub-ca";
/// Fixed serial of the self-signed CA certificate.
pub const CA_SERIAL: u8 = 1;
/// CA validity: 10 years.
pub const CA_VALIDITY_DAYS: i64 = 3650;

/// Generate the self-signed CA key and certificate in `outdir`.
///
/// If the CA certificate already exists at its computed path the existing
/// artifacts are returned untouched and nothing is written to `progress`.
/// The existing file is not read or validated.
pub fn issue_ca(outdir: &Path, progress: &mut dyn Write) -> Result<CaArtifacts> {
    let artifacts = CaArtifacts::in_dir(outdir);

    if artifacts.pem.exists() {
        return Ok(artifacts);
    }

    writeln!(progress, "Generating CA artifacts in {}", outdir.display())?;

    let key_pair = KeyPair::generate()?;
    let cert = create_ca_cert(&key_pair)?;

    atomic_write_secret(&artifacts.key, key_pair.serialize_pem().as_bytes())?;
    atomic_write(&artifacts.pem, cert.pem().as_bytes())?;

    Ok(artifacts)
}

fn create_ca_cert(key_pair: &KeyPair) -> Result<Certificate> {
    let mut params = CertificateParams::default();
    params
        .distinguished_name
        .push(DnType::CommonName, CA_COMMON_NAME);
    params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
    params.key_usages = vec![KeyUsagePurpose::KeyCertSign, KeyUsagePurpose::CrlSign];
    params.serial_number = Some(SerialNumber::from(vec![CA_SERIAL]));
    params.use_authority_key_identifier_extension = true;

    let now = time::OffsetDateTime::now_utc();
    params.not_before = now;
    params.not_after = now + time::Duration::days(CA_VALIDITY_DAYS);

    Ok(params.self_signed(key_pair)?)
}
