// Copyright 2025 Jayashankar
// SPDX-License-Identifier: Apache-2.0

//! Parse and verify generated certificates without shelling out to openssl.

use crate::error::{Error, Result};
use std::net::IpAddr;
use std::path::Path;
use x509_parser::prelude::*;

/// One subject-alternative-name entry, in certificate order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SanEntry {
    Dns(String),
    Ip(IpAddr),
}

impl std::fmt::Display for SanEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SanEntry::Dns(name) => write!(f, "DNS:{}", name),
            SanEntry::Ip(ip) => write!(f, "IP:{}", ip),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CertInfo {
    /// Raw DER serial bytes (minimal encoding).
    pub serial: Vec<u8>,
    pub not_before_timestamp: i64,
    pub not_after_timestamp: i64,
    pub common_name: Option<String>,
    pub issuer_common_name: Option<String>,
    /// SAN entries in the order they appear in the extension.
    pub subject_alt_names: Vec<SanEntry>,
    pub is_ca: bool,
    pub basic_constraints_critical: bool,
}

impl CertInfo {
    pub fn validity_seconds(&self) -> i64 {
        self.not_after_timestamp - self.not_before_timestamp
    }

    pub fn expiry_string(&self) -> String {
        match ::time::OffsetDateTime::from_unix_timestamp(self.not_after_timestamp) {
            Ok(dt) => format!("{}-{:02}-{:02}", dt.year(), dt.month() as u8, dt.day()),
            Err(_) => "Invalid date".to_string(),
        }
    }

    pub fn days_remaining(&self) -> i64 {
        let now = ::time::OffsetDateTime::now_utc();
        match ::time::OffsetDateTime::from_unix_timestamp(self.not_after_timestamp) {
            Ok(expiry) => (expiry - now).whole_days(),
            Err(_) => -1, // Treat invalid timestamps as expired
        }
    }
}

pub fn parse_cert_file(path: &Path) -> Result<CertInfo> {
    let pem_data = std::fs::read_to_string(path).map_err(|e| Error::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse_cert_pem(&pem_data)
}

pub fn parse_cert_pem(pem_str: &str) -> Result<CertInfo> {
    let der = cert_der(pem_str)?;
    let (_, cert) = X509Certificate::from_der(&der)
        .map_err(|e| Error::CertParse(format!("Invalid X.509: {}", e)))?;

    let serial = cert.raw_serial().to_vec();
    let not_before_timestamp = cert.validity().not_before.timestamp();
    let not_after_timestamp = cert.validity().not_after.timestamp();

    let common_name = cert
        .subject()
        .iter_common_name()
        .next()
        .and_then(|cn| cn.as_str().ok())
        .map(String::from);
    let issuer_common_name = cert
        .issuer()
        .iter_common_name()
        .next()
        .and_then(|cn| cn.as_str().ok())
        .map(String::from);

    let mut subject_alt_names = Vec::new();
    let mut is_ca = false;
    let mut basic_constraints_critical = false;

    for ext in cert.extensions() {
        match ext.parsed_extension() {
            ParsedExtension::SubjectAlternativeName(san) => {
                for name in &san.general_names {
                    match name {
                        GeneralName::DNSName(dns) => {
                            subject_alt_names.push(SanEntry::Dns(dns.to_string()));
                        }
                        GeneralName::IPAddress(ip_bytes) if ip_bytes.len() == 4 => {
                            let ip = std::net::Ipv4Addr::new(
                                ip_bytes[0],
                                ip_bytes[1],
                                ip_bytes[2],
                                ip_bytes[3],
                            );
                            subject_alt_names.push(SanEntry::Ip(IpAddr::V4(ip)));
                        }
                        GeneralName::IPAddress(ip_bytes) if ip_bytes.len() == 16 => {
                            if let Ok(bytes) = <[u8; 16]>::try_from(*ip_bytes) {
                                let ip = std::net::Ipv6Addr::from(bytes);
                                subject_alt_names.push(SanEntry::Ip(IpAddr::V6(ip)));
                            }
                        }
                        _ => {}
                    }
                }
            }
            ParsedExtension::BasicConstraints(bc) => {
                is_ca = bc.ca;
                basic_constraints_critical = ext.critical;
            }
            _ => {}
        }
    }

    Ok(CertInfo {
        serial,
        not_before_timestamp,
        not_after_timestamp,
        common_name,
        issuer_common_name,
        subject_alt_names,
        is_ca,
        basic_constraints_critical,
    })
}

/// Check that `cert_pem` carries a signature made by the key in `issuer_pem`.
pub fn verify_signed_by(cert_pem: &str, issuer_pem: &str) -> Result<()> {
    let der = cert_der(cert_pem)?;
    let issuer_der = cert_der(issuer_pem)?;

    let (_, cert) = X509Certificate::from_der(&der)
        .map_err(|e| Error::CertParse(format!("Invalid X.509: {}", e)))?;
    let (_, issuer) = X509Certificate::from_der(&issuer_der)
        .map_err(|e| Error::CertParse(format!("Invalid X.509: {}", e)))?;

    cert.verify_signature(Some(issuer.public_key()))
        .map_err(|e| Error::Verify(e.to_string()))
}

fn cert_der(pem_str: &str) -> Result<Vec<u8>> {
    let pem = ::pem::parse(pem_str)
        .map_err(|e| Error::CertParse(format!("Failed to parse PEM: {}", e)))?;

    if pem.tag() != "CERTIFICATE" {
        return Err(Error::CertParse(format!(
            "Expected CERTIFICATE, got {}",
            pem.tag()
        )));
    }

    Ok(pem.into_contents())
}
