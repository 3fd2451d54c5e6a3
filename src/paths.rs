// Copyright 2025 Jayashankar
// SPDX-License-Identifier: Apache-2.0

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Reserved OpenSSL-style config path carried alongside the CA artifacts.
/// Computed for callers that expect it; never written.
pub const CA_CONFIG_FILE: &str = "ca.cnf";
pub const CA_KEY_FILE: &str = "ca-key.pem";
pub const CA_CERT_FILE: &str = "ca.pem";

/// Where the CA's key and certificate live inside an output directory.
///
/// This is the value [`crate::issue_ca`] returns and the only handle the
/// leaf issuer needs to sign with that CA.
#[derive(Debug, Clone)]
pub struct CaArtifacts {
    /// Reserved config path, never written.
    pub config: PathBuf,
    /// CA private key, PEM.
    pub key: PathBuf,
    /// CA certificate, PEM.
    pub pem: PathBuf,
}

impl CaArtifacts {
    pub fn in_dir(outdir: &Path) -> Self {
        Self {
            config: outdir.join(CA_CONFIG_FILE),
            key: outdir.join(CA_KEY_FILE),
            pem: outdir.join(CA_CERT_FILE),
        }
    }
}

/// Where a leaf certificate's artifacts live, plus the CA paths it was
/// (or will be) signed with.
#[derive(Debug, Clone)]
pub struct LeafArtifacts {
    /// Leaf private key, PEM.
    pub key: PathBuf,
    /// Leaf certificate, PEM.
    pub pem: PathBuf,
    /// Signing CA certificate.
    pub ca: PathBuf,
    /// Signing CA private key.
    pub ca_key: PathBuf,
}

impl LeafArtifacts {
    pub fn in_dir(outdir: &Path, basename: &str, ca: &CaArtifacts) -> Result<Self> {
        let basename = sanitize_basename(basename)?;
        Ok(Self {
            key: outdir.join(format!("{}-key.pem", basename)),
            pem: outdir.join(format!("{}.pem", basename)),
            ca: ca.pem.clone(),
            ca_key: ca.key.clone(),
        })
    }
}

/// Basenames that would collide with the CA's own artifact files.
pub const RESERVED_BASENAMES: &[&str] = &["ca"];

pub fn is_reserved_basename(name: &str) -> bool {
    RESERVED_BASENAMES.contains(&name.to_lowercase().as_str())
}

/// Validate a leaf basename for safe use in file paths.
fn sanitize_basename(name: &str) -> Result<&str> {
    if name.is_empty() {
        return Err(Error::InvalidBasename {
            name: name.to_string(),
            reason: "basename cannot be empty".into(),
        });
    }

    if name.contains('\0') {
        return Err(Error::InvalidBasename {
            name: name.to_string(),
            reason: "basename contains null byte".into(),
        });
    }

    if name.contains("..") {
        return Err(Error::InvalidBasename {
            name: name.to_string(),
            reason: "basename contains path traversal sequence".into(),
        });
    }

    if name.contains('/') || name.contains('\\') {
        return Err(Error::InvalidBasename {
            name: name.to_string(),
            reason: "basename contains path separator".into(),
        });
    }

    if name.starts_with('.') || name.ends_with('.') {
        return Err(Error::InvalidBasename {
            name: name.to_string(),
            reason: "basename cannot start or end with a dot".into(),
        });
    }

    for c in name.chars() {
        if !c.is_ascii_alphanumeric() && c != '.' && c != '-' && c != '_' {
            return Err(Error::InvalidBasename {
                name: name.to_string(),
                reason: format!("basename contains invalid character: '{}'", c),
            });
        }
    }

    if is_reserved_basename(name) {
        return Err(Error::InvalidBasename {
            name: name.to_string(),
            reason: "'ca' is reserved for the CA's own artifacts".into(),
        });
    }

    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ca_artifacts_layout() {
        let ca = CaArtifacts::in_dir(Path::new("/tmp/ssl"));
        assert_eq!(ca.config, PathBuf::from("/tmp/ssl/ca.cnf"));
        assert_eq!(ca.key, PathBuf::from("/tmp/ssl/ca-key.pem"));
        assert_eq!(ca.pem, PathBuf::from("/tmp/ssl/ca.pem"));
    }

    #[test]
    fn test_leaf_artifacts_layout() {
        let ca = CaArtifacts::in_dir(Path::new("/tmp/ssl"));
        let leaf = LeafArtifacts::in_dir(Path::new("/tmp/ssl"), "apiserver", &ca)
            .expect("apiserver should be a valid basename");

        assert_eq!(leaf.key, PathBuf::from("/tmp/ssl/apiserver-key.pem"));
        assert_eq!(leaf.pem, PathBuf::from("/tmp/ssl/apiserver.pem"));
        assert_eq!(leaf.ca, ca.pem);
        assert_eq!(leaf.ca_key, ca.key);
    }

    #[test]
    fn test_sanitize_basename_valid() {
        assert!(sanitize_basename("apiserver").is_ok());
        assert!(sanitize_basename("worker-1").is_ok());
        assert!(sanitize_basename("admin_user").is_ok());
        assert!(sanitize_basename("node.internal").is_ok());
    }

    #[test]
    fn test_sanitize_basename_rejects_empty() {
        assert!(sanitize_basename("").is_err());
    }

    #[test]
    fn test_sanitize_basename_rejects_path_traversal() {
        assert!(sanitize_basename("..").is_err());
        assert!(sanitize_basename("../etc/passwd").is_err());
        assert!(sanitize_basename("a..b").is_err());
    }

    #[test]
    fn test_sanitize_basename_rejects_path_separators() {
        assert!(sanitize_basename("/etc/passwd").is_err());
        assert!(sanitize_basename("foo/bar").is_err());
        assert!(sanitize_basename("foo\\bar").is_err());
    }

    #[test]
    fn test_sanitize_basename_rejects_null_bytes() {
        assert!(sanitize_basename("foo\0bar").is_err());
    }

    #[test]
    fn test_sanitize_basename_rejects_invalid_chars() {
        assert!(sanitize_basename("foo:bar").is_err());
        assert!(sanitize_basename("foo bar").is_err());
        assert!(sanitize_basename("foo*bar").is_err());
    }

    #[test]
    fn test_sanitize_basename_rejects_reserved() {
        assert!(sanitize_basename("ca").is_err());
        assert!(sanitize_basename("CA").is_err());
        assert!(sanitize_basename("cab").is_ok());
    }

    #[test]
    fn test_reserved_basenames() {
        assert!(is_reserved_basename("ca"));
        assert!(is_reserved_basename("CA"));
        assert!(!is_reserved_basename("apiserver"));
        assert!(!is_reserved_basename("worker"));
    }
}
