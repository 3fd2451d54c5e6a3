// Copyright 2025 Jayashankar
// SPDX-License-Identifier: Apache-2.0

//! Self-signed CA and Kubernetes service certificate issuance.
//!
//! Both issuers are idempotent over an output directory: when the target
//! certificate file already exists, the existing artifact paths are
//! returned and nothing is regenerated.
//!
//! ```rust,no_run
//! use kubecerts::{issue_ca, issue_leaf};
//! use std::path::Path;
//!
//! let outdir = Path::new("ssl");
//! let mut progress = std::io::stdout();
//!
//! let ca = issue_ca(outdir, &mut progress)?;
//! let leaf = issue_leaf(
//!     outdir,
//!     "apiserver",
//!     "kube-apiserver",
//!     &["10.3.0.1".to_string()],
//!     &ca,
//!     &mut progress,
//! )?;
//! println!("certificate at {}", leaf.pem.display());
//! # Ok::<(), kubecerts::Error>(())
//! ```

/// Certificate authority issuance.
pub mod ca;
/// Error types.
pub mod error;
/// Filesystem utilities.
pub mod fs;
/// Leaf certificate issuance.
pub mod leaf;
/// Artifact path layout.
pub mod paths;
/// X.509 certificate parsing and verification.
pub mod x509;

pub use ca::{issue_ca, CA_COMMON_NAME, CA_SERIAL, CA_VALIDITY_DAYS};
pub use error::{Error, Result};
pub use leaf::{issue_leaf, FIXED_DNS_SANS, LEAF_SERIAL, LEAF_VALIDITY_DAYS};
pub use paths::{is_reserved_basename, CaArtifacts, LeafArtifacts, RESERVED_BASENAMES};
pub use x509::{parse_cert_file, parse_cert_pem, verify_signed_by, CertInfo, SanEntry};
