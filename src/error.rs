// Copyright 2025 Jayashankar
// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to read file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write file {path}: {source}")]
    WriteFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Certificate generation failed: {0}")]
    CertGen(#[from] rcgen::Error),

    #[error("Invalid basename '{name}': {reason}")]
    InvalidBasename { name: String, reason: String },

    #[error("Invalid IP address '{0}'")]
    InvalidIpAddr(String),

    #[error("Invalid path (non-UTF8): {0}")]
    InvalidPath(PathBuf),

    #[error("Failed to parse certificate: {0}")]
    CertParse(String),

    #[error("Signature verification failed: {0}")]
    Verify(String),

    #[error("Failed to write progress message: {0}")]
    Progress(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
