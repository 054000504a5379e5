// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Content fingerprints — SHA-256 over raw file bytes for duplicate detection.

use std::fs::File;
use std::path::Path;

use bildwerk_core::error::Result;
use sha2::{Digest, Sha256};

/// Lowercase hex SHA-256 digest of a file's raw bytes.
///
/// Two files with identical pixels but different encodings get different
/// fingerprints. Only meaningful for equality within a single run.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn as_hex(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fingerprint an in-memory buffer.
pub fn fingerprint_bytes(data: &[u8]) -> Fingerprint {
    let mut hasher = Sha256::new();
    hasher.update(data);
    Fingerprint(hex::encode(hasher.finalize()))
}

/// Fingerprint a file without loading it into memory at once.
pub fn fingerprint_file(path: &Path) -> Result<Fingerprint> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    std::io::copy(&mut file, &mut hasher)?;
    Ok(Fingerprint(hex::encode(hasher.finalize())))
}
