// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Directory enumeration shared by the clean-up passes.

use std::path::{Path, PathBuf};

use bildwerk_core::ImageExtension;
use bildwerk_core::error::Result;

/// Regular files in `dir` with a recognised image extension, sorted by file
/// name.
///
/// Sorting gives every pass the same enumeration order regardless of how
/// the filesystem returns entries.
pub fn image_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let path = entry.path();
        if ImageExtension::from_path(&path).is_some() {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Final path component as UTF-8, if it is valid UTF-8.
pub(crate) fn file_name(path: &Path) -> Option<&str> {
    path.file_name().and_then(|name| name.to_str())
}
