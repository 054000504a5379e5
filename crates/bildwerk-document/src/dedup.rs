// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Duplicate removal by raw-byte fingerprint.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::path::{Path, PathBuf};

use bildwerk_core::error::Result;
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::directory::image_files;
use crate::fingerprint::fingerprint_file;

/// A deleted file and the earlier file it duplicated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Duplicate {
    pub removed: PathBuf,
    pub original: PathBuf,
}

/// Outcome of one deduplication pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DedupReport {
    /// Number of image files fingerprinted.
    pub scanned: usize,
    pub duplicates: Vec<Duplicate>,
}

/// Delete every image in `dir` whose bytes match an earlier image.
///
/// Files are visited in name order and the first file with a given
/// fingerprint is kept. All files are hashed before anything is deleted, and
/// deletion is by path, so the result does not depend on a second listing.
/// Non-image files are never read or removed. Identical pixels stored with
/// different encodings are not duplicates.
#[instrument(skip_all, fields(dir = %dir.display()))]
pub fn remove_duplicates(dir: &Path) -> Result<DedupReport> {
    info!("Removing duplicates");
    let files = image_files(dir)?;
    let mut first_seen: HashMap<_, PathBuf> = HashMap::with_capacity(files.len());
    let mut report = DedupReport {
        scanned: files.len(),
        ..DedupReport::default()
    };

    for path in files {
        match first_seen.entry(fingerprint_file(&path)?) {
            Entry::Occupied(original) => report.duplicates.push(Duplicate {
                removed: path,
                original: original.get().clone(),
            }),
            Entry::Vacant(slot) => {
                slot.insert(path);
            }
        }
    }

    for duplicate in &report.duplicates {
        std::fs::remove_file(&duplicate.removed)?;
        debug!(
            removed = %duplicate.removed.display(),
            original = %duplicate.original.display(),
            "Duplicate removed"
        );
    }

    info!(
        scanned = report.scanned,
        removed = report.duplicates.len(),
        "Duplicate removal complete"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage};

    fn names(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .expect("read dir")
            .map(|e| e.expect("entry").file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn unique_files_are_all_kept() {
        let dir = tempfile::tempdir().expect("tempdir");
        for (i, name) in ["a-000.png", "a-001.jpg", "a-002.tif"].iter().enumerate() {
            std::fs::write(dir.path().join(name), [i as u8; 16]).expect("write");
        }

        let report = remove_duplicates(dir.path()).expect("dedup");
        assert_eq!(report.scanned, 3);
        assert!(report.duplicates.is_empty());
        assert_eq!(names(dir.path()).len(), 3);
    }

    #[test]
    fn copies_collapse_to_earliest_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        for name in ["a-003.png", "a-001.png", "a-002.jpg", "a-004.png"] {
            std::fs::write(dir.path().join(name), b"same bytes").expect("write");
        }
        std::fs::write(dir.path().join("a-000.png"), b"other bytes").expect("write");

        let report = remove_duplicates(dir.path()).expect("dedup");
        assert_eq!(report.duplicates.len(), 3);
        assert!(
            report
                .duplicates
                .iter()
                .all(|d| d.original == dir.path().join("a-001.png"))
        );
        assert_eq!(names(dir.path()), ["a-000.png", "a-001.png"]);
    }

    #[test]
    fn non_image_files_are_left_alone() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("a-001.png"), b"same").expect("write");
        std::fs::write(dir.path().join("a-002.txt"), b"same").expect("write");
        std::fs::write(dir.path().join("a-003.ppm"), b"same").expect("write");

        let report = remove_duplicates(dir.path()).expect("dedup");
        assert_eq!(report.scanned, 1);
        assert_eq!(names(dir.path()), ["a-001.png", "a-002.txt", "a-003.ppm"]);
    }

    #[test]
    fn same_pixels_different_encoding_are_kept() {
        let dir = tempfile::tempdir().expect("tempdir");
        let img = RgbImage::from_pixel(4, 4, Rgb([1, 2, 3]));
        img.save_with_format(dir.path().join("a-001.png"), ImageFormat::Png)
            .expect("png");
        img.save_with_format(dir.path().join("a-002.tif"), ImageFormat::Tiff)
            .expect("tiff");

        let report = remove_duplicates(dir.path()).expect("dedup");
        assert!(report.duplicates.is_empty());
    }

    #[test]
    fn empty_directory_is_fine() {
        let dir = tempfile::tempdir().expect("tempdir");
        let report = remove_duplicates(dir.path()).expect("dedup");
        assert_eq!(report.scanned, 0);
    }
}
