// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Soft-mask merging.
//
// The extractor writes a soft mask as a separate grayscale file numbered
// directly after its base image. For every mask named in the merge list we
// locate the base, apply the mask's luminance as alpha, and replace the two
// files with one PNG under the base image's name.

use std::path::{Path, PathBuf};

use bildwerk_core::error::Result;
use bildwerk_core::{ImageExtension, ImageName, MergeList, SequenceNumber, UnreadablePolicy};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::directory::{file_name, image_files};
use crate::image::ImageProcessor;

/// Maps a soft mask's sequence number to its base image's sequence number.
pub trait PairingRule: Send + Sync {
    fn base_sequence(&self, mask: &SequenceNumber) -> Option<SequenceNumber>;
}

/// The base image is the one numbered immediately before the mask.
#[derive(Debug, Clone, Copy, Default)]
pub struct PredecessorPairing;

impl PairingRule for PredecessorPairing {
    fn base_sequence(&self, mask: &SequenceNumber) -> Option<SequenceNumber> {
        mask.predecessor()
    }
}

/// Ordered list of extensions tried when opening a base image.
#[derive(Debug, Clone)]
pub struct BaseLookup {
    order: Vec<ImageExtension>,
}

impl Default for BaseLookup {
    fn default() -> Self {
        Self::new(ImageExtension::LOOKUP_ORDER.to_vec())
    }
}

impl BaseLookup {
    pub fn new(order: Vec<ImageExtension>) -> Self {
        Self { order }
    }

    /// First candidate `<dir>/<stem>.<ext>` that exists and decodes.
    pub fn resolve(&self, dir: &Path, stem: &str) -> Option<(PathBuf, ImageProcessor)> {
        self.order.iter().find_map(|ext| {
            let candidate = dir.join(format!("{stem}.{ext}"));
            if !candidate.is_file() {
                return None;
            }
            match ImageProcessor::open(&candidate) {
                Ok(image) => Some((candidate, image)),
                Err(err) => {
                    debug!(candidate = %candidate.display(), error = %err, "Base candidate did not open");
                    None
                }
            }
        })
    }
}

/// Outcome of one merge pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MergeReport {
    /// Composited PNGs written.
    pub merged: Vec<PathBuf>,
    /// Masks left in place because no base image could be opened.
    pub unpaired: Vec<PathBuf>,
    /// Masks left in place because the base image has a different size.
    pub mismatched: Vec<PathBuf>,
    /// Masks left in place because they could not be decoded.
    pub unreadable: Vec<PathBuf>,
}

/// Composites soft masks onto their base images.
pub struct MaskMerger {
    pairing: Box<dyn PairingRule>,
    lookup: BaseLookup,
    policy: UnreadablePolicy,
}

impl Default for MaskMerger {
    fn default() -> Self {
        Self::new(UnreadablePolicy::default())
    }
}

impl MaskMerger {
    pub fn new(policy: UnreadablePolicy) -> Self {
        Self {
            pairing: Box::new(PredecessorPairing),
            lookup: BaseLookup::default(),
            policy,
        }
    }

    /// Swap the mask-to-base numbering rule.
    pub fn with_pairing(mut self, pairing: impl PairingRule + 'static) -> Self {
        self.pairing = Box::new(pairing);
        self
    }

    pub fn with_lookup(mut self, lookup: BaseLookup) -> Self {
        self.lookup = lookup;
        self
    }

    /// Merge every soft mask in `dir` named by `merge_list`.
    ///
    /// Files are visited in name order. A missing base or a size mismatch is
    /// logged and leaves the files untouched; I/O failures abort the pass.
    #[instrument(skip_all, fields(dir = %dir.display(), masks = merge_list.len()))]
    pub fn merge(&self, merge_list: &MergeList, dir: &Path) -> Result<MergeReport> {
        info!("Merging soft masks");
        let mut report = MergeReport::default();
        if merge_list.is_empty() {
            return Ok(report);
        }

        for mask_path in image_files(dir)? {
            let Some(name) = file_name(&mask_path).and_then(ImageName::parse) else {
                continue;
            };
            if !merge_list.contains(&name.sequence) || !mask_path.is_file() {
                continue;
            }
            self.merge_one(dir, &mask_path, &name, &mut report)?;
        }

        info!(
            merged = report.merged.len(),
            unpaired = report.unpaired.len(),
            mismatched = report.mismatched.len(),
            "Soft mask merge complete"
        );
        Ok(report)
    }

    fn merge_one(
        &self,
        dir: &Path,
        mask_path: &Path,
        name: &ImageName,
        report: &mut MergeReport,
    ) -> Result<()> {
        // A mask numbered zero has no base and is never acted on.
        let Some(base_sequence) = self.pairing.base_sequence(&name.sequence) else {
            debug!(mask = %mask_path.display(), "Soft mask has no base image number");
            return Ok(());
        };

        let mask = match ImageProcessor::open(mask_path) {
            Ok(mask) => mask.luminance(),
            Err(err) => match self.policy {
                UnreadablePolicy::Abort => return Err(err),
                UnreadablePolicy::Skip => {
                    warn!(error = %err, "WARNING: skipping unreadable soft mask");
                    report.unreadable.push(mask_path.to_path_buf());
                    return Ok(());
                }
            },
        };

        let base_stem = name.sibling_stem(&base_sequence);

        let Some((base_path, base)) = self.lookup.resolve(dir, &base_stem) else {
            warn!(
                "WARNING: {} does not exist to merge with SMASK - {}",
                dir.join(&base_stem).display(),
                mask_path.display()
            );
            report.unpaired.push(mask_path.to_path_buf());
            return Ok(());
        };

        if base.width() != mask.width() || base.height() != mask.height() {
            warn!(
                "WARNING: {} is not the same size as {}",
                base_path.display(),
                mask_path.display()
            );
            report.mismatched.push(mask_path.to_path_buf());
            return Ok(());
        }

        // Sources are removed only after the composite is on disk.
        let output = dir.join(format!("{base_stem}.{}", ImageExtension::Png));
        base.with_alpha(&mask)?.save_png(&output)?;
        std::fs::remove_file(mask_path)?;
        if base_path != output {
            std::fs::remove_file(&base_path)?;
        }

        debug!(
            base = %base_path.display(),
            mask = %mask_path.display(),
            output = %output.display(),
            "Soft mask merged"
        );
        report.merged.push(output);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::jp2::tests::jp2_file;
    use crate::testing::capture_logs;
    use bildwerk_core::BildwerkError;
    use image::{DynamicImage, GrayImage, Luma, Rgb, RgbImage};

    fn write_rgb(dir: &Path, name: &str, width: u32, height: u32) {
        RgbImage::from_pixel(width, height, Rgb([200, 100, 50]))
            .save(dir.join(name))
            .expect("write rgb");
    }

    fn write_mask(dir: &Path, name: &str, width: u32, height: u32) {
        GrayImage::from_fn(width, height, |x, _| Luma([(x * 10) as u8]))
            .save(dir.join(name))
            .expect("write mask");
    }

    fn names(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .expect("read dir")
            .map(|e| e.expect("entry").file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    fn merge_list(entries: &[&str]) -> MergeList {
        entries.iter().collect()
    }

    #[test]
    fn predecessor_pairing_steps_back_one() {
        let mask = SequenceNumber::parse("010").unwrap();
        assert_eq!(PredecessorPairing.base_sequence(&mask).unwrap().as_str(), "9");
        assert!(PredecessorPairing.base_sequence(&SequenceNumber::parse("0").unwrap()).is_none());
    }

    #[test]
    fn merges_jpg_base_into_single_png() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_rgb(dir.path(), "Book-004.jpg", 8, 6);
        write_mask(dir.path(), "Book-005.png", 8, 6);
        write_rgb(dir.path(), "Book-006.png", 3, 3);

        let report = MaskMerger::default()
            .merge(&merge_list(&["5"]), dir.path())
            .expect("merge");

        assert_eq!(report.merged, [dir.path().join("Book-004.png")]);
        assert_eq!(names(dir.path()), ["Book-004.png", "Book-006.png"]);

        let merged = ImageProcessor::open(dir.path().join("Book-004.png"))
            .expect("open merged")
            .into_dynamic();
        let rgba = merged.as_rgba8().expect("rgba");
        assert_eq!(rgba.get_pixel(0, 0).0[3], 0);
        assert_eq!(rgba.get_pixel(7, 0).0[3], 70);
    }

    #[test]
    fn png_base_is_rewritten_in_place() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_rgb(dir.path(), "doc-000-010.png", 4, 4);
        write_mask(dir.path(), "doc-000-011.png", 4, 4);

        let report = MaskMerger::default()
            .merge(&merge_list(&["11"]), dir.path())
            .expect("merge");

        assert_eq!(report.merged.len(), 1);
        assert_eq!(names(dir.path()), ["doc-000-010.png"]);
        let merged = ImageProcessor::open(dir.path().join("doc-000-010.png")).expect("open");
        assert!(merged.as_dynamic().color().has_alpha());
    }

    #[test]
    fn lookup_prefers_png_over_later_extensions() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_rgb(dir.path(), "x-001.png", 2, 2);
        write_rgb(dir.path(), "x-001.tif", 2, 2);

        let (path, _) = BaseLookup::default()
            .resolve(dir.path(), "x-001")
            .expect("found");
        assert_eq!(path, dir.path().join("x-001.png"));
    }

    #[test]
    fn lookup_skips_candidates_that_fail_to_open() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("x-001.png"), b"corrupt").expect("write");
        write_rgb(dir.path(), "x-001.tif", 2, 2);

        let (path, _) = BaseLookup::default()
            .resolve(dir.path(), "x-001")
            .expect("found");
        assert_eq!(path, dir.path().join("x-001.tif"));
    }

    #[test]
    fn restricted_lookup_ignores_other_extensions() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_rgb(dir.path(), "Book-004.png", 8, 6);
        write_mask(dir.path(), "Book-005.png", 8, 6);

        let report = MaskMerger::default()
            .with_lookup(BaseLookup::new(vec![ImageExtension::Tif]))
            .merge(&merge_list(&["5"]), dir.path())
            .expect("merge");
        assert_eq!(report.unpaired, [dir.path().join("Book-005.png")]);
        assert_eq!(names(dir.path()), ["Book-004.png", "Book-005.png"]);
    }

    #[test]
    fn missing_base_leaves_mask_untouched() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_mask(dir.path(), "Book-005.png", 8, 6);
        write_rgb(dir.path(), "Book-007.png", 8, 6);

        let (report, logs) = capture_logs(|| {
            MaskMerger::default()
                .merge(&merge_list(&["5"]), dir.path())
                .expect("merge")
        });

        assert!(report.merged.is_empty());
        assert_eq!(report.unpaired, [dir.path().join("Book-005.png")]);
        assert_eq!(names(dir.path()), ["Book-005.png", "Book-007.png"]);
        assert!(logs.contains("WARNING:"), "logs: {logs}");
        assert!(logs.contains("does not exist to merge with SMASK"), "logs: {logs}");
    }

    #[test]
    fn size_mismatch_leaves_both_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_rgb(dir.path(), "Book-004.png", 8, 6);
        write_mask(dir.path(), "Book-005.png", 6, 8);

        let (report, logs) = capture_logs(|| {
            MaskMerger::default()
                .merge(&merge_list(&["5"]), dir.path())
                .expect("merge")
        });

        assert!(report.merged.is_empty());
        assert_eq!(report.mismatched, [dir.path().join("Book-005.png")]);
        assert_eq!(names(dir.path()), ["Book-004.png", "Book-005.png"]);
        assert!(logs.contains("WARNING:"), "logs: {logs}");
        assert!(logs.contains("is not the same size as"), "logs: {logs}");
    }

    #[test]
    fn zero_numbered_mask_is_ignored_silently() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_mask(dir.path(), "x-000.png", 4, 4);
        write_rgb(dir.path(), "x-001.png", 4, 4);

        let (report, logs) = capture_logs(|| {
            MaskMerger::default()
                .merge(&merge_list(&["0"]), dir.path())
                .expect("merge")
        });

        assert!(report.merged.is_empty() && report.unpaired.is_empty());
        assert_eq!(names(dir.path()), ["x-000.png", "x-001.png"]);
        assert!(!logs.contains("WARNING:"), "logs: {logs}");
    }

    #[test]
    fn merges_jpeg2000_base() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("Book-004.jp2"), jp2_file(8, 6, 3)).expect("write jp2");
        write_mask(dir.path(), "Book-005.png", 8, 6);

        let (report, logs) = capture_logs(|| {
            MaskMerger::default()
                .merge(&merge_list(&["5"]), dir.path())
                .expect("merge")
        });

        assert_eq!(report.merged, [dir.path().join("Book-004.png")]);
        assert_eq!(names(dir.path()), ["Book-004.png"]);
        assert!(!logs.contains("WARNING:"), "logs: {logs}");

        let merged = ImageProcessor::open(dir.path().join("Book-004.png"))
            .expect("open merged")
            .into_dynamic();
        let rgba = merged.as_rgba8().expect("rgba");
        assert_eq!(rgba.dimensions(), (8, 6));
        assert_eq!(rgba.get_pixel(7, 0).0[3], 70);
    }

    #[test]
    fn jpeg2000_mask_merges_onto_png_base() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_rgb(dir.path(), "Book-004.png", 5, 4);
        std::fs::write(dir.path().join("Book-005.jp2"), jp2_file(5, 4, 1)).expect("write jp2");

        let report = MaskMerger::default()
            .merge(&merge_list(&["5"]), dir.path())
            .expect("merge");

        assert_eq!(report.merged, [dir.path().join("Book-004.png")]);
        assert_eq!(names(dir.path()), ["Book-004.png"]);
    }

    #[test]
    fn files_not_in_merge_list_are_ignored() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_rgb(dir.path(), "Book-004.png", 8, 6);
        write_mask(dir.path(), "Book-005.png", 8, 6);
        std::fs::write(dir.path().join("Book-005.txt"), b"notes").expect("write");

        let report = MaskMerger::default()
            .merge(&merge_list(&["9"]), dir.path())
            .expect("merge");

        assert!(report.merged.is_empty());
        assert_eq!(names(dir.path()), ["Book-004.png", "Book-005.png", "Book-005.txt"]);
    }

    #[test]
    fn unreadable_mask_respects_policy() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_rgb(dir.path(), "Book-004.png", 8, 6);
        std::fs::write(dir.path().join("Book-005.png"), b"corrupt").expect("write");
        let list = merge_list(&["5"]);

        let result = MaskMerger::new(UnreadablePolicy::Abort).merge(&list, dir.path());
        assert!(matches!(result, Err(BildwerkError::UnreadableImage { .. })));

        let report = MaskMerger::new(UnreadablePolicy::Skip)
            .merge(&list, dir.path())
            .expect("skip");
        assert_eq!(report.unreadable, [dir.path().join("Book-005.png")]);
        assert_eq!(names(dir.path()), ["Book-004.png", "Book-005.png"]);
    }

    #[test]
    fn custom_pairing_rule_is_used() {
        struct Successor;
        impl PairingRule for Successor {
            fn base_sequence(&self, mask: &SequenceNumber) -> Option<SequenceNumber> {
                let next = mask.as_str().parse::<u64>().ok()? + 1;
                SequenceNumber::parse(&next.to_string())
            }
        }

        let dir = tempfile::tempdir().expect("tempdir");
        write_mask(dir.path(), "Book-005.png", 4, 4);
        write_rgb(dir.path(), "Book-006.jpg", 4, 4);

        let report = MaskMerger::default()
            .with_pairing(Successor)
            .merge(&merge_list(&["5"]), dir.path())
            .expect("merge");
        assert_eq!(report.merged, [dir.path().join("Book-006.png")]);
        assert_eq!(names(dir.path()), ["Book-006.png"]);
    }

    #[test]
    fn gray_base_keeps_gray_channels() {
        let dir = tempfile::tempdir().expect("tempdir");
        DynamicImage::ImageLuma8(GrayImage::from_pixel(5, 5, Luma([80])))
            .save(dir.path().join("g-001.png"))
            .expect("write base");
        write_mask(dir.path(), "g-002.png", 5, 5);

        MaskMerger::default()
            .merge(&merge_list(&["2"]), dir.path())
            .expect("merge");
        let merged = ImageProcessor::open(dir.path().join("g-001.png")).expect("open");
        assert!(merged.as_dynamic().as_luma_alpha8().is_some());
    }
}
