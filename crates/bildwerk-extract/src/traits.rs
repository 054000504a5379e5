// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Extractor abstraction. The real implementation shells out to `pdfimages`;
// tests substitute an in-process fake.

use std::path::Path;

use bildwerk_core::error::Result;

/// A tool that can describe and dump the raster images embedded in a PDF.
pub trait ImageExtractor {
    /// Short name used in log lines.
    fn name(&self) -> &str;

    /// Per-image metadata listing: two header lines, then one
    /// whitespace-separated row per image with the image number in column 1
    /// and the type tag in column 2.
    fn list_images(&self, pdf: &Path) -> Result<String>;

    /// Write every image as `<output_root>-<page>-<number>.<ext>`.
    ///
    /// `output_root` is a directory path joined with the file prefix.
    fn extract_images(&self, pdf: &Path, output_root: &Path) -> Result<()>;
}
