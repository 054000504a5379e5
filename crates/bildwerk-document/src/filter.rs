// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Size filter — drop images smaller than a minimum width or height.

use std::path::{Path, PathBuf};

use bildwerk_core::error::Result;
use bildwerk_core::{Dimensions, UnreadablePolicy};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::directory::image_files;
use crate::image::read_dimensions;

/// Outcome of one size-filter pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FilterReport {
    pub kept: usize,
    pub removed: Vec<PathBuf>,
    /// Files left in place under [`UnreadablePolicy::Skip`].
    pub unreadable: Vec<PathBuf>,
}

/// Removes images below a minimum size. Both bounds are inclusive.
#[derive(Debug, Clone, Copy)]
pub struct SizeFilter {
    minimum: Dimensions,
    policy: UnreadablePolicy,
}

impl SizeFilter {
    pub fn new(minimum: Dimensions, policy: UnreadablePolicy) -> Self {
        Self { minimum, policy }
    }

    pub fn minimum(&self) -> Dimensions {
        self.minimum
    }

    /// Apply the filter to every image file in `dir`.
    ///
    /// Only image headers are read. An image that cannot be read aborts the
    /// pass under [`UnreadablePolicy::Abort`].
    #[instrument(skip_all, fields(dir = %dir.display(), minimum = %self.minimum))]
    pub fn apply(&self, dir: &Path) -> Result<FilterReport> {
        info!(
            "Filtering out images under {} x {} pixels",
            self.minimum.width, self.minimum.height
        );
        let mut report = FilterReport::default();

        for path in image_files(dir)? {
            let size = match read_dimensions(&path) {
                Ok(size) => size,
                Err(err) => match self.policy {
                    UnreadablePolicy::Abort => return Err(err),
                    UnreadablePolicy::Skip => {
                        warn!(error = %err, "WARNING: skipping unreadable image");
                        report.unreadable.push(path);
                        continue;
                    }
                },
            };

            if size.meets(self.minimum) {
                report.kept += 1;
            } else {
                std::fs::remove_file(&path)?;
                debug!(path = %path.display(), %size, "Undersized image removed");
                report.removed.push(path);
            }
        }

        info!(
            kept = report.kept,
            removed = report.removed.len(),
            "Size filter complete"
        );
        Ok(report)
    }
}
