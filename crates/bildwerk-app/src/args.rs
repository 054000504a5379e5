// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line arguments.

use std::path::PathBuf;

use bildwerk_core::{Dimensions, RunConfig, UnreadablePolicy};
use clap::Parser;

/// Printed when the size arguments cannot be used.
pub const INVALID_SIZE_WARNING: &str =
    "WARNING: Invalid size dimensions. Integers only. Using the default size.";

/// Extract images from every PDF in a folder, merge soft masks, drop
/// duplicates, and filter out small images.
#[derive(Debug, Parser)]
#[command(name = "bildwerk", version, about)]
pub struct Cli {
    /// Minimum WIDTH and HEIGHT in pixels; a single value sets both.
    #[arg(value_name = "SIZE", allow_negative_numbers = true)]
    pub sizes: Vec<String>,

    /// Folder containing the PDFs.
    #[arg(long, default_value = ".")]
    pub dir: PathBuf,

    /// JSON config file; command-line options override it.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Extractor program to run instead of `pdfimages`.
    #[arg(long)]
    pub extractor: Option<String>,

    /// Leave unreadable images in place instead of aborting.
    #[arg(long)]
    pub skip_unreadable: bool,

    #[arg(long)]
    pub no_merge: bool,

    #[arg(long)]
    pub no_dedup: bool,

    #[arg(long)]
    pub no_filter: bool,

    /// Write a JSON report of every pass to this file.
    #[arg(long)]
    pub report: Option<PathBuf>,
}

impl Cli {
    /// Overlay command-line options onto `config`. Returns a warning when
    /// the size arguments were unusable.
    pub fn apply(&self, config: &mut RunConfig) -> Option<&'static str> {
        let (size, warning) = resolve_dimensions(&self.sizes, config.minimum());
        config.min_width = size.width;
        config.min_height = size.height;

        if let Some(program) = &self.extractor {
            config.extractor_program = program.clone();
        }
        if self.skip_unreadable {
            config.unreadable_policy = UnreadablePolicy::Skip;
        }
        config.merge_masks &= !self.no_merge;
        config.remove_duplicates &= !self.no_dedup;
        config.filter_size &= !self.no_filter;
        warning
    }
}

/// Interpret the positional size arguments.
///
/// No arguments keep `current`; one sets both sides; two set width and
/// height. Anything else, including non-positive or non-integer values,
/// falls back to the 325 x 325 default with a warning.
pub fn resolve_dimensions(
    sizes: &[String],
    current: Dimensions,
) -> (Dimensions, Option<&'static str>) {
    let parse = |raw: &String| raw.trim().parse::<u32>().ok().filter(|&n| n > 0);
    let parsed = match sizes {
        [] => return (current, None),
        [side] => parse(side).map(|n| Dimensions::new(n, n)),
        [width, height] => parse(width).zip(parse(height)).map(|(w, h)| Dimensions::new(w, h)),
        _ => None,
    };
    match parsed {
        Some(size) => (size, None),
        None => (Dimensions::default(), Some(INVALID_SIZE_WARNING)),
    }
}
