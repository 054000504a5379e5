// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// bildwerk-document — Post-extraction clean-up of a PDF's image folder.
//
// Parses the extractor's image listing, composites soft masks onto their base
// images, removes byte-identical duplicates, and drops images below a minimum
// size. Every pass mutates the output directory in place and tolerates a
// directory already modified by the pass before it.

pub mod dedup;
pub mod directory;
pub mod filter;
pub mod fingerprint;
pub mod image;
pub mod listing;
pub mod merge;

#[cfg(test)]
pub(crate) mod testing;

pub use dedup::{DedupReport, remove_duplicates};
pub use filter::{FilterReport, SizeFilter};
pub use fingerprint::{Fingerprint, fingerprint_bytes, fingerprint_file};
pub use crate::image::processor::ImageProcessor;
pub use listing::{ListingEntry, parse_listing, parse_merge_list};
pub use merge::{BaseLookup, MaskMerger, MergeReport, PairingRule, PredecessorPairing};
