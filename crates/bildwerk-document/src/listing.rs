// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Parser for the extractor's image listing (`pdfimages -list`).
//
// The listing starts with a column header and a separator line, followed by
// one whitespace-separated row per image:
//
//     page   num  type   width height color comp bpc  enc ...
//     --------------------------------------------------------
//        1     0 image    1024   768  rgb     3   8  jpeg ...
//        1     1 smask    1024   768  gray    1   8  image ...
//
// Parsing is best-effort: short or blank rows are skipped silently.

use bildwerk_core::MergeList;
use tracing::debug;

/// Header and separator lines preceding the rows.
const HEADER_LINES: usize = 2;

/// Type tag marking a soft mask row.
pub const SMASK_TAG: &str = "smask";

/// One row of the listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    /// Image number as printed by the extractor.
    pub sequence: String,
    /// Image type tag (`image`, `smask`, `mask`, `stencil`).
    pub kind: String,
}

impl ListingEntry {
    pub fn is_soft_mask(&self) -> bool {
        self.kind == SMASK_TAG
    }
}

/// Parse every row that has at least a page, number, and type column.
pub fn parse_listing(output: &str) -> Vec<ListingEntry> {
    output
        .lines()
        .skip(HEADER_LINES)
        .filter_map(|line| {
            let mut tokens = line.split_whitespace();
            let _page = tokens.next()?;
            let sequence = tokens.next()?;
            let kind = tokens.next()?;
            Some(ListingEntry {
                sequence: sequence.to_owned(),
                kind: kind.to_owned(),
            })
        })
        .collect()
}

/// Sequence numbers of every soft mask in the listing.
pub fn parse_merge_list(output: &str) -> MergeList {
    let list: MergeList = parse_listing(output)
        .into_iter()
        .filter(ListingEntry::is_soft_mask)
        .map(|entry| entry.sequence)
        .collect();
    debug!(masks = list.len(), "Parsed soft-mask listing");
    list
}
