// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for extracted PDF images.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Image formats the extractor deposits and the pipeline recognises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImageExtension {
    Png,
    Jpg,
    Tif,
    Jp2,
}

impl ImageExtension {
    /// Order in which base image candidates are tried when pairing a soft mask.
    pub const LOOKUP_ORDER: [Self; 4] = [Self::Png, Self::Jpg, Self::Tif, Self::Jp2];

    /// Lowercase extension without the dot.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpg => "jpg",
            Self::Tif => "tif",
            Self::Jp2 => "jp2",
        }
    }

    /// Match an extension case-insensitively.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpg" => Some(Self::Jpg),
            "tif" => Some(Self::Tif),
            "jp2" => Some(Self::Jp2),
            _ => None,
        }
    }

    /// Extension of `path`, if it is one of the recognised image formats.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }
}

impl std::fmt::Display for ImageExtension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Minimum digits in a sequence number written by the extractor.
pub const SEQUENCE_WIDTH: usize = 3;

/// Numeric suffix of an extracted image, compared without leading zeros.
///
/// Sequence numbers only encode pairing between a base image and its soft
/// mask. Apart from the predecessor arithmetic they are treated as opaque
/// digit strings, so arbitrarily long values never overflow.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SequenceNumber(String);

impl SequenceNumber {
    /// Parse a run of ASCII digits. Returns `None` for anything else.
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let stripped = raw.trim_start_matches('0');
        let canonical = if stripped.is_empty() { "0" } else { stripped };
        Some(Self(canonical.to_owned()))
    }

    /// Digits without leading zeros.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The number one below this one, or `None` for zero.
    pub fn predecessor(&self) -> Option<Self> {
        if self.0 == "0" {
            return None;
        }
        let mut digits = self.0.clone().into_bytes();
        for digit in digits.iter_mut().rev() {
            if *digit == b'0' {
                *digit = b'9';
            } else {
                *digit -= 1;
                break;
            }
        }
        let text = String::from_utf8(digits).ok()?;
        Self::parse(&text)
    }

    /// Zero-padded to at least [`SEQUENCE_WIDTH`] digits.
    pub fn padded(&self) -> String {
        format!("{:0>width$}", self.0, width = SEQUENCE_WIDTH)
    }
}

impl std::fmt::Display for SequenceNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A file name of the form `<prefix>-<sequence>.<ext>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageName {
    pub prefix: String,
    pub sequence: SequenceNumber,
    /// The sequence digits exactly as they appear in the file name.
    pub raw_sequence: String,
    pub extension: ImageExtension,
}

impl ImageName {
    /// Split a file name into prefix, sequence number, and extension.
    ///
    /// Returns `None` when the extension is not recognised, there is no
    /// hyphen, or the part after the last hyphen is not numeric.
    pub fn parse(file_name: &str) -> Option<Self> {
        let (stem, ext) = file_name.rsplit_once('.')?;
        let extension = ImageExtension::from_extension(ext)?;
        let (prefix, raw_sequence) = stem.rsplit_once('-')?;
        let sequence = SequenceNumber::parse(raw_sequence)?;
        Some(Self {
            prefix: prefix.to_owned(),
            sequence,
            raw_sequence: raw_sequence.to_owned(),
            extension,
        })
    }

    /// File name without the extension.
    pub fn stem(&self) -> String {
        format!("{}-{}", self.prefix, self.raw_sequence)
    }

    /// Stem of a sibling image with the same prefix and another sequence number.
    pub fn sibling_stem(&self, sequence: &SequenceNumber) -> String {
        format!("{}-{}", self.prefix, sequence.padded())
    }
}

/// Sequence numbers the extractor reported as soft masks for one PDF.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeList {
    /// Entries as they appeared in the listing, in listing order.
    entries: Vec<String>,
    masks: HashSet<SequenceNumber>,
}

impl MergeList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a listing entry. Non-numeric entries are kept for reporting but
    /// can never match a file.
    pub fn push(&mut self, raw: &str) {
        if let Some(sequence) = SequenceNumber::parse(raw) {
            self.masks.insert(sequence);
        }
        self.entries.push(raw.to_owned());
    }

    pub fn contains(&self, sequence: &SequenceNumber) -> bool {
        self.masks.contains(sequence)
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for MergeList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut list = Self::new();
        for raw in iter {
            list.push(raw.as_ref());
        }
        list
    }
}

/// Pixel dimensions of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    /// Default minimum side length for the size filter.
    pub const DEFAULT_SIDE: u32 = 325;

    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True when both sides reach the minimum (inclusive).
    pub fn meets(&self, minimum: Dimensions) -> bool {
        self.width >= minimum.width && self.height >= minimum.height
    }
}

impl Default for Dimensions {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SIDE, Self::DEFAULT_SIDE)
    }
}

impl std::fmt::Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}
