// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF discovery, file-name sanitization, and output folder naming.

use std::path::{Path, PathBuf};

use bildwerk_core::error::{BildwerkError, Result};
use tracing::info;

const PDF_SUFFIX: &str = ".pdf";

/// Characters removed from PDF file names before extraction.
const STRIPPED_CHARS: [char; 2] = ['\'', ','];

fn is_pdf_name(name: &str) -> bool {
    name.to_ascii_lowercase().ends_with(PDF_SUFFIX)
}

/// PDF files directly inside `dir`, sorted by file name.
pub fn discover_pdfs(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut pdfs = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        if entry.file_name().to_str().is_some_and(is_pdf_name) {
            pdfs.push(entry.path());
        }
    }
    pdfs.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(pdfs)
}

/// Strip apostrophes and commas: `"Don't Stop.pdf"` becomes `"Dont Stop.pdf"`.
pub fn sanitize_pdf_name(name: &str) -> String {
    name.chars().filter(|c| !STRIPPED_CHARS.contains(c)).collect()
}

/// Rename `pdf` on disk to its sanitized name and return the new path.
/// A name that needs no change is returned as-is.
pub fn sanitize_pdf(pdf: &Path) -> Result<PathBuf> {
    let Some(name) = pdf.file_name().and_then(|n| n.to_str()) else {
        return Ok(pdf.to_path_buf());
    };
    let clean = sanitize_pdf_name(name);
    if clean == name {
        return Ok(pdf.to_path_buf());
    }
    let renamed = pdf.with_file_name(&clean);
    std::fs::rename(pdf, &renamed)?;
    info!(from = name, to = %clean, "Renamed PDF");
    Ok(renamed)
}

/// Folder (and image prefix) for a PDF's images.
///
/// Drops the `.pdf` suffix, then turns `" - "` and remaining spaces into
/// underscores.
pub fn output_dir_name(pdf_name: &str) -> String {
    let stem = if is_pdf_name(pdf_name) {
        &pdf_name[..pdf_name.len() - PDF_SUFFIX.len()]
    } else {
        pdf_name
    };
    stem.replace(" - ", "_").replace(' ', "_")
}

/// Output folder for `pdf` and the prefix its images are written under.
///
/// The folder is a sibling of the PDF and never the PDF's own directory:
/// names such as `.pdf` or `..pdf` are rejected.
pub fn output_dir_for(pdf: &Path) -> Result<(PathBuf, String)> {
    let invalid = || BildwerkError::InvalidPdfName {
        path: pdf.to_path_buf(),
    };
    let name = pdf.file_name().and_then(|n| n.to_str()).ok_or_else(invalid)?;
    let prefix = output_dir_name(name);
    if prefix.is_empty() || prefix == "." || prefix == ".." {
        return Err(invalid());
    }
    let output_dir = pdf.with_file_name(&prefix);
    if Some(output_dir.as_path()) == pdf.parent() || output_dir == pdf {
        return Err(invalid());
    }
    Ok((output_dir, prefix))
}
