// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Batch driver.
//
// One PDF is processed start to finish before the next begins:
// list → extract → merge soft masks → remove duplicates → size filter.
// Each pass finishes mutating the output folder before the next one scans
// it. The first fatal error stops the whole batch.

use std::path::{Path, PathBuf};

use bildwerk_core::RunConfig;
use bildwerk_core::error::{BildwerkError, Result};
use bildwerk_document::{
    DedupReport, FilterReport, MaskMerger, MergeReport, SizeFilter, parse_merge_list,
    remove_duplicates,
};
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::naming::{discover_pdfs, output_dir_for, sanitize_pdf};
use crate::traits::ImageExtractor;

/// What happened to one PDF. Passes disabled in the config are `None`.
#[derive(Debug, Clone, Serialize)]
pub struct PdfReport {
    pub pdf: PathBuf,
    pub output_dir: PathBuf,
    pub soft_masks_listed: usize,
    pub merge: Option<MergeReport>,
    pub dedup: Option<DedupReport>,
    pub filter: Option<FilterReport>,
}

/// Reports for every PDF in a batch, in processing order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub pdfs: Vec<PdfReport>,
}

/// Extract and clean up the images of a single (already sanitized) PDF.
///
/// Images land in the sibling folder given by [`output_dir_for`], which is
/// created if missing. A PDF whose name yields no such folder fails with
/// [`BildwerkError::InvalidPdfName`] before the extractor runs.
#[instrument(skip_all, fields(pdf = %pdf.display()))]
pub fn process_pdf(
    pdf: &Path,
    config: &RunConfig,
    extractor: &dyn ImageExtractor,
) -> Result<PdfReport> {
    let (output_dir, prefix) = output_dir_for(pdf)?;
    let listing = extractor.list_images(pdf)?;
    let merge_list = parse_merge_list(&listing);

    std::fs::create_dir_all(&output_dir)?;

    info!(extractor = extractor.name(), dir = %output_dir.display(), "Extracting images");
    extractor.extract_images(pdf, &output_dir.join(&prefix))?;

    let merge = if config.merge_masks {
        Some(MaskMerger::new(config.unreadable_policy).merge(&merge_list, &output_dir)?)
    } else {
        None
    };
    let dedup = if config.remove_duplicates {
        Some(remove_duplicates(&output_dir)?)
    } else {
        None
    };
    let filter = if config.filter_size {
        Some(SizeFilter::new(config.minimum(), config.unreadable_policy).apply(&output_dir)?)
    } else {
        None
    };

    Ok(PdfReport {
        pdf: pdf.to_path_buf(),
        output_dir,
        soft_masks_listed: merge_list.len(),
        merge,
        dedup,
        filter,
    })
}

/// Process every PDF directly inside `dir`, in file-name order.
///
/// The progress index counts PDFs only. PDFs whose name gives no output
/// folder are skipped with a warning.
#[instrument(skip_all, fields(dir = %dir.display()))]
pub fn process_directory(
    dir: &Path,
    config: &RunConfig,
    extractor: &dyn ImageExtractor,
) -> Result<BatchReport> {
    config.validate()?;
    let mut report = BatchReport::default();

    for (index, pdf) in discover_pdfs(dir)?.into_iter().enumerate() {
        let pdf = sanitize_pdf(&pdf)?;
        let name = pdf
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        info!("#{index}: {name}");
        match process_pdf(&pdf, config, extractor) {
            Err(err @ BildwerkError::InvalidPdfName { .. }) => {
                warn!("WARNING: skipping {name}: {err}");
            }
            result => report.pdfs.push(result?),
        }
    }

    info!("FINISHED");
    Ok(report)
}
