// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// bildwerk-extract — Drives the external image extractor and runs the
// clean-up passes over every PDF in a folder.

pub mod batch;
pub mod naming;
pub mod pdfimages;
pub mod traits;

pub use batch::{BatchReport, PdfReport, process_directory, process_pdf};
pub use naming::{
    discover_pdfs, output_dir_for, output_dir_name, sanitize_pdf, sanitize_pdf_name,
};
pub use pdfimages::Pdfimages;
pub use traits::ImageExtractor;
