// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Poppler `pdfimages` integration.
//
// Both invocations pass explicit paths, so the process working directory is
// never changed.

use std::path::Path;
use std::process::{Command, Output};

use bildwerk_core::error::{BildwerkError, Result};
use tracing::{debug, instrument};

use crate::traits::ImageExtractor;

/// Runs the `pdfimages` command-line tool.
#[derive(Debug, Clone)]
pub struct Pdfimages {
    program: String,
}

impl Default for Pdfimages {
    fn default() -> Self {
        Self::new("pdfimages")
    }
}

impl Pdfimages {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn run(&self, command: &mut Command) -> Result<Output> {
        debug!(command = ?command, "Running extractor");
        let output = command.output().map_err(|source| BildwerkError::ExtractorSpawn {
            program: self.program.clone(),
            source,
        })?;
        if !output.status.success() {
            return Err(BildwerkError::ExtractorFailed {
                program: self.program.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            });
        }
        Ok(output)
    }
}

impl ImageExtractor for Pdfimages {
    fn name(&self) -> &str {
        &self.program
    }

    #[instrument(skip_all, fields(pdf = %pdf.display()))]
    fn list_images(&self, pdf: &Path) -> Result<String> {
        let output = self.run(Command::new(&self.program).arg("-list").arg(pdf))?;
        Ok(String::from_utf8(output.stdout)?)
    }

    /// `-all` keeps each image's native encoding; `-p` adds the page number
    /// to the file name.
    #[instrument(skip_all, fields(pdf = %pdf.display(), root = %output_root.display()))]
    fn extract_images(&self, pdf: &Path, output_root: &Path) -> Result<()> {
        self.run(
            Command::new(&self.program)
                .arg("-all")
                .arg("-p")
                .arg(pdf)
                .arg(output_root),
        )?;
        Ok(())
    }
}
