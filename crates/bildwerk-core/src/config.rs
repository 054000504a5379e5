// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Run configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{BildwerkError, Result};
use crate::types::Dimensions;

/// What to do with a file that carries an image extension but cannot be
/// decoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnreadablePolicy {
    /// Stop processing the whole run.
    #[default]
    Abort,
    /// Log a warning and leave the file where it is.
    Skip,
}

/// Settings for one batch run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Images narrower than this are removed by the size filter.
    pub min_width: u32,
    /// Images shorter than this are removed by the size filter.
    pub min_height: u32,
    /// Program used for listing and extracting PDF images.
    pub extractor_program: String,
    pub unreadable_policy: UnreadablePolicy,
    /// Composite soft masks onto their base images.
    pub merge_masks: bool,
    /// Delete byte-identical copies of an image.
    pub remove_duplicates: bool,
    /// Delete images below `min_width` x `min_height`.
    pub filter_size: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            min_width: Dimensions::DEFAULT_SIDE,
            min_height: Dimensions::DEFAULT_SIDE,
            extractor_program: "pdfimages".into(),
            unreadable_policy: UnreadablePolicy::Abort,
            merge_masks: true,
            remove_duplicates: true,
            filter_size: true,
        }
    }
}

impl RunConfig {
    /// Read a JSON config file. Missing fields take their default values.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Minimum dimensions as a single value.
    pub fn minimum(&self) -> Dimensions {
        Dimensions::new(self.min_width, self.min_height)
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_width == 0 || self.min_height == 0 {
            return Err(BildwerkError::InvalidConfig(format!(
                "minimum size must be positive, got {}x{}",
                self.min_width, self.min_height
            )));
        }
        if self.extractor_program.trim().is_empty() {
            return Err(BildwerkError::InvalidConfig(
                "extractor program must not be empty".into(),
            ));
        }
        Ok(())
    }
}
