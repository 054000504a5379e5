// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image module — decoding, alpha compositing, and header-only size reads.

pub mod jp2;
pub mod processor;

pub use processor::{ImageProcessor, read_dimensions};
