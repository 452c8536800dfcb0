// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// lineprint — Core types, settings and error definitions shared across all crates.

pub mod config;
pub mod error;
pub mod human_errors;
pub mod paths;
pub mod types;

pub use config::{ConversionConfig, ConversionSettings};
pub use error::{ErrorCategory, LineprintError};
pub use paths::derive_output_path;
pub use types::*;
