// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for lineprint.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for all lineprint operations.
///
/// Every variant is fatal to the conversion in progress. Nothing is retried
/// internally; callers use [`LineprintError::category`] to pick a message and
/// exit status.
#[derive(Debug, Error)]
pub enum LineprintError {
    // -- Configuration errors --
    #[error("no input file specified")]
    NoInputFile,

    #[error("no output file could be determined")]
    NoOutputTarget,

    #[error("invalid setting `{name}`: {reason}")]
    InvalidSetting { name: &'static str, reason: String },

    #[error("failed to load settings from {}: {reason}", .path.display())]
    ConfigFile { path: PathBuf, reason: String },

    // -- Layout errors --
    #[error(
        "no fitting font size found: {columns} columns do not fit in {usable_width:.1}pt \
         at any size from {max_size}pt down to {floor}pt"
    )]
    NoFittingFontSize {
        columns: u32,
        max_size: f32,
        floor: f32,
        usable_width: f32,
    },

    // -- I/O errors --
    #[error("cannot read input {}: {source}", .path.display())]
    InputUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("output path {} is not writable: {reason}", .path.display())]
    OutputUnwritable { path: PathBuf, reason: String },

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    // -- Document generation --
    #[error("document writer misuse: {0}")]
    Writer(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Broad classes of failure, used to choose exit codes and messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Missing or invalid input reference, output target or setting.
    Configuration,
    /// The requested layout cannot be produced (auto font size exhausted).
    Layout,
    /// Input unreadable or output unwritable.
    Io,
    /// A bug in how the document writer was driven.
    Internal,
}

impl LineprintError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NoInputFile
            | Self::NoOutputTarget
            | Self::InvalidSetting { .. }
            | Self::ConfigFile { .. }
            | Self::Serialization(_) => ErrorCategory::Configuration,
            Self::NoFittingFontSize { .. } => ErrorCategory::Layout,
            Self::InputUnreadable { .. } | Self::OutputUnwritable { .. } | Self::Io(_) => {
                ErrorCategory::Io
            }
            Self::Writer(_) => ErrorCategory::Internal,
        }
    }

    /// Process exit status for this error. Always non-zero.
    pub fn exit_code(&self) -> u8 {
        match self.category() {
            ErrorCategory::Configuration => 2,
            ErrorCategory::Layout => 3,
            ErrorCategory::Io => 4,
            // EX_SOFTWARE
            ErrorCategory::Internal => 70,
        }
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, LineprintError>;
