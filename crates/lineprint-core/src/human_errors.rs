// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages.
//
// Every technical error is mapped to a plain summary and a concrete
// suggestion, so front ends never have to print a raw error chain alone.

use crate::error::LineprintError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The user can fix it by changing arguments, settings or files.
    ActionRequired,
    /// Nothing the user does will help; a bug or a broken environment.
    Permanent,
}

/// A human-readable error with a plain message and an actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// One-line summary.
    pub message: String,
    /// What the user should try next.
    pub suggestion: String,
    pub severity: Severity,
}

impl HumanError {
    fn action(message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            suggestion: suggestion.into(),
            severity: Severity::ActionRequired,
        }
    }
}

/// Convert a `LineprintError` into a `HumanError`.
pub fn humanize_error(err: &LineprintError) -> HumanError {
    match err {
        // -- Configuration --
        LineprintError::NoInputFile => HumanError::action(
            "No input file was given.",
            "Pass the text file to convert, or `-` to read standard input.",
        ),

        LineprintError::NoOutputTarget => HumanError::action(
            "Could not work out where to write the PDF.",
            "Name the output file explicitly with --output.",
        ),

        LineprintError::InvalidSetting { name, reason } => HumanError::action(
            format!("The `{name}` setting is not valid."),
            format!("Fix the value and try again ({reason})."),
        ),

        LineprintError::ConfigFile { path, reason } => HumanError::action(
            format!("The settings file {} could not be used.", path.display()),
            format!("Check that it exists and is valid JSON with known keys ({reason})."),
        ),

        LineprintError::Serialization(detail) => HumanError::action(
            "The settings could not be converted to or from JSON.",
            format!("Check the settings values ({detail})."),
        ),

        // -- Layout --
        LineprintError::NoFittingFontSize {
            columns, floor, ..
        } => HumanError::action(
            format!("{columns} columns will not fit across the page, even at {floor}pt."),
            "Reduce --columns, shrink the left/right margins, or use --landscape.",
        ),

        // -- I/O --
        LineprintError::InputUnreadable { path, source } => HumanError::action(
            format!("The input file {} could not be read.", path.display()),
            format!("Check the file name and its permissions ({source})."),
        ),

        LineprintError::OutputUnwritable { path, reason } => HumanError::action(
            format!("The PDF cannot be written to {}.", path.display()),
            format!("Choose another location with --output ({reason})."),
        ),

        LineprintError::Io(detail) => HumanError::action(
            "A file operation failed.",
            format!("Check free disk space and permissions ({detail})."),
        ),

        // -- Internal --
        LineprintError::Writer(detail) => HumanError {
            message: "The PDF could not be generated.".into(),
            suggestion: format!("This is a bug; please report it with the input file ({detail})."),
            severity: Severity::Permanent,
        },
    }
}
