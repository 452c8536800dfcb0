// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Output path derivation.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::error::{LineprintError, Result};

/// Derive the PDF output path for an input file.
///
/// A trailing `;<digits>` file-version suffix (as written by VMS spoolers) is
/// dropped, then the file name's extension is replaced with `pdf`, or `.pdf`
/// is appended when there is none. Directory components are left alone.
///
/// An input already named `*.pdf` derives itself; the converter refuses that.
pub fn derive_output_path(input: &Path) -> Result<PathBuf> {
    let file_name = input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or(LineprintError::NoOutputTarget)?;

    let base = strip_file_version(&file_name);
    let stem = match base.rfind('.') {
        // A leading dot marks a hidden file, not an extension.
        Some(idx) if idx > 0 => &base[..idx],
        _ => base,
    };
    if stem.is_empty() {
        return Err(LineprintError::NoOutputTarget);
    }

    let mut output_name = OsString::from(stem);
    output_name.push(".pdf");
    Ok(input.with_file_name(output_name))
}

fn strip_file_version(name: &str) -> &str {
    match name.rsplit_once(';') {
        Some((base, version)) if version.chars().all(|c| c.is_ascii_digit()) => base,
        _ => name,
    }
}
