// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Text to PDF conversion — wires geometry, line splitting, layout and the
// PDF writer together for one input.
//
// Order of work: resolve geometry (layout errors surface before any file is
// touched), check the output target, open the input, lay out, finalise. The
// input is scoped to the layout step and closed on every exit path; the
// output file only appears once the whole document has been built.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use lineprint_core::error::{LineprintError, Result};
use lineprint_core::{ConversionConfig, derive_output_path};
use tracing::{info, instrument};

use crate::geometry::{ResolvedGeometry, resolve_geometry};
use crate::layout::{LayoutStats, lay_out};
use crate::lines::LineSplitter;
use crate::metrics::{FontMetrics, StandardMetrics};
use crate::pdf::PdfWriter;

/// Outcome of a successful conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionReport {
    /// Where the PDF was written; `None` when rendered to memory.
    pub output_path: Option<PathBuf>,
    pub pages: usize,
    pub lines: usize,
    pub truncated_lines: usize,
    /// Font size used, after any automatic fitting.
    pub font_size: f32,
}

impl ConversionReport {
    fn new(output_path: Option<PathBuf>, geometry: &ResolvedGeometry, stats: LayoutStats) -> Self {
        Self {
            output_path,
            pages: stats.pages,
            lines: stats.lines,
            truncated_lines: stats.truncated_lines,
            font_size: geometry.font_size,
        }
    }
}

/// Converts line-printer text to PDF under one fixed configuration.
pub struct Converter<M = StandardMetrics> {
    config: ConversionConfig,
    metrics: M,
}

impl Converter {
    pub fn new(config: ConversionConfig) -> Self {
        Self::with_metrics(config, StandardMetrics)
    }
}

impl<M: FontMetrics> Converter<M> {
    /// Use a different source of glyph widths for font fitting.
    pub fn with_metrics(config: ConversionConfig, metrics: M) -> Self {
        Self { config, metrics }
    }

    pub fn config(&self) -> &ConversionConfig {
        &self.config
    }

    /// Convert a text file.
    ///
    /// Without an explicit `output`, the PDF goes next to the input with its
    /// extension replaced (see [`derive_output_path`]). An output that would
    /// overwrite the input itself, such as the derived path for `job.pdf`, is
    /// refused with [`LineprintError::NoOutputTarget`].
    #[instrument(skip(self))]
    pub fn convert_file(
        &self,
        input: Option<&Path>,
        output: Option<&Path>,
    ) -> Result<ConversionReport> {
        let input = input.ok_or(LineprintError::NoInputFile)?;
        let output = match output {
            Some(path) => path.to_path_buf(),
            None => derive_output_path(input)?,
        };
        if is_same_file(input, &output) {
            return Err(LineprintError::NoOutputTarget);
        }

        let geometry = resolve_geometry(&self.config, &self.metrics)?;
        info!(output = %output.display(), "Converting text file to PDF");

        let mut writer = PdfWriter::open(&output, (geometry.page_width, geometry.page_height))?;
        writer.set_title(title_for(input));

        let stats = {
            let file = File::open(input).map_err(|source| LineprintError::InputUnreadable {
                path: input.to_path_buf(),
                source,
            })?;
            self.lay_out_stream(BufReader::new(file), &geometry, &mut writer)
                .map_err(|err| attribute_read_error(err, input))?
        };

        let written = writer.finalize()?;
        let report = ConversionReport::new(Some(written), &geometry, stats);
        info!(pages = report.pages, lines = report.lines, "Conversion complete");
        Ok(report)
    }

    /// Convert an already-open stream, writing the PDF to `output`.
    #[instrument(skip(self, reader))]
    pub fn convert_reader<R: Read>(&self, reader: R, output: &Path) -> Result<ConversionReport> {
        let geometry = resolve_geometry(&self.config, &self.metrics)?;
        let mut writer = PdfWriter::open(output, (geometry.page_width, geometry.page_height))?;

        let stats = self.lay_out_stream(BufReader::new(reader), &geometry, &mut writer)?;

        let written = writer.finalize()?;
        let report = ConversionReport::new(Some(written), &geometry, stats);
        info!(pages = report.pages, lines = report.lines, "Conversion complete");
        Ok(report)
    }

    /// Convert a stream to PDF bytes without touching the filesystem.
    #[instrument(skip_all)]
    pub fn render<R: Read>(&self, reader: R) -> Result<(Vec<u8>, ConversionReport)> {
        let geometry = resolve_geometry(&self.config, &self.metrics)?;
        let mut writer = PdfWriter::in_memory((geometry.page_width, geometry.page_height));

        let stats = self.lay_out_stream(BufReader::new(reader), &geometry, &mut writer)?;

        let bytes = writer.into_bytes()?;
        Ok((bytes, ConversionReport::new(None, &geometry, stats)))
    }

    fn lay_out_stream<R: BufRead>(
        &self,
        reader: R,
        geometry: &ResolvedGeometry,
        writer: &mut PdfWriter,
    ) -> Result<LayoutStats> {
        let events = LineSplitter::new(reader, self.config.ignore_form_feed());
        lay_out(&self.config, geometry, events, writer)
    }
}

/// Read failures while streaming the input belong to the input file.
fn attribute_read_error(err: LineprintError, input: &Path) -> LineprintError {
    match err {
        LineprintError::Io(source) => LineprintError::InputUnreadable {
            path: input.to_path_buf(),
            source,
        },
        other => other,
    }
}

fn is_same_file(input: &Path, output: &Path) -> bool {
    match (input.canonicalize(), output.canonicalize()) {
        (Ok(input), Ok(output)) => input == output,
        _ => input == output,
    }
}

fn title_for(input: &Path) -> String {
    input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| input.display().to_string())
}
