// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page geometry — final page size after orientation, and the effective font
// size, optionally shrunk so a full row of columns fits between the margins.

use lineprint_core::error::{LineprintError, Result};
use lineprint_core::{ConversionConfig, Margins};
use tracing::{debug, instrument};

use crate::metrics::FontMetrics;

/// Smallest font size the fitting search will try, in points.
pub const MIN_FONT_SIZE: f32 = 3.0;

/// Probe glyph for width fitting. A full block is the widest glyph a text
/// listing is expected to contain.
pub const PROBE_GLYPH: char = '\u{2588}';

/// Page dimensions and font size derived from a [`ConversionConfig`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedGeometry {
    /// Page width in points, orientation applied.
    pub page_width: f32,
    /// Page height in points, orientation applied.
    pub page_height: f32,
    /// Font size in points actually used for drawing.
    pub font_size: f32,
    pub margins: Margins,
}

impl ResolvedGeometry {
    /// Horizontal space between the left and right margins.
    pub fn usable_width(&self) -> f32 {
        self.page_width - self.margins.horizontal()
    }
}

/// Resolve page size and effective font size.
///
/// With `auto_font_size` off the configured size is used verbatim, even if a
/// full row would overrun the right margin; long lines are truncated by
/// column count, not by width.
#[instrument(skip_all, fields(columns = config.columns(), auto = config.auto_font_size()))]
pub fn resolve_geometry(
    config: &ConversionConfig,
    metrics: &impl FontMetrics,
) -> Result<ResolvedGeometry> {
    let (page_width, page_height) = config
        .orientation()
        .apply(config.paper_size().dimensions_pt());

    let mut geometry = ResolvedGeometry {
        page_width,
        page_height,
        font_size: config.font_size(),
        margins: config.margins(),
    };

    if config.auto_font_size() {
        geometry.font_size = fit_font_size(config, geometry.usable_width(), metrics)?;
    }

    debug!(
        page_width,
        page_height,
        font_size = geometry.font_size,
        "Page geometry resolved"
    );
    Ok(geometry)
}

/// Largest size, stepping down by one point from the configured size to
/// [`MIN_FONT_SIZE`], at which `columns` probe glyphs are strictly narrower
/// than `usable_width`.
fn fit_font_size(
    config: &ConversionConfig,
    usable_width: f32,
    metrics: &impl FontMetrics,
) -> Result<f32> {
    let probe: String = std::iter::repeat_n(PROBE_GLYPH, config.columns() as usize).collect();

    let mut size = config.font_size();
    while size >= MIN_FONT_SIZE {
        let width = metrics.string_width(config.font(), size, &probe);
        if width < usable_width {
            debug!(size, width, usable_width, "Font size fits");
            return Ok(size);
        }
        size -= 1.0;
    }

    Err(LineprintError::NoFittingFontSize {
        columns: config.columns(),
        max_size: config.font_size(),
        floor: MIN_FONT_SIZE,
        usable_width,
    })
}
