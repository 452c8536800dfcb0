// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Font metrics — rendered text widths for the output font.

use lineprint_core::MonospaceFont;

/// Measures how wide a run of text renders.
///
/// Injected into geometry resolution so the fitting search does not depend on
/// where the glyph tables come from.
pub trait FontMetrics {
    /// Width in points of `text` set in `font` at `size` points.
    fn string_width(&self, font: MonospaceFont, size: f32, text: &str) -> f32;
}

/// Metrics for the PDF base-14 fonts, taken from their Adobe AFM files.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardMetrics;

/// Courier advance width in thousandths of an em. Every glyph, including
/// the space, shares it.
const COURIER_ADVANCE: f32 = 600.0;

impl FontMetrics for StandardMetrics {
    fn string_width(&self, font: MonospaceFont, size: f32, text: &str) -> f32 {
        let advance = match font {
            MonospaceFont::Courier => COURIER_ADVANCE,
        };
        text.chars().count() as f32 * advance * size / 1000.0
    }
}

impl<M: FontMetrics + ?Sized> FontMetrics for &M {
    fn string_width(&self, font: MonospaceFont, size: f32, text: &str) -> f32 {
        (**self).string_width(font, size, text)
    }
}
