// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types: paper sizes, orientation, margins and the output font.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LineprintError;

/// Points per millimetre (1pt = 1/72 inch).
pub const PT_PER_MM: f32 = 72.0 / 25.4;

/// Points per centimetre.
pub const PT_PER_CM: f32 = PT_PER_MM * 10.0;

/// Convert millimetres to points.
pub fn mm_to_pt(mm: f32) -> f32 {
    mm * PT_PER_MM
}

/// Convert points to millimetres.
pub fn pt_to_mm(pt: f32) -> f32 {
    pt / PT_PER_MM
}

/// Standard paper sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PaperSize {
    #[default]
    A4,
    A3,
    A5,
    Letter,
    Legal,
    Tabloid,
    Custom { width_mm: u32, height_mm: u32 },
}

impl PaperSize {
    /// Portrait dimensions in points (width, height).
    pub fn dimensions_pt(&self) -> (f32, f32) {
        match self {
            Self::A4 => (mm_to_pt(210.0), mm_to_pt(297.0)),
            Self::A3 => (mm_to_pt(297.0), mm_to_pt(420.0)),
            Self::A5 => (mm_to_pt(148.0), mm_to_pt(210.0)),
            Self::Letter => (612.0, 792.0),
            Self::Legal => (612.0, 1008.0),
            Self::Tabloid => (792.0, 1224.0),
            Self::Custom {
                width_mm,
                height_mm,
            } => (mm_to_pt(*width_mm as f32), mm_to_pt(*height_mm as f32)),
        }
    }
}

/// Page orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

impl Orientation {
    /// Apply this orientation to a portrait (width, height) pair.
    pub fn apply(&self, (width, height): (f32, f32)) -> (f32, f32) {
        match self {
            Self::Portrait => (width, height),
            Self::Landscape => (height, width),
        }
    }
}

impl FromStr for Orientation {
    type Err = LineprintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "portrait" => Ok(Self::Portrait),
            "landscape" => Ok(Self::Landscape),
            other => Err(LineprintError::InvalidSetting {
                name: "orientation",
                reason: format!("expected `portrait` or `landscape`, got `{other}`"),
            }),
        }
    }
}

/// The monospace font used for all output.
///
/// Only the PDF base-14 Courier face is supported; it needs no embedding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MonospaceFont {
    #[default]
    Courier,
}

impl MonospaceFont {
    /// PostScript name of the font.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Courier => "Courier",
        }
    }
}

/// Page margins in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Margins {
    /// The same margin on all four sides.
    pub fn uniform(pt: f32) -> Self {
        Self {
            left: pt,
            right: pt,
            top: pt,
            bottom: pt,
        }
    }

    /// Total horizontal margin.
    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    fn values(&self) -> [(&'static str, f32); 4] {
        [
            ("left", self.left),
            ("right", self.right),
            ("top", self.top),
            ("bottom", self.bottom),
        ]
    }

    /// Check every margin is a finite, non-negative number.
    pub fn validate(&self) -> Result<(), LineprintError> {
        for (side, value) in self.values() {
            if !value.is_finite() || value < 0.0 {
                return Err(LineprintError::InvalidSetting {
                    name: "margins",
                    reason: format!("{side} margin must be a non-negative number, got {value}"),
                });
            }
        }
        Ok(())
    }
}

impl Default for Margins {
    /// One centimetre on every side.
    fn default() -> Self {
        Self::uniform(PT_PER_CM)
    }
}

impl FromStr for Margins {
    type Err = LineprintError;

    /// Parse `left,right,top,bottom`. Bare numbers are points; `pt`, `mm` and
    /// `cm` suffixes are accepted per value.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').collect();
        if parts.len() != 4 {
            return Err(LineprintError::InvalidSetting {
                name: "margins",
                reason: format!(
                    "expected four comma-separated values (left,right,top,bottom), got {}",
                    parts.len()
                ),
            });
        }

        let mut values = [0.0f32; 4];
        for (slot, part) in values.iter_mut().zip(&parts) {
            *slot = parse_length(part)?;
        }

        let margins = Self {
            left: values[0],
            right: values[1],
            top: values[2],
            bottom: values[3],
        };
        margins.validate()?;
        Ok(margins)
    }
}

/// Parse a single length such as `28.35`, `10mm`, `1cm` or `12pt` into points.
fn parse_length(raw: &str) -> Result<f32, LineprintError> {
    let value = raw.trim();
    let (number, scale) = if let Some(n) = value.strip_suffix("mm") {
        (n, PT_PER_MM)
    } else if let Some(n) = value.strip_suffix("cm") {
        (n, PT_PER_CM)
    } else if let Some(n) = value.strip_suffix("pt") {
        (n, 1.0)
    } else {
        (value, 1.0)
    };

    number
        .trim()
        .parse::<f32>()
        .map(|n| n * scale)
        .map_err(|_| LineprintError::InvalidSetting {
            name: "margins",
            reason: format!("`{value}` is not a length (use points, or a mm/cm/pt suffix)"),
        })
}
