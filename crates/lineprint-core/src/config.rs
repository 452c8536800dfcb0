// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Conversion settings and the validated, immutable conversion configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{LineprintError, Result};
use crate::types::{Margins, MonospaceFont, Orientation, PaperSize};

/// User-editable conversion settings.
///
/// This is the form read from settings files and overridden by command-line
/// flags. It becomes a [`ConversionConfig`] through [`ConversionSettings::validate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConversionSettings {
    /// Characters per line; anything beyond is dropped.
    pub columns: u32,
    /// Lines per page before an automatic page break.
    pub rows: u32,
    /// Font size in points (the upper bound when `auto_font_size` is set).
    pub font_size: f32,
    pub font: MonospaceFont,
    pub orientation: Orientation,
    pub paper_size: PaperSize,
    /// Margins in points.
    pub margins: Margins,
    /// Treat form feeds as ordinary characters and strip them.
    pub ignore_form_feed: bool,
    /// Shrink the font until `columns` characters fit between the margins.
    pub auto_font_size: bool,
}

impl Default for ConversionSettings {
    fn default() -> Self {
        Self {
            columns: 80,
            rows: 60,
            font_size: 10.0,
            font: MonospaceFont::Courier,
            orientation: Orientation::Portrait,
            paper_size: PaperSize::A4,
            margins: Margins::default(),
            ignore_form_feed: false,
            auto_font_size: false,
        }
    }
}

impl ConversionSettings {
    /// Load settings from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|err| LineprintError::ConfigFile {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;
        let settings: Self =
            serde_json::from_str(&raw).map_err(|err| LineprintError::ConfigFile {
                path: path.to_path_buf(),
                reason: err.to_string(),
            })?;
        debug!(path = %path.display(), ?settings, "Loaded conversion settings");
        Ok(settings)
    }

    /// Render the settings as pretty-printed JSON, in the file format
    /// accepted by [`ConversionSettings::from_json_file`].
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check every setting and freeze the result.
    pub fn validate(&self) -> Result<ConversionConfig> {
        if self.columns == 0 {
            return Err(invalid("columns", "must be at least 1"));
        }
        if self.rows == 0 {
            return Err(invalid("rows", "must be at least 1"));
        }
        if !self.font_size.is_finite() || self.font_size <= 0.0 {
            return Err(invalid(
                "font_size",
                format!("must be a positive number of points, got {}", self.font_size),
            ));
        }
        self.margins.validate()?;
        if let PaperSize::Custom {
            width_mm,
            height_mm,
        } = self.paper_size
        {
            if width_mm == 0 || height_mm == 0 {
                return Err(invalid("paper_size", "custom dimensions must be non-zero"));
            }
        }

        Ok(ConversionConfig {
            columns: self.columns,
            rows: self.rows,
            font_size: self.font_size,
            font: self.font,
            orientation: self.orientation,
            paper_size: self.paper_size,
            margins: self.margins,
            ignore_form_feed: self.ignore_form_feed,
            auto_font_size: self.auto_font_size,
        })
    }
}

fn invalid(name: &'static str, reason: impl Into<String>) -> LineprintError {
    LineprintError::InvalidSetting {
        name,
        reason: reason.into(),
    }
}

/// A validated conversion configuration. Immutable once built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConversionConfig {
    columns: u32,
    rows: u32,
    font_size: f32,
    font: MonospaceFont,
    orientation: Orientation,
    paper_size: PaperSize,
    margins: Margins,
    ignore_form_feed: bool,
    auto_font_size: bool,
}

impl ConversionConfig {
    pub fn columns(&self) -> u32 {
        self.columns
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Configured font size in points, before any automatic fitting.
    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    pub fn font(&self) -> MonospaceFont {
        self.font
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn paper_size(&self) -> PaperSize {
        self.paper_size
    }

    pub fn margins(&self) -> Margins {
        self.margins
    }

    pub fn ignore_form_feed(&self) -> bool {
        self.ignore_form_feed
    }

    pub fn auto_font_size(&self) -> bool {
        self.auto_font_size
    }
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            columns: 80,
            rows: 60,
            font_size: 10.0,
            font: MonospaceFont::Courier,
            orientation: Orientation::Portrait,
            paper_size: PaperSize::A4,
            margins: Margins::default(),
            ignore_form_feed: false,
            auto_font_size: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_validate() {
        let config = ConversionSettings::default().validate().unwrap();
        assert_eq!(config, ConversionConfig::default());
        assert_eq!(config.columns(), 80);
        assert_eq!(config.rows(), 60);
        assert_eq!(config.font_size(), 10.0);
        assert!(!config.ignore_form_feed());
        assert!(!config.auto_font_size());
    }

    #[test]
    fn zero_rows_or_columns_rejected() {
        let settings = ConversionSettings {
            rows: 0,
            ..Default::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(LineprintError::InvalidSetting { name: "rows", .. })
        ));

        let settings = ConversionSettings {
            columns: 0,
            ..Default::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(LineprintError::InvalidSetting { name: "columns", .. })
        ));
    }

    #[test]
    fn non_positive_font_size_rejected() {
        for size in [0.0, -4.0, f32::NAN] {
            let settings = ConversionSettings {
                font_size: size,
                ..Default::default()
            };
            assert!(settings.validate().is_err(), "size {size} accepted");
        }
    }

    #[test]
    fn partial_json_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "columns": 132, "orientation": "landscape", "ignore_form_feed": true }}"#
        )
        .unwrap();

        let settings = ConversionSettings::from_json_file(file.path()).unwrap();
        assert_eq!(settings.columns, 132);
        assert_eq!(settings.orientation, Orientation::Landscape);
        assert!(settings.ignore_form_feed);
        assert_eq!(settings.rows, 60);
        assert_eq!(settings.paper_size, PaperSize::A4);
    }

    #[test]
    fn unknown_json_field_is_a_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "colums": 132 }}"#).unwrap();

        let err = ConversionSettings::from_json_file(file.path()).unwrap_err();
        assert!(matches!(err, LineprintError::ConfigFile { .. }));
    }

    #[test]
    fn printed_settings_load_back() {
        let settings = ConversionSettings {
            columns: 132,
            paper_size: PaperSize::Custom {
                width_mm: 380,
                height_mm: 280,
            },
            ..Default::default()
        };
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(settings.to_json_pretty().unwrap().as_bytes())
            .unwrap();

        assert_eq!(ConversionSettings::from_json_file(file.path()).unwrap(), settings);
    }

    #[test]
    fn missing_settings_file_is_a_config_error() {
        let err = ConversionSettings::from_json_file("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, LineprintError::ConfigFile { .. }));
    }
}
