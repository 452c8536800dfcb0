// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// lineprint-document — line-printer page layout and PDF generation.
//
// Text flows through four stages: geometry resolution (page size, fitted font
// size), line splitting (line endings and form feeds), page layout (rows,
// truncation, page breaks) and the PDF writer. `Converter` runs them in order.

pub mod convert;
pub mod geometry;
pub mod layout;
pub mod lines;
pub mod metrics;
pub mod pdf;

// Re-export the primary structs so callers can use `lineprint_document::Converter` etc.
pub use convert::{ConversionReport, Converter};
pub use geometry::{ResolvedGeometry, resolve_geometry};
pub use layout::{LayoutStats, PageCursor, PageLayout, lay_out};
pub use lines::{LineEvent, LineSplitter};
pub use metrics::{FontMetrics, StandardMetrics};
pub use pdf::{DocumentWriter, PdfWriter};
