// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF module — the page-level writer interface and its printpdf implementation.

pub mod writer;

pub use writer::{DocumentWriter, PageContent, PdfWriter, TextPlacement};
