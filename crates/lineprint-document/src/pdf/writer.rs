// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF writer — buffers positioned text runs page by page and serialises them
// with `printpdf` 0.8 in one go.
//
// printpdf 0.8 uses a data-oriented API: documents are built by constructing
// `PdfPage` structs containing `Vec<Op>` operation lists, then serialised via
// `PdfDocument::save()`. Nothing touches the filesystem until `finalize`.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use lineprint_core::error::{LineprintError, Result};
use lineprint_core::{MonospaceFont, pt_to_mm};
use printpdf::{
    BuiltinFont, Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Point, Pt, TextItem,
};
use tracing::{debug, info, instrument};

/// Page-level drawing operations used by the layout engine.
///
/// Drawing state (font and origin) belongs to the open page and is lost when
/// the page ends; callers must set it again after every `start_page`.
pub trait DocumentWriter {
    /// Open a new, empty page.
    fn start_page(&mut self) -> Result<()>;

    /// Commit the open page to the document.
    fn end_page(&mut self) -> Result<()>;

    /// Select the font for subsequent text on the open page.
    fn set_font_state(&mut self, font: MonospaceFont, size: f32) -> Result<()>;

    /// Move the drawing origin by (`dx`, `dy`) points. Translations add up.
    fn translate_origin(&mut self, dx: f32, dy: f32) -> Result<()>;

    /// Place a text run with its baseline at (`x`, `y`) relative to the
    /// current origin. `y` grows downwards.
    fn draw_text(&mut self, x: f32, y: f32, text: &str) -> Result<()>;
}

/// A text run at an absolute position, measured from the top-left corner.
#[derive(Debug, Clone, PartialEq)]
pub struct TextPlacement {
    pub x: f32,
    pub y: f32,
    pub font: MonospaceFont,
    pub size: f32,
    pub text: String,
}

/// The text placed on one page, in drawing order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageContent {
    pub placements: Vec<TextPlacement>,
}

/// Drawing state of the page currently open.
#[derive(Debug, Default)]
struct OpenPage {
    content: PageContent,
    font: Option<(MonospaceFont, f32)>,
    origin: (f32, f32),
}

/// Single-use PDF writer.
///
/// Created with [`PdfWriter::open`] (or [`PdfWriter::in_memory`]), fed through
/// the [`DocumentWriter`] trait, and consumed by [`PdfWriter::finalize`] or
/// [`PdfWriter::into_bytes`].
#[derive(Debug)]
pub struct PdfWriter {
    /// Target file; `None` for in-memory rendering.
    output_path: Option<PathBuf>,
    /// Page size in points (width, height).
    page_size: (f32, f32),
    /// Title metadata embedded in the PDF /Info dictionary.
    title: Option<String>,
    /// Committed pages.
    pages: Vec<PageContent>,
    open_page: Option<OpenPage>,
}

impl PdfWriter {
    /// Prepare a document destined for `output_path`.
    ///
    /// Checks that the file could be written, but creates nothing yet.
    #[instrument(skip_all, fields(path = %output_path.as_ref().display()))]
    pub fn open(output_path: impl AsRef<Path>, page_size: (f32, f32)) -> Result<Self> {
        let output_path = output_path.as_ref();
        check_writable(output_path)?;
        debug!(width = page_size.0, height = page_size.1, "PDF writer opened");

        Ok(Self {
            output_path: Some(output_path.to_path_buf()),
            ..Self::in_memory(page_size)
        })
    }

    /// A writer that can only render to bytes.
    pub fn in_memory(page_size: (f32, f32)) -> Self {
        Self {
            output_path: None,
            page_size,
            title: None,
            pages: Vec::new(),
            open_page: None,
        }
    }

    /// Set a title for the PDF metadata.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    /// Committed pages so far.
    pub fn pages(&self) -> &[PageContent] {
        &self.pages
    }

    fn open_page(&mut self) -> Result<&mut OpenPage> {
        self.open_page
            .as_mut()
            .ok_or_else(|| LineprintError::Writer("no page is open".into()))
    }

    /// Commit a page left open by the caller.
    fn commit_open_page(&mut self) {
        if let Some(page) = self.open_page.take() {
            debug!("Committing page left open at finalize");
            self.pages.push(page.content);
        }
    }

    /// Serialise the document to PDF bytes.
    #[instrument(skip(self), fields(pages = self.pages.len()))]
    pub fn into_bytes(mut self) -> Result<Vec<u8>> {
        self.commit_open_page();
        Ok(self.render())
    }

    /// Write the document to the path given to [`PdfWriter::open`].
    ///
    /// The PDF is written to a temporary file beside the target and renamed
    /// over it, so the output path holds either the complete new document or
    /// whatever was there before.
    #[instrument(skip(self), fields(pages = self.pages.len()))]
    pub fn finalize(mut self) -> Result<PathBuf> {
        let path = self.output_path.take().ok_or_else(|| {
            LineprintError::Writer("in-memory writer has no output path".into())
        })?;
        self.commit_open_page();
        let bytes = self.render();

        let dir = parent_dir(&path);
        let unwritable = |reason: String| LineprintError::OutputUnwritable {
            path: path.clone(),
            reason,
        };
        let mut staging = tempfile::NamedTempFile::new_in(dir)
            .map_err(|err| unwritable(format!("cannot create temporary file: {err}")))?;
        staging
            .write_all(&bytes)
            .and_then(|()| staging.as_file().sync_all())
            .map_err(|err| unwritable(err.to_string()))?;
        staging
            .persist(&path)
            .map_err(|err| unwritable(err.error.to_string()))?;

        info!(bytes = bytes.len(), "Wrote PDF to {}", path.display());
        Ok(path)
    }

    fn render(&self) -> Vec<u8> {
        let (width_pt, height_pt) = self.page_size;
        let (page_w, page_h) = (Mm(pt_to_mm(width_pt)), Mm(pt_to_mm(height_pt)));
        let title = self.title.as_deref().unwrap_or("lineprint document");

        let mut doc = PdfDocument::new(title);
        let pages: Vec<PdfPage> = self
            .pages
            .iter()
            .map(|content| PdfPage::new(page_w, page_h, page_ops(content, height_pt)))
            .collect();
        doc.with_pages(pages);

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let output = doc.save(&PdfSaveOptions::default(), &mut warnings);
        if !warnings.is_empty() {
            debug!(count = warnings.len(), "printpdf reported warnings while saving");
        }
        debug!(
            pages = self.pages.len(),
            bytes = output.len(),
            "PDF serialised"
        );
        output
    }
}

impl DocumentWriter for PdfWriter {
    fn start_page(&mut self) -> Result<()> {
        if self.open_page.is_some() {
            return Err(LineprintError::Writer(
                "start_page called while a page is open".into(),
            ));
        }
        self.open_page = Some(OpenPage::default());
        Ok(())
    }

    fn end_page(&mut self) -> Result<()> {
        let page = self
            .open_page
            .take()
            .ok_or_else(|| LineprintError::Writer("end_page called with no open page".into()))?;
        self.pages.push(page.content);
        Ok(())
    }

    fn set_font_state(&mut self, font: MonospaceFont, size: f32) -> Result<()> {
        self.open_page()?.font = Some((font, size));
        Ok(())
    }

    fn translate_origin(&mut self, dx: f32, dy: f32) -> Result<()> {
        let page = self.open_page()?;
        page.origin.0 += dx;
        page.origin.1 += dy;
        Ok(())
    }

    fn draw_text(&mut self, x: f32, y: f32, text: &str) -> Result<()> {
        let page = self.open_page()?;
        let (font, size) = page
            .font
            .ok_or_else(|| LineprintError::Writer("draw_text before set_font_state".into()))?;
        page.content.placements.push(TextPlacement {
            x: page.origin.0 + x,
            y: page.origin.1 + y,
            font,
            size,
            text: text.to_owned(),
        });
        Ok(())
    }
}

/// printpdf operations for one page. Converts top-down placements into PDF
/// user space, whose origin is the bottom-left corner.
fn page_ops(content: &PageContent, page_height_pt: f32) -> Vec<Op> {
    let mut ops: Vec<Op> = Vec::new();
    for placement in content.placements.iter().filter(|p| !p.text.is_empty()) {
        ops.push(Op::StartTextSection);
        ops.push(Op::SetTextCursor {
            pos: Point {
                x: Pt(placement.x),
                y: Pt(page_height_pt - placement.y),
            },
        });
        ops.push(Op::SetFontSizeBuiltinFont {
            size: Pt(placement.size),
            font: builtin_font(placement.font),
        });
        ops.push(Op::WriteTextBuiltinFont {
            items: vec![TextItem::Text(placement.text.clone())],
            font: builtin_font(placement.font),
        });
        ops.push(Op::EndTextSection);
    }
    ops
}

fn builtin_font(font: MonospaceFont) -> BuiltinFont {
    match font {
        MonospaceFont::Courier => BuiltinFont::Courier,
    }
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    }
}

/// Fail early if `path` obviously cannot receive the output file.
///
/// Best effort only: the read-only test looks at permission bits, not at
/// whether this process may write there (ownership, ACLs, superuser). The
/// authoritative check is creating the staging file in [`PdfWriter::finalize`],
/// which reports the same `OutputUnwritable` error.
fn check_writable(path: &Path) -> Result<()> {
    let unwritable = |reason: String| LineprintError::OutputUnwritable {
        path: path.to_path_buf(),
        reason,
    };

    let dir = parent_dir(path);
    let dir_meta = fs::metadata(dir)
        .map_err(|err| unwritable(format!("directory {} is not accessible: {err}", dir.display())))?;
    if !dir_meta.is_dir() {
        return Err(unwritable(format!("{} is not a directory", dir.display())));
    }
    if dir_meta.permissions().readonly() {
        return Err(unwritable(format!("directory {} is read-only", dir.display())));
    }

    if let Ok(existing) = fs::metadata(path) {
        if existing.is_dir() {
            return Err(unwritable("a directory exists at that path".into()));
        }
        if existing.permissions().readonly() {
            return Err(unwritable("existing file is read-only".into()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const A4: (f32, f32) = (595.28, 841.89);

    fn page_count(bytes: &[u8]) -> usize {
        lopdf::Document::load_mem(bytes).unwrap().get_pages().len()
    }

    #[test]
    fn placements_are_offset_by_the_origin() {
        let mut writer = PdfWriter::in_memory(A4);
        writer.start_page().unwrap();
        writer.set_font_state(MonospaceFont::Courier, 10.0).unwrap();
        writer.translate_origin(20.0, 30.0).unwrap();
        writer.translate_origin(5.0, 0.0).unwrap();
        writer.draw_text(0.0, 10.0, "hello").unwrap();
        writer.end_page().unwrap();

        let placement = &writer.pages()[0].placements[0];
        assert_eq!((placement.x, placement.y), (25.0, 40.0));
        assert_eq!(placement.size, 10.0);
        assert_eq!(placement.text, "hello");
    }

    #[test]
    fn drawing_state_does_not_survive_a_page_break() {
        let mut writer = PdfWriter::in_memory(A4);
        writer.start_page().unwrap();
        writer.set_font_state(MonospaceFont::Courier, 10.0).unwrap();
        writer.end_page().unwrap();
        writer.start_page().unwrap();

        let err = writer.draw_text(0.0, 0.0, "orphan").unwrap_err();
        assert!(matches!(err, LineprintError::Writer(_)));
    }

    #[test]
    fn page_calls_must_pair_up() {
        let mut writer = PdfWriter::in_memory(A4);
        assert!(writer.end_page().is_err());
        assert!(writer.draw_text(0.0, 0.0, "x").is_err());
        writer.start_page().unwrap();
        assert!(writer.start_page().is_err());
    }

    #[test]
    fn renders_one_pdf_page_per_committed_page() {
        let mut writer = PdfWriter::in_memory(A4);
        for n in 0..3 {
            writer.start_page().unwrap();
            writer.set_font_state(MonospaceFont::Courier, 10.0).unwrap();
            writer.draw_text(0.0, 0.0, &format!("page {n}")).unwrap();
            writer.end_page().unwrap();
        }
        // An empty page left open is committed too.
        writer.start_page().unwrap();

        let bytes = writer.into_bytes().unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert_eq!(page_count(&bytes), 4);
    }

    #[test]
    fn finalize_writes_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.pdf");

        let mut writer = PdfWriter::open(&path, A4).unwrap();
        assert!(!path.exists(), "open must not create the file");
        writer.start_page().unwrap();
        writer.end_page().unwrap();

        let written = writer.finalize().unwrap();
        assert_eq!(written, path);
        assert_eq!(page_count(&std::fs::read(&path).unwrap()), 1);
    }

    #[test]
    fn finalize_replaces_an_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.pdf");
        std::fs::write(&path, b"stale").unwrap();

        let mut writer = PdfWriter::open(&path, A4).unwrap();
        writer.start_page().unwrap();
        writer.finalize().unwrap();

        assert!(std::fs::read(&path).unwrap().starts_with(b"%PDF"));
    }

    #[test]
    fn open_rejects_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.pdf");
        let err = PdfWriter::open(&path, A4).unwrap_err();
        assert!(matches!(err, LineprintError::OutputUnwritable { .. }));
    }

    #[test]
    fn open_rejects_a_directory_target() {
        let dir = tempfile::tempdir().unwrap();
        let err = PdfWriter::open(dir.path(), A4).unwrap_err();
        assert!(matches!(err, LineprintError::OutputUnwritable { .. }));
    }

    #[test]
    fn in_memory_writer_cannot_finalize() {
        let writer = PdfWriter::in_memory(A4);
        assert!(matches!(
            writer.finalize(),
            Err(LineprintError::Writer(_))
        ));
    }

    #[test]
    fn staging_failure_at_finalize_is_reported_as_unwritable() {
        let dir = tempfile::tempdir().unwrap();
        let target_dir = dir.path().join("spool");
        fs::create_dir(&target_dir).unwrap();
        let output = target_dir.join("out.pdf");

        let mut writer = PdfWriter::open(&output, A4).unwrap();
        writer.start_page().unwrap();
        writer.end_page().unwrap();

        // Passes the early check, then the directory disappears.
        fs::remove_dir(&target_dir).unwrap();
        let err = writer.finalize().unwrap_err();
        assert!(matches!(err, LineprintError::OutputUnwritable { .. }));
        assert!(!output.exists());
    }
}
