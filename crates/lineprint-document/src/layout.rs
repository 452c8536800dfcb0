// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page layout — places line events row by row and decides where pages break.

use lineprint_core::error::Result;
use lineprint_core::{ConversionConfig, Margins, MonospaceFont};
use tracing::{debug, warn};

use crate::geometry::ResolvedGeometry;
use crate::lines::LineEvent;
use crate::pdf::DocumentWriter;

/// Position within the current page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageCursor {
    /// Row the next line is drawn on, from 0.
    pub line_index: u32,
    /// The page is full; a break is taken before anything else is placed.
    pub overflowed: bool,
}

/// Counters reported once layout finishes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayoutStats {
    pub pages: usize,
    pub lines: usize,
    /// Lines that lost characters past the column limit.
    pub truncated_lines: usize,
}

/// Drives a [`DocumentWriter`] from a stream of [`LineEvent`]s.
///
/// A row that fills the page only marks the break as owed; it is taken when
/// the next event arrives, so input that ends exactly on a page boundary
/// leaves no trailing blank page. Form feeds break immediately.
pub struct PageLayout<'w, W: DocumentWriter> {
    writer: &'w mut W,
    columns: usize,
    rows: u32,
    font: MonospaceFont,
    font_size: f32,
    margins: Margins,
    cursor: PageCursor,
    stats: LayoutStats,
}

impl<'w, W: DocumentWriter> PageLayout<'w, W> {
    /// Start laying out, opening the first page.
    pub fn begin(
        config: &ConversionConfig,
        geometry: &ResolvedGeometry,
        writer: &'w mut W,
    ) -> Result<Self> {
        let mut layout = Self {
            writer,
            columns: config.columns() as usize,
            rows: config.rows(),
            font: config.font(),
            font_size: geometry.font_size,
            margins: geometry.margins,
            cursor: PageCursor::default(),
            stats: LayoutStats::default(),
        };
        layout.open_page()?;
        Ok(layout)
    }

    pub fn cursor(&self) -> PageCursor {
        self.cursor
    }

    /// Handle one event.
    pub fn feed(&mut self, event: LineEvent) -> Result<()> {
        if self.cursor.overflowed {
            self.break_page()?;
        }
        match event {
            LineEvent::Line(text) => self.draw_line(&text),
            LineEvent::PageBreak => {
                debug!(page = self.stats.pages, "Form feed");
                self.break_page()
            }
        }
    }

    /// Close the last page and return the counters.
    pub fn finish(mut self) -> Result<LayoutStats> {
        self.writer.end_page()?;
        if self.stats.truncated_lines > 0 {
            warn!(
                lines = self.stats.truncated_lines,
                columns = self.columns,
                "Lines truncated at the column limit"
            );
        }
        Ok(self.stats)
    }

    fn draw_line(&mut self, text: &str) -> Result<()> {
        let visible = truncate_columns(text, self.columns);
        if visible.len() < text.len() {
            self.stats.truncated_lines += 1;
        }

        let y = self.font_size * self.cursor.line_index as f32;
        self.writer.draw_text(0.0, y, visible)?;
        self.stats.lines += 1;

        self.cursor.line_index += 1;
        if self.cursor.line_index == self.rows {
            self.cursor.overflowed = true;
        }
        Ok(())
    }

    fn break_page(&mut self) -> Result<()> {
        self.writer.end_page()?;
        self.open_page()
    }

    /// Start a page and set the drawing state it needs.
    fn open_page(&mut self) -> Result<()> {
        self.writer.start_page()?;
        self.writer.set_font_state(self.font, self.font_size)?;
        self.writer
            .translate_origin(self.margins.left, self.margins.top)?;
        self.cursor = PageCursor::default();
        self.stats.pages += 1;
        Ok(())
    }
}

/// Lay out a whole event stream, stopping at the first error.
pub fn lay_out<W, I>(
    config: &ConversionConfig,
    geometry: &ResolvedGeometry,
    events: I,
    writer: &mut W,
) -> Result<LayoutStats>
where
    W: DocumentWriter,
    I: IntoIterator<Item = Result<LineEvent>>,
{
    let mut layout = PageLayout::begin(config, geometry, writer)?;
    for event in events {
        layout.feed(event?)?;
    }
    layout.finish()
}

/// The first `columns` characters of `text`.
fn truncate_columns(text: &str, columns: usize) -> &str {
    match text.char_indices().nth(columns) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::resolve_geometry;
    use crate::lines::LineSplitter;
    use crate::metrics::StandardMetrics;
    use crate::pdf::{PageContent, PdfWriter};
    use lineprint_core::ConversionSettings;
    use std::io::Cursor;

    fn run(input: &str, settings: ConversionSettings) -> (Vec<PageContent>, LayoutStats) {
        let config = settings.validate().unwrap();
        let geometry = resolve_geometry(&config, &StandardMetrics).unwrap();
        let mut writer = PdfWriter::in_memory((geometry.page_width, geometry.page_height));
        let events = LineSplitter::new(Cursor::new(input.as_bytes()), config.ignore_form_feed());
        let stats = lay_out(&config, &geometry, events, &mut writer).unwrap();
        (writer.pages().to_vec(), stats)
    }

    fn texts(page: &PageContent) -> Vec<&str> {
        page.placements.iter().map(|p| p.text.as_str()).collect()
    }

    fn numbered(n: usize) -> String {
        (1..=n).map(|i| format!("line {i}\n")).collect()
    }

    #[test]
    fn one_hundred_fifty_lines_make_three_pages() {
        let (pages, stats) = run(&numbered(150), ConversionSettings::default());
        let counts: Vec<usize> = pages.iter().map(|p| p.placements.len()).collect();
        assert_eq!(counts, vec![60, 60, 30]);
        assert_eq!(stats.pages, 3);
        assert_eq!(stats.lines, 150);
        assert_eq!(pages[1].placements[0].text, "line 61");
    }

    #[test]
    fn page_count_is_ceiling_of_lines_over_rows() {
        for rows in [1u32, 2, 7, 60] {
            for n in [1usize, 6, 7, 8, 60, 61, 120] {
                let settings = ConversionSettings {
                    rows,
                    ..Default::default()
                };
                let (pages, _) = run(&numbered(n), settings);
                assert_eq!(
                    pages.len(),
                    n.div_ceil(rows as usize),
                    "{n} lines at {rows} rows"
                );
            }
        }
    }

    #[test]
    fn form_feeds_produce_pages_including_empty_ones() {
        let (pages, stats) = run("abc\x0cdef\x0c\x0cghi", ConversionSettings::default());
        let layout: Vec<Vec<&str>> = pages.iter().map(texts).collect();
        assert_eq!(
            layout,
            vec![vec!["abc"], vec!["def"], vec![], vec!["ghi"]]
        );
        assert_eq!(stats.pages, 4);
    }

    #[test]
    fn ignored_form_feeds_keep_one_page() {
        let settings = ConversionSettings {
            ignore_form_feed: true,
            ..Default::default()
        };
        let (pages, _) = run("abc\x0cdef\x0c\x0cghi", settings);
        assert_eq!(pages.len(), 1);
        assert_eq!(texts(&pages[0]), vec!["abcdefghi"]);
    }

    #[test]
    fn empty_input_is_one_blank_page() {
        let (pages, stats) = run("", ConversionSettings::default());
        assert_eq!(pages.len(), 1);
        assert!(pages[0].placements.is_empty());
        assert_eq!(stats.lines, 0);
    }

    #[test]
    fn form_feed_after_a_full_page_adds_a_blank_page() {
        let settings = ConversionSettings {
            rows: 2,
            ..Default::default()
        };
        let (pages, _) = run("a\nb\n\x0cc\n", settings);
        let layout: Vec<Vec<&str>> = pages.iter().map(texts).collect();
        assert_eq!(layout, vec![vec!["a", "b"], vec![], vec!["c"]]);
    }

    #[test]
    fn newline_after_form_feed_takes_the_first_row() {
        let (pages, _) = run("footer\x0c\nnext\n", ConversionSettings::default());
        let layout: Vec<Vec<&str>> = pages.iter().map(texts).collect();
        assert_eq!(layout, vec![vec!["footer"], vec!["", "next"]]);

        let font_size = ConversionConfig::default().font_size();
        let next = &pages[1].placements[1];
        assert_eq!(next.y - pages[1].placements[0].y, font_size);

        let (pages, _) = run("\x0c\n", ConversionSettings::default());
        let layout: Vec<Vec<&str>> = pages.iter().map(texts).collect();
        assert_eq!(layout, vec![vec![], vec![""]]);
    }

    #[test]
    fn each_form_feed_adds_one_page_boundary() {
        let settings = ConversionSettings {
            rows: 3,
            ..Default::default()
        };
        let body = numbered(7);
        let (plain, _) = run(&body, settings.clone());
        for feeds in 1..4 {
            let input = format!("{body}{}\n", "\x0c".repeat(feeds));
            let (pages, _) = run(&input, settings.clone());
            assert_eq!(pages.len(), plain.len() + feeds);
        }
    }

    #[test]
    fn lines_are_truncated_never_wrapped() {
        let settings = ConversionSettings {
            columns: 10,
            ..Default::default()
        };
        let (pages, stats) = run("0123456789abcdef\nshort\n\u{e9}\u{e9}\u{e9}\u{e9}\u{e9}\u{e9}\u{e9}\u{e9}\u{e9}\u{e9}\u{e9}\n", settings);
        assert_eq!(
            texts(&pages[0]),
            vec!["0123456789", "short", "\u{e9}\u{e9}\u{e9}\u{e9}\u{e9}\u{e9}\u{e9}\u{e9}\u{e9}\u{e9}"]
        );
        assert!(pages[0].placements.iter().all(|p| p.text.chars().count() <= 10));
        assert_eq!(stats.truncated_lines, 2);
        assert_eq!(stats.lines, 3);
    }

    #[test]
    fn rows_advance_by_font_size_from_the_margins() {
        let settings = ConversionSettings {
            font_size: 12.0,
            margins: Margins {
                left: 30.0,
                right: 10.0,
                top: 50.0,
                bottom: 10.0,
            },
            rows: 2,
            ..Default::default()
        };
        let (pages, _) = run("a\nb\nc\n", settings);
        let positions: Vec<(f32, f32)> = pages
            .iter()
            .flat_map(|p| p.placements.iter().map(|t| (t.x, t.y)))
            .collect();
        // The third line starts a fresh page, with state reapplied.
        assert_eq!(positions, vec![(30.0, 50.0), (30.0, 62.0), (30.0, 50.0)]);
        assert!(pages[1].placements.iter().all(|p| p.size == 12.0));
    }

    #[test]
    fn cursor_resets_after_a_form_feed() {
        let config = ConversionConfig::default();
        let geometry = resolve_geometry(&config, &StandardMetrics).unwrap();
        let mut writer = PdfWriter::in_memory((geometry.page_width, geometry.page_height));
        let mut layout = PageLayout::begin(&config, &geometry, &mut writer).unwrap();

        layout.feed(LineEvent::Line("one".into())).unwrap();
        layout.feed(LineEvent::Line("two".into())).unwrap();
        assert_eq!(layout.cursor().line_index, 2);
        layout.feed(LineEvent::PageBreak).unwrap();
        assert_eq!(layout.cursor(), PageCursor::default());
        assert_eq!(layout.finish().unwrap().pages, 2);
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncate_columns("héllo wörld", 7), "héllo w");
        assert_eq!(truncate_columns("abc", 3), "abc");
        assert_eq!(truncate_columns("", 5), "");
    }
}
