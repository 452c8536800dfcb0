// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Line splitting — turns a raw text stream into line and page-break events.
//
// Physical lines end at CR, LF or CRLF. Each line is then cut at form feeds
// (0x0C): either into separate drawable lines with page breaks between them,
// or, when form feeds are ignored, glued back into one line without them.

use std::collections::VecDeque;
use std::io::{BufRead, ErrorKind};

use lineprint_core::error::Result;

/// ASCII form feed.
pub const FORM_FEED: char = '\u{000C}';

/// One unit of work for the page layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineEvent {
    /// A drawable line, trailing whitespace already removed.
    Line(String),
    /// An explicit page break requested by a form feed.
    PageBreak,
}

/// Lazy iterator of [`LineEvent`]s over a buffered reader.
///
/// Consumes the reader; once exhausted it stays exhausted.
pub struct LineSplitter<R> {
    reader: R,
    ignore_form_feed: bool,
    buffer: Vec<u8>,
    pending: VecDeque<LineEvent>,
    done: bool,
}

impl<R: BufRead> LineSplitter<R> {
    pub fn new(reader: R, ignore_form_feed: bool) -> Self {
        Self {
            reader,
            ignore_form_feed,
            buffer: Vec::new(),
            pending: VecDeque::new(),
            done: false,
        }
    }

    /// Queue the events for the next physical line. Returns `false` at end
    /// of input.
    fn fill(&mut self) -> Result<bool> {
        let Some(terminated) = self.read_physical_line()? else {
            return Ok(false);
        };
        let line = decode(&self.buffer);
        self.split_form_feeds(&line, terminated);
        Ok(true)
    }

    /// Read bytes up to the next CR, LF or CRLF into `buffer`, consuming the
    /// terminator. Yields whether a terminator was seen, or `None` once the
    /// input is exhausted.
    fn read_physical_line(&mut self) -> Result<Option<bool>> {
        self.buffer.clear();
        loop {
            let (used, terminator) = {
                let available = match self.reader.fill_buf() {
                    Ok(bytes) => bytes,
                    Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                    Err(err) => return Err(err.into()),
                };
                if available.is_empty() {
                    return Ok((!self.buffer.is_empty()).then_some(false));
                }
                match available.iter().position(|&b| b == b'\n' || b == b'\r') {
                    Some(idx) => {
                        self.buffer.extend_from_slice(&available[..idx]);
                        (idx + 1, Some(available[idx]))
                    }
                    None => {
                        self.buffer.extend_from_slice(available);
                        (available.len(), None)
                    }
                }
            };
            self.reader.consume(used);

            match terminator {
                Some(b'\r') => {
                    self.skip_line_feed()?;
                    return Ok(Some(true));
                }
                Some(_) => return Ok(Some(true)),
                None => {}
            }
        }
    }

    /// Complete a CRLF pair after its CR.
    fn skip_line_feed(&mut self) -> Result<()> {
        loop {
            match self.reader.fill_buf() {
                Ok(bytes) => {
                    if bytes.first() == Some(&b'\n') {
                        self.reader.consume(1);
                    }
                    return Ok(());
                }
                Err(err) if err.kind() == ErrorKind::Interrupted => {}
                Err(err) => return Err(err.into()),
            }
        }
    }

    /// `terminated` marks a line that ended in CR, LF or CRLF. Like the
    /// trailing spaces, that terminator makes the final form-feed segment
    /// non-empty: a form feed followed by a newline leaves a blank first row
    /// on the new page.
    fn split_form_feeds(&mut self, line: &str, terminated: bool) {
        if !line.contains(FORM_FEED) {
            self.pending
                .push_back(LineEvent::Line(line.trim_end().to_owned()));
            return;
        }

        if self.ignore_form_feed {
            let joined: String = line.split(FORM_FEED).map(str::trim_end).collect();
            self.pending.push_back(LineEvent::Line(joined));
            return;
        }

        let mut segments = line.split(FORM_FEED).peekable();
        while let Some(segment) = segments.next() {
            let last = segments.peek().is_none();
            // Emptiness is judged before trimming: a blank-but-spaced segment
            // still occupies a row.
            if !segment.is_empty() || (last && terminated) {
                self.pending
                    .push_back(LineEvent::Line(segment.trim_end().to_owned()));
            }
            if !last {
                self.pending.push_back(LineEvent::PageBreak);
            }
        }
    }
}

impl<R: BufRead> Iterator for LineSplitter<R> {
    type Item = Result<LineEvent>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(event) = self.pending.pop_front() {
                return Some(Ok(event));
            }
            if self.done {
                return None;
            }
            match self.fill() {
                Ok(true) => {}
                Ok(false) => self.done = true,
                Err(err) => {
                    self.done = true;
                    return Some(Err(err));
                }
            }
        }
    }
}

/// Decode one line: UTF-8 when valid, otherwise each byte as its Latin-1
/// code point.
fn decode(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_owned(),
        Err(_) => bytes.iter().map(|&b| char::from(b)).collect(),
    }
}
