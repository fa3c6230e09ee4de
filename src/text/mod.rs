pub mod numerals;

use std::fs;
use std::path::Path;

use unicode_segmentation::UnicodeSegmentation;

use crate::error::{AppError, AppResult};

pub use numerals::{chapter_label, line_label, to_numeral};

/// Chapters beyond this count cannot be labelled with the classical numerals.
pub const MAX_CHAPTERS: usize = 81;

const BUNDLED_TEXT: &str = include_str!("../../data/daodejing.txt");

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chapter {
    lines: Vec<String>,
}

impl Chapter {
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Graphemes of one line, in reading order.
    pub fn glyphs(&self, line: usize) -> Vec<&str> {
        self.lines
            .get(line)
            .map(|text| text.graphemes(true).collect())
            .unwrap_or_default()
    }
}

/// A corpus split into chapters and lines.
///
/// Format: one line of text per row, chapters separated by one or more blank
/// rows, rows starting with `#` ignored. Whitespace inside a row is dropped so
/// every remaining grapheme becomes a tappable unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Text {
    chapters: Vec<Chapter>,
}

impl Text {
    pub fn bundled() -> AppResult<Self> {
        Self::parse(BUNDLED_TEXT)
    }

    pub fn load(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| {
            AppError::io_with_context(source, format!("failed to read text: {}", path.display()))
        })?;
        Self::parse(&raw)
    }

    pub fn parse(raw: &str) -> AppResult<Self> {
        let mut chapters = Vec::new();
        let mut current: Vec<String> = Vec::new();
        let mut last_line = 0;

        for (idx, row) in raw.lines().enumerate() {
            last_line = idx + 1;
            let trimmed = row.trim();
            if trimmed.starts_with('#') {
                continue;
            }
            if trimmed.is_empty() {
                if !current.is_empty() {
                    chapters.push(Chapter {
                        lines: std::mem::take(&mut current),
                    });
                }
                continue;
            }

            let line: String = trimmed.chars().filter(|ch| !ch.is_whitespace()).collect();
            current.push(line);
            if chapters.len() >= MAX_CHAPTERS {
                return Err(AppError::text(
                    idx + 1,
                    format!("text has more than {MAX_CHAPTERS} chapters"),
                ));
            }
        }
        if !current.is_empty() {
            chapters.push(Chapter { lines: current });
        }

        if chapters.is_empty() {
            return Err(AppError::text(last_line, "text contains no chapters"));
        }
        Ok(Self { chapters })
    }

    pub fn chapter_count(&self) -> usize {
        self.chapters.len()
    }

    pub fn chapter(&self, index: usize) -> Option<&Chapter> {
        self.chapters.get(index)
    }
}
