//! Vertical right-to-left layout of a chapter.
//!
//! Every line becomes one column of double-width glyphs, the first line
//! rightmost. Content-space x runs from 0 at the left edge of the leftmost
//! column; a horizontal scroll offset maps it onto the viewer.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use unicode_width::UnicodeWidthStr;

use crate::document::{CharacterUnit, RenderedChapter, UnitId, YieldStrength};

pub const GLYPH_WIDTH: u16 = 2;
/// Glyph width plus one cell of gutter.
pub const COLUMN_STRIDE: u16 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChapterGeometry {
    pub line_count: usize,
    pub row_step: u16,
    pub top: u16,
    pub content_width: u16,
}

impl ChapterGeometry {
    pub fn measure(chapter: &RenderedChapter, area: Rect) -> Self {
        let longest = u16::try_from(chapter.longest_line()).unwrap_or(u16::MAX);
        // Spacing rows only when every column still fits.
        let row_step = if longest.saturating_mul(2) <= area.height {
            2
        } else {
            1
        };
        let used = longest.saturating_mul(row_step).saturating_sub(row_step - 1);
        let line_count = chapter.line_count();
        Self {
            line_count,
            row_step,
            top: area.height.saturating_sub(used) / 2,
            content_width: u16::try_from(line_count)
                .unwrap_or(u16::MAX)
                .saturating_mul(COLUMN_STRIDE),
        }
    }

    /// Content-space x of the left cell of `line`'s column.
    pub fn column_x(&self, line: usize) -> i32 {
        let stride = i32::from(COLUMN_STRIDE);
        i32::from(self.content_width) - (line as i32 + 1) * stride + 1
    }

    /// Row of `position` relative to the viewer's top edge.
    pub fn row(&self, position: usize) -> i32 {
        i32::from(self.top) + position as i32 * i32::from(self.row_step)
    }

    /// Scroll offset showing the rightmost column; content narrower than the
    /// viewer is centred.
    pub fn reading_origin(&self, view_width: u16) -> f32 {
        let overflow = i32::from(self.content_width) - i32::from(view_width);
        if overflow >= 0 {
            overflow as f32
        } else {
            (overflow / 2) as f32
        }
    }

    /// Offset that centres `line` inside the leftmost `visible_width` cells.
    pub fn centre_on(&self, line: usize, visible_width: u16) -> f32 {
        let centre = self.column_x(line) + i32::from(GLYPH_WIDTH) / 2;
        (centre - i32::from(visible_width) / 2) as f32
    }

    /// Row `unit` is drawn on, including a near yield's one-row shift.
    pub fn drawn_row(&self, unit: &CharacterUnit) -> i32 {
        let row = self.row(unit.position_in_line);
        match unit.yield_mark {
            Some(mark) if mark.strength == YieldStrength::Near && self.row_step > 1 => {
                row + i32::from(mark.direction)
            }
            _ => row,
        }
    }

    /// Unit drawn at a viewer-relative cell, given the scroll and slide
    /// offsets. Spacing rows hit nothing.
    pub fn unit_at(
        &self,
        chapter: &RenderedChapter,
        column: i32,
        row: i32,
        scroll: i32,
    ) -> Option<UnitId> {
        let content_x = column + scroll;
        let line = chapter.lines.iter().enumerate().position(|(idx, _)| {
            let x = self.column_x(idx);
            content_x >= x && content_x < x + i32::from(GLYPH_WIDTH)
        })?;
        chapter.lines[line]
            .units
            .iter()
            .find(|unit| self.drawn_row(unit) == row)
            .map(CharacterUnit::id)
    }
}

/// Per-frame decoration inputs for [`draw_chapter`].
pub struct ChapterStyle<'a> {
    pub focused: Option<UnitId>,
    pub dimmed: bool,
    /// Horizontal jitter for shuddering units.
    pub jitter: &'a dyn Fn(UnitId) -> i32,
}

pub fn draw_chapter(
    buf: &mut Buffer,
    area: Rect,
    chapter: &RenderedChapter,
    geometry: &ChapterGeometry,
    scroll: i32,
    style: &ChapterStyle<'_>,
) {
    for (line_index, line) in chapter.lines.iter().enumerate() {
        let column = geometry.column_x(line_index) - scroll;
        for unit in &line.units {
            let id = unit.id();
            let row = geometry.drawn_row(unit);
            let mut cell_style = Style::default();

            if unit.is_active {
                cell_style = cell_style.add_modifier(Modifier::REVERSED | Modifier::BOLD);
            }
            if unit
                .yield_mark
                .is_some_and(|mark| mark.strength == YieldStrength::Far)
            {
                cell_style = cell_style.add_modifier(Modifier::DIM);
            }
            if style.focused == Some(id) {
                cell_style = cell_style.add_modifier(Modifier::UNDERLINED);
            }
            if style.dimmed {
                cell_style = cell_style.add_modifier(Modifier::DIM);
            }

            let x = i32::from(area.x) + column + (style.jitter)(id);
            let y = i32::from(area.y) + row;
            put_glyph(buf, area, x, y, &unit.character, cell_style);
        }
    }
}

fn put_glyph(buf: &mut Buffer, area: Rect, x: i32, y: i32, glyph: &str, style: Style) {
    let width = i32::try_from(glyph.width().max(1)).unwrap_or(i32::from(GLYPH_WIDTH));
    let inside_x = x >= i32::from(area.x) && x + width <= i32::from(area.right());
    let inside_y = y >= i32::from(area.y) && y < i32::from(area.bottom());
    if !(inside_x && inside_y) {
        return;
    }
    // Both casts are bounded by `area`.
    buf.set_string(x as u16, y as u16, glyph, style);
}
