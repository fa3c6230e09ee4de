use crate::text::{Text, chapter_label, line_label};

use super::unit::{CharacterUnit, RenderedChapter, RenderedLine};

const TITLE: &str = "道德經";

/// Renders one chapter into lines of tappable units, one unit per grapheme.
///
/// Returns `None` when `index` is outside the text.
pub fn render(text: &Text, index: usize) -> Option<RenderedChapter> {
    let chapter = text.chapter(index)?;
    let number_label = chapter_label(index);

    let lines = (0..chapter.lines().len())
        .map(|line_index| RenderedLine {
            label: format!("{number_label} {}", line_label(line_index)),
            units: chapter
                .glyphs(line_index)
                .into_iter()
                .enumerate()
                .map(|(position, glyph)| CharacterUnit {
                    character: glyph.to_string(),
                    line_index,
                    position_in_line: position,
                    is_active: false,
                    is_expanded: false,
                    yield_mark: None,
                })
                .collect(),
        })
        .collect();

    Some(RenderedChapter {
        index,
        label: format!("{TITLE} {number_label}"),
        number_label,
        lines,
    })
}
