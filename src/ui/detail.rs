use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::presenter::DetailContent;

#[derive(Debug, Clone, Copy)]
pub struct DetailView<'a> {
    pub content: &'a DetailContent,
    pub focused: bool,
    /// Horizontal jitter while the detail shudders.
    pub jitter: u16,
}

/// Draws the detail card into `card`, clearing `sheet` behind it. In drawer
/// mode both rects are the same.
pub fn draw_detail(frame: &mut Frame<'_>, sheet: Rect, card: Rect, view: DetailView<'_>) {
    if sheet.width == 0 || sheet.height == 0 {
        return;
    }
    frame.render_widget(Clear, sheet);
    if sheet != card {
        frame.render_widget(
            Block::default().style(Style::default().add_modifier(Modifier::DIM)),
            sheet,
        );
    }

    let card = shift_within(card, sheet, view.jitter);
    if card.width == 0 || card.height == 0 {
        return;
    }
    frame.render_widget(Clear, card);

    let border = if view.focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let block = Block::default()
        .title(format!(" {} ", view.content.character()))
        .borders(Borders::ALL)
        .border_style(border);
    let inner = block.inner(card);
    frame.render_widget(block, card);
    if inner.width == 0 || inner.height == 0 {
        return;
    }

    let body = Paragraph::new(detail_lines(view.content))
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: true });
    frame.render_widget(body, inner);
}

pub(crate) fn detail_lines(content: &DetailContent) -> Vec<Line<'static>> {
    let glyph = Span::styled(
        content.character().to_string(),
        Style::default().add_modifier(Modifier::BOLD),
    );
    let info = match content {
        DetailContent::Known(info) => info,
        DetailContent::Unknown { .. } => {
            return vec![
                Line::from(glyph),
                Line::from(Span::styled(
                    "…",
                    Style::default().fg(Color::DarkGray),
                )),
            ];
        }
    };

    let mut lines = vec![Line::from(vec![
        glyph,
        Span::raw("  "),
        Span::styled(info.pinyin.clone(), Style::default().fg(Color::Cyan)),
    ])];
    if let Some(etymology) = info.etymology_line() {
        lines.push(Line::from(etymology));
    }
    let mut facts = Vec::new();
    if !info.radical.is_empty() {
        facts.push(format!("radical {}", info.radical));
    }
    if info.strokes > 0 {
        facts.push(format!("{} strokes", info.strokes));
    }
    if !facts.is_empty() {
        lines.push(Line::from(Span::styled(
            facts.join(" · "),
            Style::default().fg(Color::DarkGray),
        )));
    }
    lines.push(Line::default());
    lines.push(Line::from(info.definition.clone()));
    lines
}

fn shift_within(rect: Rect, bounds: Rect, dx: u16) -> Rect {
    let x = rect.x.saturating_add(dx);
    let width = rect.width.min(bounds.right().saturating_sub(x));
    Rect::new(x, rect.y, width, rect.height)
}
