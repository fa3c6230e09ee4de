use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};
use unicode_width::UnicodeWidthStr;

use crate::app::AppState;
use crate::document::UnitId;
use crate::presenter::NavIndicator;

use super::layout::UiLayout;

const PREV_GLYPH: &str = "‹ ";
const NEXT_GLYPH: &str = " ›";

/// Clickable cells of the chapter indicator. Disabled controls are empty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NavControls {
    pub prev: Rect,
    pub next: Rect,
}

/// Controller facts shown on the debug status row.
#[derive(Debug, Clone, Copy)]
pub struct DebugStatus<'a> {
    pub encounter_phase: &'a str,
    pub active: Option<UnitId>,
    pub nav_phase: &'a str,
    pub chapter: usize,
    pub chapter_count: usize,
    pub document_hidden: bool,
}

pub fn draw_chrome(
    frame: &mut Frame<'_>,
    layout: UiLayout,
    app: &AppState,
    nav: &NavIndicator,
    debug: DebugStatus<'_>,
) -> NavControls {
    let top = Rect::new(layout.status.x, layout.status.y, layout.status.width, 1);

    let message = Paragraph::new(app.status.message.clone()).style(Style::default());
    frame.render_widget(message, top);
    let controls = draw_nav_indicator(frame, top, nav);

    if app.debug_status_visible && layout.status.height >= 2 {
        let command_id = app
            .status
            .last_action_id
            .map(|id| id.as_str())
            .unwrap_or("-");
        let active = debug
            .active
            .map(|unit| format!("{}:{}", unit.line, unit.position))
            .unwrap_or_else(|| "-".to_string());
        let debug_text = format!(
            "cmd={command_id} | encounter={} active={active} | nav={} {}/{} | hidden={}",
            debug.encounter_phase,
            debug.nav_phase,
            debug.chapter,
            debug.chapter_count,
            debug.document_hidden,
        );
        let bottom = Rect::new(
            layout.status.x,
            layout.status.y + 1,
            layout.status.width,
            layout.status.height.saturating_sub(1).max(1),
        );
        let debug = Paragraph::new(debug_text)
            .style(Style::default().fg(Color::DarkGray))
            .wrap(Wrap { trim: true });
        frame.render_widget(debug, bottom);
    }

    controls
}

fn draw_nav_indicator(frame: &mut Frame<'_>, row: Rect, nav: &NavIndicator) -> NavControls {
    let prev_width = PREV_GLYPH.width() as u16;
    let next_width = NEXT_GLYPH.width() as u16;
    let label_width = nav.label.width() as u16;
    let total = prev_width + label_width + next_width;
    if row.width < total || row.height == 0 {
        return NavControls::default();
    }

    let x = row.x + (row.width - total) / 2;
    let rect = Rect::new(x, row.y, total, 1);
    let control = |enabled: bool| {
        if enabled {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        }
    };
    let line = Line::from(vec![
        Span::styled(PREV_GLYPH, control(nav.prev_enabled)),
        Span::raw(nav.label.clone()),
        Span::styled(NEXT_GLYPH, control(nav.next_enabled)),
    ]);
    frame.render_widget(Paragraph::new(line), rect);

    NavControls {
        prev: if nav.prev_enabled {
            Rect::new(x, row.y, prev_width, 1)
        } else {
            Rect::default()
        },
        next: if nav.next_enabled {
            Rect::new(x + prev_width + label_width, row.y, next_width, 1)
        } else {
            Rect::default()
        },
    }
}
