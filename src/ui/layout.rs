use ratatui::layout::{Constraint, Layout, Rect};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiLayout {
    /// Where the chapter columns and the detail sheet live.
    pub viewer: Rect,
    /// Status message, plus the debug row when it is on.
    pub status: Rect,
}

pub fn split_layout(area: Rect, debug_status_visible: bool) -> UiLayout {
    let status_rows = 1 + u16::from(debug_status_visible);
    let [viewer, status] =
        Layout::vertical([Constraint::Min(1), Constraint::Length(status_rows)]).areas(area);
    UiLayout { viewer, status }
}

/// A `width` x `height` rect centred in `area`, shrunk to fit it.
pub(crate) fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.max(1).min(area.width);
    let height = height.max(1).min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
