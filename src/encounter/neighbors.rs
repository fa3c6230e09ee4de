use crate::document::{RenderedChapter, UnitId, YieldMark, YieldStrength};

/// Mark a sibling at `position` receives when `active` is opened in the same
/// line. Only distances 1 and 2 yield.
pub fn yield_mark_for(active: usize, position: usize) -> Option<YieldMark> {
    let strength = match active.abs_diff(position) {
        1 => YieldStrength::Near,
        2 => YieldStrength::Far,
        _ => return None,
    };
    let direction = if position < active { -1 } else { 1 };
    Some(YieldMark {
        strength,
        direction,
    })
}

pub(crate) fn apply_yield(document: &mut RenderedChapter, active: UnitId) {
    let Some(line) = document.lines.get_mut(active.line) else {
        return;
    };
    for unit in &mut line.units {
        unit.yield_mark = yield_mark_for(active.position, unit.position_in_line);
    }
}

/// Clears every mark in the chapter, not only the active line.
pub(crate) fn clear_yield(document: &mut RenderedChapter) {
    for unit in document.units_mut() {
        unit.yield_mark = None;
    }
}

pub(crate) fn set_active(document: &mut RenderedChapter, active: UnitId) {
    for unit in document.units_mut() {
        let is_active = unit.id() == active;
        unit.is_active = is_active;
        unit.is_expanded = is_active;
    }
}

pub(crate) fn clear_active(document: &mut RenderedChapter) {
    for unit in document.units_mut() {
        unit.is_active = false;
        unit.is_expanded = false;
    }
}
