use crate::app::AppState;
use crate::document::UnitId;
use crate::encounter::{EncounterPhase, TouchOutcome};
use crate::error::AppResult;
use crate::navigation::{DropReason, NavOutcome};
use crate::presenter::{FocusTarget, Stage};
use crate::reader::Reader;
use crate::text::chapter_label;

use super::types::{ActionId, CommandOutcome};

pub(crate) fn touch_unit(
    app: &mut AppState,
    reader: &mut Reader,
    stage: &mut Stage<'_>,
    unit: UnitId,
) -> AppResult<CommandOutcome> {
    app.status.last_action_id = Some(ActionId::TouchUnit);
    let character = reader
        .document()
        .unit(unit)
        .map(|u| u.character.clone())
        .unwrap_or_default();

    let outcome = match reader.touch(unit, stage) {
        TouchOutcome::Opened => {
            app.status.message = format!("opened {character}");
            CommandOutcome::Applied
        }
        TouchOutcome::Released => {
            app.status.message = format!("released {character}");
            CommandOutcome::Applied
        }
        TouchOutcome::Refused => {
            app.status.message = format!("refused {character}: another character is open");
            CommandOutcome::Refused
        }
        TouchOutcome::Rejected => {
            app.status.message = "busy: transition in flight".to_string();
            CommandOutcome::Noop
        }
        TouchOutcome::Missing => {
            app.status.message = format!("no unit at line {} position {}", unit.line, unit.position);
            CommandOutcome::Noop
        }
    };
    Ok(outcome)
}

pub(crate) fn move_focus(
    app: &mut AppState,
    reader: &Reader,
    stage: &mut Stage<'_>,
    forward: bool,
) -> AppResult<CommandOutcome> {
    let action_id = if forward {
        ActionId::FocusNext
    } else {
        ActionId::FocusPrev
    };
    app.status.last_action_id = Some(action_id);

    // The document is hidden behind a narrow detail sheet; focus stays there.
    let encounter = reader.encounter();
    let width = stage.presentation.viewport_width_px();
    if encounter.is_encounter_active() && encounter.policy().is_narrow(width) {
        stage.presentation.focus(FocusTarget::Detail);
        app.status.message = "focus held by detail".to_string();
        return Ok(CommandOutcome::Noop);
    }

    let current = match stage.presentation.focused() {
        Some(FocusTarget::Unit(unit)) => Some(unit),
        Some(FocusTarget::Detail) => encounter.active(),
        None => None,
    };
    let document = reader.document();
    let next = if forward {
        document.next_unit(current)
    } else {
        document.prev_unit(current)
    };
    let Some(next) = next else {
        app.status.message = "nothing to focus".to_string();
        return Ok(CommandOutcome::Noop);
    };

    stage.presentation.focus(FocusTarget::Unit(next));
    app.status.message = document
        .lines
        .get(next.line)
        .map(|line| line.label.clone())
        .unwrap_or_default();
    Ok(CommandOutcome::Applied)
}

pub(crate) fn activate_focused(
    app: &mut AppState,
    reader: &mut Reader,
    stage: &mut Stage<'_>,
) -> AppResult<CommandOutcome> {
    match stage.presentation.focused() {
        Some(FocusTarget::Unit(unit)) => touch_unit(app, reader, stage, unit),
        Some(FocusTarget::Detail) => dismiss(app, reader, stage),
        None => {
            app.status.last_action_id = Some(ActionId::ActivateFocused);
            app.status.message = "nothing focused".to_string();
            Ok(CommandOutcome::Noop)
        }
    }
}

pub(crate) fn dismiss(
    app: &mut AppState,
    reader: &mut Reader,
    stage: &mut Stage<'_>,
) -> AppResult<CommandOutcome> {
    app.status.last_action_id = Some(ActionId::Dismiss);
    if reader.encounter().phase() != EncounterPhase::Open {
        app.status.message = "nothing to dismiss".to_string();
        return Ok(CommandOutcome::Noop);
    }

    reader.dismiss(stage);
    app.status.message = "detail dismissed".to_string();
    Ok(CommandOutcome::Applied)
}

pub(crate) fn navigate(
    app: &mut AppState,
    reader: &mut Reader,
    action_id: ActionId,
    step: impl FnOnce(&mut Reader) -> NavOutcome,
) -> AppResult<CommandOutcome> {
    app.status.last_action_id = Some(action_id);

    match step(reader) {
        NavOutcome::Started => {
            let target = reader
                .navigation()
                .pending_target()
                .unwrap_or_else(|| reader.current_index());
            app.status.message = format!("turning to {}", chapter_label(target));
            Ok(CommandOutcome::Applied)
        }
        NavOutcome::Dropped(reason) => {
            app.status.message = match reason {
                DropReason::OutOfRange if action_id == ActionId::PrevChapter => {
                    "already at first chapter".to_string()
                }
                DropReason::OutOfRange => format!(
                    "already at last chapter ({})",
                    chapter_label(reader.chapter_count().saturating_sub(1))
                ),
                DropReason::AlreadyCurrent => {
                    format!("already at {}", chapter_label(reader.current_index()))
                }
                DropReason::InFlight => "busy: chapter transition in flight".to_string(),
            };
            Ok(CommandOutcome::Noop)
        }
    }
}

pub(crate) fn set_debug_status_visible(
    app: &mut AppState,
    visible: bool,
    action_id: ActionId,
) -> AppResult<CommandOutcome> {
    app.status.last_action_id = Some(action_id);
    if app.debug_status_visible == visible {
        let state = if visible { "on" } else { "off" };
        app.status.message = format!("debug status unchanged ({state})");
        return Ok(CommandOutcome::Noop);
    }

    app.debug_status_visible = visible;
    let state = if visible { "on" } else { "off" };
    app.status.message = format!("debug status: {state}");
    Ok(CommandOutcome::Applied)
}
