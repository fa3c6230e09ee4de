use crate::app::AppState;
use crate::error::AppResult;
use crate::event::AppEvent;
use crate::presenter::Stage;
use crate::reader::Reader;

use super::core::{
    activate_focused, dismiss, move_focus, navigate, set_debug_status_visible, touch_unit,
};
use super::types::{ActionId, Command, CommandOutcome};

#[derive(Debug, Clone)]
pub struct CommandDispatchResult {
    pub outcome: CommandOutcome,
    pub emitted_events: Vec<AppEvent>,
}

/// Applies one command. Chapter commits are not reported here; they happen
/// later, when the exit lead settles.
pub fn dispatch(
    app: &mut AppState,
    cmd: Command,
    reader: &mut Reader,
    stage: &mut Stage<'_>,
) -> AppResult<CommandDispatchResult> {
    let action_id = cmd.action_id();

    let outcome = match cmd {
        Command::TouchUnit { unit } => touch_unit(app, reader, stage, unit),
        Command::FocusNext => move_focus(app, reader, stage, true),
        Command::FocusPrev => move_focus(app, reader, stage, false),
        Command::ActivateFocused => activate_focused(app, reader, stage),
        Command::Dismiss => dismiss(app, reader, stage),
        Command::NextChapter => navigate(app, reader, action_id, |r| r.next_chapter(stage)),
        Command::PrevChapter => navigate(app, reader, action_id, |r| r.prev_chapter(stage)),
        Command::FirstChapter => navigate(app, reader, action_id, |r| r.first_chapter(stage)),
        Command::LastChapter => navigate(app, reader, action_id, |r| r.last_chapter(stage)),
        Command::DebugStatusToggle => {
            let visible = !app.debug_status_visible;
            set_debug_status_visible(app, visible, ActionId::DebugStatusToggle)
        }
        Command::Quit => {
            app.status.last_action_id = Some(ActionId::Quit);
            app.status.message = "quit requested".to_string();
            Ok(CommandOutcome::QuitRequested)
        }
    }?;

    Ok(CommandDispatchResult {
        outcome,
        emitted_events: vec![AppEvent::CommandExecuted {
            id: action_id,
            outcome,
        }],
    })
}
