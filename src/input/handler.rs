use crossterm::event::{Event, KeyEventKind};
use log::debug;
use ratatui::layout::Rect;

use crate::app::App;
use crate::command::{ActionId, Command};
use crate::error::AppResult;
use crate::presenter::Presentation;

use super::keymap::map_key_to_command_with_preset;
use super::pointer::GestureContext;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct InputEventOutcome {
    pub(crate) redraw: bool,
    pub(crate) clear_terminal: bool,
    pub(crate) quit_requested: bool,
    pub(crate) command: Option<Command>,
}

impl App {
    pub(crate) fn handle_input_event(&mut self, event: Event) -> AppResult<InputEventOutcome> {
        match event {
            Event::Key(key) if matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) => {
                let Some(command) = map_key_to_command_with_preset(key, self.keymap) else {
                    return Ok(InputEventOutcome::default());
                };
                if command == Command::Quit {
                    return Ok(InputEventOutcome {
                        quit_requested: true,
                        ..InputEventOutcome::default()
                    });
                }
                if command.is_chapter_step() && self.reader.encounter().is_encounter_active() {
                    debug!(
                        "{} suppressed while a character is open",
                        command.action_id().as_str()
                    );
                    self.state.status.last_action_id = Some(ActionId::Input);
                    self.state.status.message = "close the character first".to_string();
                    return Ok(InputEventOutcome {
                        redraw: true,
                        ..InputEventOutcome::default()
                    });
                }
                Ok(InputEventOutcome {
                    command: Some(command),
                    ..InputEventOutcome::default()
                })
            }
            Event::Mouse(mouse) => {
                let Some(gesture) = self.pointer.handle(mouse) else {
                    return Ok(InputEventOutcome::default());
                };
                let (column, row) = gesture.origin();
                let origin = self.presenter.hit_test(column, row, self.reader.document());
                let encounter = self.reader.encounter();
                let context = GestureContext {
                    encounter_active: encounter.is_encounter_active(),
                    narrow: encounter
                        .policy()
                        .is_narrow(self.presenter.viewport_width_px()),
                };
                let command = self.pointer.resolve(gesture, origin, context);
                debug!("{gesture:?} on {origin:?} -> {command:?}");
                Ok(InputEventOutcome {
                    command,
                    ..InputEventOutcome::default()
                })
            }
            Event::Resize(width, height) => {
                self.sync_area(Rect::new(0, 0, width, height));
                Ok(InputEventOutcome {
                    redraw: true,
                    clear_terminal: true,
                    ..InputEventOutcome::default()
                })
            }
            _ => Ok(InputEventOutcome::default()),
        }
    }
}
