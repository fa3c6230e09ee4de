use crossterm::event::Event;

use crate::command::{ActionId, Command, CommandOutcome};
use crate::settle::{SettledBy, Ticket};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    CommandExecuted {
        id: ActionId,
        outcome: CommandOutcome,
    },
    /// The new chapter was mounted; its enter slide may still be playing.
    ChapterCommitted {
        from: usize,
        to: usize,
    },
}

#[derive(Debug)]
pub(crate) enum DomainEvent {
    Input(Event),
    InputError(String),
    Command(Command),
    App(AppEvent),
    Settled { ticket: Ticket, by: SettledBy },
    RedrawTick,
}
