use crate::document::UnitId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    TouchUnit { unit: UnitId },
    FocusNext,
    FocusPrev,
    ActivateFocused,
    Dismiss,
    NextChapter,
    PrevChapter,
    FirstChapter,
    LastChapter,
    DebugStatusToggle,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionId {
    TouchUnit,
    FocusNext,
    FocusPrev,
    ActivateFocused,
    Dismiss,
    NextChapter,
    PrevChapter,
    FirstChapter,
    LastChapter,
    DebugStatusToggle,
    Quit,
    Input,
    Settle,
}

impl ActionId {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TouchUnit => "touch-unit",
            Self::FocusNext => "focus-next",
            Self::FocusPrev => "focus-prev",
            Self::ActivateFocused => "activate-focused",
            Self::Dismiss => "dismiss",
            Self::NextChapter => "next-chapter",
            Self::PrevChapter => "prev-chapter",
            Self::FirstChapter => "first-chapter",
            Self::LastChapter => "last-chapter",
            Self::DebugStatusToggle => "debug-status-toggle",
            Self::Quit => "quit",
            Self::Input => "input",
            Self::Settle => "settle",
        }
    }
}

impl Command {
    pub fn action_id(&self) -> ActionId {
        match self {
            Self::TouchUnit { .. } => ActionId::TouchUnit,
            Self::FocusNext => ActionId::FocusNext,
            Self::FocusPrev => ActionId::FocusPrev,
            Self::ActivateFocused => ActionId::ActivateFocused,
            Self::Dismiss => ActionId::Dismiss,
            Self::NextChapter => ActionId::NextChapter,
            Self::PrevChapter => ActionId::PrevChapter,
            Self::FirstChapter => ActionId::FirstChapter,
            Self::LastChapter => ActionId::LastChapter,
            Self::DebugStatusToggle => ActionId::DebugStatusToggle,
            Self::Quit => ActionId::Quit,
        }
    }

    /// Chapter moves that gestures and arrow keys produce; these are held
    /// back while an encounter is active.
    pub fn is_chapter_step(&self) -> bool {
        matches!(
            self,
            Self::NextChapter | Self::PrevChapter | Self::FirstChapter | Self::LastChapter
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Applied,
    Noop,
    /// The controller answered with feedback instead of a state change.
    Refused,
    QuitRequested,
}

#[cfg(test)]
mod tests {
    use crate::document::UnitId;

    use super::{ActionId, Command};

    #[test]
    fn command_action_id_maps_touch_and_chapter_variants() {
        assert_eq!(
            Command::TouchUnit {
                unit: UnitId::new(0, 0)
            }
            .action_id(),
            ActionId::TouchUnit
        );
        assert_eq!(Command::LastChapter.action_id(), ActionId::LastChapter);
        assert_eq!(ActionId::PrevChapter.as_str(), "prev-chapter");
    }

    #[test]
    fn only_chapter_steps_are_gesture_gated() {
        assert!(Command::NextChapter.is_chapter_step());
        assert!(Command::LastChapter.is_chapter_step());
        assert!(!Command::Dismiss.is_chapter_step());
        assert!(!Command::ActivateFocused.is_chapter_step());
    }
}
