use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::command::Command;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeymapPreset {
    Default,
    Vi,
}

impl KeymapPreset {
    pub fn parse(value: &str) -> Self {
        match value {
            "default" => Self::Default,
            "vi" => Self::Vi,
            _ => Self::Default,
        }
    }
}

pub fn map_key_to_command(key: KeyEvent) -> Option<Command> {
    map_key_to_command_with_preset(key, KeymapPreset::Default)
}

pub fn map_key_to_command_with_preset(key: KeyEvent, preset: KeymapPreset) -> Option<Command> {
    match preset {
        KeymapPreset::Default => map_key_default(key),
        KeymapPreset::Vi => map_key_vi(key),
    }
}

// Columns run right to left, so Left moves forward through the text.
fn map_key_default(key: KeyEvent) -> Option<Command> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Command::Quit),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Left | KeyCode::Down | KeyCode::PageDown => Some(Command::NextChapter),
        KeyCode::Right | KeyCode::Up | KeyCode::PageUp => Some(Command::PrevChapter),
        KeyCode::Home => Some(Command::FirstChapter),
        KeyCode::End => Some(Command::LastChapter),
        KeyCode::Tab => Some(Command::FocusNext),
        KeyCode::BackTab => Some(Command::FocusPrev),
        KeyCode::Enter | KeyCode::Char(' ') => Some(Command::ActivateFocused),
        KeyCode::Esc => Some(Command::Dismiss),
        KeyCode::F(2) => Some(Command::DebugStatusToggle),
        KeyCode::Char('q') => Some(Command::Quit),
        _ => None,
    }
}

fn map_key_vi(key: KeyEvent) -> Option<Command> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return map_key_default(key);
    }

    match key.code {
        KeyCode::Char('h') | KeyCode::Char('j') => Some(Command::NextChapter),
        KeyCode::Char('l') | KeyCode::Char('k') => Some(Command::PrevChapter),
        KeyCode::Char('g') => Some(Command::FirstChapter),
        KeyCode::Char('G') => Some(Command::LastChapter),
        _ => map_key_default(key),
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    use crate::command::Command;

    use super::{KeymapPreset, map_key_to_command, map_key_to_command_with_preset};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn keymap_preset_parse_defaults_on_unknown_values() {
        assert_eq!(KeymapPreset::parse("default"), KeymapPreset::Default);
        assert_eq!(KeymapPreset::parse("vi"), KeymapPreset::Vi);
        assert_eq!(KeymapPreset::parse("unknown"), KeymapPreset::Default);
    }

    #[test]
    fn arrows_follow_right_to_left_reading() {
        assert_eq!(map_key_to_command(key(KeyCode::Left)), Some(Command::NextChapter));
        assert_eq!(map_key_to_command(key(KeyCode::Down)), Some(Command::NextChapter));
        assert_eq!(map_key_to_command(key(KeyCode::Right)), Some(Command::PrevChapter));
        assert_eq!(map_key_to_command(key(KeyCode::Up)), Some(Command::PrevChapter));
        assert_eq!(map_key_to_command(key(KeyCode::Esc)), Some(Command::Dismiss));
        assert_eq!(
            map_key_to_command(key(KeyCode::Char(' '))),
            Some(Command::ActivateFocused)
        );
    }

    #[test]
    fn vi_preset_adds_letter_motions_and_keeps_defaults() {
        let next = map_key_to_command_with_preset(key(KeyCode::Char('h')), KeymapPreset::Vi);
        assert_eq!(next, Some(Command::NextChapter));

        let last = map_key_to_command_with_preset(key(KeyCode::Char('G')), KeymapPreset::Vi);
        assert_eq!(last, Some(Command::LastChapter));

        let quit = map_key_to_command_with_preset(
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
            KeymapPreset::Vi,
        );
        assert_eq!(quit, Some(Command::Quit));
    }
}
