use ratatui::layout::Rect;

use crate::config::Config;
use crate::dictionary::CharacterLookup;
use crate::error::AppResult;
use crate::input::keymap::KeymapPreset;
use crate::input::{GestureThresholds, PointerTracker};
use crate::presenter::TerminalPresenter;
use crate::reader::Reader;
use crate::text::Text;
use crate::ui::split_layout;

use super::state::AppState;

pub struct App {
    pub state: AppState,
    pub reader: Reader,
    pub presenter: TerminalPresenter,
    pub pointer: PointerTracker,
    pub keymap: KeymapPreset,
    pub config: Config,
}

impl App {
    pub fn new(config: Config, text: Text, lookup: Box<dyn CharacterLookup>) -> AppResult<Self> {
        let reader = Reader::new(text, lookup, &config)?;
        Ok(Self {
            state: AppState::default(),
            reader,
            presenter: TerminalPresenter::new(&config),
            pointer: PointerTracker::new(GestureThresholds::from_config(&config)),
            keymap: KeymapPreset::parse(&config.keymap.preset),
            config,
        })
    }

    /// Lays the presenter out for a terminal of `area`.
    pub(crate) fn sync_area(&mut self, area: Rect) {
        let layout = split_layout(area, self.state.debug_status_visible);
        self.presenter.set_area(area.width, layout.viewer);
    }
}
