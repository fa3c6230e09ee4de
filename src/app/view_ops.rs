use crate::error::AppResult;
use crate::ui::{DebugStatus, NavControls, draw_chrome, split_layout};

use super::core::App;
use super::terminal_session::TerminalSurface;

impl App {
    pub(crate) fn render_frame(&mut self, session: &mut impl TerminalSurface) -> AppResult<()> {
        let state = &self.state;
        let reader = &self.reader;
        let presenter = &mut self.presenter;
        let mut controls = NavControls::default();

        session.draw(|frame| {
            let area = frame.area();
            let layout = split_layout(area, state.debug_status_visible);
            presenter.set_area(area.width, layout.viewer);
            presenter.draw(frame, reader.document());

            let encounter = reader.encounter();
            let debug = DebugStatus {
                encounter_phase: encounter.phase().as_str(),
                active: encounter.active(),
                nav_phase: reader.navigation().phase_label(),
                chapter: reader.current_index() + 1,
                chapter_count: reader.chapter_count(),
                document_hidden: presenter.is_document_hidden(),
            };
            controls = draw_chrome(frame, layout, state, presenter.nav(), debug);
        })?;

        self.presenter.set_nav_controls(controls);
        Ok(())
    }
}
