use log::debug;

use crate::config::Config;
use crate::dictionary::CharacterLookup;
use crate::document::{RenderedChapter, UnitId, render};
use crate::encounter::{
    EncounterController, EncounterPolicy, ReleaseOutcome, TouchOutcome,
};
use crate::error::{AppError, AppResult};
use crate::navigation::{ChapterCommit, NavOutcome, NavigationPolicy, NavigationSequencer};
use crate::presenter::Stage;
use crate::settle::{SettledBy, Ticket};
use crate::text::Text;

/// Owns the text, the mounted chapter and both controllers.
pub struct Reader {
    text: Text,
    document: RenderedChapter,
    encounter: EncounterController,
    navigation: NavigationSequencer,
}

impl Reader {
    pub fn new(text: Text, lookup: Box<dyn CharacterLookup>, config: &Config) -> AppResult<Self> {
        let document = render(&text, 0)
            .ok_or_else(|| AppError::invalid_argument("text has no chapters"))?;
        let navigation =
            NavigationSequencer::new(text.chapter_count(), NavigationPolicy::from_config(config));
        Ok(Self {
            text,
            document,
            encounter: EncounterController::new(lookup, EncounterPolicy::from_config(config)),
            navigation,
        })
    }

    pub fn text(&self) -> &Text {
        &self.text
    }

    pub fn document(&self) -> &RenderedChapter {
        &self.document
    }

    pub fn encounter(&self) -> &EncounterController {
        &self.encounter
    }

    pub fn navigation(&self) -> &NavigationSequencer {
        &self.navigation
    }

    pub fn current_index(&self) -> usize {
        self.navigation.current_index()
    }

    pub fn chapter_count(&self) -> usize {
        self.navigation.chapter_count()
    }

    pub fn start(&mut self, stage: &mut Stage<'_>) {
        self.navigation.start(&self.document, stage);
    }

    pub fn touch(&mut self, unit: UnitId, stage: &mut Stage<'_>) -> TouchOutcome {
        if self.navigation.is_transitioning() {
            debug!("touch on {unit:?} dropped during chapter transition");
            return TouchOutcome::Rejected;
        }
        self.encounter.touch(&mut self.document, unit, stage)
    }

    pub fn dismiss(&mut self, stage: &mut Stage<'_>) -> ReleaseOutcome {
        self.encounter.dismiss(&mut self.document, stage)
    }

    pub fn go_to_chapter(&mut self, target: usize, stage: &mut Stage<'_>) -> NavOutcome {
        self.navigation
            .go_to_chapter(target, &mut self.encounter, &mut self.document, stage)
    }

    pub fn next_chapter(&mut self, stage: &mut Stage<'_>) -> NavOutcome {
        self.go_to_chapter(self.current_index() + 1, stage)
    }

    pub fn prev_chapter(&mut self, stage: &mut Stage<'_>) -> NavOutcome {
        // usize::MAX is out of range and dropped like any other bad target.
        self.go_to_chapter(self.current_index().wrapping_sub(1), stage)
    }

    pub fn first_chapter(&mut self, stage: &mut Stage<'_>) -> NavOutcome {
        self.go_to_chapter(0, stage)
    }

    pub fn last_chapter(&mut self, stage: &mut Stage<'_>) -> NavOutcome {
        self.go_to_chapter(self.chapter_count().saturating_sub(1), stage)
    }

    /// Routes a settled wait to whichever controller armed it. The encounter
    /// sees it first so a close settles before navigation resumes on it.
    pub fn on_settled(
        &mut self,
        ticket: Ticket,
        by: SettledBy,
        stage: &mut Stage<'_>,
    ) -> Option<ChapterCommit> {
        self.encounter.on_settled(ticket, by, stage);
        self.navigation.on_settled(
            ticket,
            by,
            &self.text,
            &mut self.encounter,
            &mut self.document,
            stage,
        )
    }
}
