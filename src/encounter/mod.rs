//! The single open detail view.
//!
//! At most one unit is active at a time. Touching it again closes the detail,
//! touching any other unit while one is open is refused with a shudder, and a
//! close in flight rejects every touch until it settles.

mod neighbors;

use std::time::Duration;

use log::{debug, info};

use crate::config::Config;
use crate::dictionary::CharacterLookup;
use crate::document::{RenderedChapter, UnitId};
use crate::presenter::{DetailContent, FocusTarget, ShudderTarget, Stage};
use crate::settle::{SettledBy, Ticket, TransitionSignal};

pub use neighbors::yield_mark_for;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncounterPhase {
    Idle,
    Open,
    Closing,
}

impl EncounterPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Open => "open",
            Self::Closing => "closing",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchOutcome {
    Opened,
    Released,
    Refused,
    /// A close is in flight.
    Rejected,
    Missing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseOutcome {
    Idle,
    /// Wait for this ticket; it may belong to a close already in flight.
    Closing(Ticket),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EncounterPolicy {
    pub narrow_threshold_px: f32,
    pub drawer_width_px: f32,
    pub drawer_margin_px: f32,
    pub open_fallback: Duration,
    pub close_fallback: Duration,
}

impl EncounterPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            narrow_threshold_px: config.layout.narrow_threshold_px,
            drawer_width_px: config.layout.drawer_width_px,
            drawer_margin_px: config.layout.drawer_margin_px,
            open_fallback: Duration::from_millis(config.timing.open_fallback_ms),
            close_fallback: Duration::from_millis(config.timing.close_fallback_ms),
        }
    }

    pub fn is_narrow(&self, viewport_width_px: f32) -> bool {
        viewport_width_px < self.narrow_threshold_px
    }

    /// Rightmost edge a unit may reach before the drawer covers it.
    pub fn occlusion_edge(&self, viewport_width_px: f32) -> f32 {
        viewport_width_px - self.drawer_width_px - self.drawer_margin_px
    }
}

impl Default for EncounterPolicy {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

#[derive(Debug, Clone, Copy)]
struct PendingClose {
    ticket: Ticket,
    refocus: Option<UnitId>,
}

pub struct EncounterController {
    lookup: Box<dyn CharacterLookup>,
    policy: EncounterPolicy,
    phase: EncounterPhase,
    active: Option<UnitId>,
    encounter_active: bool,
    narrow: bool,
    opening: Option<Ticket>,
    closing: Option<PendingClose>,
}

impl EncounterController {
    pub fn new(lookup: Box<dyn CharacterLookup>, policy: EncounterPolicy) -> Self {
        Self {
            lookup,
            policy,
            phase: EncounterPhase::Idle,
            active: None,
            encounter_active: false,
            narrow: false,
            opening: None,
            closing: None,
        }
    }

    pub fn phase(&self) -> EncounterPhase {
        self.phase
    }

    pub fn active(&self) -> Option<UnitId> {
        self.active
    }

    /// Raised on open, lowered once the close settles. Chapter gestures are
    /// suppressed while it is up.
    pub fn is_encounter_active(&self) -> bool {
        self.encounter_active
    }

    pub fn is_transitioning(&self) -> bool {
        self.opening.is_some() || self.closing.is_some()
    }

    pub fn policy(&self) -> &EncounterPolicy {
        &self.policy
    }

    pub fn touch(
        &mut self,
        document: &mut RenderedChapter,
        unit: UnitId,
        stage: &mut Stage<'_>,
    ) -> TouchOutcome {
        if document.unit(unit).is_none() {
            return TouchOutcome::Missing;
        }

        match (self.phase, self.active) {
            (EncounterPhase::Closing, _) => {
                debug!("touch on {unit:?} rejected: close in flight");
                TouchOutcome::Rejected
            }
            (EncounterPhase::Open, Some(active)) if active == unit => {
                self.begin_close(document, stage, Some(unit));
                TouchOutcome::Released
            }
            (EncounterPhase::Open, Some(active)) => {
                debug!("touch on {unit:?} refused: {active:?} is open");
                stage.presentation.shudder(ShudderTarget::Unit(unit));
                stage.presentation.shudder(ShudderTarget::Unit(active));
                stage.presentation.shudder(ShudderTarget::Detail);
                TouchOutcome::Refused
            }
            _ => {
                self.open(document, unit, stage);
                TouchOutcome::Opened
            }
        }
    }

    /// Closes without returning focus; used before a chapter swap.
    pub fn release(
        &mut self,
        document: &mut RenderedChapter,
        stage: &mut Stage<'_>,
    ) -> ReleaseOutcome {
        self.close_with(document, stage, false)
    }

    /// Closes and returns focus to the unit that was open.
    pub fn dismiss(
        &mut self,
        document: &mut RenderedChapter,
        stage: &mut Stage<'_>,
    ) -> ReleaseOutcome {
        self.close_with(document, stage, true)
    }

    /// Returns whether `ticket` belonged to this controller.
    pub fn on_settled(&mut self, ticket: Ticket, by: SettledBy, stage: &mut Stage<'_>) -> bool {
        if self.opening == Some(ticket) {
            self.opening = None;
            if by == SettledBy::Deadline {
                debug!("detail open settled by fallback");
            }
            if self.narrow && self.phase == EncounterPhase::Open {
                stage.presentation.focus(FocusTarget::Detail);
            }
            return true;
        }

        let Some(pending) = self.closing.filter(|pending| pending.ticket == ticket) else {
            return false;
        };
        if by == SettledBy::Deadline {
            debug!("detail close settled by fallback");
        }
        self.closing = None;
        self.phase = EncounterPhase::Idle;
        self.encounter_active = false;
        if self.narrow {
            stage.presentation.set_document_hidden(false);
            self.narrow = false;
        }
        if let Some(unit) = pending.refocus {
            stage.presentation.focus(FocusTarget::Unit(unit));
        }
        true
    }

    /// Forgets every pending wait. The document the state referred to is
    /// about to be replaced.
    pub fn reset(&mut self) {
        self.phase = EncounterPhase::Idle;
        self.active = None;
        self.encounter_active = false;
        self.narrow = false;
        self.opening = None;
        self.closing = None;
    }

    fn open(&mut self, document: &mut RenderedChapter, unit: UnitId, stage: &mut Stage<'_>) {
        let Some(character) = document.unit(unit).map(|u| u.character.clone()) else {
            return;
        };
        neighbors::set_active(document, unit);
        neighbors::apply_yield(document, unit);
        self.active = Some(unit);
        self.phase = EncounterPhase::Open;
        self.encounter_active = true;

        let content = match self.lookup.lookup(&character) {
            Some(info) => DetailContent::Known(info),
            None => DetailContent::Unknown {
                character: character.clone(),
            },
        };
        info!("encounter opened on {character} at {unit:?}");
        let signal = stage.presentation.open_detail(unit, content);

        let width = stage.presentation.viewport_width_px();
        self.narrow = self.policy.is_narrow(width);
        if self.narrow {
            stage.presentation.set_document_hidden(true);
        } else if let Some(bounds) = stage.presentation.unit_bounds(unit)
            && bounds.right_px > self.policy.occlusion_edge(width)
        {
            stage.presentation.scroll_into_view(unit);
        }

        self.opening = Some(stage.scheduler.arm(signal, self.policy.open_fallback));
    }

    fn close_with(
        &mut self,
        document: &mut RenderedChapter,
        stage: &mut Stage<'_>,
        refocus: bool,
    ) -> ReleaseOutcome {
        match self.phase {
            EncounterPhase::Idle => ReleaseOutcome::Idle,
            EncounterPhase::Closing => match self.closing {
                Some(pending) => ReleaseOutcome::Closing(pending.ticket),
                None => ReleaseOutcome::Idle,
            },
            EncounterPhase::Open => {
                let refocus = if refocus { self.active } else { None };
                ReleaseOutcome::Closing(self.begin_close(document, stage, refocus))
            }
        }
    }

    fn begin_close(
        &mut self,
        document: &mut RenderedChapter,
        stage: &mut Stage<'_>,
        refocus: Option<UnitId>,
    ) -> Ticket {
        neighbors::clear_active(document);
        neighbors::clear_yield(document);
        if let Some(unit) = self.active.take() {
            info!("encounter released at {unit:?}");
        }
        self.phase = EncounterPhase::Closing;

        let signal: TransitionSignal = stage.presentation.close_detail();
        let ticket = stage.scheduler.arm(signal, self.policy.close_fallback);
        self.closing = Some(PendingClose { ticket, refocus });
        ticket
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crate::dictionary::{CharacterInfo, CharacterLookup, Dictionary};
    use crate::document::{RenderedChapter, UnitId, YieldStrength, render};
    use crate::presenter::{DetailContent, FocusTarget, ShudderTarget, UnitBounds};
    use crate::settle::SettledBy;
    use crate::testing::{Call, FakePresentation, Rig};
    use crate::text::Text;

    use super::{
        EncounterController, EncounterPhase, EncounterPolicy, ReleaseOutcome, TouchOutcome,
    };

    struct EmptyLookup;

    impl CharacterLookup for EmptyLookup {
        fn lookup(&self, _character: &str) -> Option<CharacterInfo> {
            None
        }
    }

    fn chapter_one() -> RenderedChapter {
        let text = Text::bundled().expect("bundled text");
        render(&text, 0).expect("chapter 0")
    }

    fn controller() -> EncounterController {
        let dictionary = Dictionary::bundled().expect("bundled dictionary");
        EncounterController::new(Box::new(dictionary), EncounterPolicy::default())
    }

    #[test]
    fn narrow_threshold_is_exclusive() {
        let policy = EncounterPolicy::default();
        assert!(policy.is_narrow(639.0));
        assert!(!policy.is_narrow(640.0));
    }

    #[test]
    fn touch_opens_and_second_touch_releases_to_idle() {
        let mut doc = chapter_one();
        let mut encounter = controller();
        let mut rig = Rig::wide();
        let unit = UnitId::new(0, 0);

        assert_eq!(
            encounter.touch(&mut doc, unit, &mut rig.stage()),
            TouchOutcome::Opened
        );
        assert_eq!(encounter.phase(), EncounterPhase::Open);
        assert_eq!(encounter.active(), Some(unit));
        assert!(encounter.is_encounter_active());
        assert_eq!(
            rig.scheduler.last().map(|(_, deadline)| deadline),
            Some(Duration::from_millis(1100))
        );
        let unit_state = doc.unit(unit).expect("unit");
        assert!(unit_state.is_active && unit_state.is_expanded);
        assert!(matches!(
            rig.presentation.calls.first(),
            Some(Call::OpenDetail { content: DetailContent::Known(info), .. }) if info.pinyin == "dào"
        ));

        assert_eq!(
            encounter.touch(&mut doc, unit, &mut rig.stage()),
            TouchOutcome::Released
        );
        assert_eq!(encounter.phase(), EncounterPhase::Closing);
        assert_eq!(encounter.active(), None);
        assert_eq!(doc.active_count(), 0);
        assert!(doc.units().all(|u| u.yield_mark.is_none()));
        assert!(encounter.is_encounter_active());

        let close = rig.last_ticket();
        assert!(encounter.on_settled(close, SettledBy::Deadline, &mut rig.stage()));
        assert_eq!(encounter.phase(), EncounterPhase::Idle);
        assert!(!encounter.is_encounter_active());
        assert_eq!(
            rig.presentation.calls.last(),
            Some(&Call::Focus(FocusTarget::Unit(unit)))
        );
    }

    #[test]
    fn touching_another_unit_is_refused_without_state_change() {
        let mut doc = chapter_one();
        let mut encounter = controller();
        let mut rig = Rig::wide();
        let first = UnitId::new(0, 0);
        let other = UnitId::new(3, 2);

        encounter.touch(&mut doc, first, &mut rig.stage());
        assert_eq!(
            encounter.touch(&mut doc, other, &mut rig.stage()),
            TouchOutcome::Refused
        );
        assert_eq!(encounter.active(), Some(first));
        assert_eq!(doc.active_count(), 1);
        assert!(!doc.unit(other).expect("unit").is_active);

        let shudders: Vec<_> = rig
            .presentation
            .calls
            .iter()
            .filter_map(|call| match call {
                Call::Shudder(target) => Some(*target),
                _ => None,
            })
            .collect();
        assert_eq!(
            shudders,
            vec![
                ShudderTarget::Unit(other),
                ShudderTarget::Unit(first),
                ShudderTarget::Detail
            ]
        );
        assert_eq!(rig.scheduler.armed.len(), 1);
    }

    #[test]
    fn at_most_one_unit_is_active_across_touch_sequences() {
        let mut doc = chapter_one();
        let mut encounter = controller();
        let mut rig = Rig::wide();
        let sequence = [
            UnitId::new(0, 0),
            UnitId::new(1, 2),
            UnitId::new(0, 0),
            UnitId::new(1, 2),
            UnitId::new(4, 0),
            UnitId::new(4, 0),
            UnitId::new(9, 3),
        ];

        for unit in sequence {
            encounter.touch(&mut doc, unit, &mut rig.stage());
            assert!(doc.active_count() <= 1);
            if encounter.phase() == EncounterPhase::Closing {
                let ticket = rig.last_ticket();
                encounter.on_settled(ticket, SettledBy::Signal, &mut rig.stage());
            }
            assert!(doc.active_count() <= 1);
            assert_eq!(doc.active_count() == 1, encounter.active().is_some());
        }
    }

    #[test]
    fn release_is_idempotent_and_reports_close_in_flight() {
        let mut doc = chapter_one();
        let mut encounter = controller();
        let mut rig = Rig::wide();

        assert_eq!(
            encounter.release(&mut doc, &mut rig.stage()),
            ReleaseOutcome::Idle
        );
        assert!(rig.presentation.calls.is_empty());
        assert!(rig.scheduler.armed.is_empty());
        assert_eq!(encounter.phase(), EncounterPhase::Idle);

        encounter.touch(&mut doc, UnitId::new(2, 1), &mut rig.stage());
        let first = encounter.release(&mut doc, &mut rig.stage());
        let second = encounter.release(&mut doc, &mut rig.stage());
        assert!(matches!(first, ReleaseOutcome::Closing(_)));
        assert_eq!(first, second);
        assert_eq!(rig.presentation.count(|call| *call == Call::CloseDetail), 1);
    }

    #[test]
    fn touch_during_close_is_rejected() {
        let mut doc = chapter_one();
        let mut encounter = controller();
        let mut rig = Rig::wide();
        let unit = UnitId::new(0, 0);

        encounter.touch(&mut doc, unit, &mut rig.stage());
        encounter.dismiss(&mut doc, &mut rig.stage());
        assert_eq!(
            encounter.touch(&mut doc, UnitId::new(1, 0), &mut rig.stage()),
            TouchOutcome::Rejected
        );
        assert_eq!(
            encounter.touch(&mut doc, unit, &mut rig.stage()),
            TouchOutcome::Rejected
        );
        assert_eq!(doc.active_count(), 0);
    }

    #[test]
    fn narrow_viewport_hides_document_and_focuses_detail_after_open() {
        let mut doc = chapter_one();
        let mut encounter = controller();
        let mut rig = Rig::narrow();
        let unit = UnitId::new(0, 1);

        encounter.touch(&mut doc, unit, &mut rig.stage());
        let open = rig.last_ticket();
        assert!(encounter.on_settled(open, SettledBy::Signal, &mut rig.stage()));
        encounter.touch(&mut doc, unit, &mut rig.stage());
        let close = rig.last_ticket();
        assert!(encounter.on_settled(close, SettledBy::Signal, &mut rig.stage()));

        let relevant: Vec<_> = rig
            .presentation
            .calls
            .into_iter()
            .filter(|call| matches!(call, Call::DocumentHidden(_) | Call::Focus(_)))
            .collect();
        assert_eq!(
            relevant,
            vec![
                Call::DocumentHidden(true),
                Call::Focus(FocusTarget::Detail),
                Call::DocumentHidden(false),
                Call::Focus(FocusTarget::Unit(unit)),
            ]
        );
    }

    #[test]
    fn wide_viewport_scrolls_units_under_the_drawer_into_view() {
        let mut doc = chapter_one();
        let mut encounter = controller();
        let mut presentation = FakePresentation::with_width(800.0);
        presentation.bounds.insert(
            UnitId::new(0, 0),
            UnitBounds {
                left_px: 760.0,
                right_px: 780.0,
            },
        );
        presentation.bounds.insert(
            UnitId::new(9, 0),
            UnitBounds {
                left_px: 40.0,
                right_px: 60.0,
            },
        );
        let mut rig = Rig::new(presentation);

        encounter.touch(&mut doc, UnitId::new(0, 0), &mut rig.stage());
        encounter.release(&mut doc, &mut rig.stage());
        let close = rig.last_ticket();
        encounter.on_settled(close, SettledBy::Signal, &mut rig.stage());
        encounter.touch(&mut doc, UnitId::new(9, 0), &mut rig.stage());

        let presentation = &rig.presentation;
        assert_eq!(
            presentation.count(|call| matches!(call, Call::ScrollIntoView(_))),
            1
        );
        assert!(
            presentation
                .calls
                .contains(&Call::ScrollIntoView(UnitId::new(0, 0)))
        );
        assert_eq!(
            presentation.count(|call| matches!(call, Call::DocumentHidden(_))),
            0
        );
    }

    #[test]
    fn unknown_character_opens_placeholder_detail() {
        let mut doc = chapter_one();
        let mut encounter =
            EncounterController::new(Box::new(EmptyLookup), EncounterPolicy::default());
        let mut rig = Rig::wide();

        assert_eq!(
            encounter.touch(&mut doc, UnitId::new(0, 0), &mut rig.stage()),
            TouchOutcome::Opened
        );
        assert_eq!(
            rig.presentation.calls.first(),
            Some(&Call::OpenDetail {
                unit: UnitId::new(0, 0),
                content: DetailContent::Unknown {
                    character: "道".to_string()
                },
            })
        );
    }

    #[test]
    fn touching_a_unit_outside_the_chapter_is_ignored() {
        let mut doc = chapter_one();
        let mut encounter = controller();
        let mut rig = Rig::wide();

        assert_eq!(
            encounter.touch(&mut doc, UnitId::new(40, 0), &mut rig.stage()),
            TouchOutcome::Missing
        );
        assert_eq!(encounter.phase(), EncounterPhase::Idle);
        assert!(rig.presentation.calls.is_empty());
    }

    #[test]
    fn opening_marks_two_neighbours_each_side_in_the_line_only() {
        let mut doc = chapter_one();
        let mut encounter = controller();
        let mut rig = Rig::wide();

        encounter.touch(&mut doc, UnitId::new(0, 3), &mut rig.stage());

        let marks: Vec<_> = doc.lines[0]
            .units
            .iter()
            .map(|unit| unit.yield_mark.map(|m| (m.strength, m.direction)))
            .collect();
        assert_eq!(
            marks,
            vec![
                None,
                Some((YieldStrength::Far, -1)),
                Some((YieldStrength::Near, -1)),
                None,
                Some((YieldStrength::Near, 1)),
                Some((YieldStrength::Far, 1)),
            ]
        );
        assert!(
            doc.lines[1..]
                .iter()
                .flat_map(|line| line.units.iter())
                .all(|unit| unit.yield_mark.is_none())
        );
    }
}
