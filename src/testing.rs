//! Recording fakes for driving the controllers without a terminal.

use std::collections::HashMap;
use std::time::Duration;

use crate::document::{RenderedChapter, UnitId};
use crate::presenter::{
    DetailContent, FocusTarget, Generation, NavIndicator, Presentation, ShudderTarget,
    SlideDirection, Stage, UnitBounds,
};
use crate::settle::{Scheduler, Ticket, TransitionSignal};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    OpenDetail { unit: UnitId, content: DetailContent },
    CloseDetail,
    Shudder(ShudderTarget),
    DocumentHidden(bool),
    Focus(FocusTarget),
    ScrollIntoView(UnitId),
    Mount {
        chapter: usize,
        generation: Generation,
        entering: Option<SlideDirection>,
    },
    SlideExit {
        generation: Generation,
        direction: SlideDirection,
    },
    SlideEnter(Generation),
    Unmount(Generation),
    ReadingOrigin,
    Nav(NavIndicator),
}

pub(crate) struct FakePresentation {
    pub width_px: f32,
    pub bounds: HashMap<UnitId, UnitBounds>,
    pub focused: Option<FocusTarget>,
    pub calls: Vec<Call>,
}

impl FakePresentation {
    pub fn wide() -> Self {
        Self::with_width(1200.0)
    }

    pub fn narrow() -> Self {
        Self::with_width(400.0)
    }

    pub fn with_width(width_px: f32) -> Self {
        Self {
            width_px,
            bounds: HashMap::new(),
            focused: None,
            calls: Vec::new(),
        }
    }

    pub fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.calls.iter().filter(|call| predicate(call)).count()
    }
}

impl Presentation for FakePresentation {
    fn viewport_width_px(&self) -> f32 {
        self.width_px
    }

    fn unit_bounds(&self, unit: UnitId) -> Option<UnitBounds> {
        self.bounds.get(&unit).copied()
    }

    fn open_detail(&mut self, unit: UnitId, content: DetailContent) -> TransitionSignal {
        self.calls.push(Call::OpenDetail { unit, content });
        TransitionSignal::never()
    }

    fn close_detail(&mut self) -> TransitionSignal {
        self.calls.push(Call::CloseDetail);
        TransitionSignal::never()
    }

    fn shudder(&mut self, target: ShudderTarget) {
        self.calls.push(Call::Shudder(target));
    }

    fn set_document_hidden(&mut self, hidden: bool) {
        self.calls.push(Call::DocumentHidden(hidden));
    }

    fn focus(&mut self, target: FocusTarget) {
        self.focused = Some(target);
        self.calls.push(Call::Focus(target));
    }

    fn focused(&self) -> Option<FocusTarget> {
        self.focused
    }

    fn scroll_into_view(&mut self, unit: UnitId) {
        self.calls.push(Call::ScrollIntoView(unit));
    }

    fn mount(
        &mut self,
        chapter: &RenderedChapter,
        generation: Generation,
        entering: Option<SlideDirection>,
    ) {
        self.calls.push(Call::Mount {
            chapter: chapter.index,
            generation,
            entering,
        });
    }

    fn slide_exit(
        &mut self,
        generation: Generation,
        direction: SlideDirection,
    ) -> TransitionSignal {
        self.calls.push(Call::SlideExit {
            generation,
            direction,
        });
        TransitionSignal::never()
    }

    fn slide_enter(&mut self, generation: Generation) -> TransitionSignal {
        self.calls.push(Call::SlideEnter(generation));
        TransitionSignal::never()
    }

    fn unmount(&mut self, generation: Generation) {
        self.calls.push(Call::Unmount(generation));
    }

    fn scroll_to_reading_origin(&mut self) {
        self.calls.push(Call::ReadingOrigin);
    }

    fn update_nav(&mut self, indicator: NavIndicator) {
        self.calls.push(Call::Nav(indicator));
    }
}

/// Hands out sequential tickets and remembers each deadline; tests settle
/// tickets by hand.
#[derive(Default)]
pub(crate) struct RecordingScheduler {
    next: u64,
    pub armed: Vec<(Ticket, Duration)>,
}

impl RecordingScheduler {
    pub fn last(&self) -> Option<(Ticket, Duration)> {
        self.armed.last().copied()
    }

    pub fn last_ticket(&self) -> Ticket {
        self.last().map(|(ticket, _)| ticket).unwrap_or(Ticket::new(0))
    }
}

impl Scheduler for RecordingScheduler {
    fn arm(&mut self, _signal: TransitionSignal, deadline: Duration) -> Ticket {
        self.next += 1;
        let ticket = Ticket::new(self.next);
        self.armed.push((ticket, deadline));
        ticket
    }
}

/// A fake presentation and scheduler that hand out short-lived stages.
pub(crate) struct Rig {
    pub presentation: FakePresentation,
    pub scheduler: RecordingScheduler,
}

impl Rig {
    pub fn new(presentation: FakePresentation) -> Self {
        Self {
            presentation,
            scheduler: RecordingScheduler::default(),
        }
    }

    pub fn wide() -> Self {
        Self::new(FakePresentation::wide())
    }

    pub fn narrow() -> Self {
        Self::new(FakePresentation::narrow())
    }

    pub fn stage(&mut self) -> Stage<'_> {
        Stage::new(&mut self.presentation, &mut self.scheduler)
    }

    pub fn last_ticket(&self) -> Ticket {
        self.scheduler.last_ticket()
    }
}
