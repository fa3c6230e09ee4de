//! Chapter-to-chapter transitions.
//!
//! A committed request walks through release, exit lead, mount and enter.
//! `current_index` moves only when the new chapter is mounted, and requests
//! arriving while any step is pending are dropped.

use std::time::Duration;

use log::{debug, info, warn};

use crate::config::Config;
use crate::document::{RenderedChapter, render};
use crate::encounter::{EncounterController, ReleaseOutcome};
use crate::presenter::{Generation, NavIndicator, SlideDirection, Stage};
use crate::settle::{SettledBy, Ticket, TransitionSignal};
use crate::text::{Text, chapter_label};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    OutOfRange,
    AlreadyCurrent,
    InFlight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavOutcome {
    Started,
    Dropped(DropReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChapterCommit {
    pub from: usize,
    pub to: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationPolicy {
    pub exit_lead: Duration,
    pub exit_fallback: Duration,
    pub enter_fallback: Duration,
}

impl NavigationPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            exit_lead: Duration::from_millis(config.timing.exit_lead_ms),
            exit_fallback: Duration::from_millis(config.timing.exit_fallback_ms),
            enter_fallback: Duration::from_millis(config.timing.enter_fallback_ms),
        }
    }
}

impl Default for NavigationPolicy {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NavPhase {
    Idle,
    /// Waiting for the open encounter to close.
    Releasing {
        target: usize,
        direction: SlideDirection,
        ticket: Ticket,
    },
    /// Exit slide started; the new chapter mounts when `ticket` settles.
    Leading {
        target: usize,
        direction: SlideDirection,
        ticket: Ticket,
    },
    Entering {
        ticket: Ticket,
    },
}

pub struct NavigationSequencer {
    policy: NavigationPolicy,
    chapter_count: usize,
    current_index: usize,
    phase: NavPhase,
    generation: Generation,
    next_generation: u64,
    retiring: Vec<(Ticket, Generation)>,
}

impl NavigationSequencer {
    pub fn new(chapter_count: usize, policy: NavigationPolicy) -> Self {
        Self {
            policy,
            chapter_count,
            current_index: 0,
            phase: NavPhase::Idle,
            generation: Generation(0),
            next_generation: 1,
            retiring: Vec::new(),
        }
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn chapter_count(&self) -> usize {
        self.chapter_count
    }

    pub fn is_transitioning(&self) -> bool {
        self.phase != NavPhase::Idle
    }

    /// Chapter an in-flight transition is heading to, until it commits.
    pub fn pending_target(&self) -> Option<usize> {
        match self.phase {
            NavPhase::Releasing { target, .. } | NavPhase::Leading { target, .. } => Some(target),
            NavPhase::Idle | NavPhase::Entering { .. } => None,
        }
    }

    pub fn phase_label(&self) -> &'static str {
        match self.phase {
            NavPhase::Idle => "idle",
            NavPhase::Releasing { .. } => "releasing",
            NavPhase::Leading { .. } => "leading",
            NavPhase::Entering { .. } => "entering",
        }
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn indicator(&self) -> NavIndicator {
        NavIndicator {
            label: chapter_label(self.current_index),
            prev_enabled: self.current_index > 0,
            next_enabled: self.current_index + 1 < self.chapter_count,
        }
    }

    /// Mounts the first document in place, without a slide.
    pub fn start(&mut self, document: &RenderedChapter, stage: &mut Stage<'_>) {
        stage.presentation.mount(document, self.generation, None);
        stage.presentation.scroll_to_reading_origin();
        stage.presentation.update_nav(self.indicator());
    }

    pub fn go_to_chapter(
        &mut self,
        target: usize,
        encounter: &mut EncounterController,
        document: &mut RenderedChapter,
        stage: &mut Stage<'_>,
    ) -> NavOutcome {
        let dropped = if target >= self.chapter_count {
            Some(DropReason::OutOfRange)
        } else if target == self.current_index {
            Some(DropReason::AlreadyCurrent)
        } else if self.is_transitioning() {
            Some(DropReason::InFlight)
        } else {
            None
        };
        if let Some(reason) = dropped {
            debug!("navigation to {target} dropped: {reason:?}");
            return NavOutcome::Dropped(reason);
        }

        let direction = if target > self.current_index {
            SlideDirection::Next
        } else {
            SlideDirection::Prev
        };
        match encounter.release(document, stage) {
            ReleaseOutcome::Idle => self.begin_exit(target, direction, stage),
            ReleaseOutcome::Closing(ticket) => {
                self.phase = NavPhase::Releasing {
                    target,
                    direction,
                    ticket,
                };
            }
        }
        NavOutcome::Started
    }

    /// Advances the sequence when `ticket` is one of its waits. Returns the
    /// commit when a new chapter was mounted.
    pub fn on_settled(
        &mut self,
        ticket: Ticket,
        by: SettledBy,
        text: &Text,
        encounter: &mut EncounterController,
        document: &mut RenderedChapter,
        stage: &mut Stage<'_>,
    ) -> Option<ChapterCommit> {
        if let Some(pos) = self.retiring.iter().position(|(t, _)| *t == ticket) {
            let (_, generation) = self.retiring.remove(pos);
            if by == SettledBy::Deadline {
                debug!("exit slide of {generation:?} settled by fallback");
            }
            stage.presentation.unmount(generation);
        }

        match self.phase {
            NavPhase::Releasing {
                target,
                direction,
                ticket: waiting,
            } if waiting == ticket => {
                self.begin_exit(target, direction, stage);
                None
            }
            NavPhase::Leading {
                target,
                direction,
                ticket: waiting,
            } if waiting == ticket => self.commit(target, direction, text, encounter, document, stage),
            NavPhase::Entering { ticket: waiting } if waiting == ticket => {
                if by == SettledBy::Deadline {
                    debug!("enter slide settled by fallback");
                }
                self.phase = NavPhase::Idle;
                None
            }
            _ => None,
        }
    }

    fn begin_exit(&mut self, target: usize, direction: SlideDirection, stage: &mut Stage<'_>) {
        let leaving = self.generation;
        let exit = stage.presentation.slide_exit(leaving, direction);
        let exit_ticket = stage.scheduler.arm(exit, self.policy.exit_fallback);
        self.retiring.push((exit_ticket, leaving));

        let lead = stage
            .scheduler
            .arm(TransitionSignal::never(), self.policy.exit_lead);
        self.phase = NavPhase::Leading {
            target,
            direction,
            ticket: lead,
        };
    }

    fn commit(
        &mut self,
        target: usize,
        direction: SlideDirection,
        text: &Text,
        encounter: &mut EncounterController,
        document: &mut RenderedChapter,
        stage: &mut Stage<'_>,
    ) -> Option<ChapterCommit> {
        let Some(chapter) = render(text, target) else {
            warn!("chapter {target} could not be rendered; staying on {}", self.current_index);
            self.phase = NavPhase::Idle;
            return None;
        };

        encounter.reset();
        *document = chapter;
        let from = self.current_index;
        self.current_index = target;
        self.generation = Generation(self.next_generation);
        self.next_generation += 1;
        info!("chapter {from} -> {target} committed");

        stage.presentation.mount(document, self.generation, Some(direction));
        stage.presentation.update_nav(self.indicator());
        let enter = stage.presentation.slide_enter(self.generation);
        stage.presentation.scroll_to_reading_origin();
        let ticket = stage.scheduler.arm(enter, self.policy.enter_fallback);
        self.phase = NavPhase::Entering { ticket };

        Some(ChapterCommit { from, to: target })
    }
}
