use crate::dictionary::CharacterInfo;
use crate::document::{RenderedChapter, UnitId};
use crate::settle::{Scheduler, TransitionSignal};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Generation(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideDirection {
    Next,
    Prev,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusTarget {
    Unit(UnitId),
    Detail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShudderTarget {
    Unit(UnitId),
    Detail,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailContent {
    Known(CharacterInfo),
    /// Lookup found nothing; the panel shows the glyph with a placeholder.
    Unknown { character: String },
}

impl DetailContent {
    pub fn character(&self) -> &str {
        match self {
            Self::Known(info) => &info.character,
            Self::Unknown { character } => character,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NavIndicator {
    pub label: String,
    pub prev_enabled: bool,
    pub next_enabled: bool,
}

/// Horizontal extent of a unit in logical pixels, viewport-relative.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitBounds {
    pub left_px: f32,
    pub right_px: f32,
}

/// Everything the controllers ask of the presentation layer.
///
/// Methods returning a [`TransitionSignal`] start an animation whose
/// completion fires the signal; the controllers pair it with a fallback
/// deadline and never rely on it firing.
pub trait Presentation {
    fn viewport_width_px(&self) -> f32;

    fn unit_bounds(&self, unit: UnitId) -> Option<UnitBounds>;

    fn open_detail(&mut self, unit: UnitId, content: DetailContent) -> TransitionSignal;

    fn close_detail(&mut self) -> TransitionSignal;

    fn shudder(&mut self, target: ShudderTarget);

    /// Hides (or restores) the document from assistive traversal.
    fn set_document_hidden(&mut self, hidden: bool);

    fn focus(&mut self, target: FocusTarget);

    fn focused(&self) -> Option<FocusTarget>;

    fn scroll_into_view(&mut self, unit: UnitId);

    /// Mounts `chapter`. With `entering` set it is placed off-screen on the
    /// entering side and waits for [`Presentation::slide_enter`].
    fn mount(
        &mut self,
        chapter: &RenderedChapter,
        generation: Generation,
        entering: Option<SlideDirection>,
    );

    fn slide_exit(&mut self, generation: Generation, direction: SlideDirection)
    -> TransitionSignal;

    fn slide_enter(&mut self, generation: Generation) -> TransitionSignal;

    fn unmount(&mut self, generation: Generation);

    /// Classical text reads right to left: show the rightmost column.
    fn scroll_to_reading_origin(&mut self);

    fn update_nav(&mut self, indicator: NavIndicator);
}

/// The two collaborators every controller operation needs.
pub struct Stage<'a> {
    pub presentation: &'a mut dyn Presentation,
    pub scheduler: &'a mut dyn Scheduler,
}

impl<'a> Stage<'a> {
    pub fn new(presentation: &'a mut dyn Presentation, scheduler: &'a mut dyn Scheduler) -> Self {
        Self {
            presentation,
            scheduler,
        }
    }
}
