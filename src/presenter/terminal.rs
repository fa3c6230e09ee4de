//! Terminal-cell implementation of [`Presentation`].
//!
//! Animations are eased offsets sampled at draw time. Each one that reports
//! completion parks a [`Completion`] with its due instant; [`tick`] fires
//! the due ones.
//!
//! [`tick`]: TerminalPresenter::tick

use std::time::Duration;

use ratatui::Frame;
use ratatui::layout::Rect;
use tokio::time::Instant;

use crate::config::Config;
use crate::document::{RenderedChapter, UnitId};
use crate::input::HitTarget;
use crate::settle::{Completion, TransitionSignal};
use crate::ui::{
    ChapterGeometry, ChapterStyle, DetailView, GLYPH_WIDTH, NavControls, centered_rect,
    draw_chapter, draw_detail,
};

use super::motion::Motion;
use super::traits::{
    DetailContent, FocusTarget, Generation, NavIndicator, Presentation, ShudderTarget,
    SlideDirection, UnitBounds,
};

const SHUDDER_STEP_MS: u128 = 60;
const CARD_WIDTH: u16 = 40;
const CARD_HEIGHT: u16 = 12;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PresenterTiming {
    pub open: Duration,
    pub close: Duration,
    pub shudder: Duration,
    pub slide: Duration,
}

impl PresenterTiming {
    pub fn from_config(config: &Config) -> Self {
        Self {
            open: Duration::from_millis(config.timing.open_ms),
            close: Duration::from_millis(config.timing.close_ms),
            shudder: Duration::from_millis(config.timing.shudder_ms),
            slide: Duration::from_millis(config.timing.slide_ms),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct CellMetrics {
    width_px: f32,
    narrow_threshold_px: f32,
    drawer_cells: u16,
}

#[derive(Debug)]
struct Layer {
    generation: Generation,
    snapshot: RenderedChapter,
    /// Fraction of the viewer width; negative is left.
    offset: Motion,
    /// Content-space x at the viewer's left edge, in cells.
    scroll: Motion,
}

#[derive(Debug)]
struct DetailSheet {
    content: DetailContent,
    /// 0 hidden, 1 fully shown.
    reveal: Motion,
    closing: bool,
}

#[derive(Debug)]
pub struct TerminalPresenter {
    timing: PresenterTiming,
    metrics: CellMetrics,
    frame_width: u16,
    viewer: Rect,
    layers: Vec<Layer>,
    detail: Option<DetailSheet>,
    detail_rects: Option<(Rect, Rect)>,
    shudders: Vec<(ShudderTarget, Instant)>,
    focused: Option<FocusTarget>,
    document_hidden: bool,
    nav: NavIndicator,
    nav_controls: NavControls,
    pending: Vec<(Instant, Completion)>,
}

impl TerminalPresenter {
    pub fn new(config: &Config) -> Self {
        let cell_width = config.layout.cell_width_px.max(1.0);
        Self {
            timing: PresenterTiming::from_config(config),
            metrics: CellMetrics {
                width_px: cell_width,
                narrow_threshold_px: config.layout.narrow_threshold_px,
                drawer_cells: (config.layout.drawer_width_px / cell_width).ceil() as u16,
            },
            frame_width: 0,
            viewer: Rect::default(),
            layers: Vec::new(),
            detail: None,
            detail_rects: None,
            shudders: Vec::new(),
            focused: None,
            document_hidden: false,
            nav: NavIndicator::default(),
            nav_controls: NavControls::default(),
            pending: Vec::new(),
        }
    }

    /// Records the frame width and the viewer rect the document is laid out in.
    pub fn set_area(&mut self, frame_width: u16, viewer: Rect) {
        self.frame_width = frame_width;
        self.viewer = viewer;
    }

    pub fn set_nav_controls(&mut self, controls: NavControls) {
        self.nav_controls = controls;
    }

    pub fn viewer(&self) -> Rect {
        self.viewer
    }

    pub fn nav(&self) -> &NavIndicator {
        &self.nav
    }

    pub fn is_document_hidden(&self) -> bool {
        self.document_hidden
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn detail_visible(&self) -> bool {
        self.detail.is_some()
    }

    fn is_narrow(&self) -> bool {
        self.viewport_width_px() < self.metrics.narrow_threshold_px
    }

    /// Fires due completions and drops finished effects. Returns whether a
    /// redraw is needed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let mut changed = false;

        let mut waiting = Vec::with_capacity(self.pending.len());
        for (due, completion) in self.pending.drain(..) {
            if due <= now {
                completion.fire();
                changed = true;
            } else {
                waiting.push((due, completion));
            }
        }
        self.pending = waiting;

        if self
            .detail
            .as_ref()
            .is_some_and(|sheet| sheet.closing && sheet.reveal.is_done(now))
        {
            self.detail = None;
            self.detail_rects = None;
            changed = true;
        }

        let shudder = self.timing.shudder;
        let before = self.shudders.len();
        self.shudders
            .retain(|(_, started)| now.saturating_duration_since(*started) < shudder);
        changed |= before != self.shudders.len();

        changed || self.is_animating(now)
    }

    fn is_animating(&self, now: Instant) -> bool {
        !self.pending.is_empty()
            || !self.shudders.is_empty()
            || self
                .layers
                .iter()
                .any(|layer| !layer.offset.is_done(now) || !layer.scroll.is_done(now))
            || self
                .detail
                .as_ref()
                .is_some_and(|sheet| !sheet.reveal.is_done(now))
    }

    fn park(&mut self, after: Duration) -> TransitionSignal {
        let (completion, signal) = TransitionSignal::pair();
        self.pending.push((Instant::now() + after, completion));
        signal
    }

    fn current_layer(&self) -> Option<&Layer> {
        self.layers.last()
    }

    fn jitter(&self, target: ShudderTarget, now: Instant) -> u16 {
        jitter_in(&self.shudders, target, now)
    }

    /// Cells hidden behind the drawer on the viewer's right edge.
    fn occluded_cells(&self) -> u16 {
        if self.detail.is_some() && !self.is_narrow() {
            self.metrics.drawer_cells.min(self.viewer.width)
        } else {
            0
        }
    }

    /// Sheet and card rects for a detail revealed to `reveal`.
    fn detail_rects_at(&self, reveal: f32) -> (Rect, Rect) {
        let area = self.viewer;
        if self.is_narrow() {
            let hidden = ((1.0 - reveal) * f32::from(area.height)).round() as u16;
            let sheet = Rect::new(
                area.x,
                area.y.saturating_add(hidden),
                area.width,
                area.height.saturating_sub(hidden),
            );
            let card_width = CARD_WIDTH.min(area.width.saturating_sub(2));
            let card_height = CARD_HEIGHT.min(area.height.saturating_sub(2));
            let card = centered_rect(area, card_width, card_height);
            let card = Rect::new(
                card.x,
                card.y.saturating_add(hidden),
                card.width,
                card.height,
            )
            .intersection(sheet);
            (sheet, card)
        } else {
            let width = self.metrics.drawer_cells.min(area.width);
            let hidden = ((1.0 - reveal) * f32::from(width)).round() as u16;
            let x = area.right().saturating_sub(width).saturating_add(hidden);
            let drawer = Rect::new(x, area.y, area.right().saturating_sub(x), area.height);
            (drawer, drawer)
        }
    }

    /// Resolves a cell to what is drawn there. The newest layer is tested
    /// against `live`, the same document [`Self::draw`] paints it from.
    pub fn hit_test(&self, column: u16, row: u16, live: &RenderedChapter) -> HitTarget {
        let position = ratatui::layout::Position::new(column, row);
        if self.nav_controls.prev.contains(position) {
            return HitTarget::NavPrev;
        }
        if self.nav_controls.next.contains(position) {
            return HitTarget::NavNext;
        }
        if let Some((sheet, card)) = self.detail_rects {
            if card.contains(position) {
                return HitTarget::DetailContent;
            }
            if sheet.contains(position) {
                return HitTarget::DetailBackdrop;
            }
        }
        if !self.viewer.contains(position) {
            return HitTarget::Elsewhere;
        }

        let now = Instant::now();
        let Some(layer) = self.current_layer() else {
            return HitTarget::Elsewhere;
        };
        let geometry = ChapterGeometry::measure(live, self.viewer);
        let dx = self.slide_cells(layer, now);
        let scroll = layer.scroll.value_at(now).round() as i32;
        let local_column = i32::from(column) - i32::from(self.viewer.x) - dx;
        let local_row = i32::from(row) - i32::from(self.viewer.y);
        geometry
            .unit_at(live, local_column, local_row, scroll)
            .map(HitTarget::Unit)
            .unwrap_or(HitTarget::Elsewhere)
    }

    fn slide_cells(&self, layer: &Layer, now: Instant) -> i32 {
        (layer.offset.value_at(now) * f32::from(self.viewer.width)).round() as i32
    }

    /// Draws every mounted layer and the detail sheet. The newest layer is
    /// drawn from `live`, which carries the current unit state.
    pub fn draw(&mut self, frame: &mut Frame<'_>, live: &RenderedChapter) {
        let now = Instant::now();
        let area = self.viewer;
        let focused_unit = match self.focused {
            Some(FocusTarget::Unit(unit)) => Some(unit),
            _ => None,
        };
        let shudders = self.shudders.clone();
        let shudder_step =
            |unit: UnitId| i32::from(jitter_in(&shudders, ShudderTarget::Unit(unit), now));

        let newest = self.layers.len().saturating_sub(1);
        for (idx, layer) in self.layers.iter().enumerate() {
            let chapter = if idx == newest { live } else { &layer.snapshot };
            let geometry = ChapterGeometry::measure(chapter, area);
            let scroll = layer.scroll.value_at(now).round() as i32;
            let scroll = scroll - self.slide_cells(layer, now);
            let style = ChapterStyle {
                focused: if idx == newest { focused_unit } else { None },
                dimmed: self.document_hidden,
                jitter: &shudder_step,
            };
            draw_chapter(frame.buffer_mut(), area, chapter, &geometry, scroll, &style);
        }

        let rects = match &self.detail {
            Some(sheet) => {
                let (sheet_rect, card) = self.detail_rects_at(sheet.reveal.value_at(now));
                let view = DetailView {
                    content: &sheet.content,
                    focused: self.focused == Some(FocusTarget::Detail),
                    jitter: self.jitter(ShudderTarget::Detail, now),
                };
                draw_detail(frame, sheet_rect, card, view);
                Some((sheet_rect, card))
            }
            None => None,
        };
        self.detail_rects = rects;
    }
}

/// One cell of sideways shake, alternating every step while a shudder runs.
fn jitter_in(shudders: &[(ShudderTarget, Instant)], target: ShudderTarget, now: Instant) -> u16 {
    shudders
        .iter()
        .find(|(candidate, _)| *candidate == target)
        .map(|(_, started)| {
            let step = now.saturating_duration_since(*started).as_millis() / SHUDDER_STEP_MS;
            if step % 2 == 0 { 1 } else { 0 }
        })
        .unwrap_or(0)
}

impl Presentation for TerminalPresenter {
    fn viewport_width_px(&self) -> f32 {
        f32::from(self.frame_width) * self.metrics.width_px
    }

    fn unit_bounds(&self, unit: UnitId) -> Option<UnitBounds> {
        let layer = self.current_layer()?;
        layer.snapshot.unit(unit)?;
        let geometry = ChapterGeometry::measure(&layer.snapshot, self.viewer);
        let scroll = layer.scroll.target().round() as i32;
        let column = i32::from(self.viewer.x) + geometry.column_x(unit.line) - scroll;
        let left_px = column as f32 * self.metrics.width_px;
        Some(UnitBounds {
            left_px,
            right_px: left_px + f32::from(GLYPH_WIDTH) * self.metrics.width_px,
        })
    }

    fn open_detail(&mut self, _unit: UnitId, content: DetailContent) -> TransitionSignal {
        let now = Instant::now();
        self.detail = Some(DetailSheet {
            content,
            reveal: Motion::new(0.0, 1.0, now, self.timing.open),
            closing: false,
        });
        self.park(self.timing.open)
    }

    fn close_detail(&mut self) -> TransitionSignal {
        let now = Instant::now();
        let close = self.timing.close;
        let Some(sheet) = self.detail.as_mut() else {
            return TransitionSignal::fired();
        };
        sheet.reveal = sheet.reveal.retarget(0.0, now, close);
        sheet.closing = true;
        self.park(close)
    }

    fn shudder(&mut self, target: ShudderTarget) {
        self.shudders.retain(|(candidate, _)| *candidate != target);
        self.shudders.push((target, Instant::now()));
    }

    fn set_document_hidden(&mut self, hidden: bool) {
        self.document_hidden = hidden;
    }

    fn focus(&mut self, target: FocusTarget) {
        self.focused = Some(target);
    }

    fn focused(&self) -> Option<FocusTarget> {
        self.focused
    }

    fn scroll_into_view(&mut self, unit: UnitId) {
        let now = Instant::now();
        let open = self.timing.open;
        let visible = self.viewer.width.saturating_sub(self.occluded_cells());
        let viewer = self.viewer;
        let Some(layer) = self.layers.last_mut() else {
            return;
        };
        let geometry = ChapterGeometry::measure(&layer.snapshot, viewer);
        let target = geometry.centre_on(unit.line, visible);
        layer.scroll = layer.scroll.retarget(target, now, open);
    }

    fn mount(
        &mut self,
        chapter: &RenderedChapter,
        generation: Generation,
        entering: Option<SlideDirection>,
    ) {
        let now = Instant::now();
        let start = match entering {
            None => {
                self.layers.clear();
                0.0
            }
            Some(SlideDirection::Next) => -1.0,
            Some(SlideDirection::Prev) => 1.0,
        };
        if matches!(self.focused, Some(FocusTarget::Unit(_))) {
            self.focused = None;
        }
        let origin =
            ChapterGeometry::measure(chapter, self.viewer).reading_origin(self.viewer.width);
        self.layers.push(Layer {
            generation,
            snapshot: chapter.clone(),
            offset: Motion::still(start, now),
            scroll: Motion::still(origin, now),
        });
    }

    fn slide_exit(
        &mut self,
        generation: Generation,
        direction: SlideDirection,
    ) -> TransitionSignal {
        let now = Instant::now();
        let slide = self.timing.slide;
        let target = match direction {
            SlideDirection::Next => 1.0,
            SlideDirection::Prev => -1.0,
        };
        let Some(layer) = self
            .layers
            .iter_mut()
            .find(|layer| layer.generation == generation)
        else {
            return TransitionSignal::fired();
        };
        layer.offset = layer.offset.retarget(target, now, slide);
        self.park(slide)
    }

    fn slide_enter(&mut self, generation: Generation) -> TransitionSignal {
        let now = Instant::now();
        let slide = self.timing.slide;
        let Some(layer) = self
            .layers
            .iter_mut()
            .find(|layer| layer.generation == generation)
        else {
            return TransitionSignal::fired();
        };
        layer.offset = layer.offset.retarget(0.0, now, slide);
        self.park(slide)
    }

    fn unmount(&mut self, generation: Generation) {
        self.layers.retain(|layer| layer.generation != generation);
    }

    fn scroll_to_reading_origin(&mut self) {
        let now = Instant::now();
        let viewer = self.viewer;
        if let Some(layer) = self.layers.last_mut() {
            let geometry = ChapterGeometry::measure(&layer.snapshot, viewer);
            layer.scroll = Motion::still(geometry.reading_origin(viewer.width), now);
        }
    }

    fn update_nav(&mut self, indicator: NavIndicator) {
        self.nav = indicator;
    }
}
