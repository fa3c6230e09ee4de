//! Mouse press/release pairs turned into taps and drags.

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};

use crate::command::Command;
use crate::config::Config;
use crate::document::UnitId;

/// What the presenter found under a terminal cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    Unit(UnitId),
    DetailContent,
    /// The sheet around the detail content.
    DetailBackdrop,
    NavPrev,
    NavNext,
    Elsewhere,
}

impl HitTarget {
    fn is_detail(self) -> bool {
        matches!(self, Self::DetailContent | Self::DetailBackdrop)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    Tap {
        column: u16,
        row: u16,
    },
    /// Displacement from press to release in logical pixels.
    Drag {
        column: u16,
        row: u16,
        dx_px: f32,
        dy_px: f32,
    },
}

impl Gesture {
    /// Cell the gesture started on.
    pub fn origin(self) -> (u16, u16) {
        match self {
            Self::Tap { column, row } | Self::Drag { column, row, .. } => (column, row),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureThresholds {
    pub cell_width_px: f32,
    pub cell_height_px: f32,
    pub navigate_swipe_px: f32,
    pub dismiss_swipe_px: f32,
}

impl GestureThresholds {
    pub fn from_config(config: &Config) -> Self {
        Self {
            cell_width_px: config.layout.cell_width_px,
            cell_height_px: config.layout.cell_height_px,
            navigate_swipe_px: config.gesture.navigate_swipe_px,
            dismiss_swipe_px: config.gesture.dismiss_swipe_px,
        }
    }
}

/// Encounter facts a gesture is judged against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GestureContext {
    pub encounter_active: bool,
    pub narrow: bool,
}

#[derive(Debug)]
pub struct PointerTracker {
    thresholds: GestureThresholds,
    pressed: Option<(u16, u16)>,
}

impl PointerTracker {
    pub fn new(thresholds: GestureThresholds) -> Self {
        Self {
            thresholds,
            pressed: None,
        }
    }

    pub fn thresholds(&self) -> &GestureThresholds {
        &self.thresholds
    }

    pub fn handle(&mut self, mouse: MouseEvent) -> Option<Gesture> {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.pressed = Some((mouse.column, mouse.row));
                None
            }
            MouseEventKind::Up(MouseButton::Left) => {
                let (column, row) = self.pressed.take()?;
                if (column, row) == (mouse.column, mouse.row) {
                    return Some(Gesture::Tap { column, row });
                }
                let dx_cells = f32::from(mouse.column) - f32::from(column);
                let dy_cells = f32::from(mouse.row) - f32::from(row);
                Some(Gesture::Drag {
                    column,
                    row,
                    dx_px: dx_cells * self.thresholds.cell_width_px,
                    dy_px: dy_cells * self.thresholds.cell_height_px,
                })
            }
            _ => None,
        }
    }

    /// Maps a finished gesture to a command. `origin` is the hit target under
    /// the cell where the gesture started.
    pub fn resolve(
        &self,
        gesture: Gesture,
        origin: HitTarget,
        context: GestureContext,
    ) -> Option<Command> {
        match gesture {
            Gesture::Tap { .. } => match origin {
                HitTarget::Unit(unit) => Some(Command::TouchUnit { unit }),
                HitTarget::DetailBackdrop if context.encounter_active && context.narrow => {
                    Some(Command::Dismiss)
                }
                HitTarget::NavPrev => Some(Command::PrevChapter),
                HitTarget::NavNext => Some(Command::NextChapter),
                _ => None,
            },
            Gesture::Drag { dy_px, .. } => {
                if origin.is_detail() && context.encounter_active && context.narrow {
                    return (dy_px > self.thresholds.dismiss_swipe_px).then_some(Command::Dismiss);
                }
                if context.encounter_active || dy_px.abs() <= self.thresholds.navigate_swipe_px {
                    return None;
                }
                Some(if dy_px > 0.0 {
                    Command::PrevChapter
                } else {
                    Command::NextChapter
                })
            }
        }
    }
}
