mod handler;
pub mod keymap;
pub mod pointer;

pub use keymap::KeymapPreset;
pub use pointer::{Gesture, GestureContext, GestureThresholds, HitTarget, PointerTracker};
