mod motion;
mod terminal;
mod traits;

pub use terminal::{PresenterTiming, TerminalPresenter};
pub use traits::{
    DetailContent, FocusTarget, Generation, NavIndicator, Presentation, ShudderTarget,
    SlideDirection, Stage, UnitBounds,
};
