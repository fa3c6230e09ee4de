mod chrome;
mod detail;
mod layout;
mod scroll;

pub use chrome::{DebugStatus, NavControls, draw_chrome};
pub use detail::{DetailView, draw_detail};
pub(crate) use layout::centered_rect;
pub use layout::{UiLayout, split_layout};
pub use scroll::{COLUMN_STRIDE, ChapterGeometry, ChapterStyle, GLYPH_WIDTH, draw_chapter};
