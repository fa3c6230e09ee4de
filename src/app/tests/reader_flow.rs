use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Rect;

use crate::app::App;
use crate::command::{Command, dispatch};
use crate::config::Config;
use crate::dictionary::Dictionary;
use crate::document::UnitId;
use crate::event::AppEvent;
use crate::presenter::Stage;
use crate::settle::SettledBy;
use crate::testing::RecordingScheduler;
use crate::text::Text;
use crate::ui::ChapterGeometry;

use super::terminal_surface::TestTerminalSurface;

const WIDTH: u16 = 120;
const HEIGHT: u16 = 30;

fn started_app(scheduler: &mut RecordingScheduler) -> App {
    let mut app = App::new(
        Config::default(),
        Text::bundled().expect("bundled text"),
        Box::new(Dictionary::bundled().expect("bundled dictionary")),
    )
    .expect("app builds");
    app.sync_area(Rect::new(0, 0, WIDTH, HEIGHT));
    app.reader.start(&mut Stage::new(&mut app.presenter, scheduler));
    app
}

fn key(code: KeyCode) -> Event {
    Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

fn click(app: &mut App, column: u16, row: u16) -> Option<Command> {
    let mouse = |kind| {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    };
    let pressed = app
        .handle_input_event(mouse(MouseEventKind::Down(MouseButton::Left)))
        .expect("press handled");
    assert!(pressed.command.is_none());
    app.handle_input_event(mouse(MouseEventKind::Up(MouseButton::Left)))
        .expect("release handled")
        .command
}

fn run(app: &mut App, scheduler: &mut RecordingScheduler, command: Command) {
    let mut stage = Stage::new(&mut app.presenter, scheduler);
    dispatch(&mut app.state, command, &mut app.reader, &mut stage).expect("dispatch succeeds");
}

fn cell_of(app: &App, unit: UnitId) -> (u16, u16) {
    let viewer = app.presenter.viewer();
    let geometry = ChapterGeometry::measure(app.reader.document(), viewer);
    let scroll = geometry.reading_origin(viewer.width) as i32;
    let column = i32::from(viewer.x) + geometry.column_x(unit.line) - scroll;
    let row = i32::from(viewer.y) + geometry.row(unit.position);
    (column as u16, row as u16)
}

#[test]
fn tapping_a_drawn_character_opens_it_and_pauses_chapter_keys() {
    let mut scheduler = RecordingScheduler::default();
    let mut app = started_app(&mut scheduler);
    let mut surface = TestTerminalSurface::new(WIDTH, HEIGHT).expect("surface");
    app.render_frame(&mut surface).expect("frame renders");

    let unit = UnitId::new(4, 0);
    let (column, row) = cell_of(&app, unit);
    assert_eq!(surface.buffer()[(column, row)].symbol(), "故");

    let command = click(&mut app, column, row).expect("tap resolves to a command");
    assert_eq!(command, Command::TouchUnit { unit });
    run(&mut app, &mut scheduler, command);
    assert_eq!(app.reader.encounter().active(), Some(unit));
    assert_eq!(app.state.status.message, "opened 故");

    let paused = app.handle_input_event(key(KeyCode::Left)).expect("key handled");
    assert_eq!(paused.command, None);
    assert!(paused.redraw);

    let dismiss = app
        .handle_input_event(key(KeyCode::Esc))
        .expect("key handled")
        .command
        .expect("esc maps to a command");
    run(&mut app, &mut scheduler, dismiss);
    let closing = scheduler.last_ticket();
    app.reader.on_settled(
        closing,
        SettledBy::Deadline,
        &mut Stage::new(&mut app.presenter, &mut scheduler),
    );
    assert!(!app.reader.encounter().is_encounter_active());

    let resumed = app.handle_input_event(key(KeyCode::Left)).expect("key handled");
    assert_eq!(resumed.command, Some(Command::NextChapter));
}

#[test]
fn next_chapter_commits_after_the_lead_and_retires_the_old_layer() {
    let mut scheduler = RecordingScheduler::default();
    let mut app = started_app(&mut scheduler);
    let mut surface = TestTerminalSurface::new(WIDTH, HEIGHT).expect("surface");

    run(&mut app, &mut scheduler, Command::NextChapter);
    let lead = scheduler.last_ticket();
    let exit = scheduler.armed[scheduler.armed.len() - 2].0;

    let commit = app
        .reader
        .on_settled(
            lead,
            SettledBy::Deadline,
            &mut Stage::new(&mut app.presenter, &mut scheduler),
        )
        .expect("lead commits the new chapter");
    assert_eq!((commit.from, commit.to), (0, 1));
    assert_eq!(app.presenter.layer_count(), 2);
    assert_eq!(app.presenter.nav().label, "第二章");

    app.handle_app_event(&AppEvent::ChapterCommitted {
        from: commit.from,
        to: commit.to,
    });
    assert_eq!(app.state.status.message, "道德經 第二章");

    app.reader.on_settled(
        exit,
        SettledBy::Signal,
        &mut Stage::new(&mut app.presenter, &mut scheduler),
    );
    assert_eq!(app.presenter.layer_count(), 1);

    app.render_frame(&mut surface).expect("frame renders");
    assert!(surface.row(HEIGHT - 1).contains("道德經 第二章"));
}

#[test]
fn resize_relayouts_and_requests_a_clear() {
    let mut scheduler = RecordingScheduler::default();
    let mut app = started_app(&mut scheduler);

    let outcome = app
        .handle_input_event(Event::Resize(50, 20))
        .expect("resize handled");
    assert!(outcome.redraw && outcome.clear_terminal);
    assert_eq!(app.presenter.viewer(), Rect::new(0, 0, 50, 19));
}
