use std::time::Duration;

use log::{debug, info, warn};
use ratatui::layout::Rect;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::command::{ActionId, CommandOutcome, dispatch};
use crate::error::AppResult;
use crate::event::{AppEvent, DomainEvent};
use crate::presenter::Stage;
use crate::text::chapter_label;

use super::actors::UiActor;
use super::core::App;
use super::event_bus::{BusScheduler, EventBusRuntime};
use super::terminal_session::{TerminalSession, TerminalSurface};

struct LoopRuntime {
    ui_actor: UiActor,
    session: TerminalSession,
    scheduler: BusScheduler,
    redraw_tick: time::Interval,
    loop_event_tx: UnboundedSender<DomainEvent>,
    loop_event_rx: UnboundedReceiver<DomainEvent>,
    loop_event_runtime: EventBusRuntime,
}

enum WaitEvent {
    Event(DomainEvent),
    Closed,
}

enum LoopControl {
    Continue,
    Break,
}

impl App {
    fn terminate_process_now(runtime: &mut LoopRuntime) -> ! {
        runtime.loop_event_runtime.shutdown();
        let _ = runtime.session.restore();
        std::process::exit(0);
    }

    pub async fn run(&mut self) -> AppResult<()> {
        let mut runtime = self.initialize_loop_runtime()?;

        loop {
            if runtime.ui_actor.needs_redraw() {
                self.render_frame(&mut runtime.session)?;
                runtime.ui_actor.clear_redraw();
            }

            let waited =
                wait_next_event(&mut runtime.loop_event_rx, &mut runtime.redraw_tick).await;
            if matches!(
                self.handle_waited_event(waited, &mut runtime)?,
                LoopControl::Break
            ) {
                break;
            }
        }

        runtime.loop_event_runtime.shutdown();
        runtime.session.restore()?;
        Ok(())
    }

    fn initialize_loop_runtime(&mut self) -> AppResult<LoopRuntime> {
        let session = TerminalSession::enter()?;
        let size = session.size()?;
        self.sync_area(Rect::new(0, 0, size.width, size.height));

        let (loop_event_tx, loop_event_rx, loop_event_runtime) = EventBusRuntime::spawn();
        let mut scheduler = BusScheduler::new(loop_event_tx.clone());
        self.reader.start(&mut Stage::new(&mut self.presenter, &mut scheduler));
        info!(
            "reader started on {} of {}",
            chapter_label(self.reader.current_index()),
            self.reader.chapter_count()
        );

        let redraw_interval = Duration::from_millis(self.config.timing.redraw_interval_ms);
        let mut redraw_tick = time::interval(redraw_interval);
        redraw_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

        Ok(LoopRuntime {
            ui_actor: UiActor::new(),
            session,
            scheduler,
            redraw_tick,
            loop_event_tx,
            loop_event_rx,
            loop_event_runtime,
        })
    }

    fn handle_waited_event(
        &mut self,
        waited: WaitEvent,
        runtime: &mut LoopRuntime,
    ) -> AppResult<LoopControl> {
        match waited {
            WaitEvent::Event(DomainEvent::Input(event)) => {
                let input_outcome = self.handle_input_event(event)?;
                if input_outcome.quit_requested {
                    Self::terminate_process_now(runtime);
                }
                if input_outcome.clear_terminal {
                    runtime.session.clear()?;
                }
                if input_outcome.redraw {
                    runtime.ui_actor.mark_redraw();
                }
                if let Some(command) = input_outcome.command {
                    let _ = runtime.loop_event_tx.send(DomainEvent::Command(command));
                }
            }
            WaitEvent::Event(DomainEvent::InputError(message)) => {
                warn!("input stream error: {message}");
                self.state.status.last_action_id = Some(ActionId::Input);
                self.state.status.message = format!("input error: {message}");
                runtime.ui_actor.mark_redraw();
            }
            WaitEvent::Event(DomainEvent::Command(command)) => {
                let action_id = command.action_id();
                let mut stage = Stage::new(&mut self.presenter, &mut runtime.scheduler);
                match dispatch(&mut self.state, command, &mut self.reader, &mut stage) {
                    Ok(result) => {
                        for event in result.emitted_events {
                            let _ = runtime.loop_event_tx.send(DomainEvent::App(event));
                        }
                        if result.outcome == CommandOutcome::QuitRequested {
                            Self::terminate_process_now(runtime);
                        }
                    }
                    Err(err) => {
                        warn!("{} failed: {err}", action_id.as_str());
                        self.state.status.last_action_id = Some(action_id);
                        self.state.status.message = err.to_string();
                    }
                }
                runtime.ui_actor.mark_redraw();
            }
            WaitEvent::Event(DomainEvent::App(event)) => {
                self.handle_app_event(&event);
                runtime.ui_actor.mark_redraw();
            }
            WaitEvent::Event(DomainEvent::Settled { ticket, by }) => {
                let mut stage = Stage::new(&mut self.presenter, &mut runtime.scheduler);
                if let Some(commit) = self.reader.on_settled(ticket, by, &mut stage) {
                    let _ = runtime
                        .loop_event_tx
                        .send(DomainEvent::App(AppEvent::ChapterCommitted {
                            from: commit.from,
                            to: commit.to,
                        }));
                }
                runtime.ui_actor.mark_redraw();
            }
            WaitEvent::Event(DomainEvent::RedrawTick) => {
                if self.presenter.tick(Instant::now()) {
                    runtime.ui_actor.mark_redraw();
                }
            }
            WaitEvent::Closed => return Ok(LoopControl::Break),
        }
        Ok(LoopControl::Continue)
    }

    pub(crate) fn handle_app_event(&mut self, event: &AppEvent) {
        match event {
            AppEvent::CommandExecuted { id, outcome } => {
                debug!("command {} -> {outcome:?}", id.as_str());
            }
            AppEvent::ChapterCommitted { from, to } => {
                info!("chapter {} -> {}", chapter_label(*from), chapter_label(*to));
                self.state.status.last_action_id = Some(ActionId::Settle);
                self.state.status.message = self.reader.document().label.clone();
            }
        }
    }
}

async fn wait_next_event(
    loop_event_rx: &mut UnboundedReceiver<DomainEvent>,
    redraw_tick: &mut time::Interval,
) -> WaitEvent {
    tokio::select! {
        biased;
        maybe_loop = loop_event_rx.recv() => {
            match maybe_loop {
                Some(event) => WaitEvent::Event(event),
                None => WaitEvent::Closed,
            }
        },
        _ = redraw_tick.tick() => {
            WaitEvent::Event(DomainEvent::RedrawTick)
        },
    }
}
