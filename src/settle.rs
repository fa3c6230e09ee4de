//! Waiting for a visual transition to settle.
//!
//! A transition settles on the first of two things: the presenter firing its
//! completion, or a fallback deadline. Controllers never await directly; they
//! arm a wait through a [`Scheduler`] and receive the resulting [`Ticket`]
//! back as an event once it resolves.

use std::time::Duration;

use tokio::sync::oneshot;
use tokio::time;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ticket(u64);

impl Ticket {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettledBy {
    Signal,
    Deadline,
}

/// Presenter-side half: fired when an animation completes.
#[derive(Debug)]
pub struct Completion {
    tx: Option<oneshot::Sender<()>>,
}

impl Completion {
    pub fn fire(mut self) {
        if let Some(tx) = self.tx.take() {
            let _ = tx.send(());
        }
    }
}

/// Controller-side half handed to [`settle`]. A signal whose completion is
/// dropped unfired, or one created with [`TransitionSignal::never`], settles
/// by deadline.
#[derive(Debug)]
pub struct TransitionSignal {
    rx: Option<oneshot::Receiver<()>>,
}

impl TransitionSignal {
    pub fn pair() -> (Completion, Self) {
        let (tx, rx) = oneshot::channel();
        (Completion { tx: Some(tx) }, Self { rx: Some(rx) })
    }

    pub fn never() -> Self {
        Self { rx: None }
    }

    pub fn fired() -> Self {
        let (completion, signal) = Self::pair();
        completion.fire();
        signal
    }
}

/// Resolves on the first of {completion signal, `deadline`}.
pub async fn settle(signal: TransitionSignal, deadline: Duration) -> SettledBy {
    let sleep = time::sleep(deadline);
    tokio::pin!(sleep);

    if let Some(rx) = signal.rx {
        tokio::select! {
            biased;
            fired = rx => {
                if fired.is_ok() {
                    return SettledBy::Signal;
                }
            }
            _ = &mut sleep => return SettledBy::Deadline,
        }
    }

    sleep.await;
    SettledBy::Deadline
}

pub trait Scheduler {
    /// Arms a settle wait; the returned ticket is reported back exactly once.
    fn arm(&mut self, signal: TransitionSignal, deadline: Duration) -> Ticket;
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::time::{self, Instant};

    use super::{SettledBy, TransitionSignal, settle};

    #[tokio::test(start_paused = true)]
    async fn settle_resolves_on_signal_before_deadline() {
        let (completion, signal) = TransitionSignal::pair();
        let started = Instant::now();
        let waiter = tokio::spawn(settle(signal, Duration::from_millis(600)));

        time::sleep(Duration::from_millis(100)).await;
        completion.fire();

        let by = waiter.await.expect("settle task should finish");
        assert_eq!(by, SettledBy::Signal);
        assert!(started.elapsed() < Duration::from_millis(600));
    }

    #[tokio::test(start_paused = true)]
    async fn settle_falls_back_to_deadline_when_signal_never_fires() {
        let (_completion, signal) = TransitionSignal::pair();
        let started = Instant::now();

        let by = settle(signal, Duration::from_millis(900)).await;
        assert_eq!(by, SettledBy::Deadline);
        assert!(started.elapsed() >= Duration::from_millis(900));
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_completion_still_waits_for_deadline() {
        let (completion, signal) = TransitionSignal::pair();
        drop(completion);
        let started = Instant::now();

        let by = settle(signal, Duration::from_millis(80)).await;
        assert_eq!(by, SettledBy::Deadline);
        assert!(started.elapsed() >= Duration::from_millis(80));
    }

    #[tokio::test(start_paused = true)]
    async fn already_fired_signal_settles_immediately() {
        let by = settle(TransitionSignal::fired(), Duration::from_secs(5)).await;
        assert_eq!(by, SettledBy::Signal);

        let by = settle(TransitionSignal::never(), Duration::from_millis(10)).await;
        assert_eq!(by, SettledBy::Deadline);
    }
}
