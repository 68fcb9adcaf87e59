//! Single-threaded event loop for inbound commands and scheduled triggers.
//!
//! One worker thread owns the [`App`] and processes events strictly in arrival
//! order. The timer thread only enqueues [`Event::Trigger`]; it never touches
//! the ledger, so a report is just another event behind pending commands.

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        mpsc::{self, Receiver, Sender},
        Arc,
    },
    thread::{self, JoinHandle},
    time::Duration as StdDuration,
};

use chrono::{DateTime, Duration, Utc};
use tally_core::{Clock, Schedule, Trigger};

use crate::{
    app::{App, Reply},
    errors::AppError,
};

// Longest single sleep of the timer thread, so shutdown is noticed promptly.
const TICK: StdDuration = StdDuration::from_millis(500);
// A fire instant older than this is treated as missed and skipped.
const MISSED_GRACE_SECONDS: i64 = 300;

pub enum Event {
    Command { text: String, reply: Sender<Reply> },
    Trigger(Trigger),
    Shutdown,
}

/// Tracks the next fire instant of every trigger.
#[derive(Debug, Clone)]
pub struct TriggerTimer {
    schedule: Schedule,
    pending: Vec<(DateTime<Utc>, Trigger)>,
}

impl TriggerTimer {
    pub fn new(schedule: Schedule, now: DateTime<Utc>) -> Self {
        let pending = schedule.upcoming(now);
        Self { schedule, pending }
    }

    /// Earliest pending fire instant.
    pub fn next_deadline(&self) -> Option<DateTime<Utc>> {
        self.pending.iter().map(|(at, _)| *at).min()
    }

    /// Triggers due at `now`, each rescheduled strictly after `now`.
    ///
    /// Instants that passed more than the grace period ago are dropped without
    /// firing; there is no catch-up.
    pub fn take_due(&mut self, now: DateTime<Utc>) -> Vec<Trigger> {
        let mut due = Vec::new();
        let grace = Duration::seconds(MISSED_GRACE_SECONDS);
        let mut next = Vec::with_capacity(self.pending.len());
        for &(at, trigger) in &self.pending {
            if at > now {
                next.push((at, trigger));
                continue;
            }
            if now - at <= grace {
                due.push(trigger);
            } else {
                tracing::warn!(%trigger, scheduled = %at, "missed scheduled report; skipping");
            }
            if let Some(following) = self.schedule.next_fire(trigger, now) {
                next.push((following, trigger));
            }
        }
        next.sort_by_key(|(at, _)| *at);
        self.pending = next;
        due
    }
}

pub struct Runtime {
    sender: Sender<Event>,
    worker: Option<JoinHandle<()>>,
    timer: Option<JoinHandle<()>>,
    stop: Arc<AtomicBool>,
}

impl Runtime {
    /// Starts the worker and the report timer.
    pub fn start(app: App) -> Result<Self, AppError> {
        Self::spawn(app, true)
    }

    /// Starts only the worker; triggers can still be enqueued by hand.
    pub fn start_without_schedule(app: App) -> Result<Self, AppError> {
        Self::spawn(app, false)
    }

    fn spawn(app: App, with_schedule: bool) -> Result<Self, AppError> {
        let (sender, receiver) = mpsc::channel();
        let stop = Arc::new(AtomicBool::new(false));

        let timer = if with_schedule {
            let clock = app.clock();
            let timer = TriggerTimer::new(app.schedule().clone(), clock.now());
            let sender = sender.clone();
            let stop = Arc::clone(&stop);
            Some(
                thread::Builder::new()
                    .name("tally-timer".into())
                    .spawn(move || run_timer(timer, clock, sender, stop))?,
            )
        } else {
            None
        };

        let worker = thread::Builder::new()
            .name("tally-worker".into())
            .spawn(move || run_worker(app, receiver))?;

        tracing::info!(scheduled = with_schedule, "runtime started");
        Ok(Self {
            sender,
            worker: Some(worker),
            timer,
            stop,
        })
    }

    /// Queues an inbound message and waits for its reply.
    pub fn submit(&self, text: impl Into<String>) -> Result<Reply, AppError> {
        let (reply, response) = mpsc::channel();
        self.sender
            .send(Event::Command {
                text: text.into(),
                reply,
            })
            .map_err(|_| AppError::RuntimeClosed)?;
        response.recv().map_err(|_| AppError::RuntimeClosed)
    }

    /// Queues a trigger as if the schedule had fired it.
    pub fn fire(&self, trigger: Trigger) -> Result<(), AppError> {
        self.sender
            .send(Event::Trigger(trigger))
            .map_err(|_| AppError::RuntimeClosed)
    }

    /// Drains queued events, then stops both threads.
    pub fn shutdown(mut self) -> Result<(), AppError> {
        self.stop_threads()
    }

    fn stop_threads(&mut self) -> Result<(), AppError> {
        self.stop.store(true, Ordering::SeqCst);
        let _ = self.sender.send(Event::Shutdown);
        let mut panicked = false;
        if let Some(timer) = self.timer.take() {
            panicked |= timer.join().is_err();
        }
        if let Some(worker) = self.worker.take() {
            panicked |= worker.join().is_err();
        }
        if panicked {
            return Err(AppError::RuntimeClosed);
        }
        tracing::info!("runtime stopped");
        Ok(())
    }
}

impl Drop for Runtime {
    fn drop(&mut self) {
        if self.worker.is_some() || self.timer.is_some() {
            let _ = self.stop_threads();
        }
    }
}

fn run_worker(app: App, receiver: Receiver<Event>) {
    for event in receiver {
        match event {
            Event::Command { text, reply } => {
                let _ = reply.send(app.handle_text(&text));
            }
            Event::Trigger(trigger) => {
                if let Err(err) = app.run_trigger(trigger) {
                    tracing::error!(%trigger, error = %err, "scheduled report failed");
                }
            }
            Event::Shutdown => break,
        }
    }
}

fn run_timer(
    mut timer: TriggerTimer,
    clock: Arc<dyn Clock>,
    sender: Sender<Event>,
    stop: Arc<AtomicBool>,
) {
    while !stop.load(Ordering::SeqCst) {
        let now = clock.now();
        for trigger in timer.take_due(now) {
            tracing::debug!(%trigger, "trigger due");
            if sender.send(Event::Trigger(trigger)).is_err() {
                return;
            }
        }
        let Some(deadline) = timer.next_deadline() else {
            tracing::warn!("no upcoming report triggers; timer exiting");
            return;
        };
        let wait = (deadline - now)
            .to_std()
            .unwrap_or(StdDuration::ZERO)
            .min(TICK);
        thread::sleep(wait);
    }
}
