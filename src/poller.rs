//! Deadline Poller
//!
//! One repeating task: poll immediately, then on every wall-clock multiple of
//! the period. Each delay is recomputed from the clock so the schedule does
//! not drift. Every poll runs as its own task, so a fetch that never settles
//! cannot hold back later ticks. Stopping cancels the schedule and drops late
//! responses.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use chrono::{DateTime, Utc};
use gloo_timers::future::TimeoutFuture;
use leptos::task::spawn_local;

use crate::datetime::delay_until_next_tick;

#[derive(Clone, Debug, Default)]
pub struct DeadlinePoller {
    stopped: Arc<AtomicBool>,
}

impl DeadlinePoller {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn the tick loop on the local executor
    pub fn start<F, Fut>(&self, period: Duration, poll: F)
    where
        F: Fn() -> Fut + 'static,
        Fut: Future<Output = ()> + 'static,
    {
        let poller = self.clone();
        spawn_local(async move {
            poller
                .run(
                    period,
                    Utc::now,
                    |delay| TimeoutFuture::new(u32::try_from(delay.as_millis()).unwrap_or(u32::MAX)),
                    || spawn_local(poll()),
                )
                .await;
        });
    }

    /// Tick loop: `dispatch` once now, then after every `sleep` up to the next
    /// period boundary of `clock`, until stopped.
    ///
    /// `dispatch` must hand the poll off rather than wait for it.
    pub async fn run<C, S, SFut, D>(&self, period: Duration, clock: C, sleep: S, mut dispatch: D)
    where
        C: Fn() -> DateTime<Utc>,
        S: Fn(Duration) -> SFut,
        SFut: Future<Output = ()>,
        D: FnMut(),
    {
        dispatch();
        while !self.is_stopped() {
            let delay = delay_until_next_tick(&clock(), period);
            log::debug!("[DEADLINES] Next poll in {} ms", delay.as_millis());
            sleep(delay).await;
            if self.is_stopped() {
                break;
            }
            dispatch();
        }
        log::debug!("[DEADLINES] Poller stopped");
    }

    /// Cancel the schedule; a poll already in flight is dropped on arrival
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::Release);
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }

    /// Pass a finished poll through unless the poller was stopped meanwhile
    pub fn admit<T>(&self, outcome: T) -> Option<T> {
        if self.is_stopped() {
            log::debug!("[DEADLINES] Dropping response after stop");
            None
        } else {
            Some(outcome)
        }
    }
}
