//! # Trigger Sources
//!
//! Interval and era-change sources feeding one bounded queue drained by
//! [`RoundOrchestrator::run`](crate::RoundOrchestrator::run).

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use nc_01_chain_gateway::EraEventSource;
use tokio::sync::mpsc;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::domain::{RoundPhase, Trigger};
use crate::error::{Result, RoundError};
use crate::metrics;
use crate::ports::TriggerSource;

/// Result of pushing a trigger.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PushResult {
    /// Trigger enqueued
    Queued,
    /// Queue full; trigger dropped
    Full,
    /// Consumer gone
    Closed,
}

/// Producer handle of the trigger queue.
#[derive(Clone, Debug)]
pub struct TriggerSender {
    tx: mpsc::Sender<Trigger>,
}

impl TriggerSender {
    /// Enqueue without waiting. A full queue drops the trigger.
    pub fn push(&self, trigger: Trigger) -> PushResult {
        match self.tx.try_send(trigger) {
            Ok(()) => PushResult::Queued,
            Err(mpsc::error::TrySendError::Full(dropped)) => {
                debug!(trigger = %dropped, "[nc-03] Trigger queue full, dropping");
                metrics::record_trigger_skipped("queue_full");
                PushResult::Full
            }
            Err(mpsc::error::TrySendError::Closed(_)) => PushResult::Closed,
        }
    }

    /// The consumer has gone away.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Bounded single-consumer trigger queue.
pub struct TriggerQueue;

impl TriggerQueue {
    /// Create a queue holding at most `capacity` pending triggers.
    pub fn bounded(capacity: usize) -> (TriggerSender, mpsc::Receiver<Trigger>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (TriggerSender { tx }, rx)
    }
}

// =============================================================================
// Interval
// =============================================================================

/// Fires `Tick(n)` every period.
#[derive(Clone, Debug)]
pub struct IntervalTrigger {
    period: Duration,
    immediate: bool,
}

impl IntervalTrigger {
    /// First tick after one full period.
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            immediate: false,
        }
    }

    /// Fire the first tick right away.
    pub fn immediate(mut self, immediate: bool) -> Self {
        self.immediate = immediate;
        self
    }
}

#[async_trait]
impl TriggerSource for IntervalTrigger {
    fn name(&self) -> &'static str {
        "interval"
    }

    async fn run(&self, queue: TriggerSender) -> Result<()> {
        let start = if self.immediate {
            Instant::now()
        } else {
            Instant::now() + self.period
        };
        let mut ticker = interval_at(start, self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(period_ms = self.period.as_millis() as u64, "[nc-03] Interval trigger started");

        let mut n = 0u64;
        loop {
            ticker.tick().await;
            n += 1;
            if queue.push(Trigger::Tick(n)) == PushResult::Closed {
                return Ok(());
            }
        }
    }
}

// =============================================================================
// Era change
// =============================================================================

/// Fires `EraChanged(era)` for every era notification.
pub struct EraChangeTrigger {
    events: Arc<dyn EraEventSource>,
}

impl EraChangeTrigger {
    /// Trigger over an era event source.
    pub fn new(events: Arc<dyn EraEventSource>) -> Self {
        Self { events }
    }
}

#[async_trait]
impl TriggerSource for EraChangeTrigger {
    fn name(&self) -> &'static str {
        "era-change"
    }

    /// Forwards notifications until the queue closes. A stream that ends
    /// without a disconnect error is resubscribed; a failed subscribe or a
    /// disconnect is fatal.
    async fn run(&self, queue: TriggerSender) -> Result<()> {
        loop {
            let mut stream = self
                .events
                .subscribe_era_changes()
                .await
                .map_err(|e| RoundError::from_gateway(e, RoundPhase::Gathering))?;

            info!("[nc-03] Era change trigger subscribed");

            while let Some(event) = stream.next().await {
                match event {
                    Ok(era) => {
                        debug!(era, "[nc-03] Era change observed");
                        if queue.push(Trigger::EraChanged(era)) == PushResult::Closed {
                            return Ok(());
                        }
                    }
                    Err(err) if err.is_disconnect() => {
                        return Err(RoundError::from_gateway(err, RoundPhase::Gathering));
                    }
                    Err(err) => warn!(error = %err, "[nc-03] Ignoring bad era notification"),
                }
            }

            if queue.is_closed() {
                return Ok(());
            }
            warn!("[nc-03] Era subscription ended, resubscribing");
        }
    }
}
