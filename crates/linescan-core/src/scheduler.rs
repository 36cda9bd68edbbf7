use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::consts::DEFAULT_TICK_PERIOD_MS;
use crate::range::PixelRange;
use crate::session::{AnalysisSession, AnalysisSettings, SessionCommand};

/// Receives every snapshot the scheduler publishes. All methods default to no-ops.
pub trait AnalysisSubscriber: Send {
    /// A recompute finished.
    fn on_recompute(&self, _settings: &Arc<AnalysisSettings>) {}

    /// Structure range used by the latest recompute.
    fn on_structure_changed(&self, _structure: PixelRange) {}
}

/// Subscriber that forwards snapshots over an mpsc channel.
pub struct ChannelSubscriber {
    tx: mpsc::Sender<Arc<AnalysisSettings>>,
}

impl ChannelSubscriber {
    pub fn new(tx: mpsc::Sender<Arc<AnalysisSettings>>) -> Self {
        Self { tx }
    }
}

impl AnalysisSubscriber for ChannelSubscriber {
    fn on_recompute(&self, settings: &Arc<AnalysisSettings>) {
        let _ = self.tx.send(Arc::clone(settings));
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Dirty,
}

/// Coalesces parameter changes into at most one recompute per tick.
///
/// Mutations only raise the dirty flag. `tick` runs the analysis when the
/// flag is raised, or when the session changed through its own setters since
/// the last tick, so a burst of changes between two ticks costs one
/// recompute that sees the latest values.
pub struct RecomputeScheduler {
    state: SchedulerState,
    period: Duration,
    subscribers: Vec<Box<dyn AnalysisSubscriber>>,
    recompute_count: usize,
    latest: Option<Arc<AnalysisSettings>>,
    /// Session revision seen by the last tick.
    seen_revision: u64,
}

impl Default for RecomputeScheduler {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_TICK_PERIOD_MS))
    }
}

impl RecomputeScheduler {
    pub fn new(period: Duration) -> Self {
        Self {
            state: SchedulerState::Idle,
            period,
            subscribers: Vec::new(),
            recompute_count: 0,
            latest: None,
            seen_revision: 0,
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Recomputes that produced a snapshot.
    pub fn recompute_count(&self) -> usize {
        self.recompute_count
    }

    /// Most recently published snapshot.
    pub fn latest(&self) -> Option<&Arc<AnalysisSettings>> {
        self.latest.as_ref()
    }

    pub fn subscribe(&mut self, subscriber: Box<dyn AnalysisSubscriber>) {
        self.subscribers.push(subscriber);
    }

    pub fn mark_dirty(&mut self) {
        self.state = SchedulerState::Dirty;
    }

    /// Apply a parameter change and schedule a recompute.
    ///
    /// The scheduler is marked dirty even when the command fails, so whatever
    /// state the session ended up in gets re-analyzed.
    pub fn apply(
        &mut self,
        session: &mut AnalysisSession,
        command: SessionCommand,
    ) -> crate::error::Result<()> {
        let outcome = session.apply(command);
        self.mark_dirty();
        outcome
    }

    /// Recompute if dirty. Returns the published snapshot, if any.
    pub fn tick(&mut self, session: &AnalysisSession) -> Option<Arc<AnalysisSettings>> {
        if session.revision() != self.seen_revision {
            self.state = SchedulerState::Dirty;
        }
        if self.state == SchedulerState::Idle {
            return None;
        }
        self.seen_revision = session.revision();

        let settings = session.recompute().map(Arc::new);
        self.state = SchedulerState::Idle;

        let settings = settings?;
        self.recompute_count += 1;
        debug!(
            recompute = self.recompute_count,
            structure_min = settings.structure.min(),
            structure_max = settings.structure.max(),
            "published analysis"
        );

        for subscriber in &self.subscribers {
            subscriber.on_recompute(&settings);
            subscriber.on_structure_changed(settings.structure);
        }
        self.latest = Some(Arc::clone(&settings));
        Some(settings)
    }
}

/// Message accepted by [`run_event_loop`].
#[derive(Debug)]
pub enum LoopCommand {
    Apply(SessionCommand),
    Shutdown,
}

/// Drive a session from a command channel on the current thread.
///
/// Commands are applied as they arrive; the scheduler ticks every period.
/// Returns after `Shutdown` or when every sender is dropped, flushing one
/// last tick so no change goes unpublished.
pub fn run_event_loop(
    session: &mut AnalysisSession,
    scheduler: &mut RecomputeScheduler,
    commands: &Receiver<LoopCommand>,
) {
    let period = scheduler.period();
    let mut next_tick = Instant::now() + period;

    loop {
        let now = Instant::now();
        if now >= next_tick {
            scheduler.tick(session);
            next_tick += period;
            if next_tick <= now {
                next_tick = now + period;
            }
        }

        match commands.recv_timeout(next_tick.saturating_duration_since(now)) {
            Ok(LoopCommand::Apply(command)) => {
                if let Err(e) = scheduler.apply(session, command) {
                    warn!("command failed: {e}");
                }
            }
            Ok(LoopCommand::Shutdown) | Err(RecvTimeoutError::Disconnected) => break,
            Err(RecvTimeoutError::Timeout) => {}
        }
    }

    scheduler.tick(session);
}
