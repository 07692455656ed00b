//! Fixed-rate tick scheduler.
//!
//! [`FixedRateScheduler::on_fixed_tick`] advances the [`WorldClock`] and
//! invokes a [`TickCallback`] once per tick, sleeping `interval_ms` between
//! ticks. It stops when `max_ticks` ticks have run or the callback asks to
//! stop. Ticks never overlap: the next one starts only after the callback
//! has returned.

use tracing::{info, warn};

use crate::clock::{ClockError, WorldClock};

/// Errors that can occur during a scheduler run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// The world clock could not advance.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: ClockError,
    },
}

/// Whether the scheduler should keep going after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickControl {
    /// Run the next tick.
    Continue,
    /// End the run after this tick.
    Stop,
}

/// Why a scheduler run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunEndReason {
    /// The configured tick budget was used up.
    MaxTicksReached,
    /// The callback returned [`TickControl::Stop`].
    CallbackStopped,
}

/// Result of a scheduler run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunResult {
    /// The reason the run ended.
    pub end_reason: RunEndReason,
    /// Ticks executed during this run.
    pub total_ticks: u64,
    /// Clock value when the run ended.
    pub final_tick: u64,
}

/// Callback invoked once per world tick.
pub trait TickCallback: Send {
    /// Called with the tick number just reached.
    fn on_tick(&mut self, tick: u64) -> TickControl;
}

/// A tick callback that does nothing, for testing.
pub struct NoOpCallback;

impl TickCallback for NoOpCallback {
    fn on_tick(&mut self, _tick: u64) -> TickControl {
        TickControl::Continue
    }
}

/// Delivers one callback per world tick at a fixed real-time rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedRateScheduler {
    /// Milliseconds slept between ticks (0 = no pacing).
    interval_ms: u64,
    /// Ticks to run before stopping (0 = unlimited).
    max_ticks: u64,
}

impl FixedRateScheduler {
    /// Create a scheduler.
    pub const fn new(interval_ms: u64, max_ticks: u64) -> Self {
        Self {
            interval_ms,
            max_ticks,
        }
    }

    /// Milliseconds slept between ticks.
    pub const fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    /// Ticks to run before stopping (0 = unlimited).
    pub const fn max_ticks(&self) -> u64 {
        self.max_ticks
    }

    /// Drive `callback` until the tick budget is used up or it asks to stop.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::Clock`] if the clock overflows.
    pub async fn on_fixed_tick(
        &self,
        clock: &mut WorldClock,
        callback: &mut dyn TickCallback,
    ) -> Result<RunResult, RunnerError> {
        let mut total_ticks: u64 = 0;

        info!(
            start_tick = clock.tick(),
            max_ticks = self.max_ticks,
            tick_interval_ms = self.interval_ms,
            "Scheduler starting"
        );

        loop {
            if self.max_ticks > 0 && total_ticks >= self.max_ticks {
                return Ok(RunResult {
                    end_reason: RunEndReason::MaxTicksReached,
                    total_ticks,
                    final_tick: clock.tick(),
                });
            }

            let tick = clock.advance()?;
            total_ticks = total_ticks.saturating_add(1);

            if callback.on_tick(tick) == TickControl::Stop {
                return Ok(RunResult {
                    end_reason: RunEndReason::CallbackStopped,
                    total_ticks,
                    final_tick: tick,
                });
            }

            if self.interval_ms > 0 {
                tokio::time::sleep(tokio::time::Duration::from_millis(self.interval_ms)).await;
            }
        }
    }
}

/// Log the end of a scheduler run.
pub fn log_run_end(result: &RunResult) {
    if result.total_ticks == 0 {
        warn!(reason = ?result.end_reason, "Run ended with no ticks executed");
        return;
    }
    info!(
        reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        final_tick = result.final_tick,
        "Run ended"
    );
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    struct CountCallback {
        seen: Vec<u64>,
        stop_at: Option<u64>,
    }

    impl TickCallback for CountCallback {
        fn on_tick(&mut self, tick: u64) -> TickControl {
            self.seen.push(tick);
            if self.stop_at == Some(tick) {
                TickControl::Stop
            } else {
                TickControl::Continue
            }
        }
    }

    #[tokio::test]
    async fn bounded_by_max_ticks() {
        let mut clock = WorldClock::new();
        let result = FixedRateScheduler::new(0, 5)
            .on_fixed_tick(&mut clock, &mut NoOpCallback)
            .await
            .unwrap();

        assert_eq!(result.end_reason, RunEndReason::MaxTicksReached);
        assert_eq!(result.total_ticks, 5);
        assert_eq!(clock.tick(), 5);
    }

    #[tokio::test]
    async fn callback_sees_every_tick_and_can_stop() {
        let mut clock = WorldClock::from_tick(100);
        let mut cb = CountCallback {
            seen: Vec::new(),
            stop_at: Some(103),
        };

        let result = FixedRateScheduler::new(1, 0)
            .on_fixed_tick(&mut clock, &mut cb)
            .await
            .unwrap();

        assert_eq!(result.end_reason, RunEndReason::CallbackStopped);
        assert_eq!(result.total_ticks, 3);
        assert_eq!(result.final_tick, 103);
        assert_eq!(cb.seen, vec![101, 102, 103]);
    }

    #[tokio::test]
    async fn clock_overflow_is_an_error() {
        let mut clock = WorldClock::from_tick(u64::MAX);
        let result = FixedRateScheduler::new(0, 1)
            .on_fixed_tick(&mut clock, &mut NoOpCallback)
            .await;
        assert!(matches!(result, Err(RunnerError::Clock { .. })));
    }
}
