//! World clock for the Stewpot effect cauldron.
//!
//! The clock is the single source of truth for "now". Cooldown deadlines
//! and snapshot stamps are expressed in its ticks. It only ever moves
//! forward, one tick per scheduler callback.

/// Errors that can occur during clock operations.
#[derive(Debug, thiserror::Error)]
pub enum ClockError {
    /// Tick counter would overflow.
    #[error("tick counter overflow: cannot advance beyond u64::MAX")]
    TickOverflow,
}

/// World clock tracking the current game tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorldClock {
    /// Current tick number (0 before the first tick has run).
    tick: u64,
}

impl WorldClock {
    /// Create a clock at tick 0.
    pub const fn new() -> Self {
        Self { tick: 0 }
    }

    /// Create a clock resuming at `tick` (state restoration).
    pub const fn from_tick(tick: u64) -> Self {
        Self { tick }
    }

    /// Advance the clock by one tick. Returns the new tick number.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::TickOverflow`] if the tick counter would exceed
    /// `u64::MAX`.
    pub fn advance(&mut self) -> Result<u64, ClockError> {
        self.tick = self.tick.checked_add(1).ok_or(ClockError::TickOverflow)?;
        Ok(self.tick)
    }

    /// Return the current tick number.
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Whether the current tick falls on a multiple of `interval`.
    ///
    /// Tick 0 and a zero interval never match.
    pub fn is_multiple_of(&self, interval: u64) -> bool {
        self.tick != 0 && self.tick.checked_rem(interval) == Some(0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn clock_starts_at_tick_zero() {
        let clock = WorldClock::new();
        assert_eq!(clock.tick(), 0);
    }

    #[test]
    fn clock_advances() {
        let mut clock = WorldClock::new();
        assert_eq!(clock.advance().unwrap(), 1);
        assert_eq!(clock.advance().unwrap(), 2);
        assert_eq!(clock.tick(), 2);
    }

    #[test]
    fn clock_overflow_is_an_error() {
        let mut clock = WorldClock::from_tick(u64::MAX);
        assert!(matches!(clock.advance(), Err(ClockError::TickOverflow)));
        assert_eq!(clock.tick(), u64::MAX);
    }

    #[test]
    fn multiples_skip_zero() {
        assert!(!WorldClock::new().is_multiple_of(10));
        assert!(WorldClock::from_tick(20).is_multiple_of(10));
        assert!(!WorldClock::from_tick(21).is_multiple_of(10));
        assert!(!WorldClock::from_tick(20).is_multiple_of(0));
    }
}
