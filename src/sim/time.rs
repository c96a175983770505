//! Time sources
//!
//! Two timer bases coexist and must never be mixed:
//! - [`WallMs`]: wall-clock milliseconds (hit-invincibility, frame deltas)
//! - [`GameMs`]: wall time since session start minus total paused time
//!   (godmode, speed boost, elapsed readout)
//!
//! Keeping them as distinct types makes comparing one against the other a
//! compile error.

use std::cell::Cell;
use std::ops::Sub;

/// Wall-clock timestamp in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct WallMs(pub f64);

/// Pause-adjusted game time in milliseconds since session start
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct GameMs(pub f64);

impl WallMs {
    #[inline]
    pub fn plus(self, ms: f64) -> Self {
        Self(self.0 + ms)
    }
}

impl GameMs {
    #[inline]
    pub fn plus(self, ms: f64) -> Self {
        Self(self.0 + ms)
    }

    /// Seconds, for the elapsed-time readout
    #[inline]
    pub fn as_secs(self) -> f64 {
        self.0 / 1000.0
    }
}

impl Sub for WallMs {
    type Output = f64;

    /// Difference in milliseconds
    fn sub(self, rhs: Self) -> f64 {
        self.0 - rhs.0
    }
}

/// Both clocks sampled at the same instant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Instant {
    pub wall: WallMs,
    pub game: GameMs,
}

/// Wall-clock source
pub trait Clock {
    fn now(&self) -> WallMs;
}

/// Real wall clock (`Date.now()` in the browser)
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[cfg(target_arch = "wasm32")]
    fn now(&self) -> WallMs {
        WallMs(js_sys::Date::now())
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn now(&self) -> WallMs {
        let since_epoch = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default();
        WallMs(since_epoch.as_secs_f64() * 1000.0)
    }
}

/// Hand-driven clock for tests and the headless driver
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<f64>,
}

impl ManualClock {
    pub fn new(start_ms: f64) -> Self {
        Self {
            now: Cell::new(start_ms),
        }
    }

    pub fn set(&self, ms: f64) {
        self.now.set(ms);
    }

    pub fn advance(&self, ms: f64) {
        self.now.set(self.now.get() + ms);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> WallMs {
        WallMs(self.now.get())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_advances() {
        let clock = ManualClock::new(1_000.0);
        assert_eq!(clock.now(), WallMs(1_000.0));
        clock.advance(16.5);
        assert_eq!(clock.now(), WallMs(1_016.5));
        clock.set(0.0);
        assert_eq!(clock.now(), WallMs(0.0));
    }

    #[test]
    fn test_wall_difference_is_milliseconds() {
        assert_eq!(WallMs(1_500.0) - WallMs(1_000.0), 500.0);
        assert_eq!(WallMs(100.0).plus(1_000.0), WallMs(1_100.0));
    }

    #[test]
    fn test_game_time_seconds() {
        assert!((GameMs(12_345.0).as_secs() - 12.345).abs() < 1e-9);
    }

    #[test]
    fn test_system_clock_is_positive() {
        assert!(SystemClock.now().0 > 0.0);
    }
}
