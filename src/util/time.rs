//! Time utilities for game simulation

use std::time::{Duration, Instant};

/// Server start time for uptime tracking
static SERVER_START: std::sync::OnceLock<Instant> = std::sync::OnceLock::new();

/// Initialize server start time (call once at startup)
pub fn init_server_time() {
    SERVER_START.get_or_init(Instant::now);
}

/// Get server uptime in seconds
pub fn uptime_secs() -> u64 {
    SERVER_START
        .get()
        .map(|start| start.elapsed().as_secs())
        .unwrap_or(0)
}

/// Target cadence of a slot's tick loop. The loop still feeds measured time.
pub const TICK_INTERVAL: Duration = Duration::from_millis(10);

/// Measures wall time between successive laps
#[derive(Debug, Clone)]
pub struct DeltaClock {
    last: Option<Instant>,
}

impl DeltaClock {
    /// Clock whose first lap measures from now
    pub fn started() -> Self {
        Self {
            last: Some(Instant::now()),
        }
    }

    /// Clock whose first lap reports zero
    pub fn unstarted() -> Self {
        Self { last: None }
    }

    /// Milliseconds since the previous lap
    pub fn lap_ms(&mut self) -> f64 {
        let now = Instant::now();
        let elapsed = self
            .last
            .map(|last| now.duration_since(last).as_secs_f64() * 1000.0)
            .unwrap_or(0.0);
        self.last = Some(now);
        elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unstarted_first_lap_is_zero() {
        let mut clock = DeltaClock::unstarted();
        assert_eq!(clock.lap_ms(), 0.0);
    }

    #[test]
    fn test_lap_measures_elapsed_time() {
        let mut clock = DeltaClock::started();
        std::thread::sleep(Duration::from_millis(15));
        let lap = clock.lap_ms();
        assert!(lap >= 15.0, "lap was {lap}");

        let second = clock.lap_ms();
        assert!(second < lap);
    }
}
