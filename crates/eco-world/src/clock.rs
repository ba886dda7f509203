//! Global day/night flag and the driver that flips it.

use crate::world::World;
use eco_core::DayNightConfig;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval_at, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument};

/// Single-writer, many-reader day flag. Starts at day.
#[derive(Debug)]
pub struct Clock {
    is_day: AtomicBool,
}

impl Clock {
    pub fn new() -> Self {
        Self {
            is_day: AtomicBool::new(true),
        }
    }

    pub fn is_day(&self) -> bool {
        self.is_day.load(Ordering::SeqCst)
    }

    pub fn set_day(&self, is_day: bool) {
        self.is_day.store(is_day, Ordering::SeqCst);
    }

    /// Flip the flag; returns the new value
    pub fn toggle(&self) -> bool {
        !self.is_day.fetch_xor(true, Ordering::SeqCst)
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

pub struct DayNightCycle {
    period: Duration,
}

impl DayNightCycle {
    pub fn new(config: &DayNightConfig) -> Self {
        Self {
            period: Duration::from_millis(config.day_duration_ms.max(1)),
        }
    }

    #[instrument(skip_all, fields(period_ms = self.period.as_millis() as u64))]
    pub async fn run(self, world: Arc<World>, token: CancellationToken) {
        let mut ticker = interval_at(Instant::now() + self.period, self.period);
        loop {
            tokio::select! {
                biased;
                _ = token.cancelled() => break,
                _ = ticker.tick() => {}
            }
            let is_day = world.clock().toggle();
            info!(event = "day_night_toggled", is_day, "{}", if is_day { "Day" } else { "Night" });
        }
    }
}
