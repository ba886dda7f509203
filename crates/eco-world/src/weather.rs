//! Random rainfall over square patches of the board.

use crate::world::World;
use eco_core::{RainEvent, Result, WeatherConfig};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{event, info, instrument, warn, Level};

pub struct Weather {
    config: WeatherConfig,
    rng: ChaCha8Rng,
}

impl Weather {
    pub fn new(config: WeatherConfig, rng: ChaCha8Rng) -> Self {
        Self { config, rng }
    }

    /// Rain once: a random amount on every cell of a random square, then
    /// record it as the last rain.
    pub fn rain(&mut self, world: &World) -> Result<RainEvent> {
        let board = world.board_size() as i32;
        let area = self.rng.gen_range(1..=self.config.rain_area.clamp(1, board.max(1)));
        let x = self.rng.gen_range(0..=board - area);
        let y = self.rng.gen_range(0..=board - area);
        let amount = self.rng.gen_range(1..=self.config.rain_max_value.max(1));

        let mut drowned = 0;
        for cx in x..x + area {
            for cy in y..y + area {
                drowned += world.rain_on_cell(cx, cy, amount)?;
            }
        }

        let rain = RainEvent::new(x, y, area, amount);
        world.set_last_rain(rain);

        event!(
            Level::DEBUG,
            event = "rain",
            x,
            y,
            area,
            amount,
            drowned,
            "Rain fell"
        );
        Ok(rain)
    }

    /// Wait before the next rain
    pub fn next_interval(&mut self) -> Duration {
        let min = self.config.rain_min_interval_ms;
        let max = self.config.rain_max_interval_ms.max(min);
        Duration::from_millis(self.rng.gen_range(min..=max))
    }

    #[instrument(skip_all)]
    pub async fn run(mut self, world: Arc<World>, token: CancellationToken) {
        info!("Weather started");
        loop {
            let wait = self.next_interval();
            tokio::select! {
                biased;
                _ = token.cancelled() => break,
                _ = tokio::time::sleep(wait) => {}
            }
            if let Err(err) = self.rain(&world) {
                warn!(error = %err, "Rain failed");
            }
        }
        info!("Weather stopped");
    }
}
