//! Wires a world to its background drivers and owns their shutdown.

use crate::clock::DayNightCycle;
use crate::spawner::Spawner;
use crate::weather::Weather;
use crate::world::World;
use eco_core::{Error, Kind, Result, SimulationConfig};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{event, info, warn, Level};

const MONITOR_INTERVAL: Duration = Duration::from_secs(5);

/// A running simulation: the world plus the spawner, day/night, weather and
/// population monitor tasks.
pub struct Ecosystem {
    world: Arc<World>,
    cancel: CancellationToken,
    drivers: Vec<JoinHandle<()>>,
}

impl Ecosystem {
    /// Build the world and start every driver on the current tokio runtime
    pub fn start(config: SimulationConfig) -> Result<Self> {
        let handle = Handle::try_current()
            .map_err(|_| Error::InvalidState("ecosystem requires a tokio runtime".to_string()))?;

        let world = World::new(config);
        let cancel = CancellationToken::new();
        let config = world.config().clone();

        let drivers = vec![
            handle.spawn(
                Spawner::new(config.spawner.clone(), ChaCha8Rng::from_entropy())
                    .run(Arc::clone(&world), cancel.child_token()),
            ),
            handle.spawn(
                DayNightCycle::new(&config.day_night).run(Arc::clone(&world), cancel.child_token()),
            ),
            handle.spawn(
                Weather::new(config.weather.clone(), ChaCha8Rng::from_entropy())
                    .run(Arc::clone(&world), cancel.child_token()),
            ),
            handle.spawn(monitor(Arc::clone(&world), cancel.child_token())),
        ];

        info!(
            board_size = world.board_size(),
            drivers = drivers.len(),
            "Ecosystem started"
        );
        Ok(Self {
            world,
            cancel,
            drivers,
        })
    }

    pub fn world(&self) -> &Arc<World> {
        &self.world
    }

    /// Stop the drivers, waiting at most `timeout` for them, then kill every
    /// creature. Returns how many creatures were killed.
    pub async fn shutdown(self, timeout: Duration) -> usize {
        self.cancel.cancel();

        let wait = tokio::time::sleep(timeout);
        tokio::pin!(wait);
        tokio::select! {
            _ = futures::future::join_all(self.drivers) => {
                info!("All drivers stopped");
            }
            _ = &mut wait => {
                warn!("Shutdown timeout reached");
            }
        }

        let stats = self.world.stats();
        let killed = self.world.shutdown();
        info!(
            event = "ecosystem_summary",
            final_plants = stats.plants,
            final_animals = stats.animals,
            killed,
            "Ecosystem stopped"
        );
        killed
    }
}

async fn monitor(world: Arc<World>, token: CancellationToken) {
    let mut ticker = interval(MONITOR_INTERVAL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => break,
            _ = ticker.tick() => {}
        }
        report_population(&world);
    }
}

fn report_population(world: &World) {
    let totals = world.census().totals();

    event!(
        Level::INFO,
        event = "population_metrics",
        plants = world.plant_count(),
        animals = world.animal_count(),
        is_day = world.is_day(),
        "Population"
    );
    for kind in Kind::ALL {
        let count = totals.count(kind);
        event!(
            Level::INFO,
            gauge_name = "population",
            gauge_value = count.total(),
            kind = kind.label(),
            adults = count.adult,
            children = count.child,
            "Population gauge"
        );
    }
}
