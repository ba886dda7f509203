//! Periodic introduction of new creatures into random cells.

use crate::creature::Creature;
use crate::species::Species;
use crate::world::World;
use eco_core::{Kind, Position, Result, SpawnerConfig};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{event, info, instrument, warn, Level};

/// Outcome of one spawn cycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpawnReport {
    pub plants: usize,
    pub herbivores: usize,
    pub predators: usize,
    /// Attempts that found their target cell full
    pub skipped: usize,
}

impl SpawnReport {
    fn record(&mut self, kind: Kind) {
        match kind {
            Kind::Plant => self.plants += 1,
            Kind::Herbivore => self.herbivores += 1,
            Kind::Predator => self.predators += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.plants + self.herbivores + self.predators
    }
}

pub struct Spawner {
    config: SpawnerConfig,
    rng: ChaCha8Rng,
}

impl Spawner {
    pub fn new(config: SpawnerConfig, rng: ChaCha8Rng) -> Self {
        Self { config, rng }
    }

    /// Try to add each kind's quota. Stops a kind early when its global cap is
    /// reached; a full target cell is skipped, not retried.
    pub fn spawn_cycle(&mut self, world: &Arc<World>) -> Result<SpawnReport> {
        let mut report = SpawnReport::default();
        let size = world.board_size() as i32;

        for kind in Kind::ALL {
            for _ in 0..self.config.quota(kind) {
                if !world.has_capacity(kind) {
                    break;
                }
                let species = Species::random_of(kind, &mut self.rng);
                let pos = Position::new(self.rng.gen_range(0..size), self.rng.gen_range(0..size));
                let creature = Creature::new(species, world.config().biology(kind));

                if world.spawn(&creature, pos)? {
                    report.record(kind);
                } else {
                    report.skipped += 1;
                }
            }
        }

        event!(
            Level::DEBUG,
            counter_name = "creatures_spawned",
            counter_value = report.total(),
            plants = report.plants,
            herbivores = report.herbivores,
            predators = report.predators,
            skipped = report.skipped,
            "Spawn cycle"
        );
        Ok(report)
    }

    #[instrument(skip_all)]
    pub async fn run(mut self, world: Arc<World>, token: CancellationToken) {
        let period = Duration::from_millis(self.config.creation_period_ms.max(1));
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(period_ms = period.as_millis() as u64, "Spawner started");

        loop {
            tokio::select! {
                biased;
                _ = token.cancelled() => break,
                _ = ticker.tick() => {}
            }
            if let Err(err) = self.spawn_cycle(&world) {
                warn!(error = %err, "Spawn cycle failed");
            }
        }
        info!("Spawner stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::Scheduler;
    use eco_core::SimulationConfig;
    use rand::SeedableRng;

    #[test]
    fn test_cycle_respects_quota() {
        let world = World::with_scheduler(SimulationConfig::default(), Scheduler::Manual);
        let mut spawner = Spawner::new(SpawnerConfig::default(), ChaCha8Rng::seed_from_u64(5));

        let report = spawner.spawn_cycle(&world).unwrap();
        assert!(report.plants <= 3);
        assert!(report.herbivores <= 1);
        assert!(report.predators <= 1);
        assert_eq!(report.total() + report.skipped, 5);
        assert_eq!(world.plant_count(), report.plants);
        assert_eq!(world.animal_count(), report.herbivores + report.predators);
    }

    #[test]
    fn test_cycle_stops_at_global_cap() {
        let mut config = SimulationConfig::default();
        config.world.max_plants = 4;
        config.world.max_animals = 0;
        let world = World::with_scheduler(config, Scheduler::Manual);
        let mut spawner = Spawner::new(
            SpawnerConfig {
                plants_per_cycle: 10,
                ..SpawnerConfig::default()
            },
            ChaCha8Rng::seed_from_u64(11),
        );

        for _ in 0..5 {
            spawner.spawn_cycle(&world).unwrap();
        }
        assert_eq!(world.plant_count(), 4);
        assert_eq!(world.animal_count(), 0);
    }

    #[test]
    fn test_full_cells_are_skipped() {
        let mut config = SimulationConfig::default();
        config.world.board_size = 1;
        config.world.cell_plants = 1;
        let world = World::with_scheduler(config, Scheduler::Manual);
        let mut spawner = Spawner::new(SpawnerConfig::default(), ChaCha8Rng::seed_from_u64(4));

        let report = spawner.spawn_cycle(&world).unwrap();
        assert_eq!(report.plants, 1);
        assert_eq!(report.skipped, 2);
    }
}
