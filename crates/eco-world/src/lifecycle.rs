//! Per-creature behavior tasks.
//!
//! Every live creature runs four independent periodic tasks. Each one stops
//! at its next tick boundary once the creature's cancellation token fires.

use crate::creature::Creature;
use crate::world::World;
use eco_core::BiologyConfig;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::trace;

/// One of the four periodic creature behaviors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Behavior {
    Grow,
    Evolve,
    Replicate,
    Feed,
}

impl Behavior {
    pub const ALL: [Behavior; 4] = [
        Behavior::Grow,
        Behavior::Evolve,
        Behavior::Replicate,
        Behavior::Feed,
    ];

    pub fn period(&self, biology: &BiologyConfig) -> Duration {
        let millis = match self {
            Behavior::Grow => biology.grow_period_ms,
            Behavior::Evolve => biology.evolve_period_ms,
            Behavior::Replicate => biology.replicate_period_ms,
            Behavior::Feed => biology.feed_period_ms,
        };
        Duration::from_millis(millis.max(1))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Behavior::Grow => "grow",
            Behavior::Evolve => "evolve",
            Behavior::Replicate => "replicate",
            Behavior::Feed => "feed",
        }
    }
}

/// Where creature behaviors run
#[derive(Debug, Clone)]
pub enum Scheduler {
    /// Spawn behavior tasks on a tokio runtime
    Tokio(Handle),
    /// Never schedule; callers drive behaviors by hand
    Manual,
}

impl Scheduler {
    /// The ambient tokio runtime, or `Manual` outside one
    pub fn current() -> Self {
        Handle::try_current()
            .map(Scheduler::Tokio)
            .unwrap_or(Scheduler::Manual)
    }
}

pub(crate) async fn run_behavior(world: Arc<World>, creature: Arc<Creature>, behavior: Behavior) {
    let period = behavior.period(creature.biology());
    let token = creature.cancellation_token();
    let mut rng = ChaCha8Rng::from_entropy();

    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => break,
            _ = ticker.tick() => {}
        }
        if !creature.is_alive() {
            break;
        }

        match behavior {
            Behavior::Grow => {
                creature.grow(&world);
            }
            Behavior::Evolve => {
                creature.evolve(&mut rng);
            }
            Behavior::Replicate => {
                creature.replicate(&world, &mut rng);
            }
            Behavior::Feed => {
                if !creature.feed(&world) && creature.kind().is_animal() {
                    creature.roam(&world, &mut rng).await;
                }
            }
        }
    }

    trace!(
        creature_id = %creature.id(),
        behavior = behavior.name(),
        "Behavior stopped"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::species::Species;
    use eco_core::{Rhythm, SimulationConfig};

    #[test]
    fn test_periods_come_from_biology() {
        let biology = BiologyConfig::herbivore();
        assert_eq!(
            Behavior::Grow.period(&biology),
            Duration::from_millis(biology.grow_period_ms)
        );
        assert_eq!(
            Behavior::Feed.period(&biology),
            Duration::from_millis(biology.feed_period_ms)
        );
    }

    #[test]
    fn test_scheduler_outside_runtime_is_manual() {
        assert!(matches!(Scheduler::current(), Scheduler::Manual));
    }

    #[tokio::test]
    async fn test_scheduler_inside_runtime() {
        assert!(matches!(Scheduler::current(), Scheduler::Tokio(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_behaviors_run_until_killed() {
        let world = World::new(SimulationConfig::default());
        let plant = Creature::new(Species::plant(), &world.config().plants);
        assert!(world.add_plant(&plant, 0, 0).unwrap());

        tokio::time::sleep(Duration::from_millis(2_500)).await;
        assert!(plant.characteristic(crate::species::Characteristic::Size) > 1);

        assert!(world.kill(&plant));
        tokio::time::sleep(Duration::from_millis(10)).await;
        let frozen = plant.characteristics();
        tokio::time::sleep(Duration::from_millis(5_000)).await;
        assert_eq!(plant.characteristics(), frozen);
    }

    #[tokio::test(start_paused = true)]
    async fn test_kill_cancels_roaming() {
        let world = World::new(SimulationConfig::default());
        let herbivore = Creature::new(
            Species::herbivore(Rhythm::Diurnal),
            &world.config().herbivores,
        );
        assert!(world.add_animal(&herbivore, 5, 5).unwrap());

        tokio::time::sleep(Duration::from_millis(1_600)).await;
        assert!(world.kill(&herbivore));
        assert!(herbivore.cancellation_token().is_cancelled());
        assert_eq!(world.animal_count(), 0);
    }
}
