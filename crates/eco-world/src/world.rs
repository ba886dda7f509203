//! Process-wide simulation state: the grid, global population counters, the
//! live creature registry, the day/night clock and the last rain event.

use crate::cell::RainOutcome;
use crate::clock::Clock;
use crate::creature::Creature;
use crate::grid::Grid;
use crate::lifecycle::{Behavior, Scheduler};
use dashmap::DashMap;
use eco_core::{
    CensusGrid, CreatureId, Kind, Position, RainEvent, Result, SimulationConfig, WorldStats,
};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{debug, event, info, Level};

pub struct World {
    config: SimulationConfig,
    grid: Grid,
    clock: Clock,
    plants: AtomicUsize,
    animals: AtomicUsize,
    registry: DashMap<CreatureId, Arc<Creature>>,
    last_rain: Mutex<Option<RainEvent>>,
    scheduler: Scheduler,
}

impl World {
    /// Build a world whose creatures are scheduled on the current tokio
    /// runtime, if there is one.
    pub fn new(config: SimulationConfig) -> Arc<Self> {
        Self::with_scheduler(config, Scheduler::current())
    }

    pub fn with_scheduler(config: SimulationConfig, scheduler: Scheduler) -> Arc<Self> {
        let grid = Grid::new(&config.world);
        info!(
            board_size = grid.size(),
            max_plants = config.world.max_plants,
            max_animals = config.world.max_animals,
            "World created"
        );
        Arc::new(Self {
            config,
            grid,
            clock: Clock::new(),
            plants: AtomicUsize::new(0),
            animals: AtomicUsize::new(0),
            registry: DashMap::new(),
            last_rain: Mutex::new(None),
            scheduler,
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn is_day(&self) -> bool {
        self.clock.is_day()
    }

    pub fn board_size(&self) -> usize {
        self.grid.size()
    }

    /// Rain `amount` on one cell. Returns how many occupants drowned.
    pub fn rain_on_cell(&self, x: i32, y: i32, amount: i32) -> Result<usize> {
        let cell = self.grid.cell(Position::new(x, y))?;
        match cell.rain(amount) {
            RainOutcome::Absorbed(_) => Ok(0),
            RainOutcome::Flooded { level, victims } => {
                let drowned = victims.iter().filter(|v| v.kill(self)).count();
                event!(
                    Level::DEBUG,
                    counter_name = "drownings",
                    counter_value = drowned,
                    x,
                    y,
                    level,
                    "Cell flooded"
                );
                Ok(drowned)
            }
        }
    }

    pub fn cell_water_level(&self, x: i32, y: i32) -> Result<i32> {
        Ok(self.grid.cell(Position::new(x, y))?.water_level())
    }

    fn counter(&self, kind: Kind) -> &AtomicUsize {
        if kind.is_animal() {
            &self.animals
        } else {
            &self.plants
        }
    }

    fn reserve(&self, kind: Kind) -> Option<Reservation<'_>> {
        let cap = self.config.world.global_capacity(kind);
        self.counter(kind)
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |count| {
                (count < cap).then_some(count + 1)
            })
            .ok()
            .map(|_| Reservation {
                world: self,
                kind,
                committed: false,
            })
    }

    fn release(&self, kind: Kind) {
        let _ = self
            .counter(kind)
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |count| {
                count.checked_sub(1)
            });
    }

    /// Reserve a global animal slot ahead of choosing a cell. The slot is
    /// consumed by [`World::spawn_reserved`] and given back if dropped unused.
    pub fn register_animal(&self, animal: &Creature) -> Option<Reservation<'_>> {
        if !animal.kind().is_animal() {
            return None;
        }
        self.reserve(animal.kind())
    }

    pub fn register_plant(&self, plant: &Creature) -> Option<Reservation<'_>> {
        if plant.kind() != Kind::Plant {
            return None;
        }
        self.reserve(Kind::Plant)
    }

    pub fn has_capacity(&self, kind: Kind) -> bool {
        self.counter(kind).load(Ordering::SeqCst) < self.config.world.global_capacity(kind)
    }

    /// Put a creature in the cell at `pos`, counting it globally. The global
    /// slot is reserved first and given back if the cell turns out to be full,
    /// so the caps hold under any interleaving.
    pub fn place(&self, creature: &Arc<Creature>, pos: Position) -> Result<bool> {
        self.place_with(creature, pos, None)
    }

    /// Like [`World::place`], spending a slot taken earlier instead of
    /// reserving a new one
    pub fn place_reserved(
        &self,
        reservation: Reservation<'_>,
        creature: &Arc<Creature>,
        pos: Position,
    ) -> Result<bool> {
        self.grid.cell(pos)?;
        if reservation.kind.is_animal() != creature.kind().is_animal() {
            return Ok(false);
        }
        self.place_with(creature, pos, Some(reservation))
    }

    fn place_with(
        &self,
        creature: &Arc<Creature>,
        pos: Position,
        reservation: Option<Reservation<'_>>,
    ) -> Result<bool> {
        let cell = self.grid.cell(pos)?;
        let kind = creature.kind();

        let _traits = creature.lock_traits();
        if !creature.is_alive() || self.registry.contains_key(&creature.id()) {
            return Ok(false);
        }
        let Some(reservation) = reservation.or_else(|| self.reserve(kind)) else {
            event!(
                Level::TRACE,
                counter_name = "placement_rejections",
                counter_value = 1,
                reason = "global_capacity",
                kind = kind.label(),
                "Placement rejected"
            );
            return Ok(false);
        };
        if !cell.add(creature) {
            event!(
                Level::TRACE,
                counter_name = "placement_rejections",
                counter_value = 1,
                reason = "cell_capacity",
                kind = kind.label(),
                "Placement rejected"
            );
            return Ok(false);
        }

        reservation.commit();
        self.registry.insert(creature.id(), Arc::clone(creature));
        Ok(true)
    }

    /// Place a creature and start its behaviors
    pub fn spawn(self: &Arc<Self>, creature: &Arc<Creature>, pos: Position) -> Result<bool> {
        if !self.place(creature, pos)? {
            return Ok(false);
        }
        self.start(creature, pos);
        Ok(true)
    }

    pub fn spawn_reserved(
        self: &Arc<Self>,
        reservation: Reservation<'_>,
        creature: &Arc<Creature>,
        pos: Position,
    ) -> Result<bool> {
        if !self.place_reserved(reservation, creature, pos)? {
            return Ok(false);
        }
        self.start(creature, pos);
        Ok(true)
    }

    fn start(self: &Arc<Self>, creature: &Arc<Creature>, pos: Position) {
        self.start_behaviors(creature);
        debug!(
            event = "creature_placed",
            creature_id = %creature.id(),
            species = %creature.species(),
            position = %pos,
            "Creature placed"
        );
    }

    pub fn add_plant(self: &Arc<Self>, plant: &Arc<Creature>, x: i32, y: i32) -> Result<bool> {
        let pos = Position::new(x, y);
        self.grid.cell(pos)?;
        if plant.kind() != Kind::Plant {
            return Ok(false);
        }
        self.spawn(plant, pos)
    }

    pub fn add_animal(self: &Arc<Self>, animal: &Arc<Creature>, x: i32, y: i32) -> Result<bool> {
        let pos = Position::new(x, y);
        self.grid.cell(pos)?;
        if !animal.kind().is_animal() {
            return Ok(false);
        }
        self.spawn(animal, pos)
    }

    fn start_behaviors(self: &Arc<Self>, creature: &Arc<Creature>) {
        if let Scheduler::Tokio(handle) = &self.scheduler {
            for behavior in Behavior::ALL {
                handle.spawn(crate::lifecycle::run_behavior(
                    Arc::clone(self),
                    Arc::clone(creature),
                    behavior,
                ));
            }
        }
    }

    /// Forget a creature and free its global slot. Only the kill path calls
    /// this; a second call for the same creature does nothing.
    pub fn remove_creature(&self, creature: &Creature) -> bool {
        if self.registry.remove(&creature.id()).is_none() {
            return false;
        }
        self.release(creature.kind());
        true
    }

    pub fn kill(&self, creature: &Creature) -> bool {
        creature.kill(self)
    }

    pub fn creature(&self, id: CreatureId) -> Option<Arc<Creature>> {
        self.registry.get(&id).map(|entry| Arc::clone(entry.value()))
    }

    pub fn creatures(&self) -> Vec<Arc<Creature>> {
        self.registry
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect()
    }

    pub fn census(&self) -> CensusGrid {
        self.grid.census()
    }

    pub fn set_last_rain(&self, event: RainEvent) {
        *self.last_rain.lock() = Some(event);
    }

    /// The most recent rain, if it has not been read yet
    pub fn take_last_rain(&self) -> Option<RainEvent> {
        self.last_rain.lock().take()
    }

    pub fn plant_count(&self) -> usize {
        self.plants.load(Ordering::SeqCst)
    }

    pub fn animal_count(&self) -> usize {
        self.animals.load(Ordering::SeqCst)
    }

    pub fn stats(&self) -> WorldStats {
        WorldStats {
            board_size: self.board_size(),
            plants: self.plant_count(),
            animals: self.animal_count(),
            is_day: self.is_day(),
        }
    }

    /// Kill every live creature, including children born while this runs.
    /// Returns how many were killed.
    pub fn shutdown(&self) -> usize {
        let mut killed = 0;
        loop {
            let batch = self.creatures();
            if batch.is_empty() {
                break;
            }
            killed += batch.iter().filter(|creature| creature.kill(self)).count();
        }
        info!(killed, "World shut down");
        killed
    }
}

impl std::fmt::Debug for World {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("World")
            .field("board_size", &self.board_size())
            .field("plants", &self.plant_count())
            .field("animals", &self.animal_count())
            .field("is_day", &self.is_day())
            .finish()
    }
}

/// A global population slot held ahead of placement
#[must_use = "an unused reservation is released when dropped"]
pub struct Reservation<'a> {
    world: &'a World,
    kind: Kind,
    committed: bool,
}

impl Reservation<'_> {
    pub fn kind(&self) -> Kind {
        self.kind
    }

    fn commit(mut self) {
        self.committed = true;
    }
}

impl Drop for Reservation<'_> {
    fn drop(&mut self) {
        if !self.committed {
            self.world.release(self.kind);
        }
    }
}
