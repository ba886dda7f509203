//! Creatures and their four behaviors.
//!
//! A creature's characteristics sit behind a per-creature mutex that every
//! behavior and the kill path take first. Cell locks are only ever taken
//! while holding at most that one creature lock, and a creature only locks
//! another creature it eats, so lock chains follow the food chain downward.

use crate::species::{Characteristic, Characteristics, Species};
use crate::world::World;
use eco_core::{BiologyConfig, CreatureId, Kind, Position, Stage};
use parking_lot::{Mutex, MutexGuard, RwLock};
use rand::seq::SliceRandom;
use rand::Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, event, trace, Level};

pub struct Creature {
    id: CreatureId,
    species: Species,
    biology: BiologyConfig,
    traits: Mutex<Characteristics>,
    adult: AtomicBool,
    alive: AtomicBool,
    position: RwLock<Option<Position>>,
    cancel: CancellationToken,
}

impl Creature {
    /// A newborn with the species' base characteristics
    pub fn new(species: Species, biology: &BiologyConfig) -> Arc<Self> {
        Self::with_traits(species, biology, Characteristics::from_biology(biology))
    }

    /// A child of a parent with the given characteristics
    pub fn offspring(species: Species, biology: &BiologyConfig, parent: &Characteristics) -> Arc<Self> {
        Self::with_traits(species, biology, Characteristics::inherit(parent, biology))
    }

    fn with_traits(species: Species, biology: &BiologyConfig, traits: Characteristics) -> Arc<Self> {
        let adult = traits.get(Characteristic::Size) >= biology.adult_size;
        Arc::new(Self {
            id: CreatureId::new(),
            species,
            biology: biology.clone(),
            traits: Mutex::new(traits),
            adult: AtomicBool::new(adult),
            alive: AtomicBool::new(true),
            position: RwLock::new(None),
            cancel: CancellationToken::new(),
        })
    }

    pub fn id(&self) -> CreatureId {
        self.id
    }

    pub fn species(&self) -> Species {
        self.species
    }

    pub fn kind(&self) -> Kind {
        self.species.kind
    }

    pub fn biology(&self) -> &BiologyConfig {
        &self.biology
    }

    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    pub fn is_adult(&self) -> bool {
        self.adult.load(Ordering::SeqCst)
    }

    pub fn stage(&self) -> Stage {
        if self.is_adult() {
            Stage::Adult
        } else {
            Stage::Child
        }
    }

    /// The cell this creature was last placed in
    pub fn position(&self) -> Option<Position> {
        *self.position.read()
    }

    pub(crate) fn set_position(&self, position: Option<Position>) {
        *self.position.write() = position;
    }

    /// Resolves once the creature has been killed
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn characteristic(&self, characteristic: Characteristic) -> i32 {
        self.traits.lock().get(characteristic)
    }

    /// Copy of the current characteristic set
    pub fn characteristics(&self) -> Characteristics {
        *self.traits.lock()
    }

    pub(crate) fn lock_traits(&self) -> MutexGuard<'_, Characteristics> {
        self.traits.lock()
    }

    /// Kill the creature. Only the first call has any effect; it returns true.
    pub fn kill(&self, world: &World) -> bool {
        let _traits = self.traits.lock();
        self.die(world)
    }

    /// Attempt to be eaten by an attacker with the given attack. Succeeds and
    /// kills this creature only when the attack beats its defence; returns the
    /// margin gained by the attacker.
    pub(crate) fn be_eaten(&self, attack: i32, world: &World) -> Option<i32> {
        let traits = self.traits.lock();
        let defence = traits.get(Characteristic::Defence);
        if attack <= defence || !self.die(world) {
            return None;
        }
        Some(attack - defence)
    }

    /// Caller holds the traits lock
    fn die(&self, world: &World) -> bool {
        if !self.alive.swap(false, Ordering::SeqCst) {
            return false;
        }
        self.cancel.cancel();

        if let Some(pos) = self.position() {
            if let Some(cell) = world.grid().get(pos) {
                cell.remove_creature(self.id);
            }
        }
        world.remove_creature(self);

        debug!(
            event = "creature_killed",
            creature_id = %self.id,
            species = %self.species,
            "Creature died"
        );
        true
    }

    /// One grow tick. Returns true if the creature grew.
    pub fn grow(&self, world: &World) -> bool {
        let mut traits = self.traits.lock();
        if !self.is_alive() || traits.get(Characteristic::Energy) <= 0 {
            return false;
        }

        let increment = self.species.grow_increment(&traits, world.is_day());
        let size = traits.add(Characteristic::Size, increment);
        traits.add(Characteristic::Energy, -1);

        if size >= self.biology.adult_size && !self.adult.swap(true, Ordering::SeqCst) {
            debug!(
                event = "creature_matured",
                creature_id = %self.id,
                species = %self.species,
                size,
                "Creature became an adult"
            );
        }
        true
    }

    /// One evolve tick: adults bump one random evolvable characteristic by 1
    pub fn evolve<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Characteristic> {
        let mut traits = self.traits.lock();
        if !self.is_alive() || !self.is_adult() {
            return None;
        }

        let characteristic = *self.species.evolvable().choose(rng)?;
        let value = traits.add(characteristic, 1);
        trace!(
            creature_id = %self.id,
            characteristic = %characteristic,
            value,
            "Creature evolved"
        );
        Some(characteristic)
    }

    /// One replicate tick. On success the child is placed and scheduled, the
    /// parent's size and energy drop back to base, and the child is returned.
    pub fn replicate<R: Rng + ?Sized>(
        self: &Arc<Self>,
        world: &Arc<World>,
        rng: &mut R,
    ) -> Option<Arc<Creature>> {
        let mut traits = self.traits.lock();
        if !self.is_alive()
            || !self.is_adult()
            || traits.get(Characteristic::Energy) <= 0
            || !self.species.is_active(world.is_day())
        {
            return None;
        }

        let home = self.position()?;
        let kind = self.kind();
        let mut targets = vec![home];
        if kind.is_animal() {
            let mut neighbors = world.grid().neighbors(home);
            neighbors.shuffle(rng);
            targets.extend(neighbors);
        }

        let target = targets.into_iter().find(|pos| {
            world
                .grid()
                .get(*pos)
                .map_or(false, |cell| cell.has_space_for(kind))
        })?;

        let child = Creature::offspring(self.species, &self.biology, &*traits);
        match world.spawn(&child, target) {
            Ok(true) => {}
            Ok(false) => {
                event!(
                    Level::DEBUG,
                    counter_name = "replication_failures",
                    counter_value = 1,
                    creature_id = %self.id,
                    "Replication rejected"
                );
                return None;
            }
            Err(err) => {
                debug!(creature_id = %self.id, error = %err, "Replication target invalid");
                return None;
            }
        }

        traits.set(Characteristic::Size, self.biology.size);
        traits.set(Characteristic::Energy, self.biology.energy);

        event!(
            Level::DEBUG,
            counter_name = "births",
            counter_value = 1,
            parent_id = %self.id,
            child_id = %child.id,
            species = %self.species,
            position = %target,
            "Creature replicated"
        );
        Some(child)
    }

    /// One feed tick. Returns true if the creature fed.
    pub fn feed(&self, world: &World) -> bool {
        let mut traits = self.traits.lock();
        if !self.is_alive() {
            return false;
        }
        (self.species.behaviors().feed)(self, world, &mut *traits)
    }

    /// Move to `to`. The creature appears in the new cell before it leaves
    /// the old one, so it is never orphaned.
    pub fn try_move(self: &Arc<Self>, world: &World, to: Position) -> bool {
        let _traits = self.traits.lock();
        if !self.is_alive() || !self.kind().is_animal() {
            return false;
        }
        let Some(from) = self.position() else {
            return false;
        };
        if from == to {
            return false;
        }
        let (Some(source), Some(target)) = (world.grid().get(from), world.grid().get(to)) else {
            return false;
        };

        if !target.add(self) {
            return false;
        }
        source.remove_creature(self.id);
        trace!(creature_id = %self.id, from = %from, to = %to, "Creature moved");
        true
    }

    /// Try a few random neighbouring cells, backing off between attempts.
    /// Gives up early if the creature is killed.
    pub async fn roam<R: Rng + ?Sized>(self: &Arc<Self>, world: &World, rng: &mut R) -> bool {
        let attempts = world.config().world.move_attempts;
        let backoff = Duration::from_millis(world.config().world.move_backoff_ms);

        for attempt in 0..attempts {
            let Some(from) = self.position() else {
                return false;
            };
            if let Some(to) = world.grid().neighbors(from).choose(rng).copied() {
                if self.try_move(world, to) {
                    return true;
                }
            }
            if attempt + 1 < attempts {
                tokio::select! {
                    biased;
                    _ = self.cancel.cancelled() => return false,
                    _ = tokio::time::sleep(backoff) => {}
                }
            }
        }
        false
    }
}

/// Plants drink one unit of their cell's water in daylight
pub(crate) fn feed_plant(creature: &Creature, world: &World, traits: &mut Characteristics) -> bool {
    if !world.is_day() {
        return false;
    }
    let Some(cell) = creature.position().and_then(|pos| world.grid().get(pos)) else {
        return false;
    };
    if !cell.draw_water(1) {
        return false;
    }
    traits.add(
        Characteristic::Energy,
        traits.get(Characteristic::EnergyIncrease),
    );
    true
}

/// Animals attack the first prey in their cell
pub(crate) fn feed_animal(creature: &Creature, world: &World, traits: &mut Characteristics) -> bool {
    let Some(prey) = creature.species().prey() else {
        return false;
    };
    let Some(cell) = creature.position().and_then(|pos| world.grid().get(pos)) else {
        return false;
    };
    let Some(target) = cell.first_of(prey) else {
        return false;
    };

    let attack = traits.get(Characteristic::Attack);
    match target.be_eaten(attack, world) {
        Some(gain) => {
            traits.add(Characteristic::Energy, gain);
            event!(
                Level::DEBUG,
                counter_name = "predations",
                counter_value = 1,
                eater_id = %creature.id(),
                prey_id = %target.id(),
                gain,
                "Creature ate"
            );
            true
        }
        None => false,
    }
}

impl std::fmt::Debug for Creature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Creature")
            .field("id", &self.id)
            .field("species", &self.species)
            .field("alive", &self.is_alive())
            .field("adult", &self.is_adult())
            .field("position", &self.position())
            .finish()
    }
}
