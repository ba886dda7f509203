//! A single board location: water plus bounded plant and animal lists.

use crate::creature::Creature;
use eco_core::{CellCensus, CreatureId, Kind, Position, WorldConfig};
use parking_lot::Mutex;
use std::sync::Arc;

/// Result of adding water to a cell
#[derive(Debug)]
pub enum RainOutcome {
    /// The water was absorbed; holds the new level
    Absorbed(i32),
    /// The cell overflowed. The level was reset to the rained amount and the
    /// former occupants were evicted; the caller must kill them.
    Flooded {
        level: i32,
        victims: Vec<Arc<Creature>>,
    },
}

impl RainOutcome {
    pub fn level(&self) -> i32 {
        match self {
            RainOutcome::Absorbed(level) => *level,
            RainOutcome::Flooded { level, .. } => *level,
        }
    }
}

struct CellState {
    water: i32,
    plants: Vec<Arc<Creature>>,
    animals: Vec<Arc<Creature>>,
}

impl CellState {
    fn occupants(&self, kind: Kind) -> &Vec<Arc<Creature>> {
        if kind.is_animal() {
            &self.animals
        } else {
            &self.plants
        }
    }

    fn occupants_mut(&mut self, kind: Kind) -> &mut Vec<Arc<Creature>> {
        if kind.is_animal() {
            &mut self.animals
        } else {
            &mut self.plants
        }
    }
}

pub struct Cell {
    position: Position,
    plant_capacity: usize,
    animal_capacity: usize,
    max_water: i32,
    state: Mutex<CellState>,
}

impl Cell {
    pub fn new(position: Position, config: &WorldConfig) -> Self {
        Self {
            position,
            plant_capacity: config.cell_plants,
            animal_capacity: config.cell_animals,
            max_water: config.max_cell_water,
            state: Mutex::new(CellState {
                water: config.cell_water,
                plants: Vec::with_capacity(config.cell_plants),
                animals: Vec::with_capacity(config.cell_animals),
            }),
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn x(&self) -> i32 {
        self.position.x
    }

    pub fn y(&self) -> i32 {
        self.position.y
    }

    fn capacity(&self, kind: Kind) -> usize {
        if kind.is_animal() {
            self.animal_capacity
        } else {
            self.plant_capacity
        }
    }

    pub fn add_plant(&self, plant: &Arc<Creature>) -> bool {
        plant.kind() == Kind::Plant && self.add(plant)
    }

    pub fn add_animal(&self, animal: &Arc<Creature>) -> bool {
        animal.kind().is_animal() && self.add(animal)
    }

    /// Insert into the collection matching the creature's kind. Fails when the
    /// collection is full, the creature is dead, or already here. On success
    /// the creature's position is set to this cell.
    pub fn add(&self, creature: &Arc<Creature>) -> bool {
        let kind = creature.kind();
        let capacity = self.capacity(kind);

        let mut state = self.state.lock();
        let occupants = state.occupants_mut(kind);
        if occupants.len() >= capacity
            || !creature.is_alive()
            || occupants.iter().any(|c| c.id() == creature.id())
        {
            return false;
        }

        occupants.push(Arc::clone(creature));
        creature.set_position(Some(self.position));
        true
    }

    pub fn has_space_for(&self, kind: Kind) -> bool {
        let state = self.state.lock();
        state.occupants(kind).len() < self.capacity(kind)
    }

    /// Remove a creature from whichever list holds it. No-op if absent.
    pub fn remove_creature(&self, id: CreatureId) -> bool {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        for list in [&mut state.plants, &mut state.animals] {
            if let Some(index) = list.iter().position(|c| c.id() == id) {
                list.remove(index);
                return true;
            }
        }
        false
    }

    pub fn contains(&self, id: CreatureId) -> bool {
        let state = self.state.lock();
        state
            .plants
            .iter()
            .chain(state.animals.iter())
            .any(|c| c.id() == id)
    }

    /// First occupant of `kind`, in arrival order
    pub fn first_of(&self, kind: Kind) -> Option<Arc<Creature>> {
        let state = self.state.lock();
        state
            .occupants(kind)
            .iter()
            .find(|c| c.kind() == kind)
            .cloned()
    }

    pub fn occupant_count(&self, kind: Kind) -> usize {
        let state = self.state.lock();
        state.occupants(kind).iter().filter(|c| c.kind() == kind).count()
    }

    /// Add `delta` units of water; negative values drain. Overflowing past the
    /// maximum evicts every occupant and resets the level to `delta`.
    pub fn rain(&self, delta: i32) -> RainOutcome {
        let mut state = self.state.lock();
        let level = state.water.saturating_add(delta);

        if delta > 0 && level > self.max_water {
            state.water = delta.max(0);
            let mut victims = std::mem::take(&mut state.plants);
            victims.append(&mut state.animals);
            return RainOutcome::Flooded {
                level: state.water,
                victims,
            };
        }

        state.water = level.max(0);
        RainOutcome::Absorbed(state.water)
    }

    /// Take `amount` units of water if the cell holds at least that much
    pub fn draw_water(&self, amount: i32) -> bool {
        let mut state = self.state.lock();
        if amount <= 0 || state.water < amount {
            return false;
        }
        state.water -= amount;
        true
    }

    pub fn water_level(&self) -> i32 {
        self.state.lock().water
    }

    pub fn census(&self) -> CellCensus {
        let mut census = CellCensus::default();
        let state = self.state.lock();
        for creature in state.plants.iter().chain(state.animals.iter()) {
            census.record(creature.kind(), creature.stage());
        }
        census
    }
}

impl std::fmt::Debug for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("Cell")
            .field("position", &self.position)
            .field("water", &state.water)
            .field("plants", &state.plants.len())
            .field("animals", &state.animals.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::species::Species;
    use eco_core::{BiologyConfig, Rhythm, Stage};
    use proptest::prelude::*;

    fn cell() -> Cell {
        Cell::new(Position::new(0, 0), &WorldConfig::default())
    }

    fn plant() -> Arc<Creature> {
        Creature::new(Species::plant(), &BiologyConfig::plant())
    }

    fn herbivore() -> Arc<Creature> {
        Creature::new(
            Species::herbivore(Rhythm::Diurnal),
            &BiologyConfig::herbivore(),
        )
    }

    #[test]
    fn test_initial_water_level() {
        let cell = cell();
        assert_eq!(cell.water_level(), 5);
        assert!(cell.census().is_empty());
    }

    #[test]
    fn test_rain_within_limit() {
        let cell = cell();
        let outcome = cell.rain(10);
        assert!(matches!(outcome, RainOutcome::Absorbed(15)));
        assert_eq!(cell.water_level(), 15);
    }

    #[test]
    fn test_rain_exceeding_limit_resets_to_delta() {
        let cell = cell();
        let outcome = cell.rain(25);
        assert_eq!(outcome.level(), 25);
        assert_eq!(cell.water_level(), 25);
    }

    #[test]
    fn test_flood_evicts_everyone() {
        let cell = cell();
        let p = plant();
        let h = herbivore();
        assert!(cell.add_plant(&p));
        assert!(cell.add_animal(&h));

        match cell.rain(30) {
            RainOutcome::Flooded { level, victims } => {
                assert_eq!(level, 30);
                assert_eq!(victims.len(), 2);
            }
            other => panic!("expected flood, got {:?}", other),
        }
        assert!(cell.census().is_empty());
    }

    #[test]
    fn test_negative_rain_clamps_at_zero() {
        let cell = cell();
        assert_eq!(cell.rain(-3).level(), 2);
        assert_eq!(cell.rain(-10).level(), 0);
        assert_eq!(cell.water_level(), 0);
    }

    #[test]
    fn test_draining_a_flooded_cell_is_not_a_flood() {
        let cell = cell();
        let h = herbivore();
        cell.rain(25);
        cell.add(&h);
        assert!(matches!(cell.rain(-1), RainOutcome::Absorbed(24)));
        assert!(cell.contains(h.id()));
    }

    #[test]
    fn test_draw_water() {
        let cell = cell();
        assert!(cell.draw_water(5));
        assert!(!cell.draw_water(1));
        assert_eq!(cell.water_level(), 0);
    }

    #[test]
    fn test_capacity_is_enforced() {
        let cell = cell();
        for _ in 0..WorldConfig::default().cell_plants {
            assert!(cell.add_plant(&plant()));
        }
        assert!(!cell.has_space_for(Kind::Plant));
        assert!(!cell.add_plant(&plant()));
        assert!(cell.has_space_for(Kind::Herbivore));
    }

    #[test]
    fn test_add_rejects_wrong_kind_and_duplicates() {
        let cell = cell();
        let p = plant();
        assert!(!cell.add_animal(&p));
        assert!(cell.add_plant(&p));
        assert!(!cell.add_plant(&p));
        assert_eq!(cell.occupant_count(Kind::Plant), 1);
    }

    #[test]
    fn test_add_sets_position() {
        let cell = Cell::new(Position::new(3, 4), &WorldConfig::default());
        let h = herbivore();
        assert_eq!(h.position(), None);
        assert!(cell.add(&h));
        assert_eq!(h.position(), Some(Position::new(3, 4)));
    }

    #[test]
    fn test_remove_is_idempotent() {
        let cell = cell();
        let h = herbivore();
        assert!(cell.add_animal(&h));
        assert!(cell.contains(h.id()));
        assert!(cell.remove_creature(h.id()));
        assert!(!cell.remove_creature(h.id()));
        assert!(!cell.contains(h.id()));
    }

    #[test]
    fn test_first_of_keeps_arrival_order() {
        let cell = cell();
        let first = plant();
        let second = plant();
        cell.add(&first);
        cell.add(&second);
        assert_eq!(cell.first_of(Kind::Plant).map(|c| c.id()), Some(first.id()));
        assert!(cell.first_of(Kind::Predator).is_none());
    }

    #[test]
    fn test_census_buckets() {
        let cell = cell();
        cell.add(&plant());
        cell.add(&herbivore());

        let census = cell.census();
        assert_eq!(census.plant.child, 1);
        assert_eq!(census.herb.child, 1);
        assert_eq!(census.pred.total(), 0);
        assert_eq!(plant().stage(), Stage::Child);
    }

    proptest! {
        #[test]
        fn prop_rain_within_capacity_adds_up(amount in 1i32..=15) {
            let cell = cell();
            let before = cell.water_level();
            prop_assume!(before + amount <= WorldConfig::default().max_cell_water);
            cell.rain(amount);
            prop_assert_eq!(cell.water_level(), before + amount);
        }

        #[test]
        fn prop_overflow_resets_to_amount(amount in 16i32..200) {
            let cell = cell();
            let h = herbivore();
            cell.add(&h);
            let outcome = cell.rain(amount);
            prop_assert_eq!(cell.water_level(), amount);
            let flooded = matches!(outcome, RainOutcome::Flooded { ref victims, .. } if victims.len() == 1);
            prop_assert!(flooded);
        }

        #[test]
        fn prop_water_never_negative(deltas in proptest::collection::vec(-20i32..20, 0..30)) {
            let cell = cell();
            for delta in deltas {
                cell.rain(delta);
                prop_assert!(cell.water_level() >= 0);
            }
        }
    }
}
