//! Species descriptors and creature characteristics.
//!
//! A [`Species`] is a kind (plant, herbivore, predator) plus an activity
//! rhythm. Everything that differs between species is looked up from static
//! tables keyed by kind: which characteristics evolve, what is eaten, and the
//! behavior routines in [`Behaviors`].

use crate::creature::{feed_animal, feed_plant, Creature};
use crate::world::World;
use eco_core::{BiologyConfig, Kind, Rhythm};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A named numeric trait of a creature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Characteristic {
    Size,
    Energy,
    GrowWith,
    InactiveGrowWith,
    EnergyIncrease,
    Attack,
    Defence,
}

impl Characteristic {
    pub const COUNT: usize = 7;

    pub const ALL: [Characteristic; Self::COUNT] = [
        Characteristic::Size,
        Characteristic::Energy,
        Characteristic::GrowWith,
        Characteristic::InactiveGrowWith,
        Characteristic::EnergyIncrease,
        Characteristic::Attack,
        Characteristic::Defence,
    ];

    fn index(self) -> usize {
        self as usize
    }

    /// Property-file style name
    pub fn key(&self) -> &'static str {
        match self {
            Characteristic::Size => "SIZE",
            Characteristic::Energy => "ENERGY",
            Characteristic::GrowWith => "GROW_WITH",
            Characteristic::InactiveGrowWith => "INACTIVE_GROW_WITH",
            Characteristic::EnergyIncrease => "ENERGY_INCREASE",
            Characteristic::Attack => "ATTACK",
            Characteristic::Defence => "DEFENCE",
        }
    }
}

impl fmt::Display for Characteristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// The full characteristic set of one creature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Characteristics {
    values: [i32; Characteristic::COUNT],
}

impl Characteristics {
    /// Species defaults
    pub fn from_biology(biology: &BiologyConfig) -> Self {
        let mut traits = Self {
            values: [0; Characteristic::COUNT],
        };
        traits.set(Characteristic::Size, biology.size);
        traits.set(Characteristic::Energy, biology.energy);
        traits.set(Characteristic::GrowWith, biology.grow_with);
        traits.set(Characteristic::InactiveGrowWith, biology.inactive_grow_with);
        traits.set(Characteristic::EnergyIncrease, biology.energy_increase);
        traits.set(Characteristic::Attack, biology.attack);
        traits.set(Characteristic::Defence, biology.defence);
        traits
    }

    /// Characteristics of a newborn: the parent's evolved traits, with size
    /// and energy starting from the species base.
    pub fn inherit(parent: &Characteristics, biology: &BiologyConfig) -> Self {
        let mut traits = *parent;
        traits.set(Characteristic::Size, biology.size);
        traits.set(Characteristic::Energy, biology.energy);
        traits
    }

    pub fn get(&self, characteristic: Characteristic) -> i32 {
        self.values[characteristic.index()]
    }

    pub fn set(&mut self, characteristic: Characteristic, value: i32) {
        self.values[characteristic.index()] = value;
    }

    /// Add `delta` and return the new value
    pub fn add(&mut self, characteristic: Characteristic, delta: i32) -> i32 {
        let slot = &mut self.values[characteristic.index()];
        *slot = slot.saturating_add(delta);
        *slot
    }

    pub fn iter(&self) -> impl Iterator<Item = (Characteristic, i32)> + '_ {
        Characteristic::ALL.iter().map(move |c| (*c, self.get(*c)))
    }
}

const PLANT_EVOLVABLE: &[Characteristic] = &[
    Characteristic::GrowWith,
    Characteristic::EnergyIncrease,
    Characteristic::Defence,
];

const ANIMAL_EVOLVABLE: &[Characteristic] = &[
    Characteristic::GrowWith,
    Characteristic::InactiveGrowWith,
    Characteristic::EnergyIncrease,
    Characteristic::Defence,
    Characteristic::Attack,
];

/// Species-specific behavior routines
pub struct Behaviors {
    /// Size gained by one grow tick
    pub grow_increment: fn(&Species, &Characteristics, bool) -> i32,
    /// One feed tick; returns true if the creature fed
    pub feed: fn(&Creature, &World, &mut Characteristics) -> bool,
}

static PLANT_BEHAVIORS: Behaviors = Behaviors {
    grow_increment: plant_growth,
    feed: feed_plant,
};

static ANIMAL_BEHAVIORS: Behaviors = Behaviors {
    grow_increment: animal_growth,
    feed: feed_animal,
};

/// Plants grow at half rate at night.
fn plant_growth(_: &Species, traits: &Characteristics, is_day: bool) -> i32 {
    let grow_with = traits.get(Characteristic::GrowWith);
    if is_day {
        grow_with
    } else {
        grow_with / 2
    }
}

fn animal_growth(species: &Species, traits: &Characteristics, is_day: bool) -> i32 {
    if species.is_active(is_day) {
        traits.get(Characteristic::GrowWith)
    } else {
        traits.get(Characteristic::InactiveGrowWith)
    }
}

/// What a creature is: its kind and when it is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Species {
    pub kind: Kind,
    pub rhythm: Rhythm,
}

impl Species {
    pub fn plant() -> Self {
        Self {
            kind: Kind::Plant,
            rhythm: Rhythm::Constant,
        }
    }

    pub fn herbivore(rhythm: Rhythm) -> Self {
        Self {
            kind: Kind::Herbivore,
            rhythm,
        }
    }

    pub fn predator(rhythm: Rhythm) -> Self {
        Self {
            kind: Kind::Predator,
            rhythm,
        }
    }

    /// The species the spawner introduces: plants plus the diurnal and
    /// nocturnal variants of each animal kind.
    pub fn variants() -> [Species; 5] {
        [
            Species::plant(),
            Species::herbivore(Rhythm::Diurnal),
            Species::herbivore(Rhythm::Nocturnal),
            Species::predator(Rhythm::Diurnal),
            Species::predator(Rhythm::Nocturnal),
        ]
    }

    /// Pick a random variant of `kind`
    pub fn random_of<R: Rng + ?Sized>(kind: Kind, rng: &mut R) -> Self {
        let candidates: Vec<Species> = Self::variants()
            .into_iter()
            .filter(|species| species.kind == kind)
            .collect();
        candidates
            .choose(rng)
            .copied()
            .unwrap_or(Species {
                kind,
                rhythm: Rhythm::Constant,
            })
    }

    pub fn is_active(&self, is_day: bool) -> bool {
        self.rhythm.is_active(is_day)
    }

    /// Characteristics that drift upward as an adult ages
    pub fn evolvable(&self) -> &'static [Characteristic] {
        if self.kind.is_animal() {
            ANIMAL_EVOLVABLE
        } else {
            PLANT_EVOLVABLE
        }
    }

    /// The kind this species eats, if it hunts
    pub fn prey(&self) -> Option<Kind> {
        match self.kind {
            Kind::Plant => None,
            Kind::Herbivore => Some(Kind::Plant),
            Kind::Predator => Some(Kind::Herbivore),
        }
    }

    pub fn behaviors(&self) -> &'static Behaviors {
        if self.kind.is_animal() {
            &ANIMAL_BEHAVIORS
        } else {
            &PLANT_BEHAVIORS
        }
    }

    pub fn grow_increment(&self, traits: &Characteristics, is_day: bool) -> i32 {
        (self.behaviors().grow_increment)(self, traits, is_day)
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.kind, self.rhythm) {
            (Kind::Plant, _) => write!(f, "plant"),
            (kind, Rhythm::Constant) => write!(f, "{:?}", kind),
            (kind, rhythm) => write!(f, "{:?} {:?}", rhythm, kind),
        }
    }
}
