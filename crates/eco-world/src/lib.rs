//! Concurrent ecosystem engine.
//!
//! A square board of cells holds water and creatures. Each creature runs its
//! own grow, evolve, replicate and feed tasks; a spawner, a day/night cycle
//! and the weather run alongside them against the same [`World`].

pub mod cell;
pub mod clock;
pub mod creature;
pub mod ecosystem;
pub mod grid;
pub mod lifecycle;
pub mod spawner;
pub mod species;
pub mod weather;
pub mod world;

pub use cell::{Cell, RainOutcome};
pub use clock::{Clock, DayNightCycle};
pub use creature::Creature;
pub use ecosystem::Ecosystem;
pub use grid::Grid;
pub use lifecycle::{Behavior, Scheduler};
pub use spawner::{SpawnReport, Spawner};
pub use species::{Characteristic, Characteristics, Species};
pub use weather::Weather;
pub use world::{Reservation, World};
