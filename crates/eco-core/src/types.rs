//! Core type definitions for the simulation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a creature instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CreatureId(pub Uuid);

impl CreatureId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CreatureId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CreatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 2D position on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn add(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    pub fn step(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.to_delta();
        self.add(dx, dy)
    }

    /// Whether the position lies on a square board of the given size
    pub fn in_bounds(&self, size: usize) -> bool {
        let size = size as i64;
        (0..size).contains(&(self.x as i64)) && (0..size).contains(&(self.y as i64))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Direction for movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

impl Direction {
    pub fn to_delta(&self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::South => (0, 1),
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
            Direction::NorthEast => (1, -1),
            Direction::NorthWest => (-1, -1),
            Direction::SouthEast => (1, 1),
            Direction::SouthWest => (-1, 1),
        }
    }

    pub fn all() -> [Direction; 8] {
        [
            Direction::North,
            Direction::South,
            Direction::East,
            Direction::West,
            Direction::NorthEast,
            Direction::NorthWest,
            Direction::SouthEast,
            Direction::SouthWest,
        ]
    }
}

/// Broad creature category. Decides which cell collection a creature lives in
/// and what it eats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Kind {
    Plant,
    Herbivore,
    Predator,
}

impl Kind {
    pub const ALL: [Kind; 3] = [Kind::Plant, Kind::Herbivore, Kind::Predator];

    pub fn is_animal(&self) -> bool {
        !matches!(self, Kind::Plant)
    }

    /// Label used by the census
    pub fn label(&self) -> &'static str {
        match self {
            Kind::Plant => "PLANT",
            Kind::Herbivore => "HERB",
            Kind::Predator => "PRED",
        }
    }
}

/// When an animal is active. Plants are always `Constant`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rhythm {
    Constant,
    Diurnal,
    Nocturnal,
}

impl Rhythm {
    pub fn is_active(&self, is_day: bool) -> bool {
        match self {
            Rhythm::Constant => true,
            Rhythm::Diurnal => is_day,
            Rhythm::Nocturnal => !is_day,
        }
    }
}

/// Life stage of a creature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    Child,
    Adult,
}

/// Child/adult counts for one creature kind in one cell
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageCount {
    pub child: u32,
    pub adult: u32,
}

impl StageCount {
    pub fn record(&mut self, stage: Stage) {
        match stage {
            Stage::Child => self.child += 1,
            Stage::Adult => self.adult += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.child + self.adult
    }
}

/// Occupant breakdown of a single cell
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellCensus {
    #[serde(rename = "PLANT")]
    pub plant: StageCount,
    #[serde(rename = "HERB")]
    pub herb: StageCount,
    #[serde(rename = "PRED")]
    pub pred: StageCount,
}

impl CellCensus {
    pub fn record(&mut self, kind: Kind, stage: Stage) {
        self.count_mut(kind).record(stage);
    }

    pub fn count(&self, kind: Kind) -> StageCount {
        match kind {
            Kind::Plant => self.plant,
            Kind::Herbivore => self.herb,
            Kind::Predator => self.pred,
        }
    }

    fn count_mut(&mut self, kind: Kind) -> &mut StageCount {
        match kind {
            Kind::Plant => &mut self.plant,
            Kind::Herbivore => &mut self.herb,
            Kind::Predator => &mut self.pred,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.plant.total() + self.herb.total() + self.pred.total() == 0
    }
}

/// Census of the whole board, indexed as `cells[x][y]`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CensusGrid {
    pub size: usize,
    pub cells: Vec<Vec<CellCensus>>,
}

impl CensusGrid {
    pub fn get(&self, pos: Position) -> Option<&CellCensus> {
        if !pos.in_bounds(self.size) {
            return None;
        }
        self.cells
            .get(pos.x as usize)
            .and_then(|column| column.get(pos.y as usize))
    }

    /// Sum over all cells
    pub fn totals(&self) -> CellCensus {
        let mut totals = CellCensus::default();
        for census in self.cells.iter().flatten() {
            for kind in Kind::ALL {
                let count = census.count(kind);
                let slot = totals.count_mut(kind);
                slot.child += count.child;
                slot.adult += count.adult;
            }
        }
        totals
    }
}

/// The most recent rainfall: top-left corner and side length of the square
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RainEvent {
    pub x: i32,
    pub y: i32,
    pub area: i32,
    pub amount: i32,
    pub recorded_at: DateTime<Utc>,
}

impl RainEvent {
    pub fn new(x: i32, y: i32, area: i32, amount: i32) -> Self {
        Self {
            x,
            y,
            area,
            amount,
            recorded_at: Utc::now(),
        }
    }

    pub fn covers(&self, pos: Position) -> bool {
        (self.x..self.x + self.area).contains(&pos.x)
            && (self.y..self.y + self.area).contains(&pos.y)
    }
}

/// Population counters of a world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldStats {
    pub board_size: usize,
    pub plants: usize,
    pub animals: usize,
    pub is_day: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_bounds() {
        assert!(Position::new(0, 0).in_bounds(10));
        assert!(Position::new(9, 9).in_bounds(10));
        assert!(!Position::new(-1, 0).in_bounds(10));
        assert!(!Position::new(0, 10).in_bounds(10));
        assert!(!Position::new(0, 0).in_bounds(0));
    }

    #[test]
    fn test_direction_delta() {
        assert_eq!(Direction::North.to_delta(), (0, -1));
        assert_eq!(Direction::South.to_delta(), (0, 1));
        assert_eq!(Direction::East.to_delta(), (1, 0));
        assert_eq!(Direction::West.to_delta(), (-1, 0));
        assert_eq!(Position::new(2, 2).step(Direction::SouthWest), Position::new(1, 3));
    }

    #[test]
    fn test_rhythm_activity() {
        assert!(Rhythm::Constant.is_active(false));
        assert!(Rhythm::Diurnal.is_active(true));
        assert!(!Rhythm::Diurnal.is_active(false));
        assert!(Rhythm::Nocturnal.is_active(false));
        assert!(!Rhythm::Nocturnal.is_active(true));
    }

    #[test]
    fn test_census_serializes_with_labels() {
        let mut census = CellCensus::default();
        census.record(Kind::Plant, Stage::Adult);
        census.record(Kind::Predator, Stage::Child);

        let json = serde_json::to_value(census).unwrap();
        assert_eq!(json["PLANT"]["adult"], 1);
        assert_eq!(json["PRED"]["child"], 1);
        assert_eq!(json["HERB"]["child"], 0);
    }

    #[test]
    fn test_census_grid_totals() {
        let mut a = CellCensus::default();
        a.record(Kind::Herbivore, Stage::Adult);
        let mut b = CellCensus::default();
        b.record(Kind::Herbivore, Stage::Child);
        b.record(Kind::Plant, Stage::Child);

        let grid = CensusGrid {
            size: 2,
            cells: vec![
                vec![a, CellCensus::default()],
                vec![b, CellCensus::default()],
            ],
        };
        let totals = grid.totals();
        assert_eq!(totals.herb, StageCount { child: 1, adult: 1 });
        assert_eq!(totals.plant.total(), 1);
    }

    #[test]
    fn test_rain_event_coverage() {
        let event = RainEvent::new(2, 3, 2, 7);
        assert!(event.covers(Position::new(2, 3)));
        assert!(event.covers(Position::new(3, 4)));
        assert!(!event.covers(Position::new(4, 3)));
        assert!(!event.covers(Position::new(1, 3)));
    }
}
