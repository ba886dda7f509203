//! Square board of cells.

use crate::cell::Cell;
use eco_core::{CensusGrid, CellCensus, Direction, Error, Position, Result, WorldConfig};

/// A bounded N×N grid. Cells are stored row-major and never move.
#[derive(Debug)]
pub struct Grid {
    size: usize,
    cells: Vec<Cell>,
}

impl Grid {
    pub fn new(config: &WorldConfig) -> Self {
        let size = config.board_size;
        let cells = (0..size * size)
            .map(|index| Cell::new(index_to_pos(size, index), config))
            .collect();
        Self { size, cells }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Cell at `pos`, or `None` off the board
    pub fn get(&self, pos: Position) -> Option<&Cell> {
        if !pos.in_bounds(self.size) {
            return None;
        }
        self.cells.get(self.pos_to_index(pos))
    }

    /// Cell at `pos`, failing with [`Error::OutOfBounds`] off the board
    pub fn cell(&self, pos: Position) -> Result<&Cell> {
        self.get(pos).ok_or(Error::OutOfBounds {
            x: pos.x,
            y: pos.y,
            size: self.size,
        })
    }

    /// In-bounds positions of the eight surrounding cells
    pub fn neighbors(&self, pos: Position) -> Vec<Position> {
        Direction::all()
            .into_iter()
            .map(|direction| pos.step(direction))
            .filter(|candidate| candidate.in_bounds(self.size))
            .collect()
    }

    fn pos_to_index(&self, pos: Position) -> usize {
        pos.y as usize * self.size + pos.x as usize
    }

    pub fn iter(&self) -> impl Iterator<Item = &Cell> + '_ {
        self.cells.iter()
    }

    /// Snapshot of every cell, indexed `[x][y]`. Each cell is read under its
    /// own lock, so the grid as a whole is not a single consistent instant.
    pub fn census(&self) -> CensusGrid {
        let mut cells = vec![vec![CellCensus::default(); self.size]; self.size];
        for cell in &self.cells {
            let pos = cell.position();
            cells[pos.x as usize][pos.y as usize] = cell.census();
        }
        CensusGrid {
            size: self.size,
            cells,
        }
    }
}

fn index_to_pos(size: usize, index: usize) -> Position {
    Position::new((index % size) as i32, (index / size) as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(board_size: usize) -> WorldConfig {
        WorldConfig {
            board_size,
            ..WorldConfig::default()
        }
    }

    #[test]
    fn test_grid_creation() {
        let grid = Grid::new(&config(10));
        assert_eq!(grid.size(), 10);
        assert_eq!(grid.iter().count(), 100);
    }

    #[test]
    fn test_cells_know_their_position() {
        let grid = Grid::new(&config(4));
        for x in 0..4 {
            for y in 0..4 {
                let pos = Position::new(x, y);
                assert_eq!(grid.cell(pos).unwrap().position(), pos);
            }
        }
    }

    #[test]
    fn test_out_of_bounds() {
        let grid = Grid::new(&config(10));
        assert!(grid.get(Position::new(-1, 0)).is_none());
        assert!(matches!(
            grid.cell(Position::new(10, 3)),
            Err(Error::OutOfBounds { x: 10, y: 3, size: 10 })
        ));
    }

    #[test]
    fn test_neighbors_clip_at_edges() {
        let grid = Grid::new(&config(10));
        assert_eq!(grid.neighbors(Position::new(0, 0)).len(), 3);
        assert_eq!(grid.neighbors(Position::new(0, 5)).len(), 5);
        assert_eq!(grid.neighbors(Position::new(5, 5)).len(), 8);

        let mut corner = grid.neighbors(Position::new(9, 9));
        corner.sort_by_key(|pos| (pos.x, pos.y));
        assert_eq!(
            corner,
            vec![Position::new(8, 8), Position::new(8, 9), Position::new(9, 8)]
        );
    }

    #[test]
    fn test_empty_census() {
        let grid = Grid::new(&config(3));
        let census = grid.census();
        assert_eq!(census.size, 3);
        assert_eq!(census.cells.len(), 3);
        assert!(census.totals().is_empty());
    }
}
