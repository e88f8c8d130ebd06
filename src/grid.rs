use rand::Rng;

use crate::config::{GameConfig, BLOCK_SHADE_COUNT};
use crate::snake::{Position, Snake};

/// Attempts at uniform rejection sampling before falling back to a
/// deterministic scan of free cells.
const FOOD_SAMPLE_ATTEMPTS: u32 = 64;

/// Authoritative model of the locked terrain and the food cell.
///
/// The static field is a flat row-major array indexed `y * width + x`; each
/// occupied cell stores a shade variant the renderer maps to a color. The
/// grid answers collision queries and runs the line-clear pass, but knows
/// nothing about score or level.
#[derive(Debug, Clone)]
pub struct Grid {
    width: i32,
    height: i32,
    cells: Vec<Option<u8>>,
    food: Position,
    landed_blocks: u32,
}

impl Grid {
    /// Creates an empty grid with an initial food cell.
    #[must_use]
    pub fn new<R: Rng + ?Sized>(rng: &mut R, config: &GameConfig) -> Self {
        let width = i32::from(config.grid.width);
        let height = i32::from(config.grid.height);
        let mut grid = Self {
            width,
            height,
            cells: vec![None; (width * height) as usize],
            food: Position { x: 0, y: 0 },
            landed_blocks: 0,
        };
        grid.reset(rng);
        grid
    }

    /// Clears all locked blocks, zeroes the landed counter, and respawns food.
    ///
    /// There is no snake yet at reset time, so food placement only avoids
    /// static blocks (of which there are none).
    pub fn reset<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cells.fill(None);
        self.landed_blocks = 0;
        self.spawn_food(rng, None);
    }

    /// Returns true when `position` holds a locked block.
    ///
    /// Out-of-range positions are simply not blocks.
    #[must_use]
    pub fn is_static_block(&self, position: Position) -> bool {
        self.index(position)
            .is_some_and(|i| self.cells[i].is_some())
    }

    /// Returns true when `position` is outside the grid or a locked block.
    ///
    /// Food and snake self-overlap are separate concerns checked by the
    /// session.
    #[must_use]
    pub fn is_collision(&self, position: Position) -> bool {
        match self.index(position) {
            Some(i) => self.cells[i].is_some(),
            None => true,
        }
    }

    /// Returns the current food cell.
    #[must_use]
    pub fn food(&self) -> Position {
        self.food
    }

    /// Returns true when `position` is the food cell.
    #[must_use]
    pub fn is_food(&self, position: Position) -> bool {
        position == self.food
    }

    /// Moves the food to an explicit cell. Intended for tests and demos.
    pub fn place_food(&mut self, position: Position) {
        self.food = position;
    }

    /// Spawns food on a uniformly random free cell.
    ///
    /// Samples the full grid (top row included) until the cell is neither a
    /// locked block nor, when `avoid` is given, under the snake. Sampling is
    /// bounded; past the attempt budget the remaining free cells are scanned
    /// and one is picked at random. With no free cell at all the food stays
    /// where it was — the board is full and the session is already lost.
    pub fn spawn_food<R: Rng + ?Sized>(&mut self, rng: &mut R, avoid: Option<&Snake>) {
        for _ in 0..FOOD_SAMPLE_ATTEMPTS {
            let candidate = Position {
                x: rng.gen_range(0..self.width),
                y: rng.gen_range(0..self.height),
            };
            if !self.cell_is_taken(candidate, avoid) {
                self.food = candidate;
                return;
            }
        }

        let mut free = Vec::new();
        for y in 0..self.height {
            for x in 0..self.width {
                let position = Position { x, y };
                if !self.cell_is_taken(position, avoid) {
                    free.push(position);
                }
            }
        }

        if !free.is_empty() {
            self.food = free[rng.gen_range(0..free.len())];
        }
    }

    fn cell_is_taken(&self, position: Position, avoid: Option<&Snake>) -> bool {
        self.is_static_block(position) || avoid.is_some_and(|snake| snake.occupies(position))
    }

    /// Turns every in-bounds snake segment into a locked block.
    ///
    /// Each block gets a random shade variant for visual distinction. A
    /// snake can collide while part of its body still hangs above row zero;
    /// those segments are discarded rather than stored out of bounds, and
    /// the landed counter only grows by the blocks actually placed.
    /// Returns the number of blocks added.
    pub fn lock_snake<R: Rng + ?Sized>(&mut self, rng: &mut R, snake: &Snake) -> u32 {
        let mut added = 0;
        for segment in snake.segments() {
            if let Some(i) = self.index(*segment) {
                self.cells[i] = Some(rng.gen_range(0..BLOCK_SHADE_COUNT));
                added += 1;
            }
        }
        self.landed_blocks += added;
        added
    }

    /// Clears every full row and applies gravity; returns rows cleared.
    ///
    /// Scans bottom-up. After removing a row everything above shifts down
    /// one, so the same `y` is examined again before moving upward —
    /// otherwise stacked full rows would be skipped.
    pub fn clear_lines(&mut self) -> u32 {
        let mut cleared = 0;
        let mut y = self.height - 1;

        while y >= 0 {
            if self.row_is_full(y) {
                self.remove_row(y);
                cleared += 1;
            } else {
                y -= 1;
            }
        }

        cleared
    }

    /// Returns the total number of blocks locked since the last reset.
    ///
    /// Line clears do not decrement this; it drives level progression.
    #[must_use]
    pub fn landed_blocks(&self) -> u32 {
        self.landed_blocks
    }

    /// Returns the number of currently occupied cells.
    #[must_use]
    pub fn block_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    /// Iterates over occupied cells as `(position, shade variant)`.
    pub fn blocks(&self) -> impl Iterator<Item = (Position, u8)> + '_ {
        self.cells.iter().enumerate().filter_map(|(i, cell)| {
            cell.map(|shade| {
                let position = Position {
                    x: i as i32 % self.width,
                    y: i as i32 / self.width,
                };
                (position, shade)
            })
        })
    }

    /// Inserts a single block directly. Intended for tests and demos.
    pub fn insert_block(&mut self, position: Position, shade: u8) {
        if let Some(i) = self.index(position) {
            self.cells[i] = Some(shade);
        }
    }

    fn index(&self, position: Position) -> Option<usize> {
        if position.x < 0 || position.y < 0 || position.x >= self.width || position.y >= self.height
        {
            return None;
        }
        Some((position.y * self.width + position.x) as usize)
    }

    fn row_is_full(&self, y: i32) -> bool {
        let start = (y * self.width) as usize;
        self.cells[start..start + self.width as usize]
            .iter()
            .all(|cell| cell.is_some())
    }

    /// Removes row `y`, shifting every row above it down by one.
    fn remove_row(&mut self, y: i32) {
        for row in (1..=y).rev() {
            let src = ((row - 1) * self.width) as usize;
            let dst = (row * self.width) as usize;
            let width = self.width as usize;
            self.cells.copy_within(src..src + width, dst);
        }
        self.cells[..self.width as usize].fill(None);
    }
}
