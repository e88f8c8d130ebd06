use std::collections::VecDeque;

use rand::Rng;

use crate::config::{GameConfig, GridSize};
use crate::input::Direction;

/// Grid position in logical cell coordinates.
///
/// `y` may be negative: a freshly spawned snake extends above the visible
/// grid and falls in.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Returns true when the position lies inside the bounds.
    #[must_use]
    pub fn is_within_bounds(self, bounds: GridSize) -> bool {
        self.x >= 0
            && self.y >= 0
            && self.x < i32::from(bounds.width)
            && self.y < i32::from(bounds.height)
    }

    /// Returns the neighboring position one cell along `direction`.
    #[must_use]
    pub fn stepped(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Hold {
    direction: Direction,
    since_ms: f64,
}

/// Mutable snake state: body geometry, direction buffering, and the
/// hold-to-accelerate speed model.
///
/// The snake moves as a rigid unit: every segment translates by the current
/// direction vector each step. It does not trail around corners like a
/// classic snake; a body that never grows stays a straight bar. Growth
/// appends the cell the tail just vacated, which is the only way the body
/// ever picks up a bend.
#[derive(Debug, Clone)]
pub struct Snake {
    body: VecDeque<Position>,
    direction: Direction,
    pending_direction: Option<Direction>,
    last_move_at_ms: f64,
    hold: Option<Hold>,
}

impl Snake {
    /// Spawns a fresh snake centered horizontally, hanging above row zero.
    ///
    /// Body length is uniform in `[1, min(max_spawn_length, height / 2)]`;
    /// segment `i` sits at `(center, -i)` so only the head starts on the
    /// visible grid. Direction is straight down, buffers and hold cleared.
    #[must_use]
    pub fn spawn<R: Rng + ?Sized>(rng: &mut R, config: &GameConfig, now_ms: f64) -> Self {
        let mut snake = Self {
            body: VecDeque::new(),
            direction: Direction::Down,
            pending_direction: None,
            last_move_at_ms: now_ms,
            hold: None,
        };
        snake.respawn(rng, config, now_ms);
        snake
    }

    /// Replaces the body wholesale with a fresh spawn.
    ///
    /// Used both for new sessions and after every lock; score and level are
    /// not this type's concern and survive untouched.
    pub fn respawn<R: Rng + ?Sized>(&mut self, rng: &mut R, config: &GameConfig, now_ms: f64) {
        let longest = config
            .max_spawn_length
            .min(usize::from(config.grid.height) / 2)
            .max(1);
        let length = rng.gen_range(1..=longest);
        let center_x = i32::from(config.grid.width / 2);

        self.body.clear();
        for i in 0..length {
            self.body.push_back(Position {
                x: center_x,
                y: -(i as i32),
            });
        }

        self.direction = Direction::Down;
        self.pending_direction = None;
        self.hold = None;
        self.last_move_at_ms = now_ms;
    }

    /// Creates a snake from explicit body segments (front is head).
    #[must_use]
    pub fn from_segments(segments: Vec<Position>, direction: Direction) -> Self {
        Self {
            body: VecDeque::from(segments),
            direction,
            pending_direction: None,
            last_move_at_ms: 0.0,
            hold: None,
        }
    }

    /// Returns the current head position.
    #[must_use]
    pub fn head(&self) -> Position {
        *self
            .body
            .front()
            .expect("snake body must always contain at least one segment")
    }

    /// Returns the head position the next movement step will produce.
    ///
    /// Any buffered direction is previewed here so collision checks agree
    /// with the move [`Self::move_forward`] will actually perform.
    #[must_use]
    pub fn next_head(&self) -> Position {
        self.head().stepped(self.effective_direction())
    }

    /// Applies one movement step at simulation time `now_ms`.
    ///
    /// Consumes any buffered direction, then translates every segment by the
    /// direction vector. When `ate_food` is set the cell the tail vacated is
    /// re-appended, growing the body by one while keeping the head landing
    /// on `next_head()`.
    pub fn move_forward(&mut self, ate_food: bool, now_ms: f64) {
        if let Some(next) = self.pending_direction.take() {
            self.direction = next;
        }

        let (dx, dy) = self.direction.delta();
        let old_tail = *self
            .body
            .back()
            .expect("snake body must always contain at least one segment");

        for segment in &mut self.body {
            segment.x += dx;
            segment.y += dy;
        }

        if ate_food {
            self.body.push_back(old_tail);
        }

        self.last_move_at_ms = now_ms;
    }

    /// Requests a direction change; returns whether the request was accepted.
    ///
    /// Exact reversals and the current direction itself are rejected. An
    /// accepted change arriving within the debounce window after the last
    /// movement step is buffered (one slot, later requests overwrite it) and
    /// applied on the next step; otherwise it takes effect immediately.
    pub fn change_direction(
        &mut self,
        requested: Direction,
        now_ms: f64,
        config: &GameConfig,
    ) -> bool {
        if requested == self.direction || requested == self.direction.opposite() {
            return false;
        }

        if now_ms - self.last_move_at_ms < config.direction_debounce_ms {
            self.pending_direction = Some(requested);
        } else {
            self.direction = requested;
            self.pending_direction = None;
        }
        true
    }

    /// Marks `direction` as actively held, starting the acceleration ramp.
    ///
    /// Re-announcing the same direction keeps the original hold start;
    /// switching directions restarts the ramp.
    pub fn begin_hold(&mut self, direction: Direction, now_ms: f64) {
        match self.hold {
            Some(hold) if hold.direction == direction => {}
            _ => {
                self.hold = Some(Hold {
                    direction,
                    since_ms: now_ms,
                });
            }
        }
    }

    /// Clears any held direction, ending the acceleration ramp.
    pub fn end_hold(&mut self) {
        self.hold = None;
    }

    /// Computes the delay until the next movement step, in milliseconds.
    ///
    /// Base delay shrinks with level (capped at level 10) and body length,
    /// floored at `min_move_delay_ms`. While a key is held the delay ramps
    /// linearly toward `fast_move_delay_ms` over `hold_scale_ms` of
    /// continuous holding, never dropping below `fast_move_floor_ms`.
    #[must_use]
    pub fn step_delay(&self, level: u32, now_ms: f64, config: &GameConfig) -> f64 {
        let level_reduction = f64::from(level.saturating_sub(1).min(9)) * config.level_delay_step_ms;
        let length_reduction = (self.body.len().saturating_sub(1)) as f64 * config.length_delay_step_ms;
        let base = (config.base_move_delay_ms - level_reduction - length_reduction)
            .max(config.min_move_delay_ms);

        let Some(hold) = self.hold else {
            return base;
        };

        let progress = ((now_ms - hold.since_ms) / config.hold_scale_ms).clamp(0.0, 1.0);
        (base - (base - config.fast_move_delay_ms) * progress).max(config.fast_move_floor_ms)
    }

    /// Returns true if any non-head segment occupies `position`.
    ///
    /// With `exclude_tail` the last segment is ignored as well; the tail
    /// cell vacates on the upcoming step unless the snake is eating, so the
    /// self-collision check against the prospective head skips it.
    #[must_use]
    pub fn collides_with_body(&self, position: Position, exclude_tail: bool) -> bool {
        let checked = if exclude_tail {
            self.body.len().saturating_sub(1)
        } else {
            self.body.len()
        };

        self.body
            .iter()
            .take(checked)
            .skip(1)
            .any(|segment| *segment == position)
    }

    /// Returns true if any segment occupies `position`.
    #[must_use]
    pub fn occupies(&self, position: Position) -> bool {
        self.body.contains(&position)
    }

    /// Returns current segment count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Returns the current movement direction.
    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Iterates over body segments from head to tail.
    pub fn segments(&self) -> impl Iterator<Item = &Position> {
        self.body.iter()
    }

    fn effective_direction(&self) -> Direction {
        self.pending_direction.unwrap_or(self.direction)
    }
}
