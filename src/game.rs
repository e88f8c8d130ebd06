use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::GameConfig;
use crate::grid::Grid;
use crate::input::InputFrame;
use crate::snake::Snake;

/// Current high-level gameplay state.
///
/// Simulation time advances only while `Playing`.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GameStatus {
    MainMenu,
    Playing,
    Paused,
    GameOver,
}

/// Discrete events produced by one tick, consumed by the presentation
/// layer for feedback effects. Returned from [`GameSession::tick`] rather
/// than delivered through registered callbacks.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GameEvent {
    /// The snake advanced one plain step.
    Moved,
    /// The snake ate the food this step.
    FoodEaten,
    /// A lock cleared this many full rows.
    LinesCleared(u32),
    /// The snake hit terrain, a wall, or itself; a lock-and-respawn follows.
    Collision,
    /// A respawn landed on locked terrain; the session is over.
    GameOver,
    Paused,
    Resumed,
}

/// Orchestrates grid, snake, and input into one game session.
///
/// Owns score, level, and the fixed-timestep accumulator that decouples
/// movement cadence from render frame rate. Driven by [`Self::tick`] once
/// per rendered frame with the wall-clock delta.
#[derive(Debug)]
pub struct GameSession {
    pub grid: Grid,
    pub snake: Snake,
    pub score: u32,
    pub level: u32,
    pub status: GameStatus,
    config: GameConfig,
    clock_ms: f64,
    accumulator_ms: f64,
    rng: StdRng,
    events: Vec<GameEvent>,
}

impl GameSession {
    /// Creates a session in the main menu with OS-sourced randomness.
    #[must_use]
    pub fn new(config: GameConfig) -> Self {
        Self::from_rng(config, StdRng::from_entropy())
    }

    /// Creates a deterministic session for tests and reproducible runs.
    #[must_use]
    pub fn new_with_seed(config: GameConfig, seed: u64) -> Self {
        Self::from_rng(config, StdRng::seed_from_u64(seed))
    }

    fn from_rng(config: GameConfig, mut rng: StdRng) -> Self {
        let grid = Grid::new(&mut rng, &config);
        let snake = Snake::spawn(&mut rng, &config, 0.0);

        Self {
            grid,
            snake,
            score: 0,
            level: 1,
            status: GameStatus::MainMenu,
            config,
            clock_ms: 0.0,
            accumulator_ms: 0.0,
            rng,
            events: Vec::new(),
        }
    }

    /// Returns the configuration this session runs under.
    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Resets all session state and enters `Playing`.
    ///
    /// Grid and snake are reset in place, not recreated; score and level
    /// start over. Food is re-placed if the fresh snake spawned onto it.
    pub fn start_game(&mut self) {
        self.grid.reset(&mut self.rng);
        self.snake.respawn(&mut self.rng, &self.config, self.clock_ms);
        self.score = 0;
        self.level = 1;
        self.accumulator_ms = 0.0;
        self.status = GameStatus::Playing;
        self.ensure_food_is_free();
    }

    /// Advances the session by one frame.
    ///
    /// Within the frame: menu/pause/quit transitions first, then directional
    /// intent, then as many fixed movement steps as the accumulated time
    /// affords (capped per frame), so input always precedes movement.
    /// Returns the events this frame produced, oldest first.
    pub fn tick(&mut self, delta_ms: f64, input: InputFrame) -> &[GameEvent] {
        self.events.clear();

        match self.status {
            GameStatus::MainMenu => {
                if input.confirm {
                    self.start_game();
                }
                return &self.events;
            }
            GameStatus::GameOver => {
                if input.confirm {
                    self.status = GameStatus::MainMenu;
                }
                return &self.events;
            }
            GameStatus::Playing | GameStatus::Paused => {}
        }

        if input.pause {
            self.toggle_pause();
        }

        if input.quit && self.status == GameStatus::Paused {
            self.status = GameStatus::MainMenu;
            return &self.events;
        }

        if self.status != GameStatus::Playing {
            return &self.events;
        }

        self.clock_ms += delta_ms;

        if let Some(direction) = input.direction {
            self.snake.change_direction(direction, self.clock_ms, &self.config);
            self.snake.begin_hold(direction, self.clock_ms);
        } else {
            self.snake.end_hold();
        }

        self.accumulator_ms += delta_ms;
        let mut steps = 0;
        while self.status == GameStatus::Playing && steps < self.config.max_steps_per_frame {
            let delay = self.snake.step_delay(self.level, self.clock_ms, &self.config);
            if self.accumulator_ms < delay {
                break;
            }
            self.accumulator_ms -= delay;
            steps += 1;
            self.step();
        }

        // A long stall would otherwise bank a burst of catch-up steps for
        // the following frames as well.
        if steps == self.config.max_steps_per_frame {
            self.accumulator_ms = 0.0;
        }

        &self.events
    }

    /// Performs one discrete movement step.
    fn step(&mut self) {
        let next_head = self.snake.next_head();

        if self.grid.is_collision(next_head) || self.snake.collides_with_body(next_head, true) {
            self.lock_and_respawn();
        } else if self.grid.is_food(next_head) {
            self.snake.move_forward(true, self.clock_ms);
            self.score += self.level * self.config.points_per_food;
            self.grid.spawn_food(&mut self.rng, Some(&self.snake));
            self.events.push(GameEvent::FoodEaten);
        } else {
            self.snake.move_forward(false, self.clock_ms);
            self.events.push(GameEvent::Moved);
            // A kinked body can slide a non-head segment over the food cell;
            // the food relocates rather than sit underneath the snake.
            self.ensure_food_is_free();
        }
    }

    /// Locks the snake into the grid, scores any line clears, and respawns.
    ///
    /// Line-clear points use the level in effect at the moment of the
    /// clear; the level is recomputed from the landed-block total
    /// afterwards. A respawn overlapping locked terrain ends the session.
    fn lock_and_respawn(&mut self) {
        self.events.push(GameEvent::Collision);

        self.grid.lock_snake(&mut self.rng, &self.snake);
        let cleared = self.grid.clear_lines();
        if cleared > 0 {
            self.score += cleared * self.config.points_per_line * self.level;
            self.events.push(GameEvent::LinesCleared(cleared));
        }
        self.level = 1 + self.grid.landed_blocks() / self.config.level_block_threshold;

        self.snake.respawn(&mut self.rng, &self.config, self.clock_ms);
        self.ensure_food_is_free();

        let blocked = self
            .snake
            .segments()
            .any(|segment| self.grid.is_static_block(*segment));
        if blocked {
            self.status = GameStatus::GameOver;
            self.events.push(GameEvent::GameOver);
        }
    }

    /// Re-places the food if a lock, clear shift, or respawn now covers it.
    fn ensure_food_is_free(&mut self) {
        let food = self.grid.food();
        if self.grid.is_static_block(food) || self.snake.occupies(food) {
            self.grid.spawn_food(&mut self.rng, Some(&self.snake));
        }
    }

    fn toggle_pause(&mut self) {
        match self.status {
            GameStatus::Playing => {
                self.status = GameStatus::Paused;
                self.events.push(GameEvent::Paused);
            }
            GameStatus::Paused => {
                self.status = GameStatus::Playing;
                self.events.push(GameEvent::Resumed);
            }
            GameStatus::MainMenu | GameStatus::GameOver => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::{GameConfig, GridSize};
    use crate::input::{Direction, InputFrame};
    use crate::snake::{Position, Snake};

    use super::{GameEvent, GameSession, GameStatus};

    const IDLE: InputFrame = InputFrame {
        direction: None,
        pause: false,
        quit: false,
        force_quit: false,
        confirm: false,
    };

    fn small_session() -> GameSession {
        let config = GameConfig::with_grid(GridSize {
            width: 5,
            height: 6,
        });
        let mut session = GameSession::new_with_seed(config, 42);
        session.tick(0.0, InputFrame { confirm: true, ..IDLE });
        session
    }

    fn pause_frame() -> InputFrame {
        InputFrame { pause: true, ..IDLE }
    }

    #[test]
    fn confirm_leaves_the_main_menu() {
        let config = GameConfig::default();
        let mut session = GameSession::new_with_seed(config, 1);
        assert_eq!(session.status, GameStatus::MainMenu);

        session.tick(0.0, InputFrame { confirm: true, ..IDLE });

        assert_eq!(session.status, GameStatus::Playing);
        assert_eq!(session.score, 0);
        assert_eq!(session.level, 1);
    }

    #[test]
    fn one_base_delay_of_time_produces_exactly_one_step() {
        let mut session = small_session();
        session.snake = Snake::from_segments(vec![Position { x: 1, y: 1 }], Direction::Down);
        session.grid.place_food(Position { x: 4, y: 0 });

        let events: Vec<GameEvent> = session.tick(300.0, IDLE).to_vec();
        assert_eq!(events, vec![GameEvent::Moved]);
        assert_eq!(session.snake.head(), Position { x: 1, y: 2 });

        // A partial delay accumulates without moving.
        assert!(session.tick(150.0, IDLE).is_empty());
        assert_eq!(session.tick(150.0, IDLE), &[GameEvent::Moved]);
    }

    #[test]
    fn steps_per_frame_are_capped() {
        // Tall default grid: plenty of room to fall without colliding.
        let mut session = GameSession::new_with_seed(GameConfig::default(), 3);
        session.tick(0.0, InputFrame { confirm: true, ..IDLE });
        session.snake = Snake::from_segments(vec![Position { x: 5, y: 0 }], Direction::Down);
        session.grid.place_food(Position { x: 15, y: 0 });

        let moves = session
            .tick(1_000_000.0, IDLE)
            .iter()
            .filter(|event| **event == GameEvent::Moved)
            .count();

        assert_eq!(moves as u32, session.config().max_steps_per_frame);
    }

    #[test]
    fn pause_stops_simulation_time() {
        let mut session = small_session();
        session.snake = Snake::from_segments(vec![Position { x: 1, y: 1 }], Direction::Down);

        assert_eq!(session.tick(0.0, pause_frame()), &[GameEvent::Paused]);
        assert_eq!(session.status, GameStatus::Paused);

        assert!(session.tick(10_000.0, IDLE).is_empty());
        assert_eq!(session.snake.head(), Position { x: 1, y: 1 });

        assert_eq!(session.tick(0.0, pause_frame()), &[GameEvent::Resumed]);
        assert_eq!(session.status, GameStatus::Playing);
    }

    #[test]
    fn quit_while_paused_returns_to_main_menu() {
        let mut session = small_session();
        session.tick(0.0, pause_frame());

        session.tick(0.0, InputFrame { quit: true, ..IDLE });

        assert_eq!(session.status, GameStatus::MainMenu);
    }

    #[test]
    fn quit_while_playing_is_ignored() {
        let mut session = small_session();

        session.tick(0.0, InputFrame { quit: true, ..IDLE });

        assert_eq!(session.status, GameStatus::Playing);
    }

    #[test]
    fn eating_food_scores_and_grows() {
        let mut session = small_session();
        session.snake = Snake::from_segments(vec![Position { x: 1, y: 1 }], Direction::Down);
        session.grid.place_food(Position { x: 1, y: 2 });

        let events: Vec<GameEvent> = session.tick(300.0, IDLE).to_vec();

        assert_eq!(events, vec![GameEvent::FoodEaten]);
        assert_eq!(session.score, 10);
        assert_eq!(session.snake.len(), 2);
        assert!(!session.snake.occupies(session.grid.food()));
        assert!(!session.grid.is_static_block(session.grid.food()));
    }

    #[test]
    fn floor_collision_locks_and_respawns() {
        let mut session = small_session();
        session.snake = Snake::from_segments(
            vec![Position { x: 1, y: 5 }, Position { x: 1, y: 4 }],
            Direction::Down,
        );

        let events: Vec<GameEvent> = session.tick(300.0, IDLE).to_vec();

        assert_eq!(events, vec![GameEvent::Collision]);
        assert_eq!(session.status, GameStatus::Playing);
        assert!(session.grid.is_static_block(Position { x: 1, y: 5 }));
        assert!(session.grid.is_static_block(Position { x: 1, y: 4 }));
        assert_eq!(session.grid.landed_blocks(), 2);

        // Fresh spawn at the center column, falling in from above.
        assert_eq!(session.snake.head().x, 2);
        assert_eq!(session.snake.head().y, 0);
    }

    #[test]
    fn completing_a_row_scores_fifty_times_level() {
        let mut session = small_session();
        for x in 0..5 {
            if x != 2 {
                session.grid.insert_block(Position { x, y: 5 }, 0);
            }
        }
        session.grid.place_food(Position { x: 0, y: 0 });
        session.snake = Snake::from_segments(vec![Position { x: 2, y: 5 }], Direction::Down);
        let score_before = session.score;

        let events: Vec<GameEvent> = session.tick(300.0, IDLE).to_vec();

        assert_eq!(
            events,
            vec![GameEvent::Collision, GameEvent::LinesCleared(1)]
        );
        assert_eq!(session.score - score_before, 50);
        assert_eq!(session.grid.block_count(), 0);
    }

    #[test]
    fn respawn_onto_locked_terrain_ends_the_session() {
        let mut session = small_session();
        // Block the spawn column head cell, then force a lock elsewhere.
        session.grid.insert_block(Position { x: 2, y: 0 }, 0);
        session.snake = Snake::from_segments(vec![Position { x: 4, y: 5 }], Direction::Down);

        let events: Vec<GameEvent> = session.tick(300.0, IDLE).to_vec();

        assert_eq!(session.status, GameStatus::GameOver);
        assert_eq!(
            events,
            vec![GameEvent::Collision, GameEvent::GameOver]
        );
    }

    #[test]
    fn self_collision_triggers_lock() {
        let mut session = small_session();
        session.grid.place_food(Position { x: 0, y: 0 });
        // A body kinked around the head's landing cell: head at (2,2) moving
        // down into (2,3), held by a middle segment. The tail at (1,3) is
        // not the occupant, so the tail exclusion does not apply.
        session.snake = Snake::from_segments(
            vec![
                Position { x: 2, y: 2 },
                Position { x: 3, y: 2 },
                Position { x: 3, y: 3 },
                Position { x: 2, y: 3 },
                Position { x: 1, y: 3 },
            ],
            Direction::Down,
        );

        let events: Vec<GameEvent> = session.tick(300.0, IDLE).to_vec();

        assert!(events.contains(&GameEvent::Collision));
        assert_eq!(session.grid.landed_blocks(), 5);
    }

    #[test]
    fn moving_into_the_vacating_tail_cell_is_not_a_collision() {
        let mut session = small_session();
        session.grid.place_food(Position { x: 0, y: 0 });
        // Square body: the head's landing cell is the tail, which vacates
        // on the same step.
        session.snake = Snake::from_segments(
            vec![
                Position { x: 2, y: 2 },
                Position { x: 3, y: 2 },
                Position { x: 3, y: 3 },
                Position { x: 2, y: 3 },
            ],
            Direction::Down,
        );

        let events: Vec<GameEvent> = session.tick(300.0, IDLE).to_vec();

        assert_eq!(events, vec![GameEvent::Moved]);
        assert_eq!(session.grid.landed_blocks(), 0);
    }

    #[test]
    fn level_recomputes_from_landed_blocks() {
        let config = GameConfig::with_grid(GridSize {
            width: 5,
            height: 6,
        });
        let mut session = GameSession::new_with_seed(config, 7);
        session.tick(0.0, InputFrame { confirm: true, ..IDLE });

        // Bank 79 landed blocks (re-locking one cell still counts), then one
        // real lock triggers the recompute at the 80-block threshold.
        let mut shade_rng = rand::rngs::mock::StepRng::new(0, 1);
        let banked = Snake::from_segments(vec![Position { x: 0, y: 0 }], Direction::Down);
        for _ in 0..79 {
            let _ = session.grid.lock_snake(&mut shade_rng, &banked);
        }
        session.snake = Snake::from_segments(vec![Position { x: 4, y: 5 }], Direction::Down);
        session.grid.place_food(Position { x: 3, y: 5 });

        session.tick(300.0, IDLE);

        assert_eq!(session.grid.landed_blocks(), 80);
        assert_eq!(session.level, 2);
    }

    #[test]
    fn game_over_confirm_returns_to_main_menu_and_restart_resets() {
        let mut session = small_session();
        session.grid.insert_block(Position { x: 2, y: 0 }, 0);
        session.snake = Snake::from_segments(vec![Position { x: 4, y: 5 }], Direction::Down);
        session.score = 999;
        session.tick(300.0, IDLE);
        assert_eq!(session.status, GameStatus::GameOver);

        session.tick(0.0, InputFrame { confirm: true, ..IDLE });
        assert_eq!(session.status, GameStatus::MainMenu);

        session.tick(0.0, InputFrame { confirm: true, ..IDLE });
        assert_eq!(session.status, GameStatus::Playing);
        assert_eq!(session.score, 0);
        assert_eq!(session.grid.landed_blocks(), 0);
    }
}
