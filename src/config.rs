use ratatui::style::Color;
use ratatui::symbols::border;

/// Logical grid dimensions passed through the game as a named type.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct GridSize {
    pub width: u16,
    pub height: u16,
}

impl GridSize {
    /// Returns the total number of cells in the grid.
    #[must_use]
    pub fn total_cells(self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }

    /// Returns the size with both dimensions forced into the playable range.
    #[must_use]
    pub fn clamped(self) -> Self {
        Self {
            width: self.width.clamp(MIN_GRID_DIMENSION, MAX_GRID_DIMENSION),
            height: self.height.clamp(MIN_GRID_DIMENSION, MAX_GRID_DIMENSION),
        }
    }
}

/// Simulation tuning shared by the grid, snake, and session.
///
/// Constructed once and passed by reference into everything that needs it;
/// there is deliberately no module-level mutable configuration.
#[derive(Debug, Clone, Copy)]
pub struct GameConfig {
    pub grid: GridSize,
    /// Step delay for a level-1, length-1 snake with no key held.
    pub base_move_delay_ms: f64,
    /// Lower bound on the step delay absent any key hold.
    pub min_move_delay_ms: f64,
    /// Target delay reached after a full hold window.
    pub fast_move_delay_ms: f64,
    /// Hard lower bound on the accelerated delay.
    pub fast_move_floor_ms: f64,
    /// Continuous-hold duration over which the delay ramps to the fast target.
    pub hold_scale_ms: f64,
    /// Milliseconds each level above one shaves off the base delay (capped at level 10).
    pub level_delay_step_ms: f64,
    /// Milliseconds each body segment beyond the first shaves off the base delay.
    pub length_delay_step_ms: f64,
    /// Direction changes arriving sooner than this after a movement tick are buffered.
    pub direction_debounce_ms: f64,
    /// Locked blocks needed per level increase.
    pub level_block_threshold: u32,
    /// Score per cleared line, multiplied by the current level.
    pub points_per_line: u32,
    /// Score per food eaten, multiplied by the current level.
    pub points_per_food: u32,
    /// Longest snake the spawner will produce.
    pub max_spawn_length: usize,
    /// Upper bound on movement steps simulated in one frame.
    pub max_steps_per_frame: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid: GridSize {
                width: DEFAULT_GRID_WIDTH,
                height: DEFAULT_GRID_HEIGHT,
            },
            base_move_delay_ms: 300.0,
            min_move_delay_ms: 60.0,
            fast_move_delay_ms: 50.0,
            fast_move_floor_ms: 40.0,
            hold_scale_ms: 500.0,
            level_delay_step_ms: 20.0,
            length_delay_step_ms: 20.0,
            direction_debounce_ms: 16.0,
            level_block_threshold: 80,
            points_per_line: 50,
            points_per_food: 10,
            max_spawn_length: 4,
            max_steps_per_frame: 8,
        }
    }
}

impl GameConfig {
    /// Returns a default config with the given grid dimensions, clamped to
    /// the playable range.
    #[must_use]
    pub fn with_grid(grid: GridSize) -> Self {
        Self {
            grid: grid.clamped(),
            ..Self::default()
        }
    }
}

/// Default playfield width in cells.
pub const DEFAULT_GRID_WIDTH: u16 = 20;

/// Default playfield height in cells.
pub const DEFAULT_GRID_HEIGHT: u16 = 30;

/// Smallest playable grid dimension.
pub const MIN_GRID_DIMENSION: u16 = 4;

/// Largest playable grid dimension; keeps cell indices comfortably inside
/// `i32` and allocations proportionate to anything a terminal can show.
pub const MAX_GRID_DIMENSION: u16 = 128;

/// Number of distinct shades locked blocks are drawn in.
pub const BLOCK_SHADE_COUNT: u8 = 3;

/// A color theme applied to all visual elements.
#[derive(Debug)]
pub struct Theme {
    pub name: &'static str,
    /// Solid block color for the snake head.
    pub snake_head: Color,
    /// Solid block color for body segments.
    pub snake_body: Color,
    /// Color for food.
    pub food: Color,
    /// Shades for locked blocks, indexed by each block's shade variant.
    pub block_shades: [Color; BLOCK_SHADE_COUNT as usize],
    pub border_fg: Color,
    pub hud_fg: Color,
    pub menu_title: Color,
    pub menu_footer: Color,
}

/// Classic green-on-dark theme.
pub const THEME_CLASSIC: Theme = Theme {
    name: "Classic",
    snake_head: Color::White,
    snake_body: Color::Green,
    food: Color::Red,
    block_shades: [Color::Gray, Color::DarkGray, Color::White],
    border_fg: Color::White,
    hud_fg: Color::White,
    menu_title: Color::Green,
    menu_footer: Color::DarkGray,
};

/// Ocean cyan theme.
pub const THEME_OCEAN: Theme = Theme {
    name: "Ocean",
    snake_head: Color::White,
    snake_body: Color::Cyan,
    food: Color::Yellow,
    block_shades: [Color::Blue, Color::DarkGray, Color::Cyan],
    border_fg: Color::Cyan,
    hud_fg: Color::Cyan,
    menu_title: Color::Cyan,
    menu_footer: Color::DarkGray,
};

/// Neon magenta theme.
pub const THEME_NEON: Theme = Theme {
    name: "Neon",
    snake_head: Color::White,
    snake_body: Color::Magenta,
    food: Color::Yellow,
    block_shades: [Color::Magenta, Color::DarkGray, Color::White],
    border_fg: Color::Magenta,
    hud_fg: Color::Magenta,
    menu_title: Color::Magenta,
    menu_footer: Color::DarkGray,
};

/// All available themes in cycle order.
pub const THEMES: &[Theme] = &[THEME_CLASSIC, THEME_OCEAN, THEME_NEON];

/// Half-block border set: solid side faces the play area.
pub const BORDER_HALF_BLOCK: border::Set = border::Set {
    top_left: "▄",
    top_right: "▄",
    bottom_left: "▀",
    bottom_right: "▀",
    vertical_left: "█",
    vertical_right: "█",
    horizontal_top: "▄",
    horizontal_bottom: "▀",
};

/// Glyph for locked blocks.
pub const GLYPH_BLOCK: &str = "█";

/// Glyph for snake body segments.
pub const GLYPH_SNAKE_BODY: &str = "█";

/// Glyph for the snake head.
pub const GLYPH_SNAKE_HEAD: &str = "█";

/// Glyph for food.
pub const GLYPH_FOOD: &str = "●";

/// Target frame cadence for the terminal loop in milliseconds.
pub const FRAME_INTERVAL_MS: u64 = 16;

#[cfg(test)]
mod tests {
    use super::{GameConfig, GridSize, MAX_GRID_DIMENSION, MIN_GRID_DIMENSION};

    #[test]
    fn default_config_matches_documented_constants() {
        let config = GameConfig::default();

        assert_eq!(config.grid.width, 20);
        assert_eq!(config.grid.height, 30);
        assert_eq!(config.base_move_delay_ms, 300.0);
        assert_eq!(config.level_block_threshold, 80);
        assert_eq!(config.grid.total_cells(), 600);
    }

    #[test]
    fn with_grid_overrides_only_the_grid() {
        let config = GameConfig::with_grid(GridSize {
            width: 6,
            height: 8,
        });

        assert_eq!(config.grid.width, 6);
        assert_eq!(
            config.base_move_delay_ms,
            GameConfig::default().base_move_delay_ms
        );
    }

    #[test]
    fn with_grid_clamps_out_of_range_dimensions() {
        let config = GameConfig::with_grid(GridSize {
            width: u16::MAX,
            height: 0,
        });

        assert_eq!(config.grid.width, MAX_GRID_DIMENSION);
        assert_eq!(config.grid.height, MIN_GRID_DIMENSION);
    }
}
