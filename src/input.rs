use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Canonical movement directions.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Returns the opposite direction.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Returns the unit offset for this direction as `(dx, dy)`.
    #[must_use]
    pub fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }
}

/// Per-frame input sample consumed by the session tick.
///
/// `direction` is the directional intent currently held (or `None`); the
/// booleans are edges, true only on the frame the key was pressed.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct InputFrame {
    pub direction: Option<Direction>,
    pub pause: bool,
    pub quit: bool,
    /// Ctrl+C: leave the program immediately, whatever the game status.
    pub force_quit: bool,
    pub confirm: bool,
}

/// How long a direction counts as held after its last press/repeat event.
///
/// Terminals deliver no key-release events, so a hold ends when the OS key
/// repeat stops arriving. The window must exceed the initial repeat delay of
/// common terminal/OS combinations or every hold stutters once at the start.
const HOLD_RELEASE_TIMEOUT: Duration = Duration::from_millis(650);

/// Translates crossterm key events into per-frame [`InputFrame`] samples.
#[derive(Debug)]
pub struct InputHandler {
    held: Option<(Direction, Instant)>,
}

impl InputHandler {
    #[must_use]
    pub fn new() -> Self {
        Self { held: None }
    }

    /// Drains pending terminal events and returns this frame's input sample.
    pub fn poll_frame(&mut self, now: Instant) -> io::Result<InputFrame> {
        let mut frame = InputFrame::default();

        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                self.apply_key(key, now, &mut frame);
            }
        }

        frame.direction = self.held_direction(now);
        Ok(frame)
    }

    /// Returns the direction still considered held at `now`, expiring stale holds.
    fn held_direction(&mut self, now: Instant) -> Option<Direction> {
        let (direction, last_seen) = self.held?;
        if now.duration_since(last_seen) > HOLD_RELEASE_TIMEOUT {
            self.held = None;
            return None;
        }
        Some(direction)
    }

    /// Forgets any held direction, e.g. when leaving the playing state.
    pub fn reset_hold(&mut self) {
        self.held = None;
    }

    fn apply_key(&mut self, key: KeyEvent, now: Instant, frame: &mut InputFrame) {
        if !matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) {
            return;
        }

        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            frame.quit = true;
            frame.force_quit = true;
            return;
        }

        match key.code {
            KeyCode::Up | KeyCode::Char('w') => self.press_direction(Direction::Up, now),
            KeyCode::Down | KeyCode::Char('s') => self.press_direction(Direction::Down, now),
            KeyCode::Left | KeyCode::Char('a') => self.press_direction(Direction::Left, now),
            KeyCode::Right | KeyCode::Char('d') => self.press_direction(Direction::Right, now),
            KeyCode::Char('p') | KeyCode::Esc => frame.pause = true,
            KeyCode::Char('q') => frame.quit = true,
            KeyCode::Enter | KeyCode::Char(' ') => frame.confirm = true,
            _ => {}
        }
    }

    fn press_direction(&mut self, direction: Direction, now: Instant) {
        self.held = Some((direction, now));
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
