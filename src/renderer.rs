use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::Block;
use ratatui::Frame;

use crate::config::{
    GridSize, Theme, BORDER_HALF_BLOCK, GLYPH_BLOCK, GLYPH_FOOD, GLYPH_SNAKE_BODY,
    GLYPH_SNAKE_HEAD,
};
use crate::game::{GameSession, GameStatus};
use crate::snake::Position;
use crate::ui::hud::{render_hud, HudInfo};
use crate::ui::menu::{render_game_over_menu, render_main_menu, render_pause_menu};

/// Renders the full game frame from immutable state.
pub fn render(frame: &mut Frame<'_>, session: &GameSession, hud_info: HudInfo<'_>) {
    let area = frame.area();
    let remaining = render_hud(frame, area, session, &hud_info);
    let play_area = centered_playfield(remaining, session.config().grid);

    let theme = hud_info.theme;
    let block = Block::bordered()
        .border_set(BORDER_HALF_BLOCK)
        .border_style(Style::default().fg(theme.border_fg));

    let inner = block.inner(play_area);
    frame.render_widget(block, play_area);

    render_blocks(frame, inner, session, theme);
    render_food(frame, inner, session, theme);
    render_snake(frame, inner, session, theme);

    match session.status {
        GameStatus::MainMenu => render_main_menu(frame, play_area, hud_info.high_score, theme),
        GameStatus::Paused => render_pause_menu(frame, play_area, theme),
        GameStatus::GameOver => render_game_over_menu(
            frame,
            play_area,
            session.score,
            session.level,
            hud_info.high_score,
            theme,
        ),
        GameStatus::Playing => {}
    }
}

fn render_blocks(frame: &mut Frame<'_>, inner: Rect, session: &GameSession, theme: &Theme) {
    let bounds = session.config().grid;
    let buffer = frame.buffer_mut();

    for (position, shade) in session.grid.blocks() {
        let Some((x, y)) = logical_to_terminal(inner, bounds, position) else {
            continue;
        };
        let color = theme.block_shades[usize::from(shade) % theme.block_shades.len()];
        buffer.set_string(x, y, GLYPH_BLOCK, Style::default().fg(color));
    }
}

fn render_food(frame: &mut Frame<'_>, inner: Rect, session: &GameSession, theme: &Theme) {
    let Some((x, y)) = logical_to_terminal(inner, session.config().grid, session.grid.food())
    else {
        return;
    };

    let buffer = frame.buffer_mut();
    buffer.set_string(x, y, GLYPH_FOOD, Style::default().fg(theme.food));
}

fn render_snake(frame: &mut Frame<'_>, inner: Rect, session: &GameSession, theme: &Theme) {
    let bounds = session.config().grid;
    let head = session.snake.head();

    let buffer = frame.buffer_mut();
    for segment in session.snake.segments() {
        // Segments still above the grid are simply not drawn.
        let Some((x, y)) = logical_to_terminal(inner, bounds, *segment) else {
            continue;
        };

        if *segment == head {
            buffer.set_string(
                x,
                y,
                GLYPH_SNAKE_HEAD,
                Style::default()
                    .fg(theme.snake_head)
                    .add_modifier(Modifier::BOLD),
            );
        } else {
            buffer.set_string(x, y, GLYPH_SNAKE_BODY, Style::default().fg(theme.snake_body));
        }
    }
}

/// Centers a `grid + border` sized playfield inside `area`, clamped to fit.
fn centered_playfield(area: Rect, grid: GridSize) -> Rect {
    let want_width = grid.width.saturating_add(2).min(area.width);
    let want_height = grid.height.saturating_add(2).min(area.height);

    Rect {
        x: area.x + (area.width - want_width) / 2,
        y: area.y + (area.height - want_height) / 2,
        width: want_width,
        height: want_height,
    }
}

fn logical_to_terminal(inner: Rect, bounds: GridSize, position: Position) -> Option<(u16, u16)> {
    if !position.is_within_bounds(bounds) {
        return None;
    }

    let x_offset = u16::try_from(position.x).ok()?;
    let y_offset = u16::try_from(position.y).ok()?;

    let x = inner.x.saturating_add(x_offset);
    let y = inner.y.saturating_add(y_offset);
    if x >= inner.right() || y >= inner.bottom() {
        return None;
    }

    Some((x, y))
}
