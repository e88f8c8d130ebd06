use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use unicode_width::UnicodeWidthStr;

use crate::config::Theme;
use crate::game::GameSession;
use crate::score::HighScore;

/// Supplemental values displayed by the HUD row.
#[derive(Debug, Clone, Copy)]
pub struct HudInfo<'a> {
    pub high_score: HighScore,
    pub theme: &'a Theme,
}

/// Renders the single-line HUD and returns the remaining play area above it.
#[must_use]
pub fn render_hud(
    frame: &mut Frame<'_>,
    area: Rect,
    session: &GameSession,
    info: &HudInfo<'_>,
) -> Rect {
    let [play_area, hud_area] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(area);

    let left = format!(
        " Score {:>6}  Level {:>2}  Length {:>2}",
        session.score,
        session.level,
        session.snake.len()
    );
    let right = format!(
        "Landed {:>4}  Best {:>6} ",
        session.grid.landed_blocks(),
        info.high_score.score
    );

    // Pad the middle so the right-hand stats hug the edge.
    let used = left.width() + right.width();
    let padding = usize::from(hud_area.width).saturating_sub(used);

    let line = Line::from(vec![
        Span::raw(left),
        Span::raw(" ".repeat(padding)),
        Span::raw(right),
    ]);
    frame.render_widget(
        Paragraph::new(line).style(Style::default().fg(info.theme.hud_fg)),
        hud_area,
    );

    play_area
}
