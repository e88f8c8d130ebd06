use std::io;
use std::panic;
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::cursor::{Hide, Show};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use snakefall::config::{
    GameConfig, GridSize, Theme, DEFAULT_GRID_HEIGHT, DEFAULT_GRID_WIDTH, FRAME_INTERVAL_MS,
    THEMES, THEME_CLASSIC,
};
use snakefall::game::{GameEvent, GameSession, GameStatus};
use snakefall::input::InputHandler;
use snakefall::renderer;
use snakefall::score::{load_high_score, save_high_score, HighScore};
use snakefall::ui::hud::HudInfo;

#[derive(Debug, Parser)]
#[command(version, about = "Snake that stacks: eat, fall, clear lines")]
struct Cli {
    /// Seed the session RNG for a reproducible run.
    #[arg(long)]
    seed: Option<u64>,

    /// Playfield width in cells.
    #[arg(long, default_value_t = DEFAULT_GRID_WIDTH)]
    grid_width: u16,

    /// Playfield height in cells.
    #[arg(long, default_value_t = DEFAULT_GRID_HEIGHT)]
    grid_height: u16,

    /// Color theme name (classic, ocean, neon).
    #[arg(long, default_value = "classic")]
    theme: String,
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    let theme = theme_by_name(&cli.theme);

    let mut high_score = match load_high_score() {
        Ok(high) => high,
        Err(error) => {
            eprintln!("Warning: could not read high score file: {error}");
            HighScore::default()
        }
    };

    install_panic_hook();
    let outcome = run(&cli, theme, &mut high_score);
    cleanup_terminal()?;

    for warning in outcome? {
        eprintln!("{warning}");
    }
    Ok(())
}

fn run(cli: &Cli, theme: &Theme, high_score: &mut HighScore) -> io::Result<Vec<String>> {
    let config = GameConfig::with_grid(GridSize {
        width: cli.grid_width,
        height: cli.grid_height,
    });
    let mut session = match cli.seed {
        Some(seed) => GameSession::new_with_seed(config, seed),
        None => GameSession::new(config),
    };

    let mut terminal = setup_terminal()?;
    let mut input = InputHandler::new();
    let mut warnings = Vec::new();
    let mut last_frame = Instant::now();

    loop {
        let now = Instant::now();
        let delta_ms = now.duration_since(last_frame).as_secs_f64() * 1000.0;
        last_frame = now;

        let frame_input = input.poll_frame(now)?;
        if frame_input.force_quit {
            break;
        }
        if frame_input.quit
            && matches!(session.status, GameStatus::MainMenu | GameStatus::GameOver)
        {
            break;
        }

        let session_ended = session
            .tick(delta_ms, frame_input)
            .contains(&GameEvent::GameOver);

        if session.status != GameStatus::Playing {
            input.reset_hold();
        }

        if session_ended && session.score > high_score.score {
            *high_score = HighScore {
                score: session.score,
                level: high_score.level.max(session.level),
            };
            if let Err(error) = save_high_score(*high_score) {
                warnings.push(format!("Failed to save high score: {error}"));
            }
        }

        let hud_info = HudInfo {
            high_score: *high_score,
            theme,
        };
        terminal.draw(|frame| renderer::render(frame, &session, hud_info))?;

        thread::sleep(Duration::from_millis(FRAME_INTERVAL_MS));
    }

    Ok(warnings)
}

fn theme_by_name(name: &str) -> &'static Theme {
    THEMES
        .iter()
        .find(|theme| theme.name.eq_ignore_ascii_case(name))
        .unwrap_or(&THEME_CLASSIC)
}

fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;

    let mut stdout = io::stdout();
    if let Err(error) = execute!(stdout, EnterAlternateScreen, Hide) {
        let _ = disable_raw_mode();
        return Err(error);
    }

    Terminal::new(CrosstermBackend::new(stdout))
}

fn cleanup_terminal() -> io::Result<()> {
    disable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, Show, LeaveAlternateScreen)?;

    Ok(())
}

fn install_panic_hook() {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |panic_info| {
        restore_terminal_after_panic();
        default_hook(panic_info);
    }));
}

fn restore_terminal_after_panic() {
    let _ = disable_raw_mode();

    let mut stdout = io::stdout();
    let _ = execute!(stdout, Show, LeaveAlternateScreen);
}
