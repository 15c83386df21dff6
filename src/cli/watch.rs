//! Watch command implementation - Interactive TUI viewer.
//!
//! Drives a simulation from the wall clock. Unless spectating, seat 1 is a
//! human played from the keyboard: move the cursor over the territory list,
//! press Enter on an owned territory to select it, then press Enter on a
//! highlighted neighbour to launch half its units.

// Map coordinates and list windows are small
#![allow(clippy::cast_possible_truncation)]

use super::{CliError, GameOptions};
use conquest::{
    Driver, GameConfig, GameOutcome, GameStatus, PlayerId, Simulation, Snapshot, SystemClock,
    TerritoryId, TickReport,
};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Circle, Line as CanvasLine},
        Block, Borders, Paragraph,
    },
    Frame, Terminal,
};
use std::io::stdout;
use std::path::Path;
use std::time::Duration;

/// Seat controlled from the keyboard.
const HUMAN: PlayerId = 0;

/// Execute the watch command.
///
/// # Errors
///
/// Returns an error if the config is invalid or the TUI fails.
pub(crate) fn execute(
    game: &GameOptions,
    config_path: Option<&Path>,
    spectate: bool,
) -> Result<(), CliError> {
    let config = if spectate {
        game.resolve(config_path, 0, 4)?
    } else {
        game.resolve(config_path, 1, 3)?
    };
    let human = config
        .players
        .first()
        .filter(|p| !spectate && !p.is_bot)
        .map(|_| HUMAN);

    let simulation = Simulation::new(&config)?;
    let app = App::new(Driver::new(simulation, SystemClock::new()), config, human);
    run_tui(app)
}

/// App state for the TUI.
struct App {
    driver: Driver<SystemClock>,
    config: GameConfig,
    human: Option<PlayerId>,
    cursor: TerritoryId,
    message: String,
}

impl App {
    fn new(driver: Driver<SystemClock>, config: GameConfig, human: Option<PlayerId>) -> Self {
        let mut app = Self {
            driver,
            config,
            human,
            cursor: 0,
            message: String::new(),
        };
        app.reset_cursor();
        app
    }

    fn simulation(&self) -> &Simulation {
        self.driver.simulation()
    }

    fn reset_cursor(&mut self) {
        let state = self.driver.simulation().state();
        self.cursor = self
            .human
            .and_then(|h| state.territories.owned_by(h).next().map(|(id, _)| id))
            .unwrap_or(0);
    }

    fn move_cursor(&mut self, forward: bool) {
        let len = self.simulation().state().territories.len();
        if len == 0 {
            return;
        }
        self.cursor = if forward {
            (self.cursor + 1) % len
        } else {
            (self.cursor + len - 1) % len
        };
    }

    /// Jump to the next launch target after the cursor, if any.
    fn next_target(&mut self) {
        let Some(human) = self.human else { return };
        let targets = self.simulation().targets(human);
        let after = targets.iter().find(|&&t| t > self.cursor);
        if let Some(&next) = after.or_else(|| targets.first()) {
            self.cursor = next;
        }
    }

    fn command(&mut self) {
        let Some(human) = self.human else { return };
        let cursor = self.cursor;
        let selected = self.simulation().selected(human);
        if self.driver.simulation_mut().command(human, cursor) {
            if let Some(from) = selected {
                self.message = format!("Attack #{from} -> #{cursor}");
            }
        } else if self.simulation().selected(human) == Some(cursor) {
            self.message = format!("Selected #{cursor}");
            self.next_target();
        }
    }

    fn toggle_pause(&mut self) {
        let paused = self.driver.is_paused();
        self.driver.set_paused(!paused);
    }

    fn restart(&mut self) -> Result<(), CliError> {
        self.config.seed = self.config.seed.wrapping_add(1);
        self.driver.replace(Simulation::new(&self.config)?);
        self.driver.set_paused(false);
        self.message = format!("New game, seed {}", self.config.seed);
        self.reset_cursor();
        Ok(())
    }

    fn note(&mut self, report: &TickReport) {
        let names = |id: PlayerId| {
            self.config
                .players
                .get(usize::from(id))
                .map_or_else(|| format!("Player {id}"), |p| p.name.clone())
        };
        if let Some(&id) = report.eliminated.last() {
            self.message = format!("{} was eliminated", names(id));
        }
        match report.outcome {
            Some(GameOutcome::Winner(id)) => self.message = format!("{} wins!", names(id)),
            Some(GameOutcome::Draw) => self.message = "Draw".to_string(),
            None => {}
        }
    }
}

fn run_tui(mut app: App) -> Result<(), CliError> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut App,
) -> Result<(), CliError> {
    loop {
        let report = app.driver.pump();
        app.note(&report);

        let snapshot = app.simulation().snapshot();
        terminal.draw(|f| ui(f, &*app, &snapshot))?;

        if event::poll(Duration::from_millis(33))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => break,
                KeyCode::Char(' ') => app.toggle_pause(),
                KeyCode::Down | KeyCode::Char('j') => app.move_cursor(true),
                KeyCode::Up | KeyCode::Char('k') => app.move_cursor(false),
                KeyCode::Tab => app.next_target(),
                KeyCode::Enter => app.command(),
                KeyCode::Char('r') => app.restart()?,
                _ => {}
            }
        }
    }

    Ok(())
}

fn ui(f: &mut Frame, app: &App, snapshot: &Snapshot) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),  // Header
            Constraint::Min(10),    // Main content
            Constraint::Length(3),  // Footer
        ])
        .split(f.area());

    render_header(f, chunks[0], app, snapshot);

    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(chunks[1]);

    render_map(f, main_chunks[0], app, snapshot);

    let side_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(6), Constraint::Length(snapshot.players.len() as u16 + 2)])
        .split(main_chunks[1]);

    render_territories(f, side_chunks[0], app, snapshot);
    render_players(f, side_chunks[1], snapshot);
    render_footer(f, chunks[2], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App, snapshot: &Snapshot) {
    let status = match snapshot.status {
        GameStatus::Ended(_) => "GAME OVER",
        GameStatus::Stopped => "STOPPED",
        GameStatus::Active if app.driver.is_paused() => "PAUSED",
        GameStatus::Active => "RUNNING",
    };
    let seconds = snapshot.elapsed_ms / 1000;

    let title = format!(
        " Conquest | Seed {} | {}:{:02} | {} | {} ",
        app.config.seed,
        seconds / 60,
        seconds % 60,
        status,
        app.message
    );

    let header = Paragraph::new(title)
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(header, area);
}

fn render_map(f: &mut Frame, area: Rect, app: &App, snapshot: &Snapshot) {
    let width = app.config.map.width;
    let height = app.config.map.height;
    let selected = app.human.and_then(|h| app.simulation().selected(h));

    let canvas = Canvas::default()
        .block(Block::default().borders(Borders::ALL).title(" Map "))
        .marker(Marker::Braille)
        .x_bounds([0.0, width])
        .y_bounds([0.0, height])
        .paint(|ctx| {
            // Map y grows downwards, canvas y grows upwards
            for t in &snapshot.territories {
                for &other in t.connections.iter().filter(|&&o| o > t.id) {
                    if let Some(o) = snapshot.territories.get(other) {
                        ctx.draw(&CanvasLine::new(
                            t.position.x,
                            height - t.position.y,
                            o.position.x,
                            height - o.position.y,
                            Color::DarkGray,
                        ));
                    }
                }
            }
            ctx.layer();

            for t in &snapshot.territories {
                let color = owner_color(snapshot, t.owner);
                ctx.draw(&Circle {
                    x: t.position.x,
                    y: height - t.position.y,
                    radius: t.radius,
                    color: if Some(t.id) == selected { Color::White } else { color },
                });
            }
            for a in &snapshot.attacks {
                ctx.draw(&Circle {
                    x: a.position.x,
                    y: height - a.position.y,
                    radius: 6.0,
                    color: owner_color(snapshot, Some(a.owner)),
                });
            }
            ctx.layer();

            for t in &snapshot.territories {
                let mut style = Style::default().fg(owner_color(snapshot, t.owner));
                if t.id == app.cursor {
                    style = style.add_modifier(Modifier::REVERSED);
                }
                ctx.print(
                    t.position.x,
                    height - t.position.y,
                    Span::styled(t.units.to_string(), style),
                );
            }
        });

    f.render_widget(canvas, area);
}

fn render_territories(f: &mut Frame, area: Rect, app: &App, snapshot: &Snapshot) {
    let (selected, targets) = app.human.map_or((None, Vec::new()), |h| {
        (app.simulation().selected(h), app.simulation().targets(h))
    });

    let rows = usize::from(area.height.saturating_sub(2)).max(1);
    let first = app
        .cursor
        .saturating_sub(rows / 2)
        .min(snapshot.territories.len().saturating_sub(rows));

    let lines: Vec<Line> = snapshot
        .territories
        .iter()
        .skip(first)
        .take(rows)
        .map(|t| {
            let mark = if Some(t.id) == selected {
                '*'
            } else if targets.contains(&t.id) {
                '+'
            } else {
                ' '
            };
            let holder = t
                .owner
                .and_then(|id| snapshot.players.get(usize::from(id)))
                .map_or("neutral", |p| p.name.as_str());
            let mut style = Style::default().fg(owner_color(snapshot, t.owner));
            if t.id == app.cursor {
                style = style.add_modifier(Modifier::REVERSED);
            }
            Line::from(Span::styled(
                format!("{mark}#{:<3} {:<10} {:>3}/{}", t.id, holder, t.units, t.max_units),
                style,
            ))
        })
        .collect();

    let widget = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Territories "));
    f.render_widget(widget, area);
}

fn render_players(f: &mut Frame, area: Rect, snapshot: &Snapshot) {
    let lines: Vec<Line> = snapshot
        .players
        .iter()
        .map(|p| {
            let color = parse_color(&p.color);
            let status = if p.alive {
                format!("{} terr, {} units", p.territories, p.units)
            } else {
                "[ELIMINATED]".to_string()
            };
            Line::from(vec![
                Span::styled(
                    format!("{:<10} ", p.name),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
                Span::raw(status),
            ])
        })
        .collect();

    let widget =
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Players "));
    f.render_widget(widget, area);
}

fn render_footer(f: &mut Frame, area: Rect, app: &App) {
    let controls = if app.human.is_some() {
        " [q] Quit  [Space] Pause  [↑/↓] Cursor  [Tab] Next target  [Enter] Select/Attack  [r] New game "
    } else {
        " [q] Quit  [Space] Pause  [↑/↓] Cursor  [r] New game "
    };

    let footer = Paragraph::new(controls)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(footer, area);
}

fn owner_color(snapshot: &Snapshot, owner: Option<PlayerId>) -> Color {
    owner
        .and_then(|id| snapshot.players.get(usize::from(id)))
        .map_or(Color::DarkGray, |p| parse_color(&p.color))
}

/// Parse a `#rrggbb` color, falling back to white.
fn parse_color(hex: &str) -> Color {
    let rgb = hex
        .strip_prefix('#')
        .filter(|h| h.len() == 6)
        .and_then(|h| u32::from_str_radix(h, 16).ok());
    match rgb {
        Some(v) => Color::Rgb((v >> 16) as u8, (v >> 8) as u8, v as u8),
        None => Color::White,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("#3b82f6"), Color::Rgb(0x3b, 0x82, 0xf6));
        assert_eq!(parse_color("3b82f6"), Color::White);
        assert_eq!(parse_color("#xyz"), Color::White);
    }
}
