//! Main TUI application logic.

use super::{board, events, game, timeframe_key, Panel, Theme};
use crate::error::Result;
use crate::services::GameHandle;
use crate::types::{
    GameRecord, GameSnapshot, LeaderboardEntry, Prediction, StartOutcome, TimeFrame,
};
use crossterm::{
    event::KeyEvent,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};
use std::{io, time::Duration};
use tracing::warn;

/// What a key press asks the run loop to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    None,
    Quit,
    Predict(Prediction),
    /// View changed; fetch fresh data.
    Refresh,
}

/// Main TUI application.
pub struct App {
    game: GameHandle,
    round_duration_ms: u64,
    snapshot: Option<GameSnapshot>,
    leaderboard: Vec<LeaderboardEntry>,
    history: Vec<GameRecord>,
    timeframe: TimeFrame,
    panel: Panel,
    status: String,
    theme: Theme,
    should_quit: bool,
}

impl App {
    /// Create a new TUI application.
    pub fn new(game: GameHandle, round_duration: Duration) -> Self {
        Self {
            game,
            round_duration_ms: round_duration.as_millis() as u64,
            snapshot: None,
            leaderboard: Vec::new(),
            history: Vec::new(),
            timeframe: TimeFrame::default(),
            panel: Panel::Leaderboard,
            status: "Press u or d to play".to_string(),
            theme: Theme::default(),
            should_quit: false,
        }
    }

    /// Map a key press to an action, updating local view state.
    pub fn handle_key(&mut self, key: &KeyEvent) -> KeyAction {
        if events::is_quit(key) {
            self.should_quit = true;
            return KeyAction::Quit;
        }

        if events::is_char(key, 'u') {
            return KeyAction::Predict(Prediction::Up);
        }
        if events::is_char(key, 'd') {
            return KeyAction::Predict(Prediction::Down);
        }
        if events::is_char(key, 'h') {
            self.panel = self.panel.toggled();
            return KeyAction::Refresh;
        }

        for timeframe in TimeFrame::all() {
            if events::is_char(key, timeframe_key(timeframe)) {
                self.timeframe = timeframe;
                self.panel = Panel::Leaderboard;
                return KeyAction::Refresh;
            }
        }

        KeyAction::None
    }

    /// Ask the controller to start a round and report the outcome.
    pub async fn predict(&mut self, prediction: Prediction) -> Result<()> {
        self.status = match self.game.start_round(prediction).await? {
            StartOutcome::Started { round } => {
                format!("Called {} at {:.2}", round.prediction, round.start_price)
            }
            StartOutcome::AlreadyPlaying => "Round already in progress".to_string(),
            StartOutcome::FeedNotReady => "Waiting for the first price".to_string(),
        };
        Ok(())
    }

    /// Pull fresh state from the controller.
    pub async fn refresh(&mut self) -> Result<()> {
        let snapshot = self.game.snapshot().await?;

        if let Some(previous) = &self.snapshot {
            if previous.stats.total_games < snapshot.stats.total_games {
                self.history = self.game.history().await?;
                if let Some(last) = self.history.last() {
                    self.status = format!(
                        "{} {:.2} -> {:.2}: {}",
                        last.prediction, last.start_price, last.end_price, last.result
                    );
                }
            }
        }
        if self.snapshot.is_none() {
            self.history = self.game.history().await?;
        }

        self.snapshot = Some(snapshot);
        self.leaderboard = self.game.leaderboard(self.timeframe).await?;
        Ok(())
    }

    pub fn timeframe(&self) -> TimeFrame {
        self.timeframe
    }

    pub fn panel(&self) -> Panel {
        self.panel
    }

    /// Check if the app should quit.
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Render the TUI.
    pub fn render(&self, frame: &mut Frame) {
        let area = frame.size();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(8), // Price, round, stats
                Constraint::Min(0),    // Leaderboard or history
                Constraint::Length(3), // Status bar
            ])
            .split(area);

        match &self.snapshot {
            Some(snapshot) => {
                game::render(frame, chunks[0], snapshot, self.round_duration_ms, &self.theme)
            }
            None => {
                let loading = Paragraph::new("Loading...")
                    .style(self.theme.muted())
                    .block(Block::default().borders(Borders::ALL));
                frame.render_widget(loading, chunks[0]);
            }
        }

        match self.panel {
            Panel::Leaderboard => board::render_leaderboard(
                frame,
                chunks[1],
                &self.leaderboard,
                self.timeframe,
                &self.theme,
            ),
            Panel::History => board::render_history(frame, chunks[1], &self.history, &self.theme),
        }

        self.render_status_bar(frame, chunks[2]);
    }

    /// Render status bar.
    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let text = Line::from(vec![
            Span::styled("BNB 3s", self.theme.title()),
            Span::raw(" | "),
            Span::raw(self.status.as_str()),
            Span::raw(" | "),
            Span::styled("u/d", self.theme.muted()),
            Span::raw(" predict "),
            Span::styled("1-3", self.theme.muted()),
            Span::raw(" timeframe "),
            Span::styled("h", self.theme.muted()),
            Span::raw(format!(" {} ", self.panel.toggled().name().to_lowercase())),
            Span::styled("q", self.theme.muted()),
            Span::raw(" quit"),
        ]);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border());

        frame.render_widget(block, area);

        let inner = Rect {
            x: area.x + 2,
            y: area.y + 1,
            width: area.width.saturating_sub(4),
            height: 1,
        };

        frame.render_widget(text, inner);
    }
}

/// Run the TUI application.
pub async fn run_tui(game: GameHandle, round_duration: Duration) -> io::Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(game, round_duration);
    let mut event_handler = events::EventHandler::new(Duration::from_millis(100));

    if let Err(e) = app.refresh().await {
        warn!("Initial refresh failed: {}", e);
    }

    loop {
        terminal.draw(|f| app.render(f))?;

        let Some(event) = event_handler.next().await else {
            break;
        };

        let result = match event {
            events::Event::Key(key) => match app.handle_key(&key) {
                KeyAction::Predict(prediction) => app.predict(prediction).await,
                KeyAction::Refresh => app.refresh().await,
                KeyAction::Quit | KeyAction::None => Ok(()),
            },
            events::Event::Tick => app.refresh().await,
            events::Event::Resize(_, _) => Ok(()),
        };
        if let Err(e) = result {
            warn!("TUI update failed: {}", e);
        }

        if app.should_quit() {
            break;
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    Ok(())
}
