//! Price, round and stats panels.

use super::theme::trend_arrow;
use super::Theme;
use crate::types::{GameSnapshot, RoundPhase};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

/// Render the top half: live price, the round in progress and the stats.
pub fn render(
    frame: &mut Frame,
    area: Rect,
    snapshot: &GameSnapshot,
    round_duration_ms: u64,
    theme: &Theme,
) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(30),
            Constraint::Percentage(35),
            Constraint::Percentage(35),
        ])
        .split(area);

    render_price(frame, chunks[0], snapshot, theme);
    render_round(frame, chunks[1], snapshot, round_duration_ms, theme);
    render_stats(frame, chunks[2], snapshot, theme);
}

fn render_price(frame: &mut Frame, area: Rect, snapshot: &GameSnapshot, theme: &Theme) {
    let sample = snapshot.price;
    let lines = if sample.is_ready() {
        vec![
            Line::from(Span::styled("BNB / USDT", theme.muted())),
            Line::from(""),
            Line::from(vec![
                Span::styled(format!("{:.2} ", sample.price), theme.trend(sample.trend)),
                Span::styled(trend_arrow(sample.trend), theme.trend(sample.trend)),
            ]),
        ]
    } else {
        vec![
            Line::from(Span::styled("BNB / USDT", theme.muted())),
            Line::from(""),
            Line::from(Span::styled("Waiting for price...", theme.muted())),
        ]
    };

    let block = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Price")
            .border_style(theme.border()),
    );
    frame.render_widget(block, area);
}

fn render_round(
    frame: &mut Frame,
    area: Rect,
    snapshot: &GameSnapshot,
    round_duration_ms: u64,
    theme: &Theme,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Round")
        .border_style(theme.border());

    match (&snapshot.phase, &snapshot.round) {
        (RoundPhase::Playing, Some(round)) => {
            let ratio = if round_duration_ms == 0 {
                0.0
            } else {
                (snapshot.remaining_ms as f64 / round_duration_ms as f64).clamp(0.0, 1.0)
            };
            let label = format!(
                "{} from {:.2} | {:.1}s",
                round.prediction,
                round.start_price,
                snapshot.remaining_ms as f64 / 1000.0
            );
            let gauge = Gauge::default()
                .block(block)
                .gauge_style(theme.prediction(round.prediction))
                .ratio(ratio)
                .label(label);
            frame.render_widget(gauge, area);
        }
        _ => {
            let lines = vec![
                Line::from(Span::styled("Will BNB go up or down in 3s?", theme.muted())),
                Line::from(""),
                Line::from(vec![
                    Span::styled("[u] ", theme.muted()),
                    Span::styled("UP", theme.prediction(crate::types::Prediction::Up)),
                    Span::raw("   "),
                    Span::styled("[d] ", theme.muted()),
                    Span::styled("DOWN", theme.prediction(crate::types::Prediction::Down)),
                ]),
            ];
            frame.render_widget(Paragraph::new(lines).block(block), area);
        }
    }
}

fn render_stats(frame: &mut Frame, area: Rect, snapshot: &GameSnapshot, theme: &Theme) {
    let stats = &snapshot.stats;
    let summary = &snapshot.summary;
    let player = snapshot
        .user
        .as_ref()
        .map(|u| u.handle.clone())
        .unwrap_or_else(|| "anonymous".to_string());

    let lines = vec![
        Line::from(vec![
            Span::styled("Player: ", theme.muted()),
            Span::raw(player),
        ]),
        Line::from(vec![
            Span::styled("Accuracy: ", theme.muted()),
            Span::raw(format!("{:.2}%", summary.accuracy)),
            Span::styled("  Games: ", theme.muted()),
            Span::raw(stats.total_games.to_string()),
        ]),
        Line::from(vec![
            Span::styled("W/L/D: ", theme.muted()),
            Span::raw(format!("{}/{}/{}", stats.wins, stats.losses, stats.draws)),
        ]),
        Line::from(vec![
            Span::styled("Streak: ", theme.muted()),
            Span::raw(format!("{} (best {})", stats.current_streak, stats.max_streak)),
        ]),
        Line::from(vec![
            Span::styled("UP: ", theme.muted()),
            Span::raw(format!("{} ({:.1}%)", stats.up_count, summary.up_win_rate)),
            Span::styled("  DOWN: ", theme.muted()),
            Span::raw(format!("{} ({:.1}%)", stats.down_count, summary.down_win_rate)),
        ]),
    ];

    let block = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Stats")
            .border_style(theme.border()),
    );
    frame.render_widget(block, area);
}
