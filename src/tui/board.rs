//! Leaderboard and history tables.

use super::{timeframe_key, Theme};
use crate::types::{GameRecord, LeaderboardEntry, TimeFrame};
use chrono::{Local, TimeZone};
use ratatui::{
    layout::{Constraint, Rect},
    widgets::{Block, Borders, Cell, Row, Table},
    Frame,
};

/// Most recent records shown in the history panel.
const HISTORY_ROWS: usize = 50;

pub fn render_leaderboard(
    frame: &mut Frame,
    area: Rect,
    entries: &[LeaderboardEntry],
    timeframe: TimeFrame,
    theme: &Theme,
) {
    let header = Row::new(vec!["#", "Player", "Accuracy", "Games", "W/L", "Streak", "Active"])
        .style(theme.header());

    let rows: Vec<Row> = entries
        .iter()
        .map(|entry| {
            let row = Row::new(vec![
                Cell::from(entry.rank.to_string()),
                Cell::from(entry.name.clone()),
                Cell::from(format!("{:.2}%", entry.accuracy)),
                Cell::from(entry.total_games.to_string()),
                Cell::from(format!("{}/{}", entry.wins, entry.losses)),
                Cell::from(entry.streak.to_string()),
                Cell::from(entry.last_active.clone()),
            ]);
            if entry.is_current_user {
                row.style(theme.highlight())
            } else {
                row
            }
        })
        .collect();

    let widths = [
        Constraint::Length(4),
        Constraint::Min(14),
        Constraint::Length(10),
        Constraint::Length(7),
        Constraint::Length(10),
        Constraint::Length(7),
        Constraint::Length(10),
    ];

    let tabs: Vec<String> = TimeFrame::all()
        .iter()
        .map(|tf| {
            if *tf == timeframe {
                format!("[{}:{}]", timeframe_key(*tf), tf)
            } else {
                format!(" {}:{} ", timeframe_key(*tf), tf)
            }
        })
        .collect();
    let title = format!(
        "Leaderboard {} (min {} games)",
        tabs.join(""),
        timeframe.min_games()
    );

    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(theme.border()),
    );
    frame.render_widget(table, area);
}

pub fn render_history(frame: &mut Frame, area: Rect, history: &[GameRecord], theme: &Theme) {
    let header = Row::new(vec!["Time", "Call", "Start", "End", "Result"]).style(theme.header());

    let rows: Vec<Row> = history
        .iter()
        .rev()
        .take(HISTORY_ROWS)
        .map(|record| {
            Row::new(vec![
                Cell::from(format_time(record.timestamp)),
                Cell::from(record.prediction.to_string()).style(theme.prediction(record.prediction)),
                Cell::from(format!("{:.2}", record.start_price)),
                Cell::from(format!("{:.2}", record.end_price)),
                Cell::from(record.result.to_string()).style(theme.result(record.result)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(10),
        Constraint::Length(6),
        Constraint::Length(12),
        Constraint::Length(12),
        Constraint::Length(6),
    ];

    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("History ({} games)", history.len()))
            .border_style(theme.border()),
    );
    frame.render_widget(table, area);
}

fn format_time(timestamp_ms: i64) -> String {
    match Local.timestamp_millis_opt(timestamp_ms).single() {
        Some(time) => time.format("%H:%M:%S").to_string(),
        None => "-".to_string(),
    }
}
