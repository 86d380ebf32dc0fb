use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyModifiers};
use ratatui::{prelude::*, widgets::*};
use tokio::task::JoinHandle;

use crate::app::ticker::{FetchTicket, TickerBoard, TickerState};
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::fetch::{Quote, QuoteFetcher};
use crate::ui::{components, styles, text, TerminalGuard};

/// Where the user wants to go next after leaving the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardAction {
    Subscribe,
    Articles,
    Exit,
}

type InFlightFetch = (FetchTicket, JoinHandle<Result<Vec<Quote>>>);

/// Tracks when the next fetch cycle is due. The deadline is measured from
/// when an attempt starts, not when it settles, so a slow cycle does not
/// push the cadence back.
struct RefreshSchedule {
    interval: Duration,
    next: Instant,
}

impl RefreshSchedule {
    fn new(interval: Duration) -> Self {
        Self {
            interval,
            next: Instant::now(),
        }
    }

    fn due(&self, now: Instant) -> bool {
        now >= self.next
    }

    fn mark_started(&mut self, now: Instant) {
        self.next = now + self.interval;
    }

    fn request_now(&mut self, now: Instant) {
        self.next = now;
    }
}

/// Trending-tickers dashboard: fetches on activation and then every refresh
/// interval, reverting to the default quote set when a cycle fails. Leaving
/// the screen shuts the board down and aborts any in-flight fetch, so a late
/// resolution can no longer touch the state.
pub async fn run_dashboard(config: &Config) -> Result<DashboardAction> {
    let fetcher = Arc::new(QuoteFetcher::new(config));
    let symbols = Arc::new(config.symbols.clone());

    let mut board = TickerBoard::new();
    let mut in_flight: Option<InFlightFetch> = None;
    let mut schedule = RefreshSchedule::new(config.refresh_interval);

    let mut guard = TerminalGuard::new()?;

    let action = loop {
        // At most one fetch cycle at a time; a hung request delays its own
        // cycle, and an overdue deadline fires as soon as it settles.
        if in_flight.is_none() && schedule.due(Instant::now()) {
            let ticket = board.begin_fetch();
            schedule.mark_started(Instant::now());
            let fetcher = Arc::clone(&fetcher);
            let symbols = Arc::clone(&symbols);
            let handle = tokio::spawn(async move { fetcher.fetch_quotes(&symbols).await });
            in_flight = Some((ticket, handle));
        }

        if let Some((ticket, handle)) = in_flight.take() {
            if handle.is_finished() {
                let result = match handle.await {
                    Ok(result) => result,
                    Err(err) => Err(AppError::from(err)),
                };
                board.apply(ticket, result);
            } else {
                in_flight = Some((ticket, handle));
            }
        }

        guard.terminal_mut().draw(|f| draw(f, board.state()))?;

        if event::poll(Duration::from_millis(200))? {
            if let Event::Key(k) = event::read()? {
                match k.code {
                    KeyCode::Char('s') => break DashboardAction::Subscribe,
                    KeyCode::Char('a') => break DashboardAction::Articles,
                    KeyCode::Char('r') => {
                        if in_flight.is_none() {
                            schedule.request_now(Instant::now());
                        }
                    }
                    KeyCode::Esc | KeyCode::Char('q') => break DashboardAction::Exit,
                    KeyCode::Char('c') if k.modifiers.contains(KeyModifiers::CONTROL) => {
                        break DashboardAction::Exit
                    }
                    _ => {}
                }
            }
        }
    };

    board.shut_down();
    if let Some((_, handle)) = in_flight.take() {
        handle.abort();
    }

    guard.restore()?;
    Ok(action)
}

fn draw(f: &mut Frame, state: &TickerState) {
    let chunks = components::split_vertical(
        f.size(),
        &[
            Constraint::Length(2),
            Constraint::Min(1),
            Constraint::Length(1),
        ],
    );

    let header = Paragraph::new("FinList — Trending Tickers").style(styles::header_style());
    f.render_widget(header, chunks[0]);

    if state.is_loading {
        let area = components::centered_rect(50, 20, chunks[1]);
        let loading = Paragraph::new("Loading quotes...")
            .style(styles::hint_style())
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(loading, area);
    } else {
        let rows: Vec<Row> = state
            .quotes
            .iter()
            .map(|quote| {
                Row::new(vec![
                    Cell::from(quote.symbol.clone())
                        .style(Style::default().add_modifier(Modifier::BOLD)),
                    Cell::from(text::format_price(quote.price)),
                    Cell::from(text::format_change(quote.change))
                        .style(styles::change_style(quote.change_percent)),
                    Cell::from(format!(
                        "{} {}",
                        text::direction_arrow(quote),
                        text::format_percent(quote.change_percent)
                    ))
                    .style(styles::change_style(quote.change_percent)),
                ])
            })
            .collect();

        let title = match state.error {
            // Live fetch failed; the static default set is on display.
            Some(_) => "Tickers (showing defaults)".to_string(),
            None => match &state.last_updated {
                Some(stamp) => format!("Tickers (updated {})", stamp.format("%H:%M:%S")),
                None => "Tickers".to_string(),
            },
        };

        let table = Table::new(
            rows,
            [
                Constraint::Length(8),
                Constraint::Length(10),
                Constraint::Length(10),
                Constraint::Length(12),
            ],
        )
        .header(
            Row::new(["Symbol", "Price", "Change", "Change %"])
                .style(Style::default().add_modifier(Modifier::BOLD)),
        )
        .block(Block::default().borders(Borders::ALL).title(title))
        .column_spacing(2);
        f.render_widget(table, chunks[1]);
    }

    let help = Paragraph::new("s subscribe • a articles • r refresh • q quit")
        .style(styles::hint_style());
    f.render_widget(help, chunks[2]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deadline_runs_from_attempt_start_not_settle() {
        let t0 = Instant::now();
        let mut schedule = RefreshSchedule {
            interval: Duration::from_secs(60),
            next: t0,
        };

        assert!(schedule.due(t0));
        schedule.mark_started(t0);

        // A cycle settling late does not move the deadline; it stays one
        // interval after the attempt began.
        assert!(!schedule.due(t0 + Duration::from_secs(59)));
        assert!(schedule.due(t0 + Duration::from_secs(60)));
    }

    #[test]
    fn manual_refresh_pulls_deadline_forward() {
        let t0 = Instant::now();
        let mut schedule = RefreshSchedule {
            interval: Duration::from_secs(60),
            next: t0,
        };
        schedule.mark_started(t0);

        let t1 = t0 + Duration::from_secs(5);
        schedule.request_now(t1);
        assert!(schedule.due(t1));
    }
}
