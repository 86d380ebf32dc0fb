use chrono::{DateTime, Local};

use crate::error::Result;
use crate::fetch::Quote;

/// Static fallback shown before the first fetch and after any failed one.
/// Always rendered as a complete set; live data replaces it wholesale.
pub fn default_quotes() -> Vec<Quote> {
    vec![
        Quote {
            symbol: "AAPL".to_string(),
            price: 175.04,
            change: 2.32,
            change_percent: 1.34,
        },
        Quote {
            symbol: "TSLA".to_string(),
            price: 242.84,
            change: -1.37,
            change_percent: -0.56,
        },
        Quote {
            symbol: "NVDA".to_string(),
            price: 131.26,
            change: 3.97,
            change_percent: 3.12,
        },
    ]
}

/// Render state owned by one mounted dashboard instance.
#[derive(Debug, Clone)]
pub struct TickerState {
    /// Complete, renderable quote set: the last successful fetch or the
    /// default set. Never empty, never partially populated.
    pub quotes: Vec<Quote>,
    pub is_loading: bool,
    pub error: Option<String>,
    pub last_updated: Option<DateTime<Local>>,
}

/// Handle tied to one fetch cycle. Results presented with a stale ticket
/// are discarded, which is how late resolutions after shutdown stay inert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
}

/// State machine behind the trending-tickers widget.
pub struct TickerBoard {
    state: TickerState,
    generation: u64,
    shut_down: bool,
}

impl TickerBoard {
    pub fn new() -> Self {
        Self {
            state: TickerState {
                quotes: default_quotes(),
                is_loading: true,
                error: None,
                last_updated: None,
            },
            generation: 0,
            shut_down: false,
        }
    }

    pub fn state(&self) -> &TickerState {
        &self.state
    }

    /// Start a fetch cycle. Any ticket from an earlier cycle becomes stale.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.generation += 1;
        FetchTicket {
            generation: self.generation,
        }
    }

    /// Reconcile a settled fetch into the displayed state.
    ///
    /// Success replaces the quote set wholesale; failure reverts to the
    /// default set and records the failure text. Stale tickets and results
    /// arriving after shutdown are dropped without touching the state.
    pub fn apply(&mut self, ticket: FetchTicket, result: Result<Vec<Quote>>) {
        if self.shut_down || ticket.generation != self.generation {
            log::debug!("discarding quote result from a stale fetch cycle");
            return;
        }

        match result {
            // An empty set is not renderable; treat it like a failed cycle so
            // the displayed quotes are never empty.
            Ok(quotes) if quotes.is_empty() => {
                log::warn!("quote refresh returned an empty set");
                self.state.quotes = default_quotes();
                self.state.error = Some("quote refresh returned no data".to_string());
            }
            Ok(quotes) => {
                self.state.quotes = quotes;
                self.state.error = None;
                self.state.last_updated = Some(Local::now());
            }
            Err(err) => {
                log::warn!("quote refresh failed: {}", err);
                self.state.quotes = default_quotes();
                self.state.error = Some(err.to_string());
            }
        }
        self.state.is_loading = false;
    }

    /// Deactivate the board. No further state transition can occur.
    pub fn shut_down(&mut self) {
        self.shut_down = true;
    }
}

impl Default for TickerBoard {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    fn live_quote(symbol: &str, price: f64) -> Quote {
        Quote {
            symbol: symbol.to_string(),
            price,
            change: 1.0,
            change_percent: 0.5,
        }
    }

    #[test]
    fn starts_loading_with_default_set() {
        let board = TickerBoard::new();
        let state = board.state();

        assert!(state.is_loading);
        assert!(state.error.is_none());
        assert_eq!(state.quotes.len(), 3);
        assert_eq!(state.quotes[0].symbol, "AAPL");
    }

    #[test]
    fn success_replaces_whole_set() {
        let mut board = TickerBoard::new();
        let ticket = board.begin_fetch();

        board.apply(ticket, Ok(vec![live_quote("AAPL", 180.0)]));

        let state = board.state();
        assert!(!state.is_loading);
        assert!(state.error.is_none());
        assert_eq!(state.quotes.len(), 1);
        assert!((state.quotes[0].price - 180.0).abs() < 1e-9);
        assert!(state.last_updated.is_some());
    }

    #[test]
    fn failure_reverts_to_default_set_with_error() {
        let mut board = TickerBoard::new();

        let ticket = board.begin_fetch();
        board.apply(ticket, Ok(vec![live_quote("AAPL", 180.0)]));

        let ticket = board.begin_fetch();
        board.apply(
            ticket,
            Err(AppError::ProviderError("Invalid API call".to_string())),
        );

        let state = board.state();
        assert!(!state.is_loading);
        assert_eq!(state.quotes.len(), 3);
        assert_eq!(state.quotes[1].symbol, "TSLA");
        assert!(state.error.as_deref().unwrap().contains("Invalid API call"));
    }

    #[test]
    fn stale_ticket_is_discarded() {
        let mut board = TickerBoard::new();

        let stale = board.begin_fetch();
        let current = board.begin_fetch();
        board.apply(current, Ok(vec![live_quote("NVDA", 140.0)]));

        board.apply(stale, Ok(vec![live_quote("AAPL", 1.0)]));

        assert_eq!(board.state().quotes[0].symbol, "NVDA");
    }

    #[test]
    fn no_mutation_after_shutdown() {
        let mut board = TickerBoard::new();
        let ticket = board.begin_fetch();

        board.shut_down();
        board.apply(ticket, Ok(vec![live_quote("AAPL", 999.0)]));

        let state = board.state();
        assert!(state.is_loading);
        assert_eq!(state.quotes.len(), 3);
        assert!((state.quotes[0].price - 175.04).abs() < 1e-9);
    }

    #[test]
    fn displayed_set_is_never_empty() {
        let mut board = TickerBoard::new();
        assert!(!board.state().quotes.is_empty());

        let ticket = board.begin_fetch();
        board.apply(ticket, Err(AppError::ApiKeyMissing));
        assert!(!board.state().quotes.is_empty());
    }

    #[test]
    fn empty_success_reverts_to_default_set() {
        let mut board = TickerBoard::new();
        let ticket = board.begin_fetch();

        board.apply(ticket, Ok(Vec::new()));

        let state = board.state();
        assert!(!state.is_loading);
        assert_eq!(state.quotes.len(), 3);
        assert!(state.error.is_some());
    }
}
