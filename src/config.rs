use std::time::Duration;

/// Environment variable holding the Alpha Vantage credential.
pub const API_KEY_VAR: &str = "ALPHA_VANTAGE_API_KEY";

const DEFAULT_QUOTE_BASE_URL: &str = "https://www.alphavantage.co";
const DEFAULT_BACKEND_BASE_URL: &str = "http://localhost:8000";
const DEFAULT_REFRESH_SECS: u64 = 60;

/// Symbols shown on the trending-tickers dashboard.
pub const DEFAULT_SYMBOLS: [&str; 3] = ["AAPL", "TSLA", "NVDA"];

/// A newsletter content category the user can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sector {
    pub id: &'static str,
    pub label: &'static str,
}

/// Catalogue offered on the subscription form.
pub const SECTORS: [Sector; 6] = [
    Sector {
        id: "tech",
        label: "Technology",
    },
    Sector {
        id: "finance",
        label: "Banking & Finance",
    },
    Sector {
        id: "health",
        label: "Healthcare",
    },
    Sector {
        id: "energy",
        label: "Energy & Utilities",
    },
    Sector {
        id: "consumer",
        label: "Consumer Goods",
    },
    Sector {
        id: "real-estate",
        label: "Real Estate",
    },
];

pub fn sector_by_id(id: &str) -> Option<&'static Sector> {
    SECTORS.iter().find(|sector| sector.id == id)
}

#[derive(Debug, Clone)]
pub struct Config {
    pub quote_base_url: String,
    pub api_key: Option<String>,
    pub backend_base_url: String,
    pub refresh_interval: Duration,
    pub symbols: Vec<String>,
}

impl Config {
    /// Builtin defaults with environment overrides layered on top.
    ///
    /// A missing API key is not an error here: the dashboard still starts and
    /// shows the fallback quote set. The key is only required at fetch time.
    pub fn from_env() -> Self {
        let quote_base_url = env_or("FINLIST_QUOTE_URL", DEFAULT_QUOTE_BASE_URL);
        let backend_base_url = env_or("FINLIST_BACKEND_URL", DEFAULT_BACKEND_BASE_URL);

        let api_key = std::env::var(API_KEY_VAR)
            .ok()
            .filter(|value| !value.trim().is_empty());

        let refresh_secs = std::env::var("FINLIST_REFRESH_SECS")
            .ok()
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_REFRESH_SECS);

        Self {
            quote_base_url,
            api_key,
            backend_base_url,
            refresh_interval: Duration::from_secs(refresh_secs),
            symbols: DEFAULT_SYMBOLS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

fn env_or(name: &str, default: &str) -> String {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => value.trim_end_matches('/').to_string(),
        _ => default.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sector_catalogue_lookup() {
        assert_eq!(sector_by_id("tech").map(|s| s.label), Some("Technology"));
        assert!(sector_by_id("crypto").is_none());
    }

    #[test]
    fn sector_ids_are_unique() {
        for (i, sector) in SECTORS.iter().enumerate() {
            assert!(
                SECTORS[i + 1..].iter().all(|other| other.id != sector.id),
                "duplicate sector id {}",
                sector.id
            );
        }
    }
}
