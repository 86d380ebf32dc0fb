use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("quote API key is not configured")]
    ApiKeyMissing,
    #[error("quote request for {symbol} failed with status {status}")]
    HttpError { symbol: String, status: u16 },
    #[error("quote provider error: {0}")]
    ProviderError(String),
    #[error("no quote data available for {0}")]
    NoData(String),
    #[error("invalid subscription: {0}")]
    Validation(String),
    #[error("failed to record subscription: {0}")]
    Insert(String),
    #[error("failed to load article: {0}")]
    Fetch(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),
    #[error(transparent)]
    Join(#[from] tokio::task::JoinError),
    #[error("operation cancelled by user")]
    Cancelled,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taxonomy_messages_name_the_failure() {
        let cases = [
            (AppError::ApiKeyMissing, "quote API key is not configured"),
            (
                AppError::HttpError {
                    symbol: "AAPL".to_string(),
                    status: 503,
                },
                "quote request for AAPL failed with status 503",
            ),
            (
                AppError::ProviderError("Invalid API call".to_string()),
                "quote provider error: Invalid API call",
            ),
            (
                AppError::NoData("TSLA".to_string()),
                "no quote data available for TSLA",
            ),
            (AppError::Cancelled, "operation cancelled by user"),
        ];

        for (err, expected) in cases {
            assert_eq!(err.to_string(), expected);
        }
    }
}
