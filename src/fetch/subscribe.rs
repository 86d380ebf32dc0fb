use reqwest::Client;
use serde::Serialize;

use crate::config::Config;
use crate::error::AppError;
use crate::fetch::FetchResult;

#[derive(Debug, Clone, Serialize)]
pub struct SubscriptionRequest {
    pub email: String,
    pub selected_sectors: Vec<String>,
}

pub struct SubscriptionClient {
    base_url: String,
    client: Client,
}

impl SubscriptionClient {
    pub fn new(config: &Config) -> Self {
        Self {
            base_url: config.backend_base_url.clone(),
            client: Client::new(),
        }
    }

    /// Single insert into the backend's subscriber table. Not retried; the
    /// caller surfaces the outcome as a status line.
    pub async fn submit(&self, request: &SubscriptionRequest) -> FetchResult<()> {
        let url = format!("{}/subscribe", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|err| AppError::Insert(err.to_string()))?;

        if !response.status().is_success() {
            return Err(AppError::Insert(format!(
                "subscription insert failed with status {}",
                response.status()
            )));
        }

        log::info!("subscription recorded for {}", request.email);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_insert_payload() {
        let request = SubscriptionRequest {
            email: "reader@example.com".to_string(),
            selected_sectors: vec!["tech".to_string(), "finance".to_string()],
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["email"], "reader@example.com");
        assert_eq!(value["selected_sectors"][1], "finance");
    }
}
