use reqwest::Client;
use serde::Deserialize;

use crate::config::Config;
use crate::error::AppError;
use crate::fetch::FetchResult;

/// A published newsletter article as served by the backend.
#[derive(Debug, Clone, Deserialize)]
pub struct Article {
    pub article_name: String,
    pub sector: String,
    pub author: String,
    /// Markdown body, rendered read-only by the viewer.
    #[serde(default)]
    pub content: String,
}

/// Entry in the article index; `slug` keys the by-slug lookup.
#[derive(Debug, Clone, Deserialize)]
pub struct ArticleSummary {
    pub article_name: String,
    pub sector: String,
    pub author: String,
    pub slug: String,
}

#[derive(Clone)]
pub struct ArticleClient {
    base_url: String,
    client: Client,
}

impl ArticleClient {
    pub fn new(config: &Config) -> Self {
        Self {
            base_url: config.backend_base_url.clone(),
            client: Client::new(),
        }
    }

    pub async fn fetch_articles(&self) -> FetchResult<Vec<ArticleSummary>> {
        let url = format!("{}/get_articles", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| AppError::Fetch(err.to_string()))?;

        if !response.status().is_success() {
            return Err(AppError::Fetch(format!(
                "article index request failed with status {}",
                response.status()
            )));
        }

        response
            .json::<Vec<ArticleSummary>>()
            .await
            .map_err(|err| AppError::Fetch(err.to_string()))
    }

    pub async fn fetch_article_by_slug(&self, slug: &str) -> FetchResult<Article> {
        let url = format!("{}/get_article_by_slug/{}", self.base_url, slug);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| AppError::Fetch(err.to_string()))?;

        if !response.status().is_success() {
            return Err(AppError::Fetch(format!(
                "article request for `{}` failed with status {}",
                slug,
                response.status()
            )));
        }

        response
            .json::<Article>()
            .await
            .map_err(|err| AppError::Fetch(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_article_payload() {
        let body = r##"{
            "article_name": "Newsletter Tech - 2025-01-10",
            "sector": "Tech",
            "author": "Research Bot",
            "content": "# AI Outlook\n\nA strong week for chipmakers."
        }"##;

        let article: Article = serde_json::from_str(body).unwrap();
        assert_eq!(article.sector, "Tech");
        assert!(article.content.starts_with("# AI Outlook"));
    }

    #[test]
    fn missing_content_defaults_to_empty() {
        let body = r#"{
            "article_name": "Draft",
            "sector": "Finance",
            "author": "Research Bot"
        }"#;

        let article: Article = serde_json::from_str(body).unwrap();
        assert!(article.content.is_empty());
    }
}
