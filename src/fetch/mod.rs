use crate::error::Result;

pub mod articles;
pub mod quotes;
pub mod subscribe;

pub use articles::{Article, ArticleClient, ArticleSummary};
pub use quotes::{Quote, QuoteFetcher};
pub use subscribe::{SubscriptionClient, SubscriptionRequest};

pub type FetchResult<T> = Result<T>;
