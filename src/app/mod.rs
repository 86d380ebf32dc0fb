pub mod bootstrap;
pub mod controller;
pub mod subscription;
pub mod ticker;

pub use controller::AppController;
pub use subscription::SubscriptionForm;
pub use ticker::{default_quotes, FetchTicket, TickerBoard, TickerState};
