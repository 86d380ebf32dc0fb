pub mod article;
pub mod dashboard;
pub mod subscribe;

pub use article::run_articles;
pub use dashboard::{run_dashboard, DashboardAction};
pub use subscribe::run_subscribe;
