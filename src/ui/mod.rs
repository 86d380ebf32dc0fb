pub mod components;
pub mod screens;
pub mod styles;
pub mod terminal;
pub mod text;

pub use screens::{run_articles, run_dashboard, run_subscribe, DashboardAction};
pub use terminal::TerminalGuard;
