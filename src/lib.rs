pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod fetch;
pub mod ui;

pub use error::{AppError, Result};
