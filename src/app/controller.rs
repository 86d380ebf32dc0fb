use crate::config::Config;
use crate::error::Result;
use crate::ui::{run_articles, run_dashboard, run_subscribe, DashboardAction};

/// Coordinates configuration and the TUI flows: the dashboard is home, the
/// subscribe and article screens return there when dismissed.
pub struct AppController {
    config: Config,
}

impl AppController {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub async fn run(self) -> Result<()> {
        if self.config.api_key.is_none() {
            log::warn!(
                "{} is not set; the dashboard will show the default quote set",
                crate::config::API_KEY_VAR
            );
        }

        loop {
            match run_dashboard(&self.config).await? {
                DashboardAction::Subscribe => run_subscribe(&self.config).await?,
                DashboardAction::Articles => run_articles(&self.config).await?,
                DashboardAction::Exit => return Ok(()),
            }
        }
    }
}
