use anyhow::{Context, Result};
use course_catalog::api::CourseClient;
use course_catalog::config::Config;
use course_catalog::logging;
use course_catalog::theme::{self, Theme, ThemeStore};
use course_catalog::ui::App;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = Config::load().context("Failed to load configuration")?;
    logging::init(&config).context("Failed to initialize logging")?;

    // Initialize API client
    let client = CourseClient::new(&config).context("Failed to create HTTP client")?;

    let theme = Theme::initialize(ThemeStore::new(), theme::system_prefers_dark());

    // Start TUI application
    let mut app = App::new(Arc::new(client), theme);
    app.run().await?;

    Ok(())
}
