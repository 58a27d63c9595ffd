use anyhow::{Context, Result};
use dotenvy::dotenv;
use fieldkit::config::AppConfig;
use fieldkit::session::InMemorySessionProvider;
use fieldkit::tui::App;
use std::fs::File;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// How long the simulated session restore keeps the spinner up
const RESTORE_DELAY: Duration = Duration::from_millis(300);

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv().ok();

    let cfg = AppConfig::from_env()?;

    // The terminal belongs to the UI, so tracing only goes to a file when asked
    if let Some(path) = &cfg.log_file {
        let file = File::create(path)
            .with_context(|| format!("cannot open log file {}", path.display()))?;
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .init();
    }

    let session = Arc::new(InMemorySessionProvider::loading());
    let restoring = Arc::clone(&session);
    tokio::spawn(async move {
        tokio::time::sleep(RESTORE_DELAY).await;
        restoring.finish_loading();
    });

    // Initialize terminal
    let mut terminal = ratatui::init();
    terminal.clear()?;

    let result = match App::new(session, &cfg) {
        Ok(mut app) => app.run(&mut terminal).await,
        Err(err) => Err(err),
    };

    // Restore terminal
    ratatui::restore();

    result
}
