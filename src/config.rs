use anyhow::{Context, Result};
use ratatui::style::Color;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::tui::theme::Theme;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub theme: Theme,
    pub tick_rate: Duration,
    pub log_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            tick_rate: Duration::from_millis(DEFAULT_TICK_MS),
            log_file: None,
        }
    }
}

const DEFAULT_TICK_MS: u64 = 100;
const MIN_TICK_MS: u64 = 10;
const MAX_TICK_MS: u64 = 1000;

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup (the process
    /// environment in production, a map in tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Theme::default();
        let theme = Theme {
            highlight: color_var(&lookup, "FIELDKIT_HIGHLIGHT_COLOR", defaults.highlight),
            muted: color_var(&lookup, "FIELDKIT_MUTED_COLOR", defaults.muted),
            error: color_var(&lookup, "FIELDKIT_ERROR_COLOR", defaults.error),
        };

        // Event poll interval in ms, clamped to 10..=1000
        let tick_ms = match lookup("FIELDKIT_TICK_MS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .with_context(|| format!("FIELDKIT_TICK_MS must be an integer (got '{}')", raw))?,
            None => DEFAULT_TICK_MS,
        };
        let clamped = tick_ms.clamp(MIN_TICK_MS, MAX_TICK_MS);
        if clamped != tick_ms {
            tracing::warn!(
                "FIELDKIT_TICK_MS is set to {}, outside {}..={}. Using {}ms.",
                tick_ms,
                MIN_TICK_MS,
                MAX_TICK_MS,
                clamped
            );
        }

        let log_file = lookup("FIELDKIT_LOG_FILE")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            theme,
            tick_rate: Duration::from_millis(clamped),
            log_file,
        })
    }
}

fn color_var<F>(lookup: &F, key: &str, default: Color) -> Color
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return default;
    };
    match Color::from_str(raw.trim()) {
        Ok(color) => color,
        Err(_) => {
            tracing::warn!("{} has invalid colour '{}', keeping the default", key, raw);
            default
        }
    }
}
