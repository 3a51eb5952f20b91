//! Fortune cookie CLI - headless entry point.
//!
//! Loads configuration, breaks one cookie and prints the fortune.
//!
//! ```text
//! main() -> FortuneConfig::load() -> CookieApp::activate() -> run_cycle() -> stdout
//! ```
//!
//! # Event Loop
//!
//! A fixed 16ms (~60 FPS) cadence stands in for a renderer:
//!
//! 1. Wait for frame tick
//! 2. Advance the state machine by the measured frame time (`app.tick()`)
//! 3. Stop once the fortune is revealed

use anyhow::{Result, bail};
use std::{
    fs::{self, OpenOptions},
    path::PathBuf,
    sync::{Arc, Mutex},
    time::Duration,
};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use fortune_config::FortuneConfig;
use fortune_engine::{CookieApp, FortuneOrchestrator, ProviderId, ProviderSet};

const FRAME_DURATION: Duration = Duration::from_millis(16);
/// Slack on top of the provider timeout for animations and the local fallback.
const CYCLE_SLACK: Duration = Duration::from_secs(10);

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let (log_file, init_warnings) = open_log_file();

    if let Some((log_path, file)) = log_file {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .with(env_filter)
            .init();

        tracing::info!(path = %log_path.display(), "Logging initialized");
        for warning in init_warnings {
            tracing::warn!("{warning}");
        }
        return;
    }

    // Stdout carries the fortune itself; without a log file, stay silent.
    tracing_subscriber::registry().with(env_filter).init();
}

fn open_log_file() -> (Option<(PathBuf, fs::File)>, Vec<String>) {
    let mut warnings = Vec::new();

    for candidate in log_file_candidates() {
        if let Some(parent) = candidate.parent()
            && let Err(e) = fs::create_dir_all(parent)
        {
            warnings.push(format!(
                "Failed to create log dir {}: {e}",
                parent.display()
            ));
            continue;
        }

        match OpenOptions::new()
            .create(true)
            .append(true)
            .open(&candidate)
        {
            Ok(file) => return (Some((candidate, file)), warnings),
            Err(e) => {
                warnings.push(format!(
                    "Failed to open log file {}: {e}",
                    candidate.display()
                ));
            }
        }
    }

    (None, warnings)
}

fn log_file_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    // Primary: ~/.fortune-cookie/logs/fortune-cookie.log
    if let Some(config_path) = FortuneConfig::path()
        && let Some(config_dir) = config_path.parent()
    {
        candidates.push(config_dir.join("logs").join("fortune-cookie.log"));
    }

    // Fallback: ./.fortune-cookie/logs/fortune-cookie.log
    candidates.push(
        PathBuf::from(".fortune-cookie")
            .join("logs")
            .join("fortune-cookie.log"),
    );

    candidates
}

fn load_config() -> FortuneConfig {
    match FortuneConfig::load() {
        Ok(config) => config.unwrap_or_default(),
        Err(e) => {
            eprintln!("Warning: {e}; using defaults");
            FortuneConfig::default()
        }
    }
}

/// Tick the app until the fortune is revealed or `limit` passes.
async fn run_cycle(app: &mut CookieApp, limit: Duration) -> Result<()> {
    let mut frames = tokio::time::interval(FRAME_DURATION);
    frames.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    app.activate();
    app.frame_elapsed();
    let mut waited = Duration::ZERO;

    while !app.state().is_revealed() {
        frames.tick().await;
        let elapsed = app.frame_elapsed();
        app.tick(elapsed);

        waited += elapsed;
        if waited > limit {
            bail!("no fortune after {}s (state: {})", waited.as_secs(), app.state());
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = load_config();
    let preferred = config.preferred_provider().unwrap_or_else(|e| {
        eprintln!("Warning: {e}; using {}", ProviderId::default());
        ProviderId::default()
    });
    tracing::info!(provider = %preferred, "Starting fortune cycle");
    if preferred.requires_api_key() && config.api_key(preferred).is_none() {
        tracing::warn!(provider = %preferred, "No API key configured; local templates will be used");
    }

    let request = config.fortune_request();
    let limit = request.timeout() + CYCLE_SLACK;
    let providers = ProviderSet::new(config.provider_settings(), config.local_generator())?;
    let orchestrator = FortuneOrchestrator::new(providers, request);
    let mut app = CookieApp::new(
        Arc::new(orchestrator),
        Some(preferred),
        config.reduced_motion(),
    )
    .with_locale(config.locale());

    run_cycle(&mut app, limit).await?;

    if let Some(fortune) = app.fortune() {
        println!("{fortune}");
    }
    if let Some(diagnostic) = app.diagnostic() {
        eprintln!("({diagnostic})");
    }
    if let Some(failure) = app.absorbed_failure() {
        eprintln!("note: {preferred} unavailable ({failure}); served by local templates");
    }

    Ok(())
}
