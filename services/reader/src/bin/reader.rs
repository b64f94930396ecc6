//! services/reader/src/bin/reader.rs

use reader_lib::{adapters::FileStore, config::Config, error::ReaderError, state::ReaderState};
use reading_habit_core::LocalClock;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), ReaderError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Config::from_env()?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Data directory: {}", config.data_dir.display());

    // --- 2. Open Local Stores ---
    let store = Arc::new(FileStore::open(&config.data_dir)?);
    let state = ReaderState::load(store, LocalClock);
    {
        let library = state.library.lock().await;
        info!(
            "Library has {} collections, {} saved works",
            library.collections().len(),
            library.saved_count()
        );
        let settings = state.settings.lock().await;
        let s = settings.settings();
        info!(
            "Reading at {}px, weight {}, {:?} theme; {} works in progress",
            s.font_size,
            s.font_weight,
            s.theme,
            state.progress.lock().await.entries().len()
        );
    }

    // --- 3. Forward Unlocks to the Notification Layer ---
    let session = state.session_controller();
    let mut unlocks = session.subscribe();
    let notifier = tokio::spawn(async move {
        loop {
            match unlocks.recv().await {
                Ok(event) => info!("🏆 {}: {}", event.title, event.description),
                Err(RecvError::Lagged(missed)) => warn!("Missed {} unlock notifications", missed),
                Err(RecvError::Closed) => break,
            }
        }
    });

    // --- 4. Run the Reading Session ---
    session.start_session();
    match config.session_seconds {
        Some(seconds) => {
            info!("Session will end after {} seconds", seconds);
            tokio::select! {
                _ = tokio::time::sleep(Duration::from_secs(seconds)) => {}
                res = tokio::signal::ctrl_c() => res?,
            }
        }
        None => {
            info!("Reading... press Ctrl-C to end the session");
            tokio::signal::ctrl_c().await?;
        }
    }
    session.end_session().await;
    let profiles = state.profiles.clone();
    // Closing every controller handle closes the unlock channel.
    drop(session);
    drop(state);
    let _ = notifier.await;

    // --- 5. Report ---
    let profiles = profiles.lock().await;
    info!(
        "Total reading time {}, {} words, {} wpm, {}-day streak, {} achievements",
        profiles.formatted_total_time(),
        profiles.profile().stats.total_words,
        profiles.words_per_minute(),
        profiles.current_streak(),
        profiles.profile().unlocked_achievements.len()
    );

    Ok(())
}
