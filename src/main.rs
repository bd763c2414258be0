//! Pinpoint Engine Demo
//!
//! Runs a scripted five-round session through the session host and
//! prints per-round results and the final leaderboard.

use anyhow::Result;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;
use uuid::Uuid;

use pinpoint::game::scoreboard::{InMemoryScoreboard, SaveOutcome, Scoreboard};
use pinpoint::{
    CatalogProvider, GameEngine, GameEvent, Location, SessionHost, SettingsUpdate, VERSION,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Pinpoint Engine v{}", VERSION);

    demo_session().await
}

/// Play one scripted session: guesses of varying quality, then the
/// scoreboard.
async fn demo_session() -> Result<()> {
    let seed = 12345u64;
    info!("Location seed: {}", seed);

    let engine = GameEngine::new(CatalogProvider::world_landmarks(seed));
    let host = SessionHost::spawn(engine);
    let mut events = host.subscribe();

    // Shorter rounds for the demo
    host.update_settings(SettingsUpdate {
        round_time: Some(60),
        allow_navigation: None,
    })
    .await?;

    host.start().await?;

    // Guess each round's location with a growing northward error
    let mut round = 0usize;
    loop {
        let snapshot = host.snapshot().await?;
        let actual = snapshot.rounds[round].actual;
        let error_deg = round as f64 * 2.0;
        let guess = Location::new((actual.lat + error_deg).min(89.0), actual.lng);

        host.submit_guess(guess).await?;
        host.next_round().await?;

        round += 1;
        if host.snapshot().await?.is_finished() {
            break;
        }
    }

    // Drain the event stream for the round-by-round story
    let mut total_score = 0;
    while let Ok(event) = events.try_recv() {
        match event {
            GameEvent::GameStarted { rounds, round_time } => {
                info!("Game started: {} rounds, {}s each", rounds, round_time);
            }
            GameEvent::GuessScored {
                round,
                distance_km,
                time_bonus,
                score,
                ..
            } => {
                info!(
                    "Round {}: {} km off, +{} time bonus -> {} points",
                    round + 1,
                    distance_km,
                    time_bonus,
                    score
                );
            }
            GameEvent::GameFinished { total_score: total } => {
                total_score = total;
                info!("Game finished! Total: {}", total);
            }
            _ => {}
        }
    }

    // Persist the result and show the leaderboard
    let mut scoreboard = InMemoryScoreboard::new();
    let player = Uuid::new_v4();
    scoreboard.save_score(total_score, "Demo Player", Some(player))?;

    // A second, lower run would not displace the personal best
    if let SaveOutcome::NotImproved { previous_best } =
        scoreboard.save_score(total_score / 2, "Demo Player", Some(player))?
    {
        info!(
            "Second attempt not saved: previous best {} stands",
            previous_best
        );
    }

    info!("=== Leaderboard ===");
    for (rank, entry) in scoreboard.high_scores(10)?.iter().enumerate() {
        info!("#{}: {} - {}", rank + 1, entry.display_name, entry.score);
    }

    host.shutdown().await?;
    Ok(())
}
