//! Headless battle runner entry point.
mod config;
mod logging;
mod roster;

use anyhow::{Context, Result};
use atb_core::BattleEvent;
use atb_runtime::{BattleRuntime, Event, FirstLivingTarget, Topic};
use tokio::sync::broadcast;

use config::{CliConfig, LoggingConfig};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let _guard = logging::setup_logging(&LoggingConfig::from_env())?;
    let config = CliConfig::from_env();

    let mut runtime = BattleRuntime::builder()
        .config(config.runtime.clone())
        .provider(FirstLivingTarget)
        .build();
    tracing::info!(seed = runtime.seed(), "runtime ready");

    let narrator = tokio::spawn(narrate(
        runtime.subscribe(Topic::Turn),
        runtime.subscribe(Topic::Combat),
    ));

    let (allies, enemies) = roster::sample(&config);
    let result = runtime.run_battle(allies, enemies).await;

    // Dropping the runtime closes the bus and lets the narrator drain.
    drop(runtime);
    if let Err(error) = narrator.await {
        tracing::warn!(%error, "event narrator stopped abnormally");
    }

    let summary = result.context("battle did not complete")?;
    let json = if config.pretty_json {
        serde_json::to_string_pretty(&summary)
    } else {
        serde_json::to_string(&summary)
    }
    .context("failed to serialize battle summary")?;
    println!("{json}");

    Ok(())
}

/// Logs turn and combat events until the bus closes.
async fn narrate(mut turns: broadcast::Receiver<Event>, mut combat: broadcast::Receiver<Event>) {
    let mut turns_open = true;
    let mut combat_open = true;
    while turns_open || combat_open {
        let received = tokio::select! {
            event = turns.recv(), if turns_open => (Topic::Turn, event),
            event = combat.recv(), if combat_open => (Topic::Combat, event),
        };
        match received {
            (_, Ok(event)) => log_event(&event),
            (topic, Err(broadcast::error::RecvError::Lagged(skipped))) => {
                tracing::debug!(?topic, skipped, "narrator fell behind");
            }
            (Topic::Turn, Err(broadcast::error::RecvError::Closed)) => turns_open = false,
            (_, Err(broadcast::error::RecvError::Closed)) => combat_open = false,
        }
    }
}

fn log_event(event: &Event) {
    match &event.payload {
        BattleEvent::TurnStarted { combatant } => {
            tracing::info!(tick = event.tick, %combatant, "turn");
        }
        BattleEvent::AttackResolved {
            attacker,
            defender,
            outcome,
        } => {
            tracing::info!(
                tick = event.tick,
                %attacker,
                %defender,
                roll = outcome.attack_roll,
                defense = outcome.defense,
                hit = outcome.hit,
                critical = outcome.critical,
                dealt = outcome.dealt,
                "attack"
            );
        }
        BattleEvent::Defended { combatant } => {
            tracing::info!(tick = event.tick, %combatant, "defends");
        }
        BattleEvent::CombatantDefeated { combatant } => {
            tracing::info!(tick = event.tick, %combatant, "defeated");
        }
        other => tracing::trace!(tick = event.tick, kind = other.kind(), "event"),
    }
}
