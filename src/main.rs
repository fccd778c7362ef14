//! Timebank
//!
//! Headless driver for the clock engine. Runs a scripted session against the
//! configured data directory and verifies that replaying the event history
//! reproduces the live state.

use anyhow::{bail, Context, Result};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use timebank::{
    format_mm_ss,
    game::reduce::replay,
    session::{ManualClock, MonotonicClock, RecordingEffects},
    AppConfig, Command, EditOp, GameController, GameSetup, GameState, OrderDir, PlayerConfig, Rules,
    VERSION,
};

fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to set tracing subscriber")?;

    let config = AppConfig::from_env();
    info!("Timebank v{}", VERSION);
    info!("Data dir: {}", config.data_dir.display());
    info!("Tick interval: {} ms", config.tick_interval.as_millis());

    demo_session(&config)
}

/// Demo function to exercise the engine end to end.
fn demo_session(config: &AppConfig) -> Result<()> {
    info!("=== Starting Demo Session ===");

    let mut controller = GameController::<RecordingEffects>::open(config)
        .with_context(|| format!("Failed to open event log {}", config.log_path().display()))?;
    info!("Sounds available: {:?}", controller.sounds().list_files());

    let clock = ManualClock::starting_at(0.0);
    let tick = config.tick_interval.as_secs_f64();

    let setup = match controller.state().order.len() {
        n if n >= 2 => GameSetup {
            game_id: uuid::Uuid::new_v4().to_string(),
            players: controller.state().players.clone(),
            order: controller.state().order.clone(),
            order_dir: controller.state().order_dir,
            rules: controller.state().rules.clone(),
        },
        _ => GameSetup {
            game_id: uuid::Uuid::new_v4().to_string(),
            players: ["Ada", "Grace", "Linus"].into_iter().map(PlayerConfig::new).collect(),
            order: vec!["Ada".into(), "Grace".into(), "Linus".into()],
            order_dir: OrderDir::Clockwise,
            rules: Rules::new(120.0, 5.0, 20),
        },
    };
    info!("Game {} with {:?}", setup.game_id, setup.order);
    controller.dispatch(&Command::start_game(clock.now_mono(), setup))?;

    // Three turns of increasing length, ticking at the configured cadence
    for turn_secs in [4.0, 30.0, 52.0] {
        let end = clock.now_mono() + turn_secs;
        while clock.now_mono() + tick < end {
            clock.advance(tick);
            controller.dispatch(&Command::tick(clock.now_mono()))?;
        }
        clock.advance(end - clock.now_mono());
        let result = controller.dispatch(&Command::tap(clock.now_mono()))?;
        info!("Tap at {:.2}: {} events", clock.now_mono(), result.events.len());
    }

    // Table talk
    clock.advance(10.0);
    controller.dispatch(&Command::pause_on(clock.now_mono(), "table talk"))?;
    clock.advance(300.0);
    controller.dispatch(&Command::pause_off(clock.now_mono()))?;

    // Admin undoes the last turn and grants a bonus
    controller.dispatch(&Command::admin_auth(clock.now_mono(), config.admin_password.clone()))?;
    if controller.state().admin_mode {
        controller.dispatch(&Command::admin_edit(clock.now_mono(), EditOp::Undo))?;
        if let Some(player) = controller.state().current_player.clone() {
            let value = controller.state().bank.get(&player).copied().unwrap_or_default() + 30.0;
            controller.dispatch(&Command::admin_edit(clock.now_mono(), EditOp::SetBank { player, value }))?;
        }
        controller.dispatch(&Command::admin_mode_off(clock.now_mono()))?;
    }

    clock.advance(7.5);
    controller.dispatch(&Command::tick(clock.now_mono()))?;

    info!("=== Session Results ===");
    for name in &controller.state().order {
        let bank = controller.state().bank.get(name).copied().unwrap_or_default();
        info!("{:>8}: {}", name, format_mm_ss(bank));
    }
    let effects = controller.effects();
    info!(
        "Effects: {} sounds, {} vibrations, {} errors",
        effects.played_sounds.len(),
        effects.vibrations,
        effects.errors.len()
    );

    let hash = controller.state().compute_hash();
    info!("Final State Hash: {}", hex::encode(hash));
    info!("Total events: {}", controller.history().len());

    // Verify determinism by replaying
    info!("=== Verifying Replay ===");
    let replayed = replay(GameState::new(), controller.history());
    let replay_hash = replayed.compute_hash();
    info!("Replay State Hash: {}", hex::encode(replay_hash));

    if hash != replay_hash {
        bail!("Replay diverged from live state");
    }
    info!("REPLAY VERIFIED: Hashes match!");
    Ok(())
}
