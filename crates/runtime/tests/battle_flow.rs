//! End-to-end battles driven through the runtime loop.

use atb_core::{
    ActionPacing, Attributes, BattleConfig, BattleEvent, BattleOutcome, BattleState, Combatant,
    CombatantId, Command, Control, GaugeConfig, ScriptedDice, Target,
};
use atb_runtime::{BattleRuntime, RuntimeConfig, RuntimeError, ScriptedCommands, Topic};

fn fighter(id: u32, strength: i32, agility: i32) -> Combatant {
    Combatant::new(
        CombatantId(id),
        format!("fighter-{id}"),
        Attributes::new(strength, agility, 5),
        &GaugeConfig::default(),
    )
}

fn party() -> (Vec<Combatant>, Vec<Combatant>) {
    (
        vec![fighter(1, 8, 6), fighter(2, 6, 9)],
        vec![fighter(3, 7, 5), fighter(4, 5, 7)],
    )
}

fn seeded(seed: u64) -> BattleRuntime {
    BattleRuntime::builder()
        .config(RuntimeConfig::default().with_seed(seed))
        .build()
}

#[tokio::test]
async fn same_seed_replays_the_same_battle() {
    let (allies, enemies) = party();
    let first = seeded(99)
        .run_battle(allies.clone(), enemies.clone())
        .await
        .unwrap();
    let second = seeded(99).run_battle(allies, enemies).await.unwrap();

    assert_eq!(first, second);
    assert!(!first.forced);
    assert!(first.turns_taken > 0);
}

#[tokio::test]
async fn battle_topic_reports_one_ending() {
    // room for every state change of the battle without lagging
    let config = RuntimeConfig {
        event_buffer_size: 1 << 16,
        ..RuntimeConfig::default().with_seed(7)
    };
    let mut runtime = BattleRuntime::builder().config(config).build();
    let mut battle = runtime.subscribe(Topic::Battle);
    let (allies, enemies) = party();

    let summary = runtime.run_battle(allies, enemies).await.unwrap();

    let mut events = Vec::new();
    while let Ok(event) = battle.try_recv() {
        events.push(event);
    }
    assert!(events.windows(2).all(|pair| pair[0].sequence < pair[1].sequence));

    let endings: Vec<_> = events
        .iter()
        .filter_map(|event| match event.payload {
            BattleEvent::BattleEnded { outcome } => Some(outcome),
            _ => None,
        })
        .collect();
    assert_eq!(endings, vec![summary.outcome]);
    assert_eq!(
        events.last().map(|event| &event.payload),
        Some(&BattleEvent::StateChanged {
            from: match summary.outcome {
                BattleOutcome::Victory => BattleState::Victory,
                BattleOutcome::Defeat => BattleState::Defeat,
            },
            to: BattleState::Idle,
        })
    );
}

#[tokio::test]
async fn human_commands_come_from_the_provider() {
    // bad index first, then a hit that finishes the 1 HP enemy
    let hero = fighter(1, 20, 5).with_control(Control::Human).with_rate(100.0);
    let enemy = fighter(2, 5, 5).with_rate(1.0).with_hp(1);
    let provider = ScriptedCommands::new([
        Command::Attack(Target::Index(4)),
        Command::Attack(Target::Index(0)),
    ]);

    let mut runtime = BattleRuntime::builder()
        .config(RuntimeConfig::default().with_seed(1))
        .random_source(ScriptedDice::new([15, 6]))
        .provider(provider)
        .build();

    let summary = runtime.run_battle(vec![hero], vec![enemy]).await.unwrap();
    assert_eq!(summary.outcome, BattleOutcome::Victory);
    assert_eq!(summary.turns_taken, 1);
}

#[tokio::test]
async fn repeated_rejections_surface_as_an_error() {
    let hero = fighter(1, 5, 5).with_control(Control::Human).with_rate(100.0);
    let enemy = fighter(2, 5, 5).with_rate(1.0);
    let provider = ScriptedCommands::new([Command::Attack(Target::Index(9)); 3]);

    let mut runtime = BattleRuntime::builder()
        .config(RuntimeConfig::default().with_seed(1))
        .provider(provider)
        .build();

    let error = runtime.run_battle(vec![hero], vec![enemy]).await.unwrap_err();
    match error {
        RuntimeError::CommandRejected { actor, attempts, .. } => {
            assert_eq!(actor, CombatantId(1));
            assert_eq!(attempts, 3);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(
        runtime.scheduler().state(),
        BattleState::WaitingForActorInput
    );
}

#[tokio::test]
async fn exhausted_provider_is_reported() {
    let hero = fighter(1, 5, 5).with_control(Control::Human).with_rate(100.0);
    let enemy = fighter(2, 5, 5).with_rate(1.0);

    let mut runtime = BattleRuntime::builder()
        .config(RuntimeConfig::default().with_seed(1))
        .provider(ScriptedCommands::default())
        .build();

    let error = runtime.run_battle(vec![hero], vec![enemy]).await.unwrap_err();
    assert!(matches!(
        error,
        RuntimeError::ProviderExhausted {
            actor: CombatantId(1)
        }
    ));
}

#[tokio::test]
async fn stalled_battles_hit_the_tick_limit() {
    let allies = vec![fighter(1, 5, 5).with_rate(0.0)];
    let enemies = vec![fighter(2, 5, 5).with_rate(0.0)];

    let mut runtime = BattleRuntime::builder()
        .config(RuntimeConfig::default().with_seed(3).with_max_ticks(50))
        .build();

    let error = runtime.run_battle(allies, enemies).await.unwrap_err();
    assert!(matches!(error, RuntimeError::TickLimit { max_ticks: 50 }));
    assert_eq!(runtime.ticks(), 50);
    assert_eq!(runtime.scheduler().state(), BattleState::Idle);

    let summary = runtime.scheduler().last_summary().unwrap();
    assert!(summary.forced);
    assert_eq!(summary.outcome, BattleOutcome::Defeat);
}

#[tokio::test]
async fn external_pacing_is_completed_by_the_runtime() {
    let battle = BattleConfig::default().with_action_pacing(ActionPacing::External);
    let mut runtime = BattleRuntime::builder()
        .config(RuntimeConfig::default().with_seed(11).with_battle(battle))
        .build();
    let (allies, enemies) = party();

    let summary = runtime.run_battle(allies, enemies).await.unwrap();
    assert!(summary.turns_taken > 0);
}

#[tokio::test]
async fn delayed_actions_keep_other_gauges_running() {
    let battle = BattleConfig::default()
        .with_action_pacing(ActionPacing::Delay(BattleConfig::DEFAULT_ACTION_DELAY));
    let mut runtime = BattleRuntime::builder()
        .config(RuntimeConfig::default().with_seed(5).with_battle(battle))
        .build();
    let (allies, enemies) = party();
    runtime.start(allies, enemies).unwrap();

    let mut previous: Option<(CombatantId, f64)> = None;
    let mut grew = false;
    while runtime.scheduler().is_in_battle() {
        let state = runtime.step().await.unwrap();
        if state != BattleState::ExecutingAction {
            previous = None;
            continue;
        }
        let actor = runtime.scheduler().current_actor_id().unwrap();
        let others: f64 = runtime
            .scheduler()
            .combatants()
            .iter()
            .filter(|c| c.id() != actor)
            .map(Combatant::current_gauge)
            .sum();
        if let Some((last_actor, last_sum)) = previous
            && last_actor == actor
        {
            assert!(others >= last_sum);
            grew |= others > last_sum;
        }
        previous = Some((actor, others));
    }
    assert!(grew);
}
