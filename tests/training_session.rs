//! End-to-end training on the reference minefield

mod common;

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use anyhow::Result;
use common::ScriptedSimulation;
use sweeper::{
    BoundsPolicy, ControllerConfig, MineField, MineFieldConfig, QLearningController,
    RewardSchedule,
    pipeline::{MetricsObserver, TrainingResult, TrainingSession},
    ports::{Observer, Simulation},
};
use tempfile::tempdir;

fn small_field(seed: u64) -> MineFieldConfig {
    MineFieldConfig {
        world_width: 100,
        world_height: 100,
        cell_size: 10,
        sweepers: 6,
        mines: 15,
        super_mines: 4,
        rocks: 6,
        episode_length: 120,
        seed: Some(seed),
    }
}

#[test]
fn test_session_runs_episode_budget() -> Result<()> {
    let mut field = MineField::new(small_field(42))?;
    let mut controller =
        QLearningController::new(ControllerConfig::default().with_seed(42).with_max_episodes(8))?;
    let metrics = MetricsObserver::new();

    let result = TrainingSession::new()
        .with_observer(Box::new(metrics.clone()))
        .run(&mut controller, &mut field)?;

    assert_eq!(result.episodes, 8);
    assert!(!result.hit_tick_cap);
    assert_eq!(controller.episodes_completed(), 8);
    assert!(result.ticks >= 8);
    assert!(result.updates > 0);

    let episodes = metrics.episodes();
    assert_eq!(episodes.len(), 8);
    for (i, summary) in episodes.iter().enumerate() {
        assert_eq!(summary.episode, i + 1);
        assert!(summary.ticks <= 120);
        assert!(summary.deaths <= 6);
        assert!(summary.mines_collected <= 15);
        if !summary.ended_early {
            assert_eq!(summary.ticks, 120);
        }
    }
    let summed: f64 = episodes.iter().map(|s| s.total_reward).sum();
    assert!((summed - result.total_reward).abs() < 1e-6);

    // The table stays available until teardown.
    let table = controller.table().expect("table after training");
    assert_eq!(table.columns(), field.extent().columns());
    assert!(table.iter().any(|(_, row)| row.iter().any(|&v| v != 0.0)));
    controller.teardown();
    assert!(controller.table().is_none());
    Ok(())
}

#[test]
fn test_seeded_sessions_are_reproducible() -> Result<()> {
    let run = || -> Result<TrainingResult> {
        let mut field = MineField::new(small_field(7))?;
        let mut controller =
            QLearningController::new(ControllerConfig::default().with_seed(7).with_max_episodes(3))?;
        Ok(TrainingSession::new().run(&mut controller, &mut field)?)
    };
    assert_eq!(run()?, run()?);
    Ok(())
}

#[test]
fn test_tick_cap_stops_unbounded_run() -> Result<()> {
    let mut field = MineField::new(small_field(3))?;
    let mut controller = QLearningController::new(ControllerConfig::default().with_seed(3))?;

    let result = TrainingSession::new()
        .with_max_ticks(50)
        .run(&mut controller, &mut field)?;

    assert!(result.hit_tick_cap);
    assert_eq!(result.ticks, 50);
    Ok(())
}

#[test]
fn test_config_file_round_trip() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("controller.json");
    let config = ControllerConfig::default()
        .with_learning_rate(0.5)
        .with_discount_rate(0.9)
        .with_bounds(BoundsPolicy::Reject)
        .with_rewards(RewardSchedule {
            no_contact: -1.0,
            ..RewardSchedule::default()
        })
        .with_seed(5)
        .with_max_episodes(2);

    config.save(&path)?;
    let loaded = ControllerConfig::load(&path)?;
    assert_eq!(loaded, config);
    Ok(())
}

#[test]
fn test_invalid_config_file_rejected() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("bad.json");
    std::fs::write(&path, r#"{"discount_rate": 2.0}"#)?;

    let err = ControllerConfig::load(&path).unwrap_err();
    assert!(matches!(err, sweeper::Error::InvalidConfiguration { .. }));

    let missing = ControllerConfig::load(dir.path().join("missing.json")).unwrap_err();
    assert!(matches!(missing, sweeper::Error::Io { .. }));
    Ok(())
}

#[test]
fn test_training_result_save_load() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("result.json");
    let result = TrainingResult {
        episodes: 4,
        ticks: 400,
        updates: 2000,
        terminal_updates: 9,
        total_reward: 125.0,
        hit_tick_cap: false,
    };
    result.save(&path)?;
    assert_eq!(TrainingResult::load(&path)?, result);
    assert_eq!(result.mean_reward_per_episode(), 31.25);
    Ok(())
}

struct SessionEndFlag(Arc<AtomicBool>);

impl Observer for SessionEndFlag {
    fn on_session_end(&mut self) -> sweeper::Result<()> {
        self.0.store(true, Ordering::SeqCst);
        Ok(())
    }
}

#[test]
fn test_failed_tick_still_closes_observers() {
    let mut sim = ScriptedSimulation::new(&[(150.0, 15.0)], 10);
    let mut controller = QLearningController::new(
        ControllerConfig::default()
            .with_seed(1)
            .with_bounds(BoundsPolicy::Reject),
    )
    .unwrap();
    let closed = Arc::new(AtomicBool::new(false));

    let err = TrainingSession::new()
        .with_observer(Box::new(SessionEndFlag(Arc::clone(&closed))))
        .run(&mut controller, &mut sim)
        .unwrap_err();

    assert!(matches!(err, sweeper::Error::CellOutOfBounds { .. }));
    assert!(closed.load(Ordering::SeqCst));
}
