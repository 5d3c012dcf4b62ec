//! Train command - Run the shared-table controller on the reference minefield

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use serde_json::to_writer_pretty;
use tracing::info;

use crate::{
    adapters::{MineField, MineFieldConfig},
    cli::output::{format_number, format_policy, print_kv, print_section},
    config::ControllerConfig,
    pipeline::{
        EpisodeSummary, MetricsObserver, ProgressObserver, TrainingResult, TrainingSession,
    },
    q_learning::QLearningController,
};

#[derive(Parser, Debug)]
#[command(about = "Train sweepers on a generated minefield")]
pub struct TrainArgs {
    /// Number of episodes to train for
    #[arg(long, short = 'e', default_value_t = 100)]
    pub episodes: usize,

    /// Controller configuration (JSON); defaults are used when omitted
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Random seed for the field and the controller
    #[arg(long)]
    pub seed: Option<u64>,

    /// Number of sweepers sharing the table
    #[arg(long)]
    pub sweepers: Option<usize>,

    /// Ticks per episode
    #[arg(long)]
    pub episode_length: Option<usize>,

    /// Number of mines on the field
    #[arg(long)]
    pub mines: Option<usize>,

    /// Write per-episode metrics and the run summary to this JSON file
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Print the learned greedy policy after training
    #[arg(long)]
    pub show_policy: bool,

    /// Disable the progress bar
    #[arg(long)]
    pub no_progress: bool,
}

#[derive(Debug, Serialize)]
struct TrainingExport<'a> {
    controller: &'a ControllerConfig,
    field: &'a MineFieldConfig,
    result: &'a TrainingResult,
    episodes: Vec<EpisodeSummary>,
}

pub fn execute(args: TrainArgs) -> Result<()> {
    let mut controller_config = match &args.config {
        Some(path) => ControllerConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => ControllerConfig::default(),
    };
    controller_config.max_episodes = Some(args.episodes);

    let mut field_config = MineFieldConfig::default();
    if let Some(seed) = args.seed {
        controller_config.seed = Some(seed);
        field_config.seed = Some(seed);
    }
    if let Some(sweepers) = args.sweepers {
        field_config.sweepers = sweepers;
    }
    if let Some(length) = args.episode_length {
        field_config.episode_length = length;
    }
    if let Some(mines) = args.mines {
        field_config.mines = mines;
    }

    let mut field = MineField::new(field_config.clone()).context("Failed to build minefield")?;
    let mut controller = QLearningController::new(controller_config.clone())
        .context("Invalid controller configuration")?;

    info!(
        episodes = args.episodes,
        sweepers = field_config.sweepers,
        episode_length = field_config.episode_length,
        "starting training"
    );

    let metrics = MetricsObserver::new();
    let mut session = TrainingSession::new().with_observer(Box::new(metrics.clone()));
    if !args.no_progress {
        session = session.with_observer(Box::new(ProgressObserver::new(Some(args.episodes))));
    }
    let result = session
        .run(&mut controller, &mut field)
        .context("Training failed")?;

    print_section("Training Summary");
    print_kv("Episodes", &format_number(result.episodes));
    print_kv("Ticks", &format_number(result.ticks));
    print_kv("Value updates", &format_number(result.updates));
    print_kv("Terminal updates", &format_number(result.terminal_updates));
    print_kv("Total reward", &format!("{:.1}", result.total_reward));
    print_kv(
        "Mean reward/episode",
        &format!("{:.2}", result.mean_reward_per_episode()),
    );
    let window = (args.episodes / 10).max(1);
    print_kv(
        &format!("Mean reward (last {window})"),
        &format!("{:.2}", metrics.mean_reward(window)),
    );

    if args.show_policy {
        if let Some(table) = controller.table() {
            print_section("Greedy Policy");
            println!("{}", format_policy(table, &field)?);
        }
    }

    if let Some(path) = &args.export {
        let export = TrainingExport {
            controller: &controller_config,
            field: &field_config,
            result: &result,
            episodes: metrics.episodes(),
        };
        let file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create file: {}", path.display()))?;
        to_writer_pretty(file, &export).context("Failed to write training export")?;
        println!("\nExported metrics to {}", path.display());
    }

    controller.teardown();
    Ok(())
}
