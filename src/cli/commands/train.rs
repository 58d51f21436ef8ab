//! Train command - bootstrap pretraining followed by self-play or play
//! against a random opponent

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use clap::{Parser, ValueEnum};

use crate::{
    adapters::CsvSampleSource,
    app::App,
    cli::{
        config::TrainSettings,
        output::{format_number, print_kv, print_outcomes, print_section},
    },
    pipeline::{
        AgentRole, LogObserver, MetricsObserver, Pretrainer, ProgressObserver, TrainingMode,
        TrainingPipeline, TrainingResult, load_or_synthesize,
    },
    q_learning::{QLearningAgent, TrainingMetadata, agent::build_rng},
    tictactoe::Player,
};

/// Model file written when `--output` is not given
pub const DEFAULT_OUTPUT: &str = "q_agent.msgpack";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OpponentKind {
    /// Two tables learning against each other
    #[value(name = "self")]
    SelfPlay,
    /// A single table against uniformly random moves
    Random,
}

#[derive(Parser, Debug)]
#[command(about = "Train Q-learning agents")]
pub struct TrainArgs {
    /// Who the agent learns against
    #[arg(long, short = 'o', value_enum)]
    pub opponent: Option<OpponentKind>,

    /// Number of training episodes
    #[arg(long, short = 'e')]
    pub episodes: Option<usize>,

    /// Output model file (.json for JSON, anything else MessagePack).
    /// Self-play writes `<stem>.x.<ext>` and `<stem>.o.<ext>`.
    #[arg(long, short = 'O', default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// JSON settings file; explicit flags take precedence
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Historical games in UCI tic-tac-toe format
    #[arg(long)]
    pub data_file: Option<PathBuf>,

    /// Skip bootstrap pretraining on historical games
    #[arg(long, default_value_t = false)]
    pub no_pretrain: bool,

    /// Pretraining steps per table
    #[arg(long)]
    pub pretrain_steps: Option<usize>,

    /// Which mark the agent plays against the random opponent (`x`, `o` or `alternate`)
    #[arg(long)]
    pub agent_player: Option<String>,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Learning rate α (0.0-1.0]
    #[arg(long)]
    pub learning_rate: Option<f64>,

    /// Discount factor γ (0.0-1.0)
    #[arg(long)]
    pub discount: Option<f64>,

    /// Initial exploration rate ε
    #[arg(long)]
    pub epsilon: Option<f64>,

    /// Multiplicative ε decay per episode
    #[arg(long)]
    pub epsilon_decay: Option<f64>,

    /// Lower bound for ε
    #[arg(long)]
    pub min_epsilon: Option<f64>,

    /// Log ε every N episodes (0 disables)
    #[arg(long)]
    pub log_every: Option<usize>,

    /// Hide the progress bar
    #[arg(long, default_value_t = false)]
    pub no_progress: bool,

    /// Optional path for writing a summary JSON file
    #[arg(long)]
    pub summary: Option<PathBuf>,
}

pub(crate) fn parse_player_token(value: &str, flag: &str) -> Result<Player> {
    match value.trim().to_ascii_lowercase().as_str() {
        "x" | "first" | "player1" | "p1" => Ok(Player::X),
        "o" | "second" | "player2" | "p2" => Ok(Player::O),
        other => Err(anyhow!(
            "Invalid value '{other}' for {flag} (expected 'x' or 'o')"
        )),
    }
}

fn parse_role(value: &str) -> Result<AgentRole> {
    match value.trim().to_ascii_lowercase().as_str() {
        "alternate" | "alternating" | "both" => Ok(AgentRole::Alternating),
        other => Ok(AgentRole::Fixed(parse_player_token(other, "--agent-player")?)),
    }
}

/// Per-mark file names for self-play: `q_agent.msgpack` becomes
/// `q_agent.x.msgpack` and `q_agent.o.msgpack`.
pub fn paired_paths(output: &Path) -> (PathBuf, PathBuf) {
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "q_agent".to_string());
    let ext = output
        .extension()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "msgpack".to_string());
    (
        output.with_file_name(format!("{stem}.x.{ext}")),
        output.with_file_name(format!("{stem}.o.{ext}")),
    )
}

/// Merge the settings file with explicit flags.
fn resolve_settings(args: &TrainArgs) -> Result<TrainSettings> {
    let mut settings = match &args.config {
        Some(path) => TrainSettings::load(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?,
        None => TrainSettings::default(),
    };

    let agent = &mut settings.agent;
    if let Some(value) = args.learning_rate {
        agent.learning_rate = value;
    }
    if let Some(value) = args.discount {
        agent.discount_factor = value;
    }
    if let Some(value) = args.epsilon {
        agent.epsilon = value;
    }
    if let Some(value) = args.epsilon_decay {
        agent.epsilon_decay = value;
    }
    if let Some(value) = args.min_epsilon {
        agent.min_epsilon = value;
    }
    if let Some(seed) = args.seed {
        agent.seed = Some(seed);
        settings.training.seed = Some(seed);
    }
    agent.validate()?;

    if let Some(episodes) = args.episodes {
        settings.training.episodes = episodes;
    }
    if let Some(log_every) = args.log_every {
        settings.training.log_every = log_every;
    }

    let role = args.agent_player.as_deref().map(parse_role).transpose()?;
    settings.training.mode = match (args.opponent, settings.training.mode) {
        (Some(OpponentKind::SelfPlay), _) => TrainingMode::SelfPlay,
        (Some(OpponentKind::Random), TrainingMode::VersusRandom { role: existing }) => {
            TrainingMode::VersusRandom {
                role: role.unwrap_or(existing),
            }
        }
        (Some(OpponentKind::Random), TrainingMode::SelfPlay) => TrainingMode::VersusRandom {
            role: role.unwrap_or(AgentRole::Fixed(Player::X)),
        },
        (None, TrainingMode::VersusRandom { role: existing }) => TrainingMode::VersusRandom {
            role: role.unwrap_or(existing),
        },
        (None, TrainingMode::SelfPlay) => TrainingMode::SelfPlay,
    };
    if role.is_some() && settings.training.mode == TrainingMode::SelfPlay {
        return Err(anyhow!(
            "--agent-player only applies when training against the random opponent"
        ));
    }

    if args.no_pretrain {
        settings.skip_pretrain = true;
    }
    if let Some(steps) = args.pretrain_steps {
        settings.pretrain.steps = steps;
    }
    if args.data_file.is_some() {
        settings.data_file = args.data_file.clone();
    }

    Ok(settings)
}

fn offset_seed(seed: Option<u64>, offset: u64) -> Option<u64> {
    seed.map(|s| s.wrapping_add(offset))
}

fn pretrain_tables(settings: &TrainSettings, tables: &mut [&mut QLearningAgent]) -> Result<usize> {
    if settings.skip_pretrain || settings.pretrain.steps == 0 {
        return Ok(0);
    }

    print_section("Pre-training with historical data");
    let data_file = settings
        .data_file
        .clone()
        .unwrap_or_else(|| PathBuf::from("tic-tac-toe.data"));
    let source = CsvSampleSource::new(data_file);
    let seed = settings.training.seed;
    let mut rng = build_rng(offset_seed(seed, 20));
    let samples = load_or_synthesize(&source, settings.pretrain.synthetic_samples, &mut rng)?;
    print_kv("Samples", &format_number(samples.len()));

    for (idx, table) in tables.iter_mut().enumerate() {
        let mut pretrainer = Pretrainer::new(settings.pretrain, offset_seed(seed, 10 + idx as u64));
        let report = pretrainer.run(table, &samples)?;
        print_kv(
            &format!("Table {}", idx + 1),
            &format!(
                "{} updates, {} decided positions skipped",
                format_number(report.updates),
                format_number(report.skipped_terminal)
            ),
        );
    }

    Ok(settings.pretrain.steps)
}

fn print_result(title: &str, result: &TrainingResult, metrics: &MetricsObserver) {
    print_section(title);
    print_kv("Episodes", &format_number(result.total_games));
    print_outcomes(result.wins, result.draws, result.losses, result.total_games);
    print_kv(
        "Avg game length",
        &format!("{:.2} moves", metrics.summary().avg_game_length),
    );
    if result.cancelled {
        print_kv("Status", "cancelled");
    }
}

pub fn execute(args: TrainArgs) -> Result<()> {
    let settings = resolve_settings(&args)?;
    let app = match settings.training.seed {
        Some(seed) => App::for_testing().with_default_seed(seed).build(),
        None => App::new(),
    };

    print_section("Training configuration");
    let mode = settings.training.mode;
    print_kv(
        "Mode",
        &match mode {
            TrainingMode::SelfPlay => "self-play".to_string(),
            TrainingMode::VersusRandom { role } => format!("vs random ({role:?})"),
        },
    );
    print_kv("Episodes", &format_number(settings.training.episodes));
    print_kv("Learning rate", &settings.agent.learning_rate.to_string());
    print_kv("Discount", &settings.agent.discount_factor.to_string());
    print_kv(
        "Epsilon",
        &format!(
            "{} (decay {}, min {})",
            settings.agent.epsilon, settings.agent.epsilon_decay, settings.agent.min_epsilon
        ),
    );
    if let Some(seed) = settings.training.seed {
        print_kv("Seed", &seed.to_string());
    }

    let metrics = MetricsObserver::new();
    let pipeline =
        TrainingPipeline::new(settings.training).with_observer(Box::new(metrics.clone()));
    // Without a progress bar, windowed outcome rates go to the log instead
    let mut pipeline = if args.no_progress {
        pipeline.with_observer(Box::new(LogObserver::new(settings.training.log_every)))
    } else {
        pipeline.with_observer(Box::new(ProgressObserver::new()))
    };

    let result = match mode {
        TrainingMode::SelfPlay => {
            let mut agent_x = app.create_agent(settings.agent)?;
            let mut agent_o = app.create_agent(settings.agent)?;
            let pretrain_steps = pretrain_tables(&settings, &mut [&mut agent_x, &mut agent_o])?;

            print_section("Main training (AI vs AI)");
            let result = pipeline.run_self_play(&mut agent_x, &mut agent_o)?;

            let (path_x, path_o) = paired_paths(&args.output);
            for (agent, path, player) in [
                (&agent_x, &path_x, Player::X),
                (&agent_o, &path_o, Player::O),
            ] {
                let metadata = TrainingMetadata {
                    episodes_trained: Some(result.total_games),
                    pretrain_steps: Some(pretrain_steps),
                    trained_against: Some("self-play".to_string()),
                    agent_player: Some(player),
                    seed: settings.training.seed,
                };
                app.save_agent(agent, metadata, path)
                    .with_context(|| format!("Failed to save agent to {}", path.display()))?;
                log::info!("Saved {player} table to {}", path.display());
            }
            print_result("Training results (from X's side)", &result, &metrics);
            print_kv("X table", &format!("{} entries", format_number(agent_x.q_table_size())));
            print_kv("O table", &format!("{} entries", format_number(agent_o.q_table_size())));
            print_kv("Saved", &format!("{}, {}", path_x.display(), path_o.display()));
            result
        }
        TrainingMode::VersusRandom { role } => {
            let mut agent = app.create_agent(settings.agent)?;
            let pretrain_steps = pretrain_tables(&settings, &mut [&mut agent])?;

            print_section("Main training (AI vs random)");
            let result = pipeline.run_versus_random(&mut agent)?;

            let metadata = TrainingMetadata {
                episodes_trained: Some(result.total_games),
                pretrain_steps: Some(pretrain_steps),
                trained_against: Some("random".to_string()),
                agent_player: match role {
                    AgentRole::Fixed(player) => Some(player),
                    AgentRole::Alternating => None,
                },
                seed: settings.training.seed,
            };
            app.save_agent(&agent, metadata, &args.output)
                .with_context(|| format!("Failed to save agent to {}", args.output.display()))?;
            print_result("Training results (agent's side)", &result, &metrics);
            print_kv("Table", &format!("{} entries", format_number(agent.q_table_size())));
            print_kv("Saved", &args.output.display().to_string());
            result
        }
    };

    if let Some(path) = &args.summary {
        result
            .save(path)
            .with_context(|| format!("Failed to write summary to {}", path.display()))?;
        print_kv("Summary", &path.display().to_string());
    }

    Ok(())
}
