//! Evaluate command - greedy games of a trained table against a random
//! opponent or against another trained table

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;

use crate::{
    app::App,
    cli::{
        commands::train::parse_player_token,
        output::{format_number, print_kv, print_outcomes, print_section},
    },
    pipeline::{EvaluationResult, Evaluator, RandomPolicy},
    ports::Policy,
    q_learning::SavedAgent,
    tictactoe::Player,
};

#[derive(Parser, Debug)]
#[command(about = "Evaluate a trained agent")]
pub struct EvaluateArgs {
    /// Path to the trained model
    pub model: PathBuf,

    /// Second trained model playing the other mark (AI vs AI); random moves if omitted
    #[arg(long)]
    pub opponent_model: Option<PathBuf>,

    /// Which mark the evaluated model plays (`x` or `o`)
    #[arg(long, default_value = "x")]
    pub agent_player: String,

    /// Number of evaluation games
    #[arg(long, short = 'g', default_value_t = 1000)]
    pub games: usize,

    /// Random seed for tie-breaking and the random opponent
    #[arg(long)]
    pub seed: Option<u64>,

    /// Export results to a JSON file
    #[arg(long)]
    pub export: Option<PathBuf>,
}

fn print_model_info(label: &str, model: &SavedAgent) {
    print_section(label);
    print_kv("Table entries", &format_number(model.q_table.len()));
    if let Some(episodes) = model.metadata.episodes_trained {
        print_kv("Episodes trained", &format_number(episodes));
    }
    if let Some(opponent) = &model.metadata.trained_against {
        print_kv("Trained against", opponent);
    }
    if let Some(player) = model.metadata.agent_player {
        print_kv("Trained as", &player.to_string());
    }
}

/// Refuse a table trained for the other mark; its lookups would all miss.
fn ensure_fits(path: &Path, model: &SavedAgent, player: Player) -> Result<()> {
    if !model.metadata.fits(player) {
        bail!(
            "{} was trained to play {}, not {player}",
            path.display(),
            player.opponent()
        );
    }
    Ok(())
}

pub fn execute(args: EvaluateArgs) -> Result<()> {
    let agent_player = parse_player_token(&args.agent_player, "--agent-player")?;
    let app = match args.seed {
        Some(seed) => App::for_testing().with_default_seed(seed).build(),
        None => App::new(),
    };

    let load = |path: &PathBuf| -> Result<_> {
        let model = app
            .load_model(path)
            .with_context(|| format!("Failed to load model from {}", path.display()))?;
        let mut agent = model.to_agent()?;
        if let Some(seed) = app.default_seed() {
            agent.reseed(seed);
        }
        Ok((model, agent))
    };

    let (model, mut agent) = load(&args.model)?;
    ensure_fits(&args.model, &model, agent_player)?;
    print_model_info(&format!("Model {}", args.model.display()), &model);

    let mut opponent: Box<dyn Policy> = match &args.opponent_model {
        Some(path) => {
            let (opponent_model, mut opponent_agent) = load(path)?;
            ensure_fits(path, &opponent_model, agent_player.opponent())?;
            if let Some(seed) = args.seed {
                opponent_agent.reseed(seed.wrapping_add(1));
            }
            print_model_info(&format!("Opponent {}", path.display()), &opponent_model);
            Box::new(opponent_agent)
        }
        None => Box::new(RandomPolicy::new(args.seed.map(|s| s.wrapping_add(1)))),
    };

    print_section("Evaluation");
    print_kv("Agent plays", &agent_player.to_string());
    print_kv("Opponent", opponent.name());
    print_kv("Games", &format_number(args.games));

    let evaluator = Evaluator::new(args.games).with_perspective(agent_player);
    let result: EvaluationResult = match agent_player {
        Player::X => evaluator.run(&mut agent, opponent.as_mut())?,
        Player::O => evaluator.run(opponent.as_mut(), &mut agent)?,
    };

    print_section(&format!("Results from {agent_player}'s side"));
    print_outcomes(result.wins, result.draws, result.losses, result.games);
    print_kv(
        "Not lost",
        &format!("{:.1}%", result.non_loss_rate() * 100.0),
    );

    if let Some(path) = &args.export {
        let file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        serde_json::to_writer_pretty(file, &result)?;
        print_kv("Exported", &path.display().to_string());
    }

    Ok(())
}
