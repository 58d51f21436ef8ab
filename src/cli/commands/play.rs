//! Play command - a human against a trained agent on the console

use std::{
    io::{self, BufRead, Write},
    path::{Path, PathBuf},
};

use anyhow::{Result, bail};
use clap::Parser;

use crate::{
    app::App,
    cli::commands::train::{DEFAULT_OUTPUT, paired_paths, parse_player_token},
    pipeline::RandomPolicy,
    ports::Policy,
    tictactoe::{GameOutcome, Player, TicTacToe},
};

#[derive(Parser, Debug)]
#[command(about = "Play against a trained agent")]
pub struct PlayArgs {
    /// Trained model for the agent's mark; defaults to the self-play table
    /// for the mark opposite `--human`
    pub model: Option<PathBuf>,

    /// Which mark you play (`x` or `o`); X always moves first
    #[arg(long, default_value = "x")]
    pub human: String,

    /// Random seed for tie-breaking
    #[arg(long)]
    pub seed: Option<u64>,
}

/// Final tally of a console session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub games: usize,
    pub human_wins: usize,
    pub agent_wins: usize,
    pub draws: usize,
}

fn write_board<W: Write>(out: &mut W, env: &TicTacToe) -> io::Result<()> {
    writeln!(out)?;
    for row in 0..3 {
        let cells: Vec<String> = (0..3)
            .map(|col| {
                let idx = row * 3 + col;
                match env.board().get(idx).and_then(|c| c.player()) {
                    Some(player) => player.to_string(),
                    None => idx.to_string(),
                }
            })
            .collect();
        writeln!(out, " {}", cells.join(" | "))?;
        if row < 2 {
            writeln!(out, "---+---+---")?;
        }
    }
    writeln!(out)
}

/// Read one trimmed line, `None` at end of input.
fn read_line<R: BufRead>(input: &mut R) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Run games until the human declines a rematch or input ends.
///
/// Human input is checked against the legal moves before it reaches the
/// environment; the agent moves greedily through `agent`.
pub fn run_session<R: BufRead, W: Write>(
    agent: &mut dyn Policy,
    human: Player,
    mut input: R,
    mut out: W,
) -> Result<SessionSummary> {
    let mut summary = SessionSummary::default();
    let mut env = TicTacToe::new();

    'games: loop {
        env.reset();
        writeln!(out, "New game: you are {human}, the agent is {}.", human.opponent())?;

        let outcome = loop {
            if let Some(outcome) = env.outcome() {
                break outcome;
            }
            write_board(&mut out, &env)?;
            let legal = env.legal_actions();

            let action = if env.current_player() == human {
                loop {
                    write!(out, "Your move (0-8): ")?;
                    out.flush()?;
                    let Some(line) = read_line(&mut input)? else {
                        writeln!(out)?;
                        break 'games;
                    };
                    match line.parse::<usize>() {
                        Ok(action) if legal.contains(&action) => break action,
                        _ => writeln!(out, "Illegal move '{line}', choose one of {legal:?}.")?,
                    }
                }
            } else {
                let action = agent.choose_action(&env.state_key(), &legal)?;
                writeln!(out, "Agent plays {action}.")?;
                action
            };

            env.step(action)?;
        };

        write_board(&mut out, &env)?;
        summary.games += 1;
        match outcome {
            GameOutcome::Win(winner) if winner == human => {
                summary.human_wins += 1;
                writeln!(out, "You win!")?;
            }
            GameOutcome::Win(_) => {
                summary.agent_wins += 1;
                writeln!(out, "The agent wins.")?;
            }
            GameOutcome::Draw => {
                summary.draws += 1;
                writeln!(out, "Draw.")?;
            }
        }

        write!(out, "Play again? [y/N]: ")?;
        out.flush()?;
        match read_line(&mut input)? {
            Some(answer) if answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes") => {}
            _ => break,
        }
    }

    writeln!(
        out,
        "Games: {} | you {} | agent {} | draws {}",
        summary.games, summary.human_wins, summary.agent_wins, summary.draws
    )?;
    Ok(summary)
}

/// Self-play table trained for the agent's side when `human` plays the other.
pub fn default_model_path(human: Player) -> PathBuf {
    let (path_x, path_o) = paired_paths(Path::new(DEFAULT_OUTPUT));
    match human.opponent() {
        Player::X => path_x,
        Player::O => path_o,
    }
}

pub fn execute(args: PlayArgs) -> Result<()> {
    let human = parse_player_token(&args.human, "--human")?;
    let model_path = args.model.unwrap_or_else(|| default_model_path(human));
    let app = match args.seed {
        Some(seed) => App::for_testing().with_default_seed(seed).build(),
        None => App::new(),
    };

    let mut agent: Box<dyn Policy> = match app.load_model(&model_path) {
        Ok(model) => {
            if !model.metadata.fits(human.opponent()) {
                bail!(
                    "{} was trained to play {}, but the agent plays {} when you are {human}",
                    model_path.display(),
                    model.metadata.agent_player.map_or_else(String::new, |p| p.to_string()),
                    human.opponent()
                );
            }
            let mut agent = model.to_agent()?;
            if let Some(seed) = app.default_seed() {
                agent.reseed(seed);
            }
            println!(
                "Loaded {} table entries from {}",
                agent.q_table_size(),
                model_path.display()
            );
            Box::new(agent)
        }
        Err(err) if err.is_persistence() => {
            log::warn!("{err}");
            println!("No usable model at {}, the agent will play randomly.", model_path.display());
            Box::new(RandomPolicy::new(args.seed))
        }
        Err(err) => return Err(err.into()),
    };

    let stdin = io::stdin();
    run_session(agent.as_mut(), human, stdin.lock(), io::stdout())?;
    Ok(())
}
