//! Bootstrap pretraining from historical data

use rand::{SeedableRng, rngs::StdRng};
use tempfile::TempDir;
use ttt_qlearn::{
    adapters::CsvSampleSource,
    app::{AgentConfig, PretrainConfig},
    pipeline::{Pretrainer, load_or_synthesize, synthetic_samples},
    ports::{HistoricalSample, SampleLabel, SampleSource},
    q_learning::QLearningAgent,
    tictactoe::Board,
    types::StateKey,
};

const UCI_ROWS: &str = "\
x,x,x,x,o,o,x,o,o,positive
x,x,x,x,o,o,o,x,o,positive
x,o,x,x,o,o,o,x,x,negative
o,x,x,x,o,o,x,o,o,negative
x,x,o,x,o,b,o,b,b,negative
x,o,b,x,o,b,x,b,b,positive
not,a,row
";

#[test]
fn pretraining_from_a_csv_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tic-tac-toe.data");
    std::fs::write(&path, UCI_ROWS).unwrap();

    let source = CsvSampleSource::new(&path);
    let mut rng = StdRng::seed_from_u64(1);
    let samples = load_or_synthesize(&source, 50, &mut rng).unwrap();
    assert_eq!(samples.len(), 6);
    assert_eq!(
        samples.iter().filter(|s| s.label == SampleLabel::Win).count(),
        3
    );

    let mut agent = QLearningAgent::new(AgentConfig::default().with_seed(2)).unwrap();
    let mut pretrainer = Pretrainer::new(PretrainConfig::default().with_steps(500), Some(3));
    let report = pretrainer.run(&mut agent, &samples).unwrap();

    assert_eq!(report.steps, 500);
    assert_eq!(report.updates + report.skipped_terminal, 500);
    assert!(report.updates > 0);
    assert!(!agent.q_table().is_empty());
    for (_, _, value) in agent.q_table().iter() {
        assert!((-1.0..=1.0).contains(&value));
    }
}

#[test]
fn winning_label_credits_the_winning_move() {
    // X completed the top row; clearing one X leaves X a move from winning
    let samples = vec![HistoricalSample {
        board: Board::from_values(&[1, 1, 1, -1, -1, 0, 0, 0, 0]).unwrap(),
        label: SampleLabel::Win,
    }];
    let config = AgentConfig::default()
        .with_seed(9)
        .with_epsilon_schedule(1.0, 1.0, 1.0);
    let mut agent = QLearningAgent::new(config).unwrap();
    let report = Pretrainer::new(PretrainConfig::default().with_steps(2000), Some(10))
        .run(&mut agent, &samples)
        .unwrap();
    assert!(report.updates > 0);

    let one_move_from_win: StateKey = "XX.OO...._X".parse().unwrap();
    // One +1 update already lifts the entry to α = 0.5
    assert!(agent.q_table().get(&one_move_from_win, 2) >= 0.5);
    // A winning label never produces a negative reward
    assert!(agent.q_table().iter().all(|(_, _, value)| value >= 0.0));
}

#[test]
fn missing_file_falls_back_to_random_games() {
    let dir = TempDir::new().unwrap();
    let source = CsvSampleSource::new(dir.path().join("absent.data"));
    assert!(source.load_samples().is_err());

    let mut rng = StdRng::seed_from_u64(4);
    let samples = load_or_synthesize(&source, 120, &mut rng).unwrap();
    assert_eq!(samples.len(), 120);

    let mut agent = QLearningAgent::new(AgentConfig::default().with_seed(5)).unwrap();
    let report = Pretrainer::new(PretrainConfig::default().with_steps(200), Some(6))
        .run(&mut agent, &samples)
        .unwrap();
    assert_eq!(report.steps, 200);
}

#[test]
fn generated_dataset_reads_back() {
    let dir = TempDir::new().unwrap();
    let source = CsvSampleSource::new(dir.path().join("generated.data"));
    let mut rng = StdRng::seed_from_u64(8);
    let samples = synthetic_samples(40, &mut rng).unwrap();

    source.write_samples(&samples).unwrap();
    assert_eq!(source.load_samples().unwrap(), samples);
}
