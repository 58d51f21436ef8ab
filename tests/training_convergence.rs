//! Long-run regression: trained tables must not lose to random play.

use ttt_qlearn::{
    app::AgentConfig,
    pipeline::{
        AgentRole, Evaluator, MetricsObserver, RandomPolicy, TrainingConfig, TrainingMode,
        TrainingPipeline,
    },
    q_learning::QLearningAgent,
    tictactoe::Player,
};

fn learner_config() -> AgentConfig {
    AgentConfig::default()
        .with_learning_rate(0.5)
        .with_discount_factor(0.95)
        .with_epsilon_schedule(1.0, 0.9999, 0.1)
}

#[test]
fn self_play_x_table_rarely_loses_to_random() {
    let mut agent_x = QLearningAgent::new(learner_config()).unwrap();
    let mut agent_o = QLearningAgent::new(learner_config()).unwrap();
    let metrics = MetricsObserver::new();

    let training = TrainingConfig {
        episodes: 50_000,
        seed: Some(2024),
        mode: TrainingMode::SelfPlay,
        log_every: 0,
    };
    let result = TrainingPipeline::new(training)
        .with_observer(Box::new(metrics.clone()))
        .run_self_play(&mut agent_x, &mut agent_o)
        .unwrap();
    assert_eq!(result.total_games, 50_000);
    assert_eq!(metrics.summary().total_games, 50_000);
    assert_eq!(agent_x.epsilon(), 0.1);

    let mut random = RandomPolicy::new(Some(7));
    let evaluation = Evaluator::new(1000).run(&mut agent_x, &mut random).unwrap();
    assert!(
        evaluation.non_loss_rate() >= 0.9,
        "X won {} drew {} lost {}",
        evaluation.wins,
        evaluation.draws,
        evaluation.losses
    );
}

#[test]
fn random_opponent_training_rarely_loses() {
    let mut agent = QLearningAgent::new(learner_config()).unwrap();
    let training = TrainingConfig {
        episodes: 30_000,
        seed: Some(11),
        mode: TrainingMode::VersusRandom {
            role: AgentRole::Fixed(Player::X),
        },
        log_every: 0,
    };
    TrainingPipeline::new(training)
        .run_versus_random(&mut agent)
        .unwrap();

    let evaluation = Evaluator::new(1000)
        .run(&mut agent, &mut RandomPolicy::new(Some(12)))
        .unwrap();
    assert!(
        evaluation.non_loss_rate() >= 0.9,
        "won {} drew {} lost {}",
        evaluation.wins,
        evaluation.draws,
        evaluation.losses
    );
}
