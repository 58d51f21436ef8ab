//! Action selection and the TD update

mod common;

use common::seeded_agent;
use ttt_qlearn::{StateKey, tictactoe::Player};

fn key(label: &str) -> StateKey {
    label.parse().unwrap()
}

#[test]
fn greedy_choice_always_has_the_maximum_value() {
    let mut agent = seeded_agent(3);
    let state = key("X...O...._X");
    let legal = [1, 2, 3, 5, 6, 7, 8];
    agent.q_table_mut().set(&state, 2, 0.7);
    agent.q_table_mut().set(&state, 6, 0.7);
    agent.q_table_mut().set(&state, 8, -0.4);

    let max = agent.q_table().max_q(&state, &legal);
    let mut chosen = std::collections::HashSet::new();
    for _ in 0..200 {
        let action = agent.select_action(&state, &legal, false).unwrap();
        assert_eq!(agent.q_table().get(&state, action), max);
        chosen.insert(action);
    }
    assert_eq!(chosen.len(), 2, "both maximizers should be picked");
}

#[test]
fn greedy_choice_ignores_epsilon() {
    let mut agent = seeded_agent(5);
    agent.set_epsilon(1.0);
    let state = key("........._X");
    agent.q_table_mut().set(&state, 4, 0.1);
    for _ in 0..50 {
        assert_eq!(agent.select_action(&state, &(0..9).collect::<Vec<_>>(), false).unwrap(), 4);
    }
}

#[test]
fn terminal_update_moves_toward_reward() {
    let mut agent = seeded_agent(1);
    let alpha = agent.config().learning_rate;
    let state = key("XX.OO...._X");
    let next = key("XXXOO...._O");
    agent.q_table_mut().set(&state, 2, 0.25);

    agent.update(&state, 2, 1.0, &next, &[5, 6], true);
    assert_eq!(agent.q_table().get(&state, 2), 0.25 + alpha * (1.0 - 0.25));
}

#[test]
fn empty_next_actions_bootstrap_to_zero() {
    let mut agent = seeded_agent(1);
    let alpha = agent.config().learning_rate;
    let state = key("X...O...._X");
    let next = key("XX..O...._O");
    agent.q_table_mut().set(&next, 3, 5.0);

    agent.update(&state, 1, -0.5, &next, &[], false);
    assert_eq!(agent.q_table().get(&state, 1), alpha * -0.5);
}

#[test]
fn lookups_do_not_grow_the_table() {
    let mut agent = seeded_agent(2);
    let state = key("........._X");
    assert_eq!(agent.q_table().get(&state, 0), 0.0);
    agent.select_action(&state, &[0, 1, 2], false).unwrap();
    assert_eq!(agent.q_table().max_q(&state, &[0, 1]), 0.0);
    assert!(agent.q_table().is_empty());

    let next = StateKey::new(*state.board(), Player::O);
    agent.update(&state, 0, 0.0, &next, &[1], false);
    assert_eq!(agent.q_table().len(), 1);
    assert!(agent.q_table().contains(&state, 0));
}
