//! Rules of the game environment

mod common;

use common::play_sequence;
use rand::{SeedableRng, rngs::StdRng, seq::IndexedRandom};
use ttt_qlearn::{
    Error,
    tictactoe::{Cell, GameOutcome, Player, TicTacToe},
};

#[test]
fn legal_actions_are_exactly_the_empty_cells() {
    let mut rng = StdRng::seed_from_u64(17);
    let mut env = TicTacToe::new();

    for _ in 0..200 {
        env.reset();
        while !env.is_done() {
            let legal = env.legal_actions();
            let board = env.board();
            for idx in 0..9 {
                assert_eq!(legal.contains(&idx), board.get(idx) == Some(Cell::Empty));
            }
            assert_eq!(legal.len() + board.occupied_count(), 9);

            let x = board.count(Player::X);
            let o = board.count(Player::O);
            assert!(x == o || x == o + 1, "x={x} o={o}");

            let action = *legal.choose(&mut rng).unwrap();
            env.step(action).unwrap();
        }
        assert!(env.legal_actions().is_empty());
    }
}

#[test]
fn top_row_wins_for_x_on_fifth_step() {
    let (env, steps) = play_sequence(&[0, 3, 1, 4, 2]);

    for step in &steps[..4] {
        assert!(!step.done);
        assert_eq!(step.reward, 0.0);
    }
    let last = steps[4];
    assert!(last.done);
    assert_eq!(last.reward, 1.0);
    assert!(!last.info.illegal);
    assert_eq!(env.outcome(), Some(GameOutcome::Win(Player::X)));
}

#[test]
fn full_board_without_line_is_a_draw() {
    let (env, steps) = play_sequence(&[0, 1, 2, 4, 3, 5, 7, 6, 8]);

    assert!(steps[..8].iter().all(|s| !s.done));
    let last = steps[8];
    assert!(last.done);
    assert_eq!(last.reward, 0.0);
    assert_eq!(env.outcome(), Some(GameOutcome::Draw));
    assert!(env.board().is_full());
}

#[test]
fn stepping_after_the_end_fails_until_reset() {
    let (mut env, _) = play_sequence(&[0, 3, 1, 4, 2]);

    assert!(matches!(env.step(5), Err(Error::GameOver)));
    // Nothing changed
    assert_eq!(env.board().occupied_count(), 5);

    let board = env.reset();
    assert_eq!(board.occupied_count(), 0);
    assert_eq!(env.current_player(), Player::X);
    assert!(env.step(5).is_ok());
}

#[test]
fn occupied_cell_forfeits_to_the_opponent() {
    let mut env = TicTacToe::new();
    env.step(4).unwrap();
    let step = env.step(4).unwrap();

    assert!(step.done);
    assert_eq!(step.reward, -1.0);
    assert!(step.info.illegal);
    assert_eq!(env.outcome(), Some(GameOutcome::Win(Player::X)));
    assert!(matches!(env.step(0), Err(Error::GameOver)));
}

#[test]
fn out_of_range_action_is_rejected_without_mutation() {
    let mut env = TicTacToe::new();
    assert!(matches!(
        env.step(9),
        Err(Error::InvalidPosition { position: 9 })
    ));
    assert!(!env.is_done());
    assert_eq!(env.legal_actions().len(), 9);
}

#[test]
fn o_win_reports_reward_to_o() {
    // X: 0, 1, 8   O: 3, 4, 5
    let (env, steps) = play_sequence(&[0, 3, 1, 4, 8, 5]);
    assert_eq!(steps[5].reward, 1.0);
    assert!(steps[5].done);
    assert_eq!(env.outcome(), Some(GameOutcome::Win(Player::O)));
}
