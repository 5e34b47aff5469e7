use tarocchi::game::{ActionError, GameState};

fn mk(n: usize, credits: u32) -> GameState {
    let names: Vec<String> = (1..=n).map(|i| format!("P{i}")).collect();
    let refs: Vec<&str> = names.iter().map(|s| s.as_str()).collect();
    let mut g = GameState::with_seed(&refs, credits, 10, 99);
    g.start_new_hand();
    g
}

#[test]
fn blinds_post_left_of_the_dealer() {
    let mut g = mk(3, 500);
    g.collect_blinds();
    assert_eq!(g.players()[1].current_bet(), 5);
    assert_eq!(g.players()[2].current_bet(), 10);
    assert_eq!(g.players()[0].current_bet(), 0);
    assert_eq!(g.pot(), 15);
    assert_eq!(g.current_bet(), 10);
}

#[test]
fn short_stack_blind_is_all_in() {
    let mut g = mk(3, 4);
    g.collect_blinds();
    // 4 credits cannot cover either blind
    assert_eq!(g.players()[1].current_bet(), 4);
    assert_eq!(g.players()[2].current_bet(), 4);
    assert!(g.players()[2].all_in());
    assert_eq!(g.pot(), 8);
}

#[test]
fn call_matches_and_check_is_free() {
    let mut g = mk(3, 500);
    g.collect_blinds();
    assert_eq!(g.player_call(0).unwrap(), 10);
    assert_eq!(g.player_call(1).unwrap(), 5);
    // big blind is already matched: a call is a check
    assert_eq!(g.player_call(2).unwrap(), 0);
    assert_eq!(g.pot(), 30);
    assert!(g.round_complete());
}

#[test]
fn raise_below_minimum_is_rejected() {
    let mut g = mk(3, 500);
    g.collect_blinds();
    let err = g.player_raise(0, 4).unwrap_err();
    assert_eq!(err, ActionError::RaiseBelowMinimum { min: 10, got: 4 });
    // nothing moved
    assert_eq!(g.pot(), 15);
    assert_eq!(g.players()[0].current_bet(), 0);
}

#[test]
fn raise_reopens_the_action() {
    let mut g = mk(3, 500);
    g.collect_blinds();
    g.player_call(0).unwrap();
    g.player_call(1).unwrap();
    assert_eq!(g.player_raise(2, 10).unwrap(), 10);
    assert_eq!(g.current_bet(), 20);
    // the callers owe again
    assert!(!g.round_complete());
    g.player_call(0).unwrap();
    g.player_call(1).unwrap();
    assert!(g.round_complete());
    assert_eq!(g.pot(), 60);
}

#[test]
fn oversized_raise_clamps_to_all_in() {
    let mut g = mk(3, 500);
    g.collect_blinds();
    let paid = g.player_raise(0, 600).unwrap();
    assert_eq!(paid, 500);
    assert!(g.players()[0].all_in());
    assert_eq!(g.current_bet(), 500);
    // the blinds owe the rest of their stacks or fold
    assert!(!g.round_complete());
}

#[test]
fn folded_seat_cannot_act_again() {
    let mut g = mk(3, 500);
    g.collect_blinds();
    g.player_fold(0).unwrap();
    assert_eq!(g.player_call(0).unwrap_err(), ActionError::AlreadyFolded);
    assert_eq!(g.player_raise(0, 10).unwrap_err(), ActionError::AlreadyFolded);
    assert_eq!(g.player_fold(0).unwrap_err(), ActionError::AlreadyFolded);
}

#[test]
fn fold_out_completes_the_round() {
    let mut g = mk(2, 500);
    g.collect_blinds();
    g.player_fold(1).unwrap();
    assert!(g.round_complete());
    assert_eq!(g.active_seats(), vec![0]);
}

#[test]
fn reset_clears_per_round_state_but_keeps_the_pot() {
    let mut g = mk(3, 500);
    g.collect_blinds();
    g.player_call(0).unwrap();
    g.reset_for_betting_round();
    assert_eq!(g.current_bet(), 0);
    assert_eq!(g.pot(), 25);
    for p in g.players() {
        assert_eq!(p.current_bet(), 0);
        assert!(!p.acted());
        assert!(!p.drawn());
    }
}

#[test]
fn out_of_range_seat_is_reported() {
    let mut g = mk(2, 500);
    assert_eq!(
        g.player_call(5).unwrap_err(),
        ActionError::SeatOutOfRange { seat: 5, len: 2 }
    );
}
