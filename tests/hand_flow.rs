use tarocchi::agents::{BotDecider, BotProfile, DeciderTable, Difficulty, SessionContext};
use tarocchi::game::{EventVerb, GameState};
use tarocchi::showdown::HandOutcome;
use tarocchi::turn::{play_hand, TurnError};

fn mk(n: usize, seed: u64) -> GameState {
    let names: Vec<String> = (1..=n).map(|i| format!("P{i}")).collect();
    let refs: Vec<&str> = names.iter().map(|s| s.as_str()).collect();
    GameState::with_seed(&refs, 500, 10, seed)
}

fn bot_table(n: usize, seed: u64) -> DeciderTable {
    let context = SessionContext::shared();
    let mut table = DeciderTable::for_seats(n);
    for seat in 0..n {
        let profile = BotProfile::for_difficulty(Difficulty::Medium).with_seed(seed * 31 + seat as u64);
        table.set_decider(seat, Some(Box::new(BotDecider::new(profile, context.clone()))));
    }
    table
}

#[test]
fn passive_table_reaches_showdown_with_all_cards_accounted() {
    let mut game = mk(4, 2);
    let mut deciders = DeciderTable::for_seats(4);
    let outcome = play_hand(&mut game, &mut deciders).unwrap();
    assert_eq!(game.total_cards(), 78);
    assert_eq!(game.community_cards().len(), 5);
    assert_eq!(game.pot(), 0);
    match outcome {
        HandOutcome::Won { seat, amount } => {
            assert!(seat < 4);
            assert_eq!(amount, 40); // everyone called the big blind
            assert_eq!(game.winner(), Some(seat));
        }
        HandOutcome::Voided => assert_eq!(game.winner(), None),
    }
    // button moved for the next hand
    assert_eq!(game.dealer(), 1);
}

#[test]
fn bot_hands_conserve_the_card_economy() {
    for seed in 0..12u64 {
        let mut game = mk(3, seed);
        let mut deciders = bot_table(3, seed);
        let before: u32 = game.players().iter().map(|p| p.credits()).sum();
        let outcome = play_hand(&mut game, &mut deciders).unwrap();
        assert_eq!(game.total_cards(), 78, "seed {seed}");
        assert_eq!(game.pot(), 0, "seed {seed}");

        let after: u32 = game.players().iter().map(|p| p.credits()).sum();
        match outcome {
            // every credit that left a stack landed in the winner's
            HandOutcome::Won { .. } => assert_eq!(after, before, "seed {seed}"),
            // a voided pot is forfeited
            HandOutcome::Voided => assert!(after <= before, "seed {seed}"),
        }
    }
}

#[test]
fn bot_winner_was_never_folded() {
    for seed in 20..30u64 {
        let mut game = mk(5, seed);
        let mut deciders = bot_table(5, seed);
        let outcome = play_hand(&mut game, &mut deciders).unwrap();
        if let HandOutcome::Won { seat, .. } = outcome {
            assert!(!game.players()[seat].folded(), "seed {seed}");
        }
    }
}

#[test]
fn consecutive_hands_rotate_the_button() {
    let mut game = mk(3, 77);
    let mut deciders = bot_table(3, 77);
    for expected_dealer in 1..=3usize {
        play_hand(&mut game, &mut deciders).unwrap();
        assert_eq!(game.dealer(), expected_dealer % 3);
    }
}

#[test]
fn history_records_the_blinds_first() {
    let mut game = mk(3, 5);
    let mut deciders = DeciderTable::for_seats(3);
    play_hand(&mut game, &mut deciders).unwrap();
    let n = game.history_len();
    assert!(n >= 3);
    let events = game.history_recent(n);
    assert_eq!(events[0].verb, EventVerb::SmallBlind);
    assert_eq!(events[0].amount, Some(5));
    assert_eq!(events[1].verb, EventVerb::BigBlind);
    assert_eq!(events[1].amount, Some(10));
    assert!(events.iter().any(|e| matches!(e.verb, EventVerb::Win | EventVerb::PotVoided)));
}

#[test]
fn too_few_players_is_an_error() {
    let mut game = mk(1, 0);
    let mut deciders = DeciderTable::for_seats(1);
    assert_eq!(
        play_hand(&mut game, &mut deciders).unwrap_err(),
        TurnError::NotEnoughPlayers(1)
    );
}
