//! Turn and hand orchestration.
//!
//! One turn runs a fixed pipeline: the Devil offer, the betting action,
//! an optional trump play (only on a raise), an optional draw, and an
//! optional discard. Betting rounds rotate from the seat left of the
//! dealer until everyone live has acted and matched, and a full hand is
//! three such rounds around the turn and river deals, ending in a
//! showdown.

use crate::agents::{BetAction, DeciderTable, DrawAction, TurnAction};
use crate::game::{ActionError, GameState};
use crate::showdown::{award_pot, do_showdown, HandOutcome};
use crate::trionfi::{offer_devil, propose_effect, resolve_effect, EffectError};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TurnError {
    #[error(transparent)]
    Action(#[from] ActionError),
    #[error(transparent)]
    Effect(#[from] EffectError),
    #[error("a hand needs at least 2 players, got {0}")]
    NotEnoughPlayers(usize),
}

/// Run one seat's whole turn. Returns whether the seat is still in the
/// hand afterwards.
pub fn execute_turn(
    game: &mut GameState,
    deciders: &mut DeciderTable,
    seat: usize,
) -> Result<bool, TurnError> {
    if game.players()[seat].folded() {
        return Ok(false);
    }

    // Holding the Devil at turn start: last chance to pass it on.
    offer_devil(game, deciders, seat);

    let action = deciders
        .decider_mut(seat)
        .map(|d| d.take_turn(game, seat))
        .unwrap_or(TurnAction::check_call());

    match action.bet {
        BetAction::Fold => {
            game.player_fold(seat)?;
            notify(game, deciders);
            return Ok(false);
        }
        BetAction::Call => {
            game.player_call(seat)?;
        }
        BetAction::Raise(amount) => {
            game.player_raise(seat, amount)?;
            // A trump may only ride on a raise.
            if let Some(trionfo) = action.play_trionfo {
                let play = propose_effect(game, deciders, seat, trionfo)?;
                resolve_effect(game, deciders, play)?;
            }
        }
    }

    // Effects may have reshaped the hand or the piles since the decider
    // looked, so stale indices are skipped, not errors.
    if !game.players()[seat].drawn() {
        match action.draw {
            Some(DrawAction::DrawPile) => {
                game.draw_from_draw_pile(seat)?;
            }
            Some(DrawAction::DiscardPile { index }) => {
                if index < game.piles().discard_pile().len() {
                    game.draw_from_discard_pile(seat, index)?;
                }
            }
            Some(DrawAction::Community {
                hand_index,
                community_index,
            }) => {
                if hand_index < game.players()[seat].hand().len()
                    && community_index < game.community_cards().len()
                {
                    game.swap_with_community(seat, hand_index, community_index)?;
                }
            }
            None => {}
        }
    }

    if let Some(index) = action.discard_index {
        if index < game.players()[seat].hand().len() {
            game.discard_card(seat, index)?;
        }
    }

    notify(game, deciders);
    Ok(true)
}

/// Fan out any events logged since the deciders last saw the table.
fn notify(game: &GameState, deciders: &mut DeciderTable) {
    if let Some(event) = game.history_recent(1).first() {
        deciders.broadcast_event(game, event);
    }
}

/// One full betting round, rotating from the seat left of the dealer
/// until the round completes. Folded, all-in, and Hermit seats are
/// skipped; a forced showdown ends the round at once. The iteration cap
/// guards against a decider that raises forever.
pub fn run_betting_round(
    game: &mut GameState,
    deciders: &mut DeciderTable,
) -> Result<(), TurnError> {
    let n = game.players().len();
    if n == 0 {
        return Ok(());
    }
    let mut seat = (game.dealer() + 1) % n;
    let max_iterations = n * 10;
    let mut iterations = 0;

    while !game.round_complete() && iterations < max_iterations {
        if game.showdown_forced() {
            break;
        }
        if game.seat_in_rotation(seat) {
            execute_turn(game, deciders, seat)?;
        }
        seat = (seat + 1) % n;
        iterations += 1;
    }
    Ok(())
}

/// Play one complete hand: blinds, the initial deal, three betting
/// rounds around the turn and river, then showdown. The dealer button
/// moves afterwards.
pub fn play_hand(
    game: &mut GameState,
    deciders: &mut DeciderTable,
) -> Result<HandOutcome, TurnError> {
    let n = game.players().len();
    if n < 2 {
        return Err(TurnError::NotEnoughPlayers(n));
    }

    game.start_new_hand();
    game.collect_blinds();
    game.deal_initial_cards()?;

    run_betting_round(game, deciders)?;
    if let Some(outcome) = early_exit(game, deciders)? {
        return Ok(outcome);
    }

    game.reset_for_betting_round();
    game.deal_community_card()?;
    run_betting_round(game, deciders)?;
    if let Some(outcome) = early_exit(game, deciders)? {
        return Ok(outcome);
    }

    game.reset_for_betting_round();
    game.deal_community_card()?;
    run_betting_round(game, deciders)?;

    let outcome = do_showdown(game);
    finish(game, deciders);
    Ok(outcome)
}

/// Between rounds: a forced showdown or a lone survivor ends the hand
/// early.
fn early_exit(
    game: &mut GameState,
    deciders: &mut DeciderTable,
) -> Result<Option<HandOutcome>, TurnError> {
    if game.showdown_forced() {
        let outcome = do_showdown(game);
        finish(game, deciders);
        return Ok(Some(outcome));
    }
    let active = game.active_seats();
    if active.len() <= 1 {
        let outcome = match active.first() {
            Some(&seat) => award_pot(game, seat),
            None => HandOutcome::Voided,
        };
        finish(game, deciders);
        return Ok(Some(outcome));
    }
    Ok(None)
}

fn finish(game: &mut GameState, deciders: &mut DeciderTable) {
    deciders.broadcast_showdown(game);
    game.advance_dealer();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::QueuedDecider;
    use crate::cards::{Card, Trionfo};

    fn mk(n: usize) -> (GameState, DeciderTable) {
        let names: Vec<String> = (1..=n).map(|i| format!("P{i}")).collect();
        let refs: Vec<&str> = names.iter().map(|s| s.as_str()).collect();
        (
            GameState::with_seed(&refs, 500, 10, 5),
            DeciderTable::for_seats(n),
        )
    }

    #[test]
    fn empty_table_defaults_to_calls_and_reaches_showdown() {
        let (mut g, mut t) = mk(3);
        let outcome = play_hand(&mut g, &mut t).unwrap();
        // with check-call deciders everyone reaches a showdown
        match outcome {
            HandOutcome::Won { amount, .. } => assert_eq!(amount, 30),
            HandOutcome::Voided => {}
        }
        assert_eq!(g.total_cards(), 78);
        assert_eq!(g.community_cards().len(), 5);
        assert_eq!(g.dealer(), 1);
    }

    #[test]
    fn fold_out_awards_by_default() {
        let (mut g, mut t) = mk(2);
        let mut d = QueuedDecider::new();
        d.queue_turn(crate::agents::TurnAction::fold());
        t.set_decider(1, Some(Box::new(d)));

        let outcome = play_hand(&mut g, &mut t).unwrap();
        // seat 1 (left of dealer 0) folds first; seat 0 wins blinds
        assert_eq!(outcome, HandOutcome::Won { seat: 0, amount: 15 });
        assert_eq!(g.players()[0].credits(), 505);
    }

    #[test]
    fn one_player_is_rejected() {
        let (mut g, mut t) = mk(1);
        assert_eq!(
            play_hand(&mut g, &mut t).unwrap_err(),
            TurnError::NotEnoughPlayers(1)
        );
    }

    #[test]
    fn raise_plays_a_trump() {
        let (mut g, mut t) = mk(2);
        g.start_new_hand();
        g.collect_blinds();
        g.deal_initial_cards().unwrap();
        g.players[1].hand.push(Card::trionfo(Trionfo::Sun));

        let mut d = QueuedDecider::new();
        d.queue_turn(crate::agents::TurnAction {
            bet: BetAction::Raise(10),
            play_trionfo: Some(Trionfo::Sun),
            draw: None,
            discard_index: None,
        });
        t.set_decider(1, Some(Box::new(d)));

        execute_turn(&mut g, &mut t, 1).unwrap();
        assert!(g.hands_face_up());
    }

    #[test]
    fn draw_only_once_per_round() {
        let (mut g, mut t) = mk(2);
        g.start_new_hand();
        g.deal_initial_cards().unwrap();

        let mut d = QueuedDecider::new();
        d.queue_turn(crate::agents::TurnAction {
            bet: BetAction::Call,
            play_trionfo: None,
            draw: Some(DrawAction::DrawPile),
            discard_index: None,
        });
        d.queue_turn(crate::agents::TurnAction {
            bet: BetAction::Call,
            play_trionfo: None,
            draw: Some(DrawAction::DrawPile),
            discard_index: None,
        });
        t.set_decider(0, Some(Box::new(d)));

        execute_turn(&mut g, &mut t, 0).unwrap();
        assert_eq!(g.players()[0].hand().len(), 3);
        // second draw in the same round is ignored
        execute_turn(&mut g, &mut t, 0).unwrap();
        assert_eq!(g.players()[0].hand().len(), 3);
    }

    #[test]
    fn hermit_seat_does_not_stall_the_betting_round() {
        let (mut g, mut t) = mk(3);
        g.start_new_hand();
        g.collect_blinds();
        g.deal_initial_cards().unwrap();
        g.players[2].hermit = true;

        run_betting_round(&mut g, &mut t).unwrap();
        // the round must end because it completed, not because the
        // iteration cap ran out
        assert!(g.round_complete());
        assert!(g.players()[0].acted());
        assert!(g.players()[1].acted());
        assert!(!g.players()[2].acted());
    }

    #[test]
    fn judgment_mid_round_skips_to_showdown() {
        let (mut g, mut t) = mk(3);
        g.start_new_hand();
        g.collect_blinds();
        g.deal_initial_cards().unwrap();
        g.players[1].hand.push(Card::trionfo(Trionfo::Judgment));

        let mut d = QueuedDecider::new();
        d.queue_turn(crate::agents::TurnAction {
            bet: BetAction::Raise(10),
            play_trionfo: Some(Trionfo::Judgment),
            draw: None,
            discard_index: None,
        });
        t.set_decider(1, Some(Box::new(d)));

        run_betting_round(&mut g, &mut t).unwrap();
        assert!(g.showdown_forced());
        // seats after the judgment player never acted
        assert!(!g.players()[2].acted());
    }
}
