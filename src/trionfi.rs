//! Trump effect resolution.
//!
//! Playing a trump goes through three phases. `propose_effect` settles
//! everything that needs a choice but touches nothing: it validates the
//! play and picks the target for the targeted trumps. The interrupt
//! poll then offers every other live seat, in order left of the actor,
//! the chance to spend a Hanged Man; the first acceptance wins and the
//! effect handler never runs. Only `resolve_effect`'s commit step
//! mutates the table, finishing by moving the spent trump to the
//! removed pile unless the card stays in hand.

use crate::agents::{DeciderTable, EmperorResponse};
use crate::cards::{Card, Trionfo};
use crate::evaluator::evaluate_hand;
use crate::game::{ActionError, EventVerb, GameState};
use crate::piles::PileError;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EffectError {
    #[error("{0} is not in the player's hand")]
    CardNotHeld(Trionfo),
    #[error("{0} has no playable effect")]
    PassiveTrionfo(Trionfo),
    #[error(transparent)]
    Action(#[from] ActionError),
    #[error(transparent)]
    Pile(#[from] PileError),
}

/// A validated play, ready for the interrupt poll. Building one mutates
/// nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectPlay {
    pub trionfo: Trionfo,
    pub actor: usize,
    pub target: Option<usize>,
}

/// What happened to a committed play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum EffectOutcome {
    Applied,
    /// A Hanged Man from this seat cancelled it; both trumps are gone.
    Nullified { by: usize },
    /// A targeted trump with nobody to target; the card stays in hand.
    NoTarget,
}

fn hand_position(game: &GameState, seat: usize, trionfo: Trionfo) -> Option<usize> {
    game.players()[seat]
        .hand()
        .iter()
        .position(|&c| c == Card::trionfo(trionfo))
}

/// Seats a targeted trump may hit: live, not the actor, and not hidden
/// behind the Hermit.
pub fn valid_targets(game: &GameState, actor: usize) -> Vec<usize> {
    game.players()
        .iter()
        .enumerate()
        .filter(|(i, p)| *i != actor && !p.folded() && !p.hermit())
        .map(|(i, _)| i)
        .collect()
}

/// Phase one: validate the play and settle its target. Touches nothing.
pub fn propose_effect(
    game: &GameState,
    deciders: &mut DeciderTable,
    actor: usize,
    trionfo: Trionfo,
) -> Result<EffectPlay, EffectError> {
    if hand_position(game, actor, trionfo).is_none() {
        return Err(EffectError::CardNotHeld(trionfo));
    }
    if !trionfo.has_effect() {
        return Err(EffectError::PassiveTrionfo(trionfo));
    }
    let target = match trionfo {
        Trionfo::Emperor | Trionfo::Devil => {
            let candidates = valid_targets(game, actor);
            if candidates.is_empty() {
                None
            } else {
                let chosen = deciders
                    .decider_mut(actor)
                    .and_then(|d| d.choose_target(game, actor, trionfo))
                    .filter(|t| candidates.contains(t));
                Some(chosen.unwrap_or(candidates[0]))
            }
        }
        _ => None,
    };
    Ok(EffectPlay {
        trionfo,
        actor,
        target,
    })
}

/// Phase two: offer the Hanged Man to every other live seat, starting
/// left of the actor. First acceptance wins. Read-only; the caller
/// commits the nullification.
fn poll_interrupt(game: &GameState, deciders: &mut DeciderTable, play: &EffectPlay) -> Option<usize> {
    let n = game.players().len();
    for step in 1..n {
        let seat = (play.actor + step) % n;
        let p = &game.players()[seat];
        if p.folded() || hand_position(game, seat, Trionfo::HangedMan).is_none() {
            continue;
        }
        let wants = deciders
            .decider_mut(seat)
            .map(|d| d.nullify_effect(game, seat, play.actor, play.trionfo))
            .unwrap_or(false);
        if wants {
            return Some(seat);
        }
    }
    None
}

/// Run a proposed play to completion: interrupt poll, then commit.
pub fn resolve_effect(
    game: &mut GameState,
    deciders: &mut DeciderTable,
    play: EffectPlay,
) -> Result<EffectOutcome, EffectError> {
    // Targeted trump with no one to hit: log the attempt, keep the card.
    if matches!(play.trionfo, Trionfo::Emperor | Trionfo::Devil) && play.target.is_none() {
        game.record_event(
            Some(play.actor),
            EventVerb::PlayTrionfo,
            Some(play.trionfo.number() as u32),
        );
        return Ok(EffectOutcome::NoTarget);
    }

    game.record_event(
        Some(play.actor),
        EventVerb::PlayTrionfo,
        Some(play.trionfo.number() as u32),
    );

    if let Some(by) = poll_interrupt(game, deciders, &play) {
        remove_from_hand(game, by, Trionfo::HangedMan);
        remove_from_hand(game, play.actor, play.trionfo);
        game.record_event(Some(by), EventVerb::Nullify, Some(play.trionfo.number() as u32));
        return Ok(EffectOutcome::Nullified { by });
    }

    commit_effect(game, deciders, &play)?;

    // The Devil hands itself to the target; everything else consumed
    // here goes to the removed pile.
    if !play.trionfo.stays_in_hand() {
        remove_from_hand(game, play.actor, play.trionfo);
    }
    Ok(EffectOutcome::Applied)
}

fn remove_from_hand(game: &mut GameState, seat: usize, trionfo: Trionfo) {
    if let Some(pos) = hand_position(game, seat, trionfo) {
        let card = game.players[seat].hand.remove(pos);
        game.piles.remove_from_play(card);
    }
}

fn commit_effect(
    game: &mut GameState,
    deciders: &mut DeciderTable,
    play: &EffectPlay,
) -> Result<(), EffectError> {
    let actor = play.actor;
    match play.trionfo {
        Trionfo::Magician => {
            // Too few cards to rearrange is a no-op, not an error.
            if game.piles.draw_len() >= 4 {
                let top = game.piles.draw_pile_mut().draw_n(4);
                let order = deciders
                    .decider_mut(actor)
                    .map(|d| d.arrange_future(game, actor, &top))
                    .unwrap_or_else(|| (0..top.len()).collect());
                let arranged = apply_permutation(&top, &order);
                game.piles.draw_pile_mut().place_on_top(&arranged);
            }
        }
        Trionfo::Emperor => {
            if let Some(target) = play.target {
                let response = deciders
                    .decider_mut(target)
                    .map(|d| d.emperor_response(game, target))
                    .unwrap_or(EmperorResponse::Fold);
                apply_emperor_response(game, target, response)?;
            }
        }
        Trionfo::Hierophant => {
            let n = game.players().len();
            for seat in 0..n {
                let p = &game.players()[seat];
                if seat == actor || p.folded() || p.hermit() {
                    continue;
                }
                let reveal = deciders
                    .decider_mut(seat)
                    .map(|d| d.reveal_or_fold(game, seat))
                    .unwrap_or(true);
                if reveal {
                    game.record_event(Some(seat), EventVerb::Reveal, None);
                } else {
                    game.player_fold(seat)?;
                }
            }
        }
        Trionfo::Chariot => {
            let n = game.players().len();
            for seat in 0..n {
                let p = &game.players()[seat];
                if seat == actor || p.folded() || p.hermit() {
                    continue;
                }
                if game.players()[seat].hand().is_empty() {
                    game.player_fold(seat)?;
                    continue;
                }
                let choice = deciders
                    .decider_mut(seat)
                    .and_then(|d| d.discard_or_fold(game, seat));
                match choice {
                    Some(idx) if idx < game.players()[seat].hand().len() => {
                        game.discard_card(seat, idx)?;
                    }
                    _ => game.player_fold(seat)?,
                }
            }
        }
        Trionfo::Hermit => {
            game.players[actor].hermit = true;
        }
        Trionfo::WheelOfFortune => {
            let mut drawn = Vec::with_capacity(4);
            for _ in 0..4 {
                drawn.push(game.draw_top()?);
            }
            let keep = deciders
                .decider_mut(actor)
                .map(|d| d.keep_from_fortune(game, actor, &drawn))
                .unwrap_or_default();
            for (i, card) in drawn.into_iter().enumerate() {
                if keep.get(i).copied().unwrap_or(false) {
                    game.players[actor].hand.push(card);
                } else {
                    game.piles.discard(card);
                }
            }
        }
        Trionfo::HangedMan => {
            // Only meaningful as an interrupt; played proactively it
            // does nothing and is simply spent.
        }
        Trionfo::Devil => {
            if let Some(target) = play.target {
                if let Some(pos) = hand_position(game, actor, Trionfo::Devil) {
                    let card = game.players[actor].hand.remove(pos);
                    game.players[target].hand.push(card);
                    game.record_event(Some(actor), EventVerb::GiveDevil, Some(target as u32));
                }
            }
        }
        Trionfo::Moon => {
            let card = game.draw_top()?;
            game.community_cards.push(card);
        }
        Trionfo::Sun => {
            game.hands_face_up = true;
        }
        Trionfo::Judgment => {
            game.judgment_played = true;
        }
        Trionfo::Universe => {
            // Needs a full six cards to peek; otherwise a no-op.
            if game.piles.draw_len() >= 6 {
                let top = game.piles.draw_pile().peek_top(6);
                if let Some(d) = deciders.decider_mut(actor) {
                    d.observe_future(game, actor, &top);
                }
            }
        }
        Trionfo::Fool
        | Trionfo::HighPriestess
        | Trionfo::Empress
        | Trionfo::Lovers
        | Trionfo::Strength
        | Trionfo::Justice
        | Trionfo::Death
        | Trionfo::Temperance
        | Trionfo::Tower
        | Trionfo::Star => {
            // Passive trumps are rejected at propose time.
        }
    }
    Ok(())
}

fn apply_emperor_response(
    game: &mut GameState,
    target: usize,
    response: EmperorResponse,
) -> Result<(), EffectError> {
    match response {
        EmperorResponse::Ante => {
            let ante = game.min_bet();
            if game.players()[target].credits() >= ante {
                game.players[target].credits -= ante;
                game.pot += ante;
                game.record_event(Some(target), EventVerb::Call, Some(ante));
            } else {
                game.player_fold(target)?;
            }
        }
        EmperorResponse::DiscardTwo(first, second) => {
            let hand_len = game.players()[target].hand().len();
            if hand_len < 2 || first >= hand_len || second >= hand_len || first == second {
                game.player_fold(target)?;
            } else {
                // higher index first so the lower one stays valid
                let (hi, lo) = if first > second {
                    (first, second)
                } else {
                    (second, first)
                };
                game.discard_card(target, hi)?;
                game.discard_card(target, lo)?;
            }
        }
        EmperorResponse::Fold => {
            game.player_fold(target)?;
        }
    }
    Ok(())
}

fn apply_permutation(cards: &[Card], order: &[usize]) -> Vec<Card> {
    let valid = order.len() == cards.len()
        && order.iter().all(|&i| i < cards.len())
        && (0..cards.len()).all(|i| order.contains(&i));
    if valid {
        order.iter().map(|&i| cards[i]).collect()
    } else {
        cards.to_vec()
    }
}

/// Turn-start Devil offer: a seat holding the Devil may pass it to
/// another live seat before doing anything else. No interrupt window.
pub fn offer_devil(game: &mut GameState, deciders: &mut DeciderTable, seat: usize) {
    if hand_position(game, seat, Trionfo::Devil).is_none() {
        return;
    }
    let candidates = valid_targets(game, seat);
    if candidates.is_empty() {
        return;
    }
    let choice = deciders
        .decider_mut(seat)
        .and_then(|d| d.give_devil(game, seat))
        .filter(|t| candidates.contains(t));
    if let Some(target) = choice {
        if let Some(pos) = hand_position(game, seat, Trionfo::Devil) {
            let card = game.players[seat].hand.remove(pos);
            game.players[target].hand.push(card);
            game.record_event(Some(seat), EventVerb::GiveDevil, Some(target as u32));
        }
    }
}

/// Trumps in a hand that can actually be played for an effect.
pub fn playable_trionfi(hand: &[Card]) -> Vec<Trionfo> {
    hand.iter()
        .filter_map(|c| c.as_trionfo())
        .filter(|t| t.has_effect())
        .collect()
}

/// Bot-facing helper: the hand value a seat would reveal under the
/// Hierophant.
pub fn revealed_value(game: &GameState, seat: usize) -> i32 {
    evaluate_hand(game.players()[seat].hand()).value
}
