//! Showdown resolution: closest absolute value to 23 wins, ties broken
//! by highest card and then by suit precedence.

use crate::evaluator::{evaluate_hand, highest_card};
use crate::game::{EventVerb, GameState, TiebreakLevel, TiebreakerInfo};

/// How the hand ended once betting stopped. The set is closed: a pot
/// is either paid to one seat or voided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandOutcome {
    Won { seat: usize, amount: u32 },
    /// Everyone still in busted; nobody is paid.
    Voided,
}

/// Pick the winning seat among everyone still in the hand.
///
/// Busted hands cannot win. On equal distance the tie goes to the
/// highest single card under the tie-break valuation, then to suit
/// precedence (Wands > Cups > Swords > Disks > trumps); the level that
/// decided it is recorded on the game state. Returns `None` when every
/// live hand busted.
pub fn determine_winner(game: &mut GameState) -> Option<usize> {
    game.tiebreaker = None;

    let active = game.active_seats();
    if active.is_empty() {
        return None;
    }
    if active.len() == 1 {
        return Some(active[0]);
    }

    let mut scores: Vec<(usize, i32, u32)> = Vec::new();
    for &seat in &active {
        let score = evaluate_hand(game.players()[seat].hand());
        if !score.busted {
            scores.push((seat, score.value, score.distance()));
        }
    }
    if scores.is_empty() {
        return None;
    }

    let best_distance = scores.iter().map(|&(_, _, d)| d).min()?;
    let tied: Vec<&(usize, i32, u32)> =
        scores.iter().filter(|&&(_, _, d)| d == best_distance).collect();
    if tied.len() == 1 {
        return Some(tied[0].0);
    }

    let tied_seats: Vec<usize> = tied.iter().map(|t| t.0).collect();

    // First tie-break: highest single card.
    let mut high: Vec<(usize, i32, u8)> = tied
        .iter()
        .map(|&&(seat, _, _)| {
            let hc = highest_card(game.players()[seat].hand());
            let (value, suit) = hc.map(|h| (h.value, h.card.suit_precedence())).unwrap_or((0, 0));
            (seat, value, suit)
        })
        .collect();
    let best_value = high.iter().map(|&(_, v, _)| v).max()?;
    high.retain(|&(_, v, _)| v == best_value);

    if high.len() == 1 {
        let winner = high[0].0;
        game.tiebreaker = Some(TiebreakerInfo {
            level: TiebreakLevel::HighCard,
            tied_seats,
            winner,
        });
        return Some(winner);
    }

    // Last resort: suit precedence of that highest card.
    let winner = high.iter().max_by_key(|&&(_, _, suit)| suit)?.0;
    game.tiebreaker = Some(TiebreakerInfo {
        level: TiebreakLevel::Suit,
        tied_seats,
        winner,
    });
    Some(winner)
}

/// Pay the whole pot to one seat.
pub fn award_pot(game: &mut GameState, seat: usize) -> HandOutcome {
    let amount = game.pot;
    game.players[seat].credits += amount;
    game.pot = 0;
    game.winner = Some(seat);
    game.record_event(Some(seat), EventVerb::Win, Some(amount));
    HandOutcome::Won { seat, amount }
}

/// Settle the hand: lone survivor takes the pot by default, otherwise
/// the showdown picks a winner. An all-busted table voids the pot.
pub fn do_showdown(game: &mut GameState) -> HandOutcome {
    let active = game.active_seats();
    if active.len() == 1 {
        return award_pot(game, active[0]);
    }
    match determine_winner(game) {
        Some(winner) => award_pot(game, winner),
        None => {
            game.pot = 0;
            game.winner = None;
            game.record_event(None, EventVerb::PotVoided, None);
            HandOutcome::Voided
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::parse_cards;

    fn mk(n: usize) -> GameState {
        let names: Vec<String> = (1..=n).map(|i| format!("P{i}")).collect();
        let refs: Vec<&str> = names.iter().map(|s| s.as_str()).collect();
        let mut g = GameState::with_seed(&refs, 500, 10, 13);
        g.start_new_hand();
        g
    }

    fn set_hand(g: &mut GameState, seat: usize, cards: &str) {
        g.players[seat].hand = parse_cards(cards).unwrap();
    }

    #[test]
    fn closest_distance_wins() {
        let mut g = mk(3);
        set_hand(&mut g, 0, "10W, 9C"); // 19, distance 4
        set_hand(&mut g, 1, "10S, NC"); // 22, distance 1
        set_hand(&mut g, 2, "KW, KC"); // 28, busted
        assert_eq!(determine_winner(&mut g), Some(1));
        assert!(g.tiebreaker().is_none());
    }

    #[test]
    fn negative_twenty_three_matches_positive() {
        let mut g = mk(2);
        set_hand(&mut g, 0, "10W, 9C, 4S"); // +23
        set_hand(&mut g, 1, "17T, 14T, 8D"); // -23
        let winner = determine_winner(&mut g).unwrap();
        // tied at distance 0: decided by high card (ten beats eight)
        assert_eq!(winner, 0);
        let tb = g.tiebreaker().unwrap();
        assert_eq!(tb.level, TiebreakLevel::HighCard);
        assert_eq!(tb.tied_seats, vec![0, 1]);
    }

    #[test]
    fn suit_precedence_settles_identical_values() {
        let mut g = mk(2);
        set_hand(&mut g, 0, "10S, 9S, 4S"); // 23, high card 10 of Swords
        set_hand(&mut g, 1, "10C, 9D, 4D"); // 23, high card 10 of Cups
        let winner = determine_winner(&mut g).unwrap();
        assert_eq!(winner, 1); // Cups beats Swords
        assert_eq!(g.tiebreaker().unwrap().level, TiebreakLevel::Suit);
    }

    #[test]
    fn busted_hand_cannot_win() {
        let mut g = mk(2);
        set_hand(&mut g, 0, "KW, KC"); // busted
        set_hand(&mut g, 1, "2W"); // 2, distance 21
        assert_eq!(determine_winner(&mut g), Some(1));
    }

    #[test]
    fn all_busted_voids_the_pot() {
        let mut g = mk(2);
        set_hand(&mut g, 0, "KW, KC");
        set_hand(&mut g, 1, "QW, QC");
        g.pot = 40;
        let outcome = do_showdown(&mut g);
        assert_eq!(outcome, HandOutcome::Voided);
        assert_eq!(g.pot(), 0);
        assert_eq!(g.winner(), None);
    }

    #[test]
    fn lone_survivor_wins_by_default() {
        let mut g = mk(3);
        g.players[0].folded = true;
        g.players[2].folded = true;
        g.pot = 30;
        let before = g.players()[1].credits();
        let outcome = do_showdown(&mut g);
        assert_eq!(outcome, HandOutcome::Won { seat: 1, amount: 30 });
        assert_eq!(g.players()[1].credits(), before + 30);
        assert_eq!(g.winner(), Some(1));
    }

    #[test]
    fn folded_seat_is_ignored_even_with_perfect_hand() {
        let mut g = mk(2);
        set_hand(&mut g, 0, "10W, 9C, 4S"); // 23 exactly
        g.players[0].folded = true;
        set_hand(&mut g, 1, "2W");
        assert_eq!(determine_winner(&mut g), Some(1));
    }
}
