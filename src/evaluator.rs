use crate::cards::{Card, Rank, Trionfo};

/// The magic number both +23 and -23 hit exactly.
pub const TARGET: i32 = 23;

/// Result of scoring a hand: the signed value and whether it is over
/// the limit in either direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandScore {
    pub value: i32,
    pub busted: bool,
}

impl HandScore {
    /// Distance from the target, on the absolute value. Busted hands
    /// sort behind every live hand.
    pub fn distance(&self) -> u32 {
        if self.busted {
            u32::MAX
        } else {
            (TARGET - self.value.abs()).unsigned_abs()
        }
    }
}

fn distance_of(value: i32) -> u32 {
    (TARGET - value.abs()).unsigned_abs()
}

fn sign_distance(value: i32) -> u32 {
    if value.abs() > TARGET {
        u32::MAX
    } else {
        distance_of(value)
    }
}

/// Score a hand: pips at face value, negative trumps subtracted, then
/// each ace optionally promoted from 1 to 11, and finally the Lovers
/// resolved as +6 or -6.
///
/// Ace promotion is greedy in hand order: an ace takes the extra 10
/// only when that strictly improves the distance without busting.
/// The Lovers is resolved after all aces, taking whichever sign lands
/// closer to the target; a sign that busts never beats a live one, and
/// +6 wins ties.
///
/// ```
/// use tarocchi::cards::parse_cards;
/// use tarocchi::evaluator::evaluate_hand;
///
/// let hand = parse_cards("10W, 10C, 1S").unwrap();
/// let score = evaluate_hand(&hand);
/// assert_eq!(score.value, 21); // the ace stays 1: 31 would bust
/// assert!(!score.busted);
/// ```
pub fn evaluate_hand(hand: &[Card]) -> HandScore {
    let mut value = 0i32;
    let mut aces = 0usize;
    let mut has_lovers = false;

    for card in hand {
        match card {
            Card::Pip(Rank::Ace, _) => {
                value += 1;
                aces += 1;
            }
            Card::Pip(r, _) => value += r.pip_value(),
            Card::Trionfo(Trionfo::Lovers) => has_lovers = true,
            Card::Trionfo(t) => value += t.point_value(),
        }
    }

    for _ in 0..aces {
        let promoted = value + 10;
        if promoted.abs() <= TARGET && distance_of(promoted) < distance_of(value) {
            value = promoted;
        }
    }

    if has_lovers {
        // A sign that busts loses to any live sign, whatever the raw
        // distances say.
        let up = value + 6;
        let down = value - 6;
        value = if sign_distance(up) <= sign_distance(down) {
            up
        } else {
            down
        };
    }

    HandScore {
        value,
        busted: value.abs() > TARGET,
    }
}

/// A card singled out for the high-card tie-break, with the alternate
/// valuation used at that stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighCard {
    pub card: Card,
    pub value: i32,
}

/// Tie-break valuation: aces count 11, courts keep 11-14, negative
/// trumps and the Lovers count their (negative) points, and every
/// other trump counts zero.
pub fn tie_break_value(card: Card) -> i32 {
    match card {
        Card::Pip(r, _) => r.high_card_value(),
        Card::Trionfo(Trionfo::Lovers) => -6,
        Card::Trionfo(t) => t.point_value(),
    }
}

/// The single best card in a hand under the tie-break valuation,
/// breaking value ties by suit precedence (W > C > S > D > trumps).
pub fn highest_card(hand: &[Card]) -> Option<HighCard> {
    hand.iter()
        .copied()
        .max_by_key(|&c| (tie_break_value(c), c.suit_precedence()))
        .map(|card| HighCard {
            card,
            value: tie_break_value(card),
        })
}
