use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::HashSet;
use tarocchi::cards::{parse_cards, Card};
use tarocchi::deck::Deck;
use tarocchi::piles::{PileError, Piles};

fn rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

#[test]
fn tarot_deck_is_78_unique_cards() {
    let deck = Deck::tarot();
    assert_eq!(deck.len(), 78);
    let mut seen: HashSet<Card> = HashSet::new();
    let mut d = deck;
    while let Some(card) = d.draw() {
        assert!(seen.insert(card), "duplicate {card}");
    }
    assert_eq!(seen.len(), 78);
}

#[test]
fn seeded_shuffles_are_reproducible() {
    let mut a = Deck::tarot();
    let mut b = Deck::tarot();
    a.shuffle_seeded(7);
    b.shuffle_seeded(7);
    assert_eq!(a.draw(), b.draw());
    assert_eq!(a.peek_top(5), b.peek_top(5));
}

#[test]
fn discard_suffix_takes_the_newest_cards() {
    let mut piles = Piles::new(Deck::tarot());
    for card in parse_cards("2W, 3C, 4S").unwrap() {
        piles.discard(card);
    }
    let taken = piles.take_discard_suffix(1).unwrap();
    assert_eq!(taken, parse_cards("3C, 4S").unwrap());
    assert_eq!(piles.discard_pile(), parse_cards("2W").unwrap().as_slice());

    let err = piles.take_discard_suffix(5).unwrap_err();
    assert!(matches!(err, PileError::InvalidIndex { .. }));
}

#[test]
fn exhausted_draw_pile_recycles_the_discards() {
    let mut piles = Piles::new(Deck::empty());
    for card in parse_cards("2W, 3C, 4S").unwrap() {
        piles.discard(card);
    }
    let mut r = rng(11);
    let reshuffled = piles.ensure_available(2, &mut r).unwrap();
    assert!(reshuffled);
    assert!(piles.discard_pile().is_empty());
    assert_eq!(piles.draw_len(), 3);

    let drawn = piles.draw_top(&mut r).unwrap();
    assert!(parse_cards("2W, 3C, 4S").unwrap().contains(&drawn));
}

#[test]
fn reshuffle_cannot_conjure_cards() {
    let mut piles = Piles::new(Deck::empty());
    piles.discard(parse_cards("2W").unwrap()[0]);
    let mut r = rng(11);
    let err = piles.ensure_available(3, &mut r).unwrap_err();
    assert!(matches!(err, PileError::Exhausted { needed: 3, available: 1 }));
}

#[test]
fn removed_cards_stay_out_of_circulation() {
    let mut piles = Piles::new(Deck::empty());
    let cards = parse_cards("2W, 3C").unwrap();
    piles.discard(cards[0]);
    piles.remove_from_play(cards[1]);
    assert_eq!(piles.removed_pile(), &cards[1..]);
    assert_eq!(piles.circulating(), 1);

    let mut r = rng(5);
    piles.ensure_available(1, &mut r).unwrap();
    assert_eq!(piles.draw_top(&mut r).unwrap(), cards[0]);
}
