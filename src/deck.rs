use crate::cards::{Card, Rank, Suit, Trionfo};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// A 78-card tarot deck: 22 trionfi plus 14 ranks in each of 4 suits.
///
/// The top of the deck is the end of the internal vector, so draws are
/// O(1); `peek_top` and `place_on_top` speak in draw order (element 0 is
/// the next card drawn).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// ```
    /// use tarocchi::deck::Deck;
    ///
    /// let deck = Deck::tarot();
    /// assert_eq!(deck.len(), 78);
    /// ```
    pub fn tarot() -> Self {
        let mut cards = Vec::with_capacity(78);
        for t in Trionfo::ALL {
            cards.push(Card::trionfo(t));
        }
        for s in Suit::ALL {
            for r in Rank::ALL {
                cards.push(Card::pip(r, s));
            }
        }
        Self { cards }
    }

    /// An empty deck, for rebuilding piles.
    pub fn empty() -> Self {
        Self { cards: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Shuffle using a seeded RNG for reproducibility.
    pub fn shuffle_seeded(&mut self, seed: u64) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        self.cards.shuffle(&mut rng);
    }

    /// Shuffle using the provided RNG implementing Rng.
    pub fn shuffle_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
    }

    /// Draw one card from the top of the deck.
    pub fn draw(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    /// Draw `n` cards from the top of the deck.
    pub fn draw_n(&mut self, n: usize) -> Vec<Card> {
        (0..n).filter_map(|_| self.draw()).collect()
    }

    /// Look at the next `n` cards in draw order without removing them.
    /// Returns fewer if the deck is short.
    pub fn peek_top(&self, n: usize) -> Vec<Card> {
        self.cards.iter().rev().take(n).copied().collect()
    }

    /// Put cards back on top. `cards[0]` becomes the next card drawn.
    pub fn place_on_top(&mut self, cards: &[Card]) {
        self.cards.extend(cards.iter().rev());
    }

    /// Remove a specific card, wherever it sits. Returns whether it was
    /// present. Used to stage known holdings without duplicating cards.
    pub fn remove_card(&mut self, card: Card) -> bool {
        match self.cards.iter().position(|&c| c == card) {
            Some(i) => {
                self.cards.remove(i);
                true
            }
            None => false,
        }
    }

    /// Add cards to the bottom of the deck.
    pub fn add_to_bottom(&mut self, cards: &[Card]) {
        // bottom is the front of the vector
        let mut rebuilt = Vec::with_capacity(self.cards.len() + cards.len());
        rebuilt.extend_from_slice(cards);
        rebuilt.extend_from_slice(&self.cards);
        self.cards = rebuilt;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tarot_deck_has_78_unique_cards() {
        let d = Deck::tarot();
        assert_eq!(d.len(), 78);
        let mut seen = d.cards.clone();
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), 78);
        let trumps = d.cards.iter().filter(|c| c.is_trionfo()).count();
        assert_eq!(trumps, 22);
    }

    #[test]
    fn seeded_shuffle_is_reproducible() {
        let mut d1 = Deck::tarot();
        let mut d2 = Deck::tarot();
        d1.shuffle_seeded(42);
        d2.shuffle_seeded(42);
        assert_eq!(d1.cards, d2.cards);
    }

    #[test]
    fn draw_reduces_length_and_returns_cards() {
        let mut d = Deck::tarot();
        d.shuffle_seeded(7);
        let c1 = d.draw().unwrap();
        let c2 = d.draw().unwrap();
        assert_ne!(c1, c2);
        assert_eq!(d.len(), 76);
        let hand = d.draw_n(5);
        assert_eq!(hand.len(), 5);
        assert_eq!(d.len(), 71);
    }

    #[test]
    fn peek_matches_subsequent_draws() {
        let mut d = Deck::tarot();
        d.shuffle_seeded(11);
        let peeked = d.peek_top(4);
        let drawn = d.draw_n(4);
        assert_eq!(peeked, drawn);
    }

    #[test]
    fn remove_card_extracts_exactly_one_copy() {
        let mut d = Deck::tarot();
        let moon = Card::trionfo(Trionfo::Moon);
        assert!(d.remove_card(moon));
        assert_eq!(d.len(), 77);
        assert!(!d.remove_card(moon));
        assert_eq!(d.len(), 77);
    }

    #[test]
    fn place_on_top_restores_draw_order() {
        let mut d = Deck::tarot();
        d.shuffle_seeded(3);
        let taken = d.draw_n(4);
        let reordered = vec![taken[2], taken[0], taken[3], taken[1]];
        d.place_on_top(&reordered);
        assert_eq!(d.len(), 78);
        assert_eq!(d.draw_n(4), reordered);
    }
}
