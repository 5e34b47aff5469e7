use crate::cards::Card;
use crate::deck::Deck;
use rand::Rng;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PileError {
    #[error("discard index {index} out of range (pile has {len} cards)")]
    InvalidIndex { index: usize, len: usize },
    #[error("not enough cards in play: needed {needed}, only {available} available")]
    Exhausted { needed: usize, available: usize },
}

/// The three shared piles: face-down draw, face-up discard, and the
/// removed pile holding consumed trumps.
///
/// When the draw pile runs dry the discard pile is shuffled back in;
/// the removed pile is the only way cards leave circulation, and they
/// stay out until the next hand rebuilds the deck.
#[derive(Debug, Clone)]
pub struct Piles {
    pub(crate) draw: Deck,
    pub(crate) discard: Vec<Card>,
    pub(crate) removed: Vec<Card>,
}

impl Piles {
    /// Fresh piles around a shuffled deck.
    pub fn new(draw: Deck) -> Self {
        Self {
            draw,
            discard: Vec::new(),
            removed: Vec::new(),
        }
    }

    pub fn draw_len(&self) -> usize {
        self.draw.len()
    }

    pub fn discard_pile(&self) -> &[Card] {
        &self.discard
    }

    pub fn removed_pile(&self) -> &[Card] {
        &self.removed
    }

    pub fn draw_pile(&self) -> &Deck {
        &self.draw
    }

    pub(crate) fn draw_pile_mut(&mut self) -> &mut Deck {
        &mut self.draw
    }

    /// Total cards still circulating through draw/discard (excludes removed).
    pub fn circulating(&self) -> usize {
        self.draw.len() + self.discard.len()
    }

    /// Make sure at least `needed` cards can be drawn, reshuffling the
    /// discard pile into the draw pile if necessary. Returns whether a
    /// reshuffle happened.
    pub fn ensure_available<R: Rng + ?Sized>(
        &mut self,
        needed: usize,
        rng: &mut R,
    ) -> Result<bool, PileError> {
        if self.draw.len() >= needed {
            return Ok(false);
        }
        if self.draw.len() + self.discard.len() < needed {
            return Err(PileError::Exhausted {
                needed,
                available: self.draw.len() + self.discard.len(),
            });
        }
        let recycled = std::mem::take(&mut self.discard);
        self.draw.place_on_top(&recycled);
        self.draw.shuffle_with(rng);
        Ok(true)
    }

    /// Draw the top card, reshuffling first if the draw pile is empty.
    pub fn draw_top<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Card, PileError> {
        self.ensure_available(1, rng)?;
        self.draw.draw().ok_or(PileError::Exhausted {
            needed: 1,
            available: 0,
        })
    }

    /// Take every discard from `index` to the top of the pile, in pile
    /// order. The caller keeps all of them; this is the rummy-style draw.
    pub fn take_discard_suffix(&mut self, index: usize) -> Result<Vec<Card>, PileError> {
        if index >= self.discard.len() {
            return Err(PileError::InvalidIndex {
                index,
                len: self.discard.len(),
            });
        }
        Ok(self.discard.split_off(index))
    }

    /// Put a card face up on the discard pile.
    pub fn discard(&mut self, card: Card) {
        self.discard.push(card);
    }

    /// Move a card out of circulation for the rest of the hand.
    pub fn remove_from_play(&mut self, card: Card) {
        self.removed.push(card);
    }
}
