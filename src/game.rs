use crate::cards::Card;
use crate::deck::Deck;
use crate::piles::{PileError, Piles};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum EventVerb {
    SmallBlind,
    BigBlind,
    Fold,
    Check,
    Call,
    Raise,
    DrawPile,
    DrawDiscard,
    SwapCommunity,
    Discard,
    PlayTrionfo,
    Nullify,
    Reveal,
    GiveDevil,
    Reshuffle,
    Win,
    PotVoided,
}

impl EventVerb {
    pub fn label(self) -> &'static str {
        match self {
            EventVerb::SmallBlind => "SB",
            EventVerb::BigBlind => "BB",
            EventVerb::Fold => "Fold",
            EventVerb::Check => "Check",
            EventVerb::Call => "Call",
            EventVerb::Raise => "Raise",
            EventVerb::DrawPile => "Draw",
            EventVerb::DrawDiscard => "Draw discard",
            EventVerb::SwapCommunity => "Swap",
            EventVerb::Discard => "Discard",
            EventVerb::PlayTrionfo => "Play trump",
            EventVerb::Nullify => "Nullify",
            EventVerb::Reveal => "Reveal",
            EventVerb::GiveDevil => "Give Devil",
            EventVerb::Reshuffle => "Reshuffle",
            EventVerb::Win => "Win",
            EventVerb::PotVoided => "Pot voided",
        }
    }
}

/// One entry in the per-hand event log. `seat` is `None` for table-wide
/// events like reshuffles and voided pots.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct GameEvent {
    pub seat: Option<usize>,
    pub verb: EventVerb,
    pub amount: Option<u32>,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ActionError {
    #[error("seat {seat} out of range ({len} seats)")]
    SeatOutOfRange { seat: usize, len: usize },
    #[error("player has already folded")]
    AlreadyFolded,
    #[error("raise below minimum: min {min}, got {got}")]
    RaiseBelowMinimum { min: u32, got: u32 },
    #[error("hand card index {index} out of range (hand has {len} cards)")]
    InvalidHandIndex { index: usize, len: usize },
    #[error("community card index {index} out of range ({len} community cards)")]
    InvalidCommunityIndex { index: usize, len: usize },
    #[error(transparent)]
    Pile(#[from] PileError),
}

#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct Player {
    pub(crate) name: String,
    pub(crate) credits: u32,
    pub(crate) hand: Vec<Card>,
    pub(crate) current_bet: u32,
    pub(crate) folded: bool,
    pub(crate) drawn: bool,
    pub(crate) acted: bool,
    pub(crate) hermit: bool,
}

impl Player {
    fn new(name: &str, credits: u32) -> Self {
        Self {
            name: name.to_string(),
            credits,
            hand: Vec::new(),
            current_bet: 0,
            folded: false,
            drawn: false,
            acted: false,
            hermit: false,
        }
    }

    /// Returns the player's name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the player's remaining credits
    pub fn credits(&self) -> u32 {
        self.credits
    }

    /// Returns the player's hand
    pub fn hand(&self) -> &[Card] {
        &self.hand
    }

    /// Returns the player's bet in the current betting round
    pub fn current_bet(&self) -> u32 {
        self.current_bet
    }

    /// Whether the player has folded this hand
    pub fn folded(&self) -> bool {
        self.folded
    }

    /// Whether the player has drawn this betting round
    pub fn drawn(&self) -> bool {
        self.drawn
    }

    /// Whether the player has acted this betting round
    pub fn acted(&self) -> bool {
        self.acted
    }

    /// Whether the player has withdrawn behind the Hermit
    pub fn hermit(&self) -> bool {
        self.hermit
    }

    /// All-in: still in the hand but with nothing left to bet.
    pub fn all_in(&self) -> bool {
        !self.folded && self.credits == 0
    }

    fn reset_for_new_hand(&mut self) {
        self.hand.clear();
        self.current_bet = 0;
        self.folded = false;
        self.drawn = false;
        self.acted = false;
        self.hermit = false;
    }
}

/// Which tie-break level decided the showdown when distances were equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum TiebreakLevel {
    HighCard,
    Suit,
}

/// How the last showdown was decided, kept for the table to display.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct TiebreakerInfo {
    pub level: TiebreakLevel,
    pub tied_seats: Vec<usize>,
    pub winner: usize,
}

/// Full table state for one session: seats, shared piles, community
/// cards, pot, and the per-hand flags the trump effects flip.
///
/// All randomness flows through one owned RNG, so a session constructed
/// with [`GameState::with_seed`] replays identically.
#[derive(Debug)]
#[non_exhaustive]
pub struct GameState {
    pub(crate) players: Vec<Player>,
    pub(crate) piles: Piles,
    pub(crate) community_cards: Vec<Card>,
    pub(crate) pot: u32,
    pub(crate) current_bet: u32,
    pub(crate) min_bet: u32,
    pub(crate) dealer: usize,
    pub(crate) hand_number: u32,
    pub(crate) hands_face_up: bool,
    pub(crate) judgment_played: bool,
    pub(crate) tiebreaker: Option<TiebreakerInfo>,
    pub(crate) winner: Option<usize>,
    events: Vec<GameEvent>,
    pub(crate) rng: ChaCha8Rng,
}

impl GameState {
    pub fn new(player_names: &[&str], starting_credits: u32, min_bet: u32) -> Self {
        let seed: u64 = rand::rng().random();
        Self::with_seed(player_names, starting_credits, min_bet, seed)
    }

    /// Deterministic constructor: the same seed replays the same session.
    pub fn with_seed(player_names: &[&str], starting_credits: u32, min_bet: u32, seed: u64) -> Self {
        let players = player_names
            .iter()
            .map(|n| Player::new(n, starting_credits))
            .collect();
        Self {
            players,
            piles: Piles::new(Deck::tarot()),
            community_cards: Vec::new(),
            pot: 0,
            current_bet: 0,
            min_bet,
            dealer: 0,
            hand_number: 0,
            hands_face_up: false,
            judgment_played: false,
            tiebreaker: None,
            winner: None,
            events: Vec::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Returns the players
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Returns the shared piles
    pub fn piles(&self) -> &Piles {
        &self.piles
    }

    /// Returns the community cards
    pub fn community_cards(&self) -> &[Card] {
        &self.community_cards
    }

    /// Returns the current pot
    pub fn pot(&self) -> u32 {
        self.pot
    }

    /// Returns the bet every live seat must match
    pub fn current_bet(&self) -> u32 {
        self.current_bet
    }

    /// Returns the table minimum bet (also the big blind)
    pub fn min_bet(&self) -> u32 {
        self.min_bet
    }

    /// Returns the dealer seat
    pub fn dealer(&self) -> usize {
        self.dealer
    }

    /// Returns the 1-based hand counter
    pub fn hand_number(&self) -> u32 {
        self.hand_number
    }

    /// Whether the Sun forces every hand face up
    pub fn hands_face_up(&self) -> bool {
        self.hands_face_up
    }

    /// How the last showdown tie was broken, if one was needed
    pub fn tiebreaker(&self) -> Option<&TiebreakerInfo> {
        self.tiebreaker.as_ref()
    }

    /// Winner of the last completed hand, if the pot was awarded
    pub fn winner(&self) -> Option<usize> {
        self.winner
    }

    pub fn history_recent(&self, n: usize) -> Vec<GameEvent> {
        if n == 0 {
            return Vec::new();
        }
        let start = self.events.len().saturating_sub(n);
        self.events[start..].to_vec()
    }

    pub fn history_len(&self) -> usize {
        self.events.len()
    }

    pub(crate) fn record_event(&mut self, seat: Option<usize>, verb: EventVerb, amount: Option<u32>) {
        self.events.push(GameEvent { seat, verb, amount });
    }

    fn check_seat(&self, seat: usize) -> Result<(), ActionError> {
        if seat >= self.players.len() {
            return Err(ActionError::SeatOutOfRange {
                seat,
                len: self.players.len(),
            });
        }
        Ok(())
    }

    /// Everything back in the deck, fresh shuffle, flags cleared.
    /// Does not move the dealer button; call [`advance_dealer`] between
    /// hands.
    ///
    /// [`advance_dealer`]: GameState::advance_dealer
    pub fn start_new_hand(&mut self) {
        self.hand_number += 1;
        self.pot = 0;
        self.current_bet = 0;
        self.hands_face_up = false;
        self.judgment_played = false;
        self.tiebreaker = None;
        self.winner = None;
        self.events.clear();

        for p in &mut self.players {
            p.reset_for_new_hand();
        }

        let mut deck = Deck::tarot();
        deck.shuffle_with(&mut self.rng);
        self.piles = Piles::new(deck);
        self.community_cards.clear();
    }

    /// Move the dealer button one seat.
    pub fn advance_dealer(&mut self) {
        if !self.players.is_empty() {
            self.dealer = (self.dealer + 1) % self.players.len();
        }
    }

    /// Initial deal: 2 cards per seat, 3 community cards, burn 1.
    /// Burned cards land face up on the discard pile.
    pub fn deal_initial_cards(&mut self) -> Result<(), ActionError> {
        let needed = self.players.len() * 2 + 3 + 1;
        self.ensure_available(needed)?;
        for i in 0..self.players.len() {
            for _ in 0..2 {
                if let Some(c) = self.piles.draw_pile_mut().draw() {
                    self.players[i].hand.push(c);
                }
            }
        }
        for _ in 0..3 {
            if let Some(c) = self.piles.draw_pile_mut().draw() {
                self.community_cards.push(c);
            }
        }
        if let Some(burn) = self.piles.draw_pile_mut().draw() {
            self.piles.discard(burn);
        }
        Ok(())
    }

    /// Burn one, then add one community card (the turn and river deals).
    pub fn deal_community_card(&mut self) -> Result<(), ActionError> {
        self.ensure_available(2)?;
        if let Some(burn) = self.piles.draw_pile_mut().draw() {
            self.piles.discard(burn);
        }
        if let Some(c) = self.piles.draw_pile_mut().draw() {
            self.community_cards.push(c);
        }
        Ok(())
    }

    fn ensure_available(&mut self, needed: usize) -> Result<(), ActionError> {
        if self.piles.ensure_available(needed, &mut self.rng)? {
            self.record_event(None, EventVerb::Reshuffle, None);
        }
        Ok(())
    }

    /// Draw one card off the top, reshuffling the discards first if the
    /// draw pile is empty.
    pub(crate) fn draw_top(&mut self) -> Result<Card, PileError> {
        if self.piles.ensure_available(1, &mut self.rng)? {
            self.record_event(None, EventVerb::Reshuffle, None);
        }
        self.piles.draw_top(&mut self.rng)
    }

    /// Clear per-round flags and bets before the turn and river rounds.
    pub fn reset_for_betting_round(&mut self) {
        for p in &mut self.players {
            p.drawn = false;
            p.acted = false;
            p.current_bet = 0;
        }
        self.current_bet = 0;
    }

    /// Post blinds: small blind left of the dealer, big blind two left.
    /// Short stacks post what they have and are all-in.
    pub fn collect_blinds(&mut self) {
        let n = self.players.len();
        if n < 2 {
            return;
        }
        let sb = (self.dealer + 1) % n;
        let bb = (self.dealer + 2) % n;

        let sb_amount = (self.min_bet / 2).min(self.players[sb].credits);
        self.players[sb].credits -= sb_amount;
        self.players[sb].current_bet = sb_amount;
        self.pot += sb_amount;
        self.record_event(Some(sb), EventVerb::SmallBlind, Some(sb_amount));

        let bb_amount = self.min_bet.min(self.players[bb].credits);
        self.players[bb].credits -= bb_amount;
        self.players[bb].current_bet = bb_amount;
        self.pot += bb_amount;
        self.current_bet = bb_amount;
        self.record_event(Some(bb), EventVerb::BigBlind, Some(bb_amount));
    }

    pub fn player_fold(&mut self, seat: usize) -> Result<(), ActionError> {
        self.check_seat(seat)?;
        if self.players[seat].folded {
            return Err(ActionError::AlreadyFolded);
        }
        self.players[seat].folded = true;
        self.players[seat].acted = true;
        self.record_event(Some(seat), EventVerb::Fold, None);
        Ok(())
    }

    /// Call the current bet, checking if already matched. Short stacks
    /// are put all-in for whatever they have. Returns the amount paid.
    pub fn player_call(&mut self, seat: usize) -> Result<u32, ActionError> {
        self.check_seat(seat)?;
        if self.players[seat].folded {
            return Err(ActionError::AlreadyFolded);
        }
        let to_call = self.current_bet.saturating_sub(self.players[seat].current_bet);
        if to_call == 0 {
            self.players[seat].acted = true;
            self.record_event(Some(seat), EventVerb::Check, None);
            return Ok(0);
        }
        let pay = to_call.min(self.players[seat].credits);
        let p = &mut self.players[seat];
        p.credits -= pay;
        p.current_bet += pay;
        p.acted = true;
        self.pot += pay;
        self.record_event(Some(seat), EventVerb::Call, Some(pay));
        Ok(pay)
    }

    /// Raise by `raise_amount` on top of calling. A raise that the stack
    /// cannot cover becomes an all-in for everything. When the table bet
    /// actually goes up, every other live seat with credits must act
    /// again. Returns the total paid.
    pub fn player_raise(&mut self, seat: usize, raise_amount: u32) -> Result<u32, ActionError> {
        self.check_seat(seat)?;
        if self.players[seat].folded {
            return Err(ActionError::AlreadyFolded);
        }
        if raise_amount < self.min_bet {
            return Err(ActionError::RaiseBelowMinimum {
                min: self.min_bet,
                got: raise_amount,
            });
        }
        let to_call = self.current_bet.saturating_sub(self.players[seat].current_bet);
        let total = (to_call + raise_amount).min(self.players[seat].credits);
        let p = &mut self.players[seat];
        p.credits -= total;
        p.current_bet += total;
        p.acted = true;
        self.pot += total;

        // A short all-in may not clear the table bet; never lower it.
        let new_bet = self.players[seat].current_bet;
        if new_bet > self.current_bet {
            self.current_bet = new_bet;
            for (i, other) in self.players.iter_mut().enumerate() {
                if i != seat && !other.folded && other.credits > 0 {
                    other.acted = false;
                }
            }
        }
        self.record_event(Some(seat), EventVerb::Raise, Some(total));
        Ok(total)
    }

    /// A betting round ends when fewer than two seats remain, or every
    /// seat still in the rotation has acted and matched the bet.
    pub fn round_complete(&self) -> bool {
        let active: Vec<&Player> = self.players.iter().filter(|p| !p.folded).collect();
        if active.len() <= 1 {
            return true;
        }
        for p in active {
            // All-in and Hermit seats sit outside the rotation: they
            // can neither act nor match, so they never hold it open.
            if p.credits == 0 || p.hermit {
                continue;
            }
            if !p.acted {
                return false;
            }
            if p.current_bet < self.current_bet {
                return false;
            }
        }
        true
    }

    /// Seats still in the hand (folded seats excluded, all-in included).
    pub fn active_seats(&self) -> Vec<usize> {
        self.players
            .iter()
            .enumerate()
            .filter(|(_, p)| !p.folded)
            .map(|(i, _)| i)
            .collect()
    }

    /// Whether a seat takes turns: live, not all-in, not behind the
    /// Hermit. The single funnel for every rotation skip.
    pub fn seat_in_rotation(&self, seat: usize) -> bool {
        let p = &self.players[seat];
        !p.folded && p.credits > 0 && !p.hermit
    }

    /// Whether an effect has forced the hand straight to showdown.
    pub fn showdown_forced(&self) -> bool {
        self.judgment_played
    }

    /// Draw the top card of the draw pile into a hand.
    pub fn draw_from_draw_pile(&mut self, seat: usize) -> Result<Card, ActionError> {
        self.check_seat(seat)?;
        self.ensure_available(1)?;
        let card = self.piles.draw_top(&mut self.rng)?;
        self.players[seat].hand.push(card);
        self.players[seat].drawn = true;
        self.record_event(Some(seat), EventVerb::DrawPile, None);
        Ok(card)
    }

    /// Take a discard and everything above it, rummy style. Index 0 is
    /// the oldest discard, so low indices take more cards.
    pub fn draw_from_discard_pile(
        &mut self,
        seat: usize,
        card_index: usize,
    ) -> Result<Vec<Card>, ActionError> {
        self.check_seat(seat)?;
        let taken = self.piles.take_discard_suffix(card_index)?;
        self.players[seat].hand.extend(taken.iter().copied());
        self.players[seat].drawn = true;
        self.record_event(Some(seat), EventVerb::DrawDiscard, Some(taken.len() as u32));
        Ok(taken)
    }

    /// Swap a hand card with a community card; the hand card becomes
    /// community. Returns `(given, taken)`.
    pub fn swap_with_community(
        &mut self,
        seat: usize,
        hand_index: usize,
        community_index: usize,
    ) -> Result<(Card, Card), ActionError> {
        self.check_seat(seat)?;
        let hand_len = self.players[seat].hand.len();
        if hand_index >= hand_len {
            return Err(ActionError::InvalidHandIndex {
                index: hand_index,
                len: hand_len,
            });
        }
        if community_index >= self.community_cards.len() {
            return Err(ActionError::InvalidCommunityIndex {
                index: community_index,
                len: self.community_cards.len(),
            });
        }
        let given = self.players[seat].hand.remove(hand_index);
        let taken = self.community_cards[community_index];
        self.community_cards[community_index] = given;
        self.players[seat].hand.push(taken);
        self.players[seat].drawn = true;
        self.record_event(Some(seat), EventVerb::SwapCommunity, None);
        Ok((given, taken))
    }

    /// Discard a hand card face up.
    pub fn discard_card(&mut self, seat: usize, card_index: usize) -> Result<Card, ActionError> {
        self.check_seat(seat)?;
        let hand_len = self.players[seat].hand.len();
        if card_index >= hand_len {
            return Err(ActionError::InvalidHandIndex {
                index: card_index,
                len: hand_len,
            });
        }
        let card = self.players[seat].hand.remove(card_index);
        self.piles.discard(card);
        self.record_event(Some(seat), EventVerb::Discard, None);
        Ok(card)
    }

    /// Every card in the game, for the conservation check: draw +
    /// discard + removed + community + all hands.
    pub fn total_cards(&self) -> usize {
        self.piles.draw_len()
            + self.piles.discard_pile().len()
            + self.piles.removed_pile().len()
            + self.community_cards.len()
            + self.players.iter().map(|p| p.hand.len()).sum::<usize>()
    }
}
