//! Deciders: pluggable seat controllers (bots, or frontends driving a
//! human seat).
//!
//! The engine never prompts anyone directly. Every choice a hand can
//! demand — the turn action itself, but also effect responses like
//! "reveal or fold" — is a callback on the [`Decider`] trait, and a
//! [`DeciderTable`] maps seats to decider instances. Frontends stay
//! thin: they enqueue intents on a [`QueuedDecider`] and let the turn
//! loop consume them.

use crate::cards::{Card, Trionfo};
use crate::game::{GameEvent, GameState};
use core::fmt;
use std::collections::VecDeque;

/// Kinds of deciders attached to seats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum DeciderKind {
    Human,
    Bot,
}

/// The betting part of a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum BetAction {
    Fold,
    Call,
    Raise(u32),
}

/// The drawing part of a turn: top of the draw pile, a discard-pile
/// suffix, or a community swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum DrawAction {
    DrawPile,
    DiscardPile { index: usize },
    Community { hand_index: usize, community_index: usize },
}

/// Everything one turn submits at once: bet, optional trump to play
/// (only honored alongside a raise or call that keeps the seat live),
/// optional draw, optional discard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnAction {
    pub bet: BetAction,
    pub play_trionfo: Option<Trionfo>,
    pub draw: Option<DrawAction>,
    pub discard_index: Option<usize>,
}

impl TurnAction {
    /// Call and otherwise stand pat.
    pub const fn check_call() -> Self {
        Self {
            bet: BetAction::Call,
            play_trionfo: None,
            draw: None,
            discard_index: None,
        }
    }

    pub const fn fold() -> Self {
        Self {
            bet: BetAction::Fold,
            play_trionfo: None,
            draw: None,
            discard_index: None,
        }
    }
}

/// The three ways out of the Emperor: pay another ante into the pot,
/// discard two cards, or fold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum EmperorResponse {
    Ante,
    DiscardTwo(usize, usize),
    Fold,
}

/// A seat controller. Only `take_turn` is required; the effect
/// callbacks default to the most passive legal answer so simple
/// deciders stay simple.
pub trait Decider {
    /// Produce the whole turn for `seat`.
    fn take_turn(&mut self, game: &GameState, seat: usize) -> TurnAction;

    /// The kind of this decider.
    fn kind(&self) -> DeciderKind {
        DeciderKind::Human
    }

    /// Offered at turn start while holding the Devil: `Some(target)`
    /// plays it onto that seat, `None` keeps it.
    fn give_devil(&mut self, _game: &GameState, _seat: usize) -> Option<usize> {
        None
    }

    /// `actor` is playing `trionfo`; return true to spend the Hanged
    /// Man and nullify it.
    fn nullify_effect(
        &mut self,
        _game: &GameState,
        _seat: usize,
        _actor: usize,
        _trionfo: Trionfo,
    ) -> bool {
        false
    }

    /// Pick the victim for a targeted trump (Emperor, Devil).
    fn choose_target(
        &mut self,
        _game: &GameState,
        _seat: usize,
        _trionfo: Trionfo,
    ) -> Option<usize> {
        None
    }

    /// Respond to the Emperor.
    fn emperor_response(&mut self, _game: &GameState, _seat: usize) -> EmperorResponse {
        EmperorResponse::Fold
    }

    /// Hierophant: true to reveal this seat's hand value and stay in.
    fn reveal_or_fold(&mut self, _game: &GameState, _seat: usize) -> bool {
        true
    }

    /// Chariot: `Some(index)` discards that card, `None` folds.
    fn discard_or_fold(&mut self, _game: &GameState, _seat: usize) -> Option<usize> {
        None
    }

    /// Magician: reorder the peeked cards. Return the indices of
    /// `cards` in the new draw order; an invalid permutation leaves the
    /// order unchanged.
    fn arrange_future(&mut self, _game: &GameState, _seat: usize, cards: &[Card]) -> Vec<usize> {
        (0..cards.len()).collect()
    }

    /// Wheel of Fortune: which of the drawn cards to keep.
    fn keep_from_fortune(&mut self, _game: &GameState, _seat: usize, cards: &[Card]) -> Vec<bool> {
        vec![false; cards.len()]
    }

    /// Universe: shown the upcoming draws; informational only.
    fn observe_future(&mut self, _game: &GameState, _seat: usize, _cards: &[Card]) {}

    /// Every logged table event, for opponent modeling.
    fn observe_action(&mut self, _game: &GameState, _event: &GameEvent) {}

    /// End of hand, after the pot is settled.
    fn observe_showdown(&mut self, _game: &GameState) {}
}

mod bots;

pub use bots::{
    estimate_win_probability, evaluate_community_swaps, evaluate_discard_pile_draws,
    find_worst_discard, BotDecider, BotProfile, Difficulty, OpponentModel, SessionContext,
    SharedContext,
};

/// A decider driven from outside: a frontend enqueues answers and the
/// turn loop pops them. Empty queues fall back to the passive defaults,
/// so a stalled frontend never wedges the table.
#[derive(Default)]
pub struct QueuedDecider {
    turns: VecDeque<TurnAction>,
    devil_gifts: VecDeque<Option<usize>>,
    nullifies: VecDeque<bool>,
    targets: VecDeque<Option<usize>>,
    emperor: VecDeque<EmperorResponse>,
    reveals: VecDeque<bool>,
    chariot_discards: VecDeque<Option<usize>>,
}

impl QueuedDecider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue_turn(&mut self, action: TurnAction) -> &mut Self {
        self.turns.push_back(action);
        self
    }

    pub fn queue_devil_gift(&mut self, target: Option<usize>) -> &mut Self {
        self.devil_gifts.push_back(target);
        self
    }

    pub fn queue_nullify(&mut self, yes: bool) -> &mut Self {
        self.nullifies.push_back(yes);
        self
    }

    pub fn queue_target(&mut self, target: Option<usize>) -> &mut Self {
        self.targets.push_back(target);
        self
    }

    pub fn queue_emperor(&mut self, response: EmperorResponse) -> &mut Self {
        self.emperor.push_back(response);
        self
    }

    pub fn queue_reveal(&mut self, reveal: bool) -> &mut Self {
        self.reveals.push_back(reveal);
        self
    }

    pub fn queue_chariot_discard(&mut self, discard: Option<usize>) -> &mut Self {
        self.chariot_discards.push_back(discard);
        self
    }
}

impl Decider for QueuedDecider {
    fn kind(&self) -> DeciderKind {
        DeciderKind::Human
    }

    fn take_turn(&mut self, _game: &GameState, _seat: usize) -> TurnAction {
        self.turns.pop_front().unwrap_or(TurnAction::check_call())
    }

    fn give_devil(&mut self, _game: &GameState, _seat: usize) -> Option<usize> {
        self.devil_gifts.pop_front().flatten()
    }

    fn nullify_effect(
        &mut self,
        _game: &GameState,
        _seat: usize,
        _actor: usize,
        _trionfo: Trionfo,
    ) -> bool {
        self.nullifies.pop_front().unwrap_or(false)
    }

    fn choose_target(
        &mut self,
        _game: &GameState,
        _seat: usize,
        _trionfo: Trionfo,
    ) -> Option<usize> {
        self.targets.pop_front().flatten()
    }

    fn emperor_response(&mut self, _game: &GameState, _seat: usize) -> EmperorResponse {
        self.emperor.pop_front().unwrap_or(EmperorResponse::Fold)
    }

    fn reveal_or_fold(&mut self, _game: &GameState, _seat: usize) -> bool {
        self.reveals.pop_front().unwrap_or(true)
    }

    fn discard_or_fold(&mut self, _game: &GameState, _seat: usize) -> Option<usize> {
        self.chariot_discards.pop_front().flatten()
    }
}

/// One decider per seat. The turn loop borrows deciders and game state
/// separately, so decisions see an immutable table while mutations go
/// through the engine.
pub struct DeciderTable {
    seats: Vec<Option<Box<dyn Decider>>>,
}

impl fmt::Debug for DeciderTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flags: Vec<char> = self
            .seats
            .iter()
            .map(|a| if a.is_some() { 'D' } else { '-' })
            .collect();
        write!(f, "DeciderTable({})", flags.into_iter().collect::<String>())
    }
}

impl DeciderTable {
    /// Create a table with `n` seats, all empty.
    pub fn for_seats(n: usize) -> Self {
        let mut seats = Vec::with_capacity(n);
        for _ in 0..n {
            seats.push(None);
        }
        Self { seats }
    }

    /// Assign a decider to a seat (or remove when `None`).
    pub fn set_decider(&mut self, seat: usize, decider: Option<Box<dyn Decider>>) {
        if seat >= self.seats.len() {
            self.seats.resize_with(seat + 1, || None);
        }
        self.seats[seat] = decider;
    }

    // The explicit `+ 'static` keeps the trait-object lifetime from
    // being elided to the borrow, which `&mut` cannot shorten to.
    pub fn decider_mut(&mut self, seat: usize) -> Option<&mut (dyn Decider + 'static)> {
        self.seats.get_mut(seat).and_then(|a| a.as_deref_mut())
    }

    pub fn has_decider(&self, seat: usize) -> bool {
        self.seats.get(seat).map(|a| a.is_some()).unwrap_or(false)
    }

    pub fn decider_kind(&self, seat: usize) -> Option<DeciderKind> {
        self.seats
            .get(seat)
            .and_then(|a| a.as_deref().map(|d| d.kind()))
    }

    /// Fan an event out to every decider for opponent modeling.
    pub fn broadcast_event(&mut self, game: &GameState, event: &GameEvent) {
        for seat in &mut self.seats {
            if let Some(d) = seat.as_deref_mut() {
                d.observe_action(game, event);
            }
        }
    }

    /// Tell every decider the hand is settled.
    pub fn broadcast_showdown(&mut self, game: &GameState) {
        for seat in &mut self.seats {
            if let Some(d) = seat.as_deref_mut() {
                d.observe_showdown(game);
            }
        }
    }

    /// Remove all deciders.
    pub fn clear(&mut self) {
        for a in &mut self.seats {
            *a = None;
        }
    }
}
