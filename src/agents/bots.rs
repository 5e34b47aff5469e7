//! Bot deciders: hand-strength heuristics plus per-opponent modeling.
//!
//! A bot reduces every choice to the hand's distance from the target
//! value, then bends the numbers by what it has seen each opponent do.
//! Observation flows in through [`Decider::observe_action`] and
//! [`Decider::observe_showdown`]; the accumulated [`OpponentModel`]s
//! live in a [`SessionContext`] shared by every bot at the table so
//! models persist across hands.

use crate::cards::{Card, Trionfo};
use crate::evaluator::evaluate_hand;
use crate::game::{EventVerb, GameEvent, GameState};
use crate::trionfi::{playable_trionfi, valid_targets};
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use super::{BetAction, Decider, DeciderKind, DrawAction, EmperorResponse, TurnAction};

/// Difficulty tiers for bot play style and mistake rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Expert,
}

/// Configuration for a bot's play style and randomness.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct BotProfile {
    pub difficulty: Difficulty,
    /// Chance per turn of degrading the computed action to a flat call.
    pub mistake_rate: f64,
    /// Scales how hard the bot leans on bluffs and hero calls.
    pub bluff_scale: f64,
    pub rng_seed: Option<u64>,
}

impl BotProfile {
    /// Create a profile with tuned defaults for a difficulty tier.
    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        let (mistake_rate, bluff_scale) = match difficulty {
            Difficulty::Easy => (0.25, 0.5),
            Difficulty::Medium => (0.12, 1.0),
            Difficulty::Hard => (0.05, 1.2),
            Difficulty::Expert => (0.02, 1.4),
        };
        Self {
            difficulty,
            mistake_rate,
            bluff_scale,
            rng_seed: None,
        }
    }

    /// Set a deterministic RNG seed for reproducible decisions.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }
}

impl Default for BotProfile {
    fn default() -> Self {
        Self::for_difficulty(Difficulty::Medium)
    }
}

/// Running tally of one opponent's observed tendencies.
///
/// Counters start empty; every frequency falls back to a neutral prior
/// until enough actions have been seen.
#[derive(Debug, Clone, Default)]
pub struct OpponentModel {
    pub folds: u32,
    pub calls: u32,
    pub raises: u32,
    pub early_raises: u32,
    pub late_raises: u32,
    pub showdown_distances: Vec<u32>,
}

impl OpponentModel {
    /// Share of observed actions that were folds. Neutral 0.5 prior.
    pub fn fold_frequency(&self) -> f64 {
        let total = self.folds + self.calls + self.raises;
        if total == 0 {
            0.5
        } else {
            f64::from(self.folds) / f64::from(total)
        }
    }

    /// Raises as a share of voluntary actions. Neutral 0.5 prior.
    pub fn aggression_factor(&self) -> f64 {
        let voluntary = self.calls + self.raises;
        if voluntary == 0 {
            0.5
        } else {
            f64::from(self.raises) / f64::from(voluntary)
        }
    }

    /// Mean hand distance shown at past showdowns, 10.0 when unseen.
    pub fn avg_showdown_distance(&self) -> f64 {
        if self.showdown_distances.is_empty() {
            10.0
        } else {
            let sum: u64 = self.showdown_distances.iter().map(|&d| u64::from(d)).sum();
            sum as f64 / self.showdown_distances.len() as f64
        }
    }

    pub fn is_tight(&self) -> bool {
        self.fold_frequency() > 0.5
    }

    pub fn is_loose(&self) -> bool {
        self.fold_frequency() < 0.3
    }

    pub fn is_aggressive(&self) -> bool {
        self.aggression_factor() > 0.5
    }

    /// How much this opponent discounts or inflates our effective hand
    /// strength. Tight players fold anyway, so weaker holdings play;
    /// loose players call everything, so only real strength counts.
    pub fn strength_multiplier(&self) -> f64 {
        let fold_freq = self.fold_frequency();
        if fold_freq > 0.6 {
            0.7
        } else if fold_freq > 0.5 {
            0.85
        } else if fold_freq < 0.25 {
            1.3
        } else if fold_freq < 0.35 {
            1.15
        } else {
            1.0
        }
    }
}

/// Opponent models for one table session, keyed by player name.
///
/// Kept outside the bots so every bot at the table reads and writes the
/// same history, and so models survive seats being reassigned between
/// hands.
#[derive(Debug, Default)]
pub struct SessionContext {
    models: HashMap<String, OpponentModel>,
}

/// Handle the bots share; one per table session.
pub type SharedContext = Rc<RefCell<SessionContext>>;

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a fresh context already wrapped for sharing.
    pub fn shared() -> SharedContext {
        Rc::new(RefCell::new(Self::new()))
    }

    pub fn model(&self, name: &str) -> Option<&OpponentModel> {
        self.models.get(name)
    }

    pub fn model_mut(&mut self, name: &str) -> &mut OpponentModel {
        self.models.entry(name.to_owned()).or_default()
    }

    fn snapshot(&self, name: &str) -> OpponentModel {
        self.models.get(name).cloned().unwrap_or_default()
    }
}

/// What the table looks like through the opponent models.
#[derive(Debug, Clone, Copy)]
struct OpponentRead {
    /// Multiplier applied to our win estimate for this field.
    adjustment: f64,
    avg_fold_frequency: f64,
    avg_aggression: f64,
    aggressive_count: usize,
    loose_count: usize,
}

impl Default for OpponentRead {
    fn default() -> Self {
        Self {
            adjustment: 1.0,
            avg_fold_frequency: 0.5,
            avg_aggression: 0.5,
            aggressive_count: 0,
            loose_count: 0,
        }
    }
}

/// A heuristic seat controller.
pub struct BotDecider {
    profile: BotProfile,
    context: SharedContext,
    rng: ChaCha8Rng,
    /// Upcoming draw-pile cards learned from the Universe, nearest
    /// first. Emptied as the pile is consumed or reshuffled.
    foreseen: Vec<Card>,
}

impl BotDecider {
    pub fn new(profile: BotProfile, context: SharedContext) -> Self {
        let rng = match profile.rng_seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => {
                let mut seed = [0u8; 32];
                rand::rng().fill_bytes(&mut seed);
                ChaCha8Rng::from_seed(seed)
            }
        };
        Self {
            profile,
            context,
            rng,
            foreseen: Vec::new(),
        }
    }

    /// Average the models of everyone still contesting the pot.
    fn read_opponents(&self, game: &GameState, seat: usize) -> OpponentRead {
        let ctx = self.context.borrow();
        let opponents: Vec<OpponentModel> = game
            .players()
            .iter()
            .enumerate()
            .filter(|&(i, p)| i != seat && !p.folded())
            .map(|(_, p)| ctx.snapshot(p.name()))
            .collect();
        if opponents.is_empty() {
            return OpponentRead::default();
        }

        let n = opponents.len() as f64;
        let avg_multiplier: f64 =
            opponents.iter().map(|m| m.strength_multiplier()).sum::<f64>() / n;
        let avg_fold_frequency: f64 =
            opponents.iter().map(|m| m.fold_frequency()).sum::<f64>() / n;
        let avg_aggression: f64 =
            opponents.iter().map(|m| m.aggression_factor()).sum::<f64>() / n;
        let aggressive_count = opponents.iter().filter(|m| m.is_aggressive()).count();
        let loose_count = opponents.iter().filter(|m| m.is_loose()).count();

        OpponentRead {
            adjustment: (1.0 + (1.0 - avg_multiplier) * 0.5).clamp(0.7, 1.3),
            avg_fold_frequency,
            avg_aggression,
            aggressive_count,
            loose_count,
        }
    }

    fn chance(&mut self, p: f64) -> bool {
        self.rng.random::<f64>() < p
    }

    /// The betting leg of a turn.
    fn decide_bet(&mut self, game: &GameState, seat: usize, read: OpponentRead) -> BetAction {
        let player = &game.players()[seat];
        let score = evaluate_hand(player.hand());
        let distance = score.distance();
        let to_call = game.current_bet().saturating_sub(player.current_bet());
        let pot = game.pot();
        let min_bet = game.min_bet();
        let credits = player.credits();
        let bluff_multiplier =
            (read.avg_fold_frequency / 0.5) * self.profile.bluff_scale;

        if to_call == 0 {
            return self.decide_unopened(game, seat, distance, pot, min_bet, bluff_multiplier);
        }

        if score.busted {
            // Only continue when the pot lays absurd odds.
            let pot_odds = f64::from(pot) / f64::from(to_call);
            return if pot_odds > 10.0 {
                BetAction::Call
            } else {
                BetAction::Fold
            };
        }

        let win_probability = estimate_win_probability(distance) * read.adjustment;
        let breakeven = f64::from(to_call) / f64::from(pot + to_call);

        if win_probability > breakeven + 0.05 {
            if distance <= 3 && self.chance(0.5) {
                let amount = if self.chance(0.4) {
                    pot * 3 / 10
                } else {
                    pot * 6 / 10
                };
                return BetAction::Raise(amount.max(min_bet));
            }
            if distance <= 7 && self.chance(0.25) {
                return BetAction::Raise((pot * 4 / 10).max(min_bet));
            }
            return BetAction::Call;
        }

        if win_probability > breakeven - 0.10 {
            // Marginal spot: peel one cheap card, fold to real pressure.
            return if to_call <= credits / 10 {
                BetAction::Call
            } else {
                BetAction::Fold
            };
        }

        let hero_chance = if read.avg_aggression > 0.6 { 0.12 } else { 0.05 };
        if f64::from(to_call) < f64::from(credits) * 0.15
            && distance < 18
            && self.chance(hero_chance * self.profile.bluff_scale)
        {
            return BetAction::Call;
        }
        BetAction::Fold
    }

    /// Nobody has bet into us yet this round.
    fn decide_unopened(
        &mut self,
        game: &GameState,
        seat: usize,
        distance: u32,
        pot: u32,
        min_bet: u32,
        bluff_multiplier: f64,
    ) -> BetAction {
        if distance <= 3 {
            let first_opponent_aggressive = game
                .players()
                .iter()
                .enumerate()
                .find(|&(i, p)| i != seat && !p.folded())
                .map(|(_, p)| self.context.borrow().snapshot(p.name()).is_aggressive())
                .unwrap_or(false);
            let slowplay = if first_opponent_aggressive { 0.2 } else { 0.1 };
            if self.chance(slowplay) {
                return BetAction::Call;
            }
            let roll = self.rng.random::<f64>();
            let amount = if roll < 0.30 {
                min_bet
            } else if roll < 0.90 {
                (pot / 2).max(min_bet)
            } else {
                (pot * 3 / 4).max(min_bet)
            };
            return BetAction::Raise(amount);
        }

        if distance <= 7 {
            if self.chance(0.4) {
                let amount = if self.chance(0.7) {
                    min_bet
                } else {
                    (pot / 3).max(min_bet)
                };
                return BetAction::Raise(amount);
            }
            return BetAction::Call;
        }

        if distance <= 12 {
            let drawn = game.players()[seat].drawn();
            let chance = 0.15 * bluff_multiplier * if drawn { 1.0 } else { 1.5 };
            if pot > min_bet * 3 && self.chance(chance) {
                return BetAction::Raise(min_bet);
            }
            return BetAction::Call;
        }

        let chance = 0.05 * (bluff_multiplier - 1.0).max(0.0);
        if pot > min_bet * 5 && self.chance(chance) {
            return BetAction::Raise(min_bet);
        }
        BetAction::Call
    }

    /// Pick a trump worth spending this turn, if any.
    fn choose_trionfo(&mut self, game: &GameState, seat: usize, read: OpponentRead) -> Option<Trionfo> {
        let player = &game.players()[seat];
        let score = evaluate_hand(player.hand());
        let distance = score.distance();
        let busted = score.busted;
        let pot = game.pot();
        let min_bet = game.min_bet();
        let targets = valid_targets(game, seat);

        for trionfo in playable_trionfi(player.hand()) {
            let play = match trionfo {
                Trionfo::Judgment => self.gate_judgment(game, seat, distance, busted),
                Trionfo::WheelOfFortune => distance > 8 || busted,
                Trionfo::Hermit => self.gate_hermit(distance, busted, pot, min_bet, player.credits(), read),
                Trionfo::Chariot => self.gate_chariot(game, distance, &targets),
                Trionfo::Hierophant => {
                    !targets.is_empty()
                        && distance <= 10
                        && (read.aggressive_count >= 2
                            || (read.aggressive_count >= 1 && distance <= 7)
                            || (read.loose_count >= 2 && distance <= 5))
                }
                Trionfo::Emperor => {
                    targets.len() >= 2
                        || targets
                            .first()
                            .map(|&t| game.players()[t].credits() < min_bet * 3)
                            .unwrap_or(false)
                }
                Trionfo::Magician => distance > 8 && !player.drawn(),
                Trionfo::Sun => self.gate_sun(game, distance, busted, read),
                Trionfo::Moon => self.gate_moon(distance, busted),
                Trionfo::Universe => self.gate_universe(game, distance, busted, player.drawn()),
                // The Hanged Man is held back for interrupts and the
                // Devil moves through the turn-start offer.
                _ => false,
            };
            if play {
                return Some(trionfo);
            }
        }
        None
    }

    fn gate_judgment(&mut self, game: &GameState, seat: usize, distance: u32, busted: bool) -> bool {
        if busted || distance > 7 {
            return false;
        }
        let pot = game.pot();
        let min_bet = game.min_bet();
        if distance <= 3 {
            return if pot >= min_bet * 5 {
                self.chance(0.7)
            } else {
                self.chance(0.3)
            };
        }
        let opponents = game
            .players()
            .iter()
            .enumerate()
            .filter(|&(i, p)| i != seat && !p.folded())
            .count();
        if pot >= min_bet * 5 {
            if opponents >= 3 {
                return self.chance(0.4);
            }
            if opponents == 2 {
                return self.chance(0.2);
            }
        }
        false
    }

    fn gate_hermit(
        &mut self,
        distance: u32,
        busted: bool,
        pot: u32,
        min_bet: u32,
        credits: u32,
        read: OpponentRead,
    ) -> bool {
        if busted || distance > 12 {
            return false;
        }
        // Short stack with a decent hand: lock the hand in for free.
        if credits < min_bet * 5 && distance <= 8 {
            return true;
        }
        if distance <= 5 && read.aggressive_count >= 2 {
            return true;
        }
        if distance <= 3 && pot > min_bet * 10 {
            return self.chance(0.3);
        }
        false
    }

    fn gate_chariot(&self, game: &GameState, distance: u32, targets: &[usize]) -> bool {
        if targets.is_empty() || distance > 7 {
            return false;
        }
        let multi_card = targets
            .iter()
            .filter(|&&t| game.players()[t].hand().len() > 2)
            .count();
        multi_card >= 2 || (multi_card >= 1 && distance <= 3)
    }

    fn gate_sun(&mut self, game: &GameState, distance: u32, busted: bool, read: OpponentRead) -> bool {
        if game.hands_face_up() || busted || distance > 5 {
            return false;
        }
        if read.avg_aggression > 0.6 {
            self.chance(0.6)
        } else if read.avg_aggression > 0.4 {
            self.chance(0.3)
        } else {
            self.chance(0.1)
        }
    }

    fn gate_moon(&mut self, distance: u32, busted: bool) -> bool {
        if busted || distance > 8 {
            self.chance(0.7)
        } else if distance > 5 {
            self.chance(0.3)
        } else {
            self.chance(0.1)
        }
    }

    fn gate_universe(&mut self, game: &GameState, distance: u32, busted: bool, drawn: bool) -> bool {
        if game.piles().draw_len() < 6 {
            return false;
        }
        if drawn {
            return self.chance(0.1);
        }
        if busted || distance > 8 {
            self.chance(0.4)
        } else if distance > 5 {
            self.chance(0.2)
        } else {
            self.chance(0.05)
        }
    }

    /// The drawing leg: prefer a visible card that helps, otherwise
    /// maybe take a blind card from the draw pile.
    fn decide_draw(&mut self, game: &GameState, seat: usize) -> Option<DrawAction> {
        let hand = game.players()[seat].hand();
        let distance = evaluate_hand(hand).distance();

        let swap = evaluate_community_swaps(hand, game.community_cards());
        let pile = evaluate_discard_pile_draws(hand, game.piles().discard_pile());

        // Best visible option across both sources.
        let best: Option<(DrawAction, u32)> = match (swap, pile) {
            (Some((h, c, d)), Some((i, dd))) => {
                if d <= dd {
                    Some((
                        DrawAction::Community {
                            hand_index: h,
                            community_index: c,
                        },
                        d,
                    ))
                } else {
                    Some((DrawAction::DiscardPile { index: i }, dd))
                }
            }
            (Some((h, c, d)), None) => Some((
                DrawAction::Community {
                    hand_index: h,
                    community_index: c,
                },
                d,
            )),
            (None, Some((i, d))) => Some((DrawAction::DiscardPile { index: i }, d)),
            (None, None) => None,
        };

        if let Some((action, expected)) = best {
            let improvement = distance.saturating_sub(expected);
            if improvement >= 3 || (distance > 15 && improvement > 0) {
                return Some(action);
            }
        }

        // Foresight from the Universe settles the blind draw outright.
        if let Some(&next) = self.foreseen.first() {
            let mut test: Vec<Card> = hand.to_vec();
            test.push(next);
            return if evaluate_hand(&test).distance() < distance {
                Some(DrawAction::DrawPile)
            } else {
                None
            };
        }

        let blind = distance > 10
            || (distance > 5 && self.chance(0.6))
            || (distance > 2 && self.chance(0.3));
        if blind {
            Some(DrawAction::DrawPile)
        } else {
            None
        }
    }

    /// The optional discard, decided against the hand as it will look
    /// once the chosen draw resolves.
    fn decide_discard(
        &mut self,
        game: &GameState,
        seat: usize,
        draw: Option<DrawAction>,
    ) -> Option<usize> {
        let (after, final_len) = projected_hand(game, seat, draw);
        if final_len <= 2 {
            return None;
        }

        let distance = evaluate_hand(&after).distance();
        let chance = if distance > 10 { 0.7 } else { 0.4 };
        if !self.chance(chance) {
            return None;
        }
        find_worst_discard(&after)
    }
}

/// The hand as it will look after the chosen draw resolves, in the
/// exact order the engine produces, plus the final card count. A blind
/// draw adds an unknown card to the count without inventing one.
fn projected_hand(
    game: &GameState,
    seat: usize,
    draw: Option<DrawAction>,
) -> (Vec<Card>, usize) {
    let hand = game.players()[seat].hand();
    let mut after: Vec<Card> = hand.to_vec();
    let mut final_len = after.len();
    match draw {
        Some(DrawAction::DiscardPile { index }) => {
            after.extend_from_slice(&game.piles().discard_pile()[index..]);
            final_len = after.len();
        }
        // The engine removes the given card and pushes the taken card
        // at the end of the hand.
        Some(DrawAction::Community {
            hand_index,
            community_index,
        }) => {
            let taken = game.community_cards()[community_index];
            after.remove(hand_index);
            after.push(taken);
        }
        // The blind card lands at the end, so indices into the current
        // cards stay valid.
        Some(DrawAction::DrawPile) => final_len += 1,
        None => {}
    }
    (after, final_len)
}

impl Decider for BotDecider {
    fn kind(&self) -> DeciderKind {
        DeciderKind::Bot
    }

    fn take_turn(&mut self, game: &GameState, seat: usize) -> TurnAction {
        let read = self.read_opponents(game, seat);
        let mut bet = self.decide_bet(game, seat, read);

        let mistake = self.chance(self.profile.mistake_rate);
        if mistake {
            // Mistakes flatten to a call; they never invent a raise.
            bet = BetAction::Call;
        }

        let mut play_trionfo = None;
        if !matches!(bet, BetAction::Fold) && !mistake {
            if let Some(trionfo) = self.choose_trionfo(game, seat, read) {
                // Trumps ride on raises; bump a call to the minimum.
                if matches!(bet, BetAction::Call) {
                    bet = BetAction::Raise(game.min_bet());
                }
                play_trionfo = Some(trionfo);
            }
        }

        if matches!(bet, BetAction::Fold) {
            return TurnAction::fold();
        }

        let draw = if game.players()[seat].drawn() {
            None
        } else {
            self.decide_draw(game, seat)
        };
        let discard_index = self.decide_discard(game, seat, draw);

        TurnAction {
            bet,
            play_trionfo,
            draw,
            discard_index,
        }
    }

    fn give_devil(&mut self, game: &GameState, seat: usize) -> Option<usize> {
        let hand = game.players()[seat].hand();
        let devil = Card::trionfo(Trionfo::Devil);
        if !hand.contains(&devil) {
            return None;
        }
        let with = evaluate_hand(hand).distance();
        let without: Vec<Card> = hand.iter().copied().filter(|&c| c != devil).collect();
        let give = evaluate_hand(&without).distance() < with || self.chance(0.5);
        if !give {
            return None;
        }

        let candidates = valid_targets(game, seat);
        if candidates.is_empty() {
            return None;
        }
        // Saddle whoever is winning with it, mostly.
        let richest = candidates
            .iter()
            .copied()
            .max_by_key(|&t| game.players()[t].credits())?;
        if self.chance(0.7) {
            Some(richest)
        } else {
            let pick = self.rng.random_range(0..candidates.len());
            Some(candidates[pick])
        }
    }

    fn nullify_effect(
        &mut self,
        game: &GameState,
        seat: usize,
        actor: usize,
        trionfo: Trionfo,
    ) -> bool {
        match trionfo {
            // Effects that coerce us directly: block almost always.
            Trionfo::Emperor | Trionfo::Hierophant | Trionfo::Chariot => self.chance(0.8),
            Trionfo::Magician | Trionfo::WheelOfFortune => {
                // A desperate opponent reaching for the deck is worth
                // stopping; otherwise only deny from a strong position.
                if game.players()[actor].credits() < game.min_bet() * 10 {
                    return self.chance(0.7);
                }
                let me = &game.players()[seat];
                let distance = evaluate_hand(me.hand()).distance();
                if distance <= 5 && me.credits() > game.pot() {
                    return self.chance(0.5);
                }
                false
            }
            Trionfo::Hermit => self.chance(0.1),
            _ => false,
        }
    }

    fn choose_target(&mut self, game: &GameState, seat: usize, trionfo: Trionfo) -> Option<usize> {
        let candidates = valid_targets(game, seat);
        if candidates.is_empty() {
            return None;
        }
        let by_credits = |flip: bool| -> Option<usize> {
            let extreme = if flip {
                candidates
                    .iter()
                    .copied()
                    .max_by_key(|&t| game.players()[t].credits())
            } else {
                candidates
                    .iter()
                    .copied()
                    .min_by_key(|&t| game.players()[t].credits())
            };
            extreme
        };
        match trionfo {
            // Lean on the short stack; it folds easiest.
            Trionfo::Emperor => {
                if self.chance(0.7) {
                    by_credits(false)
                } else {
                    let pick = self.rng.random_range(0..candidates.len());
                    Some(candidates[pick])
                }
            }
            Trionfo::Devil => {
                if self.chance(0.7) {
                    by_credits(true)
                } else {
                    let pick = self.rng.random_range(0..candidates.len());
                    Some(candidates[pick])
                }
            }
            _ => candidates.first().copied(),
        }
    }

    fn emperor_response(&mut self, game: &GameState, seat: usize) -> EmperorResponse {
        let player = &game.players()[seat];
        let score = evaluate_hand(player.hand());
        if score.busted || score.value.abs() < 10 {
            return EmperorResponse::Fold;
        }
        if player.credits() >= game.min_bet() && score.value.abs() >= 18 {
            return EmperorResponse::Ante;
        }
        match best_pair_to_discard(player.hand()) {
            Some((a, b)) => EmperorResponse::DiscardTwo(a, b),
            None => EmperorResponse::Fold,
        }
    }

    fn reveal_or_fold(&mut self, game: &GameState, seat: usize) -> bool {
        let score = evaluate_hand(game.players()[seat].hand());
        !score.busted && score.value.abs() >= 8
    }

    fn discard_or_fold(&mut self, game: &GameState, seat: usize) -> Option<usize> {
        let hand = game.players()[seat].hand();
        if hand.is_empty() {
            return None;
        }
        let score = evaluate_hand(hand);
        if score.busted || score.value.abs() < 8 {
            return None;
        }
        find_worst_discard(hand).or(Some(0))
    }

    fn arrange_future(&mut self, game: &GameState, seat: usize, cards: &[Card]) -> Vec<usize> {
        let hand = game.players()[seat].hand();
        let current = evaluate_hand(hand).distance();
        let mut order: Vec<usize> = (0..cards.len()).collect();
        // Most improving card drawn first.
        order.sort_by_key(|&i| {
            let mut test: Vec<Card> = hand.to_vec();
            test.push(cards[i]);
            let after = evaluate_hand(&test).distance();
            i64::from(after) - i64::from(current)
        });
        order
    }

    fn keep_from_fortune(&mut self, game: &GameState, seat: usize, cards: &[Card]) -> Vec<bool> {
        let hand = game.players()[seat].hand();
        let mask = best_keep_mask(hand, cards);
        (0..cards.len()).map(|i| mask & (1 << i) != 0).collect()
    }

    fn observe_future(&mut self, _game: &GameState, _seat: usize, cards: &[Card]) {
        self.foreseen = cards.to_vec();
    }

    fn observe_action(&mut self, game: &GameState, event: &GameEvent) {
        match event.verb {
            EventVerb::DrawPile => {
                if !self.foreseen.is_empty() {
                    self.foreseen.remove(0);
                }
            }
            EventVerb::Reshuffle | EventVerb::PlayTrionfo => {
                self.foreseen.clear();
            }
            _ => {}
        }

        let Some(seat) = event.seat else { return };
        let Some(player) = game.players().get(seat) else {
            return;
        };
        let mut ctx = self.context.borrow_mut();
        let model = ctx.model_mut(player.name());
        match event.verb {
            EventVerb::Fold => model.folds += 1,
            EventVerb::Call | EventVerb::Check => model.calls += 1,
            EventVerb::Raise => {
                model.raises += 1;
                // The initial three community cards count as the early
                // street; the turn and river deals come later.
                if game.community_cards().len() <= 3 {
                    model.early_raises += 1;
                } else {
                    model.late_raises += 1;
                }
            }
            _ => {}
        }
    }

    fn observe_showdown(&mut self, game: &GameState) {
        self.foreseen.clear();
        if game.winner().is_none() {
            return;
        }
        let mut ctx = self.context.borrow_mut();
        for player in game.players() {
            if player.folded() {
                continue;
            }
            let distance = evaluate_hand(player.hand()).distance();
            if distance != u32::MAX {
                ctx.model_mut(player.name()).showdown_distances.push(distance);
            }
        }
    }
}

/// Rough win chance by distance from the target. A perfect hand still
/// loses ties now and then.
pub fn estimate_win_probability(distance: u32) -> f64 {
    match distance {
        0 => 0.90,
        1..=2 => 0.80,
        3..=5 => 0.65,
        6..=8 => 0.45,
        9..=12 => 0.25,
        13..=16 => 0.12,
        _ => 0.05,
    }
}

/// Best single community swap, as
/// `(hand_index, community_index, expected_distance)`. `None` when no
/// swap strictly improves the hand.
pub fn evaluate_community_swaps(
    hand: &[Card],
    community: &[Card],
) -> Option<(usize, usize, u32)> {
    if hand.is_empty() || community.is_empty() {
        return None;
    }
    let current = evaluate_hand(hand).distance();
    let mut best: Option<(usize, usize, u32)> = None;
    let mut best_distance = current;

    for (h, _) in hand.iter().enumerate() {
        for (c, &card) in community.iter().enumerate() {
            let mut test: Vec<Card> = hand.to_vec();
            test[h] = card;
            let d = evaluate_hand(&test).distance();
            if d < best_distance {
                best_distance = d;
                best = Some((h, c, d));
            }
        }
    }
    best
}

/// Best discard-pile suffix draw, as `(index, expected_distance)`.
///
/// Taking a deep suffix lands several cards at once; the expectation
/// assumes up to three of them get shed again over later turns.
pub fn evaluate_discard_pile_draws(hand: &[Card], discard: &[Card]) -> Option<(usize, u32)> {
    if discard.is_empty() {
        return None;
    }
    let current = evaluate_hand(hand).distance();
    let mut best: Option<(usize, u32)> = None;
    let mut best_distance = current;

    for index in 0..discard.len() {
        let mut test: Vec<Card> = hand.to_vec();
        test.extend_from_slice(&discard[index..]);
        let mut d = evaluate_hand(&test).distance();
        if test.len() > 2 {
            d = d.min(best_distance_after_removals(&test, 3));
        }
        if d < best_distance {
            best_distance = d;
            best = Some((index, d));
        }
    }
    best
}

/// Best reachable distance after removing up to `max_removals` cards,
/// always leaving at least one.
fn best_distance_after_removals(cards: &[Card], max_removals: usize) -> u32 {
    let mut best = evaluate_hand(cards).distance();
    let n = cards.len();
    let limit = max_removals.min(n.saturating_sub(1));
    let mut removed: Vec<usize> = Vec::new();
    for r in 1..=limit {
        removal_search(cards, 0, r, &mut removed, &mut best);
    }
    best
}

fn removal_search(cards: &[Card], start: usize, left: usize, removed: &mut Vec<usize>, best: &mut u32) {
    if left == 0 {
        let kept: Vec<Card> = cards
            .iter()
            .enumerate()
            .filter(|(i, _)| !removed.contains(i))
            .map(|(_, &c)| c)
            .collect();
        let d = evaluate_hand(&kept).distance();
        if d < *best {
            *best = d;
        }
        return;
    }
    for i in start..=cards.len() - left {
        removed.push(i);
        removal_search(cards, i + 1, left - 1, removed, best);
        removed.pop();
    }
}

/// Index of the card whose removal improves the hand the most, or
/// `None` when every discard makes things worse. Never empties the
/// hand.
pub fn find_worst_discard(hand: &[Card]) -> Option<usize> {
    if hand.len() < 2 {
        return None;
    }
    let current = evaluate_hand(hand).distance();
    let mut best: Option<usize> = None;
    let mut best_distance = current;
    for i in 0..hand.len() {
        let mut test: Vec<Card> = hand.to_vec();
        test.remove(i);
        let d = evaluate_hand(&test).distance();
        if d < best_distance {
            best_distance = d;
            best = Some(i);
        }
    }
    best
}

/// The two hand indices whose joint removal lands closest to the
/// target. `None` for hands under two cards.
fn best_pair_to_discard(hand: &[Card]) -> Option<(usize, usize)> {
    if hand.len() < 2 {
        return None;
    }
    let mut best: Option<(usize, usize)> = None;
    let mut best_distance = u32::MAX;
    for a in 0..hand.len() {
        for b in (a + 1)..hand.len() {
            let kept: Vec<Card> = hand
                .iter()
                .enumerate()
                .filter(|&(i, _)| i != a && i != b)
                .map(|(_, &c)| c)
                .collect();
            let d = evaluate_hand(&kept).distance();
            if d < best_distance {
                best_distance = d;
                best = Some((a, b));
            }
        }
    }
    best
}

/// Which subset of the Wheel of Fortune cards to keep, as a bitmask
/// over `drawn`. Prefers smaller subsets when distances tie.
fn best_keep_mask(hand: &[Card], drawn: &[Card]) -> u32 {
    let n = drawn.len();
    let mut best_mask = 0u32;
    let mut best = evaluate_hand(hand).distance();
    for count in 1..=n {
        for mask in 0u32..(1u32 << n) {
            if mask.count_ones() as usize != count {
                continue;
            }
            let mut cards: Vec<Card> = hand.to_vec();
            for (i, &c) in drawn.iter().enumerate() {
                if mask & (1 << i) != 0 {
                    cards.push(c);
                }
            }
            let d = evaluate_hand(&cards).distance();
            if d < best {
                best = d;
                best_mask = mask;
            }
        }
    }
    best_mask
}
