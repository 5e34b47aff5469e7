//! tarocchi: a Sabacc-style card game engine on the 78-card tarot deck
//!
//! Goals:
//! - Deterministic, seedable hand simulation for bots and tests
//! - Small, well-documented public API
//! - No panics for invalid input; use `Result` for recoverable errors
//!
//! The game crosses three traditions: betting rounds with blinds work
//! like poker, drawing from the discard pile or swapping with community
//! cards works like rummy, and scoring chases an absolute hand value of
//! 23 like blackjack. The 22 trump cards ("Trionfi") carry one-shot
//! special effects on top of their point values.
//!
//! ## Quick start: score a hand
//! ```
//! use tarocchi::cards::parse_cards;
//! use tarocchi::evaluator::evaluate_hand;
//!
//! let hand = parse_cards("10W, 9C, 4S").unwrap();
//! let score = evaluate_hand(&hand);
//! assert_eq!(score.value, 23);
//! assert!(!score.busted);
//! ```
//!
//! ## Quick start: play a bot-only hand
//! ```
//! use tarocchi::agents::{BotDecider, BotProfile, DeciderTable, SessionContext};
//! use tarocchi::game::GameState;
//! use tarocchi::turn::play_hand;
//!
//! let mut game = GameState::with_seed(&["Ada", "Bel", "Cyn"], 500, 10, 42);
//! let mut deciders = DeciderTable::for_seats(3);
//! let context = SessionContext::shared();
//! for seat in 0..3 {
//!     let profile = BotProfile::default().with_seed(seat as u64);
//!     deciders.set_decider(seat, Some(Box::new(BotDecider::new(profile, context.clone()))));
//! }
//! play_hand(&mut game, &mut deciders).unwrap();
//! assert_eq!(game.total_cards(), 78);
//! ```

pub mod agents;
pub mod cards;
pub mod deck;
pub mod evaluator;
pub mod game;
pub mod piles;
pub mod showdown;
pub mod trionfi;
pub mod turn;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
