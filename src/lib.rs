//! holdem-agent: a No-Limit Texas Hold'em table with an equity-driven agent
//!
//! Goals:
//! - Fast, table-driven hand evaluation (one rank per distinct hand class)
//! - Betting rules enforced by a state machine that rejects illegal input unchanged
//! - Decisions from Monte Carlo equity against pot odds, reproducible under a seed
//! - No panics for invalid input; use `Result` for recoverable errors
//!
//! ## Quick start: evaluate a Hold'em hand
//! ```
//! use holdem_agent::cards::{Card, Rank, Suit};
//! use holdem_agent::evaluator::{evaluate_holdem, Category};
//! use holdem_agent::hand::{Board, HoleCards};
//!
//! let hole = HoleCards::try_new(
//!     Card::new(Rank::Ace, Suit::Spades),
//!     Card::new(Rank::Ace, Suit::Hearts),
//! ).unwrap();
//! let board = Board::try_new(vec![
//!     Card::new(Rank::King, Suit::Clubs),
//!     Card::new(Rank::Queen, Suit::Diamonds),
//!     Card::new(Rank::Jack, Suit::Hearts),
//!     Card::new(Rank::Three, Suit::Spades),
//!     Card::new(Rank::Two, Suit::Clubs),
//! ]).unwrap();
//!
//! let eval = evaluate_holdem(&hole, &board).unwrap();
//! assert_eq!(eval.category, Category::Pair);
//! ```
//!
//! ## Quick start: ask the agent
//! ```
//! use holdem_agent::config::PolicyConfig;
//! use holdem_agent::engine::{ActionKind, BettingEngine};
//! use holdem_agent::policy::DecisionPolicy;
//! use holdem_agent::table::Table;
//!
//! let mut engine = BettingEngine::new(Table::new(2, 1000, 10, 20));
//! engine.start_hand().unwrap();
//! let seat = engine.current().unwrap();
//! engine.deal_hole_cards(seat, "Ks Kh".parse().unwrap()).unwrap();
//!
//! let policy = DecisionPolicy::new(PolicyConfig::default().with_seed(7));
//! let decision = policy.get_decision(&engine, seat).unwrap();
//! assert_eq!(decision.action, ActionKind::Raise);
//! ```
//!
//! ## Self-play
//! Run bots against each other with:
//! ```sh
//! RUST_LOG=info cargo run --bin selfplay -- --players 4 --hands 20
//! ```

pub mod agents;
pub mod cards;
pub mod config;
pub mod deck;
pub mod engine;
pub mod equity;
pub mod evaluator;
pub mod hand;
pub mod observer;
pub mod policy;
pub mod session;
pub mod table;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
