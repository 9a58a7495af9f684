//! Hand strength evaluation for 5 to 7 cards.
//!
//! Strength is a [`HandRank`] in `1..=7462` where lower is better
//! (1 = royal flush, 7462 = 7-5-4-3-2 offsuit). Ranks come from precomputed
//! tables; a seven-card hand takes 21 table lookups.

mod classify;
pub(crate) mod combinations;
mod lookup;

pub use lookup::HAND_CLASSES;

use crate::cards::Card;
use crate::deck::CardSet;
use crate::hand::{validate_holdem, Board, HandError, HoleCards};
use combinations::FiveOf;
use core::cmp::Ordering;
use core::fmt;
use lookup::TABLES;

/// Poker hand category from weakest to strongest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[non_exhaustive]
#[repr(u8)]
pub enum Category {
    HighCard = 0,
    Pair = 1,
    TwoPair = 2,
    ThreeOfAKind = 3,
    Straight = 4,
    Flush = 5,
    FullHouse = 6,
    FourOfAKind = 7,
    StraightFlush = 8,
}

impl Category {
    pub const fn ordinal(self) -> u8 {
        self as u8
    }

    pub const fn name(self) -> &'static str {
        match self {
            Category::HighCard => "High Card",
            Category::Pair => "Pair",
            Category::TwoPair => "Two Pair",
            Category::ThreeOfAKind => "Three of a Kind",
            Category::Straight => "Straight",
            Category::Flush => "Flush",
            Category::FullHouse => "Full House",
            Category::FourOfAKind => "Four of a Kind",
            Category::StraightFlush => "Straight Flush",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Strength of a poker hand. Lower is better.
///
/// The derived ordering follows the raw value, so `a < b` means `a` is the
/// stronger hand. Use [`HandRank::cmp_strength`] for "greater is stronger".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HandRank(u16);

impl HandRank {
    pub const BEST: HandRank = HandRank(1);
    pub const WORST: HandRank = HandRank(HAND_CLASSES);

    pub const fn value(self) -> u16 {
        self.0
    }

    pub fn category(self) -> Category {
        TABLES.category(self.0)
    }

    pub fn beats(self, other: HandRank) -> bool {
        self.0 < other.0
    }

    /// `Greater` when `self` is the stronger hand.
    pub fn cmp_strength(self, other: HandRank) -> Ordering {
        other.0.cmp(&self.0)
    }
}

impl fmt::Display for HandRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.category(), self.0)
    }
}

/// Evaluation result: the rank and its category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub struct Evaluation {
    pub rank: HandRank,
    pub category: Category,
}

impl From<HandRank> for Evaluation {
    fn from(rank: HandRank) -> Self {
        Self { rank, category: rank.category() }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EvalError {
    #[error("invalid hand: {0}")]
    InvalidHand(#[from] HandError),
    #[error("expected 5 to 7 cards, got {0}")]
    CardCount(usize),
    #[error("duplicate card: {0}")]
    DuplicateCard(Card),
}

/// Rank exactly five cards.
pub fn evaluate_five(cards: &[Card; 5]) -> HandRank {
    HandRank(TABLES.rank_of_keys(cards.map(Card::key)))
}

/// Rank the best five of seven cards.
pub fn evaluate_seven(cards: &[Card; 7]) -> HandRank {
    best_of_keys(&cards.map(Card::key))
}

fn best_of_keys(keys: &[u32]) -> HandRank {
    let tables = &*TABLES;
    let mut best = HAND_CLASSES;
    for idx in FiveOf::new(keys.len()) {
        let rank = tables.rank_of_keys(idx.map(|i| keys[i]));
        if rank < best {
            best = rank;
        }
    }
    HandRank(best)
}

/// Rank 5, 6 or 7 distinct cards; the result is the best five-card subset.
///
/// ```
/// use holdem_agent::cards::parse_cards;
/// use holdem_agent::evaluator::{evaluate, Category};
///
/// let cards = parse_cards("As Ah Kd Qc 9h 3s 2c").unwrap();
/// let eval = evaluate(&cards).unwrap();
/// assert_eq!(eval.category, Category::Pair);
/// ```
pub fn evaluate(cards: &[Card]) -> Result<Evaluation, EvalError> {
    if !(5..=7).contains(&cards.len()) {
        return Err(EvalError::CardCount(cards.len()));
    }
    let mut seen = CardSet::empty();
    for c in cards {
        if !seen.insert(*c) {
            return Err(EvalError::DuplicateCard(*c));
        }
    }
    let keys: Vec<u32> = cards.iter().map(|c| c.key()).collect();
    Ok(best_of_keys(&keys).into())
}

/// Evaluate a Hold'em hand given hole cards and a board of 3 to 5 cards.
///
/// ```
/// use holdem_agent::evaluator::{evaluate_holdem, Category};
/// use holdem_agent::hand::{Board, HoleCards};
///
/// let hole: HoleCards = "As Ah".parse().unwrap();
/// let board: Board = "Qc Jd 9h 3s 2c".parse().unwrap();
/// let eval = evaluate_holdem(&hole, &board).unwrap();
/// assert_eq!(eval.category, Category::Pair);
/// ```
pub fn evaluate_holdem(hole: &HoleCards, board: &Board) -> Result<Evaluation, EvalError> {
    validate_holdem(hole, board)?;
    let mut cards = Vec::with_capacity(7);
    cards.extend_from_slice(&hole.as_array());
    cards.extend_from_slice(board.as_slice());
    evaluate(&cards)
}

/// Compare two Hold'em hands on a shared board. `Greater` means `a` wins.
///
/// ```
/// use holdem_agent::evaluator::compare_holdem;
/// use holdem_agent::hand::{Board, HoleCards};
/// use std::cmp::Ordering;
///
/// let board: Board = "Qc Jd 9h 3s 2c".parse().unwrap();
/// let a: HoleCards = "As Ah".parse().unwrap();
/// let b: HoleCards = "Ks Kh".parse().unwrap();
/// assert_eq!(compare_holdem(&a, &b, &board).unwrap(), Ordering::Greater);
/// ```
pub fn compare_holdem(a: &HoleCards, b: &HoleCards, board: &Board) -> Result<Ordering, EvalError> {
    let va = evaluate_holdem(a, board)?;
    let vb = evaluate_holdem(b, board)?;
    Ok(va.rank.cmp_strength(vb.rank))
}
