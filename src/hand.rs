use crate::cards::{parse_cards, Card};
use crate::deck::CardSet;
use std::str::FromStr;

/// Number of community cards on a complete board.
pub const FULL_BOARD: usize = 5;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum HandError {
    #[error("duplicate cards in hole cards")]
    DuplicateHoleCards,
    #[error("too many board cards: {0}")]
    TooManyBoardCards(usize),
    #[error("duplicate card on board: {0}")]
    DuplicateBoardCard(Card),
    #[error("hole cards overlap with board")]
    Overlap,
    #[error("expected exactly two hole cards, got {0}")]
    HoleCount(usize),
    #[error("card parse error: {0}")]
    CardParse(String),
}

/// A player's two private hole cards.
///
/// ```
/// use holdem_agent::cards::{Card, Rank, Suit};
/// use holdem_agent::hand::HoleCards;
///
/// let hole = HoleCards::try_new(
///     Card::new(Rank::Ace, Suit::Spades),
///     Card::new(Rank::King, Suit::Spades),
/// ).unwrap();
/// assert_eq!(hole.as_array().len(), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoleCards(Card, Card);

impl HoleCards {
    pub fn try_new(a: Card, b: Card) -> Result<Self, HandError> {
        if a == b {
            return Err(HandError::DuplicateHoleCards);
        }
        Ok(Self(a, b))
    }

    pub fn from_slice(slice: &[Card]) -> Result<Self, HandError> {
        match slice {
            [a, b] => Self::try_new(*a, *b),
            _ => Err(HandError::HoleCount(slice.len())),
        }
    }

    pub fn first(&self) -> Card {
        self.0
    }

    pub fn second(&self) -> Card {
        self.1
    }

    pub fn as_array(&self) -> [Card; 2] {
        [self.0, self.1]
    }

    pub fn contains(&self, card: Card) -> bool {
        self.0 == card || self.1 == card
    }

    pub fn card_set(&self) -> CardSet {
        CardSet::from_cards(&self.as_array())
    }
}

impl FromStr for HoleCards {
    type Err = HandError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cards = parse_cards(s).map_err(|e| HandError::CardParse(e.to_string()))?;
        Self::from_slice(&cards)
    }
}

/// Community cards in the order they were revealed (flop, turn, river).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Board {
    cards: Vec<Card>,
}

impl Board {
    pub fn new() -> Self {
        Self { cards: Vec::with_capacity(FULL_BOARD) }
    }

    pub fn try_new(cards: Vec<Card>) -> Result<Self, HandError> {
        let mut board = Self::new();
        board.try_extend(cards)?;
        Ok(board)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.cards.len() == FULL_BOARD
    }

    /// Cards still to come before the board is complete.
    pub fn missing(&self) -> usize {
        FULL_BOARD - self.cards.len()
    }

    pub fn as_slice(&self) -> &[Card] {
        &self.cards
    }

    pub fn card_set(&self) -> CardSet {
        CardSet::from_cards(&self.cards)
    }

    pub fn clear(&mut self) {
        self.cards.clear();
    }

    pub fn try_push(&mut self, card: Card) -> Result<(), HandError> {
        if self.cards.len() >= FULL_BOARD {
            return Err(HandError::TooManyBoardCards(self.cards.len() + 1));
        }
        if self.cards.contains(&card) {
            return Err(HandError::DuplicateBoardCard(card));
        }
        self.cards.push(card);
        Ok(())
    }

    /// Append all cards or none of them.
    pub fn try_extend<I>(&mut self, cards: I) -> Result<(), HandError>
    where
        I: IntoIterator<Item = Card>,
    {
        let mut staged = self.clone();
        for c in cards {
            staged.try_push(c)?;
        }
        *self = staged;
        Ok(())
    }
}

impl FromStr for Board {
    type Err = HandError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cards = parse_cards(s).map_err(|e| HandError::CardParse(e.to_string()))?;
        Board::try_new(cards)
    }
}

/// Validate that a pair of hole cards and a board can coexist in one deal.
///
/// ```
/// use holdem_agent::hand::{Board, HoleCards, validate_holdem};
///
/// let hole: HoleCards = "As Ks".parse().unwrap();
/// let board: Board = "2c 3c 4c".parse().unwrap();
/// validate_holdem(&hole, &board).unwrap();
/// ```
pub fn validate_holdem(hole: &HoleCards, board: &Board) -> Result<(), HandError> {
    if hole.first() == hole.second() {
        return Err(HandError::DuplicateHoleCards);
    }
    if board.as_slice().iter().any(|c| hole.contains(*c)) {
        return Err(HandError::Overlap);
    }
    Ok(())
}
