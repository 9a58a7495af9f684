use crate::cards::{Card, CardTextError, Rank, Suit};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DeckError {
    #[error(transparent)]
    InvalidCardText(#[from] CardTextError),
    #[error("duplicate card detected: {0}")]
    DuplicateCard(Card),
    #[error("not enough cards: requested {requested}, available {available}")]
    NotEnoughCards { requested: usize, available: usize },
}

/// A set of cards stored as a 52-bit mask.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CardSet(u64);

impl CardSet {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn from_cards<'a, I>(cards: I) -> Self
    where
        I: IntoIterator<Item = &'a Card>,
    {
        let mut set = Self::empty();
        for c in cards {
            set.insert(*c);
        }
        set
    }

    /// Insert a card; returns `false` if it was already present.
    pub fn insert(&mut self, card: Card) -> bool {
        let fresh = !self.contains(card);
        self.0 |= card.mask();
        fresh
    }

    pub const fn contains(&self, card: Card) -> bool {
        self.0 & card.mask() != 0
    }

    pub const fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Card> + '_ {
        (0..52).filter(move |i| self.0 & (1u64 << i) != 0).map(Card::from_index)
    }
}

/// A standard 52-card deck.
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// ```
    /// use holdem_agent::deck::Deck;
    ///
    /// let deck = Deck::standard();
    /// assert_eq!(deck.len(), 52);
    /// ```
    pub fn standard() -> Self {
        let mut cards = Vec::with_capacity(52);
        for &s in &Suit::ALL {
            for &r in &Rank::ALL {
                cards.push(Card::new(r, s));
            }
        }
        Self { cards }
    }

    /// A deck holding every card not in `known`.
    pub fn without(known: CardSet) -> Self {
        let mut deck = Self::standard();
        deck.cards.retain(|c| !known.contains(*c));
        deck
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn contains(&self, card: Card) -> bool {
        self.cards.contains(&card)
    }

    pub fn as_slice(&self) -> &[Card] {
        &self.cards
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

    /// Remove a specific card; returns `false` when it is not in the deck.
    pub fn remove(&mut self, card: Card) -> bool {
        match self.cards.iter().position(|c| *c == card) {
            Some(pos) => {
                self.cards.swap_remove(pos);
                true
            }
            None => false,
        }
    }

    /// Draw `n` distinct random cards that are not in `exclude`, leaving the deck untouched.
    ///
    /// ```
    /// use holdem_agent::deck::{CardSet, Deck};
    /// use rand::SeedableRng;
    /// use rand_chacha::ChaCha8Rng;
    ///
    /// let deck = Deck::standard();
    /// let mut rng = ChaCha8Rng::seed_from_u64(3);
    /// let picked = deck.sample(7, CardSet::empty(), &mut rng).unwrap();
    /// assert_eq!(CardSet::from_cards(&picked).len(), 7);
    /// ```
    pub fn sample<R: Rng + ?Sized>(
        &self,
        n: usize,
        exclude: CardSet,
        rng: &mut R,
    ) -> Result<Vec<Card>, DeckError> {
        let mut pool = Deck {
            cards: self.cards.iter().copied().filter(|c| !exclude.contains(*c)).collect(),
        };
        Ok(pool.shuffle_prefix(n, rng)?.to_vec())
    }

    /// Move `n` uniformly chosen cards to the front and return them.
    ///
    /// The deck keeps every card, so repeated calls give independent draws
    /// without reallocating. Cards within one call never repeat.
    pub fn shuffle_prefix<R: Rng + ?Sized>(
        &mut self,
        n: usize,
        rng: &mut R,
    ) -> Result<&[Card], DeckError> {
        if self.cards.len() < n {
            return Err(DeckError::NotEnoughCards { requested: n, available: self.cards.len() });
        }
        let (picked, _) = self.cards.partial_shuffle(rng, n);
        Ok(&*picked)
    }
}

/// Tracks which cards have been revealed during a hand so the same card is
/// never accepted twice from manual input.
#[derive(Debug, Clone)]
pub struct DeckTracker {
    deck: Deck,
    drawn: CardSet,
}

impl Default for DeckTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl DeckTracker {
    pub fn new() -> Self {
        Self { deck: Deck::standard(), drawn: CardSet::empty() }
    }

    /// Forget every drawn card; used at the start of a hand.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Parse natural card text and mark that card drawn.
    ///
    /// ```
    /// use holdem_agent::deck::{DeckError, DeckTracker};
    ///
    /// let mut tracker = DeckTracker::new();
    /// let ace = tracker.draw_specific("Spade Ace").unwrap();
    /// assert_eq!(ace.to_string(), "As");
    /// assert!(matches!(tracker.draw_specific("ace of spades"), Err(DeckError::DuplicateCard(_))));
    /// ```
    pub fn draw_specific(&mut self, text: &str) -> Result<Card, DeckError> {
        let card = Card::parse_text(text)?;
        self.draw_card(card)
    }

    /// Mark an already-parsed card drawn.
    pub fn draw_card(&mut self, card: Card) -> Result<Card, DeckError> {
        if self.drawn.contains(card) {
            return Err(DeckError::DuplicateCard(card));
        }
        self.drawn.insert(card);
        self.deck.remove(card);
        Ok(card)
    }

    pub fn is_drawn(&self, card: Card) -> bool {
        self.drawn.contains(card)
    }

    pub fn drawn(&self) -> CardSet {
        self.drawn
    }

    /// Cards not yet drawn this hand.
    pub fn remaining(&self) -> &Deck {
        &self.deck
    }
}
