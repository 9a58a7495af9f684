use std::fmt;
use std::str::FromStr;

/// Card ranks from Two (low) to Ace (high).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Rank {
    Two = 2,
    Three = 3,
    Four = 4,
    Five = 5,
    Six = 6,
    Seven = 7,
    Eight = 8,
    Nine = 9,
    Ten = 10,
    Jack = 11,
    Queen = 12,
    King = 13,
    Ace = 14,
}

/// Primes assigned to ranks Two..Ace; the product of five of them identifies
/// a rank multiset uniquely.
const RANK_PRIMES: [u32; 13] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41];

impl Rank {
    pub const ALL: [Rank; 13] = [
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
    ];

    pub const fn value(self) -> u8 {
        self as u8
    }

    /// Zero-based position, Two = 0 .. Ace = 12.
    pub const fn index(self) -> usize {
        self as usize - 2
    }

    /// Inverse of [`Rank::index`]; indices past Ace clamp to Ace.
    pub const fn from_index(i: usize) -> Rank {
        match i {
            0 => Rank::Two,
            1 => Rank::Three,
            2 => Rank::Four,
            3 => Rank::Five,
            4 => Rank::Six,
            5 => Rank::Seven,
            6 => Rank::Eight,
            7 => Rank::Nine,
            8 => Rank::Ten,
            9 => Rank::Jack,
            10 => Rank::Queen,
            11 => Rank::King,
            _ => Rank::Ace,
        }
    }

    pub const fn prime(self) -> u32 {
        RANK_PRIMES[self.index()]
    }

    pub const fn to_char(self) -> char {
        match self {
            Rank::Two => '2',
            Rank::Three => '3',
            Rank::Four => '4',
            Rank::Five => '5',
            Rank::Six => '6',
            Rank::Seven => '7',
            Rank::Eight => '8',
            Rank::Nine => '9',
            Rank::Ten => 'T',
            Rank::Jack => 'J',
            Rank::Queen => 'Q',
            Rank::King => 'K',
            Rank::Ace => 'A',
        }
    }

    /// Rank from a spoken word or numeral (`"ACE"`, `"10"`, `"nine"`).
    fn from_word(word: &str) -> Option<Rank> {
        let r = match word {
            "TWO" | "2" => Rank::Two,
            "THREE" | "3" => Rank::Three,
            "FOUR" | "4" => Rank::Four,
            "FIVE" | "5" => Rank::Five,
            "SIX" | "6" => Rank::Six,
            "SEVEN" | "7" => Rank::Seven,
            "EIGHT" | "8" => Rank::Eight,
            "NINE" | "9" => Rank::Nine,
            "TEN" | "10" => Rank::Ten,
            "JACK" => Rank::Jack,
            "QUEEN" => Rank::Queen,
            "KING" => Rank::King,
            "ACE" => Rank::Ace,
            _ => return None,
        };
        Some(r)
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RankParseError {
    #[error("invalid rank: '{0}'")]
    Invalid(String),
}

impl FromStr for Rank {
    type Err = RankParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        let upper = t.to_ascii_uppercase();
        let r = match upper.as_str() {
            "T" => Rank::Ten,
            "J" => Rank::Jack,
            "Q" => Rank::Queen,
            "K" => Rank::King,
            "A" => Rank::Ace,
            other => Rank::from_word(other).ok_or_else(|| RankParseError::Invalid(s.to_string()))?,
        };
        Ok(r)
    }
}

impl TryFrom<char> for Rank {
    type Error = RankParseError;
    fn try_from(c: char) -> Result<Self, Self::Error> {
        let up = c.to_ascii_uppercase();
        match up {
            '2' => Ok(Rank::Two),
            '3' => Ok(Rank::Three),
            '4' => Ok(Rank::Four),
            '5' => Ok(Rank::Five),
            '6' => Ok(Rank::Six),
            '7' => Ok(Rank::Seven),
            '8' => Ok(Rank::Eight),
            '9' => Ok(Rank::Nine),
            'T' => Ok(Rank::Ten),
            'J' => Ok(Rank::Jack),
            'Q' => Ok(Rank::Queen),
            'K' => Ok(Rank::King),
            'A' => Ok(Rank::Ace),
            _ => Err(RankParseError::Invalid(c.to_string())),
        }
    }
}

/// Four suits; order has no hand-strength meaning but is fixed for ordering: C < D < H < S.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Suit {
    Clubs,
    Diamonds,
    Hearts,
    Spades,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn to_char(self) -> char {
        match self {
            Suit::Clubs => 'c',
            Suit::Diamonds => 'd',
            Suit::Hearts => 'h',
            Suit::Spades => 's',
        }
    }

    fn from_word(word: &str) -> Option<Suit> {
        match word {
            "CLUB" | "CLUBS" => Some(Suit::Clubs),
            "DIAMOND" | "DIAMONDS" => Some(Suit::Diamonds),
            "HEART" | "HEARTS" => Some(Suit::Hearts),
            "SPADE" | "SPADES" => Some(Suit::Spades),
            _ => None,
        }
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SuitParseError {
    #[error("invalid suit: '{0}'")]
    Invalid(String),
}

impl FromStr for Suit {
    type Err = SuitParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        let mut chars = t.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Suit::try_from(c);
        }
        Suit::from_word(&t.to_ascii_uppercase()).ok_or_else(|| SuitParseError::Invalid(s.to_string()))
    }
}

impl TryFrom<char> for Suit {
    type Error = SuitParseError;
    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c.to_ascii_lowercase() {
            'c' => Ok(Suit::Clubs),
            'd' => Ok(Suit::Diamonds),
            'h' => Ok(Suit::Hearts),
            's' => Ok(Suit::Spades),
            _ => Err(SuitParseError::Invalid(c.to_string())),
        }
    }
}

/// A playing card: rank + suit.
///
/// ```
/// use holdem_agent::cards::{Card, Rank, Suit};
///
/// let card = Card::new(Rank::Ace, Suit::Spades);
/// assert_eq!(card.to_string(), "As");
/// assert_eq!(Card::from_index(card.index()), card);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Card {
    rank: Rank,
    suit: Suit,
}

impl Card {
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }

    pub const fn rank(self) -> Rank {
        self.rank
    }
    pub const fn suit(self) -> Suit {
        self.suit
    }

    pub const fn to_tuple(self) -> (Rank, Suit) {
        (self.rank, self.suit)
    }

    /// Dense identity in `0..52`, usable as a bit position.
    pub const fn index(self) -> usize {
        self.rank.index() * 4 + self.suit.index()
    }

    /// Inverse of [`Card::index`]. Indices are taken modulo 52.
    pub const fn from_index(i: usize) -> Card {
        let i = i % 52;
        let suit = match i % 4 {
            0 => Suit::Clubs,
            1 => Suit::Diamonds,
            2 => Suit::Hearts,
            _ => Suit::Spades,
        };
        Card::new(Rank::from_index(i / 4), suit)
    }

    /// Single-bit mask of this card within a 52-bit card set.
    pub const fn mask(self) -> u64 {
        1u64 << self.index()
    }

    /// Packed evaluator key:
    /// `[ rank bit (16..29) | suit bit (12..16) | rank index (8..12) | prime (0..8) ]`.
    pub const fn key(self) -> u32 {
        let r = self.rank.index() as u32;
        (1u32 << (16 + r)) | (1u32 << (12 + self.suit.index() as u32)) | (r << 8) | self.rank.prime()
    }

    /// Parse natural card text as typed by a person at the table.
    ///
    /// Accepted forms (case-insensitive, any whitespace):
    /// - `"<Suit> <Rank>"` or `"<Rank> <Suit>"`, e.g. `"Diamond Nine"`, `"ace spades"`
    /// - `"<Rank> OF <Suit>"`, e.g. `"10 of Hearts"`
    ///
    /// ```
    /// use holdem_agent::cards::{Card, Rank, Suit};
    ///
    /// assert_eq!(Card::parse_text("Diamond Nine").unwrap(), Card::new(Rank::Nine, Suit::Diamonds));
    /// assert_eq!(Card::parse_text("  ten   OF clubs ").unwrap(), Card::new(Rank::Ten, Suit::Clubs));
    /// ```
    pub fn parse_text(text: &str) -> Result<Card, CardTextError> {
        let upper = text.trim().to_ascii_uppercase();
        let parts: Vec<&str> = upper.split_whitespace().collect();

        let (rank_word, suit_word) = match parts.as_slice() {
            [first, second] => {
                if Rank::from_word(first).is_some() && Suit::from_word(second).is_some() {
                    (*first, *second)
                } else {
                    (*second, *first)
                }
            }
            [rank, "OF", suit] => (*rank, *suit),
            _ => return Err(CardTextError::InvalidFormat(text.to_string())),
        };

        match (Rank::from_word(rank_word), Suit::from_word(suit_word)) {
            (Some(rank), Some(suit)) => Ok(Card::new(rank, suit)),
            _ => Err(CardTextError::InvalidSuitOrRank(text.to_string())),
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

/// Failure to read a card from natural text.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CardTextError {
    #[error("invalid format '{0}': use 'Suit Rank' (e.g. 'Diamond Nine') or 'Rank of Suit'")]
    InvalidFormat(String),
    #[error("invalid suit or rank in '{0}'")]
    InvalidSuitOrRank(String),
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CardParseError {
    #[error("invalid card: '{0}'")]
    Invalid(String),
    #[error(transparent)]
    Rank(#[from] RankParseError),
    #[error(transparent)]
    Suit(#[from] SuitParseError),
}

impl FromStr for Card {
    type Err = CardParseError;

    /// Parse the canonical short form: rank character(s) followed by a suit character (`As`, `10d`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        let suit_ch = t.chars().last().ok_or_else(|| CardParseError::Invalid(s.to_string()))?;
        let rank_str = &t[..t.len() - suit_ch.len_utf8()];
        if rank_str.is_empty() {
            return Err(CardParseError::Invalid(s.to_string()));
        }
        let rank = Rank::from_str(rank_str)?;
        let suit = Suit::try_from(suit_ch)?;
        Ok(Card::new(rank, suit))
    }
}

/// Parse multiple short-form cards separated by whitespace or commas.
///
/// ```
/// use holdem_agent::cards::{parse_cards, Card, Rank, Suit};
///
/// let cards = parse_cards("As, Kd 10c").unwrap();
/// assert_eq!(cards[0], Card::new(Rank::Ace, Suit::Spades));
/// assert_eq!(cards[1], Card::new(Rank::King, Suit::Diamonds));
/// assert_eq!(cards[2], Card::new(Rank::Ten, Suit::Clubs));
/// ```
pub fn parse_cards(input: &str) -> Result<Vec<Card>, CardParseError> {
    input
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(Card::from_str)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rank_display_and_from_str() {
        assert_eq!(Rank::Ace.to_string(), "A");
        assert_eq!(Rank::from_str("T").unwrap(), Rank::Ten);
        assert_eq!(Rank::from_str("10").unwrap(), Rank::Ten);
        assert_eq!(Rank::from_str("queen").unwrap(), Rank::Queen);
        assert!(Rank::from_str("1").is_err());
    }

    #[test]
    fn suit_display_and_from_str() {
        assert_eq!(Suit::Spades.to_string(), "s");
        assert_eq!(Suit::from_str("s").unwrap(), Suit::Spades);
        assert_eq!(Suit::from_str("Hearts").unwrap(), Suit::Hearts);
        assert_eq!(Suit::from_str("diamond").unwrap(), Suit::Diamonds);
        assert!(Suit::from_str("x").is_err());
    }

    #[test]
    fn card_display_and_from_str() {
        let a = Card::new(Rank::Ace, Suit::Spades);
        assert_eq!(a.to_string(), "As");
        assert_eq!(Card::from_str("As").unwrap(), a);
        assert_eq!(Card::from_str("10d").unwrap(), Card::new(Rank::Ten, Suit::Diamonds));
        assert_eq!(Card::from_str("ah").unwrap(), Card::new(Rank::Ace, Suit::Hearts));
        assert!(Card::from_str("s").is_err());
    }

    #[test]
    fn index_is_a_bijection_over_the_deck() {
        let mut seen = [false; 52];
        for r in Rank::ALL {
            for s in Suit::ALL {
                let c = Card::new(r, s);
                assert!(!seen[c.index()]);
                seen[c.index()] = true;
                assert_eq!(Card::from_index(c.index()), c);
            }
        }
        assert!(seen.iter().all(|&b| b));
    }

    #[test]
    fn natural_text_forms() {
        let nine_d = Card::new(Rank::Nine, Suit::Diamonds);
        assert_eq!(Card::parse_text("Diamond Nine").unwrap(), nine_d);
        assert_eq!(Card::parse_text("nine diamonds").unwrap(), nine_d);
        assert_eq!(Card::parse_text("9 OF diamond").unwrap(), nine_d);
        assert_eq!(Card::parse_text("\tDIAMONDS\t  9 ").unwrap(), nine_d);
        assert_eq!(
            Card::parse_text("spade ace").unwrap().to_string(),
            "As",
            "canonical form is rank char + suit char"
        );
    }

    #[test]
    fn natural_text_errors() {
        assert!(matches!(Card::parse_text("As"), Err(CardTextError::InvalidFormat(_))));
        assert!(matches!(Card::parse_text("ace in spades"), Err(CardTextError::InvalidFormat(_))));
        assert!(matches!(Card::parse_text(""), Err(CardTextError::InvalidFormat(_))));
        assert!(matches!(Card::parse_text("Spade One"), Err(CardTextError::InvalidSuitOrRank(_))));
        assert!(matches!(Card::parse_text("ace of stars"), Err(CardTextError::InvalidSuitOrRank(_))));
    }

    #[test]
    fn ordering_is_rank_then_suit() {
        let as_ = Card::new(Rank::Ace, Suit::Spades);
        let ah = Card::new(Rank::Ace, Suit::Hearts);
        let kd = Card::new(Rank::King, Suit::Diamonds);
        assert!(as_ > ah);
        assert!(ah > kd);
    }

    #[test]
    fn parse_many_cards() {
        let xs = parse_cards("As, Kd 10c").unwrap();
        assert_eq!(xs.len(), 3);
        assert_eq!(xs[0], Card::new(Rank::Ace, Suit::Spades));
        assert_eq!(xs[1], Card::new(Rank::King, Suit::Diamonds));
        assert_eq!(xs[2], Card::new(Rank::Ten, Suit::Clubs));
    }
}
