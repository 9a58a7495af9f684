//! Reference five-card classifier.
//!
//! Slow but obviously correct: each category detector inspects a precomputed
//! analysis of the hand. The lookup tables in [`super::lookup`] are derived
//! from this classifier once, so the hot path never runs it.

use crate::cards::{Card, Rank};
use crate::evaluator::Category;

/// Packed category and tiebreakers. Higher is stronger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct Strength(u64);

impl Strength {
    /// Layout (most significant -> least):
    /// `[ category (8) | r0 (6) | r1 (6) | r2 (6) | r3 (6) | r4 (6) ]`
    pub(crate) fn from_parts(category: Category, ranks_desc: &[Rank; 5]) -> Self {
        const CAT_SHIFT: u32 = 30;
        const RANK_STRIDE: u32 = 6;
        let mut v: u64 = (category.ordinal() as u64) << CAT_SHIFT;
        for (i, r) in ranks_desc.iter().enumerate() {
            let offset = CAT_SHIFT - RANK_STRIDE * (i as u32 + 1);
            v |= (r.value() as u64) << offset;
        }
        Strength(v)
    }
}

/// Everything the detectors need to know about five cards.
#[derive(Debug, Clone)]
pub(crate) struct HandAnalysis {
    /// Ranks sorted descending.
    ranks: [Rank; 5],
    /// (rank, count) sorted by count desc, then rank desc.
    groups: Vec<(Rank, u8)>,
    is_flush: bool,
    straight_top: Option<Rank>,
}

impl HandAnalysis {
    pub(crate) fn new(cards: &[Card; 5]) -> Self {
        let mut ranks = cards.map(|c| c.rank());
        ranks.sort_by(|a, b| b.cmp(a));

        let mut counts = [0u8; 13];
        for r in ranks {
            counts[r.index()] += 1;
        }
        let mut groups: Vec<(Rank, u8)> = Rank::ALL
            .iter()
            .filter(|r| counts[r.index()] > 0)
            .map(|r| (*r, counts[r.index()]))
            .collect();
        groups.sort_by(|a, b| b.1.cmp(&a.1).then(b.0.cmp(&a.0)));

        let is_flush = cards.iter().all(|c| c.suit() == cards[0].suit());
        let straight_top = if groups.len() < 5 {
            None
        } else if ranks[0].value() - ranks[4].value() == 4 {
            Some(ranks[0])
        } else if ranks == [Rank::Ace, Rank::Five, Rank::Four, Rank::Three, Rank::Two] {
            // The wheel plays five-high
            Some(Rank::Five)
        } else {
            None
        };

        Self { ranks, groups, is_flush, straight_top }
    }

    fn with_count(&self, n: u8) -> impl Iterator<Item = Rank> + '_ {
        self.groups.iter().filter(move |(_, c)| *c == n).map(|(r, _)| *r)
    }

    /// Ranks in group order (count desc, rank desc), padded with Two.
    fn grouped_ranks(&self) -> [Rank; 5] {
        let mut out = [Rank::Two; 5];
        for (slot, (r, _)) in out.iter_mut().zip(self.groups.iter()) {
            *slot = *r;
        }
        out
    }

    fn straight_tiebreak(&self) -> [Rank; 5] {
        [self.straight_top.unwrap_or(Rank::Two), Rank::Two, Rank::Two, Rank::Two, Rank::Two]
    }
}

trait CategoryDetector: Sync {
    fn category(&self) -> Category;
    fn detect(&self, analysis: &HandAnalysis) -> bool;
    fn tiebreak(&self, analysis: &HandAnalysis) -> [Rank; 5] {
        analysis.grouped_ranks()
    }
}

struct StraightFlushDetector;

impl CategoryDetector for StraightFlushDetector {
    fn category(&self) -> Category {
        Category::StraightFlush
    }
    fn detect(&self, a: &HandAnalysis) -> bool {
        a.is_flush && a.straight_top.is_some()
    }
    fn tiebreak(&self, a: &HandAnalysis) -> [Rank; 5] {
        a.straight_tiebreak()
    }
}

struct FourOfAKindDetector;

impl CategoryDetector for FourOfAKindDetector {
    fn category(&self) -> Category {
        Category::FourOfAKind
    }
    fn detect(&self, a: &HandAnalysis) -> bool {
        a.with_count(4).next().is_some()
    }
}

struct FullHouseDetector;

impl CategoryDetector for FullHouseDetector {
    fn category(&self) -> Category {
        Category::FullHouse
    }
    fn detect(&self, a: &HandAnalysis) -> bool {
        a.with_count(3).next().is_some() && a.with_count(2).next().is_some()
    }
}

struct FlushDetector;

impl CategoryDetector for FlushDetector {
    fn category(&self) -> Category {
        Category::Flush
    }
    fn detect(&self, a: &HandAnalysis) -> bool {
        a.is_flush
    }
    fn tiebreak(&self, a: &HandAnalysis) -> [Rank; 5] {
        a.ranks
    }
}

struct StraightDetector;

impl CategoryDetector for StraightDetector {
    fn category(&self) -> Category {
        Category::Straight
    }
    fn detect(&self, a: &HandAnalysis) -> bool {
        a.straight_top.is_some()
    }
    fn tiebreak(&self, a: &HandAnalysis) -> [Rank; 5] {
        a.straight_tiebreak()
    }
}

struct ThreeOfAKindDetector;

impl CategoryDetector for ThreeOfAKindDetector {
    fn category(&self) -> Category {
        Category::ThreeOfAKind
    }
    fn detect(&self, a: &HandAnalysis) -> bool {
        a.with_count(3).next().is_some()
    }
}

struct TwoPairDetector;

impl CategoryDetector for TwoPairDetector {
    fn category(&self) -> Category {
        Category::TwoPair
    }
    fn detect(&self, a: &HandAnalysis) -> bool {
        a.with_count(2).count() == 2
    }
}

struct OnePairDetector;

impl CategoryDetector for OnePairDetector {
    fn category(&self) -> Category {
        Category::Pair
    }
    fn detect(&self, a: &HandAnalysis) -> bool {
        a.with_count(2).count() == 1
    }
}

struct HighCardDetector;

impl CategoryDetector for HighCardDetector {
    fn category(&self) -> Category {
        Category::HighCard
    }
    fn detect(&self, _a: &HandAnalysis) -> bool {
        true
    }
    fn tiebreak(&self, a: &HandAnalysis) -> [Rank; 5] {
        a.ranks
    }
}

/// Highest category first; HighCard always matches.
const DETECTORS: [&dyn CategoryDetector; 9] = [
    &StraightFlushDetector,
    &FourOfAKindDetector,
    &FullHouseDetector,
    &FlushDetector,
    &StraightDetector,
    &ThreeOfAKindDetector,
    &TwoPairDetector,
    &OnePairDetector,
    &HighCardDetector,
];

/// Classify five cards into a category and a comparable strength.
pub(crate) fn classify(cards: &[Card; 5]) -> (Category, Strength) {
    let analysis = HandAnalysis::new(cards);
    for detector in DETECTORS.iter() {
        if detector.detect(&analysis) {
            let category = detector.category();
            return (category, Strength::from_parts(category, &detector.tiebreak(&analysis)));
        }
    }
    let category = HighCardDetector.category();
    (category, Strength::from_parts(category, &analysis.ranks))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::parse_cards;

    fn five(s: &str) -> [Card; 5] {
        let v = parse_cards(s).unwrap();
        [v[0], v[1], v[2], v[3], v[4]]
    }

    #[test]
    fn detects_each_category() {
        let cases = [
            ("9h 8h 7h 6h 5h", Category::StraightFlush),
            ("As Ah Ad Ac Ks", Category::FourOfAKind),
            ("Ks Kh Kd Qc Qs", Category::FullHouse),
            ("Ad Jd 9d 5d 2d", Category::Flush),
            ("9s 8h 7d 6c 5s", Category::Straight),
            ("Ts Th Td 5c 3s", Category::ThreeOfAKind),
            ("As Ah Kd Kc Qs", Category::TwoPair),
            ("Js Jh 9d 7c 3s", Category::Pair),
            ("As Kh Jd 9c 7s", Category::HighCard),
        ];
        for (hand, expected) in cases {
            assert_eq!(classify(&five(hand)).0, expected, "{hand}");
        }
    }

    #[test]
    fn wheel_plays_five_high() {
        let (cat, wheel) = classify(&five("As 2h 3d 4c 5s"));
        assert_eq!(cat, Category::Straight);
        let (_, six_high) = classify(&five("2s 3h 4d 5c 6s"));
        assert!(six_high > wheel);
    }

    #[test]
    fn groups_put_pairs_before_kickers() {
        let a = HandAnalysis::new(&five("3s Ah 3d Kc Qs"));
        assert_eq!(a.grouped_ranks(), [Rank::Three, Rank::Ace, Rank::King, Rank::Queen, Rank::Two]);
        let (_, low_pair) = classify(&five("3s Ah 3d Kc Qs"));
        let (_, high_pair) = classify(&five("4s 2h 4d 5c 7s"));
        assert!(high_pair > low_pair, "pair rank outranks kickers");
    }
}
