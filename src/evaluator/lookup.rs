//! Precomputed rank tables for five-card hands.
//!
//! Every five-card hand falls in exactly one of 7462 equivalence classes. A
//! hand is keyed by the OR of its cards' rank bits plus, when ranks repeat,
//! the product of their rank primes:
//! - all five cards share a suit: `flush[rank_bits]`
//! - five distinct ranks, mixed suits: `unique[rank_bits]`
//! - repeated ranks: `paired[prime_product]`

use super::classify::{classify, Strength};
use super::Category;
use crate::cards::{Card, Rank, Suit};
use std::collections::HashMap;
use std::sync::LazyLock;

/// Number of distinct five-card hand classes.
pub const HAND_CLASSES: u16 = 7462;

const RANK_MASKS: usize = 1 << 13;

pub(crate) struct LookupTables {
    flush: Vec<u16>,
    unique: Vec<u16>,
    paired: HashMap<u32, u16>,
    /// Category per rank value; index 0 is unused.
    categories: Vec<Category>,
}

pub(crate) static TABLES: LazyLock<LookupTables> = LazyLock::new(LookupTables::build);

enum Slot {
    Flush(usize),
    Unique(usize),
    Paired(u32),
}

impl LookupTables {
    fn build() -> Self {
        let mut entries: Vec<(Slot, Category, Strength)> = Vec::with_capacity(6175 + 1287);

        for ranks in rank_multisets() {
            let mut counts = [0usize; 13];
            for r in ranks {
                counts[r.index()] += 1;
            }
            let bits = ranks.iter().fold(0usize, |acc, r| acc | (1 << r.index()));

            if counts.iter().all(|&c| c <= 1) {
                let suited = ranks.map(|r| Card::new(r, Suit::Clubs));
                let (cat, strength) = classify(&suited);
                entries.push((Slot::Flush(bits), cat, strength));

                let mut i = 0;
                let offsuit = ranks.map(|r| {
                    i += 1;
                    Card::new(r, Suit::ALL[i % 4])
                });
                let (cat, strength) = classify(&offsuit);
                entries.push((Slot::Unique(bits), cat, strength));
            } else {
                // Repeated ranks take distinct suits, so the hand can never be a flush.
                let mut seen = [0usize; 13];
                let cards = ranks.map(|r| {
                    let suit = Suit::ALL[seen[r.index()]];
                    seen[r.index()] += 1;
                    Card::new(r, suit)
                });
                let product = ranks.iter().map(|r| r.prime()).product();
                let (cat, strength) = classify(&cards);
                entries.push((Slot::Paired(product), cat, strength));
            }
        }

        let mut order: Vec<Strength> = entries.iter().map(|(_, _, s)| *s).collect();
        order.sort_unstable_by(|a, b| b.cmp(a));
        order.dedup();
        debug_assert_eq!(order.len(), HAND_CLASSES as usize);

        let mut tables = Self {
            flush: vec![0; RANK_MASKS],
            unique: vec![0; RANK_MASKS],
            paired: HashMap::with_capacity(4888),
            categories: vec![Category::StraightFlush; order.len() + 1],
        };
        for (slot, cat, strength) in entries {
            let pos = order.binary_search_by(|other| strength.cmp(other)).unwrap_or(order.len() - 1);
            let rank = (pos + 1) as u16;
            tables.categories[rank as usize] = cat;
            match slot {
                Slot::Flush(bits) => tables.flush[bits] = rank,
                Slot::Unique(bits) => tables.unique[bits] = rank,
                Slot::Paired(product) => {
                    tables.paired.insert(product, rank);
                }
            }
        }
        log::debug!("built hand rank tables: {} classes", order.len());
        tables
    }

    /// Rank value of five packed card keys (see [`Card::key`]); 1 is the best hand.
    #[inline]
    pub(crate) fn rank_of_keys(&self, k: [u32; 5]) -> u16 {
        let bits = ((k[0] | k[1] | k[2] | k[3] | k[4]) >> 16) as usize;
        if k[0] & k[1] & k[2] & k[3] & k[4] & 0xF000 != 0 {
            return self.flush[bits];
        }
        let unique = self.unique[bits];
        if unique != 0 {
            return unique;
        }
        let product: u32 = k.iter().map(|key| key & 0xFF).product();
        // Only unreachable multisets (five of a rank) miss; rank them last.
        self.paired.get(&product).copied().unwrap_or(HAND_CLASSES)
    }

    pub(crate) fn category(&self, rank: u16) -> Category {
        self.categories.get(rank as usize).copied().unwrap_or(Category::HighCard)
    }
}

/// All non-decreasing 5-rank sequences with no rank used more than four times.
fn rank_multisets() -> Vec<[Rank; 5]> {
    let mut out = Vec::with_capacity(6175);
    for a in 0..13 {
        for b in a..13 {
            for c in b..13 {
                for d in c..13 {
                    for e in d..13 {
                        if a == e {
                            continue;
                        }
                        out.push([a, b, c, d, e].map(Rank::from_index));
                    }
                }
            }
        }
    }
    out
}
