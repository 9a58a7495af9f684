//! Monte Carlo equity against one uniformly random opponent hand.
//!
//! Each trial deals two opponent hole cards plus the missing board cards from
//! the cards not yet known, then compares both seven-card hands. Trials run
//! in fixed-size chunks across the rayon pool; every chunk owns a ChaCha8
//! stream derived from the base seed and the chunk index, so a seeded
//! estimate does not depend on scheduling.

use crate::cards::Card;
use crate::deck::{Deck, DeckError};
use crate::evaluator::evaluate_seven;
use crate::hand::{validate_holdem, Board, HandError, HoleCards};
use core::ops::{Add, AddAssign};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

const DEFAULT_CHUNK: usize = 1024;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EquityError {
    #[error("iterations must be positive")]
    NoIterations,
    #[error(transparent)]
    Hand(#[from] HandError),
    #[error(transparent)]
    Deck(#[from] DeckError),
}

/// Win/tie/loss tallies. Merging is plain addition, so chunks can be summed
/// in any order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EquityCounts {
    pub win: u64,
    pub tie: u64,
    pub lose: u64,
}

impl EquityCounts {
    pub fn total(&self) -> u64 {
        self.win + self.tie + self.lose
    }

    /// `(win + tie / 2) / total`, 0 when empty.
    pub fn equity(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        (self.win as f64 + 0.5 * self.tie as f64) / total as f64
    }
}

impl Add for EquityCounts {
    type Output = EquityCounts;
    fn add(self, rhs: Self) -> Self {
        Self { win: self.win + rhs.win, tie: self.tie + rhs.tie, lose: self.lose + rhs.lose }
    }
}

impl AddAssign for EquityCounts {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

#[derive(Debug, Clone)]
pub struct EquitySampler {
    seed: Option<u64>,
    chunk: usize,
}

impl Default for EquitySampler {
    fn default() -> Self {
        Self::new()
    }
}

impl EquitySampler {
    /// Unseeded: every estimate draws a fresh base seed.
    pub fn new() -> Self {
        Self { seed: None, chunk: DEFAULT_CHUNK }
    }

    pub fn seeded(seed: u64) -> Self {
        Self { seed: Some(seed), chunk: DEFAULT_CHUNK }
    }

    /// Trials per parallel work unit (at least 1).
    pub fn with_chunk_size(mut self, chunk: usize) -> Self {
        self.chunk = chunk.max(1);
        self
    }

    /// Estimated share of the pot `hero` wins against a random hand.
    ///
    /// ```
    /// use holdem_agent::equity::EquitySampler;
    /// use holdem_agent::hand::Board;
    ///
    /// let sampler = EquitySampler::seeded(1);
    /// let aces = "As Ah".parse().unwrap();
    /// let eq = sampler.estimate_equity(&aces, &Board::new(), 2_000).unwrap();
    /// assert!(eq > 0.75);
    /// ```
    pub fn estimate_equity(
        &self,
        hero: &HoleCards,
        board: &Board,
        iterations: usize,
    ) -> Result<f64, EquityError> {
        Ok(self.sample(hero, board, iterations)?.equity())
    }

    /// Raw tallies behind [`EquitySampler::estimate_equity`].
    pub fn sample(
        &self,
        hero: &HoleCards,
        board: &Board,
        iterations: usize,
    ) -> Result<EquityCounts, EquityError> {
        if iterations == 0 {
            return Err(EquityError::NoIterations);
        }
        validate_holdem(hero, board)?;

        let mut known = board.card_set();
        for c in hero.as_array() {
            known.insert(c);
        }
        let deck = Deck::without(known);
        let missing = board.missing();
        if deck.len() < 2 + missing {
            return Err(DeckError::NotEnoughCards { requested: 2 + missing, available: deck.len() }.into());
        }

        let base = self.seed.unwrap_or_else(|| rand::rng().random());
        let chunks = iterations.div_ceil(self.chunk);
        let trial = Trial { hero: hero.as_array(), board: board.as_slice(), missing };

        let counts = (0..chunks)
            .into_par_iter()
            .map(|i| {
                let len = self.chunk.min(iterations - i * self.chunk);
                let mut rng = ChaCha8Rng::seed_from_u64(base);
                rng.set_stream(i as u64);
                trial.run(deck.clone(), len, &mut rng)
            })
            .try_reduce(EquityCounts::default, |a, b| Ok(a + b))?;
        log::trace!(
            "equity {:.4} over {} trials ({} chunks): {:?}",
            counts.equity(),
            counts.total(),
            chunks,
            counts
        );
        Ok(counts)
    }
}

struct Trial<'a> {
    hero: [Card; 2],
    board: &'a [Card],
    missing: usize,
}

impl Trial<'_> {
    fn run(&self, mut deck: Deck, trials: usize, rng: &mut ChaCha8Rng) -> Result<EquityCounts, DeckError> {
        let mut counts = EquityCounts::default();
        let mut hero = [self.hero[0]; 7];
        let mut villain = [self.hero[0]; 7];
        hero[..2].copy_from_slice(&self.hero);
        let known = self.board.len();
        hero[2..2 + known].copy_from_slice(self.board);
        villain[2..2 + known].copy_from_slice(self.board);

        for _ in 0..trials {
            let drawn = deck.shuffle_prefix(2 + self.missing, rng)?;
            villain[..2].copy_from_slice(&drawn[..2]);
            hero[2 + known..].copy_from_slice(&drawn[2..]);
            villain[2 + known..].copy_from_slice(&drawn[2..]);

            let ours = evaluate_seven(&hero);
            let theirs = evaluate_seven(&villain);
            if ours.beats(theirs) {
                counts.win += 1;
            } else if theirs.beats(ours) {
                counts.lose += 1;
            } else {
                counts.tie += 1;
            }
        }
        Ok(counts)
    }
}
