//! One hand from blinds to payout.
//!
//! [`HandSession`] drives a [`BettingEngine`] through every phase: it asks a
//! [`CardSource`] for the cards that become known (agent hole cards, each
//! street, showdown hands), lets the [`AgentTable`] act until each round
//! closes and settles the pots. Every step is reported to a
//! [`TableObserver`].
//!
//! Rejected card input (bad text, duplicates, wrong count) and moves the
//! engine refuses are reported and asked for again, up to a fixed number of
//! attempts. A hand that still fails is abandoned and its pot refunded.

use crate::agents::{AgentError, AgentTable, Turn};
use crate::cards::Card;
use crate::deck::{CardSet, DeckError, DeckTracker};
use crate::engine::{BettingEngine, BettingError, Phase};
use crate::evaluator::{evaluate_holdem, EvalError, Evaluation};
use crate::hand::{HandError, HoleCards};
use crate::observer::{TableEvent, TableObserver};
use crate::table::{Payout, Pot};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::VecDeque;

const DEFAULT_ATTEMPTS: usize = 3;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error(transparent)]
    Betting(#[from] BettingError),
    #[error(transparent)]
    Agent(#[from] AgentError),
    #[error(transparent)]
    Deck(#[from] DeckError),
    #[error(transparent)]
    Hand(#[from] HandError),
    #[error(transparent)]
    Eval(#[from] EvalError),
    #[error("expected {expected} cards, got {got}")]
    CardCount { expected: usize, got: usize },
    #[error("card input ran out")]
    InputExhausted,
}

impl SessionError {
    /// Bad input that a fresh attempt could fix.
    fn is_retryable(&self) -> bool {
        matches!(self, SessionError::Deck(_) | SessionError::Hand(_) | SessionError::CardCount { .. })
    }
}

/// Supplies cards as they become known. `live` tracks the cards already
/// accepted this hand.
pub trait CardSource {
    fn hole_cards(&mut self, seat: usize, live: &DeckTracker) -> Result<Vec<Card>, SessionError>;
    fn board_cards(
        &mut self,
        phase: Phase,
        count: usize,
        live: &DeckTracker,
    ) -> Result<Vec<Card>, SessionError>;
    /// Cards `seat` shows down, `None` to muck.
    fn showdown_cards(&mut self, seat: usize, live: &DeckTracker) -> Result<Option<Vec<Card>>, SessionError>;
}

/// Deals uniformly from the cards not yet seen.
#[derive(Debug, Clone)]
pub struct RandomCards {
    rng: ChaCha8Rng,
}

impl RandomCards {
    pub fn seeded(seed: u64) -> Self {
        Self { rng: ChaCha8Rng::seed_from_u64(seed) }
    }

    pub fn from_entropy() -> Self {
        Self::seeded(rand::rng().random())
    }

    fn deal(&mut self, n: usize, live: &DeckTracker) -> Result<Vec<Card>, SessionError> {
        Ok(live.remaining().sample(n, CardSet::empty(), &mut self.rng)?)
    }
}

impl CardSource for RandomCards {
    fn hole_cards(&mut self, _seat: usize, live: &DeckTracker) -> Result<Vec<Card>, SessionError> {
        self.deal(2, live)
    }

    fn board_cards(&mut self, _phase: Phase, count: usize, live: &DeckTracker) -> Result<Vec<Card>, SessionError> {
        self.deal(count, live)
    }

    fn showdown_cards(&mut self, _seat: usize, live: &DeckTracker) -> Result<Option<Vec<Card>>, SessionError> {
        self.deal(2, live).map(Some)
    }
}

/// Reads one card per line of natural text (`"Diamond Nine"`, `"ten of clubs"`).
/// A blank line at showdown mucks.
#[derive(Debug, Clone, Default)]
pub struct TextCards {
    lines: VecDeque<String>,
}

impl TextCards {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { lines: lines.into_iter().map(Into::into).collect() }
    }

    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push_back(line.into());
    }

    pub fn remaining(&self) -> usize {
        self.lines.len()
    }

    fn line(&mut self) -> Result<String, SessionError> {
        self.lines.pop_front().ok_or(SessionError::InputExhausted)
    }

    fn card(&mut self) -> Result<Card, SessionError> {
        let line = self.line()?;
        Ok(Card::parse_text(&line).map_err(DeckError::from)?)
    }

    fn read(&mut self, n: usize) -> Result<Vec<Card>, SessionError> {
        (0..n).map(|_| self.card()).collect()
    }
}

impl CardSource for TextCards {
    fn hole_cards(&mut self, _seat: usize, _live: &DeckTracker) -> Result<Vec<Card>, SessionError> {
        self.read(2)
    }

    fn board_cards(&mut self, _phase: Phase, count: usize, _live: &DeckTracker) -> Result<Vec<Card>, SessionError> {
        self.read(count)
    }

    fn showdown_cards(&mut self, _seat: usize, _live: &DeckTracker) -> Result<Option<Vec<Card>>, SessionError> {
        let first = self.line()?;
        if first.trim().is_empty() {
            return Ok(None);
        }
        let first = Card::parse_text(&first).map_err(DeckError::from)?;
        Ok(Some(vec![first, self.card()?]))
    }
}

/// What happened in a finished hand.
#[derive(Debug, Clone, PartialEq)]
pub struct HandSummary {
    /// Last phase reached; earlier than showdown when everyone else folded.
    pub phase: Phase,
    pub actions: usize,
    pub showdown: Vec<(usize, Option<Evaluation>)>,
    pub pots: Vec<Pot>,
    pub payouts: Vec<Payout>,
}

impl HandSummary {
    pub fn winners(&self) -> Vec<usize> {
        self.payouts.iter().map(|p| p.seat).collect()
    }
}

#[derive(Debug, Clone)]
pub struct HandSession {
    tracker: DeckTracker,
    max_attempts: usize,
}

impl Default for HandSession {
    fn default() -> Self {
        Self::new()
    }
}

impl HandSession {
    pub fn new() -> Self {
        Self { tracker: DeckTracker::new(), max_attempts: DEFAULT_ATTEMPTS }
    }

    /// Attempts per card request or action before bad input becomes an error (at least 1).
    pub fn with_max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// Cards accepted during the last hand.
    pub fn known_cards(&self) -> CardSet {
        self.tracker.drawn()
    }

    pub fn play_hand(
        &mut self,
        engine: &mut BettingEngine,
        agents: &mut AgentTable,
        cards: &mut dyn CardSource,
        observer: &mut dyn TableObserver,
    ) -> Result<HandSummary, SessionError> {
        self.tracker.reset();
        engine.start_hand()?;
        let (small_blind, big_blind) = engine.blind_seats().unwrap_or_default();
        observer.on_event(&TableEvent::HandStarted {
            button: engine.table().button(),
            small_blind,
            big_blind,
            pot: engine.table().total_pot(),
        });

        match self.run_hand(engine, agents, cards, observer) {
            Ok(summary) => Ok(summary),
            Err(err) => {
                let refunded = engine.abandon_hand();
                observer.on_event(&TableEvent::HandAbandoned { refunded, reason: err.to_string() });
                Err(err)
            }
        }
    }

    fn run_hand(
        &mut self,
        engine: &mut BettingEngine,
        agents: &mut AgentTable,
        cards: &mut dyn CardSource,
        observer: &mut dyn TableObserver,
    ) -> Result<HandSummary, SessionError> {
        for seat in engine.table().active_players() {
            if !agents.needs_hole_cards(seat) {
                continue;
            }
            let dealt = self
                .ask(observer, 2, |live| cards.hole_cards(seat, live).map(Some))?
                .ok_or(SessionError::InputExhausted)?;
            engine.deal_hole_cards(seat, HoleCards::from_slice(&dealt)?)?;
            observer.on_event(&TableEvent::HoleCardsDealt { seat });
        }

        let mut actions = 0;
        loop {
            let phase = engine.phase();
            let count = phase.cards_dealt();
            if count > 0 {
                let dealt = self
                    .ask(observer, count, |live| cards.board_cards(phase, count, live).map(Some))?
                    .ok_or(SessionError::InputExhausted)?;
                engine.deal_community(&dealt)?;
            }
            observer.on_event(&TableEvent::PhaseStarted {
                phase,
                board: engine.table().community().as_slice().to_vec(),
            });

            while !engine.is_hand_over() && !engine.is_action_closed() {
                let Some(turn) = self.next_turn(engine, agents, observer)? else {
                    break;
                };
                actions += 1;
                observer.on_event(&TableEvent::Acted {
                    seat: turn.outcome.seat,
                    decision: turn.decision,
                    committed: turn.outcome.committed,
                    pot: engine.table().total_pot(),
                });
            }

            if engine.is_hand_over() || engine.advance_phase()? == Phase::Showdown {
                break;
            }
        }

        let final_phase = engine.phase();
        let n = engine.table().len();
        let mut ranks = vec![None; n];
        let mut showdown = Vec::new();
        if !engine.is_hand_over() {
            for seat in engine.table().active_players() {
                let hole = match engine.table().player(seat).and_then(|p| p.hole()) {
                    Some(h) => Some(h),
                    None => self
                        .ask(observer, 2, |live| cards.showdown_cards(seat, live))?
                        .map(|shown| HoleCards::from_slice(&shown))
                        .transpose()?,
                };
                let evaluation = match hole {
                    Some(h) => Some(evaluate_holdem(&h, engine.table().community())?),
                    None => None,
                };
                ranks[seat] = evaluation.map(|e| e.rank);
                observer.on_event(&TableEvent::Showdown { seat, evaluation });
                showdown.push((seat, evaluation));
            }
        }

        let (pots, payouts) = engine.settle(&ranks);
        observer.on_event(&TableEvent::PotsSettled { pots: pots.clone(), payouts: payouts.clone() });
        Ok(HandSummary { phase: final_phase, actions, showdown, pots, payouts })
    }

    /// Let the current seat act; a move the engine refuses is reported and
    /// the seat asked again, up to the attempt limit.
    fn next_turn(
        &self,
        engine: &mut BettingEngine,
        agents: &mut AgentTable,
        observer: &mut dyn TableObserver,
    ) -> Result<Option<Turn>, SessionError> {
        let mut attempt = 1;
        loop {
            match agents.on_turn(engine) {
                Err(AgentError::Betting(err)) if attempt < self.max_attempts => {
                    observer.on_event(&TableEvent::InputRejected { reason: err.to_string() });
                    attempt += 1;
                }
                other => return Ok(other?),
            }
        }
    }

    /// Fetch cards until they pass validation or attempts run out. `None`
    /// (a muck) is accepted as is.
    fn ask<F>(
        &mut self,
        observer: &mut dyn TableObserver,
        expected: usize,
        mut fetch: F,
    ) -> Result<Option<Vec<Card>>, SessionError>
    where
        F: FnMut(&DeckTracker) -> Result<Option<Vec<Card>>, SessionError>,
    {
        let mut attempt = 1;
        loop {
            let result = match fetch(&self.tracker) {
                Ok(Some(cards)) => self.accept(&cards, expected).map(|()| Some(cards)),
                other => other,
            };
            match result {
                Err(err) if err.is_retryable() && attempt < self.max_attempts => {
                    observer.on_event(&TableEvent::InputRejected { reason: err.to_string() });
                    attempt += 1;
                }
                other => return other,
            }
        }
    }

    fn accept(&mut self, cards: &[Card], expected: usize) -> Result<(), SessionError> {
        if cards.len() != expected {
            return Err(SessionError::CardCount { expected, got: cards.len() });
        }
        let mut staged = self.tracker.clone();
        for &card in cards {
            staged.draw_card(card)?;
        }
        self.tracker = staged;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::{Action, ScriptedAgent};
    use crate::observer::NullObserver;
    use crate::table::Table;

    fn all_in_heads_up() -> BettingEngine {
        BettingEngine::new(Table::new(2, 100, 100, 200))
    }

    #[test]
    fn bad_card_text_and_duplicates_are_asked_again() {
        let mut engine = all_in_heads_up();
        let mut agents = AgentTable::for_seats(2);
        let mut cards = TextCards::new([
            "joker",
            "Two of Clubs",
            "Seven Diamonds",
            "Nine Hearts",
            "Jack Spades",
            "spade jack",
            "King Clubs",
            "Ace Hearts",
            "Ace Diamonds",
            "Queen Hearts",
            "Three Diamonds",
        ]);
        let mut events = Vec::new();
        let summary = HandSession::new().play_hand(&mut engine, &mut agents, &mut cards, &mut events).unwrap();

        let rejected = events.iter().filter(|e| matches!(e, TableEvent::InputRejected { .. })).count();
        assert_eq!(rejected, 2);
        assert_eq!(cards.remaining(), 0);
        assert_eq!(summary.phase, Phase::Showdown);
        assert_eq!(summary.actions, 0);
        assert_eq!(summary.winners(), vec![0]);
        assert_eq!(engine.table().player(0).map(|p| p.stack()), Some(200));
        assert_eq!(engine.table().player(1).map(|p| p.stack()), Some(0));
    }

    #[test]
    fn attempts_run_out() {
        let mut engine = all_in_heads_up();
        let mut agents = AgentTable::for_seats(2);
        let mut cards = TextCards::new(["joker"]);
        let err = HandSession::new()
            .with_max_attempts(1)
            .play_hand(&mut engine, &mut agents, &mut cards, &mut NullObserver)
            .unwrap_err();
        assert!(matches!(err, SessionError::Deck(DeckError::InvalidCardText(_))));
    }

    #[test]
    fn empty_input_is_fatal() {
        let mut engine = all_in_heads_up();
        let mut agents = AgentTable::for_seats(2);
        let err = HandSession::new()
            .play_hand(&mut engine, &mut agents, &mut TextCards::default(), &mut NullObserver)
            .unwrap_err();
        assert_eq!(err, SessionError::InputExhausted);
    }

    #[test]
    fn random_cards_never_repeat_within_a_hand() {
        let mut engine = BettingEngine::new(Table::new(3, 50, 100, 200));
        let mut agents = AgentTable::for_seats(3);
        // both blinds are all-in; the button calls all-in for less
        agents.set_agent(1, Some(Box::new(ScriptedAgent::with_actions([Action::Call]))));
        let mut session = HandSession::new();
        let summary = session
            .play_hand(&mut engine, &mut agents, &mut RandomCards::seeded(5), &mut NullObserver)
            .unwrap();
        // 5 board cards and 2 per seat at showdown
        assert_eq!(session.known_cards().len(), 11);
        assert_eq!(summary.showdown.len(), 3);
        assert_eq!(engine.table().players().iter().map(|p| p.stack()).sum::<u64>(), 150);
    }
}
