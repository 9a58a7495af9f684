//! Table events for rendering collaborators.
//!
//! The library never prints. A front end implements [`TableObserver`] and
//! receives every step of a hand as a [`TableEvent`].

use crate::cards::Card;
use crate::engine::Phase;
use crate::evaluator::Evaluation;
use crate::policy::Decision;
use crate::table::{Payout, Pot};

#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum TableEvent {
    HandStarted { button: usize, small_blind: usize, big_blind: usize, pot: u64 },
    HoleCardsDealt { seat: usize },
    PhaseStarted { phase: Phase, board: Vec<Card> },
    Acted { seat: usize, decision: Decision, committed: u64, pot: u64 },
    /// Card input or an agent move was refused and will be asked for again.
    InputRejected { reason: String },
    Showdown { seat: usize, evaluation: Option<Evaluation> },
    PotsSettled { pots: Vec<Pot>, payouts: Vec<Payout> },
    /// The hand failed before settlement; every seat got its chips back.
    HandAbandoned { refunded: u64, reason: String },
}

pub trait TableObserver {
    fn on_event(&mut self, event: &TableEvent);
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl TableObserver for NullObserver {
    fn on_event(&mut self, _event: &TableEvent) {}
}

/// Records events in order.
impl TableObserver for Vec<TableEvent> {
    fn on_event(&mut self, event: &TableEvent) {
        self.push(event.clone());
    }
}

/// Forwards events to the `log` facade at info level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl TableObserver for LogObserver {
    fn on_event(&mut self, event: &TableEvent) {
        match event {
            TableEvent::HandStarted { button, small_blind, big_blind, pot } => {
                log::info!("new hand: button {button}, blinds {small_blind}/{big_blind}, pot {pot}")
            }
            TableEvent::HoleCardsDealt { seat } => log::info!("seat {seat} dealt in"),
            TableEvent::PhaseStarted { phase, board } => {
                let cards: Vec<String> = board.iter().map(Card::to_string).collect();
                log::info!("{phase}: [{}]", cards.join(" "))
            }
            TableEvent::Acted { seat, decision, committed, pot } => log::info!(
                "seat {seat} {} {}: {} (pot {pot})",
                decision.action,
                committed,
                decision.reason
            ),
            TableEvent::InputRejected { reason } => log::warn!("rejected input: {reason}"),
            TableEvent::Showdown { seat, evaluation: Some(ev) } => {
                log::info!("seat {seat} shows {}", ev.rank)
            }
            TableEvent::Showdown { seat, evaluation: None } => log::info!("seat {seat} mucks"),
            TableEvent::HandAbandoned { refunded, reason } => {
                log::warn!("hand abandoned ({reason}), {refunded} chips returned")
            }
            TableEvent::PotsSettled { payouts, .. } => {
                for p in payouts {
                    log::info!("seat {} {} {}", p.seat, if p.split { "splits" } else { "wins" }, p.amount);
                }
            }
        }
    }
}
