//! Agents: pluggable seat controllers.
//!
//! A `PlayerAgent` turns the engine's state into a [`Decision`] for its seat;
//! `AgentTable` maps seats to agents and applies the decision of whoever is
//! to act. Decisions come either from the equity policy ([`EquityAgent`]) or
//! from outside the library ([`ScriptedAgent`], fed by a UI or a test).

use crate::config::PolicyConfig;
use crate::engine::{ActionKind, ActionOutcome, BettingEngine, BettingError};
use crate::policy::{Decision, DecisionPolicy, PolicyError};
use core::fmt;
use std::collections::VecDeque;

/// Kinds of agents attached to seats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum AgentKind {
    Human,
    Bot,
}

/// Seat-level action intents, typically produced by a UI for a human player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Action {
    Fold,
    Check,
    Call,
    RaiseTo(u64),
}

impl Action {
    pub fn kind(self) -> ActionKind {
        match self {
            Action::Fold => ActionKind::Fold,
            Action::Check => ActionKind::Check,
            Action::Call => ActionKind::Call,
            Action::RaiseTo(_) => ActionKind::Raise,
        }
    }

    pub fn amount(self) -> Option<u64> {
        match self {
            Action::RaiseTo(a) => Some(a),
            _ => None,
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AgentError {
    #[error("no agent at seat {0}")]
    NoAgent(usize),
    #[error("seat {0} has no pending action")]
    NoPendingAction(usize),
    #[error(transparent)]
    Policy(#[from] PolicyError),
    #[error(transparent)]
    Betting(#[from] BettingError),
}

/// A seat controller that decides for a player when it is their turn.
pub trait PlayerAgent: Send {
    fn decide(&mut self, engine: &BettingEngine, seat: usize) -> Result<Decision, AgentError>;
    /// The kind of this agent (human, bot, etc.).
    fn kind(&self) -> AgentKind {
        AgentKind::Human
    }
    /// Optionally receive a seat-intent action; default is to ignore and return false.
    fn receive(&mut self, _action: Action) -> bool {
        false
    }
    /// The agent reads its own hole cards, so they must be dealt face up to it.
    fn needs_hole_cards(&self) -> bool {
        false
    }
}

/// Executes queued intents in order.
#[derive(Debug, Default)]
pub struct ScriptedAgent {
    pending: VecDeque<Action>,
}

impl ScriptedAgent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_actions(actions: impl IntoIterator<Item = Action>) -> Self {
        Self { pending: actions.into_iter().collect() }
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}

impl PlayerAgent for ScriptedAgent {
    fn receive(&mut self, action: Action) -> bool {
        self.pending.push_back(action);
        true
    }

    fn decide(&mut self, _engine: &BettingEngine, seat: usize) -> Result<Decision, AgentError> {
        let action = self.pending.pop_front().ok_or(AgentError::NoPendingAction(seat))?;
        Ok(Decision { action: action.kind(), amount: action.amount(), reason: "scripted".into() })
    }
}

/// Plays by the equity-versus-pot-odds rule.
#[derive(Debug, Clone)]
pub struct EquityAgent {
    policy: DecisionPolicy,
}

impl EquityAgent {
    pub fn new(config: PolicyConfig) -> Self {
        Self { policy: DecisionPolicy::new(config) }
    }
}

impl PlayerAgent for EquityAgent {
    fn kind(&self) -> AgentKind {
        AgentKind::Bot
    }

    fn needs_hole_cards(&self) -> bool {
        true
    }

    fn decide(&mut self, engine: &BettingEngine, seat: usize) -> Result<Decision, AgentError> {
        Ok(self.policy.get_decision(engine, seat)?)
    }
}

/// A decision and what applying it did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub decision: Decision,
    pub outcome: ActionOutcome,
}

/// Manages a set of optional agents, one per seat, and drives the agent at the
/// current seat.
pub struct AgentTable {
    seats: Vec<Option<Box<dyn PlayerAgent>>>,
}

impl fmt::Debug for AgentTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flags: String = self
            .seats
            .iter()
            .map(|a| match a.as_deref().map(|ag| ag.kind()) {
                Some(AgentKind::Bot) => 'B',
                Some(AgentKind::Human) => 'H',
                None => '-',
            })
            .collect();
        write!(f, "AgentTable({flags})")
    }
}

impl AgentTable {
    /// Create a table with `n` seats, all empty.
    pub fn for_seats(n: usize) -> Self {
        let mut seats = Vec::with_capacity(n);
        seats.resize_with(n, || None);
        Self { seats }
    }

    /// Assign an agent to a seat (or remove when `None`).
    pub fn set_agent(&mut self, seat: usize, agent: Option<Box<dyn PlayerAgent>>) {
        if seat >= self.seats.len() {
            self.seats.resize_with(seat + 1, || None);
        }
        self.seats[seat] = agent;
    }

    pub fn agent_kind(&self, seat: usize) -> Option<AgentKind> {
        self.seats.get(seat).and_then(|a| a.as_deref().map(|ag| ag.kind()))
    }

    pub fn has_agent(&self, seat: usize) -> bool {
        self.seats.get(seat).is_some_and(|a| a.is_some())
    }

    pub fn needs_hole_cards(&self, seat: usize) -> bool {
        self.seats.get(seat).and_then(|a| a.as_deref()).is_some_and(|ag| ag.needs_hole_cards())
    }

    /// Send an action intent to a specific seat agent, if any.
    pub fn receive(&mut self, seat: usize, action: Action) -> bool {
        match self.seats.get_mut(seat) {
            Some(Some(agent)) => agent.receive(action),
            _ => false,
        }
    }

    /// Ask the agent at the current seat for a decision and apply it.
    /// `Ok(None)` when nobody is to act.
    pub fn on_turn(&mut self, engine: &mut BettingEngine) -> Result<Option<Turn>, AgentError> {
        let Some(seat) = engine.current() else {
            return Ok(None);
        };
        let agent = match self.seats.get_mut(seat) {
            Some(Some(agent)) => agent,
            _ => return Err(AgentError::NoAgent(seat)),
        };
        let decision = agent.decide(engine, seat)?;
        let outcome = engine.act(seat, decision.action, decision.amount)?;
        log::debug!("seat {seat}: {} {:?} ({})", decision.action, decision.amount, decision.reason);
        Ok(Some(Turn { decision, outcome }))
    }
}
