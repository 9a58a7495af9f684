//! Betting-round state machine.
//!
//! [`BettingEngine`] owns the [`Table`] and enforces who may act, which
//! actions are legal and when a round or hand is finished. It never deals
//! cards itself: community and hole cards arrive from the caller through
//! [`BettingEngine::deal_community`] and [`BettingEngine::deal_hole_cards`].
//!
//! ```
//! use holdem_agent::engine::{ActionKind, BettingEngine};
//! use holdem_agent::table::Table;
//!
//! let mut engine = BettingEngine::new(Table::new(2, 1000, 10, 20));
//! engine.start_hand().unwrap();
//! assert_eq!(engine.table().total_pot(), 30);
//! engine.process_action(ActionKind::Call, None).unwrap();
//! engine.process_action(ActionKind::Check, None).unwrap();
//! assert!(engine.is_round_over());
//! ```

use crate::cards::Card;
use crate::evaluator::HandRank;
use crate::hand::HoleCards;
use crate::table::{Payout, Pot, Table, TableError};
use core::fmt;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Phase {
    PreFlop,
    Flop,
    Turn,
    River,
    Showdown,
}

impl Phase {
    /// The phase that follows, `None` after showdown.
    pub const fn next(self) -> Option<Phase> {
        match self {
            Phase::PreFlop => Some(Phase::Flop),
            Phase::Flop => Some(Phase::Turn),
            Phase::Turn => Some(Phase::River),
            Phase::River => Some(Phase::Showdown),
            Phase::Showdown => None,
        }
    }

    /// Community cards dealt when this phase begins.
    pub const fn cards_dealt(self) -> usize {
        match self {
            Phase::Flop => 3,
            Phase::Turn | Phase::River => 1,
            Phase::PreFlop | Phase::Showdown => 0,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Phase::PreFlop => "Pre-flop",
            Phase::Flop => "Flop",
            Phase::Turn => "Turn",
            Phase::River => "River",
            Phase::Showdown => "Showdown",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Fold,
    Check,
    Call,
    /// Raise to a total for the round; also used to open the betting.
    Raise,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ActionKind::Fold => "fold",
            ActionKind::Check => "check",
            ActionKind::Call => "call",
            ActionKind::Raise => "raise",
        })
    }
}

/// Raise-to totals the current actor may choose from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RaiseBounds {
    pub min: u64,
    pub max: u64,
}

/// Legal actions for the current actor. Fold is always legal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegalActions {
    pub check: bool,
    /// Chips a call would commit, `None` when there is nothing to call.
    pub call: Option<u64>,
    pub raise: Option<RaiseBounds>,
}

impl LegalActions {
    pub fn allows(&self, kind: ActionKind) -> bool {
        match kind {
            ActionKind::Fold => true,
            ActionKind::Check => self.check,
            ActionKind::Call => self.call.is_some(),
            ActionKind::Raise => self.raise.is_some(),
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum BettingError {
    #[error("illegal {action}: {reason}")]
    IllegalAction { action: ActionKind, reason: String },
    #[error("invalid raise amount {amount:?}: {reason}")]
    InvalidRaiseAmount { amount: Option<u64>, reason: String },
    #[error("the hand is complete")]
    HandComplete,
    #[error("need at least two players with chips, found {0}")]
    NotEnoughPlayers(usize),
    #[error("a hand is still in progress with {0} chips in the pot")]
    HandInProgress(u64),
    #[error(transparent)]
    Table(#[from] TableError),
}

fn illegal(action: ActionKind, reason: impl Into<String>) -> BettingError {
    BettingError::IllegalAction { action, reason: reason.into() }
}

fn bad_raise(amount: Option<u64>, reason: impl Into<String>) -> BettingError {
    BettingError::InvalidRaiseAmount { amount, reason: reason.into() }
}

/// What an accepted action did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionOutcome {
    pub seat: usize,
    pub kind: ActionKind,
    /// Chips moved into the pot by this action.
    pub committed: u64,
    /// The seat's bet for the round after the action.
    pub bet_total: u64,
    /// The raise was a full raise and reopened the action.
    pub reopened: bool,
    pub all_in: bool,
}

#[derive(Debug, Clone)]
pub struct BettingEngine {
    table: Table,
    phase: Phase,
    /// Seat index of the player to act; positional only.
    current: Option<usize>,
    highest_bet: u64,
    min_raise: u64,
    acted: BTreeSet<usize>,
    blinds: Option<(usize, usize)>,
}

impl BettingEngine {
    pub fn new(table: Table) -> Self {
        let min_raise = table.big_blind();
        Self {
            table,
            phase: Phase::Showdown,
            current: None,
            highest_bet: 0,
            min_raise,
            acted: BTreeSet::new(),
            blinds: None,
        }
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn into_table(self) -> Table {
        self.table
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn current(&self) -> Option<usize> {
        self.current
    }

    pub fn highest_bet(&self) -> u64 {
        self.highest_bet
    }

    pub fn min_raise(&self) -> u64 {
        self.min_raise
    }

    /// `(small blind seat, big blind seat)` for the running hand.
    pub fn blind_seats(&self) -> Option<(usize, usize)> {
        self.blinds
    }

    pub fn has_acted(&self, seat: usize) -> bool {
        self.acted.contains(&seat)
    }

    /// Chips `seat` needs to match the highest bet, before stack capping.
    pub fn to_call(&self, seat: usize) -> u64 {
        self.table
            .player(seat)
            .map(|p| self.highest_bet.saturating_sub(p.current_bet()))
            .unwrap_or(0)
    }

    /// Start a new hand: move the button, post blinds and pick the first actor.
    ///
    /// With two players the button posts the small blind and acts first
    /// pre-flop; otherwise the blinds are the next two players after the button.
    ///
    /// Fails with [`BettingError::HandInProgress`] while the previous hand's
    /// pot is neither settled nor abandoned.
    pub fn start_hand(&mut self) -> Result<(), BettingError> {
        let pot = self.table.total_pot();
        if pot > 0 {
            return Err(BettingError::HandInProgress(pot));
        }
        self.table.reset_for_hand();
        let active = self.table.active_players();
        if active.len() < 2 {
            self.phase = Phase::Showdown;
            self.current = None;
            return Err(BettingError::NotEnoughPlayers(active.len()));
        }

        let button = self.table.next_seat(self.table.button, |p| p.is_active()).unwrap_or(active[0]);
        self.table.button = button;
        let (sb, bb) = if active.len() == 2 {
            let bb = self.table.next_seat(button, |p| p.is_active()).unwrap_or(button);
            (button, bb)
        } else {
            let sb = self.table.next_seat(button, |p| p.is_active()).unwrap_or(button);
            let bb = self.table.next_seat(sb, |p| p.is_active()).unwrap_or(sb);
            (sb, bb)
        };

        let small = self.table.small_blind();
        let big = self.table.big_blind();
        let sb_paid = self.table.commit(sb, small);
        let bb_paid = self.table.commit(bb, big);

        self.phase = Phase::PreFlop;
        self.blinds = Some((sb, bb));
        self.highest_bet = big;
        self.min_raise = big;
        self.acted.clear();
        self.current = self.next_active(bb);
        log::info!(
            "hand start: button {button}, blinds {sb_paid}/{bb_paid} from seats {sb}/{bb}, first to act {:?}",
            self.current
        );
        Ok(())
    }

    /// Next seat after `seat` that is active and not all-in.
    pub fn next_active(&self, seat: usize) -> Option<usize> {
        self.table.next_seat(seat, |p| p.can_act())
    }

    /// Every active, non-all-in player has acted since the last full raise
    /// and matched the highest bet.
    pub fn is_round_over(&self) -> bool {
        self.table
            .players()
            .iter()
            .enumerate()
            .filter(|(_, p)| p.can_act())
            .all(|(i, p)| self.acted.contains(&i) && p.current_bet() >= self.highest_bet)
    }

    /// At most one player is still contesting the pot.
    pub fn is_hand_over(&self) -> bool {
        self.table.players().iter().filter(|p| p.is_active()).count() <= 1
    }

    /// No further betting can happen this round: either it is over, or at
    /// most one player can still bet and nobody owes that player a decision.
    pub fn is_action_closed(&self) -> bool {
        if self.is_round_over() {
            return true;
        }
        let acting = self.table.acting_players();
        match acting.as_slice() {
            [] => true,
            [only] => {
                let others_all_in = self.table.players().iter().filter(|p| p.is_active()).count() > 1;
                others_all_in && self.to_call(*only) == 0
            }
            _ => false,
        }
    }

    pub fn legal_actions(&self) -> Option<LegalActions> {
        let seat = self.current?;
        let player = self.table.player(seat)?;
        let owed = self.to_call(seat);
        let call = owed.min(player.stack());
        let all_in = player.all_in_total();
        let raise = (player.stack() > owed).then(|| RaiseBounds {
            min: (self.highest_bet + self.min_raise).min(all_in),
            max: all_in,
        });
        Some(LegalActions { check: owed == 0, call: (call > 0).then_some(call), raise })
    }

    /// Apply an action for `seat`, rejecting it if `seat` is not the current actor.
    pub fn act(
        &mut self,
        seat: usize,
        kind: ActionKind,
        amount: Option<u64>,
    ) -> Result<ActionOutcome, BettingError> {
        if self.current != Some(seat) && self.phase != Phase::Showdown {
            return Err(illegal(kind, format!("seat {seat} acted out of turn")));
        }
        self.process_action(kind, amount)
    }

    /// Apply an action for the current actor. `amount` is the raise-to total
    /// and is only read for raises. Rejected actions change nothing.
    pub fn process_action(
        &mut self,
        kind: ActionKind,
        amount: Option<u64>,
    ) -> Result<ActionOutcome, BettingError> {
        if self.phase == Phase::Showdown || self.is_hand_over() {
            return Err(BettingError::HandComplete);
        }
        if self.is_round_over() {
            return Err(illegal(kind, "the betting round is over"));
        }
        let seat = self.current.ok_or_else(|| illegal(kind, "no player can act"))?;
        let legal = self.legal_actions().ok_or_else(|| illegal(kind, "no player can act"))?;

        let mut reopened = false;
        let committed = match kind {
            ActionKind::Fold => {
                self.table.fold(seat);
                0
            }
            ActionKind::Check => {
                if !legal.check {
                    return Err(illegal(kind, format!("facing a bet of {}", self.to_call(seat))));
                }
                0
            }
            ActionKind::Call => {
                let call = legal.call.ok_or_else(|| illegal(kind, "nothing to call"))?;
                self.table.commit(seat, call)
            }
            ActionKind::Raise => {
                let target = self.validate_raise(seat, amount, &legal)?;
                let current_bet = self.table.players()[seat].current_bet();
                let increment = target - self.highest_bet;
                if increment >= self.min_raise {
                    self.min_raise = increment;
                    self.acted.clear();
                    reopened = true;
                }
                self.highest_bet = target;
                self.table.commit(seat, target - current_bet)
            }
        };

        self.acted.insert(seat);
        let player = &self.table.players()[seat];
        let outcome = ActionOutcome {
            seat,
            kind,
            committed,
            bet_total: player.current_bet(),
            reopened,
            all_in: player.is_all_in(),
        };
        if !self.is_round_over() {
            self.current = self.next_active(seat);
        }
        log::debug!(
            "{}: seat {seat} {kind} committed {committed} (bet {}, pot {}){}",
            self.phase,
            outcome.bet_total,
            self.table.total_pot(),
            if reopened { ", action reopened" } else { "" }
        );
        Ok(outcome)
    }

    fn validate_raise(
        &self,
        seat: usize,
        amount: Option<u64>,
        legal: &LegalActions,
    ) -> Result<u64, BettingError> {
        let bounds = legal.raise.ok_or_else(|| {
            illegal(ActionKind::Raise, format!("stack cannot cover more than a call of {}", self.to_call(seat)))
        })?;
        let target = match amount {
            Some(a) if a > 0 => a,
            _ => return Err(bad_raise(amount, "a raise needs a target amount")),
        };
        let current_bet = self.table.players()[seat].current_bet();
        if target <= current_bet {
            return Err(bad_raise(amount, format!("below the seat's committed bet of {current_bet}")));
        }
        if target > bounds.max {
            return Err(bad_raise(amount, format!("exceeds the all-in total of {}", bounds.max)));
        }
        let full = self.highest_bet + self.min_raise;
        if target < full && target != bounds.max {
            return Err(bad_raise(amount, format!("minimum raise is to {full}")));
        }
        Ok(target)
    }

    /// Move to the next phase and reset the round's betting state.
    pub fn advance_phase(&mut self) -> Result<Phase, BettingError> {
        let next = self.phase.next().ok_or(BettingError::HandComplete)?;
        self.phase = next;
        self.table.reset_for_round();
        self.highest_bet = 0;
        self.min_raise = self.table.big_blind();
        self.acted.clear();
        self.current = match next {
            Phase::Showdown => None,
            _ => self.next_active(self.table.button()),
        };
        log::debug!("advanced to {next}, first to act {:?}", self.current);
        Ok(next)
    }

    pub fn deal_hole_cards(&mut self, seat: usize, hole: HoleCards) -> Result<(), BettingError> {
        self.table.set_hole_cards(seat, hole)?;
        Ok(())
    }

    pub fn deal_community(&mut self, cards: &[Card]) -> Result<(), BettingError> {
        self.table.add_community(cards)?;
        Ok(())
    }

    /// Call off an unsettled hand: every seat gets back what it put in this
    /// hand. Returns the chips refunded.
    pub fn abandon_hand(&mut self) -> u64 {
        let refunded = self.table.refund();
        self.phase = Phase::Showdown;
        self.current = None;
        self.acted.clear();
        if refunded > 0 {
            log::warn!("hand abandoned, {refunded} chips returned");
        }
        refunded
    }

    /// Split the pot into main and side pots and pay them out.
    pub fn settle(&mut self, ranks: &[Option<HandRank>]) -> (Vec<Pot>, Vec<Payout>) {
        let pots = self.table.settle_pots();
        let payouts = self.table.award(&pots, ranks);
        self.phase = Phase::Showdown;
        self.current = None;
        (pots, payouts)
    }
}
