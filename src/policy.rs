//! Equity-versus-pot-odds decision rule.
//!
//! 1. Equity above [`PolicyConfig::raise_equity`] with a raise available:
//!    raise to `max(highest + min_raise, highest + floor(pot * (equity - baseline)))`,
//!    capped at all-in.
//! 2. Equity above the pot odds: check when free, otherwise call.
//! 3. Otherwise: check when free, otherwise fold.
//!
//! The rule itself is deterministic; only the equity estimate is sampled.

use crate::config::PolicyConfig;
use crate::engine::{ActionKind, BettingEngine, LegalActions};
use crate::equity::{EquityError, EquitySampler};
use crate::hand::{Board, HoleCards};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PolicyError {
    #[error("seat {0} has no known hole cards")]
    NoHoleCards(usize),
    #[error("seat {0} is not the player to act")]
    NotToAct(usize),
    #[error(transparent)]
    Equity(#[from] EquityError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub action: ActionKind,
    /// Raise-to total for raises, chips committed for calls.
    pub amount: Option<u64>,
    pub reason: String,
}

/// Betting context the rule needs besides equity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spot {
    pub legal: LegalActions,
    pub pot: u64,
    pub highest_bet: u64,
    pub min_raise: u64,
}

impl Spot {
    pub fn from_engine(engine: &BettingEngine) -> Option<Self> {
        Some(Self {
            legal: engine.legal_actions()?,
            pot: engine.table().total_pot(),
            highest_bet: engine.highest_bet(),
            min_raise: engine.min_raise(),
        })
    }

    /// Chips needed to call, 0 when checking is free.
    pub fn call(&self) -> u64 {
        self.legal.call.unwrap_or(0)
    }

    /// `call / (pot + call)`, 0 when there is nothing to call.
    pub fn pot_odds(&self) -> f64 {
        let call = self.call();
        if call == 0 {
            return 0.0;
        }
        call as f64 / (self.pot + call) as f64
    }
}

#[derive(Debug, Clone)]
pub struct DecisionPolicy {
    config: PolicyConfig,
    sampler: EquitySampler,
}

impl DecisionPolicy {
    pub fn new(config: PolicyConfig) -> Self {
        let sampler = match config.seed {
            Some(seed) => EquitySampler::seeded(seed),
            None => EquitySampler::new(),
        };
        Self { config, sampler }
    }

    pub fn config(&self) -> &PolicyConfig {
        &self.config
    }

    /// Decide for `seat`, which must be the player to act.
    pub fn get_decision(&self, engine: &BettingEngine, seat: usize) -> Result<Decision, PolicyError> {
        if engine.current() != Some(seat) {
            return Err(PolicyError::NotToAct(seat));
        }
        let spot = Spot::from_engine(engine).ok_or(PolicyError::NotToAct(seat))?;
        let hole = engine.table().player(seat).and_then(|p| p.hole()).ok_or(PolicyError::NoHoleCards(seat))?;
        self.decide(&hole, engine.table().community(), &spot)
    }

    pub fn decide(&self, hole: &HoleCards, board: &Board, spot: &Spot) -> Result<Decision, PolicyError> {
        let equity = self.sampler.estimate_equity(hole, board, self.config.iterations)?;
        let decision = self.decide_with_equity(equity, spot);
        log::debug!("{hole:?} on {} cards: {} ({})", board.len(), decision.action, decision.reason);
        Ok(decision)
    }

    /// The rule applied to a known equity.
    pub fn decide_with_equity(&self, equity: f64, spot: &Spot) -> Decision {
        let pot_odds = spot.pot_odds();

        if equity > self.config.raise_equity {
            if let Some(bounds) = spot.legal.raise {
                let sized = (spot.pot as f64 * (equity - self.config.value_baseline)).floor().max(0.0) as u64;
                let target = (spot.highest_bet + spot.min_raise)
                    .max(spot.highest_bet + sized)
                    .clamp(bounds.min, bounds.max);
                return Decision {
                    action: ActionKind::Raise,
                    amount: Some(target),
                    reason: format!("High equity ({equity:.2}) -> value raise to {target}"),
                };
            }
        }

        if spot.legal.check {
            let reason = if equity > pot_odds {
                format!("Free card (equity {equity:.2})")
            } else {
                format!("Free card with weak hand (equity {equity:.2})")
            };
            return Decision { action: ActionKind::Check, amount: None, reason };
        }

        if equity > pot_odds {
            return Decision {
                action: ActionKind::Call,
                amount: spot.legal.call,
                reason: format!("Equity {equity:.2} > pot odds {pot_odds:.2} -> +EV call"),
            };
        }

        Decision {
            action: ActionKind::Fold,
            amount: None,
            reason: format!("-EV: equity {equity:.2} <= pot odds {pot_odds:.2}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::RaiseBounds;

    fn spot(check: bool, call: Option<u64>, raise: Option<(u64, u64)>, pot: u64, hb: u64) -> Spot {
        Spot {
            legal: LegalActions { check, call, raise: raise.map(|(min, max)| RaiseBounds { min, max }) },
            pot,
            highest_bet: hb,
            min_raise: 20,
        }
    }

    fn policy() -> DecisionPolicy {
        DecisionPolicy::new(PolicyConfig::default().with_seed(1))
    }

    #[test]
    fn strong_hand_sizes_raise_from_pot() {
        // floor(200 * (0.9 - 0.5)) = 80 over a 20 bet beats the 40 minimum
        let d = policy().decide_with_equity(0.9, &spot(false, Some(10), Some((40, 990)), 200, 20));
        assert_eq!(d.action, ActionKind::Raise);
        assert_eq!(d.amount, Some(100));
        assert!(d.reason.starts_with("High equity"));
    }

    #[test]
    fn raise_never_goes_below_minimum_or_above_all_in() {
        let small_pot = policy().decide_with_equity(0.75, &spot(false, Some(10), Some((40, 990)), 30, 20));
        assert_eq!(small_pot.amount, Some(40));

        let short = policy().decide_with_equity(0.99, &spot(false, Some(10), Some((55, 55)), 5000, 20));
        assert_eq!(short.amount, Some(55));
    }

    #[test]
    fn strong_hand_without_raise_falls_through() {
        let d = policy().decide_with_equity(0.9, &spot(false, Some(50), None, 100, 100));
        assert_eq!(d.action, ActionKind::Call);
        assert_eq!(d.amount, Some(50));
    }

    #[test]
    fn pot_odds_gate_calls() {
        // call 50 into 150: odds 0.25
        let s = spot(false, Some(50), Some((200, 900)), 150, 100);
        assert!((s.pot_odds() - 0.25).abs() < 1e-12);
        assert_eq!(policy().decide_with_equity(0.3, &s).action, ActionKind::Call);
        assert_eq!(policy().decide_with_equity(0.2, &s).action, ActionKind::Fold);
    }

    #[test]
    fn free_cards_are_always_taken() {
        let s = spot(true, None, Some((20, 900)), 60, 0);
        let weak = policy().decide_with_equity(0.1, &s);
        assert_eq!(weak.action, ActionKind::Check);
        assert!(weak.reason.contains("weak"));
        assert_eq!(policy().decide_with_equity(0.5, &s).action, ActionKind::Check);
    }

    #[test]
    fn decision_from_engine_uses_sampled_equity() {
        use crate::table::Table;
        let mut engine = BettingEngine::new(Table::new(2, 1000, 10, 20));
        engine.start_hand().unwrap();
        let seat = engine.current().unwrap();
        assert_eq!(policy().get_decision(&engine, seat), Err(PolicyError::NoHoleCards(seat)));
        assert_eq!(policy().get_decision(&engine, 1 - seat), Err(PolicyError::NotToAct(1 - seat)));

        engine.deal_hole_cards(seat, "As Ad".parse().unwrap()).unwrap();
        let d = policy().get_decision(&engine, seat).unwrap();
        assert_eq!(d.action, ActionKind::Raise);
    }
}
