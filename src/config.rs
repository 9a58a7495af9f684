//! Table and policy settings.
//!
//! Values start from [`Default`] and may be overlaid from the environment:
//!
//! | variable            | field                          |
//! |---------------------|--------------------------------|
//! | `HOLDEM_PLAYERS`    | [`TableConfig::players`]       |
//! | `HOLDEM_BIG_BLIND`  | [`TableConfig::big_blind`]     |
//! | `HOLDEM_STACK`      | [`TableConfig::starting_stack`]|
//! | `HOLDEM_ITERATIONS` | [`PolicyConfig::iterations`]   |
//! | `HOLDEM_SEED`       | [`PolicyConfig::seed`]         |
//!
//! Setting the big blind from the environment also sets the small blind to
//! half of it.

use std::str::FromStr;

pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 10;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("player count must be between {MIN_PLAYERS} and {MAX_PLAYERS}, got {0}")]
    PlayerCount(usize),
    #[error("invalid blinds: small {small}, big {big}")]
    Blinds { small: u64, big: u64 },
    #[error("starting stack must be positive")]
    EmptyStack,
    #[error("iterations must be positive")]
    NoIterations,
    #[error("invalid value for {var}: '{value}'")]
    Env { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableConfig {
    pub players: usize,
    pub small_blind: u64,
    pub big_blind: u64,
    pub starting_stack: u64,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self { players: 2, small_blind: 10, big_blind: 20, starting_stack: 1000 }
    }
}

impl TableConfig {
    /// Blinds derived from the big blind: small blind is half, rounded down.
    pub fn with_big_blind(mut self, big_blind: u64) -> Self {
        self.big_blind = big_blind;
        self.small_blind = big_blind / 2;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&self.players) {
            return Err(ConfigError::PlayerCount(self.players));
        }
        if self.big_blind == 0 || self.small_blind > self.big_blind {
            return Err(ConfigError::Blinds { small: self.small_blind, big: self.big_blind });
        }
        if self.starting_stack == 0 {
            return Err(ConfigError::EmptyStack);
        }
        Ok(())
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().overlay(|var| std::env::var(var).ok())
    }

    /// Overlay values from `lookup` (an environment accessor) and validate.
    pub fn overlay<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        if let Some(players) = parse_var(&lookup, "HOLDEM_PLAYERS")? {
            self.players = players;
        }
        if let Some(big) = parse_var(&lookup, "HOLDEM_BIG_BLIND")? {
            self = self.with_big_blind(big);
        }
        if let Some(stack) = parse_var(&lookup, "HOLDEM_STACK")? {
            self.starting_stack = stack;
        }
        self.validate()?;
        Ok(self)
    }
}

/// Knobs for the equity-driven decision rule.
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyConfig {
    /// Monte Carlo trials per decision.
    pub iterations: usize,
    /// Equity above which the policy raises for value.
    pub raise_equity: f64,
    /// Equity subtracted before sizing a value raise as a fraction of the pot.
    pub value_baseline: f64,
    /// Fixed sampler seed; `None` draws fresh entropy per decision.
    pub seed: Option<u64>,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self { iterations: 500, raise_equity: 0.70, value_baseline: 0.5, seed: None }
    }
}

impl PolicyConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.iterations == 0 {
            return Err(ConfigError::NoIterations);
        }
        Ok(())
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().overlay(|var| std::env::var(var).ok())
    }

    pub fn overlay<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        if let Some(iterations) = parse_var(&lookup, "HOLDEM_ITERATIONS")? {
            self.iterations = iterations;
        }
        if let Some(seed) = parse_var(&lookup, "HOLDEM_SEED")? {
            self.seed = Some(seed);
        }
        self.validate()?;
        Ok(self)
    }
}

fn parse_var<T, F>(lookup: &F, var: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: Fn(&'static str) -> Option<String>,
{
    match lookup(var) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Env { var, value: raw }),
        _ => Ok(None),
    }
}
