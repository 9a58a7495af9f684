//! Chip accounting: players, blinds, community cards and the pot.
//!
//! All betting flows into one [`Pot`] while the hand is live, so the sum of
//! every player's `total_invested` always equals the pot. Side pots are only
//! carved out at settlement by [`Table::settle_pots`].

use crate::cards::Card;
use crate::config::TableConfig;
use crate::evaluator::HandRank;
use crate::hand::{Board, HandError, HoleCards};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TableError {
    #[error("no seat {0}")]
    UnknownSeat(usize),
    #[error("card already in play: {0}")]
    CardInUse(Card),
    #[error(transparent)]
    Hand(#[from] HandError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct Player {
    pub(crate) name: String,
    pub(crate) stack: u64,
    pub(crate) hole: Option<HoleCards>,
    pub(crate) is_active: bool,
    pub(crate) is_all_in: bool,
    pub(crate) current_bet: u64,
    pub(crate) total_invested: u64,
}

impl Player {
    pub fn new(name: impl Into<String>, stack: u64) -> Self {
        Self {
            name: name.into(),
            stack,
            hole: None,
            is_active: stack > 0,
            is_all_in: false,
            current_bet: 0,
            total_invested: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Chips behind.
    pub fn stack(&self) -> u64 {
        self.stack
    }

    pub fn hole(&self) -> Option<HoleCards> {
        self.hole
    }

    /// Still contesting the pot.
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn is_all_in(&self) -> bool {
        self.is_all_in
    }

    /// Active and able to put in more chips.
    pub fn can_act(&self) -> bool {
        self.is_active && !self.is_all_in
    }

    /// Chips committed this betting round.
    pub fn current_bet(&self) -> u64 {
        self.current_bet
    }

    /// Chips committed this hand.
    pub fn total_invested(&self) -> u64 {
        self.total_invested
    }

    /// Stack plus this round's bet: the largest raise-to total available.
    pub fn all_in_total(&self) -> u64 {
        self.stack + self.current_bet
    }

    /// Move up to `amount` chips from the stack into the bet. Returns the
    /// chips actually moved; committing the whole stack marks the player all-in.
    fn commit(&mut self, amount: u64) -> u64 {
        let paid = amount.min(self.stack);
        self.stack -= paid;
        self.current_bet += paid;
        self.total_invested += paid;
        if self.stack == 0 && paid > 0 {
            self.is_all_in = true;
        }
        paid
    }
}

/// Chips plus the seats that can win them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pot {
    pub amount: u64,
    pub eligible: Vec<usize>,
}

/// Chips credited to one seat at settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Payout {
    pub seat: usize,
    pub amount: u64,
    /// The seat shared at least one pot with another winner.
    pub split: bool,
}

#[derive(Debug, Clone)]
pub struct Table {
    pub(crate) players: Vec<Player>,
    pub(crate) button: usize,
    pub(crate) small_blind: u64,
    pub(crate) big_blind: u64,
    pub(crate) community: Board,
    pub(crate) pot: Pot,
}

impl Table {
    /// Players are named `P1..Pn`. The button starts on seat 0 and moves
    /// before the first hand is dealt.
    pub fn new(num_players: usize, starting_stack: u64, small_blind: u64, big_blind: u64) -> Self {
        let players = (1..=num_players).map(|i| Player::new(format!("P{i}"), starting_stack)).collect();
        Self::with_players(players, small_blind, big_blind)
    }

    pub fn with_players(players: Vec<Player>, small_blind: u64, big_blind: u64) -> Self {
        Self { players, button: 0, small_blind, big_blind, community: Board::new(), pot: Pot::default() }
    }

    pub fn from_config(config: &TableConfig) -> Self {
        Self::new(config.players, config.starting_stack, config.small_blind, config.big_blind)
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, seat: usize) -> Option<&Player> {
        self.players.get(seat)
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn button(&self) -> usize {
        self.button
    }

    pub fn small_blind(&self) -> u64 {
        self.small_blind
    }

    pub fn big_blind(&self) -> u64 {
        self.big_blind
    }

    pub fn community(&self) -> &Board {
        &self.community
    }

    pub fn pot(&self) -> &Pot {
        &self.pot
    }

    pub fn total_pot(&self) -> u64 {
        self.pot.amount
    }

    /// Seats still contesting the pot, in seat order.
    pub fn active_players(&self) -> Vec<usize> {
        self.seats_where(Player::is_active)
    }

    /// Seats that may still bet this hand.
    pub fn acting_players(&self) -> Vec<usize> {
        self.seats_where(Player::can_act)
    }

    fn seats_where(&self, pred: impl Fn(&Player) -> bool) -> Vec<usize> {
        self.players.iter().enumerate().filter(|(_, p)| pred(p)).map(|(i, _)| i).collect()
    }

    /// First seat after `from` (wrapping, `from` itself checked last) matching `pred`.
    pub(crate) fn next_seat(&self, from: usize, pred: impl Fn(&Player) -> bool) -> Option<usize> {
        let n = self.players.len();
        (1..=n).map(|step| (from + step) % n).find(|&i| pred(&self.players[i]))
    }

    /// Clear per-hand state. Players without chips sit the hand out.
    pub fn reset_for_hand(&mut self) {
        self.community.clear();
        self.pot = Pot::default();
        for p in &mut self.players {
            p.hole = None;
            p.current_bet = 0;
            p.total_invested = 0;
            p.is_all_in = false;
            p.is_active = p.stack > 0;
        }
    }

    /// Clear per-round bets; chips already committed stay in the pot.
    pub fn reset_for_round(&mut self) {
        for p in &mut self.players {
            p.current_bet = 0;
        }
    }

    /// Return every seat's investment this hand and empty the pot.
    pub(crate) fn refund(&mut self) -> u64 {
        let mut total = 0;
        for p in &mut self.players {
            p.stack += p.total_invested;
            total += p.total_invested;
            p.total_invested = 0;
            p.current_bet = 0;
            p.is_all_in = false;
        }
        self.pot = Pot::default();
        total
    }

    /// Move chips from a seat's stack into the pot, capped at the stack.
    pub(crate) fn commit(&mut self, seat: usize, amount: u64) -> u64 {
        let paid = self.players[seat].commit(amount);
        self.pot.amount += paid;
        if !self.pot.eligible.contains(&seat) {
            self.pot.eligible.push(seat);
            self.pot.eligible.sort_unstable();
        }
        paid
    }

    pub(crate) fn fold(&mut self, seat: usize) {
        self.players[seat].is_active = false;
        self.pot.eligible.retain(|&s| s != seat);
    }

    pub fn set_hole_cards(&mut self, seat: usize, hole: HoleCards) -> Result<(), TableError> {
        if seat >= self.players.len() {
            return Err(TableError::UnknownSeat(seat));
        }
        for card in hole.as_array() {
            if self.community.as_slice().contains(&card) || self.holder_of(card, Some(seat)).is_some() {
                return Err(TableError::CardInUse(card));
            }
        }
        self.players[seat].hole = Some(hole);
        Ok(())
    }

    /// Append community cards (all or none). The board holds at most five
    /// cards and never repeats a card held by a player.
    pub fn add_community(&mut self, cards: &[Card]) -> Result<(), TableError> {
        if let Some(card) = cards.iter().copied().find(|&c| self.holder_of(c, None).is_some()) {
            return Err(TableError::CardInUse(card));
        }
        self.community.try_extend(cards.iter().copied())?;
        Ok(())
    }

    fn holder_of(&self, card: Card, skip: Option<usize>) -> Option<usize> {
        self.players
            .iter()
            .enumerate()
            .filter(|(i, _)| Some(*i) != skip)
            .find(|(_, p)| p.hole.is_some_and(|h| h.contains(card)))
            .map(|(i, _)| i)
    }

    /// Split the pot into a main pot and side pots by contribution level.
    ///
    /// Folded players' chips stay in the pots they reached but they are never
    /// eligible. A level nobody live reached is folded into the pot below it.
    pub fn settle_pots(&self) -> Vec<Pot> {
        let mut levels: Vec<u64> =
            self.players.iter().map(|p| p.total_invested).filter(|&c| c > 0).collect();
        levels.sort_unstable();
        levels.dedup();

        let mut pots: Vec<Pot> = Vec::new();
        let mut prev = 0u64;
        for lvl in levels {
            let contributors: Vec<usize> = self.seats_where(|p| p.total_invested >= lvl);
            let amount = (lvl - prev) * contributors.len() as u64;
            prev = lvl;
            let eligible: Vec<usize> =
                contributors.into_iter().filter(|&i| self.players[i].is_active).collect();
            match pots.last_mut() {
                Some(last) if eligible.is_empty() || last.eligible == eligible => last.amount += amount,
                _ => pots.push(Pot { amount, eligible }),
            }
        }
        pots
    }

    /// Pay out settled pots and empty the table pot.
    ///
    /// `ranks[seat]` is the seat's showdown rank, `None` for seats that did
    /// not show. A pot with one eligible seat goes to it unseen; otherwise the
    /// best shown rank wins and ties split, odd chips going to the seats
    /// closest to the left of the button. Mucked seats forfeit.
    pub fn award(&mut self, pots: &[Pot], ranks: &[Option<HandRank>]) -> Vec<Payout> {
        let n = self.players.len();
        let mut winnings = vec![0u64; n];
        let mut split = vec![false; n];
        let left_of_button = |seat: &usize| (seat + n - self.button - 1) % n;

        for pot in pots {
            let shown: Vec<(usize, HandRank)> = pot
                .eligible
                .iter()
                .filter_map(|&s| ranks.get(s).copied().flatten().map(|r| (s, r)))
                .collect();
            let mut winners: Vec<usize> = match shown.iter().map(|(_, r)| *r).min() {
                _ if pot.eligible.len() == 1 => pot.eligible.clone(),
                Some(best) => shown.iter().filter(|(_, r)| *r == best).map(|(s, _)| *s).collect(),
                None => pot.eligible.clone(),
            };
            if winners.is_empty() {
                continue;
            }
            winners.sort_by_key(left_of_button);
            let share = pot.amount / winners.len() as u64;
            let mut odd = pot.amount % winners.len() as u64;
            for &seat in &winners {
                let extra = u64::from(odd > 0);
                odd -= extra;
                winnings[seat] += share + extra;
                split[seat] |= winners.len() > 1;
            }
        }

        let mut payouts = Vec::new();
        for seat in 0..n {
            if winnings[seat] == 0 {
                continue;
            }
            self.players[seat].stack += winnings[seat];
            payouts.push(Payout { seat, amount: winnings[seat], split: split[seat] });
        }
        payouts.sort_by_key(|p| left_of_button(&p.seat));
        log::info!(
            "settled {} chips: {}",
            self.pot.amount,
            payouts.iter().map(|p| format!("seat {} +{}", p.seat, p.amount)).collect::<Vec<_>>().join(", ")
        );
        self.pot = Pot::default();
        payouts
    }
}
