use holdem_agent::agents::{Action, AgentTable, EquityAgent, ScriptedAgent};
use holdem_agent::config::{PolicyConfig, TableConfig};
use holdem_agent::agents::AgentError;
use holdem_agent::engine::{BettingEngine, BettingError, Phase};
use holdem_agent::evaluator::Category;
use holdem_agent::observer::{NullObserver, TableEvent};
use holdem_agent::session::{HandSession, RandomCards, SessionError, TextCards};
use holdem_agent::table::Table;

fn scripted(seats: &[&[Action]]) -> AgentTable {
    let mut agents = AgentTable::for_seats(seats.len());
    for (seat, actions) in seats.iter().enumerate() {
        agents.set_agent(seat, Some(Box::new(ScriptedAgent::with_actions(actions.iter().copied()))));
    }
    agents
}

const BOARD: [&str; 5] = ["Two of Clubs", "Seven Diamonds", "Nine Hearts", "Jack Spades", "King Clubs"];

#[test]
fn checked_down_hand_goes_to_the_best_showdown() {
    let mut engine = BettingEngine::new(Table::new(2, 1000, 10, 20));
    // seat 1 is the button and small blind
    let mut agents = scripted(&[
        &[Action::Check, Action::Check, Action::Check, Action::Check],
        &[Action::Call, Action::Check, Action::Check, Action::Check],
    ]);
    let mut cards = TextCards::new(BOARD);
    for line in ["Ace Hearts", "Ace Diamonds", "Queen Hearts", "Three Diamonds"] {
        cards.push(line);
    }
    let mut events = Vec::new();
    let summary = HandSession::new().play_hand(&mut engine, &mut agents, &mut cards, &mut events).unwrap();

    assert_eq!(summary.phase, Phase::Showdown);
    assert_eq!(summary.actions, 8);
    assert_eq!(summary.winners(), vec![0]);
    assert_eq!(summary.showdown[0].1.map(|e| e.category), Some(Category::Pair));
    assert_eq!(summary.showdown[1].1.map(|e| e.category), Some(Category::HighCard));
    assert_eq!(engine.table().player(0).map(|p| p.stack()), Some(1020));
    assert_eq!(engine.table().player(1).map(|p| p.stack()), Some(980));

    let phases: Vec<Phase> = events
        .iter()
        .filter_map(|e| match e {
            TableEvent::PhaseStarted { phase, .. } => Some(*phase),
            _ => None,
        })
        .collect();
    assert_eq!(phases, vec![Phase::PreFlop, Phase::Flop, Phase::Turn, Phase::River]);
    assert!(matches!(events.first(), Some(TableEvent::HandStarted { button: 1, pot: 30, .. })));
    assert!(matches!(events.last(), Some(TableEvent::PotsSettled { .. })));
}

#[test]
fn fold_ends_the_hand_without_asking_for_cards() {
    let mut engine = BettingEngine::new(Table::new(2, 1000, 10, 20));
    let mut agents = scripted(&[&[], &[Action::Fold]]);
    let summary = HandSession::new()
        .play_hand(&mut engine, &mut agents, &mut TextCards::default(), &mut NullObserver)
        .unwrap();

    assert_eq!(summary.phase, Phase::PreFlop);
    assert!(summary.showdown.is_empty());
    assert_eq!(summary.winners(), vec![0]);
    assert_eq!(engine.table().player(0).map(|p| p.stack()), Some(1010));
    assert_eq!(engine.table().player(1).map(|p| p.stack()), Some(990));
}

#[test]
fn mucked_hand_forfeits() {
    let mut engine = BettingEngine::new(Table::new(2, 100, 100, 200));
    let mut agents = AgentTable::for_seats(2);
    let mut cards = TextCards::new(BOARD);
    // seat 0 mucks even though aces would win
    for line in ["", "Queen Hearts", "Three Diamonds"] {
        cards.push(line);
    }
    let summary = HandSession::new().play_hand(&mut engine, &mut agents, &mut cards, &mut NullObserver).unwrap();

    assert_eq!(summary.showdown[0], (0, None));
    assert_eq!(summary.winners(), vec![1]);
    assert_eq!(engine.table().player(1).map(|p| p.stack()), Some(200));
}

#[test]
fn equity_agents_play_a_seeded_session_without_losing_chips() {
    let config = TableConfig { players: 4, small_blind: 10, big_blind: 20, starting_stack: 400 };
    let mut engine = BettingEngine::new(Table::from_config(&config));
    let mut agents = AgentTable::for_seats(config.players);
    for seat in 0..config.players {
        let policy = PolicyConfig { iterations: 200, ..PolicyConfig::default() }.with_seed(seat as u64);
        agents.set_agent(seat, Some(Box::new(EquityAgent::new(policy))));
    }
    let mut cards = RandomCards::seeded(11);
    let mut session = HandSession::new();

    for _ in 0..15 {
        if engine.table().players().iter().filter(|p| p.stack() > 0).count() < 2 {
            break;
        }
        let summary = session.play_hand(&mut engine, &mut agents, &mut cards, &mut NullObserver).unwrap();
        assert!(!summary.payouts.is_empty());
        let total: u64 = engine.table().players().iter().map(|p| p.stack()).sum();
        assert_eq!(total, 1600);
        assert_eq!(engine.table().total_pot(), 0);
    }
}

fn showdown_cards() -> TextCards {
    let mut cards = TextCards::new(BOARD);
    for line in ["Ace Hearts", "Ace Diamonds", "Queen Hearts", "Three Diamonds"] {
        cards.push(line);
    }
    cards
}

#[test]
fn refused_action_is_asked_again() {
    let mut engine = BettingEngine::new(Table::new(2, 1000, 10, 20));
    // 25 is short of the minimum raise to 40
    let mut agents = scripted(&[
        &[Action::Check, Action::Check, Action::Check, Action::Check],
        &[Action::RaiseTo(25), Action::Call, Action::Check, Action::Check, Action::Check],
    ]);
    let mut events = Vec::new();
    let summary =
        HandSession::new().play_hand(&mut engine, &mut agents, &mut showdown_cards(), &mut events).unwrap();

    let rejected = events.iter().filter(|e| matches!(e, TableEvent::InputRejected { .. })).count();
    assert_eq!(rejected, 1);
    assert_eq!(summary.actions, 8);
    assert_eq!(summary.winners(), vec![0]);
    assert_eq!(engine.table().player(0).map(|p| p.stack()), Some(1020));
    assert_eq!(engine.table().player(1).map(|p| p.stack()), Some(980));
}

#[test]
fn failed_hand_returns_the_blinds() {
    let mut engine = BettingEngine::new(Table::new(2, 1000, 10, 20));
    let mut agents = scripted(&[&[], &[Action::RaiseTo(25)]]);
    let mut events = Vec::new();
    let err = HandSession::new()
        .with_max_attempts(1)
        .play_hand(&mut engine, &mut agents, &mut showdown_cards(), &mut events)
        .unwrap_err();

    assert!(matches!(
        err,
        SessionError::Agent(AgentError::Betting(BettingError::InvalidRaiseAmount { amount: Some(25), .. }))
    ));
    assert!(matches!(events.last(), Some(TableEvent::HandAbandoned { refunded: 30, .. })));
    assert_eq!(engine.table().total_pot(), 0);
    assert!(engine.table().players().iter().all(|p| p.stack() == 1000));

    // the button moves to seat 0, which folds its small blind
    let mut agents = scripted(&[&[Action::Fold], &[]]);
    HandSession::new()
        .play_hand(&mut engine, &mut agents, &mut TextCards::default(), &mut NullObserver)
        .unwrap();
    assert_eq!(engine.table().player(0).map(|p| p.stack()), Some(990));
    assert_eq!(engine.table().player(1).map(|p| p.stack()), Some(1010));
}
