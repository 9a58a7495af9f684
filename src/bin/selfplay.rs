use clap::Parser;
use holdem_agent::agents::{AgentTable, EquityAgent};
use holdem_agent::config::{PolicyConfig, TableConfig};
use holdem_agent::engine::BettingEngine;
use holdem_agent::observer::LogObserver;
use holdem_agent::session::{HandSession, RandomCards};
use holdem_agent::table::Table;
use std::error::Error;

/// Equity bots playing each other until one is left or the hand limit is hit.
///
/// Flags override the HOLDEM_* environment variables.
#[derive(Parser)]
#[command(name = "selfplay")]
#[command(about = "Run No-Limit Hold'em self-play between equity agents")]
struct Cli {
    /// Maximum number of hands
    #[arg(long, default_value = "100")]
    hands: usize,
    /// Seats at the table
    #[arg(short, long)]
    players: Option<usize>,
    /// Big blind; the small blind is half
    #[arg(long)]
    big_blind: Option<u64>,
    /// Starting stack per seat
    #[arg(long)]
    stack: Option<u64>,
    /// Monte Carlo trials per decision
    #[arg(short, long)]
    iterations: Option<usize>,
    /// Seed for dealing and equity sampling
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let cli = Cli::parse();

    let mut table_config = TableConfig::from_env()?;
    if let Some(players) = cli.players {
        table_config.players = players;
    }
    if let Some(big_blind) = cli.big_blind {
        table_config = table_config.with_big_blind(big_blind);
    }
    if let Some(stack) = cli.stack {
        table_config.starting_stack = stack;
    }
    table_config.validate()?;

    let mut policy_config = PolicyConfig::from_env()?;
    if let Some(iterations) = cli.iterations {
        policy_config.iterations = iterations;
    }
    if let Some(seed) = cli.seed {
        policy_config.seed = Some(seed);
    }
    policy_config.validate()?;

    let mut agents = AgentTable::for_seats(table_config.players);
    for seat in 0..table_config.players {
        let mut config = policy_config.clone();
        config.seed = config.seed.map(|s| s.wrapping_add(seat as u64 + 1));
        agents.set_agent(seat, Some(Box::new(EquityAgent::new(config))));
    }
    let mut cards = match policy_config.seed {
        Some(seed) => RandomCards::seeded(seed),
        None => RandomCards::from_entropy(),
    };

    let mut engine = BettingEngine::new(Table::from_config(&table_config));
    let mut session = HandSession::new();
    let mut played = 0;
    while played < cli.hands && engine.table().players().iter().filter(|p| p.stack() > 0).count() > 1 {
        session.play_hand(&mut engine, &mut agents, &mut cards, &mut LogObserver)?;
        played += 1;
    }

    println!("{played} hands played");
    for (seat, player) in engine.table().players().iter().enumerate() {
        println!("seat {seat} {:>8}: {}", player.name(), player.stack());
    }
    Ok(())
}
