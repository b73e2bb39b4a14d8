use std::collections::BTreeMap;

use cantstop::Player;
use clap::{Parser, Subcommand, ValueEnum};
use coward_bot::{ConservativeBot, CowardBot, SmartCowardBot};
use itertools::Itertools;
use judge::{
    infinite_attempts, odds_tables, play_game, third_sum_report, triplet_report, Config,
    GameResult, HumanPlayer,
};
use rand::rngs::StdRng;
use rand::Rng;
use random_bot::RandomBot;
use roller_bot::RollerBot;
use scoring_bot::{OddsBot, Rule28Bot};
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// RNG seed
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Give up on a game after this many rounds
    #[arg(long, global = true, default_value_t = Config::DEFAULT_MAX_ROUNDS)]
    max_rounds: u32,

    /// A log level among "off", "error", "warn", "info", "debug", "trace"
    #[arg(short, long, global = true, default_value = "info")]
    log_level: LevelFilter,
}

#[derive(Subcommand)]
enum Command {
    /// Let 2 to 4 bots play against each other
    Matchup {
        #[arg(num_args(2..=4), required = true)]
        bots: Vec<BotKind>,

        /// How many games to play
        #[arg(short, long, default_value_t = 100)]
        num_games: usize,

        /// Print the results as JSON
        #[arg(long)]
        json: bool,
    },
    /// Let every combination of three bots play against each other
    Arena {
        /// How many games to play per combination
        #[arg(short, long, default_value_t = 100)]
        num_games: usize,

        /// Print the results as JSON
        #[arg(long)]
        json: bool,
    },
    /// Play a game against 1 to 3 bots
    Play {
        /// Your name on the board
        #[arg(long)]
        name: String,

        #[arg(num_args(1..=3), required = true)]
        bots: Vec<BotKind>,
    },
    /// Print the dice odds tables
    Odds {
        /// Rank every third column after these two
        #[arg(long, num_args = 2, value_names = ["A", "B"])]
        pair: Option<Vec<u8>>,

        /// Hit odds with markers on these columns, 0 for a free marker
        #[arg(long, num_args = 3, value_names = ["A", "B", "C"])]
        triplet: Option<Vec<u8>>,
    },
    /// Play solo games that never bust, and count which columns get won
    Infinite {
        /// How many games to play
        #[arg(short, long, default_value_t = 10000)]
        num_games: usize,

        /// Print the results as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, ValueEnum)]
enum BotKind {
    Coward,
    SmartCoward,
    Conservative,
    QuadRoller,
    HexRoller,
    SeptaRoller,
    OctoRoller,
    DecaRoller,
    Random,
    #[value(name = "rule28")]
    Rule28,
    Odds,
}

impl BotKind {
    fn label(self) -> String {
        self.to_possible_value()
            .map_or_else(|| format!("{:?}", self), |value| value.get_name().to_owned())
    }

    fn build(self, name: String, rng: &mut StdRng) -> Box<dyn Player> {
        match self {
            BotKind::Coward => Box::new(CowardBot::new(name)),
            BotKind::SmartCoward => Box::new(SmartCowardBot::new(name)),
            BotKind::Conservative => Box::new(ConservativeBot::new(name)),
            BotKind::QuadRoller => Box::new(RollerBot::quad(name)),
            BotKind::HexRoller => Box::new(RollerBot::hex(name)),
            BotKind::SeptaRoller => Box::new(RollerBot::septa(name)),
            BotKind::OctoRoller => Box::new(RollerBot::octo(name)),
            BotKind::DecaRoller => Box::new(RollerBot::deca(name)),
            BotKind::Random => Box::new(RandomBot::new(name, rng.gen())),
            BotKind::Rule28 => Box::new(Rule28Bot::new(name)),
            BotKind::Odds => Box::new(OddsBot::new(name)),
        }
    }
}

/// Builds the bots, numbering the names of bots that appear more than once.
fn build_bots(kinds: &[BotKind], rng: &mut StdRng) -> Vec<Box<dyn Player>> {
    let counts = kinds.iter().counts();
    let mut seen: BTreeMap<String, usize> = BTreeMap::new();
    kinds
        .iter()
        .map(|&kind| {
            let label = kind.label();
            let name = if counts[&kind] > 1 {
                let n = seen.entry(label.clone()).or_insert(0);
                *n += 1;
                format!("{} #{}", label, n)
            } else {
                label
            };
            kind.build(name, rng)
        })
        .collect()
}

#[derive(Clone, Debug, Default, Serialize)]
struct Standing {
    name: String,
    games: usize,
    wins: usize,
    illegal_moves: usize,
}

#[derive(Debug, Default, Serialize)]
struct Tally {
    games: usize,
    runaways: usize,
    standings: Vec<Standing>,
}

impl Tally {
    fn sort_by_wins(&mut self) {
        self.standings
            .sort_by(|a, b| b.wins.cmp(&a.wins).then_with(|| a.name.cmp(&b.name)));
    }
}

fn play_matchup(
    config: &mut Config,
    players: &mut [Box<dyn Player>],
    num_games: usize,
) -> anyhow::Result<Tally> {
    let mut tally = Tally {
        standings: players
            .iter()
            .map(|player| Standing {
                name: player.name().to_owned(),
                ..Standing::default()
            })
            .collect(),
        ..Tally::default()
    };

    for game_idx in 0..num_games {
        tally.games += 1;
        for standing in tally.standings.iter_mut() {
            standing.games += 1;
        }
        match play_game(config, players)? {
            GameResult::WonByPlayer { player_idx, rounds } => {
                debug!(winner = players[player_idx].name(), game_idx, rounds);
                tally.standings[player_idx].wins += 1;
            }
            GameResult::Runaway { rounds } => {
                info!(game_idx, rounds, "Runaway game");
                tally.runaways += 1;
            }
            GameResult::IllegalMoveByPlayer { player_idx, err } => {
                info!(
                    player = players[player_idx].name(),
                    game_idx, "Illegal move by player"
                );
                let mut err_dyn = &err as &dyn std::error::Error;
                while let Some(src_err) = err_dyn.source() {
                    info!("{}", err_dyn);
                    err_dyn = src_err;
                }
                info!("{}", err_dyn);
                tally.standings[player_idx].illegal_moves += 1;
            }
        }
    }

    Ok(tally)
}

fn print_tally(title: &str, tally: &Tally) {
    println!(
        "\n{} ({} games, {} runaways):\n",
        title, tally.games, tally.runaways
    );
    println!(
        " {:19} | {:>7} | {:>7} | {:>7} | {:>7}",
        "player", "games", "wins", "win %", "illegal"
    );
    println!("---------------------|---------|---------|---------|---------");
    for standing in &tally.standings {
        let win_percentage = if standing.games > 0 {
            standing.wins as f32 / standing.games as f32 * 100.0
        } else {
            0.0
        };
        println!(
            " {:19} | {:>7} | {:>7} | {:>6.1}% | {:>7}",
            standing.name, standing.games, standing.wins, win_percentage, standing.illegal_moves
        );
    }
}

fn report(title: &str, tally: &Tally, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(tally)?);
    } else {
        print_tally(title, tally);
    }
    Ok(())
}

fn run_arena(config: &mut Config, num_games: usize) -> anyhow::Result<Tally> {
    let roster = BotKind::value_variants();
    let mut total: BTreeMap<String, Standing> = BTreeMap::new();
    let mut tally = Tally::default();

    for (a, b, c) in roster.iter().copied().tuple_combinations() {
        let mut players = build_bots(&[a, b, c], &mut config.rng);
        let matchup = play_matchup(config, &mut players, num_games)?;
        info!(
            bots = ?[a.label(), b.label(), c.label()],
            runaways = matchup.runaways,
            "Matchup done"
        );
        tally.games += matchup.games;
        tally.runaways += matchup.runaways;
        for standing in matchup.standings {
            let entry = total.entry(standing.name.clone()).or_insert_with(|| Standing {
                name: standing.name.clone(),
                ..Standing::default()
            });
            entry.games += standing.games;
            entry.wins += standing.wins;
            entry.illegal_moves += standing.illegal_moves;
        }
    }

    tally.standings = total.into_values().collect();
    tally.sort_by_wins();
    Ok(tally)
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    initialize_logging(args.log_level);

    // Get a random seed
    let seed = args.seed.unwrap_or_else(rand::random);
    info!(seed);
    let mut config = Config::new(seed);
    config.max_rounds = args.max_rounds;

    match args.command {
        Command::Matchup {
            bots,
            num_games,
            json,
        } => {
            let mut players = build_bots(&bots, &mut config.rng);
            let tally = play_matchup(&mut config, &mut players, num_games)?;
            report("Matchup results", &tally, json)?;
        }
        Command::Arena { num_games, json } => {
            let tally = run_arena(&mut config, num_games)?;
            report("Arena results", &tally, json)?;
        }
        Command::Play { name, bots } => {
            let human = HumanPlayer::new(name, std::io::stdin().lock(), std::io::stdout());
            let mut players: Vec<Box<dyn Player>> = vec![Box::new(human)];
            players.extend(build_bots(&bots, &mut config.rng));
            match play_game(&mut config, &mut players)? {
                GameResult::WonByPlayer { player_idx, rounds } => {
                    println!("{} won after {} rounds!", players[player_idx].name(), rounds)
                }
                GameResult::Runaway { rounds } => println!("Nobody won in {} rounds.", rounds),
                GameResult::IllegalMoveByPlayer { player_idx, err } => {
                    println!("{} made an illegal move: {}", players[player_idx].name(), err)
                }
            }
        }
        Command::Odds { pair, triplet } => {
            println!("{}", odds_tables());
            if let Some(&[a, b]) = pair.as_deref() {
                println!("{}", third_sum_report(a, b)?);
            }
            if let Some(&[a, b, c]) = triplet.as_deref() {
                println!("{}", triplet_report(a, b, c)?);
            }
        }
        Command::Infinite { num_games, json } => {
            info!(num_games, "Running solo games");
            let tally = infinite_attempts(&mut config, num_games)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&tally)?);
            } else {
                println!("{}", tally);
            }
        }
    }

    Ok(())
}

fn initialize_logging(level: LevelFilter) {
    let format = tracing_subscriber::fmt::format()
        .with_target(false)
        .compact();

    let filter = Targets::new().with_default(level);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .event_format(format)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}
