use std::collections::BTreeMap;

use cantstop::{
    perc, Board, ColumnId, DiceSet, HitPredictor, RollSet, SingleValueOdds, TripleValueOdds,
    Triplet, NUM_OUTCOMES,
};
use itertools::Itertools;
use serde::Serialize;
use tracing::{debug, info};

use crate::Config;

/// For every sum: how many rolls make it, the odds that any pair of dice
/// makes it, and the odds that one given pair does. Ends with the range of
/// hit odds once three columns carry a marker.
pub fn odds_tables() -> String {
    let roll_set = RollSet::get();
    let single = SingleValueOdds::get();

    let mut result = format!(
        "{:>4} | {:>5} | {:>9} | {:>8}\n",
        "sum", "rolls", "any pair", "one pair"
    );
    result += "-----|-------|-----------|---------\n";
    for column in ColumnId::ALL {
        result += &format!(
            "{:>4} | {:>5} | {:>9} | {:>8}\n",
            column.value(),
            roll_set.possibilities(column),
            perc(roll_set.odds(column)),
            perc(single.of(column.value())),
        );
    }

    let predictor = HitPredictor::get();
    let triples: Vec<(u32, [ColumnId; 3])> = ColumnId::ALL
        .into_iter()
        .tuple_combinations()
        .map(|(a, b, c)| (predictor.hits([a, b, c]), [a, b, c]))
        .collect();
    if let (Some(worst), Some(best)) = (
        triples.iter().min_by_key(|(hits, _)| *hits),
        triples.iter().max_by_key(|(hits, _)| *hits),
    ) {
        let odds = |hits: u32| perc(f64::from(hits) / f64::from(NUM_OUTCOMES));
        result += &format!(
            "\nWith three columns chosen, the next attempt hits between {} {:?} and {} {:?}\n",
            odds(worst.0),
            worst.1.map(ColumnId::value),
            odds(best.0),
            best.1.map(ColumnId::value),
        );
    }
    result
}

/// Ranks every possible third column, given the first two.
pub fn third_sum_report(a: u8, b: u8) -> anyhow::Result<String> {
    let first = ColumnId::new(a)?;
    let second = ColumnId::new(b)?;
    let odds = TripleValueOdds::new(first, second);
    let candidates: Vec<(ColumnId, f64)> = ColumnId::ALL
        .into_iter()
        .filter(|&column| column != first && column != second)
        .map(|column| (column, odds.find_odds(column)))
        .collect();
    let best = candidates
        .iter()
        .copied()
        .reduce(|best, next| if next.1 > best.1 { next } else { best })
        .map(|(column, _)| column);

    let mut result = String::new();
    for (column, hit) in candidates {
        result += &format!(
            "Given {}/{}, a third column {:>2} makes the next attempt hit {}",
            a,
            b,
            column.value(),
            perc(hit)
        );
        if Some(column) == best {
            result += "  <--- best";
        }
        result.push('\n');
    }
    Ok(result)
}

/// The hit odds of the next attempt with markers on the given columns.
///
/// A 0 stands for a free marker.
pub fn triplet_report(a: u8, b: u8, c: u8) -> anyhow::Result<String> {
    let triplet = Triplet::new(a, b, c)?;
    Ok(format!(
        "With columns {}, the next attempt hits {}\n",
        triplet,
        perc(triplet.compute_hit())
    ))
}

/// Results of solo games in which the player never busts.
#[derive(Debug, Default, PartialEq, Eq, Serialize)]
pub struct InfiniteTally {
    pub games: usize,
    pub runaways: usize,
    /// Summed over finished games.
    pub rounds: u64,
    /// How often each column was among the won ones.
    pub column_wins: BTreeMap<u8, usize>,
    /// How often each set of exactly three won columns came up.
    pub winning_triplets: BTreeMap<String, usize>,
}

impl InfiniteTally {
    fn finished(&self) -> usize {
        self.games - self.runaways
    }

    pub fn average_rounds(&self) -> f64 {
        match self.finished() {
            0 => 0.0,
            n => self.rounds as f64 / n as f64,
        }
    }
}

impl std::fmt::Display for InfiniteTally {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "After {} games ({} runaways), the average number of rounds is {:.3}",
            self.games,
            self.runaways,
            self.average_rounds()
        )?;
        writeln!(f, "{:>6} | {:>6}", "column", "wins")?;
        for (column, wins) in &self.column_wins {
            writeln!(f, "{:>6} | {:>6}", column, wins)?;
        }
        let most = self.winning_triplets.iter().max_by_key(|&(_, &n)| n);
        let least = self.winning_triplets.iter().min_by_key(|&(_, &n)| n);
        if let (Some(most), Some(least)) = (most, least) {
            writeln!(f, "The most winning triplet: {} ({})", most.0, most.1)?;
            writeln!(f, "The least winning triplet: {} ({})", least.0, least.1)?;
        }
        Ok(())
    }
}

const SOLO: &str = "solo";

/// Plays `games` solo games without busts: every round the first legal
/// choice is taken and committed right away. Shows whether the column
/// heights match how often each sum is rolled.
pub fn infinite_attempts(config: &mut Config, games: usize) -> anyhow::Result<InfiniteTally> {
    let mut tally = InfiniteTally {
        column_wins: ColumnId::ALL.iter().map(|c| (c.value(), 0)).collect(),
        ..InfiniteTally::default()
    };
    let mut dice = DiceSet::new(&mut config.rng);

    'games: for game_idx in 0..games {
        tally.games += 1;
        let mut board = Board::new();
        board.add_player(SOLO)?;

        for round in 1..=config.max_rounds {
            dice.roll(&mut config.rng);
            let choices = board.get_roll_choices(SOLO, &dice.get_sums())?;
            if let Some(choice) = choices.first() {
                board.register_roll_choice(choice, SOLO);
            }
            board.register_stop_choice(SOLO)?;

            if board.check_for_winner().is_some() {
                let won = board.won_columns();
                debug!(game_idx, round, ?won, "Solo game over");
                tally.rounds += u64::from(round);
                for column in &won {
                    *tally.column_wins.entry(column.value()).or_insert(0) += 1;
                }
                // Four columns can fall in the last round, those are not counted
                if let &[a, b, c] = won.as_slice() {
                    let triplet = Triplet::new(a.value(), b.value(), c.value())?;
                    *tally.winning_triplets.entry(triplet.to_string()).or_insert(0) += 1;
                }
                continue 'games;
            }
        }

        info!(game_idx, rounds = config.max_rounds, "Runaway solo game");
        tally.runaways += 1;
    }

    Ok(tally)
}
