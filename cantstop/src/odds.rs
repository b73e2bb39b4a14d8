//! Exact odds for rolls of four dice.
//!
//! Everything here is computed by going through all 6^4 = 1296 outcomes of
//! the four dice, never by sampling. The tables are built once per process on
//! first use and shared afterwards.

use std::sync::OnceLock;

use crate::{ColumnId, InvalidColumnValue, NUM_COLUMNS, NUM_DICE};

/// Number of distinct outcomes of rolling four dice.
pub const NUM_OUTCOMES: u32 = 6 * 6 * 6 * 6;

/// The six ways to pick two of the four dice.
const DIE_PAIRS: [(usize, usize); 6] = [(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)];

/// A set of columns, with bit `i` standing for the column with index `i`.
type ColumnMask = u16;

fn mask_of(columns: impl IntoIterator<Item = ColumnId>) -> ColumnMask {
    columns
        .into_iter()
        .fold(0, |mask, column| mask | 1 << column.index())
}

fn all_outcomes() -> impl Iterator<Item = [u8; NUM_DICE]> {
    (0..NUM_OUTCOMES).map(|mut n| {
        let mut dice = [0; NUM_DICE];
        for die in dice.iter_mut() {
            *die = (n % 6) as u8 + 1;
            n /= 6;
        }
        dice
    })
}

/// Answers "will the next roll land on at least one of these columns?".
pub struct HitPredictor {
    /// For each subset of columns, how many of the outcomes hit it.
    hits_by_mask: Vec<u16>,
}

static HIT_PREDICTOR: OnceLock<HitPredictor> = OnceLock::new();

impl HitPredictor {
    /// The shared instance.
    pub fn get() -> &'static HitPredictor {
        HIT_PREDICTOR.get_or_init(HitPredictor::compute)
    }

    fn compute() -> Self {
        // The columns reachable in each outcome
        let outcome_masks: Vec<ColumnMask> = all_outcomes()
            .map(|dice| {
                mask_of(
                    DIE_PAIRS
                        .iter()
                        .map(|&(a, b)| ColumnId::from_dice_sum(dice[a] + dice[b])),
                )
            })
            .collect();

        let hits_by_mask = (0..1 << NUM_COLUMNS)
            .map(|mask: ColumnMask| {
                outcome_masks
                    .iter()
                    .filter(|&&outcome| outcome & mask != 0)
                    .count() as u16
            })
            .collect();
        Self { hits_by_mask }
    }

    /// How many of the 1296 outcomes contain a pair summing to one of `columns`.
    pub fn hits(&self, columns: impl IntoIterator<Item = ColumnId>) -> u32 {
        u32::from(self.hits_by_mask[mask_of(columns) as usize])
    }

    /// The probability that the next roll contains a pair summing to one of `columns`.
    ///
    /// With all markers placed on `columns`, this is the probability of not
    /// busting on the next attempt.
    pub fn hit_odds(&self, columns: impl IntoIterator<Item = ColumnId>) -> f64 {
        f64::from(self.hits(columns)) / f64::from(NUM_OUTCOMES)
    }
}

/// For every sum, the number of outcomes in which some pair of dice makes it.
#[derive(Debug)]
pub struct RollSet {
    possibilities: [u32; NUM_COLUMNS],
}

static ROLL_SET: OnceLock<RollSet> = OnceLock::new();

impl RollSet {
    pub fn get() -> &'static RollSet {
        ROLL_SET.get_or_init(|| {
            let predictor = HitPredictor::get();
            RollSet {
                possibilities: ColumnId::ALL.map(|column| predictor.hits([column])),
            }
        })
    }

    pub fn possibilities(&self, sum: ColumnId) -> u32 {
        self.possibilities[sum.index()]
    }

    pub fn odds(&self, sum: ColumnId) -> f64 {
        f64::from(self.possibilities(sum)) / f64::from(NUM_OUTCOMES)
    }
}

/// The probability that one particular pair of dice shows a given sum.
#[derive(Debug)]
pub struct SingleValueOdds {
    /// Counted over every pair in every outcome.
    sum_count: [u32; NUM_COLUMNS],
}

static SINGLE_VALUE_ODDS: OnceLock<SingleValueOdds> = OnceLock::new();

impl SingleValueOdds {
    pub fn get() -> &'static SingleValueOdds {
        SINGLE_VALUE_ODDS.get_or_init(|| {
            let mut sum_count = [0; NUM_COLUMNS];
            for dice in all_outcomes() {
                for (a, b) in DIE_PAIRS {
                    sum_count[ColumnId::from_dice_sum(dice[a] + dice[b]).index()] += 1;
                }
            }
            SingleValueOdds { sum_count }
        })
    }

    /// Zero for sums that two dice can't make.
    pub fn of(&self, sum: u8) -> f64 {
        match ColumnId::new(sum) {
            Ok(column) => {
                let pairs_seen = NUM_OUTCOMES * DIE_PAIRS.len() as u32;
                f64::from(self.sum_count[column.index()]) / f64::from(pairs_seen)
            }
            Err(_) => 0.0,
        }
    }
}

/// Starting with two sums, how good is a given third sum?
#[derive(Copy, Clone, Debug)]
pub struct TripleValueOdds {
    sums: [ColumnId; 2],
}

impl TripleValueOdds {
    pub fn new(sum1: ColumnId, sum2: ColumnId) -> Self {
        Self { sums: [sum1, sum2] }
    }

    /// The hit odds of the next attempt once `sum3` is the third column.
    pub fn find_odds(&self, sum3: ColumnId) -> f64 {
        HitPredictor::get().hit_odds([self.sums[0], self.sums[1], sum3])
    }
}

/// The (up to) three columns carrying a marker.
///
/// A slot given as 0 has no marker yet.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Triplet {
    values: [Option<ColumnId>; 3],
}

impl Triplet {
    pub fn new(a: u8, b: u8, c: u8) -> Result<Self, InvalidColumnValue> {
        let slot = |value: u8| match value {
            0 => Ok(None),
            _ => ColumnId::new(value).map(Some),
        };
        let mut values = [slot(a)?, slot(b)?, slot(c)?];
        values.sort();
        Ok(Self { values })
    }

    pub fn values(&self) -> [Option<ColumnId>; 3] {
        self.values
    }

    /// The odds that the next attempt is a hit.
    ///
    /// While a marker is still free, any roll can be used, so this is 1.
    pub fn compute_hit(&self) -> f64 {
        if self.values.iter().any(Option::is_none) {
            return 1.0;
        }
        HitPredictor::get().hit_odds(self.values.iter().flatten().copied())
    }
}

impl std::fmt::Display for Triplet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let [a, b, c] = self.values.map(|v| v.map_or(0, ColumnId::value));
        write!(f, "TRIP[{}|{}|{}]", a, b, c)
    }
}

/// Formats a fraction as a percentage with one decimal, e.g. `"92.0%"`.
pub fn perc(fraction: f64) -> String {
    format!("{:3.1}%", fraction * 100.0)
}
