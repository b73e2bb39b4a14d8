use std::collections::BTreeSet;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{ColumnId, InvalidDieValue};

pub const NUM_DICE: usize = 4;

/// A six-sided die.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Die {
    value: u8,
}

impl Die {
    pub fn new(value: u8) -> Result<Self, InvalidDieValue> {
        if (1..=6).contains(&value) {
            Ok(Self { value })
        } else {
            Err(InvalidDieValue { value })
        }
    }

    pub fn value(&self) -> u8 {
        self.value
    }

    pub fn roll<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.value = rng.gen_range(1..=6);
    }
}

/// Two dice sums obtained by splitting the four dice into two pairs.
///
/// Always sorted, i.e. `low <= high`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SumPair {
    pub low: ColumnId,
    pub high: ColumnId,
}

impl SumPair {
    pub fn new(a: ColumnId, b: ColumnId) -> Self {
        if a <= b {
            Self { low: a, high: b }
        } else {
            Self { low: b, high: a }
        }
    }

    pub fn columns(&self) -> [ColumnId; 2] {
        [self.low, self.high]
    }
}

impl std::fmt::Display for SumPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.low, self.high)
    }
}

/// The three ways to split four dice into two pairs, as indices.
const PARTITIONS: [[(usize, usize); 2]; 3] = [[(0, 1), (2, 3)], [(0, 2), (1, 3)], [(0, 3), (1, 2)]];

/// The four dice rolled on every attempt.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DiceSet {
    dice: [Die; NUM_DICE],
}

impl DiceSet {
    /// Creates a set of dice that has already been rolled.
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut dice = Self {
            dice: [Die { value: 1 }; NUM_DICE],
        };
        dice.roll(rng);
        dice
    }

    pub fn from_values(values: [u8; NUM_DICE]) -> Result<Self, InvalidDieValue> {
        let mut dice = [Die { value: 1 }; NUM_DICE];
        for (die, value) in dice.iter_mut().zip(values) {
            *die = Die::new(value)?;
        }
        Ok(Self { dice })
    }

    /// Re-rolls all four dice independently.
    pub fn roll<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for die in self.dice.iter_mut() {
            die.roll(rng);
        }
    }

    pub fn values(&self) -> [u8; NUM_DICE] {
        self.dice.map(|die| die.value)
    }

    /// The distinct pairs of sums that can be made from the current dice.
    ///
    /// There are three ways to split the dice into two pairs, but equal dice
    /// can make several splits produce the same sums, so this has between one
    /// and three elements.
    pub fn get_sums(&self) -> BTreeSet<SumPair> {
        let v = self.values();
        PARTITIONS
            .iter()
            .map(|[(a, b), (c, d)]| {
                SumPair::new(
                    ColumnId::from_dice_sum(v[*a] + v[*b]),
                    ColumnId::from_dice_sum(v[*c] + v[*d]),
                )
            })
            .collect()
    }
}
