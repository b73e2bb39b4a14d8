use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{IllegalState, InvalidColumnValue};

pub const MIN_COLUMN: u8 = 2;
pub const MAX_COLUMN: u8 = 12;
pub const NUM_COLUMNS: usize = (MAX_COLUMN - MIN_COLUMN + 1) as usize;

/// The number of a column, which is the dice sum that climbs it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct ColumnId(u8);

impl ColumnId {
    /// All columns, from 2 to 12.
    pub const ALL: [ColumnId; NUM_COLUMNS] = [
        ColumnId(2),
        ColumnId(3),
        ColumnId(4),
        ColumnId(5),
        ColumnId(6),
        ColumnId(7),
        ColumnId(8),
        ColumnId(9),
        ColumnId(10),
        ColumnId(11),
        ColumnId(12),
    ];

    pub fn new(value: u8) -> Result<Self, InvalidColumnValue> {
        if (MIN_COLUMN..=MAX_COLUMN).contains(&value) {
            Ok(ColumnId(value))
        } else {
            Err(InvalidColumnValue { value })
        }
    }

    /// Only for sums of two dice, which are always in range.
    pub(crate) fn from_dice_sum(value: u8) -> Self {
        debug_assert!((MIN_COLUMN..=MAX_COLUMN).contains(&value));
        ColumnId(value)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Position of this column in per-column arrays such as [`PlayerProgress::ranks`](crate::PlayerProgress).
    pub fn index(self) -> usize {
        (self.0 - MIN_COLUMN) as usize
    }

    /// How many ranks lie between the start and the top of this column.
    ///
    /// The columns for the rarest sums are the shortest: 3 ranks for 2 and 12,
    /// growing by two towards 13 ranks for 7.
    pub const fn ranks(self) -> u8 {
        if self.0 <= 7 {
            self.0 * 2 - 1
        } else {
            27 - self.0 * 2
        }
    }
}

impl TryFrom<u8> for ColumnId {
    type Error = InvalidColumnValue;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        ColumnId::new(value)
    }
}

impl From<ColumnId> for u8 {
    fn from(column: ColumnId) -> u8 {
        column.0
    }
}

impl std::fmt::Display for ColumnId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}

/// A single track up the mountain.
///
/// Every player sits in exactly one rank bucket while the column is open. Once
/// somebody reaches the top, the column is complete and only they remain.
#[derive(Clone, Debug)]
pub struct Column {
    id: ColumnId,
    /// Index 0 is the start, the last index is the top.
    positions: Vec<BTreeSet<String>>,
    winner: Option<String>,
}

impl Column {
    pub fn new(id: ColumnId) -> Self {
        Self {
            id,
            positions: vec![BTreeSet::new(); id.ranks() as usize + 1],
            winner: None,
        }
    }

    pub fn id(&self) -> ColumnId {
        self.id
    }

    pub fn ranks(&self) -> u8 {
        self.id.ranks()
    }

    /// The players at each rank, starting at rank 0.
    pub fn positions(&self) -> &[BTreeSet<String>] {
        &self.positions
    }

    pub fn winner(&self) -> Option<&str> {
        self.winner.as_deref()
    }

    pub fn is_complete(&self) -> bool {
        self.positions.last().is_some_and(|top| !top.is_empty())
    }

    /// Places a new player at the bottom.
    pub fn add_player(&mut self, name: &str) -> Result<(), IllegalState> {
        if self.positions.iter().any(|rank| rank.contains(name)) {
            return Err(IllegalState::DuplicatePlayer {
                player: String::from(name),
            });
        }
        self.positions[0].insert(String::from(name));
        Ok(())
    }

    pub fn get_position(&self, name: &str) -> Result<u8, IllegalState> {
        self.positions
            .iter()
            .position(|rank| rank.contains(name))
            .map(|rank| rank as u8)
            .ok_or_else(|| IllegalState::PlayerNotInColumn {
                player: String::from(name),
                column: self.id,
            })
    }

    /// Moves the player up by `ranks`, stopping at the top.
    ///
    /// Returns `true` if this completed the column, in which case every other
    /// player is removed from it.
    pub fn advance(&mut self, name: &str, ranks: u8) -> Result<bool, IllegalState> {
        if self.is_complete() {
            return Err(IllegalState::ColumnAlreadyComplete { column: self.id });
        }
        let current = self.get_position(name)?;
        let future = current.saturating_add(ranks).min(self.ranks());
        debug!(player = name, column = self.id.0, from = current, to = future, "Advancing");

        self.positions[current as usize].remove(name);
        self.positions[future as usize].insert(String::from(name));

        if self.is_complete() {
            self.declare_winner(name);
            return Ok(true);
        }
        Ok(false)
    }

    fn declare_winner(&mut self, name: &str) {
        info!(player = name, column = self.id.0, "Column won");
        for rank in self.positions.iter_mut() {
            rank.clear();
        }
        if let Some(top) = self.positions.last_mut() {
            top.insert(String::from(name));
        }
        self.winner = Some(String::from(name));
    }
}
