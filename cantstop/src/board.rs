use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Column, ColumnId, IllegalState, SumPair, NUM_COLUMNS};

/// How many columns a player may climb during one turn.
pub const NUM_MARKERS: u8 = 3;

/// How many columns a player has to win to win the game.
pub const COLUMNS_TO_WIN: usize = 3;

/// The columns a player advances after a roll, one rank per entry.
///
/// A column may appear twice, e.g. `(7, 7)` advances column 7 by two ranks.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RollChoice(pub Vec<ColumnId>);

impl RollChoice {
    pub fn single(column: ColumnId) -> Self {
        Self(vec![column])
    }

    pub fn columns(&self) -> &[ColumnId] {
        &self.0
    }
}

impl std::fmt::Display for RollChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(")?;
        for (i, column) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", column)?;
        }
        write!(f, ")")
    }
}

/// The committed rank of one player in every column.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerProgress {
    pub name: String,
    /// Indexed by [`ColumnId::index()`]. A column won by somebody else reads 0.
    pub ranks: [u8; NUM_COLUMNS],
}

impl PlayerProgress {
    pub fn rank(&self, column: ColumnId) -> u8 {
        self.ranks[column.index()]
    }
}

/// All columns, plus the progress of the player whose turn it is.
///
/// Progress made during a turn is temporary: it only reaches the columns
/// through [`Self::register_stop_choice()`], and is thrown away on a bust.
#[derive(Clone, Debug)]
pub struct Board {
    /// In the order they were added.
    players: Vec<String>,
    /// Indexed by [`ColumnId::index()`].
    columns: Vec<Column>,
    temporary_progress: BTreeMap<ColumnId, u8>,
    free_markers: u8,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    pub fn new() -> Self {
        Self {
            players: Vec::new(),
            columns: ColumnId::ALL.into_iter().map(Column::new).collect(),
            temporary_progress: BTreeMap::new(),
            free_markers: NUM_MARKERS,
        }
    }

    /// Puts a new player at the bottom of every column.
    pub fn add_player(&mut self, name: &str) -> Result<(), IllegalState> {
        if self.players.iter().any(|p| p == name) {
            return Err(IllegalState::DuplicatePlayer {
                player: String::from(name),
            });
        }
        for column in self.columns.iter_mut() {
            column.add_player(name)?;
        }
        self.players.push(String::from(name));
        Ok(())
    }

    pub fn players(&self) -> &[String] {
        &self.players
    }

    pub fn column(&self, id: ColumnId) -> &Column {
        &self.columns[id.index()]
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn temporary_progress(&self) -> &BTreeMap<ColumnId, u8> {
        &self.temporary_progress
    }

    pub fn free_markers(&self) -> u8 {
        self.free_markers
    }

    /// Throws away this turn's progress and hands back all markers.
    pub fn reset_progress(&mut self) {
        self.temporary_progress.clear();
        self.free_markers = NUM_MARKERS;
    }

    /// The player rolled once too often.
    pub fn bust(&mut self) {
        debug!(lost = ?self.temporary_progress, "Bust");
        self.reset_progress();
    }

    /// The columns that `player` can still climb in this turn.
    ///
    /// Excludes columns that have been won, and columns that the player has
    /// already topped out with temporary progress.
    pub fn get_incomplete_columns(&self, player: &str) -> Result<Vec<ColumnId>, IllegalState> {
        self.check_player(player)?;
        let mut incomplete = Vec::with_capacity(NUM_COLUMNS);
        for column in &self.columns {
            if column.is_complete() {
                continue;
            }
            if let Some(&temp) = self.temporary_progress.get(&column.id()) {
                let committed = column.get_position(player)?;
                if committed + temp >= column.ranks() {
                    continue;
                }
            }
            incomplete.push(column.id());
        }
        Ok(incomplete)
    }

    /// Filters the sums of a roll down to the choices the player may make.
    ///
    /// An empty result means the player busted.
    ///
    /// - With two or more free markers, each pair of sums is a choice, minus
    ///   any sum whose column is unavailable.
    /// - With one free marker, only one column can be climbed at a time.
    /// - With no free markers, only columns that already carry a marker can
    ///   be climbed.
    pub fn get_roll_choices(
        &self,
        player: &str,
        roll_values: &BTreeSet<SumPair>,
    ) -> Result<Vec<RollChoice>, IllegalState> {
        let free_columns = self.get_incomplete_columns(player)?;
        let mut choices: Vec<RollChoice> = Vec::new();
        let mut offer = |choice: RollChoice| {
            if !choices.contains(&choice) {
                choices.push(choice);
            }
        };

        if self.free_markers >= 2 {
            for pair in roll_values {
                let columns: Vec<ColumnId> = pair
                    .columns()
                    .into_iter()
                    .filter(|c| free_columns.contains(c))
                    .collect();
                if !columns.is_empty() {
                    offer(RollChoice(columns));
                }
            }
        } else {
            let must_have_marker = self.free_markers == 0;
            for column in roll_values.iter().flat_map(|pair| pair.columns()) {
                if !free_columns.contains(&column) {
                    continue;
                }
                if must_have_marker && !self.temporary_progress.contains_key(&column) {
                    continue;
                }
                offer(RollChoice::single(column));
            }
        }

        debug!(
            player,
            free = ?free_columns,
            rolls = ?roll_values,
            choices = ?choices,
            "Roll choices"
        );
        Ok(choices)
    }

    /// Adds a choice to this turn's progress.
    ///
    /// The choice must come from [`Self::get_roll_choices()`], it is not
    /// checked again. A column that appears for the first time this turn uses
    /// up a marker, even when it appears twice in the same choice.
    pub fn register_roll_choice(&mut self, choice: &RollChoice, player: &str) {
        debug!(player, choice = %choice, "Registering roll choice");
        for &column in choice.columns() {
            match self.temporary_progress.get_mut(&column) {
                Some(progress) => *progress += 1,
                None => {
                    debug_assert!(self.free_markers > 0, "No free marker for column {}", column);
                    self.free_markers = self.free_markers.saturating_sub(1);
                    self.temporary_progress.insert(column, 1);
                }
            }
        }
    }

    /// Makes this turn's progress permanent, then resets it for the next turn.
    ///
    /// Returns the columns that the player won by doing so.
    pub fn register_stop_choice(&mut self, player: &str) -> Result<Vec<ColumnId>, IllegalState> {
        self.check_player(player)?;
        debug!(player, progress = ?self.temporary_progress, "Committing progress");
        let progress = std::mem::take(&mut self.temporary_progress);
        self.free_markers = NUM_MARKERS;

        let mut completed = Vec::new();
        for (column, ranks) in progress {
            if self.columns[column.index()].advance(player, ranks)? {
                completed.push(column);
            }
        }
        Ok(completed)
    }

    /// The columns that have been won so far.
    pub fn won_columns(&self) -> Vec<ColumnId> {
        self.columns
            .iter()
            .filter(|column| column.winner().is_some())
            .map(Column::id)
            .collect()
    }

    pub fn completed_columns_of(&self, player: &str) -> Vec<ColumnId> {
        self.columns
            .iter()
            .filter(|column| column.winner() == Some(player))
            .map(Column::id)
            .collect()
    }

    /// The first player to own three columns, if any.
    pub fn check_for_winner(&self) -> Option<&str> {
        let mut won_by: BTreeMap<&str, usize> = BTreeMap::new();
        for winner in self.columns.iter().filter_map(Column::winner) {
            let count = won_by.entry(winner).or_insert(0);
            *count += 1;
            if *count >= COLUMNS_TO_WIN {
                return Some(winner);
            }
        }
        None
    }

    /// The committed ranks of all players, in seating order.
    pub fn player_positions(&self) -> Vec<PlayerProgress> {
        self.players
            .iter()
            .map(|name| {
                let mut ranks = [0; NUM_COLUMNS];
                for column in &self.columns {
                    ranks[column.id().index()] = column.get_position(name).unwrap_or(0);
                }
                PlayerProgress {
                    name: name.clone(),
                    ranks,
                }
            })
            .collect()
    }

    fn check_player(&self, player: &str) -> Result<(), IllegalState> {
        if self.players.iter().any(|p| p == player) {
            Ok(())
        } else {
            Err(IllegalState::UnknownPlayer {
                player: String::from(player),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use quickcheck::quickcheck;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;
    use crate::arbitrary::TurnScript;
    use crate::DiceSet;

    fn c(value: u8) -> ColumnId {
        ColumnId::new(value).unwrap()
    }

    fn choice(values: &[u8]) -> RollChoice {
        RollChoice(values.iter().map(|&v| c(v)).collect())
    }

    fn board_with(players: &[&str]) -> Board {
        let mut board = Board::new();
        for player in players {
            board.add_player(player).unwrap();
        }
        board
    }

    /// Commits `ranks` ranks in `column` for `player`.
    fn climb(board: &mut Board, player: &str, column: u8, ranks: u8) {
        for _ in 0..ranks {
            board.register_roll_choice(&choice(&[column]), player);
        }
        board.register_stop_choice(player).unwrap();
    }

    fn sums(values: [u8; 4]) -> BTreeSet<SumPair> {
        DiceSet::from_values(values).unwrap().get_sums()
    }

    quickcheck! {
        fn markers_are_conserved(script: TurnScript) -> bool {
            let mut board = board_with(&["a", "b"]);
            climb(&mut board, "b", 7, 3);
            for (dice, pick) in script.rolls {
                let choices = board.get_roll_choices("a", &dice.get_sums()).unwrap();
                if choices.is_empty() {
                    board.bust();
                    break;
                }
                board.register_roll_choice(&choices[pick as usize % choices.len()], "a");
                let used = board.temporary_progress().len();
                if used > 3 || board.free_markers() as usize != 3 - used {
                    return false;
                }
            }
            board.register_stop_choice("a").unwrap();
            board.reset_progress();
            board.free_markers() == NUM_MARKERS && board.temporary_progress().is_empty()
        }

        fn incomplete_columns_are_idempotent(script: TurnScript) -> bool {
            let mut board = board_with(&["a"]);
            for (dice, pick) in script.rolls {
                let choices = board.get_roll_choices("a", &dice.get_sums()).unwrap();
                if choices.is_empty() {
                    break;
                }
                board.register_roll_choice(&choices[pick as usize % choices.len()], "a");
            }
            board.get_incomplete_columns("a") == board.get_incomplete_columns("a")
        }

        fn winner_iff_three_columns(seed: u64) -> bool {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut board = board_with(&["a", "b"]);
            let mut dice = DiceSet::new(&mut rng);
            for turn in 0..400 {
                let player = if turn % 2 == 0 { "a" } else { "b" };
                loop {
                    dice.roll(&mut rng);
                    let choices = board.get_roll_choices(player, &dice.get_sums()).unwrap();
                    if choices.is_empty() {
                        board.bust();
                        break;
                    }
                    let pick = rng.gen_range(0..choices.len());
                    board.register_roll_choice(&choices[pick], player);
                    if rng.gen_bool(0.4) {
                        board.register_stop_choice(player).unwrap();
                        break;
                    }
                }
                for name in ["a", "b"] {
                    let has_three = board.completed_columns_of(name).len() >= COLUMNS_TO_WIN;
                    if has_three != (board.check_for_winner() == Some(name)) {
                        return false;
                    }
                }
                if board.check_for_winner().is_some() {
                    break;
                }
            }
            true
        }
    }

    #[test]
    fn new_players_start_at_zero() {
        let board = board_with(&["a", "b"]);
        let positions = board.player_positions();
        assert_eq!(positions.len(), 2);
        assert_eq!(positions[0].name, "a");
        assert_eq!(positions[1].ranks, [0; NUM_COLUMNS]);
        assert_eq!(board.get_incomplete_columns("a").unwrap(), ColumnId::ALL.to_vec());
        assert_eq!(board.free_markers(), NUM_MARKERS);
    }

    #[test]
    fn duplicate_and_unknown_players() {
        let mut board = board_with(&["a"]);
        assert!(matches!(
            board.add_player("a"),
            Err(IllegalState::DuplicatePlayer { .. })
        ));
        assert!(matches!(
            board.get_incomplete_columns("z"),
            Err(IllegalState::UnknownPlayer { .. })
        ));
        assert!(matches!(
            board.register_stop_choice("z"),
            Err(IllegalState::UnknownPlayer { .. })
        ));
    }

    #[test]
    fn two_free_markers_allow_partial_pairs() {
        let mut board = board_with(&["a", "b"]);
        climb(&mut board, "b", 2, 3);
        // 1+1 / 3+4 -> (2, 7), 1+3 / 1+4 -> (4, 5), 1+4 / 1+3 -> (4, 5)
        let choices = board.get_roll_choices("a", &sums([1, 1, 3, 4])).unwrap();
        assert_eq!(choices, vec![choice(&[7]), choice(&[4, 5])]);
    }

    #[test]
    fn doubles_use_one_marker() {
        let mut board = board_with(&["a"]);
        let choices = board.get_roll_choices("a", &sums([3, 4, 3, 4])).unwrap();
        assert!(choices.contains(&choice(&[7, 7])));
        board.register_roll_choice(&choice(&[7, 7]), "a");
        assert_eq!(board.temporary_progress().get(&c(7)), Some(&2));
        assert_eq!(board.free_markers(), 2);
    }

    #[test]
    fn one_free_marker_only_offers_singletons() {
        let mut board = board_with(&["a"]);
        board.register_roll_choice(&choice(&[5, 6]), "a");
        assert_eq!(board.free_markers(), 1);
        // 1+4 / 4+5 -> (5, 9), 1+4 / 4+5 -> (5, 9), 1+5 / 4+4 -> (6, 8)
        let choices = board.get_roll_choices("a", &sums([1, 4, 4, 5])).unwrap();
        assert_eq!(
            choices,
            vec![choice(&[5]), choice(&[9]), choice(&[6]), choice(&[8])]
        );
        assert!(!choices.contains(&choice(&[5, 9])));
    }

    #[test]
    fn one_free_marker_skips_blocked_columns() {
        let mut board = board_with(&["a", "b"]);
        climb(&mut board, "b", 9, 9);
        board.register_roll_choice(&choice(&[5, 6]), "a");
        let choices = board.get_roll_choices("a", &sums([1, 4, 4, 5])).unwrap();
        assert!(choices.contains(&choice(&[5])));
        assert!(!choices.contains(&choice(&[9])));
    }

    #[test]
    fn no_free_markers_require_marked_columns() {
        let mut board = board_with(&["a"]);
        board.register_roll_choice(&choice(&[5, 6]), "a");
        board.register_roll_choice(&choice(&[8]), "a");
        assert_eq!(board.free_markers(), 0);
        let choices = board.get_roll_choices("a", &sums([1, 4, 4, 5])).unwrap();
        assert_eq!(choices, vec![choice(&[5]), choice(&[6]), choice(&[8])]);
        let choices = board.get_roll_choices("a", &sums([1, 1, 1, 1])).unwrap();
        assert!(choices.is_empty());
    }

    #[test]
    fn topped_out_column_disappears_for_that_player_only() {
        let mut board = board_with(&["a", "b"]);
        climb(&mut board, "a", 3, 3);
        board.register_roll_choice(&choice(&[3, 3]), "a");
        assert!(!board.get_incomplete_columns("a").unwrap().contains(&c(3)));
        assert!(!board.column(c(3)).is_complete());
        assert!(board.get_incomplete_columns("b").unwrap().contains(&c(3)));
    }

    #[test]
    fn completing_seven_evicts_and_counts() {
        let mut board = board_with(&["a", "b"]);
        climb(&mut board, "a", 7, 12);
        climb(&mut board, "b", 7, 5);
        climb(&mut board, "a", 2, 3);
        climb(&mut board, "a", 12, 3);
        assert_eq!(board.completed_columns_of("a"), vec![c(2), c(12)]);
        assert_eq!(board.check_for_winner(), None);

        let choices = board.get_roll_choices("a", &sums([3, 4, 1, 1])).unwrap();
        assert!(choices.contains(&choice(&[7])));
        board.register_roll_choice(&choice(&[7]), "a");
        assert_eq!(board.register_stop_choice("a"), Ok(vec![c(7)]));

        assert_eq!(board.column(c(7)).winner(), Some("a"));
        assert!(board.column(c(7)).get_position("b").is_err());
        assert_eq!(board.player_positions()[1].rank(c(7)), 0);
        assert_eq!(board.player_positions()[0].rank(c(7)), 13);
        assert_eq!(board.completed_columns_of("a").len(), 3);
        assert_eq!(board.check_for_winner(), Some("a"));
    }

    #[test]
    fn snake_eyes_on_won_column_busts() {
        let mut board = board_with(&["a", "b"]);
        climb(&mut board, "b", 2, 3);
        let roll = sums([1, 1, 1, 1]);
        assert_eq!(roll.len(), 1);
        assert!(board.get_roll_choices("a", &roll).unwrap().is_empty());
    }

    #[test]
    fn bust_discards_progress() {
        let mut board = board_with(&["a"]);
        board.register_roll_choice(&choice(&[6, 8]), "a");
        board.bust();
        assert_eq!(board.free_markers(), NUM_MARKERS);
        assert!(board.temporary_progress().is_empty());
        assert_eq!(board.player_positions()[0].ranks, [0; NUM_COLUMNS]);
    }

    #[test]
    fn stop_commits_and_resets() {
        let mut board = board_with(&["a"]);
        board.register_roll_choice(&choice(&[6, 8]), "a");
        board.register_roll_choice(&choice(&[6]), "a");
        assert_eq!(board.register_stop_choice("a"), Ok(vec![]));
        assert_eq!(board.free_markers(), NUM_MARKERS);
        assert!(board.temporary_progress().is_empty());
        let progress = &board.player_positions()[0];
        assert_eq!(progress.rank(c(6)), 2);
        assert_eq!(progress.rank(c(8)), 1);
    }
}
