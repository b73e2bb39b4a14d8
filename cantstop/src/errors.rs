use crate::{ColumnId, RollChoice};

/// A column number (or triplet slot) outside of the range of dice sums.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidColumnValue {
    pub value: u8,
}

impl std::error::Error for InvalidColumnValue {}

impl std::fmt::Display for InvalidColumnValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Column value {} is not a possible sum of two dice (2 to 12)",
            self.value
        )
    }
}

/// A die value outside of 1 to 6.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidDieValue {
    pub value: u8,
}

impl std::error::Error for InvalidDieValue {}

impl std::fmt::Display for InvalidDieValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Die value {} is not between 1 and 6", self.value)
    }
}

/// The board was asked to do something that correct sequencing never does.
///
/// These are not recoverable: a match that runs into one must be aborted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IllegalState {
    PlayerNotInColumn { player: String, column: ColumnId },
    ColumnAlreadyComplete { column: ColumnId },
    DuplicatePlayer { player: String },
    UnknownPlayer { player: String },
}

impl std::error::Error for IllegalState {}

impl std::fmt::Display for IllegalState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IllegalState::PlayerNotInColumn { player, column } => write!(
                f,
                "Player {} does not occupy any rank in column {}",
                player, column
            ),
            IllegalState::ColumnAlreadyComplete { column } => {
                write!(f, "Column {} has already been won", column)
            }
            IllegalState::DuplicatePlayer { player } => {
                write!(f, "A player named {} is already on the board", player)
            }
            IllegalState::UnknownPlayer { player } => {
                write!(f, "No player named {} is on the board", player)
            }
        }
    }
}

/// A player's decision that the rules don't allow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IllegalMove {
    /// The returned choice is not one of the choices that were offered.
    ChoiceNotOffered { choice: RollChoice },
}

impl std::error::Error for IllegalMove {}

impl std::fmt::Display for IllegalMove {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IllegalMove::ChoiceNotOffered { choice } => {
                write!(f, "Chose {}, which was not among the offered choices", choice)
            }
        }
    }
}

/// The error type for one turn.
#[derive(Debug)]
pub enum TurnError {
    IllegalMove(IllegalMove),
    IllegalState(IllegalState),
}

impl std::error::Error for TurnError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TurnError::IllegalMove(err) => Some(err),
            TurnError::IllegalState(err) => Some(err),
        }
    }
}

impl std::fmt::Display for TurnError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TurnError::IllegalMove(_) => write!(f, "The player made an illegal move"),
            TurnError::IllegalState(_) => write!(f, "The board reached an illegal state"),
        }
    }
}

impl From<IllegalMove> for TurnError {
    fn from(err: IllegalMove) -> Self {
        TurnError::IllegalMove(err)
    }
}

impl From<IllegalState> for TurnError {
    fn from(err: IllegalState) -> Self {
        TurnError::IllegalState(err)
    }
}
