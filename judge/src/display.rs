use std::collections::BTreeMap;

use cantstop::{ColumnId, PlayerProgress, State};

const LABEL_WIDTH: usize = 19;

fn header(label: &str) -> String {
    let mut result = format!("{:>LABEL_WIDTH$}", label);
    for column in ColumnId::ALL {
        result += &format!("{:>5}", column);
    }
    result += &format!("\n{:>LABEL_WIDTH$}", "");
    for column in ColumnId::ALL {
        let underline = if column.value() < 10 { "-" } else { "--" };
        result += &format!("{:>5}", underline);
    }
    result.push('\n');
    result
}

fn owners(positions: &[PlayerProgress]) -> BTreeMap<ColumnId, &str> {
    let mut owners = BTreeMap::new();
    for progress in positions {
        for column in ColumnId::ALL {
            if progress.rank(column) == column.ranks() {
                owners.insert(column, progress.name.as_str());
            }
        }
    }
    owners
}

/// A nonzero rank, either as is or as a whole percentage of the column height.
fn rank_cell(column: ColumnId, rank: u8, percentage: bool) -> String {
    if percentage {
        format!("{:.0}%", f64::from(rank) / f64::from(column.ranks()) * 100.0)
    } else {
        rank.to_string()
    }
}

/// Renders the committed ranks of all players.
///
/// Each row is labeled with the player's name and number of won columns.
/// Zero ranks show as `.`, and columns won by somebody else as `||`.
pub fn board_table(positions: &[PlayerProgress], percentage: bool) -> String {
    let owners = owners(positions);
    let mut result = header("");
    for progress in positions {
        let won = owners.values().filter(|&&o| o == progress.name).count();
        let label = format!("{} ({})", progress.name, won);
        result += &format!("{:>LABEL_WIDTH$}", label);
        for column in ColumnId::ALL {
            let cell = match (owners.get(&column), progress.rank(column)) {
                (Some(&owner), _) if owner != progress.name => String::from("||"),
                (_, 0) => String::from("."),
                (_, rank) => rank_cell(column, rank, percentage),
            };
            result += &format!("{:>5}", cell);
        }
        result.push('\n');
    }
    result
}

/// Renders the current turn of `name`: one row with this turn's advances,
/// and one with where that would leave it.
pub fn temp_progress_row(state: &State, name: &str, percentage: bool) -> String {
    let owners = owners(&state.player_positions);
    let combined = state.combined_progress(name);
    let blocked = |column: &ColumnId| owners.get(column).is_some_and(|&owner| owner != name);

    let mut result = header("Temp Progress");
    result += &format!("{:>LABEL_WIDTH$}", "");
    for column in ColumnId::ALL {
        let cell = if blocked(&column) {
            String::from("||")
        } else if let Some(temp) = state.temp_progress.get(&column) {
            format!("+{}", temp)
        } else {
            String::from(".")
        };
        result += &format!("{:>5}", cell);
    }
    result += &format!("\n{:>LABEL_WIDTH$}", "");
    for column in ColumnId::ALL {
        let cell = match combined[column.index()] {
            _ if blocked(&column) => String::from("||"),
            0 => String::from("."),
            rank => rank_cell(column, rank, percentage),
        };
        result += &format!("{:>5}", cell);
    }
    result.push('\n');
    result
}
