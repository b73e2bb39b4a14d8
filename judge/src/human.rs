use std::io::{self, BufRead, Write};

use cantstop::{Decision, Player, RollChoice, State};
use tracing::{error, warn};

use crate::display::{board_table, temp_progress_row};

/// A player that asks a human, through any line-based input and output.
///
/// Malformed input is asked for again. When the input is closed, the first
/// choice is taken and the turn is stopped.
pub struct HumanPlayer<R, W> {
    name: String,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> HumanPlayer<R, W> {
    pub fn new(name: impl Into<String>, input: R, output: W) -> Self {
        Self {
            name: name.into(),
            input,
            output,
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Reads a number in `1..=max`. Returns `None` on EOF.
    ///
    /// A line that is not UTF-8 is consumed and asked for again.
    fn prompt_number(&mut self, max: usize) -> io::Result<Option<usize>> {
        let mut buf = String::new();
        loop {
            write!(self.output, "Enter: ")?;
            self.output.flush()?;
            buf.clear();
            match self.input.read_line(&mut buf) {
                Ok(0) => return Ok(None),
                Ok(_) => {}
                Err(err) if err.kind() == io::ErrorKind::InvalidData => {
                    writeln!(self.output, "Try again.")?;
                    continue;
                }
                Err(err) => return Err(err),
            }
            match buf.trim().parse::<usize>() {
                Ok(n) if (1..=max).contains(&n) => return Ok(Some(n)),
                _ => writeln!(self.output, "Try again.")?,
            }
        }
    }

    fn show_turn(&mut self, state: &State) -> io::Result<()> {
        writeln!(self.output, "{}", temp_progress_row(state, &self.name, true))?;
        writeln!(self.output, "Current Rule28 score: {}", state.rule28())?;
        writeln!(self.output, "{} free markers", state.free_markers())
    }

    fn ask_choice(&mut self, state: &State) -> io::Result<Option<usize>> {
        writeln!(self.output, "{}", board_table(&state.player_positions, true))?;
        self.show_turn(state)?;
        writeln!(self.output, "Turn #{}, your choices are:", state.turn)?;
        for (i, choice) in state.choices.iter().enumerate() {
            writeln!(self.output, "{}: {}", i + 1, choice)?;
        }
        self.prompt_number(state.choices.len())
    }

    fn ask_decision(&mut self, state: &State) -> io::Result<Option<usize>> {
        self.show_turn(state)?;
        writeln!(self.output, "1: Stop\n2: Continue")?;
        self.prompt_number(2)
    }
}

impl<R: BufRead, W: Write> Player for HumanPlayer<R, W> {
    fn name(&self) -> &str {
        &self.name
    }

    fn choose_columns(&mut self, state: &State) -> RollChoice {
        let idx = match self.ask_choice(state) {
            Ok(Some(n)) => n - 1,
            Ok(None) => {
                warn!(player = %self.name, "Input closed, taking the first choice");
                0
            }
            Err(err) => {
                error!(player = %self.name, %err, "Failed to talk to player");
                0
            }
        };
        state.choices[idx].clone()
    }

    fn stop_or_continue(&mut self, state: &State) -> Decision {
        match self.ask_decision(state) {
            Ok(Some(2)) => Decision::Continue,
            Ok(Some(_)) => Decision::Stop,
            Ok(None) => {
                warn!(player = %self.name, "Input closed, stopping");
                Decision::Stop
            }
            Err(err) => {
                error!(player = %self.name, %err, "Failed to talk to player");
                Decision::Stop
            }
        }
    }

    fn bust_out(&mut self) {
        if let Err(err) = writeln!(self.output, "No luck, you busted!") {
            error!(player = %self.name, %err, "Failed to talk to player");
        }
    }
}
