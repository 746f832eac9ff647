//! Line-oriented interactive game session
//!
//! Reads one command per line and writes human-readable results. Any
//! `BufRead`/`Write` pair works, so the CLI drives it over stdin/stdout and
//! tests drive it over byte buffers.

use std::{
    io::{BufRead, Write},
    str::FromStr,
};

use log::debug;

use crate::{
    Result,
    ports::Predictor,
    rps::{Move, Outcome, get_result},
};

const RULE: &str = "==================================================";

/// Moves played by the `AUTO` command, repeated [`AUTO_CYCLES`] times.
pub const AUTO_SEQUENCE: [Move; 3] = [Move::Rock, Move::Paper, Move::Scissors];
pub const AUTO_CYCLES: usize = 10;

/// One line of player input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Play(Move),
    Stats,
    Reset,
    FullReset,
    Auto,
    Quit,
}

impl FromStr for Command {
    type Err = crate::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "STATS" => Ok(Command::Stats),
            "RESET" => Ok(Command::Reset),
            "FULLRESET" => Ok(Command::FullReset),
            "AUTO" => Ok(Command::Auto),
            "Q" | "QUIT" => Ok(Command::Quit),
            other => other.parse::<Move>().map(Command::Play),
        }
    }
}

/// Why a session stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    Quit,
    RoundLimit,
    EndOfInput,
}

/// Interactive game between a human and a predictor
pub struct GameSession<'a> {
    predictor: &'a mut dyn Predictor,
    round_limit: Option<usize>,
    round: usize,
}

impl<'a> GameSession<'a> {
    pub fn new(predictor: &'a mut dyn Predictor) -> Self {
        Self {
            predictor,
            round_limit: None,
            round: 0,
        }
    }

    /// Stop after `rounds` rounds; 0 means unlimited.
    pub fn with_round_limit(mut self, rounds: usize) -> Self {
        self.round_limit = (rounds > 0).then_some(rounds);
        self
    }

    /// Rounds played since the start or the last reset.
    pub fn round(&self) -> usize {
        self.round
    }

    fn limit_reached(&self) -> bool {
        self.round_limit.is_some_and(|limit| self.round >= limit)
    }

    /// Run until `Q`, the round limit, or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut out: W) -> Result<SessionEnd> {
        write_banner(&mut out, "GAME START")?;
        writeln!(out, "\nCommands:")?;
        writeln!(out, "  R, P, S   - Make your move")?;
        writeln!(out, "  STATS     - Show statistics")?;
        writeln!(out, "  RESET     - Clear history and score")?;
        writeln!(out, "  FULLRESET - Also forget everything learned")?;
        writeln!(out, "  AUTO      - Play R P S {AUTO_CYCLES} times")?;
        writeln!(out, "  Q         - Quit game\n")?;

        let mut lines = input.lines();
        let end = loop {
            if self.limit_reached() {
                break SessionEnd::RoundLimit;
            }
            out.flush()?;
            let Some(line) = lines.next() else {
                break SessionEnd::EndOfInput;
            };
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            match line.parse::<Command>() {
                Ok(Command::Play(mv)) => self.play(mv, &mut out, "")?,
                Ok(Command::Stats) => self.write_stats(&mut out)?,
                Ok(Command::Reset) => {
                    self.round = 0;
                    self.predictor.reset();
                    writeln!(out, "\n[Reset] History and score cleared. Start playing!\n")?;
                }
                Ok(Command::FullReset) => {
                    self.round = 0;
                    self.predictor.full_reset();
                    writeln!(out, "\n[Reset] History, score and learned model cleared.\n")?;
                }
                Ok(Command::Auto) => self.auto_play(&mut out)?,
                Ok(Command::Quit) => break SessionEnd::Quit,
                Err(err) => {
                    debug!("Rejected input {line:?}: {err}");
                    writeln!(out, "INVALID INPUT! Use R, P, or S\n")?;
                }
            }
        };

        write_banner(&mut out, "GAME OVER")?;
        self.write_final_stats(&mut out)?;
        out.flush()?;
        Ok(end)
    }

    fn play<W: Write>(&mut self, mv: Move, out: &mut W, tag: &str) -> Result<()> {
        self.round += 1;
        writeln!(out, "{tag}Round {}: You played {}", self.round, mv.symbol())?;

        let ai_move = self.predictor.predict();
        self.predictor.update(mv, ai_move);

        writeln!(out, "\n You: {}", mv.name())?;
        writeln!(out, " AI: {}", ai_move.name())?;
        let verdict = match get_result(mv, ai_move) {
            Outcome::Win => "AI WINS!",
            Outcome::Lose => "YOU WIN!",
            Outcome::Tie => "TIE!",
        };
        writeln!(out, " Result: {verdict}\n")?;
        Ok(())
    }

    fn auto_play<W: Write>(&mut self, out: &mut W) -> Result<()> {
        writeln!(out, "\n[Auto-play] Playing sequence R P S x {AUTO_CYCLES}...\n")?;
        'cycles: for _ in 0..AUTO_CYCLES {
            for mv in AUTO_SEQUENCE {
                if self.limit_reached() {
                    break 'cycles;
                }
                self.play(mv, out, "[Auto] ")?;
            }
        }
        writeln!(out, "[Auto-play] Finished.\n")?;
        Ok(())
    }

    fn write_stats<W: Write>(&self, out: &mut W) -> Result<()> {
        let stats = self.predictor.stats();
        write_banner(out, "CURRENT STATISTICS")?;
        writeln!(out, " Model:          {}", self.predictor.name())?;
        writeln!(out, " Total Games:    {}", stats.total_games)?;
        writeln!(out, " AI Wins:        {}", stats.wins)?;
        writeln!(out, " Your Wins:      {}", stats.losses)?;
        writeln!(out, " Ties:           {}", stats.ties)?;
        writeln!(out, " Your Win Rate:  {}", stats.player_win_rate_percent())?;
        writeln!(out, "{RULE}\n")?;
        Ok(())
    }

    fn write_final_stats<W: Write>(&self, out: &mut W) -> Result<()> {
        let stats = self.predictor.stats();
        writeln!(out, " Model: {}", self.predictor.name())?;
        writeln!(out, " Total Games Played: {}", stats.total_games)?;
        writeln!(out, "\n Final Score:")?;
        writeln!(out, "  AI:    {} wins", stats.wins)?;
        writeln!(out, "  You:   {} wins", stats.losses)?;
        writeln!(out, "  Ties:  {}", stats.ties)?;
        writeln!(out, "\n Your Win Rate: {}", stats.player_win_rate_percent())?;
        writeln!(out, "{RULE}")?;

        let overall = if stats.wins > stats.losses {
            "AI is the overall winner!"
        } else if stats.losses > stats.wins {
            "You are the overall winner!"
        } else {
            "It's a tie overall!"
        };
        writeln!(out, "\n{overall}\n")?;
        Ok(())
    }
}

fn write_banner<W: Write>(out: &mut W, title: &str) -> Result<()> {
    writeln!(out, "\n{RULE}")?;
    writeln!(out, "{title:^50}")?;
    writeln!(out, "{RULE}")?;
    Ok(())
}
