use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;

/// Error returned when a submitted value isn't one of the three throws.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("invalid choice: {0:?} (expected rock, paper, or scissors)")]
pub struct ChoiceError(pub String);

/// One of the three throws a player can make in a round.
///
/// The discriminants are the cyclic dominance indices: a choice beats
/// the choice whose index is exactly one less, modulo 3.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Choice {
    Rock = 0,
    Paper = 1,
    Scissors = 2,
}

impl Choice {
    pub const ALL: [Choice; 3] = [Choice::Rock, Choice::Paper, Choice::Scissors];

    /// Position of this choice in the dominance cycle.
    pub fn index(self) -> u8 {
        self as u8
    }

    /// Whether `self` beats `other`.
    pub fn beats(self, other: Choice) -> bool {
        (self.index() + 3 - other.index()) % 3 == 1
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rock => "rock",
            Self::Paper => "paper",
            Self::Scissors => "scissors",
        }
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parsing is an exact, case-sensitive match on the wire names.
impl FromStr for Choice {
    type Err = ChoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rock" => Ok(Self::Rock),
            "paper" => Ok(Self::Paper),
            "scissors" => Ok(Self::Scissors),
            other => Err(ChoiceError(other.to_string())),
        }
    }
}
