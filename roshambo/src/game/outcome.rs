use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use thiserror::Error;

use super::choice::Choice;

/// Wire value reported as the winner of a drawn round.
pub const TIE: &str = "tie";

/// Reasons a round can't be resolved.
///
/// These are reported like any other round outcome rather than failing
/// the caller.
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResolutionError {
    #[error("not enough players")]
    NotEnoughPlayers,
    #[error("invalid choice")]
    InvalidChoice,
}

/// Who took the round.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Winner {
    Tie,
    Player(String),
}

impl Serialize for Winner {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Tie => serializer.serialize_str(TIE),
            Self::Player(username) => serializer.serialize_str(username),
        }
    }
}

/// Result of resolving one round, as broadcast to the room and kept in
/// its history.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RoundOutcome {
    Decided {
        winner: Winner,
        choices: BTreeMap<String, Choice>,
    },
    Failed {
        error: ResolutionError,
    },
}

impl RoundOutcome {
    /// Decide a round between player one and player two.
    ///
    /// Player one wins when its index is one ahead of player two's,
    /// modulo 3.
    pub fn decide(one: (&str, Choice), two: (&str, Choice)) -> Self {
        let (one_name, one_choice) = one;
        let (two_name, two_choice) = two;

        let winner = if one_choice == two_choice {
            Winner::Tie
        } else if one_choice.beats(two_choice) {
            Winner::Player(one_name.to_string())
        } else {
            Winner::Player(two_name.to_string())
        };

        let choices = BTreeMap::from([
            (one_name.to_string(), one_choice),
            (two_name.to_string(), two_choice),
        ]);

        Self::Decided { winner, choices }
    }

    pub fn winner(&self) -> Option<&Winner> {
        match self {
            Self::Decided { winner, .. } => Some(winner),
            Self::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<ResolutionError> {
        match self {
            Self::Decided { .. } => None,
            Self::Failed { error } => Some(*error),
        }
    }

    pub fn is_tie(&self) -> bool {
        matches!(self.winner(), Some(Winner::Tie))
    }
}

impl From<ResolutionError> for RoundOutcome {
    fn from(error: ResolutionError) -> Self {
        Self::Failed { error }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decide_win_and_tie() {
        let outcome = RoundOutcome::decide(("alice", Choice::Rock), ("bob", Choice::Scissors));
        assert_eq!(outcome.winner(), Some(&Winner::Player("alice".to_string())));

        let outcome = RoundOutcome::decide(("alice", Choice::Rock), ("bob", Choice::Paper));
        assert_eq!(outcome.winner(), Some(&Winner::Player("bob".to_string())));

        let outcome = RoundOutcome::decide(("alice", Choice::Paper), ("bob", Choice::Paper));
        assert!(outcome.is_tie());
    }

    #[test]
    fn test_decided_outcome_json_shape() {
        let outcome = RoundOutcome::decide(("alice", Choice::Rock), ("alice-1", Choice::Scissors));
        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            json!({
                "winner": "alice",
                "choices": { "alice": "rock", "alice-1": "scissors" }
            })
        );

        let tie = RoundOutcome::decide(("a", Choice::Rock), ("b", Choice::Rock));
        assert_eq!(serde_json::to_value(&tie).unwrap()["winner"], "tie");
    }

    #[test]
    fn test_failed_outcome_json_shape() {
        let outcome = RoundOutcome::from(ResolutionError::NotEnoughPlayers);
        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            json!({ "error": "not-enough-players" })
        );

        let outcome = RoundOutcome::from(ResolutionError::InvalidChoice);
        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            json!({ "error": "invalid-choice" })
        );
    }
}
