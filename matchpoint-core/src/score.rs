use std::cmp::Ordering;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoreError {
    #[error("score line contains no played sets")]
    NoPlayedSets,

    #[error("malformed set score: {0}")]
    MalformedSet(String),
}

/// Games won by each side in one completed set. Immutable once recorded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetScore {
    pub p1: u32,
    pub p2: u32,
}

impl SetScore {
    pub fn new(p1: u32, p2: u32) -> Self {
        Self { p1, p2 }
    }

    /// A {0,0} pair is an unfilled form slot, not a played set. Callers
    /// filter placeholders before handing a set list to `derive_outcome`.
    pub fn is_played(&self) -> bool {
        self.p1 > 0 || self.p2 > 0
    }
}

impl FromStr for SetScore {
    type Err = ScoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (p1, p2) = s
            .split_once('-')
            .ok_or_else(|| ScoreError::MalformedSet(s.to_string()))?;
        let p1 = p1
            .trim()
            .parse()
            .map_err(|_| ScoreError::MalformedSet(s.to_string()))?;
        let p2 = p2
            .trim()
            .parse()
            .map_err(|_| ScoreError::MalformedSet(s.to_string()))?;
        Ok(SetScore { p1, p2 })
    }
}

/// A set score as it arrives at the boundary. Two encodings exist in the
/// wild: an object pair and a delimited string like `"6-4"`. Both normalize
/// to [`SetScore`] on ingestion; nothing past the boundary sees this type.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum RawSetScore {
    Pair { p1: u32, p2: u32 },
    Text(String),
}

impl RawSetScore {
    pub fn normalize(&self) -> Result<SetScore, ScoreError> {
        match self {
            RawSetScore::Pair { p1, p2 } => Ok(SetScore::new(*p1, *p2)),
            RawSetScore::Text(s) => s.parse(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchOutcome {
    Player1,
    Player2,
    Undetermined,
}

impl MatchOutcome {
    pub fn winner_of<T: Copy>(&self, player1: T, player2: T) -> Option<T> {
        match self {
            MatchOutcome::Player1 => Some(player1),
            MatchOutcome::Player2 => Some(player2),
            MatchOutcome::Undetermined => None,
        }
    }
}

/// Counts sets won per side and returns the strict majority. An equal split
/// is reported as `Undetermined` rather than silently picking a side; tennis
/// scoring resolves oddly in practice, so callers treat it as a terminal
/// state, not an error.
pub fn derive_outcome(sets: &[SetScore]) -> Result<MatchOutcome, ScoreError> {
    if !sets.iter().any(SetScore::is_played) {
        return Err(ScoreError::NoPlayedSets);
    }
    let p1_sets = sets.iter().filter(|s| s.p1 > s.p2).count();
    let p2_sets = sets.iter().filter(|s| s.p2 > s.p1).count();
    Ok(match p1_sets.cmp(&p2_sets) {
        Ordering::Greater => MatchOutcome::Player1,
        Ordering::Less => MatchOutcome::Player2,
        Ordering::Equal => MatchOutcome::Undetermined,
    })
}
