mod score;
pub mod stats;

pub use score::{MatchOutcome, RawSetScore, ScoreError, SetScore, derive_outcome};

pub type PlayerId = i64;
