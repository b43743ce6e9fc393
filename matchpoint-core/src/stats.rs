//! Pure derivation of aggregate views from a player's match list. Every
//! function takes the caller-fetched matches for one player; nothing here
//! mutates, caches or performs I/O, so calls are safe to repeat and to run
//! concurrently with unrelated writes.

use chrono::{DateTime, Utc};

use crate::{MatchOutcome, PlayerId, SetScore};

/// The slice of a stored match that statistics derivation needs.
#[derive(Clone, Debug)]
pub struct MatchSummary {
    pub player1: PlayerId,
    pub player2: PlayerId,
    pub outcome: MatchOutcome,
    pub sets: Vec<SetScore>,
    pub date: DateTime<Utc>,
}

impl MatchSummary {
    fn opponent_of(&self, player: PlayerId) -> Option<PlayerId> {
        if self.player1 == player {
            Some(self.player2)
        } else if self.player2 == player {
            Some(self.player1)
        } else {
            None
        }
    }

    /// `Some(true)` for a win, `Some(false)` for a loss, `None` when the
    /// outcome is undetermined or the player did not participate.
    fn won_by(&self, player: PlayerId) -> Option<bool> {
        self.opponent_of(player)?;
        self.outcome
            .winner_of(self.player1, self.player2)
            .map(|winner| winner == player)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StreakKind {
    Win,
    Loss,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Streak {
    pub length: u32,
    pub kind: StreakKind,
}

impl Streak {
    fn none() -> Self {
        Self {
            length: 0,
            kind: StreakKind::Win,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OpponentCount {
    pub opponent: PlayerId,
    pub count: u32,
}

/// Won matches over total matches as a percent rounded to the nearest
/// integer. 0 for an empty list.
pub fn win_rate(player: PlayerId, matches: &[MatchSummary]) -> u32 {
    if matches.is_empty() {
        return 0;
    }
    let wins = matches
        .iter()
        .filter(|m| m.won_by(player) == Some(true))
        .count();
    ((wins * 100) as f64 / matches.len() as f64).round() as u32
}

/// Walks backward from the most recent match, counting consecutive matches
/// with the same outcome as the latest one. `matches` must be sorted
/// chronologically ascending. An undetermined outcome carries no win or loss
/// for the player and therefore ends the walk.
pub fn current_streak(player: PlayerId, matches: &[MatchSummary]) -> Streak {
    let mut iter = matches.iter().rev();
    let Some(latest_won) = iter.next().and_then(|m| m.won_by(player)) else {
        return Streak::none();
    };
    let mut length = 1;
    for m in iter {
        if m.won_by(player) != Some(latest_won) {
            break;
        }
        length += 1;
    }
    Streak {
        length,
        kind: if latest_won {
            StreakKind::Win
        } else {
            StreakKind::Loss
        },
    }
}

/// Longest run of consecutive wins anywhere in the (chronological) history.
/// Single forward pass; the running counter resets on any non-win.
pub fn longest_win_streak(player: PlayerId, matches: &[MatchSummary]) -> u32 {
    let mut longest = 0;
    let mut current = 0;
    for m in matches {
        if m.won_by(player) == Some(true) {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}

/// Opponents ranked by how often they appear in the match list, descending.
/// Ties keep first-encounter order (the sort is stable over a list built in
/// encounter order).
pub fn frequent_opponents(
    player: PlayerId,
    matches: &[MatchSummary],
    top_n: usize,
) -> Vec<OpponentCount> {
    let mut counts: Vec<OpponentCount> = Vec::new();
    for m in matches {
        let Some(opponent) = m.opponent_of(player) else {
            continue;
        };
        match counts.iter_mut().find(|c| c.opponent == opponent) {
            Some(entry) => entry.count += 1,
            None => counts.push(OpponentCount { opponent, count: 1 }),
        }
    }
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(top_n);
    counts
}

/// Sets won by the player across all matches over total sets played, as a
/// percent rounded to the nearest integer. A set is won when the player's
/// side strictly exceeds the opponent's.
pub fn set_win_rate(player: PlayerId, matches: &[MatchSummary]) -> u32 {
    let mut won = 0u32;
    let mut total = 0u32;
    for m in matches {
        if m.opponent_of(player).is_none() {
            continue;
        }
        let plays_as_p1 = m.player1 == player;
        for set in &m.sets {
            let (own, other) = if plays_as_p1 {
                (set.p1, set.p2)
            } else {
                (set.p2, set.p1)
            };
            total += 1;
            if own > other {
                won += 1;
            }
        }
    }
    if total == 0 {
        return 0;
    }
    ((won * 100) as f64 / total as f64).round() as u32
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    const ME: PlayerId = 1;

    fn fixture(days_ago: i64, opponent: PlayerId, won: Option<bool>) -> MatchSummary {
        let outcome = match won {
            Some(true) => MatchOutcome::Player1,
            Some(false) => MatchOutcome::Player2,
            None => MatchOutcome::Undetermined,
        };
        MatchSummary {
            player1: ME,
            player2: opponent,
            outcome,
            sets: vec![SetScore::new(6, 4)],
            date: Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap() - chrono::Duration::days(days_ago),
        }
    }

    fn sequence(outcomes: &[bool]) -> Vec<MatchSummary> {
        outcomes
            .iter()
            .enumerate()
            .map(|(i, &won)| fixture((outcomes.len() - i) as i64, 2, Some(won)))
            .collect()
    }

    #[test]
    fn test_win_rate() {
        assert_eq!(win_rate(ME, &[]), 0);
        let matches = sequence(&[true, true, false]);
        assert_eq!(win_rate(ME, &matches), 67);
        let matches = sequence(&[false, false]);
        assert_eq!(win_rate(ME, &matches), 0);
        let matches = sequence(&[true]);
        assert_eq!(win_rate(ME, &matches), 100);
    }

    #[test]
    fn test_current_streak() {
        // W W L W W W, most recent last
        let matches = sequence(&[true, true, false, true, true, true]);
        assert_eq!(
            current_streak(ME, &matches),
            Streak {
                length: 3,
                kind: StreakKind::Win
            }
        );

        let matches = sequence(&[true, false, false]);
        assert_eq!(
            current_streak(ME, &matches),
            Streak {
                length: 2,
                kind: StreakKind::Loss
            }
        );

        assert_eq!(current_streak(ME, &[]).length, 0);
    }

    #[test]
    fn test_current_streak_stops_at_undetermined() {
        let mut matches = sequence(&[true, true]);
        matches.insert(1, fixture(1, 2, None));
        // W U W chronologically: only the latest win counts
        assert_eq!(
            current_streak(ME, &matches),
            Streak {
                length: 1,
                kind: StreakKind::Win
            }
        );

        let matches = vec![fixture(0, 2, None)];
        assert_eq!(current_streak(ME, &matches).length, 0);
    }

    #[test]
    fn test_longest_win_streak() {
        let matches = sequence(&[true, true, false, true, true, true]);
        assert_eq!(longest_win_streak(ME, &matches), 3);

        let matches = sequence(&[false, false]);
        assert_eq!(longest_win_streak(ME, &matches), 0);
    }

    #[test]
    fn test_frequent_opponents() {
        let matches = vec![
            fixture(4, 7, Some(true)),
            fixture(3, 9, Some(false)),
            fixture(2, 7, Some(true)),
            fixture(1, 7, Some(false)),
        ];
        let top = frequent_opponents(ME, &matches, 1);
        assert_eq!(
            top,
            vec![OpponentCount {
                opponent: 7,
                count: 3
            }]
        );
    }

    #[test]
    fn test_frequent_opponents_tie_keeps_first_encounter_order() {
        let matches = vec![
            fixture(4, 5, Some(true)),
            fixture(3, 8, Some(true)),
            fixture(2, 5, Some(true)),
            fixture(1, 8, Some(true)),
        ];
        let top = frequent_opponents(ME, &matches, 2);
        assert_eq!(top[0].opponent, 5);
        assert_eq!(top[1].opponent, 8);
    }

    #[test]
    fn test_set_win_rate() {
        let mut m1 = fixture(2, 2, Some(true));
        m1.sets = vec![SetScore::new(6, 3), SetScore::new(6, 4)];
        // Played as player2: own side is p2
        let m2 = MatchSummary {
            player1: 2,
            player2: ME,
            outcome: MatchOutcome::Player1,
            sets: vec![SetScore::new(6, 4), SetScore::new(7, 5)],
            date: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        };
        // 2 sets won out of 4 played
        assert_eq!(set_win_rate(ME, &[m1, m2]), 50);
        assert_eq!(set_win_rate(ME, &[]), 0);
    }
}
