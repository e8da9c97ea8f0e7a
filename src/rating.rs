//! Elo-style rating engine shared by the match declaration workflow.

/// Games played at or below this count keep a participant provisional.
pub const PROVISIONAL_GAMES: u32 = 50;
/// K-factor applied while a participant is still provisional.
pub const PROVISIONAL_K: f64 = 100.0;
/// K-factor applied once a participant is established.
pub const ESTABLISHED_K: f64 = 50.0;

/// Compute a participant's new rating after one completed match.
///
/// `opponent_rating` is the opposing team's average rating. Provisional
/// participants (`games_played <= 50`) move with K = 100 so early results
/// place them quickly; established participants move with K = 50. Rounding
/// is half-away-from-zero in both branches so a win and the mirror loss stay
/// symmetric within one point.
pub fn update_rating(my_rating: i32, opponent_rating: i32, games_played: u32, won: bool) -> i32 {
    let k = if games_played <= PROVISIONAL_GAMES {
        PROVISIONAL_K
    } else {
        ESTABLISHED_K
    };

    let exponent = f64::from(opponent_rating - my_rating) / 400.0;
    let expected = 1.0 / (1.0 + 10f64.powf(exponent));

    if won {
        my_rating + (k * (1.0 - expected)).round() as i32
    } else {
        my_rating - (k * expected).round() as i32
    }
}

/// Average rating of a team, rounded to the nearest integer.
///
/// Returns `None` for an empty member list so callers can decide how to
/// treat a degenerate team instead of dividing by zero.
pub fn team_average(ratings: &[i32]) -> Option<i32> {
    if ratings.is_empty() {
        return None;
    }
    let sum: i64 = ratings.iter().map(|rating| i64::from(*rating)).sum();
    Some((sum as f64 / ratings.len() as f64).round() as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn even_matchup_worked_example() {
        // expected = 0.5, provisional K = 100 -> +50 on a win.
        assert_eq!(update_rating(1200, 1200, 10, true), 1250);
        assert_eq!(update_rating(1200, 1200, 10, false), 1150);
    }

    #[test]
    fn provisional_threshold_is_inclusive_at_fifty() {
        assert_eq!(update_rating(1200, 1200, 50, true), 1250);
        assert_eq!(update_rating(1200, 1200, 51, true), 1225);
    }

    #[test]
    fn win_gain_shrinks_against_weaker_opponents() {
        let mut previous = i32::MAX;
        for opponent in [1500, 1400, 1300, 1200, 1100, 1000] {
            let gain = update_rating(1200, opponent, 10, true) - 1200;
            assert!(gain < previous, "gain against {opponent} should shrink");
            assert!(gain > 0);
            previous = gain;
        }
    }

    #[test]
    fn loss_penalty_grows_against_weaker_opponents() {
        let mut previous = 0;
        for opponent in [1500, 1400, 1300, 1200, 1100, 1000] {
            let penalty = 1200 - update_rating(1200, opponent, 10, false);
            assert!(penalty > previous, "penalty against {opponent} should grow");
            previous = penalty;
        }
    }

    #[test]
    fn win_and_loss_deltas_cancel_for_even_matchups() {
        for (mine, games) in [(900, 3), (1200, 20), (1340, 50), (1775, 120)] {
            let gain = update_rating(mine, mine, games, true) - mine;
            let penalty = mine - update_rating(mine, mine, games, false);
            assert!(
                (gain - penalty).abs() <= 1,
                "{mine} after {games} games: +{gain} vs -{penalty}"
            );
        }
    }

    #[test]
    fn mirrored_opponents_cancel_within_rounding() {
        // Beating an opponent `d` above cancels losing to one `d` below.
        for offset in [0, 40, 125, 300] {
            let gain = update_rating(1300, 1300 + offset, 20, true) - 1300;
            let penalty = 1300 - update_rating(1300, 1300 - offset, 20, false);
            assert!(
                (gain - penalty).abs() <= 1,
                "offset {offset}: +{gain} vs -{penalty}"
            );
        }
    }

    #[test]
    fn team_average_rounds_to_nearest() {
        assert_eq!(team_average(&[1200, 1300]), Some(1250));
        assert_eq!(team_average(&[1200, 1201]), Some(1201));
        assert_eq!(team_average(&[1500]), Some(1500));
        assert_eq!(team_average(&[]), None);
    }
}
