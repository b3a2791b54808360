//! Pure metric computations

use chrono::{Days, NaiveDate};

/// Consecutive-day completion streak.
///
/// `completion_dates` is the distinct set of days with at least one
/// completion, sorted newest first. The streak is seeded at 1 from today
/// when today appears in the set (then scanning starts at yesterday);
/// otherwise scanning starts at today with streak 0. Each exact date match
/// extends the streak one day backward; the first gap stops the walk.
/// Dates newer than the cursor are skipped, older ones end the streak.
pub fn consecutive_streak(completion_dates: &[NaiveDate], today: NaiveDate) -> u32 {
    let mut streak: u32 = 0;
    let mut cursor = today;

    if completion_dates.first() == Some(&today) {
        streak = 1;
        cursor = today - Days::new(1);
    }

    for &day in completion_dates {
        if day == cursor {
            streak += 1;
            cursor = cursor - Days::new(1);
        } else if day < cursor {
            break;
        }
    }

    streak
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, day).unwrap()
    }

    #[test]
    fn test_streak_empty_is_zero() {
        assert_eq!(consecutive_streak(&[], d(20)), 0);
    }

    #[test]
    fn test_streak_three_days_with_gap() {
        // Completions today, -1, -2; gap at -3
        let dates = [d(20), d(19), d(18), d(16)];
        assert_eq!(consecutive_streak(&dates, d(20)), 3);
    }

    #[test]
    fn test_streak_nothing_today_counts_from_yesterday() {
        // No completion today: today itself is the first cursor, so
        // yesterday's run does not count
        let dates = [d(19), d(18)];
        assert_eq!(consecutive_streak(&dates, d(20)), 0);
    }

    #[test]
    fn test_streak_only_today() {
        assert_eq!(consecutive_streak(&[d(20)], d(20)), 1);
    }

    #[test]
    fn test_streak_unbroken_week() {
        let dates = [d(20), d(19), d(18), d(17), d(16), d(15), d(14)];
        assert_eq!(consecutive_streak(&dates, d(20)), 7);
    }

    #[test]
    fn test_streak_old_completions_ignored() {
        // A lone completion two weeks back contributes nothing
        let dates = [d(20), d(6)];
        assert_eq!(consecutive_streak(&dates, d(20)), 1);
    }
}
