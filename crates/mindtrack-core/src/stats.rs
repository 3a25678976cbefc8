use chrono::{DateTime, FixedOffset, NaiveDate};
use mindtrack_model::journal::{JournalEntry, Mood};
use mindtrack_model::stats::{MoodCount, MoodStats, TrendPoint};
use mindtrack_utils::date::local_day;
use std::collections::HashSet;

/// Number of mood-bearing entries shown in the trend.
pub const TREND_LENGTH: usize = 14;

/// Compute all statistics. Calendar days are taken in the offset of `now`.
#[must_use]
pub fn compute_mood_stats(entries: &[JournalEntry], now: DateTime<FixedOffset>) -> MoodStats {
    MoodStats {
        total_entries: entries.len(),
        entries_with_mood: entries.iter().filter(|entry| entry.mood.is_some()).count(),
        average_mood: average_mood(entries),
        current_streak: current_streak(entries, now),
        trend: mood_trend(entries, TREND_LENGTH),
        distribution: mood_distribution(entries),
    }
}

/// Mean mood of all mood-bearing entries rounded to one decimal, 0 if there are none.
#[must_use]
pub fn average_mood(entries: &[JournalEntry]) -> f64 {
    let moods = entries
        .iter()
        .filter_map(|entry| entry.mood)
        .map(|mood| f64::from(mood.value()))
        .collect::<Vec<_>>();
    if moods.is_empty() {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let average = moods.iter().sum::<f64>() / moods.len() as f64;
    (average * 10.0).round() / 10.0
}

/// Consecutive days with at least one entry, counted backwards from today. Stops at the
/// first day without an entry, so a missing entry today gives 0.
#[must_use]
pub fn current_streak(entries: &[JournalEntry], now: DateTime<FixedOffset>) -> u32 {
    let offset = now.timezone();
    let days = entries
        .iter()
        .map(|entry| local_day(entry.created_at, offset))
        .collect::<HashSet<NaiveDate>>();

    let mut streak = 0;
    let mut day = Some(now.date_naive());
    while let Some(current) = day.filter(|day| days.contains(day)) {
        streak += 1;
        day = current.pred_opt();
    }
    streak
}

/// The `length` most recent mood-bearing entries, oldest first.
#[must_use]
pub fn mood_trend(entries: &[JournalEntry], length: usize) -> Vec<TrendPoint> {
    let mut points = entries
        .iter()
        .filter_map(|entry| {
            entry.mood.map(|mood| TrendPoint {
                entry_id: entry.id,
                created_at: entry.created_at,
                mood,
            })
        })
        .collect::<Vec<_>>();
    points.sort_by_key(|point| point.created_at);
    let skip = points.len().saturating_sub(length);
    points.split_off(skip)
}

/// Number of entries per mood, one element for every mood from 1 to 5.
#[must_use]
pub fn mood_distribution(entries: &[JournalEntry]) -> Vec<MoodCount> {
    Mood::all()
        .map(|mood| MoodCount {
            mood,
            label: mood.label().to_owned(),
            emoji: mood.emoji().to_owned(),
            count: entries.iter().filter(|entry| entry.mood == Some(mood)).count(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::entry_at;
    use chrono::Duration;

    fn now() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2024-05-10T18:00:00+02:00").unwrap()
    }

    #[test]
    fn test_average_mood() {
        let entries = [
            entry_at(now(), Some(5)),
            entry_at(now(), Some(3)),
            entry_at(now(), Some(4)),
            entry_at(now(), None),
        ];
        assert!((average_mood(&entries) - 4.0).abs() < f64::EPSILON);
        assert!(average_mood(&[entry_at(now(), None)]).abs() < f64::EPSILON);
        assert!(average_mood(&[]).abs() < f64::EPSILON);

        let entries = [entry_at(now(), Some(4)), entry_at(now(), Some(4)), entry_at(now(), Some(5))];
        assert!((average_mood(&entries) - 4.3).abs() < 1e-9);
    }

    #[test]
    fn test_streak() {
        let entries = [
            entry_at(now(), Some(3)),
            entry_at(now() - Duration::hours(2), None),
            entry_at(now() - Duration::days(1), None),
            entry_at(now() - Duration::days(3), Some(2)),
        ];
        assert_eq!(current_streak(&entries, now()), 2);
        assert_eq!(current_streak(&[entry_at(now() - Duration::days(3), None)], now()), 0);
        assert_eq!(current_streak(&[], now()), 0);
    }

    #[test]
    fn test_streak_uses_local_days() {
        // 23:30 UTC on the 9th is already the 10th at +02:00
        let late = DateTime::parse_from_rfc3339("2024-05-09T23:30:00Z").unwrap();
        assert_eq!(current_streak(&[entry_at(late, None)], now()), 1);
    }

    #[test]
    fn test_trend() {
        let entries = (0..20)
            .map(|days| entry_at(now() - Duration::days(days), Some(1 + (days % 5) as i16)))
            .chain([entry_at(now(), None)])
            .collect::<Vec<_>>();
        let trend = mood_trend(&entries, TREND_LENGTH);
        assert_eq!(trend.len(), TREND_LENGTH);
        assert!(trend.windows(2).all(|pair| pair[0].created_at <= pair[1].created_at));
        assert_eq!(trend.last().map(|point| point.created_at), Some(now()));
        assert_eq!(trend[0].created_at, now() - Duration::days(13));

        assert_eq!(mood_trend(&entries[..3], TREND_LENGTH).len(), 3);
    }

    #[test]
    fn test_distribution() {
        let entries = [entry_at(now(), Some(5)), entry_at(now(), Some(5)), entry_at(now(), Some(1)), entry_at(now(), None)];
        let distribution = mood_distribution(&entries);
        assert_eq!(distribution.len(), 5);
        assert_eq!(distribution[0].count, 1);
        assert_eq!(distribution[0].label, "Very Sad");
        assert_eq!(distribution[2].count, 0);
        assert_eq!(distribution[4].count, 2);
        assert_eq!(distribution[4].emoji, "😄");
    }

    #[test]
    fn test_compute() {
        let entries = [entry_at(now(), Some(2)), entry_at(now() - Duration::days(1), None)];
        let stats = compute_mood_stats(&entries, now());
        assert_eq!(stats.total_entries, 2);
        assert_eq!(stats.entries_with_mood, 1);
        assert_eq!(stats.current_streak, 2);
        assert_eq!(stats.trend.len(), 1);
    }
}
