use std::time::SystemTime;

/// Seconds between `started_at` and `now`, clamped to zero if the clock
/// went backwards.
pub fn elapsed_seconds(started_at: SystemTime, now: SystemTime) -> f64 {
    now.duration_since(started_at)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

/// Whole correctly-typed words per minute, rounded. Zero when no time has
/// elapsed so a first-instant sample never divides by zero.
pub fn words_per_minute(correct_count: usize, elapsed_secs: f64) -> f64 {
    if elapsed_secs <= 0.0 {
        return 0.0;
    }
    (correct_count as f64 / (elapsed_secs / 60.0)).round()
}

/// Percentage of correct answers, rounded to a whole number.
pub fn accuracy_percent(correct: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    ((correct as f64 / total as f64) * 100.0).round()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_elapsed_seconds() {
        let start = SystemTime::UNIX_EPOCH;
        let now = start + Duration::from_millis(2500);
        assert_eq!(elapsed_seconds(start, now), 2.5);
    }

    #[test]
    fn test_elapsed_seconds_clock_skew() {
        let start = SystemTime::UNIX_EPOCH + Duration::from_secs(10);
        let now = SystemTime::UNIX_EPOCH;
        assert_eq!(elapsed_seconds(start, now), 0.0);
    }

    #[test]
    fn test_wpm_zero_elapsed() {
        assert_eq!(words_per_minute(5, 0.0), 0.0);
        assert_eq!(words_per_minute(5, -1.0), 0.0);
    }

    #[test]
    fn test_wpm_basic() {
        // 10 words in 60 seconds
        assert_eq!(words_per_minute(10, 60.0), 10.0);
        // 10 words in 30 seconds
        assert_eq!(words_per_minute(10, 30.0), 20.0);
        // 3 words in 40 seconds is 4.5, f64::round goes half away from zero
        assert_eq!(words_per_minute(3, 40.0), 5.0);
    }

    #[test]
    fn test_wpm_monotone_in_correct_count() {
        let elapsed = 45.0;
        let mut prev = 0.0;
        for correct in 0..50 {
            let wpm = words_per_minute(correct, elapsed);
            assert!(wpm >= prev, "wpm must not decrease as correct count grows");
            prev = wpm;
        }
    }

    #[test]
    fn test_accuracy_percent() {
        assert_eq!(accuracy_percent(10, 10), 100.0);
        assert_eq!(accuracy_percent(3, 4), 75.0);
        assert_eq!(accuracy_percent(0, 4), 0.0);
    }

    #[test]
    fn test_accuracy_percent_empty_total() {
        assert_eq!(accuracy_percent(0, 0), 0.0);
    }
}
