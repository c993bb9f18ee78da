//! Local fallback classifier.
//!
//! Used when the remote analysis endpoint is unreachable or returns an
//! unusable body. The fallback works only from average daily hours, so
//! it reports no weekday/weekend split (both sides equal the average)
//! and a stable trend.

use chrono::Utc;

use crate::models::analysis::{
    BehaviorCategory, MlAnalysisResult, PatternClassification, RiskLevel, Severity, Trend,
    UsageSummary, WeekdayWeekendSplit,
};
use crate::models::usage::UsageDayRecord;

const MS_PER_HOUR: f64 = 3_600_000.0;

/// Classifies usage history locally.
///
/// Buckets by average daily screen time in hours: below 2 light, below
/// 4 moderate, below 6 heavy, 6 and above excessive. An empty history
/// produces the "empty analysis" (zero days, light user, a single
/// start-tracking recommendation).
pub fn fallback_classification(records: &[UsageDayRecord]) -> MlAnalysisResult {
    if records.is_empty() {
        return empty_analysis();
    }

    let total_days = records.len();
    let hours: Vec<f64> = records
        .iter()
        .map(|r| r.total_screen_time_ms as f64 / MS_PER_HOUR)
        .collect();
    let avg = hours.iter().sum::<f64>() / total_days as f64;
    let max = hours.iter().cloned().fold(f64::MIN, f64::max);
    let min = hours.iter().cloned().fold(f64::MAX, f64::min);
    let avg_apps =
        records.iter().map(|r| r.app_count).sum::<usize>() as f64 / total_days as f64;

    let (category, severity, risk) = classify_average(avg);

    MlAnalysisResult {
        summary: UsageSummary {
            total_days,
            avg_daily_hours: avg,
            max_daily_hours: max,
            min_daily_hours: min,
            avg_apps_per_day: avg_apps,
        },
        pattern: PatternClassification {
            category,
            severity,
            risk,
            trend: Trend::Stable,
            trend_delta_hours: 0.0,
            consistency_score: 0.0,
            // The fallback has no per-day-of-week granularity
            weekday_vs_weekend: WeekdayWeekendSplit {
                weekday: avg,
                weekend: avg,
            },
        },
        prediction: None,
        recommendations: recommendations_for(category),
        generated_at: Utc::now(),
    }
}

fn classify_average(avg_hours: f64) -> (BehaviorCategory, Severity, RiskLevel) {
    if avg_hours < 2.0 {
        (BehaviorCategory::LightUser, Severity::Low, RiskLevel::Maintain)
    } else if avg_hours < 4.0 {
        (BehaviorCategory::ModerateUser, Severity::Low, RiskLevel::Monitor)
    } else if avg_hours < 6.0 {
        (BehaviorCategory::HeavyUser, Severity::Medium, RiskLevel::Reduce)
    } else {
        (
            BehaviorCategory::ExcessiveUser,
            Severity::High,
            RiskLevel::ImmediateAction,
        )
    }
}

fn recommendations_for(category: BehaviorCategory) -> Vec<String> {
    match category {
        BehaviorCategory::LightUser => {
            vec!["Your screen time is well balanced. Keep it up.".to_string()]
        }
        BehaviorCategory::ModerateUser => vec![
            "Usage is moderate. Watch for gradual increases.".to_string(),
        ],
        BehaviorCategory::HeavyUser => vec![
            "Consider scheduling phone-free blocks during the day.".to_string(),
            "Enable app limits for your most-used apps.".to_string(),
        ],
        BehaviorCategory::ExcessiveUser => vec![
            "Screen time is well above healthy levels.".to_string(),
            "Set a daily limit and enable bedtime mode.".to_string(),
            "Try replacing one evening session with an offline activity.".to_string(),
        ],
    }
}

fn empty_analysis() -> MlAnalysisResult {
    MlAnalysisResult {
        summary: UsageSummary {
            total_days: 0,
            avg_daily_hours: 0.0,
            max_daily_hours: 0.0,
            min_daily_hours: 0.0,
            avg_apps_per_day: 0.0,
        },
        pattern: PatternClassification {
            category: BehaviorCategory::LightUser,
            severity: Severity::Low,
            risk: RiskLevel::Maintain,
            trend: Trend::Stable,
            trend_delta_hours: 0.0,
            consistency_score: 0.0,
            weekday_vs_weekend: WeekdayWeekendSplit {
                weekday: 0.0,
                weekend: 0.0,
            },
        },
        prediction: None,
        recommendations: vec!["Start tracking your usage".to_string()],
        generated_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(hours: f64) -> UsageDayRecord {
        UsageDayRecord {
            date: NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
            hour: 0,
            total_screen_time_ms: (hours * MS_PER_HOUR) as i64,
            top_app_package: "com.example.app".to_string(),
            top_app_time_ms: 0,
            app_count: 10,
            day_of_week: 1,
            is_weekend: false,
        }
    }

    #[test]
    fn test_empty_history_short_circuits() {
        let result = fallback_classification(&[]);
        assert_eq!(result.summary.total_days, 0);
        assert_eq!(result.pattern.category, BehaviorCategory::LightUser);
        assert_eq!(result.recommendations, vec!["Start tracking your usage"]);
    }

    #[test]
    fn test_bucket_boundaries() {
        let light = fallback_classification(&[record(1.9)]);
        assert_eq!(light.pattern.category, BehaviorCategory::LightUser);
        assert_eq!(light.pattern.risk, RiskLevel::Maintain);

        let moderate = fallback_classification(&[record(2.0)]);
        assert_eq!(moderate.pattern.category, BehaviorCategory::ModerateUser);
        assert_eq!(moderate.pattern.risk, RiskLevel::Monitor);

        let heavy = fallback_classification(&[record(4.0)]);
        assert_eq!(heavy.pattern.category, BehaviorCategory::HeavyUser);
        assert_eq!(heavy.pattern.severity, Severity::Medium);

        let excessive = fallback_classification(&[record(6.0)]);
        assert_eq!(excessive.pattern.category, BehaviorCategory::ExcessiveUser);
        assert_eq!(excessive.pattern.risk, RiskLevel::ImmediateAction);
    }

    #[test]
    fn test_fallback_reports_flat_split_and_stable_trend() {
        let result = fallback_classification(&[record(3.0), record(5.0)]);
        let avg = result.summary.avg_daily_hours;
        assert_eq!(result.pattern.weekday_vs_weekend.weekday, avg);
        assert_eq!(result.pattern.weekday_vs_weekend.weekend, avg);
        assert_eq!(result.pattern.trend, Trend::Stable);
        assert!(result.prediction.is_none());
    }

    #[test]
    fn test_summary_statistics() {
        let result = fallback_classification(&[record(2.0), record(6.0), record(4.0)]);
        assert_eq!(result.summary.total_days, 3);
        assert!((result.summary.avg_daily_hours - 4.0).abs() < 1e-9);
        assert!((result.summary.max_daily_hours - 6.0).abs() < 1e-9);
        assert!((result.summary.min_daily_hours - 2.0).abs() < 1e-9);
        assert!((result.summary.avg_apps_per_day - 10.0).abs() < 1e-9);
    }
}
