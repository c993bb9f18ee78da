//! Realtime insight derivation.
//!
//! Each rule is an independent check against the latest analysis
//! result and today's usage; rules that match contribute one insight.
//! The final list is sorted by severity priority with a stable sort,
//! so insights of equal severity keep their generation order.

use crate::models::analysis::{
    Insight, InsightSeverity, MlAnalysisResult, Severity, Trend,
};

const MS_PER_HOUR: f64 = 3_600_000.0;

/// Today's usage as seen by the insight rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct CurrentUsage {
    pub total_time_ms: i64,
}

/// Derives zero or more insights from an analysis result.
///
/// Pure: neither input is mutated and no storage is touched. With no
/// analysis available, no insights are produced.
pub fn realtime_insights(
    current: CurrentUsage,
    analysis: Option<&MlAnalysisResult>,
) -> Vec<Insight> {
    let Some(analysis) = analysis else {
        return Vec::new();
    };

    let mut insights = Vec::new();
    let pattern = &analysis.pattern;
    let summary = &analysis.summary;

    if pattern.severity == Severity::High {
        insights.push(Insight {
            severity: InsightSeverity::Critical,
            title: "Screen time needs attention".to_string(),
            body: "Your usage pattern is classified as high severity. Consider immediate limits.".to_string(),
            action_required: true,
        });
    }

    if summary.avg_daily_hours >= 6.0 {
        insights.push(Insight {
            severity: InsightSeverity::Warning,
            title: "High daily average".to_string(),
            body: format!(
                "You average {:.1} hours of screen time per day.",
                summary.avg_daily_hours
            ),
            action_required: true,
        });
    }

    if pattern.trend == Trend::Increasing && pattern.trend_delta_hours > 0.5 {
        insights.push(Insight {
            severity: InsightSeverity::Warning,
            title: "Usage is trending up".to_string(),
            body: format!(
                "Screen time grew by {:.1} hours over the analyzed period.",
                pattern.trend_delta_hours
            ),
            action_required: false,
        });
    }

    if pattern.severity == Severity::Low && pattern.trend == Trend::Decreasing {
        insights.push(Insight {
            severity: InsightSeverity::Success,
            title: "Great progress".to_string(),
            body: "Your screen time is low and still decreasing.".to_string(),
            action_required: false,
        });
    }

    if pattern.consistency_score > 0.5 {
        insights.push(Insight {
            severity: InsightSeverity::Info,
            title: "Inconsistent daily usage".to_string(),
            body: "Your screen time varies a lot from day to day. A routine can help.".to_string(),
            action_required: false,
        });
    }

    let split = &pattern.weekday_vs_weekend;
    if (split.weekday - split.weekend).abs() > 2.0 {
        let (higher, lower) = if split.weekend > split.weekday {
            ("weekends", "weekdays")
        } else {
            ("weekdays", "weekends")
        };
        insights.push(Insight {
            severity: InsightSeverity::Info,
            title: "Weekday/weekend imbalance".to_string(),
            body: format!("You spend noticeably more time on {} than {}.", higher, lower),
            action_required: false,
        });
    }

    if let Some(prediction) = &analysis.prediction {
        if prediction.change_percent > 10.0 {
            insights.push(Insight {
                severity: InsightSeverity::Warning,
                title: "Usage predicted to rise".to_string(),
                body: format!(
                    "Next week's screen time is predicted to rise by {:.0}%.",
                    prediction.change_percent
                ),
                action_required: false,
            });
        }
    }

    let today_hours = current.total_time_ms as f64 / MS_PER_HOUR;
    if summary.avg_daily_hours > 0.0 && today_hours > summary.avg_daily_hours * 1.5 {
        insights.push(Insight {
            severity: InsightSeverity::Warning,
            title: "Unusually heavy day".to_string(),
            body: format!(
                "Today's {:.1}h is more than 1.5x your usual {:.1}h.",
                today_hours, summary.avg_daily_hours
            ),
            action_required: false,
        });
    }

    insights.sort_by_key(|i| i.severity.priority());
    insights
}
