//! ML analysis result and insight models.
//!
//! `MlAnalysisResult` mirrors the JSON body returned by the remote
//! `/ml/analyze` endpoint; the local fallback classifier produces the
//! same shape.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Behavior category assigned by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BehaviorCategory {
    LightUser,
    ModerateUser,
    HeavyUser,
    ExcessiveUser,
}

/// Severity of the classified pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// Recommended course of action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Maintain,
    Monitor,
    Reduce,
    ImmediateAction,
}

/// Direction of the screen-time trend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Increasing,
    Decreasing,
    Stable,
}

/// Summary statistics over the analyzed history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageSummary {
    pub total_days: usize,
    /// Average daily screen time in hours
    pub avg_daily_hours: f64,
    pub max_daily_hours: f64,
    pub min_daily_hours: f64,
    pub avg_apps_per_day: f64,
}

/// Average screen time split by weekday vs weekend, in hours.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekdayWeekendSplit {
    pub weekday: f64,
    pub weekend: f64,
}

/// Pattern classification produced by the model (or fallback).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternClassification {
    pub category: BehaviorCategory,
    pub severity: Severity,
    pub risk: RiskLevel,
    pub trend: Trend,
    /// Hour delta behind the trend label (positive = increasing)
    pub trend_delta_hours: f64,
    /// 0.0..=1.0; higher means more day-to-day variance
    pub consistency_score: f64,
    pub weekday_vs_weekend: WeekdayWeekendSplit,
}

/// Optional 7-day forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekPrediction {
    /// Predicted average daily hours for the coming week
    pub avg_daily_hours: f64,
    /// Predicted change vs the observed average, in percent
    pub change_percent: f64,
}

/// Complete analysis result. Replaced wholesale on refresh, never merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MlAnalysisResult {
    pub summary: UsageSummary,
    pub pattern: PatternClassification,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prediction: Option<WeekPrediction>,
    pub recommendations: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

/// Severity of a derived insight, in notification priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightSeverity {
    Critical,
    Warning,
    Info,
    Success,
}

impl InsightSeverity {
    /// Sort key: lower sorts first.
    pub fn priority(&self) -> u8 {
        match self {
            InsightSeverity::Critical => 0,
            InsightSeverity::Warning => 1,
            InsightSeverity::Info => 2,
            InsightSeverity::Success => 3,
        }
    }
}

/// A human-readable observation derived from an analysis result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    pub severity: InsightSeverity,
    pub title: String,
    pub body: String,
    pub action_required: bool,
}
