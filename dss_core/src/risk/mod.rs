//! Point-based health risk prediction.
//!
//! Each scorer adds integer points for the risk factors it finds, maps the
//! total onto a [`RiskLevel`], and reports how much it trusts the result via
//! [`confidence_score`]. Scorers never fail: missing data simply contributes
//! no points.

mod cardiovascular;
mod diabetes;
mod weight;

pub use cardiovascular::{predict_cardiovascular_risk, CARDIOVASCULAR_ALGORITHM};
pub use diabetes::{predict_diabetes_risk, DIABETES_ALGORITHM};
pub use weight::{predict_weight_trend, WEIGHT_TREND_ALGORITHM};

use crate::{HealthMetric, HealthProfile};
use chrono::{DateTime, Duration, Months, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Age above which a person is counted as at risk
const AGE_RISK_THRESHOLD: u32 = 45;

const BASE_CONFIDENCE: f64 = 50.0;
const CONFIDENCE_PER_DATA_POINT: f64 = 5.0;
const MAX_DATA_POINT_CONFIDENCE: f64 = 25.0;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
    VeryHigh,
}

impl RiskLevel {
    /// Classify a point total: ≥60 VERY_HIGH, ≥40 HIGH, ≥20 MODERATE
    pub fn from_points(points: u32) -> Self {
        if points >= 60 {
            RiskLevel::VeryHigh
        } else if points >= 40 {
            RiskLevel::High
        } else if points >= 20 {
            RiskLevel::Moderate
        } else {
            RiskLevel::Low
        }
    }

    pub fn is_elevated(self) -> bool {
        self >= RiskLevel::High
    }

    fn label(self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Moderate => "MODERATE",
            RiskLevel::High => "HIGH",
            RiskLevel::VeryHigh => "VERY HIGH",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PredictionType {
    DiseaseRisk,
    HealthTrend,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WeightTrend {
    Up,
    Down,
    Stable,
}

impl std::fmt::Display for WeightTrend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WeightTrend::Up => write!(f, "UP"),
            WeightTrend::Down => write!(f, "DOWN"),
            WeightTrend::Stable => write!(f, "STABLE"),
        }
    }
}

/// A single risk prediction for the caller to persist
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RiskPrediction {
    pub id: Uuid,
    pub prediction_type: PredictionType,
    pub target_condition: String,
    /// Risk points for disease risks, absolute percent change for trends
    pub risk_score: f64,
    pub risk_level: RiskLevel,
    pub summary: String,
    pub risk_factors: Vec<String>,
    pub protective_factors: Vec<String>,
    pub recommendations: Vec<String>,
    pub algorithm: String,
    /// 0-100
    pub confidence_score: f64,
    /// Only set for weight trend predictions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trend: Option<WeightTrend>,
    pub predicted_at: DateTime<Utc>,
    pub valid_until: DateTime<Utc>,
}

/// Snapshot of everything the scorers read
#[derive(Clone, Copy, Debug)]
pub struct RiskContext<'a> {
    pub now: DateTime<Utc>,
    /// Age in whole years, when the date of birth is known
    pub age: Option<u32>,
    pub profile: Option<&'a HealthProfile>,
    /// Recent metrics, already limited to the look-back window
    pub metrics: &'a [HealthMetric],
}

/// Run every applicable scorer
///
/// Without a profile nothing is predicted. Cardiovascular and diabetes risk
/// are always produced; the weight trend only with enough weight readings.
pub fn predict_health_risks(ctx: &RiskContext<'_>) -> Vec<RiskPrediction> {
    let Some(profile) = ctx.profile else {
        tracing::warn!("No health profile available, skipping risk prediction");
        return Vec::new();
    };

    let mut predictions = vec![
        predict_cardiovascular_risk(profile, ctx.age, ctx.metrics, ctx.now),
        predict_diabetes_risk(profile, ctx.age, ctx.metrics, ctx.now),
    ];

    if let Some(trend) = predict_weight_trend(profile, ctx.metrics, ctx.now) {
        predictions.push(trend);
    }

    tracing::info!("Generated {} risk predictions", predictions.len());
    predictions
}

/// Confidence in a prediction, 0-100
///
/// Base 50, +5 per data point (at most +25), +10 when BMI is known and +5
/// each for known smoking status, exercise frequency and family history.
pub fn confidence_score(data_points: usize, profile: &HealthProfile) -> f64 {
    let mut confidence = BASE_CONFIDENCE;
    confidence += (data_points as f64 * CONFIDENCE_PER_DATA_POINT).min(MAX_DATA_POINT_CONFIDENCE);

    if profile.bmi.is_some() {
        confidence += 10.0;
    }
    if profile.smoking_status.is_some() {
        confidence += 5.0;
    }
    if profile.exercise_frequency.is_some() {
        confidence += 5.0;
    }
    if profile.family_medical_history.is_some() {
        confidence += 5.0;
    }

    confidence.min(100.0)
}

fn age_factor(age: Option<u32>) -> Option<String> {
    age.filter(|&a| a > AGE_RISK_THRESHOLD)
        .map(|a| format!("Age {} (over {})", a, AGE_RISK_THRESHOLD))
}

fn valid_until(now: DateTime<Utc>, months: u32) -> DateTime<Utc> {
    now.checked_add_months(Months::new(months))
        .unwrap_or_else(|| now + Duration::days(30 * i64::from(months)))
}
