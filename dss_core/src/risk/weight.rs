use super::{confidence_score, valid_until, PredictionType, RiskLevel, RiskPrediction, WeightTrend};
use crate::history::chronological_values;
use crate::{HealthMetric, HealthProfile, MetricType};
use chrono::{DateTime, Utc};
use uuid::Uuid;

pub const WEIGHT_TREND_ALGORITHM: &str = "Weight-Trend-Analysis-v1";

const MIN_READINGS: usize = 3;
const VALIDITY_MONTHS: u32 = 3;

/// Change in kg beyond which the trend is UP or DOWN
const TREND_THRESHOLD_KG: f64 = 2.0;

/// Change in kg beyond which the recommendations call the change significant
const SIGNIFICANT_CHANGE_KG: f64 = 5.0;

/// Analyze the weight trend from first to last reading
///
/// Returns `None` with fewer than three usable readings. Non-positive
/// weights are ignored. `risk_score` is the absolute percent change.
pub fn predict_weight_trend(
    profile: &HealthProfile,
    metrics: &[HealthMetric],
    now: DateTime<Utc>,
) -> Option<RiskPrediction> {
    let weights: Vec<f64> = chronological_values(metrics, MetricType::Weight)
        .into_iter()
        .filter(|&w| w > 0.0)
        .collect();

    if weights.len() < MIN_READINGS {
        tracing::debug!("Only {} weight readings, skipping trend", weights.len());
        return None;
    }

    let first = weights[0];
    let last = weights[weights.len() - 1];
    let change = last - first;
    let change_percent = change / first * 100.0;

    let trend = if change > TREND_THRESHOLD_KG {
        WeightTrend::Up
    } else if change < -TREND_THRESHOLD_KG {
        WeightTrend::Down
    } else {
        WeightTrend::Stable
    };

    let risk_level = if change_percent.abs() > 10.0 {
        RiskLevel::High
    } else if change_percent.abs() > 5.0 {
        RiskLevel::Moderate
    } else {
        RiskLevel::Low
    };

    let recommendations: Vec<String> = if change > SIGNIFICANT_CHANGE_KG {
        vec![
            "Significant weight gain - review your diet".to_string(),
            "Increase physical activity".to_string(),
        ]
    } else if change < -SIGNIFICANT_CHANGE_KG {
        vec![
            "Significant weight loss - look into the cause".to_string(),
            "Make sure you are eating enough".to_string(),
        ]
    } else {
        vec!["Weight is stable - keep it up".to_string()]
    };

    tracing::debug!(
        "Weight trend {}: {:+.1} kg ({:+.1}%)",
        trend,
        change,
        change_percent
    );

    Some(RiskPrediction {
        id: Uuid::new_v4(),
        prediction_type: PredictionType::HealthTrend,
        target_condition: "Weight trend".to_string(),
        risk_score: change_percent.abs(),
        risk_level,
        summary: format!(
            "Weight trend: {}\n\nChange: {:.1} kg ({:.1}%)\nOver {} readings",
            trend,
            change,
            change_percent,
            weights.len()
        ),
        risk_factors: Vec::new(),
        protective_factors: Vec::new(),
        recommendations,
        algorithm: WEIGHT_TREND_ALGORITHM.to_string(),
        confidence_score: confidence_score(weights.len(), profile),
        trend: Some(trend),
        predicted_at: now,
        valid_until: valid_until(now, VALIDITY_MONTHS),
    })
}
