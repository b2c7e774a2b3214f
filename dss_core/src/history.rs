//! Metric history helpers shared by the threshold rules and risk scorers.
//!
//! Readings whose required fields are missing or non-finite are skipped,
//! so callers only ever see usable numbers.

use crate::{HealthMetric, MetricType};

fn usable(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

/// Readings of one type, newest first (stable for equal timestamps)
fn newest_first(metrics: &[HealthMetric], metric_type: MetricType) -> Vec<&HealthMetric> {
    let mut readings: Vec<_> = metrics
        .iter()
        .filter(|m| m.metric_type == metric_type)
        .collect();
    readings.sort_by(|a, b| b.measured_at.cmp(&a.measured_at));
    readings
}

/// Up to `limit` most recent single-value readings of `metric_type`
pub fn most_recent_values(
    metrics: &[HealthMetric],
    metric_type: MetricType,
    limit: usize,
) -> Vec<f64> {
    newest_first(metrics, metric_type)
        .into_iter()
        .filter_map(|m| usable(m.value))
        .take(limit)
        .collect()
}

/// Up to `limit` most recent blood pressure readings carrying both values
pub fn most_recent_blood_pressure(metrics: &[HealthMetric], limit: usize) -> Vec<(f64, f64)> {
    newest_first(metrics, MetricType::BloodPressure)
        .into_iter()
        .filter_map(|m| Some((usable(m.systolic)?, usable(m.diastolic)?)))
        .take(limit)
        .collect()
}

/// Up to `limit` most recent systolic values (diastolic may be missing)
pub fn most_recent_systolic(metrics: &[HealthMetric], limit: usize) -> Vec<f64> {
    newest_first(metrics, MetricType::BloodPressure)
        .into_iter()
        .filter_map(|m| usable(m.systolic))
        .take(limit)
        .collect()
}

/// All single-value readings of `metric_type`, oldest first
pub fn chronological_values(metrics: &[HealthMetric], metric_type: MetricType) -> Vec<f64> {
    let mut readings: Vec<_> = metrics
        .iter()
        .filter(|m| m.metric_type == metric_type)
        .filter_map(|m| usable(m.value).map(|v| (m.measured_at, v)))
        .collect();
    readings.sort_by(|a, b| a.0.cmp(&b.0));
    readings.into_iter().map(|(_, v)| v).collect()
}

/// Arithmetic mean, `None` for an empty slice
pub fn average(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    #[test]
    fn test_most_recent_values_newest_first() {
        let now = Utc::now();
        let metrics = vec![
            HealthMetric::reading(MetricType::BloodSugar, 90.0, now - Duration::days(3)),
            HealthMetric::reading(MetricType::BloodSugar, 110.0, now),
            HealthMetric::reading(MetricType::Weight, 80.0, now),
            HealthMetric::reading(MetricType::BloodSugar, 100.0, now - Duration::days(1)),
            HealthMetric::reading(MetricType::BloodSugar, 70.0, now - Duration::days(9)),
        ];

        let values = most_recent_values(&metrics, MetricType::BloodSugar, 3);
        assert_eq!(values, vec![110.0, 100.0, 90.0]);
    }

    #[test]
    fn test_missing_and_non_finite_values_skipped() {
        let now = Utc::now();
        let mut missing = HealthMetric::reading(MetricType::BloodSugar, 0.0, now);
        missing.value = None;
        let metrics = vec![
            missing,
            HealthMetric::reading(MetricType::BloodSugar, f64::NAN, now),
            HealthMetric::reading(MetricType::BloodSugar, 95.0, now - Duration::hours(1)),
        ];

        assert_eq!(most_recent_values(&metrics, MetricType::BloodSugar, 3), vec![95.0]);
    }

    #[test]
    fn test_blood_pressure_requires_both_values() {
        let now = Utc::now();
        let mut partial = HealthMetric::blood_pressure(150.0, 95.0, now);
        partial.diastolic = None;
        let metrics = vec![
            partial,
            HealthMetric::blood_pressure(130.0, 85.0, now - Duration::days(1)),
        ];

        assert_eq!(most_recent_blood_pressure(&metrics, 3), vec![(130.0, 85.0)]);
        assert_eq!(most_recent_systolic(&metrics, 3), vec![150.0, 130.0]);
    }

    #[test]
    fn test_chronological_values() {
        let now = Utc::now();
        let metrics = vec![
            HealthMetric::reading(MetricType::Weight, 83.0, now),
            HealthMetric::reading(MetricType::Weight, 80.0, now - Duration::days(60)),
            HealthMetric::reading(MetricType::Weight, 81.0, now - Duration::days(30)),
        ];

        assert_eq!(
            chronological_values(&metrics, MetricType::Weight),
            vec![80.0, 81.0, 83.0]
        );
    }

    #[test]
    fn test_average() {
        assert_eq!(average(&[]), None);
        assert_eq!(average(&[140.0, 150.0, 160.0]), Some(150.0));
    }
}
