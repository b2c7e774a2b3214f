//! Persistent hypertension rule.

use super::{Rule, RuleFiring, Severity};
use crate::history::{average, most_recent_blood_pressure};
use crate::{HealthMetric, Result};

const REQUIRED_READINGS: usize = 3;
const SYSTOLIC_LIMIT: f64 = 140.0;
const DIASTOLIC_LIMIT: f64 = 90.0;

/// Fires when each of the three most recent blood pressure readings is
/// hypertensive (systolic ≥ 140 or diastolic ≥ 90). Always CRITICAL.
#[derive(Clone, Copy, Debug, Default)]
pub struct PersistentHypertensionRule;

impl PersistentHypertensionRule {
    pub const NAME: &'static str = "PERSISTENT_HYPERTENSION";
}

impl Rule<[HealthMetric]> for PersistentHypertensionRule {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn evaluate(&self, metrics: &[HealthMetric]) -> Result<Option<RuleFiring>> {
        let readings = most_recent_blood_pressure(metrics, REQUIRED_READINGS);

        if readings.len() < REQUIRED_READINGS {
            tracing::debug!(
                "Only {} blood pressure readings, need {}",
                readings.len(),
                REQUIRED_READINGS
            );
            return Ok(None);
        }

        let all_high = readings
            .iter()
            .all(|&(systolic, diastolic)| systolic >= SYSTOLIC_LIMIT || diastolic >= DIASTOLIC_LIMIT);
        if !all_high {
            return Ok(None);
        }

        let systolic: Vec<f64> = readings.iter().map(|r| r.0).collect();
        let diastolic: Vec<f64> = readings.iter().map(|r| r.1).collect();
        let avg_systolic = average(&systolic).unwrap_or_default();
        let avg_diastolic = average(&diastolic).unwrap_or_default();

        Ok(Some(RuleFiring::new(
            Severity::Critical,
            format!(
                "WARNING: blood pressure was high in each of the last 3 readings\n\
                 Average: {:.0}/{:.0} mmHg\n\
                 Recommendations:\n\
                 1. See a cardiologist within 1-2 weeks\n\
                 2. Cut salt intake (< 5 g/day)\n\
                 3. Increase physical activity\n\
                 4. Reduce stress and get enough sleep\n\
                 5. Limit alcohol\n\
                 6. Monitor blood pressure daily",
                avg_systolic, avg_diastolic
            ),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn readings(values: &[(f64, f64)]) -> Vec<HealthMetric> {
        let now = Utc::now();
        values
            .iter()
            .enumerate()
            .map(|(i, &(s, d))| HealthMetric::blood_pressure(s, d, now - Duration::days(i as i64)))
            .collect()
    }

    #[test]
    fn test_two_high_readings_never_fire() {
        let metrics = readings(&[(160.0, 100.0), (155.0, 98.0)]);
        let result = PersistentHypertensionRule.evaluate(metrics.as_slice()).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_three_high_readings_fire_with_average() {
        let metrics = readings(&[(150.0, 95.0), (140.0, 90.0), (160.0, 100.0)]);
        let firing = PersistentHypertensionRule.evaluate(metrics.as_slice()).unwrap().unwrap();

        assert_eq!(firing.severity, Severity::Critical);
        assert!(firing.recommendation.contains("150/95 mmHg"));
    }

    #[test]
    fn test_diastolic_alone_qualifies() {
        let metrics = readings(&[(130.0, 92.0), (128.0, 90.0), (135.0, 95.0)]);
        assert!(PersistentHypertensionRule.evaluate(metrics.as_slice()).unwrap().is_some());
    }

    #[test]
    fn test_one_normal_recent_reading_blocks() {
        let metrics = readings(&[(120.0, 80.0), (150.0, 95.0), (150.0, 95.0), (150.0, 95.0)]);
        assert!(PersistentHypertensionRule.evaluate(metrics.as_slice()).unwrap().is_none());
    }

    #[test]
    fn test_only_latest_three_considered() {
        // Oldest reading is normal but falls outside the window
        let metrics = readings(&[(145.0, 85.0), (141.0, 80.0), (150.0, 92.0), (110.0, 70.0)]);
        let firing = PersistentHypertensionRule.evaluate(metrics.as_slice()).unwrap().unwrap();
        assert!(firing.recommendation.contains("145/86 mmHg"));
    }

    #[test]
    fn test_incomplete_readings_ignored() {
        let mut metrics = readings(&[(150.0, 95.0), (150.0, 95.0), (150.0, 95.0)]);
        metrics[0].diastolic = None;
        assert!(PersistentHypertensionRule.evaluate(metrics.as_slice()).unwrap().is_none());
    }
}
