//! Blood sugar trend rule.

use super::{Rule, RuleFiring, Severity};
use crate::history::{average, most_recent_values};
use crate::{HealthMetric, MetricType, Result};

const WINDOW: usize = 3;
const MIN_READINGS: usize = 2;

/// Averages up to three recent blood sugar readings (mg/dL)
///
/// Needs at least two readings. ≥ 200 is CRITICAL, 126–200 WARNING
/// (diabetes risk), 100–126 WARNING (pre-diabetes), below 100 silent.
#[derive(Clone, Copy, Debug, Default)]
pub struct BloodSugarRule;

impl BloodSugarRule {
    pub const NAME: &'static str = "BLOOD_SUGAR_EVALUATION";

    /// Classify an averaged blood sugar value
    pub fn assess(avg: f64) -> Option<RuleFiring> {
        if avg >= 200.0 {
            Some(RuleFiring::new(
                Severity::Critical,
                format!(
                    "WARNING: very high blood sugar\n\
                     Average: {:.0} mg/dL\n\
                     Recommendations:\n\
                     1. SEE A DOCTOR IMMEDIATELY\n\
                     2. Get tested for diabetes\n\
                     3. Medication may be needed\n\
                     4. Monitor blood sugar daily",
                    avg
                ),
            ))
        } else if avg >= 126.0 {
            Some(RuleFiring::new(
                Severity::Warning,
                format!(
                    "High blood sugar - diabetes risk\n\
                     Average: {:.0} mg/dL\n\
                     Recommendations:\n\
                     1. See a doctor for a diabetes check\n\
                     2. Cut sugar and refined carbohydrates\n\
                     3. Increase physical activity\n\
                     4. Lose weight if overweight\n\
                     5. Monitor blood sugar regularly",
                    avg
                ),
            ))
        } else if avg >= 100.0 {
            Some(RuleFiring::new(
                Severity::Warning,
                format!(
                    "Pre-diabetes\n\
                     Average: {:.0} mg/dL\n\
                     Recommendations:\n\
                     1. Change lifestyle now to prevent diabetes\n\
                     2. Lose 5-10% of body weight\n\
                     3. Exercise 30 minutes a day\n\
                     4. Eat more greens, less sugar\n\
                     5. Re-test in 3-6 months",
                    avg
                ),
            ))
        } else {
            None
        }
    }
}

impl Rule<[HealthMetric]> for BloodSugarRule {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn evaluate(&self, metrics: &[HealthMetric]) -> Result<Option<RuleFiring>> {
        let readings = most_recent_values(metrics, MetricType::BloodSugar, WINDOW);

        if readings.len() < MIN_READINGS {
            tracing::debug!("Only {} blood sugar readings, need {}", readings.len(), MIN_READINGS);
            return Ok(None);
        }

        Ok(average(&readings).and_then(Self::assess))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn readings(values: &[f64]) -> Vec<HealthMetric> {
        let now = Utc::now();
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| {
                HealthMetric::reading(MetricType::BloodSugar, v, now - Duration::days(i as i64))
            })
            .collect()
    }

    fn severity_for(values: &[f64]) -> Option<Severity> {
        BloodSugarRule
            .evaluate(readings(values).as_slice())
            .unwrap()
            .map(|f| f.severity)
    }

    #[test]
    fn test_single_reading_never_fires() {
        assert_eq!(severity_for(&[250.0]), None);
    }

    #[test]
    fn test_critical_average() {
        assert_eq!(severity_for(&[210.0, 195.0, 200.0]), Some(Severity::Critical));
    }

    #[test]
    fn test_diabetes_risk_tier() {
        let firing = BloodSugarRule
            .evaluate(readings(&[130.0, 140.0]).as_slice())
            .unwrap()
            .unwrap();
        assert_eq!(firing.severity, Severity::Warning);
        assert!(firing.recommendation.contains("diabetes risk"));
        assert!(firing.recommendation.contains("135 mg/dL"));
    }

    #[test]
    fn test_pre_diabetes_tier() {
        let firing = BloodSugarRule
            .evaluate(readings(&[105.0, 110.0, 100.0]).as_slice())
            .unwrap()
            .unwrap();
        assert_eq!(firing.severity, Severity::Warning);
        assert!(firing.recommendation.starts_with("Pre-diabetes"));
    }

    #[test]
    fn test_normal_average_silent() {
        assert_eq!(severity_for(&[85.0, 92.0, 99.0]), None);
    }

    #[test]
    fn test_only_three_most_recent_averaged() {
        // Older 400 reading would push the average over 200 if included
        assert_eq!(severity_for(&[90.0, 95.0, 100.0, 400.0]), None);
    }
}
