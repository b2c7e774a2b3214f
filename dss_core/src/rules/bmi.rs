//! BMI threshold rule.

use super::{Rule, RuleFiring, Severity};
use crate::{HealthProfile, Result};

/// Flags under- and overweight BMI values
///
/// | BMI          | Outcome  |
/// |--------------|----------|
/// | < 16         | CRITICAL |
/// | 16 – 18.5    | WARNING  |
/// | 18.5 – 25    | silent   |
/// | 25 – 30      | WARNING  |
/// | 30 – 35      | WARNING  |
/// | ≥ 35         | CRITICAL |
#[derive(Clone, Copy, Debug, Default)]
pub struct BmiRule;

impl BmiRule {
    pub const NAME: &'static str = "BMI_EVALUATION";

    /// Classify a BMI value; non-finite values never fire
    pub fn assess(bmi: f64) -> Option<RuleFiring> {
        if !bmi.is_finite() {
            return None;
        }

        if bmi < 16.0 {
            Some(RuleFiring::new(
                Severity::Critical,
                format!(
                    "WARNING: very low BMI ({:.1}) - risk of severe malnutrition.\n\
                     Recommendations:\n\
                     1. See a nutritionist IMMEDIATELY\n\
                     2. Increase calorie intake\n\
                     3. Get a general health check-up",
                    bmi
                ),
            ))
        } else if bmi < 18.5 {
            Some(RuleFiring::new(
                Severity::Warning,
                format!(
                    "Low BMI ({:.1}) - underweight.\n\
                     Recommendations:\n\
                     1. Increase calorie intake\n\
                     2. Eat several small meals a day\n\
                     3. Add strength training to build muscle",
                    bmi
                ),
            ))
        } else if bmi < 25.0 {
            None
        } else if bmi < 30.0 {
            Some(RuleFiring::new(
                Severity::Warning,
                format!(
                    "Elevated BMI ({:.1}) - overweight.\n\
                     Recommendations:\n\
                     1. Aim to lose 5-10% of body weight\n\
                     2. Eat more vegetables, fewer processed foods\n\
                     3. Exercise regularly\n\
                     4. Track your weight weekly",
                    bmi
                ),
            ))
        } else {
            let (severity, prefix) = if bmi >= 35.0 {
                (Severity::Critical, "WARNING: high")
            } else {
                (Severity::Warning, "High")
            };
            Some(RuleFiring::new(
                severity,
                format!(
                    "{} BMI ({:.1}) - obesity.\n\
                     Recommendations:\n\
                     1. See a doctor for a safe weight-loss plan\n\
                     2. Reduce calorie intake\n\
                     3. Increase physical activity (at least 150 minutes/week)\n\
                     4. Check cardiovascular risk factors",
                    prefix, bmi
                ),
            ))
        }
    }
}

impl Rule<f64> for BmiRule {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn evaluate(&self, bmi: &f64) -> Result<Option<RuleFiring>> {
        Ok(Self::assess(*bmi))
    }
}

impl Rule<HealthProfile> for BmiRule {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn evaluate(&self, profile: &HealthProfile) -> Result<Option<RuleFiring>> {
        Ok(profile.bmi.and_then(Self::assess))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn severity_for(bmi: f64) -> Option<Severity> {
        BmiRule::assess(bmi).map(|f| f.severity)
    }

    #[test]
    fn test_reference_thresholds() {
        assert_eq!(severity_for(15.9), Some(Severity::Critical));
        assert_eq!(severity_for(18.4), Some(Severity::Warning));
        assert_eq!(severity_for(20.0), None);
        assert_eq!(severity_for(29.9), Some(Severity::Warning));
        assert_eq!(severity_for(35.0), Some(Severity::Critical));
    }

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(severity_for(16.0), Some(Severity::Warning));
        assert_eq!(severity_for(18.5), None);
        assert_eq!(severity_for(24.99), None);
        assert_eq!(severity_for(25.0), Some(Severity::Warning));
        assert_eq!(severity_for(30.0), Some(Severity::Warning));
        assert_eq!(severity_for(34.9), Some(Severity::Warning));
    }

    #[test]
    fn test_recommendation_is_tier_specific() {
        let underweight = BmiRule::assess(17.0).unwrap();
        assert!(underweight.recommendation.contains("underweight"));
        assert!(underweight.recommendation.contains("17.0"));

        let overweight = BmiRule::assess(27.0).unwrap();
        assert!(overweight.recommendation.contains("overweight"));

        let obese = BmiRule::assess(36.2).unwrap();
        assert!(obese.recommendation.contains("obesity"));
        assert!(obese.recommendation.starts_with("WARNING"));
    }

    #[test]
    fn test_missing_or_invalid_bmi_never_fires() {
        let profile = HealthProfile::default();
        assert!(BmiRule.evaluate(&profile).unwrap().is_none());
        assert!(Rule::<f64>::evaluate(&BmiRule, &f64::NAN).unwrap().is_none());
    }

    #[test]
    fn test_profile_and_value_inputs_agree() {
        let profile = HealthProfile {
            bmi: Some(15.0),
            ..Default::default()
        };
        let from_profile = BmiRule.evaluate(&profile).unwrap();
        let from_value = Rule::<f64>::evaluate(&BmiRule, &15.0).unwrap();
        assert_eq!(from_profile, from_value);
    }
}
