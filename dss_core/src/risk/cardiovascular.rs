use super::{age_factor, confidence_score, valid_until, PredictionType, RiskLevel, RiskPrediction};
use crate::history::{average, most_recent_systolic};
use crate::{ExerciseFrequency, HealthMetric, HealthProfile, SmokingStatus};
use chrono::{DateTime, Utc};
use uuid::Uuid;

pub const CARDIOVASCULAR_ALGORITHM: &str = "Cardiovascular-Risk-Score-v1";

const BP_READINGS: usize = 3;
const VALIDITY_MONTHS: u32 = 6;

/// Estimate cardiovascular disease risk
///
/// | Factor                              | Points |
/// |-------------------------------------|--------|
/// | age over 45                         | 15     |
/// | BMI over 30 / over 25               | 20 / 10 |
/// | average systolic (last 3) ≥ 140     | 25     |
/// | current smoker                      | 20     |
/// | sedentary                           | 10     |
/// | any chronic disease                 | 15     |
pub fn predict_cardiovascular_risk(
    profile: &HealthProfile,
    age: Option<u32>,
    metrics: &[HealthMetric],
    now: DateTime<Utc>,
) -> RiskPrediction {
    let mut points = 0u32;
    let mut risk_factors = Vec::new();
    let mut protective_factors = Vec::new();

    if let Some(factor) = age_factor(age) {
        points += 15;
        risk_factors.push(factor);
    }

    if let Some(bmi) = profile.bmi.filter(|b| b.is_finite()) {
        if bmi > 30.0 {
            points += 20;
            risk_factors.push(format!("BMI {:.1} (obese)", bmi));
        } else if bmi > 25.0 {
            points += 10;
            risk_factors.push(format!("BMI {:.1} (overweight)", bmi));
        } else if (18.5..=24.9).contains(&bmi) {
            protective_factors.push("Normal BMI".to_string());
        }
    }

    let systolic = most_recent_systolic(metrics, BP_READINGS);
    if let Some(avg_systolic) = average(&systolic) {
        if avg_systolic >= 140.0 {
            points += 25;
            risk_factors.push(format!("High blood pressure (avg: {:.0} mmHg)", avg_systolic));
        } else if avg_systolic < 120.0 {
            protective_factors.push("Normal blood pressure".to_string());
        }
    }

    match profile.smoking_status {
        Some(SmokingStatus::Current) => {
            points += 20;
            risk_factors.push("Current smoker".to_string());
        }
        Some(SmokingStatus::Never) => protective_factors.push("Non-smoker".to_string()),
        _ => {}
    }

    match profile.exercise_frequency {
        Some(ExerciseFrequency::Sedentary) => {
            points += 10;
            risk_factors.push("Sedentary lifestyle".to_string());
        }
        Some(ExerciseFrequency::Active | ExerciseFrequency::VeryActive) => {
            protective_factors.push("Regular exercise".to_string());
        }
        _ => {}
    }

    if !profile.chronic_diseases.is_empty() {
        points += 15;
        risk_factors.push("Has a chronic disease".to_string());
    }

    let risk_level = RiskLevel::from_points(points);
    tracing::debug!("Cardiovascular risk: {} points ({})", points, risk_level);

    RiskPrediction {
        id: Uuid::new_v4(),
        prediction_type: PredictionType::DiseaseRisk,
        target_condition: "Cardiovascular disease".to_string(),
        risk_score: f64::from(points),
        risk_level,
        summary: summary(risk_level, points),
        risk_factors,
        protective_factors,
        recommendations: recommendations(risk_level),
        algorithm: CARDIOVASCULAR_ALGORITHM.to_string(),
        confidence_score: confidence_score(systolic.len(), profile),
        trend: None,
        predicted_at: now,
        valid_until: valid_until(now, VALIDITY_MONTHS),
    }
}

fn summary(level: RiskLevel, points: u32) -> String {
    let outlook = if level == RiskLevel::Low {
        "Your cardiovascular risk is low. Keep up a healthy lifestyle."
    } else {
        "You should take steps to lower your cardiovascular risk."
    };
    format!(
        "Cardiovascular disease risk: {}\n\nRisk points: {}/100\n\n{}",
        level, points, outlook
    )
}

fn recommendations(level: RiskLevel) -> Vec<String> {
    let mut recs = Vec::new();

    if level.is_elevated() {
        recs.push("See a cardiologist for a detailed assessment".to_string());
        recs.push("Preventive medication may be needed".to_string());
    }

    recs.extend(
        [
            "Exercise regularly (150 minutes per week)",
            "Follow a DASH diet: plenty of vegetables, little salt",
            "Quit smoking if you smoke",
            "Maintain a healthy weight",
            "Sleep 7-8 hours per night",
            "Monitor your blood pressure regularly",
        ]
        .iter()
        .map(|r| r.to_string()),
    );

    recs
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn bp_series(systolic: &[f64], now: DateTime<Utc>) -> Vec<HealthMetric> {
        systolic
            .iter()
            .enumerate()
            .map(|(i, &s)| HealthMetric::blood_pressure(s, 85.0, now - Duration::days(i as i64)))
            .collect()
    }

    #[test]
    fn test_all_risk_factors_very_high() {
        let now = Utc::now();
        let profile = HealthProfile {
            bmi: Some(32.0),
            smoking_status: Some(SmokingStatus::Current),
            exercise_frequency: Some(ExerciseFrequency::Sedentary),
            chronic_diseases: vec!["Hypertension".into()],
            family_medical_history: None,
        };
        let metrics = bp_series(&[150.0, 150.0, 150.0], now);

        let prediction = predict_cardiovascular_risk(&profile, Some(50), &metrics, now);

        // 15 + 20 + 25 + 20 + 10 + 15
        assert_eq!(prediction.risk_score, 105.0);
        assert_eq!(prediction.risk_level, RiskLevel::VeryHigh);
        assert_eq!(prediction.risk_factors.len(), 6);
        assert!(prediction.protective_factors.is_empty());
        assert_eq!(prediction.algorithm, CARDIOVASCULAR_ALGORITHM);
        assert_eq!(prediction.prediction_type, PredictionType::DiseaseRisk);
        assert!(prediction.risk_factors.contains(&"Age 50 (over 45)".to_string()));
        assert!(prediction
            .risk_factors
            .contains(&"High blood pressure (avg: 150 mmHg)".to_string()));
        assert_eq!(
            prediction.recommendations[0],
            "See a cardiologist for a detailed assessment"
        );
        // 50 + 15 + 10 + 5 + 5
        assert_eq!(prediction.confidence_score, 85.0);
    }

    #[test]
    fn test_healthy_profile_low_risk() {
        let now = Utc::now();
        let profile = HealthProfile {
            bmi: Some(22.0),
            smoking_status: Some(SmokingStatus::Never),
            exercise_frequency: Some(ExerciseFrequency::VeryActive),
            ..Default::default()
        };
        let metrics = bp_series(&[115.0, 118.0], now);

        let prediction = predict_cardiovascular_risk(&profile, Some(30), &metrics, now);

        assert_eq!(prediction.risk_score, 0.0);
        assert_eq!(prediction.risk_level, RiskLevel::Low);
        assert_eq!(
            prediction.protective_factors,
            vec![
                "Normal BMI",
                "Normal blood pressure",
                "Non-smoker",
                "Regular exercise"
            ]
        );
        assert_eq!(prediction.recommendations.len(), 6);
        assert!(prediction.summary.contains("Risk points: 0/100"));
    }

    #[test]
    fn test_only_three_newest_bp_readings_count() {
        let now = Utc::now();
        let profile = HealthProfile::default();
        // Newest three average 130; the old spike is ignored
        let metrics = bp_series(&[130.0, 130.0, 130.0, 200.0], now);

        let prediction = predict_cardiovascular_risk(&profile, None, &metrics, now);
        assert_eq!(prediction.risk_score, 0.0);
        assert!(prediction.protective_factors.is_empty());
    }

    #[test]
    fn test_overweight_and_age_boundary() {
        let now = Utc::now();
        let profile = HealthProfile {
            bmi: Some(27.5),
            ..Default::default()
        };

        let at_45 = predict_cardiovascular_risk(&profile, Some(45), &[], now);
        assert_eq!(at_45.risk_score, 10.0);

        let at_46 = predict_cardiovascular_risk(&profile, Some(46), &[], now);
        assert_eq!(at_46.risk_score, 25.0);
        assert_eq!(at_46.risk_level, RiskLevel::Moderate);
    }

    #[test]
    fn test_validity_is_six_months() {
        let now = Utc::now();
        let prediction = predict_cardiovascular_risk(&HealthProfile::default(), None, &[], now);
        let days = (prediction.valid_until - prediction.predicted_at).num_days();
        assert!((181..=184).contains(&days), "{} days", days);
    }
}
