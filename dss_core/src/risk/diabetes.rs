use super::{age_factor, confidence_score, valid_until, PredictionType, RiskLevel, RiskPrediction};
use crate::history::{average, most_recent_values};
use crate::{ExerciseFrequency, HealthMetric, HealthProfile, MetricType};
use chrono::{DateTime, Utc};
use uuid::Uuid;

pub const DIABETES_ALGORITHM: &str = "Diabetes-Risk-Score-v1";

const SUGAR_READINGS: usize = 3;
const VALIDITY_MONTHS: u32 = 6;

/// Estimate type 2 diabetes risk
///
/// Points: age over 45 (+15), BMI ≥30 (+25) or ≥25 (+15), average of the
/// last 3 blood sugar readings ≥126 (+30) or ≥100 (+20), diabetes in the
/// family history (+20), sedentary (+10).
pub fn predict_diabetes_risk(
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
        if bmi >= 30.0 {
            points += 25;
            risk_factors.push("High BMI (obese)".to_string());
        } else if bmi >= 25.0 {
            points += 15;
            risk_factors.push("Overweight".to_string());
        }
    }

    let sugar = most_recent_values(metrics, MetricType::BloodSugar, SUGAR_READINGS);
    if let Some(avg_sugar) = average(&sugar) {
        if avg_sugar >= 126.0 {
            points += 30;
            risk_factors.push("High blood sugar".to_string());
        } else if avg_sugar >= 100.0 {
            points += 20;
            risk_factors.push("Pre-diabetes".to_string());
        } else {
            protective_factors.push("Normal blood sugar".to_string());
        }
    }

    if has_family_history(profile) {
        points += 20;
        risk_factors.push("Family history of diabetes".to_string());
    }

    // Only ACTIVE counts as protective for diabetes
    match profile.exercise_frequency {
        Some(ExerciseFrequency::Sedentary) => {
            points += 10;
            risk_factors.push("Sedentary lifestyle".to_string());
        }
        Some(ExerciseFrequency::Active) => {
            protective_factors.push("Regular exercise".to_string());
        }
        _ => {}
    }

    let risk_level = RiskLevel::from_points(points);
    tracing::debug!("Diabetes risk: {} points ({})", points, risk_level);

    RiskPrediction {
        id: Uuid::new_v4(),
        prediction_type: PredictionType::DiseaseRisk,
        target_condition: "Type 2 diabetes".to_string(),
        risk_score: f64::from(points),
        risk_level,
        summary: summary(risk_level, points),
        risk_factors,
        protective_factors,
        recommendations: recommendations(risk_level),
        algorithm: DIABETES_ALGORITHM.to_string(),
        confidence_score: confidence_score(sugar.len(), profile),
        trend: None,
        predicted_at: now,
        valid_until: valid_until(now, VALIDITY_MONTHS),
    }
}

/// Terms that mark a family-history entry as diabetes; imported records may
/// still be in Vietnamese
const FAMILY_HISTORY_TERMS: [&str; 2] = ["diabetes", "tiểu đường"];

fn has_family_history(profile: &HealthProfile) -> bool {
    profile
        .family_medical_history
        .iter()
        .flatten()
        .map(|entry| entry.to_lowercase())
        .any(|entry| FAMILY_HISTORY_TERMS.iter().any(|term| entry.contains(term)))
}

fn summary(level: RiskLevel, points: u32) -> String {
    let outlook = if level == RiskLevel::Low {
        "Your diabetes risk is low. Keep up a healthy lifestyle."
    } else {
        "You should take preventive steps to lower your risk."
    };
    format!(
        "Type 2 diabetes risk: {}\n\nRisk points: {}/100\n{}",
        level, points, outlook
    )
}

fn recommendations(level: RiskLevel) -> Vec<String> {
    let mut recs = Vec::new();

    if level.is_elevated() {
        recs.push("Have your HbA1c checked by a doctor".to_string());
    }

    recs.extend(
        [
            "Cut down on sugar and refined carbohydrates",
            "Exercise 30 minutes a day",
            "Lose 5-10% of body weight if overweight",
            "Eat plenty of vegetables and whole grains",
            "Check your blood sugar periodically",
        ]
        .iter()
        .map(|r| r.to_string()),
    );

    recs
}
