//! Composite urgency score for a set of active symptoms.

use super::DiseaseMatchScore;
use crate::config::AnalysisConfig;
use crate::Symptom;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

const SERIOUS_DISEASE_POINTS: f64 = 30.0;
const IMMEDIATE_ATTENTION_POINTS: f64 = 40.0;
const POINTS_PER_SYMPTOM: f64 = 3.0;
const MAX_SYMPTOM_COUNT_POINTS: f64 = 20.0;
const PERSISTENT_SYMPTOM_POINTS: f64 = 15.0;
const MAX_SCORE: f64 = 100.0;

/// Used for the severity term when no symptom is given
const NEUTRAL_SEVERITY: f64 = 5.0;

/// How soon the user should seek care
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UrgencyLevel {
    /// Only for the no-active-symptoms result
    None,
    Low,
    Moderate,
    High,
}

impl UrgencyLevel {
    /// Map a computed score: above 70 is HIGH, above 40 MODERATE, else LOW
    pub fn from_score(score: f64) -> Self {
        if score > 70.0 {
            UrgencyLevel::High
        } else if score > 40.0 {
            UrgencyLevel::Moderate
        } else {
            UrgencyLevel::Low
        }
    }
}

impl std::fmt::Display for UrgencyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UrgencyLevel::None => write!(f, "NONE"),
            UrgencyLevel::Low => write!(f, "LOW"),
            UrgencyLevel::Moderate => write!(f, "MODERATE"),
            UrgencyLevel::High => write!(f, "HIGH"),
        }
    }
}

/// Compute the 0-100 urgency score
///
/// Sum of independent terms, capped at 100:
/// - average severity × 10
/// - +30 if any ranked disease is SEVERE or CRITICAL
/// - +40 if any ranked disease requires immediate attention
/// - +3 per symptom, at most +20
/// - +15 if any symptom started more than `persistent_after_days` ago
pub fn urgency_score(
    symptoms: &[Symptom],
    ranked: &[DiseaseMatchScore],
    now: DateTime<Utc>,
    config: &AnalysisConfig,
) -> f64 {
    let avg_severity = if symptoms.is_empty() {
        NEUTRAL_SEVERITY
    } else {
        symptoms.iter().map(|s| f64::from(s.severity)).sum::<f64>() / symptoms.len() as f64
    };
    let mut score = avg_severity * 10.0;

    if ranked.iter().any(|d| d.severity.is_serious()) {
        score += SERIOUS_DISEASE_POINTS;
    }

    if ranked.iter().any(|d| d.requires_immediate_attention) {
        score += IMMEDIATE_ATTENTION_POINTS;
    }

    score += (POINTS_PER_SYMPTOM * symptoms.len() as f64).min(MAX_SYMPTOM_COUNT_POINTS);

    // No bonus when the cutoff falls outside the representable range
    let persistent_cutoff = Duration::try_days(config.persistent_after_days)
        .and_then(|span| now.checked_sub_signed(span));
    if let Some(cutoff) = persistent_cutoff {
        if symptoms.iter().any(|s| s.start_date < cutoff) {
            score += PERSISTENT_SYMPTOM_POINTS;
        }
    }

    score.min(MAX_SCORE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DiseaseSeverity;

    fn ranked_disease(severity: DiseaseSeverity, immediate: bool) -> DiseaseMatchScore {
        DiseaseMatchScore {
            disease_name: "Test".into(),
            disease_name_en: None,
            icd_code: None,
            category: "TEST".into(),
            severity,
            requires_immediate_attention: immediate,
            recommendations: vec![],
            match_score: 0.8,
        }
    }

    #[test]
    fn test_severity_and_count_terms() {
        let now = Utc::now();
        let symptoms = vec![
            Symptom::active("Headache", 4, now - Duration::days(1)),
            Symptom::active("Nausea", 2, now),
        ];

        // 3 * 10 + 2 * 3
        let score = urgency_score(&symptoms, &[], now, &AnalysisConfig::default());
        assert_eq!(score, 36.0);
        assert_eq!(UrgencyLevel::from_score(score), UrgencyLevel::Low);
    }

    #[test]
    fn test_serious_disease_term() {
        let now = Utc::now();
        let symptoms = vec![Symptom::active("Cough", 2, now)];
        let ranked = vec![ranked_disease(DiseaseSeverity::Severe, false)];

        // 20 + 30 + 3
        let score = urgency_score(&symptoms, &ranked, now, &AnalysisConfig::default());
        assert_eq!(score, 53.0);
        assert_eq!(UrgencyLevel::from_score(score), UrgencyLevel::Moderate);
    }

    #[test]
    fn test_immediate_attention_term() {
        let now = Utc::now();
        let symptoms = vec![Symptom::active("Chest pain", 1, now)];
        let ranked = vec![ranked_disease(DiseaseSeverity::Mild, true)];

        // 10 + 40 + 3
        let score = urgency_score(&symptoms, &ranked, now, &AnalysisConfig::default());
        assert_eq!(score, 53.0);
    }

    #[test]
    fn test_symptom_count_term_is_capped() {
        let now = Utc::now();
        let symptoms: Vec<Symptom> = (0..10)
            .map(|i| Symptom::active(format!("S{}", i), 1, now))
            .collect();

        // 10 + min(30, 20)
        let score = urgency_score(&symptoms, &[], now, &AnalysisConfig::default());
        assert_eq!(score, 30.0);
    }

    #[test]
    fn test_persistent_symptom_term() {
        let now = Utc::now();
        let exactly_seven = vec![Symptom::active("Cough", 2, now - Duration::days(7))];
        let eight = vec![Symptom::active("Cough", 2, now - Duration::days(8))];
        let config = AnalysisConfig::default();

        assert_eq!(urgency_score(&exactly_seven, &[], now, &config), 23.0);
        assert_eq!(urgency_score(&eight, &[], now, &config), 38.0);
    }

    #[test]
    fn test_unrepresentable_persistence_cutoff() {
        let now = Utc::now();
        let symptoms = vec![Symptom::active("Cough", 2, now - Duration::days(400))];
        let config = AnalysisConfig {
            persistent_after_days: 1_000_000_000,
            ..AnalysisConfig::default()
        };

        // 20 + 3, no persistence bonus
        assert_eq!(urgency_score(&symptoms, &[], now, &config), 23.0);

        let config = AnalysisConfig {
            persistent_after_days: i64::MAX,
            ..AnalysisConfig::default()
        };
        assert_eq!(urgency_score(&symptoms, &[], now, &config), 23.0);
    }

    #[test]
    fn test_score_clamped_to_100() {
        let now = Utc::now();
        let symptoms = vec![
            Symptom::active("Chest pain", 9, now),
            Symptom::active("Shortness of breath", 8, now),
            Symptom::active("Dizziness", 7, now),
        ];
        let ranked = vec![ranked_disease(DiseaseSeverity::Critical, true)];

        let score = urgency_score(&symptoms, &ranked, now, &AnalysisConfig::default());
        assert_eq!(score, 100.0);
        assert_eq!(UrgencyLevel::from_score(score), UrgencyLevel::High);
    }

    #[test]
    fn test_level_boundaries() {
        assert_eq!(UrgencyLevel::from_score(70.0), UrgencyLevel::Moderate);
        assert_eq!(UrgencyLevel::from_score(70.1), UrgencyLevel::High);
        assert_eq!(UrgencyLevel::from_score(40.0), UrgencyLevel::Low);
        assert_eq!(UrgencyLevel::from_score(40.5), UrgencyLevel::Moderate);
    }
}
