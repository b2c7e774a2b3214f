//! Weighted symptom-to-disease matching with the critical-symptom veto.

use crate::config::AnalysisConfig;
use crate::{DiseasePattern, DiseaseSeverity, Symptom};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Extra weight credited for a matched critical symptom, as a share of its weight
const CRITICAL_MATCH_BONUS: f64 = 0.5;

/// A candidate disease with its computed match score
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DiseaseMatchScore {
    pub disease_name: String,
    pub disease_name_en: Option<String>,
    pub icd_code: Option<String>,
    pub category: String,
    pub severity: DiseaseSeverity,
    pub requires_immediate_attention: bool,
    pub recommendations: Vec<String>,
    /// Matched weight over total weight; may exceed 1.0 when critical
    /// symptoms match, unless clamping is configured
    pub match_score: f64,
}

impl DiseaseMatchScore {
    pub fn new(disease: &DiseasePattern, match_score: f64) -> Self {
        Self {
            disease_name: disease.disease_name.clone(),
            disease_name_en: disease.disease_name_en.clone(),
            icd_code: disease.icd_code.clone(),
            category: disease.category.clone(),
            severity: disease.severity,
            requires_immediate_attention: disease.requires_immediate_attention,
            recommendations: disease.recommendations.clone(),
            match_score,
        }
    }
}

/// Case-fold and trim a symptom name for comparison
pub fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Normalized names of the given symptoms
pub fn symptom_set(symptoms: &[Symptom]) -> HashSet<String> {
    symptoms.iter().map(|s| normalize(&s.name)).collect()
}

/// Whether any of the disease's pattern symptoms is present
pub fn shares_symptom(user_symptoms: &HashSet<String>, disease: &DiseasePattern) -> bool {
    disease
        .symptom_patterns
        .iter()
        .any(|p| user_symptoms.contains(&normalize(&p.symptom_name)))
}

/// Score one disease against the user's normalized symptom names
///
/// Returns 0 when the disease has no weight or when any critical symptom is
/// missing. Otherwise matched weight (critical matches count 1.5x) divided
/// by the total pattern weight.
pub fn match_score(user_symptoms: &HashSet<String>, disease: &DiseasePattern) -> f64 {
    let total_weight: u64 = disease
        .symptom_patterns
        .iter()
        .map(|p| u64::from(p.weight))
        .sum();

    if total_weight == 0 {
        return 0.0;
    }

    let mut matched_weight = 0.0;

    for pattern in &disease.symptom_patterns {
        let weight = f64::from(pattern.weight);

        if user_symptoms.contains(&normalize(&pattern.symptom_name)) {
            matched_weight += weight;
            if pattern.is_critical {
                matched_weight += weight * CRITICAL_MATCH_BONUS;
            }
        } else if pattern.is_critical {
            tracing::debug!(
                "{} rejected: missing critical symptom {}",
                disease.disease_name,
                pattern.symptom_name
            );
            return 0.0;
        }
    }

    matched_weight / total_weight as f64
}

/// Score, filter and rank candidate diseases
///
/// Keeps diseases scoring above `min_match_score`, best first, at most
/// `max_ranked` of them. A disease listed more than once keeps its best
/// score; equal scores are ordered by name.
pub fn rank_diseases(
    user_symptoms: &HashSet<String>,
    candidates: &[DiseasePattern],
    config: &AnalysisConfig,
) -> Vec<DiseaseMatchScore> {
    let mut best: HashMap<String, DiseaseMatchScore> = HashMap::new();

    for disease in candidates {
        let mut score = match_score(user_symptoms, disease);
        if config.clamp_match_score {
            score = score.min(1.0);
        }
        if score <= config.min_match_score {
            continue;
        }

        let key = normalize(&disease.disease_name);
        match best.get(&key) {
            Some(existing) if existing.match_score >= score => {}
            _ => {
                best.insert(key, DiseaseMatchScore::new(disease, score));
            }
        }
    }

    tracing::debug!("{} diseases scored above {}", best.len(), config.min_match_score);

    let mut ranked: Vec<DiseaseMatchScore> = best.into_values().collect();
    ranked.sort_by(|a, b| {
        b.match_score
            .total_cmp(&a.match_score)
            .then_with(|| a.disease_name.cmp(&b.disease_name))
    });
    ranked.truncate(config.max_ranked);
    ranked
}
