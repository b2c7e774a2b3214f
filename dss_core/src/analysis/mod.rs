//! Symptom analysis: disease matching, urgency scoring and insights.
//!
//! [`analyze_symptoms`] runs the whole pipeline:
//! 1. Keep active symptoms (no end date)
//! 2. Ask the candidate source for diseases related to their names
//! 3. Score and rank the candidates (top 5 above 0.3)
//! 4. Compute the urgency score and level
//! 5. Build recommendations, a summary note and an insight
//!
//! Two "nothing found" outcomes stay distinct: no active symptoms at all
//! (urgency 0, NONE, the source is never queried) and no related disease
//! (urgency 30, LOW).

pub mod insight;
pub mod matcher;
pub mod urgency;

pub use insight::{build_insight, Insight, InsightType};
pub use matcher::{match_score, normalize, rank_diseases, symptom_set, DiseaseMatchScore};
pub use urgency::{urgency_score, UrgencyLevel};

use crate::config::AnalysisConfig;
use crate::knowledge::CandidateSource;
use crate::Symptom;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const NO_MATCH_URGENCY: f64 = 30.0;

/// Which path produced an analysis result
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnalysisOutcome {
    NoSymptoms,
    NoMatch,
    Analyzed,
}

/// Result of analyzing a user's active symptoms
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SymptomAnalysis {
    pub outcome: AnalysisOutcome,
    pub ranked_diseases: Vec<DiseaseMatchScore>,
    pub urgency_score: f64,
    pub urgency_level: UrgencyLevel,
    pub recommendations: Vec<String>,
    pub note: String,
    /// Present whenever at least one disease was ranked
    pub insight: Option<Insight>,
}

impl SymptomAnalysis {
    /// Canonical result for a user with no active symptoms
    pub fn no_symptoms() -> Self {
        Self {
            outcome: AnalysisOutcome::NoSymptoms,
            ranked_diseases: Vec::new(),
            urgency_score: 0.0,
            urgency_level: UrgencyLevel::None,
            recommendations: vec!["No symptoms are currently being tracked".to_string()],
            note: "You have no active symptoms".to_string(),
            insight: None,
        }
    }

    /// Canonical result when no known disease relates to the symptoms
    pub fn no_match() -> Self {
        Self {
            outcome: AnalysisOutcome::NoMatch,
            ranked_diseases: Vec::new(),
            urgency_score: NO_MATCH_URGENCY,
            urgency_level: UrgencyLevel::Low,
            recommendations: vec![
                "No matching condition was found in the knowledge base".to_string(),
                "If symptoms are severe or do not improve, see a doctor".to_string(),
            ],
            note: "Your symptoms did not match any condition in the system".to_string(),
            insight: None,
        }
    }
}

/// Analyze `symptoms` against diseases supplied by `source`
///
/// Ended symptoms are ignored. `source` is only consulted when at least one
/// symptom is active, and may return more diseases than needed: unrelated
/// candidates never affect the result.
pub fn analyze_symptoms<S>(
    symptoms: &[Symptom],
    source: &S,
    now: DateTime<Utc>,
    config: &AnalysisConfig,
) -> SymptomAnalysis
where
    S: CandidateSource + ?Sized,
{
    let active: Vec<Symptom> = symptoms.iter().filter(|s| s.is_active()).cloned().collect();

    if active.is_empty() {
        tracing::info!("No active symptoms to analyze");
        return SymptomAnalysis::no_symptoms();
    }

    tracing::info!("Analyzing {} active symptoms", active.len());

    let names: Vec<String> = active.iter().map(|s| s.name.clone()).collect();
    let user_symptoms = symptom_set(&active);

    let candidates: Vec<_> = source
        .candidates(&names)
        .into_iter()
        .filter(|d| matcher::shares_symptom(&user_symptoms, d))
        .collect();

    tracing::debug!("{} related candidate diseases", candidates.len());

    if candidates.is_empty() {
        return SymptomAnalysis::no_match();
    }

    let ranked = rank_diseases(&user_symptoms, &candidates, config);
    let score = urgency_score(&active, &ranked, now, config);
    let level = UrgencyLevel::from_score(score);

    tracing::info!(
        "Ranked {} diseases, urgency {:.0} ({})",
        ranked.len(),
        score,
        level
    );

    let mut recommendations = vec![insight::actionable_advice(score)];
    if let Some(top) = ranked.first() {
        recommendations.extend(top.recommendations.iter().cloned());
    }

    let note = format!(
        "Analyzed {} symptoms against {} potential conditions. Urgency: {} ({:.0}/100)",
        active.len(),
        ranked.len(),
        level,
        score
    );

    let insight = build_insight(&ranked, score, now, config);

    SymptomAnalysis {
        outcome: AnalysisOutcome::Analyzed,
        ranked_diseases: ranked,
        urgency_score: score,
        urgency_level: level,
        recommendations,
        note,
        insight,
    }
}
