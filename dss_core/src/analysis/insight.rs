//! Insight records produced from a symptom analysis.

use super::DiseaseMatchScore;
use crate::config::AnalysisConfig;
use crate::rules::Severity;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use uuid::Uuid;

pub const SYMPTOM_ANALYSIS_CATEGORY: &str = "SYMPTOM_ANALYSIS";

/// Number of diseases listed in an insight message
const LISTED_DISEASES: usize = 3;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InsightType {
    Warning,
    Recommendation,
    Tip,
}

/// A user-facing insight for the caller to persist
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Insight {
    pub id: Uuid,
    pub insight_type: InsightType,
    pub category: String,
    pub title: String,
    pub message: String,
    pub actionable_advice: String,
    /// 1 (highest) to 3 (lowest)
    pub priority: u8,
    pub severity: Severity,
    pub generated_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Advice tiered on the urgency score
pub fn actionable_advice(urgency_score: f64) -> String {
    if urgency_score > 70.0 {
        "SEE A DOCTOR NOW:\n\
         - Your symptoms need urgent medical evaluation\n\
         - Book an appointment WITHIN 24-48 HOURS\n\
         - If symptoms get worse, go to the emergency department"
            .to_string()
    } else if urgency_score > 40.0 {
        "RECOMMENDED:\n\
         - Book a doctor's appointment within 1-2 weeks\n\
         - Track your symptoms daily\n\
         - Rest well and drink plenty of water\n\
         - If symptoms worsen, see a doctor sooner"
            .to_string()
    } else {
        "SUGGESTIONS:\n\
         - Monitor your symptoms for a few days\n\
         - Rest and take care of yourself\n\
         - If there is no improvement after 3-5 days, see a doctor\n\
         - Note down any changes"
            .to_string()
    }
}

/// Build the insight for a ranked disease list; `None` when nothing matched
pub fn build_insight(
    ranked: &[DiseaseMatchScore],
    urgency_score: f64,
    now: DateTime<Utc>,
    config: &AnalysisConfig,
) -> Option<Insight> {
    if ranked.is_empty() {
        return None;
    }

    let (title, insight_type, severity, priority) = if urgency_score > 70.0 {
        (
            "Symptoms need attention now",
            InsightType::Warning,
            Severity::Critical,
            1,
        )
    } else if urgency_score > 40.0 {
        (
            "Analysis of your symptoms",
            InsightType::Recommendation,
            Severity::Warning,
            2,
        )
    } else {
        (
            "About your symptoms",
            InsightType::Tip,
            Severity::Info,
            3,
        )
    };

    let mut message = String::from("Based on your symptoms, possible conditions are:\n\n");
    for (i, disease) in ranked.iter().take(LISTED_DISEASES).enumerate() {
        let _ = writeln!(
            message,
            "{}. {} ({:.0}% match)",
            i + 1,
            disease.disease_name,
            disease.match_score * 100.0
        );
    }

    Some(Insight {
        id: Uuid::new_v4(),
        insight_type,
        category: SYMPTOM_ANALYSIS_CATEGORY.to_string(),
        title: title.to_string(),
        message,
        actionable_advice: actionable_advice(urgency_score),
        priority,
        severity,
        generated_at: now,
        expires_at: expiry(now, config.insight_ttl_days),
    })
}

/// `now` plus the TTL, saturating at the latest representable instant
fn expiry(now: DateTime<Utc>, ttl_days: i64) -> DateTime<Utc> {
    Duration::try_days(ttl_days)
        .and_then(|ttl| now.checked_add_signed(ttl))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}
